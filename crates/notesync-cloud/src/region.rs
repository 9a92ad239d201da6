//! Bucket area codes to S3 regions and endpoints.

/// Map a Kodo area code (`z0`, `z1`, ...) to its S3 region id.
/// Unknown codes are assumed to already be region ids.
pub fn region_for_area(area: &str) -> &str {
    match area {
        "z0" => "cn-east-1",
        "cn-east-2" => "cn-east-2",
        "z1" => "cn-north-1",
        "z2" => "cn-south-1",
        "na0" => "us-north-1",
        "as0" => "ap-southeast-1",
        other => other,
    }
}

/// S3-compatible endpoint serving `region`.
pub fn endpoint_for_region(region: &str) -> String {
    format!("https://s3.{}.qiniucs.com", region)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_for_area() {
        assert_eq!(region_for_area("z0"), "cn-east-1");
        assert_eq!(region_for_area("z1"), "cn-north-1");
        assert_eq!(region_for_area("z2"), "cn-south-1");
        assert_eq!(region_for_area("na0"), "us-north-1");
        assert_eq!(region_for_area("as0"), "ap-southeast-1");
        assert_eq!(region_for_area("ap-northeast-1"), "ap-northeast-1");
    }

    #[test]
    fn test_endpoint_for_region() {
        assert_eq!(
            endpoint_for_region(region_for_area("z0")),
            "https://s3.cn-east-1.qiniucs.com"
        );
    }
}
