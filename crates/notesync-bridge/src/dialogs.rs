//! Fixed dialog texts, one pair per request and failure stage.

use notesync_core::{Dialog, ErrorCode, SyncError};

const CHECK_CLOUD_CONFIG: &str = "请检查云端配置项是否正确";
const CHECK_FILE_FORMAT: &str = "请检查解析文件格式是否正确";

const REMOTE_FILE_FAILED: &str = "线上文件失败";
const PARSE_FAILED: &str = "数据解析失败";
const DELETE_FAILED: &str = "云端删除失败";
const DELETE_SUCCEEDED: &str = "云端删除成功";
const SEARCH_FAILED: &str = "连接云端搜索失败";
const SEARCH_EMPTY: &str = "未查询到匹配对象";

/// Any failure before the download lands on disk, not-found included.
pub fn remote_file_failed(err: &SyncError) -> Dialog {
    Dialog::error(REMOTE_FILE_FAILED, CHECK_CLOUD_CONFIG, err.code())
}

pub fn parse_failed() -> Dialog {
    Dialog::error(PARSE_FAILED, CHECK_FILE_FORMAT, ErrorCode::ParseError)
}

pub fn delete_failed(err: &SyncError) -> Dialog {
    Dialog::error(DELETE_FAILED, CHECK_CLOUD_CONFIG, err.code())
}

pub fn delete_succeeded() -> Dialog {
    Dialog::info(DELETE_SUCCEEDED, DELETE_SUCCEEDED)
}

pub fn search_failed(err: &SyncError) -> Dialog {
    Dialog::error(SEARCH_FAILED, CHECK_CLOUD_CONFIG, err.code())
}

pub fn search_empty() -> Dialog {
    Dialog::info(SEARCH_EMPTY, SEARCH_EMPTY)
}
