use crate::protocol::Outbound;

/// Outbound channel to the UI host.
///
/// Sending never blocks and never fails from the router's point of view:
/// a UI that is not listening simply misses the message.
pub trait UiSink: Send + Sync {
    fn send(&self, message: Outbound);

    fn set_loading(&self, loading: bool) {
        self.send(Outbound::LoadingStatus(loading));
    }
}
