use notesync_core::{Outbound, UiSink};
use tokio::sync::broadcast;
use tracing::debug;

/// Fans outbound messages out to every connected UI subscriber.
#[derive(Debug, Clone)]
pub struct BroadcastUi {
    tx: broadcast::Sender<Outbound>,
}

impl BroadcastUi {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Outbound> {
        self.tx.subscribe()
    }
}

impl UiSink for BroadcastUi {
    fn send(&self, message: Outbound) {
        let channel = message.channel();
        if self.tx.send(message).is_err() {
            debug!(channel, "No UI subscriber, dropping message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_subscriber_receives() {
        let ui = BroadcastUi::new(8);
        let mut first = ui.subscribe();
        let mut second = ui.subscribe();

        ui.set_loading(true);

        assert_eq!(first.recv().await.unwrap(), Outbound::LoadingStatus(true));
        assert_eq!(second.recv().await.unwrap(), Outbound::LoadingStatus(true));
    }

    #[test]
    fn test_send_without_subscriber_is_silent() {
        let ui = BroadcastUi::new(8);
        ui.set_loading(false);
    }
}
