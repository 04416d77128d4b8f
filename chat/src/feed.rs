use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::trace;

use abi::model::Message;

/// in-process fan-out of every stored message.
/// subscribers filter for the pair they watch
#[derive(Debug, Clone)]
pub struct MessageFeed {
    tx: broadcast::Sender<Message>,
}

impl MessageFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// no receivers is not an error, the message is already stored
    pub fn publish(&self, msg: Message) {
        match self.tx.send(msg) {
            Ok(n) => trace!("message published to {} subscribers", n),
            Err(_) => trace!("message published without subscribers"),
        }
    }

    pub fn subscribe(&self) -> BroadcastStream<Message> {
        BroadcastStream::new(self.tx.subscribe())
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for MessageFeed {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_stream::StreamExt;

    #[tokio::test]
    async fn feed_should_fan_out() {
        let feed = MessageFeed::new(8);
        feed.publish(Message::default());

        let mut one = feed.subscribe();
        let mut two = feed.subscribe();
        assert_eq!(feed.receiver_count(), 2);

        let msg = Message {
            id: "m1".to_string(),
            ..Default::default()
        };
        feed.publish(msg.clone());
        assert_eq!(one.next().await.unwrap().unwrap(), msg);
        assert_eq!(two.next().await.unwrap().unwrap(), msg);

        drop(one);
        assert_eq!(feed.receiver_count(), 1);
    }
}
