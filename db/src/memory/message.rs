use async_trait::async_trait;
use tokio::sync::RwLock;

use abi::errors::Result;
use abi::model::Message;

use crate::message::MsgStoreRepo;

/// append only, insertion order breaks send time ties
#[derive(Debug, Default)]
pub struct MemoryMessage {
    messages: RwLock<Vec<Message>>,
}

impl MemoryMessage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MsgStoreRepo for MemoryMessage {
    async fn save_message(&self, message: Message) -> Result<Message> {
        self.messages.write().await.push(message.clone());
        Ok(message)
    }

    async fn get_messages(&self, one: &str, other: &str) -> Result<Vec<Message>> {
        let member = |id: &str| id == one || id == other;
        let mut list: Vec<Message> = self
            .messages
            .read()
            .await
            .iter()
            .filter(|m| member(&m.sender_id) && member(&m.recipient_id))
            .cloned()
            .collect();
        // stable, keeps insertion order for equal timestamps
        list.sort_by_key(|m| m.send_time);
        Ok(list)
    }
}
