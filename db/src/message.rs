use std::fmt::Debug;

use async_trait::async_trait;

use abi::errors::Result;
use abi::model::Message;

#[async_trait]
pub trait MsgStoreRepo: Sync + Send + Debug {
    async fn save_message(&self, message: Message) -> Result<Message>;

    /// messages whose sender and recipient are both members of `{one, other}`,
    /// ordered by send time.
    /// this also matches messages a user sent to themselves,
    /// callers narrow it with `conversation_filter`
    async fn get_messages(&self, one: &str, other: &str) -> Result<Vec<Message>>;
}
