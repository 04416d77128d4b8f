use async_trait::async_trait;
use sqlx::PgPool;

use abi::errors::Result;
use abi::model::Message;

use crate::message::MsgStoreRepo;

#[derive(Debug)]
pub struct PostgresMessage {
    pool: PgPool,
}

impl PostgresMessage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MsgStoreRepo for PostgresMessage {
    async fn save_message(&self, message: Message) -> Result<Message> {
        let msg = sqlx::query_as(
            "INSERT INTO messages
             (id, sender_id, recipient_id, content, send_time)
             VALUES
             ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(&message.id)
        .bind(&message.sender_id)
        .bind(&message.recipient_id)
        .bind(&message.content)
        .bind(message.send_time)
        .fetch_one(&self.pool)
        .await?;
        Ok(msg)
    }

    async fn get_messages(&self, one: &str, other: &str) -> Result<Vec<Message>> {
        let list = sqlx::query_as(
            "SELECT * FROM messages
             WHERE sender_id IN ($1, $2) AND recipient_id IN ($1, $2)
             ORDER BY send_time",
        )
        .bind(one)
        .bind(other)
        .fetch_all(&self.pool)
        .await?;
        Ok(list)
    }
}
