use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use abi::errors::{Error, Result};
use abi::model::{FriendRequest, FriendRequestCreate, FriendRequestStatus, Friendship};
use abi::utils::{gen_id, now_millis};

use crate::friend::FriendRepo;

#[derive(Debug)]
pub struct PostgresFriend {
    pool: PgPool,
}

impl PostgresFriend {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FriendRepo for PostgresFriend {
    async fn create_request(&self, req: FriendRequestCreate) -> Result<FriendRequest> {
        debug!("create_request: {:?}", &req);
        let now = now_millis();
        let request = sqlx::query_as(
            "INSERT INTO friend_requests
                (id, sender_id, recipient_id, status, create_time, update_time)
             VALUES
                ($1, $2, $3, $4, $5, $5)
             RETURNING *",
        )
        .bind(gen_id())
        .bind(&req.sender_id)
        .bind(&req.recipient_id)
        .bind(FriendRequestStatus::Pending)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(request)
    }

    async fn get_request(&self, id: &str) -> Result<Option<FriendRequest>> {
        let request = sqlx::query_as("SELECT * FROM friend_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(request)
    }

    async fn update_request_status(
        &self,
        id: &str,
        status: FriendRequestStatus,
    ) -> Result<FriendRequest> {
        let request = sqlx::query_as(
            "UPDATE friend_requests
             SET status = $2, update_time = $3
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(now_millis())
        .fetch_optional(&self.pool)
        .await?;
        request.ok_or_else(|| Error::not_found_with_details(format!("friend request {id}")))
    }

    async fn incoming_requests(&self, user_id: &str) -> Result<Vec<FriendRequest>> {
        let list = sqlx::query_as(
            "SELECT * FROM friend_requests
             WHERE recipient_id = $1 AND status = $2
             ORDER BY create_time, id",
        )
        .bind(user_id)
        .bind(FriendRequestStatus::Pending)
        .fetch_all(&self.pool)
        .await?;
        Ok(list)
    }

    async fn outgoing_requests(&self, user_id: &str) -> Result<Vec<FriendRequest>> {
        let list = sqlx::query_as(
            "SELECT * FROM friend_requests WHERE sender_id = $1 ORDER BY create_time, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(list)
    }

    async fn create_friendship(&self, user_a: &str, user_b: &str) -> Result<Friendship> {
        let fs = sqlx::query_as(
            "INSERT INTO friendships (id, user_a, user_b, create_time)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(gen_id())
        .bind(user_a)
        .bind(user_b)
        .bind(now_millis())
        .fetch_one(&self.pool)
        .await?;
        Ok(fs)
    }

    async fn friendships_of(&self, user_id: &str) -> Result<Vec<Friendship>> {
        let list = sqlx::query_as(
            "SELECT * FROM friendships
             WHERE user_a = $1 OR user_b = $1
             ORDER BY create_time, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(list)
    }

    async fn delete_friendship(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM friendships WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::not_found_with_details(format!("friendship {id}")));
        }
        Ok(())
    }
}
