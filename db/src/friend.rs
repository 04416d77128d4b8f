use std::fmt::Debug;

use async_trait::async_trait;

use abi::errors::Result;
use abi::model::{FriendRequest, FriendRequestCreate, FriendRequestStatus, Friendship};

#[async_trait]
pub trait FriendRepo: Send + Sync + Debug {
    /// create friend request, it always starts pending;
    /// no check against duplicates or requests to oneself
    async fn create_request(&self, req: FriendRequestCreate) -> Result<FriendRequest>;

    async fn get_request(&self, id: &str) -> Result<Option<FriendRequest>>;

    async fn update_request_status(
        &self,
        id: &str,
        status: FriendRequestStatus,
    ) -> Result<FriendRequest>;

    /// pending requests addressed to the user
    async fn incoming_requests(&self, user_id: &str) -> Result<Vec<FriendRequest>>;

    /// every request the user sent, whatever its status
    async fn outgoing_requests(&self, user_id: &str) -> Result<Vec<FriendRequest>>;

    async fn create_friendship(&self, user_a: &str, user_b: &str) -> Result<Friendship>;

    /// every friendship record containing the user on either side
    async fn friendships_of(&self, user_id: &str) -> Result<Vec<Friendship>>;

    async fn delete_friendship(&self, id: &str) -> Result<()>;
}
