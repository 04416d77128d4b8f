use async_trait::async_trait;
use dashmap::DashMap;

use abi::errors::{Error, Result};
use abi::model::{FriendRequest, FriendRequestCreate, FriendRequestStatus, Friendship};
use abi::utils::{gen_id, now_millis};

use crate::friend::FriendRepo;

#[derive(Debug, Default)]
pub struct MemoryFriend {
    requests: DashMap<String, FriendRequest>,
    friendships: DashMap<String, Friendship>,
}

impl MemoryFriend {
    pub fn new() -> Self {
        Self::default()
    }

    fn requests_where<F>(&self, pred: F) -> Vec<FriendRequest>
    where
        F: Fn(&FriendRequest) -> bool,
    {
        let mut list: Vec<FriendRequest> = self
            .requests
            .iter()
            .filter(|r| pred(r.value()))
            .map(|r| r.value().clone())
            .collect();
        list.sort_by(|a, b| {
            a.create_time
                .cmp(&b.create_time)
                .then_with(|| a.id.cmp(&b.id))
        });
        list
    }
}

#[async_trait]
impl FriendRepo for MemoryFriend {
    async fn create_request(&self, req: FriendRequestCreate) -> Result<FriendRequest> {
        let now = now_millis();
        let request = FriendRequest {
            id: gen_id(),
            sender_id: req.sender_id,
            recipient_id: req.recipient_id,
            status: FriendRequestStatus::Pending,
            create_time: now,
            update_time: now,
        };
        self.requests.insert(request.id.clone(), request.clone());
        Ok(request)
    }

    async fn get_request(&self, id: &str) -> Result<Option<FriendRequest>> {
        Ok(self.requests.get(id).map(|r| r.value().clone()))
    }

    async fn update_request_status(
        &self,
        id: &str,
        status: FriendRequestStatus,
    ) -> Result<FriendRequest> {
        let mut request = self
            .requests
            .get_mut(id)
            .ok_or_else(|| Error::not_found_with_details(format!("friend request {id}")))?;
        request.status = status;
        request.update_time = now_millis();
        Ok(request.value().clone())
    }

    async fn incoming_requests(&self, user_id: &str) -> Result<Vec<FriendRequest>> {
        Ok(self.requests_where(|r| {
            r.recipient_id == user_id && r.status == FriendRequestStatus::Pending
        }))
    }

    async fn outgoing_requests(&self, user_id: &str) -> Result<Vec<FriendRequest>> {
        Ok(self.requests_where(|r| r.sender_id == user_id))
    }

    async fn create_friendship(&self, user_a: &str, user_b: &str) -> Result<Friendship> {
        let fs = Friendship {
            id: gen_id(),
            user_a: user_a.to_string(),
            user_b: user_b.to_string(),
            create_time: now_millis(),
        };
        self.friendships.insert(fs.id.clone(), fs.clone());
        Ok(fs)
    }

    async fn friendships_of(&self, user_id: &str) -> Result<Vec<Friendship>> {
        let mut list: Vec<Friendship> = self
            .friendships
            .iter()
            .filter(|f| f.contains(user_id))
            .map(|f| f.value().clone())
            .collect();
        list.sort_by(|a, b| {
            a.create_time
                .cmp(&b.create_time)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(list)
    }

    async fn delete_friendship(&self, id: &str) -> Result<()> {
        self.friendships
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::not_found_with_details(format!("friendship {id}")))
    }
}
