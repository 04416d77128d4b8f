use serde::{Deserialize, Serialize};

use crate::model::friend_request_status::FriendRequestStatus;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct FriendRequest {
    pub id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub status: FriendRequestStatus,
    pub create_time: i64,
    pub update_time: i64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FriendRequestCreate {
    pub sender_id: String,
    pub recipient_id: String,
}

/// symmetric relation, `user_a`/`user_b` carry no meaning of direction
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Friendship {
    pub id: String,
    pub user_a: String,
    pub user_b: String,
    pub create_time: i64,
}

impl Friendship {
    pub fn contains(&self, user_id: &str) -> bool {
        self.user_a == user_id || self.user_b == user_id
    }

    pub fn is_pair(&self, one: &str, other: &str) -> bool {
        (self.user_a == one && self.user_b == other) || (self.user_a == other && self.user_b == one)
    }

    /// the member of the pair that is not `user_id`
    pub fn other(&self, user_id: &str) -> Option<&str> {
        if self.user_a == user_id {
            Some(&self.user_b)
        } else if self.user_b == user_id {
            Some(&self.user_a)
        } else {
            None
        }
    }
}
