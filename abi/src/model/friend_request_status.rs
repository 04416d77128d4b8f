use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::errors::Error;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, sqlx::Type)]
#[sqlx(type_name = "friend_request_status")]
pub enum FriendRequestStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
}

/// the answer the recipient gives to a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Accept,
    Decline,
}

impl FriendRequestStatus {
    /// pending is the only state that can be answered;
    /// accepted and declined are terminal
    pub fn respond(self, reply: Reply) -> Result<Self, Error> {
        match (self, reply) {
            (FriendRequestStatus::Pending, Reply::Accept) => Ok(FriendRequestStatus::Accepted),
            (FriendRequestStatus::Pending, Reply::Decline) => Ok(FriendRequestStatus::Declined),
            (status, _) => Err(Error::bad_request(format!(
                "friend request is already {}",
                status
            ))),
        }
    }
}

impl Display for FriendRequestStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FriendRequestStatus::Pending => f.write_str("Pending"),
            FriendRequestStatus::Accepted => f.write_str("Accepted"),
            FriendRequestStatus::Declined => f.write_str("Declined"),
        }
    }
}
