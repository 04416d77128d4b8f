use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use abi::errors::Error;
use abi::model::{
    FriendRequest, FriendRequestCreate, Friendship, Reply, Session, User, UserUpdate,
};
use db::DbRepo;
use oss::Oss;

/// user directory and the friend graph, as seen by the active user
#[derive(Debug, Clone)]
pub struct Directory {
    db: DbRepo,
    oss: Arc<dyn Oss>,
}

impl Directory {
    pub fn new(db: DbRepo, oss: Arc<dyn Oss>) -> Self {
        Self { db, oss }
    }

    /// every profile except the active user's
    pub async fn list_users(&self, session: &Session) -> Result<Vec<User>, Error> {
        let users = self.db.user.list_users().await?;
        Ok(without(users, &session.user_id))
    }

    pub async fn get_user(&self, id: &str) -> Result<User, Error> {
        self.db
            .user
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found_with_details(format!("user {id}")))
    }

    /// exact email match; the exact name match is only tried when
    /// nobody has that email. the active user is dropped from either result
    pub async fn search(&self, session: &Session, keyword: &str) -> Result<Vec<User>, Error> {
        let keyword = keyword.trim();
        if keyword.is_empty() || keyword.chars().count() > 64 {
            return Err(Error::bad_request("keyword is empty or too long"));
        }
        let by_email = self.db.user.find_by_email(keyword).await?;
        if !by_email.is_empty() {
            return Ok(without(by_email, &session.user_id));
        }
        debug!("no email match for {}, trying name", keyword);
        let by_name = self.db.user.find_by_name(keyword).await?;
        Ok(without(by_name, &session.user_id))
    }

    /// a replaced avatar that lives in our blob store is deleted afterwards
    pub async fn update_profile(
        &self,
        session: &Session,
        name: Option<String>,
        avatar: Option<String>,
    ) -> Result<User, Error> {
        if name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(Error::bad_request("name is empty"));
        }
        let old = self.get_user(&session.user_id).await?;
        let user = self
            .db
            .user
            .update_user(UserUpdate {
                id: session.user_id.clone(),
                name: name.map(|n| n.trim().to_string()),
                avatar,
            })
            .await?;

        if user.avatar != old.avatar {
            if let Some(key) = self.oss.avatar_key_of(&old.avatar) {
                if let Err(e) = self.oss.delete_avatar(&key).await {
                    warn!("stale avatar {} of {} not deleted: {}", key, user.id, e);
                }
            }
        }
        Ok(user)
    }

    /// writes a pending request; duplicates and self requests are stored as sent
    pub async fn send_request(
        &self,
        session: &Session,
        recipient_id: &str,
    ) -> Result<FriendRequest, Error> {
        if recipient_id.is_empty() {
            return Err(Error::bad_request("recipient is empty"));
        }
        let req = self
            .db
            .friend
            .create_request(FriendRequestCreate {
                sender_id: session.user_id.clone(),
                recipient_id: recipient_id.to_string(),
            })
            .await?;
        info!("{} sent friend request {} to {}", req.sender_id, req.id, req.recipient_id);
        Ok(req)
    }

    /// flips the request to accepted and inserts the friendship, two separate writes
    pub async fn accept(
        &self,
        session: &Session,
        request_id: &str,
    ) -> Result<(FriendRequest, Friendship), Error> {
        let req = self.respond(session, request_id, Reply::Accept).await?;
        let fs = self
            .db
            .friend
            .create_friendship(&req.sender_id, &req.recipient_id)
            .await?;
        info!("friendship {} created for request {}", fs.id, req.id);
        Ok((req, fs))
    }

    pub async fn decline(&self, session: &Session, request_id: &str) -> Result<FriendRequest, Error> {
        self.respond(session, request_id, Reply::Decline).await
    }

    async fn respond(
        &self,
        session: &Session,
        request_id: &str,
        reply: Reply,
    ) -> Result<FriendRequest, Error> {
        let req = self
            .db
            .friend
            .get_request(request_id)
            .await?
            .ok_or_else(|| Error::not_found_with_details(format!("friend request {request_id}")))?;
        if req.recipient_id != session.user_id {
            return Err(Error::unauthorized_with_details(
                "only the recipient can answer a friend request",
            ));
        }
        let status = req.status.respond(reply)?;
        self.db
            .friend
            .update_request_status(&req.id, status)
            .await
    }

    /// finds the record holding both users among the active user's
    /// friendships and deletes that one only
    pub async fn unfriend(&self, session: &Session, friend_id: &str) -> Result<Friendship, Error> {
        let friendships = self.db.friend.friendships_of(&session.user_id).await?;
        let fs = friendships
            .into_iter()
            .find(|fs| fs.is_pair(&session.user_id, friend_id))
            .ok_or_else(|| Error::not_found_with_details(format!("friendship with {friend_id}")))?;
        self.db.friend.delete_friendship(&fs.id).await?;
        info!("{} unfriended {}", session.user_id, friend_id);
        Ok(fs)
    }

    /// profiles of everyone the active user is friends with
    pub async fn friends(&self, session: &Session) -> Result<Vec<User>, Error> {
        let friendships = self.db.friend.friendships_of(&session.user_id).await?;
        let mut seen = HashSet::new();
        let mut friends = Vec::with_capacity(friendships.len());
        for fs in &friendships {
            let Some(friend_id) = fs.other(&session.user_id) else {
                continue;
            };
            if !seen.insert(friend_id.to_string()) {
                continue;
            }
            if let Some(user) = self.db.user.get_user_by_id(friend_id).await? {
                friends.push(user);
            }
        }
        Ok(friends)
    }

    pub async fn incoming_requests(&self, session: &Session) -> Result<Vec<FriendRequest>, Error> {
        self.db.friend.incoming_requests(&session.user_id).await
    }

    pub async fn outgoing_requests(&self, session: &Session) -> Result<Vec<FriendRequest>, Error> {
        self.db.friend.outgoing_requests(&session.user_id).await
    }
}

fn without(users: Vec<User>, user_id: &str) -> Vec<User> {
    users.into_iter().filter(|u| u.id != user_id).collect()
}
