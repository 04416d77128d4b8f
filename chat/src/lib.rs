//! the flows a client walks through: landing, signup and login,
//! the directory with its friend graph, and conversations

use std::sync::Arc;

use tracing::info;

use abi::config::Config;
use abi::errors::Error;
use cache::{Cache, MemoryCache};
use db::DbRepo;
use oss::{MemoryOss, Oss};

mod conversation;
mod directory;
mod feed;
mod gate;
mod identity;
mod signup;

pub use conversation::{Conversation, ConversationEvent, ConversationStream};
pub use directory::Directory;
pub use feed::MessageFeed;
pub use gate::{Landing, SessionGate};
pub use signup::{AvatarUpload, SignupFlow, SignupForm, MIN_PASSWORD_LEN};

#[derive(Debug, Clone)]
pub struct ChatService {
    pub gate: SessionGate,
    pub signup: SignupFlow,
    pub directory: Directory,
    pub conversation: Conversation,
    pub oss: Arc<dyn Oss>,
}

impl ChatService {
    pub async fn new(config: &Config) -> Result<Self, Error> {
        let db = DbRepo::new(config).await?;
        let cache = cache::cache(config)?;
        let oss = oss::oss(config).await?;
        let feed = MessageFeed::new(config.feed.capacity);
        info!("chat service ready, feed capacity {}", config.feed.capacity);
        Ok(Self::with_parts(db, cache, oss, feed))
    }

    /// everything in process memory
    pub fn memory() -> Self {
        Self::with_parts(
            DbRepo::memory(),
            Arc::new(MemoryCache::new()),
            Arc::new(MemoryOss::new(oss::LOCAL_AVATAR_BASE)),
            MessageFeed::default(),
        )
    }

    pub fn with_parts(
        db: DbRepo,
        cache: Arc<dyn Cache>,
        oss: Arc<dyn Oss>,
        feed: MessageFeed,
    ) -> Self {
        Self {
            gate: SessionGate::new(cache),
            signup: SignupFlow::new(db.clone(), oss.clone()),
            directory: Directory::new(db.clone(), oss.clone()),
            conversation: Conversation::new(db, feed),
            oss,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abi::model::Session;
    use futures::StreamExt;

    async fn join(chat: &ChatService, name: &str) -> Session {
        let user = chat
            .signup
            .signup(SignupForm {
                name: name.to_string(),
                email: format!("{name}@x.io"),
                password: "secret-pwd".to_string(),
                avatar: None,
            })
            .await
            .unwrap();
        chat.gate.enter(&user.id).await.unwrap();
        Session::new(user.id, "token")
    }

    #[tokio::test]
    async fn friends_can_talk() {
        let chat = ChatService::memory();
        let a = join(&chat, "a").await;
        let b = join(&chat, "b").await;
        let c = join(&chat, "c").await;
        assert_eq!(
            chat.gate.resolve(Some(&a.user_id)).await.unwrap(),
            Landing::Directory
        );

        let req = chat.directory.send_request(&a, &b.user_id).await.unwrap();
        let (_, fs) = chat.directory.accept(&b, &req.id).await.unwrap();
        assert!(fs.is_pair(&a.user_id, &b.user_id));
        let friends = chat.directory.friends(&a).await.unwrap();
        assert_eq!(friends.len(), 1);
        assert_eq!(friends[0].id, b.user_id);

        let mut b_view = chat.conversation.subscribe(&b, &a.user_id);
        assert_eq!(
            b_view.next().await.unwrap().unwrap(),
            ConversationEvent::Snapshot(vec![])
        );

        let sent = chat
            .conversation
            .send(&a, &b.user_id, "hi")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            b_view.next().await.unwrap().unwrap(),
            ConversationEvent::Appended(sent.clone())
        );

        assert_eq!(
            chat.conversation.history(&a, &b.user_id).await.unwrap(),
            vec![sent]
        );
        assert!(chat
            .conversation
            .history(&a, &c.user_id)
            .await
            .unwrap()
            .is_empty());
    }
}
