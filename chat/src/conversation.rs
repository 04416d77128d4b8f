use std::collections::HashSet;
use std::pin::Pin;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, error, warn};

use abi::errors::Error;
use abi::model::{conversation_filter, is_blank, Message, Session};
use abi::utils::{gen_id, now_millis};
use db::{DbRepo, MsgStoreRepo};

use crate::feed::MessageFeed;

/// what a conversation view receives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ConversationEvent {
    /// the whole conversation so far
    Snapshot(Vec<Message>),
    /// one message newer than the last snapshot
    Appended(Message),
}

pub type ConversationStream =
    Pin<Box<dyn Stream<Item = Result<ConversationEvent, Error>> + Send>>;

#[derive(Debug, Clone)]
pub struct Conversation {
    db: DbRepo,
    feed: MessageFeed,
}

impl Conversation {
    pub fn new(db: DbRepo, feed: MessageFeed) -> Self {
        Self { db, feed }
    }

    /// stores and publishes a message to `friend_id`.
    /// blank text is dropped and `None` returned
    pub async fn send(
        &self,
        session: &Session,
        friend_id: &str,
        text: &str,
    ) -> Result<Option<Message>, Error> {
        if is_blank(text) {
            debug!("blank message from {} dropped", session.user_id);
            return Ok(None);
        }
        if friend_id.is_empty() {
            return Err(Error::bad_request("recipient is empty"));
        }
        let msg = self
            .db
            .msg
            .save_message(Message {
                id: gen_id(),
                sender_id: session.user_id.clone(),
                recipient_id: friend_id.to_string(),
                content: text.to_string(),
                send_time: now_millis(),
            })
            .await
            .inspect_err(|e| error!("save message failed: {}", e))?;
        self.feed.publish(msg.clone());
        Ok(Some(msg))
    }

    pub async fn history(&self, session: &Session, friend_id: &str) -> Result<Vec<Message>, Error> {
        load_history(self.db.msg.as_ref(), &session.user_id, friend_id).await
    }

    /// nothing is read or subscribed until the stream is first polled;
    /// dropping the stream unsubscribes
    pub fn subscribe(&self, session: &Session, friend_id: &str) -> ConversationStream {
        let cursor = Cursor {
            store: self.db.msg.clone(),
            feed: self.feed.clone(),
            user_id: session.user_id.clone(),
            friend_id: friend_id.to_string(),
            live: None,
            seen: HashSet::new(),
            done: false,
        };
        futures::stream::unfold(cursor, |mut cursor| async move {
            let event = cursor.next_event().await?;
            Some((event, cursor))
        })
        .boxed()
    }
}

async fn load_history(
    store: &dyn MsgStoreRepo,
    user_id: &str,
    friend_id: &str,
) -> Result<Vec<Message>, Error> {
    let messages = store.get_messages(user_id, friend_id).await?;
    Ok(conversation_filter(messages, user_id, friend_id))
}

struct Cursor {
    store: Arc<dyn MsgStoreRepo>,
    feed: MessageFeed,
    user_id: String,
    friend_id: String,
    live: Option<BroadcastStream<Message>>,
    // ids already delivered since the last snapshot
    seen: HashSet<String>,
    done: bool,
}

impl Cursor {
    async fn next_event(&mut self) -> Option<Result<ConversationEvent, Error>> {
        if self.done {
            return None;
        }
        if self.live.is_none() {
            return Some(self.snapshot().await);
        }
        loop {
            match self.live.as_mut()?.next().await? {
                Ok(msg) => {
                    if !msg.is_between(&self.user_id, &self.friend_id)
                        || !self.seen.insert(msg.id.clone())
                    {
                        continue;
                    }
                    return Some(Ok(ConversationEvent::Appended(msg)));
                }
                Err(BroadcastStreamRecvError::Lagged(n)) => {
                    warn!(
                        "conversation {}/{} lagged by {} messages, resyncing",
                        self.user_id, self.friend_id, n
                    );
                    return Some(self.snapshot().await);
                }
            }
        }
    }

    async fn snapshot(&mut self) -> Result<ConversationEvent, Error> {
        // subscribe first, anything stored meanwhile shows up in both and is skipped once
        self.live = Some(self.feed.subscribe());
        match load_history(self.store.as_ref(), &self.user_id, &self.friend_id).await {
            Ok(messages) => {
                self.seen = messages.iter().map(|m| m.id.clone()).collect();
                Ok(ConversationEvent::Snapshot(messages))
            }
            Err(e) => {
                self.done = true;
                self.live = None;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn conversation(capacity: usize) -> Conversation {
        Conversation::new(DbRepo::memory(), MessageFeed::new(capacity))
    }

    fn ids(messages: &[Message]) -> Vec<&str> {
        messages.iter().map(|m| m.content.as_str()).collect()
    }

    async fn nothing_pending(stream: &mut ConversationStream) -> bool {
        tokio::time::timeout(Duration::from_millis(50), stream.next())
            .await
            .is_err()
    }

    #[tokio::test]
    async fn blank_send_should_be_noop() {
        let conv = conversation(8);
        let a = Session::new("a", "t");
        assert_eq!(conv.send(&a, "b", "").await.unwrap(), None);
        assert_eq!(conv.send(&a, "b", " \n\t ").await.unwrap(), None);
        assert!(conv.history(&a, "b").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn history_should_hold_exactly_the_pair() {
        let conv = conversation(8);
        let a = Session::new("a", "t");
        let b = Session::new("b", "t");
        let c = Session::new("c", "t");
        conv.send(&a, "b", "1").await.unwrap();
        conv.send(&b, "a", "2").await.unwrap();
        conv.send(&a, "a", "self").await.unwrap();
        conv.send(&c, "a", "3").await.unwrap();
        conv.send(&b, "b", "self").await.unwrap();

        assert_eq!(ids(&conv.history(&a, "b").await.unwrap()), vec!["1", "2"]);
        assert_eq!(ids(&conv.history(&b, "a").await.unwrap()), vec!["1", "2"]);
        assert_eq!(ids(&conv.history(&a, "c").await.unwrap()), vec!["3"]);
    }

    #[tokio::test]
    async fn sent_message_should_carry_server_fields() {
        let conv = conversation(8);
        let a = Session::new("a", "t");
        let msg = conv.send(&a, "b", " hi ").await.unwrap().unwrap();
        assert!(!msg.id.is_empty());
        assert!(msg.send_time > 0);
        assert_eq!(msg.sender_id, "a");
        assert_eq!(msg.recipient_id, "b");
        assert_eq!(msg.content, " hi ");
    }

    #[tokio::test]
    async fn stream_should_start_with_snapshot_then_append() {
        let conv = conversation(8);
        let a = Session::new("a", "t");
        let b = Session::new("b", "t");
        conv.send(&a, "b", "before").await.unwrap();

        let mut stream = conv.subscribe(&b, "a");
        let Some(Ok(ConversationEvent::Snapshot(snapshot))) = stream.next().await else {
            panic!("expected a snapshot first");
        };
        assert_eq!(ids(&snapshot), vec!["before"]);

        conv.send(&a, "c", "elsewhere").await.unwrap();
        conv.send(&b, "a", "after").await.unwrap();
        let Some(Ok(ConversationEvent::Appended(msg))) = stream.next().await else {
            panic!("expected an appended message");
        };
        assert_eq!(msg.content, "after");
        assert!(nothing_pending(&mut stream).await);
    }

    #[tokio::test]
    async fn stream_should_be_lazy_and_dropped_on_unsubscribe() {
        let conv = conversation(8);
        let a = Session::new("a", "t");

        let mut stream = conv.subscribe(&a, "b");
        assert_eq!(conv.feed.receiver_count(), 0);
        stream.next().await.unwrap().unwrap();
        assert_eq!(conv.feed.receiver_count(), 1);

        drop(stream);
        assert_eq!(conv.feed.receiver_count(), 0);
    }

    #[tokio::test]
    async fn restarted_stream_should_snapshot_again() {
        let conv = conversation(8);
        let a = Session::new("a", "t");
        let mut first = conv.subscribe(&a, "b");
        first.next().await.unwrap().unwrap();
        conv.send(&a, "b", "one").await.unwrap();
        drop(first);

        let mut second = conv.subscribe(&a, "b");
        assert_eq!(
            second.next().await.unwrap().unwrap(),
            ConversationEvent::Snapshot(conv.history(&a, "b").await.unwrap())
        );
    }

    #[tokio::test]
    async fn lagged_stream_should_resync() {
        let conv = conversation(2);
        let a = Session::new("a", "t");
        let mut stream = conv.subscribe(&a, "b");
        assert_eq!(
            stream.next().await.unwrap().unwrap(),
            ConversationEvent::Snapshot(vec![])
        );

        for text in ["1", "2", "3"] {
            conv.send(&a, "b", text).await.unwrap();
        }
        let Some(Ok(ConversationEvent::Snapshot(snapshot))) = stream.next().await else {
            panic!("expected a resync snapshot");
        };
        assert_eq!(ids(&snapshot), vec!["1", "2", "3"]);
        assert!(nothing_pending(&mut stream).await);
    }
}
