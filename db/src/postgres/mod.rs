mod friend;
mod message;
#[cfg(test)]
mod tester;
mod user;

pub use friend::*;
pub use message::*;
pub use user::*;

#[cfg(test)]
mod tests {
    use abi::model::{
        Account, AccountProfile, FriendRequestCreate, FriendRequestStatus, Message, User,
    };

    use super::tester::ScratchDb;
    use super::*;
    use crate::friend::FriendRepo;
    use crate::message::MsgStoreRepo;
    use crate::user::{AccountRepo, UserRepo};

    #[tokio::test]
    #[ignore = "needs a running postgres"]
    async fn account_and_profile_should_work() {
        let scratch = ScratchDb::new();
        let pool = scratch.pool().await;
        let accounts = PostgresAccount::new(pool.clone());
        let users = PostgresUser::new(pool);

        let account = Account {
            id: "u1".to_string(),
            email: "a@x.io".to_string(),
            password: "hash".to_string(),
            ..Default::default()
        };
        accounts.create_account(account.clone()).await.unwrap();
        assert!(accounts.create_account(account).await.is_err());
        let updated = accounts
            .update_profile(
                "u1",
                AccountProfile {
                    display_name: "ann".to_string(),
                    photo_url: String::new(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.display_name, "ann");

        users
            .create_user(User {
                id: "u1".to_string(),
                name: "ann".to_string(),
                email: "a@x.io".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(users.find_by_email("a@x.io").await.unwrap().len(), 1);
        assert!(users.find_by_name("bob").await.unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore = "needs a running postgres"]
    async fn friend_graph_should_work() {
        let scratch = ScratchDb::new();
        let repo = PostgresFriend::new(scratch.pool().await);
        let req = repo
            .create_request(FriendRequestCreate {
                sender_id: "a".to_string(),
                recipient_id: "b".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(req.status, FriendRequestStatus::Pending);
        assert_eq!(repo.incoming_requests("b").await.unwrap().len(), 1);

        let req = repo
            .update_request_status(&req.id, FriendRequestStatus::Accepted)
            .await
            .unwrap();
        assert_eq!(req.status, FriendRequestStatus::Accepted);
        assert!(repo.incoming_requests("b").await.unwrap().is_empty());

        let fs = repo.create_friendship("a", "b").await.unwrap();
        assert_eq!(repo.friendships_of("b").await.unwrap(), vec![fs.clone()]);
        repo.delete_friendship(&fs.id).await.unwrap();
        assert!(repo.friendships_of("a").await.unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore = "needs a running postgres"]
    async fn messages_should_be_ordered() {
        let scratch = ScratchDb::new();
        let repo = PostgresMessage::new(scratch.pool().await);
        for (id, from, to, time) in [("2", "b", "a", 20), ("1", "a", "b", 10), ("3", "a", "c", 5)] {
            repo.save_message(Message {
                id: id.to_string(),
                sender_id: from.to_string(),
                recipient_id: to.to_string(),
                content: "hi".to_string(),
                send_time: time,
            })
            .await
            .unwrap();
        }
        let ids: Vec<String> = repo
            .get_messages("a", "b")
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
    }
}
