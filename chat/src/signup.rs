use std::sync::Arc;

use tracing::{debug, error, info};

use abi::errors::Error;
use abi::model::{Account, AccountProfile, User};
use abi::utils::{gen_id, now_millis};
use db::DbRepo;
use oss::Oss;

use crate::identity::{hash_password, verify_password};

/// identity providers commonly refuse anything shorter
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
pub struct AvatarUpload {
    pub filename: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub avatar: Option<AvatarUpload>,
}

impl SignupForm {
    fn validate(&self) -> Result<(), Error> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(Error::bad_request("invalid email"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::bad_request(format!(
                "password should be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

/// account creation, avatar upload, profile update, profile document.
/// the steps are independent calls, a failure stops the flow
/// but never undoes the steps already taken. a failed avatar upload
/// is reported and the flow goes on without a photo
#[derive(Debug, Clone)]
pub struct SignupFlow {
    db: DbRepo,
    oss: Arc<dyn Oss>,
}

impl SignupFlow {
    pub fn new(db: DbRepo, oss: Arc<dyn Oss>) -> Self {
        Self { db, oss }
    }

    pub async fn signup(&self, form: SignupForm) -> Result<User, Error> {
        form.validate()?;
        let email = form.email.trim().to_string();
        let name = form.name.trim().to_string();
        debug!("signup: {}", email);

        let account = self
            .db
            .account
            .create_account(Account {
                id: gen_id(),
                email,
                password: hash_password(&form.password)?,
                display_name: String::new(),
                photo_url: String::new(),
                create_time: now_millis(),
            })
            .await
            .inspect_err(|e| error!("create account failed: {}", e))?;

        let photo_url = match form.avatar {
            Some(avatar) => {
                let key = oss::avatar_key(&account.id, &avatar.filename);
                match self.oss.upload_avatar(&key, avatar.content).await {
                    Ok(()) => self.oss.avatar_url(&key),
                    Err(e) => {
                        // the user still gets a profile, just without a photo
                        error!("avatar upload failed for {}: {}", account.id, e);
                        String::new()
                    }
                }
            }
            None => String::new(),
        };

        let account = self
            .db
            .account
            .update_profile(
                &account.id,
                AccountProfile {
                    display_name: name,
                    photo_url,
                },
            )
            .await
            .inspect_err(|e| error!("update account profile failed: {}", e))?;

        let user = self
            .db
            .user
            .create_user(User::from(&account))
            .await
            .inspect_err(|e| error!("write profile document failed: {}", e))?;
        info!("user {} signed up", user.id);
        Ok(user)
    }

    /// the profile of the account, when the credentials match
    pub async fn login(&self, email: &str, password: &str) -> Result<User, Error> {
        if email.is_empty() || password.is_empty() {
            return Err(Error::bad_request("parameter is none"));
        }
        let account = self
            .db
            .account
            .get_account_by_email(email.trim())
            .await?
            .ok_or_else(Error::account_or_pwd)?;
        if !verify_password(password, &account.password)? {
            return Err(Error::account_or_pwd());
        }
        // an account whose signup stopped early has no profile document yet
        let user = self
            .db
            .user
            .get_user_by_id(&account.id)
            .await?
            .unwrap_or_else(|| User::from(&account));
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abi::errors::ErrorKind;
    use async_trait::async_trait;
    use bytes::Bytes;
    use oss::MemoryOss;

    fn flow() -> (SignupFlow, DbRepo, Arc<MemoryOss>) {
        let db = DbRepo::memory();
        let oss = Arc::new(MemoryOss::new("/file/avatar"));
        (SignupFlow::new(db.clone(), oss.clone()), db, oss)
    }

    fn form(email: &str) -> SignupForm {
        SignupForm {
            name: " ann ".to_string(),
            email: email.to_string(),
            password: "secret-pwd".to_string(),
            avatar: None,
        }
    }

    #[tokio::test]
    async fn signup_without_avatar_should_work() {
        let (flow, db, _) = flow();
        let user = flow.signup(form("a@x.io")).await.unwrap();
        assert_eq!(user.name, "ann");
        assert_eq!(user.email, "a@x.io");
        assert!(user.avatar.is_empty());
        assert_eq!(db.user.get_user_by_id(&user.id).await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn signup_with_avatar_should_store_public_url() {
        let (flow, _, oss) = flow();
        let mut form = form("a@x.io");
        form.avatar = Some(AvatarUpload {
            filename: "me.png".to_string(),
            content: vec![7, 7, 7],
        });
        let user = flow.signup(form).await.unwrap();
        assert!(user.avatar.starts_with("/file/avatar/avatars/"));
        let key = user.avatar.trim_start_matches("/file/avatar/");
        assert_eq!(
            oss.download_avatar(key).await.unwrap(),
            Bytes::from_static(&[7, 7, 7])
        );
    }

    #[tokio::test]
    async fn invalid_form_should_be_rejected() {
        let (flow, _, _) = flow();
        let err = flow.signup(form("not-an-email")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        let mut short = form("a@x.io");
        short.password = "12345".to_string();
        let err = flow.signup(short).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    #[tokio::test]
    async fn duplicate_email_should_conflict() {
        let (flow, _, _) = flow();
        flow.signup(form("a@x.io")).await.unwrap();
        let err = flow.signup(form("a@x.io")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[derive(Debug)]
    struct BrokenOss;

    #[async_trait]
    impl Oss for BrokenOss {
        async fn upload_avatar(&self, _key: &str, _content: Vec<u8>) -> Result<(), Error> {
            Err(Error::oss("bucket unreachable"))
        }
        async fn download_avatar(&self, _key: &str) -> Result<Bytes, Error> {
            Err(Error::not_found())
        }
        async fn delete_avatar(&self, _key: &str) -> Result<(), Error> {
            Ok(())
        }
        fn avatar_url(&self, key: &str) -> String {
            key.to_string()
        }
    }

    #[tokio::test]
    async fn avatar_failure_should_keep_profile_without_photo() {
        let db = DbRepo::memory();
        let flow = SignupFlow::new(db.clone(), Arc::new(BrokenOss));
        let mut form = form("a@x.io");
        form.avatar = Some(AvatarUpload {
            filename: "me.png".to_string(),
            content: vec![1],
        });
        let user = flow.signup(form).await.unwrap();
        assert_eq!(user.name, "ann");
        assert!(user.avatar.is_empty());

        let account = db
            .account
            .get_account_by_email("a@x.io")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.display_name, "ann");
        assert!(account.photo_url.is_empty());
        assert_eq!(db.user.list_users().await.unwrap(), vec![user.clone()]);
        assert_eq!(db.user.find_by_email("a@x.io").await.unwrap(), vec![user.clone()]);

        let login = flow.login("a@x.io", "secret-pwd").await.unwrap();
        assert_eq!(login, user);
    }

    #[tokio::test]
    async fn login_should_check_password() {
        let (flow, _, _) = flow();
        let user = flow.signup(form("a@x.io")).await.unwrap();
        assert_eq!(flow.login("a@x.io", "secret-pwd").await.unwrap(), user);
        let err = flow.login("a@x.io", "wrong-pwd").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AccountOrPassword);
        let err = flow.login("b@x.io", "secret-pwd").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AccountOrPassword);
    }
}
