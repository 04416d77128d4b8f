mod friend;
mod memory;
mod message;
mod postgres;
mod user;

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing::info;

use abi::config::{Config, DbDriver};
use abi::errors::{Error, ErrorKind};

pub use crate::friend::FriendRepo;
pub use crate::memory::{MemoryAccount, MemoryFriend, MemoryMessage, MemoryUser};
pub use crate::message::MsgStoreRepo;
pub use crate::postgres::{PostgresAccount, PostgresFriend, PostgresMessage, PostgresUser};
pub use crate::user::{AccountRepo, UserRepo};

/// every store the flows talk to, behind trait objects
#[derive(Debug, Clone)]
pub struct DbRepo {
    pub account: Arc<dyn AccountRepo>,
    pub user: Arc<dyn UserRepo>,
    pub friend: Arc<dyn FriendRepo>,
    pub msg: Arc<dyn MsgStoreRepo>,
}

impl DbRepo {
    pub async fn new(config: &Config) -> Result<Self, Error> {
        match config.db.driver {
            DbDriver::Memory => {
                info!("using in-memory document store");
                Ok(Self::memory())
            }
            DbDriver::Postgres => {
                let pg = config.db.postgres.as_ref().ok_or_else(|| {
                    Error::with_details(ErrorKind::ConfigParseError, "db.postgres is missing")
                })?;
                let pool = PgPoolOptions::new()
                    .max_connections(pg.max_connections)
                    .connect(&pg.url())
                    .await?;
                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .map_err(Error::internal)?;
                info!("connected to postgres {}:{}/{}", pg.host, pg.port, pg.database);
                Ok(Self {
                    account: Arc::new(PostgresAccount::new(pool.clone())),
                    user: Arc::new(PostgresUser::new(pool.clone())),
                    friend: Arc::new(PostgresFriend::new(pool.clone())),
                    msg: Arc::new(PostgresMessage::new(pool)),
                })
            }
        }
    }

    pub fn memory() -> Self {
        Self {
            account: Arc::new(MemoryAccount::new()),
            user: Arc::new(MemoryUser::new()),
            friend: Arc::new(MemoryFriend::new()),
            msg: Arc::new(MemoryMessage::new()),
        }
    }
}
