use std::future::Future;
use std::thread;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::runtime::Runtime;

use abi::config::{Config, PostgresConfig};

const FIXTURE: &str = "../abi/fixtures/chat.yml";

/// a database of its own for one test, on the server named by the fixture
/// config. created and migrated on `new`, dropped with the value
pub struct ScratchDb {
    pg: PostgresConfig,
}

impl ScratchDb {
    pub fn new() -> Self {
        let config = Config::load(FIXTURE).unwrap();
        let server = config.db.postgres.expect("fixture has a postgres section");
        let pg = scratch_config(&server, &uuid::Uuid::new_v4().simple().to_string());

        let (server_url, url, name) = (pg.server_url(), pg.url(), pg.database.clone());
        on_own_runtime(async move {
            let admin = PgPool::connect(&server_url).await.unwrap();
            sqlx::query(&format!(r#"CREATE DATABASE "{name}""#))
                .execute(&admin)
                .await
                .unwrap();
            let pool = PgPool::connect(&url).await.unwrap();
            sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        });
        Self { pg }
    }

    pub async fn pool(&self) -> PgPool {
        PgPoolOptions::new()
            .max_connections(self.pg.max_connections)
            .connect(&self.pg.url())
            .await
            .unwrap()
    }
}

impl Drop for ScratchDb {
    fn drop(&mut self) {
        let server_url = self.pg.server_url();
        let name = self.pg.database.clone();
        on_own_runtime(async move {
            let admin = PgPool::connect(&server_url).await.unwrap();
            sqlx::query(
                "SELECT pg_terminate_backend(pid) FROM pg_stat_activity \
                 WHERE datname = $1 AND pid <> pg_backend_pid()",
            )
            .bind(&name)
            .execute(&admin)
            .await
            .unwrap();
            sqlx::query(&format!(r#"DROP DATABASE IF EXISTS "{name}""#))
                .execute(&admin)
                .await
                .unwrap();
        });
    }
}

/// same server and credentials, a database named after the suffix
fn scratch_config(server: &PostgresConfig, suffix: &str) -> PostgresConfig {
    PostgresConfig {
        database: format!("{}_test_{}", server.database, suffix),
        max_connections: server.max_connections.min(2),
        ..server.clone()
    }
}

// tokio tests already run inside a runtime, which cannot block on another future
fn on_own_runtime<F>(fut: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    thread::spawn(move || Runtime::new().unwrap().block_on(fut))
        .join()
        .unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scratch_config_should_only_rename_database() {
        let config = Config::load(FIXTURE).unwrap();
        let server = config.db.postgres.unwrap();
        let pg = scratch_config(&server, "abc");
        assert_eq!(pg.database, "chitchat_test_abc");
        assert_eq!(pg.server_url(), server.server_url());
        assert_eq!(pg.url(), format!("{}/chitchat_test_abc", server.server_url()));
        assert!(pg.max_connections <= 2);
    }
}
