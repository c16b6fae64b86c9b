//! SurrealDB connection management.

use surrealdb::{Connection, Surreal};
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::repository::SurrealIdentityRepository;

/// Configuration for connecting to SurrealDB.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// WebSocket URL (e.g., `127.0.0.1:8000`).
    pub url: String,
    /// SurrealDB namespace.
    pub namespace: String,
    /// SurrealDB database name.
    pub database: String,
    /// Root username for authentication.
    pub username: String,
    /// Root password for authentication.
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "groupgate".into(),
            database: "directory".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

/// Handle on the SurrealDB database holding the identity directory.
///
/// Works over any engine: [`DbManager::connect`] opens a WebSocket
/// client, [`DbManager::new`] wraps an existing handle such as an
/// embedded one.
#[derive(Clone)]
pub struct DbManager<C: Connection> {
    db: Surreal<C>,
}

impl DbManager<Client> {
    /// Connect, authenticate as root and select the configured
    /// namespace and database.
    pub async fn connect(config: &DbConfig) -> Result<Self, surrealdb::Error> {
        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "Connecting to identity directory"
        );

        let db = Surreal::new::<Ws>(&config.url).await?;

        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        info!("Connected to identity directory");

        Ok(Self::new(db))
    }
}

impl<C: Connection> DbManager<C> {
    /// Wraps a handle that already has its namespace and database
    /// selected.
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    pub fn client(&self) -> &Surreal<C> {
        &self.db
    }

    /// Identity lookups over this connection.
    pub fn identities(&self) -> SurrealIdentityRepository<C> {
        SurrealIdentityRepository::new(self.db.clone())
    }
}
