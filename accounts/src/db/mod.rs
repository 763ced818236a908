use crate::config::Config;
use crate::models::user::{NewUser, User, UserPatch};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub mod memory;
pub mod surreal;

pub use memory::MemoryStore;
pub use surreal::SurrealStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("username already exists")]
    DuplicateKey,

    #[error("store error: {0}")]
    Backend(String),
}

impl From<surrealdb::Error> for StoreError {
    fn from(e: surrealdb::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// Persistence for user documents.
///
/// `create` must enforce username uniqueness itself. Handlers may look the
/// username up first, but only `DuplicateKey` from `create` is authoritative.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    /// Applies only the fields set in `patch`. Unknown ids are a no-op.
    async fn update_by_id(&self, id: &str, patch: UserPatch) -> Result<(), StoreError>;

    /// Users whose first or last name contains `pattern`, ignoring case.
    /// An empty pattern matches everyone.
    async fn search_by_name(&self, pattern: &str) -> Result<Vec<User>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

pub type DB = Arc<dyn IdentityStore>;

/// Opens the store named by `DATABASE_URL`.
///
/// `memory://` keeps everything in process. Anything else goes to SurrealDB.
pub async fn connect(config: &Config) -> Result<DB> {
    if config.database_url.starts_with("memory://") {
        tracing::warn!("Using in-memory identity store; data is lost on restart");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = SurrealStore::connect(config).await?;
    Ok(Arc::new(store))
}
