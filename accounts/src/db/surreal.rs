use super::{IdentityStore, StoreError};
use crate::config::Config;
use crate::models::user::{NewUser, User, UserPatch};
use anyhow::Result;
use async_trait::async_trait;
use surrealdb::Surreal;
use surrealdb::engine::any::{self, Any};
use uuid::Uuid;

// Every read projects the record key out as a plain string id.
const USER_FIELDS: &str = "meta::id(id) AS id, username, firstName, lastName, password_hash";

/// Identity store backed by a SurrealDB `user` table.
#[derive(Clone)]
pub struct SurrealStore {
    db: Surreal<Any>,
}

impl SurrealStore {
    pub async fn connect(config: &Config) -> Result<Self> {
        // 1. Connect
        let db = any::connect(config.database_url.as_str()).await?;

        // 2. Authenticate, if credentials were given
        if let (Some(user), Some(pass)) = (&config.surreal_user, &config.surreal_pass) {
            db.signin(surrealdb::opt::auth::Root {
                username: user,
                password: pass,
            })
            .await?;
        }

        // 3. Select namespace and database
        db.use_ns(config.surreal_ns.as_str())
            .use_db(config.surreal_db.as_str())
            .await?;

        // 4. Usernames are unique at the storage level. Signup relies on the
        // index violation, not on its own lookup, to detect duplicates.
        db.query("DEFINE INDEX IF NOT EXISTS user_username ON TABLE user COLUMNS username UNIQUE;")
            .await?
            .check()?;

        Ok(Self { db })
    }
}

fn is_unique_violation(e: &surrealdb::Error) -> bool {
    let msg = e.to_string();
    msg.contains("user_username") && msg.contains("already contains")
}

#[async_trait]
impl IdentityStore for SurrealStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let mut res = self
            .db
            .query(format!("SELECT {USER_FIELDS} FROM user WHERE username = $username LIMIT 1"))
            .bind(("username", username.to_string()))
            .await?;
        let users: Vec<User> = res.take(0)?;
        Ok(users.into_iter().next())
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let id = Uuid::new_v4().to_string();
        let created = User {
            id: id.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            password_hash: user.password_hash.clone(),
        };

        let res = self
            .db
            .query("CREATE type::thing('user', $id) CONTENT $content RETURN NONE")
            .bind(("id", id))
            .bind(("content", user))
            .await?;

        match res.check() {
            Ok(_) => Ok(created),
            Err(e) if is_unique_violation(&e) => Err(StoreError::DuplicateKey),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_by_id(&self, id: &str, patch: UserPatch) -> Result<(), StoreError> {
        if patch.is_empty() {
            return Ok(());
        }

        // UPDATE on a missing record id matches nothing, so unknown ids are a no-op.
        self.db
            .query("UPDATE type::thing('user', $id) MERGE $patch RETURN NONE")
            .bind(("id", id.to_string()))
            .bind(("patch", patch))
            .await?
            .check()?;
        Ok(())
    }

    async fn search_by_name(&self, pattern: &str) -> Result<Vec<User>, StoreError> {
        // The pattern is a bound value compared with CONTAINS, never a regex.
        let mut res = self
            .db
            .query(format!(
                "SELECT {USER_FIELDS} FROM user \
                 WHERE string::lowercase(firstName) CONTAINS $pattern \
                 OR string::lowercase(lastName) CONTAINS $pattern"
            ))
            .bind(("pattern", pattern.to_lowercase()))
            .await?;
        let users: Vec<User> = res.take(0)?;
        Ok(users)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.health().await?;
        Ok(())
    }
}
