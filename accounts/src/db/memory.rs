use super::{IdentityStore, StoreError};
use crate::models::user::{NewUser, User, UserPatch};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-process store keyed by id.
///
/// The uniqueness check and the insert happen under one write lock, so two
/// concurrent signups for the same username can't both succeed.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    pub async fn get(&self, id: &str) -> Option<User> {
        self.users.read().await.get(id).cloned()
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return Err(StoreError::DuplicateKey);
        }

        let created = User {
            id: Uuid::new_v4().to_string(),
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            password_hash: user.password_hash,
        };
        users.insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn update_by_id(&self, id: &str, patch: UserPatch) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(id) else {
            return Ok(());
        };

        if let Some(first_name) = patch.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            user.last_name = last_name;
        }
        if let Some(password_hash) = patch.password_hash {
            user.password_hash = password_hash;
        }
        Ok(())
    }

    async fn search_by_name(&self, pattern: &str) -> Result<Vec<User>, StoreError> {
        let needle = pattern.to_lowercase();
        let users = self.users.read().await;
        Ok(users
            .values()
            .filter(|u| {
                u.first_name.to_lowercase().contains(&needle)
                    || u.last_name.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_user(username: &str, first: &str, last: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn create_rejects_duplicate_username() {
        let store = MemoryStore::new();
        assert!(store.is_empty().await);
        store.create(new_user("a@b.co", "A", "B")).await.unwrap();

        let err = store.create(new_user("a@b.co", "C", "D")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn concurrent_creates_yield_a_single_record() {
        let store = Arc::new(MemoryStore::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.create(new_user("race@example.com", "R", "C")).await
            }));
        }

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn update_leaves_absent_fields_alone() {
        let store = MemoryStore::new();
        let user = store.create(new_user("a@b.co", "A", "B")).await.unwrap();

        let patch = UserPatch {
            first_name: Some("X".to_string()),
            ..Default::default()
        };
        store.update_by_id(&user.id, patch).await.unwrap();

        let updated = store.get(&user.id).await.unwrap();
        assert_eq!(updated.first_name, "X");
        assert_eq!(updated.last_name, "B");
        assert_eq!(updated.password_hash, "hash");
        assert_eq!(updated.username, "a@b.co");
    }

    #[tokio::test]
    async fn search_matches_either_name_ignoring_case() {
        let store = MemoryStore::new();
        store.create(new_user("anna@x.io", "Anna", "Lee")).await.unwrap();
        store.create(new_user("sue@x.io", "Sue", "Susan")).await.unwrap();
        store.create(new_user("bob@x.io", "Bob", "Kim")).await.unwrap();

        let mut names: Vec<String> = store
            .search_by_name("an")
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        names.sort();
        assert_eq!(names, vec!["anna@x.io", "sue@x.io"]);

        assert_eq!(store.search_by_name("").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn search_treats_regex_metacharacters_literally() {
        let store = MemoryStore::new();
        store.create(new_user("a@b.co", "Anna", "Lee")).await.unwrap();

        assert!(store.search_by_name(".*").await.unwrap().is_empty());
    }
}
