//! In-process storage backends with the same contract as the Postgres ones.
//! Compiled for tests only, behind `AppState::fake()`.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::{
    auth::{
        repo::UserStore,
        repo_types::{NewUser, User},
    },
    db::{StoreError, StoreResult},
    scoped::{ResourceKind, ScopedStore},
};

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.lock().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: NewUser) -> StoreResult<User> {
        // Check and push under one lock, like a UNIQUE index would.
        let mut users = self.users.lock().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation);
        }
        let row = User {
            id: users.len() as i64 + 1,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
        };
        users.push(row.clone());
        Ok(row)
    }
}

pub struct MemoryScopedStore<K: ResourceKind> {
    rows: Mutex<Vec<K::Record>>,
    next_id: AtomicI64,
}

impl<K: ResourceKind> Default for MemoryScopedStore<K> {
    fn default() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl<K: ResourceKind> ScopedStore<K> for MemoryScopedStore<K> {
    async fn insert(&self, owner_id: i64, fields: K::Fields) -> StoreResult<i64> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let record = K::materialize(id, owner_id, fields, OffsetDateTime::now_utc());
        self.rows.lock().await.push(record);
        Ok(id)
    }

    async fn list_by_owner(&self, owner_id: i64) -> StoreResult<Vec<K::Record>> {
        let rows = self.rows.lock().await;
        let mut owned: Vec<K::Record> = rows
            .iter()
            .filter(|r| K::record_owner(r) == owner_id)
            .cloned()
            .collect();
        owned.sort_by(K::listing_order);
        Ok(owned)
    }

    async fn delete_owned(&self, owner_id: i64, id: i64) -> StoreResult<u64> {
        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|r| !(K::record_id(r) == id && K::record_owner(r) == owner_id));
        Ok((before - rows.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminders::{ReminderFields, ReminderKind};
    use time::macros::date;

    #[tokio::test]
    async fn user_insert_enforces_unique_email() {
        let store = MemoryUserStore::default();
        let new = || NewUser {
            name: "Ann".into(),
            email: "ann@x.com".into(),
            password_hash: "h".into(),
        };
        let first = store.insert(new()).await.unwrap();
        assert_eq!(first.id, 1);
        assert!(matches!(
            store.insert(new()).await,
            Err(StoreError::UniqueViolation)
        ));
        assert_eq!(store.find_by_email("ann@x.com").await.unwrap().unwrap().id, 1);
    }

    #[tokio::test]
    async fn scoped_delete_requires_matching_owner() {
        let store = MemoryScopedStore::<ReminderKind>::default();
        let id = store
            .insert(
                7,
                ReminderFields {
                    text: "vaccination".into(),
                    reminder_date: date!(2024 - 06 - 01),
                },
            )
            .await
            .unwrap();
        assert_eq!(store.delete_owned(8, id).await.unwrap(), 0);
        assert_eq!(store.delete_owned(7, id).await.unwrap(), 1);
        assert!(store.list_by_owner(7).await.unwrap().is_empty());
    }
}
