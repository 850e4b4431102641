//! Per-user resource access.
//!
//! Every resource kind (diary entries, events, reminders) goes through the
//! same [`ScopedGateway`], which stamps inserts with the caller's user id and
//! filters every read and delete by it. Backends only ever receive the owner
//! id from the gateway, never from the request.

use std::{cmp::Ordering, marker::PhantomData, sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::{
    auth::Identity,
    db::{bounded, StoreResult},
    error::{AppError, AppResult},
};

pub mod handlers;
mod pg;

pub use pg::PgScopedStore;

/// Describes one kind of owned resource.
pub trait ResourceKind: Send + Sync + Sized + 'static {
    /// Capitalised name used in client messages, e.g. `Diary`.
    const LABEL: &'static str;
    /// Singular noun for error messages, e.g. `event`.
    const NOUN: &'static str;
    /// Collection noun for error messages, e.g. `events`.
    const PLURAL: &'static str;

    /// Caller-supplied fields of a new row.
    type Fields: DeserializeOwned + Send + Sync + 'static;
    /// A stored row as returned to its owner.
    type Record: Serialize + Clone + Send + Sync + 'static;

    fn validate(fields: &Self::Fields) -> Result<(), String>;

    fn record_id(record: &Self::Record) -> i64;
    fn record_owner(record: &Self::Record) -> i64;

    /// Builds the row a backend without server-side defaults would store.
    fn materialize(
        id: i64,
        owner_id: i64,
        fields: Self::Fields,
        created_at: OffsetDateTime,
    ) -> Self::Record;

    /// Listing order, matching the backend's `ORDER BY`.
    fn listing_order(a: &Self::Record, b: &Self::Record) -> Ordering;
}

/// Storage for one resource kind. Every method takes the owner explicitly
/// and must conjoin it into the query.
#[async_trait]
pub trait ScopedStore<K: ResourceKind>: Send + Sync {
    /// Inserts a row owned by `owner_id`, returning its id.
    async fn insert(&self, owner_id: i64, fields: K::Fields) -> StoreResult<i64>;

    async fn list_by_owner(&self, owner_id: i64) -> StoreResult<Vec<K::Record>>;

    /// Deletes `id` only if owned by `owner_id`, in one statement. Returns
    /// the number of rows removed.
    async fn delete_owned(&self, owner_id: i64, id: i64) -> StoreResult<u64>;
}

pub struct ScopedGateway<K: ResourceKind> {
    store: Arc<dyn ScopedStore<K>>,
    timeout: Duration,
    _kind: PhantomData<K>,
}

impl<K: ResourceKind> Clone for ScopedGateway<K> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            timeout: self.timeout,
            _kind: PhantomData,
        }
    }
}

impl<K: ResourceKind> ScopedGateway<K> {
    pub fn new(store: Arc<dyn ScopedStore<K>>, timeout: Duration) -> Self {
        Self {
            store,
            timeout,
            _kind: PhantomData,
        }
    }

    pub async fn create(&self, identity: &Identity, fields: K::Fields) -> AppResult<i64> {
        K::validate(&fields).map_err(AppError::Validation)?;

        let id = bounded(self.timeout, self.store.insert(identity.user_id, fields))
            .await
            .map_err(|e| AppError::persistence(format!("Error adding {}", K::NOUN), e))?;

        info!(kind = K::NOUN, id, user_id = identity.user_id, "resource created");
        Ok(id)
    }

    pub async fn list_all(&self, identity: &Identity) -> AppResult<Vec<K::Record>> {
        bounded(self.timeout, self.store.list_by_owner(identity.user_id))
            .await
            .map_err(|e| AppError::persistence(format!("Error fetching {}", K::PLURAL), e))
    }

    pub async fn delete_by_id(&self, identity: &Identity, id: i64) -> AppResult<()> {
        let affected = bounded(self.timeout, self.store.delete_owned(identity.user_id, id))
            .await
            .map_err(|e| AppError::persistence(format!("Error deleting {}", K::NOUN), e))?;

        if affected == 0 {
            warn!(kind = K::NOUN, id, user_id = identity.user_id, "delete matched nothing");
            return Err(AppError::NotFoundOrUnauthorized(K::LABEL));
        }

        info!(kind = K::NOUN, id, user_id = identity.user_id, "resource deleted");
        Ok(())
    }
}

pub(crate) fn require_text(value: &str, field: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{field} is required"))
    } else {
        Ok(())
    }
}

/// Serde adapter for `YYYY-MM-DD` calendar dates.
pub mod iso_date {
    use serde::{de::Error as _, ser::Error as _, Deserialize, Deserializer, Serializer};
    use time::{format_description::FormatItem, macros::format_description, Date};

    const FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

    pub fn serialize<S: Serializer>(date: &Date, s: S) -> Result<S::Ok, S::Error> {
        let text = date.format(FORMAT).map_err(S::Error::custom)?;
        s.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Date, D::Error> {
        let text = String::deserialize(d)?;
        Date::parse(&text, FORMAT).map_err(D::Error::custom)
    }
}
