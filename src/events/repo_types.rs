use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

use crate::scoped::iso_date;

/// Event row in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    #[serde(with = "iso_date")]
    pub event_date: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Request body for `POST /events/add`.
#[derive(Debug, Deserialize)]
pub struct EventFields {
    pub title: String,
    #[serde(with = "iso_date")]
    pub event_date: Date,
}
