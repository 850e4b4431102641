use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

use crate::scoped::iso_date;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Reminder {
    pub id: i64,
    pub user_id: i64,
    pub text: String,
    #[serde(with = "iso_date")]
    pub reminder_date: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct ReminderFields {
    pub text: String,
    #[serde(with = "iso_date")]
    pub reminder_date: Date,
}
