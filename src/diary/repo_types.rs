use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Diary row in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DiaryEntry {
    pub id: i64,
    pub user_id: i64, // owner
    pub title: String,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Request body for `POST /diary/add`.
#[derive(Debug, Deserialize)]
pub struct DiaryFields {
    pub title: String,
    pub content: String,
}
