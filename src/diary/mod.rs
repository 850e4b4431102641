use std::cmp::Ordering;

use axum::{
    extract::FromRef,
    routing::{delete, get, post},
    Router,
};
use time::OffsetDateTime;

use crate::{
    scoped::{handlers, require_text, ResourceKind, ScopedGateway},
    state::AppState,
};

mod repo;
mod repo_types;

pub use repo_types::{DiaryEntry, DiaryFields};

pub struct DiaryKind;

impl ResourceKind for DiaryKind {
    const LABEL: &'static str = "Diary";
    const NOUN: &'static str = "diary";
    const PLURAL: &'static str = "diary";

    type Fields = DiaryFields;
    type Record = DiaryEntry;

    fn validate(fields: &DiaryFields) -> Result<(), String> {
        require_text(&fields.title, "Title")?;
        require_text(&fields.content, "Content")
    }

    fn record_id(record: &DiaryEntry) -> i64 {
        record.id
    }

    fn record_owner(record: &DiaryEntry) -> i64 {
        record.user_id
    }

    fn materialize(
        id: i64,
        owner_id: i64,
        fields: DiaryFields,
        created_at: OffsetDateTime,
    ) -> DiaryEntry {
        DiaryEntry {
            id,
            user_id: owner_id,
            title: fields.title,
            content: fields.content,
            created_at,
        }
    }

    // Newest first.
    fn listing_order(a: &DiaryEntry, b: &DiaryEntry) -> Ordering {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    }
}

impl FromRef<AppState> for ScopedGateway<DiaryKind> {
    fn from_ref(state: &AppState) -> Self {
        ScopedGateway::new(state.diary.clone(), state.config.query_timeout)
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/diary/add", post(handlers::create::<DiaryKind>))
        .route("/diary/all", get(handlers::list_all::<DiaryKind>))
        .route("/diary/:id", delete(handlers::delete_by_id::<DiaryKind>))
}
