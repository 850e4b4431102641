use std::cmp::Ordering;

use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use time::OffsetDateTime;

use crate::{
    scoped::{handlers, require_text, ResourceKind, ScopedGateway},
    state::AppState,
};

mod repo;
mod repo_types;

pub use repo_types::{Event, EventFields};

pub struct EventKind;

impl ResourceKind for EventKind {
    const LABEL: &'static str = "Event";
    const NOUN: &'static str = "event";
    const PLURAL: &'static str = "events";

    type Fields = EventFields;
    type Record = Event;

    fn validate(fields: &EventFields) -> Result<(), String> {
        require_text(&fields.title, "Title")
    }

    fn record_id(record: &Event) -> i64 {
        record.id
    }

    fn record_owner(record: &Event) -> i64 {
        record.user_id
    }

    fn materialize(
        id: i64,
        owner_id: i64,
        fields: EventFields,
        created_at: OffsetDateTime,
    ) -> Event {
        Event {
            id,
            user_id: owner_id,
            title: fields.title,
            event_date: fields.event_date,
            created_at,
        }
    }

    fn listing_order(a: &Event, b: &Event) -> Ordering {
        a.event_date
            .cmp(&b.event_date)
            .then_with(|| a.id.cmp(&b.id))
    }
}

impl FromRef<AppState> for ScopedGateway<EventKind> {
    fn from_ref(state: &AppState) -> Self {
        ScopedGateway::new(state.events.clone(), state.config.query_timeout)
    }
}

/// Create and list only; the gateway's delete is not routed for events.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events/add", post(handlers::create::<EventKind>))
        .route("/events/all", get(handlers::list_all::<EventKind>))
}
