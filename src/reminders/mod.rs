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

pub use repo_types::{Reminder, ReminderFields};

pub struct ReminderKind;

impl ResourceKind for ReminderKind {
    const LABEL: &'static str = "Reminder";
    const NOUN: &'static str = "reminder";
    const PLURAL: &'static str = "reminders";

    type Fields = ReminderFields;
    type Record = Reminder;

    fn validate(fields: &ReminderFields) -> Result<(), String> {
        require_text(&fields.text, "Text")
    }

    fn record_id(record: &Reminder) -> i64 {
        record.id
    }

    fn record_owner(record: &Reminder) -> i64 {
        record.user_id
    }

    fn materialize(
        id: i64,
        owner_id: i64,
        fields: ReminderFields,
        created_at: OffsetDateTime,
    ) -> Reminder {
        Reminder {
            id,
            user_id: owner_id,
            text: fields.text,
            reminder_date: fields.reminder_date,
            created_at,
        }
    }

    fn listing_order(a: &Reminder, b: &Reminder) -> Ordering {
        a.reminder_date
            .cmp(&b.reminder_date)
            .then_with(|| a.id.cmp(&b.id))
    }
}

impl FromRef<AppState> for ScopedGateway<ReminderKind> {
    fn from_ref(state: &AppState) -> Self {
        ScopedGateway::new(state.reminders.clone(), state.config.query_timeout)
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reminders/add", post(handlers::create::<ReminderKind>))
        .route("/reminders/all", get(handlers::list_all::<ReminderKind>))
}
