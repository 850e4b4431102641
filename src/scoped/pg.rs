use sqlx::PgPool;

/// PostgreSQL backend for every resource kind.
///
/// The per-kind `ScopedStore` impls live next to their kind (`diary::repo`,
/// `events::repo`, `reminders::repo`).
#[derive(Clone)]
pub struct PgScopedStore {
    pub(crate) db: PgPool,
}

impl PgScopedStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}
