use std::sync::Arc;

use crate::{
    auth::repo::{PgUserStore, UserStore},
    config::AppConfig,
    diary::DiaryKind,
    events::EventKind,
    reminders::ReminderKind,
    scoped::{PgScopedStore, ScopedStore},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub diary: Arc<dyn ScopedStore<DiaryKind>>,
    pub events: Arc<dyn ScopedStore<EventKind>>,
    pub reminders: Arc<dyn ScopedStore<ReminderKind>>,
}

impl AppState {
    /// Reads configuration, connects to Postgres and applies migrations.
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = crate::db::connect(&config).await?;

        sqlx::migrate!("./migrations").run(&db).await?;
        tracing::info!("migrations applied");

        let scoped = PgScopedStore::new(db.clone());
        Ok(Self {
            config,
            users: Arc::new(PgUserStore::new(db)),
            diary: Arc::new(scoped.clone()),
            events: Arc::new(scoped.clone()),
            reminders: Arc::new(scoped),
        })
    }
}

#[cfg(test)]
impl AppState {
    /// State backed by in-memory stores and a fixed test secret.
    pub fn fake() -> Self {
        use std::time::Duration;

        use crate::{
            config::{JwtConfig, DEFAULT_TTL_MINUTES},
            memory::{MemoryScopedStore, MemoryUserStore},
        };

        let config = Arc::new(AppConfig {
            database_url: "memory://".into(),
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: DEFAULT_TTL_MINUTES,
            },
            db_max_connections: 1,
            query_timeout: Duration::from_secs(5),
        });

        Self {
            config,
            users: Arc::new(MemoryUserStore::default()),
            diary: Arc::new(MemoryScopedStore::<DiaryKind>::default()),
            events: Arc::new(MemoryScopedStore::<EventKind>::default()),
            reminders: Arc::new(MemoryScopedStore::<ReminderKind>::default()),
        }
    }
}
