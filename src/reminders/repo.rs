use async_trait::async_trait;

use super::{
    repo_types::{Reminder, ReminderFields},
    ReminderKind,
};
use crate::{
    db::StoreResult,
    scoped::{PgScopedStore, ScopedStore},
};

#[async_trait]
impl ScopedStore<ReminderKind> for PgScopedStore {
    async fn insert(&self, owner_id: i64, fields: ReminderFields) -> StoreResult<i64> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO reminders (user_id, text, reminder_date)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(owner_id)
        .bind(&fields.text)
        .bind(fields.reminder_date)
        .fetch_one(&self.db)
        .await?;
        Ok(id)
    }

    async fn list_by_owner(&self, owner_id: i64) -> StoreResult<Vec<Reminder>> {
        let rows = sqlx::query_as::<_, Reminder>(
            r#"
            SELECT id, user_id, text, reminder_date, created_at
            FROM reminders
            WHERE user_id = $1
            ORDER BY reminder_date ASC, id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn delete_owned(&self, owner_id: i64, id: i64) -> StoreResult<u64> {
        let res = sqlx::query("DELETE FROM reminders WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected())
    }
}
