use async_trait::async_trait;

use super::{
    repo_types::{DiaryEntry, DiaryFields},
    DiaryKind,
};
use crate::{
    db::StoreResult,
    scoped::{PgScopedStore, ScopedStore},
};

#[async_trait]
impl ScopedStore<DiaryKind> for PgScopedStore {
    async fn insert(&self, owner_id: i64, fields: DiaryFields) -> StoreResult<i64> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO diary (user_id, title, content)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(owner_id)
        .bind(&fields.title)
        .bind(&fields.content)
        .fetch_one(&self.db)
        .await?;
        Ok(id)
    }

    async fn list_by_owner(&self, owner_id: i64) -> StoreResult<Vec<DiaryEntry>> {
        let rows = sqlx::query_as::<_, DiaryEntry>(
            r#"
            SELECT id, user_id, title, content, created_at
            FROM diary
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn delete_owned(&self, owner_id: i64, id: i64) -> StoreResult<u64> {
        let res = sqlx::query(
            r#"
            DELETE FROM diary
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected())
    }
}
