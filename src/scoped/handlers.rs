use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;

use super::{ResourceKind, ScopedGateway};
use crate::{
    auth::AuthUser,
    error::AppResult,
    http::{ApiJson, ApiPath, CreatedResponse, MessageResponse},
    state::AppState,
};

#[instrument(skip_all, fields(kind = K::NOUN))]
pub async fn create<K>(
    State(gateway): State<ScopedGateway<K>>,
    AuthUser(identity): AuthUser,
    ApiJson(fields): ApiJson<K::Fields>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)>
where
    K: ResourceKind,
    ScopedGateway<K>: FromRef<AppState>,
{
    let id = gateway.create(&identity, fields).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: format!("{} added successfully", K::LABEL),
            id,
        }),
    ))
}

#[instrument(skip_all, fields(kind = K::NOUN))]
pub async fn list_all<K>(
    State(gateway): State<ScopedGateway<K>>,
    AuthUser(identity): AuthUser,
) -> AppResult<Json<Vec<K::Record>>>
where
    K: ResourceKind,
    ScopedGateway<K>: FromRef<AppState>,
{
    Ok(Json(gateway.list_all(&identity).await?))
}

#[instrument(skip_all, fields(kind = K::NOUN))]
pub async fn delete_by_id<K>(
    State(gateway): State<ScopedGateway<K>>,
    AuthUser(identity): AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<MessageResponse>>
where
    K: ResourceKind,
    ScopedGateway<K>: FromRef<AppState>,
{
    gateway.delete_by_id(&identity, id).await?;
    Ok(Json(MessageResponse::new(format!(
        "{} deleted successfully",
        K::LABEL
    ))))
}
