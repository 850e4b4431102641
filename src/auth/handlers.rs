use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, ProfileResponse, PublicUser, RegisterRequest},
        extractors::AuthUser,
        jwt::JwtKeys,
        services::CredentialStore,
    },
    error::AppResult,
    http::{ApiJson, MessageResponse},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile", get(profile))
}

#[instrument(skip_all)]
pub async fn register(
    State(creds): State<CredentialStore>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    creds
        .register(&payload.name, &payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let creds = CredentialStore::from_ref(&state);
    let user = creds.verify(&payload.email, &payload.password).await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.issue(user.id, &user.email)?;

    Ok(Json(LoginResponse {
        message: "Login successful",
        token,
        user: PublicUser {
            id: user.id,
            name: user.name,
            email: user.email,
        },
    }))
}

#[instrument(skip_all)]
pub async fn profile(AuthUser(identity): AuthUser) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        message: "You are authenticated",
        user: identity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::Identity;

    #[test]
    fn profile_response_serialization() {
        let response = ProfileResponse {
            message: "You are authenticated",
            user: Identity {
                user_id: 3,
                email: "test@example.com".to_string(),
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["user"]["id"], 3);
        assert_eq!(json["user"]["email"], "test@example.com");
    }

    #[test]
    fn login_response_never_carries_a_hash() {
        let response = LoginResponse {
            message: "Login successful",
            token: "t".into(),
            user: PublicUser {
                id: 1,
                name: "Ann".into(),
                email: "ann@x.com".into(),
            },
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("password"));
        assert!(json.contains("\"token\":\"t\""));
    }
}
