use std::{sync::Arc, time::Duration};

use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::{
    auth::{
        password::{hash_password_blocking, verify_password_blocking},
        repo::UserStore,
        repo_types::{NewUser, User},
    },
    db::{bounded, StoreError},
    error::{AppError, AppResult},
    state::AppState,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Owns user identities: creates them with a hashed password and checks
/// login attempts against the stored hash.
#[derive(Clone)]
pub struct CredentialStore {
    users: Arc<dyn UserStore>,
    timeout: Duration,
}

impl FromRef<AppState> for CredentialStore {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.users.clone(), state.config.query_timeout)
    }
}

impl CredentialStore {
    pub fn new(users: Arc<dyn UserStore>, timeout: Duration) -> Self {
        Self { users, timeout }
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> AppResult<()> {
        let name = name.trim();
        let email = normalize_email(email);

        if name.is_empty() {
            return Err(AppError::Validation("Name is required".into()));
        }
        if !is_valid_email(&email) {
            warn!(%email, "invalid email");
            return Err(AppError::Validation("Invalid email".into()));
        }
        if password.is_empty() {
            return Err(AppError::Validation("Password is required".into()));
        }

        // Cheap early exit; the unique constraint below is what actually
        // holds under concurrent registrations.
        let existing = bounded(self.timeout, self.users.find_by_email(&email))
            .await
            .map_err(|e| AppError::persistence("Database error", e))?;
        if existing.is_some() {
            warn!(%email, "email already registered");
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = hash_password_blocking(password.to_owned()).await?;

        let new_user = NewUser {
            name: name.to_owned(),
            email: email.clone(),
            password_hash,
        };
        match bounded(self.timeout, self.users.insert(new_user)).await {
            Ok(user) => {
                info!(user_id = user.id, email = %user.email, "user registered");
                Ok(())
            }
            Err(StoreError::UniqueViolation) => {
                warn!(%email, "email registered concurrently");
                Err(AppError::DuplicateEmail)
            }
            Err(e) => Err(AppError::persistence("Error registering user", e)),
        }
    }

    pub async fn verify(&self, email: &str, password: &str) -> AppResult<User> {
        let email = normalize_email(email);

        let user = bounded(self.timeout, self.users.find_by_email(&email))
            .await
            .map_err(|e| AppError::persistence("Database error", e))?
            .ok_or_else(|| {
                warn!(%email, "login unknown email");
                AppError::UserNotFound
            })?;

        let ok = verify_password_blocking(password.to_owned(), user.password_hash.clone()).await?;
        if !ok {
            warn!(user_id = user.id, "login invalid password");
            return Err(AppError::BadCredentials);
        }

        info!(user_id = user.id, "user logged in");
        Ok(user)
    }
}
