//! Authentication, session and account service

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::RngCore;
use sha2::{Digest, Sha256};
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{LoginRequest, RegisterRequest, Role, SessionUser, User},
    repository::Repository,
    services::redis::SessionStore,
};

const SESSION_TOKEN_BYTES: usize = 32;

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
    sessions: Arc<dyn SessionStore>,
}

/// Redis key for a session token; only the token's digest is stored
pub fn session_key(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!("session:{}", hex::encode(digest))
}

pub fn generate_session_token() -> String {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

impl AuthService {
    pub fn new(
        repository: Repository,
        config: AuthConfig,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            repository,
            config,
            sessions,
        }
    }

    /// Create an account and open a session for it
    pub async fn register(&self, request: RegisterRequest) -> AppResult<(String, User)> {
        request.validate()?;

        let email = request.email.trim().to_lowercase();
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::missing("name"));
        }

        let password_hash = self.hash_password(&request.password)?;
        let user = self.repository.users.create(&email, name, &password_hash).await?;

        tracing::info!(user_id = user.userid, role = %user.role, "Account registered");

        let token = self.start_session(&user).await?;
        Ok((token, user))
    }

    /// Check credentials and open a session
    pub async fn login(&self, request: LoginRequest) -> AppResult<(String, User)> {
        request.validate()?;

        let user = self
            .repository
            .users
            .get_by_email(request.email.trim())
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !self.verify_password(&user, &request.password)? {
            tracing::warn!(user_id = user.userid, "Failed login attempt");
            return Err(AppError::Authentication("Invalid email or password".to_string()));
        }

        let token = self.start_session(&user).await?;
        Ok((token, user))
    }

    pub async fn logout(&self, token: &str) -> AppResult<()> {
        self.sessions.delete_session(&session_key(token)).await
    }

    /// Look up the user behind a session token
    pub async fn resolve_session(&self, token: &str) -> AppResult<SessionUser> {
        let payload = self
            .sessions
            .get_session(&session_key(token))
            .await?
            .ok_or_else(|| AppError::Authentication("Session expired or invalid".to_string()))?;

        serde_json::from_str(&payload)
            .map_err(|e| AppError::Internal(format!("Corrupt session payload: {}", e)))
    }

    /// Open a session for `user` and return its token
    pub async fn start_session(&self, user: &User) -> AppResult<String> {
        let token = generate_session_token();
        let payload = serde_json::to_string(&SessionUser::from(user))
            .map_err(|e| AppError::Internal(format!("Failed to serialize session: {}", e)))?;

        self.sessions
            .store_session(
                &session_key(&token),
                user.userid,
                &payload,
                self.config.session_ttl_hours * 3600,
            )
            .await?;

        Ok(token)
    }

    pub async fn get_user(&self, userid: i32) -> AppResult<User> {
        self.repository.users.get_by_id(userid).await
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    /// Change a user's role and end their open sessions, so the new role applies at next login
    pub async fn update_role(
        &self,
        actor: &SessionUser,
        userid: i32,
        role: Role,
    ) -> AppResult<User> {
        if actor.user_id == userid && role != Role::Admin {
            return Err(AppError::BadRequest(
                "Administrators cannot demote themselves".to_string(),
            ));
        }

        let user = self.repository.users.update_role(userid, role).await?;
        self.sessions.delete_user_sessions(userid).await?;
        tracing::info!(user_id = userid, role = %role, by = actor.user_id, "Role updated");
        Ok(user)
    }

    /// Verify user password
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
