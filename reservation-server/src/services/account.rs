//! Account service
//!
//! Registration, login, password changes and the bootstrap admin.

use std::sync::Arc;

use shared::models::{
    AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, Role, User, UserProfile,
};
use sqlx::SqlitePool;

use super::{cascade, require};
use crate::auth::JwtService;
use crate::auth::password::{hash_password, verify_password};
use crate::db::repository::{RepoError, user};
use crate::security_log;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_USERNAME_LEN, validate_email, validate_password, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Clone, Debug)]
pub struct AccountService {
    pool: SqlitePool,
    jwt_service: Arc<JwtService>,
}

impl AccountService {
    pub fn new(pool: SqlitePool, jwt_service: Arc<JwtService>) -> Self {
        Self { pool, jwt_service }
    }

    /// Create a regular user and sign them in
    pub async fn register(&self, req: RegisterRequest) -> AppResult<AuthResponse> {
        let created = self.create_user(&req, Role::User).await?;
        security_log!("INFO", "user_registered", user_id = created.id, username = created.username.clone());
        self.issue(created)
    }

    /// Verify credentials
    ///
    /// Unknown user and wrong password produce the same error.
    pub async fn login(&self, req: LoginRequest) -> AppResult<AuthResponse> {
        let found = user::find_by_username(&self.pool, &req.username).await?;

        let found = match found {
            Some(u) if verify_password(&req.password, &u.password_hash) => u,
            _ => {
                security_log!("WARN", "login_failed", username = req.username.clone());
                return Err(AppError::invalid_credentials());
            }
        };

        security_log!("INFO", "login_success", user_id = found.id, username = found.username.clone());
        self.issue(found)
    }

    pub async fn find_user_id(&self, username: &str) -> AppResult<i64> {
        user::find_by_username(&self.pool, username)
            .await?
            .map(|u| u.id)
            .ok_or_else(|| {
                AppError::new(ErrorCode::UserNotFound).with_detail("username", username.to_string())
            })
    }

    pub async fn profile(&self, user_id: i64) -> AppResult<UserProfile> {
        let found = require(
            user::find_by_id(&self.pool, user_id).await?,
            ErrorCode::UserNotFound,
            user_id,
        )?;
        Ok(found.into())
    }

    pub async fn change_password(&self, req: ChangePasswordRequest) -> AppResult<()> {
        if req.new_password != req.confirm_password {
            return Err(AppError::new(ErrorCode::PasswordMismatch));
        }
        validate_password(&req.new_password)?;

        let found = require(
            user::find_by_id(&self.pool, req.user_id).await?,
            ErrorCode::UserNotFound,
            req.user_id,
        )?;
        if !verify_password(&req.old_password, &found.password_hash) {
            security_log!("WARN", "password_change_rejected", user_id = found.id);
            return Err(AppError::invalid_credentials());
        }

        let hash = hash_password(&req.new_password)?;
        user::update_password(&self.pool, found.id, &hash).await?;
        security_log!("INFO", "password_changed", user_id = found.id);
        Ok(())
    }

    /// Delete the account and everything that references it
    pub async fn delete_user(&self, user_id: i64) -> AppResult<()> {
        cascade::delete_user(&self.pool, user_id).await?;
        security_log!("INFO", "user_deleted", user_id = user_id);
        Ok(())
    }

    /// Create the configured admin account on first start
    ///
    /// Returns `true` when an account was created.
    pub async fn bootstrap_admin(&self, username: &str, password: &str) -> AppResult<bool> {
        if user::find_by_username(&self.pool, username).await?.is_some() {
            tracing::debug!(username, "Admin account already present");
            return Ok(false);
        }

        let req = RegisterRequest {
            username: username.to_string(),
            email: format!("{}@localhost.local", username.trim().to_lowercase()),
            first_name: "Admin".to_string(),
            last_name: "Account".to_string(),
            password: password.to_string(),
        };
        let created = self.create_user(&req, Role::Admin).await?;
        tracing::info!(user_id = created.id, username = %created.username, "Bootstrap admin account created");
        Ok(true)
    }

    async fn create_user(&self, req: &RegisterRequest, role: Role) -> AppResult<User> {
        validate_required_text(&req.username, "username", MAX_USERNAME_LEN)?;
        validate_email(&req.email)?;
        validate_required_text(&req.first_name, "firstName", MAX_NAME_LEN)?;
        validate_required_text(&req.last_name, "lastName", MAX_NAME_LEN)?;
        validate_password(&req.password)?;

        let hash = hash_password(&req.password)?;
        user::create(&self.pool, req, &hash, role, shared::util::now_millis())
            .await
            .map_err(|e| match e {
                RepoError::Duplicate(_) => AppError::new(ErrorCode::UsernameExists)
                    .with_detail("username", req.username.trim().to_string()),
                other => other.into(),
            })
    }

    fn issue(&self, account: User) -> AppResult<AuthResponse> {
        let token = self
            .jwt_service
            .generate_token(account.id, &account.username, account.role)
            .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;
        Ok(AuthResponse {
            token,
            user: account.into(),
        })
    }
}
