//! Persistence for refresh tokens. One row per user.

use crate::models::refresh_token::RefreshToken;
use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Error)]
pub enum RefreshTokenError {
    #[error("invalid refresh token: {0}")]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

#[derive(Clone)]
pub struct RefreshTokenRepository {
    db: Arc<SqlitePool>,
}

impl RefreshTokenRepository {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    /// Store `token` for its user, replacing any token the user already has.
    pub async fn save(&self, token: &RefreshToken) -> Result<RefreshToken, RefreshTokenError> {
        token.validate()?;
        let saved = sqlx::query_as::<_, RefreshToken>(
            r#"
            INSERT INTO refresh_tokens (refresh_token, expiration_time, user_id)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                refresh_token = excluded.refresh_token,
                expiration_time = excluded.expiration_time
            RETURNING token_id, refresh_token, expiration_time, user_id
            "#,
        )
        .bind(&token.refresh_token)
        .bind(token.expiration_time)
        .bind(token.user_id)
        .fetch_one(&*self.db)
        .await?;
        Ok(saved)
    }

    pub async fn find_by_token(&self, value: &str) -> Result<Option<RefreshToken>, RefreshTokenError> {
        let token = sqlx::query_as::<_, RefreshToken>(
            "SELECT token_id, refresh_token, expiration_time, user_id
             FROM refresh_tokens WHERE refresh_token = ?",
        )
        .bind(value)
        .fetch_optional(&*self.db)
        .await?;
        Ok(token)
    }

    pub async fn delete_by_user(&self, user_id: i64) -> Result<bool, RefreshTokenError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
            .bind(user_id)
            .execute(&*self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
