//! Represents a refresh token owned by exactly one user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::movie::not_blank;

/// Upper bound on the stored token string, matching the column contract.
pub const MAX_REFRESH_TOKEN_LEN: u64 = 500;

/// A refresh token row in `refresh_tokens`.
///
/// Each user has at most one token; saving a new one for the same user
/// replaces the previous row.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, Validate)]
pub struct RefreshToken {
    /// Surrogate key. `None` until inserted.
    pub token_id: Option<i64>,

    #[validate(
        length(max = MAX_REFRESH_TOKEN_LEN, message = "refresh token is too long"),
        custom(function = "not_blank", message = "Please enter refresh token value!")
    )]
    pub refresh_token: String,

    pub expiration_time: DateTime<Utc>,

    /// Owning user (`users.user_id`).
    pub user_id: i64,
}

impl RefreshToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiration_time <= now
    }
}
