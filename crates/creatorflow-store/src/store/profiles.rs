//! Accounts, chat bindings, and the linking-token handshake.

use super::Store;
use creatorflow_core::CreatorFlowError;
use uuid::Uuid;

/// Linking tokens look like `CF-7A3F01`.
pub const TOKEN_PREFIX: &str = "CF-";

/// A CreatorFlow account as the bot sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub user_id: String,
    pub display_name: String,
    pub telegram_chat_id: Option<i64>,
}

/// Format check for linking tokens: the `CF-` prefix followed by at least
/// one character from `[A-Z0-9]`. Anything else is rejected without ever
/// reaching the database.
pub fn is_valid_token(token: &str) -> bool {
    match token.strip_prefix(TOKEN_PREFIX) {
        Some(rest) => {
            !rest.is_empty()
                && rest
                    .bytes()
                    .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        }
        None => false,
    }
}

impl Store {
    /// Create a profile and return its user id.
    pub async fn create_user(&self, display_name: &str) -> Result<String, CreatorFlowError> {
        let user_id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO profiles (user_id, display_name) VALUES (?, ?)")
            .bind(&user_id)
            .bind(display_name)
            .execute(&self.pool)
            .await
            .map_err(|e| CreatorFlowError::Store(format!("create user failed: {e}")))?;
        Ok(user_id)
    }

    /// Issue a fresh linking token for `user_id`, replacing any outstanding one.
    pub async fn issue_linking_token(&self, user_id: &str) -> Result<String, CreatorFlowError> {
        let suffix = Uuid::new_v4().simple().to_string().to_uppercase();
        let token = format!("{TOKEN_PREFIX}{}", &suffix[..6]);

        let result = sqlx::query(
            "UPDATE profiles SET linking_token = ?, updated_at = datetime('now') \
             WHERE user_id = ?",
        )
        .bind(&token)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| CreatorFlowError::Store(format!("issue token failed: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(CreatorFlowError::Store(format!(
                "no profile with user id {user_id}"
            )));
        }
        Ok(token)
    }

    /// Look up the profile bound to a chat. No side effects.
    pub async fn find_by_chat(&self, chat_id: i64) -> Result<Option<Profile>, CreatorFlowError> {
        let row: Option<(String, String, Option<i64>)> = sqlx::query_as(
            "SELECT user_id, display_name, telegram_chat_id FROM profiles \
             WHERE telegram_chat_id = ?",
        )
        .bind(chat_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CreatorFlowError::Store(format!("chat lookup failed: {e}")))?;

        Ok(row.map(|(user_id, display_name, telegram_chat_id)| Profile {
            user_id,
            display_name,
            telegram_chat_id,
        }))
    }

    /// Consume a linking token and bind the chat to its profile.
    ///
    /// Returns `None` for a malformed or unresolvable token, with no
    /// mutation performed. On success the token is cleared (single use),
    /// any stale session on the profile is dropped, and a previous binding
    /// of this chat to another profile is released, all in one transaction.
    pub async fn bind_chat(
        &self,
        token: &str,
        chat_id: i64,
    ) -> Result<Option<Profile>, CreatorFlowError> {
        if !is_valid_token(token) {
            return Ok(None);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| CreatorFlowError::Store(format!("begin bind failed: {e}")))?;

        let found: Option<(String, String)> =
            sqlx::query_as("SELECT user_id, display_name FROM profiles WHERE linking_token = ?")
                .bind(token)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| CreatorFlowError::Store(format!("token lookup failed: {e}")))?;

        let Some((user_id, display_name)) = found else {
            return Ok(None);
        };

        // Release the chat if another profile currently holds it, so the
        // chat_id column stays unique.
        sqlx::query(
            "UPDATE profiles SET telegram_chat_id = NULL, updated_at = datetime('now') \
             WHERE telegram_chat_id = ? AND user_id != ?",
        )
        .bind(chat_id)
        .bind(&user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| CreatorFlowError::Store(format!("release binding failed: {e}")))?;

        let updated = sqlx::query(
            "UPDATE profiles SET telegram_chat_id = ?, linking_token = NULL, \
             bot_session = NULL, updated_at = datetime('now') \
             WHERE user_id = ? AND linking_token = ?",
        )
        .bind(chat_id)
        .bind(&user_id)
        .bind(token)
        .execute(&mut *tx)
        .await
        .map_err(|e| CreatorFlowError::Store(format!("bind failed: {e}")))?;

        if updated.rows_affected() != 1 {
            return Ok(None);
        }

        tx.commit()
            .await
            .map_err(|e| CreatorFlowError::Store(format!("commit bind failed: {e}")))?;

        Ok(Some(Profile {
            user_id,
            display_name,
            telegram_chat_id: Some(chat_id),
        }))
    }
}
