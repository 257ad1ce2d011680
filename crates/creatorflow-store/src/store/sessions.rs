//! The per-user conversation session, stored as a JSON blob on the profile.

use super::Store;
use creatorflow_core::{CreatorFlowError, SessionState};
use tracing::warn;

impl Store {
    /// Read a user's session. A missing row, NULL column, or blob that no
    /// longer parses all read as `Idle`.
    pub async fn session_get(&self, user_id: &str) -> Result<SessionState, CreatorFlowError> {
        let row: Option<(Option<String>,)> =
            sqlx::query_as("SELECT bot_session FROM profiles WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| CreatorFlowError::Store(format!("session read failed: {e}")))?;

        let Some((Some(blob),)) = row else {
            return Ok(SessionState::Idle);
        };

        match serde_json::from_str(&blob) {
            Ok(state) => Ok(state),
            Err(e) => {
                warn!("discarding unreadable session for {user_id}: {e}");
                Ok(SessionState::Idle)
            }
        }
    }

    /// Write a user's session. `Idle` clears the column. Last write wins.
    pub async fn session_set(
        &self,
        user_id: &str,
        state: &SessionState,
    ) -> Result<(), CreatorFlowError> {
        let blob = if state.is_idle() {
            None
        } else {
            Some(serde_json::to_string(state)?)
        };

        let result = sqlx::query(
            "UPDATE profiles SET bot_session = ?, updated_at = datetime('now') \
             WHERE user_id = ?",
        )
        .bind(blob)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| CreatorFlowError::Store(format!("session write failed: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(CreatorFlowError::Store(format!(
                "no profile with user id {user_id}"
            )));
        }
        Ok(())
    }
}
