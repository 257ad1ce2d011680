//! Committed content ideas.

use super::Store;
use creatorflow_core::{CreatorFlowError, IdeaDraft};
use uuid::Uuid;

/// A committed idea row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Idea {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub reference_link: String,
    pub description: String,
    pub status: String,
}

impl Store {
    /// Insert one idea for `user_id`. Status starts at the first pipeline
    /// stage (`idea`).
    pub async fn create_idea(
        &self,
        user_id: &str,
        draft: &IdeaDraft,
    ) -> Result<String, CreatorFlowError> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO ideas (id, user_id, title, reference_link, description) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(&draft.title)
        .bind(&draft.reference_link)
        .bind(&draft.description)
        .execute(&self.pool)
        .await
        .map_err(|e| CreatorFlowError::Store(format!("create idea failed: {e}")))?;
        Ok(id)
    }

    /// All ideas belonging to `user_id`, newest first.
    pub async fn ideas_for_user(&self, user_id: &str) -> Result<Vec<Idea>, CreatorFlowError> {
        let rows: Vec<(String, String, String, String, String)> = sqlx::query_as(
            "SELECT id, title, reference_link, description, status FROM ideas \
             WHERE user_id = ? ORDER BY created_at DESC, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CreatorFlowError::Store(format!("list ideas failed: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(id, title, reference_link, description, status)| Idea {
                id,
                user_id: user_id.to_string(),
                title,
                reference_link,
                description,
                status,
            })
            .collect())
    }
}
