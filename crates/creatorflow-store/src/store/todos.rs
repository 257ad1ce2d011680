//! Committed to-dos.

use super::Store;
use creatorflow_core::{CreatorFlowError, TodoDraft};
use uuid::Uuid;

/// A committed todo row. `due_date` is an ISO date string when set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: String,
    pub user_id: String,
    pub task_name: String,
    pub due_date: Option<String>,
    pub is_completed: bool,
}

impl Store {
    /// Insert one todo for `user_id`, not completed.
    pub async fn create_todo(
        &self,
        user_id: &str,
        draft: &TodoDraft,
    ) -> Result<String, CreatorFlowError> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO todos (id, user_id, task_name, due_date) VALUES (?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(&draft.task_name)
        .bind(draft.due_date.map(|d| d.to_string()))
        .execute(&self.pool)
        .await
        .map_err(|e| CreatorFlowError::Store(format!("create todo failed: {e}")))?;
        Ok(id)
    }

    /// All todos belonging to `user_id`, newest first.
    pub async fn todos_for_user(&self, user_id: &str) -> Result<Vec<Todo>, CreatorFlowError> {
        let rows: Vec<(String, String, Option<String>, bool)> = sqlx::query_as(
            "SELECT id, task_name, due_date, is_completed FROM todos \
             WHERE user_id = ? ORDER BY created_at DESC, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CreatorFlowError::Store(format!("list todos failed: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(id, task_name, due_date, is_completed)| Todo {
                id,
                user_id: user_id.to_string(),
                task_name,
                due_date,
                is_completed,
            })
            .collect())
    }
}
