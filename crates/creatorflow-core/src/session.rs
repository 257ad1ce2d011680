use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Where a user currently is in a conversation flow, together with the
/// fields accumulated so far.
///
/// Persisted on the profile row as `{"state": ..., "step_data": {...}}`,
/// e.g. `{"state":"idea_reference","step_data":{"title":"Unboxing"}}`.
/// `Idle` round-trips as `{"state":"idle"}` and is equivalent to no stored
/// session at all.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "step_data", rename_all = "snake_case")]
pub enum SessionState {
    /// No active flow. Initial and terminal.
    #[default]
    Idle,
    /// Idea flow: waiting for the title.
    IdeaTitle,
    /// Idea flow: waiting for the reference link.
    IdeaReference { title: String },
    /// Idea flow: waiting for the description.
    IdeaDescription {
        title: String,
        reference_link: String,
    },
    /// Todo flow: waiting for the task name.
    TodoTitle,
    /// Todo flow: waiting for the due date.
    TodoDueDate { task_name: String },
}

impl SessionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Short name for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::IdeaTitle => "idea_title",
            Self::IdeaReference { .. } => "idea_reference",
            Self::IdeaDescription { .. } => "idea_description",
            Self::TodoTitle => "todo_title",
            Self::TodoDueDate { .. } => "todo_due_date",
        }
    }
}

/// A completed idea flow, ready to commit. Skipped optional steps hold
/// empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaDraft {
    pub title: String,
    pub reference_link: String,
    pub description: String,
}

/// A completed todo flow, ready to commit. `due_date` is `None` when the
/// user answered "none" or the input did not parse as a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoDraft {
    pub task_name: String,
    pub due_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_serializes_without_step_data() {
        let json = serde_json::to_value(SessionState::Idle).unwrap();
        assert_eq!(json, serde_json::json!({"state": "idle"}));
    }

    #[test]
    fn mid_flow_state_carries_step_data() {
        let state = SessionState::IdeaReference {
            title: "Unboxing".to_string(),
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"state": "idea_reference", "step_data": {"title": "Unboxing"}})
        );

        let back: SessionState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn deserializes_two_field_step_data() {
        let state: SessionState = serde_json::from_str(
            r#"{"state":"idea_description","step_data":{"title":"T","reference_link":""}}"#,
        )
        .unwrap();
        assert_eq!(
            state,
            SessionState::IdeaDescription {
                title: "T".to_string(),
                reference_link: String::new(),
            }
        );
    }

    #[test]
    fn idle_parses_with_or_without_null_step_data() {
        let a: SessionState = serde_json::from_str(r#"{"state":"idle"}"#).unwrap();
        let b: SessionState = serde_json::from_str(r#"{"state":"idle","step_data":null}"#).unwrap();
        assert!(a.is_idle());
        assert!(b.is_idle());
    }
}
