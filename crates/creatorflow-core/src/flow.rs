//! The conversation state machine.
//!
//! `advance` is a pure function from `(state, input)` to an outcome; all
//! side effects (prompt sends, record inserts, session writes) are carried
//! out by the dispatcher from the returned value. Flows are linear: the
//! idea flow walks title → reference link → description, the todo flow
//! walks task name → due date, and both end back at `Idle`.

use chrono::NaiveDate;

use crate::session::{IdeaDraft, SessionState, TodoDraft};

/// Inputs that mean "leave this optional field empty and move on".
const SKIP_SENTINELS: [&str; 2] = ["no", "skip"];

/// Due-date input that means "no due date".
const NO_DATE_SENTINEL: &str = "none";

/// Date formats accepted at the due-date step, tried in order.
/// Month names (`%B`) match full or abbreviated, any case.
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y", "%B %d, %Y", "%B %d %Y"];

/// What a single conversation turn produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// No flow is active; the router should fall back to the menu nudge.
    NotInFlow,
    /// The flow advanced one step; store `state` and send `prompt`.
    Next {
        state: SessionState,
        prompt: FlowPrompt,
    },
    /// The idea flow finished; commit the draft and clear the session.
    CommitIdea(IdeaDraft),
    /// The todo flow finished; commit the draft and clear the session.
    CommitTodo(TodoDraft),
}

/// The question to ask after a mid-flow step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPrompt {
    IdeaReference,
    IdeaDescription,
    TodoDueDate,
}

/// Case-insensitive check against the skip sentinels.
pub fn is_skip(input: &str) -> bool {
    SKIP_SENTINELS.iter().any(|s| input.eq_ignore_ascii_case(s))
}

/// Parse free-form due-date text. `None` means "store no date"; the todo
/// step never re-prompts on unparseable input.
pub fn parse_due_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Advance the state machine by one user turn.
pub fn advance(state: SessionState, input: &str) -> FlowOutcome {
    match state {
        SessionState::Idle => FlowOutcome::NotInFlow,

        SessionState::IdeaTitle => FlowOutcome::Next {
            state: SessionState::IdeaReference {
                title: input.to_string(),
            },
            prompt: FlowPrompt::IdeaReference,
        },

        SessionState::IdeaReference { title } => {
            let reference_link = if is_skip(input) {
                String::new()
            } else {
                input.to_string()
            };
            FlowOutcome::Next {
                state: SessionState::IdeaDescription {
                    title,
                    reference_link,
                },
                prompt: FlowPrompt::IdeaDescription,
            }
        }

        SessionState::IdeaDescription {
            title,
            reference_link,
        } => {
            let description = if is_skip(input) {
                String::new()
            } else {
                input.to_string()
            };
            FlowOutcome::CommitIdea(IdeaDraft {
                title,
                reference_link,
                description,
            })
        }

        SessionState::TodoTitle => FlowOutcome::Next {
            state: SessionState::TodoDueDate {
                task_name: input.to_string(),
            },
            prompt: FlowPrompt::TodoDueDate,
        },

        SessionState::TodoDueDate { task_name } => {
            let due_date = if input.eq_ignore_ascii_case(NO_DATE_SENTINEL) {
                None
            } else {
                parse_due_date(input)
            };
            FlowOutcome::CommitTodo(TodoDraft {
                task_name,
                due_date,
            })
        }
    }
}
