//! Free-text handling: feeding input through the active flow and
//! committing finished drafts.

use creatorflow_core::flow::{self, FlowOutcome};
use creatorflow_core::{CreatorFlowError, SessionState};
use tracing::{error, info};

use super::{replies, Ack, Bot};

impl Bot {
    /// Free text that matched no command, button, or token. Either it
    /// advances the chat's active flow or, with no flow running, earns a
    /// nudge back to the menu.
    pub(super) async fn handle_text(
        &self,
        chat_id: i64,
        text: &str,
    ) -> Result<Ack, CreatorFlowError> {
        let Some(profile) = self.store.find_by_chat(chat_id).await? else {
            self.notify(chat_id, replies::LINK_PROMPT, false).await;
            return Ok(Ack::Handled);
        };

        let state = self.store.session_get(&profile.user_id).await?;
        match flow::advance(state, text) {
            FlowOutcome::NotInFlow => {
                self.notify(chat_id, replies::IDLE_NUDGE, true).await;
            }
            FlowOutcome::Next { state, prompt } => {
                self.store.session_set(&profile.user_id, &state).await?;
                info!("chat {chat_id}: session -> {}", state.name());
                self.notify(chat_id, replies::prompt_text(prompt), false)
                    .await;
            }
            FlowOutcome::CommitIdea(draft) => {
                match self.store.create_idea(&profile.user_id, &draft).await {
                    Ok(id) => {
                        info!("chat {chat_id}: saved idea {id}");
                        self.store
                            .session_set(&profile.user_id, &SessionState::Idle)
                            .await?;
                        self.notify(chat_id, &replies::idea_saved(&draft.title), true)
                            .await;
                    }
                    Err(e) => {
                        error!("chat {chat_id}: idea insert failed: {e}");
                        self.notify(chat_id, replies::COMMIT_FAILED, false).await;
                    }
                }
            }
            FlowOutcome::CommitTodo(draft) => {
                match self.store.create_todo(&profile.user_id, &draft).await {
                    Ok(id) => {
                        info!("chat {chat_id}: saved to-do {id}");
                        self.store
                            .session_set(&profile.user_id, &SessionState::Idle)
                            .await?;
                        self.notify(
                            chat_id,
                            &replies::todo_saved(&draft.task_name, draft.due_date),
                            true,
                        )
                        .await;
                    }
                    Err(e) => {
                        error!("chat {chat_id}: to-do insert failed: {e}");
                        self.notify(chat_id, replies::COMMIT_FAILED, false).await;
                    }
                }
            }
        }
        Ok(Ack::Handled)
    }
}
