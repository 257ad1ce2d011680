//! The dispatcher: one webhook update in, replies and state writes out.
//!
//! Routing and transition logic live in pure code (`router`, the core
//! flow module); this module performs the effects in between: identity
//! lookups, session reads/writes, record inserts, and outbound sends.

mod flows;
pub mod replies;
mod router;


use std::sync::Arc;

use creatorflow_core::traits::Messenger;
use creatorflow_core::{CreatorFlowError, SessionState};
use creatorflow_store::Store;
use creatorflow_telegram::TgUpdate;
use tracing::{info, warn};

use router::Route;

/// How an update was acknowledged to Telegram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ack {
    Handled,
    Ignored,
}

/// The webhook dispatcher.
pub struct Bot {
    store: Store,
    messenger: Arc<dyn Messenger>,
    site_url: String,
}

impl Bot {
    pub fn new(store: Store, messenger: Arc<dyn Messenger>, site_url: String) -> Self {
        Self {
            store,
            messenger,
            site_url,
        }
    }

    /// Handle one webhook update end to end.
    ///
    /// Non-text updates are ignored. Errors bubbling out of here are
    /// store/lookup failures; the server layer logs them, apologizes to
    /// the user, and still acknowledges the delivery.
    pub async fn handle_update(&self, update: TgUpdate) -> Result<Ack, CreatorFlowError> {
        let Some(message) = update.message else {
            return Ok(Ack::Ignored);
        };
        let Some(text) = message.text else {
            return Ok(Ack::Ignored);
        };

        let chat_id = message.chat.id;
        let text = text.trim();
        if text.is_empty() {
            return Ok(Ack::Ignored);
        }

        let route = Route::parse(text);
        info!("chat {chat_id}: {}", route.kind());

        match route {
            Route::Reset => self.handle_reset(chat_id).await,
            Route::NewIdea => {
                self.start_flow(chat_id, SessionState::IdeaTitle, replies::IDEA_TITLE_PROMPT)
                    .await
            }
            Route::NewTodo => {
                self.start_flow(chat_id, SessionState::TodoTitle, replies::TODO_TITLE_PROMPT)
                    .await
            }
            Route::Info => {
                self.notify(chat_id, replies::INFO, true).await;
                Ok(Ack::Handled)
            }
            Route::Website => {
                self.notify(chat_id, &replies::website(&self.site_url), true)
                    .await;
                Ok(Ack::Handled)
            }
            Route::Link(token) => self.handle_link(chat_id, token).await,
            Route::Text(text) => self.handle_text(chat_id, text).await,
        }
    }

    /// `/start` or `/menu`: back to a clean menu, linked or not.
    async fn handle_reset(&self, chat_id: i64) -> Result<Ack, CreatorFlowError> {
        match self.store.find_by_chat(chat_id).await? {
            Some(profile) => {
                self.store
                    .session_set(&profile.user_id, &SessionState::Idle)
                    .await?;
                self.notify(chat_id, replies::MENU, true).await;
            }
            None => self.notify(chat_id, replies::LINK_PROMPT, false).await,
        }
        Ok(Ack::Handled)
    }

    /// A flow-start button: requires identity, seeds the first state.
    async fn start_flow(
        &self,
        chat_id: i64,
        state: SessionState,
        prompt: &str,
    ) -> Result<Ack, CreatorFlowError> {
        match self.store.find_by_chat(chat_id).await? {
            Some(profile) => {
                self.store.session_set(&profile.user_id, &state).await?;
                self.notify(chat_id, prompt, false).await;
            }
            None => self.notify(chat_id, replies::LINK_PROMPT, false).await,
        }
        Ok(Ack::Handled)
    }

    /// `/start <token>`: the linking handshake.
    async fn handle_link(&self, chat_id: i64, token: &str) -> Result<Ack, CreatorFlowError> {
        match self.store.bind_chat(token, chat_id).await? {
            Some(profile) => {
                self.notify(chat_id, &replies::welcome(&profile.display_name), true)
                    .await;
            }
            None => self.notify(chat_id, replies::INVALID_TOKEN, false).await,
        }
        Ok(Ack::Handled)
    }

    /// Best-effort send. Transport failures are logged and swallowed so a
    /// dead Telegram API can never corrupt a conversation turn.
    pub(crate) async fn notify(&self, chat_id: i64, text: &str, with_menu: bool) {
        if let Err(e) = self.messenger.send(chat_id, text, with_menu).await {
            warn!("send to chat {chat_id} failed: {e}");
        }
    }
}
