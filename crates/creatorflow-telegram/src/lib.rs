//! # creatorflow-telegram
//!
//! Raw Telegram Bot API integration: inbound update types for the webhook
//! and the outbound HTTP client implementing [`creatorflow_core::traits::Messenger`].

pub mod api;
pub mod keyboard;
pub mod types;

pub use api::TelegramApi;
pub use keyboard::{main_menu_keyboard, BTN_INFO, BTN_NEW_IDEA, BTN_NEW_TODO, BTN_WEBSITE};
pub use types::{TgChat, TgMessage, TgUpdate, TgUser};
