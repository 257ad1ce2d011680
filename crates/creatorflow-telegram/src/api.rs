//! Outbound Bot API client.

use async_trait::async_trait;
use creatorflow_core::traits::Messenger;
use creatorflow_core::CreatorFlowError;
use tracing::{debug, info, warn};

use crate::keyboard::main_menu_keyboard;
use crate::types::{TgResponse, TgUser};

/// Thin HTTP client over the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramApi {
    client: reqwest::Client,
    base_url: String,
}

impl TelegramApi {
    pub fn new(bot_token: &str) -> Self {
        let base_url = format!("https://api.telegram.org/bot{bot_token}");
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Send a text message to a chat, optionally with the main-menu keyboard.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        with_menu: bool,
    ) -> Result<(), CreatorFlowError> {
        let chunks = split_message(text, 4096);

        for chunk in chunks {
            let url = format!("{}/sendMessage", self.base_url);
            let mut body = serde_json::json!({
                "chat_id": chat_id,
                "text": chunk,
                "parse_mode": "Markdown",
            });
            if with_menu {
                body["reply_markup"] = main_menu_keyboard();
            }

            let resp = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| CreatorFlowError::Telegram(format!("send failed: {e}")))?;

            let status = resp.status();
            if !status.is_success() {
                let error_text = resp.text().await.unwrap_or_default();
                if error_text.contains("can't parse entities") {
                    debug!("Markdown parse failed, retrying as plain text");
                    if let Some(obj) = body.as_object_mut() {
                        obj.remove("parse_mode");
                    }
                    self.client
                        .post(&url)
                        .json(&body)
                        .send()
                        .await
                        .map_err(|e| {
                            CreatorFlowError::Telegram(format!("send (plain) failed: {e}"))
                        })?;
                } else {
                    warn!("telegram send got {status}: {error_text}");
                }
            }
        }

        Ok(())
    }

    /// Point Telegram's webhook at `url`. Fails loudly so startup can
    /// surface a misconfigured public URL.
    pub async fn set_webhook(&self, url: &str, secret: &str) -> Result<(), CreatorFlowError> {
        let mut body = serde_json::json!({
            "url": url,
            "allowed_updates": ["message"],
        });
        if !secret.is_empty() {
            body["secret_token"] = serde_json::Value::String(secret.to_string());
        }

        let resp = self
            .client
            .post(format!("{}/setWebhook", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| CreatorFlowError::Telegram(format!("setWebhook failed: {e}")))?;

        let parsed: TgResponse<bool> = resp
            .json()
            .await
            .map_err(|e| CreatorFlowError::Telegram(format!("setWebhook parse failed: {e}")))?;

        if !parsed.ok {
            return Err(CreatorFlowError::Telegram(format!(
                "setWebhook rejected: {}",
                parsed.description.unwrap_or_default()
            )));
        }
        info!("webhook registered at {url}");
        Ok(())
    }

    /// Register the slash commands with Telegram so users see an
    /// autocomplete menu. Best-effort: logs failures but does not propagate.
    pub async fn register_commands(&self) {
        let commands = serde_json::json!({
            "commands": [
                { "command": "start", "description": "Link your account or show the menu" },
                { "command": "menu", "description": "Show the main menu" },
            ]
        });

        let url = format!("{}/setMyCommands", self.base_url);
        match self.client.post(&url).json(&commands).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("registered Telegram bot commands");
            }
            Ok(resp) => {
                let body = resp.text().await.unwrap_or_default();
                warn!("failed to register Telegram bot commands: {body}");
            }
            Err(e) => {
                warn!("failed to register Telegram bot commands: {e}");
            }
        }
    }

    /// `getMe`: verifies the token; used by the status command.
    pub async fn get_me(&self) -> Result<TgUser, CreatorFlowError> {
        let resp = self
            .client
            .get(format!("{}/getMe", self.base_url))
            .send()
            .await
            .map_err(|e| CreatorFlowError::Telegram(format!("getMe failed: {e}")))?;

        let parsed: TgResponse<TgUser> = resp
            .json()
            .await
            .map_err(|e| CreatorFlowError::Telegram(format!("getMe parse failed: {e}")))?;

        match parsed.result {
            Some(user) if parsed.ok => Ok(user),
            _ => Err(CreatorFlowError::Telegram(format!(
                "getMe rejected: {}",
                parsed.description.unwrap_or_default()
            ))),
        }
    }
}

#[async_trait]
impl Messenger for TelegramApi {
    async fn send(
        &self,
        chat_id: i64,
        text: &str,
        with_menu: bool,
    ) -> Result<(), CreatorFlowError> {
        self.send_message(chat_id, text, with_menu).await
    }
}

/// Split a long message into chunks under Telegram's length limit,
/// preferring newline boundaries and never cutting inside a character.
fn split_message(text: &str, max_len: usize) -> Vec<&str> {
    if text.len() <= max_len {
        return vec![text];
    }

    let mut chunks = Vec::new();
    let mut rest = text;

    while rest.len() > max_len {
        let mut end = max_len;
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        let break_at = rest[..end].rfind('\n').map(|i| i + 1).unwrap_or(end);
        let (chunk, tail) = rest.split_at(break_at);
        chunks.push(chunk);
        rest = tail;
    }
    chunks.push(rest);

    chunks
}
