use crate::error::CreatorFlowError;
use async_trait::async_trait;

/// Outbound message delivery, the bot's only effect on the outside world.
///
/// Production wiring supplies the Telegram HTTP client; tests supply
/// recording or failing stand-ins so conversation logic can be exercised
/// without network access.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send `text` to `chat_id`. `with_menu` attaches the fixed main-menu
    /// reply keyboard.
    async fn send(&self, chat_id: i64, text: &str, with_menu: bool)
        -> Result<(), CreatorFlowError>;
}
