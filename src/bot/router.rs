//! Inbound text classification.

use creatorflow_telegram::{BTN_INFO, BTN_NEW_IDEA, BTN_NEW_TODO, BTN_WEBSITE};

/// The handling path for one inbound message. Exactly one per message,
/// decided in fixed priority order by [`Route::parse`].
#[derive(Debug, PartialEq, Eq)]
pub enum Route<'a> {
    /// `/start` or `/menu` with no argument: clear session, show the menu.
    Reset,
    /// "Add Content Idea" button.
    NewIdea,
    /// "Add To-Do" button.
    NewTodo,
    /// "Info Command" button.
    Info,
    /// "Website Link" button.
    Website,
    /// `/start <token>`: the linking handshake.
    Link(&'a str),
    /// Anything else feeds the active conversation.
    Text(&'a str),
}

impl Route<'_> {
    /// Short label for log lines, without message content.
    pub fn kind(&self) -> &'static str {
        match self {
            Route::Reset => "reset",
            Route::NewIdea => "new_idea",
            Route::NewTodo => "new_todo",
            Route::Info => "info",
            Route::Website => "website",
            Route::Link(_) => "link",
            Route::Text(_) => "text",
        }
    }

    /// Classify a trimmed message. First match wins: global reset, then
    /// the fixed button labels (byte-for-byte), then the linking command,
    /// then conversational fallback.
    pub fn parse(text: &str) -> Route<'_> {
        let mut words = text.split_whitespace();
        let first = words.next().unwrap_or("");
        // Group-chat convention: "/start@creatorflow_bot" → "/start".
        let cmd = first.split('@').next().unwrap_or(first);
        let arg = words.next();

        if matches!(cmd, "/start" | "/menu") && arg.is_none() {
            return Route::Reset;
        }

        match text {
            BTN_NEW_IDEA => return Route::NewIdea,
            BTN_NEW_TODO => return Route::NewTodo,
            BTN_INFO => return Route::Info,
            BTN_WEBSITE => return Route::Website,
            _ => {}
        }

        if cmd == "/start" {
            if let Some(token) = arg {
                return Route::Link(token);
            }
        }

        Route::Text(text)
    }
}
