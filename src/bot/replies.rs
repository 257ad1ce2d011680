//! Every text the bot says, in one place.

use chrono::NaiveDate;
use creatorflow_core::flow::FlowPrompt;

pub const LINK_PROMPT: &str = "Your Telegram isn't linked to a CreatorFlow account yet.\n\n\
     Open your dashboard settings, generate a linking code, and send it here:\n\
     `/start CF-XXXXXX`";

pub const INVALID_TOKEN: &str = "That linking code didn't work. Codes look like `CF-XXXXXX` \
     and can only be used once.\n\nGenerate a fresh one from your dashboard and try again.";

pub const MENU: &str = "What would you like to do?";

pub const IDLE_NUDGE: &str = "Please choose an option from the menu below.";

pub const IDEA_TITLE_PROMPT: &str = "💡 New content idea!\n\nWhat's the title?";

pub const IDEA_REFERENCE_PROMPT: &str =
    "Got it. Any reference link? (type `no` or `skip` to leave it empty)";

pub const IDEA_DESCRIPTION_PROMPT: &str =
    "Almost done. Add a description? (type `no` or `skip` to leave it empty)";

pub const TODO_TITLE_PROMPT: &str = "📝 New to-do!\n\nWhat's the task?";

pub const TODO_DUE_PROMPT: &str =
    "When is it due? Send a date like `2025-01-20`, or `none` for no due date.";

pub const COMMIT_FAILED: &str =
    "⚠️ Couldn't save that just now. Try sending it again, or /start to return to the menu.";

pub const GENERIC_ERROR: &str = "Something went wrong on our side. Please try again.";

pub const INFO: &str = "ℹ️ I capture content straight into your CreatorFlow board:\n\n\
     • *Add Content Idea*: title, reference link, description\n\
     • *Add To-Do*: task and due date\n\
     • /menu: show the menu again\n\n\
     Everything lands in your dashboard instantly.";

pub fn welcome(display_name: &str) -> String {
    format!(
        "✅ Account linked! Welcome, {display_name}.\n\n\
         Use the menu below to capture ideas and to-dos from anywhere."
    )
}

pub fn website(site_url: &str) -> String {
    format!("🔗 {site_url}")
}

pub fn idea_saved(title: &str) -> String {
    format!("💡 Idea saved: *{title}*\n\nFind it in the Idea column on your board.")
}

pub fn todo_saved(task_name: &str, due_date: Option<NaiveDate>) -> String {
    match due_date {
        Some(date) => format!("✅ To-do saved: *{task_name}* (due {date})"),
        None => format!("✅ To-do saved: *{task_name}*"),
    }
}

/// The question that follows a mid-flow transition.
pub fn prompt_text(prompt: FlowPrompt) -> &'static str {
    match prompt {
        FlowPrompt::IdeaReference => IDEA_REFERENCE_PROMPT,
        FlowPrompt::IdeaDescription => IDEA_DESCRIPTION_PROMPT,
        FlowPrompt::TodoDueDate => TODO_DUE_PROMPT,
    }
}
