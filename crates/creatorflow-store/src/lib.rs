//! # creatorflow-store
//!
//! SQLite-backed persistence for CreatorFlow: profiles with their Telegram
//! bindings, per-user conversation sessions, and the committed ideas/todos.

pub mod store;

pub use store::{is_valid_token, Idea, Profile, Store, Todo, TOKEN_PREFIX};
