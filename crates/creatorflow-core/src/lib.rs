//! # creatorflow-core
//!
//! Core types, configuration, error handling, and the conversation state
//! machine for the CreatorFlow intake bot.

pub mod config;
pub mod error;
pub mod flow;
pub mod session;
pub mod traits;

pub use config::{shellexpand, Config};
pub use error::CreatorFlowError;
pub use session::{IdeaDraft, SessionState, TodoDraft};
