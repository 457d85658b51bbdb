//! Assistant module - menu dialogue backed by model answers.

pub mod answer;
pub mod catalog;
pub mod dialogue;
pub mod fallback;
pub mod phrases;
pub mod session;
pub mod telegram;


pub use answer::{AnswerGenerator, CompletionSource};
pub use dialogue::{Dialogue, Step};
pub use session::SessionStore;
pub use telegram::TelegramClient;
