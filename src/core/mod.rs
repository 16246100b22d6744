// core logic - triage, turn orchestration, storage, and gemini

mod ai;
mod chat;
mod db;
mod safety;

pub use ai::Gemini;
pub use chat::{Chat, Model, Store};
pub use db::{ChatMessage, Db, Sender, User, UserId};
pub use safety::{CRITICAL_RESPONSE, Safety};
