// arogya library - conversational ai health assistant

pub mod cli;
mod core;
mod error;
mod server;

pub use self::core::{
    CRITICAL_RESPONSE, Chat, ChatMessage, Db, Gemini, Model, Safety, Sender, Store, User, UserId,
};
pub use error::Error;
pub use server::Server;
