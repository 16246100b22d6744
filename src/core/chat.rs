// one chat turn - triage, user resolution, context, generation, persistence

use super::db::{ChatMessage, Sender, User, UserId};
use super::safety::{CRITICAL_RESPONSE, Safety};
use crate::Error;

/// Persistence collaborator. Implemented by [`super::Db`] in production
/// and by in-memory stubs in tests.
#[allow(async_fn_in_trait)]
pub trait Store {
    async fn get_user(&self, id: &UserId) -> Result<Option<User>, Error>;
    async fn upsert_user(&self, user: &User) -> Result<(), Error>;
    async fn chat_history(&self, id: &UserId) -> Result<Vec<ChatMessage>, Error>;
    async fn save_message(&self, message: &ChatMessage) -> Result<(), Error>;
}

/// Generation collaborator. Implemented by [`super::Gemini`] in production.
/// Must fail loudly rather than return empty text.
#[allow(async_fn_in_trait)]
pub trait Model {
    async fn reply(
        &self,
        message: &str,
        profile: &User,
        history: &[ChatMessage],
    ) -> Result<String, Error>;
}

/// Turn orchestrator. Holds the long-lived collaborator handles and runs
/// one request/response cycle per call.
pub struct Chat<S, M> {
    store: S,
    model: M,
}

impl<S: Store, M: Model> Chat<S, M> {
    pub fn new(store: S, model: M) -> Self {
        Self { store, model }
    }

    /// Handle one turn and return the text for the caller.
    ///
    /// Critical messages short-circuit to the fixed emergency reply with no
    /// lookups and no model call. Persistence of the exchange is best-effort
    /// either way: a failed write is logged, never surfaced.
    pub async fn handle(&self, user_id: &str, message: &str) -> Result<String, Error> {
        let user_id = user_id.trim();
        let message = message.trim();

        if user_id.is_empty() {
            return Err(Error::Validation("user_id is required".to_string()));
        }
        if message.is_empty() {
            return Err(Error::Validation("message cannot be empty".to_string()));
        }

        let id = UserId::new(user_id);
        tracing::info!(user_id, "chat message received");

        let safety = Safety::check(message);
        let response = if safety.is_critical {
            tracing::warn!(user_id, keyword = safety.matched, "critical message, bypassing model");
            CRITICAL_RESPONSE.to_string()
        } else {
            // profile and history are independent reads; history is read
            // before this turn's messages are written, so it never
            // contains them
            let (profile, history) = tokio::try_join!(
                self.resolve_user(&id),
                self.store.chat_history(&id),
            )?;

            self.model.reply(message, &profile, &history).await?
        };

        if let Err(e) = self.persist_turn(&id, message, &response).await {
            tracing::error!(user_id, error = %e, "failed to save chat messages");
        }

        Ok(response)
    }

    /// Fetch the profile for an identifier, creating a minimal one on
    /// first contact.
    async fn resolve_user(&self, id: &UserId) -> Result<User, Error> {
        if let Some(user) = self.store.get_user(id).await? {
            return Ok(user);
        }

        let user = User::new(id.clone());
        self.store.upsert_user(&user).await?;
        tracing::info!(user_id = %id, "created new user profile");

        Ok(user)
    }

    async fn persist_turn(&self, id: &UserId, message: &str, response: &str) -> Result<(), Error> {
        self.store
            .save_message(&ChatMessage::new(id.clone(), Sender::User, message))
            .await?;
        self.store
            .save_message(&ChatMessage::new(id.clone(), Sender::Bot, response))
            .await?;

        Ok(())
    }
}
