// sqlite storage for user profiles and the chat message log
// the legacy schema keys both tables on a phone_number column

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use super::chat::Store;
use crate::Error;

/// How many recent messages feed the model as context.
const HISTORY_WINDOW: i64 = 20;

/// Canonical user identifier. Stored under the legacy `phone_number`
/// column, but nothing outside this module needs to know that.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: Option<String>,
    pub age: Option<i64>,
    pub conditions: Option<String>,
    pub language: Option<String>,
}

impl User {
    /// A minimal profile for a first contact: just the identifier.
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            name: None,
            age: None,
            conditions: None,
            language: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }

    fn from_db(s: &str) -> Self {
        match s {
            "bot" => Sender::Bot,
            _ => Sender::User,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub user_id: UserId,
    pub sender: Sender,
    pub text: String,
}

impl ChatMessage {
    pub fn new(user_id: UserId, sender: Sender, text: impl Into<String>) -> Self {
        Self {
            user_id,
            sender,
            text: text.into(),
        }
    }
}

pub struct Db {
    pool: SqlitePool,
}

impl Db {
    pub async fn connect(url: &str) -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    async fn migrate(&self) -> Result<(), Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                phone_number TEXT PRIMARY KEY,
                name TEXT,
                age INTEGER,
                conditions TEXT,
                language TEXT
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS chat_messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                phone_number TEXT NOT NULL,
                sender TEXT NOT NULL,
                message_text TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

impl Store for Db {
    async fn get_user(&self, id: &UserId) -> Result<Option<User>, Error> {
        let row: Option<(String, Option<String>, Option<i64>, Option<String>, Option<String>)> =
            sqlx::query_as(
                "SELECT phone_number, name, age, conditions, language
                 FROM users WHERE phone_number = ?",
            )
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(id, name, age, conditions, language)| User {
            id: UserId::new(id),
            name,
            age,
            conditions,
            language,
        }))
    }

    async fn upsert_user(&self, user: &User) -> Result<(), Error> {
        // last write wins on concurrent first contact
        sqlx::query(
            "INSERT INTO users (phone_number, name, age, conditions, language)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(phone_number) DO UPDATE SET
                name = excluded.name,
                age = excluded.age,
                conditions = excluded.conditions,
                language = excluded.language",
        )
        .bind(user.id.as_str())
        .bind(&user.name)
        .bind(user.age)
        .bind(&user.conditions)
        .bind(&user.language)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn chat_history(&self, id: &UserId) -> Result<Vec<ChatMessage>, Error> {
        // most recent window, flipped back to oldest-first for the model
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT sender, message_text FROM chat_messages
             WHERE phone_number = ? ORDER BY id DESC LIMIT ?",
        )
        .bind(id.as_str())
        .bind(HISTORY_WINDOW)
        .fetch_all(&self.pool)
        .await?;

        let mut history: Vec<ChatMessage> = rows
            .into_iter()
            .map(|(sender, text)| ChatMessage {
                user_id: id.clone(),
                sender: Sender::from_db(&sender),
                text,
            })
            .collect();
        history.reverse();

        Ok(history)
    }

    async fn save_message(&self, message: &ChatMessage) -> Result<(), Error> {
        sqlx::query(
            "INSERT INTO chat_messages (phone_number, sender, message_text, created_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(message.user_id.as_str())
        .bind(message.sender.as_str())
        .bind(&message.text)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
