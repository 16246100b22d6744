// gemini integration - turns a message plus context into the assistant reply

use serde::{Deserialize, Serialize};

use super::chat::Model;
use super::db::{ChatMessage, Sender, User};
use crate::Error;

const MODEL: &str = "gemini-1.5-flash";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct Gemini {
    client: reqwest::Client,
    api_key: String,
}

// what we send to gemini
#[derive(Serialize)]
struct Request {
    #[serde(rename = "systemInstruction")]
    system_instruction: Content,
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

// what gemini sends back
#[derive(Deserialize)]
struct Response {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl Gemini {
    pub fn new(api_key: Option<String>) -> Result<Self, Error> {
        // check common env var names for the api key
        let api_key = match api_key {
            Some(key) => key,
            None => std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("GOOGLE_API_KEY"))
                .map_err(|_| Error::MissingApiKey)?,
        };

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
        })
    }
}

// persona framing plus whatever profile facts we actually have
fn system_prompt(profile: &User) -> String {
    let mut prompt = String::from(
        "You are Arogya Mitra, a friendly AI health assistant. Answer general health and \
wellness questions in simple, reassuring language.

Rules:
- Keep answers short and practical
- Never diagnose; suggest seeing a doctor for anything serious or persistent
- Never prescribe medication or dosages
- If the user profile below has details, use them to personalize the answer",
    );

    prompt.push_str("\n\nUser profile:");
    if let Some(name) = &profile.name {
        prompt.push_str(&format!("\n- Name: {name}"));
    }
    if let Some(age) = profile.age {
        prompt.push_str(&format!("\n- Age: {age}"));
    }
    if let Some(conditions) = &profile.conditions {
        prompt.push_str(&format!("\n- Known conditions: {conditions}"));
    }
    if let Some(language) = &profile.language {
        prompt.push_str(&format!("\n- Preferred language: {language}"));
    }

    prompt
}

impl Model for Gemini {
    async fn reply(
        &self,
        message: &str,
        profile: &User,
        history: &[ChatMessage],
    ) -> Result<String, Error> {
        // transcript first, oldest to newest, then the new message
        let mut contents: Vec<Content> = history
            .iter()
            .map(|m| Content {
                role: Some(match m.sender {
                    Sender::User => "user",
                    Sender::Bot => "model",
                }),
                parts: vec![Part {
                    text: m.text.clone(),
                }],
            })
            .collect();

        contents.push(Content {
            role: Some("user"),
            parts: vec![Part {
                text: message.to_string(),
            }],
        });

        let request = Request {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: system_prompt(profile),
                }],
            },
            contents,
        };

        let url = format!("{API_BASE}/{MODEL}:generateContent");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let error = response.text().await?;
            return Err(Error::Gemini(error));
        }

        let response: Response = response.json().await?;
        let text = response
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default();

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(Error::Gemini("empty response from model".to_string()));
        }

        Ok(text)
    }
}
