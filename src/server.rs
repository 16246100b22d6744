// http server mode - the chat api

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::core::Chat;
use crate::{Db, Error, Gemini};

struct AppState {
    chat: Chat<Db, Gemini>,
}

#[derive(Deserialize)]
struct ChatRequest {
    user_id: String,
    message: String,
}

#[derive(Serialize)]
struct ChatResponse {
    response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub struct Server;

impl Server {
    pub async fn run(
        db_url: &str,
        host: &str,
        port: u16,
        api_key: Option<String>,
    ) -> Result<(), Error> {
        // one long-lived handle each, shared across turns
        let db = Db::connect(db_url).await?;
        let gemini = Gemini::new(api_key)?;

        let state = Arc::new(AppState {
            chat: Chat::new(db, gemini),
        });

        // permissive cors so the standalone frontend can call this api
        let app = Router::new()
            .route("/health", get(health))
            .route("/api/chat", post(chat))
            .layer(CorsLayer::permissive())
            .with_state(state);

        let addr = format!("{host}:{port}");
        tracing::info!("server running at http://{addr}");

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::Server(e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| Error::Server(e.to_string()))?;

        Ok(())
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> (StatusCode, Json<ChatResponse>) {
    match state.chat.handle(&req.user_id, &req.message).await {
        Ok(response) => (
            StatusCode::OK,
            Json(ChatResponse {
                response,
                error: None,
            }),
        ),
        Err(e @ Error::Validation(_)) => (
            StatusCode::BAD_REQUEST,
            Json(ChatResponse {
                response: String::new(),
                error: Some(e.to_string()),
            }),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ChatResponse {
                response: String::new(),
                error: Some(e.to_string()),
            }),
        ),
    }
}
