// command line interface

use crate::Server;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "arogya", about = "Conversational AI health assistant backend")]
struct Cli {
    /// database connection url
    #[arg(long, short, env = "DATABASE_URL", default_value = "sqlite://arogya.db")]
    db: String,

    /// gemini api key
    #[arg(long, short = 'k', env = "GEMINI_API_KEY")]
    api_key: Option<String>,

    /// host to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// port number
    #[arg(long, short, default_value = "8000")]
    port: u16,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("arogya=info")),
        )
        .init();

    Server::run(&cli.db, &cli.host, cli.port, cli.api_key)
        .await
        .into_diagnostic()
}
