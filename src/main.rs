use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use vocal_assistant::google::{self, GeminiClient, SpeechClient, TextToSpeechClient, TokenProvider};
use vocal_assistant::{create_router, AppState, Assistant, Config, ConversationHistory};

#[derive(Parser)]
#[command(name = "vocal-assistant")]
#[command(about = "Voice assistant backend: speech to text, answers, text to speech")]
struct Args {
    /// Config file (extension optional)
    #[arg(short, long, default_value = "config/vocal-assistant")]
    config: String,

    /// Listen port, overrides PORT and the config file
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Deployments keep credentials in a .env file; real env vars win
    let dotenv_path = dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut cfg = Config::load(&args.config)?;
    if let Some(port) = args.port {
        cfg.service.http.port = port;
    }

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    if let Some(path) = dotenv_path {
        info!("Loaded environment from {}", path.display());
    }

    let http_client = reqwest::Client::new();

    // Credentials are resolved once and shared by the Speech and TTS clients
    let key = google::resolve_credentials(&cfg.google)?;
    let tokens = Arc::new(TokenProvider::new(key, http_client.clone())?);
    info!("Speech and Text-to-Speech authenticate as {}", tokens.client_email());

    let api_key = cfg
        .generation
        .api_key
        .clone()
        .context("GENAI_API_KEY is not set")?;

    let transcriber = Arc::new(SpeechClient::new(
        cfg.google.speech.clone(),
        Arc::clone(&tokens),
        http_client.clone(),
    ));
    let generator = Arc::new(GeminiClient::new(&cfg.generation, api_key, http_client.clone()));
    let synthesizer = Arc::new(TextToSpeechClient::new(
        cfg.google.synthesis.clone(),
        Arc::clone(&tokens),
        http_client,
    ));

    let history = Arc::new(ConversationHistory::with_limit(cfg.conversation.max_exchanges));
    match history.max_exchanges() {
        Some(max) => info!("Conversation history keeps the last {} exchange(s)", max),
        None => info!("Conversation history is unbounded"),
    }

    let assistant = Arc::new(Assistant::new(transcriber, generator, synthesizer, history));
    let state = AppState::new(assistant, cfg.service.http.max_upload_bytes);
    let app = create_router(state);

    let addr = cfg.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on {}", addr);
    info!("Generation model: {}", cfg.generation.model);

    axum::serve(listener, app).await.context("HTTP server error")?;

    Ok(())
}
