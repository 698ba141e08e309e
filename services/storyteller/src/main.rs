use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use storyteller_core::{
    Emotion, HttpGenerationService, NoSpeech, RequestOrchestrator, SpeechCapability,
    SpeechPlayback, StorySession, Style,
};
use storyteller_service::app::{run_once, run_shell};
use storyteller_service::config::{self, Config};
use storyteller_service::speech::CommandSpeech;
use tokio::io::BufReader;
use tracing_subscriber::fmt::time::ChronoLocal;

#[derive(Parser)]
#[command(version, about = "Pick a mood and a style, get a story back.")]
struct Cli {
    /// Base URL of the generation service (overrides STORYTELLER_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Seconds to wait for a generation (overrides STORYTELLER_TIMEOUT_SECS)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Initial emotion
    #[arg(long)]
    emotion: Option<Emotion>,

    /// Initial style
    #[arg(long)]
    style: Option<Style>,

    /// Initial note
    #[arg(long)]
    note: Option<String>,

    /// Submit once, print the result and exit
    #[arg(long)]
    once: bool,

    /// With --once, read a successful result aloud
    #[arg(long, requires = "once")]
    speak: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // --- 1. Load Configuration ---
    let mut config = Config::from_env().context("Failed to load application configuration")?;

    // --- 2. Initialize Logging ---
    // Logs go to stderr so they don't mix with the rendered view.
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    // --- 3. Parse Command-Line Arguments ---
    let args = Cli::parse();
    if let Some(api_url) = &args.api_url {
        config::validate_url(api_url).context("Invalid --api-url")?;
        config.api_url = api_url.clone();
    }
    if let Some(secs) = args.timeout_secs {
        config.timeout = config::timeout_from_secs(secs).context("Invalid --timeout-secs")?;
    }
    tracing::info!(
        "Configuration loaded. Generation service: {} (timeout {:?})",
        config.api_url,
        config.timeout
    );

    // --- 4. Wire up the session ---
    let service = HttpGenerationService::new(config.api_url.clone(), config.timeout)?;
    if !service.is_available().await {
        tracing::warn!(
            "Generation service at {} is not answering; submits will fail until it is up",
            config.api_url
        );
    }
    let orchestrator = RequestOrchestrator::with_timeout(Arc::new(service), config.timeout);

    let command_speech = Arc::new(CommandSpeech::detect(&config.speech_command));
    let capability: Arc<dyn SpeechCapability> = if command_speech.is_available() {
        command_speech.clone()
    } else {
        Arc::new(NoSpeech)
    };
    let mut session = StorySession::new(orchestrator, SpeechPlayback::new(capability.clone()));

    if let Some(emotion) = args.emotion {
        session.select_emotion(emotion);
    }
    if let Some(style) = args.style {
        session.select_style(style);
    }
    if let Some(note) = &args.note {
        session.edit_note(note.clone());
    }

    let mut stdout = std::io::stdout();
    if args.once {
        let code = run_once(&mut session, args.speak, &mut stdout).await?;
        // Let a requested reading finish before the process exits.
        if let Err(e) = command_speech.finish().await {
            tracing::warn!("{:#}", e);
        }
        return Ok(code);
    }

    let result = run_shell(&mut session, BufReader::new(tokio::io::stdin()), &mut stdout).await;
    capability.cancel_all();
    tracing::info!("Shutting down...");
    result?;
    Ok(ExitCode::SUCCESS)
}
