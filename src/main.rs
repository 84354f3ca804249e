use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use persona_relay::completion::{ChatCompletion, GroqClient};
use persona_relay::config::{Cli, Config};
use persona_relay::persona::Persona;
use persona_relay::server::api::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments.
    let cli = Cli::parse();

    // Pick up GROQ_API_KEY and friends from a local .env, if there is one.
    let dotenv_path = dotenvy::dotenv().ok();

    // Initialize tracing/logging.
    let filter = if cli.verbose {
        "persona_relay=debug,tower_http=debug"
    } else {
        "persona_relay=info,tower_http=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());

    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }

    info!("persona-relay v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = dotenv_path {
        info!(path = %path.display(), "Loaded environment file");
    }

    // Load configuration.
    let mut config = Config::load(&cli.config)?;
    config.apply_env();
    if let Some(listen) = cli.listen {
        config.server.listen = listen;
    }

    if !config.has_api_key() {
        error!("GROQ_API_KEY is missing from the environment and .env file; completion requests will fail");
    }

    info!(
        base_url = config.completion.base_url,
        model = config.completion.model,
        temperature = config.completion.temperature,
        timeout_secs = ?config.completion.timeout_secs,
        "Configuration loaded"
    );

    // Initialize the completion client.
    let completer: Arc<dyn ChatCompletion> = Arc::new(GroqClient::new(&config.completion)?);

    // Build the HTTP router.
    let app = build_router(Arc::new(AppState::new(completer)));

    for persona in Persona::ALL {
        info!(%persona, route = persona.route(), "Persona mounted");
    }

    // Start the server.
    let listen_addr = config.server.listen;
    info!(addr = listen_addr, "Starting server");

    let listener = TcpListener::bind(&listen_addr).await?;
    info!("Listening on {listen_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
