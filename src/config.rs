//! Runtime configuration for persona-relay.
//!
//! Configuration is loaded from an optional JSON file and then overlaid with
//! environment variables (`GROQ_API_KEY`, `PORT`). Every field has a default,
//! so an empty or absent file yields a working server.

use std::env;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

/// Default Groq model for every persona.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Sampling temperature sent with every completion.
pub const DEFAULT_TEMPERATURE: f64 = 0.9;

/// Groq's OpenAI-compatible API root.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "persona-relay", about = "Persona chat relay in front of a Groq model")]
pub struct Cli {
    /// Path to configuration file (JSON).
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// HTTP listen address, overrides the config file and `PORT`.
    #[arg(long)]
    pub listen: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub json_logs: bool,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,

    /// Upstream chat-completion configuration.
    pub completion: CompletionConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address (e.g. "0.0.0.0:5000").
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:5000".to_string(),
        }
    }
}

/// Settings for the remote chat-completion API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// API root; `/chat/completions` is appended.
    pub base_url: String,

    /// Model identifier.
    pub model: String,

    /// Sampling temperature.
    pub temperature: f64,

    /// Bearer token. Usually supplied through `GROQ_API_KEY`.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds. Unset means wait indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            api_key: None,
            timeout_secs: None,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let data = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&data)?;
            Ok(config)
        } else {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            Ok(Config::default())
        }
    }

    /// Overlay `GROQ_API_KEY` and `PORT` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(env::var("GROQ_API_KEY").ok(), env::var("PORT").ok());
    }

    fn apply_overrides(&mut self, api_key: Option<String>, port: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.completion.api_key = Some(key);
        }

        if let Some(port) = port.and_then(|p| p.trim().parse::<u16>().ok()) {
            self.server.listen = with_port(&self.server.listen, port);
        }
    }

    /// Whether a usable API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.completion
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }
}

/// Replace the port of a listen address, keeping the host.
///
/// Accepts `host:port`, a bare `host`, and bracketed IPv6 (`[::1]` or
/// `[::1]:port`). An empty host becomes `0.0.0.0`.
fn with_port(listen: &str, port: u16) -> String {
    let listen = listen.trim();
    let host = if listen.starts_with('[') {
        match listen.find(']') {
            Some(end) => &listen[..=end],
            None => "",
        }
    } else {
        match listen.rsplit_once(':') {
            Some((host, _)) => host,
            None => listen,
        }
    };

    if host.is_empty() {
        format!("0.0.0.0:{port}")
    } else {
        format!("{host}:{port}")
    }
}
