mod config;
mod error;
mod llm;
mod repl;
mod session;

use anyhow::Result;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::llm::GeminiClient;
use crate::session::ChatSession;

/// Config path used when no argument is given; missing is fine then
/// (built-in defaults apply and the key comes from the environment).
const DEFAULT_CONFIG_PATH: &str = "config/gemchat.toml";

fn print_help() {
    println!(
        "\
gemchat v{}

Interactive terminal chat client for the Google Gemini API.

USAGE:
    gemchat [OPTIONS] [CONFIG_PATH]

ARGUMENTS:
    CONFIG_PATH    Path to TOML configuration file [default: config/gemchat.toml]

OPTIONS:
    -h, --help       Print this help message and exit
    -V, --version    Print version and exit

ENVIRONMENT VARIABLES:
    Variables are referenced in the config file via ${{VAR_NAME}} syntax.

    RUST_LOG          Log level filter for tracing
                      (e.g. debug, gemchat=debug,warn)
    GEMINI_API_KEY    API key for the Gemini API
                      (from https://aistudio.google.com/apikey)

EXAMPLES:
    gemchat                       # uses config/gemchat.toml if present
    gemchat /etc/gemchat.toml     # custom config path
    RUST_LOG=debug gemchat        # with debug logging",
        env!("CARGO_PKG_VERSION"),
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle --help / --version before anything else
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--version" | "-V" => {
                println!("gemchat v{}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {}
        }
    }

    // Logs go to stderr: stdout is the chat transcript
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gemchat=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load configuration; the default path is optional, an explicit one is not
    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from {path}");
            Config::load(&path)?
        }
        None if std::path::Path::new(DEFAULT_CONFIG_PATH).exists() => {
            info!("Loading configuration from {DEFAULT_CONFIG_PATH}");
            Config::load(DEFAULT_CONFIG_PATH)?
        }
        None => Config::default(),
    };

    // Fail fast: no credential means no session
    let api_key = config.resolve_api_key()?;

    let model = GeminiClient::new(config.llm.clone(), api_key)?;
    let mut session = ChatSession::new(Box::new(model));

    info!("Model: {}", session.model_description());
    info!("Request timeout: {}", config.timeout_description());

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    tokio::select! {
        result = repl::run(&mut session, stdin, stdout) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, exiting");
            Ok(())
        }
    }
}
