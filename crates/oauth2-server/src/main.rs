//! OAuth 2.0 Authorization Server - Entry Point

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use oauth2_server::{config::Config, server::AuthServer};

#[derive(Parser, Debug)]
#[command(name = "oauth2-server")]
#[command(about = "OAuth 2.0 authorization server (Authorization Code Grant)")]
#[command(version)]
struct Cli {
    /// HS256 secret for signing access tokens (at least 32 bytes)
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// HTTP server port
    #[arg(long, default_value = "3000", env = "PORT")]
    port: u16,

    /// Public base URL used as issuer (e.g., https://auth.example.com)
    #[arg(long, env = "BASE_URL")]
    base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env must be loaded before clap reads env-backed arguments
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        dotenv = dotenv_loaded,
        "Starting OAuth 2.0 authorization server"
    );

    let config = Config::new(cli.jwt_secret, cli.base_url, cli.port)?;
    tracing::info!(port = config.port, base_url = %config.base_url, "Running in HTTP mode");

    AuthServer::new(config).run_http().await
}
