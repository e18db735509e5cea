//! Herald bot entry point
//!
//! Run with:
//! ```bash
//! cargo run -p herald-bot
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

use herald_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Configuration comes first: the tracing preset depends on APP_ENV
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        guild_id = %config.discord.guild_id,
        interval_secs = config.scheduler.interval_secs,
        "Configuration loaded"
    );

    if let Err(e) = herald_bot::run(config).await {
        error!(error = %e, code = e.error_code(), "Bot stopped");
        std::process::exit(1);
    }
}
