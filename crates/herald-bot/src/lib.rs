//! # herald-bot
//!
//! Discord side of the reconciler: gateway events, slash commands, the
//! serenity-backed guild platform, the timer trigger and the health endpoint.

pub mod commands;
pub mod handler;
pub mod health;
pub mod platform;
pub mod roles;
pub mod scheduler;
pub mod state;

pub use handler::Handler;
pub use platform::SerenityGuild;
pub use scheduler::Scheduler;
pub use state::{BotState, RuntimeStatus};

use std::sync::Arc;

use serenity::all::GatewayIntents;
use serenity::http::Http;
use serenity::Client;
use tracing::{error, info, warn};

use herald_common::{AppConfig, AppError};
use herald_core::{LinkRepository, NicknameHistoryRepository, ReconcileEngine, ReconcilePolicy};
use herald_db::{
    InMemoryLinkRepository, InMemoryNicknameHistoryRepository, PgLinkRepository,
    PgNicknameHistoryRepository, PgPool,
};
use herald_helix::{HelixClient, HelixConfig};
use herald_service::{ActivityMatcher, ActivityObserver, ServiceContext, ServiceContextBuilder};

type Stores = (
    Arc<dyn LinkRepository>,
    Arc<dyn NicknameHistoryRepository>,
    Option<PgPool>,
);

/// Open the PostgreSQL store, or fall back to the in-memory one
async fn open_stores(config: &AppConfig) -> Result<Stores, AppError> {
    let Some(db) = &config.database else {
        warn!("DATABASE_URL not set; links and nickname history will not survive a restart");
        return Ok((
            Arc::new(InMemoryLinkRepository::new()),
            Arc::new(InMemoryNicknameHistoryRepository::new()),
            None,
        ));
    };

    info!("Connecting to PostgreSQL...");
    let pool = herald_db::create_pool(&herald_db::DatabaseConfig::from(db))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    herald_db::ensure_schema(&pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    Ok((
        Arc::new(PgLinkRepository::new(pool.clone())),
        Arc::new(PgNicknameHistoryRepository::new(pool.clone())),
        Some(pool),
    ))
}

/// Resolve guild roles and wire every dependency into `BotState`
pub async fn create_bot_state(config: &AppConfig, http: Arc<Http>) -> Result<BotState, AppError> {
    let guild_id = config.discord.guild_id;
    let roles = roles::resolve_roles(&http, guild_id, &config.roles).await?;

    let (link_repo, history_repo, pool) = open_stores(config).await?;

    let helix = HelixClient::new(HelixConfig::from(&config.twitch))
        .map_err(|e| AppError::ExternalService(e.to_string()))?;

    let policy = ReconcilePolicy::new(roles.streaming, roles.activity)
        .with_decorator(config.tracking.decorator())
        .with_composition(config.tracking.composition());

    let services: ServiceContext = ServiceContextBuilder::new()
        .link_repo(link_repo)
        .history_repo(history_repo)
        .platform(Arc::new(SerenityGuild::new(Arc::clone(&http), guild_id)))
        .probe(Arc::new(helix))
        .engine(ReconcileEngine::new(policy))
        .observer(Arc::new(ActivityObserver::new(ActivityMatcher::new(
            &config.tracking.tracked_activity,
        ))))
        .live_filter(config.tracking.activity_filter())
        .member_spacing(config.scheduler.member_spacing())
        .build()?;

    Ok(BotState::new(services, guild_id, RuntimeStatus::new(pool)))
}

/// Run the bot until the gateway connection ends
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    info!("Starting Herald bot...");

    let http = Arc::new(Http::new(&config.discord.token));
    let state = create_bot_state(&config, http).await?;

    Scheduler::new(
        state.services_handle(),
        config.scheduler.interval(),
        state.runtime().clone(),
    )
    .spawn();

    if let Some(health) = config.health.clone() {
        let runtime = state.runtime().clone();
        tokio::spawn(async move {
            if let Err(e) = health::serve(&health, runtime).await {
                error!(error = %e, "Health endpoint stopped");
            }
        });
    }

    let intents =
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MEMBERS | GatewayIntents::GUILD_PRESENCES;
    let runtime = state.runtime().clone();
    let mut client = Client::builder(&config.discord.token, intents)
        .event_handler(Handler::new(state))
        .await
        .map_err(|e| AppError::Platform(format!("Failed to create gateway client: {e}")))?;

    let result = client.start().await;
    runtime.set_gateway_connected(false);
    result.map_err(|e| AppError::Platform(format!("Gateway client error: {e}")))
}
