use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reactiondash::{
    config::Config,
    error::StartupError,
    game::ReactionGame,
    hardware::{RandomDelay, SimulatedPanel, SystemClock},
    router,
    runtime::{spawn_game_loop, GameLoop},
    state::AppState,
};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reactiondash=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    tracing::info!("Starting reaction test...");

    let config = Config::from_env()?;
    tracing::info!(
        "Delay range {}..={} ms, leaderboard size {}, polling every {:?}",
        config.delay.min,
        config.delay.max,
        config.leaderboard_size,
        config.poll_interval
    );

    let panel = Arc::new(SimulatedPanel::new());
    let (state, commands) = AppState::new(config.broadcast_capacity, panel.clone());
    let state = Arc::new(state);

    let game = ReactionGame::new(
        panel.clone(),
        RandomDelay::from_entropy(),
        config.delay,
        config.leaderboard_size,
    );
    let game_loop = GameLoop::new(
        game,
        SystemClock::new(),
        panel,
        commands,
        state.broadcast.clone(),
    );
    spawn_game_loop(game_loop, config.poll_interval);

    let app = router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|source| StartupError::Bind {
            addr: config.bind,
            source,
        })?;
    tracing::info!("Listening on http://{}", config.bind);

    axum::serve(listener, app).await?;
    Ok(())
}
