use anyhow::Context;
use chirpy::{api::routes::create_router, cli::Cli, AppState, ChirpyConfig, DatabaseProvider};
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Secrets usually come from .env during development
    dotenvy::dotenv().ok();

    let config = ChirpyConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_filter(&config.server.log_level)));
    let json = config.server.log_json;
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();

    let secrets = config.secrets()?;

    let db = DatabaseProvider::from_url(&config.database.url)
        .create_client()
        .await
        .context("opening database")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(
        platform = %config.server.platform,
        database = %config.database.url,
        rotation_policy = ?config.auth.rotation_policy,
        "Starting Chirpy"
    );

    let state = AppState::new(config, db, &secrets.signing_secret, &secrets.api_key);
    let app = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Chirpy listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
