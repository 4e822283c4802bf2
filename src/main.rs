use axum::serve;
use chili_hybrid_db::api::routes::create_router;
use chili_hybrid_db::config::AppConfig;
use chili_hybrid_db::store::SqliteStore;
use chili_hybrid_db::{build_state, load_model, seed};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with explicit filter to suppress sqlx debug logs
    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("sqlx", LevelFilter::Warn)
        .parse_default_env()
        .init();

    log::info!("Chili Hybrid DB: hybrid combinations explorer");

    let config = AppConfig::load()?;
    log::info!(
        "Configuration loaded: server={}:{}",
        config.server.host,
        config.server.port
    );

    let database_url = config.database_url();
    log::info!("Opening hybrids table at {}", database_url);
    let sqlite_store = SqliteStore::new(&database_url, config.max_connections()).await?;
    sqlite_store.migrate().await?;

    let store = Arc::new(sqlite_store);

    // Load seed data for demonstration (optional)
    if std::env::var("LOAD_SEED_DATA").unwrap_or_default() == "true" {
        let inserted = seed::load_seed_data(&*store).await?;
        log::info!("Seed data loaded: {} hybrids", inserted);
    }

    // Missing or broken artifacts only disable scoring
    let model = load_model(&config.model_path());
    let state = build_state(store, model, &config);

    run_server(create_router().with_state(state), &config).await?;

    Ok(())
}

async fn run_server(app: axum::Router, config: &AppConfig) -> anyhow::Result<()> {
    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("Chili Hybrid DB running on http://{}", bind_address);

    serve(listener, app).await?;

    Ok(())
}
