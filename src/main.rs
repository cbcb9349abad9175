use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use openschool::logging::init_tracing;
use openschool::metrics::init_metrics;
use openschool::router::init_router;
use openschool::state::AppState;
use openschool_auth::verifier_from_config;
use openschool_cli::seeder;
use openschool_config::{AuthConfig, CorsConfig, DatabaseConfig, ServerConfig};
use openschool_db::{MemoryStore, PgStore, Store, init_db_pool, run_migrations};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "openschool")]
#[command(about = "OpenSchool API server", long_about = None)]
struct Args {
    /// Seed the fixture schools and students at startup
    #[arg(long)]
    seed: bool,

    /// Clear all data before seeding (implies --seed)
    #[arg(long)]
    reset: bool,
}

async fn init_store(config: &DatabaseConfig) -> anyhow::Result<Arc<dyn Store>> {
    if config.url.is_none() {
        warn!("DATABASE_URL not set, using the in-memory store (data is lost on restart)");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let pool = init_db_pool(config).await?;
    run_migrations(&pool).await?;
    info!("Connected to PostgreSQL and applied migrations");

    Ok(Arc::new(PgStore::new(pool)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let args = Args::parse();

    init_tracing();

    let server_config = ServerConfig::from_env();
    let auth_config = AuthConfig::from_env();

    let store = init_store(&DatabaseConfig::from_env()).await?;
    let verifier = verifier_from_config(&auth_config)?;

    if args.reset {
        let summary = seeder::reset_and_seed(store.as_ref()).await?;
        info!(schools = summary.schools, students = summary.students, "Store reset and seeded");
    } else if args.seed {
        let summary = seeder::seed_fixtures(store.as_ref())
            .await
            .context("Seeding failed (already seeded? use --reset)")?;
        info!(schools = summary.schools, students = summary.students, "Store seeded");
    }

    let metrics = if server_config.metrics_enabled {
        Some(init_metrics()?)
    } else {
        None
    };

    let state = AppState::new(store, verifier, CorsConfig::from_env());
    let app = init_router(state, metrics);

    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    info!(address = %address, "🚀 Server running");
    info!("📖 Scalar UI available at http://{address}/scalar");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
