use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use friend_ai::api::{AppState, api_routes};
use friend_ai::companion::{CompanionConfig, CompanionEngine};
use friend_ai::config::AppConfig;
use friend_ai::llm::create_provider;
use friend_ai::persona::seed_default_personas;
use friend_ai::pipeline::{DemoPostSource, SnsMonitor};
use friend_ai::sentiment::{AnalyzerConfig, SentimentAnalyzer};
use friend_ai::store::{Database, LibSqlBackend};

/// Console logging always; a daily rolling file too when `log_dir` is set.
fn init_tracing(config: &AppConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "friend-ai.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(file_layer)
        .init();

    guard
}

/// Open the store, seed personas and wire the services into the router.
async fn build_app(config: &AppConfig) -> friend_ai::error::Result<Router> {
    let llm = create_provider(&config.llm)?;

    // ── Database ─────────────────────────────────────────────────────────
    let db: Arc<dyn Database> = Arc::new(LibSqlBackend::new_local(&config.db_path).await?);
    eprintln!("   Database: {}", config.db_path.display());

    let seeded = seed_default_personas(db.as_ref()).await?;
    if seeded > 0 {
        eprintln!("   Personas: seeded {seeded} defaults");
    }

    // ── Services ─────────────────────────────────────────────────────────
    let analyzer = Arc::new(SentimentAnalyzer::new(
        Arc::clone(&llm),
        AnalyzerConfig {
            timeout: config.sentiment_timeout,
            ..AnalyzerConfig::default()
        },
    ));
    let companion = Arc::new(CompanionEngine::new(
        Arc::clone(&llm),
        CompanionConfig::default(),
    ));
    let monitor = Arc::new(SnsMonitor::new(
        Arc::clone(&db),
        analyzer,
        Arc::clone(&companion),
        Arc::new(DemoPostSource::default()),
    ));

    Ok(api_routes(AppState {
        db,
        companion,
        monitor,
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    let _log_guard = init_tracing(&config);

    eprintln!("💬 Friend AI v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.llm.model);
    eprintln!("   API: http://0.0.0.0:{}/api", config.port);

    let app = build_app(&config)
        .await
        .context("failed to start services")?;

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("failed to bind port {}", config.port))?;
    tracing::info!(port = config.port, "HTTP server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await
        .context("server error")?;

    Ok(())
}
