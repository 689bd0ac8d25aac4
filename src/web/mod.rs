//! HTTP surface: axum router, shared state and server bootstrap.

pub mod error;
pub mod flash;
pub mod forms;
pub mod handlers;
pub mod render;
pub mod static_files;

use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use axum::Router;
use axum::routing::get;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// State shared across handlers: one connection, one writer at a time.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<DbPool>>,
    static_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(pool: DbPool, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            db: Arc::new(Mutex::new(pool)),
            static_dir: Arc::new(static_dir.into()),
        }
    }

    /// Lock the database for one unit of work. Never hold the guard across an await.
    /// A lock poisoned by a panicking request is recovered: any open transaction
    /// was rolled back when it was dropped.
    pub fn db(&self) -> AppResult<MutexGuard<'_, DbPool>> {
        match self.db.lock() {
            Ok(guard) => Ok(guard),
            Err(poisoned) => {
                warn!("recovering database lock poisoned by a failed request");
                self.db.clear_poison();
                Ok(poisoned.into_inner())
            }
        }
    }

    pub fn static_dir(&self) -> &PathBuf {
        &self.static_dir
    }
}

/// Build the router with all routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home).post(handlers::home_post))
        .route("/logs", get(handlers::logs))
        .route("/delete/{id}", get(handlers::delete_entry))
        .route(
            "/settings",
            get(handlers::settings).post(handlers::settings_post),
        )
        .route("/calendar", get(handlers::calendar))
        .route("/tags", get(handlers::tags).post(handlers::tags_post))
        .route("/tags/delete/{id}", get(handlers::tag_delete))
        .route("/tags/color/{id}", get(handlers::tag_color))
        .route("/static/{*path}", get(handlers::static_file))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Open (and migrate) the database, then serve until Ctrl-C.
pub async fn serve(cfg: &Config) -> AppResult<()> {
    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;

    let state = AppState::new(pool, &cfg.static_dir);
    let app = router(state);

    let addr = format!("{}:{}", cfg.bind_address, cfg.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(database = %cfg.database, "listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
}
