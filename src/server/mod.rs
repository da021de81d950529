//! JSON HTTP API over the tracker.

use axum::{Router, routing::get};
use std::sync::{Arc, Mutex, PoisonError};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::tracker::{Tracker, TrackerError};

pub mod error;
pub mod routes;

pub use error::ApiError;

/// Shared handler state.
///
/// The single SQLite connection sits behind a mutex. Store work runs on the
/// blocking pool and holds the lock only for its own duration.
#[derive(Clone)]
pub struct AppState {
    tracker: Arc<Mutex<Tracker>>,
}

impl AppState {
    pub fn new(tracker: Tracker) -> Self {
        Self {
            tracker: Arc::new(Mutex::new(tracker)),
        }
    }

    /// Run `f` against the tracker on the blocking pool, mapping its error
    /// into an API error. A lock poisoned by an earlier panic is recovered.
    pub async fn with_tracker<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&Tracker) -> Result<T, TrackerError> + Send + 'static,
    {
        let tracker = Arc::clone(&self.tracker);
        let result = tokio::task::spawn_blocking(move || {
            let tracker = tracker.lock().unwrap_or_else(PoisonError::into_inner);
            f(&tracker)
        })
        .await
        .map_err(|e| ApiError::Internal(format!("tracker task failed: {}", e)))?;
        Ok(result?)
    }
}

async fn root() -> &'static str {
    "Zenflow backend is running"
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::habits::router())
        .merge(routes::tasks::router())
        .merge(routes::notes::router())
        .merge(routes::stats::router());

    Router::new()
        .route("/", get(root))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C
pub async fn serve(state: AppState, addr: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "failed to listen for shutdown signal");
            }
            tracing::info!("shutting down");
        })
        .await
}
