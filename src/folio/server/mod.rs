//! HTTP surface for the editor front end and the automation webhook.
//!
//! Handlers translate requests into [`FolioApi`] calls and serialize the
//! resulting [`crate::commands::CmdResult`]; they hold no business logic.
//! The API sits behind a `tokio` mutex, so writes are serialized within the
//! process.

pub mod error;
pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api::FolioApi;
use crate::config::FolioConfig;
use crate::hybrid::LocalSource;
use crate::remote::RemoteSource;
use crate::store::DataStore;

pub use error::{ApiError, ApiResult};

/// Room for multipart boundaries and headers on top of the upload ceiling.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared state for API handlers.
pub struct AppState<S: DataStore> {
    pub api: Arc<Mutex<FolioApi<S>>>,
    /// Remote source merged into hybrid listings, when configured.
    pub remote: Option<RemoteSource>,
    pub config: FolioConfig,
}

impl<S: DataStore> AppState<S> {
    pub fn new(api: FolioApi<S>, config: FolioConfig) -> Self {
        let remote = config.remote_url.as_ref().map(|url| {
            RemoteSource::new(
                url.clone(),
                config.remote_name.clone(),
                Duration::from_secs(config.remote_timeout_secs),
            )
        });
        Self {
            api: Arc::new(Mutex::new(api)),
            remote,
            config,
        }
    }

    pub fn with_remote(mut self, remote: Option<RemoteSource>) -> Self {
        self.remote = remote;
        self
    }

    pub fn local_source(&self) -> LocalSource<S> {
        LocalSource::new(Arc::clone(&self.api))
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.config.remote_timeout_secs)
    }
}

/// Build the API router with all routes.
pub fn router<S>(state: Arc<AppState<S>>, upload_dir: std::path::PathBuf) -> Router
where
    S: DataStore + Send + 'static,
{
    use handlers::{articles, order, status, upload, webhook};

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD;

    Router::new()
        .route("/api/health", get(status::health))
        // Articles. Static segments win over /:id.
        .route(
            "/api/articles",
            get(articles::list::<S>).post(articles::create::<S>),
        )
        .route("/api/articles/hybrid", get(articles::hybrid::<S>))
        .route("/api/articles/reorder", post(order::save::<S>))
        .route(
            "/api/articles/:id",
            get(articles::get_one::<S>)
                .put(articles::update::<S>)
                .delete(articles::remove::<S>),
        )
        .route(
            "/api/articles-order",
            get(order::current::<S>).put(order::save::<S>),
        )
        // Uploads
        .route("/api/upload", post(upload::create::<S>))
        .route("/api/upload/:filename", delete(upload::remove::<S>))
        // Automation webhook
        .route("/api/n8n/health", get(webhook::health::<S>))
        .route("/api/n8n/articles/pending", get(webhook::pending::<S>))
        .route(
            "/api/n8n/articles/category/:category",
            get(webhook::by_category::<S>),
        )
        .route(
            "/api/n8n/articles/ai-generated",
            post(webhook::ai_generated::<S>),
        )
        .route("/api/n8n/articles/scraped", post(webhook::scraped::<S>))
        .route(
            "/api/n8n/articles/:id/publish-status",
            put(webhook::publish_status::<S>),
        )
        .nest_service("/uploads", ServeDir::new(upload_dir))
        // Middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                .on_request(())
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: Duration,
                     _span: &tracing::Span| {
                        let status = response.status();
                        if status.is_success() {
                            tracing::debug!(%status, latency_ms = latency.as_millis(), "request served");
                        } else {
                            tracing::warn!(%status, latency_ms = latency.as_millis(), "request failed");
                        }
                    },
                ),
        )
        .with_state(state)
}

/// Start the API server.
pub async fn serve<S>(state: Arc<AppState<S>>, bind_addr: &str) -> anyhow::Result<()>
where
    S: DataStore + Send + 'static,
{
    let upload_dir = {
        let api = state.api.lock().await;
        api.uploads().ensure_dir()?;
        api.paths().upload_dir.clone()
    };
    let app = router(state, upload_dir);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;

    tracing::info!("Folio API listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
