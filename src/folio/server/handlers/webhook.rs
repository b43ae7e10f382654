//! Endpoints for the external automation tool (n8n).
//!
//! When a webhook token is configured every request must carry
//! `Authorization: Bearer <token>`; without one the endpoints are open.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::commands::ArticleStats;
use crate::config::FolioConfig;
use crate::model::{Article, NewArticle, PublishStatusUpdate};
use crate::server::{ApiError, ApiResult, AppState};
use crate::store::DataStore;

#[derive(Serialize)]
pub struct ArticlesResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub count: usize,
    pub articles: Vec<Article>,
}

impl ArticlesResponse {
    fn new(category: Option<String>, articles: Vec<Article>) -> Self {
        Self {
            success: true,
            category,
            count: articles.len(),
            articles,
        }
    }
}

#[derive(Serialize)]
pub struct ArticleResponse {
    pub success: bool,
    pub article: Article,
    pub message: String,
}

#[derive(Serialize)]
pub struct WebhookHealth {
    pub success: bool,
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub stats: ArticleStats,
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryParams {
    pub limit: Option<usize>,
}

fn authorize(config: &FolioConfig, headers: &HeaderMap) -> ApiResult<()> {
    let Some(token) = config.webhook_token.as_deref() else {
        return Ok(());
    };
    let presented = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    if presented == Some(token) {
        Ok(())
    } else {
        tracing::warn!("webhook call rejected: bad or missing token");
        Err(ApiError::Unauthorized)
    }
}

fn single(
    mut result: crate::commands::CmdResult,
    message: &str,
) -> ApiResult<Json<ArticleResponse>> {
    let article = result
        .affected_articles
        .pop()
        .ok_or_else(|| ApiError::BadRequest("Nothing was written".into()))?;
    Ok(Json(ArticleResponse {
        success: true,
        article,
        message: message.to_string(),
    }))
}

pub async fn pending<S: DataStore + Send + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> ApiResult<Json<ArticlesResponse>> {
    authorize(&state.config, &headers)?;
    let api = state.api.lock().await;
    let result = api.pending_articles()?;
    tracing::info!(count = result.listed_articles.len(), "webhook: pending articles");
    Ok(Json(ArticlesResponse::new(None, result.listed_articles)))
}

pub async fn by_category<S: DataStore + Send + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(category): Path<String>,
    Query(params): Query<CategoryParams>,
) -> ApiResult<Json<ArticlesResponse>> {
    authorize(&state.config, &headers)?;
    let api = state.api.lock().await;
    let result = api.category_sample(&category, params.limit)?;
    tracing::info!(%category, count = result.listed_articles.len(), "webhook: category sample");
    Ok(Json(ArticlesResponse::new(
        Some(category),
        result.listed_articles,
    )))
}

pub async fn ai_generated<S: DataStore + Send + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(input): Json<NewArticle>,
) -> ApiResult<Json<ArticleResponse>> {
    authorize(&state.config, &headers)?;
    let mut api = state.api.lock().await;
    single(api.ingest_ai_article(input)?, "AI article created")
}

pub async fn scraped<S: DataStore + Send + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(input): Json<NewArticle>,
) -> ApiResult<Json<ArticleResponse>> {
    authorize(&state.config, &headers)?;
    let mut api = state.api.lock().await;
    single(api.ingest_scraped_article(input)?, "Scraped article created")
}

pub async fn publish_status<S: DataStore + Send + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(update): Json<PublishStatusUpdate>,
) -> ApiResult<Json<ArticleResponse>> {
    authorize(&state.config, &headers)?;
    let mut api = state.api.lock().await;
    single(
        api.set_publish_status(&id, update)?,
        "Publish status updated",
    )
}

pub async fn health<S: DataStore + Send + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> ApiResult<Json<WebhookHealth>> {
    authorize(&state.config, &headers)?;
    let api = state.api.lock().await;
    let stats = api.stats()?.stats.unwrap_or_default();
    Ok(Json(WebhookHealth {
        success: true,
        status: "healthy",
        timestamp: Utc::now(),
        stats,
    }))
}
