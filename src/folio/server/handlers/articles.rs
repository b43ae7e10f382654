//! Article CRUD and listings.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::commands::ListQuery;
use crate::hybrid::{find_in_sources, merge_sources, ArticleSource};
use crate::model::{Article, ArticlePatch, ArticleStatus, NewArticle};
use crate::reconcile::SortBy;
use crate::server::{ApiError, ApiResult, AppState};
use crate::store::DataStore;

/// Listing query string. `sortBy` and `sort` are synonyms.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub sort_by: Option<String>,
    pub sort: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
}

impl ListParams {
    fn into_query(self) -> ApiResult<ListQuery> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(raw) => Some(
                raw.parse::<ArticleStatus>()
                    .map_err(ApiError::BadRequest)?,
            ),
        };
        Ok(ListQuery {
            sort: SortBy::parse_lenient(self.sort_by.as_deref().or(self.sort.as_deref())),
            category: self.category.filter(|c| !c.trim().is_empty() && c != "all"),
            status,
        })
    }
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
    pub article: Article,
}

pub async fn list<S: DataStore + Send + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Article>>> {
    let query = params.into_query()?;
    let api = state.api.lock().await;
    let result = api.list_articles(&query)?;
    Ok(Json(result.listed_articles))
}

/// Local articles followed by the remote source's. Never fails: a source that
/// errors or times out just contributes nothing.
pub async fn hybrid<S: DataStore + Send + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<Vec<Article>> {
    let local = state.local_source();
    let remote = state.remote.as_ref().map(|r| r as &dyn ArticleSource);
    let merged = merge_sources(&local, remote, state.remote_timeout()).await;
    Json(merged.articles)
}

pub async fn get_one<S: DataStore + Send + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Article>> {
    let local = state.local_source();
    let remote = state.remote.as_ref().map(|r| r as &dyn ArticleSource);
    match find_in_sources(&local, remote, &id, state.remote_timeout()).await? {
        Some(article) => Ok(Json(article)),
        None => Err(ApiError::NotFound(format!("Article not found: {}", id))),
    }
}

pub async fn create<S: DataStore + Send + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(input): Json<NewArticle>,
) -> ApiResult<(StatusCode, Json<Article>)> {
    let mut api = state.api.lock().await;
    let mut result = api.create_article(input)?;
    let article = result
        .affected_articles
        .pop()
        .ok_or_else(|| ApiError::BadRequest("Nothing was created".into()))?;
    Ok((StatusCode::CREATED, Json(article)))
}

pub async fn update<S: DataStore + Send + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(patch): Json<ArticlePatch>,
) -> ApiResult<Json<Article>> {
    let mut api = state.api.lock().await;
    let mut result = api.update_article(&id, patch)?;
    result
        .affected_articles
        .pop()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Article not found: {}", id)))
}

pub async fn remove<S: DataStore + Send + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let mut api = state.api.lock().await;
    let mut result = api.delete_article(&id)?;
    let article = result
        .affected_articles
        .pop()
        .ok_or_else(|| ApiError::NotFound(format!("Article not found: {}", id)))?;
    Ok(Json(DeleteResponse {
        success: true,
        message: format!("Article deleted: {}", article.title),
        article,
    }))
}
