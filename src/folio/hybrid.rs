//! Merged listings across the local store and an optional remote source.
//!
//! The merge always answers. Each source is fetched concurrently under a
//! timeout, and a source that fails or times out simply contributes nothing.
//! Local articles come first, and every article is tagged with the name of
//! the source it came from.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::api::FolioApi;
use crate::commands::ListQuery;
use crate::error::{FolioError, Result};
use crate::model::Article;
use crate::store::DataStore;

pub const LOCAL_SOURCE: &str = "local";

#[async_trait]
pub trait ArticleSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_articles(&self) -> Result<Vec<Article>>;

    /// `Ok(None)` when the source has no article with that id.
    async fn fetch_article(&self, id: &str) -> Result<Option<Article>>;
}

/// The local store seen as a source: its custom-ordered listing.
pub struct LocalSource<S: DataStore> {
    api: Arc<Mutex<FolioApi<S>>>,
}

impl<S: DataStore> LocalSource<S> {
    pub fn new(api: Arc<Mutex<FolioApi<S>>>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<S> ArticleSource for LocalSource<S>
where
    S: DataStore + Send + 'static,
{
    fn name(&self) -> &str {
        LOCAL_SOURCE
    }

    async fn fetch_articles(&self) -> Result<Vec<Article>> {
        let api = self.api.lock().await;
        Ok(api.list_articles(&ListQuery::default())?.listed_articles)
    }

    async fn fetch_article(&self, id: &str) -> Result<Option<Article>> {
        let api = self.api.lock().await;
        match api.get_article(id) {
            Ok(mut result) => Ok(result.affected_articles.pop()),
            Err(FolioError::ArticleNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MergedListing {
    pub articles: Vec<Article>,
    pub local_count: usize,
    pub remote_count: usize,
}

pub async fn merge_sources(
    local: &dyn ArticleSource,
    remote: Option<&dyn ArticleSource>,
    timeout: Duration,
) -> MergedListing {
    let (local_articles, remote_articles) = tokio::join!(
        fetch_or_empty(local, timeout),
        async {
            match remote {
                Some(source) => fetch_or_empty(source, timeout).await,
                None => Vec::new(),
            }
        }
    );

    let local_count = local_articles.len();
    let remote_count = remote_articles.len();
    let mut articles = local_articles;
    articles.extend(remote_articles);

    tracing::debug!(local_count, remote_count, "hybrid listing merged");
    MergedListing {
        articles,
        local_count,
        remote_count,
    }
}

async fn fetch_or_empty(source: &dyn ArticleSource, timeout: Duration) -> Vec<Article> {
    match tokio::time::timeout(timeout, source.fetch_articles()).await {
        Ok(Ok(articles)) => tag(articles, source.name()),
        Ok(Err(e)) => {
            tracing::warn!(source = source.name(), error = %e, "source failed, contributing no articles");
            Vec::new()
        }
        Err(_) => {
            tracing::warn!(source = source.name(), ?timeout, "source timed out, contributing no articles");
            Vec::new()
        }
    }
}

fn tag(articles: Vec<Article>, name: &str) -> Vec<Article> {
    articles
        .into_iter()
        .map(|mut article| {
            article.source = Some(name.to_string());
            article
        })
        .collect()
}

/// Looks an article up locally first, then remotely. Remote failures count as
/// not found; local read errors propagate.
pub async fn find_in_sources(
    local: &dyn ArticleSource,
    remote: Option<&dyn ArticleSource>,
    id: &str,
    timeout: Duration,
) -> Result<Option<Article>> {
    if let Some(article) = local.fetch_article(id).await? {
        return Ok(Some(tag(vec![article], local.name()).remove(0)));
    }

    let Some(remote) = remote else {
        return Ok(None);
    };
    match tokio::time::timeout(timeout, remote.fetch_article(id)).await {
        Ok(Ok(found)) => Ok(found.map(|mut article| {
            article.source = Some(remote.name().to_string());
            article
        })),
        Ok(Err(e)) => {
            tracing::warn!(source = remote.name(), id, error = %e, "remote lookup failed");
            Ok(None)
        }
        Err(_) => {
            tracing::warn!(source = remote.name(), id, "remote lookup timed out");
            Ok(None)
        }
    }
}
