use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::error::{FolioError, Result};
use crate::hybrid::ArticleSource;
use crate::model::Article;

/// Articles served by a WordPress-compatible proxy.
///
/// The proxy exposes `GET {base}/articles` (a JSON array) and
/// `GET {base}/articles/{id}`. WordPress ids are numeric; they are turned into
/// strings so remote articles share the local id type.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    client: Client,
    base_url: String,
    name: String,
    timeout: Duration,
}

impl RemoteSource {
    pub fn new(base_url: impl Into<String>, name: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            name: name.into(),
            timeout,
        }
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        tracing::debug!(url, "fetching remote articles");
        self.client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| FolioError::Remote(format!("request to {} failed: {}", url, e)))
    }
}

#[async_trait]
impl ArticleSource for RemoteSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_articles(&self) -> Result<Vec<Article>> {
        let url = format!("{}/articles", self.base_url);
        let response = self.get(&url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FolioError::Remote(format!("{} returned {}", url, status)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| FolioError::Remote(format!("invalid body from {}: {}", url, e)))?;
        match body {
            Value::Array(items) => Ok(items
                .into_iter()
                .enumerate()
                .filter_map(|(index, item)| match article_from_value(item) {
                    Ok(article) => Some(article),
                    Err(e) => {
                        tracing::warn!(url = %url, index, error = %e, "skipping unreadable remote article");
                        None
                    }
                })
                .collect()),
            _ => Err(FolioError::Remote(format!(
                "{} did not return a JSON array",
                url
            ))),
        }
    }

    async fn fetch_article(&self, id: &str) -> Result<Option<Article>> {
        let url = format!("{}/articles/{}", self.base_url, id);
        let response = self.get(&url).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body: Value = response.json().await.map_err(|e| {
                    FolioError::Remote(format!("invalid body from {}: {}", url, e))
                })?;
                article_from_value(body).map(Some)
            }
            status => Err(FolioError::Remote(format!("{} returned {}", url, status))),
        }
    }
}

/// WordPress ids and tag ids are numbers; both become strings.
fn article_from_value(mut value: Value) -> Result<Article> {
    if let Some(obj) = value.as_object_mut() {
        if let Some(Value::Number(n)) = obj.get("id") {
            let id = n.to_string();
            obj.insert("id".to_string(), Value::String(id));
        }
        if let Some(Value::Array(tags)) = obj.get_mut("tags") {
            for tag in tags.iter_mut() {
                if let Value::Number(n) = tag {
                    *tag = Value::String(n.to_string());
                }
            }
        }
    }
    Ok(Article::from_stored(value)?)
}
