//! # Storage Layer
//!
//! This module defines the storage abstraction for folio. The [`DataStore`] trait
//! lets commands and the HTTP layer work against any backend that can hold two
//! collections: the article set and the display order.
//!
//! ## Two Independent Collections
//!
//! Articles and order are persisted separately and written one after the other.
//! There is no transaction across them, so after a crash (or a delete whose order
//! prune failed) the order may reference articles that are gone, and new articles
//! are never in an old order. That drift is expected: the listing reconciler
//! ([`crate::reconcile`]) skips stale ids and appends unordered articles, so a
//! half-finished write is never fatal.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production storage in a data directory
//!   - `articles.json`: one JSON object keyed by article id
//!   - `article-order.json`: JSON array of ids or `{id, category, position}` records
//!   - Each file is replaced atomically (temp file + rename)
//!
//! - [`memory::InMemoryStore`]: In-memory storage for testing
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── articles.json        # Article set
//! ├── article-order.json   # Custom display order
//! ├── config.json          # Optional configuration
//! └── uploads/             # Uploaded images
//! ```

use crate::error::{FolioError, Result};
use crate::model::{Article, ArticleMap, OrderEntry};

pub mod fs;
pub mod memory;

/// Abstract interface for article and order storage.
///
/// Implementations only load and save whole collections; the provided methods
/// build single-article operations on top.
pub trait DataStore {
    /// Load every article, in storage order
    fn load_articles(&self) -> Result<ArticleMap>;

    /// Replace the whole article set
    fn save_articles(&mut self, articles: &ArticleMap) -> Result<()>;

    /// Load the persisted display order, exactly as stored
    fn load_order(&self) -> Result<Vec<OrderEntry>>;

    /// Replace the display order
    fn save_order(&mut self, order: &[OrderEntry]) -> Result<()>;

    /// Get an article by id
    fn get_article(&self, id: &str) -> Result<Article> {
        self.load_articles()?
            .get(id)
            .cloned()
            .ok_or_else(|| FolioError::ArticleNotFound(id.to_string()))
    }

    /// Insert a new article or replace an existing one in place
    fn put_article(&mut self, article: &Article) -> Result<()> {
        let mut articles = self.load_articles()?;
        articles.insert(article.clone());
        self.save_articles(&articles)
    }

    /// Remove an article from the article set. The order is left alone.
    fn remove_article(&mut self, id: &str) -> Result<Article> {
        let mut articles = self.load_articles()?;
        let removed = articles
            .remove(id)
            .ok_or_else(|| FolioError::ArticleNotFound(id.to_string()))?;
        self.save_articles(&articles)?;
        Ok(removed)
    }
}
