use super::DataStore;
use crate::error::{FolioError, Result};
use crate::model::{ArticleMap, OrderEntry};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const ARTICLES_FILE: &str = "articles.json";
pub const ORDER_FILE: &str = "article-order.json";

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn articles_path(&self) -> PathBuf {
        self.root.join(ARTICLES_FILE)
    }

    pub fn order_path(&self) -> PathBuf {
        self.root.join(ORDER_FILE)
    }

    /// Creates the data directory and empty collection files if they are missing.
    /// Returns the paths that were created.
    pub fn init(&self) -> Result<Vec<PathBuf>> {
        self.ensure_dir()?;
        let mut created = Vec::new();

        let articles = self.articles_path();
        if !articles.exists() {
            write_atomic(&self.root, &articles, &ArticleMap::new())?;
            created.push(articles);
        }

        let order = self.order_path();
        if !order.exists() {
            write_atomic(&self.root, &order, &Vec::<OrderEntry>::new())?;
            created.push(order);
        }

        Ok(created)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(FolioError::Io)?;
        }
        Ok(())
    }
}

fn read_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let content = fs::read_to_string(path).map_err(FolioError::Io)?;
    if content.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(&content).map_err(FolioError::Serialization)
}

fn write_atomic<T: Serialize + ?Sized>(root: &Path, target: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value).map_err(FolioError::Serialization)?;
    let stem = target
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("data");
    let tmp_file = root.join(format!(".{}-{}.tmp", stem, Uuid::new_v4()));
    fs::write(&tmp_file, content).map_err(FolioError::Io)?;
    if let Err(e) = fs::rename(&tmp_file, target) {
        let _ = fs::remove_file(&tmp_file);
        return Err(FolioError::Io(e));
    }
    Ok(())
}

impl DataStore for FileStore {
    fn load_articles(&self) -> Result<ArticleMap> {
        read_or_default(&self.articles_path())
    }

    fn save_articles(&mut self, articles: &ArticleMap) -> Result<()> {
        self.ensure_dir()?;
        write_atomic(&self.root, &self.articles_path(), articles)?;
        tracing::debug!(count = articles.len(), "saved articles");
        Ok(())
    }

    fn load_order(&self) -> Result<Vec<OrderEntry>> {
        read_or_default(&self.order_path())
    }

    fn save_order(&mut self, order: &[OrderEntry]) -> Result<()> {
        self.ensure_dir()?;
        write_atomic(&self.root, &self.order_path(), order)?;
        tracing::debug!(count = order.len(), "saved article order");
        Ok(())
    }
}
