use crate::config::FolioConfig;
use crate::model::{Article, OrderEntry};
use crate::upload::StoredUpload;
use std::path::PathBuf;

pub mod config;
pub mod create;
pub mod delete;
pub mod get;
pub mod helpers;
pub mod ingest;
pub mod init;
pub mod list;
pub mod reorder;
pub mod stats;
pub mod update;

pub use list::ListQuery;
pub use stats::ArticleStats;

#[derive(Debug, Clone)]
pub struct FolioPaths {
    pub data_dir: PathBuf,
    pub upload_dir: PathBuf,
}

impl FolioPaths {
    pub fn new(data_dir: PathBuf, config: &FolioConfig) -> Self {
        let upload_dir = config.upload_dir_in(&data_dir);
        Self {
            data_dir,
            upload_dir,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub listed_articles: Vec<Article>,
    pub affected_articles: Vec<Article>,
    pub order: Option<Vec<OrderEntry>>,
    pub upload: Option<StoredUpload>,
    pub stats: Option<ArticleStats>,
    pub config: Option<FolioConfig>,
    pub created_paths: Vec<PathBuf>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed_articles(mut self, articles: Vec<Article>) -> Self {
        self.listed_articles = articles;
        self
    }

    pub fn with_affected_articles(mut self, articles: Vec<Article>) -> Self {
        self.affected_articles = articles;
        self
    }

    pub fn with_order(mut self, order: Vec<OrderEntry>) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_upload(mut self, upload: StoredUpload) -> Self {
        self.upload = Some(upload);
        self
    }

    pub fn with_stats(mut self, stats: ArticleStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_config(mut self, config: FolioConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// The single article a create/update/get produced, if any.
    pub fn first_affected(&self) -> Option<&Article> {
        self.affected_articles.first()
    }
}
