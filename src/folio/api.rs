//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. Both the CLI and
//! the HTTP server go through it; neither calls commands directly.
//!
//! The facade:
//! - **Dispatches** to the appropriate command function
//! - **Owns** the store and the upload service
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no business logic and no formatting. Commands hold the logic,
//! the CLI and the server decide how results look.
//!
//! `FolioApi<S: DataStore>` is generic over the storage backend:
//! `FolioApi<FileStore>` in production, `FolioApi<InMemoryStore>` in tests.

use crate::commands;
use crate::error::Result;
use crate::model::{ArticlePatch, NewArticle, OrderEntry, PublishStatusUpdate};
use crate::store::DataStore;
use crate::upload::{PendingUpload, UploadService};

/// The main API facade for folio operations.
pub struct FolioApi<S: DataStore> {
    store: S,
    paths: commands::FolioPaths,
    uploads: UploadService,
}

impl<S: DataStore> FolioApi<S> {
    pub fn new(store: S, paths: commands::FolioPaths, max_upload_bytes: usize) -> Self {
        let uploads = UploadService::new(paths.upload_dir.clone(), max_upload_bytes);
        Self {
            store,
            paths,
            uploads,
        }
    }

    pub fn list_articles(&self, query: &ListQuery) -> Result<commands::CmdResult> {
        commands::list::run(&self.store, query)
    }

    pub fn get_article(&self, id: &str) -> Result<commands::CmdResult> {
        commands::get::run(&self.store, id)
    }

    pub fn create_article(&mut self, input: NewArticle) -> Result<commands::CmdResult> {
        commands::create::run(&mut self.store, input)
    }

    pub fn update_article(
        &mut self,
        id: &str,
        patch: ArticlePatch,
    ) -> Result<commands::CmdResult> {
        commands::update::run(&mut self.store, id, patch)
    }

    pub fn delete_article(&mut self, id: &str) -> Result<commands::CmdResult> {
        commands::delete::run(&mut self.store, id)
    }

    pub fn get_order(&self) -> Result<commands::CmdResult> {
        commands::reorder::current(&self.store)
    }

    pub fn save_order(&mut self, order: Vec<OrderEntry>) -> Result<commands::CmdResult> {
        commands::reorder::run(&mut self.store, order)
    }

    pub fn move_article(&mut self, id: &str, position: usize) -> Result<commands::CmdResult> {
        commands::reorder::move_to(&mut self.store, id, position)
    }

    pub fn ingest_ai_article(&mut self, input: NewArticle) -> Result<commands::CmdResult> {
        commands::ingest::ai_generated(&mut self.store, input)
    }

    pub fn ingest_scraped_article(&mut self, input: NewArticle) -> Result<commands::CmdResult> {
        commands::ingest::scraped(&mut self.store, input)
    }

    pub fn pending_articles(&self) -> Result<commands::CmdResult> {
        commands::ingest::pending(&self.store)
    }

    pub fn category_sample(
        &self,
        category: &str,
        limit: Option<usize>,
    ) -> Result<commands::CmdResult> {
        commands::ingest::by_category(&self.store, category, limit)
    }

    pub fn set_publish_status(
        &mut self,
        id: &str,
        update: PublishStatusUpdate,
    ) -> Result<commands::CmdResult> {
        commands::ingest::set_publish_status(&mut self.store, id, update)
    }

    pub fn stats(&self) -> Result<commands::CmdResult> {
        commands::stats::run(&self.store)
    }

    pub fn store_upload(
        &self,
        original_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<commands::CmdResult> {
        let stored = self.uploads.store(original_name, content_type, bytes)?;
        let mut result = commands::CmdResult::default();
        result.add_message(CmdMessage::success(format!(
            "Uploaded {} ({} bytes)",
            stored.url, stored.size
        )));
        Ok(result.with_upload(stored))
    }

    /// Starts a streamed upload. The caller feeds chunks and calls `finish`.
    pub fn begin_upload(&self, original_name: &str, content_type: &str) -> Result<PendingUpload> {
        Ok(self.uploads.begin(original_name, content_type)?)
    }

    pub fn remove_upload(&self, filename: &str) -> Result<commands::CmdResult> {
        self.uploads.remove(filename)?;
        let mut result = commands::CmdResult::default();
        result.add_message(CmdMessage::success(format!("Deleted upload {}", filename)));
        Ok(result)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn init(&self) -> Result<commands::CmdResult> {
        commands::init::run(&self.paths)
    }

    pub fn paths(&self) -> &commands::FolioPaths {
        &self.paths
    }

    pub fn uploads(&self) -> &UploadService {
        &self.uploads
    }
}

pub use crate::commands::config::ConfigAction;
pub use commands::{ArticleStats, CmdMessage, CmdResult, FolioPaths, ListQuery, MessageLevel};
