//! Image uploads into a single flat directory.
//!
//! A write goes through a [`PendingUpload`]: the payload lands in a hidden temp
//! file inside the upload directory and only becomes visible under its final
//! name when [`PendingUpload::finish`] renames it. Dropping an unfinished upload
//! removes the temp file, so a rejected or interrupted upload leaves nothing
//! behind.

use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::error::UploadError;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
pub const UPLOAD_URL_PREFIX: &str = "/uploads";

type UploadResult<T> = std::result::Result<T, UploadError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUpload {
    pub filename: String,
    #[serde(rename = "imageUrl")]
    pub url: String,
    pub size: usize,
}

#[derive(Debug, Clone)]
pub struct UploadService {
    dir: PathBuf,
    max_bytes: usize,
}

impl UploadService {
    pub fn new(dir: PathBuf, max_bytes: usize) -> Self {
        Self { dir, max_bytes }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ensure_dir(&self) -> UploadResult<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        Ok(())
    }

    /// Validates the content type and opens a temp file for the payload.
    pub fn begin(&self, original_name: &str, content_type: &str) -> UploadResult<PendingUpload> {
        if !is_image(content_type) {
            return Err(UploadError::InvalidType(content_type.to_string()));
        }
        self.ensure_dir()?;

        let filename = generate_filename(original_name);
        let temp_path = self.dir.join(format!(".{}.part", Uuid::new_v4().simple()));
        let file = File::create(&temp_path)?;
        tracing::debug!(path = %temp_path.display(), "upload started");

        Ok(PendingUpload {
            file: Some(file),
            temp_path,
            final_path: self.dir.join(&filename),
            filename,
            written: 0,
            limit: self.max_bytes,
            finished: false,
        })
    }

    /// Stores a payload that is already in memory.
    pub fn store(
        &self,
        original_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> UploadResult<StoredUpload> {
        let mut pending = self.begin(original_name, content_type)?;
        pending.write_chunk(bytes)?;
        pending.finish()
    }

    /// Deletes an uploaded file. Only bare file names inside the upload directory
    /// are accepted.
    pub fn remove(&self, filename: &str) -> UploadResult<()> {
        if !is_plain_filename(filename) {
            return Err(UploadError::InvalidName(filename.to_string()));
        }
        let path = self.dir.join(filename);
        if !path.is_file() {
            return Err(UploadError::NotFound(filename.to_string()));
        }
        fs::remove_file(&path)?;
        tracing::info!(filename, "upload removed");
        Ok(())
    }
}

/// An upload in progress. See the module docs for the cleanup guarantee.
#[derive(Debug)]
pub struct PendingUpload {
    file: Option<File>,
    temp_path: PathBuf,
    final_path: PathBuf,
    filename: String,
    written: usize,
    limit: usize,
    finished: bool,
}

impl PendingUpload {
    pub fn write_chunk(&mut self, chunk: &[u8]) -> UploadResult<()> {
        let size = self.written + chunk.len();
        if size > self.limit {
            return Err(UploadError::TooLarge {
                size,
                limit: self.limit,
            });
        }
        if let Some(file) = self.file.as_mut() {
            file.write_all(chunk)?;
        }
        self.written = size;
        Ok(())
    }

    pub fn finish(mut self) -> UploadResult<StoredUpload> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
            file.sync_all()?;
        }
        fs::rename(&self.temp_path, &self.final_path)?;
        self.finished = true;
        tracing::info!(filename = %self.filename, size = self.written, "upload stored");

        Ok(StoredUpload {
            url: format!("{}/{}", UPLOAD_URL_PREFIX, self.filename),
            filename: std::mem::take(&mut self.filename),
            size: self.written,
        })
    }
}

impl Drop for PendingUpload {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        self.file.take();
        if let Err(e) = fs::remove_file(&self.temp_path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.temp_path.display(), error = %e, "failed to clean up partial upload");
            }
        }
    }
}

fn is_image(content_type: &str) -> bool {
    content_type
        .trim()
        .to_ascii_lowercase()
        .strip_prefix("image/")
        .is_some_and(|subtype| !subtype.is_empty())
}

fn is_plain_filename(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains("..")
        && !name.starts_with('.')
}

/// `{unix millis}_{random}{.ext}`; the extension comes from the client's name.
fn generate_filename(original_name: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let random = Uuid::new_v4().as_u128() % 1_000_000_000;
    format!("{}_{}{}", millis, random, extension_of(original_name))
}

fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 10)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}
