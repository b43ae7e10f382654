use std::fs;

use crate::commands::{CmdMessage, CmdResult, FolioPaths};
use crate::error::Result;
use crate::store::fs::FileStore;

/// Creates the data directory, both store files and the upload directory.
/// Existing files are left untouched.
pub fn run(paths: &FolioPaths) -> Result<CmdResult> {
    let store = FileStore::new(paths.data_dir.clone());
    let mut created = store.init()?;

    if !paths.upload_dir.exists() {
        fs::create_dir_all(&paths.upload_dir)?;
        created.push(paths.upload_dir.clone());
    }

    let mut result = CmdResult::default();
    if created.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "Already initialized at {}",
            paths.data_dir.display()
        )));
    } else {
        result.add_message(CmdMessage::success(format!(
            "Initialized folio at {}",
            paths.data_dir.display()
        )));
    }
    result.created_paths = created;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_everything_once() {
        let dir = tempdir().unwrap();
        let paths = FolioPaths {
            data_dir: dir.path().join("data"),
            upload_dir: dir.path().join("data").join("uploads"),
        };

        let first = run(&paths).unwrap();
        assert_eq!(first.created_paths.len(), 3);
        assert!(paths.data_dir.join("articles.json").exists());
        assert!(paths.data_dir.join("article-order.json").exists());
        assert!(paths.upload_dir.is_dir());

        let second = run(&paths).unwrap();
        assert!(second.created_paths.is_empty());
    }
}
