use crate::commands::{CmdMessage, CmdResult, FolioPaths};
use crate::config::FolioConfig;
use crate::error::Result;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(paths: &FolioPaths, action: ConfigAction) -> Result<CmdResult> {
    let dir = &paths.data_dir;
    match action {
        ConfigAction::ShowAll => {
            let config = FolioConfig::load(dir)?;
            Ok(CmdResult::default().with_config(config))
        }
        ConfigAction::ShowKey(key) => {
            let config = FolioConfig::load(dir)?;
            let mut result = CmdResult::default();
            match config.get(&key) {
                Some(val) => result.add_message(CmdMessage::info(val)),
                None => {
                    result.add_message(CmdMessage::error(format!("Unknown config key: {}", key)))
                }
            }
            Ok(result)
        }
        ConfigAction::Set(key, value) => {
            let mut config = FolioConfig::load(dir)?;
            if let Err(e) = config.set(&key, &value) {
                let mut res = CmdResult::default();
                res.add_message(CmdMessage::error(e));
                return Ok(res);
            }
            config.save(dir)?;
            let display_val = config.get(&key).unwrap_or(value);
            let mut result = CmdResult::default().with_config(config);
            result.add_message(CmdMessage::success(format!(
                "{} set to {}",
                key, display_val
            )));
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use tempfile::tempdir;

    fn paths(dir: &std::path::Path) -> FolioPaths {
        FolioPaths {
            data_dir: dir.to_path_buf(),
            upload_dir: dir.join("uploads"),
        }
    }

    #[test]
    fn set_persists_and_show_reads_back() {
        let dir = tempdir().unwrap();
        let paths = paths(dir.path());

        run(
            &paths,
            ConfigAction::Set("remote_name".into(), "blog".into()),
        )
        .unwrap();
        let shown = run(&paths, ConfigAction::ShowKey("remote_name".into())).unwrap();
        assert_eq!(shown.messages[0].content, "blog");

        let all = run(&paths, ConfigAction::ShowAll).unwrap();
        assert_eq!(all.config.unwrap().remote_name, "blog");
    }

    #[test]
    fn unknown_key_is_reported_not_raised() {
        let dir = tempdir().unwrap();
        let result = run(
            &paths(dir.path()),
            ConfigAction::Set("nope".into(), "1".into()),
        )
        .unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert!(!dir.path().join("config.json").exists());
    }
}
