//! Journal path resolution and error-safe display.

use std::path::{Path, PathBuf};

/// Journal used when neither `--journal` nor the config file names one.
pub const DEFAULT_JOURNAL: &str = "custody.csj";

/// Picks the journal path: flag, then config file, then [`DEFAULT_JOURNAL`].
pub fn resolve_journal_path(
    flag: Option<&Path>,
    configured: Option<&Path>,
) -> Result<PathBuf, String> {
    let chosen = flag
        .or(configured)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_JOURNAL));
    validate_journal_path(&chosen, false)
}

/// Rejects empty paths and directories; with `must_exist`, also missing files.
pub fn validate_journal_path(path: &Path, must_exist: bool) -> Result<PathBuf, String> {
    if path.as_os_str().is_empty() {
        return Err("journal path is empty".to_string());
    }
    if path.is_dir() {
        return Err(format!(
            "{} is a directory",
            sanitize_path_for_error(path)
        ));
    }
    if must_exist && !path.exists() {
        return Err(format!(
            "journal {} does not exist",
            sanitize_path_for_error(path)
        ));
    }
    Ok(path.to_path_buf())
}

/// File name only, so error messages do not echo full directory layouts.
pub fn sanitize_path_for_error(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "<journal>".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn flag_wins_over_config() {
        let chosen =
            resolve_journal_path(Some(Path::new("a.csj")), Some(Path::new("b.csj"))).unwrap();
        assert_eq!(chosen, PathBuf::from("a.csj"));
    }

    #[test]
    fn falls_back_to_default() {
        assert_eq!(
            resolve_journal_path(None, None).unwrap(),
            PathBuf::from(DEFAULT_JOURNAL)
        );
        assert_eq!(
            resolve_journal_path(None, Some(Path::new("b.csj"))).unwrap(),
            PathBuf::from("b.csj")
        );
    }

    #[test]
    fn rejects_directories_and_missing_files() {
        let temp_dir = TempDir::new().unwrap();
        assert!(validate_journal_path(temp_dir.path(), false).is_err());

        let missing = temp_dir.path().join("missing.csj");
        assert!(validate_journal_path(&missing, false).is_ok());
        let err = validate_journal_path(&missing, true).unwrap_err();
        assert!(err.contains("missing.csj"));
        assert!(!err.contains(&*temp_dir.path().to_string_lossy()));
    }
}
