use std::fs;
use std::path::{Path, PathBuf};

use super::core::SurveymapConfig;

pub const CONFIG_FILE_NAME: &str = ".surveymap.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Parse configuration from a TOML string
pub fn parse_config(contents: &str) -> Result<SurveymapConfig, String> {
    toml::from_str::<SurveymapConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))
}

/// Try loading config from a specific path; `None` when absent or invalid
pub fn try_load_config_from_path(config_path: &Path) -> Option<SurveymapConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            // A missing file is the normal case while walking up the tree
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!(
                    "Failed to read config file {}: {}",
                    config_path.display(),
                    e
                );
            }
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// `start` followed by its parents, at most `max_depth` entries
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Find the nearest config file starting at `start`.
pub fn find_config_from(start: PathBuf) -> Option<SurveymapConfig> {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
}

/// Load configuration for the current directory, or defaults.
pub fn load_config() -> SurveymapConfig {
    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            return SurveymapConfig::default();
        }
    };

    find_config_from(current).unwrap_or_else(|| {
        log::debug!(
            "No config found after checking {} directories. Using default config.",
            MAX_TRAVERSAL_DEPTH
        );
        SurveymapConfig::default()
    })
}

/// Load an explicitly named config file, falling back to defaults.
pub fn load_config_from_path(path: &Path) -> SurveymapConfig {
    try_load_config_from_path(path).unwrap_or_else(|| {
        log::warn!(
            "Config file {} not usable. Using default config.",
            path.display()
        );
        SurveymapConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_directory_ancestors_bounded() {
        let dirs: Vec<_> = directory_ancestors(PathBuf::from("/a/b/c/d"), 3).collect();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/a/b/c/d"),
                PathBuf::from("/a/b/c"),
                PathBuf::from("/a/b")
            ]
        );
    }

    #[test]
    fn test_finds_config_in_parent() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "[generations]\nunknown_id = -9\n",
        )
        .unwrap();
        let nested = temp.path().join("x").join("y");
        fs::create_dir_all(&nested).unwrap();

        let config = find_config_from(nested).unwrap();
        assert_eq!(config.generations.unknown_id, -9);
    }

    #[test]
    fn test_invalid_config_falls_back() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[overview]\ndepartment_levels = \"all\"\n").unwrap();

        assert!(try_load_config_from_path(&path).is_none());
        assert_eq!(load_config_from_path(&path), SurveymapConfig::default());
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = parse_config("[[[").unwrap_err();
        assert!(err.contains(CONFIG_FILE_NAME));
    }
}
