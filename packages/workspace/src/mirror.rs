//! Local mirror of the page-config map.
//!
//! Every committed change writes the map to a JSON file next to the
//! workspace. Mirroring is best effort: failures are logged and reported as
//! `false`, never as errors.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use navboard_model::{normalize_page_config_map, PageConfig};
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct LocalMirror {
    path: PathBuf,
}

impl LocalMirror {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the map. Returns whether the mirror is now current.
    pub fn save(&self, page_configs: &IndexMap<String, PageConfig>) -> bool {
        let text = match serde_json::to_string_pretty(page_configs) {
            Ok(text) => text,
            Err(err) => {
                warn!("[Mirror] Failed to serialize page configs: {}", err);
                return false;
            }
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(err) = std::fs::create_dir_all(parent) {
                warn!("[Mirror] Failed to create {}: {}", parent.display(), err);
                return false;
            }
        }

        match std::fs::write(&self.path, text) {
            Ok(()) => {
                debug!(
                    "[Mirror] Wrote {} page config(s) to {}",
                    page_configs.len(),
                    self.path.display()
                );
                true
            }
            Err(err) => {
                warn!("[Mirror] Failed to write {}: {}", self.path.display(), err);
                false
            }
        }
    }

    /// Read the mirrored map back, normalizing legacy shapes. A missing or
    /// unreadable mirror yields `None`.
    pub fn restore(&self) -> Option<IndexMap<String, PageConfig>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!("[Mirror] Failed to read {}: {}", self.path.display(), err);
                return None;
            }
        };

        let raw: Value = match serde_json::from_str(&text) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("[Mirror] Ignoring corrupt mirror: {}", err);
                return None;
            }
        };

        match normalize_page_config_map(&raw) {
            Ok(map) => Some(map),
            Err(err) => {
                warn!("[Mirror] Ignoring invalid mirror: {}", err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navboard_model::DEFAULT_FILTER_COLUMNS;

    #[test]
    fn test_save_and_restore() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = LocalMirror::new(dir.path().join("nested").join("pages.json"));

        let mut map = IndexMap::new();
        map.insert("orders".to_string(), PageConfig::default());
        assert!(mirror.save(&map));

        let restored = mirror.restore().unwrap();
        assert_eq!(restored.keys().collect::<Vec<_>>(), vec!["orders"]);
    }

    #[test]
    fn test_missing_and_corrupt_mirror() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = LocalMirror::new(dir.path().join("pages.json"));
        assert!(mirror.restore().is_none());

        std::fs::write(mirror.path(), "{ not json").unwrap();
        assert!(mirror.restore().is_none());
    }

    #[test]
    fn test_restore_normalizes_legacy_shapes() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = LocalMirror::new(dir.path().join("pages.json"));
        std::fs::write(
            mirror.path(),
            r#"{"orders":{"filterArea":{"columns":"abc","filters":[]}}}"#,
        )
        .unwrap();

        let restored = mirror.restore().unwrap();
        assert_eq!(restored["orders"].filter_area.columns, DEFAULT_FILTER_COLUMNS);
    }

    #[test]
    fn test_unwritable_mirror_reports_false() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be
        let mirror = LocalMirror::new(dir.path());
        assert!(!mirror.save(&IndexMap::new()));
    }
}
