//! # Source Sync
//!
//! Read and write access to the source files that mirror the configuration
//! (the sidebar definition and the generated page module).
//!
//! [`ConfigDirSync`] confines every name to one directory:
//!
//! ```text
//! "sidebar.ts"          → <root>/sidebar.ts         ok
//! "pages/page1.ts"      → <root>/pages/page1.ts     ok
//! "../secrets.env"      → Forbidden
//! "/etc/passwd"         → Forbidden
//! "link/../../x" (link) → Forbidden after canonicalization
//! ```

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};
use unicode_normalization::UnicodeNormalization;

use crate::errors::SyncError;

#[async_trait]
pub trait SourceSyncAdapter: Send + Sync {
    /// Current text of `name`, or `None` when it does not exist
    async fn read(&self, name: &str) -> Result<Option<String>, SyncError>;

    async fn write(&self, name: &str, text: &str) -> Result<(), SyncError>;
}

/// Adapter rooted at a single config directory
#[derive(Debug, Clone)]
pub struct ConfigDirSync {
    root: PathBuf,
}

impl ConfigDirSync {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `name` inside the root, rejecting anything that could escape
    pub fn resolve(&self, name: &str) -> Result<PathBuf, SyncError> {
        // NFC first so visually identical names resolve identically
        let name: String = name.nfc().collect();
        if name.trim().is_empty() {
            return Err(SyncError::Forbidden("empty file name".to_string()));
        }

        let relative = Path::new(&name);
        let mut has_file = false;
        for component in relative.components() {
            match component {
                Component::Normal(_) => has_file = true,
                Component::CurDir => {}
                _ => return Err(SyncError::Forbidden(name.clone())),
            }
        }
        if !has_file {
            return Err(SyncError::Forbidden(name.clone()));
        }

        let target = self.root.join(relative);
        if !target.starts_with(&self.root) {
            return Err(SyncError::Forbidden(name));
        }

        self.check_links(&target, &name)?;
        Ok(target)
    }

    /// Symlinks inside the root may still point outside it. Compare the
    /// canonical form of the deepest existing ancestor with the canonical root.
    fn check_links(&self, target: &Path, name: &str) -> Result<(), SyncError> {
        let Ok(root) = self.root.canonicalize() else {
            // Nothing exists yet, so nothing can link out
            return Ok(());
        };

        let existing = target.ancestors().find(|p| p.exists());
        if let Some(existing) = existing {
            let canonical = existing.canonicalize()?;
            if !canonical.starts_with(&root) {
                warn!("[SourceSync] {} resolves outside the config dir", name);
                return Err(SyncError::Forbidden(name.to_string()));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SourceSyncAdapter for ConfigDirSync {
    #[instrument(skip(self))]
    async fn read(&self, name: &str) -> Result<Option<String>, SyncError> {
        let path = self.resolve(name)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("[SourceSync] {} does not exist", name);
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    #[instrument(skip(self, text))]
    async fn write(&self, name: &str, text: &str) -> Result<(), SyncError> {
        let path = self.resolve(name)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, text).await?;
        info!("[SourceSync] Updated {}", name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_escapes() {
        let sync = ConfigDirSync::new("/srv/config");

        for name in ["../x.ts", "a/../../x.ts", "/etc/passwd", "", "   ", "."] {
            assert!(
                matches!(sync.resolve(name), Err(SyncError::Forbidden(_))),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_accepts_nested_names() {
        let sync = ConfigDirSync::new("/srv/config");
        assert_eq!(
            sync.resolve("./pages/page1.ts").unwrap(),
            PathBuf::from("/srv/config/pages/page1.ts")
        );
    }

    #[test]
    fn test_names_are_nfc_normalized() {
        let sync = ConfigDirSync::new("/srv/config");
        // "e" + combining acute vs precomposed "é"
        let decomposed = sync.resolve("cafe\u{301}.ts").unwrap();
        let composed = sync.resolve("caf\u{e9}.ts").unwrap();
        assert_eq!(decomposed, composed);
    }

    #[tokio::test]
    async fn test_read_write() {
        let dir = tempfile::tempdir().unwrap();
        let sync = ConfigDirSync::new(dir.path());

        assert_eq!(sync.read("sidebar.ts").await.unwrap(), None);
        sync.write("sidebar.ts", "export default {}").await.unwrap();
        assert_eq!(
            sync.read("sidebar.ts").await.unwrap().as_deref(),
            Some("export default {}")
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_escape_rejected() {
        let outside = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path(), root.path().join("link")).unwrap();

        let sync = ConfigDirSync::new(root.path());
        assert!(matches!(
            sync.write("link/evil.ts", "x").await,
            Err(SyncError::Forbidden(_))
        ));
    }
}
