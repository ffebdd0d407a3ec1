//! # Persistence Gateway
//!
//! Per-user document storage. A gateway stores one record per user:
//!
//! ```text
//! { "user_id": "...", "config_data": { "navGroups": [...] }, "updated_at": "..." }
//! ```
//!
//! `load` returning `Ok(None)` means the user has no record yet. That is not
//! an error; the caller keeps an empty document.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use navboard_model::SerializableDocument;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::errors::GatewayError;

/// Stored configuration of one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedRecord {
    pub user_id: String,
    pub config_data: SerializableDocument,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn load(&self, user_id: &str) -> Result<Option<PersistedRecord>, GatewayError>;

    /// Upsert the user's record, stamping it with the current time
    async fn save(
        &self,
        user_id: &str,
        config: &SerializableDocument,
    ) -> Result<PersistedRecord, GatewayError>;
}

/// In-process gateway, used for tests and offline sessions
#[derive(Debug, Default)]
pub struct MemoryGateway {
    records: RwLock<HashMap<String, PersistedRecord>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn load(&self, user_id: &str) -> Result<Option<PersistedRecord>, GatewayError> {
        Ok(self.records.read().await.get(user_id).cloned())
    }

    async fn save(
        &self,
        user_id: &str,
        config: &SerializableDocument,
    ) -> Result<PersistedRecord, GatewayError> {
        let record = PersistedRecord {
            user_id: user_id.to_string(),
            config_data: config.clone(),
            updated_at: Utc::now(),
        };
        self.records
            .write()
            .await
            .insert(user_id.to_string(), record.clone());
        Ok(record)
    }
}

/// One JSON file per user inside a store directory
#[derive(Debug, Clone)]
pub struct FileGateway {
    dir: PathBuf,
}

impl FileGateway {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Record path for a user. Bytes outside `[A-Za-z0-9-]` are written as
    /// `_XX` hex, so distinct user ids never share a file and none can name a
    /// path outside the directory.
    pub fn record_path(&self, user_id: &str) -> PathBuf {
        let mut name = String::with_capacity(user_id.len() + 5);
        for byte in user_id.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                name.push(char::from(byte));
            } else {
                name.push_str(&format!("_{:02X}", byte));
            }
        }
        name.push_str(".json");
        self.dir.join(name)
    }

    async fn read_record(&self, path: &Path) -> Result<Option<PersistedRecord>, GatewayError> {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl PersistenceGateway for FileGateway {
    #[instrument(skip(self))]
    async fn load(&self, user_id: &str) -> Result<Option<PersistedRecord>, GatewayError> {
        let path = self.record_path(user_id);
        let Some(record) = self.read_record(&path).await? else {
            debug!("[Gateway] No record at {}", path.display());
            return Ok(None);
        };

        if record.user_id != user_id {
            return Err(GatewayError::Storage(format!(
                "record at {} belongs to another user",
                path.display()
            )));
        }
        Ok(Some(record))
    }

    #[instrument(skip(self, config))]
    async fn save(
        &self,
        user_id: &str,
        config: &SerializableDocument,
    ) -> Result<PersistedRecord, GatewayError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.record_path(user_id);
        if let Some(existing) = self.read_record(&path).await? {
            if existing.user_id != user_id {
                return Err(GatewayError::Storage(format!(
                    "refusing to overwrite record of {} at {}",
                    existing.user_id,
                    path.display()
                )));
            }
        }

        let record = PersistedRecord {
            user_id: user_id.to_string(),
            config_data: config.clone(),
            updated_at: Utc::now(),
        };
        let text = serde_json::to_string_pretty(&record)?;

        // Write beside the target and rename so a crash never leaves half a record
        let staging = path.with_extension("json.tmp");
        tokio::fs::write(&staging, text).await?;
        tokio::fs::rename(&staging, &path).await?;

        info!("[Gateway] Saved record for {}", user_id);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_gateway_upsert() {
        let gateway = MemoryGateway::new();
        assert!(gateway.load("alice").await.unwrap().is_none());

        gateway
            .save("alice", &SerializableDocument::default())
            .await
            .unwrap();
        gateway
            .save("alice", &SerializableDocument::default())
            .await
            .unwrap();

        assert_eq!(gateway.len().await, 1);
        let record = gateway.load("alice").await.unwrap().unwrap();
        assert_eq!(record.user_id, "alice");
    }

    #[test]
    fn test_record_path_is_confined() {
        let gateway = FileGateway::new("/tmp/store");
        assert_eq!(
            gateway.record_path("../etc/passwd"),
            PathBuf::from("/tmp/store/_2E_2E_2Fetc_2Fpasswd.json")
        );
        assert_eq!(
            gateway.record_path("user-1"),
            PathBuf::from("/tmp/store/user-1.json")
        );
    }

    #[tokio::test]
    async fn test_file_gateway_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = FileGateway::new(dir.path().join("records"));

        assert!(gateway.load("bob").await.unwrap().is_none());

        let saved = gateway
            .save("bob", &SerializableDocument::default())
            .await
            .unwrap();
        let loaded = gateway.load("bob").await.unwrap().unwrap();
        assert_eq!(loaded, saved);
    }

    #[tokio::test]
    async fn test_similar_user_ids_keep_separate_records() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = FileGateway::new(dir.path());

        assert_ne!(gateway.record_path("a_b"), gateway.record_path("a.b"));

        gateway
            .save("a_b", &SerializableDocument::default())
            .await
            .unwrap();
        gateway
            .save("a.b", &SerializableDocument::default())
            .await
            .unwrap();

        assert_eq!(gateway.load("a_b").await.unwrap().unwrap().user_id, "a_b");
        assert_eq!(gateway.load("a.b").await.unwrap().unwrap().user_id, "a.b");
    }

    #[tokio::test]
    async fn test_save_refuses_foreign_record() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = FileGateway::new(dir.path());

        let foreign = PersistedRecord {
            user_id: "mallory".to_string(),
            config_data: SerializableDocument::default(),
            updated_at: Utc::now(),
        };
        std::fs::write(
            gateway.record_path("alice"),
            serde_json::to_string(&foreign).unwrap(),
        )
        .unwrap();

        let result = gateway.save("alice", &SerializableDocument::default()).await;
        assert!(matches!(result, Err(GatewayError::Storage(_))));

        let text = std::fs::read_to_string(gateway.record_path("alice")).unwrap();
        assert!(text.contains("mallory"));
    }
}
