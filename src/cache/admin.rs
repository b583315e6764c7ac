//! Cache listing and removal

use crate::audit::AuditLog;
use crate::cache::loader::PackageManifest;
use crate::cache::lock::SlotLocks;
use crate::cache::slot::CacheSlot;
use crate::error::{LazydepError, LazydepResult};
use crate::package::{codec, spec::validate_identifier};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info, warn};

/// What a slot holds, according to the installed package itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum EntryState {
    /// Installed package reports this name and version
    Installed { name: String, version: String },
    /// Slot exists but its installed manifest is missing or unreadable
    Inconsistent { reason: String },
}

/// One slot in the cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheEntry {
    /// Slot directory name
    pub slot: String,
    /// Identifier decoded from the slot name
    pub identifier: String,
    #[serde(flatten)]
    pub state: EntryState,
}

impl CacheEntry {
    /// Installed version, if the slot is consistent
    pub fn version(&self) -> Option<&str> {
        match &self.state {
            EntryState::Installed { version, .. } => Some(version),
            EntryState::Inconsistent { .. } => None,
        }
    }
}

/// List and remove cache slots
pub struct CacheAdmin {
    root: PathBuf,
    locks: Arc<SlotLocks>,
    audit: AuditLog,
}

impl CacheAdmin {
    pub fn new(root: PathBuf, locks: Arc<SlotLocks>, audit: AuditLog) -> Self {
        Self { root, locks, audit }
    }

    /// Every slot directory under the cache root, sorted by identifier
    pub async fn list(&self) -> LazydepResult<Vec<CacheEntry>> {
        if !self.root.exists() {
            return Ok(vec![]);
        }

        let mut entries = vec![];
        let mut dir = fs::read_dir(&self.root).await.map_err(|e| {
            LazydepError::io(format!("reading cache directory {}", self.root.display()), e)
        })?;

        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| LazydepError::io("reading cache entry", e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| LazydepError::io("reading cache entry type", e))?;
            if !file_type.is_dir() {
                continue;
            }

            let slot_name = entry.file_name().to_string_lossy().into_owned();
            entries.push(self.inspect(slot_name).await);
        }

        entries.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        debug!("Found {} cache slots", entries.len());
        Ok(entries)
    }

    async fn inspect(&self, slot_name: String) -> CacheEntry {
        let identifier = codec::decode(&slot_name);

        let state = match validate_identifier(&identifier) {
            Err(e) => EntryState::Inconsistent {
                reason: e.to_string(),
            },
            Ok(()) => {
                let manifest_path = CacheSlot::new(&self.root, &identifier).installed_manifest_path();
                match PackageManifest::from_file(&manifest_path).await {
                    Ok(manifest) => EntryState::Installed {
                        name: manifest.name,
                        version: manifest.version,
                    },
                    Err(e) => {
                        warn!("Slot {} is inconsistent: {}", slot_name, e);
                        EntryState::Inconsistent {
                            reason: e.to_string(),
                        }
                    }
                }
            }
        };

        CacheEntry {
            slot: slot_name,
            identifier,
            state,
        }
    }

    /// Delete the slot for `identifier`, returning whether it existed
    ///
    /// Waits for any in-flight install or import of the same identifier.
    pub async fn remove(&self, identifier: &str) -> LazydepResult<bool> {
        validate_identifier(identifier)?;
        let _guard = self.locks.acquire(identifier).await;

        let slot = CacheSlot::new(&self.root, identifier);
        if !slot.path().exists() {
            debug!("No slot for {}", identifier);
            return Ok(false);
        }

        fs::remove_dir_all(slot.path()).await.map_err(|e| {
            LazydepError::io(format!("removing slot {}", slot.path().display()), e)
        })?;

        info!("Removed {} from cache", identifier);
        self.audit
            .log(
                "package.remove",
                &serde_json::json!({
                    "identifier": identifier,
                    "slot": slot.path(),
                }),
            )
            .await;

        Ok(true)
    }
}
