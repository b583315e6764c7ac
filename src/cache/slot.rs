//! Cache slot layout
//!
//! ```text
//! package_path/
//!   <encoded-identifier>/          one slot per identifier
//!     package.json                 slot manifest, written before install
//!     node_modules/<identifier>/   installed package tree
//! ```

use crate::error::{LazydepError, LazydepResult};
use crate::package::codec;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Slot manifest file name
pub const SLOT_MANIFEST: &str = "package.json";

/// Directory the package manager installs into
pub const MODULES_DIR: &str = "node_modules";

/// Minimal manifest marking a slot as created by lazydep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotManifest {
    pub private: bool,
    pub description: String,
}

impl SlotManifest {
    pub fn for_identifier(identifier: &str) -> Self {
        Self {
            private: true,
            description: format!("lazydep cache slot for {}", identifier),
        }
    }
}

/// The cache directory dedicated to one identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSlot {
    identifier: String,
    path: PathBuf,
}

impl CacheSlot {
    /// Slot for `identifier` under `root`
    pub fn new(root: &Path, identifier: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            path: root.join(codec::encode(identifier)),
        }
    }

    /// Slot directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Slot manifest location
    pub fn manifest_path(&self) -> PathBuf {
        self.path.join(SLOT_MANIFEST)
    }

    /// Where the installed package lives
    pub fn module_dir(&self) -> PathBuf {
        self.path.join(MODULES_DIR).join(&self.identifier)
    }

    /// The installed package's own manifest
    pub fn installed_manifest_path(&self) -> PathBuf {
        self.module_dir().join("package.json")
    }

    /// Create the slot directory and (over)write its manifest
    pub async fn prepare(&self) -> LazydepResult<()> {
        fs::create_dir_all(&self.path).await.map_err(|e| {
            LazydepError::io(format!("creating slot {}", self.path.display()), e)
        })?;

        let manifest = SlotManifest::for_identifier(&self.identifier);
        let content = serde_json::to_string_pretty(&manifest)?;
        let manifest_path = self.manifest_path();
        fs::write(&manifest_path, content).await.map_err(|e| {
            LazydepError::io(format!("writing slot manifest {}", manifest_path.display()), e)
        })?;

        Ok(())
    }
}
