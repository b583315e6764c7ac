//! Loading installed packages
//!
//! Loading is a narrow capability: given the directory an installed package
//! lives in, verify it is usable and hand back an opaque [`LoadedModule`].
//! Nothing is executed.

use crate::error::{LazydepError, LazydepResult};
use crate::package::PackageSpec;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Entry file used when a manifest has no `main`
pub const DEFAULT_ENTRY: &str = "index.js";

/// The fields of an installed package's `package.json` lazydep cares about
#[derive(Debug, Clone, Deserialize)]
pub struct PackageManifest {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub main: Option<String>,
}

impl PackageManifest {
    /// Parse a manifest from disk
    pub async fn from_file(path: &Path) -> LazydepResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| LazydepError::io(format!("reading {}", path.display()), e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LazydepResult<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Handle to a package that passed loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedModule {
    name: String,
    version: semver::Version,
    root: PathBuf,
    entry: PathBuf,
}

impl LoadedModule {
    /// Name the package reports for itself
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &semver::Version {
        &self.version
    }

    /// Installed package directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolved entry file
    pub fn entry(&self) -> &Path {
        &self.entry
    }
}

/// Turns an installed package directory into a [`LoadedModule`]
///
/// Implementations return [`LazydepError::Load`] for anything that a clean
/// reinstall could fix; the importer retries only on that variant.
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    async fn load(&self, spec: &PackageSpec, module_dir: &Path) -> LazydepResult<LoadedModule>;
}

/// Loads a package by validating its manifest and entry file
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestLoader;

impl ManifestLoader {
    pub fn new() -> Self {
        Self
    }

    /// Find the entry file for `main` the way Node resolves it
    async fn resolve_entry(module_dir: &Path, main: &str) -> Option<PathBuf> {
        let relative = Path::new(main);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return None;
        }

        let base = module_dir.join(relative);
        let candidates = [
            base.clone(),
            PathBuf::from(format!("{}.js", base.display())),
            base.join(DEFAULT_ENTRY),
        ];

        for candidate in candidates {
            if tokio::fs::metadata(&candidate)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false)
            {
                return Some(candidate);
            }
        }
        None
    }
}

#[async_trait]
impl ModuleLoader for ManifestLoader {
    async fn load(&self, spec: &PackageSpec, module_dir: &Path) -> LazydepResult<LoadedModule> {
        let identifier = spec.identifier();
        let manifest_path = module_dir.join("package.json");

        let manifest = PackageManifest::from_file(&manifest_path)
            .await
            .map_err(|e| LazydepError::load(identifier, e.to_string()))?;

        if manifest.name != identifier {
            return Err(LazydepError::load(
                identifier,
                format!("installed package is named '{}'", manifest.name),
            ));
        }

        let version = semver::Version::parse(&manifest.version).map_err(|e| {
            LazydepError::load(
                identifier,
                format!("invalid version '{}': {}", manifest.version, e),
            )
        })?;

        let main = manifest.main.as_deref().unwrap_or(DEFAULT_ENTRY);
        let entry = Self::resolve_entry(module_dir, main).await.ok_or_else(|| {
            LazydepError::load(identifier, format!("entry file '{}' not found", main))
        })?;

        debug!("Loaded {}@{} from {}", identifier, version, entry.display());

        Ok(LoadedModule {
            name: manifest.name,
            version,
            root: module_dir.to_path_buf(),
            entry,
        })
    }
}
