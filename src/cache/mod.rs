//! Filesystem-backed package cache
//!
//! Each identifier gets one slot under `cache.package_path`. A slot's
//! existence does not prove it is usable; only a successful load does.
//!
//! # Slot States
//!
//! | State | Layout | Import behavior |
//! |-------|--------|-----------------|
//! | Absent | no directory | install, then load |
//! | Partial | manifest, no module | install, then load |
//! | Installed | manifest + module | load; reinstall if load fails |

pub mod admin;
pub mod importer;
pub mod installer;
pub mod loader;
pub mod lock;
pub mod slot;

pub use admin::{CacheAdmin, CacheEntry, EntryState};
pub use importer::{CacheState, Importer, RetryPolicy};
pub use installer::Installer;
pub use loader::{LoadedModule, ManifestLoader, ModuleLoader, PackageManifest};
pub use lock::SlotLocks;
pub use slot::CacheSlot;

use crate::audit::AuditLog;
use crate::config::{Config, RegistryConfig};
use crate::error::LazydepResult;
use crate::package::PackageSpec;
use crate::process::{Executor, LoggingExecutor, SystemExecutor};
use crate::registry::RegistryResolver;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Entry point wiring installer, importer and admin over one cache root
pub struct PackageCache {
    root: PathBuf,
    registry: Arc<RegistryResolver>,
    installer: Arc<Installer>,
    importer: Importer,
    admin: CacheAdmin,
    default_retries: u32,
}

impl PackageCache {
    /// Cache driving the real package manager through a logging executor
    pub fn new(config: &Config) -> Self {
        Self::with_parts(
            config,
            Arc::new(LoggingExecutor::new(SystemExecutor::new())),
            Arc::new(ManifestLoader::new()),
            AuditLog::new(config),
        )
    }

    /// Cache with substituted executor, loader and audit log
    pub fn with_parts(
        config: &Config,
        executor: Arc<dyn Executor>,
        loader: Arc<dyn ModuleLoader>,
        audit: AuditLog,
    ) -> Self {
        let root = config.cache.package_path.clone();
        let manager = config.installer.package_manager;
        let locks = Arc::new(SlotLocks::new());

        let registry = Arc::new(RegistryResolver::new(
            config.registry.clone(),
            executor.clone(),
            manager,
        ));
        let installer = Arc::new(Installer::new(
            root.clone(),
            executor,
            registry.clone(),
            manager,
            locks.clone(),
            audit.clone(),
        ));
        let importer = Importer::new(root.clone(), installer.clone(), loader, locks.clone());
        let admin = CacheAdmin::new(root.clone(), locks, audit);

        Self {
            root,
            registry,
            installer,
            importer,
            admin,
            default_retries: config.installer.max_retries,
        }
    }

    /// Cache root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Retry policy built from `installer.max_retries`
    pub fn default_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.default_retries)
    }

    /// List every slot with its installed metadata
    pub async fn list(&self) -> LazydepResult<Vec<CacheEntry>> {
        self.admin.list().await
    }

    /// Install (or reinstall) a package into its slot
    pub async fn install(&self, spec: &PackageSpec) -> LazydepResult<()> {
        self.installer.install(spec).await
    }

    /// Remove a package's slot, returning whether it existed
    pub async fn remove(&self, identifier: &str) -> LazydepResult<bool> {
        self.admin.remove(identifier).await
    }

    /// Load a package, installing and self-healing within `policy`
    pub async fn safe_import(
        &self,
        spec: &PackageSpec,
        policy: RetryPolicy,
    ) -> LazydepResult<LoadedModule> {
        self.importer.safe_import(spec, policy).await
    }

    /// Registry config as it stands now, including a lazily discovered URL
    ///
    /// Persisting it is up to the caller.
    pub async fn registry_config(&self) -> RegistryConfig {
        self.registry.config().await
    }
}
