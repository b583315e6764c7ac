//! Package installation into cache slots

use crate::audit::AuditLog;
use crate::cache::lock::SlotLocks;
use crate::cache::slot::CacheSlot;
use crate::error::{LazydepError, LazydepResult};
use crate::package::{PackageManager, PackageSpec};
use crate::process::Executor;
use crate::registry::RegistryResolver;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Fetches packages into their slots through the external package manager
///
/// The slot directory and manifest are written before the package manager
/// runs, so a crashed install leaves a slot with a manifest and no module.
/// Failed installs are never cleaned up.
pub struct Installer {
    root: PathBuf,
    executor: Arc<dyn Executor>,
    registry: Arc<RegistryResolver>,
    manager: PackageManager,
    locks: Arc<SlotLocks>,
    audit: AuditLog,
}

impl Installer {
    pub fn new(
        root: PathBuf,
        executor: Arc<dyn Executor>,
        registry: Arc<RegistryResolver>,
        manager: PackageManager,
        locks: Arc<SlotLocks>,
        audit: AuditLog,
    ) -> Self {
        Self {
            root,
            executor,
            registry,
            manager,
            locks,
            audit,
        }
    }

    /// Install `spec` into its slot, replacing whatever is there
    pub async fn install(&self, spec: &PackageSpec) -> LazydepResult<()> {
        let _guard = self.locks.acquire(spec.identifier()).await;
        self.install_locked(spec).await
    }

    /// Install while the caller already holds the identifier's slot lock
    pub(crate) async fn install_locked(&self, spec: &PackageSpec) -> LazydepResult<()> {
        let slot = CacheSlot::new(&self.root, spec.identifier());
        let mut registry = None;
        let outcome = self.attempt(spec, &slot, &mut registry).await;

        self.audit
            .log(
                "package.install",
                &serde_json::json!({
                    "identifier": spec.identifier(),
                    "version": spec.version_or_latest(),
                    "registry": registry,
                    "slot": slot.path(),
                    "success": outcome.is_ok(),
                    "error": outcome.as_ref().err().map(|e| e.to_string()),
                }),
            )
            .await;

        outcome
    }

    /// Prepare the slot and run the package manager, recording the registry used
    async fn attempt(
        &self,
        spec: &PackageSpec,
        slot: &CacheSlot,
        registry: &mut Option<String>,
    ) -> LazydepResult<()> {
        slot.prepare().await?;

        let url = self.registry.url().await?;
        let command = self.manager.add_command(spec, &url, slot.path());
        *registry = Some(url);

        info!(
            "Installing {} into {}",
            spec.install_target(),
            slot.path().display()
        );

        self.executor
            .run(&command, &|_| {})
            .await
            .map_err(|e| LazydepError::install(spec.identifier(), e))?;
        Ok(())
    }
}
