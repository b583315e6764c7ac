//! Retrying import of cached packages
//!
//! # Import Flow
//!
//! | State | Next | Description |
//! |-------|------|-------------|
//! | Check | Hit / Miss | module directory present and not forced? |
//! | Hit | Load | use the cached install |
//! | Miss | Install, Load | install errors end the import, no retry |
//! | Load | Done / Retry / Fail | only load failures consume budget |
//! | Retry | Check (forced) | budget decremented, reinstall forced |

use crate::cache::installer::Installer;
use crate::cache::loader::{LoadedModule, ModuleLoader};
use crate::cache::lock::SlotLocks;
use crate::cache::slot::CacheSlot;
use crate::error::LazydepResult;
use crate::package::PackageSpec;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Per-call retry settings, never persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Forced reinstalls allowed after load failures
    pub max_retries: u32,
    /// Reinstall even when the module is already cached
    pub force_install: bool,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            force_install: false,
        }
    }

    pub fn forced(mut self, force_install: bool) -> Self {
        self.force_install = force_install;
        self
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Outcome of the cache check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// Module directory present, install skipped
    Hit,
    /// Nothing installed yet
    Miss,
    /// Reinstall requested by the caller or a failed load
    Forced,
}

impl fmt::Display for CacheState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hit => write!(f, "hit"),
            Self::Miss => write!(f, "miss"),
            Self::Forced => write!(f, "forced"),
        }
    }
}

/// Loads packages from the cache, installing and self-healing as needed
pub struct Importer {
    root: PathBuf,
    installer: Arc<Installer>,
    loader: Arc<dyn ModuleLoader>,
    locks: Arc<SlotLocks>,
}

impl Importer {
    pub fn new(
        root: PathBuf,
        installer: Arc<Installer>,
        loader: Arc<dyn ModuleLoader>,
        locks: Arc<SlotLocks>,
    ) -> Self {
        Self {
            root,
            installer,
            loader,
            locks,
        }
    }

    /// Return a loaded module for `spec`
    ///
    /// A load failure triggers a forced reinstall while retry budget remains;
    /// once exhausted the last load error is returned unchanged. Install
    /// failures are returned immediately.
    pub async fn safe_import(
        &self,
        spec: &PackageSpec,
        policy: RetryPolicy,
    ) -> LazydepResult<LoadedModule> {
        let _guard = self.locks.acquire(spec.identifier()).await;

        let slot = CacheSlot::new(&self.root, spec.identifier());
        let module_dir = slot.module_dir();
        let mut remaining = policy.max_retries;
        let mut force = policy.force_install;

        loop {
            let state = Self::check(force, module_dir.exists());
            info!("Cache {} for {}", state, spec.identifier());

            if state != CacheState::Hit {
                self.installer.install_locked(spec).await?;
            }

            match self.loader.load(spec, &module_dir).await {
                Ok(module) => return Ok(module),
                Err(e) if e.is_load_failure() && remaining > 0 => {
                    warn!(
                        "{}; reinstalling ({} {} left)",
                        e,
                        remaining,
                        if remaining == 1 { "retry" } else { "retries" }
                    );
                    remaining -= 1;
                    force = true;
                }
                Err(e) => {
                    error!("Giving up on {}: {}", spec.identifier(), e);
                    return Err(e);
                }
            }
        }
    }

    fn check(force: bool, module_present: bool) -> CacheState {
        match (force, module_present) {
            (true, _) => CacheState::Forced,
            (false, true) => CacheState::Hit,
            (false, false) => CacheState::Miss,
        }
    }
}
