//! Registry URL resolution
//!
//! An empty `registry.url` is filled by asking the package manager for its
//! configured registry. Resolution is a value transformation
//! `(config) -> (config', url)`; [`RegistryResolver`] serializes it so that
//! concurrent installs trigger at most one discovery, and leaves persisting
//! the updated config to the caller.

use crate::config::RegistryConfig;
use crate::error::{LazydepError, LazydepResult};
use crate::package::PackageManager;
use crate::process::Executor;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Ask the package manager which registry it uses
pub async fn discover(executor: &dyn Executor, manager: PackageManager) -> LazydepResult<String> {
    let command = manager.registry_query();
    let result = executor
        .run(&command, &|_| {})
        .await
        .map_err(|e| LazydepError::Resolution(format!("{} failed: {}", command, e)))?;

    let url = result
        .stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .unwrap_or_default();

    if url.is_empty() {
        return Err(LazydepError::Resolution(format!(
            "{} returned no registry",
            command
        )));
    }
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(LazydepError::Resolution(format!(
            "{} returned a non-URL value: {}",
            command, url
        )));
    }

    Ok(url.to_string())
}

/// Resolve the registry URL for `config`
///
/// A configured URL is returned unchanged without running anything.
pub async fn resolve(
    config: RegistryConfig,
    executor: &dyn Executor,
    manager: PackageManager,
) -> LazydepResult<(RegistryConfig, String)> {
    if !config.is_unresolved() {
        let url = config.url.clone();
        return Ok((config, url));
    }

    let url = discover(executor, manager).await?;
    info!("Discovered registry: {}", url);
    Ok((RegistryConfig { url: url.clone() }, url))
}

/// Holds the process-wide registry config and fills it lazily, once
pub struct RegistryResolver {
    config: Mutex<RegistryConfig>,
    executor: Arc<dyn Executor>,
    manager: PackageManager,
}

impl RegistryResolver {
    pub fn new(config: RegistryConfig, executor: Arc<dyn Executor>, manager: PackageManager) -> Self {
        Self {
            config: Mutex::new(config),
            executor,
            manager,
        }
    }

    /// Registry URL, discovering and storing it on first use
    ///
    /// Failed discovery leaves the stored config empty so the next call tries
    /// again.
    pub async fn url(&self) -> LazydepResult<String> {
        let mut config = self.config.lock().await;
        if !config.is_unresolved() {
            debug!("Using configured registry {}", config.url);
            return Ok(config.url.clone());
        }

        let (updated, url) = resolve(config.clone(), &*self.executor, self.manager).await?;
        *config = updated;
        Ok(url)
    }

    /// Current registry config, including any discovered URL
    pub async fn config(&self) -> RegistryConfig {
        self.config.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::fake::FakeExecutor;
    use crate::process::{LoggingExecutor, ProcessResult};

    fn npm_answering(stdout: &'static str) -> Arc<FakeExecutor> {
        Arc::new(FakeExecutor::new().respond(move |_| ProcessResult {
            exit_code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }))
    }

    #[tokio::test]
    async fn configured_url_skips_discovery() {
        let fake = npm_answering("https://other.example/");
        let config = RegistryConfig {
            url: "https://registry.example.com/".to_string(),
        };

        let (out, url) = resolve(config.clone(), &*fake, PackageManager::Npm)
            .await
            .unwrap();

        assert_eq!(url, "https://registry.example.com/");
        assert_eq!(out, config);
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn empty_url_is_discovered() {
        let fake = npm_answering("https://registry.npmjs.org/\n");
        let (out, url) = resolve(RegistryConfig::default(), &*fake, PackageManager::Npm)
            .await
            .unwrap();

        assert_eq!(url, "https://registry.npmjs.org/");
        assert_eq!(out.url, url);
        assert_eq!(fake.count("config"), 1);
    }

    #[tokio::test]
    async fn garbage_answer_is_resolution_error() {
        let fake = npm_answering("undefined");
        let err = discover(&*fake, PackageManager::Npm).await.unwrap_err();
        assert!(matches!(err, LazydepError::Resolution(_)));

        let fake = npm_answering("");
        let err = discover(&*fake, PackageManager::Npm).await.unwrap_err();
        assert!(matches!(err, LazydepError::Resolution(_)));
    }

    #[tokio::test]
    async fn failing_command_is_resolution_error() {
        let runner = LoggingExecutor::new(FakeExecutor::new().respond(|_| ProcessResult {
            exit_code: 1,
            stdout: String::new(),
            stderr: "boom".to_string(),
        }));
        let err = discover(&runner, PackageManager::Yarn).await.unwrap_err();
        assert!(matches!(err, LazydepError::Resolution(_)));
        assert!(err.to_string().contains("config get registry"));
    }

    #[tokio::test]
    async fn resolver_discovers_at_most_once() {
        let fake = npm_answering("https://registry.npmjs.org/");
        let resolver = RegistryResolver::new(
            RegistryConfig::default(),
            fake.clone(),
            PackageManager::Npm,
        );

        let (a, b) = tokio::join!(resolver.url(), resolver.url());
        assert_eq!(a.unwrap(), "https://registry.npmjs.org/");
        assert_eq!(b.unwrap(), "https://registry.npmjs.org/");
        resolver.url().await.unwrap();

        assert_eq!(fake.count("config"), 1);
        assert!(!resolver.config().await.is_unresolved());
    }

    #[tokio::test]
    async fn failed_discovery_is_not_cached() {
        let fake = Arc::new(FakeExecutor::new().fail_spawn());
        let resolver = RegistryResolver::new(
            RegistryConfig::default(),
            fake.clone(),
            PackageManager::Npm,
        );

        assert!(resolver.url().await.is_err());
        assert!(resolver.url().await.is_err());
        assert_eq!(fake.calls().len(), 2);
        assert!(resolver.config().await.is_unresolved());
    }
}
