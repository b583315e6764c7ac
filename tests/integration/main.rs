//! Integration tests for lazydep

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn lazydep() -> Command {
        cargo_bin_cmd!("lazydep")
    }

    /// Temp dir holding a config file that points the cache inside it
    struct Sandbox {
        dir: TempDir,
    }

    impl Sandbox {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let cache = dir.path().join("cache");
            let config = format!(
                "[general]\naudit_log = false\n\n[cache]\npackage_path = {:?}\n\n[registry]\nurl = \"https://registry.npmjs.org/\"\n",
                cache.display().to_string()
            );
            std::fs::write(dir.path().join("config.toml"), config).unwrap();
            Self { dir }
        }

        fn config_path(&self) -> PathBuf {
            self.dir.path().join("config.toml")
        }

        fn cache_root(&self) -> PathBuf {
            self.dir.path().join("cache")
        }

        /// Command with this sandbox's config and no package manager on PATH
        fn cmd(&self) -> Command {
            let mut cmd = lazydep();
            cmd.arg("--config").arg(self.config_path()).env("PATH", "");
            cmd
        }

        fn install_fixture(&self, slot: &str, identifier: &str, version: &str) {
            let module = self.cache_root().join(slot).join("node_modules").join(identifier);
            std::fs::create_dir_all(&module).unwrap();
            std::fs::write(
                module.join("package.json"),
                format!(r#"{{"name":"{}","version":"{}","main":"index.js"}}"#, identifier, version),
            )
            .unwrap();
            std::fs::write(module.join("index.js"), "module.exports = 1;\n").unwrap();
        }
    }

    fn slot_manifest(root: &Path, slot: &str) -> PathBuf {
        root.join(slot).join("package.json")
    }

    #[test]
    fn help_displays() {
        lazydep()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("self-healing local cache"))
            .stdout(predicate::str::contains("import"));
    }

    #[test]
    fn version_displays() {
        lazydep()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("lazydep"));
    }

    #[test]
    fn config_path_uses_flag() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[installer]"))
            .stdout(predicate::str::contains("registry.npmjs.org"));
    }

    #[test]
    fn config_set_unknown_key_fails() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["config", "set", "vm.name", "x"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }

    #[test]
    fn config_set_persists() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["config", "set", "installer.package_manager", "pnpm"])
            .assert()
            .success();

        let saved = std::fs::read_to_string(sandbox.config_path()).unwrap();
        assert!(saved.contains("package_manager = \"pnpm\""));
    }

    #[test]
    fn list_empty() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No cached packages"));
    }

    #[test]
    fn list_json_reports_slots() {
        let sandbox = Sandbox::new();
        sandbox.install_fixture("%40scope%2Fname", "@scope/name", "2.0.0");
        sandbox.install_fixture("left-pad", "left-pad", "1.3.0");

        let output = sandbox
            .cmd()
            .args(["list", "--format", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let entries = entries.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["identifier"], "@scope/name");
        assert_eq!(entries[0]["version"], "2.0.0");
        assert_eq!(entries[1]["identifier"], "left-pad");
    }

    #[test]
    fn import_cached_package_does_not_spawn() {
        let sandbox = Sandbox::new();
        sandbox.install_fixture("left-pad", "left-pad", "1.3.0");

        sandbox
            .cmd()
            .args(["import", "left-pad"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Loaded left-pad@1.3.0"));
    }

    #[test]
    fn import_broken_package_without_retries_fails() {
        let sandbox = Sandbox::new();
        let module = sandbox
            .cache_root()
            .join("left-pad")
            .join("node_modules")
            .join("left-pad");
        std::fs::create_dir_all(&module).unwrap();

        sandbox
            .cmd()
            .args(["import", "left-pad", "--retries", "0"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to load left-pad"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn add_without_package_manager_leaves_slot() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["add", "@scope/name@1.0.0"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to install @scope/name"))
            .stderr(predicate::str::contains("PATH"));

        assert!(slot_manifest(&sandbox.cache_root(), "%40scope%2Fname").is_file());
    }

    #[test]
    fn add_rejects_invalid_identifier() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["add", "../escape"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid package identifier"));

        assert!(!sandbox.cache_root().exists());
    }

    #[test]
    fn remove_missing_package() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["remove", "left-pad", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("not cached"));
    }

    #[test]
    fn remove_deletes_slot() {
        let sandbox = Sandbox::new();
        sandbox.install_fixture("left-pad", "left-pad", "1.3.0");

        sandbox
            .cmd()
            .args(["remove", "left-pad", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Removed left-pad"));

        assert!(!sandbox.cache_root().join("left-pad").exists());
    }
}
