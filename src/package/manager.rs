//! External package manager selection
//!
//! Every supported tool understands `add <pkg>@<version> --registry <url>`
//! and `config get registry`, so they differ only in program name and a few
//! flags.

use crate::package::PackageSpec;
use crate::process::CommandLine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Supported package managers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    /// Executable to invoke
    pub fn program(&self) -> &'static str {
        match (self, cfg!(windows)) {
            (Self::Npm, false) => "npm",
            (Self::Npm, true) => "npm.cmd",
            (Self::Yarn, false) => "yarn",
            (Self::Yarn, true) => "yarn.cmd",
            (Self::Pnpm, false) => "pnpm",
            (Self::Pnpm, true) => "pnpm.cmd",
        }
    }

    /// Build the "add package" command run inside a cache slot
    pub fn add_command(&self, spec: &PackageSpec, registry: &str, slot_dir: &Path) -> CommandLine {
        let mut args = vec![
            "add".to_string(),
            spec.install_target(),
            "--registry".to_string(),
            registry.to_string(),
        ];

        // Keep npm quiet about funding and audit reports
        if matches!(self, Self::Npm) {
            args.push("--no-audit".to_string());
            args.push("--no-fund".to_string());
        }

        CommandLine::new(self.program(), args).current_dir(slot_dir)
    }

    /// Build the command that prints the configured registry
    pub fn registry_query(&self) -> CommandLine {
        CommandLine::new(self.program(), ["config", "get", "registry"])
    }

    /// Parse from a config value
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "npm" => Some(Self::Npm),
            "yarn" => Some(Self::Yarn),
            "pnpm" => Some(Self::Pnpm),
            _ => None,
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
            Self::Pnpm => "pnpm",
        };
        write!(f, "{}", name)
    }
}
