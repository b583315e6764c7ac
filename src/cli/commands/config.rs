//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::{LazydepError, LazydepResult};
use crate::package::PackageManager;
use crate::ui::{self, Status, UiContext};
use std::path::PathBuf;

/// Keys accepted by `config set`
const VALID_KEYS: &[&str] = &[
    "general.log_format",
    "general.audit_log",
    "cache.package_path",
    "registry.url",
    "installer.package_manager",
    "installer.max_retries",
];

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    config: &Config,
    manager: &ConfigManager,
) -> LazydepResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => {
            let ctx = UiContext::detect();
            if !VALID_KEYS.contains(&key.as_str()) {
                let valid = format!("valid keys: {}", VALID_KEYS.join(", "));
                ui::status_detail(
                    &ctx,
                    Status::Fail,
                    &format!("Unknown config key {}", key),
                    Some(&valid),
                );
                return Err(LazydepError::User(format!("Unknown config key: {}", key)));
            }

            let mut updated = config.clone();
            apply_value(&mut updated, &key, &value)?;
            manager.save(&updated).await?;
            ui::status(&ctx, Status::Ok, &format!("Set {} = {}", key, value));
        }
    }

    Ok(())
}

fn show_config(config: &Config) -> LazydepResult<()> {
    let toml = toml::to_string_pretty(config)?;
    println!("{}", toml);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> LazydepResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::status_detail(
            &ctx,
            Status::Warn,
            &format!("Config already exists at {}", path.display()),
            Some("use --force to overwrite"),
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    let shown = path.display().to_string();
    ui::status_detail(&ctx, Status::Ok, "Configuration initialized", Some(&shown));

    Ok(())
}

/// Set a dot-separated key on `config`, validating the value
fn apply_value(config: &mut Config, key: &str, value: &str) -> LazydepResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "log_format"] => {
            config.general.log_format = match value {
                "text" | "json" => value.to_string(),
                _ => {
                    return Err(LazydepError::User(format!(
                        "Invalid log format: {}. Use text or json",
                        value
                    )))
                }
            }
        }
        ["general", "audit_log"] => config.general.audit_log = parse_bool(value)?,
        ["cache", "package_path"] => {
            if value.trim().is_empty() {
                return Err(LazydepError::User("package_path cannot be empty".to_string()));
            }
            config.cache.package_path = PathBuf::from(value);
        }
        ["registry", "url"] => {
            if !value.is_empty() && !(value.starts_with("https://") || value.starts_with("http://"))
            {
                return Err(LazydepError::User(format!(
                    "Invalid registry URL: {}. Use http(s)://, or an empty value to rediscover",
                    value
                )));
            }
            config.registry.url = value.to_string();
        }
        ["installer", "package_manager"] => {
            config.installer.package_manager = PackageManager::parse(value).ok_or_else(|| {
                LazydepError::User(format!(
                    "Unknown package manager: {}. Use npm, yarn or pnpm",
                    value
                ))
            })?
        }
        ["installer", "max_retries"] => config.installer.max_retries = parse_u32(value)?,
        _ => return Err(LazydepError::User(format!("Unknown config key: {}", key))),
    }

    Ok(())
}

fn parse_bool(value: &str) -> LazydepResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(LazydepError::User(format!(
            "Invalid boolean value: {}. Use true/false",
            value
        ))),
    }
}

fn parse_u32(value: &str) -> LazydepResult<u32> {
    value
        .parse()
        .map_err(|_| LazydepError::User(format!("Invalid number: {}", value)))
}
