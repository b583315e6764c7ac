//! List command - show cached packages

use crate::cache::{CacheEntry, EntryState, PackageCache};
use crate::cli::args::{ListArgs, OutputFormat};
use crate::config::Config;
use crate::error::LazydepResult;
use crate::ui::{self, Status, UiContext};
use console::style;

/// Execute the list command
pub async fn execute(args: ListArgs, config: &Config) -> LazydepResult<()> {
    let cache = PackageCache::new(config);
    let entries = cache.list().await?;

    if entries.is_empty() {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => {
                let ctx = UiContext::detect();
                ui::status(
                    &ctx,
                    Status::Info,
                    &format!("No cached packages in {}", cache.root().display()),
                );
            }
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(&entries),
        OutputFormat::Json => print_json(&entries)?,
        OutputFormat::Plain => print_plain(&entries),
    }

    Ok(())
}

fn print_table(entries: &[CacheEntry]) {
    println!(
        "{:<40} {:<14} {:<14}",
        style("PACKAGE").bold(),
        style("VERSION").bold(),
        style("STATE").bold()
    );
    println!("{}", "-".repeat(68));

    let mut broken = 0;
    for entry in entries {
        let (version, state) = match &entry.state {
            EntryState::Installed { version, .. } => (version.as_str(), style("installed").green()),
            EntryState::Inconsistent { .. } => {
                broken += 1;
                ("-", style("inconsistent").yellow())
            }
        };
        println!("{:<40} {:<14} {:<14}", entry.identifier, version, state);
    }

    println!();
    println!("{} package(s)", entries.len());
    if broken > 0 {
        let ctx = UiContext::detect();
        ui::status_detail(
            &ctx,
            Status::Warn,
            &format!("{} slot(s) are inconsistent", broken),
            Some("run: lazydep import <package> --force"),
        );
    }
}

fn print_json(entries: &[CacheEntry]) -> LazydepResult<()> {
    let json = serde_json::to_string_pretty(entries)?;
    println!("{}", json);
    Ok(())
}

fn print_plain(entries: &[CacheEntry]) {
    for entry in entries {
        match entry.version() {
            Some(version) => println!("{}@{}", entry.identifier, version),
            None => println!("{}", entry.identifier),
        }
    }
}
