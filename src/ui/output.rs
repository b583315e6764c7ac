//! Status lines for command output
//!
//! Every message a command prints goes through [`status`] or [`field`], so
//! fancy and plain output stay in step.

use super::context::UiContext;
use console::{style, StyledObject};
use std::fmt::Display;

/// Outcome a status line reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Info,
    Warn,
    Fail,
}

impl Status {
    /// Bracketed tag used when output is not a terminal
    fn tag(self) -> StyledObject<&'static str> {
        match self {
            Self::Ok => style("[OK]").green(),
            Self::Info => style("[INFO]").cyan(),
            Self::Warn => style("[WARN]").yellow(),
            Self::Fail => style("[FAIL]").red(),
        }
    }
}

/// Render `message`, with `detail` in parentheses when given
fn compose(message: &str, detail: Option<&str>, fancy: bool) -> String {
    match detail {
        Some(detail) if fancy => format!("{} ({})", message, style(detail).dim()),
        Some(detail) => format!("{} ({})", message, detail),
        None => message.to_string(),
    }
}

/// Print one status line, e.g. "Installed left-pad@1.3.0"
pub fn status(ctx: &UiContext, status: Status, message: &str) {
    status_detail(ctx, status, message, None);
}

/// Print a status line with a secondary detail such as a path or hint
pub fn status_detail(ctx: &UiContext, status: Status, message: &str, detail: Option<&str>) {
    let fancy = ctx.use_fancy_output();
    let text = compose(message, detail, fancy);

    if !fancy {
        println!("  {} {}", status.tag(), text);
        return;
    }

    let _ = match status {
        Status::Ok => cliclack::log::success(text),
        Status::Info => cliclack::log::info(text),
        Status::Warn => cliclack::log::warning(text),
        Status::Fail => cliclack::log::error(text),
    };
}

/// Print an indented `key: value` line, e.g. a module's entry file
pub fn field(ctx: &UiContext, key: &str, value: impl Display) {
    if ctx.use_fancy_output() {
        println!("  {}: {}", style(key).dim(), value);
    } else {
        println!("  {}: {}", key, value);
    }
}
