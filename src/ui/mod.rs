//! Terminal output for lazydep commands
//!
//! Uses `cliclack` spinners, log lines and prompts in a terminal, and falls
//! back to plain tagged lines in CI/non-interactive environments.
//!
//! # Example
//!
//! ```rust,ignore
//! use lazydep::ui::{self, Status, TaskSpinner, UiContext};
//!
//! let ctx = UiContext::detect();
//!
//! let mut spinner = TaskSpinner::new(&ctx);
//! spinner.start("Installing left-pad@latest...");
//! // ... install ...
//! spinner.stop("Installed left-pad@latest");
//!
//! ui::field(&ctx, "Entry", entry.display());
//! ui::status(&ctx, Status::Warn, "left-pad is not cached");
//! ```

mod context;
mod output;
mod progress;
mod prompts;

pub use context::UiContext;
pub use output::{field, status, status_detail, Status};
pub use progress::TaskSpinner;
pub use prompts::confirm;
