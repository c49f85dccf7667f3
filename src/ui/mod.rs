//! Terminal output for Stockpot commands
//!
//! Uses `cliclack` for prompts, spinners and step logs in interactive
//! terminals, with plain `[OK]`/`[WARN]` lines in CI and pipes.
//!
//! # Example
//!
//! ```rust,ignore
//! use stockpot::ui::{self, StepKind, TaskSpinner, UiContext};
//!
//! let ctx = UiContext::detect();
//!
//! ui::intro(&ctx, "Adding to my-app");
//!
//! let mut spinner = TaskSpinner::new(&ctx);
//! spinner.start("Syncing catalog...");
//! spinner.stop("Catalog up to date");
//!
//! let picked = ui::multiselect(&ctx, "Select modules to import", &names).await?;
//! ui::outro(&ctx, StepKind::Ok, "Project updated");
//! ```

mod context;
mod output;
mod progress;
mod prompts;

pub use context::UiContext;
pub use output::{
    dependency_summary, intro, namespace_summary, outro, step, step_with, StepKind,
};
pub use progress::{InstallProgress, TaskSpinner};
pub use prompts::{confirm, multiselect};
