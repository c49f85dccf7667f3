//! Progress indicators with CI fallback

use super::context::UiContext;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// A task spinner with CI fallback
pub struct TaskSpinner {
    spinner: Option<cliclack::ProgressBar>,
    interactive: bool,
}

impl TaskSpinner {
    pub fn new(ctx: &UiContext) -> Self {
        Self {
            spinner: None,
            interactive: ctx.use_fancy_output(),
        }
    }

    pub fn start(&mut self, message: &str) {
        if self.interactive {
            let spinner = cliclack::spinner();
            spinner.start(message);
            self.spinner = Some(spinner);
        } else {
            println!("{} {}", style("...").dim(), message);
        }
    }

    /// Stop with success message
    pub fn stop(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.stop(message);
        } else if self.interactive {
            println!("{} {}", style("✓").green(), message);
        } else {
            println!("{} {}", style("[OK]").green(), message);
        }
    }

    /// Stop with error message
    pub fn stop_error(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.error(message);
        } else if self.interactive {
            println!("{} {}", style("✗").red(), message);
        } else {
            println!("{} {}", style("[FAIL]").red(), message);
        }
    }
}

/// Progress bar for a dependency install.
///
/// Tracks yarn's `[N/M] Step...` lines with an indicatif bar in
/// interactive mode; in CI every output line is printed as-is.
pub struct InstallProgress {
    bar: Option<ProgressBar>,
}

impl InstallProgress {
    pub fn new(ctx: &UiContext, program: &str) -> Self {
        let bar = if ctx.use_fancy_output() {
            let bar = ProgressBar::new(0);
            if let Ok(bar_style) = ProgressStyle::default_bar().template(
                "  {spinner:.magenta} {prefix}  {bar:20.magenta/dim} {pos}/{len} {msg:.dim}  {elapsed:.dim}",
            ) {
                bar.set_style(
                    bar_style
                        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
                        .progress_chars("━╸─"),
                );
            }
            bar.set_prefix(format!("Installing with {}", program));
            bar.enable_steady_tick(std::time::Duration::from_millis(120));
            Some(bar)
        } else {
            println!("Installing dependencies with {}...", program);
            None
        };
        Self { bar }
    }

    /// Feed one output line from the package manager
    pub fn on_line(&self, line: String) {
        let Some(ref bar) = self.bar else {
            println!("  {}", line);
            return;
        };

        if let Some((n, total, step)) = parse_step_line(&line) {
            bar.set_length(total);
            bar.set_position(n);
            bar.set_message(step.to_string());
            return;
        }

        let trimmed = line.trim();
        if !trimmed.is_empty() && !is_install_noise(trimmed) {
            let display: String = if trimmed.chars().count() > 60 {
                format!("{}...", trimmed.chars().take(57).collect::<String>())
            } else {
                trimmed.to_string()
            };
            bar.set_message(display);
        }
    }

    /// Finish and clear the progress bar.
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.disable_steady_tick();
            bar.finish_and_clear();
        }
    }
}

/// Lines that carry no progress information
fn is_install_noise(line: &str) -> bool {
    line.starts_with("yarn add v")
        || line.starts_with("info Direct dependencies")
        || line.starts_with("info All dependencies")
        || line.starts_with("├─")
        || line.starts_with("└─")
}

/// Parse a yarn step line like `[2/4] Fetching packages...`
fn parse_step_line(line: &str) -> Option<(u64, u64, &str)> {
    let rest = line.trim_start().strip_prefix('[')?;
    let close = rest.find(']')?;
    let (n, total) = rest[..close].split_once('/')?;
    let n: u64 = n.trim().parse().ok()?;
    let total: u64 = total.trim().parse().ok()?;
    let step = rest[close + 1..].trim();
    Some((n, total, step))
}
