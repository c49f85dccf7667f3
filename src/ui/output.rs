//! Step lines and provisioning summaries
//!
//! Every line goes through [`step`]: cliclack's log in a terminal, a
//! bracketed tag such as `[OK]` otherwise, so CI logs stay greppable.

use super::context::UiContext;
use crate::catalog::DependencyList;
use crate::package_manager::InstallOutput;
use crate::provision::ProvisionReport;
use console::{style, StyledObject};

/// What a step line reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Ok,
    Warn,
    Fail,
    Info,
    /// Dimmed side note, no tag
    Remark,
}

impl StepKind {
    fn tag(self) -> Option<StyledObject<&'static str>> {
        match self {
            StepKind::Ok => Some(style("[OK]").green()),
            StepKind::Warn => Some(style("[WARN]").yellow()),
            StepKind::Fail => Some(style("[FAIL]").red()),
            StepKind::Info => Some(style("[INFO]").magenta()),
            StepKind::Remark => None,
        }
    }

    /// `message` with `detail` attached the way this kind reads best
    fn compose(self, message: &str, detail: Option<&str>) -> String {
        match (self, detail) {
            (_, None) => message.to_string(),
            (StepKind::Fail, Some(d)) => format!("{}: {}", message, style(d).red()),
            (StepKind::Warn, Some(d)) => format!("{} - {}", message, style(d).dim()),
            (_, Some(d)) => format!("{} ({})", message, style(d).dim()),
        }
    }
}

/// Print one step line
pub fn step(ctx: &UiContext, kind: StepKind, message: &str) {
    step_with(ctx, kind, message, None);
}

/// Print one step line with a detail (units, a hint, the failing key)
pub fn step_with(ctx: &UiContext, kind: StepKind, message: &str, detail: Option<&str>) {
    let text = kind.compose(message, detail);

    if ctx.use_fancy_output() {
        let _ = match kind {
            StepKind::Ok => cliclack::log::success(text),
            StepKind::Warn => cliclack::log::warning(text),
            StepKind::Fail => cliclack::log::error(text),
            StepKind::Info => cliclack::log::info(text),
            StepKind::Remark => cliclack::log::remark(text),
        };
        return;
    }

    match kind.tag() {
        Some(tag) => println!("  {} {}", tag, text),
        None => println!("  {}", style(text).dim()),
    }
}

/// Title line opening a command
pub fn intro(ctx: &UiContext, title: &str) {
    let title = style(title).magenta().bold();
    if ctx.use_fancy_output() {
        cliclack::intro(title).ok();
    } else {
        println!("{}\n", title);
    }
}

/// Closing line; only `Ok` renders as success, anything else as a warning
pub fn outro(ctx: &UiContext, kind: StepKind, message: &str) {
    let success = kind == StepKind::Ok;
    if ctx.use_fancy_output() {
        let message = if success {
            style(message).green().bold()
        } else {
            style(message).yellow().bold()
        };
        cliclack::outro(message).ok();
    } else {
        let tag = if success {
            style("[OK]").green()
        } else {
            style("[WARN]").yellow()
        };
        println!("\n{} {}", tag, message);
    }
}

/// What one namespace brought into the project
pub fn namespace_summary(ctx: &UiContext, report: &ProvisionReport) {
    if report.installed.is_empty() {
        step(ctx, StepKind::Info, &format!("No {} imported", report.namespace));
        return;
    }

    let names: Vec<&str> = report.installed.iter().map(|u| u.name.as_str()).collect();
    step_with(
        ctx,
        StepKind::Ok,
        &format!("Imported {}", report.namespace),
        Some(&names.join(", ")),
    );
}

/// Outcome of the single package manager call of a run
pub fn dependency_summary(ctx: &UiContext, deps: &DependencyList, output: Option<&InstallOutput>) {
    match output {
        Some(output) => step_with(
            ctx,
            StepKind::Ok,
            &format!("{} dependencies installed", deps.len()),
            Some(&output.command),
        ),
        None => step(ctx, StepKind::Remark, "No dependencies to install"),
    }
}
