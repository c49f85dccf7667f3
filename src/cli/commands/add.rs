//! Add command - import catalog units into a project

use super::sync::render_sync_signal;
use crate::catalog::SyncAction;
use crate::cli::args::AddArgs;
use crate::config::Config;
use crate::error::{StockpotError, StockpotResult};
use crate::history::HistoryLog;
use crate::package_manager::CliPackageManager;
use crate::provision::{
    AllSelector, InstallPolicy, PresetSelector, PromptSelector, Provisioner, RunReport,
    UnitSelector,
};
use crate::ui::{self, InstallProgress, StepKind, TaskSpinner, UiContext};
use crate::vcs::GitCli;
use std::sync::Mutex;
use tracing::debug;

/// Execute the add command
pub async fn execute(args: AddArgs, config: &Config) -> StockpotResult<()> {
    let ctx = UiContext::detect();
    let namespaces = args.namespaces();

    let selectable = namespaces
        .iter()
        .filter(|ns| ns.policy() == InstallPolicy::Selectable)
        .count();
    if !args.select.is_empty() && selectable > 1 {
        return Err(StockpotError::User(
            "--select names units of one namespace; pass only -m or only -c".to_string(),
        ));
    }

    let selector: Box<dyn UnitSelector> = if args.all {
        Box::new(AllSelector)
    } else if !args.select.is_empty() {
        Box::new(PresetSelector::new(args.select.clone()))
    } else {
        Box::new(PromptSelector::new(ctx.clone()))
    };
    let vcs = GitCli::new();
    let package_manager = CliPackageManager::from_config(&config.package_manager);

    ui::intro(&ctx, &format!("Adding to {}", args.project.display()));
    debug!("Namespaces: {:?}", namespaces);

    let spinner = Mutex::new(TaskSpinner::new(&ctx));
    let on_sync = |signal| render_sync_signal(&spinner, signal);

    let progress: Mutex<Option<InstallProgress>> = Mutex::new(None);
    let on_output = |line: String| {
        if let Ok(mut progress) = progress.lock() {
            progress
                .get_or_insert_with(|| InstallProgress::new(&ctx, &config.package_manager.program))
                .on_line(line);
        }
    };

    let result = Provisioner::new(config, &vcs, selector.as_ref(), &package_manager)
        .offline(args.offline)
        .on_sync(&on_sync)
        .on_output(&on_output)
        .run(&args.project, &namespaces)
        .await;

    if let Ok(mut progress) = progress.lock() {
        if let Some(progress) = progress.take() {
            progress.finish();
        }
    }

    let report = result?;
    for namespace in &report.namespaces {
        ui::namespace_summary(&ctx, namespace);
    }
    ui::dependency_summary(&ctx, &report.dependencies, report.dependency_output.as_ref());

    record_history(config, &args, &report).await;

    let imported: usize = report.namespaces.iter().map(|r| r.installed.len()).sum();
    if imported == 0 {
        ui::outro(&ctx, StepKind::Warn, "Nothing imported");
    } else {
        ui::outro(&ctx, StepKind::Ok, "Project updated");
    }
    Ok(())
}

async fn record_history(config: &Config, args: &AddArgs, report: &RunReport) {
    let sync = report.sync.as_ref().map(|outcome| match outcome.action {
        SyncAction::Cloned => "cloned",
        SyncAction::Pulled => "pulled",
    });

    let namespaces: Vec<serde_json::Value> = report
        .namespaces
        .iter()
        .map(|r| {
            serde_json::json!({
                "namespace": r.namespace.dir_name(),
                "units": r.installed.iter().map(|u| u.name.as_str()).collect::<Vec<_>>(),
                "dependencies": r.dependencies,
            })
        })
        .collect();

    HistoryLog::new(config)
        .record(
            "provision.completed",
            &serde_json::json!({
                "project": args.project,
                "remote": config.catalog.url,
                "sync": sync,
                "namespaces": namespaces,
                "dependencies": report.dependencies,
            }),
        )
        .await;
}
