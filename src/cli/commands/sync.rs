//! Sync command - clone or update the catalog mirror

use crate::catalog::{CacheRepository, SyncAction, SyncSignal};
use crate::cli::args::SyncArgs;
use crate::config::Config;
use crate::error::StockpotResult;
use crate::history::HistoryLog;
use crate::ui::{self, StepKind, TaskSpinner, UiContext};
use crate::vcs::GitCli;
use std::sync::Mutex;

/// Execute the sync command
pub async fn execute(args: SyncArgs, config: &Config) -> StockpotResult<()> {
    let ctx = UiContext::detect().with_auto_yes(args.yes);
    let vcs = GitCli::new();
    let mut repo = CacheRepository::from_config(&config.catalog);

    ui::intro(&ctx, "Catalog sync");

    if args.fresh && repo.local_path().exists() {
        let prompt = format!("Delete {} and clone again?", repo.local_path().display());
        if !ui::confirm(&ctx, &prompt, false).await? {
            ui::outro(&ctx, StepKind::Warn, "Cancelled, mirror left as-is (use --yes in scripts)");
            return Ok(());
        }
        repo.reset().await?;
    }

    let spinner = Mutex::new(TaskSpinner::new(&ctx));
    let outcome = repo
        .sync(&vcs, &|signal| render_sync_signal(&spinner, signal))
        .await?;

    let action = match outcome.action {
        SyncAction::Cloned => "cloned",
        SyncAction::Pulled => "pulled",
    };

    HistoryLog::new(config)
        .record(
            "catalog.synced",
            &serde_json::json!({
                "remote": repo.remote(),
                "path": outcome.path,
                "action": action,
            }),
        )
        .await;

    ui::outro(
        &ctx,
        StepKind::Ok,
        &format!("Catalog {} into {}", action, outcome.path.display()),
    );
    Ok(())
}

/// Drive a spinner from catalog sync signals
pub(crate) fn render_sync_signal(spinner: &Mutex<TaskSpinner>, signal: SyncSignal) {
    let Ok(mut spinner) = spinner.lock() else {
        return;
    };

    match signal {
        SyncSignal::Started { remote } => spinner.start(&format!("Syncing catalog {}", remote)),
        SyncSignal::Finished { success: true } => spinner.stop("Catalog up to date"),
        SyncSignal::Finished { success: false } => spinner.stop_error("Catalog sync failed"),
    }
}
