//! Status command - check tools, catalog mirror and project layout

use crate::catalog::{CacheRepository, SyncState};
use crate::cli::args::StatusArgs;
use crate::config::Config;
use crate::error::StockpotResult;
use crate::history::HistoryLog;
use crate::package_manager::CliPackageManager;
use crate::provision::ProjectGate;
use crate::vcs::GitCli;
use console::{style, Emoji};
use std::path::Path;

static CHECK: Emoji<'_, '_> = Emoji("✓ ", "[OK] ");
static CROSS: Emoji<'_, '_> = Emoji("✗ ", "[FAIL] ");
static WARN: Emoji<'_, '_> = Emoji("⚠ ", "[WARN] ");

/// Execute the status command
pub async fn execute(args: StatusArgs, config: &Config) -> StockpotResult<()> {
    println!("{}", style("Stockpot Status").bold().magenta());

    let mut all_ok = true;

    println!();
    println!("{}", style("Tools:").bold());
    all_ok &= check_tool("git", GitCli::is_installed().await, "Install git");

    let package_manager = CliPackageManager::from_config(&config.package_manager);
    all_ok &= check_tool(
        &config.package_manager.program,
        package_manager.is_installed().await,
        "Install it or set package_manager.program",
    );

    println!();
    println!("{}", style("Catalog:").bold());
    println!("  Remote: {}", config.catalog.url);
    all_ok &= check_cache(config).await;

    let history = HistoryLog::new(config);
    if history.enabled() {
        println!("  History: {}", history.path().display());
    } else {
        println!("  History: {}", style("disabled").dim());
    }

    if let Some(ref project) = args.project {
        println!();
        println!("{}", style("Project:").bold());
        all_ok &= check_project(project, config);
    }

    println!();
    if all_ok {
        println!("{}", style("All checks passed").green().bold());
    } else {
        println!(
            "{}",
            style("Some checks failed - see above for details").yellow().bold()
        );
    }

    Ok(())
}

fn check_tool(name: &str, installed: bool, hint: &str) -> bool {
    if installed {
        println!("  {} {}", CHECK, name);
    } else {
        println!(
            "  {} {} {} - {}",
            CROSS,
            name,
            style("not found").red(),
            hint
        );
    }
    installed
}

async fn check_cache(config: &Config) -> bool {
    let mut repo = CacheRepository::from_config(&config.catalog);
    let path = repo.local_path().display().to_string();

    match repo.inspect(&GitCli::new()).await {
        Ok(SyncState::Stale | SyncState::Synced) => {
            println!("  {} Mirror at {}", CHECK, path);
            true
        }
        Ok(SyncState::Absent) if repo.local_path().exists() => {
            println!(
                "  {} {} at {} - Run: stockpot sync --fresh",
                WARN,
                style("Not a repository").yellow(),
                path
            );
            false
        }
        Ok(SyncState::Absent) => {
            println!(
                "  {} {} - Run: stockpot sync",
                WARN,
                style("Not cloned yet").yellow()
            );
            true
        }
        Err(e) => {
            println!("  {} {} - {}", CROSS, style("Error checking mirror").red(), e);
            false
        }
    }
}

fn check_project(project: &Path, config: &Config) -> bool {
    let gate = ProjectGate::from_config(&config.project);

    match gate.verify(project) {
        Ok(()) => {
            println!("  {} {} is ready", CHECK, project.display());
            true
        }
        Err(e) => {
            println!("  {} {}", CROSS, e);
            false
        }
    }
}
