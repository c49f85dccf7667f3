//! List command - show units available in the catalog

use super::sync::render_sync_signal;
use crate::catalog::{list_units, CacheRepository, CatalogEntry, SyncSignal};
use crate::cli::args::{ListArgs, OutputFormat};
use crate::config::Config;
use crate::error::StockpotResult;
use crate::provision::Namespace;
use crate::ui::{self, TaskSpinner, UiContext};
use crate::vcs::GitCli;
use console::style;
use std::sync::Mutex;

/// Execute the list command
pub async fn execute(args: ListArgs, config: &Config) -> StockpotResult<()> {
    // Machine-readable formats keep stdout free of progress output
    let ctx = match args.format {
        OutputFormat::Table => UiContext::detect(),
        OutputFormat::Json | OutputFormat::Plain => UiContext::non_interactive(),
    };

    let vcs = GitCli::new();
    let mut repo = CacheRepository::from_config(&config.catalog);
    let spinner = Mutex::new(TaskSpinner::new(&ctx));
    let on_sync = |signal: SyncSignal| {
        if matches!(args.format, OutputFormat::Table) {
            render_sync_signal(&spinner, signal);
        }
    };
    repo.ensure(&vcs, args.offline, &on_sync).await?;

    let listing = collect(repo.local_path(), &args)?;

    match args.format {
        OutputFormat::Table => print_table(&ctx, &listing),
        OutputFormat::Json => print_json(&listing)?,
        OutputFormat::Plain => print_plain(&listing),
    }

    Ok(())
}

/// Units per namespace, sorted by name
fn collect(
    catalog_root: &std::path::Path,
    args: &ListArgs,
) -> StockpotResult<Vec<(Namespace, Vec<CatalogEntry>)>> {
    let mut listing = Vec::new();

    for &namespace in Namespace::all() {
        if let Some(only) = args.namespace {
            if Namespace::from(only) != namespace {
                continue;
            }
        }

        let subtree = namespace.catalog_path(catalog_root);
        // An unfiltered listing skips namespaces the catalog doesn't have
        if args.namespace.is_none() && !subtree.is_dir() {
            continue;
        }

        let mut units = list_units(&subtree)?;
        units.sort_by(|a, b| a.name.cmp(&b.name));
        listing.push((namespace, units));
    }

    Ok(listing)
}

fn print_table(ctx: &UiContext, listing: &[(Namespace, Vec<CatalogEntry>)]) {
    ui::intro(ctx, "Catalog");

    let mut total = 0;
    for (namespace, units) in listing {
        println!();
        println!("{}", style(namespace.dir_name()).bold());
        if units.is_empty() {
            println!("  {}", style("(empty)").dim());
        }
        for unit in units {
            println!("  {}", unit.name);
        }
        total += units.len();
    }

    println!();
    println!("{} unit(s)", total);
}

fn print_json(listing: &[(Namespace, Vec<CatalogEntry>)]) -> StockpotResult<()> {
    let mut map = serde_json::Map::new();
    for (namespace, units) in listing {
        map.insert(namespace.dir_name().to_string(), serde_json::to_value(units)?);
    }

    println!("{}", serde_json::to_string_pretty(&map)?);
    Ok(())
}

fn print_plain(listing: &[(Namespace, Vec<CatalogEntry>)]) {
    for (namespace, units) in listing {
        for unit in units {
            println!("{}/{}", namespace.dir_name(), unit.name);
        }
    }
}
