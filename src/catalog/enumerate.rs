//! Catalog unit discovery

use crate::error::{StockpotError, StockpotResult};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// An installable unit found in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub name: String,
    pub path: PathBuf,
}

/// Whether a directory entry name is hidden
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// List the units (visible child directories) of a catalog subtree.
///
/// Entries come back in filesystem order. Symlinks to directories count as
/// units. Each call reads the disk again; nothing is cached.
pub fn list_units(subtree: &Path) -> StockpotResult<Vec<CatalogEntry>> {
    if !subtree.exists() {
        return Err(StockpotError::CatalogNotFound(subtree.to_path_buf()));
    }

    let entries = fs::read_dir(subtree)
        .map_err(|e| StockpotError::io(format!("reading catalog {}", subtree.display()), e))?;

    let mut units = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| StockpotError::io(format!("reading catalog {}", subtree.display()), e))?;

        let name = entry.file_name().to_string_lossy().into_owned();
        if is_hidden(&name) {
            continue;
        }

        let path = entry.path();
        // fs::metadata follows symlinks
        match fs::metadata(&path) {
            Ok(metadata) if metadata.is_dir() => units.push(CatalogEntry { name, path }),
            Ok(_) => {}
            Err(e) => warn!("Skipping unreadable catalog entry {}: {}", path.display(), e),
        }
    }

    debug!("Found {} units in {}", units.len(), subtree.display());
    Ok(units)
}
