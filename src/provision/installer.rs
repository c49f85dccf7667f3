//! Unit installation
//!
//! Copies catalog units into `<project>/<source_dir>/<namespace>/<unit>`.
//! Reinstalling a unit replaces its previous copy outright; sibling units
//! are never touched.

use crate::catalog::is_hidden;
use crate::error::{StockpotError, StockpotResult};
use crate::provision::select::SelectionSet;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A unit copied into the project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledUnit {
    pub name: String,
    pub path: PathBuf,
}

/// Validate that a unit name is safe (no path traversal, not hidden).
pub fn validate_unit_name(name: &str) -> StockpotResult<()> {
    let invalid = |reason: &str| StockpotError::InvalidUnitName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if name.contains('/') || name.contains('\\') || name.contains("..") || name.contains('\0') {
        return Err(invalid("must not contain path separators or '..'"));
    }
    if is_hidden(name) {
        return Err(invalid("hidden entries are not units"));
    }
    Ok(())
}

/// Copy each selected unit from `source_catalog` into `destination_root`.
///
/// The whole selection is validated before the first copy. An empty
/// selection returns immediately without touching the filesystem. A copy
/// failure stops the run; units copied before it stay in place.
pub fn install_units(
    selection: &SelectionSet,
    source_catalog: &Path,
    destination_root: &Path,
) -> StockpotResult<Vec<InstalledUnit>> {
    if selection.is_empty() {
        debug!("Empty selection, nothing to install");
        return Ok(Vec::new());
    }

    if !source_catalog.is_dir() {
        return Err(StockpotError::CatalogNotFound(source_catalog.to_path_buf()));
    }

    for name in selection.iter() {
        validate_unit_name(name)?;
        if !source_catalog.join(name).is_dir() {
            return Err(StockpotError::UnitNotFound {
                name: name.to_string(),
                catalog: source_catalog.to_path_buf(),
            });
        }
    }

    ensure_dir(destination_root)?;

    let mut installed = Vec::with_capacity(selection.len());
    for name in selection.iter() {
        let source = source_catalog.join(name);
        let destination = destination_root.join(name);

        info!("Installing {} into {}", name, destination.display());
        remove_existing(&destination)?;
        copy_tree(&source, &destination)?;

        installed.push(InstalledUnit {
            name: name.to_string(),
            path: destination,
        });
    }

    Ok(installed)
}

/// Copy every entry of `source` into `destination_root`.
///
/// Each top-level entry replaces its previous copy; other entries already
/// present in the destination are kept.
pub fn install_whole(
    name: &str,
    source: &Path,
    destination_root: &Path,
) -> StockpotResult<InstalledUnit> {
    if !source.is_dir() {
        return Err(StockpotError::CatalogNotFound(source.to_path_buf()));
    }

    ensure_dir(destination_root)?;

    for entry in read_entries(source)? {
        let destination = destination_root.join(entry.file_name());
        remove_existing(&destination)?;
        copy_entry(&entry.path(), &destination)?;
    }

    info!("Installed {} into {}", name, destination_root.display());
    Ok(InstalledUnit {
        name: name.to_string(),
        path: destination_root.to_path_buf(),
    })
}

/// Recursively copy the directory `source` to `destination`.
///
/// `source` itself may be a symlink to a directory; symlinks below it are
/// recreated rather than followed.
pub fn copy_tree(source: &Path, destination: &Path) -> StockpotResult<()> {
    fs::create_dir_all(destination)
        .map_err(|e| StockpotError::io(format!("creating {}", destination.display()), e))?;

    for entry in read_entries(source)? {
        copy_entry(&entry.path(), &destination.join(entry.file_name()))?;
    }
    Ok(())
}

fn copy_entry(source: &Path, destination: &Path) -> StockpotResult<()> {
    let metadata = fs::symlink_metadata(source)
        .map_err(|e| StockpotError::io(format!("inspecting {}", source.display()), e))?;

    if metadata.file_type().is_symlink() {
        copy_symlink(source, destination)
    } else if metadata.is_dir() {
        copy_tree(source, destination)
    } else {
        fs::copy(source, destination)
            .map(|_| ())
            .map_err(|e| {
                StockpotError::io(
                    format!("copying {} to {}", source.display(), destination.display()),
                    e,
                )
            })
    }
}

#[cfg(unix)]
fn copy_symlink(source: &Path, destination: &Path) -> StockpotResult<()> {
    let target = fs::read_link(source)
        .map_err(|e| StockpotError::io(format!("reading link {}", source.display()), e))?;
    std::os::unix::fs::symlink(&target, destination)
        .map_err(|e| StockpotError::io(format!("linking {}", destination.display()), e))
}

#[cfg(not(unix))]
fn copy_symlink(source: &Path, destination: &Path) -> StockpotResult<()> {
    if source.is_dir() {
        copy_tree(source, destination)
    } else {
        fs::copy(source, destination).map(|_| ()).map_err(|e| {
            StockpotError::io(
                format!("copying {} to {}", source.display(), destination.display()),
                e,
            )
        })
    }
}

fn read_entries(dir: &Path) -> StockpotResult<Vec<fs::DirEntry>> {
    fs::read_dir(dir)
        .and_then(|entries| entries.collect::<Result<Vec<_>, _>>())
        .map_err(|e| StockpotError::io(format!("reading directory {}", dir.display()), e))
}

fn ensure_dir(dir: &Path) -> StockpotResult<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .map_err(|e| StockpotError::io(format!("creating directory {}", dir.display()), e))?;
    }
    Ok(())
}

/// Remove a previous copy, whatever kind of entry it is
fn remove_existing(path: &Path) -> StockpotResult<()> {
    let Ok(metadata) = fs::symlink_metadata(path) else {
        return Ok(());
    };

    debug!("Replacing existing {}", path.display());
    let result = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| StockpotError::io(format!("removing {}", path.display()), e))
}
