//! Recursive file listing for manifest discovery
//!
//! Symlinks are followed, so the walk tracks the canonical path of every
//! directory it enters and skips any directory it has already visited.

use crate::error::{StockpotError, StockpotResult};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use tracing::{debug, warn};

/// List every regular file under `root`, recursively.
///
/// Paths are absolute. Within a directory, entries are visited in name
/// order. Dangling symlinks are skipped; any other entry or directory that
/// cannot be read fails the whole walk.
pub fn walk(root: &Path) -> StockpotResult<Vec<PathBuf>> {
    let root = normalize_root(root)?;
    let mut visited = HashSet::new();
    let mut files = Vec::new();

    walk_dir(&root, &mut visited, &mut files)?;

    debug!("Walked {} files under {}", files.len(), root.display());
    Ok(files)
}

/// Make `root` absolute and terminate it with a separator
fn normalize_root(root: &Path) -> StockpotResult<PathBuf> {
    let absolute = std::path::absolute(root)
        .map_err(|e| StockpotError::io(format!("resolving {}", root.display()), e))?;

    let mut raw: OsString = absolute.into_os_string();
    if !raw.to_string_lossy().ends_with(std::path::is_separator) {
        raw.push(MAIN_SEPARATOR.to_string());
    }
    Ok(PathBuf::from(raw))
}

fn walk_dir(
    dir: &Path,
    visited: &mut HashSet<PathBuf>,
    files: &mut Vec<PathBuf>,
) -> StockpotResult<()> {
    let canonical = dir
        .canonicalize()
        .map_err(|e| StockpotError::io(format!("resolving {}", dir.display()), e))?;
    if !visited.insert(canonical) {
        debug!("Skipping already visited directory {}", dir.display());
        return Ok(());
    }

    let mut entries = fs::read_dir(dir)
        .map_err(|e| StockpotError::io(format!("reading directory {}", dir.display()), e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| StockpotError::io(format!("reading directory {}", dir.display()), e))?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let metadata = match fs::metadata(&path) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound && is_symlink(&path) => {
                warn!("Skipping dangling symlink {}", path.display());
                continue;
            }
            Err(e) => {
                return Err(StockpotError::io(format!("reading {}", path.display()), e));
            }
        };

        if metadata.is_dir() {
            walk_dir(&path, visited, files)?;
        } else if metadata.is_file() {
            files.push(path);
        }
    }

    Ok(())
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}
