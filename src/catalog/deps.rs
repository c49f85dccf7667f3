//! Dependency manifest aggregation
//!
//! Units declare third-party dependencies in manifest files (one specifier
//! per line). Aggregation collects the manifests of everything installed in
//! a namespace and produces one sorted, duplicate-free list.

use crate::catalog::walk::walk;
use crate::error::{StockpotError, StockpotResult};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Sorted, duplicate-free dependency specifiers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyList(Vec<String>);

impl DependencyList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for DependencyList {
    /// Byte-lexicographic order, each specifier once
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let set: BTreeSet<String> = iter.into_iter().map(Into::into).collect();
        Self(set.into_iter().collect())
    }
}

impl fmt::Display for DependencyList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

/// Split manifest text into specifiers.
///
/// Runs of `\r` and `\n` act as one separator; empty specifiers are
/// dropped.
pub fn parse_manifest(content: &str) -> impl Iterator<Item = &str> {
    content
        .split(['\r', '\n'])
        .filter(|specifier| !specifier.is_empty())
}

/// Files under `root` whose name ends with `suffix`
pub fn find_manifests(root: &Path, suffix: &str) -> StockpotResult<Vec<PathBuf>> {
    let manifests: Vec<PathBuf> = walk(root)?
        .into_iter()
        .filter(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().ends_with(suffix))
                .unwrap_or(false)
        })
        .collect();

    debug!(
        "Found {} manifest(s) ending in {} under {}",
        manifests.len(),
        suffix,
        root.display()
    );
    Ok(manifests)
}

/// Aggregate the manifests under `installed_root` into one dependency list
pub fn aggregate(installed_root: &Path, suffix: &str) -> StockpotResult<DependencyList> {
    let mut specifiers = Vec::new();

    for manifest in find_manifests(installed_root, suffix)? {
        let content = fs::read_to_string(&manifest).map_err(|e| {
            StockpotError::io(format!("reading manifest {}", manifest.display()), e)
        })?;
        specifiers.extend(parse_manifest(&content).map(str::to_string));
    }

    let list: DependencyList = specifiers.into_iter().collect();
    debug!("Aggregated {} dependencies", list.len());
    Ok(list)
}
