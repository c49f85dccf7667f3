//! Catalog namespaces and where they land in a project

use std::fmt;
use std::path::{Path, PathBuf};

/// How units of a namespace are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallPolicy {
    /// The caller picks units one by one
    Selectable,
    /// The whole namespace is copied at once
    Whole,
}

/// A group of catalog units sharing a destination convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Feature modules (`modules/` → `src/modules/`)
    Modules,
    /// UI components (`components/` → `src/components/`)
    Components,
    /// Shared style helpers (`style-helpers/` → `src/style-helpers/`)
    StyleHelpers,
}

impl Namespace {
    /// Directory name, identical in the catalog and in the project
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Modules => "modules",
            Self::Components => "components",
            Self::StyleHelpers => "style-helpers",
        }
    }

    pub fn policy(&self) -> InstallPolicy {
        match self {
            Self::Modules | Self::Components => InstallPolicy::Selectable,
            Self::StyleHelpers => InstallPolicy::Whole,
        }
    }

    /// Namespace subtree inside the catalog mirror
    pub fn catalog_path(&self, catalog_root: &Path) -> PathBuf {
        catalog_root.join(self.dir_name())
    }

    /// Destination root inside the project
    pub fn destination(&self, project: &Path, source_dir: &str) -> PathBuf {
        project.join(source_dir).join(self.dir_name())
    }

    /// All namespaces in display order
    pub fn all() -> &'static [Self] {
        &[Self::Modules, Self::Components, Self::StyleHelpers]
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}
