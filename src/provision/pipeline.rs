//! Provisioning pipeline
//!
//! Gate → Sync → (per namespace) Enumerate → Select → Install, then
//! Aggregate over every namespace that received units → one
//! DependencyInstall. Every stage is awaited before the next one starts and
//! the first error ends the run.

use crate::catalog::{aggregate, list_units, CacheRepository, CatalogEntry, DependencyList};
use crate::catalog::{SyncOutcome, SyncSignal};
use crate::config::Config;
use crate::error::StockpotResult;
use crate::package_manager::{install_dependencies, InstallOutput, PackageManager};
use crate::provision::installer::{install_units, install_whole, InstalledUnit};
use crate::provision::namespace::{InstallPolicy, Namespace};
use crate::provision::project::ProjectGate;
use crate::provision::select::{SelectionSet, UnitSelector};
use crate::vcs::Vcs;
use std::path::{Path, PathBuf};
use tracing::info;

/// What provisioning one namespace did
#[derive(Debug, Clone)]
pub struct ProvisionReport {
    pub namespace: Namespace,
    pub available: Vec<CatalogEntry>,
    pub selection: SelectionSet,
    pub installed: Vec<InstalledUnit>,
    /// Manifests found under the namespace destination; empty when nothing
    /// was installed there
    pub dependencies: DependencyList,
}

impl ProvisionReport {
    fn skipped(namespace: Namespace, available: Vec<CatalogEntry>) -> Self {
        Self {
            namespace,
            available,
            selection: SelectionSet::default(),
            installed: Vec::new(),
            dependencies: DependencyList::default(),
        }
    }
}

/// Result of a full run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// `None` in offline mode
    pub sync: Option<SyncOutcome>,
    pub namespaces: Vec<ProvisionReport>,
    /// Union of every namespace's dependencies
    pub dependencies: DependencyList,
    /// `None` when no package manager call was made
    pub dependency_output: Option<InstallOutput>,
}

fn ignore_signal(_: SyncSignal) {}

fn ignore_line(_: String) {}

/// Drives a provisioning run against one project
pub struct Provisioner<'a> {
    config: &'a Config,
    vcs: &'a dyn Vcs,
    selector: &'a dyn UnitSelector,
    package_manager: &'a dyn PackageManager,
    offline: bool,
    on_sync: &'a (dyn Fn(SyncSignal) + Send + Sync),
    on_output: &'a (dyn Fn(String) + Send + Sync),
}

impl<'a> Provisioner<'a> {
    pub fn new(
        config: &'a Config,
        vcs: &'a dyn Vcs,
        selector: &'a dyn UnitSelector,
        package_manager: &'a dyn PackageManager,
    ) -> Self {
        Self {
            config,
            vcs,
            selector,
            package_manager,
            offline: false,
            on_sync: &ignore_signal,
            on_output: &ignore_line,
        }
    }

    /// Use the cached catalog as-is instead of syncing it
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Receive catalog sync start/finish signals
    pub fn on_sync(mut self, callback: &'a (dyn Fn(SyncSignal) + Send + Sync)) -> Self {
        self.on_sync = callback;
        self
    }

    /// Receive package manager output lines as they arrive
    pub fn on_output(mut self, callback: &'a (dyn Fn(String) + Send + Sync)) -> Self {
        self.on_output = callback;
        self
    }

    /// Provision `namespaces` into `project`, in the given order.
    ///
    /// All copies finish before any manifest is read, and the package
    /// manager runs at most once for the whole run.
    pub async fn run(&self, project: &Path, namespaces: &[Namespace]) -> StockpotResult<RunReport> {
        ProjectGate::from_config(&self.config.project).verify(project)?;

        let (catalog_root, sync) = self.prepare_catalog().await?;

        let mut reports = Vec::with_capacity(namespaces.len());
        for &namespace in namespaces {
            reports.push(self.install_namespace(project, &catalog_root, namespace).await?);
        }

        let suffix = &self.config.catalog.manifest_suffix;
        for report in reports.iter_mut().filter(|r| !r.installed.is_empty()) {
            let destination = report
                .namespace
                .destination(project, &self.config.project.source_dir);
            report.dependencies = aggregate(&destination, suffix)?;
        }

        let dependencies: DependencyList = reports
            .iter()
            .flat_map(|r| r.dependencies.iter())
            .collect();
        let dependency_output =
            install_dependencies(self.package_manager, project, &dependencies, self.on_output)
                .await?;

        Ok(RunReport {
            sync,
            namespaces: reports,
            dependencies,
            dependency_output,
        })
    }

    async fn prepare_catalog(&self) -> StockpotResult<(PathBuf, Option<SyncOutcome>)> {
        let mut cache = CacheRepository::from_config(&self.config.catalog);
        let outcome = cache.ensure(self.vcs, self.offline, self.on_sync).await?;
        Ok((cache.local_path().to_path_buf(), outcome))
    }

    async fn install_namespace(
        &self,
        project: &Path,
        catalog_root: &Path,
        namespace: Namespace,
    ) -> StockpotResult<ProvisionReport> {
        let source = namespace.catalog_path(catalog_root);
        let destination = namespace.destination(project, &self.config.project.source_dir);

        let (available, selection, installed) = match namespace.policy() {
            InstallPolicy::Selectable => {
                let available = list_units(&source)?;
                let selection = self.selector.select(namespace, &available).await?;
                if selection.is_empty() {
                    info!("No {} selected", namespace);
                    return Ok(ProvisionReport::skipped(namespace, available));
                }
                let installed = install_units(&selection, &source, &destination)?;
                (available, selection, installed)
            }
            InstallPolicy::Whole => {
                let name = namespace.dir_name();
                let installed = install_whole(name, &source, &destination)?;
                (Vec::new(), std::iter::once(name).collect(), vec![installed])
            }
        };

        Ok(ProvisionReport {
            namespace,
            available,
            selection,
            installed,
            dependencies: DependencyList::default(),
        })
    }
}
