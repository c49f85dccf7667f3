//! Catalog mirror synchronization
//!
//! Keeps a local working copy of the remote catalog at a fixed path:
//! clone when the path holds no repository, fast-forward pull when it does.
//! The mirror outlives the process and is reused by later invocations.

use crate::config::schema::CatalogConfig;
use crate::error::{StockpotError, StockpotResult};
use crate::vcs::Vcs;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// State of the local mirror
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Path missing, or present without a repository
    Absent,
    /// Repository present but not refreshed by this process
    Stale,
    /// Cloned or pulled by this process
    Synced,
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Absent => "absent",
            Self::Stale => "stale",
            Self::Synced => "synced",
        };
        write!(f, "{}", name)
    }
}

/// What a sync did to the mirror
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Cloned,
    Pulled,
}

/// Result of a successful sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub action: SyncAction,
    pub path: PathBuf,
}

/// Long-running operation signal, for progress rendering only
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncSignal {
    Started { remote: String },
    Finished { success: bool },
}

/// Local mirror of a remote catalog repository
#[derive(Debug, Clone)]
pub struct CacheRepository {
    remote: String,
    local_path: PathBuf,
    state: SyncState,
}

impl CacheRepository {
    /// Create a handle for the mirror of `remote` at `local_path`
    pub fn new(remote: impl Into<String>, local_path: impl Into<PathBuf>) -> Self {
        Self {
            remote: remote.into(),
            local_path: local_path.into(),
            state: SyncState::Absent,
        }
    }

    /// Handle for the configured catalog and cache location
    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(config.url.clone(), config.cache_path())
    }

    pub fn remote(&self) -> &str {
        &self.remote
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Classify the mirror on disk without touching it
    pub async fn inspect(&mut self, vcs: &dyn Vcs) -> StockpotResult<SyncState> {
        if self.state == SyncState::Synced {
            return Ok(self.state);
        }

        self.state = if vcs.is_repository(&self.local_path).await? {
            SyncState::Stale
        } else {
            SyncState::Absent
        };
        Ok(self.state)
    }

    /// Bring the mirror up to date: clone if absent, pull if present.
    ///
    /// A path that exists with foreign content is never cleared here;
    /// see [`CacheRepository::reset`].
    pub async fn sync(
        &mut self,
        vcs: &dyn Vcs,
        on_signal: &(dyn Fn(SyncSignal) + Send + Sync),
    ) -> StockpotResult<SyncOutcome> {
        on_signal(SyncSignal::Started {
            remote: self.remote.clone(),
        });

        let result = self.sync_inner(vcs).await;

        on_signal(SyncSignal::Finished {
            success: result.is_ok(),
        });
        result
    }

    async fn sync_inner(&mut self, vcs: &dyn Vcs) -> StockpotResult<SyncOutcome> {
        if !self.local_path.exists() {
            debug!("Creating catalog cache at {}", self.local_path.display());
            fs::create_dir_all(&self.local_path).await.map_err(|e| {
                StockpotError::io(format!("creating {}", self.local_path.display()), e)
            })?;
        }

        let action = if vcs.is_repository(&self.local_path).await? {
            info!("Pulling catalog into {}", self.local_path.display());
            vcs.pull(&self.local_path).await?;
            SyncAction::Pulled
        } else {
            if !is_empty_dir(&self.local_path).await? {
                warn!(
                    "Catalog cache {} holds files but no repository",
                    self.local_path.display()
                );
                return Err(StockpotError::CacheOccupied(self.local_path.clone()));
            }
            info!("Cloning {} into {}", self.remote, self.local_path.display());
            vcs.clone_into(&self.remote, &self.local_path).await?;
            SyncAction::Cloned
        };

        self.state = SyncState::Synced;
        Ok(SyncOutcome {
            action,
            path: self.local_path.clone(),
        })
    }

    /// Make the mirror usable: sync it, or in offline mode only check that
    /// it exists.
    ///
    /// Returns `None` when no sync ran.
    pub async fn ensure(
        &mut self,
        vcs: &dyn Vcs,
        offline: bool,
        on_signal: &(dyn Fn(SyncSignal) + Send + Sync),
    ) -> StockpotResult<Option<SyncOutcome>> {
        if !offline {
            return self.sync(vcs, on_signal).await.map(Some);
        }

        if !self.local_path.is_dir() {
            return Err(StockpotError::CatalogNotFound(self.local_path.clone()));
        }
        debug!("Offline, using cached catalog at {}", self.local_path.display());
        Ok(None)
    }

    /// Delete the mirror so the next sync starts with a fresh clone
    pub async fn reset(&mut self) -> StockpotResult<()> {
        if self.local_path.exists() {
            info!("Removing catalog cache {}", self.local_path.display());
            fs::remove_dir_all(&self.local_path).await.map_err(|e| {
                StockpotError::io(format!("removing {}", self.local_path.display()), e)
            })?;
        }
        self.state = SyncState::Absent;
        Ok(())
    }
}

async fn is_empty_dir(path: &Path) -> StockpotResult<bool> {
    let mut entries = fs::read_dir(path)
        .await
        .map_err(|e| StockpotError::io(format!("reading {}", path.display()), e))?;
    let first = entries
        .next_entry()
        .await
        .map_err(|e| StockpotError::io(format!("reading {}", path.display()), e))?;
    Ok(first.is_none())
}
