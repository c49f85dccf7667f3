//! Error types for Stockpot
//!
//! All modules use `StockpotResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Stockpot operations
pub type StockpotResult<T> = Result<T, StockpotError>;

/// All errors that can occur in Stockpot
#[derive(Error, Debug)]
pub enum StockpotError {
    // Catalog synchronization
    #[error("Failed to sync catalog {remote} into {path}: {reason}")]
    Sync {
        remote: String,
        path: PathBuf,
        reason: String,
    },

    #[error("Catalog cache {0} exists but is not a git repository and is not empty")]
    CacheOccupied(PathBuf),

    // Catalog content
    #[error("Catalog path not found: {0}")]
    CatalogNotFound(PathBuf),

    #[error("Unit '{name}' not found in {catalog}")]
    UnitNotFound { name: String, catalog: PathBuf },

    #[error("Invalid unit name '{name}': {reason}")]
    InvalidUnitName { name: String, reason: String },

    // Target project
    #[error("{path} does not look like a scaffolded project (missing: {missing})")]
    Precondition { path: PathBuf, missing: String },

    // Package manager
    #[error("Dependency install failed: {command} exited with {code}\n{output}")]
    Install {
        command: String,
        code: i32,
        output: String,
    },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl StockpotError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a sync error from captured git output
    pub fn sync(
        remote: impl Into<String>,
        path: impl Into<PathBuf>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Sync {
            remote: remote.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Process exit code for this error
    ///
    /// A failed project precondition must always terminate non-zero; the
    /// other codes only make failures distinguishable in scripts.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Precondition { .. } => 3,
            Self::Sync { .. } | Self::CacheOccupied(_) => 4,
            Self::Install { .. } => 5,
            _ => 1,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Precondition { .. } => {
                Some("Run this inside a project created by create-react-app (after installing its dependencies)")
            }
            Self::Sync { .. } => Some("Check network access and git credentials for the catalog, then run: stockpot sync"),
            Self::CacheOccupied(_) => Some("Run: stockpot sync --fresh"),
            Self::CatalogNotFound(_) => Some("Run: stockpot sync (or check catalog.url)"),
            Self::UnitNotFound { .. } => Some("Run: stockpot list to see available units"),
            Self::CommandFailed { .. } => Some("Check that the program is installed and on PATH"),
            _ => None,
        }
    }
}
