//! CLI argument definitions using clap derive

use crate::provision::Namespace;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// Stockpot - import catalog modules into a front-end project
///
/// Keeps a local mirror of a git catalog of reusable modules, components
/// and style helpers, copies the ones you pick into your project and
/// installs their npm dependencies in one go.
#[derive(Parser, Debug)]
#[command(name = "stockpot")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(long, global = true, env = "STOCKPOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip local .stockpot.toml discovery
    #[arg(long, global = true)]
    pub no_local: bool,

    /// Catalog repository URL (overrides catalog.url)
    #[arg(long, global = true, env = "STOCKPOT_CATALOG_URL")]
    pub catalog_url: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import units from the catalog into a project
    Add(AddArgs),

    /// List units available in the catalog
    List(ListArgs),

    /// Clone or update the local catalog mirror
    Sync(SyncArgs),

    /// Check tools, catalog mirror and project layout
    Status(StatusArgs),

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

/// Arguments for the add command
#[derive(Parser, Debug)]
pub struct AddArgs {
    /// Project directory (must already be scaffolded)
    pub project: PathBuf,

    /// Import modules
    #[arg(short = 'm', long)]
    pub only_modules: bool,

    /// Import components
    #[arg(short = 'c', long)]
    pub only_components: bool,

    /// Import style helpers
    #[arg(short = 's', long)]
    pub only_styles: bool,

    /// Units to import instead of prompting (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub select: Vec<String>,

    /// Import every unit in the selected namespaces
    #[arg(long, conflicts_with = "select")]
    pub all: bool,

    /// Use the cached catalog without syncing
    #[arg(long)]
    pub offline: bool,
}

impl AddArgs {
    /// Namespaces to provision, in run order.
    ///
    /// Without a mode flag: style helpers, then modules.
    pub fn namespaces(&self) -> Vec<Namespace> {
        if !(self.only_modules || self.only_components || self.only_styles) {
            return vec![Namespace::StyleHelpers, Namespace::Modules];
        }

        let mut namespaces = Vec::new();
        if self.only_styles {
            namespaces.push(Namespace::StyleHelpers);
        }
        if self.only_modules {
            namespaces.push(Namespace::Modules);
        }
        if self.only_components {
            namespaces.push(Namespace::Components);
        }
        namespaces
    }
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only list this namespace
    #[arg(short, long)]
    pub namespace: Option<NamespaceArg>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,

    /// Use the cached catalog without syncing
    #[arg(long)]
    pub offline: bool,
}

/// Arguments for the sync command
#[derive(Parser, Debug)]
pub struct SyncArgs {
    /// Delete the mirror and clone it again
    #[arg(long)]
    pub fresh: bool,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the status command
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Project directory to check
    pub project: Option<PathBuf>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., package_manager.program)
        key: String,
        /// Value to set
        value: String,
        /// Write to project-local .stockpot.toml instead of global config
        #[arg(long)]
        local: bool,
    },
}

/// Namespace filter for the list command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NamespaceArg {
    Modules,
    Components,
    StyleHelpers,
}

impl From<NamespaceArg> for Namespace {
    fn from(arg: NamespaceArg) -> Self {
        match arg {
            NamespaceArg::Modules => Namespace::Modules,
            NamespaceArg::Components => Namespace::Components,
            NamespaceArg::StyleHelpers => Namespace::StyleHelpers,
        }
    }
}

/// Output format for list command
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}
