//! Stockpot - catalog module provisioner
//!
//! Mirrors a git catalog of reusable front-end units, copies the selected
//! ones into a scaffolded project and installs their aggregated npm
//! dependencies with a single package manager call.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod package_manager;
pub mod provision;
#[cfg(test)]
pub(crate) mod testing;
pub mod ui;
pub mod vcs;

pub use error::{StockpotError, StockpotResult};
