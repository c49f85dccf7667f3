//! Catalog mirror and content discovery
//!
//! The catalog is a git repository of installable units grouped by
//! namespace (`modules/`, `components/`, `style-helpers/`). Units carry
//! `*.packages` manifests listing their third-party dependencies.
//!
//! | Piece | Role |
//! |-------|------|
//! | [`sync`] | clone or fast-forward the local mirror |
//! | [`enumerate`] | list units in a namespace |
//! | [`walk`] | recursive, cycle-safe file listing |
//! | [`deps`] | aggregate manifests into one dependency list |

pub mod deps;
pub mod enumerate;
pub mod sync;
pub mod walk;

pub use deps::{aggregate, parse_manifest, DependencyList};
pub use enumerate::{is_hidden, list_units, CatalogEntry};
pub use sync::{CacheRepository, SyncAction, SyncOutcome, SyncSignal, SyncState};
pub use walk::walk;
