//! Provisioning units into a target project
//!
//! | Module      | Role                                              |
//! |-------------|---------------------------------------------------|
//! | `project`   | Precondition check on the target project          |
//! | `namespace` | Catalog namespaces and their destinations         |
//! | `select`    | Choosing units (prompt, preset list, everything)  |
//! | `installer` | Copying units into the project                    |
//! | `pipeline`  | The full run, stage by stage                      |

pub mod installer;
pub mod namespace;
pub mod pipeline;
pub mod project;
pub mod select;

pub use installer::{install_units, install_whole, validate_unit_name, InstalledUnit};
pub use namespace::{InstallPolicy, Namespace};
pub use pipeline::{ProvisionReport, Provisioner, RunReport};
pub use project::ProjectGate;
pub use select::{AllSelector, PresetSelector, PromptSelector, SelectionSet, UnitSelector};
