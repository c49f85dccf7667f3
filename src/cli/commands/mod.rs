//! CLI command implementations

pub mod add;
pub mod completions;
pub mod config;
pub mod list;
pub mod status;
pub mod sync;

pub use add::execute as add;
pub use completions::execute as completions;
pub use config::execute as config;
pub use list::execute as list;
pub use status::execute as status;
pub use sync::execute as sync;
