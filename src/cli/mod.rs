//! CLI command implementations

mod migrate;
mod progress;
mod style;

pub use migrate::run_migrate;
