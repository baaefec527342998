//! `config.toml`: schema, loading, `config init` and file locations.

pub mod default;
pub mod error;
pub mod loader;
pub mod schema;
/// Config and data directory lookup.
pub mod xdg;
