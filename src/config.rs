//! Configuration loader and schema types.
//!
//! Settings come from an optional TOML file and `CANTOR__*` environment
//! variables, layered over struct defaults.

mod load;
mod schema;

pub use load::{default_config_path, default_storage_path, resolve_config_path};
pub use schema::*;

#[cfg(test)]
mod tests;
