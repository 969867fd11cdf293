//! Configuration loading and schema definitions
//!
//! A TOML file supplies the base values; the environment overrides them.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
