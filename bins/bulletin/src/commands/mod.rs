//! CLI command implementations

pub mod categories;
pub mod health;
pub mod search;
pub mod seed;
pub mod serve;
