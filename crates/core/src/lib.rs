//! Core types for the Bulletin announcement board
//!
//! This crate provides shared functionality used by the server, client and CLI:
//!
//! - **Error handling**: Errors with codes, context, recovery suggestions and HTTP mapping
//! - **Configuration**: TOML-based configuration with environment overrides
//! - **Validation**: Request input checks and publication date parsing
//! - **Model**: Categories, announcements and their request bodies
//! - **Seed**: The default dataset
//!
//! # Example
//!
//! ```rust
//! use bulletin_core::seed::default_dataset;
//! use bulletin_core::validation::parse_publication_input;
//!
//! let dataset = default_dataset();
//! assert_eq!(dataset.categories[1].name, "Health");
//!
//! let when = parse_publication_input("08/10/2023 08:55").unwrap();
//! assert_eq!(when.to_rfc3339(), "2023-08-10T08:55:00+00:00");
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod model;
pub mod seed;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::model::{Announcement, AnnouncementInput, Category, CategoryInput, Notification};
    pub use crate::seed::{default_dataset, Dataset};
    pub use crate::validation::{InputMode, ValidationResult, Validator};
}
