//! HTTP client for the Bulletin announcement API
//!
//! This crate provides a typed client for the Bulletin REST API together
//! with the client-side pieces of the announcement board.
//!
//! # Features
//!
//! - **Environment-based configuration**: server URL, admin secret and timeout
//! - **Retry with exponential backoff**: idempotent requests only
//! - **Request correlation**: every request carries a unique `X-Request-ID`
//! - **Live notices**: [`NoticeBoard`] turns socket payloads into expiring notices
//! - **Listing feed**: [`Feed`] keeps a fallback dataset until the server answers
//!
//! # Example
//!
//! ```rust,no_run
//! use bulletin_api_client::{BulletinClient, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BulletinClient::with_config(ClientConfig::default())?;
//!
//!     let health = client.health().check().await?;
//!     println!("Server status: {}", health.status);
//!
//!     let found = client.announcements().search("health", Default::default()).await?;
//!     println!("{} announcements mention health", found.len());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod feed;
pub mod notice;

pub use client::BulletinClient;
pub use config::{ClientConfig, RetryPolicy};
pub use error::{ApiError, ApiResult};
pub use feed::Feed;
pub use notice::{NoticeBoard, NOTICE_TTL};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::BulletinClient;
    pub use crate::config::{ClientConfig, RetryPolicy};
    pub use crate::endpoints::{AnnouncementsApi, CategoriesApi, HealthApi, SearchMode};
    pub use crate::error::{ApiError, ApiResult};
    pub use crate::feed::Feed;
    pub use crate::notice::NoticeBoard;
}
