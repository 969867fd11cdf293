//! Endpoint-specific API implementations
//!
//! Each module provides a typed interface for one group of server routes.
//!
//! | Module | Routes |
//! |--------|--------|
//! | `categories` | `/api/categories`, `/api/categories/{id}` |
//! | `announcements` | `/api/announcements`, `/search`, `/category/{id}`, `/{id}` |
//! | `health` | `/health` |

pub mod announcements;
pub mod categories;
pub mod health;

pub use announcements::{AnnouncementsApi, SearchMode};
pub use categories::CategoriesApi;
pub use health::{HealthApi, HealthResponse};
