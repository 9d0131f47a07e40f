//! REST client for the Corsano health-data cloud.
//!
//! Two thin clients mirror the service split: the Users API
//! authenticates accounts, the Health API serves measurement data once
//! a Users token has been exchanged for a Health session. Summary
//! responses can be reshaped into staging tables for indexing.
//!
//! # Example
//!
//! ```rust,no_run
//! use pulseboard_corsano::{HealthClient, SummariesRequest, UsersClient, extract_slots};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut users = UsersClient::new();
//!     users.login("someone@example.com", "password").await?;
//!
//!     let mut health = HealthClient::new();
//!     health.login_from(&users).await?;
//!
//!     let request = SummariesRequest::new("2023-04-01", "2023-05-01")
//!         .include_slots(true)
//!         .per_page(100);
//!     let summaries = health.user_summaries(&request).await?;
//!
//!     let slots = extract_slots(&summaries);
//!     println!("{} slot rows", slots.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod health;
mod params;
mod slots;
mod users;

pub use error::{CorsanoError, Result};
pub use health::{HEALTH_BASE_URL, HealthClient, SummariesRequest};
pub use params::{ParamValue, encode_query};
pub use slots::extract_slots;
pub use users::{USERS_BASE_URL, UsersClient};
