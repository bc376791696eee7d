//! # Appoint - a typed client for appointment scheduling APIs
//!
//! Appoint is a retry-aware, type-safe async client for self-hosted
//! appointment-scheduling services, built on top of `reqwest`. It classifies
//! failures into a closed error taxonomy, retries transient ones with bounded
//! exponential backoff, and normalizes the service's two list-response shapes
//! (bare arrays and envelope objects) into one paginated result.
//!
//! ## Quick Start
//!
//! ```no_run
//! use appoint::{Client, ListParams};
//! use appoint::models::{Customer, CustomerSettings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), appoint::ApiError> {
//!     let client = Client::builder()
//!         .base_url("https://scheduling.example.com/index.php/api/v1")?
//!         .api_key(std::env::var("APPOINT_API_KEY").unwrap())
//!         .build()?;
//!
//!     // List customers, newest first.
//!     let page = client.customers().list(ListParams::default()).await?;
//!     println!("{} of {} customers", page.len(), page.total);
//!
//!     // Look one up; a missing id is an absence, not an error.
//!     if let Some(customer) = client.customers().get(42).await? {
//!         println!("customer 42 is {}", customer.email);
//!     }
//!
//!     // Check free slots before booking.
//!     let slots = client.availabilities().slots(1, 1, Some("2026-09-01")).await?;
//!     for slot in &slots.available {
//!         println!("free {} - {}", slot.start, slot.end);
//!     }
//!
//!     client.close();
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every failure is an [`ApiError`] with a closed [`ErrorKind`]; branch on the
//! kind, never on message text:
//!
//! ```no_run
//! use appoint::{Client, ErrorKind, ListParams};
//!
//! # async fn example() -> Result<(), appoint::ApiError> {
//! # let client = Client::builder().base_url("https://x.example")?.api_key("k").build()?;
//! match client.appointments().list(ListParams::default()).await {
//!     Ok(page) => println!("{} appointments", page.total),
//!     Err(e) => match e.kind() {
//!         ErrorKind::Authentication => eprintln!("bad API key"),
//!         ErrorKind::RateLimited => eprintln!("slow down: {e}"),
//!         ErrorKind::Transport => eprintln!("network trouble: {e}"),
//!         _ => eprintln!("request failed ({:?}): {e}", e.status()),
//!     },
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Retries
//!
//! Rate limits (429), server errors (5xx), and transport failures are retried
//! with capped exponential backoff; authentication, not-found, and validation
//! failures fail fast. The delays, the attempt cap, and the decision functions
//! live in [`retry`] and are pure, so they can be tested without sleeping:
//!
//! ```no_run
//! use appoint::{Client, RetryPolicy};
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), appoint::ApiError> {
//! let client = Client::builder()
//!     .base_url("https://scheduling.example.com/api/v1")?
//!     .api_key("secret")
//!     // Five total attempts: delays 500ms, 1s, 2s, 4s (capped at 5s).
//!     .retry_policy(RetryPolicy::new(5, Duration::from_millis(500)))
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! Requests and responses are logged through `tracing`; bodies are masked
//! before emission so credentials (`password`, `token`, `secret`, `key`,
//! `api_key`) never reach the logs, on first attempts and retries alike. The
//! toggle is [`ClientBuilder::log_requests`].

mod client;
mod error;
pub mod models;
mod pagination;
mod redact;
mod request;
pub mod resources;
pub mod retry;

pub use client::{Client, ClientBuilder};
pub use error::{ApiError, ErrorKind, Result};
pub use pagination::Page;
pub use request::ApiRequest;
pub use resources::ListParams;
pub use retry::{RetryPolicy, RetryState};
