//! # pulsewatch-client
//!
//! HTTP client for the wearable health dashboard service.
//!
//! [`HealthApiClient`] fetches [`DashboardSnapshot`](pulsewatch_types::DashboardSnapshot)s
//! and wraps the account endpoints (login, signup, logout, profile) plus the
//! wearable scan and CSV export. Responses are decoded from the service's wire
//! format in [`wire`].
//!
//! ## Errors
//!
//! Every call returns [`ClientError`]. `Network` means no response arrived,
//! `Http` carries a non-2xx status, and `Validation` is raised locally before
//! a signup is sent.

mod client;
pub mod error;
mod validation;
pub mod wire;

pub use client::{
    AuthUser, FetchOptions, HealthApiClient, HealthApiClientBuilder, UserProfile,
    DEFAULT_ENDPOINT, DEFAULT_TIMEOUT,
};
pub use error::{ClientError, ValidationError};
pub use validation::{validate_email, validate_password, validate_username, SignupForm};
