//! GCP API interaction module
//!
//! Authentication, HTTP transport and the per-API clients that the
//! [`crate::admin::CloudAdmin`] facade is built on.
//!
//! # Module Structure
//!
//! - [`auth`] - Application Default Credentials, token caching, default project
//! - [`http`] - HTTP utilities for REST API calls
//! - [`client`] - Versioned service clients and the direct-HTTP client
//! - [`session`] - The authenticated set of clients

pub mod auth;
pub mod client;
pub mod http;
pub mod session;
