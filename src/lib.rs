//! gcpadmin
//!
//! A thin administrative facade over Google Cloud's billing, compute,
//! resource manager, IAM, service management and storage APIs. Authenticate
//! once with [`admin::CloudAdmin::authenticate`], then call the operations
//! you need; lists are paginated to completion and objects are downloaded in
//! full.

pub mod admin;
pub mod config;
pub mod error;
pub mod gcp;

pub use admin::CloudAdmin;
pub use error::{AdminError, Result};
