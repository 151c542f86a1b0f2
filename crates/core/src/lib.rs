//! StudentBank Core - account-opening wizard, draft model and persistence traits.
//!
//! This crate holds the onboarding business logic. It is storage-agnostic:
//! the record repository and document store are traits implemented by the
//! `storage-sqlite` crate.

pub mod applications;
pub mod errors;
pub mod notifications;
pub mod wizard;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
