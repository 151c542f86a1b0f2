//! User-facing notices.
//!
//! The wizard and the persistence gateway report transient outcomes (document
//! accepted, upload failed, submission succeeded, ...) through the sink trait.
//! Runtime adapters decide how notices reach the applicant.

mod notice;
mod sink;

pub use notice::*;
pub use sink::*;
