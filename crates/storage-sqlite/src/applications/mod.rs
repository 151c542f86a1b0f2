//! SQLite storage implementation for applications.

mod model;
mod repository;

pub use model::{ApplicationChangesetDB, ApplicationDB};
pub use repository::ApplicationRepository;
