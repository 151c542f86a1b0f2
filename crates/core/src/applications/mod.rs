//! Applications module - draft model, catalogs, storage traits and the
//! persistence gateway.

mod applications_constants;
mod applications_gateway;
mod applications_model;
mod applications_session;
mod applications_traits;

#[cfg(test)]
pub(crate) mod applications_test_mocks;

#[cfg(test)]
mod applications_gateway_tests;

// Re-export the public interface
pub use applications_constants::*;
pub use applications_gateway::ApplicationGateway;
pub use applications_model::*;
pub use applications_session::ApplicationSession;
pub use applications_traits::{
    ApplicationGatewayTrait, ApplicationRepositoryTrait, DocumentStoreTrait,
};
