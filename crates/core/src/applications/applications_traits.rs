//! Application storage collaborators and gateway traits.
//!
//! These traits define the contract for persisting applications without any
//! storage-specific types, allowing different record stores and object
//! stores to be plugged in.

use async_trait::async_trait;

use super::applications_model::{
    ApplicationDraft, ApplicationRecord, ApplicationRecordInput, DocumentFile,
};
use super::applications_session::ApplicationSession;
use crate::errors::Result;

/// Trait defining the contract for the application record store.
///
/// A single logical table of application rows. The store assigns the id on
/// insert.
#[async_trait]
pub trait ApplicationRepositoryTrait: Send + Sync {
    /// Creates a new application row and returns it with its assigned id.
    async fn insert(&self, input: ApplicationRecordInput) -> Result<ApplicationRecord>;

    /// Overwrites every field of an existing row.
    ///
    /// Fails with `DatabaseError::NotFound` when no row has this id.
    async fn update(
        &self,
        application_id: &str,
        input: ApplicationRecordInput,
    ) -> Result<ApplicationRecord>;

    /// Retrieves an application row by its id.
    fn get_by_id(&self, application_id: &str) -> Result<ApplicationRecord>;
}

/// Trait defining the contract for the document object store.
#[async_trait]
pub trait DocumentStoreTrait: Send + Sync {
    /// Name of the bucket documents are written into.
    fn bucket(&self) -> &str;

    /// Stores the file's bytes under `path` and returns the stored path.
    async fn upload(&self, path: &str, file: &DocumentFile) -> Result<String>;
}

/// Trait defining the contract for the application persistence gateway.
///
/// The gateway is the only component that touches storage. Session state
/// (the backing id and the in-flight flag) lives in [`ApplicationSession`],
/// which the caller owns exclusively.
#[async_trait]
pub trait ApplicationGatewayTrait: Send + Sync {
    /// Uploads pending documents and creates or updates the backing record.
    ///
    /// Returns the backing record id.
    async fn save(
        &self,
        session: &mut ApplicationSession,
        draft: &mut ApplicationDraft,
    ) -> Result<String>;

    /// Saves the draft with status `submitted`.
    ///
    /// Failures have already been reported to the applicant and logged when
    /// this returns `false`.
    async fn submit(&self, session: &mut ApplicationSession, draft: &mut ApplicationDraft)
        -> bool;
}
