//! SQLite storage implementation for StudentBank.
//!
//! This crate provides the storage collaborators behind the persistence
//! gateway defined in `studentbank-core`:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The application record repository
//! - A filesystem-backed document store
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! `core` is database-agnostic and works with traits.
//!
//! ```text
//!        core (wizard, gateway)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!            │             │
//!            ▼             ▼
//!        SQLite DB    documents dir
//! ```

pub mod applications;
pub mod db;
pub mod documents;
pub mod errors;
pub mod schema;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

pub use applications::ApplicationRepository;
pub use documents::FsDocumentStore;

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from studentbank-core for convenience
pub use studentbank_core::errors::{DatabaseError, Error, Result};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use studentbank_core::applications::{
        ApplicationDraft, ApplicationGateway, ApplicationGatewayTrait,
        ApplicationRepositoryTrait, ApplicationSession, DocumentFile, FieldUpdate,
    };
    use studentbank_core::notifications::BufferedNotificationSink;
    use studentbank_core::wizard::{WizardConfig, WizardController, WizardStep};
    use tempfile::tempdir;

    use super::*;

    #[tokio::test]
    async fn test_gateway_persists_to_sqlite_and_disk() {
        let dir = tempdir().unwrap();
        let db_path = init(&dir.path().join("db").join("app.db").to_string_lossy()).unwrap();
        let pool = create_pool(&db_path).unwrap();
        run_migrations(&pool).unwrap();
        let repository = Arc::new(ApplicationRepository::new(
            pool.clone(),
            spawn_writer((*pool).clone()),
        ));
        let store = Arc::new(FsDocumentStore::new(dir.path().join("documents")));
        let gateway = Arc::new(ApplicationGateway::new(repository.clone(), store.clone()));

        let mut wizard = WizardController::new(
            gateway.clone(),
            Arc::new(BufferedNotificationSink::new()),
            WizardConfig {
                requires_document_verification: false,
            },
        );
        wizard
            .update_field(FieldUpdate::AccountType(Some(
                studentbank_core::applications::AccountType::Savings,
            )))
            .unwrap();
        wizard
            .attach_document(
                studentbank_core::applications::DocumentKind::StudentIdPhoto,
                DocumentFile::new("card.jpg", "image/jpeg", vec![1, 2, 3]),
            )
            .unwrap();

        assert_eq!(wizard.advance().await.unwrap(), WizardStep::PersonalInfo);

        let id = wizard.application_id().unwrap().to_string();
        let record = repository.get_by_id(&id).unwrap();
        assert_eq!(record.account_type.as_deref(), Some("savings"));
        assert_eq!(record.current_step, 1);
        let stored = record.student_id_photo_path.unwrap();
        assert!(stored.starts_with("student-ids/") && stored.ends_with(".jpg"));
        assert_eq!(store.read(&stored).await.unwrap(), vec![1, 2, 3]);

        // A second session writes its own row.
        let mut session = ApplicationSession::new(Arc::new(BufferedNotificationSink::new()));
        let mut draft = ApplicationDraft::new();
        let other = gateway.save(&mut session, &mut draft).await.unwrap();
        assert_ne!(other, id);
    }
}
