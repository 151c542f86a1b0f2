#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::applications::applications_test_mocks::{
        jpeg, png, MockApplicationRepository, MockDocumentStore,
    };
    use crate::applications::{
        AccountType, ApplicationDraft, ApplicationGateway, ApplicationGatewayTrait,
        ApplicationRepositoryTrait, ApplicationSession, ApplicationStatus, DocumentKind,
        FieldUpdate,
    };
    use crate::errors::Error;
    use crate::notifications::{BufferedNotificationSink, NoticeLevel};

    struct Fixture {
        repository: Arc<MockApplicationRepository>,
        store: Arc<MockDocumentStore>,
        notices: BufferedNotificationSink,
        gateway: ApplicationGateway,
        session: ApplicationSession,
    }

    fn fixture() -> Fixture {
        let repository = Arc::new(MockApplicationRepository::new());
        let store = Arc::new(MockDocumentStore::new());
        let notices = BufferedNotificationSink::new();
        let gateway = ApplicationGateway::new(repository.clone(), store.clone());
        let session = ApplicationSession::new(Arc::new(notices.clone()));
        Fixture {
            repository,
            store,
            notices,
            gateway,
            session,
        }
    }

    // ==================== Create vs Update ====================

    #[tokio::test]
    async fn test_first_save_creates_and_captures_id() {
        let mut f = fixture();
        let mut draft = ApplicationDraft::new();
        draft.apply(FieldUpdate::AccountType(Some(AccountType::Checking)));

        let id = f.gateway.save(&mut f.session, &mut draft).await.unwrap();

        assert_eq!(f.session.application_id(), Some(id.as_str()));
        assert_eq!(f.repository.insert_count(), 1);
        assert_eq!(f.repository.update_count(), 0);
        let record = f.repository.get_by_id(&id).unwrap();
        assert_eq!(record.account_type.as_deref(), Some("checking"));
        assert_eq!(record.status, "draft");
        assert_eq!(record.current_step, 1);
    }

    #[tokio::test]
    async fn test_repeated_save_updates_same_record() {
        let mut f = fixture();
        let mut draft = ApplicationDraft::new();

        let first = f.gateway.save(&mut f.session, &mut draft).await.unwrap();
        let second = f.gateway.save(&mut f.session, &mut draft).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(f.repository.insert_count(), 1);
        assert_eq!(f.repository.update_count(), 1);
        assert_eq!(f.repository.record_count(), 1);
    }

    #[tokio::test]
    async fn test_unset_fields_persist_as_none_and_false() {
        let mut f = fixture();
        let mut draft = ApplicationDraft::new();

        let id = f.gateway.save(&mut f.session, &mut draft).await.unwrap();
        let record = f.repository.get_by_id(&id).unwrap();

        assert!(record.account_type.is_none());
        assert!(record.first_name.is_none());
        assert!(record.sensitive_id_number.is_none());
        assert!(record.student_id_photo_path.is_none());
        assert!(record.graduation_year.is_none());
        assert!(!record.agree_to_terms);
        assert!(!record.agree_to_privacy);
        assert!(!record.agree_to_credit);
        assert!(!f.session.is_saving());
    }

    // ==================== Document Uploads ====================

    #[tokio::test]
    async fn test_pending_document_is_uploaded_once() {
        let mut f = fixture();
        let mut draft = ApplicationDraft::new();
        draft.attach_document(DocumentKind::StudentIdPhoto, jpeg(2 * 1024 * 1024));

        let id = f.gateway.save(&mut f.session, &mut draft).await.unwrap();
        assert_eq!(f.store.upload_count(), 1);
        let path = &f.store.uploaded_paths()[0];
        assert!(path.starts_with("student-ids/"));
        assert!(path.ends_with(".jpg"));

        let attachment = draft.document(DocumentKind::StudentIdPhoto).unwrap();
        assert_eq!(attachment.stored_path.as_deref(), Some(path.as_str()));

        // A second save keeps the stored path without uploading again.
        f.gateway.save(&mut f.session, &mut draft).await.unwrap();
        assert_eq!(f.store.upload_count(), 1);
        let record = f.repository.get_by_id(&id).unwrap();
        assert_eq!(record.student_id_photo_path.as_deref(), Some(path.as_str()));
    }

    #[tokio::test]
    async fn test_documents_upload_into_their_folders() {
        let mut f = fixture();
        let mut draft = ApplicationDraft::new();
        draft.attach_document(DocumentKind::StudentIdPhoto, jpeg(10));
        draft.attach_document(DocumentKind::DriversLicensePhoto, png(10));

        f.gateway.save(&mut f.session, &mut draft).await.unwrap();

        let paths = f.store.uploaded_paths();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].starts_with("student-ids/"));
        assert!(paths[1].starts_with("drivers-licenses/"));
        assert!(paths[1].ends_with(".png"));
    }

    #[tokio::test]
    async fn test_upload_failure_aborts_save_without_writing() {
        let mut f = fixture();
        f.store.fail_folder("drivers-licenses");
        let mut draft = ApplicationDraft::new();
        draft.attach_document(DocumentKind::StudentIdPhoto, jpeg(10));
        draft.attach_document(DocumentKind::DriversLicensePhoto, png(10));

        let err = f.gateway.save(&mut f.session, &mut draft).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Upload {
                document: DocumentKind::DriversLicensePhoto,
                ..
            }
        ));
        assert_eq!(f.repository.write_count(), 0);
        assert!(f.session.application_id().is_none());
        assert!(!f.session.is_saving());
        // Attachments stay in memory, still pending, so the user can retry.
        assert!(!draft
            .document(DocumentKind::StudentIdPhoto)
            .unwrap()
            .is_uploaded());
        assert!(draft.document(DocumentKind::DriversLicensePhoto).is_some());

        let notices = f.notices.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].title, "Upload failed");
        assert!(notices[0].description.contains("driver's license"));

        f.store.clear_failure();
        f.gateway.save(&mut f.session, &mut draft).await.unwrap();
        assert_eq!(f.repository.insert_count(), 1);
    }

    // ==================== Database Failures ====================

    #[tokio::test]
    async fn test_database_failure_reports_save_failed() {
        let mut f = fixture();
        f.repository.set_fail_writes(true);
        let mut draft = ApplicationDraft::new();
        draft.apply(FieldUpdate::FirstName("Ada".to_string()));

        let err = f.gateway.save(&mut f.session, &mut draft).await.unwrap_err();

        assert!(matches!(err, Error::Database(_)));
        assert!(f.session.application_id().is_none());
        assert_eq!(draft.first_name.as_deref(), Some("Ada"));
        assert_eq!(f.notices.notices()[0].title, "Save failed");
    }

    // ==================== Submit ====================

    #[tokio::test]
    async fn test_submit_forces_submitted_status() {
        let mut f = fixture();
        let mut draft = ApplicationDraft::new();
        let id = f.gateway.save(&mut f.session, &mut draft).await.unwrap();

        assert!(f.gateway.submit(&mut f.session, &mut draft).await);

        assert_eq!(draft.status(), ApplicationStatus::Submitted);
        let record = f.repository.get_by_id(&id).unwrap();
        assert_eq!(record.status, "submitted");
        assert_eq!(f.repository.record_count(), 1);
        let notices = f.notices.notices();
        assert_eq!(notices.last().unwrap().title, "Application Submitted!");
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_draft_status() {
        let mut f = fixture();
        f.repository.set_fail_writes(true);
        let mut draft = ApplicationDraft::new();

        assert!(!f.gateway.submit(&mut f.session, &mut draft).await);
        assert_eq!(draft.status(), ApplicationStatus::Draft);
    }
}
