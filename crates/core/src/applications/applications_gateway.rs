use std::sync::Arc;

use chrono::Utc;
use log::{debug, error, info};

use super::applications_model::{
    ApplicationDraft, ApplicationRecordInput, ApplicationStatus, DocumentFile, DocumentKind,
    DocumentPaths,
};
use super::applications_session::ApplicationSession;
use super::applications_traits::{
    ApplicationGatewayTrait, ApplicationRepositoryTrait, DocumentStoreTrait,
};
use crate::errors::{Error, Result};
use crate::notifications::Notice;
use crate::wizard::WizardError;

/// Persists drafts: uploads pending documents, then creates or updates the
/// single backing record of the session.
pub struct ApplicationGateway {
    repository: Arc<dyn ApplicationRepositoryTrait>,
    document_store: Arc<dyn DocumentStoreTrait>,
}

impl ApplicationGateway {
    /// Creates a new ApplicationGateway instance
    pub fn new(
        repository: Arc<dyn ApplicationRepositoryTrait>,
        document_store: Arc<dyn DocumentStoreTrait>,
    ) -> Self {
        Self {
            repository,
            document_store,
        }
    }

    async fn save_with_status(
        &self,
        session: &mut ApplicationSession,
        draft: &mut ApplicationDraft,
        status: ApplicationStatus,
    ) -> Result<String> {
        let result = {
            let mut guard = session.begin_save()?;
            self.persist(&mut guard, draft, status).await
        };

        if let Err(err) = &result {
            error!("Failed to save application: {}", err);
            session.notify(notice_for(err));
        }
        result
    }

    async fn persist(
        &self,
        session: &mut ApplicationSession,
        draft: &mut ApplicationDraft,
        status: ApplicationStatus,
    ) -> Result<String> {
        let mut paths = DocumentPaths::default();
        let mut uploaded = Vec::new();

        for kind in DocumentKind::ALL {
            let Some(attachment) = draft.document(kind) else {
                continue;
            };
            match &attachment.stored_path {
                Some(path) => paths.set(kind, Some(path.clone())),
                None => {
                    let path = self.upload(kind, &attachment.file).await?;
                    paths.set(kind, Some(path.clone()));
                    uploaded.push((kind, path));
                }
            }
        }

        let input = ApplicationRecordInput::from_draft(draft, status, paths);
        let record = match session.application_id().map(str::to_owned) {
            Some(id) => {
                debug!("Updating application {} at step {}", id, input.current_step);
                self.repository.update(&id, input).await?
            }
            None => {
                debug!("Creating application at step {}", input.current_step);
                self.repository.insert(input).await?
            }
        };
        session.assign_id(&record.id);

        // Uploads only count once the record referencing them is written.
        for (kind, path) in uploaded {
            draft.mark_uploaded(kind, path);
        }

        Ok(session
            .application_id()
            .map(str::to_owned)
            .unwrap_or(record.id))
    }

    async fn upload(&self, kind: DocumentKind, file: &DocumentFile) -> Result<String> {
        let path = format!(
            "{}/{}.{}",
            kind.folder(),
            Utc::now().timestamp_millis(),
            file.extension()
        );
        debug!(
            "Uploading {} photo ({} bytes) to {}/{}",
            kind,
            file.size(),
            self.document_store.bucket(),
            path
        );
        self.document_store
            .upload(&path, file)
            .await
            .map_err(|err| Error::Upload {
                document: kind,
                reason: err.to_string(),
            })
    }
}

fn notice_for(err: &Error) -> Notice {
    match err {
        Error::Upload { document, .. } => Notice::upload_failed(*document),
        Error::Database(_) => Notice::save_failed(),
        _ => Notice::unexpected(),
    }
}

#[async_trait::async_trait]
impl ApplicationGatewayTrait for ApplicationGateway {
    async fn save(
        &self,
        session: &mut ApplicationSession,
        draft: &mut ApplicationDraft,
    ) -> Result<String> {
        let status = draft.status();
        self.save_with_status(session, draft, status).await
    }

    async fn submit(
        &self,
        session: &mut ApplicationSession,
        draft: &mut ApplicationDraft,
    ) -> bool {
        match self
            .save_with_status(session, draft, ApplicationStatus::Submitted)
            .await
        {
            Ok(id) => {
                draft.status = ApplicationStatus::Submitted;
                info!("Application {} submitted", id);
                session.notify(Notice::submitted());
                true
            }
            Err(Error::Wizard(WizardError::SaveInProgress)) => {
                debug!("Submission ignored: a save is already in flight");
                false
            }
            Err(_) => false,
        }
    }
}
