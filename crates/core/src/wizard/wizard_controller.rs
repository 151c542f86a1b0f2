use std::sync::Arc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::wizard_errors::WizardError;
use super::wizard_step::{WizardStep, TOTAL_STEPS};
use super::wizard_validation::missing_fields;
use crate::applications::{
    validate_document, ApplicationDraft, ApplicationGatewayTrait, ApplicationSession,
    ApplicationStatus, DocumentFile, DocumentKind, FieldUpdate,
};
use crate::errors::Result;
use crate::notifications::{Notice, NotificationSink};

/// Feature switches for one wizard session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WizardConfig {
    /// When set, step 2 also requires both document photos.
    pub requires_document_verification: bool,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            requires_document_verification: true,
        }
    }
}

/// Read-only view of a wizard session for the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    pub current_step: WizardStep,
    pub step_title: &'static str,
    pub total_steps: u8,
    pub progress_percent: u8,
    pub status: ApplicationStatus,
    pub application_id: Option<String>,
    pub saving: bool,
    pub can_advance: bool,
    pub can_submit: bool,
    pub missing_fields: Vec<&'static str>,
    pub requires_document_verification: bool,
    pub draft: ApplicationDraft,
}

/// Drives the five-step flow for a single applicant.
///
/// Owns the draft and the session exclusively; every mutating operation takes
/// `&mut self`, so at most one save can be in flight per session.
pub struct WizardController {
    config: WizardConfig,
    draft: ApplicationDraft,
    session: ApplicationSession,
    gateway: Arc<dyn ApplicationGatewayTrait>,
}

impl WizardController {
    /// Opens a wizard with an empty draft at step 1.
    pub fn new(
        gateway: Arc<dyn ApplicationGatewayTrait>,
        notifier: Arc<dyn NotificationSink>,
        config: WizardConfig,
    ) -> Self {
        Self {
            config,
            draft: ApplicationDraft::new(),
            session: ApplicationSession::new(notifier),
            gateway,
        }
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    pub fn draft(&self) -> &ApplicationDraft {
        &self.draft
    }

    pub fn current_step(&self) -> WizardStep {
        self.draft.current_step
    }

    pub fn application_id(&self) -> Option<&str> {
        self.session.application_id()
    }

    pub fn is_saving(&self) -> bool {
        self.session.is_saving()
    }

    pub fn is_submitted(&self) -> bool {
        self.draft.status == ApplicationStatus::Submitted
    }

    fn ensure_editable(&self) -> Result<()> {
        if self.is_submitted() {
            return Err(WizardError::AlreadySubmitted.into());
        }
        Ok(())
    }

    /// Required fields of the current step that are still unset.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        missing_fields(self.current_step(), &self.draft, &self.config)
    }

    /// Applies one field edit to the draft. Nothing is persisted.
    pub fn update_field(&mut self, update: FieldUpdate) -> Result<()> {
        self.ensure_editable()?;
        self.draft.apply(update);
        Ok(())
    }

    /// True when `advance()` would pass its gate.
    pub fn can_advance(&self) -> bool {
        !self.is_submitted()
            && !self.is_saving()
            && !self.current_step().is_final()
            && self.missing_fields().is_empty()
    }

    /// True when `submit()` would pass its gate.
    pub fn can_submit(&self) -> bool {
        !self.is_submitted()
            && !self.is_saving()
            && self.current_step().is_final()
            && self.missing_fields().is_empty()
    }

    /// Saves the draft, tagged with the current step, then moves forward.
    ///
    /// Nothing is saved when the current step is incomplete. A failed save
    /// leaves the step unchanged so the applicant can retry.
    ///
    /// Dropping the returned future abandons the save and leaves the wizard
    /// where it was. Callers that must not lose a save in flight run it on
    /// its own task.
    pub async fn advance(&mut self) -> Result<WizardStep> {
        self.ensure_editable()?;
        let step = self.current_step();
        let next = step.next().ok_or(WizardError::AtFinalStep)?;

        let missing = self.missing_fields();
        if !missing.is_empty() {
            debug!("Step {} blocked; missing {:?}", step.number(), missing);
            return Err(WizardError::StepIncomplete {
                step: step.number(),
                missing,
            }
            .into());
        }

        let id = self
            .gateway
            .save(&mut self.session, &mut self.draft)
            .await?;
        self.draft.current_step = next;
        debug!(
            "Application {} advanced from step {} to {}",
            id,
            step.number(),
            next.number()
        );
        Ok(next)
    }

    /// Moves back one step without re-validating or saving.
    pub fn retreat(&mut self) -> Result<WizardStep> {
        self.ensure_editable()?;
        let previous = self
            .current_step()
            .previous()
            .ok_or(WizardError::AtFirstStep)?;
        self.draft.current_step = previous;
        Ok(previous)
    }

    /// Binds a file to an empty document slot after checking its type and size.
    pub fn attach_document(&mut self, kind: DocumentKind, file: DocumentFile) -> Result<()> {
        self.ensure_editable()?;
        if self.draft.document(kind).is_some() {
            return Err(WizardError::DocumentAlreadyAttached(kind).into());
        }
        if let Err(err) = validate_document(&file) {
            warn!("Rejected {} photo '{}': {}", kind, file.file_name, err);
            self.session.notify(Notice::document_rejected(err.to_string()));
            return Err(err.into());
        }

        self.session
            .notify(Notice::document_accepted(kind, &file.file_name));
        self.draft.attach_document(kind, file);
        Ok(())
    }

    /// Clears a document slot. Clearing an empty slot is a no-op.
    pub fn remove_document(&mut self, kind: DocumentKind) -> Result<()> {
        self.ensure_editable()?;
        if self.draft.remove_document(kind).is_some() {
            debug!("Removed {} photo", kind);
        }
        Ok(())
    }

    /// Submits the application from the review step.
    ///
    /// Returns the backing record id. After a successful submission the
    /// wizard is closed to further changes.
    pub async fn submit(&mut self) -> Result<String> {
        self.ensure_editable()?;
        let step = self.current_step();
        if !step.is_final() {
            return Err(WizardError::NotAtFinalStep.into());
        }

        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(WizardError::ConsentRequired(missing).into());
        }

        if !self
            .gateway
            .submit(&mut self.session, &mut self.draft)
            .await
        {
            return Err(WizardError::SubmissionFailed.into());
        }
        self.draft.status = ApplicationStatus::Submitted;

        let id = self.session.application_id().unwrap_or_default().to_string();
        info!("Wizard completed for application {}", id);
        Ok(id)
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        let step = self.current_step();
        WizardSnapshot {
            current_step: step,
            step_title: step.title(),
            total_steps: TOTAL_STEPS,
            progress_percent: step.progress_percent(),
            status: self.draft.status,
            application_id: self.session.application_id().map(str::to_owned),
            saving: self.is_saving(),
            can_advance: self.can_advance(),
            can_submit: self.can_submit(),
            missing_fields: self.missing_fields(),
            requires_document_verification: self.config.requires_document_verification,
            draft: self.draft.clone(),
        }
    }
}
