use thiserror::Error;

use crate::applications::DocumentKind;

/// Errors raised by wizard navigation and submission.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("Step {step} is incomplete; missing: {}", .missing.join(", "))]
    StepIncomplete {
        step: u8,
        missing: Vec<&'static str>,
    },

    #[error("All agreements must be accepted before submitting; missing: {}", .0.join(", "))]
    ConsentRequired(Vec<&'static str>),

    #[error("Already at the first step")]
    AtFirstStep,

    #[error("The final step is completed by submitting the application")]
    AtFinalStep,

    #[error("The application can only be submitted from the final step")]
    NotAtFinalStep,

    #[error("The application has already been submitted")]
    AlreadySubmitted,

    #[error("A {0} photo is already attached; remove it first")]
    DocumentAlreadyAttached(DocumentKind),

    #[error("A save is already in progress")]
    SaveInProgress,

    #[error("The application could not be submitted")]
    SubmissionFailed,
}
