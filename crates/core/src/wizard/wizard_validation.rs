//! Per-step completeness predicates.

use super::wizard_controller::WizardConfig;
use super::wizard_step::WizardStep;
use crate::applications::{ApplicationDraft, DocumentKind};

/// Names of the required fields of `step` that are still unset.
///
/// A step's gate is satisfied when this is empty. For the review step the
/// names are the agreements that have not been accepted yet.
pub fn missing_fields(
    step: WizardStep,
    draft: &ApplicationDraft,
    config: &WizardConfig,
) -> Vec<&'static str> {
    let mut missing = Vec::new();
    let mut require = |present: bool, name: &'static str| {
        if !present {
            missing.push(name);
        }
    };

    match step {
        WizardStep::AccountType => {
            require(draft.account_type.is_some(), "accountType");
        }
        WizardStep::PersonalInfo => {
            require(draft.first_name.is_some(), "firstName");
            require(draft.last_name.is_some(), "lastName");
            require(draft.email.is_some(), "email");
            require(draft.phone.is_some(), "phone");
            require(draft.date_of_birth.is_some(), "dateOfBirth");
            require(draft.sensitive_id_number.is_some(), "sensitiveIdNumber");
            if config.requires_document_verification {
                for kind in DocumentKind::ALL {
                    require(draft.document(kind).is_some(), kind.field_name());
                }
            }
        }
        WizardStep::Address => {
            require(draft.address.is_some(), "address");
            require(draft.city.is_some(), "city");
            require(draft.state.is_some(), "state");
            require(draft.zip_code.is_some(), "zipCode");
        }
        WizardStep::Education => {
            require(draft.university.is_some(), "university");
            require(draft.student_id.is_some(), "studentId");
            require(draft.graduation_year.is_some(), "graduationYear");
        }
        WizardStep::Review => {
            require(draft.agree_to_terms, "agreeToTerms");
            require(draft.agree_to_privacy, "agreeToPrivacy");
            require(draft.agree_to_credit, "agreeToCredit");
        }
    }
    missing
}
