//! Wizard module - the five-step account-opening flow.
//!
//! The controller owns the draft and its session, gates forward navigation
//! on per-step completeness, and delegates every write to the persistence
//! gateway.

mod wizard_controller;
mod wizard_errors;
mod wizard_step;
mod wizard_validation;


pub use wizard_controller::{WizardConfig, WizardController, WizardSnapshot};
pub use wizard_errors::WizardError;
pub use wizard_step::{WizardStep, TOTAL_STEPS};
pub use wizard_validation::missing_fields;
