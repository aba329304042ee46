//! Advancement rules for the intake wizard.
//!
//! Every check is a pure predicate over the current form snapshot; the caller decides how to
//! surface a failure and must not transition when one is returned.

mod rules;

use super::catalog::{definition_of, ServiceVariant};
use super::domain::{FormData, FormField};
use super::wizard::WizardPhase;

/// Reason a wizard step cannot be left yet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{}", .0.required_message())]
    Missing(FormField),
    #[error("{service} has no details sub-step {sub_step}")]
    UnknownSubStep {
        service: ServiceVariant,
        sub_step: u8,
    },
}

impl ValidationError {
    pub fn field(&self) -> Option<FormField> {
        match self {
            Self::Missing(field) => Some(*field),
            Self::UnknownSubStep { .. } => None,
        }
    }

    /// Short message suitable for display next to the blocked "Continue" action.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

/// Decide whether the wizard may leave `(phase, sub_step)` for `service`.
///
/// `sub_step` is only read during the details phase.
pub fn validate(
    service: ServiceVariant,
    phase: WizardPhase,
    sub_step: u8,
    form: &FormData,
) -> Result<(), ValidationError> {
    match phase {
        WizardPhase::Selection | WizardPhase::Confirmation => Ok(()),
        WizardPhase::Details => {
            if !definition_of(service).contains(sub_step) {
                return Err(ValidationError::UnknownSubStep { service, sub_step });
            }
            rules::details(service, sub_step, form)
        }
        WizardPhase::Contact => rules::contact(form),
    }
}
