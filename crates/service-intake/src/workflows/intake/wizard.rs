//! Wizard state and its transitions.
//!
//! `WizardState` is immutable from the outside: every operation is a reducer that returns the
//! next state (or the reason it refused), leaving the receiver untouched.

use serde::Serialize;
use std::fmt;

use super::catalog::{definition_of, ServiceDefinition, ServiceVariant};
use super::composer::{compose_request, ServiceRequest};
use super::domain::{FieldError, FieldValue, FormData, FormField};
use super::gateway::SubmissionError;
use super::validation::{validate, ValidationError};

/// Top-level stage of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardPhase {
    Selection,
    Details,
    Contact,
    Confirmation,
}

impl WizardPhase {
    pub const fn index(self) -> u8 {
        match self {
            Self::Selection => 0,
            Self::Details => 1,
            Self::Contact => 2,
            Self::Confirmation => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Selection => "selection",
            Self::Details => "details",
            Self::Contact => "contact",
            Self::Confirmation => "confirmation",
        }
    }
}

impl fmt::Display for WizardPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Position in the wizard. A service is attached to every step after selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WizardStep {
    #[default]
    Selection,
    Details {
        service: ServiceVariant,
        sub_step: u8,
    },
    Contact {
        service: ServiceVariant,
    },
    Confirmation {
        service: ServiceVariant,
    },
}

impl WizardStep {
    pub const fn phase(self) -> WizardPhase {
        match self {
            Self::Selection => WizardPhase::Selection,
            Self::Details { .. } => WizardPhase::Details,
            Self::Contact { .. } => WizardPhase::Contact,
            Self::Confirmation { .. } => WizardPhase::Confirmation,
        }
    }

    pub const fn service(self) -> Option<ServiceVariant> {
        match self {
            Self::Selection => None,
            Self::Details { service, .. }
            | Self::Contact { service }
            | Self::Confirmation { service } => Some(service),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardAction {
    SelectService,
    EditField,
    Advance,
    Retreat,
    CompleteSubmission,
}

impl WizardAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SelectService => "select a service",
            Self::EditField => "edit a field",
            Self::Advance => "advance",
            Self::Retreat => "go back",
            Self::CompleteSubmission => "complete a submission",
        }
    }
}

impl fmt::Display for WizardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("cannot {action} during the {phase} phase")]
    InvalidTransition {
        action: WizardAction,
        phase: WizardPhase,
    },
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("{}", .0.message())]
    Submission(#[from] SubmissionError),
}

/// Result of asking the wizard to move forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Moved to another sub-step or phase.
    Moved(WizardState),
    /// Contact details accepted; `request` must be submitted and the outcome reported through
    /// [`WizardState::complete_submission`] on `pending`.
    Submit {
        pending: WizardState,
        request: ServiceRequest,
    },
    /// A submission is already in flight.
    Ignored,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardState {
    step: WizardStep,
    form: FormData,
    submitting: bool,
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn phase(&self) -> WizardPhase {
        self.step.phase()
    }

    pub fn selected_service(&self) -> Option<ServiceVariant> {
        self.step.service()
    }

    /// Current details sub-step, `None` outside the details phase.
    pub fn sub_step(&self) -> Option<u8> {
        match self.step {
            WizardStep::Details { sub_step, .. } => Some(sub_step),
            _ => None,
        }
    }

    pub fn definition(&self) -> Option<ServiceDefinition> {
        self.selected_service().map(definition_of)
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn select_service(&self, service: ServiceVariant) -> Result<Self, WizardError> {
        match self.step {
            WizardStep::Selection => Ok(Self {
                step: WizardStep::Details {
                    service,
                    sub_step: 1,
                },
                ..self.clone()
            }),
            _ => Err(self.invalid(WizardAction::SelectService)),
        }
    }

    pub fn with_field(&self, field: FormField, value: FieldValue) -> Result<Self, WizardError> {
        self.ensure_editable()?;
        let form = self.form.clone().with_value(field, value)?;
        Ok(Self {
            form,
            ..self.clone()
        })
    }

    pub fn toggle_choice(&self, field: FormField, choice: &str) -> Result<Self, WizardError> {
        self.ensure_editable()?;
        let form = self.form.clone().with_toggled(field, choice)?;
        Ok(Self {
            form,
            ..self.clone()
        })
    }

    pub fn advance(&self) -> Result<Advance, WizardError> {
        match self.step {
            WizardStep::Details { service, sub_step } => {
                validate(service, WizardPhase::Details, sub_step, &self.form)?;
                let step = if definition_of(service).is_last(sub_step) {
                    WizardStep::Contact { service }
                } else {
                    WizardStep::Details {
                        service,
                        sub_step: sub_step + 1,
                    }
                };
                Ok(Advance::Moved(Self {
                    step,
                    ..self.clone()
                }))
            }
            WizardStep::Contact { service } => {
                if self.submitting {
                    return Ok(Advance::Ignored);
                }
                validate(service, WizardPhase::Contact, 0, &self.form)?;
                Ok(Advance::Submit {
                    pending: Self {
                        submitting: true,
                        ..self.clone()
                    },
                    request: compose_request(service, &self.form),
                })
            }
            WizardStep::Selection | WizardStep::Confirmation { .. } => {
                Err(self.invalid(WizardAction::Advance))
            }
        }
    }

    /// Apply the gateway outcome to a state produced by [`Advance::Submit`].
    pub fn complete_submission(&self, accepted: bool) -> Result<Self, WizardError> {
        match self.step {
            WizardStep::Contact { service } if self.submitting => {
                let step = if accepted {
                    WizardStep::Confirmation { service }
                } else {
                    self.step
                };
                Ok(Self {
                    step,
                    submitting: false,
                    ..self.clone()
                })
            }
            _ => Err(self.invalid(WizardAction::CompleteSubmission)),
        }
    }

    /// Step back. Leaving the first details sub-step drops the selected service but keeps the
    /// collected fields.
    pub fn retreat(&self) -> Result<Self, WizardError> {
        if self.submitting {
            return Err(WizardError::SubmissionInFlight);
        }

        let step = match self.step {
            WizardStep::Details { service, sub_step } if sub_step > 1 => WizardStep::Details {
                service,
                sub_step: sub_step - 1,
            },
            WizardStep::Details { .. } => WizardStep::Selection,
            WizardStep::Contact { service } => WizardStep::Details {
                service,
                sub_step: definition_of(service).max_detail_substeps,
            },
            WizardStep::Selection | WizardStep::Confirmation { .. } => {
                return Err(self.invalid(WizardAction::Retreat))
            }
        };

        Ok(Self {
            step,
            ..self.clone()
        })
    }

    /// Back to a fresh wizard, discarding everything collected.
    pub fn reset(&self) -> Self {
        Self::new()
    }

    fn ensure_editable(&self) -> Result<(), WizardError> {
        if self.submitting {
            return Err(WizardError::SubmissionInFlight);
        }
        if let WizardStep::Confirmation { .. } = self.step {
            return Err(self.invalid(WizardAction::EditField));
        }
        Ok(())
    }

    fn invalid(&self, action: WizardAction) -> WizardError {
        WizardError::InvalidTransition {
            action,
            phase: self.phase(),
        }
    }
}
