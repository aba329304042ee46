//! Guided intake wizard for the household services marketplace.
//!
//! A customer picks one of the catalog services, walks through that service's detail
//! sub-steps (each gated by its validation rules), leaves contact details, and the composed
//! request is handed to a [`SubmissionGateway`] for storage.

pub mod catalog;
pub mod composer;
pub mod domain;
pub mod gateway;
pub mod quick_order;
pub mod router;
pub mod session;
pub mod validation;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use catalog::{definition_of, ServiceDefinition, ServiceVariant, UnknownService};
pub use composer::{
    compose, compose_request, RequestPayload, RequestStatus, ServicePayload, ServiceRequest,
    WizardPayload, WIZARD_SOURCE,
};
pub use domain::{
    CleaningCategory, DestinationType, FieldError, FieldValue, FormData, FormField,
    HousingSearch, MoveKind, Urgency,
};
pub use gateway::{
    legacy_storage_category, LegacyCategoryGateway, SubmissionError, SubmissionGateway,
};
pub use quick_order::{QuickOrder, QuickOrderError, QuickOrderPayload};
pub use router::intake_router;
pub use session::{
    AdvanceOutcome, SessionId, SessionRegistry, SessionView, WizardCommand, WizardSession,
    DEFAULT_SESSION_IDLE_TTL,
};
pub use validation::{validate, ValidationError};
pub use wizard::{Advance, WizardAction, WizardError, WizardPhase, WizardState, WizardStep};
