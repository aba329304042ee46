use super::common::*;
use crate::workflows::intake::{
    definition_of, Advance, FieldError, FormField, ServiceVariant, ValidationError, WizardAction,
    WizardError, WizardPhase, WizardState, WizardStep,
};

/// Fields that satisfy every details rule of every service.
fn complete_details(state: WizardState) -> WizardState {
    fill(
        state,
        &[
            (FormField::BottleBrand, text("Total")),
            (FormField::ParcelType, text("document")),
            (FormField::DestinationAddress, text("Rue 12, Douala")),
            (FormField::LaundryType, text("linge")),
            (FormField::CleaningCategory, text("nettoyage")),
            (FormField::CleaningTypes, choices(&["bureaux"])),
            (FormField::WasteType, text("menager")),
            (FormField::WasteFrequency, text("weekly")),
            (FormField::LogementSearchType, text("cherche")),
            (FormField::LogementTypes, choices(&["studio"])),
            (FormField::LogementCity, text("Yaoundé")),
            (FormField::LogementBudget, text("80000")),
            (FormField::DemenagementType, text("demenagement")),
            (FormField::MoveSize, text("studio")),
            (FormField::MoveFromCity, text("Douala")),
            (FormField::MoveToCity, text("Kribi")),
        ],
    )
}

#[test]
fn starts_in_selection_without_a_service() {
    let state = WizardState::new();
    assert_eq!(state.phase(), WizardPhase::Selection);
    assert_eq!(state.phase().index(), 0);
    assert_eq!(state.selected_service(), None);
    assert_eq!(state.sub_step(), None);
    assert!(!state.is_submitting());
}

#[test]
fn selecting_a_service_enters_the_first_details_sub_step() {
    let state = selected(ServiceVariant::Parcel);
    assert_eq!(
        state.step(),
        WizardStep::Details {
            service: ServiceVariant::Parcel,
            sub_step: 1
        }
    );

    match state.select_service(ServiceVariant::Gas) {
        Err(WizardError::InvalidTransition { action, phase }) => {
            assert_eq!(action, WizardAction::SelectService);
            assert_eq!(phase, WizardPhase::Details);
        }
        other => panic!("expected invalid transition, got {other:?}"),
    }
}

#[test]
fn sub_step_stays_within_bounds_for_every_service() {
    for service in ServiceVariant::ordered() {
        let max = definition_of(service).max_detail_substeps;
        let mut state = complete_details(selected(service));

        for expected in 1..=max {
            assert_eq!(state.sub_step(), Some(expected), "{service} sub-step");
            state = moved(&state);
        }

        assert_eq!(state.phase(), WizardPhase::Contact, "{service} reaches contact");
        assert_eq!(state.sub_step(), None);

        let back = state.retreat().expect("contact can go back");
        assert_eq!(back.sub_step(), Some(max), "{service} returns to last sub-step");
    }
}

#[test]
fn blocked_advance_never_moves() {
    let state = selected(ServiceVariant::Cleaning);

    for _ in 0..3 {
        match state.advance() {
            Err(WizardError::Validation(ValidationError::Missing(field))) => {
                assert_eq!(field, FormField::CleaningCategory)
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    assert_eq!(state.phase(), WizardPhase::Details);
    assert_eq!(state.sub_step(), Some(1));
}

#[test]
fn retreat_from_first_sub_step_discards_selection_but_keeps_fields() {
    let state = fill(
        selected(ServiceVariant::Waste),
        &[(FormField::WasteType, text("encombrants"))],
    );
    let second = moved(&state);
    assert_eq!(second.sub_step(), Some(2));

    let first = second.retreat().expect("back to sub-step 1");
    assert_eq!(first.sub_step(), Some(1));

    let selection = first.retreat().expect("back to selection");
    assert_eq!(selection.phase(), WizardPhase::Selection);
    assert_eq!(selection.selected_service(), None);
    assert_eq!(selection.form().waste.waste_type, "encombrants");

    assert!(matches!(
        selection.retreat(),
        Err(WizardError::InvalidTransition {
            action: WizardAction::Retreat,
            ..
        })
    ));
}

#[test]
fn switching_services_keeps_other_variant_fields() {
    let state = fill(
        selected(ServiceVariant::Gas),
        &[(FormField::BottleBrand, text("Tradex"))],
    );
    let switched = state
        .retreat()
        .and_then(|selection| selection.select_service(ServiceVariant::Laundry))
        .expect("switch service");

    assert_eq!(switched.selected_service(), Some(ServiceVariant::Laundry));
    assert_eq!(switched.form().gas.bottle_brand, "Tradex");
}

#[test]
fn contact_advance_produces_a_request_and_locks() {
    let state = contact_filled(gas_at_contact());

    let (pending, request) = match state.advance().expect("contact is complete") {
        Advance::Submit { pending, request } => (pending, request),
        other => panic!("expected a submission, got {other:?}"),
    };

    assert!(pending.is_submitting());
    assert_eq!(pending.phase(), WizardPhase::Contact);
    assert_eq!(request.service_type, ServiceVariant::Gas);
    assert_eq!(request.contact_name, "Jean");

    assert_eq!(pending.advance().expect("no-op"), Advance::Ignored);
    assert!(matches!(pending.retreat(), Err(WizardError::SubmissionInFlight)));
    assert!(matches!(
        pending.with_field(FormField::ContactName, text("Paul")),
        Err(WizardError::SubmissionInFlight)
    ));

    let confirmed = pending.complete_submission(true).expect("accepted");
    assert_eq!(
        confirmed.step(),
        WizardStep::Confirmation {
            service: ServiceVariant::Gas
        }
    );
    assert!(!confirmed.is_submitting());
}

#[test]
fn rejected_submission_stays_on_contact_and_can_retry() {
    let state = contact_filled(gas_at_contact());
    let Advance::Submit { pending, .. } = state.advance().expect("contact is complete") else {
        panic!("expected a submission");
    };

    let failed = pending.complete_submission(false).expect("failure applied");
    assert_eq!(failed.phase(), WizardPhase::Contact);
    assert!(!failed.is_submitting());
    assert!(matches!(
        failed.advance().expect("retry allowed"),
        Advance::Submit { .. }
    ));
}

#[test]
fn contact_rule_blocks_submission() {
    let state = gas_at_contact();
    assert_eq!(
        state.advance(),
        Err(WizardError::Validation(ValidationError::Missing(
            FormField::ContactName
        )))
    );
}

#[test]
fn completion_requires_a_pending_submission() {
    let state = gas_at_contact();
    assert!(matches!(
        state.complete_submission(true),
        Err(WizardError::InvalidTransition {
            action: WizardAction::CompleteSubmission,
            phase: WizardPhase::Contact
        })
    ));
}

#[test]
fn confirmation_is_terminal_until_reset() {
    let state = contact_filled(gas_at_contact());
    let Advance::Submit { pending, .. } = state.advance().expect("contact is complete") else {
        panic!("expected a submission");
    };
    let confirmed = pending.complete_submission(true).expect("accepted");

    assert!(confirmed.advance().is_err());
    assert!(confirmed.retreat().is_err());
    assert!(matches!(
        confirmed.with_field(FormField::Details, text("late edit")),
        Err(WizardError::InvalidTransition {
            action: WizardAction::EditField,
            ..
        })
    ));

    let fresh = confirmed.reset();
    assert_eq!(fresh, WizardState::new());
    assert_eq!(fresh.form().gas.bottle_brand, "");
}

#[test]
fn field_setters_reject_mismatched_values() {
    let state = selected(ServiceVariant::Cleaning);

    assert_eq!(
        state.with_field(FormField::CleaningTypes, text("bureaux")),
        Err(WizardError::Field(FieldError::ExpectedChoices(
            FormField::CleaningTypes
        )))
    );
    assert_eq!(
        state.with_field(FormField::Details, choices(&["a"])),
        Err(WizardError::Field(FieldError::ExpectedText(FormField::Details)))
    );
    assert_eq!(
        state.with_field(FormField::CleaningCategory, text("lavage")),
        Err(WizardError::Field(FieldError::InvalidChoice {
            field: FormField::CleaningCategory,
            value: "lavage".to_string()
        }))
    );
    assert_eq!(
        state.toggle_choice(FormField::Details, "x"),
        Err(WizardError::Field(FieldError::NotMultiSelect(FormField::Details)))
    );
}

#[test]
fn blank_choices_never_satisfy_a_multi_select() {
    let state = selected(ServiceVariant::Cleaning);

    assert_eq!(
        state.toggle_choice(FormField::CleaningTypes, ""),
        Err(WizardError::Field(FieldError::InvalidChoice {
            field: FormField::CleaningTypes,
            value: String::new()
        }))
    );
    assert!(matches!(
        state.with_field(FormField::WorkTypes, choices(&["peinture", "  "])),
        Err(WizardError::Field(FieldError::InvalidChoice { field: FormField::WorkTypes, .. }))
    ));
    assert!(state.form().cleaning.cleaning_types.is_empty());
}

#[test]
fn toggling_choices_preserves_selection_order() {
    let state = selected(ServiceVariant::Cleaning)
        .toggle_choice(FormField::CleaningTypes, "bureaux")
        .and_then(|state| state.toggle_choice(FormField::CleaningTypes, "vitres"))
        .and_then(|state| state.toggle_choice(FormField::CleaningTypes, "tapis"))
        .and_then(|state| state.toggle_choice(FormField::CleaningTypes, "vitres"))
        .expect("toggles apply");

    assert_eq!(
        state.form().cleaning.cleaning_types,
        vec!["bureaux".to_string(), "tapis".to_string()]
    );

    let deduped = state
        .with_field(FormField::CleaningTypes, choices(&["a", "b", "a"]))
        .expect("choices accepted");
    assert_eq!(deduped.form().cleaning.cleaning_types, vec!["a", "b"]);
}

#[test]
fn reducers_leave_the_original_state_untouched() {
    let state = selected(ServiceVariant::Gas);
    let edited = state
        .with_field(FormField::BottleBrand, text("Total"))
        .expect("edit applies");

    assert_eq!(state.form().gas.bottle_brand, "");
    assert_eq!(edited.form().gas.bottle_brand, "Total");
}
