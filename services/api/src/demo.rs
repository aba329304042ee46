use crate::infra::{storage_gateway, InMemoryRequestStore};
use clap::Args;
use service_intake::config::IntakeConfig;
use service_intake::error::AppError;
use service_intake::workflows::intake::{
    AdvanceOutcome, FieldValue, FormField, ServiceVariant, SessionId, WizardPhase, WizardSession,
};
use std::str::FromStr;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Service to request (waste, gas, parcel, laundry, cleaning, housing, moving, other)
    #[arg(long, default_value = "gas", value_parser = ServiceVariant::from_str)]
    pub(crate) service: ServiceVariant,
    /// Store the request under its own category instead of the legacy mapping
    #[arg(long)]
    pub(crate) no_legacy_remap: bool,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        service,
        no_legacy_remap,
    } = args;

    let store = InMemoryRequestStore::default();
    let intake = IntakeConfig {
        legacy_category_remap: !no_legacy_remap,
        ..IntakeConfig::default()
    };
    let gateway = storage_gateway(&intake, store.clone());
    let session = WizardSession::new(
        SessionId("ses-demo".to_string()),
        Arc::new(gateway),
    );

    println!("Service intake demo: {} ({})", service.label(), service.id());
    session.select_service(service).await?;

    for (field, value) in sample_details(service) {
        session.set_field(field, value).await?;
    }

    loop {
        let state = session.snapshot().await;
        if state.phase() != WizardPhase::Details {
            break;
        }
        let sub_step = state.sub_step().unwrap_or_default();
        let max = state
            .definition()
            .map(|definition| definition.max_detail_substeps)
            .unwrap_or_default();
        println!("- details step {sub_step}/{max} complete");
        session.advance().await?;
    }

    session
        .set_field(FormField::ContactName, FieldValue::from("Jean Mbarga"))
        .await?;
    session
        .set_field(FormField::ContactPhone, FieldValue::from("699000000"))
        .await?;
    session
        .set_field(FormField::DeliveryAddress, FieldValue::from("Bastos, Yaoundé"))
        .await?;
    println!("- contact details captured");

    let (outcome, state) = session.advance().await?;
    match outcome {
        AdvanceOutcome::Submitted(request) => println!(
            "- submitted as '{}' -> phase {}",
            request.service_type,
            state.phase()
        ),
        AdvanceOutcome::Moved | AdvanceOutcome::Ignored => {
            println!("  Submission did not complete (phase {})", state.phase());
            return Ok(());
        }
    }

    for record in store.records() {
        match serde_json::to_string_pretty(&record) {
            Ok(json) => println!("  Stored request:\n{}", json),
            Err(err) => println!("  Stored request unavailable: {}", err),
        }
    }

    Ok(())
}

fn sample_details(service: ServiceVariant) -> Vec<(FormField, FieldValue)> {
    match service {
        ServiceVariant::Waste => vec![
            (FormField::WasteType, "ménagers".into()),
            (FormField::WasteFrequency, "hebdomadaire".into()),
        ],
        ServiceVariant::Gas => vec![
            (FormField::BottleBrand, "Tradex".into()),
            (FormField::Quantity, "2".into()),
        ],
        ServiceVariant::Parcel => vec![
            (FormField::DestinationType, "national".into()),
            (FormField::ParcelType, "documents".into()),
            (FormField::DestinationAddress, "Akwa, Douala".into()),
        ],
        ServiceVariant::Laundry => vec![
            (FormField::LaundryType, "repassage".into()),
            (FormField::Urgency, "express".into()),
        ],
        ServiceVariant::Cleaning => vec![
            (FormField::CleaningCategory, "nettoyage".into()),
            (FormField::CleaningTypes, vec!["bureaux", "vitres"].into()),
        ],
        ServiceVariant::Housing => vec![
            (FormField::LogementSearchType, "cherche".into()),
            (FormField::LogementTypes, vec!["studio"].into()),
            (FormField::LogementCity, "Yaoundé".into()),
            (FormField::LogementBudget, "80000".into()),
        ],
        ServiceVariant::Moving => vec![
            (FormField::DemenagementType, "demenagement".into()),
            (FormField::MoveSize, "T3".into()),
            (FormField::MoveFromCity, "Douala".into()),
            (FormField::MoveToCity, "Yaoundé".into()),
        ],
        ServiceVariant::Other => vec![(
            FormField::Details,
            "Montage d'un meuble de cuisine".into(),
        )],
    }
}
