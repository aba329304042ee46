use serde::Serialize;

use super::catalog::ServiceVariant;
use super::domain::{
    CleaningFields, ContactFields, FormData, GasFields, HousingFields, LaundryFields, MoveKind,
    MovingFields, ParcelFields, WasteFields,
};
use super::quick_order::QuickOrderPayload;

/// Tag identifying requests that came through the guided wizard.
pub const WIZARD_SOURCE: &str = "wizard_homepage_premium";

const LIST_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    New,
}

/// Normalized record handed to the submission gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceRequest {
    pub service_type: ServiceVariant,
    pub payload: RequestPayload,
    pub contact_name: String,
    pub contact_phone: String,
    pub status: RequestStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RequestPayload {
    Wizard(WizardPayload),
    QuickOrder(QuickOrderPayload),
}

impl RequestPayload {
    pub fn as_wizard(&self) -> Option<&WizardPayload> {
        match self {
            Self::Wizard(payload) => Some(payload),
            Self::QuickOrder(_) => None,
        }
    }

    pub fn as_quick_order(&self) -> Option<&QuickOrderPayload> {
        match self {
            Self::QuickOrder(payload) => Some(payload),
            Self::Wizard(_) => None,
        }
    }
}

/// Wizard payload: the active variant's fields, contact details and the origin tag, rendered flat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardPayload {
    #[serde(flatten)]
    pub service: ServicePayload,
    #[serde(flatten)]
    pub contact: ContactFields,
    pub source: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ServicePayload {
    Gas(GasPayload),
    Parcel(ParcelPayload),
    Laundry(LaundryPayload),
    Cleaning(CleaningPayload),
    Waste(WastePayload),
    Housing(HousingPayload),
    Moving(MovingPayload),
    Other(OtherPayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GasPayload {
    #[serde(flatten)]
    pub fields: GasFields,
    pub bottle_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParcelPayload {
    #[serde(flatten)]
    pub fields: ParcelFields,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaundryPayload {
    #[serde(flatten)]
    pub fields: LaundryFields,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningPayload {
    #[serde(flatten)]
    pub fields: CleaningFields,
    pub details: String,
    pub cleaning_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WastePayload {
    #[serde(flatten)]
    pub fields: WasteFields,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HousingPayload {
    #[serde(flatten)]
    pub fields: HousingFields,
    pub details: String,
    pub logement_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovingPayload {
    #[serde(flatten)]
    pub fields: MovingFields,
    pub details: String,
    pub move_details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtherPayload {
    pub details: String,
}

/// Build the payload for `service` from a finished form snapshot.
pub fn compose(service: ServiceVariant, form: &FormData) -> WizardPayload {
    let details = form.details.clone();

    let payload = match service {
        ServiceVariant::Gas => ServicePayload::Gas(GasPayload {
            bottle_type: bottle_type(&form.gas),
            fields: form.gas.clone(),
        }),
        ServiceVariant::Parcel => ServicePayload::Parcel(ParcelPayload {
            fields: form.parcel.clone(),
            details,
        }),
        ServiceVariant::Laundry => ServicePayload::Laundry(LaundryPayload {
            fields: form.laundry.clone(),
            details,
        }),
        ServiceVariant::Cleaning => ServicePayload::Cleaning(CleaningPayload {
            cleaning_type: form.cleaning.cleaning_types.join(LIST_SEPARATOR),
            fields: form.cleaning.clone(),
            details,
        }),
        ServiceVariant::Waste => ServicePayload::Waste(WastePayload {
            fields: form.waste.clone(),
            details,
        }),
        ServiceVariant::Housing => ServicePayload::Housing(HousingPayload {
            logement_type: form.housing.logement_types.join(LIST_SEPARATOR),
            fields: form.housing.clone(),
            details,
        }),
        ServiceVariant::Moving => ServicePayload::Moving(MovingPayload {
            move_details: move_details(&form.moving),
            fields: form.moving.clone(),
            details,
        }),
        ServiceVariant::Other => ServicePayload::Other(OtherPayload { details }),
    };

    WizardPayload {
        service: payload,
        contact: form.contact.clone(),
        source: WIZARD_SOURCE,
    }
}

/// Build the full gateway record. `service_type` is always the selected variant's own id.
pub fn compose_request(service: ServiceVariant, form: &FormData) -> ServiceRequest {
    ServiceRequest {
        service_type: service,
        payload: RequestPayload::Wizard(compose(service, form)),
        contact_name: form.contact.contact_name.clone(),
        contact_phone: form.contact.contact_phone.clone(),
        status: RequestStatus::New,
    }
}

// Trailing spaces below match records already stored by the web front end.
fn bottle_type(gas: &GasFields) -> String {
    if gas.bottle_brand.is_empty() {
        String::new()
    } else {
        format!("{} {} ", gas.bottle_brand, gas.bottle_size)
    }
}

fn move_details(moving: &MovingFields) -> String {
    match moving.demenagement_type {
        Some(MoveKind::Demenagement) => format!(
            "Déménagement: {} de {} à {} ",
            moving.move_size, moving.move_from_city, moving.move_to_city
        ),
        Some(MoveKind::Amenagement) | None => {
            format!("Aménagement: {} ", moving.work_types.join(LIST_SEPARATOR))
        }
    }
}
