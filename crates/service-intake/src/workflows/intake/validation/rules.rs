use super::super::catalog::ServiceVariant;
use super::super::domain::{FormData, FormField, HousingSearch, MoveKind};
use super::ValidationError;

pub(super) fn details(
    service: ServiceVariant,
    sub_step: u8,
    form: &FormData,
) -> Result<(), ValidationError> {
    match (service, sub_step) {
        (ServiceVariant::Gas, 1) => require_text(FormField::BottleBrand, &form.gas.bottle_brand),

        (ServiceVariant::Parcel, 1) => {
            require_some(FormField::DestinationType, &form.parcel.destination_type)
        }
        (ServiceVariant::Parcel, 2) => {
            require_text(FormField::ParcelType, &form.parcel.parcel_type)?;
            require_text(
                FormField::DestinationAddress,
                &form.parcel.destination_address,
            )
        }

        (ServiceVariant::Laundry, 1) => {
            require_text(FormField::LaundryType, &form.laundry.laundry_type)
        }

        (ServiceVariant::Cleaning, 1) => {
            require_some(FormField::CleaningCategory, &form.cleaning.cleaning_category)
        }
        (ServiceVariant::Cleaning, 2) => {
            require_selection(FormField::CleaningTypes, &form.cleaning.cleaning_types)
        }

        (ServiceVariant::Waste, 1) => require_text(FormField::WasteType, &form.waste.waste_type),
        (ServiceVariant::Waste, 2) => {
            require_text(FormField::WasteFrequency, &form.waste.waste_frequency)
        }

        (ServiceVariant::Housing, 1) => require_some(
            FormField::LogementSearchType,
            &form.housing.logement_search_type,
        ),
        (ServiceVariant::Housing, 2) => {
            require_selection(FormField::LogementTypes, &form.housing.logement_types)
        }
        (ServiceVariant::Housing, 3) => match form.housing.logement_search_type {
            Some(HousingSearch::Cherche) => {
                require_text(FormField::LogementCity, &form.housing.logement_city)?;
                require_text(FormField::LogementBudget, &form.housing.logement_budget)
            }
            Some(HousingSearch::Propose) | None => Ok(()),
        },

        (ServiceVariant::Moving, 1) => {
            require_some(FormField::DemenagementType, &form.moving.demenagement_type)
        }
        (ServiceVariant::Moving, 2) => match form.moving.demenagement_type {
            Some(MoveKind::Demenagement) => {
                require_text(FormField::MoveSize, &form.moving.move_size)?;
                require_text(FormField::MoveFromCity, &form.moving.move_from_city)?;
                require_text(FormField::MoveToCity, &form.moving.move_to_city)
            }
            Some(MoveKind::Amenagement) => {
                require_selection(FormField::WorkTypes, &form.moving.work_types)
            }
            None => Ok(()),
        },

        // Free-text and optional-details steps never block.
        _ => Ok(()),
    }
}

pub(super) fn contact(form: &FormData) -> Result<(), ValidationError> {
    require_text(FormField::ContactName, &form.contact.contact_name)?;
    require_text(FormField::ContactPhone, &form.contact.contact_phone)
}

fn require_text(field: FormField, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(ValidationError::Missing(field))
    } else {
        Ok(())
    }
}

fn require_some<T>(field: FormField, value: &Option<T>) -> Result<(), ValidationError> {
    match value {
        Some(_) => Ok(()),
        None => Err(ValidationError::Missing(field)),
    }
}

fn require_selection(field: FormField, values: &[String]) -> Result<(), ValidationError> {
    if values.is_empty() {
        Err(ValidationError::Missing(field))
    } else {
        Ok(())
    }
}
