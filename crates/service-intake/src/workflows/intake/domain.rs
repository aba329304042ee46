use serde::{Deserialize, Serialize};

/// Every field the wizard can collect, named by its wire key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    BottleBrand,
    BottleSize,
    Quantity,
    DestinationType,
    ParcelType,
    DestinationAddress,
    LaundryType,
    Urgency,
    CleaningCategory,
    CleaningTypes,
    WasteType,
    WasteFrequency,
    LogementSearchType,
    LogementTypes,
    LogementCity,
    LogementBudget,
    DemenagementType,
    MoveSize,
    MoveFromCity,
    MoveToCity,
    WorkTypes,
    Details,
    ContactName,
    ContactPhone,
    DeliveryAddress,
}

impl FormField {
    pub const fn name(self) -> &'static str {
        match self {
            Self::BottleBrand => "bottleBrand",
            Self::BottleSize => "bottleSize",
            Self::Quantity => "quantity",
            Self::DestinationType => "destinationType",
            Self::ParcelType => "parcelType",
            Self::DestinationAddress => "destinationAddress",
            Self::LaundryType => "laundryType",
            Self::Urgency => "urgency",
            Self::CleaningCategory => "cleaningCategory",
            Self::CleaningTypes => "cleaningTypes",
            Self::WasteType => "wasteType",
            Self::WasteFrequency => "wasteFrequency",
            Self::LogementSearchType => "logementSearchType",
            Self::LogementTypes => "logementTypes",
            Self::LogementCity => "logementCity",
            Self::LogementBudget => "logementBudget",
            Self::DemenagementType => "demenagementType",
            Self::MoveSize => "moveSize",
            Self::MoveFromCity => "moveFromCity",
            Self::MoveToCity => "moveToCity",
            Self::WorkTypes => "workTypes",
            Self::Details => "details",
            Self::ContactName => "contactName",
            Self::ContactPhone => "contactPhone",
            Self::DeliveryAddress => "deliveryAddress",
        }
    }

    pub const fn is_multi_select(self) -> bool {
        matches!(
            self,
            Self::CleaningTypes | Self::LogementTypes | Self::WorkTypes
        )
    }

    /// User-facing reason shown when a required field is left blank.
    pub const fn required_message(self) -> &'static str {
        match self {
            Self::BottleBrand => "please choose a gas bottle brand",
            Self::BottleSize => "please choose a bottle size",
            Self::Quantity => "please enter a quantity",
            Self::DestinationType => "please choose a national or international destination",
            Self::ParcelType => "please choose a parcel type",
            Self::DestinationAddress => "please enter the destination address",
            Self::LaundryType => "please choose a laundry type",
            Self::Urgency => "please choose an urgency",
            Self::CleaningCategory => "please choose cleaning or sanitation",
            Self::CleaningTypes => "please select at least one cleaning type",
            Self::WasteType => "please choose a waste type",
            Self::WasteFrequency => "please choose a collection frequency",
            Self::LogementSearchType => "please say whether you are looking for or offering housing",
            Self::LogementTypes => "please select at least one housing type",
            Self::LogementCity => "please enter the city you are searching in",
            Self::LogementBudget => "please enter your budget",
            Self::DemenagementType => "please choose moving or renovation",
            Self::MoveSize => "please choose the size of the move",
            Self::MoveFromCity => "please enter the departure city",
            Self::MoveToCity => "please enter the arrival city",
            Self::WorkTypes => "please select at least one type of work",
            Self::Details => "please describe your request",
            Self::ContactName => "please enter your name",
            Self::ContactPhone => "please enter your phone number",
            Self::DeliveryAddress => "please enter an address",
        }
    }
}

/// Raw value submitted for a field: free text or a list of selected options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Choices(Vec<String>),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Choices(values.into_iter().map(str::to_string).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("{} expects a text value", .0.name())]
    ExpectedText(FormField),
    #[error("{} expects a list of options", .0.name())]
    ExpectedChoices(FormField),
    #[error("{} is not a multi-select field", .0.name())]
    NotMultiSelect(FormField),
    #[error("'{value}' is not a valid option for {}", .field.name())]
    InvalidChoice { field: FormField, value: String },
}

impl FieldError {
    pub fn field(&self) -> FormField {
        match self {
            Self::ExpectedText(field)
            | Self::ExpectedChoices(field)
            | Self::NotMultiSelect(field)
            | Self::InvalidChoice { field, .. } => *field,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationType {
    National,
    International,
}

impl DestinationType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "national" => Some(Self::National),
            "international" => Some(Self::International),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Express,
    Standard,
}

impl Urgency {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "express" => Some(Self::Express),
            "standard" => Some(Self::Standard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleaningCategory {
    Nettoyage,
    Assainissement,
}

impl CleaningCategory {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "nettoyage" => Some(Self::Nettoyage),
            "assainissement" => Some(Self::Assainissement),
            _ => None,
        }
    }
}

/// Whether the customer is looking for housing or offering it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HousingSearch {
    Cherche,
    Propose,
}

impl HousingSearch {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "cherche" => Some(Self::Cherche),
            "propose" => Some(Self::Propose),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveKind {
    Demenagement,
    Amenagement,
}

impl MoveKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "demenagement" => Some(Self::Demenagement),
            "amenagement" => Some(Self::Amenagement),
            _ => None,
        }
    }
}

pub const DEFAULT_BOTTLE_SIZE: &str = "12.5kg";
pub const DEFAULT_QUANTITY: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GasFields {
    pub bottle_brand: String,
    pub bottle_size: String,
    pub quantity: String,
}

impl Default for GasFields {
    fn default() -> Self {
        Self {
            bottle_brand: String::new(),
            bottle_size: DEFAULT_BOTTLE_SIZE.to_string(),
            quantity: DEFAULT_QUANTITY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelFields {
    pub destination_type: Option<DestinationType>,
    pub parcel_type: String,
    pub destination_address: String,
}

impl Default for ParcelFields {
    fn default() -> Self {
        Self {
            destination_type: Some(DestinationType::National),
            parcel_type: String::new(),
            destination_address: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaundryFields {
    pub laundry_type: String,
    pub urgency: Option<Urgency>,
}

impl Default for LaundryFields {
    fn default() -> Self {
        Self {
            laundry_type: String::new(),
            urgency: Some(Urgency::Standard),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningFields {
    pub cleaning_category: Option<CleaningCategory>,
    pub cleaning_types: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WasteFields {
    pub waste_type: String,
    pub waste_frequency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HousingFields {
    pub logement_search_type: Option<HousingSearch>,
    pub logement_types: Vec<String>,
    pub logement_city: String,
    pub logement_budget: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovingFields {
    pub demenagement_type: Option<MoveKind>,
    pub move_size: String,
    pub move_from_city: String,
    pub move_to_city: String,
    pub work_types: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFields {
    pub contact_name: String,
    pub contact_phone: String,
    pub delivery_address: String,
}

/// Everything collected during a wizard session.
///
/// Fields of every variant accumulate side by side so switching services does not lose input;
/// validation and composition only read the active variant's subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    #[serde(flatten)]
    pub gas: GasFields,
    #[serde(flatten)]
    pub parcel: ParcelFields,
    #[serde(flatten)]
    pub laundry: LaundryFields,
    #[serde(flatten)]
    pub cleaning: CleaningFields,
    #[serde(flatten)]
    pub waste: WasteFields,
    #[serde(flatten)]
    pub housing: HousingFields,
    #[serde(flatten)]
    pub moving: MovingFields,
    pub details: String,
    #[serde(flatten)]
    pub contact: ContactFields,
}

impl FormData {
    /// Returns a copy with `field` replaced by `value`.
    pub fn with_value(mut self, field: FormField, value: FieldValue) -> Result<Self, FieldError> {
        if field.is_multi_select() {
            let choices = match value {
                FieldValue::Choices(choices) => {
                    for choice in &choices {
                        reject_blank(field, choice)?;
                    }
                    dedup_choices(choices)
                }
                FieldValue::Text(_) => return Err(FieldError::ExpectedChoices(field)),
            };
            *self.choices_mut(field)? = choices;
            return Ok(self);
        }

        let text = match value {
            FieldValue::Text(text) => text,
            FieldValue::Choices(_) => return Err(FieldError::ExpectedText(field)),
        };

        match field {
            FormField::BottleBrand => self.gas.bottle_brand = text,
            FormField::BottleSize => self.gas.bottle_size = text,
            FormField::Quantity => self.gas.quantity = text,
            FormField::DestinationType => {
                self.parcel.destination_type = parse_choice(field, &text, DestinationType::parse)?
            }
            FormField::ParcelType => self.parcel.parcel_type = text,
            FormField::DestinationAddress => self.parcel.destination_address = text,
            FormField::LaundryType => self.laundry.laundry_type = text,
            FormField::Urgency => self.laundry.urgency = parse_choice(field, &text, Urgency::parse)?,
            FormField::CleaningCategory => {
                self.cleaning.cleaning_category =
                    parse_choice(field, &text, CleaningCategory::parse)?
            }
            FormField::WasteType => self.waste.waste_type = text,
            FormField::WasteFrequency => self.waste.waste_frequency = text,
            FormField::LogementSearchType => {
                self.housing.logement_search_type =
                    parse_choice(field, &text, HousingSearch::parse)?
            }
            FormField::LogementCity => self.housing.logement_city = text,
            FormField::LogementBudget => self.housing.logement_budget = text,
            FormField::DemenagementType => {
                self.moving.demenagement_type = parse_choice(field, &text, MoveKind::parse)?
            }
            FormField::MoveSize => self.moving.move_size = text,
            FormField::MoveFromCity => self.moving.move_from_city = text,
            FormField::MoveToCity => self.moving.move_to_city = text,
            FormField::Details => self.details = text,
            FormField::ContactName => self.contact.contact_name = text,
            FormField::ContactPhone => self.contact.contact_phone = text,
            FormField::DeliveryAddress => self.contact.delivery_address = text,
            FormField::CleaningTypes | FormField::LogementTypes | FormField::WorkTypes => {
                return Err(FieldError::ExpectedChoices(field))
            }
        }

        Ok(self)
    }

    /// Returns a copy with `choice` added to (or removed from) a multi-select field.
    pub fn with_toggled(mut self, field: FormField, choice: &str) -> Result<Self, FieldError> {
        let choices = self.choices_mut(field)?;
        reject_blank(field, choice)?;
        if let Some(position) = choices.iter().position(|existing| existing == choice) {
            choices.remove(position);
        } else {
            choices.push(choice.to_string());
        }
        Ok(self)
    }

    pub fn choices(&self, field: FormField) -> Option<&[String]> {
        match field {
            FormField::CleaningTypes => Some(&self.cleaning.cleaning_types),
            FormField::LogementTypes => Some(&self.housing.logement_types),
            FormField::WorkTypes => Some(&self.moving.work_types),
            _ => None,
        }
    }

    fn choices_mut(&mut self, field: FormField) -> Result<&mut Vec<String>, FieldError> {
        match field {
            FormField::CleaningTypes => Ok(&mut self.cleaning.cleaning_types),
            FormField::LogementTypes => Ok(&mut self.housing.logement_types),
            FormField::WorkTypes => Ok(&mut self.moving.work_types),
            other => Err(FieldError::NotMultiSelect(other)),
        }
    }
}

fn parse_choice<T>(
    field: FormField,
    raw: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>, FieldError> {
    if raw.is_empty() {
        return Ok(None);
    }

    parse(raw).map(Some).ok_or_else(|| FieldError::InvalidChoice {
        field,
        value: raw.to_string(),
    })
}

fn reject_blank(field: FormField, choice: &str) -> Result<(), FieldError> {
    if choice.trim().is_empty() {
        return Err(FieldError::InvalidChoice {
            field,
            value: choice.to_string(),
        });
    }
    Ok(())
}

fn dedup_choices(choices: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(choices.len());
    for choice in choices {
        if !unique.contains(&choice) {
            unique.push(choice);
        }
    }
    unique
}
