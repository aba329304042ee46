use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Service categories offered through the guided intake wizard.
///
/// `Other` is the free-text fallback: a single details step and no structured fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceVariant {
    Waste,
    Gas,
    Parcel,
    Laundry,
    Cleaning,
    Housing,
    Moving,
    Other,
}

impl ServiceVariant {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::Waste,
            Self::Gas,
            Self::Parcel,
            Self::Laundry,
            Self::Cleaning,
            Self::Housing,
            Self::Moving,
            Self::Other,
        ]
    }

    /// Stable identifier stored in `service_type`.
    pub const fn id(self) -> &'static str {
        match self {
            Self::Waste => "waste",
            Self::Gas => "gas",
            Self::Parcel => "parcel",
            Self::Laundry => "laundry",
            Self::Cleaning => "cleaning",
            Self::Housing => "housing",
            Self::Moving => "moving",
            Self::Other => "other",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Waste => "Waste management",
            Self::Gas => "Gas delivery",
            Self::Parcel => "Parcel shipping",
            Self::Laundry => "Laundry pickup",
            Self::Cleaning => "Cleaning & sanitation",
            Self::Housing => "Housing search",
            Self::Moving => "Moving & renovation",
            Self::Other => "Other request",
        }
    }

    pub fn from_id(raw: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|variant| variant.id().eq_ignore_ascii_case(raw.trim()))
    }

    pub const fn definition(self) -> ServiceDefinition {
        definition_of(self)
    }
}

impl fmt::Display for ServiceVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown service '{0}'")]
pub struct UnknownService(pub String);

impl FromStr for ServiceVariant {
    type Err = UnknownService;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| UnknownService(s.to_string()))
    }
}

/// Shape of a variant's details phase. Sub-steps are numbered `1..=max_detail_substeps`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceDefinition {
    pub variant: ServiceVariant,
    pub max_detail_substeps: u8,
}

impl ServiceDefinition {
    pub const fn contains(&self, sub_step: u8) -> bool {
        sub_step >= 1 && sub_step <= self.max_detail_substeps
    }

    pub const fn is_last(&self, sub_step: u8) -> bool {
        sub_step == self.max_detail_substeps
    }
}

pub const fn definition_of(variant: ServiceVariant) -> ServiceDefinition {
    let max_detail_substeps = match variant {
        ServiceVariant::Gas | ServiceVariant::Other => 1,
        ServiceVariant::Waste | ServiceVariant::Laundry | ServiceVariant::Moving => 2,
        ServiceVariant::Parcel | ServiceVariant::Cleaning | ServiceVariant::Housing => 3,
    };

    ServiceDefinition {
        variant,
        max_detail_substeps,
    }
}
