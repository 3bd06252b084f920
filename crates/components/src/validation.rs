use serde::Serialize;
use shared_clients::DataCollection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    Valid,
    Invalid,
}

/// First problem found with one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyValidationResult {
    pub property: String,
    pub message: String,
}

impl PropertyValidationResult {
    pub fn new(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            message: message.into(),
        }
    }
}

/// Problem not tied to a single property, e.g. a failed connection probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenericValidationResult {
    pub message: String,
    pub trace: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertiesValidationResult {
    pub status: ValidationStatus,
    pub property_validation_results: Vec<PropertyValidationResult>,
}

impl PropertiesValidationResult {
    pub fn valid() -> Self {
        Self {
            status: ValidationStatus::Valid,
            property_validation_results: Vec::new(),
        }
    }

    pub fn invalid(results: Vec<PropertyValidationResult>) -> Self {
        Self {
            status: ValidationStatus::Invalid,
            property_validation_results: results,
        }
    }

    /// Valid when `results` is empty, invalid otherwise.
    pub fn from_results(results: Vec<PropertyValidationResult>) -> Self {
        if results.is_empty() {
            Self::valid()
        } else {
            Self::invalid(results)
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status == ValidationStatus::Valid
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionValidationResult {
    pub status: ValidationStatus,
    pub property_validation_results: Vec<PropertyValidationResult>,
    pub generic_validation_results: Vec<GenericValidationResult>,
}

impl ConnectionValidationResult {
    pub fn valid() -> Self {
        Self {
            status: ValidationStatus::Valid,
            property_validation_results: Vec::new(),
            generic_validation_results: Vec::new(),
        }
    }

    pub fn invalid(
        properties: Vec<PropertyValidationResult>,
        generic: Vec<GenericValidationResult>,
    ) -> Self {
        Self {
            status: ValidationStatus::Invalid,
            property_validation_results: properties,
            generic_validation_results: generic,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status == ValidationStatus::Valid
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterValidationResult {
    pub status: ValidationStatus,
    pub property_validation_results: Vec<PropertyValidationResult>,
    pub matched_collections: Vec<DataCollection>,
}

impl FilterValidationResult {
    pub fn valid(matched: Vec<DataCollection>) -> Self {
        Self {
            status: ValidationStatus::Valid,
            property_validation_results: Vec::new(),
            matched_collections: matched,
        }
    }

    pub fn invalid(results: Vec<PropertyValidationResult>) -> Self {
        Self {
            status: ValidationStatus::Invalid,
            property_validation_results: results,
            matched_collections: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status == ValidationStatus::Valid
    }
}
