//! Immutable value objects of the taxi domain.

use serde::{Deserialize, Serialize};

use taxiflow_core::value_object;

/// A person's first and last name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonName {
    pub first_name: String,
    pub last_name: String,
}

impl PersonName {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// `"<first> <last>"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

value_object!(PersonName {
    first_name,
    last_name
});

/// A street address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub building: String,
}

impl Address {
    pub fn new(street: impl Into<String>, building: impl Into<String>) -> Self {
        Self {
            street: street.into(),
            building: building.into(),
        }
    }

    /// `"<street> <building>"`.
    pub fn line(&self) -> String {
        format!("{} {}", self.street, self.building)
    }
}

value_object!(Address { street, building });

/// A taxi car.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Car {
    pub color: String,
    pub model: String,
    pub plate_number: String,
}

impl Car {
    pub fn new(
        color: impl Into<String>,
        model: impl Into<String>,
        plate_number: impl Into<String>,
    ) -> Self {
        Self {
            color: color.into(),
            model: model.into(),
            plate_number: plate_number.into(),
        }
    }
}

value_object!(Car {
    color,
    model,
    plate_number
});
