//! Simulation inputs
//!
//! The four numeric fields of the simulator form. Each field is an
//! `Option<f64>`: `None` is "absent", which is distinct from zero. A value is
//! *usable* only when it is finite and non-negative; only usable values ever
//! leave the client.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Returns true when `value` may be sent to the backend
#[inline]
#[must_use]
pub fn is_usable(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// One of the four form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    /// Monthly manual labor cost (required)
    LaborCostManual,
    /// Monthly savings from fewer errors (required)
    ErrorSavings,
    /// Monthly automation cost (required)
    AutoCost,
    /// One-time implementation cost (optional)
    ImplementationCost,
}

impl InputField {
    /// All fields in form order
    pub const ALL: [InputField; 4] = [
        Self::LaborCostManual,
        Self::ErrorSavings,
        Self::AutoCost,
        Self::ImplementationCost,
    ];

    /// Fields that must be usable before a simulation can run
    pub const REQUIRED: [InputField; 3] =
        [Self::LaborCostManual, Self::ErrorSavings, Self::AutoCost];

    /// Wire key used by the backend
    #[inline]
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::LaborCostManual => "labor_cost_manual",
            Self::ErrorSavings => "error_savings",
            Self::AutoCost => "auto_cost",
            Self::ImplementationCost => "implementation_cost",
        }
    }

    /// camelCase spelling, accepted when decoding stored payloads
    #[inline]
    #[must_use]
    pub fn camel_key(self) -> &'static str {
        match self {
            Self::LaborCostManual => "laborCostManual",
            Self::ErrorSavings => "errorSavings",
            Self::AutoCost => "autoCost",
            Self::ImplementationCost => "implementationCost",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::LaborCostManual => "labor cost (manual)",
            Self::ErrorSavings => "error savings",
            Self::AutoCost => "automation cost",
            Self::ImplementationCost => "implementation cost",
        };
        f.write_str(label)
    }
}

/// Error for an unknown field name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field: '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for InputField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "labor_cost_manual" | "laborcostmanual" | "labor" => Ok(Self::LaborCostManual),
            "error_savings" | "errorsavings" | "errors" => Ok(Self::ErrorSavings),
            "auto_cost" | "autocost" | "auto" => Ok(Self::AutoCost),
            "implementation_cost" | "implementationcost" | "implementation" => {
                Ok(Self::ImplementationCost)
            }
            _ => Err(UnknownField(s.to_string())),
        }
    }
}

/// Parse raw field text
///
/// Empty (or whitespace-only) text is absent. Text that is not a number is
/// rejected. Negative and infinite values parse fine but are not usable.
pub fn parse_field_text(field: InputField, text: &str) -> Result<Option<f64>, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if !value.is_nan() => Ok(Some(value)),
        _ => Err(ValidationError::NotANumber {
            field,
            text: text.to_string(),
        }),
    }
}

/// The typed form values
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimulationInputs {
    pub labor_cost_manual: Option<f64>,
    pub error_savings: Option<f64>,
    pub auto_cost: Option<f64>,
    pub implementation_cost: Option<f64>,
}

impl SimulationInputs {
    /// Empty form
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Form with the three required fields set
    #[inline]
    #[must_use]
    pub fn with_required(labor_cost_manual: f64, error_savings: f64, auto_cost: f64) -> Self {
        Self {
            labor_cost_manual: Some(labor_cost_manual),
            error_savings: Some(error_savings),
            auto_cost: Some(auto_cost),
            implementation_cost: None,
        }
    }

    /// With implementation cost
    #[inline]
    #[must_use]
    pub fn with_implementation_cost(mut self, value: f64) -> Self {
        self.implementation_cost = Some(value);
        self
    }

    /// Current value of `field`
    #[inline]
    #[must_use]
    pub fn get(&self, field: InputField) -> Option<f64> {
        match field {
            InputField::LaborCostManual => self.labor_cost_manual,
            InputField::ErrorSavings => self.error_savings,
            InputField::AutoCost => self.auto_cost,
            InputField::ImplementationCost => self.implementation_cost,
        }
    }

    /// Overwrite `field`
    #[inline]
    pub fn set(&mut self, field: InputField, value: Option<f64>) {
        let slot = match field {
            InputField::LaborCostManual => &mut self.labor_cost_manual,
            InputField::ErrorSavings => &mut self.error_savings,
            InputField::AutoCost => &mut self.auto_cost,
            InputField::ImplementationCost => &mut self.implementation_cost,
        };
        *slot = value;
    }

    /// Apply raw text to `field`; on error the form is left unchanged
    pub fn set_from_text(&mut self, field: InputField, text: &str) -> Result<(), ValidationError> {
        let value = parse_field_text(field, text)?;
        self.set(field, value);
        Ok(())
    }

    /// Whether `field` holds a usable value
    #[inline]
    #[must_use]
    pub fn is_field_usable(&self, field: InputField) -> bool {
        self.get(field).is_some_and(is_usable)
    }

    /// All three required fields are usable
    #[inline]
    #[must_use]
    pub fn can_simulate(&self) -> bool {
        InputField::REQUIRED
            .iter()
            .all(|field| self.is_field_usable(*field))
    }

    /// Build the outgoing payload
    ///
    /// The optional field is included only when usable; an unusable optional
    /// value is dropped rather than failing the request.
    pub fn to_request(&self) -> Result<SimulationRequest, ValidationError> {
        let required = |field: InputField| {
            self.get(field)
                .filter(|v| is_usable(*v))
                .ok_or(ValidationError::MissingRequired(field))
        };

        Ok(SimulationRequest {
            labor_cost_manual: required(InputField::LaborCostManual)?,
            error_savings: required(InputField::ErrorSavings)?,
            auto_cost: required(InputField::AutoCost)?,
            implementation_cost: self.implementation_cost.filter(|v| is_usable(*v)),
        })
    }

    /// Decode a stored serialized-inputs blob
    ///
    /// Never fails: malformed JSON yields an empty form, and each field that
    /// is missing or not numeric degrades to absent on its own.
    #[must_use]
    pub fn from_stored_json(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => Self::from_stored_value(&value),
            Err(_) => Self::default(),
        }
    }

    /// Decode an already-parsed stored payload, see [`Self::from_stored_json`]
    #[must_use]
    pub fn from_stored_value(value: &Value) -> Self {
        let mut inputs = Self::default();
        let Some(object) = value.as_object() else {
            return inputs;
        };

        for field in InputField::ALL {
            let raw = object
                .get(field.key())
                .or_else(|| object.get(field.camel_key()));
            inputs.set(field, raw.and_then(lenient_number));
        }
        inputs
    }
}

fn lenient_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_field_text(InputField::LaborCostManual, s).ok().flatten(),
        _ => None,
    }
}

/// Body of `POST /api/simulate`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub labor_cost_manual: f64,
    pub error_savings: f64,
    pub auto_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_cost: Option<f64>,
}

impl From<SimulationRequest> for SimulationInputs {
    fn from(request: SimulationRequest) -> Self {
        Self {
            labor_cost_manual: Some(request.labor_cost_manual),
            error_savings: Some(request.error_savings),
            auto_cost: Some(request.auto_cost),
            implementation_cost: request.implementation_cost,
        }
    }
}
