//! Local validation errors
//!
//! Every variant blocks an action before any network call is made.

use crate::inputs::InputField;

/// Input rejected on the client side
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Field text could not be read as a number
    #[error("{field} must be a number, got '{text}'")]
    NotANumber { field: InputField, text: String },

    /// A required field is absent, negative or non-finite
    #[error("{0} is required and must be a non-negative number")]
    MissingRequired(InputField),

    /// Scenario name is empty after trimming
    #[error("scenario name is required")]
    EmptyScenarioName,

    /// Email does not match the accepted pattern
    #[error("invalid email address: '{0}'")]
    InvalidEmail(String),
}

impl ValidationError {
    /// Field this error refers to, if any
    #[must_use]
    pub fn field(&self) -> Option<InputField> {
        match self {
            Self::NotANumber { field, .. } => Some(*field),
            Self::MissingRequired(field) => Some(*field),
            Self::EmptyScenarioName | Self::InvalidEmail(_) => None,
        }
    }
}
