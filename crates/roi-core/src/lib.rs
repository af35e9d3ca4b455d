//! ROI Core - data model for the ROI simulator client
//!
//! Provides:
//! - Typed form inputs with "absent" distinct from zero
//! - Usability and eligibility rules for simulation
//! - Wire payloads for simulate, scenario and report requests
//! - Lenient decoding of stored scenario payloads
//! - Email shape check and `Content-Disposition` filename extraction
//!
//! # Example
//!
//! ```rust
//! use roi_core::{InputField, SimulationInputs};
//!
//! let mut inputs = SimulationInputs::new();
//! inputs.set_from_text(InputField::LaborCostManual, "5000").unwrap();
//! inputs.set_from_text(InputField::ErrorSavings, "1500").unwrap();
//! assert!(!inputs.can_simulate());
//!
//! inputs.set_from_text(InputField::AutoCost, "2000").unwrap();
//! assert!(inputs.can_simulate());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod inputs;
pub mod report;
pub mod result;
pub mod scenario;

pub use error::ValidationError;
pub use inputs::{is_usable, parse_field_text, InputField, SimulationInputs, SimulationRequest, UnknownField};
pub use report::{
    filename_from_content_disposition, is_valid_email, report_filename, ReportRequest,
    DEFAULT_REPORT_FILENAME,
};
pub use result::{SimulationResponse, SimulationResult};
pub use scenario::{
    parse_timestamp, NewScenario, ScenarioDetail, ScenarioDetailBody, ScenarioId, ScenarioList,
    ScenarioSummary,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
