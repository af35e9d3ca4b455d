//! ROI Sim - headless controller for the ROI simulator
//!
//! Provides:
//! - A single observable state record ([`SimulatorState`])
//! - Debounced, cancellable simulation on every input change
//! - Scenario list/save/load/delete against the remote service
//! - Report download to a local directory
//! - Per-action status tracking instead of a global busy flag
//!
//! # Example
//!
//! ```rust,ignore
//! use roi_core::InputField;
//! use roi_sim::{SimulatorConfig, SimulatorController};
//!
//! # async fn example() -> Result<(), roi_sim::SimulatorError> {
//! let controller = SimulatorController::from_config(SimulatorConfig::new())?;
//! controller.mount().await;
//!
//! controller.set_field_text(InputField::LaborCostManual, "5000")?;
//! controller.set_field_text(InputField::ErrorSavings, "1500")?;
//! controller.set_field_text(InputField::AutoCost, "2000")?;
//!
//! let state = controller.wait_for_simulation().await;
//! println!("{}", roi_sim::view::render(&state));
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod controller;
pub mod debounce;
pub mod download;
pub mod error;
pub mod state;
pub mod state_machine;
pub mod view;

pub use config::{SimulatorConfig, DEFAULT_DEBOUNCE_MS};
pub use controller::SimulatorController;
pub use debounce::{Debouncer, TimerHandle};
pub use error::{ConfigError, SimulatorError, StateMachineError};
pub use state::SimulatorState;
pub use state_machine::{
    allowed_events, transition, ActionEvent, ActionKind, ActionOutcome, ActionState,
    ActionStatus, ActionStatuses,
};
