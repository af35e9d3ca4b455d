//! ROI Client - access to the ROI simulation service
//!
//! [`SimulatorApi`] is the seam between the controller and the network;
//! [`HttpSimulatorApi`] implements it over reqwest.
//!
//! # Example
//!
//! ```rust,ignore
//! use roi_client::{ClientConfig, HttpSimulatorApi, SimulatorApi};
//! use roi_core::SimulationInputs;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = HttpSimulatorApi::new(&ClientConfig::new().with_base_url("http://localhost:5000"))?;
//! let inputs = SimulationInputs::with_required(5000.0, 1500.0, 2000.0);
//! let result = api.simulate(&inputs.to_request()?).await?;
//! println!("monthly savings: {:?}", result.monthly_savings);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod http;

pub use api::{HealthStatus, ReportFile, SimulatorApi};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ApiError, ErrorBody};
pub use http::HttpSimulatorApi;
