//! Service interface
//!
//! The controller talks to the backend only through [`SimulatorApi`], so the
//! HTTP implementation can be swapped for an in-memory one in tests.

use crate::error::ApiError;
use async_trait::async_trait;
use roi_core::{
    NewScenario, ReportRequest, ScenarioDetail, ScenarioId, ScenarioSummary, SimulationRequest,
    SimulationResult,
};
use serde::{Deserialize, Serialize};

/// Generated report as received from the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    /// Raw `Content-Disposition` header, if sent
    pub content_disposition: Option<String>,
    /// Raw `Content-Type` header, if sent
    pub content_type: Option<String>,
    /// File body
    pub bytes: Vec<u8>,
}

impl ReportFile {
    /// Report body with no headers
    #[inline]
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            content_disposition: None,
            content_type: None,
            bytes: bytes.into(),
        }
    }

    /// With `Content-Disposition`
    #[inline]
    #[must_use]
    pub fn with_content_disposition(mut self, value: impl Into<String>) -> Self {
        self.content_disposition = Some(value.into());
        self
    }
}

/// Body of `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    /// Service reported `ok`
    #[inline]
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// Operations offered by the ROI simulation service
#[async_trait]
pub trait SimulatorApi: Send + Sync {
    /// `POST /api/simulate`
    async fn simulate(&self, request: &SimulationRequest) -> Result<SimulationResult, ApiError>;

    /// `GET /api/scenarios`
    async fn list_scenarios(&self) -> Result<Vec<ScenarioSummary>, ApiError>;

    /// `POST /api/scenarios`
    async fn save_scenario(&self, scenario: &NewScenario) -> Result<(), ApiError>;

    /// `GET /api/scenarios/{id}`
    async fn get_scenario(&self, id: ScenarioId) -> Result<ScenarioDetail, ApiError>;

    /// `DELETE /api/scenarios/{id}`
    async fn delete_scenario(&self, id: ScenarioId) -> Result<(), ApiError>;

    /// `POST /api/report/generate`
    async fn generate_report(&self, request: &ReportRequest) -> Result<ReportFile, ApiError>;

    /// `GET /api/health`
    async fn health(&self) -> Result<HealthStatus, ApiError>;
}
