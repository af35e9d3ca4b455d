//! Testing utilities for the ROI simulator workspace
//!
//! Shared fixtures and an in-memory [`SimulatorApi`] that records every call.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use roi_client::{ApiError, HealthStatus, ReportFile, SimulatorApi};
use roi_core::{
    NewScenario, ReportRequest, ScenarioDetail, ScenarioId, ScenarioSummary, SimulationInputs,
    SimulationRequest, SimulationResult,
};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

pub const BOOST_FACTOR: f64 = 1.1;

/// Eligible inputs: 5000 labor, 1500 error savings, 2000 automation
pub fn sample_inputs() -> SimulationInputs {
    SimulationInputs::with_required(5000.0, 1500.0, 2000.0)
}

/// Round half away from zero to cents
fn cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The service's arithmetic, so fake results look like real ones
pub fn expected_result(request: &SimulationRequest) -> SimulationResult {
    let monthly = (request.labor_cost_manual + request.error_savings - request.auto_cost) * BOOST_FACTOR;

    let (payback, roi) = match request.implementation_cost {
        Some(cost) if monthly > 0.0 => {
            let roi = (cost > 0.0).then(|| ((monthly * 12.0) - cost) / cost * 100.0);
            (Some(cost / monthly), roi)
        }
        _ => (None, None),
    };

    SimulationResult {
        monthly_savings: Some(cents(monthly)),
        payback_months: payback.map(cents),
        roi_percentage: roi.map(cents),
        boost_factor: BOOST_FACTOR,
    }
}

/// Service operation, used to inject failures and latency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Simulate,
    ListScenarios,
    SaveScenario,
    GetScenario,
    DeleteScenario,
    GenerateReport,
    Health,
}

/// One recorded request
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Simulate(SimulationRequest),
    ListScenarios,
    SaveScenario(NewScenario),
    GetScenario(ScenarioId),
    DeleteScenario(ScenarioId),
    GenerateReport(ReportRequest),
    Health,
}

impl ApiCall {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Simulate(_) => Endpoint::Simulate,
            Self::ListScenarios => Endpoint::ListScenarios,
            Self::SaveScenario(_) => Endpoint::SaveScenario,
            Self::GetScenario(_) => Endpoint::GetScenario,
            Self::DeleteScenario(_) => Endpoint::DeleteScenario,
            Self::GenerateReport(_) => Endpoint::GenerateReport,
            Self::Health => Endpoint::Health,
        }
    }
}

#[derive(Debug, Clone)]
struct StoredScenario {
    name: String,
    inputs_json: String,
    created_at: String,
}

#[derive(Debug)]
struct FakeState {
    calls: Vec<ApiCall>,
    scenarios: BTreeMap<ScenarioId, StoredScenario>,
    next_id: i64,
    failures: HashMap<Endpoint, ApiError>,
    latency: HashMap<Endpoint, Duration>,
    report: ReportFile,
}

/// In-memory ROI service
///
/// Requests are recorded before any injected latency, so a request that is
/// aborted mid-flight still shows up in [`FakeSimulatorApi::calls`].
#[derive(Debug)]
pub struct FakeSimulatorApi {
    state: Mutex<FakeState>,
}

impl Default for FakeSimulatorApi {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeSimulatorApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                calls: Vec::new(),
                scenarios: BTreeMap::new(),
                next_id: 1,
                failures: HashMap::new(),
                latency: HashMap::new(),
                report: ReportFile::new(b"%PDF-1.4 roi".to_vec())
                    .with_content_disposition(r#"attachment; filename="roi_summary.pdf""#),
            }),
        }
    }

    /// Store a scenario with a raw serialized-inputs blob
    pub fn insert_scenario(&self, name: &str, inputs_json: &str) -> ScenarioId {
        let mut state = self.state.lock();
        let id = ScenarioId(state.next_id);
        state.next_id += 1;
        state.scenarios.insert(
            id,
            StoredScenario {
                name: name.to_string(),
                inputs_json: inputs_json.to_string(),
                created_at: format!("2024-05-01T10:00:{:02}", id.0 % 60),
            },
        );
        id
    }

    /// Make every call to `endpoint` fail with `error`
    pub fn fail(&self, endpoint: Endpoint, error: ApiError) {
        self.state.lock().failures.insert(endpoint, error);
    }

    /// Fail `endpoint` with a status and server message
    pub fn fail_with_status(&self, endpoint: Endpoint, status: u16, message: Option<&str>) {
        self.fail(
            endpoint,
            ApiError::Status {
                status,
                message: message.map(str::to_string),
            },
        );
    }

    pub fn clear_failure(&self, endpoint: Endpoint) {
        self.state.lock().failures.remove(&endpoint);
    }

    /// Delay every call to `endpoint`
    pub fn set_latency(&self, endpoint: Endpoint, latency: Duration) {
        self.state.lock().latency.insert(endpoint, latency);
    }

    pub fn set_report(&self, report: ReportFile) {
        self.state.lock().report = report;
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().calls.clone()
    }

    pub fn count(&self, endpoint: Endpoint) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| call.endpoint() == endpoint)
            .count()
    }

    /// Simulation requests in the order they were issued
    pub fn simulate_requests(&self) -> Vec<SimulationRequest> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                ApiCall::Simulate(request) => Some(*request),
                _ => None,
            })
            .collect()
    }

    pub fn scenario_count(&self) -> usize {
        self.state.lock().scenarios.len()
    }

    async fn enter(&self, call: ApiCall) -> Result<(), ApiError> {
        let endpoint = call.endpoint();
        let (latency, failure) = {
            let mut state = self.state.lock();
            state.calls.push(call);
            (
                state.latency.get(&endpoint).copied(),
                state.failures.get(&endpoint).cloned(),
            )
        };

        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        failure.map_or(Ok(()), Err)
    }
}

#[async_trait]
impl SimulatorApi for FakeSimulatorApi {
    async fn simulate(&self, request: &SimulationRequest) -> Result<SimulationResult, ApiError> {
        self.enter(ApiCall::Simulate(*request)).await?;
        Ok(expected_result(request))
    }

    async fn list_scenarios(&self) -> Result<Vec<ScenarioSummary>, ApiError> {
        self.enter(ApiCall::ListScenarios).await?;
        let state = self.state.lock();
        Ok(state
            .scenarios
            .iter()
            .map(|(id, stored)| ScenarioSummary {
                id: *id,
                scenario_name: stored.name.clone(),
                created_at: stored.created_at.clone(),
            })
            .collect())
    }

    async fn save_scenario(&self, scenario: &NewScenario) -> Result<(), ApiError> {
        self.enter(ApiCall::SaveScenario(scenario.clone())).await?;
        let inputs_json = serde_json::to_string(&scenario.inputs)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        self.insert_scenario(&scenario.scenario_name, &inputs_json);
        Ok(())
    }

    async fn get_scenario(&self, id: ScenarioId) -> Result<ScenarioDetail, ApiError> {
        self.enter(ApiCall::GetScenario(id)).await?;
        let state = self.state.lock();
        let stored = state.scenarios.get(&id).ok_or_else(|| ApiError::Status {
            status: 404,
            message: Some("Scenario not found".to_string()),
        })?;
        Ok(ScenarioDetail {
            id,
            scenario_name: stored.name.clone(),
            created_at: stored.created_at.clone(),
            inputs_json: serde_json::Value::String(stored.inputs_json.clone()),
            results_json: serde_json::Value::Null,
        })
    }

    async fn delete_scenario(&self, id: ScenarioId) -> Result<(), ApiError> {
        self.enter(ApiCall::DeleteScenario(id)).await?;
        match self.state.lock().scenarios.remove(&id) {
            Some(_) => Ok(()),
            None => Err(ApiError::Status {
                status: 404,
                message: None,
            }),
        }
    }

    async fn generate_report(&self, request: &ReportRequest) -> Result<ReportFile, ApiError> {
        self.enter(ApiCall::GenerateReport(request.clone())).await?;
        Ok(self.state.lock().report.clone())
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.enter(ApiCall::Health).await?;
        Ok(HealthStatus {
            status: "ok".to_string(),
        })
    }
}
