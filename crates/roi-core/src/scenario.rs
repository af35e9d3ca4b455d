//! Named scenarios owned by the remote service
//!
//! The client only holds re-fetchable copies. A scenario is created by a
//! save, listed by a refresh and destroyed by a delete; loading one replaces
//! the whole form.

use crate::error::ValidationError;
use crate::inputs::{SimulationInputs, SimulationRequest};
use crate::result::SimulationResult;
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Server-assigned scenario identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioId(pub i64);

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for ScenarioId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Parse a server timestamp
///
/// The backend emits naive ISO-8601 (`2024-05-01T10:00:00.123456`); RFC 3339
/// with an offset is accepted too and normalized to UTC.
#[must_use]
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

/// Entry of `GET /api/scenarios`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub id: ScenarioId,
    #[serde(alias = "scenarioName")]
    pub scenario_name: String,
    #[serde(default, alias = "createdAt")]
    pub created_at: String,
}

impl ScenarioSummary {
    /// Creation time, if the server sent a readable one
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.created_at)
    }
}

/// Success body of `GET /api/scenarios`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioList {
    #[serde(default)]
    pub scenarios: Vec<ScenarioSummary>,
}

/// Full scenario as returned by `GET /api/scenarios/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDetail {
    pub id: ScenarioId,
    #[serde(default, alias = "scenarioName")]
    pub scenario_name: String,
    #[serde(default, alias = "createdAt")]
    pub created_at: String,
    /// Serialized inputs; normally a JSON string, tolerated as an object
    #[serde(default, alias = "inputsJson", alias = "inputs")]
    pub inputs_json: Value,
    /// Serialized results captured at save time
    #[serde(default, alias = "resultsJson", alias = "results")]
    pub results_json: Value,
}

impl ScenarioDetail {
    /// Decoded form values; never fails
    #[must_use]
    pub fn inputs(&self) -> SimulationInputs {
        match &self.inputs_json {
            Value::String(text) => SimulationInputs::from_stored_json(text),
            other => SimulationInputs::from_stored_value(other),
        }
    }

    /// Decoded saved results, absent when missing or malformed
    #[must_use]
    pub fn results(&self) -> Option<SimulationResult> {
        match &self.results_json {
            Value::String(text) => SimulationResult::from_stored_json(text),
            Value::Null => None,
            other => serde_json::from_value(other.clone()).ok(),
        }
    }

    /// Creation time, if readable
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.created_at)
    }
}

/// Detail body, bare or wrapped in `{"scenario": ...}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScenarioDetailBody {
    Wrapped { scenario: ScenarioDetail },
    Bare(ScenarioDetail),
}

impl ScenarioDetailBody {
    /// Unwrap the detail
    #[inline]
    #[must_use]
    pub fn into_detail(self) -> ScenarioDetail {
        match self {
            Self::Wrapped { scenario } | Self::Bare(scenario) => scenario,
        }
    }
}

/// Body of `POST /api/scenarios`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewScenario {
    pub scenario_name: String,
    #[serde(flatten)]
    pub inputs: SimulationRequest,
}

impl NewScenario {
    /// Validate the name and inputs
    ///
    /// The name is trimmed and must be non-empty; the inputs must be
    /// simulation-eligible.
    pub fn new(name: &str, inputs: &SimulationInputs) -> Result<Self, ValidationError> {
        let scenario_name = name.trim();
        if scenario_name.is_empty() {
            return Err(ValidationError::EmptyScenarioName);
        }
        Ok(Self {
            scenario_name: scenario_name.to_string(),
            inputs: inputs.to_request()?,
        })
    }
}
