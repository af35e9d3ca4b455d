//! Simulation output as returned by the compute endpoint

use serde::{Deserialize, Serialize};

/// ROI figures computed server-side
///
/// Opaque to the client apart from presentation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    #[serde(default, alias = "monthlySavings")]
    pub monthly_savings: Option<f64>,
    #[serde(default, alias = "paybackMonths")]
    pub payback_months: Option<f64>,
    #[serde(default, alias = "roiPercentage")]
    pub roi_percentage: Option<f64>,
    #[serde(alias = "boostFactor")]
    pub boost_factor: f64,
}

impl SimulationResult {
    /// Decode a stored `results_json` blob, absent when malformed
    #[must_use]
    pub fn from_stored_json(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }
}

/// Success body of `POST /api/simulate`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub results: SimulationResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_nulls_as_absent() {
        let result: SimulationResult = serde_json::from_str(
            r#"{"monthly_savings": 4950.0, "payback_months": null, "roi_percentage": null, "boost_factor": 1.1}"#,
        )
        .unwrap();
        assert_eq!(result.monthly_savings, Some(4950.0));
        assert_eq!(result.payback_months, None);
        assert_eq!(result.roi_percentage, None);
        assert_eq!(result.boost_factor, 1.1);
    }

    #[test]
    fn accepts_camel_case_keys() {
        let result: SimulationResult =
            serde_json::from_str(r#"{"monthlySavings": 10, "paybackMonths": 2, "boostFactor": 1.1}"#)
                .unwrap();
        assert_eq!(result.monthly_savings, Some(10.0));
        assert_eq!(result.payback_months, Some(2.0));
        assert_eq!(result.roi_percentage, None);
    }

    #[test]
    fn boost_factor_is_required() {
        assert!(serde_json::from_str::<SimulationResult>(r#"{"monthly_savings": 1}"#).is_err());
        assert!(SimulationResult::from_stored_json("{}").is_none());
    }
}
