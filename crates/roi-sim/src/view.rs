//! Text rendering of a state snapshot

use crate::state::SimulatorState;
use roi_core::ScenarioSummary;
use std::fmt::Write;

const ABSENT: &str = "—";

/// Group the integer part with commas and keep up to two decimals
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = (value.abs() * 100.0).round() / 100.0;
    let fixed = format!("{rounded:.2}");
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((&fixed, ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let frac = frac_part.trim_end_matches('0');
    let sign = if value < 0.0 && rounded > 0.0 { "-" } else { "" };
    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| ABSENT.to_string(), |v| v.to_string())
}

/// Results panel
pub fn render(state: &SimulatorState) -> String {
    let mut out = String::from("Results\n");

    if !state.can_simulate() {
        out.push_str("Enter values to see results.\n");
    }
    if let Some(message) = &state.message {
        let _ = writeln!(out, "! {message}");
    }
    if let Some(result) = &state.result {
        let savings = result
            .monthly_savings
            .map_or_else(|| ABSENT.to_string(), |v| format!("${}", format_amount(v)));
        let _ = writeln!(out, "  Monthly savings:  {savings}");
        let _ = writeln!(out, "  Payback (months): {}", optional(result.payback_months));
        let _ = writeln!(out, "  ROI (%):          {}", optional(result.roi_percentage));
        let _ = writeln!(out, "  Includes boost factor {}", result.boost_factor);
    }
    out
}

/// Scenario list
pub fn render_scenarios(scenarios: &[ScenarioSummary]) -> String {
    if scenarios.is_empty() {
        return "No saved scenarios.\n".to_string();
    }

    let mut out = String::new();
    for scenario in scenarios {
        let created = scenario
            .created_at()
            .map_or_else(|| scenario.created_at.clone(), |ts| ts.format("%Y-%m-%d %H:%M").to_string());
        let _ = writeln!(out, "{:>5}  {:<30}  {}", scenario.id, scenario.scenario_name, created);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use roi_core::{ScenarioId, SimulationInputs, SimulationResult};

    #[test]
    fn amounts() {
        assert_eq!(format_amount(4950.0), "4,950");
        assert_eq!(format_amount(1234567.891), "1,234,567.89");
        assert_eq!(format_amount(999.5), "999.5");
        assert_eq!(format_amount(-2200.0), "-2,200");
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(-0.001), "0");
    }

    #[test]
    fn hint_when_not_eligible() {
        let text = render(&SimulatorState::new());
        assert!(text.contains("Enter values to see results."));
    }

    #[test]
    fn renders_results_with_absent_values() {
        let state = SimulatorState {
            inputs: SimulationInputs::with_required(5000.0, 1500.0, 2000.0),
            result: Some(SimulationResult {
                monthly_savings: Some(4950.0),
                payback_months: None,
                roi_percentage: Some(12.5),
                boost_factor: 1.1,
            }),
            ..SimulatorState::default()
        };
        let text = render(&state);
        assert!(text.contains("$4,950"));
        assert!(text.contains("Payback (months): —"));
        assert!(text.contains("ROI (%):          12.5"));
        assert!(text.contains("boost factor 1.1"));
        assert!(!text.contains("Enter values"));
    }

    #[test]
    fn renders_message() {
        let state = SimulatorState {
            message: Some("Simulation failed".to_string()),
            ..SimulatorState::default()
        };
        assert!(render(&state).contains("! Simulation failed"));
    }

    #[test]
    fn scenario_rows() {
        let rows = render_scenarios(&[ScenarioSummary {
            id: ScenarioId(12),
            scenario_name: "Baseline".to_string(),
            created_at: "2024-05-01T10:00:00.5".to_string(),
        }]);
        assert!(rows.contains("12"));
        assert!(rows.contains("Baseline"));
        assert!(rows.contains("2024-05-01 10:00"));
        assert_eq!(render_scenarios(&[]), "No saved scenarios.\n");
    }
}
