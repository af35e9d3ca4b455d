//! The single state record behind the simulator view

use crate::state_machine::{ActionKind, ActionStatuses};
use roi_core::{is_valid_email, InputField, ScenarioSummary, SimulationInputs, SimulationResult};
use std::path::PathBuf;

/// Everything the view renders
///
/// Owned by [`crate::SimulatorController`]; observers receive clones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulatorState {
    /// Typed form values
    pub inputs: SimulationInputs,
    /// Last applied simulation result
    pub result: Option<SimulationResult>,
    /// Current user-visible message; each new one replaces the last
    pub message: Option<String>,
    /// Last fetched scenario list
    pub scenarios: Vec<ScenarioSummary>,
    /// Name field of the save form
    pub scenario_name: String,
    /// Email field of the report form
    pub email: String,
    /// Per-kind action status
    pub actions: ActionStatuses,
    /// Where the last report was written
    pub last_download: Option<PathBuf>,
    /// Bumped on every input change; stale simulations compare against it
    pub(crate) simulation_generation: u64,
}

impl SimulatorState {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Required fields are usable
    #[inline]
    #[must_use]
    pub fn can_simulate(&self) -> bool {
        self.inputs.can_simulate()
    }

    /// Save control enabled
    #[must_use]
    pub fn can_save(&self) -> bool {
        !self.actions.is_pending(ActionKind::Save)
            && !self.scenario_name.trim().is_empty()
            && self.can_simulate()
    }

    /// Download control enabled
    #[must_use]
    pub fn can_download(&self) -> bool {
        !self.actions.is_pending(ActionKind::Report)
            && is_valid_email(&self.email)
            && self.can_simulate()
    }

    /// Required fields that currently block simulation
    pub fn missing_fields(&self) -> Vec<InputField> {
        InputField::REQUIRED
            .into_iter()
            .filter(|field| !self.inputs.is_field_usable(*field))
            .collect()
    }

    #[inline]
    #[must_use]
    pub fn is_pending(&self, kind: ActionKind) -> bool {
        self.actions.is_pending(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::ActionEvent;

    fn eligible() -> SimulatorState {
        SimulatorState {
            inputs: SimulationInputs::with_required(5000.0, 1500.0, 2000.0),
            ..SimulatorState::default()
        }
    }

    #[test]
    fn download_needs_email_and_inputs() {
        let mut state = eligible();
        state.email = "a@b.c".to_string();
        assert!(state.can_download());

        state.email = "abc".to_string();
        assert!(!state.can_download());

        let mut state = SimulatorState::new();
        state.email = "a@b.c".to_string();
        assert!(!state.can_download());
    }

    #[test]
    fn download_disabled_while_report_pending() {
        let mut state = eligible();
        state.email = "a@b.c".to_string();
        state.actions.apply(ActionKind::Report, ActionEvent::Start).unwrap();
        assert!(!state.can_download());

        // unrelated kinds do not block it
        state.actions.apply(ActionKind::Report, ActionEvent::Succeed).unwrap();
        state.actions.apply(ActionKind::Delete, ActionEvent::Start).unwrap();
        assert!(state.can_download());
    }

    #[test]
    fn save_needs_trimmed_name() {
        let mut state = eligible();
        state.scenario_name = "   ".to_string();
        assert!(!state.can_save());
        state.scenario_name = "Q3".to_string();
        assert!(state.can_save());
    }

    #[test]
    fn missing_fields_lists_unusable_required() {
        let mut state = SimulatorState::new();
        state.inputs.labor_cost_manual = Some(1.0);
        state.inputs.auto_cost = Some(-1.0);
        assert_eq!(
            state.missing_fields(),
            vec![InputField::ErrorSavings, InputField::AutoCost]
        );
    }
}
