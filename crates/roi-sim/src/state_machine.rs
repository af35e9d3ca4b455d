//! Per-action state machine
//!
//! Every user action (simulate, save, load, delete, report) follows
//! `Idle -> Pending -> Idle`, finishing with success or failure. Only
//! simulate can be superseded or cancelled while pending. An action never
//! overlaps itself, but different kinds are independent of each other.

use crate::error::StateMachineError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// User action tracked by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Simulate,
    Save,
    Load,
    Delete,
    Report,
}

impl ActionKind {
    pub const ALL: [ActionKind; 5] = [
        Self::Simulate,
        Self::Save,
        Self::Load,
        Self::Delete,
        Self::Report,
    ];

    /// Whether a pending action of this kind may be superseded or cancelled
    #[inline]
    #[must_use]
    pub fn is_cancellable(self) -> bool {
        matches!(self, Self::Simulate)
    }

    /// Message shown when the service gives none
    #[inline]
    #[must_use]
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::Simulate => "Simulation failed",
            Self::Save => "Failed to save scenario",
            Self::Load => "Failed to load scenario",
            Self::Delete => "Failed to delete scenario",
            Self::Report => "Failed to generate report",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Simulate => 0,
            Self::Save => 1,
            Self::Load => 2,
            Self::Delete => 3,
            Self::Report => 4,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Simulate => "simulate",
            Self::Save => "save",
            Self::Load => "load",
            Self::Delete => "delete",
            Self::Report => "report",
        };
        f.write_str(name)
    }
}

/// Whether an action is in flight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionState {
    #[default]
    Idle,
    Pending,
}

/// Input to [`transition`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionEvent {
    /// Action begins
    Start,
    /// A newer simulate replaces the pending one
    Supersede,
    /// Request succeeded
    Succeed,
    /// Request failed
    Fail,
    /// Pending simulate dropped without a replacement
    Cancel,
}

/// How the last completed action of a kind ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Succeeded,
    Failed(String),
    Cancelled,
}

/// Validate and apply a transition
pub fn transition(
    kind: ActionKind,
    from: ActionState,
    event: ActionEvent,
) -> Result<ActionState, StateMachineError> {
    use ActionEvent::*;
    use ActionState::*;

    match (from, event) {
        (Idle, Start) => Ok(Pending),
        (Pending, Start) => Err(StateMachineError::AlreadyPending(kind)),
        (Pending, Supersede) if kind.is_cancellable() => Ok(Pending),
        (Pending, Succeed | Fail) => Ok(Idle),
        (Pending, Cancel) if kind.is_cancellable() => Ok(Idle),
        _ => Err(StateMachineError::IllegalTransition { kind, from, event }),
    }
}

/// Events accepted from `from`
pub fn allowed_events(kind: ActionKind, from: ActionState) -> Vec<ActionEvent> {
    use ActionEvent::*;
    match from {
        ActionState::Idle => vec![Start],
        ActionState::Pending if kind.is_cancellable() => vec![Supersede, Succeed, Fail, Cancel],
        ActionState::Pending => vec![Succeed, Fail],
    }
}

/// Status of one action kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionStatus {
    pub state: ActionState,
    pub last_outcome: Option<ActionOutcome>,
}

/// Status of every action kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionStatuses {
    slots: [ActionStatus; 5],
}

impl ActionStatuses {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, kind: ActionKind) -> &ActionStatus {
        &self.slots[kind.index()]
    }

    #[inline]
    #[must_use]
    pub fn is_pending(&self, kind: ActionKind) -> bool {
        self.get(kind).state == ActionState::Pending
    }

    /// Kinds currently pending
    pub fn pending(&self) -> Vec<ActionKind> {
        ActionKind::ALL
            .into_iter()
            .filter(|kind| self.is_pending(*kind))
            .collect()
    }

    /// Apply `event` to `kind`, recording the outcome when the action settles
    pub fn apply(&mut self, kind: ActionKind, event: ActionEvent) -> Result<(), StateMachineError> {
        self.apply_with(kind, event, None)
    }

    /// Record a failure with its message
    pub fn fail(&mut self, kind: ActionKind, message: impl Into<String>) -> Result<(), StateMachineError> {
        self.apply_with(kind, ActionEvent::Fail, Some(message.into()))
    }

    fn apply_with(
        &mut self,
        kind: ActionKind,
        event: ActionEvent,
        message: Option<String>,
    ) -> Result<(), StateMachineError> {
        let slot = &mut self.slots[kind.index()];
        slot.state = transition(kind, slot.state, event)?;
        match event {
            ActionEvent::Succeed => slot.last_outcome = Some(ActionOutcome::Succeeded),
            ActionEvent::Fail => {
                slot.last_outcome = Some(ActionOutcome::Failed(message.unwrap_or_else(|| {
                    kind.fallback_message().to_string()
                })));
            }
            ActionEvent::Cancel => slot.last_outcome = Some(ActionOutcome::Cancelled),
            ActionEvent::Start | ActionEvent::Supersede => {}
        }
        Ok(())
    }
}
