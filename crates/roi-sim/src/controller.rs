//! Simulator controller
//!
//! Owns the [`SimulatorState`] record and is the only place it changes:
//! - input edits (which drive the debounced simulation)
//! - scenario list/save/load/delete
//! - report download
//!
//! Every change is published as a snapshot on a `watch` channel.
//!
//! Simulation results are applied only if no input change happened since the
//! request was scheduled. Superseded requests are aborted through the
//! debouncer, and the generation check under the state lock covers a request
//! that completed just before its abort took effect.

use crate::config::SimulatorConfig;
use crate::debounce::Debouncer;
use crate::download;
use crate::error::{SimulatorError, StateMachineError};
use crate::state::SimulatorState;
use crate::state_machine::{ActionEvent, ActionKind};
use parking_lot::Mutex;
use roi_client::{ApiError, HttpSimulatorApi, SimulatorApi};
use roi_core::{
    report_filename, InputField, NewScenario, ReportRequest, ScenarioId, SimulationInputs,
    SimulationRequest, ValidationError,
};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

/// Headless simulator view
///
/// Cheap to clone; clones share state. Input changes schedule work on the
/// current tokio runtime, so they must be made from within one.
#[derive(Clone)]
pub struct SimulatorController {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn SimulatorApi>,
    config: SimulatorConfig,
    state: Mutex<SimulatorState>,
    debouncer: Debouncer,
    updates: watch::Sender<SimulatorState>,
}

impl Inner {
    fn publish(&self, state: &SimulatorState) {
        self.updates.send_replace(state.clone());
    }

    /// Show a local validation failure
    fn reject(&self, state: &mut SimulatorState, err: ValidationError) -> SimulatorError {
        state.message = Some(err.to_string());
        self.publish(state);
        SimulatorError::Validation(err)
    }

    /// Settle `kind` as succeeded
    fn succeed(&self, state: &mut SimulatorState, kind: ActionKind) {
        apply_logged(state, kind, ActionEvent::Succeed);
    }

    /// Settle `kind` as failed and show the message
    fn fail(&self, kind: ActionKind, source: ApiError) -> SimulatorError {
        let err = SimulatorError::request(source, kind.fallback_message());
        let message = err.to_string();
        tracing::warn!(%kind, "{}", message);

        let mut state = self.state.lock();
        if let Err(e) = state.actions.fail(kind, message.clone()) {
            tracing::error!(%kind, "action state out of sync: {}", e);
        }
        state.message = Some(message);
        self.publish(&state);
        err
    }
}

fn apply_logged(state: &mut SimulatorState, kind: ActionKind, event: ActionEvent) {
    if let Err(e) = state.actions.apply(kind, event) {
        tracing::error!(%kind, "action state out of sync: {}", e);
    }
}

/// Mark `kind` pending, rejecting overlap with itself
fn start(state: &mut SimulatorState, kind: ActionKind) -> Result<(), SimulatorError> {
    state
        .actions
        .apply(kind, ActionEvent::Start)
        .map_err(|e| match e {
            StateMachineError::AlreadyPending(kind) => SimulatorError::Busy(kind),
            other => other.into(),
        })
}

impl SimulatorController {
    /// Create a controller over any service implementation
    #[must_use]
    pub fn new(api: Arc<dyn SimulatorApi>, config: SimulatorConfig) -> Self {
        let state = SimulatorState::new();
        let (updates, _) = watch::channel(state.clone());
        Self {
            inner: Arc::new(Inner {
                api,
                debouncer: Debouncer::new(config.debounce()),
                config,
                state: Mutex::new(state),
                updates,
            }),
        }
    }

    /// Create a controller talking HTTP to `config.client.base_url`
    ///
    /// # Errors
    /// - `SimulatorError::Config` if the configuration is invalid
    /// - `SimulatorError::Client` if the HTTP client cannot be built
    pub fn from_config(config: SimulatorConfig) -> Result<Self, SimulatorError> {
        config.validate()?;
        let api = HttpSimulatorApi::new(&config.client).map_err(SimulatorError::Client)?;
        Ok(Self::new(Arc::new(api), config))
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &SimulatorConfig {
        &self.inner.config
    }

    /// Service this controller talks to
    #[inline]
    #[must_use]
    pub fn api(&self) -> Arc<dyn SimulatorApi> {
        Arc::clone(&self.inner.api)
    }

    /// Current state
    #[must_use]
    pub fn snapshot(&self) -> SimulatorState {
        self.inner.state.lock().clone()
    }

    /// Receive a snapshot after every change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SimulatorState> {
        self.inner.updates.subscribe()
    }

    // ------------------------------------------------------------------
    // Input capture
    // ------------------------------------------------------------------

    /// Apply raw field text
    ///
    /// Empty text clears the field. Non-numeric text is rejected and the
    /// form is left as it was.
    pub fn set_field_text(&self, field: InputField, text: &str) -> Result<(), SimulatorError> {
        let value = roi_core::parse_field_text(field, text)?;
        self.set_field(field, value);
        Ok(())
    }

    /// Set one typed field
    pub fn set_field(&self, field: InputField, value: Option<f64>) {
        let mut state = self.inner.state.lock();
        state.inputs.set(field, value);
        Self::inputs_changed(&self.inner, &mut state);
        self.inner.publish(&state);
    }

    /// Replace the whole form
    pub fn set_inputs(&self, inputs: SimulationInputs) {
        let mut state = self.inner.state.lock();
        state.inputs = inputs;
        Self::inputs_changed(&self.inner, &mut state);
        self.inner.publish(&state);
    }

    pub fn set_scenario_name(&self, name: impl Into<String>) {
        let mut state = self.inner.state.lock();
        state.scenario_name = name.into();
        self.inner.publish(&state);
    }

    pub fn set_email(&self, email: impl Into<String>) {
        let mut state = self.inner.state.lock();
        state.email = email.into();
        self.inner.publish(&state);
    }

    /// Save control enabled
    #[must_use]
    pub fn can_save(&self) -> bool {
        self.inner.state.lock().can_save()
    }

    /// Download control enabled
    #[must_use]
    pub fn can_download(&self) -> bool {
        self.inner.state.lock().can_download()
    }

    // ------------------------------------------------------------------
    // Debounced simulation
    // ------------------------------------------------------------------

    fn inputs_changed(inner: &Arc<Inner>, state: &mut SimulatorState) {
        state.simulation_generation += 1;
        let generation = state.simulation_generation;
        let pending = state.is_pending(ActionKind::Simulate);

        match state.inputs.to_request() {
            Ok(request) => {
                let event = if pending {
                    ActionEvent::Supersede
                } else {
                    ActionEvent::Start
                };
                apply_logged(state, ActionKind::Simulate, event);

                let task_inner = Arc::clone(inner);
                inner.debouncer.schedule(async move {
                    Self::run_simulation(task_inner, generation, request).await;
                });
                tracing::debug!(generation, "simulation scheduled");
            }
            Err(_) => {
                inner.debouncer.cancel();
                if pending {
                    apply_logged(state, ActionKind::Simulate, ActionEvent::Cancel);
                }
                state.result = None;
            }
        }
    }

    async fn run_simulation(inner: Arc<Inner>, generation: u64, request: SimulationRequest) {
        {
            let mut state = inner.state.lock();
            if state.simulation_generation != generation {
                return;
            }
            state.message = None;
            inner.publish(&state);
        }

        tracing::debug!(generation, "simulation request sent");
        let outcome = inner.api.simulate(&request).await;

        let mut state = inner.state.lock();
        if state.simulation_generation != generation {
            tracing::debug!(generation, "stale simulation result dropped");
            return;
        }
        match outcome {
            Ok(result) => {
                state.result = Some(result);
                inner.succeed(&mut state, ActionKind::Simulate);
            }
            Err(source) => {
                let message = source.user_message(ActionKind::Simulate.fallback_message());
                tracing::warn!(generation, "simulation failed: {}", source);
                state.result = None;
                state.message = Some(message.clone());
                if let Err(e) = state.actions.fail(ActionKind::Simulate, message) {
                    tracing::error!("action state out of sync: {}", e);
                }
            }
        }
        inner.publish(&state);
    }

    /// Wait until no simulation is scheduled or in flight
    pub async fn wait_for_simulation(&self) -> SimulatorState {
        let mut updates = self.subscribe();
        loop {
            {
                let state = updates.borrow_and_update();
                if !state.is_pending(ActionKind::Simulate) {
                    return state.clone();
                }
            }
            if updates.changed().await.is_err() {
                return self.snapshot();
            }
        }
    }

    // ------------------------------------------------------------------
    // Scenario directory
    // ------------------------------------------------------------------

    /// Initial load of the scenario list
    pub async fn mount(&self) {
        self.refresh_scenarios().await;
    }

    /// Best-effort list refresh; on failure the list is kept as it was
    pub async fn refresh_scenarios(&self) -> bool {
        match self.inner.api.list_scenarios().await {
            Ok(scenarios) => {
                tracing::debug!(count = scenarios.len(), "scenario list refreshed");
                let mut state = self.inner.state.lock();
                state.scenarios = scenarios;
                self.inner.publish(&state);
                true
            }
            Err(e) => {
                tracing::warn!("scenario list refresh failed: {}", e);
                false
            }
        }
    }

    /// Save the current inputs under the current scenario name
    ///
    /// # Errors
    /// - `SimulatorError::Busy` if a save is already pending
    /// - `SimulatorError::Validation` for a blank name or ineligible inputs
    /// - `SimulatorError::Request` if the service rejects the save
    pub async fn save_scenario(&self) -> Result<(), SimulatorError> {
        let scenario = {
            let mut state = self.inner.state.lock();
            if state.is_pending(ActionKind::Save) {
                return Err(SimulatorError::Busy(ActionKind::Save));
            }
            let scenario = match NewScenario::new(&state.scenario_name, &state.inputs) {
                Ok(scenario) => scenario,
                Err(err) => return Err(self.inner.reject(&mut state, err)),
            };
            start(&mut state, ActionKind::Save)?;
            self.inner.publish(&state);
            scenario
        };

        match self.inner.api.save_scenario(&scenario).await {
            Ok(()) => {
                {
                    let mut state = self.inner.state.lock();
                    state.scenario_name.clear();
                    self.inner.succeed(&mut state, ActionKind::Save);
                    self.inner.publish(&state);
                }
                tracing::info!(name = %scenario.scenario_name, "scenario saved");
                self.refresh_scenarios().await;
                Ok(())
            }
            Err(source) => Err(self.inner.fail(ActionKind::Save, source)),
        }
    }

    /// Replace the form with a stored scenario
    ///
    /// A malformed stored payload loads as absent fields rather than failing.
    pub async fn load_scenario(&self, id: ScenarioId) -> Result<SimulationInputs, SimulatorError> {
        {
            let mut state = self.inner.state.lock();
            start(&mut state, ActionKind::Load)?;
            self.inner.publish(&state);
        }

        match self.inner.api.get_scenario(id).await {
            Ok(detail) => {
                let inputs = detail.inputs();
                let mut state = self.inner.state.lock();
                self.inner.succeed(&mut state, ActionKind::Load);
                state.inputs = inputs;
                Self::inputs_changed(&self.inner, &mut state);
                self.inner.publish(&state);
                tracing::info!(%id, name = %detail.scenario_name, "scenario loaded");
                Ok(inputs)
            }
            Err(source) => Err(self.inner.fail(ActionKind::Load, source)),
        }
    }

    /// Delete a scenario, refreshing the list only on success
    pub async fn delete_scenario(&self, id: ScenarioId) -> Result<(), SimulatorError> {
        {
            let mut state = self.inner.state.lock();
            start(&mut state, ActionKind::Delete)?;
            self.inner.publish(&state);
        }

        match self.inner.api.delete_scenario(id).await {
            Ok(()) => {
                {
                    let mut state = self.inner.state.lock();
                    self.inner.succeed(&mut state, ActionKind::Delete);
                    self.inner.publish(&state);
                }
                tracing::info!(%id, "scenario deleted");
                self.refresh_scenarios().await;
                Ok(())
            }
            Err(source) => Err(self.inner.fail(ActionKind::Delete, source)),
        }
    }

    // ------------------------------------------------------------------
    // Report download
    // ------------------------------------------------------------------

    /// Generate a report and write it to the download directory
    ///
    /// # Errors
    /// - `SimulatorError::Busy` if a report is already pending
    /// - `SimulatorError::Validation` for a malformed email or ineligible inputs
    /// - `SimulatorError::Request` if the service rejects the request
    /// - `SimulatorError::Io` if the file cannot be written
    pub async fn download_report(&self) -> Result<PathBuf, SimulatorError> {
        let request = {
            let mut state = self.inner.state.lock();
            if state.is_pending(ActionKind::Report) {
                return Err(SimulatorError::Busy(ActionKind::Report));
            }
            let request = match ReportRequest::new(&state.email, &state.inputs) {
                Ok(request) => request,
                Err(err) => return Err(self.inner.reject(&mut state, err)),
            };
            start(&mut state, ActionKind::Report)?;
            self.inner.publish(&state);
            request
        };

        let file = match self.inner.api.generate_report(&request).await {
            Ok(file) => file,
            Err(source) => return Err(self.inner.fail(ActionKind::Report, source)),
        };

        let filename = report_filename(
            file.content_disposition.as_deref(),
            &self.inner.config.default_report_filename,
        );
        let dir = self.inner.config.download_dir.clone();

        match download::save_report(dir.clone(), filename.clone(), file.bytes).await {
            Ok(path) => {
                let mut state = self.inner.state.lock();
                self.inner.succeed(&mut state, ActionKind::Report);
                state.last_download = Some(path.clone());
                self.inner.publish(&state);
                tracing::info!(path = %path.display(), "report downloaded");
                Ok(path)
            }
            Err(source) => {
                let message = format!("Failed to save report: {source}");
                tracing::warn!("{}", message);
                let mut state = self.inner.state.lock();
                if let Err(e) = state.actions.fail(ActionKind::Report, message.clone()) {
                    tracing::error!("action state out of sync: {}", e);
                }
                state.message = Some(message);
                self.inner.publish(&state);
                Err(SimulatorError::Io {
                    path: dir.join(filename),
                    source,
                })
            }
        }
    }
}

impl fmt::Debug for SimulatorController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatorController")
            .field("config", &self.inner.config)
            .field("state", &*self.inner.state.lock())
            .finish_non_exhaustive()
    }
}
