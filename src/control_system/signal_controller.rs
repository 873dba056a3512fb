use crate::control_system::preemption::{CorridorGreenPolicy, PreemptionPolicy};
use crate::shared_data::{ControllerStatus, SignalSnapshot};
use crate::signal_model::signals::{
    SignalError, SignalPhase, StateRequest, TargetState, TrafficSignal,
};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Failures surfaced by [`SignalController::set_signal_state`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    /// The signal id is not registered with this controller. Soft: other
    /// signals and the controller itself are unaffected.
    SignalNotFound { signal_id: String },
    /// The state change failed validation; nothing was applied.
    State(SignalError),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ControlError::SignalNotFound { signal_id } => {
                write!(f, "signal '{}' not found", signal_id)
            }
            ControlError::State(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ControlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ControlError::State(e) => Some(e),
            ControlError::SignalNotFound { .. } => None,
        }
    }
}

impl From<SignalError> for ControlError {
    fn from(e: SignalError) -> Self {
        ControlError::State(e)
    }
}

/// Result of handling an emergency vehicle approach. The emergency flag is
/// raised in every case; only `Preempted` means a signal changed state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApproachOutcome {
    /// The target signal now holds a preemption state.
    Preempted { signal_id: String },
    /// The vehicle supplied no route, so no target signal could be resolved.
    NoRouteProvided,
    /// The first signal on the route is not registered with this controller.
    TargetNotRegistered { signal_id: String },
    /// The target signal has no aspects; the fallback policy cannot pick a
    /// corridor.
    EmptyAspectSet { signal_id: String },
    /// The caller-supplied explicit state failed validation.
    Rejected {
        signal_id: String,
        error: SignalError,
    },
}

impl ApproachOutcome {
    pub fn is_preempted(&self) -> bool {
        matches!(self, ApproachOutcome::Preempted { .. })
    }

    /// The signal id the outcome refers to, if one was resolved.
    pub fn signal_id(&self) -> Option<&str> {
        match self {
            ApproachOutcome::Preempted { signal_id }
            | ApproachOutcome::TargetNotRegistered { signal_id }
            | ApproachOutcome::EmptyAspectSet { signal_id }
            | ApproachOutcome::Rejected { signal_id, .. } => Some(signal_id),
            ApproachOutcome::NoRouteProvided => None,
        }
    }
}

impl fmt::Display for ApproachOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApproachOutcome::Preempted { signal_id } => {
                write!(f, "preempted signal '{}'", signal_id)
            }
            ApproachOutcome::NoRouteProvided => write!(f, "no route provided"),
            ApproachOutcome::TargetNotRegistered { signal_id } => {
                write!(f, "target signal '{}' not registered", signal_id)
            }
            ApproachOutcome::EmptyAspectSet { signal_id } => {
                write!(f, "signal '{}' has no aspects", signal_id)
            }
            ApproachOutcome::Rejected { signal_id, error } => {
                write!(f, "rejected for signal '{}': {}", signal_id, error)
            }
        }
    }
}

/// Result of ending a preemption episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearOutcome {
    /// Every aspect of the named signal was forced to red.
    SignalReset { signal_id: String },
    /// Only the emergency flag was cleared; no signal was touched.
    FlagClearedOnly,
}

impl fmt::Display for ClearOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClearOutcome::SignalReset { signal_id } => {
                write!(f, "signal '{}' reset to all-red", signal_id)
            }
            ClearOutcome::FlagClearedOnly => write!(f, "emergency flag cleared"),
        }
    }
}

/// Owns a set of traffic signals and applies validated state changes,
/// including emergency-vehicle preemption.
///
/// All signal state lives behind one coarse mutex; methods take `&self` so a
/// controller can be shared as `Arc<SignalController>` between the event
/// feed, an API layer and background tasks.
pub struct SignalController {
    pub controller_id: String,
    signals: Arc<Mutex<HashMap<String, TrafficSignal>>>,
    emergency_active: Arc<AtomicBool>,
    preempted: Arc<Mutex<HashSet<String>>>,
    policy: Box<dyn PreemptionPolicy + Send + Sync>,
}

impl SignalController {
    /// Creates a controller using the default corridor fallback policy.
    pub fn new(controller_id: impl Into<String>) -> Self {
        Self::with_policy(controller_id, Box::new(CorridorGreenPolicy))
    }

    /// Creates a controller with a caller-supplied fallback policy, so a
    /// conflict-matrix-aware policy can replace the heuristic without
    /// touching the controller.
    pub fn with_policy(
        controller_id: impl Into<String>,
        policy: Box<dyn PreemptionPolicy + Send + Sync>,
    ) -> Self {
        Self {
            controller_id: controller_id.into(),
            signals: Arc::new(Mutex::new(HashMap::new())),
            emergency_active: Arc::new(AtomicBool::new(false)),
            preempted: Arc::new(Mutex::new(HashSet::new())),
            policy,
        }
    }

    /// Registers a signal with this controller. A signal with the same id
    /// replaces the previous registration.
    pub fn register_signal(&self, signal: TrafficSignal) {
        let mut signals = self.signals.lock().unwrap();
        if signals.contains_key(&signal.id) {
            log::warn!(
                "controller '{}': signal '{}' already registered, overwriting",
                self.controller_id,
                signal.id
            );
        }
        log::info!(
            "controller '{}': registered signal '{}'",
            self.controller_id,
            signal.id
        );
        signals.insert(signal.id.clone(), signal);
    }

    pub fn is_registered(&self, signal_id: &str) -> bool {
        self.signals.lock().unwrap().contains_key(signal_id)
    }

    pub fn emergency_active(&self) -> bool {
        self.emergency_active.load(Ordering::SeqCst)
    }

    /// Signal ids currently holding a preemption-computed state, sorted.
    pub fn preempted_signals(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.preempted.lock().unwrap().iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Applies a partial aspect-state request to one signal. Unknown signal
    /// ids and validation failures are surfaced to the caller; other signals
    /// are never affected.
    pub fn set_signal_state(
        &self,
        signal_id: &str,
        request: &StateRequest,
    ) -> Result<(), ControlError> {
        let mut signals = self.signals.lock().unwrap();
        let signal = match signals.get_mut(signal_id) {
            Some(signal) => signal,
            None => {
                log::warn!(
                    "controller '{}': signal '{}' not found",
                    self.controller_id,
                    signal_id
                );
                return Err(ControlError::SignalNotFound {
                    signal_id: signal_id.to_string(),
                });
            }
        };
        signal.change_state(request)?;
        log::info!(
            "controller '{}': signal '{}' state changed to {:?}",
            self.controller_id,
            signal_id,
            signal.aspects()
        );
        Ok(())
    }

    /// Handles an approaching emergency vehicle.
    ///
    /// The emergency flag is raised unconditionally, before the target signal
    /// is resolved. The first route element names the target signal; with an
    /// explicit `emergency_state` that state is applied verbatim (subject to
    /// validation), otherwise the fallback policy computes one. Target
    /// resolution and the state swap happen under a single lock acquisition
    /// so concurrent approaches to the same signal serialize cleanly.
    pub fn handle_emergency_vehicle_approach(
        &self,
        vehicle_id: &str,
        vehicle_location: (f64, f64),
        vehicle_route: &[String],
        emergency_state: Option<&StateRequest>,
    ) -> ApproachOutcome {
        log::info!(
            "controller '{}': emergency vehicle approach: id='{}', location={:?}, route={:?}, explicit_state={}",
            self.controller_id,
            vehicle_id,
            vehicle_location,
            vehicle_route,
            emergency_state.is_some()
        );
        self.emergency_active.store(true, Ordering::SeqCst);

        let target_signal_id = match vehicle_route.first() {
            Some(id) => id,
            None => {
                log::warn!(
                    "controller '{}': no route for vehicle '{}', cannot determine target signal",
                    self.controller_id,
                    vehicle_id
                );
                return ApproachOutcome::NoRouteProvided;
            }
        };

        let mut signals = self.signals.lock().unwrap();
        let signal = match signals.get_mut(target_signal_id) {
            Some(signal) => signal,
            None => {
                log::warn!(
                    "controller '{}': target signal '{}' for vehicle '{}' not registered",
                    self.controller_id,
                    target_signal_id,
                    vehicle_id
                );
                return ApproachOutcome::TargetNotRegistered {
                    signal_id: target_signal_id.clone(),
                };
            }
        };

        let applied = match emergency_state {
            Some(request) => signal.change_state(request),
            None => {
                log::warn!(
                    "controller '{}': no explicit emergency state for vehicle '{}' at signal '{}', using {} fallback",
                    self.controller_id,
                    vehicle_id,
                    signal.id,
                    self.policy.name()
                );
                match self.policy.select_target_state(signal.aspects()) {
                    Some(target) => signal.apply_phases(&target),
                    None => {
                        log::warn!(
                            "controller '{}': signal '{}' has no aspects, cannot preempt",
                            self.controller_id,
                            signal.id
                        );
                        return ApproachOutcome::EmptyAspectSet {
                            signal_id: signal.id.clone(),
                        };
                    }
                }
            }
        };

        match applied {
            Ok(()) => {
                log::info!(
                    "controller '{}': signal '{}' preempted for vehicle '{}', state now {:?}",
                    self.controller_id,
                    signal.id,
                    vehicle_id,
                    signal.aspects()
                );
                let signal_id = signal.id.clone();
                drop(signals);
                self.preempted.lock().unwrap().insert(signal_id.clone());
                ApproachOutcome::Preempted { signal_id }
            }
            Err(error) => {
                log::warn!(
                    "controller '{}': state change rejected for signal '{}': {}",
                    self.controller_id,
                    signal.id,
                    error
                );
                ApproachOutcome::Rejected {
                    signal_id: signal.id.clone(),
                    error,
                }
            }
        }
    }

    /// Ends a preemption episode. The emergency flag is cleared
    /// unconditionally; if a registered signal id is given, every aspect of
    /// that signal is forced to red as a conservative all-stop state. With no
    /// id (or an unknown one) no signal is touched - callers needing a full
    /// reset iterate over their signal ids.
    pub fn end_emergency_preemption(&self, signal_id_to_reset: Option<&str>) -> ClearOutcome {
        self.emergency_active.store(false, Ordering::SeqCst);
        log::info!(
            "controller '{}': emergency preemption mode ended",
            self.controller_id
        );

        if let Some(signal_id) = signal_id_to_reset {
            let mut signals = self.signals.lock().unwrap();
            if let Some(signal) = signals.get_mut(signal_id) {
                let all_red: TargetState = signal
                    .aspects()
                    .keys()
                    .map(|aspect| (aspect.clone(), SignalPhase::Red))
                    .collect();
                if let Err(e) = signal.apply_phases(&all_red) {
                    log::warn!(
                        "controller '{}': failed to reset signal '{}': {}",
                        self.controller_id,
                        signal_id,
                        e
                    );
                }
                log::info!(
                    "controller '{}': signal '{}' reverted to all-red",
                    self.controller_id,
                    signal_id
                );
                drop(signals);
                self.preempted.lock().unwrap().remove(signal_id);
                return ClearOutcome::SignalReset {
                    signal_id: signal_id.to_string(),
                };
            }
            log::warn!(
                "controller '{}': no registered signal '{}' to reset",
                self.controller_id,
                signal_id
            );
        }
        ClearOutcome::FlagClearedOnly
    }

    /// Current aspect states of one signal, if registered.
    pub fn get_signal_current_state(&self, signal_id: &str) -> Option<TargetState> {
        self.signals
            .lock()
            .unwrap()
            .get(signal_id)
            .map(|signal| signal.aspects().clone())
    }

    /// Current aspect states of every registered signal.
    pub fn get_signal_current_states(&self) -> HashMap<String, TargetState> {
        self.signals
            .lock()
            .unwrap()
            .iter()
            .map(|(id, signal)| (id.clone(), signal.aspects().clone()))
            .collect()
    }

    /// Full snapshot of one signal for query surfaces.
    pub fn get_signal(&self, signal_id: &str) -> Option<SignalSnapshot> {
        self.signals
            .lock()
            .unwrap()
            .get(signal_id)
            .map(SignalSnapshot::from_signal)
    }

    /// Controller-level status: the emergency flag plus the set of signals
    /// currently holding a preemption state.
    pub fn status(&self) -> ControllerStatus {
        ControllerStatus {
            controller_id: self.controller_id.clone(),
            emergency_active: self.emergency_active(),
            preempted_signals: self.preempted_signals(),
        }
    }
}

impl fmt::Debug for SignalController {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SignalController")
            .field("controller_id", &self.controller_id)
            .field("emergency_active", &self.emergency_active())
            .field("policy", &self.policy.name())
            .finish()
    }
}
