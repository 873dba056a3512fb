use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The display value a single signal aspect can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalPhase {
    Red,
    Yellow,
    Green,
    FlashingRed,
    FlashingYellow,
    Off,
}

impl SignalPhase {
    /// Wire spelling of the phase, as used in state requests and JSON payloads.
    pub fn name(&self) -> &'static str {
        match self {
            SignalPhase::Red => "red",
            SignalPhase::Yellow => "yellow",
            SignalPhase::Green => "green",
            SignalPhase::FlashingRed => "flashing_red",
            SignalPhase::FlashingYellow => "flashing_yellow",
            SignalPhase::Off => "off",
        }
    }

    /// Parses the wire spelling back into a phase. Returns `None` for anything
    /// outside the enumerated set.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "red" => Some(SignalPhase::Red),
            "yellow" => Some(SignalPhase::Yellow),
            "green" => Some(SignalPhase::Green),
            "flashing_red" => Some(SignalPhase::FlashingRed),
            "flashing_yellow" => Some(SignalPhase::FlashingYellow),
            "off" => Some(SignalPhase::Off),
            _ => None,
        }
    }
}

impl fmt::Display for SignalPhase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A partial aspect-state request as it arrives from callers (API layers,
/// message payloads): aspect name to phase name.
pub type StateRequest = IndexMap<String, String>;

/// A fully validated aspect-state map, as computed by preemption policies.
pub type TargetState = IndexMap<String, SignalPhase>;

/// Validation failures for a signal state change. A request that fails leaves
/// every aspect untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// The named aspect does not exist on the signal. Aspects are fixed at
    /// construction; only their values change.
    UnknownAspect { aspect: String },
    /// The proposed phase is not in the enumerated phase set.
    InvalidPhase { aspect: String, phase: String },
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SignalError::UnknownAspect { aspect } => {
                write!(f, "invalid signal aspect '{}'", aspect)
            }
            SignalError::InvalidPhase { aspect, phase } => {
                write!(f, "invalid phase '{}' for aspect '{}'", phase, aspect)
            }
        }
    }
}

impl std::error::Error for SignalError {}

/// One signalized intersection's current right-of-way state.
///
/// The aspect map is insertion-ordered: the order aspects were given at
/// construction is the tie-break order used by the fallback preemption
/// policy. All mutation goes through [`change_state`](Self::change_state) or
/// [`apply_phases`](Self::apply_phases) so the aspect key set never changes
/// after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficSignal {
    pub id: String,
    pub location: (f64, f64),
    aspects: IndexMap<String, SignalPhase>,
    pub lanes_controlled: Vec<String>,
    /// Seconds per phase, reserved for future cyclic operation. Preemption
    /// never consults this.
    pub default_timing: HashMap<SignalPhase, u32>,
}

impl TrafficSignal {
    pub fn new(
        id: impl Into<String>,
        location: (f64, f64),
        aspects: TargetState,
        lanes_controlled: Vec<String>,
        default_timing: HashMap<SignalPhase, u32>,
    ) -> Self {
        Self {
            id: id.into(),
            location,
            aspects,
            lanes_controlled,
            default_timing,
        }
    }

    /// Read-only view of the current aspect states, in insertion order.
    pub fn aspects(&self) -> &IndexMap<String, SignalPhase> {
        &self.aspects
    }

    /// Current phase of a single aspect, if the aspect exists.
    pub fn get_aspect_state(&self, aspect: &str) -> Option<SignalPhase> {
        self.aspects.get(aspect).copied()
    }

    /// Applies a partial state change. Every entry is validated before any
    /// entry is applied: a request containing one unknown aspect or one
    /// out-of-set phase name leaves all aspects unchanged.
    pub fn change_state(&mut self, request: &StateRequest) -> Result<(), SignalError> {
        let mut staged: Vec<(&str, SignalPhase)> = Vec::with_capacity(request.len());
        for (aspect, phase_name) in request {
            if !self.aspects.contains_key(aspect.as_str()) {
                return Err(SignalError::UnknownAspect {
                    aspect: aspect.clone(),
                });
            }
            let phase =
                SignalPhase::from_name(phase_name).ok_or_else(|| SignalError::InvalidPhase {
                    aspect: aspect.clone(),
                    phase: phase_name.clone(),
                })?;
            staged.push((aspect.as_str(), phase));
        }
        for (aspect, phase) in staged {
            self.aspects[aspect] = phase;
        }
        Ok(())
    }

    /// Typed counterpart of [`change_state`](Self::change_state) for states
    /// computed inside the control system. Same unknown-aspect check, same
    /// all-or-nothing application.
    pub fn apply_phases(&mut self, target: &TargetState) -> Result<(), SignalError> {
        for aspect in target.keys() {
            if !self.aspects.contains_key(aspect.as_str()) {
                return Err(SignalError::UnknownAspect {
                    aspect: aspect.clone(),
                });
            }
        }
        for (aspect, &phase) in target {
            self.aspects[aspect.as_str()] = phase;
        }
        Ok(())
    }
}
