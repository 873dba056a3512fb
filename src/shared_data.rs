// src/shared_data.rs

use crate::signal_model::signals::{SignalPhase, TrafficSignal};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Point-in-time view of one signal, shaped for query surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalSnapshot {
    pub id: String,
    pub location: (f64, f64),
    pub aspects: IndexMap<String, SignalPhase>,
    pub lanes_controlled: Vec<String>,
    pub default_timing: HashMap<SignalPhase, u32>,
}

impl SignalSnapshot {
    pub fn from_signal(signal: &TrafficSignal) -> Self {
        Self {
            id: signal.id.clone(),
            location: signal.location,
            aspects: signal.aspects().clone(),
            lanes_controlled: signal.lanes_controlled.clone(),
            default_timing: signal.default_timing.clone(),
        }
    }
}

/// Controller-wide status: the emergency mode flag plus which signals are
/// currently holding a preemption state. The flag is a mode indicator, not
/// derived from the preempted set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerStatus {
    pub controller_id: String,
    pub emergency_active: bool,
    pub preempted_signals: Vec<String>,
}

pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}
