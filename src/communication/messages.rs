use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Commands accepted on the emergency event queue.
///
/// Phases in `emergency_state` travel as names ("red", "flashing_yellow", ...);
/// an out-of-set phase still parses here and is rejected by signal validation,
/// which names the offending aspect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PreemptionMessage {
    EmergencyApproach {
        vehicle_id: String,
        location: (f64, f64),
        route: Vec<String>,
        emergency_state: Option<IndexMap<String, String>>,
    },
    EmergencyClear {
        signal_id: Option<String>,
    },
}

/// Status notice published after each handled command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreemptionNotice {
    pub timestamp: u64,
    pub controller_id: String,
    pub signal_id: Option<String>,
    pub outcome: String,
    pub emergency_active: bool,
}
