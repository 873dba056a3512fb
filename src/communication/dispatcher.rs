use crate::control_system::signal_controller::{
    ApproachOutcome, ClearOutcome, SignalController,
};
use crate::signal_model::signals::StateRequest;
use std::fmt;
use std::sync::Arc;

/// Thin relay between an event source (simulation, API call, sensor feed)
/// and one [`SignalController`]. It forwards approach and end-of-emergency
/// events and performs no decision logic of its own; the indirection exists
/// so the triggering source never depends on the controller's concrete
/// identity.
pub struct CentralDispatcher {
    pub server_id: String,
    controller: Arc<SignalController>,
}

impl CentralDispatcher {
    pub fn new(server_id: impl Into<String>, controller: Arc<SignalController>) -> Self {
        let dispatcher = Self {
            server_id: server_id.into(),
            controller,
        };
        log::info!(
            "dispatcher '{}' linked to controller '{}'",
            dispatcher.server_id,
            dispatcher.controller.controller_id
        );
        dispatcher
    }

    /// Relays an approaching-vehicle event to the linked controller.
    pub fn send_emergency_vehicle_data(
        &self,
        vehicle_id: &str,
        location: (f64, f64),
        route: &[String],
        emergency_state: Option<&StateRequest>,
    ) -> ApproachOutcome {
        log::info!(
            "dispatcher '{}': relaying emergency data for vehicle '{}' to controller '{}'",
            self.server_id,
            vehicle_id,
            self.controller.controller_id
        );
        self.controller
            .handle_emergency_vehicle_approach(vehicle_id, location, route, emergency_state)
    }

    /// Relays an end-of-emergency command to the linked controller.
    pub fn trigger_end_emergency_preemption(
        &self,
        signal_id_to_reset: Option<&str>,
    ) -> ClearOutcome {
        log::info!(
            "dispatcher '{}': relaying end-preemption command for signal '{}'",
            self.server_id,
            signal_id_to_reset.unwrap_or("any active")
        );
        self.controller
            .end_emergency_preemption(signal_id_to_reset)
    }

    pub fn controller(&self) -> &Arc<SignalController> {
        &self.controller
    }
}

impl fmt::Debug for CentralDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("CentralDispatcher")
            .field("server_id", &self.server_id)
            .field("controller_id", &self.controller.controller_id)
            .finish()
    }
}
