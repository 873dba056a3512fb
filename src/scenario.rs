use crate::communication::dispatcher::CentralDispatcher;
use crate::control_system::signal_controller::SignalController;
use crate::signal_model::signals::{SignalPhase, TrafficSignal};
use crate::signal_model::vehicles::{EmergencyVehicle, EmergencyVehicleType, VehicleStatus};
use indexmap::indexmap;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;

/// The two-intersection setup used by the demo scenario and the feed binary:
/// a canonical four-way crossing and a main/side street without the
/// north/south naming convention.
pub fn create_demo_signals() -> Vec<TrafficSignal> {
    vec![
        TrafficSignal::new(
            "TS001",
            (10.0, 20.0),
            indexmap! {
                "north_south".to_string() => SignalPhase::Red,
                "east_west".to_string() => SignalPhase::Green,
            },
            vec![
                "north_south_traffic".to_string(),
                "east_west_traffic".to_string(),
            ],
            HashMap::from([
                (SignalPhase::Green, 30),
                (SignalPhase::Yellow, 5),
                (SignalPhase::Red, 25),
            ]),
        ),
        TrafficSignal::new(
            "TS002",
            (30.0, 40.0),
            indexmap! {
                "main_st".to_string() => SignalPhase::Green,
                "side_st".to_string() => SignalPhase::Red,
            },
            vec!["main_st_flow".to_string(), "side_st_access".to_string()],
            HashMap::from([
                (SignalPhase::Green, 40),
                (SignalPhase::Yellow, 5),
                (SignalPhase::Red, 20),
            ]),
        ),
    ]
}

/// Self-contained demonstration of a full preemption episode: an ambulance
/// approaches a four-way intersection, the corridor is cleared, the vehicle
/// passes, and the signal is reverted to all-red.
pub struct PreemptionScenario {
    pub sim_id: String,
    controller: Arc<SignalController>,
    dispatcher: CentralDispatcher,
    emergency_vehicles: HashMap<String, EmergencyVehicle>,
    log: Vec<String>,
}

impl PreemptionScenario {
    pub fn new(sim_id: impl Into<String>) -> Self {
        let sim_id = sim_id.into();
        let controller = Arc::new(SignalController::new("Ctrl001"));
        let dispatcher = CentralDispatcher::new("CommHub01", Arc::clone(&controller));

        let mut scenario = Self {
            sim_id,
            controller,
            dispatcher,
            emergency_vehicles: HashMap::new(),
            log: Vec::new(),
        };
        scenario.setup_entities();
        scenario
    }

    fn setup_entities(&mut self) {
        self.log_event("Setting up simulation entities...");

        for signal in create_demo_signals() {
            self.controller.register_signal(signal);
        }
        self.log_event("Registered signals: [\"TS001\", \"TS002\"] with controller.");

        // Approach speed varies run to run; the preemption outcome must not.
        let mut rng = rand::rng();
        let ambulance = EmergencyVehicle::new(
            "EV007",
            EmergencyVehicleType::Ambulance,
            (0.0, 0.0),
            rng.random_range(40.0..80.0),
            vec!["TS001".to_string(), "TS003".to_string()],
            VehicleStatus::EnRouteToEmergency,
        );
        self.log_event(&format!(
            "EmergencyVehicle '{}' created with route {:?}.",
            ambulance.id, ambulance.route
        ));
        self.emergency_vehicles
            .insert(ambulance.id.clone(), ambulance);
        self.log_event("Simulation entities setup complete.");
    }

    /// Executes the emergency vehicle preemption demonstration.
    pub fn run_emergency_preemption_scenario(&mut self) {
        self.log_event("Starting emergency preemption scenario...");
        self.print_all_signal_states("Initial State");

        let Some(ev) = self.emergency_vehicles.get("EV007").cloned() else {
            self.log_event("Error: Emergency vehicle EV007 not found for simulation.");
            return;
        };
        let Some(target_signal_id) = ev.next_signal().map(str::to_string) else {
            self.log_event(&format!("Error: Emergency vehicle {} has no route.", ev.id));
            return;
        };

        self.log_event(&format!(
            "Simulating approach of {} (type: {}) towards signal {}...",
            ev.id, ev.vehicle_type, target_signal_id
        ));
        let outcome =
            self.dispatcher
                .send_emergency_vehicle_data(&ev.id, ev.location, &ev.route, None);
        self.log_event(&format!("Approach outcome: {}.", outcome));
        self.print_all_signal_states(&format!(
            "After EV {} Approach (Targeting {})",
            ev.id, target_signal_id
        ));

        self.log_event(&format!(
            "Simulating {} has passed signal {}...",
            ev.id, target_signal_id
        ));
        let outcome = self
            .dispatcher
            .trigger_end_emergency_preemption(Some(&target_signal_id));
        self.log_event(&format!("Clear outcome: {}.", outcome));
        self.print_all_signal_states(&format!(
            "After EV {} Passed (Preemption Ended for {})",
            ev.id, target_signal_id
        ));

        self.log_event("Emergency preemption scenario finished.");
    }

    fn print_all_signal_states(&self, stage_description: &str) {
        println!("\n--- Signal States: {} ---", stage_description);
        let mut states: Vec<_> = self
            .controller
            .get_signal_current_states()
            .into_iter()
            .collect();
        states.sort_by(|a, b| a.0.cmp(&b.0));
        for (signal_id, aspects) in states {
            println!("Signal ID: {}, Current State: {:?}", signal_id, aspects);
        }
        println!("-------------------------------------------");
    }

    fn log_event(&mut self, message: &str) {
        let entry = format!("[{} Log] {}", self.sim_id, message);
        println!("{}", entry);
        self.log.push(entry);
    }

    /// Every line logged so far, for replay by an API layer.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn controller(&self) -> &Arc<SignalController> {
        &self.controller
    }
}
