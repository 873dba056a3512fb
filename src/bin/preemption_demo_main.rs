use traffic_signal_control::scenario::PreemptionScenario;

fn main() {
    env_logger::init();
    println!("Starting emergency preemption demo...");
    let mut scenario = PreemptionScenario::new("EmergencyDemoSim");
    scenario.run_emergency_preemption_scenario();

    println!("\n--- Full Simulation Log ---");
    for entry in scenario.log() {
        println!("{}", entry);
    }
    println!("---------------------------");
}
