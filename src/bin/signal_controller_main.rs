use std::sync::Arc;
use traffic_signal_control::communication::dispatcher::CentralDispatcher;
use traffic_signal_control::communication::rabbitmq::start_preemption_feed;
use traffic_signal_control::control_system::signal_controller::SignalController;
use traffic_signal_control::scenario::create_demo_signals;

#[tokio::main]
async fn main() {
    env_logger::init();
    println!("Starting signal controller...");

    let controller = Arc::new(SignalController::new("GlobalCtrl001"));
    for signal in create_demo_signals() {
        controller.register_signal(signal);
    }

    let dispatcher = Arc::new(CentralDispatcher::new("CentralHub01", controller));
    if let Err(e) = start_preemption_feed(dispatcher).await {
        eprintln!("Controller error: {}", e);
    }
}
