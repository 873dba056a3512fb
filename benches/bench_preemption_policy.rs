// benches/bench_preemption_policy.rs
use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, Criterion, PlotConfiguration,
};
use std::collections::HashMap;
use std::time::Duration;
use traffic_signal_control::control_system::preemption::{CorridorGreenPolicy, PreemptionPolicy};
use traffic_signal_control::control_system::signal_controller::SignalController;
use traffic_signal_control::signal_model::signals::{SignalPhase, TargetState, TrafficSignal};

fn create_aspects(num_aspects: usize) -> TargetState {
    (0..num_aspects)
        .map(|i| (format!("approach{}", i), SignalPhase::Red))
        .collect()
}

fn bench_select_target_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_target_state");

    group.sample_size(100);
    group.measurement_time(Duration::from_secs(5));
    group.warm_up_time(Duration::from_secs(2));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Linear));

    for &size in [2, 8, 32].iter() {
        group.bench_function(format!("size_{}", size), |b| {
            let aspects = create_aspects(size);
            b.iter(|| {
                let target = CorridorGreenPolicy.select_target_state(black_box(&aspects));
                black_box(target);
            });
        });
    }
    group.finish();
}

fn bench_handle_approach(c: &mut Criterion) {
    let mut group = c.benchmark_group("handle_approach");

    group.sample_size(100);
    group.measurement_time(Duration::from_secs(5));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Linear));

    for &size in [2, 8, 32].iter() {
        group.bench_function(format!("size_{}", size), |b| {
            let controller = SignalController::new("bench_controller");
            controller.register_signal(TrafficSignal::new(
                "bench_signal",
                (0.0, 0.0),
                create_aspects(size),
                Vec::new(),
                HashMap::new(),
            ));
            let route = vec!["bench_signal".to_string()];
            b.iter(|| {
                let outcome = controller.handle_emergency_vehicle_approach(
                    black_box("EV_bench"),
                    (0.0, 0.0),
                    black_box(&route),
                    None,
                );
                black_box(outcome);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_select_target_state, bench_handle_approach);
criterion_main!(benches);
