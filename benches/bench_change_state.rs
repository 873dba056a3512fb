// benches/bench_change_state.rs
use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, Criterion, PlotConfiguration,
};
use std::collections::HashMap;
use std::time::Duration;
use traffic_signal_control::signal_model::signals::{
    SignalPhase, StateRequest, TargetState, TrafficSignal,
};

// Helper to create a signal with a given number of aspects: "aspect0", ...
fn create_signal(num_aspects: usize) -> TrafficSignal {
    let aspects: TargetState = (0..num_aspects)
        .map(|i| (format!("aspect{}", i), SignalPhase::Red))
        .collect();
    TrafficSignal::new("bench_signal", (0.0, 0.0), aspects, Vec::new(), HashMap::new())
}

fn create_request(num_aspects: usize) -> StateRequest {
    (0..num_aspects)
        .map(|i| (format!("aspect{}", i), "green".to_string()))
        .collect()
}

fn bench_change_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("change_state");

    group.sample_size(100);
    group.measurement_time(Duration::from_secs(5));
    group.warm_up_time(Duration::from_secs(2));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Linear));

    // Benchmark validation + atomic apply for signals with 4, 16, and 64 aspects.
    for &size in [4, 16, 64].iter() {
        group.bench_function(format!("size_{}", size), |b| {
            let mut signal = create_signal(size);
            let request = create_request(size);
            b.iter(|| {
                signal.change_state(black_box(&request)).unwrap();
                black_box(&signal);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_change_state);
criterion_main!(benches);
