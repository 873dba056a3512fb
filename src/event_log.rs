use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::OpenOptions;
use std::path::Path;

/// One handled preemption event, for the audit trail.
#[derive(Debug, Serialize, Deserialize)]
pub struct PreemptionEventRecord {
    pub timestamp: u64,
    pub controller_id: String,
    pub vehicle_id: String,
    pub signal_id: Option<String>,
    pub outcome: String,
}

/// One end-of-preemption command, for the audit trail.
#[derive(Debug, Serialize, Deserialize)]
pub struct PreemptionClearRecord {
    pub timestamp: u64,
    pub controller_id: String,
    pub signal_id: Option<String>,
    pub outcome: String,
}

/// Generic helper to log a record to a CSV file.
fn log_to_csv<T: Serialize>(filename: &str, record: &T) -> Result<(), Box<dyn Error>> {
    let file_exists = Path::new(filename).exists();
    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(filename)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);
    wtr.serialize(record)?;
    wtr.flush()?;
    Ok(())
}

pub fn log_preemption_event(record: PreemptionEventRecord) {
    if let Err(e) = log_to_csv("preemption_events.csv", &record) {
        eprintln!("Error logging preemption event: {}", e);
    }
}

pub fn log_preemption_clear(record: PreemptionClearRecord) {
    if let Err(e) = log_to_csv("preemption_clears.csv", &record) {
        eprintln!("Error logging preemption clear: {}", e);
    }
}
