//! Traffic-signal control with emergency-vehicle preemption.
//!
//! A [`control_system::signal_controller::SignalController`] owns a set of
//! [`signal_model::signals::TrafficSignal`]s and applies validated state
//! changes. Approaching emergency vehicles are relayed through a
//! [`communication::dispatcher::CentralDispatcher`], which can be fed from a
//! RabbitMQ queue or driven directly (see [`scenario`]).

pub mod communication;
pub mod control_system;
pub mod event_log;
pub mod global_variables;
pub mod scenario;
pub mod shared_data;
pub mod signal_model;
