use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of vehicles that may request signal preemption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmergencyVehicleType {
    Ambulance,
    FireTruck,
    PoliceCar,
}

impl fmt::Display for EmergencyVehicleType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EmergencyVehicleType::Ambulance => write!(f, "ambulance"),
            EmergencyVehicleType::FireTruck => write!(f, "fire_truck"),
            EmergencyVehicleType::PoliceCar => write!(f, "police_car"),
        }
    }
}

/// Operational status of an emergency vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    EnRouteToEmergency,
    ReturningToBase,
}

/// An emergency vehicle and its planned route. The route is an ordered list
/// of signal ids; only the first element is consulted by the controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyVehicle {
    pub id: String,
    pub vehicle_type: EmergencyVehicleType,
    pub location: (f64, f64),
    pub speed: f64,
    pub route: Vec<String>,
    pub status: VehicleStatus,
}

impl EmergencyVehicle {
    pub fn new(
        id: impl Into<String>,
        vehicle_type: EmergencyVehicleType,
        location: (f64, f64),
        speed: f64,
        route: Vec<String>,
        status: VehicleStatus,
    ) -> Self {
        Self {
            id: id.into(),
            vehicle_type,
            location,
            speed,
            route,
            status,
        }
    }

    /// Updates the vehicle's current location and speed.
    pub fn update_location(&mut self, new_location: (f64, f64), new_speed: f64) {
        self.location = new_location;
        self.speed = new_speed;
    }

    /// Updates the vehicle's operational status.
    pub fn update_status(&mut self, new_status: VehicleStatus) {
        self.status = new_status;
    }

    /// The next signal on the planned route, if any.
    pub fn next_signal(&self) -> Option<&str> {
        self.route.first().map(String::as_str)
    }
}
