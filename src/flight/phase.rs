//! Flight phase classification

use std::fmt;

use crate::schema::Field;
use crate::types::Snapshot;

/// Height above ground at or below which the aircraft counts as on the ground (ft).
pub const GROUND_AGL: f64 = 50.0;
/// Altitude separating the terminal phases from the en-route phases (ft).
pub const TERMINAL_ALTITUDE: f64 = 10_000.0;
/// Vertical speed band treated as level flight.
pub const LEVEL_VS_BAND: f64 = 3.0;

/// Phase of flight, recomputed every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FlightPhase {
    Ground = 0,
    Takeoff = 1,
    Climb = 2,
    Cruise = 3,
    Descent = 4,
    Approach = 5,
    GoAround = 6,
}

impl FlightPhase {
    pub const ALL: [FlightPhase; 7] = [
        FlightPhase::Ground,
        FlightPhase::Takeoff,
        FlightPhase::Climb,
        FlightPhase::Cruise,
        FlightPhase::Descent,
        FlightPhase::Approach,
        FlightPhase::GoAround,
    ];

    /// Classify from raw values.
    ///
    /// Below the terminal altitude the phase depends on whether the takeoff
    /// has been completed: before it everything airborne is takeoff, after it
    /// a climb is a go-around and anything else is the approach.
    pub fn classify(
        altitude: f64,
        altitude_agl: f64,
        vertical_speed: f64,
        completed_takeoff: bool,
    ) -> Self {
        if altitude_agl <= GROUND_AGL {
            FlightPhase::Ground
        } else if altitude < TERMINAL_ALTITUDE {
            if !completed_takeoff {
                FlightPhase::Takeoff
            } else if vertical_speed > LEVEL_VS_BAND {
                FlightPhase::GoAround
            } else {
                FlightPhase::Approach
            }
        } else if vertical_speed > LEVEL_VS_BAND {
            FlightPhase::Climb
        } else if vertical_speed < -LEVEL_VS_BAND {
            FlightPhase::Descent
        } else {
            FlightPhase::Cruise
        }
    }

    pub fn code(self) -> f64 {
        self as u8 as f64
    }

    pub fn name(self) -> &'static str {
        match self {
            FlightPhase::Ground => "ground",
            FlightPhase::Takeoff => "takeoff",
            FlightPhase::Climb => "climb",
            FlightPhase::Cruise => "cruise",
            FlightPhase::Descent => "descent",
            FlightPhase::Approach => "approach",
            FlightPhase::GoAround => "go-around",
        }
    }
}

impl fmt::Display for FlightPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify the phase from the canonical altitude and vertical speed fields.
pub fn derive_phase(snapshot: &Snapshot, completed_takeoff: bool) -> FlightPhase {
    FlightPhase::classify(
        snapshot.get(Field::Altitude),
        snapshot.get(Field::AltitudeAgl),
        snapshot.get(Field::VerticalSpeed),
        completed_takeoff,
    )
}
