//! Flight phase and cabin announcement logic.
//!
//! The phase is recomputed from altitude, height above ground and vertical
//! speed on every cycle. [`CabinEventState`] tracks the progress of a flight
//! (pushback, takeoff, touchdown) and turns the two panel cabin buttons into
//! announcement cues appropriate for the current phase.

mod cabin;
mod phase;

pub use cabin::{
    ARM_LANDING_AGL, CabinButton, CabinEvent, CabinEventState, GroundContext, LAST_BOARDING_STAGE,
    NO_LANDING_RATE, PUSHBACK_IDLE,
};
pub use phase::{FlightPhase, GROUND_AGL, LEVEL_VS_BAND, TERMINAL_ALTITUDE, derive_phase};
