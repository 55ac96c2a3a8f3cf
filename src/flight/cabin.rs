//! Cabin announcement state machine

use tracing::{debug, info};

use super::FlightPhase;
use super::phase::{GROUND_AGL, TERMINAL_ALTITUDE, derive_phase};
use crate::schema::Field;
use crate::types::Snapshot;

/// Landing rate value while no touchdown has been captured.
pub const NO_LANDING_RATE: f64 = -999.0;
/// Height above ground that arms landing-rate capture (ft).
pub const ARM_LANDING_AGL: f64 = 200.0;
/// Pushback state reported when no pushback is in progress.
pub const PUSHBACK_IDLE: f64 = 3.0;
/// Highest boarding stage; further presses yield no announcement.
pub const LAST_BOARDING_STAGE: u8 = 3;

/// Announcement cue returned to the panel. The discriminant is the wire id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum CabinEvent {
    None = 0,
    DoorsForBoarding = 1,
    WelcomeOnBoard = 2,
    BoardingComplete = 3,
    PushbackStart = 4,
    PushbackStop = 5,
    CrewSeatsForTakeoff = 6,
    SeatbeltsOff = 7,
    Turbulence = 8,
    PrepareForLanding = 9,
    CrewSeatsForLanding = 10,
    GoAround = 11,
    WelcomeToDestination = 12,
    Disembark = 13,
}

impl CabinEvent {
    pub fn id(self) -> i32 {
        self as i32
    }

    /// Whether the host must also see a pushback toggle.
    pub fn toggles_pushback(self) -> bool {
        matches!(self, CabinEvent::PushbackStart | CabinEvent::PushbackStop)
    }
}

/// Panel button asking for a cabin event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CabinButton {
    /// Announcement button
    Cabin,
    /// Ground handling button
    Ground,
}

impl CabinButton {
    /// Button carried in the value of a check-custom-event write.
    pub fn from_value(value: f64) -> Option<Self> {
        match value.round() as i64 {
            1 => Some(CabinButton::Cabin),
            2 => Some(CabinButton::Ground),
            _ => None,
        }
    }
}

/// Ground situation needed to decide ground events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundContext {
    pub parking_brake_on: bool,
    pub pushback_state: f64,
}

impl GroundContext {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            parking_brake_on: snapshot.is_on(Field::ParkingBrake),
            pushback_state: snapshot.get(Field::PushbackState),
        }
    }

    fn pushback_idle(&self) -> bool {
        self.pushback_state >= PUSHBACK_IDLE
    }
}

/// Flight progress flags that decide which announcement fits.
#[derive(Debug, Clone, PartialEq)]
pub struct CabinEventState {
    pub initiated_pushback: bool,
    pub completed_takeoff: bool,
    pub has_flown: bool,
    pub on_stand_state: u8,
    pub landing_rate: f64,
    pub last_event: CabinEvent,
    phase: FlightPhase,
}

impl Default for CabinEventState {
    fn default() -> Self {
        Self {
            initiated_pushback: false,
            completed_takeoff: false,
            has_flown: false,
            on_stand_state: 0,
            landing_rate: NO_LANDING_RATE,
            last_event: CabinEvent::None,
            phase: FlightPhase::Ground,
        }
    }
}

impl CabinEventState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Phase computed by the last [`CabinEventState::update`].
    pub fn phase(&self) -> FlightPhase {
        self.phase
    }

    /// Advance the flags from one cycle of telemetry and return the phase.
    pub fn update(&mut self, snapshot: &Snapshot) -> FlightPhase {
        let altitude = snapshot.get(Field::Altitude);
        let agl = snapshot.get(Field::AltitudeAgl);
        let on_ground = snapshot.is_on(Field::OnGround);
        let powered = snapshot.is_on(Field::ElecBat1) || snapshot.is_on(Field::ElecBat2);

        if !powered {
            if self.has_flown || self.landing_rate != NO_LANDING_RATE {
                debug!("Electrical power lost, landing rate disarmed");
            }
            self.has_flown = false;
            self.landing_rate = NO_LANDING_RATE;
            if on_ground {
                self.completed_takeoff = false;
                self.initiated_pushback = false;
                self.on_stand_state = 0;
            }
        } else {
            // each climb above the arming height starts a new flight leg
            let captured = self.landing_rate != NO_LANDING_RATE;
            if agl > ARM_LANDING_AGL && (!self.has_flown || captured) {
                if captured {
                    debug!(previous = self.landing_rate, "Landing rate re-armed");
                }
                self.has_flown = true;
                self.landing_rate = NO_LANDING_RATE;
            }
            if on_ground && self.has_flown && self.landing_rate == NO_LANDING_RATE {
                self.landing_rate = snapshot.get(Field::VerticalSpeed).abs();
                info!(landing_rate = self.landing_rate, "Touchdown");
            }
        }

        if !self.completed_takeoff && altitude > TERMINAL_ALTITUDE && agl > GROUND_AGL {
            self.completed_takeoff = true;
            debug!("Takeoff completed");
        }

        let phase = derive_phase(snapshot, self.completed_takeoff);
        if phase != self.phase {
            debug!(from = %self.phase, to = %phase, "Flight phase changed");
        }
        self.phase = phase;
        phase
    }

    /// Pick the announcement for a button press in the given phase.
    pub fn custom_event(
        &mut self,
        button: CabinButton,
        phase: FlightPhase,
        ground: &GroundContext,
    ) -> CabinEvent {
        let event = match (phase, button) {
            (FlightPhase::Ground, CabinButton::Cabin) => self.ground_announcement(ground),
            (FlightPhase::Ground, CabinButton::Ground) => self.ground_handling(ground),
            (FlightPhase::Takeoff, CabinButton::Cabin) => CabinEvent::CrewSeatsForTakeoff,
            (FlightPhase::Climb | FlightPhase::Cruise, CabinButton::Cabin) => {
                CabinEvent::SeatbeltsOff
            }
            (FlightPhase::Descent, CabinButton::Cabin) => CabinEvent::PrepareForLanding,
            (FlightPhase::Approach, CabinButton::Cabin) => CabinEvent::CrewSeatsForLanding,
            (FlightPhase::GoAround, CabinButton::Cabin) => CabinEvent::GoAround,
            (FlightPhase::GoAround, CabinButton::Ground) => CabinEvent::None,
            (_, CabinButton::Ground) => CabinEvent::Turbulence,
        };
        if event != CabinEvent::None {
            info!(?event, %phase, "Cabin event");
        }
        self.last_event = event;
        event
    }

    fn ground_announcement(&mut self, ground: &GroundContext) -> CabinEvent {
        if self.completed_takeoff {
            return CabinEvent::WelcomeToDestination;
        }
        if ground.parking_brake_on && !self.initiated_pushback && ground.pushback_idle() {
            let event = match self.on_stand_state {
                0 => CabinEvent::DoorsForBoarding,
                1 => CabinEvent::WelcomeOnBoard,
                2 => CabinEvent::BoardingComplete,
                _ => CabinEvent::None,
            };
            self.on_stand_state = (self.on_stand_state + 1).min(LAST_BOARDING_STAGE);
            return event;
        }
        if self.initiated_pushback {
            CabinEvent::CrewSeatsForTakeoff
        } else {
            CabinEvent::None
        }
    }

    fn ground_handling(&mut self, ground: &GroundContext) -> CabinEvent {
        if self.completed_takeoff {
            let landing_rate = self.landing_rate;
            self.reset();
            info!(landing_rate, "Disembarking, flight state cleared");
            return CabinEvent::Disembark;
        }
        if ground.pushback_idle() {
            self.initiated_pushback = true;
            CabinEvent::PushbackStart
        } else {
            CabinEvent::PushbackStop
        }
    }

    /// Write phase and cabin fields into the derived section of the snapshot.
    pub fn write_derived(&self, snapshot: &mut Snapshot) {
        snapshot.set(Field::FlightPhase, self.phase.code());
        snapshot.set(Field::LandingRate, self.landing_rate);
        snapshot.set(Field::BoardingStage, self.on_stand_state as f64);
        snapshot.set(Field::LastCabinEvent, self.last_event.id() as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::canonical_schema;
    use std::sync::Arc;

    fn snapshot() -> Snapshot {
        let mut snapshot = Snapshot::new(Arc::new(canonical_schema().unwrap()));
        snapshot.set(Field::ElecBat1, 1.0);
        snapshot
    }

    fn parked() -> GroundContext {
        GroundContext { parking_brake_on: true, pushback_state: 3.0 }
    }

    #[test]
    fn boarding_sequence_saturates() {
        let mut state = CabinEventState::new();
        let ground = parked();
        let presses: Vec<_> = (0..5)
            .map(|_| state.custom_event(CabinButton::Cabin, FlightPhase::Ground, &ground))
            .collect();
        assert_eq!(
            presses,
            vec![
                CabinEvent::DoorsForBoarding,
                CabinEvent::WelcomeOnBoard,
                CabinEvent::BoardingComplete,
                CabinEvent::None,
                CabinEvent::None,
            ]
        );
        assert_eq!(state.on_stand_state, LAST_BOARDING_STAGE);
    }

    #[test]
    fn boarding_needs_parking_brake() {
        let mut state = CabinEventState::new();
        let ground = GroundContext { parking_brake_on: false, pushback_state: 3.0 };
        let event = state.custom_event(CabinButton::Cabin, FlightPhase::Ground, &ground);
        assert_eq!(event, CabinEvent::None);
        assert_eq!(state.on_stand_state, 0);
    }

    #[test]
    fn pushback_toggles_on_ground() {
        let mut state = CabinEventState::new();
        let start = state.custom_event(CabinButton::Ground, FlightPhase::Ground, &parked());
        assert_eq!(start, CabinEvent::PushbackStart);
        assert!(start.toggles_pushback());
        assert!(state.initiated_pushback);

        let moving = GroundContext { parking_brake_on: false, pushback_state: 0.0 };
        let stop = state.custom_event(CabinButton::Ground, FlightPhase::Ground, &moving);
        assert_eq!(stop, CabinEvent::PushbackStop);

        // after pushback the cabin button asks the crew to be seated
        assert_eq!(
            state.custom_event(CabinButton::Cabin, FlightPhase::Ground, &parked()),
            CabinEvent::CrewSeatsForTakeoff
        );
    }

    #[test]
    fn airborne_announcements_follow_phase() {
        let mut state = CabinEventState::new();
        let ground = parked();
        let cases = [
            (FlightPhase::Takeoff, CabinEvent::CrewSeatsForTakeoff),
            (FlightPhase::Climb, CabinEvent::SeatbeltsOff),
            (FlightPhase::Cruise, CabinEvent::SeatbeltsOff),
            (FlightPhase::Descent, CabinEvent::PrepareForLanding),
            (FlightPhase::Approach, CabinEvent::CrewSeatsForLanding),
            (FlightPhase::GoAround, CabinEvent::GoAround),
        ];
        for (phase, expected) in cases {
            assert_eq!(state.custom_event(CabinButton::Cabin, phase, &ground), expected);
        }
        let turbulence = state.custom_event(CabinButton::Ground, FlightPhase::Cruise, &ground);
        assert_eq!(turbulence, CabinEvent::Turbulence);
        let go_around = state.custom_event(CabinButton::Ground, FlightPhase::GoAround, &ground);
        assert_eq!(go_around, CabinEvent::None);
    }

    #[test]
    fn disembark_resets_flight_state() {
        let mut state = CabinEventState::new();
        state.completed_takeoff = true;
        state.has_flown = true;
        state.landing_rate = 180.0;
        state.on_stand_state = 3;

        assert_eq!(
            state.custom_event(CabinButton::Cabin, FlightPhase::Ground, &parked()),
            CabinEvent::WelcomeToDestination
        );
        let disembark = state.custom_event(CabinButton::Ground, FlightPhase::Ground, &parked());
        assert_eq!(disembark, CabinEvent::Disembark);
        assert!(!state.completed_takeoff);
        assert_eq!(state.landing_rate, NO_LANDING_RATE);
        assert_eq!(state.on_stand_state, 0);
    }

    #[test]
    fn buttons_decode_from_write_value() {
        assert_eq!(CabinButton::from_value(1.0), Some(CabinButton::Cabin));
        assert_eq!(CabinButton::from_value(2.0), Some(CabinButton::Ground));
        assert_eq!(CabinButton::from_value(3.0), None);
    }

    #[test]
    fn landing_rate_is_captured_once() {
        let mut state = CabinEventState::new();
        let mut snap = snapshot();

        snap.set(Field::AltitudeAgl, 500.0);
        snap.set(Field::Altitude, 1500.0);
        state.update(&snap);
        assert!(state.has_flown);
        assert_eq!(state.landing_rate, NO_LANDING_RATE);

        snap.set(Field::AltitudeAgl, 0.0);
        snap.set(Field::OnGround, 1.0);
        snap.set(Field::VerticalSpeed, -3.5);
        state.update(&snap);
        assert_eq!(state.landing_rate, 3.5);

        snap.set(Field::VerticalSpeed, -9.0);
        state.update(&snap);
        assert_eq!(state.landing_rate, 3.5);
    }

    #[test]
    fn each_circuit_captures_its_own_touchdown() {
        let mut state = CabinEventState::new();
        let mut snap = snapshot();

        for rate in [3.5, 9.0] {
            snap.set(Field::OnGround, 0.0);
            snap.set(Field::AltitudeAgl, 1000.0);
            snap.set(Field::Altitude, 1500.0);
            state.update(&snap);
            assert_eq!(state.landing_rate, NO_LANDING_RATE);

            snap.set(Field::AltitudeAgl, 0.0);
            snap.set(Field::OnGround, 1.0);
            snap.set(Field::VerticalSpeed, -rate);
            state.update(&snap);
            assert_eq!(state.landing_rate, rate);
        }
    }

    #[test]
    fn power_loss_on_ground_clears_takeoff() {
        let mut state = CabinEventState::new();
        let mut snap = snapshot();
        snap.set(Field::Altitude, 12_000.0);
        snap.set(Field::AltitudeAgl, 11_000.0);
        state.update(&snap);
        assert!(state.completed_takeoff);
        assert_eq!(state.phase(), FlightPhase::Cruise);

        snap.set(Field::Altitude, 300.0);
        snap.set(Field::AltitudeAgl, 0.0);
        snap.set(Field::OnGround, 1.0);
        snap.set(Field::ElecBat1, 0.0);
        state.update(&snap);
        assert!(!state.completed_takeoff);
        assert!(!state.has_flown);
        assert_eq!(state.landing_rate, NO_LANDING_RATE);
    }

    #[test]
    fn derived_fields_are_written() {
        let mut state = CabinEventState::new();
        state.custom_event(CabinButton::Cabin, FlightPhase::Ground, &parked());
        let mut snap = snapshot();
        state.write_derived(&mut snap);
        assert_eq!(snap.get(Field::BoardingStage), 1.0);
        assert_eq!(snap.get(Field::LastCabinEvent), 1.0);
        assert_eq!(snap.get(Field::LandingRate), NO_LANDING_RATE);
    }
}
