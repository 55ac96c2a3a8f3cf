//! Control event identifiers and the inbound write record
//!
//! Event ids are shared with panel firmware, so their numeric values are part
//! of the wire contract. Ids strictly between [`EventId::VJOY_BUTTONS`] and
//! [`EventId::VJOY_BUTTONS_END`] address virtual joystick buttons.

use std::fmt;

use super::WRITE_RECORD_SIZE;
use crate::{LinkError, Result};

/// Identifier of a simulator control event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(pub i32);

impl EventId {
    // Link-local events
    pub const CHECK_CUSTOM_EVENT: EventId = EventId(1);
    pub const RUDDER_SENSITIVITY: EventId = EventId(2);

    // Ground handling
    pub const TOGGLE_PUSHBACK: EventId = EventId(10);
    pub const HEADING_GYRO_SET: EventId = EventId(11);
    pub const PARKING_BRAKE_SET: EventId = EventId(12);
    pub const GEAR_SET: EventId = EventId(13);
    pub const AUTOBRAKE: EventId = EventId(14);

    // Electrics and APU
    pub const ELEC_BAT1: EventId = EventId(20);
    pub const ELEC_BAT2: EventId = EventId(21);
    pub const APU_OFF_SWITCH: EventId = EventId(22);
    pub const APU_STARTER: EventId = EventId(23);
    pub const BLEED_AIR_SOURCE_CONTROL_SET: EventId = EventId(24);
    pub const AVIONICS_MASTER_SET: EventId = EventId(25);

    // Lights and cabin
    pub const BEACON_LIGHTS_SET: EventId = EventId(30);
    pub const LANDING_LIGHTS_SET: EventId = EventId(31);
    pub const TAXI_LIGHTS_SET: EventId = EventId(32);
    pub const NAV_LIGHTS_SET: EventId = EventId(33);
    pub const STROBES_SET: EventId = EventId(34);
    pub const CABIN_SEATBELTS_ALERT_SWITCH_TOGGLE: EventId = EventId(35);

    // Fuel
    pub const TANK_SELECT_1: EventId = EventId(40);
    pub const TANK_SELECT_2: EventId = EventId(41);

    // Radios and transponder
    pub const COM_RADIO_SET: EventId = EventId(50);
    pub const COM_STBY_RADIO_SET: EventId = EventId(51);
    pub const COM_RADIO_SWAP: EventId = EventId(52);
    pub const NAV1_RADIO_SET: EventId = EventId(53);
    pub const NAV1_STBY_SET: EventId = EventId(54);
    pub const NAV1_RADIO_SWAP: EventId = EventId(55);
    pub const VOR1_SET: EventId = EventId(56);
    pub const XPNDR_SET: EventId = EventId(57);
    pub const XPNDR_HIGH_SET: EventId = EventId(58);
    pub const XPNDR_LOW_SET: EventId = EventId(59);
    pub const XPNDR_STATE: EventId = EventId(60);
    pub const KOHLSMAN_SET: EventId = EventId(61);

    // Autopilot
    pub const AP_MASTER: EventId = EventId(70);
    pub const TOGGLE_FLIGHT_DIRECTOR: EventId = EventId(71);
    pub const AUTO_THROTTLE_ARM: EventId = EventId(72);
    pub const AP_SPD_VAR_SET: EventId = EventId(73);
    pub const AP_MACH_VAR_SET: EventId = EventId(74);
    pub const AP_AIRSPEED_ON: EventId = EventId(75);
    pub const AP_AIRSPEED_OFF: EventId = EventId(76);
    pub const AP_MACH_ON: EventId = EventId(77);
    pub const AP_MACH_OFF: EventId = EventId(78);
    pub const HEADING_BUG_SET: EventId = EventId(79);
    pub const AP_ALT_VAR_SET_ENGLISH: EventId = EventId(80);
    pub const AP_VS_VAR_SET_ENGLISH: EventId = EventId(81);
    pub const AP_VS_SET: EventId = EventId(82);
    pub const AP_ALT_HOLD: EventId = EventId(83);
    pub const AP_LOC_HOLD: EventId = EventId(84);
    pub const AP_APR_HOLD_ON: EventId = EventId(85);
    pub const AP_APR_HOLD_OFF: EventId = EventId(86);
    pub const AP_SPEED_SLOT_INDEX_SET: EventId = EventId(87);
    pub const AP_HEADING_SLOT_INDEX_SET: EventId = EventId(88);
    pub const AP_VS_SLOT_INDEX_SET: EventId = EventId(89);

    // Virtual joystick range markers; the markers themselves are not buttons
    pub const VJOY_BUTTONS: EventId = EventId(1000);
    pub const VJOY_BUTTONS_END: EventId = EventId(1129);

    /// Virtual joystick button addressed by this id, if it is inside the range.
    pub fn vjoy_button(self) -> Option<u32> {
        if self > Self::VJOY_BUTTONS && self < Self::VJOY_BUTTONS_END {
            u32::try_from(self.0 - Self::VJOY_BUTTONS.0).ok()
        } else {
            None
        }
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event#{}", self.0)
    }
}

/// A decoded control write: `{size:i32 = 16, eventId:i32, value:f64}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlWrite {
    pub event: EventId,
    pub value: f64,
}

impl ControlWrite {
    pub const fn new(event: EventId, value: f64) -> Self {
        Self { event, value }
    }

    /// Decode a write datagram. The caller has already matched the size prefix.
    pub fn decode(datagram: &[u8]) -> Result<Self> {
        let record = datagram.get(..WRITE_RECORD_SIZE).ok_or_else(|| {
            LinkError::protocol(format!(
                "write record needs {} bytes, got {}",
                WRITE_RECORD_SIZE,
                datagram.len()
            ))
        })?;
        let event = i32::from_le_bytes([record[4], record[5], record[6], record[7]]);
        let value = f64::from_le_bytes([
            record[8], record[9], record[10], record[11], record[12], record[13], record[14],
            record[15],
        ]);
        Ok(Self { event: EventId(event), value })
    }

    /// Encode as a write datagram.
    pub fn encode(&self) -> [u8; WRITE_RECORD_SIZE] {
        let mut out = [0u8; WRITE_RECORD_SIZE];
        out[..4].copy_from_slice(&(WRITE_RECORD_SIZE as i32).to_le_bytes());
        out[4..8].copy_from_slice(&self.event.0.to_le_bytes());
        out[8..].copy_from_slice(&self.value.to_le_bytes());
        out
    }
}
