//! Panel control translation for aircraft that ignore standard simulator events

use super::corrections::A310PitchModes;
use super::lvars::{a310, fbw, kodiak100};
use super::{AircraftVariant, CommandedLights, Override, VendorCache};
use crate::types::{ControlWrite, EventId};

/// Translate a panel write into vendor variable writes.
///
/// Returns `None` when the write should reach the simulator unchanged.
pub(super) fn translate(
    variant: AircraftVariant,
    write: ControlWrite,
    vendor: &VendorCache,
    commanded: &mut CommandedLights,
) -> Option<Vec<Override>> {
    match variant {
        AircraftVariant::A310 => translate_a310(write, vendor, commanded),
        AircraftVariant::FbwA32x => translate_fbw(write),
        AircraftVariant::Kodiak100 => translate_kodiak(write),
        _ => None,
    }
}

fn set(name: &'static str, value: f64) -> Option<Vec<Override>> {
    Some(vec![Override::var(name, value)])
}

fn press(name: &'static str) -> Option<Vec<Override>> {
    set(name, 1.0)
}

fn translate_a310(
    write: ControlWrite,
    vendor: &VendorCache,
    commanded: &mut CommandedLights,
) -> Option<Vec<Override>> {
    let value = write.value;
    match write.event {
        EventId::APU_OFF_SWITCH => set(a310::APU_MASTER_SW, value),
        EventId::APU_STARTER => set(a310::APU_START, value),
        EventId::BLEED_AIR_SOURCE_CONTROL_SET => set(a310::APU_BLEED, value),
        EventId::ELEC_BAT1 => set(a310::ELEC_BAT1, value),
        EventId::ELEC_BAT2 => Some(vec![
            Override::var(a310::ELEC_BAT2, value),
            Override::var(a310::ELEC_BAT3, value),
        ]),
        EventId::CABIN_SEATBELTS_ALERT_SWITCH_TOGGLE => {
            let current = vendor.get(a310::SEATBELTS_SWITCH).unwrap_or(0.0);
            set(a310::SEATBELTS_SWITCH, 1.0 - current)
        }

        EventId::BEACON_LIGHTS_SET => {
            commanded.beacon = value;
            set(a310::BEACON_LIGHTS, commanded.beacon)
        }
        EventId::LANDING_LIGHTS_SET => {
            commanded.landing = 2.0 - 2.0 * value;
            Some(vec![
                Override::var(a310::LANDING_LIGHTS_L, commanded.landing),
                Override::var(a310::LANDING_LIGHTS_R, commanded.landing),
            ])
        }
        // One panel switch drives both taxi and runway turnoff lights
        EventId::TAXI_LIGHTS_SET => {
            commanded.taxi = 2.0 - 2.0 * value;
            commanded.turnoff = value;
            Some(vec![
                Override::var(a310::TAXI_LIGHTS, commanded.taxi),
                Override::var(a310::TURNOFF_LIGHTS_L, commanded.turnoff),
                Override::var(a310::TURNOFF_LIGHTS_R, commanded.turnoff),
            ])
        }
        EventId::NAV_LIGHTS_SET => {
            commanded.nav = 2.0 - 2.0 * value;
            set(a310::NAV_LIGHTS, commanded.nav)
        }
        EventId::STROBES_SET => {
            commanded.strobes = 2.0 - 2.0 * value;
            set(a310::STROBES, commanded.strobes)
        }

        EventId::XPNDR_HIGH_SET => {
            press(if value == 1.0 { a310::XPNDR_HIGH_INC } else { a310::XPNDR_HIGH_DEC })
        }
        EventId::XPNDR_LOW_SET => {
            press(if value == 1.0 { a310::XPNDR_LOW_INC } else { a310::XPNDR_LOW_DEC })
        }
        EventId::XPNDR_STATE => set(a310::TCAS_MODE, value),

        EventId::AP_SPD_VAR_SET => set(a310::AP_AIRSPEED, value),
        EventId::AP_AIRSPEED_ON | EventId::AP_MACH_OFF => set(a310::AP_IS_MACH, 0.0),
        EventId::AP_AIRSPEED_OFF | EventId::AP_MACH_ON => set(a310::AP_IS_MACH, 1.0),
        EventId::HEADING_BUG_SET => set(a310::AP_HEADING, value),
        EventId::AP_ALT_VAR_SET_ENGLISH => set(a310::AP_ALTITUDE, value),
        EventId::AP_VS_VAR_SET_ENGLISH => set(a310::AP_VERTICAL_SPEED, value),
        EventId::AUTOBRAKE => set(a310::AUTOBRAKE, value),
        EventId::GEAR_SET => set(a310::GEAR_HANDLE, value * 2.0),
        EventId::TOGGLE_FLIGHT_DIRECTOR => set(a310::FLIGHT_DIRECTOR, value),
        EventId::AP_MASTER => {
            press(if value == 0.0 { a310::AUTOPILOT_OFF } else { a310::AUTOPILOT_ON })
        }
        EventId::AUTO_THROTTLE_ARM => set(a310::AUTOTHROTTLE, value),
        EventId::AP_LOC_HOLD => press(a310::LOCALISER_TOGGLE),
        EventId::AP_APR_HOLD_ON | EventId::AP_APR_HOLD_OFF => press(a310::APPROACH_TOGGLE),

        EventId::AP_SPEED_SLOT_INDEX_SET => {
            let modes = pitch_modes(vendor);
            let profile = if modes.profile { 1.0 } else { 0.0 };
            if profile != value - 1.0 { press(a310::PROFILE_TOGGLE) } else { Some(Vec::new()) }
        }
        EventId::AP_VS_SLOT_INDEX_SET | EventId::AP_VS_SET => {
            // Vertical speed engages once every other pitch hold is released
            let modes = pitch_modes(vendor);
            let toggles = [
                (modes.alt_hold, a310::ALT_HOLD_TOGGLE),
                (modes.level_change, a310::LEVEL_CHANGE_TOGGLE),
                (modes.profile, a310::PROFILE_TOGGLE),
            ];
            Some(
                toggles
                    .into_iter()
                    .filter(|(active, _)| *active)
                    .map(|(_, var)| Override::var(var, 1.0))
                    .collect(),
            )
        }
        EventId::AP_HEADING_SLOT_INDEX_SET => match value as i64 {
            1 => press(a310::SELECTED_HEADING),
            2 => press(a310::MANAGED_HEADING),
            _ => Some(Vec::new()),
        },

        EventId::NAV1_STBY_SET => {
            let (mhz, khz) = split_frequency(value);
            Some(vec![
                Override::var(a310::ILS_SET_FREQUENCY_MHZ, mhz),
                Override::var(a310::ILS_SET_FREQUENCY_KHZ, khz),
            ])
        }
        EventId::VOR1_SET => set(a310::ILS_COURSE, value),

        _ => None,
    }
}

fn pitch_modes(vendor: &VendorCache) -> A310PitchModes {
    A310PitchModes::decode(vendor.get(a310::PITCH_MODE).unwrap_or(0.0))
}

/// Split a frequency such as 110.35 into whole MHz and hundredths.
fn split_frequency(value: f64) -> (f64, f64) {
    let mhz = value.trunc();
    let khz = ((0.005 + value - mhz) * 100.0).trunc();
    (mhz, khz)
}

fn translate_fbw(write: ControlWrite) -> Option<Vec<Override>> {
    let value = write.value;
    match write.event {
        EventId::APU_OFF_SWITCH => set(fbw::APU_MASTER_SW, value),
        EventId::APU_STARTER => set(fbw::APU_START, value),
        EventId::BLEED_AIR_SOURCE_CONTROL_SET => set(fbw::APU_BLEED, value),
        EventId::ELEC_BAT1 => set(fbw::ELEC_BAT1, value),
        EventId::ELEC_BAT2 => set(fbw::ELEC_BAT2, value),
        EventId::AUTOBRAKE => set(fbw::AUTOBRAKE, value),
        EventId::XPNDR_STATE => set(fbw::XPNDR_MODE, value),
        _ => None,
    }
}

fn translate_kodiak(write: ControlWrite) -> Option<Vec<Override>> {
    let value = write.value;
    match write.event {
        EventId::TANK_SELECT_1 => set(kodiak100::TANK_SELECTOR_1, value),
        EventId::TANK_SELECT_2 => set(kodiak100::TANK_SELECTOR_2, value),
        EventId::LANDING_LIGHTS_SET => set(kodiak100::LANDING_LIGHT, value * 2.0),
        _ => None,
    }
}
