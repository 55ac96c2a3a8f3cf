//! Per-variant correction pipeline
//!
//! Each correction is a plain function over a [`CorrectionContext`]. The
//! pipeline for a variant is a static slice, so adding a correction is a
//! one-line change and every function can be tested on its own.

use super::lvars::{a310, b747, fbw, kodiak100};
use super::{AircraftVariant, CommandedLights, Override, VendorCache};
use crate::schema::Field;
use crate::types::{ControlWrite, EventId, Snapshot};
use tracing::debug;

/// A single correction step.
pub type Correction = fn(&mut CorrectionContext<'_>);

/// Everything a correction may read or change during one cycle.
pub struct CorrectionContext<'a> {
    pub snapshot: &'a mut Snapshot,
    pub vendor: &'a VendorCache,
    pub commanded: &'a CommandedLights,
    pub gyro: &'a mut GyroTracker,
    pub overrides: &'a mut Vec<Override>,
    pub drift_threshold: f64,
}

impl CorrectionContext<'_> {
    /// Copy vendor values onto canonical fields, skipping values never reported.
    fn copy(&mut self, pairs: &[(&str, Field)]) {
        for (var, field) in pairs {
            if let Some(value) = self.vendor.get(var) {
                self.snapshot.set(*field, value);
            }
        }
    }
}

/// Indicated heading seen on the previous cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct GyroTracker {
    pub last: Option<f64>,
}

/// Corrections run for a variant, in order.
pub fn pipeline(variant: AircraftVariant) -> &'static [Correction] {
    match variant {
        AircraftVariant::A310 => &[
            a310_systems,
            a310_switch_positions,
            a310_heading_mode,
            a310_pitch_mode,
            a310_ils,
            a310_enforce_lights,
        ],
        AircraftVariant::FbwA32x => &[
            fbw_systems,
            fbw_autopilot,
            fbw_vertical_hold,
            fbw_brake_pedals,
        ],
        AircraftVariant::B747 => &[b747_nav_frequencies],
        AircraftVariant::Kodiak100 => &[kodiak_battery_from_load, kodiak_landing_light],
        AircraftVariant::Pa28 => &[pa28_gyro_drift],
        AircraftVariant::GenericAirliner | AircraftVariant::GenericGa => &[],
    }
}

/// Active A310 pitch modes decoded from the pitch mode variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct A310PitchModes {
    pub alt_hold: bool,
    pub level_change: bool,
    pub profile: bool,
}

impl A310PitchModes {
    pub fn decode(pitch_mode: f64) -> Self {
        let mode = pitch_mode.round() as i64;
        let alt_hold = mode == 6 || mode == 9;
        let level_change = mode == 2 || mode == 4;
        let profile = !alt_hold && !level_change && mode != 7 && mode != 8;
        Self { alt_hold, level_change, profile }
    }
}

fn a310_systems(ctx: &mut CorrectionContext<'_>) {
    ctx.copy(&[
        (a310::APU_MASTER_SW, Field::ApuMasterSw),
        (a310::APU_START, Field::ApuStart),
        (a310::APU_START_AVAIL, Field::ApuStartAvail),
        (a310::APU_BLEED, Field::ApuBleed),
        (a310::ELEC_BAT1, Field::ElecBat1),
        (a310::ELEC_BAT2, Field::ElecBat2),
        (a310::SEATBELTS_SWITCH, Field::SeatbeltSign),
        (a310::TCAS_MODE, Field::TcasMode),
        (a310::AP_AIRSPEED, Field::AutopilotAirspeed),
        (a310::AP_IS_MACH, Field::AutopilotIsMach),
        (a310::AP_HEADING, Field::AutopilotHeading),
        (a310::AP_ALTITUDE, Field::AutopilotAltitude),
        (a310::AP_VERTICAL_SPEED, Field::AutopilotVerticalSpeed),
        (a310::AUTOBRAKE, Field::Autobrake),
        (a310::FLIGHT_DIRECTOR, Field::FlightDirector),
        (a310::AUTOPILOT, Field::AutopilotEngaged),
        (a310::AUTOTHROTTLE, Field::AutothrottleArmed),
        (a310::LOCALISER, Field::AutopilotLocHold),
        (a310::APPROACH, Field::AutopilotApproachHold),
    ]);
    if let Some(handle) = ctx.vendor.get(a310::GEAR_HANDLE) {
        ctx.snapshot.set(Field::GearHandle, handle / 2.0);
    }
}

// Most A310 light switches rest at 2 when off and 0 when on
fn a310_switch_positions(ctx: &mut CorrectionContext<'_>) {
    if let Some(beacon) = ctx.vendor.get(a310::BEACON_LIGHTS) {
        ctx.snapshot.set(Field::LightBeacon, beacon);
    }
    for (var, field) in [
        (a310::LANDING_LIGHTS_L, Field::LightLanding),
        (a310::TAXI_LIGHTS, Field::LightTaxi),
        (a310::NAV_LIGHTS, Field::LightNav),
        (a310::STROBES, Field::LightStrobe),
    ] {
        if let Some(position) = ctx.vendor.get(var) {
            ctx.snapshot.set(field, if position < 1.0 { 1.0 } else { 0.0 });
        }
    }
}

fn a310_heading_mode(ctx: &mut CorrectionContext<'_>) {
    if let Some(selected) = ctx.vendor.get(a310::HEADING_MODE) {
        ctx.snapshot.set(Field::AutopilotHeadingLock, selected);
        ctx.snapshot.set(Field::ManagedHeading, 1.0 - selected);
    }
}

fn a310_pitch_mode(ctx: &mut CorrectionContext<'_>) {
    let Some(pitch_mode) = ctx.vendor.get(a310::PITCH_MODE) else {
        return;
    };
    let modes = A310PitchModes::decode(pitch_mode);
    let hold = if modes.alt_hold {
        1.0
    } else if modes.level_change || modes.profile {
        2.0
    } else {
        0.0
    };
    ctx.snapshot.set(Field::VerticalHoldMode, hold);
    ctx.snapshot.set(Field::AutopilotAltitudeLock, if modes.alt_hold { 1.0 } else { 0.0 });
    ctx.snapshot.set(Field::ManagedAltitude, if modes.profile { 1.0 } else { 0.0 });
}

fn a310_ils(ctx: &mut CorrectionContext<'_>) {
    ctx.copy(&[(a310::ILS_FREQUENCY, Field::Nav1Freq), (a310::ILS_COURSE, Field::Nav1Obs)]);
}

/// The A310 resets its light switches on its own; push back the panel's position.
fn a310_enforce_lights(ctx: &mut CorrectionContext<'_>) {
    let commanded = *ctx.commanded;
    let checks: [(&'static str, f64, Option<&'static str>); 6] = [
        (a310::BEACON_LIGHTS, commanded.beacon, None),
        (a310::LANDING_LIGHTS_L, commanded.landing, Some(a310::LANDING_LIGHTS_R)),
        (a310::TAXI_LIGHTS, commanded.taxi, None),
        (a310::TURNOFF_LIGHTS_L, commanded.turnoff, Some(a310::TURNOFF_LIGHTS_R)),
        (a310::NAV_LIGHTS, commanded.nav, None),
        (a310::STROBES, commanded.strobes, None),
    ];

    for (var, wanted, partner) in checks {
        let Some(actual) = ctx.vendor.fresh(var) else {
            continue;
        };
        if actual != wanted {
            debug!(var, actual, wanted, "Restoring commanded light position");
            ctx.overrides.push(Override::var(var, wanted));
            if let Some(partner) = partner {
                ctx.overrides.push(Override::var(partner, wanted));
            }
        }
    }
}

fn fbw_systems(ctx: &mut CorrectionContext<'_>) {
    ctx.copy(&[
        (fbw::APU_MASTER_SW, Field::ApuMasterSw),
        (fbw::APU_START, Field::ApuStart),
        (fbw::APU_START_AVAIL, Field::ApuStartAvail),
        (fbw::APU_BLEED, Field::ApuBleed),
        (fbw::ELEC_BAT1, Field::ElecBat1),
        (fbw::ELEC_BAT2, Field::ElecBat2),
        (fbw::PARK_BRAKE_POS, Field::ParkingBrake),
        (fbw::XPNDR_MODE, Field::TransponderState),
        (fbw::TCAS_MODE, Field::TcasMode),
        (fbw::AUTOBRAKE, Field::Autobrake),
        (fbw::RUDDER_PEDAL_POS, Field::RudderPosition),
        (fbw::ENGINE_EGT1, Field::EngineEgt1),
        (fbw::ENGINE_EGT2, Field::EngineEgt2),
        (fbw::ENGINE_FUEL_FLOW1, Field::FuelFlow1),
        (fbw::ENGINE_FUEL_FLOW2, Field::FuelFlow2),
        (fbw::FLAPS_INDEX, Field::FlapsIndex),
        (fbw::SPOILERS_HANDLE_POS, Field::Spoilers),
    ]);
}

fn fbw_autopilot(ctx: &mut CorrectionContext<'_>) {
    ctx.copy(&[
        (fbw::AUTOTHRUST, Field::AutothrottleArmed),
        (fbw::AUTOTHRUST_MODE, Field::AutothrustMode),
        (fbw::MANAGED_SPEED, Field::ManagedSpeed),
        (fbw::MANAGED_HEADING, Field::ManagedHeading),
        (fbw::MANAGED_ALTITUDE, Field::ManagedAltitude),
        (fbw::LATERAL_MODE, Field::LateralMode),
        (fbw::VERTICAL_MODE, Field::VerticalMode),
        (fbw::LOC_MODE, Field::AutopilotLocHold),
        (fbw::APPR_MODE, Field::AutopilotApproachHold),
        (fbw::AUTOPILOT_VS, Field::AutopilotVerticalSpeed),
    ]);

    let ap1 = ctx.vendor.get(fbw::AUTOPILOT_1);
    let ap2 = ctx.vendor.get(fbw::AUTOPILOT_2);
    if ap1.is_some() || ap2.is_some() {
        let engaged = ap1.unwrap_or(0.0) != 0.0 || ap2.unwrap_or(0.0) != 0.0;
        ctx.snapshot.set(Field::AutopilotEngaged, if engaged { 1.0 } else { 0.0 });
    }

    // Negative while the FCU heading window shows dashes
    if let Some(heading) = ctx.vendor.get(fbw::AUTOPILOT_HDG).filter(|h| *h >= 0.0) {
        ctx.snapshot.set(Field::AutopilotHeading, heading);
    }
}

fn fbw_vertical_hold(ctx: &mut CorrectionContext<'_>) {
    let Some(mode) = ctx.vendor.get(fbw::VERTICAL_MODE) else {
        return;
    };
    let altitude_holds = [
        fbw::VERTICAL_ALT,
        fbw::VERTICAL_ALT_CPT,
        fbw::VERTICAL_ALT_CST,
        fbw::VERTICAL_ALT_CST_CPT,
    ];
    let level_changes =
        [fbw::VERTICAL_OP_CLB, fbw::VERTICAL_OP_DES, fbw::VERTICAL_CLB, fbw::VERTICAL_DES];
    let hold = if altitude_holds.contains(&mode) {
        1.0
    } else if level_changes.contains(&mode) {
        2.0
    } else {
        0.0
    };
    ctx.snapshot.set(Field::VerticalHoldMode, hold);
}

fn fbw_brake_pedals(ctx: &mut CorrectionContext<'_>) {
    if let (Some(left), Some(right)) =
        (ctx.vendor.get(fbw::LEFT_BRAKE_PEDAL), ctx.vendor.get(fbw::RIGHT_BRAKE_PEDAL))
    {
        ctx.snapshot.set(Field::BrakePedal, (left + right) / 2.0);
    }
}

fn b747_nav_frequencies(ctx: &mut CorrectionContext<'_>) {
    let pairs = [
        (b747::NAV1_ACTIVE_MHZ, b747::NAV1_ACTIVE_KHZ, Field::Nav1Freq),
        (b747::NAV1_STANDBY_MHZ, b747::NAV1_STANDBY_KHZ, Field::Nav1Standby),
    ];
    for (mhz, khz, field) in pairs {
        if let (Some(mhz), Some(khz)) = (ctx.vendor.get(mhz), ctx.vendor.get(khz)) {
            ctx.snapshot.set(field, mhz + khz / 100.0);
        }
    }
}

fn kodiak_battery_from_load(ctx: &mut CorrectionContext<'_>) {
    let load = ctx.snapshot.get(Field::ElecLoad);
    ctx.snapshot.set(Field::ElecBat1, if load > 0.0 { 1.0 } else { 0.0 });
}

fn kodiak_landing_light(ctx: &mut CorrectionContext<'_>) {
    if let Some(position) = ctx.vendor.get(kodiak100::LANDING_LIGHT) {
        ctx.snapshot.set(Field::LightLanding, if position > 0.0 { 1.0 } else { 0.0 });
    }
}

/// Reset the heading gyro when the indicated heading jumps between cycles.
fn pa28_gyro_drift(ctx: &mut CorrectionContext<'_>) {
    let indicated = ctx.snapshot.get(Field::HeadingIndicated);
    let magnetic = ctx.snapshot.get(Field::HeadingMagnetic);

    let jumped = ctx
        .gyro
        .last
        .is_some_and(|last| heading_difference(indicated, last) > ctx.drift_threshold);

    if jumped {
        debug!(indicated, magnetic, "Heading gyro drifted, resetting to magnetic");
        ctx.overrides.push(Override::Host(ControlWrite::new(EventId::HEADING_GYRO_SET, magnetic)));
        ctx.snapshot.set(Field::HeadingIndicated, magnetic);
        ctx.gyro.last = Some(magnetic);
    } else {
        ctx.gyro.last = Some(indicated);
    }
}

/// Smallest angle between two headings in degrees.
fn heading_difference(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}
