//! Vendor local variables read and written through the RPN bridge
//!
//! Names carry their unit suffix exactly as the bridge expects them.

pub mod a310 {
    pub const APU_MASTER_SW: &str = "L:A310_apu_master_switch, bool";
    pub const APU_START: &str = "L:A310_apu_start_button, bool";
    pub const APU_START_AVAIL: &str = "L:A310_apu_available, bool";
    pub const APU_BLEED: &str = "L:A310_apu_bleed, bool";
    pub const ELEC_BAT1: &str = "L:A310_bat1_on, bool";
    pub const ELEC_BAT2: &str = "L:A310_bat2_on, bool";
    pub const ELEC_BAT3: &str = "L:A310_bat3_on, bool";
    pub const SEATBELTS_SWITCH: &str = "L:A310_seatbelts_switch, bool";
    pub const BEACON_LIGHTS: &str = "L:A310_BEACON_LIGHT_SWITCH, number";
    pub const LANDING_LIGHTS_L: &str = "L:A310_LANDING_LIGHT_L_SWITCH, number";
    pub const LANDING_LIGHTS_R: &str = "L:A310_LANDING_LIGHT_R_SWITCH, number";
    pub const TAXI_LIGHTS: &str = "L:A310_TAXI_LIGHTS_SWITCH, number";
    pub const TURNOFF_LIGHTS_L: &str = "L:A310_RWY_TURNOFF_L_SWITCH, number";
    pub const TURNOFF_LIGHTS_R: &str = "L:A310_RWY_TURNOFF_R_SWITCH, number";
    pub const NAV_LIGHTS: &str = "L:A310_NAV_LOGO_LIGHT_SWITCH, number";
    pub const STROBES: &str = "L:A310_POTENTIOMETER_24, number";
    pub const TCAS_MODE: &str = "L:A310_TCAS_MODE_PEDESTAL, number";
    pub const XPNDR_HIGH_INC: &str = "L:A310_TRANSPONDER_OUTER_KNOB_TURNED_CLOCKWISE, number";
    pub const XPNDR_HIGH_DEC: &str = "L:A310_TRANSPONDER_OUTER_KNOB_TURNED_ANTICLOCKWISE, number";
    pub const XPNDR_LOW_INC: &str = "L:A310_TRANSPONDER_INNER_KNOB_TURNED_CLOCKWISE, number";
    pub const XPNDR_LOW_DEC: &str = "L:A310_TRANSPONDER_INNER_KNOB_TURNED_ANTICLOCKWISE, number";
    pub const AP_AIRSPEED: &str = "L:A310_AIRSPEED_DIAL, number";
    pub const AP_IS_MACH: &str = "L:A310_AIRSPEED_IS_MACH, number";
    pub const AP_HEADING: &str = "L:A310_HEADING_DIAL, number";
    pub const AP_ALTITUDE: &str = "L:A310_ALTITUDE_DIAL, number";
    pub const AP_VERTICAL_SPEED: &str = "L:A310_VVI_DIAL, number";
    pub const AUTOBRAKE: &str = "L:A310_AUTOBRAKE_LEVEL, Number";
    pub const GEAR_HANDLE: &str = "L:A310_GEAR_HANDLE_STATUS, Number";
    pub const FLIGHT_DIRECTOR: &str = "L:A310_FPV_ON, Number";
    pub const AUTOPILOT: &str = "L:A310_AP_ON, Number";
    pub const AUTOPILOT_ON: &str = "L:A310_AP1_BUTTON, Number";
    pub const AUTOPILOT_OFF: &str = "L:A310_AP_DISCONNECT_BUTTON, Number";
    pub const AUTOTHROTTLE: &str = "L:A310_AT_ON, Number";
    pub const LOCALISER: &str = "L:A310_LOCALIZER_BUTTON, Number";
    pub const LOCALISER_TOGGLE: &str = "L:AP6_BUTTON, Number";
    pub const APPROACH: &str = "L:A310_APPROACH_BUTTON, Number";
    pub const APPROACH_TOGGLE: &str = "L:AP7_BUTTON, Number";
    pub const PITCH_MODE: &str = "L:A310_PITCH_MODE, Number";
    pub const ALT_HOLD_TOGGLE: &str = "L:AP9_BUTTON, Number";
    pub const LEVEL_CHANGE_TOGGLE: &str = "L:AP2_BUTTON, Number";
    pub const PROFILE_TOGGLE: &str = "L:AP3_BUTTON, Number";
    pub const HEADING_MODE: &str = "L:A310_MCU_HDG_SEL_LIGHT, Number";
    pub const SELECTED_HEADING: &str = "L:A310_FCU_SELECTED_HEADING_BUTTON, Number";
    pub const MANAGED_HEADING: &str = "L:A310_FCU_MANAGED_HEADING_BUTTON, Number";
    pub const ILS_FREQUENCY: &str = "L:A310_ILS_FREQUENCY, Number";
    pub const ILS_SET_FREQUENCY_MHZ: &str = "L:A310_ILS_FREQUENCY_MHZ, Number";
    pub const ILS_SET_FREQUENCY_KHZ: &str = "L:A310_ILS_FREQUENCY_KHZ, Number";
    pub const ILS_COURSE: &str = "L:A310_ILS_COURSE, Number";

    pub const READS: &[&str] = &[
        APU_MASTER_SW,
        APU_START,
        APU_START_AVAIL,
        APU_BLEED,
        ELEC_BAT1,
        ELEC_BAT2,
        SEATBELTS_SWITCH,
        BEACON_LIGHTS,
        LANDING_LIGHTS_L,
        TAXI_LIGHTS,
        TURNOFF_LIGHTS_L,
        NAV_LIGHTS,
        STROBES,
        TCAS_MODE,
        AP_AIRSPEED,
        AP_IS_MACH,
        AP_HEADING,
        AP_ALTITUDE,
        AP_VERTICAL_SPEED,
        AUTOBRAKE,
        FLIGHT_DIRECTOR,
        AUTOPILOT,
        AUTOTHROTTLE,
        LOCALISER,
        APPROACH,
        HEADING_MODE,
        PITCH_MODE,
        GEAR_HANDLE,
        ILS_FREQUENCY,
        ILS_COURSE,
    ];
}

pub mod fbw {
    pub const APU_MASTER_SW: &str = "L:A32NX_OVHD_APU_MASTER_SW_PB_IS_ON, bool";
    pub const APU_START: &str = "L:A32NX_OVHD_APU_START_PB_IS_ON, bool";
    pub const APU_START_AVAIL: &str = "L:A32NX_OVHD_APU_START_PB_IS_AVAILABLE, bool";
    pub const APU_BLEED: &str = "L:A32NX_OVHD_PNEU_APU_BLEED_PB_IS_ON, bool";
    pub const ELEC_BAT1: &str = "L:A32NX_OVHD_ELEC_BAT_1_PB_IS_AUTO, bool";
    pub const ELEC_BAT2: &str = "L:A32NX_OVHD_ELEC_BAT_2_PB_IS_AUTO, bool";
    pub const PARK_BRAKE_POS: &str = "L:A32NX_PARK_BRAKE_LEVER_POS, bool";
    pub const XPNDR_MODE: &str = "L:A32NX_TRANSPONDER_MODE, enum";
    pub const AUTOPILOT_1: &str = "L:A32NX_AUTOPILOT_1_ACTIVE, bool";
    pub const AUTOPILOT_2: &str = "L:A32NX_AUTOPILOT_2_ACTIVE, bool";
    pub const AUTOTHRUST: &str = "L:A32NX_AUTOTHRUST_STATUS, enum";
    pub const TCAS_MODE: &str = "L:A32NX_TCAS_MODE, enum";
    pub const AUTOPILOT_HDG: &str = "L:A32NX_AUTOPILOT_HEADING_SELECTED, degrees";
    pub const AUTOPILOT_VS: &str = "L:A32NX_AUTOPILOT_VS_SELECTED, feetperminute";
    pub const MANAGED_SPEED: &str = "L:A32NX_FCU_SPD_MANAGED_DASHES, bool";
    pub const MANAGED_HEADING: &str = "L:A32NX_FCU_HDG_MANAGED_DASHES, bool";
    pub const MANAGED_ALTITUDE: &str = "L:A32NX_FCU_ALT_MANAGED, bool";
    pub const LATERAL_MODE: &str = "L:A32NX_FMA_LATERAL_MODE, enum";
    pub const VERTICAL_MODE: &str = "L:A32NX_FMA_VERTICAL_MODE, enum";
    pub const LOC_MODE: &str = "L:A32NX_FCU_LOC_MODE_ACTIVE, bool";
    pub const APPR_MODE: &str = "L:A32NX_FCU_APPR_MODE_ACTIVE, bool";
    pub const AUTOTHRUST_MODE: &str = "L:A32NX_AUTOTHRUST_MODE, enum";
    pub const AUTOBRAKE: &str = "L:A32NX_AUTOBRAKES_ARMED_MODE, bool";
    pub const LEFT_BRAKE_PEDAL: &str = "L:A32NX_LEFT_BRAKE_PEDAL_INPUT, percent";
    pub const RIGHT_BRAKE_PEDAL: &str = "L:A32NX_RIGHT_BRAKE_PEDAL_INPUT, percent";
    pub const RUDDER_PEDAL_POS: &str = "L:A32NX_RUDDER_PEDAL_POSITION, number";
    pub const ENGINE_EGT1: &str = "L:A32NX_ENGINE_EGT:1, number";
    pub const ENGINE_EGT2: &str = "L:A32NX_ENGINE_EGT:2, number";
    pub const ENGINE_FUEL_FLOW1: &str = "L:A32NX_ENGINE_FF:1, number";
    pub const ENGINE_FUEL_FLOW2: &str = "L:A32NX_ENGINE_FF:2, number";
    pub const FLAPS_INDEX: &str = "L:A32NX_FLAPS_HANDLE_INDEX, number";
    pub const SPOILERS_HANDLE_POS: &str = "L:A32NX_SPOILERS_HANDLE_POSITION, number";

    pub const READS: &[&str] = &[
        APU_MASTER_SW,
        APU_START,
        APU_START_AVAIL,
        APU_BLEED,
        ELEC_BAT1,
        ELEC_BAT2,
        FLAPS_INDEX,
        PARK_BRAKE_POS,
        SPOILERS_HANDLE_POS,
        XPNDR_MODE,
        AUTOPILOT_1,
        AUTOPILOT_2,
        AUTOTHRUST,
        TCAS_MODE,
        MANAGED_SPEED,
        MANAGED_HEADING,
        MANAGED_ALTITUDE,
        LATERAL_MODE,
        VERTICAL_MODE,
        LOC_MODE,
        APPR_MODE,
        AUTOTHRUST_MODE,
        AUTOBRAKE,
        LEFT_BRAKE_PEDAL,
        RIGHT_BRAKE_PEDAL,
        RUDDER_PEDAL_POS,
        AUTOPILOT_HDG,
        AUTOPILOT_VS,
        ENGINE_EGT1,
        ENGINE_EGT2,
        ENGINE_FUEL_FLOW1,
        ENGINE_FUEL_FLOW2,
    ];

    // FMA vertical mode codes
    pub const VERTICAL_ALT: f64 = 10.0;
    pub const VERTICAL_ALT_CPT: f64 = 11.0;
    pub const VERTICAL_OP_CLB: f64 = 12.0;
    pub const VERTICAL_OP_DES: f64 = 13.0;
    pub const VERTICAL_ALT_CST: f64 = 20.0;
    pub const VERTICAL_ALT_CST_CPT: f64 = 21.0;
    pub const VERTICAL_CLB: f64 = 22.0;
    pub const VERTICAL_DES: f64 = 23.0;
}

pub mod b747 {
    pub const NAV1_ACTIVE_MHZ: &str = "L:B747_8_NAV1_ACTIVE_MHZ, number";
    pub const NAV1_ACTIVE_KHZ: &str = "L:B747_8_NAV1_ACTIVE_KHZ, number";
    pub const NAV1_STANDBY_MHZ: &str = "L:B747_8_NAV1_STANDBY_MHZ, number";
    pub const NAV1_STANDBY_KHZ: &str = "L:B747_8_NAV1_STANDBY_KHZ, number";

    pub const READS: &[&str] =
        &[NAV1_ACTIVE_MHZ, NAV1_ACTIVE_KHZ, NAV1_STANDBY_MHZ, NAV1_STANDBY_KHZ];
}

pub mod kodiak100 {
    pub const TANK_SELECTOR_1: &str = "L:SWS_Kodiak_TankSelector_1, bool";
    pub const TANK_SELECTOR_2: &str = "L:SWS_Kodiak_TankSelector_2, bool";
    pub const LANDING_LIGHT: &str = "L:SWS_LIGHTING_Switch_Light_Landing, number";

    pub const READS: &[&str] = &[LANDING_LIGHT];
}
