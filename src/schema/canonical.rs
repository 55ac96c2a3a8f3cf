//! Canonical field table

use crate::types::{FieldId, FieldKind, FieldOrigin};

macro_rules! canonical_fields {
    ($( $variant:ident => $name:literal, $kind:ident, $origin:ident; )+) => {
        /// Every canonical field, in wire order.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(usize)]
        pub enum Field {
            $( $variant, )+
        }

        impl Field {
            pub const ALL: &'static [Field] = &[ $( Field::$variant, )+ ];

            pub const fn name(self) -> &'static str {
                match self {
                    $( Field::$variant => $name, )+
                }
            }

            pub const fn kind(self) -> FieldKind {
                match self {
                    $( Field::$variant => FieldKind::$kind, )+
                }
            }

            pub const fn origin(self) -> FieldOrigin {
                match self {
                    $( Field::$variant => FieldOrigin::$origin, )+
                }
            }
        }
    };
}

canonical_fields! {
    Connected => "connected", Float64, Link;

    // lights channel
    AvionicsMaster => "avionics_master", Float64, Host;
    ElecBat1 => "elec_bat1", Float64, Host;
    ElecBat2 => "elec_bat2", Float64, Host;
    ElecLoad => "elec_load", Float64, Host;
    ApuMasterSw => "apu_master_sw", Float64, Host;
    ApuStart => "apu_start", Float64, Host;
    ApuStartAvail => "apu_start_avail", Float64, Host;
    ApuBleed => "apu_bleed", Float64, Host;
    LightBeacon => "light_beacon", Float64, Host;
    LightLanding => "light_landing", Float64, Host;
    LightTaxi => "light_taxi", Float64, Host;
    LightNav => "light_nav", Float64, Host;
    SeatbeltSign => "seatbelt_sign", Float64, Host;
    LightStrobe => "light_strobe", Float64, Host;

    // radio channel
    Com1Freq => "com1_freq", Float64, Host;
    Com1Standby => "com1_standby", Float64, Host;
    Com2Freq => "com2_freq", Float64, Host;
    Com2Standby => "com2_standby", Float64, Host;
    Nav1Freq => "nav1_freq", Float64, Host;
    Nav1Standby => "nav1_standby", Float64, Host;
    Nav1Obs => "nav1_obs", Float64, Host;
    Nav2Freq => "nav2_freq", Float64, Host;
    Nav2Standby => "nav2_standby", Float64, Host;
    AdfFreq => "adf_freq", Float64, Host;
    TransponderCode => "transponder_code", Float64, Host;
    TransponderState => "transponder_state", Float64, Host;
    TcasMode => "tcas_mode", Float64, Host;

    // autopilot channel
    AutopilotAvailable => "autopilot_available", Float64, Host;
    AutopilotEngaged => "autopilot_engaged", Float64, Host;
    FlightDirector => "flight_director", Float64, Host;
    AutothrottleArmed => "autothrottle_armed", Float64, Host;
    AutopilotHeading => "autopilot_heading", Float64, Host;
    AutopilotHeadingLock => "autopilot_heading_lock", Float64, Host;
    AutopilotAltitude => "autopilot_altitude", Float64, Host;
    AutopilotAltitudeLock => "autopilot_altitude_lock", Float64, Host;
    AutopilotVerticalSpeed => "autopilot_vertical_speed", Float64, Host;
    AutopilotVsHold => "autopilot_vs_hold", Float64, Host;
    AutopilotAirspeed => "autopilot_airspeed", Float64, Host;
    AutopilotMach => "autopilot_mach", Float64, Host;
    AutopilotIsMach => "autopilot_is_mach", Float64, Host;
    AutopilotLocHold => "autopilot_loc_hold", Float64, Host;
    AutopilotApproachHold => "autopilot_approach_hold", Float64, Host;
    ManagedSpeed => "managed_speed", Float64, Host;
    ManagedHeading => "managed_heading", Float64, Host;
    ManagedAltitude => "managed_altitude", Float64, Host;
    VerticalHoldMode => "vertical_hold_mode", Float64, Host;
    LateralMode => "lateral_mode", Float64, Host;
    VerticalMode => "vertical_mode", Float64, Host;
    AutothrustMode => "autothrust_mode", Float64, Host;

    // instruments channel
    Altitude => "altitude", Float64, Host;
    AltitudeAgl => "altitude_agl", Float64, Host;
    Latitude => "latitude", Float64, Host;
    Longitude => "longitude", Float64, Host;
    Kohlsman => "kohlsman", Float64, Host;
    Pitch => "pitch", Float64, Host;
    Bank => "bank", Float64, Host;
    AirspeedIndicated => "airspeed_indicated", Float64, Host;
    AirspeedTrue => "airspeed_true", Float64, Host;
    Mach => "mach", Float64, Host;
    Heading => "heading", Float64, Host;
    HeadingMagnetic => "heading_magnetic", Float64, Host;
    HeadingIndicated => "heading_indicated", Float64, Host;
    VerticalSpeed => "vertical_speed", Float64, Host;
    TurnRate => "turn_rate", Float64, Host;
    Slip => "slip", Float64, Host;
    Trim => "trim", Float64, Host;
    FlapsIndex => "flaps_index", Float64, Host;
    Spoilers => "spoilers", Float64, Host;
    GearPosition => "gear_position", Float64, Host;
    GearHandle => "gear_handle", Float64, Host;
    Autobrake => "autobrake", Float64, Host;
    ParkingBrake => "parking_brake", Float64, Host;
    BrakePedal => "brake_pedal", Float64, Host;
    RudderPosition => "rudder_position", Float64, Host;
    EngineRpm => "engine_rpm", Float64, Host;
    EngineEgt1 => "engine_egt1", Float64, Host;
    EngineEgt2 => "engine_egt2", Float64, Host;
    FuelFlow1 => "fuel_flow1", Float64, Host;
    FuelFlow2 => "fuel_flow2", Float64, Host;
    FuelQuantity => "fuel_quantity", Float64, Host;
    FuelTankSelector => "fuel_tank_selector", Float64, Host;
    OnGround => "on_ground", Float64, Host;
    PushbackState => "pushback_state", Float64, Host;
    SimRate => "sim_rate", Float64, Host;
    LocalTime => "local_time", Float64, Host;
    AircraftTitle => "aircraft_title", FixedString, Host;

    // derived by the engine each cycle
    FlightPhase => "flight_phase", Float64, Derived;
    LandingRate => "landing_rate", Float64, Derived;
    BoardingStage => "boarding_stage", Float64, Derived;
    LastCabinEvent => "last_cabin_event", Float64, Derived;
    AircraftVariant => "aircraft_variant", Float64, Derived;
    RudderSensitivity => "rudder_sensitivity", Float64, Derived;
}

impl From<Field> for FieldId {
    fn from(field: Field) -> Self {
        FieldId::from_index(field as usize)
    }
}
