//! Aircraft variant adapters.
//!
//! Third-party aircraft keep much of their cockpit state in vendor variables
//! instead of the simulator's standard ones. This module detects which
//! aircraft is loaded and normalizes its vendor data onto the canonical schema.
//!
//! # Design
//!
//! - **Detection** is an ordered `(pattern, variant)` table matched against the
//!   aircraft title; the first case-insensitive substring match wins
//! - **Corrections** are plain functions run in order for the detected variant,
//!   each free to read vendor values, adjust snapshot fields and queue
//!   corrective writes ([`Override`])
//! - **Control translation** turns panel writes into vendor variable writes
//!   for aircraft that ignore the standard simulator events
//!
//! Variants without an entry pass canonical fields through untouched, and a
//! vendor value that has never been reported leaves its field at the host value.
//!
//! # Example
//!
//! ```rust
//! use datalink::adapters::{AircraftVariant, detect_variant};
//!
//! assert_eq!(detect_variant("iniBuilds A310-300 Pratt & Whitney"), AircraftVariant::A310);
//! assert_eq!(detect_variant("FlyByWire A32NX"), AircraftVariant::FbwA32x);
//! assert_eq!(detect_variant("Cessna Skyhawk"), AircraftVariant::GenericGa);
//! ```

mod bridge;
mod controls;
mod corrections;
pub mod lvars;

pub use bridge::{VendorCache, parse_response, read_expression, write_expression};
pub use corrections::{Correction, CorrectionContext, GyroTracker, pipeline};

use std::fmt;
use tracing::info;

use crate::types::{ControlWrite, Snapshot};

/// Aircraft families with distinct data models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AircraftVariant {
    GenericGa = 0,
    A310 = 1,
    FbwA32x = 2,
    B747 = 3,
    Kodiak100 = 4,
    Pa28 = 5,
    GenericAirliner = 6,
}

impl AircraftVariant {
    /// Value written to the derived variant field.
    pub fn code(self) -> f64 {
        self as u8 as f64
    }

    pub fn name(self) -> &'static str {
        match self {
            AircraftVariant::GenericGa => "generic GA",
            AircraftVariant::A310 => "A310",
            AircraftVariant::FbwA32x => "FBW A32x",
            AircraftVariant::B747 => "747",
            AircraftVariant::Kodiak100 => "Kodiak 100",
            AircraftVariant::Pa28 => "PA28",
            AircraftVariant::GenericAirliner => "generic airliner",
        }
    }

    /// Vendor variables this variant needs every cycle.
    pub fn vendor_reads(self) -> &'static [&'static str] {
        match self {
            AircraftVariant::A310 => lvars::a310::READS,
            AircraftVariant::FbwA32x => lvars::fbw::READS,
            AircraftVariant::B747 => lvars::b747::READS,
            AircraftVariant::Kodiak100 => lvars::kodiak100::READS,
            AircraftVariant::Pa28
            | AircraftVariant::GenericAirliner
            | AircraftVariant::GenericGa => &[],
        }
    }
}

impl fmt::Display for AircraftVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Title patterns in match order. Specific aircraft come before the generic
/// airliner patterns that would also match them.
pub const VARIANT_PATTERNS: &[(&str, AircraftVariant)] = &[
    ("a310", AircraftVariant::A310),
    ("a32nx", AircraftVariant::FbwA32x),
    ("flybywire", AircraftVariant::FbwA32x),
    ("a380x", AircraftVariant::FbwA32x),
    ("747", AircraftVariant::B747),
    ("b748", AircraftVariant::B747),
    ("kodiak", AircraftVariant::Kodiak100),
    ("pa28", AircraftVariant::Pa28),
    ("pa-28", AircraftVariant::Pa28),
    ("piper warrior", AircraftVariant::Pa28),
    ("airbus", AircraftVariant::GenericAirliner),
    ("boeing", AircraftVariant::GenericAirliner),
    ("a320", AircraftVariant::GenericAirliner),
    ("737", AircraftVariant::GenericAirliner),
    ("787", AircraftVariant::GenericAirliner),
    ("crj", AircraftVariant::GenericAirliner),
    ("embraer", AircraftVariant::GenericAirliner),
];

/// Detect the variant from an aircraft title.
pub fn detect_variant(title: &str) -> AircraftVariant {
    let title = title.to_ascii_lowercase();
    VARIANT_PATTERNS
        .iter()
        .find(|(pattern, _)| title.contains(pattern))
        .map(|(_, variant)| *variant)
        .unwrap_or(AircraftVariant::GenericGa)
}

/// Re-detects the variant each cycle and reports changes.
#[derive(Debug, Default, Clone)]
pub struct VariantTracker {
    current: Option<AircraftVariant>,
}

impl VariantTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<AircraftVariant> {
        self.current
    }

    /// Detect from the title; returns the variant and whether it changed.
    pub fn observe(&mut self, title: &str) -> (AircraftVariant, bool) {
        let variant = detect_variant(title);
        let changed = self.current != Some(variant);
        if changed {
            info!(title, variant = %variant, "Aircraft changed");
            self.current = Some(variant);
        }
        (variant, changed)
    }

    pub fn reset(&mut self) {
        self.current = None;
    }
}

/// A corrective or translated write produced by an adapter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Override {
    /// Set a vendor variable through the RPN bridge
    Var { name: &'static str, value: f64 },
    /// Send a standard event to the simulator
    Host(ControlWrite),
}

impl Override {
    pub fn var(name: &'static str, value: f64) -> Self {
        Override::Var { name, value }
    }
}

/// Light positions last commanded from the panel for aircraft whose light
/// switches drift away from the commanded position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommandedLights {
    pub beacon: f64,
    pub landing: f64,
    pub taxi: f64,
    pub turnoff: f64,
    pub nav: f64,
    pub strobes: f64,
}

impl Default for CommandedLights {
    // A310 switch positions with everything off
    fn default() -> Self {
        Self { beacon: 0.0, landing: 2.0, taxi: 2.0, turnoff: 0.0, nav: 2.0, strobes: 2.0 }
    }
}

/// Per-aircraft adapter state: vendor values, commanded lights and gyro history.
#[derive(Debug, Clone)]
pub struct VariantAdapter {
    vendor: VendorCache,
    commanded: CommandedLights,
    gyro: GyroTracker,
    drift_threshold: f64,
}

impl VariantAdapter {
    /// `drift_threshold` is the indicated-heading jump (degrees) that triggers a gyro reset.
    pub fn new(drift_threshold: f64) -> Self {
        Self {
            vendor: VendorCache::new(),
            commanded: CommandedLights::default(),
            gyro: GyroTracker::default(),
            drift_threshold,
        }
    }

    /// Forget everything learned about the previous aircraft.
    pub fn reset(&mut self) {
        self.vendor.clear();
        self.commanded = CommandedLights::default();
        self.gyro = GyroTracker::default();
    }

    pub fn vendor(&self) -> &VendorCache {
        &self.vendor
    }

    pub fn vendor_mut(&mut self) -> &mut VendorCache {
        &mut self.vendor
    }

    pub fn commanded(&self) -> &CommandedLights {
        &self.commanded
    }

    /// Run the correction pipeline for a variant over the snapshot.
    pub fn apply(&mut self, variant: AircraftVariant, snapshot: &mut Snapshot) -> Vec<Override> {
        let mut overrides = Vec::new();
        let mut ctx = CorrectionContext {
            snapshot,
            vendor: &self.vendor,
            commanded: &self.commanded,
            gyro: &mut self.gyro,
            overrides: &mut overrides,
            drift_threshold: self.drift_threshold,
        };
        for correction in pipeline(variant) {
            correction(&mut ctx);
        }
        overrides
    }

    /// Translate a panel write for aircraft that need vendor variables.
    ///
    /// `None` means the write is not intercepted and should go to the
    /// simulator unchanged. `Some` may be empty when the write only updates
    /// adapter state.
    pub fn translate(
        &mut self,
        variant: AircraftVariant,
        write: ControlWrite,
    ) -> Option<Vec<Override>> {
        controls::translate(variant, write, &self.vendor, &mut self.commanded)
    }
}
