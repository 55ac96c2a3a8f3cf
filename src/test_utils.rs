//! Test utilities for schema fixtures and host block construction
//!
//! Shared by unit tests and the benchmarks, so everything here is built from
//! the public API only.

#![cfg(any(test, feature = "benchmark"))]

use std::sync::Arc;

use crate::schema::{Field, canonical_schema};
use crate::types::{ChannelId, FieldDescriptor, FieldKind, FieldOrigin, Schema, Snapshot};

/// A compact schema with one field of every origin and kind.
///
/// | field        | offset | channel end |
/// |--------------|--------|-------------|
/// | connected    | 0      |             |
/// | avionics     | 8      |             |
/// | beacon       | 16     | lights (24) |
/// | com1         | 24     |             |
/// | com2         | 32     | radio (40)  |
/// | heading_bug  | 40     | autopilot (48) |
/// | title        | 48     |             |
/// | phase        | 80     | total (88)  |
pub fn small_schema() -> Schema {
    let ends = [
        (ChannelId::Lights, "beacon"),
        (ChannelId::Radio, "com2"),
        (ChannelId::Autopilot, "heading_bug"),
    ];
    Schema::new(small_fields(), &ends).unwrap_or_else(|e| panic!("small schema is invalid: {e}"))
}

fn small_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("connected", FieldKind::Float64, FieldOrigin::Link),
        FieldDescriptor::new("avionics", FieldKind::Float64, FieldOrigin::Host),
        FieldDescriptor::new("beacon", FieldKind::Float64, FieldOrigin::Host),
        FieldDescriptor::new("com1", FieldKind::Float64, FieldOrigin::Host),
        FieldDescriptor::new("com2", FieldKind::Float64, FieldOrigin::Host),
        FieldDescriptor::new("heading_bug", FieldKind::Float64, FieldOrigin::Host),
        FieldDescriptor::new("title", FieldKind::FixedString, FieldOrigin::Host),
        FieldDescriptor::new("phase", FieldKind::Float64, FieldOrigin::Derived),
    ]
}

/// Host fields of [`small_schema`], in registration order.
pub fn small_host_fields() -> Vec<FieldDescriptor> {
    small_fields().into_iter().filter(|f| f.origin == FieldOrigin::Host).collect()
}

/// The canonical schema, shared.
pub fn shared_canonical_schema() -> Arc<Schema> {
    Arc::new(canonical_schema().unwrap_or_else(|e| panic!("canonical schema is invalid: {e}")))
}

/// A zeroed snapshot of the canonical schema.
pub fn canonical_snapshot() -> Snapshot {
    Snapshot::new(shared_canonical_schema())
}

/// Builds canonical host blocks the way a telemetry source would deliver them.
#[derive(Debug, Clone)]
pub struct HostBlockBuilder {
    snapshot: Snapshot,
}

impl Default for HostBlockBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HostBlockBuilder {
    /// Start from a powered aircraft parked on the ground.
    pub fn new() -> Self {
        let mut snapshot = canonical_snapshot();
        snapshot.set(Field::ElecBat1, 1.0);
        snapshot.set(Field::OnGround, 1.0);
        snapshot.set(Field::ParkingBrake, 1.0);
        snapshot.set(Field::PushbackState, 3.0);
        Self { snapshot }
    }

    pub fn set(mut self, field: Field, value: f64) -> Self {
        self.snapshot.set(field, value);
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        if let Err(e) = self.snapshot.write(Field::AircraftTitle, title.to_string()) {
            panic!("title does not fit: {e}");
        }
        self
    }

    /// Put the aircraft in the air at the given altitude and vertical speed.
    pub fn airborne(self, altitude: f64, vertical_speed: f64) -> Self {
        self.set(Field::OnGround, 0.0)
            .set(Field::ParkingBrake, 0.0)
            .set(Field::Altitude, altitude)
            .set(Field::AltitudeAgl, altitude)
            .set(Field::VerticalSpeed, vertical_speed)
    }

    pub fn build(&self) -> Vec<u8> {
        self.snapshot.host_block().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_blocks_match_the_host_range() {
        let schema = shared_canonical_schema();
        let block = HostBlockBuilder::new().title("Kodiak 100").build();
        assert_eq!(block.len(), schema.host_range().len());
    }

    #[test]
    fn small_schema_host_fields_fill_host_range() {
        let schema = small_schema();
        let bytes: usize = small_host_fields().iter().map(FieldDescriptor::byte_size).sum();
        assert_eq!(bytes, schema.host_range().len());
    }
}
