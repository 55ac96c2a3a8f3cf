//! Canonical schema shared with the panel firmware
//!
//! The field table below is the wire contract. Fields are grouped so that each
//! panel channel is a prefix: lights first, then radio, then autopilot, then
//! the remaining instruments, with derived fields at the very end. The order
//! is defined here and nowhere else; panel firmware must be built against the
//! same table.

mod canonical;

pub use canonical::Field;

use crate::Result;
use crate::types::{ChannelId, FieldDescriptor, Schema};

/// Last field included in each of the smaller channels.
pub const CHANNEL_ENDS: [(ChannelId, &str); 3] = [
    (ChannelId::Lights, Field::LightStrobe.name()),
    (ChannelId::Radio, Field::TcasMode.name()),
    (ChannelId::Autopilot, Field::AutothrustMode.name()),
];

/// Build the canonical schema.
pub fn canonical_schema() -> Result<Schema> {
    let fields = Field::ALL
        .iter()
        .map(|f| FieldDescriptor::new(f.name(), f.kind(), f.origin()))
        .collect();
    Schema::new(fields, &CHANNEL_ENDS)
}
