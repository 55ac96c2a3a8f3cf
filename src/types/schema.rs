//! Snapshot schema types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use super::{FieldKind, FieldOrigin};
use crate::{LinkError, Result};

/// Size of an inbound control-write datagram: `{size:i32, eventId:i32, value:f64}`.
pub const WRITE_RECORD_SIZE: usize = 16;

/// Description of one field in the snapshot layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name, unique within a schema
    pub name: String,
    /// Storage kind
    pub kind: FieldKind,
    /// Where the value comes from
    pub origin: FieldOrigin,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind, origin: FieldOrigin) -> Self {
        Self { name: name.into(), kind, origin }
    }

    /// Size in bytes on the wire.
    pub const fn byte_size(&self) -> usize {
        self.kind.size()
    }
}

/// Handle to a field in a schema.
///
/// Handles are only produced by schema lookups (or the canonical field table),
/// so reads and writes through them always land on a field boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(usize);

impl FieldId {
    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Position of the field in declaration order.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// The four panel subscriptions served over the link port.
///
/// Each channel is a prefix of the snapshot; instruments covers the whole
/// snapshot, the others end at a fixed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelId {
    Instruments,
    Autopilot,
    Radio,
    Lights,
}

impl ChannelId {
    pub const ALL: [ChannelId; 4] =
        [ChannelId::Instruments, ChannelId::Autopilot, ChannelId::Radio, ChannelId::Lights];

    pub const fn index(self) -> usize {
        match self {
            ChannelId::Instruments => 0,
            ChannelId::Autopilot => 1,
            ChannelId::Radio => 2,
            ChannelId::Lights => 3,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ChannelId::Instruments => "instruments",
            ChannelId::Autopilot => "autopilot",
            ChannelId::Radio => "radio",
            ChannelId::Lights => "lights",
        }
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered field layout shared by the link and every panel.
///
/// Offsets are the cumulative sum of field sizes in declaration order, so the
/// order of `fields` is part of the wire contract.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
    offsets: Vec<usize>,
    index: HashMap<String, FieldId>,
    total_size: usize,
    host_range: Range<usize>,
    channel_sizes: [usize; 4],
}

impl Schema {
    /// Build and validate a schema.
    ///
    /// `channel_ends` names, for the autopilot, radio and lights channels, the
    /// last field each channel includes. The instruments channel always spans
    /// the whole snapshot.
    pub fn new(fields: Vec<FieldDescriptor>, channel_ends: &[(ChannelId, &str)]) -> Result<Self> {
        let first = fields
            .first()
            .ok_or_else(|| LinkError::schema_validation("schema has no fields"))?;
        if first.origin != FieldOrigin::Link || first.kind != FieldKind::Float64 {
            return Err(LinkError::schema_validation(format!(
                "first field '{}' must be a link-owned float64 connection flag",
                first.name
            )));
        }

        let mut offsets = Vec::with_capacity(fields.len());
        let mut index = HashMap::with_capacity(fields.len());
        let mut offset = 0;
        let mut previous_origin = FieldOrigin::Link;
        let mut host_start = None;
        let mut derived_start = None;

        for (i, field) in fields.iter().enumerate() {
            if index.insert(field.name.clone(), FieldId(i)).is_some() {
                return Err(LinkError::schema_validation(format!(
                    "duplicate field name '{}'",
                    field.name
                )));
            }
            if field.origin < previous_origin {
                return Err(LinkError::schema_validation(format!(
                    "field '{}' ({:?}) declared after a {:?} field",
                    field.name, field.origin, previous_origin
                )));
            }
            match field.origin {
                FieldOrigin::Host if host_start.is_none() => host_start = Some(offset),
                FieldOrigin::Derived if derived_start.is_none() => derived_start = Some(offset),
                _ => {}
            }
            previous_origin = field.origin;
            offsets.push(offset);
            offset += field.byte_size();
        }

        let total_size = offset;
        let host_end = derived_start.unwrap_or(total_size);
        let host_range = host_start.unwrap_or(host_end)..host_end;

        let mut channel_sizes = [0usize; 4];
        channel_sizes[ChannelId::Instruments.index()] = total_size;
        for channel in [ChannelId::Autopilot, ChannelId::Radio, ChannelId::Lights] {
            let (_, last_field) =
                channel_ends.iter().find(|(id, _)| *id == channel).ok_or_else(|| {
                    LinkError::schema_validation(format!("no boundary for {} channel", channel))
                })?;
            let id = index.get(*last_field).copied().ok_or_else(|| {
                LinkError::schema_validation(format!(
                    "{} channel ends at unknown field '{}'",
                    channel, last_field
                ))
            })?;
            channel_sizes[channel.index()] = offsets[id.0] + fields[id.0].byte_size();
        }
        if channel_ends.iter().any(|(id, _)| *id == ChannelId::Instruments) {
            return Err(LinkError::schema_validation(
                "instruments channel always spans the whole snapshot",
            ));
        }

        for (i, size) in channel_sizes.iter().enumerate() {
            if *size == WRITE_RECORD_SIZE {
                return Err(LinkError::schema_validation(format!(
                    "{} channel size {} collides with the write record size",
                    ChannelId::ALL[i],
                    size
                )));
            }
            if channel_sizes[..i].contains(size) {
                return Err(LinkError::schema_validation(format!(
                    "{} channel size {} is not unique",
                    ChannelId::ALL[i],
                    size
                )));
            }
        }

        Ok(Self { fields, offsets, index, total_size, host_range, channel_sizes })
    }

    /// Look up a field handle by name.
    pub fn field_id(&self, name: &str) -> Result<FieldId> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| LinkError::FieldNotFound { field: name.to_string() })
    }

    /// Byte offset of a field by name.
    pub fn field_offset(&self, name: &str) -> Result<usize> {
        self.field_id(name).map(|id| self.offsets[id.0])
    }

    /// Descriptor and byte offset for a handle, if the handle belongs to this schema.
    pub fn field(&self, id: FieldId) -> Option<(&FieldDescriptor, usize)> {
        self.fields.get(id.0).map(|desc| (desc, self.offsets[id.0]))
    }

    /// All descriptors in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Descriptors with their offsets, in declaration order.
    pub fn layout(&self) -> impl Iterator<Item = (&FieldDescriptor, usize)> {
        self.fields.iter().zip(self.offsets.iter().copied())
    }

    /// Descriptors of the host-sourced fields, in host blob order.
    pub fn host_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.origin == FieldOrigin::Host)
    }

    /// Total snapshot size in bytes.
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// Byte range covered by host-sourced fields.
    pub fn host_range(&self) -> Range<usize> {
        self.host_range.clone()
    }

    /// Number of bytes in the given channel prefix.
    pub fn channel_size(&self, channel: ChannelId) -> usize {
        self.channel_sizes[channel.index()]
    }

    /// Find the channel whose size equals a request size.
    pub fn channel_for_size(&self, size: usize) -> Option<ChannelId> {
        ChannelId::ALL.into_iter().find(|c| self.channel_sizes[c.index()] == size)
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::small_schema;

    #[test]
    fn offsets_are_cumulative() {
        let schema = small_schema();
        assert_eq!(schema.field_offset("connected").unwrap(), 0);
        assert_eq!(schema.field_offset("beacon").unwrap(), 16);
        assert_eq!(schema.field_offset("title").unwrap(), 48);
        assert_eq!(schema.field_offset("phase").unwrap(), 80);
        assert_eq!(schema.total_size(), 88);
    }

    #[test]
    fn channel_boundaries_fall_on_fields() {
        let schema = small_schema();
        assert_eq!(schema.channel_size(ChannelId::Lights), 24);
        assert_eq!(schema.channel_size(ChannelId::Radio), 40);
        assert_eq!(schema.channel_size(ChannelId::Autopilot), 48);
        assert_eq!(schema.channel_size(ChannelId::Instruments), 88);
        assert_eq!(schema.channel_for_size(40), Some(ChannelId::Radio));
        assert_eq!(schema.channel_for_size(32), None);
    }

    #[test]
    fn host_range_excludes_link_and_derived_fields() {
        let schema = small_schema();
        assert_eq!(schema.host_range(), 8..80);
        assert_eq!(schema.host_fields().count(), 6);
    }

    #[test]
    fn unknown_field_is_reported() {
        let schema = small_schema();
        match schema.field_id("altitude") {
            Err(LinkError::FieldNotFound { field }) => assert_eq!(field, "altitude"),
            other => panic!("expected FieldNotFound, got {:?}", other),
        }
    }

    #[test]
    fn derived_fields_must_come_last() {
        let fields = vec![
            FieldDescriptor::new("connected", FieldKind::Float64, FieldOrigin::Link),
            FieldDescriptor::new("phase", FieldKind::Float64, FieldOrigin::Derived),
            FieldDescriptor::new("altitude", FieldKind::Float64, FieldOrigin::Host),
        ];
        let ends = [
            (ChannelId::Lights, "connected"),
            (ChannelId::Radio, "phase"),
            (ChannelId::Autopilot, "altitude"),
        ];
        assert!(matches!(Schema::new(fields, &ends), Err(LinkError::SchemaValidation { .. })));
    }

    #[test]
    fn first_field_must_be_connection_flag() {
        let fields = vec![FieldDescriptor::new("title", FieldKind::FixedString, FieldOrigin::Host)];
        assert!(Schema::new(fields, &[]).is_err());
    }

    #[test]
    fn channel_size_equal_to_write_record_is_rejected() {
        // lights would end at 16 bytes, the size of a write request
        let fields = vec![
            FieldDescriptor::new("connected", FieldKind::Float64, FieldOrigin::Link),
            FieldDescriptor::new("a", FieldKind::Float64, FieldOrigin::Host),
            FieldDescriptor::new("b", FieldKind::Float64, FieldOrigin::Host),
            FieldDescriptor::new("c", FieldKind::Float64, FieldOrigin::Host),
            FieldDescriptor::new("d", FieldKind::Float64, FieldOrigin::Host),
        ];
        let ends = [(ChannelId::Lights, "a"), (ChannelId::Radio, "b"), (ChannelId::Autopilot, "c")];
        assert!(Schema::new(fields, &ends).is_err());
    }

    #[test]
    fn duplicate_channel_sizes_are_rejected() {
        let fields = vec![
            FieldDescriptor::new("connected", FieldKind::Float64, FieldOrigin::Link),
            FieldDescriptor::new("a", FieldKind::FixedString, FieldOrigin::Host),
            FieldDescriptor::new("b", FieldKind::Float64, FieldOrigin::Host),
            FieldDescriptor::new("c", FieldKind::Float64, FieldOrigin::Host),
        ];
        let ends = [(ChannelId::Lights, "a"), (ChannelId::Radio, "a"), (ChannelId::Autopilot, "b")];
        assert!(Schema::new(fields, &ends).is_err());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let fields = vec![
            FieldDescriptor::new("connected", FieldKind::Float64, FieldOrigin::Link),
            FieldDescriptor::new("a", FieldKind::Float64, FieldOrigin::Host),
            FieldDescriptor::new("a", FieldKind::Float64, FieldOrigin::Host),
        ];
        let ends = [(ChannelId::Lights, "a"), (ChannelId::Radio, "a"), (ChannelId::Autopilot, "a")];
        assert!(Schema::new(fields, &ends).is_err());
    }
}
