//! Delta protocol for channel responses.
//!
//! A response is either the full channel (its length equals the channel size)
//! or a run of records, each `{offset: u32 LE, payload}`. Numeric payloads are
//! 8 bytes; string payloads are 32 bytes and set [`STRING_TAG`] in the offset.
//! The first record of every delta is the connection flag at offset 0, so a
//! panel always learns whether the simulator is still attached.
//!
//! ```rust
//! use datalink::codec::{DeltaCodec, Encoding, Mirror};
//! use datalink::schema::{Field, canonical_schema};
//! use datalink::types::{ChannelId, Snapshot};
//! use std::sync::Arc;
//!
//! let schema = Arc::new(canonical_schema()?);
//! let mut snapshot = Snapshot::new(schema.clone());
//! let mut codec = DeltaCodec::new(ChannelId::Radio);
//! let mut mirror = Mirror::for_channel(&schema, ChannelId::Radio);
//!
//! mirror.apply(&codec.send_full(&snapshot))?;
//! snapshot.set(Field::Com1Standby, 121.5);
//! let (packet, encoding) = codec.send_delta(&snapshot);
//! assert_eq!(encoding, Encoding::Delta { records: 2 });
//! mirror.apply(&packet)?;
//! assert_eq!(mirror.bytes(), snapshot.channel_bytes(ChannelId::Radio));
//! # Ok::<(), datalink::LinkError>(())
//! ```

mod delta;
mod mirror;

pub use delta::DeltaCodec;
pub use mirror::Mirror;

/// Offset bit marking a 32-byte string payload.
pub const STRING_TAG: u32 = 0x8000_0000;

/// Size of a numeric record: 4-byte offset plus 8-byte payload.
pub const NUMERIC_RECORD_SIZE: usize = 12;

/// How a response was encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// The complete channel bytes
    Full,
    /// Change records against the previous response
    Delta { records: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, canonical_schema};
    use crate::types::{
        ChannelId, FieldDescriptor, FieldKind, FieldOrigin, Schema, Snapshot,
    };
    use proptest::prelude::*;
    use std::sync::Arc;

    fn canonical() -> Arc<Schema> {
        Arc::new(canonical_schema().unwrap())
    }

    #[test]
    fn first_send_is_full() {
        let schema = canonical();
        let snapshot = Snapshot::new(schema.clone());
        let mut codec = DeltaCodec::new(ChannelId::Lights);
        let (packet, encoding) = codec.send_delta(&snapshot);
        assert_eq!(encoding, Encoding::Full);
        assert_eq!(packet.len(), schema.channel_size(ChannelId::Lights));
        assert!(codec.has_baseline());
    }

    #[test]
    fn unchanged_poll_yields_only_connection_record() {
        let schema = canonical();
        let mut snapshot = Snapshot::new(schema);
        snapshot.set(Field::Connected, 1.0);
        snapshot.set(Field::Altitude, 5000.0);
        let mut codec = DeltaCodec::new(ChannelId::Instruments);
        codec.send_full(&snapshot);

        let (packet, encoding) = codec.send_delta(&snapshot);
        assert_eq!(encoding, Encoding::Delta { records: 1 });
        assert_eq!(packet.len(), NUMERIC_RECORD_SIZE);
        assert_eq!(&packet[..4], &0u32.to_le_bytes());
        assert_eq!(&packet[4..], &1.0f64.to_le_bytes());
    }

    #[test]
    fn string_records_are_tagged() {
        let schema = canonical();
        let mut snapshot = Snapshot::new(schema.clone());
        let mut codec = DeltaCodec::new(ChannelId::Instruments);
        codec.send_full(&snapshot);

        snapshot.write(Field::AircraftTitle, "PA28 Warrior II".to_string()).unwrap();
        let (packet, encoding) = codec.send_delta(&snapshot);
        assert_eq!(encoding, Encoding::Delta { records: 2 });
        let offset = schema.field_offset(Field::AircraftTitle.name()).unwrap() as u32;
        let tag = u32::from_le_bytes([packet[12], packet[13], packet[14], packet[15]]);
        assert_eq!(tag, STRING_TAG | offset);
        assert_eq!(packet.len(), NUMERIC_RECORD_SIZE + 4 + 32);
    }

    #[test]
    fn fields_outside_the_channel_are_not_sent() {
        let schema = canonical();
        let mut snapshot = Snapshot::new(schema);
        let mut codec = DeltaCodec::new(ChannelId::Lights);
        codec.send_full(&snapshot);

        snapshot.set(Field::Altitude, 9000.0);
        let (_, encoding) = codec.send_delta(&snapshot);
        assert_eq!(encoding, Encoding::Delta { records: 1 });
    }

    #[test]
    fn falls_back_to_full_when_everything_changes() {
        let schema = canonical();
        let mut snapshot = Snapshot::new(schema.clone());
        let mut codec = DeltaCodec::new(ChannelId::Lights);
        codec.send_full(&snapshot);

        for field in Field::ALL.iter().take_while(|f| **f != Field::Com1Freq) {
            snapshot.set(*field, 1.0);
        }
        let (packet, encoding) = codec.send_delta(&snapshot);
        assert_eq!(encoding, Encoding::Full);
        assert_eq!(packet.len(), schema.channel_size(ChannelId::Lights));
    }

    #[test]
    fn invalidate_forces_full() {
        let snapshot = Snapshot::new(canonical());
        let mut codec = DeltaCodec::new(ChannelId::Radio);
        codec.send_full(&snapshot);
        codec.invalidate();
        assert_eq!(codec.send_delta(&snapshot).1, Encoding::Full);
    }

    #[test]
    fn mirror_rejects_truncated_records() {
        let mut mirror = Mirror::new(64);
        let before = mirror.clone();
        let mut packet = 8u32.to_le_bytes().to_vec();
        packet.extend_from_slice(&[1, 2, 3]);
        assert!(mirror.apply(&packet).is_err());
        assert_eq!(mirror, before);
    }

    #[test]
    fn mirror_rejects_offsets_past_the_end() {
        let mut mirror = Mirror::new(64);
        let mut packet = 60u32.to_le_bytes().to_vec();
        packet.extend_from_slice(&1.0f64.to_le_bytes());
        assert!(mirror.apply(&packet).is_err());
    }

    fn mixed_schema() -> Arc<Schema> {
        let fields = vec![
            FieldDescriptor::new("connected", FieldKind::Float64, FieldOrigin::Link),
            FieldDescriptor::new("a", FieldKind::Float64, FieldOrigin::Host),
            FieldDescriptor::new("b", FieldKind::Float64, FieldOrigin::Host),
            FieldDescriptor::new("name", FieldKind::FixedString, FieldOrigin::Host),
            FieldDescriptor::new("c", FieldKind::Float64, FieldOrigin::Host),
            FieldDescriptor::new("d", FieldKind::Float64, FieldOrigin::Host),
            FieldDescriptor::new("e", FieldKind::Float64, FieldOrigin::Derived),
        ];
        let ends =
            [(ChannelId::Lights, "b"), (ChannelId::Radio, "name"), (ChannelId::Autopilot, "c")];
        Arc::new(Schema::new(fields, &ends).unwrap())
    }

    #[derive(Debug, Clone)]
    enum Mutation {
        Number(usize, f64),
        Text(String),
        Resync,
    }

    fn mutation() -> impl Strategy<Value = Mutation> {
        prop_oneof![
            (0usize..6, any::<f64>()).prop_map(|(i, v)| Mutation::Number(i, v)),
            "[a-zA-Z0-9 ]{0,40}".prop_map(Mutation::Text),
            Just(Mutation::Resync),
        ]
    }

    proptest! {
        #[test]
        fn deltas_reproduce_channel_bytes(
            channel_index in 0usize..4,
            steps in prop::collection::vec(prop::collection::vec(mutation(), 0..6), 1..20)
        ) {
            let schema = mixed_schema();
            let channel = ChannelId::ALL[channel_index];
            let numeric = ["connected", "a", "b", "c", "d", "e"];
            let mut snapshot = Snapshot::new(schema.clone());
            let mut codec = DeltaCodec::new(channel);
            let mut mirror = Mirror::for_channel(&schema, channel);

            for step in steps {
                let mut resync = false;
                for m in step {
                    match m {
                        Mutation::Number(i, v) => snapshot.write_named(numeric[i], v).unwrap(),
                        Mutation::Text(s) => snapshot.write_named("name", s).unwrap(),
                        Mutation::Resync => resync = true,
                    }
                }
                let packet = if resync {
                    codec.send_full(&snapshot)
                } else {
                    codec.send_delta(&snapshot).0
                };
                prop_assert!(packet.len() <= schema.channel_size(channel));
                mirror.apply(&packet).unwrap();
                prop_assert_eq!(mirror.bytes(), snapshot.channel_bytes(channel));
            }
        }
    }
}
