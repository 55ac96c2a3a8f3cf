//! Datagram classification

use crate::types::{ChannelId, ControlWrite, Schema, WRITE_RECORD_SIZE};
use crate::Result;

/// Poll flag bit asking for the complete channel.
pub const WANT_FULL: i32 = 0x1;

/// What a panel asked for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Request {
    Write(ControlWrite),
    Poll { channel: ChannelId, want_full: bool },
    /// Size prefix matches nothing; `None` when the datagram is too short to hold one
    Unknown { size: Option<i32> },
}

impl Request {
    /// Classify a datagram by its leading size word.
    pub fn parse(datagram: &[u8], schema: &Schema) -> Result<Self> {
        let Some(size) = read_i32(datagram, 0) else {
            return Ok(Request::Unknown { size: None });
        };

        if size == WRITE_RECORD_SIZE as i32 {
            return ControlWrite::decode(datagram).map(Request::Write);
        }

        let channel = usize::try_from(size).ok().and_then(|s| schema.channel_for_size(s));
        match channel {
            Some(channel) => {
                let flags = read_i32(datagram, 4).unwrap_or(0);
                Ok(Request::Poll { channel, want_full: flags & WANT_FULL != 0 })
            }
            None => Ok(Request::Unknown { size: Some(size) }),
        }
    }
}

fn read_i32(bytes: &[u8], at: usize) -> Option<i32> {
    let word = bytes.get(at..at + 4)?;
    Some(i32::from_le_bytes([word[0], word[1], word[2], word[3]]))
}

/// Encode a poll request the way panels send it.
pub fn encode_poll(channel_size: usize, want_full: bool) -> Vec<u8> {
    let mut out = (channel_size as i32).to_le_bytes().to_vec();
    if want_full {
        out.extend_from_slice(&WANT_FULL.to_le_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::small_schema;
    use crate::types::EventId;

    #[test]
    fn classifies_by_size_prefix() {
        let schema = small_schema();

        let write = ControlWrite::new(EventId::GEAR_SET, 1.0);
        assert_eq!(Request::parse(&write.encode(), &schema).unwrap(), Request::Write(write));

        assert_eq!(
            Request::parse(&encode_poll(40, false), &schema).unwrap(),
            Request::Poll { channel: ChannelId::Radio, want_full: false }
        );
        assert_eq!(
            Request::parse(&encode_poll(88, true), &schema).unwrap(),
            Request::Poll { channel: ChannelId::Instruments, want_full: true }
        );
        assert_eq!(
            Request::parse(&encode_poll(1234, false), &schema).unwrap(),
            Request::Unknown { size: Some(1234) }
        );
        assert_eq!(Request::parse(&[1, 2], &schema).unwrap(), Request::Unknown { size: None });
        assert_eq!(
            Request::parse(&(-24i32).to_le_bytes(), &schema).unwrap(),
            Request::Unknown { size: Some(-24) }
        );
    }

    #[test]
    fn truncated_write_is_a_protocol_error() {
        let schema = small_schema();
        let datagram = (WRITE_RECORD_SIZE as i32).to_le_bytes();
        assert!(Request::parse(&datagram, &schema).is_err());
    }
}
