//! Receiver-side decoder

use super::{Encoding, STRING_TAG};
use crate::types::{ChannelId, FIXED_STRING_LEN, Schema};
use crate::{LinkError, Result};

/// A panel's copy of one channel, kept current by applying responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mirror {
    bytes: Vec<u8>,
}

impl Mirror {
    /// A zeroed mirror of `len` bytes.
    pub fn new(len: usize) -> Self {
        Self { bytes: vec![0u8; len] }
    }

    pub fn for_channel(schema: &Schema, channel: ChannelId) -> Self {
        Self::new(schema.channel_size(channel))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Apply one response packet.
    ///
    /// A packet exactly as long as the mirror replaces it; anything else is a
    /// run of delta records. A malformed packet leaves the mirror untouched.
    pub fn apply(&mut self, packet: &[u8]) -> Result<Encoding> {
        if packet.len() == self.bytes.len() {
            self.bytes.copy_from_slice(packet);
            return Ok(Encoding::Full);
        }

        let mut updates = Vec::new();
        let mut cursor = 0;
        while cursor < packet.len() {
            let header = packet.get(cursor..cursor + 4).ok_or_else(|| {
                LinkError::protocol(format!("truncated record header at byte {}", cursor))
            })?;
            let tag = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
            let (offset, len) = if tag & STRING_TAG != 0 {
                ((tag & !STRING_TAG) as usize, FIXED_STRING_LEN)
            } else {
                (tag as usize, 8)
            };
            cursor += 4;

            let payload = packet.get(cursor..cursor + len).ok_or_else(|| {
                LinkError::protocol(format!("truncated payload for offset {:#x}", offset))
            })?;
            if offset + len > self.bytes.len() {
                return Err(LinkError::OutOfBounds { offset, len: self.bytes.len() });
            }
            updates.push((offset, payload));
            cursor += len;
        }

        let records = updates.len();
        for (offset, payload) in updates {
            self.bytes[offset..offset + payload.len()].copy_from_slice(payload);
        }
        Ok(Encoding::Delta { records })
    }
}
