//! Change-only encoder with a per-channel baseline

use tracing::trace;

use super::{Encoding, STRING_TAG};
use crate::types::{ChannelId, FieldKind, Snapshot};

/// Encoder for one channel.
///
/// The baseline is the exact byte image of the last response handed to the
/// transport. Every encode replaces it, so the caller must call
/// [`DeltaCodec::invalidate`] if that response never made it onto the wire.
#[derive(Debug, Clone)]
pub struct DeltaCodec {
    channel: ChannelId,
    baseline: Option<Vec<u8>>,
}

impl DeltaCodec {
    pub fn new(channel: ChannelId) -> Self {
        Self { channel, baseline: None }
    }

    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    pub fn has_baseline(&self) -> bool {
        self.baseline.is_some()
    }

    /// Drop the baseline so the next encode is a full send.
    pub fn invalidate(&mut self) {
        self.baseline = None;
    }

    /// Serialize the whole channel and make it the new baseline.
    pub fn send_full(&mut self, snapshot: &Snapshot) -> Vec<u8> {
        let current = snapshot.channel_bytes(self.channel);
        match &mut self.baseline {
            Some(baseline) if baseline.len() == current.len() => baseline.copy_from_slice(current),
            slot => *slot = Some(current.to_vec()),
        }
        current.to_vec()
    }

    /// Serialize only the fields that differ from the baseline.
    ///
    /// The connection flag is always the first record. Falls back to a full
    /// send when there is no usable baseline or when the records would be at
    /// least as large as the channel itself.
    pub fn send_delta(&mut self, snapshot: &Snapshot) -> (Vec<u8>, Encoding) {
        let current = snapshot.channel_bytes(self.channel);
        let limit = current.len();

        let Some(baseline) = self.baseline.as_deref().filter(|b| b.len() == limit) else {
            return (self.send_full(snapshot), Encoding::Full);
        };

        let mut out = Vec::with_capacity(limit);
        let mut records = 0;
        for (desc, offset) in snapshot.schema().layout() {
            let end = offset + desc.byte_size();
            if end > limit {
                break;
            }
            let now = &current[offset..end];
            if offset != 0 && baseline[offset..end] == *now {
                continue;
            }

            let tag = match desc.kind {
                FieldKind::Float64 => offset as u32,
                FieldKind::FixedString => STRING_TAG | offset as u32,
            };
            out.extend_from_slice(&tag.to_le_bytes());
            out.extend_from_slice(now);
            records += 1;

            if out.len() >= limit {
                trace!(channel = %self.channel, records, "Delta outgrew channel, sending full");
                return (self.send_full(snapshot), Encoding::Full);
            }
        }

        if let Some(baseline) = self.baseline.as_mut() {
            baseline.copy_from_slice(current);
        }
        (out, Encoding::Delta { records })
    }
}
