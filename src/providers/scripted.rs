//! Scripted source that replays prepared host blocks

use std::collections::VecDeque;

use tokio::time::{Duration, Interval, MissedTickBehavior, interval};
use tracing::{debug, info, trace};

use crate::provider::TelemetrySource;
use crate::types::FieldDescriptor;
use crate::{LinkError, Result};

/// Replays a fixed list of host blocks at a steady pace.
pub struct ScriptedSource {
    /// Blocks still to deliver
    frames: VecDeque<Vec<u8>>,

    /// Frame pacing interval
    interval: Interval,

    /// Host block size implied by the registered fields
    block_size: Option<usize>,

    delivered: usize,
}

impl ScriptedSource {
    /// Create a source delivering `frames` one per `period`.
    pub fn new(frames: impl IntoIterator<Item = Vec<u8>>, period: Duration) -> Self {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { frames: frames.into_iter().collect(), interval, block_size: None, delivered: 0 }
    }

    /// Frames not yet delivered.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    /// Host block size after registration.
    pub fn block_size(&self) -> Option<usize> {
        self.block_size
    }
}

#[async_trait::async_trait]
impl TelemetrySource for ScriptedSource {
    async fn register(&mut self, fields: &[FieldDescriptor]) -> Result<()> {
        let size: usize = fields.iter().map(FieldDescriptor::byte_size).sum();
        let frames = self.frames.len();
        info!(fields = fields.len(), bytes = size, frames, "Scripted source registered");
        self.block_size = Some(size);
        Ok(())
    }

    async fn next_frame(&mut self) -> Result<Option<Vec<u8>>> {
        let Some(expected) = self.block_size else {
            return Err(LinkError::host_unavailable("frame requested before field registration"));
        };

        if self.frames.is_empty() {
            debug!("Reached end of script after {} frames", self.delivered);
            return Ok(None);
        }

        // Wait for next frame timing (pacing)
        self.interval.tick().await;

        let Some(frame) = self.frames.pop_front() else {
            return Ok(None);
        };
        if frame.len() != expected {
            return Err(LinkError::protocol(format!(
                "scripted frame is {} bytes, registered fields need {}",
                frame.len(),
                expected
            )));
        }

        self.delivered += 1;
        trace!(frame = self.delivered, remaining = self.frames.len(), "Scripted frame");
        Ok(Some(frame))
    }
}
