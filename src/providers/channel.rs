//! Source fed through an mpsc channel
//!
//! Lets a caller push host blocks on its own schedule, which is how the
//! integration tests drive the engine deterministically.

use tokio::sync::mpsc;
use tracing::debug;

use crate::Result;
use crate::provider::TelemetrySource;
use crate::types::FieldDescriptor;

/// Sending half of a [`ChannelSource`]. Dropping every sender ends the source.
pub type FrameSender = mpsc::Sender<Vec<u8>>;

pub struct ChannelSource {
    rx: mpsc::Receiver<Vec<u8>>,
    registered: Vec<String>,
}

impl ChannelSource {
    /// Create a source with room for `depth` queued blocks.
    pub fn new(depth: usize) -> (FrameSender, Self) {
        let (tx, rx) = mpsc::channel(depth.max(1));
        (tx, Self { rx, registered: Vec::new() })
    }

    /// Names of the fields registered by the engine.
    pub fn registered(&self) -> &[String] {
        &self.registered
    }
}

#[async_trait::async_trait]
impl TelemetrySource for ChannelSource {
    async fn register(&mut self, fields: &[FieldDescriptor]) -> Result<()> {
        self.registered = fields.iter().map(|f| f.name.clone()).collect();
        debug!(fields = self.registered.len(), "Channel source registered");
        Ok(())
    }

    async fn next_frame(&mut self) -> Result<Option<Vec<u8>>> {
        Ok(self.rx.recv().await)
    }
}
