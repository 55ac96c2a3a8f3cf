//! Telemetry sources and in-memory collaborators

pub mod channel;
pub mod recording;
pub mod scripted;

pub use channel::{ChannelSource, FrameSender};
pub use recording::{Discard, RecordingBridge, Recorder, ScriptedControllers};
pub use scripted::ScriptedSource;
