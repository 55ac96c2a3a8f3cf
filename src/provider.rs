//! Collaborator traits for the simulator side of the link

use std::time::Duration;

use crate::Result;
use crate::controllers::ControllerReading;
use crate::types::{ControlWrite, FieldDescriptor};

/// How long an emulated button stays pressed.
pub const BUTTON_PRESS_DURATION: Duration = Duration::from_millis(60);

/// Source of host telemetry.
///
/// Sources abstract over the simulator connection, scripted replays and
/// test feeds, and handle their own pacing internally.
#[async_trait::async_trait]
pub trait TelemetrySource: Send + 'static {
    /// Register the host fields, in wire order, before the first frame.
    async fn register(&mut self, fields: &[FieldDescriptor]) -> Result<()>;

    /// Get the next host block
    ///
    /// Returns:
    /// - `Ok(Some(block))` - Host fields for one cycle, in registration order
    /// - `Ok(None)` - Source ended (simulator closed)
    /// - `Err(e)` - Error occurred
    ///
    /// Must be cancel-safe: the engine task abandons a pending call whenever a
    /// control request arrives first.
    async fn next_frame(&mut self) -> Result<Option<Vec<u8>>>;
}

/// Sends standard events to the simulator.
pub trait HostWriter: Send + 'static {
    fn write(&mut self, write: ControlWrite) -> Result<()>;
}

/// Free-form RPN requests to the vendor variable bridge.
pub trait VarBridge: Send + 'static {
    fn request(&mut self, expression: &str) -> Result<()>;

    /// Responses received since the last call, as raw `(NAME)value` strings.
    fn drain_responses(&mut self) -> Vec<String>;
}

/// Virtual joystick button presses.
///
/// Implementations hold the button for [`BUTTON_PRESS_DURATION`] and then
/// release it without blocking the caller.
pub trait ButtonEmulator: Send + 'static {
    fn press(&mut self, button: u32) -> Result<()>;
}

/// Raw state of directly attached controllers.
pub trait ControllerPoller: Send + 'static {
    fn poll(&mut self) -> Vec<ControllerReading>;
}

/// The collaborators the engine drives, plus the controller poller used by the server.
pub struct Collaborators {
    pub writer: Box<dyn HostWriter>,
    pub bridge: Box<dyn VarBridge>,
    pub buttons: Box<dyn ButtonEmulator>,
    pub controllers: Box<dyn ControllerPoller>,
}

impl Collaborators {
    pub fn new(
        writer: impl HostWriter,
        bridge: impl VarBridge,
        buttons: impl ButtonEmulator,
        controllers: impl ControllerPoller,
    ) -> Self {
        Self {
            writer: Box::new(writer),
            bridge: Box::new(bridge),
            buttons: Box::new(buttons),
            controllers: Box::new(controllers),
        }
    }
}
