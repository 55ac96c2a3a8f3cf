//! In-memory collaborators
//!
//! [`Recorder`] keeps every write or press it receives so callers can inspect
//! what the engine sent. [`Discard`] accepts and drops everything, for links
//! that run without a simulator attached on that side.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::trace;

use crate::Result;
use crate::controllers::ControllerReading;
use crate::provider::{ButtonEmulator, ControllerPoller, HostWriter, VarBridge};
use crate::types::ControlWrite;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared log of items handed to a collaborator. Clones share the log.
#[derive(Debug)]
pub struct Recorder<T> {
    items: Arc<Mutex<Vec<T>>>,
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self { items: Arc::clone(&self.items) }
    }
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self { items: Arc::new(Mutex::new(Vec::new())) }
    }
}

impl<T: Clone> Recorder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, item: T) {
        lock(&self.items).push(item);
    }

    /// Copy of everything recorded so far.
    pub fn items(&self) -> Vec<T> {
        lock(&self.items).clone()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<T> {
        std::mem::take(&mut *lock(&self.items))
    }

    pub fn len(&self) -> usize {
        lock(&self.items).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.items).is_empty()
    }
}

impl HostWriter for Recorder<ControlWrite> {
    fn write(&mut self, write: ControlWrite) -> Result<()> {
        trace!(event = %write.event, value = write.value, "Recorded host write");
        self.push(write);
        Ok(())
    }
}

impl ButtonEmulator for Recorder<u32> {
    fn press(&mut self, button: u32) -> Result<()> {
        trace!(button, "Recorded button press");
        self.push(button);
        Ok(())
    }
}

/// Bridge that records requests and replays queued responses.
#[derive(Debug, Clone, Default)]
pub struct RecordingBridge {
    requests: Recorder<String>,
    responses: Arc<Mutex<VecDeque<String>>>,
}

impl RecordingBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw response for the next drain.
    pub fn respond(&self, response: impl Into<String>) {
        lock(&self.responses).push_back(response.into());
    }

    /// Requests sent so far.
    pub fn requests(&self) -> &Recorder<String> {
        &self.requests
    }
}

impl VarBridge for RecordingBridge {
    fn request(&mut self, expression: &str) -> Result<()> {
        self.requests.push(expression.to_string());
        Ok(())
    }

    fn drain_responses(&mut self) -> Vec<String> {
        lock(&self.responses).drain(..).collect()
    }
}

/// Controller poller returning queued readings, one batch per poll.
#[derive(Debug, Clone, Default)]
pub struct ScriptedControllers {
    batches: Arc<Mutex<VecDeque<Vec<ControllerReading>>>>,
}

impl ScriptedControllers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, batch: Vec<ControllerReading>) {
        lock(&self.batches).push_back(batch);
    }
}

impl ControllerPoller for ScriptedControllers {
    fn poll(&mut self) -> Vec<ControllerReading> {
        lock(&self.batches).pop_front().unwrap_or_default()
    }
}

/// Collaborator that accepts everything and does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl HostWriter for Discard {
    fn write(&mut self, _write: ControlWrite) -> Result<()> {
        Ok(())
    }
}

impl VarBridge for Discard {
    fn request(&mut self, _expression: &str) -> Result<()> {
        Ok(())
    }

    fn drain_responses(&mut self) -> Vec<String> {
        Vec::new()
    }
}

impl ButtonEmulator for Discard {
    fn press(&mut self, _button: u32) -> Result<()> {
        Ok(())
    }
}

impl ControllerPoller for Discard {
    fn poll(&mut self) -> Vec<ControllerReading> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventId;

    #[test]
    fn recorder_clones_share_the_log() {
        let recorder = Recorder::<ControlWrite>::new();
        let mut writer = recorder.clone();
        writer.write(ControlWrite::new(EventId::GEAR_SET, 1.0)).unwrap();
        assert_eq!(recorder.items(), vec![ControlWrite::new(EventId::GEAR_SET, 1.0)]);
        assert_eq!(recorder.take().len(), 1);
        assert!(recorder.is_empty());
    }

    #[test]
    fn bridge_drains_queued_responses_once() {
        let bridge = RecordingBridge::new();
        let mut handle = bridge.clone();
        bridge.respond("(L:A,bool)1");
        handle.request("(L:A,bool)").unwrap();

        assert_eq!(handle.drain_responses(), vec!["(L:A,bool)1".to_string()]);
        assert!(handle.drain_responses().is_empty());
        assert_eq!(bridge.requests().items(), vec!["(L:A,bool)".to_string()]);
    }

    #[test]
    fn controllers_pop_one_batch_per_poll() {
        let controllers = ScriptedControllers::new();
        let mut poller = controllers.clone();
        controllers.push(vec![ControllerReading::new("pico-1", vec![0.5], vec![false])]);
        assert_eq!(poller.poll().len(), 1);
        assert!(poller.poll().is_empty());
    }
}
