//! The engine owns all mutable link state and runs one cycle per host frame.
//!
//! Everything that changes the snapshot happens here: loading host data,
//! vendor corrections, the cabin state machine and derived fields. The engine
//! is driven from a single task (see [`crate::driver`]), so none of its state
//! is shared.

use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use crate::adapters::{
    AircraftVariant, Override, VariantAdapter, VariantTracker, read_expression, write_expression,
};
use crate::flight::{CabinButton, CabinEvent, CabinEventState, GroundContext};
use crate::provider::{ButtonEmulator, HostWriter, VarBridge};
use crate::schema::Field;
use crate::types::{ControlWrite, EventId, Schema, Snapshot};
use crate::Result;

/// Result of handling a control write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlOutcome {
    /// Four-byte reply owed to the panel (cabin event id)
    pub reply: Option<i32>,
    /// Writes to forward to the host once the reply has been sent
    pub deferred: Vec<ControlWrite>,
}

/// Collaborators the engine writes through.
pub struct EngineCollaborators {
    pub writer: Box<dyn HostWriter>,
    pub bridge: Box<dyn VarBridge>,
    pub buttons: Box<dyn ButtonEmulator>,
}

pub struct Engine {
    schema: Arc<Schema>,
    snapshot: Snapshot,
    cabin: CabinEventState,
    tracker: VariantTracker,
    adapter: VariantAdapter,
    variant: AircraftVariant,
    rudder_sensitivity: f64,
    connected: bool,
    cycles: u64,
    writer: Box<dyn HostWriter>,
    bridge: Box<dyn VarBridge>,
    buttons: Box<dyn ButtonEmulator>,
}

impl Engine {
    pub fn new(
        schema: Arc<Schema>,
        collaborators: EngineCollaborators,
        heading_drift_threshold: f64,
    ) -> Self {
        let EngineCollaborators { writer, bridge, buttons } = collaborators;
        Self {
            snapshot: Snapshot::new(Arc::clone(&schema)),
            schema,
            cabin: CabinEventState::new(),
            tracker: VariantTracker::new(),
            adapter: VariantAdapter::new(heading_drift_threshold),
            variant: AircraftVariant::GenericGa,
            rudder_sensitivity: 0.0,
            connected: false,
            cycles: 0,
            writer,
            bridge,
            buttons,
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// The working snapshot as of the last cycle.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn variant(&self) -> AircraftVariant {
        self.variant
    }

    pub fn cabin(&self) -> &CabinEventState {
        &self.cabin
    }

    pub fn rudder_sensitivity(&self) -> f64 {
        self.rudder_sensitivity
    }

    /// Run one cycle over a host block.
    pub fn on_frame(&mut self, host_block: &[u8]) -> Result<()> {
        self.snapshot.load_host_block(host_block)?;
        self.snapshot.set(Field::Connected, 1.0);
        if !self.connected {
            info!("Simulator connected");
            self.connected = true;
        }
        self.cycles += 1;

        let title = self.snapshot.read::<String>(Field::AircraftTitle).unwrap_or_default();
        let (variant, changed) = self.tracker.observe(&title);
        if changed {
            self.adapter.reset();
        }
        self.variant = variant;

        let vendor = self.adapter.vendor_mut();
        vendor.begin_cycle();
        for response in self.bridge.drain_responses() {
            vendor.absorb(&response);
        }

        for var in variant.vendor_reads() {
            if let Err(e) = self.bridge.request(&read_expression(var)) {
                warn!(var, "Vendor read request failed: {}", e);
            }
        }

        let overrides = self.adapter.apply(variant, &mut self.snapshot);
        self.dispatch(overrides);

        let phase = self.cabin.update(&self.snapshot);
        self.cabin.write_derived(&mut self.snapshot);
        self.snapshot.set(Field::AircraftVariant, variant.code());
        self.snapshot.set(Field::RudderSensitivity, self.rudder_sensitivity);

        trace!(cycle = self.cycles, variant = %variant, phase = %phase, "Cycle complete");
        Ok(())
    }

    /// Handle a control write from a panel.
    pub fn on_control(&mut self, write: ControlWrite) -> ControlOutcome {
        if let Some(button) = write.event.vjoy_button() {
            if let Err(e) = self.buttons.press(button) {
                warn!(button, "Button press failed: {}", e);
            }
            return ControlOutcome::default();
        }

        match write.event {
            EventId::RUDDER_SENSITIVITY => {
                debug!(value = write.value, "Rudder sensitivity calibrated");
                self.rudder_sensitivity = write.value;
                self.snapshot.set(Field::RudderSensitivity, write.value);
                ControlOutcome::default()
            }
            EventId::CHECK_CUSTOM_EVENT => self.custom_event(write.value),
            _ if !self.connected => {
                debug!(event = %write.event, "Dropping write while simulator is disconnected");
                ControlOutcome::default()
            }
            _ => {
                match self.adapter.translate(self.variant, write) {
                    Some(overrides) => self.dispatch(overrides),
                    None => self.forward(write),
                }
                ControlOutcome::default()
            }
        }
    }

    /// Send a write straight to the host, bypassing vendor translation.
    pub fn forward(&mut self, write: ControlWrite) {
        if !self.connected {
            debug!(event = %write.event, "Dropping forwarded write while disconnected");
            return;
        }
        if let Err(e) = self.writer.write(write) {
            warn!(event = %write.event, "Host write failed: {}", e);
        }
    }

    fn custom_event(&mut self, value: f64) -> ControlOutcome {
        let event = match CabinButton::from_value(value) {
            Some(button) => {
                let ground = GroundContext::from_snapshot(&self.snapshot);
                self.cabin.custom_event(button, self.cabin.phase(), &ground)
            }
            None => {
                debug!(value, "Unknown cabin button");
                CabinEvent::None
            }
        };
        self.cabin.write_derived(&mut self.snapshot);

        let mut outcome = ControlOutcome { reply: Some(event.id()), deferred: Vec::new() };
        if event.toggles_pushback() {
            outcome.deferred.push(ControlWrite::new(EventId::TOGGLE_PUSHBACK, 0.0));
        }
        outcome
    }

    fn dispatch(&mut self, overrides: Vec<Override>) {
        for o in overrides {
            match o {
                Override::Var { name, value } => {
                    if let Err(e) = self.bridge.request(&write_expression(name, value)) {
                        warn!(var = name, "Vendor write failed: {}", e);
                    }
                }
                Override::Host(write) => self.forward(write),
            }
        }
    }

    /// Return to the disconnected state: zeroed snapshot and fresh per-flight state.
    pub fn reset(&mut self) {
        if self.connected {
            info!(cycles = self.cycles, "Simulator disconnected");
        }
        self.snapshot.reset();
        self.cabin.reset();
        self.tracker.reset();
        self.adapter.reset();
        self.variant = AircraftVariant::GenericGa;
        self.connected = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::lvars::a310;
    use crate::providers::{Recorder, RecordingBridge};
    use crate::test_utils::{HostBlockBuilder, shared_canonical_schema};

    struct Harness {
        engine: Engine,
        writes: Recorder<ControlWrite>,
        bridge: RecordingBridge,
        buttons: Recorder<u32>,
    }

    fn harness() -> Harness {
        let writes = Recorder::new();
        let bridge = RecordingBridge::new();
        let buttons = Recorder::new();
        let engine = Engine::new(
            shared_canonical_schema(),
            EngineCollaborators {
                writer: Box::new(writes.clone()),
                bridge: Box::new(bridge.clone()),
                buttons: Box::new(buttons.clone()),
            },
            5.0,
        );
        Harness { engine, writes, bridge, buttons }
    }

    #[test]
    fn frame_sets_connection_and_derived_fields() {
        let mut h = harness();
        let block = HostBlockBuilder::new().title("Cessna 172").build();
        h.engine.on_frame(&block).unwrap();

        let snapshot = h.engine.snapshot();
        assert_eq!(snapshot.get(Field::Connected), 1.0);
        assert_eq!(snapshot.get(Field::FlightPhase), 0.0);
        assert_eq!(snapshot.get(Field::LandingRate), -999.0);
        assert_eq!(snapshot.get(Field::AircraftVariant), AircraftVariant::GenericGa.code());
        assert!(h.engine.is_connected());
    }

    #[test]
    fn wrong_sized_block_is_rejected() {
        let mut h = harness();
        assert!(h.engine.on_frame(&[0u8; 3]).is_err());
        assert!(!h.engine.is_connected());
    }

    #[test]
    fn writes_are_dropped_until_connected() {
        let mut h = harness();
        h.engine.on_control(ControlWrite::new(EventId::GEAR_SET, 1.0));
        assert!(h.writes.is_empty());

        h.engine.on_control(ControlWrite::new(EventId::RUDDER_SENSITIVITY, 0.4));
        assert_eq!(h.engine.rudder_sensitivity(), 0.4);

        h.engine.on_frame(&HostBlockBuilder::new().build()).unwrap();
        h.engine.on_control(ControlWrite::new(EventId::GEAR_SET, 1.0));
        assert_eq!(h.writes.items(), vec![ControlWrite::new(EventId::GEAR_SET, 1.0)]);
        assert_eq!(h.engine.snapshot().get(Field::RudderSensitivity), 0.4);
    }

    #[test]
    fn virtual_buttons_go_to_the_emulator() {
        let mut h = harness();
        h.engine.on_control(ControlWrite::new(EventId(EventId::VJOY_BUTTONS.0 + 5), 1.0));
        assert_eq!(h.buttons.items(), vec![5]);
        assert!(h.writes.is_empty());
    }

    #[test]
    fn boarding_sequence_then_pushback() {
        let mut h = harness();
        h.engine.on_frame(&HostBlockBuilder::new().build()).unwrap();

        let replies: Vec<_> = (0..4)
            .map(|_| h.engine.on_control(ControlWrite::new(EventId::CHECK_CUSTOM_EVENT, 1.0)).reply)
            .collect();
        assert_eq!(
            replies,
            vec![
                Some(CabinEvent::DoorsForBoarding.id()),
                Some(CabinEvent::WelcomeOnBoard.id()),
                Some(CabinEvent::BoardingComplete.id()),
                Some(CabinEvent::None.id()),
            ]
        );

        let outcome = h.engine.on_control(ControlWrite::new(EventId::CHECK_CUSTOM_EVENT, 2.0));
        assert_eq!(outcome.reply, Some(CabinEvent::PushbackStart.id()));
        assert_eq!(outcome.deferred, vec![ControlWrite::new(EventId::TOGGLE_PUSHBACK, 0.0)]);
        // the toggle is only sent once the server forwards it
        assert!(h.writes.is_empty());
        let last = h.engine.snapshot().get(Field::LastCabinEvent);
        assert_eq!(last, CabinEvent::PushbackStart.id() as f64);
    }

    #[test]
    fn variant_reads_and_vendor_responses() {
        let mut h = harness();
        let block = HostBlockBuilder::new().title("iniBuilds A310-300").build();
        h.engine.on_frame(&block).unwrap();
        assert_eq!(h.engine.variant(), AircraftVariant::A310);
        assert!(h.bridge.requests().items().contains(&read_expression(a310::PITCH_MODE)));

        h.bridge.respond(format!("({}){}", a310::PITCH_MODE, 6.0));
        h.engine.on_frame(&block).unwrap();
        assert_eq!(h.engine.snapshot().get(Field::VerticalHoldMode), 1.0);
    }

    #[test]
    fn translated_writes_use_the_bridge() {
        let mut h = harness();
        h.engine.on_frame(&HostBlockBuilder::new().title("A310").build()).unwrap();
        h.bridge.requests().take();

        h.engine.on_control(ControlWrite::new(EventId::AP_MASTER, 1.0));
        assert_eq!(h.bridge.requests().items(), vec![write_expression(a310::AUTOPILOT_ON, 1.0)]);
        assert!(h.writes.is_empty());
    }

    #[test]
    fn aircraft_change_resets_vendor_state() {
        let mut h = harness();
        h.engine.on_frame(&HostBlockBuilder::new().title("A310").build()).unwrap();
        h.bridge.respond(format!("({})1", a310::AUTOPILOT));
        h.engine.on_frame(&HostBlockBuilder::new().title("A310").build()).unwrap();
        assert_eq!(h.engine.snapshot().get(Field::AutopilotEngaged), 1.0);

        h.engine.on_frame(&HostBlockBuilder::new().title("Kodiak 100").build()).unwrap();
        h.engine.on_frame(&HostBlockBuilder::new().title("A310").build()).unwrap();
        assert_eq!(h.engine.snapshot().get(Field::AutopilotEngaged), 0.0);
    }

    #[test]
    fn reset_zeroes_the_snapshot() {
        let mut h = harness();
        h.engine.on_frame(&HostBlockBuilder::new().title("A310").build()).unwrap();
        h.engine.reset();
        assert!(!h.engine.is_connected());
        assert!(h.engine.snapshot().as_bytes().iter().all(|b| *b == 0));
        assert_eq!(h.engine.variant(), AircraftVariant::GenericGa);
    }
}
