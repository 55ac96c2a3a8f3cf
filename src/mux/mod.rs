//! Channel multiplexer.
//!
//! Panels subscribe to one of four prefix channels simply by polling with the
//! channel's byte size. The multiplexer keeps one delta baseline per channel,
//! decides between full and delta responses, and tracks which channels have an
//! attached panel.
//!
//! # Request handling
//!
//! | leading i32            | meaning                     | response                   |
//! |------------------------|-----------------------------|----------------------------|
//! | 16                     | control write               | cabin event id, or nothing |
//! | a channel size         | poll (optional flags word)  | full or delta channel data |
//! | anything else          | unknown                     | instruments size as i32    |
//!
//! A poll is answered in full when it is the channel's first poll, when it
//! comes from a different endpoint than the last one, when the panel sets the
//! want-full flag, or when differencing is disabled.

mod request;

pub use request::{Request, WANT_FULL, encode_poll};

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::codec::{DeltaCodec, Encoding};
use crate::types::{ChannelId, ControlWrite, Snapshot};

/// What the server should do with a datagram.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Send channel data back to the poller
    Poll { channel: ChannelId, payload: Vec<u8>, encoding: Encoding },
    /// Hand a write to the engine
    Control(ControlWrite),
    /// Reply to an unrecognized request
    Reply(Vec<u8>),
    /// Nothing to send
    Ignore,
}

#[derive(Debug)]
struct ChannelState {
    codec: DeltaCodec,
    peer: Option<SocketAddr>,
    last_poll: Option<Instant>,
    attached: bool,
}

impl ChannelState {
    fn new(channel: ChannelId) -> Self {
        Self { codec: DeltaCodec::new(channel), peer: None, last_poll: None, attached: false }
    }
}

pub struct Multiplexer {
    channels: [ChannelState; 4],
    inactivity: Duration,
    differencing: bool,
}

impl Multiplexer {
    pub fn new(inactivity: Duration, differencing: bool) -> Self {
        Self { channels: ChannelId::ALL.map(ChannelState::new), inactivity, differencing }
    }

    /// Classify a datagram and produce the response for it.
    pub fn dispatch(
        &mut self,
        datagram: &[u8],
        peer: SocketAddr,
        snapshot: &Snapshot,
        now: Instant,
    ) -> Dispatch {
        let schema = snapshot.schema();
        match Request::parse(datagram, schema) {
            Ok(Request::Write(write)) => Dispatch::Control(write),
            Ok(Request::Poll { channel, want_full }) => {
                self.poll(channel, want_full, peer, snapshot, now)
            }
            Ok(Request::Unknown { size }) => {
                let instruments = schema.channel_size(ChannelId::Instruments);
                warn!(?size, %peer, expected = instruments, "Unexpected request size");
                Dispatch::Reply((instruments as i32).to_le_bytes().to_vec())
            }
            Err(e) => {
                warn!(%peer, "Malformed request: {}", e);
                Dispatch::Ignore
            }
        }
    }

    fn poll(
        &mut self,
        channel: ChannelId,
        want_full: bool,
        peer: SocketAddr,
        snapshot: &Snapshot,
        now: Instant,
    ) -> Dispatch {
        let differencing = self.differencing;
        let state = &mut self.channels[channel.index()];

        let new_peer = state.peer != Some(peer);
        if !state.attached {
            info!(%channel, %peer, "Panel connected");
            state.attached = true;
        } else if new_peer {
            info!(%channel, %peer, "Panel endpoint changed");
        }
        state.peer = Some(peer);
        state.last_poll = Some(now);

        let (payload, encoding) = if new_peer || want_full || !differencing {
            (state.codec.send_full(snapshot), Encoding::Full)
        } else {
            state.codec.send_delta(snapshot)
        };
        debug!(%channel, bytes = payload.len(), ?encoding, "Poll answered");
        Dispatch::Poll { channel, payload, encoding }
    }

    /// Detach channels whose panel has been silent for the inactivity window.
    pub fn expire_idle(&mut self, now: Instant) {
        let inactivity = self.inactivity;
        for state in self.channels.iter_mut().filter(|s| s.attached) {
            let idle = state
                .last_poll
                .is_none_or(|t| now.saturating_duration_since(t) > inactivity);
            if idle {
                info!(channel = %state.codec.channel(), peer = ?state.peer, "Panel disconnected");
                state.attached = false;
                state.peer = None;
                state.codec.invalidate();
            }
        }
    }

    /// Drop a channel's baseline, e.g. after a failed send.
    pub fn invalidate(&mut self, channel: ChannelId) {
        self.channels[channel.index()].codec.invalidate();
    }

    pub fn is_attached(&self, channel: ChannelId) -> bool {
        self.channels[channel.index()].attached
    }

    pub fn attached_count(&self) -> usize {
        self.channels.iter().filter(|s| s.attached).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Mirror, NUMERIC_RECORD_SIZE};
    use crate::test_utils::small_schema;
    use crate::types::EventId;
    use std::sync::Arc;

    fn peer(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    fn snapshot() -> Snapshot {
        let mut snapshot = Snapshot::new(Arc::new(small_schema()));
        snapshot.write_named("connected", 1.0f64).unwrap();
        snapshot
    }

    fn poll(
        mux: &mut Multiplexer,
        size: usize,
        full: bool,
        from: SocketAddr,
        s: &Snapshot,
        now: Instant,
    ) -> (Vec<u8>, Encoding) {
        match mux.dispatch(&encode_poll(size, full), from, s, now) {
            Dispatch::Poll { payload, encoding, .. } => (payload, encoding),
            other => panic!("expected poll response, got {:?}", other),
        }
    }

    #[test]
    fn first_poll_is_full_then_deltas() {
        let mut mux = Multiplexer::new(Duration::from_secs(1), true);
        let mut s = snapshot();
        let now = Instant::now();

        let (payload, encoding) = poll(&mut mux, 40, false, peer(1), &s, now);
        assert_eq!(encoding, Encoding::Full);
        assert_eq!(payload.len(), 40);
        assert!(mux.is_attached(ChannelId::Radio));

        let (payload, encoding) = poll(&mut mux, 40, false, peer(1), &s, now);
        assert_eq!(encoding, Encoding::Delta { records: 1 });
        assert_eq!(payload.len(), NUMERIC_RECORD_SIZE);

        s.write_named("com1", 118.5f64).unwrap();
        let mut mirror = Mirror::for_channel(s.schema(), ChannelId::Radio);
        mirror.apply(snapshot().channel_bytes(ChannelId::Radio)).unwrap();
        let (payload, _) = poll(&mut mux, 40, false, peer(1), &s, now);
        mirror.apply(&payload).unwrap();
        assert_eq!(mirror.bytes(), s.channel_bytes(ChannelId::Radio));
    }

    #[test]
    fn want_full_flag_and_new_peer_force_full() {
        let mut mux = Multiplexer::new(Duration::from_secs(1), true);
        let s = snapshot();
        let now = Instant::now();
        poll(&mut mux, 24, false, peer(1), &s, now);

        assert_eq!(poll(&mut mux, 24, true, peer(1), &s, now).1, Encoding::Full);
        assert_eq!(poll(&mut mux, 24, false, peer(2), &s, now).1, Encoding::Full);
        assert!(matches!(poll(&mut mux, 24, false, peer(2), &s, now).1, Encoding::Delta { .. }));
    }

    #[test]
    fn differencing_disabled_always_sends_full() {
        let mut mux = Multiplexer::new(Duration::from_secs(1), false);
        let s = snapshot();
        let now = Instant::now();
        for _ in 0..3 {
            assert_eq!(poll(&mut mux, 88, false, peer(1), &s, now).1, Encoding::Full);
        }
    }

    #[test]
    fn unknown_size_replies_with_instruments_size() {
        let mut mux = Multiplexer::new(Duration::from_secs(1), true);
        let s = snapshot();
        match mux.dispatch(&encode_poll(7, false), peer(1), &s, Instant::now()) {
            Dispatch::Reply(bytes) => assert_eq!(bytes, 88i32.to_le_bytes().to_vec()),
            other => panic!("expected reply, got {:?}", other),
        }
        let short = mux.dispatch(&[0], peer(1), &s, Instant::now());
        assert!(matches!(short, Dispatch::Reply(b) if b.len() == 4));
    }

    #[test]
    fn writes_go_to_the_engine() {
        let mut mux = Multiplexer::new(Duration::from_secs(1), true);
        let write = ControlWrite::new(EventId::CHECK_CUSTOM_EVENT, 1.0);
        assert_eq!(
            mux.dispatch(&write.encode(), peer(1), &snapshot(), Instant::now()),
            Dispatch::Control(write)
        );
        assert_eq!(mux.attached_count(), 0);
    }

    #[test]
    fn idle_channels_detach_and_resend_full() {
        let mut mux = Multiplexer::new(Duration::from_millis(100), true);
        let s = snapshot();
        let start = Instant::now();
        poll(&mut mux, 48, false, peer(1), &s, start);

        mux.expire_idle(start + Duration::from_millis(50));
        assert!(mux.is_attached(ChannelId::Autopilot));

        mux.expire_idle(start + Duration::from_millis(150));
        assert!(!mux.is_attached(ChannelId::Autopilot));

        let later = start + Duration::from_millis(200);
        assert_eq!(poll(&mut mux, 48, false, peer(1), &s, later).1, Encoding::Full);
    }

    #[test]
    fn invalidate_forces_next_poll_full() {
        let mut mux = Multiplexer::new(Duration::from_secs(1), true);
        let s = snapshot();
        let now = Instant::now();
        poll(&mut mux, 24, false, peer(1), &s, now);
        mux.invalidate(ChannelId::Lights);
        assert_eq!(poll(&mut mux, 24, false, peer(1), &s, now).1, Encoding::Full);
    }
}
