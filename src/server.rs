//! UDP server answering panel requests
//!
//! The server owns the socket and the [`Multiplexer`]. Each datagram is
//! answered against one immutable snapshot borrowed from the engine's watch
//! channel; control writes travel to the engine task over its request queue.
//! When the socket stays quiet for the poll timeout the server polls the
//! directly attached controllers instead, broadcasting button edges and
//! publishing the zeroed axes.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::net::UdpSocket;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::config::LinkConfig;
use crate::controllers::{AxisSnapshot, ButtonEdge, ControllerBank};
use crate::driver::{ControlRequest, request_control};
use crate::mux::{Dispatch, Multiplexer};
use crate::provider::ControllerPoller;
use crate::types::{ControlWrite, Snapshot};
use crate::{LinkError, Result};

/// Pause after a failed receive before trying again.
const RECV_ERROR_PAUSE: Duration = Duration::from_millis(100);

/// How long a control write may wait for the engine task.
const CONTROL_REPLY_TIMEOUT: Duration = Duration::from_secs(1);

/// Button edges buffered per subscriber before the oldest are dropped.
const EDGE_BUFFER: usize = 64;

pub struct Server {
    socket: UdpSocket,
    mux: Multiplexer,
    snapshots: watch::Receiver<Arc<Snapshot>>,
    controls: mpsc::Sender<ControlRequest>,
    controllers: Box<dyn ControllerPoller>,
    bank: ControllerBank,
    edges: broadcast::Sender<ButtonEdge>,
    axes: watch::Sender<Arc<AxisSnapshot>>,
    poll_timeout: Duration,
    receive_buffer: usize,
}

impl Server {
    /// Bind the panel socket.
    pub async fn bind(
        config: &LinkConfig,
        snapshots: watch::Receiver<Arc<Snapshot>>,
        controls: mpsc::Sender<ControlRequest>,
        controllers: Box<dyn ControllerPoller>,
    ) -> Result<Self> {
        let addr = config.socket_addr();
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|e| LinkError::network(format!("bind {}", addr), e))?;

        Ok(Self {
            socket,
            mux: Multiplexer::new(config.inactivity(), config.differencing),
            snapshots,
            controls,
            controllers,
            bank: ControllerBank::new(),
            edges: broadcast::channel(EDGE_BUFFER).0,
            axes: watch::channel(Arc::new(AxisSnapshot::new())).0,
            poll_timeout: config.poll_timeout(),
            receive_buffer: config.receive_buffer,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket.local_addr().map_err(|e| LinkError::network("local_addr", e))
    }

    /// Sender side of the button edge broadcast; subscribe for edges.
    pub fn edges(&self) -> broadcast::Sender<ButtonEdge> {
        self.edges.clone()
    }

    /// Zeroed controller axes, updated whenever a poll changes them.
    pub fn axes(&self) -> watch::Receiver<Arc<AxisSnapshot>> {
        self.axes.subscribe()
    }

    /// Serve requests until cancelled.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!(local_addr = ?self.socket.local_addr().ok(), "Panel server started");

        let mut buffer = vec![0u8; self.receive_buffer];
        let mut datagrams = 0u64;

        loop {
            let received = tokio::select! {
                _ = cancel.cancelled() => break,
                received = timeout(self.poll_timeout, self.socket.recv_from(&mut buffer)) => {
                    received
                }
            };

            match received {
                Ok(Ok((len, peer))) => {
                    datagrams += 1;
                    trace!(%peer, len, "Datagram received");
                    self.handle(&buffer[..len], peer).await;
                }
                Ok(Err(e)) => {
                    warn!(error = %e, "UDP receive error");
                    tokio::time::sleep(RECV_ERROR_PAUSE).await;
                }
                Err(_) => self.poll_controllers(),
            }

            self.mux.expire_idle(Instant::now());
        }

        info!(datagrams, "Panel server stopped");
    }

    async fn handle(&mut self, datagram: &[u8], peer: SocketAddr) {
        let snapshot = self.snapshots.borrow().clone();

        match self.mux.dispatch(datagram, peer, &snapshot, Instant::now()) {
            Dispatch::Poll { channel, payload, .. } => {
                if let Err(e) = self.socket.send_to(&payload, peer).await {
                    warn!(%channel, %peer, error = %e, "Failed to send channel data");
                    self.mux.invalidate(channel);
                }
            }
            Dispatch::Control(write) => self.control(write, peer).await,
            Dispatch::Reply(bytes) => send(&self.socket, &bytes, peer).await,
            Dispatch::Ignore => {}
        }
    }

    async fn control(&mut self, write: ControlWrite, peer: SocketAddr) {
        let outcome = match request_control(&self.controls, write, CONTROL_REPLY_TIMEOUT).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(event = %write.event, "Control write not handled: {}", e);
                return;
            }
        };

        // the id goes out before anything the engine deferred
        if let Some(id) = outcome.reply {
            debug!(%peer, id, "Cabin event reply");
            send(&self.socket, &id.to_le_bytes(), peer).await;
        }
        for deferred in outcome.deferred {
            if self.controls.send(ControlRequest::Forward(deferred)).await.is_err() {
                warn!(event = %deferred.event, "Engine task stopped, dropping deferred write");
            }
        }
    }

    fn poll_controllers(&mut self) {
        let readings = self.controllers.poll();
        if readings.is_empty() {
            return;
        }

        let edges = self.bank.update(&readings);
        let axes = self.bank.axis_snapshot();
        self.axes.send_if_modified(|current| {
            if **current == axes {
                return false;
            }
            *current = Arc::new(axes);
            true
        });

        for edge in edges {
            // no subscribers is not an error
            if self.edges.send(edge).is_err() {
                trace!("No controller edge subscribers");
            }
        }
    }
}

async fn send(socket: &UdpSocket, bytes: &[u8], peer: SocketAddr) {
    if let Err(e) = socket.send_to(bytes, peer).await {
        warn!(%peer, error = %e, "Failed to send reply");
    }
}
