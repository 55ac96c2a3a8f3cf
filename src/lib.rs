//! Telemetry link between a flight simulator and hardware instrument panels.
//!
//! The link keeps one canonical snapshot of the simulator state, corrected for
//! the loaded aircraft and enriched with a derived flight phase and cabin
//! announcements, and serves it over UDP to panels that poll one of four
//! nested channels. After a panel's first full response only changed fields
//! are sent.
//!
//! # Architecture
//!
//! - An engine task (see [`driver`]) owns all mutable state. It consumes host
//!   frames from a [`TelemetrySource`], runs the aircraft corrections and the
//!   cabin state machine, and publishes an immutable [`Snapshot`] per cycle.
//! - A server task owns the socket and the [`mux::Multiplexer`]. It answers
//!   polls from the latest published snapshot and hands control writes to the
//!   engine through a queue. Between datagrams it polls directly attached
//!   controllers; see [`DataLink::controller_edges`].
//!
//! # Example
//!
//! ```rust,no_run
//! use datalink::providers::{ChannelSource, Discard};
//! use datalink::{Collaborators, DataLink, LinkConfig};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     datalink::logging::init()?;
//!     let (frames, source) = ChannelSource::new(16);
//!     let link = DataLink::start(
//!         LinkConfig::default(),
//!         source,
//!         Collaborators::new(Discard, Discard, Discard, Discard),
//!     )
//!     .await?;
//!     println!("serving panels on {}", link.local_addr());
//!
//!     let mut updates = Box::pin(link.snapshot_updates());
//!     while let Some(snapshot) = updates.next().await {
//!         println!("{} bytes published", snapshot.as_bytes().len());
//!     }
//!     drop(frames);
//!     link.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod codec;
pub mod config;
pub mod controllers;
pub mod driver;
pub mod engine;
mod error;
pub mod flight;
pub mod logging;
pub mod mux;
pub mod provider;
pub mod providers;
pub mod schema;
pub mod server;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::{Stream, StreamExt, future};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::{BroadcastStream, WatchStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub use config::LinkConfig;
pub use error::*;
pub use provider::{
    ButtonEmulator, Collaborators, ControllerPoller, HostWriter, TelemetrySource, VarBridge,
};
pub use types::{ChannelId, ControlWrite, EventId, Schema, Snapshot};

use controllers::{AxisSnapshot, ButtonEdge};
use driver::{ControlRequest, Driver, request_control};
use engine::{ControlOutcome, Engine, EngineCollaborators};
use server::Server;

/// A running link: the engine task plus the panel server.
///
/// Dropping the link cancels both tasks; [`DataLink::shutdown`] also waits
/// for them to finish.
pub struct DataLink {
    snapshots: watch::Receiver<Arc<Snapshot>>,
    controls: mpsc::Sender<ControlRequest>,
    edges: broadcast::Sender<ButtonEdge>,
    axes: watch::Receiver<Arc<AxisSnapshot>>,
    local_addr: SocketAddr,
    server_cancel: CancellationToken,
    server: Option<JoinHandle<()>>,
    driver_cancel: CancellationToken,
    driver: Option<JoinHandle<()>>,
}

impl DataLink {
    /// Start a link serving the canonical schema.
    pub async fn start<S: TelemetrySource>(
        config: LinkConfig,
        source: S,
        collaborators: Collaborators,
    ) -> Result<Self> {
        let schema = Arc::new(schema::canonical_schema()?);
        Self::start_with_schema(config, schema, source, collaborators).await
    }

    /// Start a link over a custom schema.
    ///
    /// The schema must still carry every canonical field the engine writes;
    /// this is meant for tests and tools that replay reduced field sets.
    pub async fn start_with_schema<S: TelemetrySource>(
        config: LinkConfig,
        schema: Arc<Schema>,
        source: S,
        collaborators: Collaborators,
    ) -> Result<Self> {
        config.validate()?;

        let Collaborators { writer, bridge, buttons, controllers } = collaborators;
        let engine = Engine::new(
            schema,
            EngineCollaborators { writer, bridge, buttons },
            config.heading_drift_threshold,
        );
        let channels = Driver::spawn(source, engine, config.control_queue_depth);

        let bound = Server::bind(
            &config,
            channels.snapshots.clone(),
            channels.controls.clone(),
            controllers,
        )
        .await
        .and_then(|server| server.local_addr().map(|addr| (server, addr)));
        let (server, local_addr) = match bound {
            Ok(bound) => bound,
            Err(e) => {
                channels.cancel.cancel();
                return Err(e);
            }
        };

        let edges = server.edges();
        let axes = server.axes();
        let server_cancel = CancellationToken::new();
        let server_task = tokio::spawn(server.run(server_cancel.clone()));
        info!(%local_addr, "Data link started");

        Ok(Self {
            snapshots: channels.snapshots,
            controls: channels.controls,
            edges,
            axes,
            local_addr,
            server_cancel,
            server: Some(server_task),
            driver_cancel: channels.cancel,
            driver: Some(channels.task),
        })
    }

    /// Address the panel socket is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshots.borrow().clone()
    }

    /// Stream of published snapshots, starting with the current one.
    pub fn snapshot_updates(&self) -> impl Stream<Item = Arc<Snapshot>> + 'static {
        WatchStream::new(self.snapshots.clone())
    }

    /// Button edges from directly attached controllers.
    ///
    /// Only edges produced after the call are delivered. A subscriber that
    /// falls behind loses the oldest edges.
    pub fn controller_edges(&self) -> impl Stream<Item = ButtonEdge> + 'static {
        BroadcastStream::new(self.edges.subscribe()).filter_map(|edge| {
            future::ready(match edge {
                Ok(edge) => Some(edge),
                Err(e) => {
                    warn!(error = %e, "Controller edge subscriber lagged");
                    None
                }
            })
        })
    }

    /// Zeroed axes of every controller seen so far.
    pub fn controller_axes(&self) -> Arc<AxisSnapshot> {
        self.axes.borrow().clone()
    }

    /// Submit a control write as if a panel had sent it.
    pub async fn control(&self, write: ControlWrite, wait: Duration) -> Result<ControlOutcome> {
        let outcome = request_control(&self.controls, write, wait).await?;
        for deferred in &outcome.deferred {
            self.controls
                .send(ControlRequest::Forward(*deferred))
                .await
                .map_err(|_| LinkError::EngineStopped)?;
        }
        Ok(outcome)
    }

    /// Stop the server, then the engine task, and wait for both.
    pub async fn shutdown(mut self) {
        self.server_cancel.cancel();
        if let Some(task) = self.server.take() {
            if let Err(e) = task.await {
                warn!("Panel server task failed: {}", e);
            }
        }

        self.driver_cancel.cancel();
        if let Some(task) = self.driver.take() {
            if let Err(e) = task.await {
                warn!("Engine task failed: {}", e);
            }
        }
        info!("Data link stopped");
    }
}

impl Drop for DataLink {
    fn drop(&mut self) {
        debug!("Dropping data link");
        self.server_cancel.cancel();
        self.driver_cancel.cancel();
    }
}
