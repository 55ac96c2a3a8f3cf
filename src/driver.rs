//! Driver spawns and manages the engine task

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::engine::{ControlOutcome, Engine};
use crate::provider::TelemetrySource;
use crate::types::{ControlWrite, FieldDescriptor, Snapshot};
use crate::{LinkError, Result};

/// Consecutive source errors tolerated before the source is abandoned.
pub const MAX_ERRORS: u32 = 10;

/// Request from the networking side to the engine task.
#[derive(Debug)]
pub enum ControlRequest {
    /// A panel write; the outcome carries any reply owed to the panel
    Write { write: ControlWrite, reply: oneshot::Sender<ControlOutcome> },
    /// A deferred write going straight to the host
    Forward(ControlWrite),
}

/// Send a panel write to the engine task and wait up to `wait` for its outcome.
pub async fn request_control(
    controls: &mpsc::Sender<ControlRequest>,
    write: ControlWrite,
    wait: Duration,
) -> Result<ControlOutcome> {
    let (reply, outcome) = oneshot::channel();
    controls
        .send(ControlRequest::Write { write, reply })
        .await
        .map_err(|_| LinkError::EngineStopped)?;

    match tokio::time::timeout(wait, outcome).await {
        Ok(Ok(outcome)) => Ok(outcome),
        Ok(Err(_)) => Err(LinkError::EngineStopped),
        Err(_) => Err(LinkError::Timeout { duration: wait }),
    }
}

/// Result of spawning the driver task
pub struct DriverChannels {
    /// Receiver for published snapshots
    pub snapshots: watch::Receiver<Arc<Snapshot>>,
    /// Sender for control requests
    pub controls: mpsc::Sender<ControlRequest>,
    /// Cancellation token for graceful shutdown
    pub cancel: CancellationToken,
    pub task: JoinHandle<()>,
}

/// Driver spawns the engine task
///
/// The task owns the [`Engine`] and the [`TelemetrySource`]. It is the only
/// writer of the snapshot; every cycle publishes an immutable copy through a
/// `watch` channel, so readers never observe a half-written snapshot.
pub struct Driver;

impl Driver {
    /// Spawn the engine task for the given source
    pub fn spawn<S>(source: S, engine: Engine, queue_depth: usize) -> DriverChannels
    where
        S: TelemetrySource,
    {
        let initial = Arc::new(engine.snapshot().clone());
        let (snapshot_tx, snapshot_rx) = watch::channel(initial);
        let (control_tx, control_rx) = mpsc::channel(queue_depth.max(1));
        let cancel = CancellationToken::new();

        let cancel_task = cancel.clone();
        let task = tokio::spawn(async move {
            Self::engine_task(source, engine, snapshot_tx, control_rx, cancel_task).await;
        });

        DriverChannels { snapshots: snapshot_rx, controls: control_tx, cancel, task }
    }

    /// Engine task - interleaves host frames and control requests
    async fn engine_task<S>(
        mut source: S,
        mut engine: Engine,
        snapshot_tx: watch::Sender<Arc<Snapshot>>,
        mut controls: mpsc::Receiver<ControlRequest>,
        cancel: CancellationToken,
    ) where
        S: TelemetrySource,
    {
        info!("Engine task started");
        let mut frame_count = 0u64;
        let mut error_count = 0u32;
        let mut source_live = true;
        let mut controls_open = true;

        let host_fields: Vec<FieldDescriptor> = engine.schema().host_fields().cloned().collect();
        if let Err(e) = Self::register(&mut source, &host_fields, &cancel).await {
            error!("Telemetry source registration failed: {}", e);
            source_live = false;
        }

        loop {
            if !source_live && !controls_open {
                debug!("Source ended and no control senders remain");
                break;
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Engine task cancelled");
                    break;
                }
                request = controls.recv(), if controls_open => match request {
                    Some(request) => {
                        Self::handle_control(&mut engine, request);
                        Self::publish(&engine, &snapshot_tx);
                    }
                    None => controls_open = false,
                },
                result = source.next_frame(), if source_live => match result {
                    Ok(Some(block)) => {
                        match engine.on_frame(&block) {
                            Ok(()) => {
                                frame_count += 1;
                                error_count = 0;
                                trace!(frame = frame_count, "Frame processed");
                                Self::publish(&engine, &snapshot_tx);
                            }
                            Err(e) => {
                                if !Self::back_off(&mut error_count, &e, &cancel).await {
                                    engine.reset();
                                    Self::publish(&engine, &snapshot_tx);
                                    source_live = false;
                                }
                            }
                        }
                    }
                    Ok(None) => {
                        info!("Telemetry source ended after {} frames", frame_count);
                        engine.reset();
                        Self::publish(&engine, &snapshot_tx);
                        source_live = false;
                    }
                    Err(e) => {
                        if !Self::back_off(&mut error_count, &e, &cancel).await {
                            engine.reset();
                            Self::publish(&engine, &snapshot_tx);
                            source_live = false;
                        }
                    }
                },
            }
        }

        info!("Engine task ended (processed {} frames)", frame_count);
    }

    async fn register<S: TelemetrySource>(
        source: &mut S,
        fields: &[FieldDescriptor],
        cancel: &CancellationToken,
    ) -> Result<()> {
        let mut error_count = 0u32;
        loop {
            match source.register(fields).await {
                Ok(()) => {
                    debug!(fields = fields.len(), "Registered host fields");
                    return Ok(());
                }
                Err(e) => {
                    if !Self::back_off(&mut error_count, &e, cancel).await {
                        return Err(e);
                    }
                }
            }
        }
    }

    /// Count an error and sleep. Returns false once the source should be abandoned.
    async fn back_off(
        error_count: &mut u32,
        e: &LinkError,
        cancel: &CancellationToken,
    ) -> bool {
        *error_count += 1;
        error!("Telemetry source error ({}/{}): {}", error_count, MAX_ERRORS, e);

        if *error_count >= MAX_ERRORS {
            error!("Too many telemetry source errors, giving up on the source");
            return false;
        }

        // Exponential backoff: 50ms, 100ms, 200ms, ...
        let backoff = Duration::from_millis(50 * (1 << (*error_count).min(5)));
        tokio::select! {
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(backoff) => true,
        }
    }

    fn handle_control(engine: &mut Engine, request: ControlRequest) {
        match request {
            ControlRequest::Write { write, reply } => {
                let outcome = engine.on_control(write);
                if reply.send(outcome).is_err() {
                    warn!(event = %write.event, "Control requester went away before the reply");
                }
            }
            ControlRequest::Forward(write) => engine.forward(write),
        }
    }

    fn publish(engine: &Engine, tx: &watch::Sender<Arc<Snapshot>>) {
        tx.send_replace(Arc::new(engine.snapshot().clone()));
    }
}
