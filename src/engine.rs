//! Engine: callback registration, the read loop, pause/resume.
//!
//! [`RechunkerBuilder`] configures the engine — initial frame size,
//! optional decoding stage, data and finish callbacks — and
//! [`RechunkerBuilder::start`] validates the configuration, records the
//! start timestamp, and spawns the read loop. The returned [`Rechunker`]
//! is the flow-control handle: pause, resume, and await completion.
//!
//! The read loop is strictly sequential: one outstanding source pull at
//! a time, frames delivered in arrival order, the finish callback firing
//! strictly after the last data callback.
//!
//! # Example
//!
//! ```
//! use rechunk::{Rechunker, source};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> rechunk::Result<()> {
//! let engine = Rechunker::builder("demo", 4)
//!     .on_data(|frame, meta| {
//!         println!("{} bytes (fulfilled: {})", frame.len(), meta.fulfilled);
//!         None // keep the current frame size
//!     })
//!     .start(source::segments([&b"ABC"[..], &b"DE"[..]]))?;
//!
//! let stats = engine.wait_until_finished().await?;
//! assert_eq!(stats.bytes_received, 5);
//! assert_eq!(stats.bytes_processed, 5);
//! # Ok(())
//! # }
//! ```

use std::io;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::task::JoinHandle;

use crate::decode::TextDecoder;
use crate::error::{RechunkError, Result};
use crate::flow::FlowGate;
use crate::frame::{Frame, FrameMeta, StreamStats};
use crate::rebuffer::FrameAssembler;

/// Per-frame callback: receives each completed frame and its metadata.
///
/// Returning `Some(n)` with `n > 0` renegotiates the frame size starting
/// with the next frame; any other return leaves the size unchanged.
type DataFn = dyn FnMut(Frame, FrameMeta) -> Option<usize> + Send;

/// End-of-stream callback: receives the summary statistics.
type FinishFn = dyn FnOnce(&StreamStats) + Send;

/// Builder for configuring and starting a re-buffering engine.
pub struct RechunkerBuilder {
    source_id: String,
    target_size: usize,
    encoding_label: Option<String>,
    on_data: Box<DataFn>,
    on_finish: Box<FinishFn>,
}

impl RechunkerBuilder {
    /// Create a builder for the given source identifier and initial
    /// target frame size.
    ///
    /// `source_id` is opaque to the engine; it is carried into log
    /// output only. The size is validated at [`start`](Self::start).
    pub fn new(source_id: impl Into<String>, target_chunk_size: usize) -> Self {
        Self {
            source_id: source_id.into(),
            target_size: target_chunk_size,
            encoding_label: None,
            on_data: Box::new(|_, _| None),
            on_finish: Box::new(|_| {}),
        }
    }

    /// Decode every emitted frame to text using the given WHATWG
    /// encoding label ("utf-8", "shift_jis", ...).
    ///
    /// The decoding stage is fixed once the engine starts. Frames are
    /// decoded independently of one another; see
    /// [`decode`](crate::decode) for the boundary caveat.
    pub fn decode_as(mut self, label: impl Into<String>) -> Self {
        self.encoding_label = Some(label.into());
        self
    }

    /// Register the per-frame callback.
    ///
    /// The callback's return value, when `Some(n)` with `n > 0`, becomes
    /// the target size for subsequent frames; `None` or `Some(0)` leaves
    /// the size unchanged. Registering again silently replaces the
    /// previous callback.
    pub fn on_data<F>(mut self, callback: F) -> Self
    where
        F: FnMut(Frame, FrameMeta) -> Option<usize> + Send + 'static,
    {
        self.on_data = Box::new(callback);
        self
    }

    /// Register the end-of-stream callback.
    ///
    /// Invoked exactly once, strictly after the last data callback, with
    /// the summary statistics. Not invoked when the source fails.
    /// Registering again silently replaces the previous callback.
    pub fn on_finish<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(&StreamStats) + Send + 'static,
    {
        self.on_finish = Box::new(callback);
        self
    }

    /// Validate the configuration, record the start timestamp, and spawn
    /// the read loop.
    ///
    /// Consuming the builder makes starting twice unrepresentable. Must
    /// be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Fails fast with [`RechunkError::InvalidChunkSize`] for a zero
    /// target size and [`RechunkError::UnknownEncoding`] for an
    /// unresolvable decoding label.
    pub fn start<S>(self, source: S) -> Result<Rechunker>
    where
        S: Stream<Item = io::Result<Bytes>> + Send + Unpin + 'static,
    {
        let assembler = FrameAssembler::new(self.target_size)?;
        let decoder = match &self.encoding_label {
            Some(label) => Some(TextDecoder::for_label(label)?),
            None => None,
        };

        tracing::debug!(
            source = %self.source_id,
            target_size = self.target_size,
            encoding = decoder.map(|d| d.name()),
            "starting read loop"
        );

        let gate = Arc::new(FlowGate::new());
        let worker = ReadLoop {
            source_id: self.source_id,
            source,
            assembler,
            decoder,
            on_data: self.on_data,
            on_finish: self.on_finish,
            gate: gate.clone(),
            started: Instant::now(),
        };

        let task = tokio::spawn(worker.run());

        Ok(Rechunker { gate, task })
    }
}

/// A running re-buffering engine.
///
/// Dropping the handle does not stop the engine; the read loop runs
/// until the source ends or fails.
pub struct Rechunker {
    gate: Arc<FlowGate>,
    task: JoinHandle<Result<StreamStats>>,
}

impl Rechunker {
    /// Create a builder for the given source identifier and initial
    /// target frame size.
    pub fn builder(source_id: impl Into<String>, target_chunk_size: usize) -> RechunkerBuilder {
        RechunkerBuilder::new(source_id, target_chunk_size)
    }

    /// Stop the engine from requesting the next segment once the current
    /// in-flight pull resolves.
    ///
    /// An already-issued pull is not cancelled and its bytes are still
    /// folded in — pausing delays subsequent reads, it never discards
    /// data. No-op after termination.
    pub fn pause(&self) {
        self.gate.pause();
    }

    /// Resume reading; the next segment is requested immediately if one
    /// is not already in flight. No-op after termination.
    pub fn resume(&self) {
        self.gate.resume();
    }

    /// Check whether the engine is currently paused.
    pub fn is_paused(&self) -> bool {
        !self.gate.is_open()
    }

    /// Wait for the source to end and return the summary statistics —
    /// the same values handed to the finish callback.
    ///
    /// Returns the error that halted the read loop when the source
    /// failed. A panic raised by a consumer callback is resumed on the
    /// awaiting task; the engine never suppresses callback failures.
    pub async fn wait_until_finished(self) -> Result<StreamStats> {
        match self.task.await {
            Ok(result) => result,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => Err(RechunkError::Stopped),
        }
    }
}

/// State moved into the spawned read-loop task.
struct ReadLoop<S> {
    source_id: String,
    source: S,
    assembler: FrameAssembler,
    decoder: Option<TextDecoder>,
    on_data: Box<DataFn>,
    on_finish: Box<FinishFn>,
    gate: Arc<FlowGate>,
    started: Instant,
}

impl<S> ReadLoop<S>
where
    S: Stream<Item = io::Result<Bytes>> + Unpin,
{
    /// Pull segments one at a time and fold them through the assembler
    /// until the source ends or fails.
    async fn run(self) -> Result<StreamStats> {
        let ReadLoop {
            source_id,
            mut source,
            mut assembler,
            decoder,
            mut on_data,
            on_finish,
            gate,
            started,
        } = self;

        let mut deliver = |bytes: Bytes, meta: FrameMeta| -> Option<usize> {
            let frame = match &decoder {
                Some(decoder) => Frame::Text(decoder.decode(&bytes)),
                None => Frame::Bytes(bytes),
            };
            tracing::trace!(len = frame.len(), fulfilled = meta.fulfilled, "frame emitted");
            on_data(frame, meta)
        };

        loop {
            gate.wait_until_open().await;

            match source.next().await {
                Some(Ok(segment)) => assembler.push(&segment, &mut deliver),
                Some(Err(err)) => {
                    tracing::error!(source = %source_id, error = %err, "source read failed");
                    return Err(RechunkError::Source(err));
                }
                None => {
                    assembler.finish(&mut deliver);

                    let stats = StreamStats {
                        bytes_received: assembler.bytes_received(),
                        bytes_processed: assembler.bytes_processed(),
                        elapsed: started.elapsed(),
                    };

                    tracing::debug!(
                        source = %source_id,
                        received = stats.bytes_received,
                        processed = stats.bytes_processed,
                        "stream finished"
                    );

                    on_finish(&stats);
                    return Ok(stats);
                }
            }
        }
    }
}
