//! Re-buffering core: variable-length segments in, fixed-size frames out.
//!
//! Uses `bytes::BytesMut` for the accumulation buffer. A completed frame
//! is frozen out of the buffer, so the consumer holds an immutable
//! snapshot while the assembler keeps filling fresh capacity behind it.
//!
//! The assembler is synchronous and single-owner; the async read loop in
//! [`engine`](crate::engine) drives it one source segment at a time.
//!
//! # Example
//!
//! ```
//! use rechunk::rebuffer::FrameAssembler;
//!
//! let mut assembler = FrameAssembler::new(4).unwrap();
//! let mut frames = Vec::new();
//!
//! assembler.push(b"ABCDEF", |frame, _meta| {
//!     frames.push(frame);
//!     None
//! });
//!
//! assert_eq!(frames.len(), 1); // "ABCD" complete, "EF" still buffered
//! assert_eq!(assembler.buffered(), 2);
//! ```

use bytes::{Bytes, BytesMut};

use crate::error::{RechunkError, Result};
use crate::frame::FrameMeta;

/// Accumulates variable-length byte segments into fixed-size frames.
///
/// The write cursor is the buffer's filled length; it never exceeds the
/// current target size, and the target size only changes between frames,
/// never mid-fill. `bytes_received() - bytes_processed()` always equals
/// the bytes currently buffered.
#[derive(Debug)]
pub struct FrameAssembler {
    /// Accumulation buffer; its length is the write cursor.
    buf: BytesMut,
    /// Current frame capacity.
    target_size: usize,
    /// Total bytes folded in from the source.
    received: u64,
    /// Total bytes emitted in completed or flushed frames.
    processed: u64,
}

impl FrameAssembler {
    /// Create an assembler with the given initial frame capacity.
    ///
    /// # Errors
    ///
    /// Returns [`RechunkError::InvalidChunkSize`] when `target_size` is
    /// zero.
    pub fn new(target_size: usize) -> Result<Self> {
        if target_size == 0 {
            return Err(RechunkError::InvalidChunkSize(target_size));
        }

        Ok(Self {
            buf: BytesMut::with_capacity(target_size),
            target_size,
            received: 0,
            processed: 0,
        })
    }

    /// Current frame capacity.
    #[inline]
    pub fn target_size(&self) -> usize {
        self.target_size
    }

    /// Bytes written into the current, not-yet-complete frame.
    #[inline]
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Total bytes folded in from the source.
    #[inline]
    pub fn bytes_received(&self) -> u64 {
        self.received
    }

    /// Total bytes emitted in completed or flushed frames.
    #[inline]
    pub fn bytes_processed(&self) -> u64 {
        self.processed
    }

    /// Fold one source segment into the buffer, emitting every frame it
    /// completes.
    ///
    /// A single segment may complete zero, one, or many frames, and a
    /// frame may be assembled from parts of several segments — the
    /// assembler is indifferent to the source's chunking granularity.
    ///
    /// `emit` runs once per completed frame. A resize it returns is
    /// applied before the rest of the segment is consumed, so it governs
    /// the very next frame; `None` or `Some(0)` leaves the size
    /// unchanged.
    pub fn push(&mut self, segment: &[u8], mut emit: impl FnMut(Bytes, FrameMeta) -> Option<usize>) {
        self.received += segment.len() as u64;

        let mut rest = segment;
        while !rest.is_empty() {
            let writable = self.target_size - self.buf.len();
            let take = writable.min(rest.len());

            self.buf.extend_from_slice(&rest[..take]);
            rest = &rest[take..];

            if self.buf.len() == self.target_size {
                self.emit_frame(&mut emit);
            }
        }
    }

    /// Terminal flush: emit whatever partial frame is buffered.
    ///
    /// A zero-length flush emits nothing — an empty frame never reaches
    /// the consumer.
    pub fn finish(&mut self, mut emit: impl FnMut(Bytes, FrameMeta) -> Option<usize>) {
        if self.buf.is_empty() {
            return;
        }
        self.emit_frame(&mut emit);
    }

    /// Emit the buffered frame and apply any requested resize.
    fn emit_frame(&mut self, emit: &mut dyn FnMut(Bytes, FrameMeta) -> Option<usize>) {
        let meta = FrameMeta {
            target_size: self.target_size,
            fulfilled: self.buf.len() == self.target_size,
        };

        self.processed += self.buf.len() as u64;
        let frame = self.buf.split().freeze();

        // Anything but a positive size leaves the target unchanged.
        if let Some(next) = emit(frame, meta) {
            if next > 0 {
                self.target_size = next;
            }
        }

        self.buf.reserve(self.target_size);
    }
}
