//! Byte-source adapters.
//!
//! The engine consumes any `Stream<Item = io::Result<Bytes>>`: each item
//! is one source segment, the stream running out is the end-of-stream
//! signal, and an `Err` item is a source failure. Driving the stream
//! with `StreamExt::next` gives the one-outstanding-pull-at-a-time
//! discipline the engine relies on.
//!
//! Adapters here cover the common transports:
//!
//! - [`ReaderSource`] — anything implementing tokio `AsyncRead`
//!   (sockets, pipes, files, in-memory duplex)
//! - [`ChannelSource`] — segments pushed through an mpsc channel from
//!   another task
//! - [`segments`] — scripted in-memory sequences for tests and demos
//!
//! # Example
//!
//! ```
//! use futures::StreamExt;
//! use rechunk::source;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut src = source::segments([&b"ab"[..], &b"cd"[..]]);
//!
//! assert_eq!(&src.next().await.unwrap().unwrap()[..], b"ab");
//! assert_eq!(&src.next().await.unwrap().unwrap()[..], b"cd");
//! assert!(src.next().await.is_none());
//! # }
//! ```

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;
use tokio::io::{AsyncRead, ReadBuf};
use tokio::sync::mpsc;

/// Default scratch buffer size for [`ReaderSource`] pulls.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 64 * 1024;

/// Byte source over any tokio `AsyncRead`.
///
/// Each pull performs one read into an internal scratch buffer and
/// yields whatever bytes it produced; a read of zero bytes ends the
/// stream. Segment sizes therefore follow whatever granularity the
/// underlying transport delivers, which is exactly what the engine
/// re-buffers away.
pub struct ReaderSource<R> {
    reader: R,
    scratch: Vec<u8>,
    done: bool,
}

impl<R: AsyncRead + Unpin> ReaderSource<R> {
    /// Wrap a reader with the default 64KB scratch buffer.
    pub fn new(reader: R) -> Self {
        Self::with_buffer_size(reader, DEFAULT_READ_BUFFER_SIZE)
    }

    /// Wrap a reader with a custom scratch buffer size.
    ///
    /// The buffer size caps how large a single segment can be; sizes
    /// below one byte are bumped to one.
    pub fn with_buffer_size(reader: R, size: usize) -> Self {
        Self {
            reader,
            scratch: vec![0u8; size.max(1)],
            done: false,
        }
    }

    /// Get back the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: AsyncRead + Unpin> Stream for ReaderSource<R> {
    type Item = io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let me = self.get_mut();

        if me.done {
            return Poll::Ready(None);
        }

        let mut buf = ReadBuf::new(&mut me.scratch);
        match Pin::new(&mut me.reader).poll_read(cx, &mut buf) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Err(e)) => {
                me.done = true;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(Ok(())) => {
                let filled = buf.filled();
                if filled.is_empty() {
                    me.done = true;
                    Poll::Ready(None)
                } else {
                    Poll::Ready(Some(Ok(Bytes::copy_from_slice(filled))))
                }
            }
        }
    }
}

/// Byte source fed through a bounded mpsc channel.
///
/// Useful when segments are produced by another task. The stream ends
/// once every sender has been dropped and the channel drained.
pub struct ChannelSource {
    rx: mpsc::Receiver<Bytes>,
}

impl ChannelSource {
    /// Create a channel-backed source with the given channel capacity.
    ///
    /// Returns the sender half alongside the source.
    pub fn new(capacity: usize) -> (mpsc::Sender<Bytes>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self { rx })
    }
}

impl Stream for ChannelSource {
    type Item = io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx).map(|seg| seg.map(Ok))
    }
}

/// Scripted in-memory source yielding the given segments in order.
pub fn segments<I>(parts: I) -> impl Stream<Item = io::Result<Bytes>> + Send + Unpin
where
    I: IntoIterator,
    I::Item: Into<Bytes>,
    I::IntoIter: Send,
{
    futures::stream::iter(parts.into_iter().map(|part| Ok(part.into())))
}
