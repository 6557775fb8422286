//! # rechunk
//!
//! Re-buffer an asynchronous stream of variable-length byte segments
//! into fixed-size — but dynamically renegotiable — frames.
//!
//! A byte source (an HTTP body, a socket, a channel) delivers segments
//! in whatever sizes the transport happens to produce. The engine folds
//! them into frames of exactly the configured size, invokes the data
//! callback once per completed frame, and lets that callback renegotiate
//! the frame size for everything that follows. At end-of-stream the
//! remaining partial frame is flushed and the finish callback receives
//! summary statistics. The consumer controls backpressure: pausing keeps
//! the engine from requesting further segments without discarding any
//! data already in flight.
//!
//! ## Architecture
//!
//! - **Rebuffering core** ([`rebuffer`]) — the accumulation state
//!   machine: variable-to-fixed reassembly, resize between frames,
//!   terminal flush.
//! - **Decoding stage** ([`decode`]) — optional stateless per-frame
//!   byte-to-text pass.
//! - **Sources** ([`source`]) — adapters from tokio readers, channels,
//!   and scripted segment lists.
//! - **Engine** ([`engine`]) — the read loop, callbacks, pause/resume.
//!
//! ## Example
//!
//! ```
//! use rechunk::{Frame, Rechunker, source};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> rechunk::Result<()> {
//! let engine = Rechunker::builder("greeting", 4)
//!     .decode_as("utf-8")
//!     .on_data(|frame, _meta| {
//!         if let Frame::Text(text) = frame {
//!             print!("{text}");
//!         }
//!         None
//!     })
//!     .on_finish(|stats| println!("\n{} bytes in {:?}", stats.bytes_processed, stats.elapsed))
//!     .start(source::segments([&b"hello "[..], &b"world"[..]]))?;
//!
//! engine.wait_until_finished().await?;
//! # Ok(())
//! # }
//! ```

pub mod decode;
pub mod engine;
pub mod error;
pub mod frame;
pub mod rebuffer;
pub mod source;

mod flow;

pub use engine::{Rechunker, RechunkerBuilder};
pub use error::{RechunkError, Result};
pub use frame::{Frame, FrameMeta, StreamStats};
