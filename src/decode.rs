//! Optional per-frame text decoding stage.
//!
//! When a decoding label is configured on the engine, every emitted
//! frame is converted from bytes to text before it reaches the data
//! callback; otherwise frames are delivered raw.
//!
//! The stage is stateless: each frame is decoded independently, so a
//! multi-byte sequence that happens to straddle a frame boundary comes
//! out as U+FFFD replacement characters on both sides. Consumers that
//! need exact text across boundaries should pick character-safe frame
//! sizes or decode the reassembled byte stream downstream.
//!
//! # Example
//!
//! ```
//! use rechunk::decode::TextDecoder;
//!
//! let decoder = TextDecoder::for_label("utf-8").unwrap();
//! assert_eq!(decoder.decode(b"hello"), "hello");
//! ```

use encoding_rs::Encoding;

use crate::error::{RechunkError, Result};

/// Stateless byte-to-text decoder applied to each emitted frame.
#[derive(Debug, Clone, Copy)]
pub struct TextDecoder {
    encoding: &'static Encoding,
}

impl TextDecoder {
    /// Resolve a decoder from a WHATWG encoding label.
    ///
    /// Labels are matched case-insensitively and include the usual
    /// aliases ("utf-8", "UTF8", "latin1", "shift_jis", ...).
    ///
    /// # Errors
    ///
    /// Returns [`RechunkError::UnknownEncoding`] for labels that name no
    /// known encoding.
    pub fn for_label(label: &str) -> Result<Self> {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| RechunkError::UnknownEncoding(label.to_string()))?;

        Ok(Self { encoding })
    }

    /// Canonical name of the resolved encoding.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Decode one frame.
    ///
    /// Malformed sequences are substituted with U+FFFD rather than
    /// reported as errors. Frames shorter than the nominal target size
    /// (the terminal flush) decode like any other.
    pub fn decode(&self, bytes: &[u8]) -> String {
        let (text, _, _) = self.encoding.decode(bytes);
        text.into_owned()
    }
}
