//! Frame and summary types handed to consumer callbacks.
//!
//! A [`Frame`] is the unit of delivery: a fixed-size run of bytes (or its
//! decoded text when a decoding stage is configured), always an owned
//! snapshot the consumer may keep without aliasing the engine's buffer.
//! [`FrameMeta`] describes how the frame was produced and [`StreamStats`]
//! summarizes a finished stream.

use std::time::Duration;

use bytes::Bytes;

/// A completed frame delivered to the data callback.
///
/// Frames are raw bytes unless a decoding stage was configured at
/// construction, in which case every frame arrives as decoded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Raw frame bytes (no decoding stage configured).
    Bytes(Bytes),
    /// Frame decoded to text by the configured encoding.
    Text(String),
}

impl Frame {
    /// Length of the frame in its delivered representation.
    ///
    /// For text frames this is the UTF-8 length of the decoded string,
    /// which may differ from the byte count pulled from the source.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Frame::Bytes(bytes) => bytes.len(),
            Frame::Text(text) => text.len(),
        }
    }

    /// Check if the frame is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the raw bytes, if this is an undecoded frame.
    #[inline]
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Frame::Bytes(bytes) => Some(bytes),
            Frame::Text(_) => None,
        }
    }

    /// Get the decoded text, if a decoding stage produced this frame.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Frame::Bytes(_) => None,
            Frame::Text(text) => Some(text),
        }
    }
}

/// Metadata describing an emitted frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameMeta {
    /// Frame capacity in effect when this frame was emitted.
    pub target_size: usize,
    /// True iff the frame reached the full configured size.
    ///
    /// Always true except for the terminal flush, which delivers
    /// whatever partial run of bytes was buffered at end-of-stream.
    pub fulfilled: bool,
}

/// Summary statistics handed to the finish callback after termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamStats {
    /// Total bytes pulled from the source.
    pub bytes_received: u64,
    /// Total bytes emitted in completed or flushed frames.
    pub bytes_processed: u64,
    /// Wall-clock time from `start` to the finish callback.
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_frame_accessors() {
        let frame = Frame::Bytes(Bytes::from_static(b"abcd"));
        assert_eq!(frame.len(), 4);
        assert!(!frame.is_empty());
        assert_eq!(frame.as_bytes().map(|b| &b[..]), Some(&b"abcd"[..]));
        assert_eq!(frame.as_text(), None);
    }

    #[test]
    fn test_text_frame_accessors() {
        let frame = Frame::Text("héllo".to_string());
        assert_eq!(frame.len(), "héllo".len());
        assert_eq!(frame.as_text(), Some("héllo"));
        assert_eq!(frame.as_bytes(), None);
    }

    #[test]
    fn test_empty_frames() {
        assert!(Frame::Bytes(Bytes::new()).is_empty());
        assert!(Frame::Text(String::new()).is_empty());
    }
}
