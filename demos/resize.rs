//! Frame-size renegotiation and pause/resume walkthrough.
//!
//! A producer task pushes segments through a channel while the consumer
//! halves the frame size after the first frame and briefly pauses the
//! engine mid-stream. Pausing keeps the engine from pulling further
//! segments; the producer can keep queueing in the meantime.
//!
//! ```sh
//! cargo run --example resize
//! ```

use std::time::Duration;

use bytes::Bytes;
use rechunk::source::ChannelSource;
use rechunk::{Frame, Rechunker};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let (tx, src) = ChannelSource::new(8);

    let producer = tokio::spawn(async move {
        for segment in [
            &b"the first segment is long enough for two frames"[..],
            &b"then a couple"[..],
            &b" of smaller ones"[..],
            &b"tail"[..],
        ] {
            tx.send(Bytes::from_static(segment)).await.expect("send");
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    });

    let engine = Rechunker::builder("channel-demo", 16)
        .on_data(|frame, meta| {
            if let Frame::Bytes(bytes) = frame {
                println!(
                    "frame (target {}, fulfilled {}): {:?}",
                    meta.target_size,
                    meta.fulfilled,
                    String::from_utf8_lossy(&bytes)
                );
            }
            // Halve the frame size once, after the first full frame.
            if meta.target_size == 16 {
                Some(8)
            } else {
                None
            }
        })
        .on_finish(|stats| {
            println!(
                "finished: received {} bytes, processed {} in {:?}",
                stats.bytes_received, stats.bytes_processed, stats.elapsed
            );
        })
        .start(src)?;

    // Let a frame or two through, then hold the stream briefly.
    tokio::time::sleep(Duration::from_millis(75)).await;
    engine.pause();
    println!("paused (producer keeps queueing)");
    tokio::time::sleep(Duration::from_millis(200)).await;
    engine.resume();
    println!("resumed");

    producer.await?;
    engine.wait_until_finished().await?;

    Ok(())
}
