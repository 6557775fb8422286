//! TCP re-buffering demo.
//!
//! Spawns a local producer that writes timed chunks to a TCP socket and
//! re-buffers the connection into fixed-size text frames. Two producer
//! flavors mirror common stream shapes:
//!
//! - `fixed`: 32-character digest-style chunks
//! - `dynamic`: chunks of varying size, each prefixed with a two-digit
//!   length header
//!
//! ```sh
//! cargo run --example tcp_stream [fixed|dynamic]
//! ```

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rechunk::source::ReaderSource;
use rechunk::{Frame, Rechunker};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};

/// Pseudo-random u64 from the system clock, mixed with a salt.
fn rand_u64(salt: u64) -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);

    nanos.wrapping_mul(0x517cc1b727220a95) ^ salt
}

/// Format a word as a 16-character hex fragment.
fn hex16(word: u64) -> String {
    format!("{word:016x}")
}

/// Accept one connection and write eleven timed chunks to it.
async fn produce(listener: TcpListener, dynamic: bool) {
    let (mut socket, _addr) = listener.accept().await.expect("accept");

    for tick in 0u64..=10 {
        let chunk = if dynamic {
            let len = (rand_u64(tick) % 48 + 1) as usize;
            let mut data = String::new();
            while data.len() < len {
                data.push_str(&hex16(rand_u64(tick ^ data.len() as u64)));
            }
            data.truncate(len);
            format!("{:02}{}", data.len(), data)
        } else {
            format!("{}{}", hex16(rand_u64(tick)), hex16(rand_u64(!tick)))
        };

        println!("producer: writing {} bytes", chunk.len());
        socket.write_all(chunk.as_bytes()).await.expect("write");
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let dynamic = std::env::args().nth(1).as_deref() == Some("dynamic");

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let producer = tokio::spawn(produce(listener, dynamic));

    let stream = TcpStream::connect(addr).await?;
    let engine = Rechunker::builder(addr.to_string(), 48)
        .decode_as("utf-8")
        .on_data(|frame, meta| {
            if let Frame::Text(text) = frame {
                println!(
                    "frame ({} bytes, fulfilled: {}): {text}",
                    text.len(),
                    meta.fulfilled
                );
            }
            None
        })
        .on_finish(|stats| {
            println!(
                "done: {} bytes received, {} processed in {:?}",
                stats.bytes_received, stats.bytes_processed, stats.elapsed
            );
        })
        .start(ReaderSource::new(stream))?;

    engine.wait_until_finished().await?;
    producer.await?;

    Ok(())
}
