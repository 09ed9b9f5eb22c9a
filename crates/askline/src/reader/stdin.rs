//! Process-wide stdin shared by every stdio reader.
//!
//! A blocking read on stdin cannot be cancelled, so a timed out prompt must
//! not own one. A single detached thread reads stdin for the rest of the
//! process and forwards chunks over a channel. Timing out only stops polling
//! the channel, so nothing typed later is lost, and the thread never keeps
//! the runtime from shutting down.

use std::io::{self, Read};
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};
use std::task::{Context, Poll};
use std::thread;

use once_cell::sync::Lazy;
use tokio::io::{AsyncRead, ReadBuf};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, trace};

type Chunk = io::Result<Vec<u8>>;

static STDIN: Lazy<Mutex<ChunkStream>> = Lazy::new(|| Mutex::new(spawn_pump()));

/// Handle to the shared stdin pump.
///
/// Every handle reads from the same buffer. The pump starts on first use
/// and from then on owns the process's stdin, so input meant for the
/// program after a prompt must also be read through a handle.
#[derive(Debug, Default)]
pub struct SharedStdin {
    _private: (),
}

impl SharedStdin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AsyncRead for SharedStdin {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let mut stream = STDIN.lock().unwrap_or_else(PoisonError::into_inner);
        Pin::new(&mut *stream).poll_read(cx, buf)
    }
}

fn spawn_pump() -> ChunkStream {
    let (tx, rx) = mpsc::unbounded_channel();
    let spawned = thread::Builder::new()
        .name("askline-stdin".to_string())
        .spawn(move || pump(io::stdin(), tx));
    if let Err(err) = spawned {
        // the sender went down with the closure, so readers see end of input
        debug!(error = %err, "failed to start stdin thread");
    }
    ChunkStream::new(rx)
}

/// Forward everything `input` yields until it ends or nobody listens.
fn pump<R: Read>(mut input: R, tx: UnboundedSender<Chunk>) {
    let mut buf = [0u8; 1024];
    loop {
        match input.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                if tx.send(Ok(buf[..n].to_vec())).is_err() {
                    break;
                }
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => {
                let _ = tx.send(Err(err));
                break;
            }
        }
    }
    trace!("stdin pump finished");
}

/// Async reader over a channel of byte chunks.
///
/// A chunk larger than the caller's buffer is kept and handed out over
/// several reads. A closed channel reads as end of input.
#[derive(Debug)]
pub(crate) struct ChunkStream {
    chunks: UnboundedReceiver<Chunk>,
    pending: Vec<u8>,
}

impl ChunkStream {
    pub(crate) fn new(chunks: UnboundedReceiver<Chunk>) -> Self {
        Self {
            chunks,
            pending: Vec::new(),
        }
    }
}

impl AsyncRead for ChunkStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        if this.pending.is_empty() {
            match this.chunks.poll_recv(cx) {
                Poll::Ready(Some(Ok(chunk))) => this.pending = chunk,
                Poll::Ready(Some(Err(err))) => return Poll::Ready(Err(err)),
                Poll::Ready(None) => return Poll::Ready(Ok(())),
                Poll::Pending => return Poll::Pending,
            }
        }

        let n = this.pending.len().min(buf.remaining());
        buf.put_slice(&this.pending[..n]);
        this.pending.drain(..n);
        Poll::Ready(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{LineReader, ReadOutcome, ReadRequest, StreamReader};
    use std::time::Duration;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn large_chunks_are_handed_out_piecewise() {
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(Ok(b"abcdef".to_vec())).unwrap();
        drop(tx);

        let mut stream = ChunkStream::new(rx);
        let mut buf = [0u8; 4];
        assert_eq!(stream.read(&mut buf).await.unwrap(), 4);
        assert_eq!(&buf, b"abcd");
        assert_eq!(stream.read(&mut buf).await.unwrap(), 2);
        assert_eq!(&buf[..2], b"ef");
        assert_eq!(stream.read(&mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn errors_are_forwarded() {
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(Err(io::Error::new(io::ErrorKind::Other, "tty gone")))
            .unwrap();

        let mut stream = ChunkStream::new(rx);
        let mut buf = [0u8; 4];
        let err = stream.read(&mut buf).await.unwrap_err();
        assert_eq!(err.to_string(), "tty gone");
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_read_loses_no_input() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut reader = StreamReader::new(ChunkStream::new(rx), Vec::new());

        let request = ReadRequest::new("> ").idle_timeout(Some(Duration::from_secs(1)));
        assert_eq!(reader.read(&request).await.unwrap(), ReadOutcome::TimedOut);

        tx.send(Ok(b"firstline\n".to_vec())).unwrap();
        let outcome = reader.read(&ReadRequest::new("> ")).await.unwrap();
        assert_eq!(outcome, ReadOutcome::Line("firstline".to_string()));
    }

    #[test]
    fn pump_forwards_until_end_of_input() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        pump(&b"hello\nworld\n"[..], tx);

        let mut received = Vec::new();
        while let Ok(chunk) = rx.try_recv() {
            received.extend(chunk.unwrap());
        }
        assert_eq!(received, b"hello\nworld\n");
        assert!(rx.try_recv().is_err());
    }
}
