//! Ingest side of the pipeline
//!
//! [`IngestionProducer`] owns the TCP connection. It reads chunks from the
//! socket, frames them into lines, and pushes each line into the shared
//! queue. A full queue drops the line; the producer never waits for the
//! consumer, so a slow decoder cannot stall the socket.
//!
//! # Termination
//!
//! The read loop ends when the peer closes the connection, on the first
//! read error, or when the [`ShutdownSignal`] is triggered. Reads use the
//! configured poll interval as a socket timeout so the signal is noticed
//! even while the peer is silent. There is no reconnect.

use crate::config::PipelineConfig;
use crate::error::{Result, SquitterError};
use crate::framer::LineFramer;
use crate::pipeline::shutdown::ShutdownSignal;
use crate::queue::BoundedLineQueue;
use std::io::{self, Read};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

/// Why the read loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProducerEnd {
    /// The peer closed the connection
    PeerClosed,
    /// A read failed
    ReadError(String),
    /// Shutdown was requested
    Shutdown,
}

/// Counters from one producer run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerReport {
    /// Bytes received from the socket
    pub bytes_read: u64,
    /// Lines completed by the framer
    pub lines_framed: u64,
    /// Lines rejected by the full queue
    pub lines_dropped: u64,
    /// How the loop ended
    pub end: ProducerEnd,
}

/// Reads lines from the network into the queue
pub struct IngestionProducer {
    config: Arc<PipelineConfig>,
    queue: Arc<BoundedLineQueue>,
    shutdown: ShutdownSignal,
}

impl IngestionProducer {
    pub fn new(
        config: Arc<PipelineConfig>,
        queue: Arc<BoundedLineQueue>,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            config,
            queue,
            shutdown,
        }
    }

    /// Connect, pump the socket until it ends, then close it
    ///
    /// Only a failed connect is returned as an error; read failures end the
    /// loop and are reported in [`ProducerReport::end`].
    pub fn run(&self) -> Result<ProducerReport> {
        let stream = self.connect()?;
        let report = self.pump(&stream);

        // The peer may already be gone
        let _ = stream.shutdown(Shutdown::Both);
        tracing::info!("Server disconnected.");
        Ok(report)
    }

    /// Open the connection to the configured endpoint
    pub fn connect(&self) -> Result<TcpStream> {
        let addr = self.config.remote_addr();
        tracing::info!("Connecting to server {}", addr);

        let stream = open_stream(&addr, self.config.connect_timeout())
            .and_then(|stream| {
                stream.set_read_timeout(Some(self.config.poll_interval()))?;
                Ok(stream)
            })
            .map_err(|source| SquitterError::Connect {
                addr: addr.clone(),
                source,
            })?;

        tracing::info!("Connected to server {}", addr);
        Ok(stream)
    }

    /// Frame everything `reader` yields into the queue
    ///
    /// `WouldBlock`, `TimedOut` and `Interrupted` reads are retried after
    /// checking the shutdown signal; any other error ends the loop.
    pub fn pump<R: Read>(&self, mut reader: R) -> ProducerReport {
        let mut framer = LineFramer::new();
        let mut buf = vec![0u8; self.config.read_chunk_size.max(1)];
        let mut bytes_read = 0u64;
        let mut lines_framed = 0u64;
        let mut lines_dropped = 0u64;

        let end = loop {
            if self.shutdown.is_triggered() {
                break ProducerEnd::Shutdown;
            }

            let n = match reader.read(&mut buf) {
                Ok(0) => break ProducerEnd::PeerClosed,
                Ok(n) => n,
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::WouldBlock
                            | io::ErrorKind::TimedOut
                            | io::ErrorKind::Interrupted
                    ) =>
                {
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Read from server failed: {}", e);
                    break ProducerEnd::ReadError(e.to_string());
                }
            };

            bytes_read += n as u64;
            framer.feed(&buf[..n], |line| {
                lines_framed += 1;
                if !self.queue.try_push(line.as_bytes()) {
                    lines_dropped += 1;
                    tracing::debug!("Queue full, dropped line {:?}", line);
                }
            });
        };

        ProducerReport {
            bytes_read,
            lines_framed,
            lines_dropped,
            end,
        }
    }
}

fn open_stream(addr: &str, timeout: Option<Duration>) -> io::Result<TcpStream> {
    let Some(timeout) = timeout else {
        return TcpStream::connect(addr);
    };

    let mut last_err = None;
    for candidate in addr.to_socket_addrs()? {
        match TcpStream::connect_timeout(&candidate, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "address resolved to no endpoints")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LineRecord;
    use std::collections::VecDeque;
    use std::io::Cursor;

    /// Reader that replays a script of chunks and errors
    struct ScriptedReader {
        steps: VecDeque<io::Result<Vec<u8>>>,
    }

    impl ScriptedReader {
        fn new(steps: Vec<io::Result<Vec<u8>>>) -> Self {
            Self {
                steps: steps.into(),
            }
        }
    }

    impl Read for ScriptedReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.steps.pop_front() {
                None => Ok(0),
                Some(Err(e)) => Err(e),
                Some(Ok(data)) => {
                    let n = data.len().min(buf.len());
                    buf[..n].copy_from_slice(&data[..n]);
                    if n < data.len() {
                        self.steps.push_front(Ok(data[n..].to_vec()));
                    }
                    Ok(n)
                }
            }
        }
    }

    fn producer(capacity: usize) -> (IngestionProducer, Arc<BoundedLineQueue>, ShutdownSignal) {
        let queue = Arc::new(BoundedLineQueue::with_capacity(capacity).unwrap());
        let shutdown = ShutdownSignal::new();
        let producer = IngestionProducer::new(
            Arc::new(PipelineConfig::default()),
            queue.clone(),
            shutdown.clone(),
        );
        (producer, queue, shutdown)
    }

    fn drain(queue: &BoundedLineQueue) -> Vec<LineRecord> {
        std::iter::from_fn(|| queue.try_pop()).collect()
    }

    #[test]
    fn test_pump_frames_lines_into_queue() {
        let (producer, queue, _) = producer(32);
        let report = producer.pump(Cursor::new(b"1A2B 3C4D\n\nDEAD\nBEEF".to_vec()));

        assert_eq!(report.end, ProducerEnd::PeerClosed);
        assert_eq!(report.bytes_read, 20);
        assert_eq!(report.lines_framed, 2);
        assert_eq!(report.lines_dropped, 0);
        // The unterminated tail is never pushed
        assert_eq!(
            drain(&queue),
            vec![LineRecord::from("1A2B 3C4D"), LineRecord::from("DEAD")]
        );
    }

    #[test]
    fn test_pump_retries_timeouts() {
        let (producer, queue, _) = producer(32);
        let reader = ScriptedReader::new(vec![
            Ok(b"AB".to_vec()),
            Err(io::Error::from(io::ErrorKind::WouldBlock)),
            Err(io::Error::from(io::ErrorKind::TimedOut)),
            Ok(b"CD\n".to_vec()),
        ]);
        let report = producer.pump(reader);
        assert_eq!(report.end, ProducerEnd::PeerClosed);
        assert_eq!(drain(&queue), vec![LineRecord::from("ABCD")]);
    }

    #[test]
    fn test_pump_stops_on_read_error() {
        let (producer, queue, _) = producer(32);
        let reader = ScriptedReader::new(vec![
            Ok(b"01\n".to_vec()),
            Err(io::Error::from(io::ErrorKind::ConnectionReset)),
            Ok(b"02\n".to_vec()),
        ]);
        let report = producer.pump(reader);
        assert!(matches!(report.end, ProducerEnd::ReadError(_)));
        assert_eq!(drain(&queue), vec![LineRecord::from("01")]);
    }

    #[test]
    fn test_pump_counts_drops_when_full() {
        let (producer, queue, _) = producer(4);
        let input: Vec<u8> = (0..10).flat_map(|i| format!("{:X}\n", i).into_bytes()).collect();
        let report = producer.pump(Cursor::new(input));

        assert_eq!(report.lines_framed, 10);
        assert_eq!(report.lines_dropped, 7);
        assert_eq!(queue.stats().dropped, 7);
        // The oldest lines survive
        assert_eq!(
            drain(&queue),
            vec![LineRecord::from("0"), LineRecord::from("1"), LineRecord::from("2")]
        );
    }

    #[test]
    fn test_pump_honours_shutdown() {
        let (producer, queue, shutdown) = producer(32);
        shutdown.trigger();
        let report = producer.pump(Cursor::new(b"AA\n".to_vec()));
        assert_eq!(report.end, ProducerEnd::Shutdown);
        assert_eq!(report.bytes_read, 0);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_small_read_chunks() {
        let queue = Arc::new(BoundedLineQueue::new());
        let config = PipelineConfig {
            read_chunk_size: 3,
            ..Default::default()
        };
        let producer = IngestionProducer::new(Arc::new(config), queue.clone(), ShutdownSignal::new());
        let report = producer.pump(Cursor::new(b"0123456789\nABCDEF\n".to_vec()));
        assert_eq!(report.lines_framed, 2);
        assert_eq!(
            drain(&queue),
            vec![LineRecord::from("0123456789"), LineRecord::from("ABCDEF")]
        );
    }

    #[test]
    fn test_connect_refused_is_connect_error() {
        // Bind then drop to get a port with nothing listening
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let config = PipelineConfig {
            remote_port: port,
            connect_timeout_ms: Some(500),
            ..Default::default()
        };
        let producer = IngestionProducer::new(
            Arc::new(config),
            Arc::new(BoundedLineQueue::new()),
            ShutdownSignal::new(),
        );
        let err = producer.run().unwrap_err();
        assert!(matches!(err, SquitterError::Connect { .. }));
        assert_eq!(err.exit_code(), crate::error::EXIT_CONNECT);
    }
}
