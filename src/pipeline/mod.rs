//! Two-thread line pipeline.
//!
//! Bytes from the network are framed into lines by the ingest thread, cross
//! the thread boundary through one [`BoundedLineQueue`], and are decoded and
//! emitted by the decode thread.
//!
//! # Architecture
//!
//! ```text
//! [TcpStream] ──► [LineFramer] ──► [BoundedLineQueue] ──► [decode] ──► [RecordSink]
//!  └──────── ingest thread ────────┘                  └──── decode thread ────┘
//! ```
//!
//! # Lifecycle
//!
//! - [`Pipeline::new`] validates the config and allocates the queue once.
//! - [`Pipeline::spawn`] starts both threads and returns a [`PipelineHandle`].
//! - When the connection ends the ingest thread closes the queue; the decode
//!   thread drains what is left and exits.
//! - [`PipelineHandle::shutdown`] stops both threads early.
//! - [`PipelineHandle::join`] waits for both and returns a [`PipelineReport`].

pub mod consumer;
pub mod producer;
pub mod shutdown;
pub mod sink;

pub use consumer::{ConsumerReport, DecodeConsumer};
pub use producer::{IngestionProducer, ProducerEnd, ProducerReport};
pub use shutdown::ShutdownSignal;
pub use sink::{ChannelSink, RecordSink, WriterSink};

use crate::config::PipelineConfig;
use crate::error::{Result, SquitterError};
use crate::queue::{BoundedLineQueue, QueueStats};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Final counters of a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub producer: ProducerReport,
    pub consumer: ConsumerReport,
    pub queue: QueueStats,
}

/// A configured pipeline that has not started yet
pub struct Pipeline {
    config: Arc<PipelineConfig>,
    queue: Arc<BoundedLineQueue>,
    shutdown: ShutdownSignal,
}

impl Pipeline {
    /// Validate `config` and allocate the shared queue
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let queue = BoundedLineQueue::with_capacity(config.queue_capacity)?;
        queue.init();

        Ok(Self {
            config: Arc::new(config),
            queue: Arc::new(queue),
            shutdown: ShutdownSignal::new(),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Signal that stops both threads once triggered
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Start the ingest and decode threads
    pub fn spawn<S>(self, sink: S) -> Result<PipelineHandle>
    where
        S: RecordSink + 'static,
    {
        let producer = IngestionProducer::new(
            self.config.clone(),
            self.queue.clone(),
            self.shutdown.clone(),
        );
        let consumer = DecodeConsumer::new(
            self.queue.clone(),
            self.shutdown.clone(),
            sink,
            self.config.poll_interval(),
        );

        let consumer_handle = {
            let shutdown = self.shutdown.clone();
            spawn_named("decode", move || {
                let result = consumer.run();
                if let Err(e) = &result {
                    tracing::error!("Decode thread failed: {}", e);
                    shutdown.trigger();
                }
                result
            })?
        };

        let producer_handle = {
            let queue = self.queue.clone();
            spawn_named("ingest", move || {
                let result = producer.run();
                queue.close();
                result
            })
        };
        let producer_handle = match producer_handle {
            Ok(handle) => handle,
            Err(e) => {
                self.shutdown.trigger();
                self.queue.close();
                let _ = consumer_handle.join();
                return Err(e);
            }
        };

        Ok(PipelineHandle {
            producer: producer_handle,
            consumer: consumer_handle,
            queue: self.queue,
            shutdown: self.shutdown,
        })
    }

    /// Start the pipeline and block until both threads finish
    pub fn run<S>(self, sink: S) -> Result<PipelineReport>
    where
        S: RecordSink + 'static,
    {
        self.spawn(sink)?.join()
    }
}

/// Running pipeline
pub struct PipelineHandle {
    producer: JoinHandle<Result<ProducerReport>>,
    consumer: JoinHandle<Result<ConsumerReport>>,
    queue: Arc<BoundedLineQueue>,
    shutdown: ShutdownSignal,
}

impl PipelineHandle {
    /// Ask both threads to stop at their next wait or read boundary
    pub fn shutdown(&self) {
        self.shutdown.trigger();
        self.queue.close();
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Current queue counters
    pub fn queue_stats(&self) -> QueueStats {
        self.queue.stats()
    }

    /// Wait for both threads
    ///
    /// A connect failure takes precedence over a decode-side failure.
    pub fn join(self) -> Result<PipelineReport> {
        let producer = join_named(self.producer, "ingest");
        let consumer = join_named(self.consumer, "decode");
        let producer = producer?;
        let consumer = consumer?;
        let queue = self.queue.stats();

        tracing::info!(
            "Pipeline finished: {} bytes read, {} lines framed, {} dropped, {} records emitted",
            producer.bytes_read,
            producer.lines_framed,
            queue.dropped,
            consumer.records_emitted
        );

        Ok(PipelineReport {
            producer,
            consumer,
            queue,
        })
    }
}

fn spawn_named<T, F>(name: &str, f: F) -> Result<JoinHandle<T>>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    std::thread::Builder::new()
        .name(name.to_string())
        .spawn(f)
        .map_err(|e| SquitterError::Thread(format!("Failed to spawn {} thread: {}", name, e)))
}

fn join_named<T>(handle: JoinHandle<Result<T>>, name: &str) -> Result<T> {
    handle
        .join()
        .map_err(|_| SquitterError::Thread(format!("{} thread panicked", name)))?
}
