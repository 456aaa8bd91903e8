//! # squitterrator: line ingest and hex word decoding
//!
//! Connects to a TCP endpoint that streams newline-delimited hex text (for
//! example raw Mode-S squitters), buffers the lines through a fixed-capacity
//! queue, and decodes each line into up to eight 32-bit words.
//!
//! ## Architecture
//!
//! - **Framer**: splits the byte stream into lines of at most 63 bytes
//! - **Queue**: fixed-capacity single-producer/single-consumer line buffer
//!   that drops the newest line when full instead of blocking the reader
//! - **Ingest thread**: owns the socket and feeds the queue
//! - **Decode thread**: waits on the queue, decodes, and emits records to a sink
//!
//! ## Example
//!
//! ```no_run
//! use squitterrator::{ChannelSink, Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig {
//!     remote_host: "127.0.0.1".into(),
//!     remote_port: 30002,
//!     ..Default::default()
//! };
//!
//! let (sink, records) = ChannelSink::unbounded();
//! let handle = Pipeline::new(config)?.spawn(sink)?;
//!
//! for record in records.iter().take(10) {
//!     println!("{:?}", record.values());
//! }
//!
//! handle.shutdown();
//! let report = handle.join()?;
//! println!("dropped {} lines", report.queue.dropped);
//! # Ok::<(), squitterrator::SquitterError>(())
//! ```

pub mod config;
pub mod decode;
pub mod error;
pub mod framer;
pub mod logging;
pub mod pipeline;
pub mod queue;
pub mod types;

// Re-export commonly used types
pub use config::{LogLevel, PipelineConfig};
pub use error::{Result, SquitterError};
pub use framer::LineFramer;
pub use pipeline::{
    ChannelSink, Pipeline, PipelineHandle, PipelineReport, RecordSink, ShutdownSignal, WriterSink,
};
pub use queue::{BoundedLineQueue, PopOutcome, QueueStats};
pub use types::{DecodedRecord, LineRecord};
