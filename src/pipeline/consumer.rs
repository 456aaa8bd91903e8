//! Decode side of the pipeline
//!
//! [`DecodeConsumer`] waits on the queue's not-empty signal instead of
//! polling, decodes each line into a [`DecodedRecord`](crate::types::DecodedRecord),
//! and hands it to the configured [`RecordSink`]. It exits when the queue
//! is closed and drained, or as soon as shutdown is requested.

use crate::decode::decode_line;
use crate::error::Result;
use crate::pipeline::shutdown::ShutdownSignal;
use crate::pipeline::sink::RecordSink;
use crate::queue::{BoundedLineQueue, PopOutcome};
use crate::types::LineRecord;
use std::sync::Arc;
use std::time::Duration;

/// Counters from one consumer run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumerReport {
    /// Records handed to the sink
    pub records_emitted: u64,
    /// Words decoded across all records
    pub words_decoded: u64,
    /// Records that hit the per-line word limit
    pub truncated_records: u64,
}

/// Pulls lines from the queue, decodes them, and emits the results
pub struct DecodeConsumer<S: RecordSink> {
    queue: Arc<BoundedLineQueue>,
    shutdown: ShutdownSignal,
    sink: S,
    poll_interval: Duration,
    report: ConsumerReport,
}

impl<S: RecordSink> DecodeConsumer<S> {
    /// `poll_interval` bounds how long a wait lasts before the shutdown
    /// signal is checked again.
    pub fn new(
        queue: Arc<BoundedLineQueue>,
        shutdown: ShutdownSignal,
        sink: S,
        poll_interval: Duration,
    ) -> Self {
        Self {
            queue,
            shutdown,
            sink,
            poll_interval,
            report: ConsumerReport::default(),
        }
    }

    /// Run until the queue is closed and drained or shutdown is requested
    ///
    /// A sink error stops the loop and is returned.
    pub fn run(mut self) -> Result<ConsumerReport> {
        tracing::debug!("Decode consumer started");

        while self.shutdown.is_running() {
            match self.queue.pop_wait(self.poll_interval) {
                PopOutcome::Line(line) => self.process_line(&line)?,
                PopOutcome::TimedOut => continue,
                PopOutcome::Closed => break,
            }
        }

        self.sink.flush()?;
        tracing::debug!(
            "Decode consumer stopped after {} records",
            self.report.records_emitted
        );
        Ok(self.report)
    }

    /// Decode one line and emit the record
    pub fn process_line(&mut self, line: &LineRecord) -> Result<()> {
        let record = decode_line(line);
        if record.truncated {
            self.report.truncated_records += 1;
            tracing::debug!("Line {:?} has more words than fit in a record", line);
        }
        self.sink.emit(&record)?;
        self.report.records_emitted += 1;
        self.report.words_decoded += record.count() as u64;
        Ok(())
    }

    pub fn report(&self) -> &ConsumerReport {
        &self.report
    }
}
