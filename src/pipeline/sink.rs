//! Output sinks for decoded records.
//!
//! The decode thread hands every [`DecodedRecord`] to a [`RecordSink`]. Two
//! sinks ship with the crate: [`WriterSink`] prints records in the
//! `Processed data: ...` text form (stdout by default), and [`ChannelSink`]
//! forwards them over a crossbeam channel to another thread.

use crate::error::{Result, ResultExt, SquitterError};
use crate::types::DecodedRecord;
use crossbeam_channel::{Receiver, Sender};
use std::io::{self, Stdout, Write};

/// Destination for decoded records
pub trait RecordSink: Send {
    /// Deliver one record
    fn emit(&mut self, record: &DecodedRecord) -> Result<()>;

    /// Flush buffered output; called when the consumer stops
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: RecordSink + ?Sized> RecordSink for Box<S> {
    fn emit(&mut self, record: &DecodedRecord) -> Result<()> {
        (**self).emit(record)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

/// Writes one `Processed data: <words>` line per record
pub struct WriterSink<W: Write + Send> {
    out: W,
}

impl WriterSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> RecordSink for WriterSink<W> {
    fn emit(&mut self, record: &DecodedRecord) -> Result<()> {
        writeln!(self.out, "Processed data: {}", record).context("Writing decoded record")
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush().context("Flushing record output")
    }
}

/// Forwards records over a bounded or unbounded crossbeam channel
pub struct ChannelSink {
    tx: Sender<DecodedRecord>,
}

impl ChannelSink {
    pub fn new(tx: Sender<DecodedRecord>) -> Self {
        Self { tx }
    }

    /// Create a sink and the receiving end of an unbounded channel
    pub fn unbounded() -> (Self, Receiver<DecodedRecord>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }
}

impl RecordSink for ChannelSink {
    fn emit(&mut self, record: &DecodedRecord) -> Result<()> {
        self.tx
            .send(*record)
            .map_err(|_| SquitterError::Channel("record receiver disconnected".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_hex_words;

    #[test]
    fn test_writer_sink_format() {
        let mut sink = WriterSink::new(Vec::new());
        sink.emit(&decode_hex_words(b"1A2B 3C4D")).unwrap();
        sink.emit(&decode_hex_words(b"--- ;;;")).unwrap();
        sink.flush().unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text, "Processed data: 6699 15437 \nProcessed data: \n");
    }

    #[test]
    fn test_channel_sink_forwards() {
        let (mut sink, rx) = ChannelSink::unbounded();
        let record = decode_hex_words(b"FF");
        sink.emit(&record).unwrap();
        assert_eq!(rx.try_recv().unwrap(), record);
    }

    #[test]
    fn test_channel_sink_disconnected() {
        let (mut sink, rx) = ChannelSink::unbounded();
        drop(rx);
        let err = sink.emit(&DecodedRecord::new()).unwrap_err();
        assert!(matches!(err, SquitterError::Channel(_)));
    }

    #[test]
    fn test_boxed_sink() {
        let (sink, rx) = ChannelSink::unbounded();
        let mut boxed: Box<dyn RecordSink> = Box::new(sink);
        boxed.emit(&decode_hex_words(b"01")).unwrap();
        assert_eq!(rx.recv().unwrap().values(), &[1]);
    }
}
