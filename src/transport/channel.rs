//! Line-delimited JSON channel to the host
//!
//! One JSON value per line in each direction. Every send is flushed before the
//! worker blocks on the next read, so the host never waits on buffered output.

use crate::{ProtocolError, WorkerError};
use serde::Serialize;
use serde_json::Value;
use std::io::{BufRead, Write};

/// Synchronous JSON-lines channel over a reader/writer pair
pub struct Channel<R, W> {
    reader: R,
    writer: W,
    line: String,
}

impl<R: BufRead, W: Write> Channel<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            line: String::new(),
        }
    }

    /// Writes one message followed by a newline and flushes
    pub fn send<T: Serialize + ?Sized>(&mut self, message: &T) -> Result<(), WorkerError> {
        serde_json::to_writer(&mut self.writer, message).map_err(WorkerError::Encode)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Blocks for the next line and decodes it
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Value))` - One decoded message
    /// * `Ok(None)` - The host closed the stream between messages
    /// * `Err(WorkerError::Protocol)` - Invalid JSON, or the stream closed mid-line
    pub fn receive(&mut self) -> Result<Option<Value>, WorkerError> {
        self.line.clear();
        let read = self.reader.read_line(&mut self.line)?;
        if read == 0 {
            return Ok(None);
        }

        if !self.line.ends_with('\n') {
            return Err(ProtocolError::Truncated(read).into());
        }

        let value = serde_json::from_str(&self.line).map_err(|source| ProtocolError::Malformed {
            line: self.line.trim_end().to_string(),
            source,
        })?;
        Ok(Some(value))
    }

    /// Gives back the underlying reader and writer
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}
