//! Fetch proxy
//!
//! The worker never touches the network. Fetching a page means sending a `get`
//! message to the host and blocking until the host replies with the document
//! text. Retries, timeouts, caching and redirects are the host's business.

use crate::transport::channel::Channel;
use crate::transport::messages::{FetchRequest, Response};
use crate::{ProtocolError, WorkerError};
use serde_json::Value;
use std::io::{BufRead, Write};
use tracing::{debug, trace};
use url::Url;

/// Source of raw document text
pub trait Fetch {
    /// Fetches a URL and returns the document text verbatim
    fn fetch(&mut self, url: &Url) -> Result<String, WorkerError>;
}

/// Sink for operation results
pub trait Emit {
    fn emit(&mut self, response: &Response) -> Result<(), WorkerError>;
}

/// Host-backed fetcher and emitter sharing one channel
///
/// Fetch round trips and emitted responses strictly alternate on the same
/// stream, so there is never more than one request outstanding.
pub struct FetchProxy<R, W> {
    channel: Channel<R, W>,
    fetches: u64,
}

impl<R: BufRead, W: Write> FetchProxy<R, W> {
    pub fn new(channel: Channel<R, W>) -> Self {
        Self {
            channel,
            fetches: 0,
        }
    }

    /// Reads the next request line from the host
    pub fn next_request(&mut self) -> Result<Option<Value>, WorkerError> {
        self.channel.receive()
    }

    /// Number of completed fetch round trips
    pub fn fetch_count(&self) -> u64 {
        self.fetches
    }

    pub fn into_channel(self) -> Channel<R, W> {
        self.channel
    }
}

impl<R: BufRead, W: Write> Fetch for FetchProxy<R, W> {
    fn fetch(&mut self, url: &Url) -> Result<String, WorkerError> {
        debug!("Requesting {}", url);
        self.channel.send(&FetchRequest::new(url.as_str()))?;

        let reply = self.channel.receive()?.ok_or(WorkerError::ChannelClosed)?;
        let body = document_text(reply)?;

        self.fetches += 1;
        trace!("Received {} bytes for {}", body.len(), url);
        Ok(body)
    }
}

impl<R: BufRead, W: Write> Emit for FetchProxy<R, W> {
    fn emit(&mut self, response: &Response) -> Result<(), WorkerError> {
        self.channel.send(response)
    }
}

/// Pulls the document text out of a fetch reply
fn document_text(reply: Value) -> Result<String, ProtocolError> {
    let Value::Object(mut object) = reply else {
        return Err(ProtocolError::InvalidField {
            field: "response",
            expected: "inside a JSON object",
        });
    };

    match object.remove("response") {
        Some(Value::String(body)) => Ok(body),
        Some(_) => Err(ProtocolError::InvalidField {
            field: "response",
            expected: "a string",
        }),
        None => Err(ProtocolError::MissingField("response")),
    }
}
