//! Request dispatcher
//!
//! Reads the leading request from the host and routes it:
//!
//! | Request | Handling |
//! |---------|----------|
//! | end of stream, non-object, no `type` | nothing to do |
//! | unknown `type` | diagnostic on stderr, no response |
//! | `list` | run the enumerator to the end of the catalog |
//! | `info` | one record per request until the stream ends |
//!
//! Faults are not caught per item. They propagate to the caller, which ends
//! the process; the host restarts it from the last state it received.

use crate::config::SiteProfile;
use crate::crawler::detail::DetailFetcher;
use crate::crawler::enumerator::{EnumerationSummary, Enumerator};
use crate::crawler::selectors::Selectors;
use crate::state::EnumerationState;
use crate::transport::{Emit, FetchProxy, Request, Response};
use crate::WorkerError;
use std::io::{BufRead, Write};
use tracing::{debug, error, info, warn};

/// How a dispatch ended without a fault
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The host closed the stream before sending anything
    NoRequest,

    /// The leading line carried no operation tag
    NoOperation,

    /// The leading request named an operation the worker does not know
    UnknownOperation(String),

    /// The listing was enumerated to the end
    Listed(EnumerationSummary),

    /// Detail requests were served until the stream ended
    Described { records: u64 },

    /// The host closed the channel while an operation was running
    HostClosed,
}

/// Routes host requests to the enumerator or the detail fetcher
pub struct Dispatcher<'a> {
    profile: &'a SiteProfile,
    selectors: &'a Selectors,
}

impl<'a> Dispatcher<'a> {
    pub fn new(profile: &'a SiteProfile, selectors: &'a Selectors) -> Self {
        Self { profile, selectors }
    }

    /// Reads one leading request and runs it to completion
    ///
    /// # Returns
    ///
    /// * `Ok(Outcome)` - The operation finished, was skipped, or the host hung up
    /// * `Err(WorkerError)` - A protocol or structural fault; the process should exit
    pub fn run<R: BufRead, W: Write>(
        &self,
        proxy: &mut FetchProxy<R, W>,
    ) -> Result<Outcome, WorkerError> {
        match self.dispatch(proxy) {
            Err(e) if e.is_channel_closed() => {
                info!("Host closed the channel, stopping");
                Ok(Outcome::HostClosed)
            }
            other => other,
        }
    }

    fn dispatch<R: BufRead, W: Write>(
        &self,
        proxy: &mut FetchProxy<R, W>,
    ) -> Result<Outcome, WorkerError> {
        let Some(value) = proxy.next_request()? else {
            debug!("No request received");
            return Ok(Outcome::NoRequest);
        };

        match Request::from_value(&value)? {
            None => {
                debug!("Leading request has no operation tag");
                Ok(Outcome::NoOperation)
            }
            Some(Request::Unknown(kind)) => {
                error!("Unrecognized request type '{}'.", kind);
                Ok(Outcome::UnknownOperation(kind))
            }
            Some(Request::List { state }) => {
                let start = EnumerationState::from_resume(state.as_deref())?;
                info!("Enumerating listing from {}", start);

                let summary = Enumerator::new(self.profile, self.selectors).run(start, proxy)?;
                info!(
                    "Listing done: {} pages fetched, {} pages and {} ids emitted",
                    summary.pages_fetched, summary.pages_emitted, summary.ids_emitted
                );
                Ok(Outcome::Listed(summary))
            }
            Some(Request::Info { id }) => {
                let records = self.describe(id, proxy)?;
                info!("Served {} detail records", records);
                Ok(Outcome::Described { records })
            }
        }
    }

    /// Serves detail requests until the host stops sending them
    fn describe<R: BufRead, W: Write>(
        &self,
        first_id: String,
        proxy: &mut FetchProxy<R, W>,
    ) -> Result<u64, WorkerError> {
        let fetcher = DetailFetcher::new(self.profile, self.selectors);
        let mut id = first_id;
        let mut records = 0;

        loop {
            let record = fetcher.fetch_record(&id, proxy)?;
            proxy.emit(&Response::record(record))?;
            records += 1;

            let Some(value) = proxy.next_request()? else {
                break;
            };
            if Request::is_end_marker(&value) {
                break;
            }

            match Request::from_value(&value)? {
                Some(Request::Info { id: next }) => id = next,
                other => {
                    warn!("Ending detail stream at non-info request {:?}", other);
                    break;
                }
            }
        }

        Ok(records)
    }
}
