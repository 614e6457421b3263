//! Crawler module for catalog enumeration and record extraction
//!
//! This module contains the core crawling logic, including:
//! - The parsed document model and compiled selectors
//! - Field extractors with ordered fallbacks
//! - The listing enumerator state machine
//! - The detail fetcher
//! - The request dispatcher

mod detail;
mod dispatcher;
mod document;
mod enumerator;
mod extract;
mod record;
mod selectors;

pub use detail::DetailFetcher;
pub use dispatcher::{Dispatcher, Outcome};
pub use document::{node_text, Document};
pub use enumerator::{EnumerationSummary, Enumerator, ListingPage};
pub use extract::{encode_price, extract_record, parse_item_id};
pub use record::ProductRecord;
pub use selectors::Selectors;

use crate::config::SiteProfile;
use crate::transport::FetchProxy;
use crate::WorkerError;
use std::io::{BufRead, Write};

/// Runs one worker session against the host
///
/// This is the main entry point. It will:
/// 1. Compile the profile's selectors
/// 2. Read the leading request from the host
/// 3. Enumerate the listing or serve detail requests
///
/// # Arguments
///
/// * `profile` - A validated site profile
/// * `proxy` - Channel to the host
///
/// # Returns
///
/// * `Ok(Outcome)` - The session ended normally
/// * `Err(WorkerError)` - The session hit a fault
pub fn serve<R: BufRead, W: Write>(
    profile: &SiteProfile,
    proxy: &mut FetchProxy<R, W>,
) -> Result<Outcome, WorkerError> {
    let selectors = Selectors::compile(&profile.selectors)?;
    Dispatcher::new(profile, &selectors).run(proxy)
}
