//! Detail fetcher
//!
//! One item identifier in, one merged product record out.

use crate::config::SiteProfile;
use crate::crawler::document::Document;
use crate::crawler::extract::extract_record;
use crate::crawler::record::ProductRecord;
use crate::crawler::selectors::Selectors;
use crate::transport::Fetch;
use crate::WorkerError;
use tracing::debug;

pub struct DetailFetcher<'a> {
    profile: &'a SiteProfile,
    selectors: &'a Selectors,
}

impl<'a> DetailFetcher<'a> {
    pub fn new(profile: &'a SiteProfile, selectors: &'a Selectors) -> Self {
        Self { profile, selectors }
    }

    /// Fetches the detail page for `item_id` and extracts its record
    ///
    /// Fields the page lacks are left out; only fetch and protocol
    /// failures are errors.
    pub fn fetch_record<F: Fetch>(
        &self,
        item_id: &str,
        fetcher: &mut F,
    ) -> Result<ProductRecord, WorkerError> {
        let url = self.profile.detail_url(item_id)?;
        let body = fetcher.fetch(&url)?;

        let record = extract_record(&Document::parse(&body), self.selectors);
        debug!("Extracted {} fields for {}", record.field_count(), item_id);
        Ok(record)
    }
}
