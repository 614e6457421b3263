//! Listing enumerator
//!
//! Walks category × price bucket × page, emitting the item identifiers of
//! every non-empty listing page together with the state it was found at.
//!
//! # Transitions
//!
//! | Page outcome | Next state |
//! |--------------|------------|
//! | Zero rows | `(c, b + 1, 1)` |
//! | Rows, no next link | `(c, b + 1, 1)` |
//! | Rows and a next link | `(c, b, p + 1)` |
//! | Bucket past the catalog | `(c + 1, 0, 1)` |
//! | Category past the catalog | done |
//!
//! An empty page always ends the bucket. The enumerator cannot tell the end of
//! results from a glitch on the host side; a host that suspects the latter
//! can resume from the last state it received.

use crate::config::SiteProfile;
use crate::crawler::document::{node_text, select_within, Document};
use crate::crawler::extract::parse_item_id;
use crate::crawler::selectors::Selectors;
use crate::state::EnumerationState;
use crate::transport::{Emit, Fetch, Response};
use crate::WorkerError;
use tracing::{debug, info, warn};

/// What one listing page contained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    /// One identifier per listing row, in row order; blank ones included
    pub ids: Vec<String>,
    pub has_next: bool,
}

/// Totals for a finished enumeration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumerationSummary {
    /// Listing pages fetched, empty ones included
    pub pages_fetched: u64,

    /// Listing pages reported to the host
    pub pages_emitted: u64,

    pub ids_emitted: u64,

    /// State of the last emitted page
    pub last_state: Option<EnumerationState>,
}

/// Drives the listing traversal for one site profile
pub struct Enumerator<'a> {
    profile: &'a SiteProfile,
    selectors: &'a Selectors,
}

impl<'a> Enumerator<'a> {
    pub fn new(profile: &'a SiteProfile, selectors: &'a Selectors) -> Self {
        Self { profile, selectors }
    }

    /// Runs the traversal from `start` until every category is exhausted
    ///
    /// # Arguments
    ///
    /// * `start` - State to resume from; `EnumerationState::default()` for a full crawl
    /// * `host` - Fetches pages and receives one response per non-empty page
    ///
    /// # Returns
    ///
    /// * `Ok(EnumerationSummary)` - The traversal reached the end of the catalog
    /// * `Err(WorkerError)` - A fetch, a structural fault, or the host closing the channel
    pub fn run<H: Fetch + Emit>(
        &self,
        start: EnumerationState,
        host: &mut H,
    ) -> Result<EnumerationSummary, WorkerError> {
        let mut summary = EnumerationSummary::default();
        let mut cursor = self.settle(start);

        if cursor.is_none() {
            warn!("Resume state {} is past the end of the catalog", start);
        }

        while let Some(state) = cursor {
            let url = self.profile.listing_url(&state)?;
            let body = host.fetch(&url)?;
            summary.pages_fetched += 1;

            let page = self.parse_page(&body, &state)?;
            if page.ids.is_empty() {
                debug!("No rows at {}, moving to next bucket", state);
                cursor = self.settle(state.next_bucket());
                continue;
            }

            info!("Found {} items at {}", page.ids.len(), state);
            summary.pages_emitted += 1;
            summary.ids_emitted += page.ids.len() as u64;
            summary.last_state = Some(state);
            host.emit(&Response::list_page(state, page.ids))?;

            cursor = if page.has_next {
                self.settle(state.next_page()?)
            } else {
                self.settle(state.next_bucket())
            };
        }

        Ok(summary)
    }

    /// Reads the identifiers and the next-page marker off a listing page
    ///
    /// # Errors
    ///
    /// Returns `WorkerError::MissingNode` if a row has no item field.
    pub fn parse_page(
        &self,
        body: &str,
        state: &EnumerationState,
    ) -> Result<ListingPage, WorkerError> {
        let doc = Document::parse(body);
        let rows = doc.select_all(&self.selectors.listing_row);

        let mut ids = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let field = select_within(row, &self.selectors.item_id).ok_or_else(|| {
                WorkerError::MissingNode {
                    context: format!("item field in row {} at {}", index, state),
                }
            })?;

            let id = parse_item_id(&node_text(&field));
            if id.is_empty() {
                warn!("Row {} at {} has an empty item id", index, state);
            }
            ids.push(id);
        }

        // An empty page ends the bucket whatever links it carries
        let has_next = !rows.is_empty() && doc.contains(&self.selectors.next_page);

        Ok(ListingPage { ids, has_next })
    }

    fn settle(&self, state: EnumerationState) -> Option<EnumerationState> {
        state.settle(self.profile.categories.len(), self.profile.buckets.len())
    }
}
