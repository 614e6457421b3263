/// Enumeration state definitions for tracking crawl progress
///
/// The `(category, bucket, page)` triple is the only continuation state the
/// worker has. The host stores the last one it received and hands it back to
/// resume.
use crate::WorkerError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Position of the crawl within the category × bucket × page domain
///
/// Ordering is lexicographic over `(category, bucket, page)`, which is the
/// order pages are visited in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnumerationState {
    /// Index into the category catalog
    pub category: usize,

    /// Index into the price bucket catalog
    pub bucket: usize,

    /// Listing page, starting at 1
    pub page: u32,
}

impl Default for EnumerationState {
    fn default() -> Self {
        Self::new(0, 0, 1)
    }
}

impl EnumerationState {
    pub fn new(category: usize, bucket: usize, page: u32) -> Self {
        Self {
            category,
            bucket,
            page,
        }
    }

    /// Parses an optional resume string; absent or empty means start over
    pub fn from_resume(state: Option<&str>) -> Result<Self, WorkerError> {
        match state.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(s) => s.parse(),
        }
    }

    /// Same bucket, next page
    ///
    /// # Errors
    ///
    /// Returns `WorkerError::InvalidState` if the page number has no successor,
    /// since a wrapped page would not parse back.
    pub fn next_page(self) -> Result<Self, WorkerError> {
        let page = self
            .page
            .checked_add(1)
            .ok_or_else(|| WorkerError::InvalidState(format!("{} has no next page", self)))?;
        Ok(Self::new(self.category, self.bucket, page))
    }

    /// Next bucket of the same category, back to page 1
    ///
    /// Saturates: a bucket index of `usize::MAX` is past any catalog and
    /// settles into the next category.
    pub fn next_bucket(self) -> Self {
        Self::new(self.category, self.bucket.saturating_add(1), 1)
    }

    /// First bucket of the next category, `None` if the index has no successor
    pub fn next_category(self) -> Option<Self> {
        Some(Self::new(self.category.checked_add(1)?, 0, 1))
    }

    /// Carries an exhausted bucket index over into the next category
    ///
    /// Returns `None` once the category index runs past the catalog, which is
    /// the terminal `DONE` state.
    pub fn settle(self, categories: usize, buckets: usize) -> Option<Self> {
        let mut state = self;
        if state.bucket >= buckets {
            state = state.next_category()?;
        }
        if state.category >= categories {
            return None;
        }
        Some(state)
    }
}

impl fmt::Display for EnumerationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.category, self.bucket, self.page)
    }
}

impl FromStr for EnumerationState {
    type Err = WorkerError;

    /// Parses the `"<category>.<bucket>.<page>"` wire form
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || WorkerError::InvalidState(s.to_string());

        let mut parts = s.split('.');
        let (Some(category), Some(bucket), Some(page), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let category = category.trim().parse().map_err(|_| invalid())?;
        let bucket = bucket.trim().parse().map_err(|_| invalid())?;
        let page: u32 = page.trim().parse().map_err(|_| invalid())?;

        if page == 0 {
            return Err(invalid());
        }

        Ok(Self::new(category, bucket, page))
    }
}

impl Serialize for EnumerationState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
