//! Site profile for Catalog-Worker
//!
//! This module holds the fixed crawl configuration: the category and price bucket
//! catalogs, the listing and detail URL templates, and the selector strings for
//! every piece of markup the worker reads. The profile is built once at startup,
//! validated, and only read afterwards.
//!
//! # Example
//!
//! ```
//! use catalog_worker::config::{load_profile, SiteProfile};
//!
//! let profile = load_profile(SiteProfile::default()).unwrap();
//! assert_eq!(profile.categories.len(), 20);
//! ```

mod types;
mod validation;

// Re-export types
pub use types::{PriceBucket, SelectorConfig, SiteProfile, CATEGORIES, PRICE_BUCKETS};

pub use validation::{compile_selector, validate};

use crate::ConfigError;

/// Validates a profile and hands it back ready for use
///
/// # Returns
///
/// * `Ok(SiteProfile)` - The profile passed validation
/// * `Err(ConfigError)` - A catalog, template or selector is unusable
pub fn load_profile(profile: SiteProfile) -> Result<SiteProfile, ConfigError> {
    validate(&profile)?;
    Ok(profile)
}
