//! Compiled selectors
//!
//! Selector strings from the site profile are compiled once at startup and
//! shared by reference with every extraction call.

use crate::config::{compile_selector, SelectorConfig};
use crate::ConfigError;
use scraper::Selector;

/// Compiled selectors for listing and detail pages
#[derive(Debug, Clone)]
pub struct Selectors {
    pub listing_row: Selector,
    pub item_id: Selector,
    pub next_page: Selector,
    pub price: Selector,

    /// Name strategies in priority order
    pub name: Vec<Selector>,
    pub footnote: Selector,
    pub spec_section: Selector,
    pub spec_row: Selector,
    pub spec_header: Selector,
    pub spec_value: Selector,
}

impl Selectors {
    /// Compiles every selector string in the config
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            listing_row: compile_selector(&config.listing_row)?,
            item_id: compile_selector(&config.item_id)?,
            next_page: compile_selector(&config.next_page)?,
            price: compile_selector(&config.price)?,
            name: config
                .name
                .iter()
                .map(|s| compile_selector(s))
                .collect::<Result<Vec<_>, _>>()?,
            footnote: compile_selector(&config.footnote)?,
            spec_section: compile_selector(&config.spec_section)?,
            spec_row: compile_selector(&config.spec_row)?,
            spec_header: compile_selector(&config.spec_header)?,
            spec_value: compile_selector(&config.spec_value)?,
        })
    }
}
