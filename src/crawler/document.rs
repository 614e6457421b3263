//! Parsed document model
//!
//! Wraps a parsed HTML tree with the few queries the extractors need. A
//! `Document` is built per fetch, only read, and dropped after extraction.

use scraper::{ElementRef, Html, Selector};

/// A parsed listing or detail page
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses document text using HTML5 error-recovery rules
    ///
    /// Parsing never fails; broken markup yields whatever tree the HTML5
    /// algorithm recovers.
    pub fn parse(text: &str) -> Self {
        Self {
            html: Html::parse_document(text),
        }
    }

    /// Returns the first node matching the selector
    pub fn select_first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.html.select(selector).next()
    }

    /// Returns every node matching the selector, in document order
    pub fn select_all(&self, selector: &Selector) -> Vec<ElementRef<'_>> {
        self.html.select(selector).collect()
    }

    /// Returns true if any node matches
    pub fn contains(&self, selector: &Selector) -> bool {
        self.select_first(selector).is_some()
    }

    /// Trimmed text of the first match, if it is non-empty
    pub fn first_text(&self, selector: &Selector) -> Option<String> {
        self.select_first(selector)
            .map(|element| node_text(&element))
            .filter(|text| !text.is_empty())
    }
}

/// All descendant text of a node in document order, trimmed
pub fn node_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Returns the first descendant of `element` matching the selector
pub fn select_within<'a>(element: &ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    element.select(selector).next()
}
