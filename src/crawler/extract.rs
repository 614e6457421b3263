//! Field extractors
//!
//! Each extractor reads a parsed page and yields an optional value. Fallbacks
//! are ordered strategy lists; the first strategy with a non-empty result wins.
//! A field nothing yields is simply absent, never an error.

use crate::crawler::document::{node_text, select_within, Document};
use crate::crawler::record::ProductRecord;
use crate::crawler::selectors::Selectors;
use scraper::{ElementRef, Node};
use tracing::{debug, warn};

/// Label preceding the identifier in a listing row
const ITEM_LABEL: &str = "Item#:";

/// Separator between the identifier and the rest of the row's item field
const ITEM_SEPARATOR: char = '|';

/// Builds the full record for a detail page
///
/// Every extractor runs independently; none can fail the record.
pub fn extract_record(doc: &Document, selectors: &Selectors) -> ProductRecord {
    let mut record = ProductRecord {
        price: extract_price(doc, selectors),
        name: extract_name(doc, selectors),
        ..Default::default()
    };

    let footnote = extract_footnote(doc, selectors);
    record.brand = footnote.brand;
    record.model = footnote.model;

    for (key, value) in extract_specs(doc, selectors) {
        if !record.insert_spec(key.clone(), value) {
            debug!("Dropping spec row '{}' that shadows a core field", key);
        }
    }

    record
}

/// Keeps the digits of a price text and reads them as one integer
///
/// No decimal interpretation: `"$1,234.56"` becomes `123456`.
///
/// # Returns
///
/// * `Some(u64)` - The text held at least one digit
/// * `None` - No digits, or too many to fit in a `u64`
pub fn encode_price(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }

    match digits.parse() {
        Ok(price) => Some(price),
        Err(_) => {
            warn!("Ignoring price '{}' with {} digits", text.trim(), digits.len());
            None
        }
    }
}

/// Price from the primary price node
pub fn extract_price(doc: &Document, selectors: &Selectors) -> Option<u64> {
    doc.select_first(&selectors.price)
        .and_then(|node| encode_price(&node_text(&node)))
}

/// Name from the first strategy yielding non-empty text
pub fn extract_name(doc: &Document, selectors: &Selectors) -> Option<String> {
    selectors
        .name
        .iter()
        .find_map(|selector| doc.first_text(selector))
}

/// Values read from the footnote block
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Footnote {
    pub brand: Option<String>,
    pub model: Option<String>,
}

/// Brand and model from the `key: value` lines of the footnote block
pub fn extract_footnote(doc: &Document, selectors: &Selectors) -> Footnote {
    let mut footnote = Footnote::default();
    let Some(block) = doc.select_first(&selectors.footnote) else {
        return footnote;
    };

    for line in footnote_lines(&block) {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };

        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        match key.trim().to_lowercase().as_str() {
            "manufactured by" => footnote.brand = Some(value.to_string()),
            "mfg part no" => footnote.model = Some(value.to_string()),
            _ => {}
        }
    }

    footnote
}

/// Splits a block into lines at `<br>` elements and newlines
///
/// Inline markup contributes only its text, which strips bold and strong
/// wrappers from values.
fn footnote_lines(block: &ElementRef<'_>) -> Vec<String> {
    let mut lines = vec![String::new()];

    for node in block.descendants() {
        match node.value() {
            Node::Text(text) => {
                let mut parts = text.split('\n');
                if let (Some(first), Some(current)) = (parts.next(), lines.last_mut()) {
                    current.push_str(first);
                }
                lines.extend(parts.map(str::to_string));
            }
            Node::Element(element) if element.name() == "br" => lines.push(String::new()),
            _ => {}
        }
    }

    lines
}

/// Header/value pairs from the specification table, in row order
///
/// Rows without a data cell or a header cell are skipped. Callers apply the
/// pairs in order, so a repeated header keeps its last value.
pub fn extract_specs(doc: &Document, selectors: &Selectors) -> Vec<(String, String)> {
    let Some(section) = doc.select_first(&selectors.spec_section) else {
        return Vec::new();
    };

    section
        .select(&selectors.spec_row)
        .filter_map(|row| {
            let value = select_within(&row, &selectors.spec_value)?;
            let header = select_within(&row, &selectors.spec_header)?;
            let key = node_text(&header).to_lowercase();
            if key.is_empty() {
                return None;
            }
            Some((key, node_text(&value)))
        })
        .collect()
}

/// Item identifier from the text of a listing row's item field
///
/// Keeps the part before the first separator and drops the label:
/// `"Item#: T123-456 | Model#: X"` becomes `"T123-456"`.
pub fn parse_item_id(text: &str) -> String {
    text.split(ITEM_SEPARATOR)
        .next()
        .unwrap_or_default()
        .replace(ITEM_LABEL, "")
        .trim()
        .to_string()
}
