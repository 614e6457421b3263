use crate::state::EnumerationState;
use crate::{ConfigError, WorkerError};
use url::Url;

/// Category identifiers crawled, in enumeration order
pub const CATEGORIES: [u32; 20] = [
    32, 22, 99, 8, 109, 9, 10, 13, 106, 24, 107, 5298, 28, 3, 98, 136, 36, 379, 4462, 12,
];

/// Price ranges used to keep each listing query small enough to paginate
pub const PRICE_BUCKETS: [(&str, &str); 9] = [
    ("0.01", "24.99"),
    ("25.00", "49.99"),
    ("50.00", "99.99"),
    ("100.00", "199.99"),
    ("200.00", "499.99"),
    ("500.00", "749.99"),
    ("750.00", "999.99"),
    ("1000.00", "1499.99"),
    ("1500.00", "0"),
];

const LISTING_URL_TEMPLATE: &str = "http://m.tigerdirect.com/applications/category/category_slc.asp?page={page}&Nav=|c:{category}|lp:{low}:hp:{high}|&Sort=3&Recs=30";
const DETAIL_URL_BASE: &str = "http://m.tigerdirect.com/applications/SearchTools/item-details.asp";

/// Placeholders every listing template must carry
pub const LISTING_PLACEHOLDERS: [&str; 4] = ["{page}", "{category}", "{low}", "{high}"];

/// Everything the worker knows about the site it crawls
///
/// Built once at startup and only read afterwards.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    /// Category identifiers, in enumeration order
    pub categories: Vec<u32>,

    /// Price buckets, in enumeration order
    pub buckets: Vec<PriceBucket>,

    /// Listing URL template with `{page}`, `{category}`, `{low}` and `{high}`
    pub listing_template: String,

    /// Detail page URL without the item parameter
    pub detail_base: String,

    /// Query parameter carrying the item identifier on detail pages
    pub detail_id_param: String,

    /// CSS selectors for listing and detail pages
    pub selectors: SelectorConfig,
}

/// A price range filter, bounds kept as the site expects them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceBucket {
    pub low: String,

    /// `"0"` marks an open-ended bucket
    pub high: String,
}

impl PriceBucket {
    pub fn new(low: &str, high: &str) -> Self {
        Self {
            low: low.to_string(),
            high: high.to_string(),
        }
    }

    /// Returns true if the bucket has no upper bound
    pub fn is_open_ended(&self) -> bool {
        self.high == "0"
    }
}

/// Selector strings for each piece of markup the worker reads
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    /// One node per product on a listing page
    pub listing_row: String,

    /// Node within a listing row holding the "Item#:" label
    pub item_id: String,

    /// Present when the listing has another page
    pub next_page: String,

    pub price: String,

    /// Name strategies, tried in order
    pub name: Vec<String>,

    /// Block of `key: value` lines carrying brand and model
    pub footnote: String,

    /// Container of the specification table
    pub spec_section: String,
    pub spec_row: String,
    pub spec_header: String,
    pub spec_value: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            listing_row: "li.prodRowWrap".to_string(),
            item_id: "p.itemModel".to_string(),
            next_page: "a.paginatNext".to_string(),
            price: "dd.priceFinal".to_string(),
            name: vec![
                "#sectionProductInfo strong".to_string(),
                "#productDesc".to_string(),
            ],
            footnote: ".productFootnote li".to_string(),
            spec_section: "#DetailedSpecs".to_string(),
            spec_row: "tr".to_string(),
            spec_header: "th".to_string(),
            spec_value: "td".to_string(),
        }
    }
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            categories: CATEGORIES.to_vec(),
            buckets: PRICE_BUCKETS
                .iter()
                .map(|(low, high)| PriceBucket::new(low, high))
                .collect(),
            listing_template: LISTING_URL_TEMPLATE.to_string(),
            detail_base: DETAIL_URL_BASE.to_string(),
            detail_id_param: "Sku".to_string(),
            selectors: SelectorConfig::default(),
        }
    }
}

impl SiteProfile {
    /// Builds the listing URL for a position in the crawl
    ///
    /// # Errors
    ///
    /// Returns `WorkerError::InvalidState` if the state points outside the
    /// catalogs, or a URL error if the rendered template does not parse.
    pub fn listing_url(&self, state: &EnumerationState) -> Result<Url, WorkerError> {
        let category = self
            .categories
            .get(state.category)
            .ok_or_else(|| WorkerError::InvalidState(state.to_string()))?;
        let bucket = self
            .buckets
            .get(state.bucket)
            .ok_or_else(|| WorkerError::InvalidState(state.to_string()))?;

        let rendered = render_listing(&self.listing_template, state.page, *category, bucket);
        Ok(Url::parse(&rendered)?)
    }

    /// Builds the detail page URL for an item identifier
    pub fn detail_url(&self, item_id: &str) -> Result<Url, WorkerError> {
        let mut url = Url::parse(&self.detail_base)?;
        url.query_pairs_mut()
            .append_pair(&self.detail_id_param, item_id);
        Ok(url)
    }

    /// Number of (category, bucket) pairs a full crawl walks through
    pub fn slice_count(&self) -> usize {
        self.categories.len() * self.buckets.len()
    }
}

/// Substitutes the listing placeholders
pub(crate) fn render_listing(template: &str, page: u32, category: u32, bucket: &PriceBucket) -> String {
    template
        .replace("{page}", &page.to_string())
        .replace("{category}", &category.to_string())
        .replace("{low}", &bucket.low)
        .replace("{high}", &bucket.high)
}

/// Checks a rendered template is something the host can fetch
pub(crate) fn check_rendered(template: &str, rendered: &str) -> Result<(), ConfigError> {
    let url = Url::parse(rendered).map_err(|_| ConfigError::InvalidTemplate(template.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "'{}' must use http or https",
            rendered
        )));
    }
    Ok(())
}
