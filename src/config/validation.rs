use crate::config::types::{
    check_rendered, render_listing, PriceBucket, SelectorConfig, SiteProfile, LISTING_PLACEHOLDERS,
};
use crate::ConfigError;
use scraper::Selector;
use std::collections::HashSet;
use url::Url;

/// Validates the entire site profile
pub fn validate(profile: &SiteProfile) -> Result<(), ConfigError> {
    validate_categories(&profile.categories)?;
    validate_buckets(&profile.buckets)?;
    validate_listing_template(&profile.listing_template, profile)?;
    validate_detail_url(&profile.detail_base, &profile.detail_id_param)?;
    validate_selectors(&profile.selectors)?;
    Ok(())
}

/// Validates the category catalog
fn validate_categories(categories: &[u32]) -> Result<(), ConfigError> {
    if categories.is_empty() {
        return Err(ConfigError::Validation(
            "category catalog cannot be empty".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for category in categories {
        if !seen.insert(category) {
            return Err(ConfigError::Validation(format!(
                "category {} appears more than once",
                category
            )));
        }
    }

    Ok(())
}

/// Validates the price bucket catalog
///
/// Only the last bucket may be open-ended.
fn validate_buckets(buckets: &[PriceBucket]) -> Result<(), ConfigError> {
    if buckets.is_empty() {
        return Err(ConfigError::Validation(
            "price bucket catalog cannot be empty".to_string(),
        ));
    }

    let last = buckets.len() - 1;
    for (index, bucket) in buckets.iter().enumerate() {
        let low = parse_bound(&bucket.low)?;
        let high = parse_bound(&bucket.high)?;

        if bucket.is_open_ended() {
            if index != last {
                return Err(ConfigError::Validation(format!(
                    "only the last price bucket may be open-ended, bucket {} is not last",
                    index
                )));
            }
            continue;
        }

        if low > high {
            return Err(ConfigError::Validation(format!(
                "price bucket {} has low bound {} above high bound {}",
                index, bucket.low, bucket.high
            )));
        }
    }

    Ok(())
}

fn parse_bound(bound: &str) -> Result<f64, ConfigError> {
    bound
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
        .ok_or_else(|| ConfigError::Validation(format!("invalid price bound '{}'", bound)))
}

/// Validates the listing template against the first catalog entries
fn validate_listing_template(template: &str, profile: &SiteProfile) -> Result<(), ConfigError> {
    for placeholder in LISTING_PLACEHOLDERS {
        if !template.contains(placeholder) {
            return Err(ConfigError::InvalidTemplate(format!(
                "{} (missing {})",
                template, placeholder
            )));
        }
    }

    if let (Some(category), Some(bucket)) = (profile.categories.first(), profile.buckets.first()) {
        let rendered = render_listing(template, 1, *category, bucket);
        check_rendered(template, &rendered)?;
    }

    Ok(())
}

/// Validates the detail URL base and its id parameter
fn validate_detail_url(base: &str, param: &str) -> Result<(), ConfigError> {
    let url = Url::parse(base)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid detail URL '{}': {}", base, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Detail URL '{}' must use http or https",
            base
        )));
    }

    if param.is_empty() {
        return Err(ConfigError::Validation(
            "detail id parameter cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Checks every selector string compiles
fn validate_selectors(selectors: &SelectorConfig) -> Result<(), ConfigError> {
    if selectors.name.is_empty() {
        return Err(ConfigError::Validation(
            "at least one name selector is required".to_string(),
        ));
    }

    let singles = [
        &selectors.listing_row,
        &selectors.item_id,
        &selectors.next_page,
        &selectors.price,
        &selectors.footnote,
        &selectors.spec_section,
        &selectors.spec_row,
        &selectors.spec_header,
        &selectors.spec_value,
    ];

    for selector in singles.into_iter().chain(selectors.name.iter()) {
        compile_selector(selector)?;
    }

    Ok(())
}

/// Compiles one selector string
pub fn compile_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}
