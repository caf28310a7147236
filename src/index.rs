use tracing::{info, warn};

use crate::fetcher::Fetch;
use crate::models::LocatorSet;
use crate::parser::index::extract_fighter_links;
use crate::settings::Settings;

pub const ALPHABET: std::ops::RangeInclusive<char> = 'A'..='Z';

/// Index page for one letter, always in single-page mode.
pub fn index_url(base: &str, letter: char) -> String {
    format!("{}?char={}&page=all", base, letter)
}

/// Fetch one letter's index page and return the fighter links on it.
///
/// Failures are logged and yield an empty set so the crawl can move on.
pub async fn crawl_letter<F: Fetch>(fetcher: &F, settings: &Settings, letter: char) -> LocatorSet {
    let url = index_url(&settings.index_url, letter);
    match fetcher.fetch_html(&url).await {
        Ok(html) => {
            let links = extract_fighter_links(&html, &settings.detail_prefix);
            info!(%letter, count = links.len(), "Index page crawled");
            links
        }
        Err(e) => {
            warn!(%letter, error = %e, "Failed to crawl index page");
            LocatorSet::new()
        }
    }
}
