use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::models::{FighterLocator, LocatorSet};

static HREF_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Collect every link on an index page whose target contains `detail_prefix`.
///
/// This is a substring test, so any link embedding the prefix is kept.
pub fn extract_fighter_links(html: &str, detail_prefix: &str) -> LocatorSet {
    let doc = Html::parse_document(html);
    doc.select(&HREF_SEL)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| href.contains(detail_prefix))
        .map(FighterLocator::new)
        .collect()
}
