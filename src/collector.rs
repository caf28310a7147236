use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::fetcher::Fetch;
use crate::index::{crawl_letter, ALPHABET};
use crate::models::{FighterLocator, LocatorSet, RawFighterRecord, RawTable};
use crate::parser::detail::parse_fighter_page;
use crate::settings::Settings;

/// Collection stats returned after the detail phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectStats {
    pub total: usize,
    pub ok: usize,
    pub errors: usize,
}

pub struct Collected {
    pub table: RawTable,
    pub stats: CollectStats,
}

/// Phase 1: walk A..=Z and union every letter's fighter links.
pub async fn crawl_index<F: Fetch>(fetcher: &F, settings: &Settings) -> LocatorSet {
    let delay = Duration::from_millis(settings.index_delay_ms);
    let mut all_links = LocatorSet::new();

    info!("Crawling fighter index A-Z");
    for letter in ALPHABET {
        let links = crawl_letter(fetcher, settings, letter).await;
        all_links.merge(links);

        // polite delay
        sleep(delay).await;
    }

    info!(total = all_links.len(), "Unique fighters found");
    all_links
}

/// Fetch and parse one fighter page. `None` means skip this fighter.
pub async fn fetch_fighter<F: Fetch>(fetcher: &F, locator: &FighterLocator) -> Option<RawFighterRecord> {
    match fetcher.fetch_html(locator.as_str()).await {
        Ok(html) => Some(parse_fighter_page(&html)),
        Err(e) => {
            warn!(
                fighter = locator.fighter_id().unwrap_or(locator.as_str()),
                error = %e,
                "Failed to fetch fighter details"
            );
            None
        }
    }
}

/// Phase 2: visit each locator in order, one request at a time.
///
/// Failed fighters are skipped; the table holds rows in completion order
/// and is empty only when nothing could be collected.
pub async fn collect_details<F: Fetch>(
    fetcher: &F,
    locators: &LocatorSet,
    settings: &Settings,
    limit: Option<usize>,
) -> Collected {
    let delay = Duration::from_millis(settings.detail_delay_ms);
    let total = limit.map_or(locators.len(), |n| n.min(locators.len()));

    let pb = ProgressBar::new(total as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta}) {msg}")
    {
        pb.set_style(style.progress_chars("=> "));
    }

    let mut rows = Vec::new();
    let mut errors = 0usize;

    for locator in locators.iter().take(total) {
        pb.set_message(locator.fighter_id().unwrap_or_default().to_string());

        match fetch_fighter(fetcher, locator).await {
            Some(fighter) => rows.push(fighter),
            None => errors += 1,
        }
        pb.inc(1);

        // polite delay
        sleep(delay).await;
    }

    pb.finish_and_clear();

    let stats = CollectStats {
        total,
        ok: rows.len(),
        errors,
    };
    if rows.is_empty() {
        warn!("No fighter data collected");
    } else {
        info!("Collected {} fighters ({} ok, {} errors)", total, stats.ok, stats.errors);
    }

    Collected {
        table: RawTable::new(rows),
        stats,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    use tokio::time::Instant;

    use super::*;
    use crate::fetcher::FetchError;
    use crate::index::index_url;

    const INDEX: &str = "http://ufcstats.test/statistics/fighters";
    const DETAIL: &str = "http://ufcstats.test/fighter-details/";

    /// In-memory site: unknown URLs answer 404. Records every request and
    /// the (tokio) instant it arrived.
    #[derive(Default)]
    struct FakeSite {
        pages: HashMap<String, String>,
        requests: Mutex<Vec<String>>,
        arrivals: Mutex<Vec<Instant>>,
    }

    impl FakeSite {
        fn page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
            self.pages.insert(url.into(), html.into());
            self
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        fn gaps(&self) -> Vec<Duration> {
            let arrivals = self.arrivals.lock().unwrap();
            arrivals.windows(2).map(|w| w[1] - w[0]).collect()
        }
    }

    impl Fetch for FakeSite {
        async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.arrivals.lock().unwrap().push(Instant::now());
            self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    fn settings() -> Settings {
        Settings {
            index_url: INDEX.to_string(),
            detail_prefix: DETAIL.to_string(),
            index_delay_ms: 0,
            detail_delay_ms: 0,
            timeout_secs: 1,
            user_agent: "test".to_string(),
            raw_path: PathBuf::from("unused_raw.csv"),
            clean_path: PathBuf::from("unused_clean.csv"),
        }
    }

    fn detail_url(id: &str) -> String {
        format!("{}{}", DETAIL, id)
    }

    fn index_page(ids: &[&str]) -> String {
        ids.iter()
            .map(|id| format!(r#"<a href="{}">{}</a>"#, detail_url(id), id))
            .collect()
    }

    fn fighter_page(name: &str, record: &str) -> String {
        format!(
            r#"<span class="b-content__title-highlight">{}</span>
               <span class="b-content__title-record">Record: {}</span>
               <li class="b-list__box-list-item">Weight: 155 lbs.</li>"#,
            name, record
        )
    }

    #[tokio::test]
    async fn index_crawl_visits_every_letter_once() {
        let site = FakeSite::default();
        let links = crawl_index(&site, &settings()).await;
        assert!(links.is_empty());

        let requests = site.requests();
        assert_eq!(requests.len(), 26);
        assert_eq!(requests[0], index_url(INDEX, 'A'));
        assert_eq!(requests[25], index_url(INDEX, 'Z'));
    }

    #[tokio::test]
    async fn fighter_listed_under_two_letters_appears_once() {
        let site = FakeSite::default()
            .page(index_url(INDEX, 'A'), index_page(&["aaa", "shared"]))
            .page(index_url(INDEX, 'M'), index_page(&["shared", "mmm"]));

        let links = crawl_index(&site, &settings()).await;
        let urls: Vec<String> = links.iter().map(|l| l.to_string()).collect();
        assert_eq!(urls, vec![detail_url("aaa"), detail_url("shared"), detail_url("mmm")]);
    }

    #[tokio::test]
    async fn failed_fighter_is_skipped_not_fatal() {
        let site = FakeSite::default()
            .page(detail_url("one"), fighter_page("One", "1-0-0"))
            .page(detail_url("three"), fighter_page("Three", "3-0-0"));
        let locators: LocatorSet = ["one", "two", "three"]
            .into_iter()
            .map(|id| FighterLocator::new(detail_url(id)))
            .collect();

        let collected = collect_details(&site, &locators, &settings(), None).await;
        let names: Vec<&str> = collected.table.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["One", "Three"]);
        assert_eq!(
            collected.stats,
            CollectStats {
                total: 3,
                ok: 2,
                errors: 1
            }
        );
    }

    #[tokio::test]
    async fn nothing_collected_gives_empty_table() {
        let site = FakeSite::default();
        let locators: LocatorSet = [FighterLocator::new(detail_url("gone"))].into_iter().collect();

        let collected = collect_details(&site, &locators, &settings(), None).await;
        assert!(collected.table.is_empty());
        assert_eq!(collected.stats.errors, 1);
    }

    #[tokio::test]
    async fn limit_caps_detail_requests() {
        let site = FakeSite::default();
        let locators: LocatorSet = ["a", "b", "c"]
            .into_iter()
            .map(|id| FighterLocator::new(detail_url(id)))
            .collect();

        let collected = collect_details(&site, &locators, &settings(), Some(2)).await;
        assert_eq!(collected.stats.total, 2);
        assert_eq!(site.requests(), vec![detail_url("a"), detail_url("b")]);
    }

    #[tokio::test(start_paused = true)]
    async fn index_crawl_pauses_after_every_letter() {
        let site = FakeSite::default();
        let settings = Settings {
            index_delay_ms: 1000,
            ..settings()
        };

        let start = Instant::now();
        crawl_index(&site, &settings).await;
        let pause = Duration::from_millis(1000);

        assert!(start.elapsed() >= pause * 26);
        assert_eq!(site.gaps().len(), 25);
        assert!(site.gaps().iter().all(|&g| g >= pause));
    }

    #[tokio::test(start_paused = true)]
    async fn detail_fetches_are_spaced_by_the_detail_pause() {
        let site = FakeSite::default().page(detail_url("one"), fighter_page("One", "1-0-0"));
        let locators: LocatorSet = ["one", "two", "three"]
            .into_iter()
            .map(|id| FighterLocator::new(detail_url(id)))
            .collect();
        let settings = Settings {
            detail_delay_ms: 2000,
            ..settings()
        };

        let start = Instant::now();
        let collected = collect_details(&site, &locators, &settings, None).await;
        let pause = Duration::from_millis(2000);

        assert_eq!(collected.stats.ok, 1);
        assert!(start.elapsed() >= pause * 3);
        assert_eq!(site.gaps().len(), 2);
        assert!(site.gaps().iter().all(|&g| g >= pause));
    }
}
