//! Vendor website scraping: listing page to per-device key/value records.

use std::thread;
use std::time::Duration;

use indexmap::IndexMap;
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::extract::normalize_whitespace;
use crate::models::config::ScrapeConfig;

/// A scraped device row: `source_url`, `device_name`, `vendor`, then specs.
pub type DeviceRecord = IndexMap<String, String>;

/// Errors while fetching a page.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("invalid URL {0}: {1}")]
    Url(String, url::ParseError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// A page that could not be scraped.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeFailure {
    pub url: String,
    pub error: String,
}

/// Records that were scraped, alongside the pages that failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapeReport {
    pub records: Vec<DeviceRecord>,
    pub failures: Vec<ScrapeFailure>,
}

lazy_static! {
    static ref ANCHOR: Selector = Selector::parse("a[href]").unwrap();
    static ref TABLE: Selector = Selector::parse("table").unwrap();
    static ref ROW: Selector = Selector::parse("tr").unwrap();
    static ref CELL: Selector = Selector::parse("th, td").unwrap();
    static ref DL: Selector = Selector::parse("dl").unwrap();
    static ref DT: Selector = Selector::parse("dt").unwrap();
    static ref TITLE: Selector = Selector::parse("title").unwrap();
    static ref NAME_SELECTORS: Vec<Selector> = ["h1", "h2", "header h1", ".product-title", ".page-title"]
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect();
}

const SKIPPED_PREFIXES: [&str; 4] = ["#", "mailto:", "tel:", "javascript:"];
const NON_PRODUCT_MARKERS: [&str; 7] = [
    "impressum", "privacy", "kontakt", "about", "news", "blog", "jobs",
];
const PRODUCT_MARKERS: [&str; 7] = [
    "produkt", "product", "device", "agv", "ft", "fahrzeug", "vehicle",
];

/// Heuristic filter for links that look like device pages.
pub fn is_probable_device_url(href: &str) -> bool {
    let href = href.to_lowercase();
    if SKIPPED_PREFIXES.iter().any(|p| href.starts_with(p)) {
        return false;
    }
    if NON_PRODUCT_MARKERS.iter().any(|m| href.contains(m)) {
        return false;
    }
    PRODUCT_MARKERS.iter().any(|m| href.contains(m))
}

fn same_site(a: &Url, b: &Url) -> bool {
    a.host_str() == b.host_str() && a.port() == b.port()
}

fn element_text(el: ElementRef<'_>) -> String {
    normalize_whitespace(&el.text().collect::<Vec<_>>().join(" "))
}

/// Same-site device links on a listing page, deduplicated, in page order.
pub fn device_links(listing_url: &Url, html: &str, max_devices: usize) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut links: Vec<Url> = Vec::new();

    for anchor in document.select(&ANCHOR) {
        if links.len() >= max_devices {
            break;
        }

        let href = anchor.value().attr("href").unwrap_or_default().trim();
        if href.is_empty() || !is_probable_device_url(href) {
            continue;
        }
        let Ok(url) = listing_url.join(href) else {
            continue;
        };
        if !same_site(listing_url, &url) || links.contains(&url) {
            continue;
        }
        links.push(url);
    }

    links
}

fn table_to_kv(table: ElementRef<'_>) -> IndexMap<String, String> {
    let mut kv = IndexMap::new();
    for row in table.select(&ROW) {
        let cells: Vec<_> = row.select(&CELL).collect();
        if cells.len() < 2 {
            continue;
        }
        let key = element_text(cells[0]);
        let value = element_text(cells[1]);
        if !key.is_empty() && !value.is_empty() && !kv.contains_key(&key) {
            kv.insert(key, value);
        }
    }
    kv
}

fn dl_to_kv(dl: ElementRef<'_>) -> IndexMap<String, String> {
    let mut kv = IndexMap::new();
    for dt in dl.select(&DT) {
        let dd = dt
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "dd");
        let Some(dd) = dd else {
            continue;
        };
        let key = element_text(dt);
        let value = element_text(dd);
        if !key.is_empty() && !value.is_empty() && !kv.contains_key(&key) {
            kv.insert(key, value);
        }
    }
    kv
}

fn device_name(document: &Html) -> String {
    NAME_SELECTORS
        .iter()
        .filter_map(|sel| document.select(sel).next())
        .map(element_text)
        .find(|t| !t.is_empty())
        .or_else(|| {
            document
                .select(&TITLE)
                .next()
                .map(element_text)
                .filter(|t| !t.is_empty())
        })
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Extract the device name and spec key/values from a device page.
///
/// Only tables and definition lists with at least `min_entries` pairs count
/// as spec tables.
pub fn parse_device_page(url: &Url, html: &str, min_entries: usize) -> DeviceRecord {
    let document = Html::parse_document(html);

    let mut specs: IndexMap<String, String> = IndexMap::new();
    for table in document.select(&TABLE) {
        let kv = table_to_kv(table);
        if kv.len() >= min_entries {
            specs.extend(kv);
        }
    }
    for dl in document.select(&DL) {
        let kv = dl_to_kv(dl);
        if kv.len() >= min_entries {
            specs.extend(kv);
        }
    }

    let host = url.host_str().unwrap_or_default();
    let mut record = DeviceRecord::new();
    record.insert("source_url".to_string(), url.to_string());
    record.insert("device_name".to_string(), device_name(&document));
    record.insert(
        "vendor".to_string(),
        host.strip_prefix("www.").unwrap_or(host).to_string(),
    );
    record.extend(specs);
    record
}

/// Blocking scraper for vendor product listings.
pub struct VendorScraper {
    client: reqwest::blocking::Client,
    config: ScrapeConfig,
}

impl VendorScraper {
    pub fn new(config: ScrapeConfig) -> Result<Self, ScrapeError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, config })
    }

    fn fetch_html(&self, url: &Url) -> Result<String, ScrapeError> {
        Ok(self
            .client
            .get(url.clone())
            .send()?
            .error_for_status()?
            .text()?)
    }

    /// Scrape every device linked from a listing page.
    ///
    /// Per-page failures are collected in the report; an unreachable listing
    /// yields a report without records.
    pub fn scrape(&self, listing_url: &str) -> ScrapeReport {
        let mut report = ScrapeReport::default();

        let listing = match Url::parse(listing_url)
            .map_err(|e| ScrapeError::Url(listing_url.to_string(), e))
            .and_then(|url| self.fetch_html(&url).map(|html| (url, html)))
        {
            Ok((url, html)) => device_links(&url, &html, self.config.max_devices),
            Err(e) => {
                warn!("Failed to load listing {}: {}", listing_url, e);
                report.failures.push(ScrapeFailure {
                    url: listing_url.to_string(),
                    error: e.to_string(),
                });
                return report;
            }
        };

        if listing.is_empty() {
            warn!("No device URLs found on: {}", listing_url);
            return report;
        }
        info!("Found {} candidate device URLs.", listing.len());

        let delay = Duration::from_millis(self.config.delay_ms);
        for (i, url) in listing.iter().enumerate() {
            if i > 0 {
                thread::sleep(delay);
            }
            info!("({}/{}) Scraping: {}", i + 1, listing.len(), url);

            match self.fetch_html(url) {
                Ok(html) => report.records.push(parse_device_page(
                    url,
                    &html,
                    self.config.min_spec_entries,
                )),
                Err(e) => {
                    warn!("Failed scraping {}: {}", url, e);
                    report.failures.push(ScrapeFailure {
                        url: url.to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        report
    }
}
