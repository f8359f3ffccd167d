// src/scrape/fetch.rs
use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use reqwest::blocking::Client;
use serde_json::Value;

use crate::core::net;
use crate::error::{Result, ScrapeError};
use crate::specs::matches::extract_player_items;

/// Source of raw player items, one page at a time.
///
/// Errors that are [`ScrapeError::is_page_level`] are retried once and then
/// skipped by the caller; any other error ends the run.
pub trait PageFetcher {
    fn fetch(&mut self, page: u32) -> Result<Vec<Value>>;
}

impl<F> PageFetcher for F
where
    F: FnMut(u32) -> Result<Vec<Value>>,
{
    fn fetch(&mut self, page: u32) -> Result<Vec<Value>> {
        self(page)
    }
}

/// Parse a page body (router state JSON, or a simpler dump of it) into items.
pub fn parse_payload(page: u32, body: &str) -> Result<Vec<Value>> {
    let payload: Value = serde_json::from_str(body.trim())
        .map_err(|e| ScrapeError::fetch(page, format!("payload is not JSON: {e}")))?;
    Ok(extract_player_items(&payload))
}

/* ---------------- HTTP ---------------- */

/// GETs a URL that serves a page's router state as JSON, e.g. a rendering
/// sidecar in front of the listing. `{page}` in the template is replaced by
/// the page number.
pub struct HttpFetcher {
    client: Client,
    url_template: String,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(url_template: &str, timeout: Duration) -> Result<Self> {
        if !url_template.contains("{page}") {
            return Err(ScrapeError::DriverInit(format!("URL template has no {{page}}: {url_template}")));
        }
        let client = net::client(timeout).map_err(|e| ScrapeError::DriverInit(e.to_string()))?;
        Ok(Self { client, url_template: s!(url_template), timeout })
    }

    pub fn page_url(&self, page: u32) -> String {
        self.url_template.replace("{page}", &page.to_string())
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&mut self, page: u32) -> Result<Vec<Value>> {
        let url = self.page_url(page);
        logd!("GET {url}");
        let body = net::http_get(&self.client, &url).map_err(|e| {
            if e.is_timeout() {
                ScrapeError::FetchTimeout { page, secs: self.timeout.as_secs() }
            } else {
                ScrapeError::fetch(page, e.to_string())
            }
        })?;
        parse_payload(page, &body)
    }
}

/* ---------------- Offline dumps ---------------- */

/// Replays captured router state from `<dir>/page-<N>.json`.
pub struct DumpFetcher {
    dir: PathBuf,
}

impl DumpFetcher {
    pub fn new(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(ScrapeError::DriverInit(format!("dump directory not found: {}", dir.display())));
        }
        Ok(Self { dir: dir.to_path_buf() })
    }

    pub fn page_path(&self, page: u32) -> PathBuf {
        self.dir.join(format!("page-{page}.json"))
    }
}

impl PageFetcher for DumpFetcher {
    fn fetch(&mut self, page: u32) -> Result<Vec<Value>> {
        let path = self.page_path(page);
        let body = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ScrapeError::fetch(page, format!("no dump at {}", path.display())),
            _ => ScrapeError::fetch(page, format!("{}: {e}", path.display())),
        })?;
        parse_payload(page, &body)
    }
}
