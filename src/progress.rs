// src/progress.rs
use crate::error::ScrapeError;
use crate::scrape::{PageOutcome, RunSummary};

/// Lightweight progress reporting for a harvest run.
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called once before the first page.
    fn begin(&mut self, _start_page: u32, _end_page: Option<u32>) {}

    /// A page was fetched and reconciled.
    fn page_done(&mut self, _page: u32, _outcome: &PageOutcome) {}

    /// A page failed twice and was skipped.
    fn page_failed(&mut self, _page: u32, _err: &ScrapeError) {}

    /// Called when the loop stops on its own.
    fn finish(&mut self, _summary: &RunSummary) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
