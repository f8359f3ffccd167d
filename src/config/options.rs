// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use rand::Rng;

use super::consts::*;

/// Which store the run maintains.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Variant {
    /// Every mappable record lands in the main store; `concept` stays empty.
    Baseline,
    /// Records are classified against the club store at `club_store`;
    /// only non-club ("concept") records are kept.
    Concept { club_store: PathBuf },
}

/// Inclusive range for a randomized pause.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelayRange {
    pub min: Duration,
    pub max: Duration,
}

impl DelayRange {
    pub const fn from_millis((min, max): (u64, u64)) -> Self {
        Self { min: Duration::from_millis(min), max: Duration::from_millis(max) }
    }

    pub const ZERO: DelayRange = DelayRange { min: Duration::ZERO, max: Duration::ZERO };

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunOptions {
    pub start_page: u32,
    pub end_page: Option<u32>,      // inclusive; None = until a streak stops us
    pub quick: bool,                // quick update: converge sooner
    pub failure_limit: u32,
    pub empty_limit: u32,
    pub no_change_limit_quick: u32,
    pub no_change_limit_full: u32,
    pub retry_pause: DelayRange,    // between a failed fetch and its single retry
    pub skip_pause: DelayRange,     // after giving up on a page
    pub page_pause: DelayRange,     // between pages
    pub fetch_timeout: Duration,
    pub significant_pct: f64,
    pub store_path: PathBuf,
    pub change_log_path: PathBuf,
    pub variant: Variant,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            start_page: START_PAGE,
            end_page: None,
            quick: false,
            failure_limit: FAILURE_LIMIT,
            empty_limit: EMPTY_LIMIT,
            no_change_limit_quick: NO_CHANGE_LIMIT_QUICK,
            no_change_limit_full: NO_CHANGE_LIMIT_FULL,
            retry_pause: DelayRange::from_millis(RETRY_PAUSE_MS),
            skip_pause: DelayRange::from_millis(SKIP_PAUSE_MS),
            page_pause: DelayRange::from_millis(PAGE_PAUSE_MS),
            fetch_timeout: Duration::from_secs(FETCH_TIMEOUT_SECS),
            significant_pct: SIGNIFICANT_CHANGE_PCT,
            store_path: PathBuf::from(STORE_FILE),
            change_log_path: PathBuf::from(CHANGE_LOG_FILE),
            variant: Variant::Baseline,
        }
    }
}

impl RunOptions {
    /// Consecutive no-change pages after which the run counts as converged.
    pub fn no_change_limit(&self) -> u32 {
        if self.quick { self.no_change_limit_quick } else { self.no_change_limit_full }
    }

    /// Switch to the concept-only store. Moves the store path to the concept
    /// default unless the caller already pointed it somewhere else.
    pub fn set_concept(&mut self, club_store: PathBuf) {
        if self.store_path == PathBuf::from(STORE_FILE) {
            self.store_path = PathBuf::from(CONCEPT_STORE_FILE);
        }
        self.variant = Variant::Concept { club_store };
    }

    /// No sleeping at all. Handy for replaying dumps and for tests.
    pub fn without_pauses(mut self) -> Self {
        self.retry_pause = DelayRange::ZERO;
        self.skip_pause = DelayRange::ZERO;
        self.page_pause = DelayRange::ZERO;
        self
    }
}
