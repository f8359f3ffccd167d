// src/scrape/paginate.rs
//
// Pagination controller: fetch → map → reconcile, one page at a time,
// until a streak or the end-page bound stops it.

use serde_json::Value;

use crate::changelog::ChangeLog;
use crate::config::RunOptions;
use crate::error::Result;
use crate::progress::Progress;
use crate::refs::ReferenceSets;
use crate::specs::players;
use crate::store::{PriceChange, ReconciliationState, Store, UpsertResult};

use super::{PageFetcher, Pause};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Too many failed or empty pages in a row.
    ExhaustedPages,
    /// Too many pages in a row without inserts or updates.
    Converged,
    /// The configured end page was processed.
    BoundReached,
}

/// Counters threaded through the loop. No I/O; every transition is a method.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaginationState {
    pub page: u32,
    pub failure_streak: u32,
    pub empty_streak: u32,
    pub no_change_streak: u32,
}

impl PaginationState {
    pub fn new(start_page: u32) -> Self {
        Self { page: start_page, failure_streak: 0, empty_streak: 0, no_change_streak: 0 }
    }

    /// The page failed, retry included.
    pub fn on_failure(&mut self, opts: &RunOptions) -> Option<Termination> {
        self.failure_streak += 1;
        self.exhausted(opts)
    }

    /// The page answered with `items` raw items.
    pub fn on_fetched(&mut self, items: usize, opts: &RunOptions) -> Option<Termination> {
        self.failure_streak = 0;
        if items == 0 {
            self.empty_streak += 1;
        } else {
            self.empty_streak = 0;
        }
        self.exhausted(opts)
    }

    /// The page's items were reconciled; `changed` if anything was inserted or updated.
    pub fn on_processed(&mut self, changed: bool, opts: &RunOptions) -> Option<Termination> {
        if changed {
            self.no_change_streak = 0;
        } else {
            self.no_change_streak += 1;
        }
        (self.no_change_streak >= opts.no_change_limit()).then_some(Termination::Converged)
    }

    /// Move to the next page unless the current one was the last allowed,
    /// or the last page number there is.
    pub fn advance(&mut self, opts: &RunOptions) -> Option<Termination> {
        if opts.end_page.is_some_and(|end| self.page >= end) {
            return Some(Termination::BoundReached);
        }
        match self.page.checked_add(1) {
            Some(next) => {
                self.page = next;
                None
            }
            None => {
                logw!("Page {} is the last page number; stopping", self.page);
                Some(Termination::BoundReached)
            }
        }
    }

    fn exhausted(&self, opts: &RunOptions) -> Option<Termination> {
        (self.failure_streak >= opts.failure_limit || self.empty_streak >= opts.empty_limit)
            .then_some(Termination::ExhaustedPages)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PriceUpdate {
    pub id: String,
    pub name: String,
    pub change: PriceChange,
}

/// What reconciling one page did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageOutcome {
    pub items: usize,
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub duplicates: usize,
    /// Items without id.
    pub dropped: usize,
    /// Club-roster items left out of a concept-only store.
    pub club_skipped: usize,
    pub updates: Vec<PriceUpdate>,
}

impl PageOutcome {
    pub fn changed(&self) -> bool {
        self.inserted > 0 || self.updated > 0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub reason: Termination,
    pub pages_visited: u32,
    pub inserted: usize,
    pub updated: usize,
    pub significant: usize,
    pub total_records: usize,
}

/// Map and reconcile one page of raw items.
///
/// With `refs` the run keeps a concept-only store: items classified as
/// club-roster are left out.
pub fn process_page(
    items: &[Value],
    store: &mut Store,
    pass: &mut ReconciliationState,
    refs: Option<&ReferenceSets>,
) -> PageOutcome {
    let mut out = PageOutcome { items: items.len(), ..Default::default() };

    for raw in items {
        let record = players::map(raw, refs);
        if !record.is_mappable() {
            out.dropped += 1;
            continue;
        }
        if record.concept == Some(false) {
            out.club_skipped += 1;
            continue;
        }

        let (id, name) = (record.id.clone(), s!(record.display_name()));
        match store.upsert(record, pass) {
            UpsertResult::Inserted { row } => {
                out.inserted += 1;
                logd!("Added new player: {name} (ID: {id}, row {row})");
            }
            UpsertResult::Updated(change) => {
                out.updated += 1;
                out.updates.push(PriceUpdate { id, name, change });
            }
            UpsertResult::Unchanged => out.unchanged += 1,
            UpsertResult::SkippedDuplicateInPass => out.duplicates += 1,
        }
    }
    out
}

/// Run the pagination loop against `store`.
///
/// The store is saved after every page with changes, and once more when the
/// loop ends, whether it stopped on its own or on a fatal error.
pub fn harvest(
    opts: &RunOptions,
    store: &mut Store,
    refs: Option<&ReferenceSets>,
    changelog: &mut ChangeLog,
    fetcher: &mut dyn PageFetcher,
    pause: &mut dyn Pause,
    progress: &mut dyn Progress,
) -> Result<RunSummary> {
    progress.begin(opts.start_page, opts.end_page);

    let result = run_pages(opts, store, refs, changelog, fetcher, pause, progress);
    let saved = store.save(&opts.store_path);
    let summary = result?;
    saved?;

    logf!(
        "Done ({:?}): {} pages, {} total records, {} new, {} price updates, {} logged",
        summary.reason, summary.pages_visited, summary.total_records,
        summary.inserted, summary.updated, summary.significant
    );
    progress.finish(&summary);
    Ok(summary)
}

fn run_pages(
    opts: &RunOptions,
    store: &mut Store,
    refs: Option<&ReferenceSets>,
    changelog: &mut ChangeLog,
    fetcher: &mut dyn PageFetcher,
    pause: &mut dyn Pause,
    progress: &mut dyn Progress,
) -> Result<RunSummary> {
    let mut state = PaginationState::new(opts.start_page);
    let mut pass = ReconciliationState::new();
    let mut summary = RunSummary {
        reason: Termination::BoundReached,
        pages_visited: 0,
        inserted: 0,
        updated: 0,
        significant: 0,
        total_records: store.len(),
    };

    if opts.end_page.is_some_and(|end| opts.start_page > end) {
        logw!("Start page {} is past end page {:?}; nothing to do", opts.start_page, opts.end_page);
        return Ok(summary);
    }

    let reason = loop {
        let page = state.page;
        summary.pages_visited += 1;
        match opts.end_page {
            Some(end) => logf!("Opening page {page}/{end}"),
            None => logf!("Opening page {page}"),
        }

        let items = match fetch_with_retry(fetcher, pause, opts, page) {
            Ok(items) => items,
            Err(e) if e.is_page_level() => {
                loge!("Retry failed, skipping page {page}: {e}");
                progress.page_failed(page, &e);
                if let Some(t) = state.on_failure(opts) {
                    break t;
                }
                if let Some(t) = state.advance(opts) {
                    break t;
                }
                pause.pause(&opts.skip_pause);
                continue;
            }
            Err(e) => return Err(e),
        };

        logf!("Found {} player items on page {page}", items.len());
        if let Some(t) = state.on_fetched(items.len(), opts) {
            break t;
        }

        let outcome = process_page(&items, store, &mut pass, refs);
        for u in &outcome.updates {
            if changelog.record(&u.name, &u.id, &u.change)? {
                let verb = if u.change.is_increase() { "increased" } else { "dropped" };
                logf!(
                    "Price {verb} for {} (ID: {}): {} -> {} ({:+.1}%)",
                    u.name, u.id, u.change.old, u.change.new, u.change.percent
                );
            }
        }

        if outcome.changed() {
            store.save(&opts.store_path)?;
            logf!(
                "Page {page} completed: {} new players added, {} price updates",
                outcome.inserted, outcome.updated
            );
        } else {
            logf!("Page {page} completed: no changes");
        }
        summary.inserted += outcome.inserted;
        summary.updated += outcome.updated;
        progress.page_done(page, &outcome);

        if let Some(t) = state.on_processed(outcome.changed(), opts) {
            break t;
        }
        if let Some(t) = state.advance(opts) {
            break t;
        }
        pause.pause(&opts.page_pause);
    };

    summary.reason = reason;
    summary.significant = changelog.written();
    summary.total_records = store.len();
    Ok(summary)
}

/// One fetch, and on a page-level failure exactly one retry after a short pause.
fn fetch_with_retry(
    fetcher: &mut dyn PageFetcher,
    pause: &mut dyn Pause,
    opts: &RunOptions,
    page: u32,
) -> Result<Vec<Value>> {
    match fetcher.fetch(page) {
        Err(e) if e.is_page_level() => {
            logw!("Failed to load page {page}: {e}; retrying once");
            pause.pause(&opts.retry_pause);
            fetcher.fetch(page)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn opts() -> RunOptions {
        RunOptions {
            failure_limit: 2,
            empty_limit: 3,
            no_change_limit_full: 4,
            no_change_limit_quick: 2,
            ..Default::default()
        }
    }

    #[test]
    fn empty_streak_exhausts() {
        let o = opts();
        let mut s = PaginationState::new(1);
        assert_eq!(s.on_fetched(0, &o), None);
        assert_eq!(s.on_fetched(0, &o), None);
        assert_eq!(s.on_fetched(0, &o), Some(Termination::ExhaustedPages));
    }

    #[test]
    fn items_reset_empty_streak_and_success_resets_failures() {
        let o = opts();
        let mut s = PaginationState::new(1);
        s.on_fetched(0, &o);
        s.on_fetched(0, &o);
        assert_eq!(s.on_failure(&o), None);
        assert_eq!(s.empty_streak, 2, "a failed page leaves the empty streak alone");
        assert_eq!(s.on_fetched(5, &o), None);
        assert_eq!((s.failure_streak, s.empty_streak), (0, 0));
    }

    #[test]
    fn failure_streak_exhausts() {
        let o = opts();
        let mut s = PaginationState::new(1);
        assert_eq!(s.on_failure(&o), None);
        assert_eq!(s.on_failure(&o), Some(Termination::ExhaustedPages));
    }

    #[test]
    fn no_change_streak_converges_sooner_in_quick_mode() {
        let mut o = opts();
        let mut s = PaginationState::new(1);
        for _ in 0..3 {
            assert_eq!(s.on_processed(false, &o), None);
        }
        assert_eq!(s.on_processed(false, &o), Some(Termination::Converged));

        o.quick = true;
        let mut s = PaginationState::new(1);
        assert_eq!(s.on_processed(false, &o), None);
        assert_eq!(s.on_processed(true, &o), None);
        assert_eq!(s.on_processed(false, &o), None);
        assert_eq!(s.on_processed(false, &o), Some(Termination::Converged));
    }

    #[test]
    fn advance_stops_after_end_page() {
        let o = RunOptions { end_page: Some(2), ..opts() };
        let mut s = PaginationState::new(1);
        assert_eq!(s.advance(&o), None);
        assert_eq!(s.page, 2);
        assert_eq!(s.advance(&o), Some(Termination::BoundReached));
        assert_eq!(s.page, 2);

        let unbounded = opts();
        assert_eq!(s.advance(&unbounded), None);
        assert_eq!(s.page, 3);
    }

    #[test]
    fn advance_stops_at_the_last_page_number() {
        let mut s = PaginationState::new(u32::MAX);
        assert_eq!(s.advance(&opts()), Some(Termination::BoundReached));
        assert_eq!(s.page, u32::MAX);
    }

    #[test]
    fn process_page_counts_every_kind() {
        let mut store = Store::new();
        let mut pass = ReconciliationState::new();
        let items = vec![
            json!({"id": 1, "hasPrice": true, "price": 10}),
            json!({"id": 2}),
            json!({"id": 1, "hasPrice": true, "price": 99}),
            json!({"commonName": "no id"}),
        ];
        let out = process_page(&items, &mut store, &mut pass, None);
        assert_eq!((out.items, out.inserted, out.duplicates, out.dropped), (4, 2, 1, 1));
        assert!(out.changed());

        // Same ids, new pass: one price moved.
        let mut pass = ReconciliationState::new();
        let items = vec![json!({"id": 1, "hasPrice": true, "price": 30}), json!({"id": 2})];
        let out = process_page(&items, &mut store, &mut pass, None);
        assert_eq!((out.updated, out.unchanged), (1, 1));
        assert_eq!(out.updates[0].id, "1");
        assert_eq!(out.updates[0].change.percent, 200.0);
    }

    #[test]
    fn concept_store_leaves_out_club_players() {
        let refs = ReferenceSets::new(["1"], ["500"]);
        let mut store = Store::new();
        let items = vec![
            json!({"id": 1, "eaId": 9}),
            json!({"id": 2, "eaId": 500}),
            json!({"id": 3, "eaId": 7}),
        ];
        let out = process_page(&items, &mut store, &mut ReconciliationState::new(), Some(&refs));
        assert_eq!((out.inserted, out.club_skipped), (1, 2));
        assert_eq!(store.get("3").unwrap().concept, Some(true));
        assert!(store.get("1").is_none());
    }
}
