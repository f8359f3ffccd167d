// src/runner.rs
use crate::{
    changelog::ChangeLog,
    config::{RunOptions, Variant},
    error::Result,
    progress::Progress,
    refs::ReferenceSets,
    scrape::{self, PageFetcher, Pause, RunSummary, ThreadSleep},
    store::Store,
};

/// Top-level run: load everything the loop needs, then harvest.
///
/// Load failures (store, reference sets, change log) are fatal and happen
/// before the first page is fetched.
pub fn run(
    opts: &RunOptions,
    fetcher: &mut dyn PageFetcher,
    progress: &mut dyn Progress,
) -> Result<RunSummary> {
    run_with_pause(opts, fetcher, &mut ThreadSleep::new(), progress)
}

/// Same as [`run`] with a caller-supplied pause.
pub fn run_with_pause(
    opts: &RunOptions,
    fetcher: &mut dyn PageFetcher,
    pause: &mut dyn Pause,
    progress: &mut dyn Progress,
) -> Result<RunSummary> {
    let refs = match &opts.variant {
        Variant::Baseline => None,
        Variant::Concept { club_store } => Some(ReferenceSets::load(club_store)?),
    };
    let mut store = Store::load(&opts.store_path)?;
    let mut changelog = ChangeLog::start(&opts.change_log_path, opts.significant_pct)?;

    scrape::harvest(opts, &mut store, refs.as_ref(), &mut changelog, fetcher, pause, progress)
}
