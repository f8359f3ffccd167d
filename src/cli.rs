// src/cli.rs
use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::config::{RunOptions, consts::*};
use crate::error::{Result, ScrapeError};
use crate::progress::Progress;
use crate::scrape::{DumpFetcher, HttpFetcher, PageFetcher, PageOutcome, RunSummary};

/// Harvest paginated player listings into a CSV store, tracking new players and price moves.
#[derive(Debug, Parser)]
#[command(name = "fut_scrape", version, about)]
#[command(group(ArgGroup::new("source").required(true).args(["url", "dump_dir"])))]
pub struct Args {
    /// URL template serving a page's router state as JSON; `{page}` is replaced
    #[arg(long)]
    pub url: Option<String>,

    /// Directory of captured `page-<N>.json` router states to replay
    #[arg(long, value_name = "DIR")]
    pub dump_dir: Option<PathBuf>,

    /// First page to fetch
    #[arg(short = 's', long, default_value_t = START_PAGE)]
    pub start_page: u32,

    /// Last page to fetch (inclusive); omit to run until a streak stops the loop
    #[arg(short = 'e', long)]
    pub end_page: Option<u32>,

    /// Quick update: stop after fewer pages without changes
    #[arg(short, long)]
    pub quick: bool,

    /// CSV store to reconcile into
    #[arg(short = 'o', long, value_name = "FILE")]
    pub store: Option<PathBuf>,

    /// Keep a concept-only store, classifying against this club store CSV
    #[arg(long, value_name = "FILE")]
    pub concept: Option<PathBuf>,

    /// Change log for price moves above the threshold
    #[arg(long, value_name = "FILE", default_value = CHANGE_LOG_FILE)]
    pub change_log: PathBuf,

    /// Consecutive failed pages before giving up
    #[arg(long, default_value_t = FAILURE_LIMIT)]
    pub failure_limit: u32,

    /// Consecutive empty pages before giving up
    #[arg(long, default_value_t = EMPTY_LIMIT)]
    pub empty_limit: u32,

    /// Per-page fetch timeout in seconds
    #[arg(long, default_value_t = FETCH_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Skip politeness pauses (only sensible with --dump-dir)
    #[arg(long)]
    pub no_pause: bool,
}

impl Args {
    pub fn to_options(&self) -> RunOptions {
        let mut opts = RunOptions {
            start_page: self.start_page,
            end_page: self.end_page,
            quick: self.quick,
            failure_limit: self.failure_limit,
            empty_limit: self.empty_limit,
            fetch_timeout: std::time::Duration::from_secs(self.timeout),
            change_log_path: self.change_log.clone(),
            ..Default::default()
        };
        if let Some(store) = &self.store {
            opts.store_path = store.clone();
        }
        if let Some(club) = &self.concept {
            opts.set_concept(club.clone());
        }
        if self.no_pause {
            opts = opts.without_pauses();
        }
        opts
    }

    pub fn fetcher(&self, opts: &RunOptions) -> Result<Box<dyn PageFetcher>> {
        match (&self.url, &self.dump_dir) {
            (Some(url), _) => Ok(Box::new(HttpFetcher::new(url, opts.fetch_timeout)?)),
            (None, Some(dir)) => Ok(Box::new(DumpFetcher::new(dir)?)),
            (None, None) => Err(ScrapeError::DriverInit(s!("no page source given"))),
        }
    }
}

/// Prints one line per page to stdout.
struct ConsoleProgress;

impl Progress for ConsoleProgress {
    fn page_done(&mut self, page: u32, o: &PageOutcome) {
        println!(
            "page {page}: {} items, {} new, {} price updates, {} unchanged",
            o.items, o.inserted, o.updated, o.unchanged
        );
    }

    fn page_failed(&mut self, page: u32, err: &ScrapeError) {
        println!("page {page}: skipped ({err})");
    }

    fn finish(&mut self, s: &RunSummary) {
        println!(
            "Stopped: {:?}. {} pages, {} total records, {} new, {} price updates ({} logged)",
            s.reason, s.pages_visited, s.total_records, s.inserted, s.updated, s.significant
        );
    }
}

pub fn run(args: Args) -> Result<RunSummary> {
    let opts = args.to_options();
    let mut fetcher = args.fetcher(&opts)?;
    crate::runner::run(&opts, fetcher.as_mut(), &mut ConsoleProgress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;

    #[test]
    fn source_is_required() {
        assert!(Args::try_parse_from(["fut_scrape"]).is_err());
        assert!(Args::try_parse_from(["fut_scrape", "--dump-dir", "d", "--url", "u"]).is_err());
    }

    #[test]
    fn flags_map_onto_options() {
        let args = Args::try_parse_from([
            "fut_scrape", "--dump-dir", "dumps", "-s", "4", "-e", "9", "--quick",
            "--concept", "allPlayers.csv", "--no-pause",
        ])
        .unwrap();
        let o = args.to_options();
        assert_eq!((o.start_page, o.end_page, o.quick), (4, Some(9), true));
        assert_eq!(o.store_path, PathBuf::from(CONCEPT_STORE_FILE));
        assert_eq!(o.variant, Variant::Concept { club_store: PathBuf::from("allPlayers.csv") });
        assert!(o.page_pause.max.is_zero());
    }

    #[test]
    fn defaults_match_run_options() {
        let o = Args::try_parse_from(["fut_scrape", "--url", "http://x/{page}"]).unwrap().to_options();
        let d = RunOptions::default();
        assert_eq!(o, d);
    }
}
