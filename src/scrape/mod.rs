// src/scrape/mod.rs
mod fetch;
mod paginate;
mod pause;

pub use fetch::{DumpFetcher, HttpFetcher, PageFetcher, parse_payload};
pub use paginate::{
    PageOutcome, PaginationState, PriceUpdate, RunSummary, Termination, harvest, process_page,
};
pub use pause::{NoPause, Pause, ThreadSleep};
