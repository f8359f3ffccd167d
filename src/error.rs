// src/error.rs
use std::{io, path::{Path, PathBuf}};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Page did not answer within the fetch timeout. Retried once, then skipped.
    #[error("page {page}: timed out after {secs}s")]
    FetchTimeout { page: u32, secs: u64 },

    /// Any other page-level failure (transport, status, payload). Retried once, then skipped.
    #[error("page {page}: {msg}")]
    Fetch { page: u32, msg: String },

    /// Reading or writing the store (or change log) failed. Always fatal.
    #[error("{}: {source}", path.display())]
    StoreIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The persisted table exists but is not one of ours.
    #[error("{}: {msg}", path.display())]
    StoreFormat { path: PathBuf, msg: String },

    /// The page source could not be set up at all.
    #[error("fetcher init failed: {0}")]
    DriverInit(String),
}

impl ScrapeError {
    pub fn store_io(path: &Path, source: io::Error) -> Self {
        ScrapeError::StoreIo { path: path.to_path_buf(), source }
    }

    pub fn fetch(page: u32, msg: impl Into<String>) -> Self {
        ScrapeError::Fetch { page, msg: msg.into() }
    }

    /// Page-level errors are absorbed by the pagination loop; everything else halts the run.
    pub fn is_page_level(&self) -> bool {
        matches!(self, ScrapeError::FetchTimeout { .. } | ScrapeError::Fetch { .. })
    }
}
