// src/changelog.rs
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::Result;
use crate::file::{append_line, write_text};
use crate::store::PriceChange;

/// Human-readable log of large price moves. Recreated at the start of every run.
#[derive(Debug)]
pub struct ChangeLog {
    path: PathBuf,
    threshold: f64,
    written: usize,
}

impl ChangeLog {
    /// Truncate/recreate the log with a timestamped header.
    pub fn start(path: &Path, threshold: f64) -> Result<Self> {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let header = format!("Momentum Changed Players - {stamp}\n{}\n", "=".repeat(50));
        write_text(path, &header)?;
        Ok(Self { path: path.to_path_buf(), threshold, written: 0 })
    }

    /// Append a line if `change` moved strictly more than the threshold.
    /// Returns whether a line was written.
    pub fn record(&mut self, name: &str, id: &str, change: &PriceChange) -> Result<bool> {
        if !change.exceeds(self.threshold) {
            return Ok(false);
        }
        append_line(&self.path, &format_line(name, id, change))?;
        self.written += 1;
        Ok(true)
    }

    pub fn written(&self) -> usize {
        self.written
    }
}

pub fn format_line(name: &str, id: &str, change: &PriceChange) -> String {
    let direction = if change.is_increase() { "increased" } else { "dropped" };
    format!(
        "{name} (ID: {id}) - Price {direction} {:.1}% from {} to {}",
        change.percent, change.old, change.new
    )
}
