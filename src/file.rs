// src/file.rs

use std::{
    fs::{self, File, OpenOptions},
    io::{BufWriter, Write},
    path::Path,
};

use crate::csv::write_row;
use crate::error::{Result, ScrapeError};

/// Create/truncate `path` and write header + rows in one go.
/// Full rewrite, not atomic: a concurrent reader may see a partial file.
pub fn write_table<S: AsRef<str>>(
    path: &Path,
    headers: &[S],
    rows: impl IntoIterator<Item = Vec<String>>,
    sep: char,
) -> Result<()> {
    let io = |e| ScrapeError::store_io(path, e);

    ensure_parent(path)?;
    let file = File::create(path).map_err(io)?; // truncate/overwrite
    let mut out = BufWriter::new(file);
    write_row(&mut out, headers, sep).map_err(io)?;
    for row in rows {
        write_row(&mut out, &row[..], sep).map_err(io)?;
    }
    out.flush().map_err(io)?;
    Ok(())
}

/// Create/truncate a text file with the given contents.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, text).map_err(|e| ScrapeError::store_io(path, e))
}

/// Append one line to an existing (or new) text file.
pub fn append_line(path: &Path, line: &str) -> Result<()> {
    let io = |e| ScrapeError::store_io(path, e);
    let mut file = OpenOptions::new().create(true).append(true).open(path).map_err(io)?;
    writeln!(file, "{line}").map_err(io)
}

/// Read a whole file, `None` if it does not exist.
pub fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ScrapeError::store_io(path, e)),
    }
}

pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    Ok(())
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        let e = std::io::Error::new(std::io::ErrorKind::AlreadyExists, "path exists but is not a directory");
        return Err(ScrapeError::store_io(dir, e));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| ScrapeError::store_io(dir, e))?;
    }
    Ok(())
}
