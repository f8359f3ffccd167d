// src/store.rs
//
// Reconciliation store: the persisted CSV table held in memory as ordered
// records plus an id → position index.
//
// - `load` keeps rows without an id (row-count fidelity) but never indexes them.
//   Loaded rows keep their original cell text next to the typed record.
// - `upsert` inserts new ids, updates price cells of known ids, and ignores an
//   id seen earlier in the same pass.
// - `save` rewrites the whole table, header first. Loaded rows go back out as
//   they came in, apart from price cells an update touched.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::config::consts::STORE_SEP;
use crate::csv::{parse_rows, split_header};
use crate::error::{Result, ScrapeError};
use crate::file::{read_optional, write_table};
use crate::record::{ColumnMap, HEADERS, ID_COLUMN, PRICE_CELL, Record, SOURCE_PRICE_CELL};

/// Price movement of an existing record.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceChange {
    pub old: String,
    pub new: String,
    /// Signed percent change; see [`percent_change`].
    pub percent: f64,
}

impl PriceChange {
    pub fn is_increase(&self) -> bool {
        self.percent > 0.0
    }

    /// Strictly greater than `threshold` in absolute terms.
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.percent.abs() > threshold
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum UpsertResult {
    Inserted { row: u64 },
    Updated(PriceChange),
    Unchanged,
    SkippedDuplicateInPass,
}

/// Ids already handled in the current pass. One per run, dropped with it.
#[derive(Debug, Default)]
pub struct ReconciliationState {
    seen: HashSet<String>,
}

impl ReconciliationState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Store {
    records: Vec<Record>,
    /// Original cells (in `HEADERS` order) of loaded rows, parallel to `records`.
    /// `None` for records inserted in this run.
    cells: Vec<Option<Vec<String>>>,
    index: HashMap<String, usize>,
    next_row: u64,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the persisted table. A missing or empty file is an empty store.
    pub fn load(path: &Path) -> Result<Store> {
        let Some(text) = read_optional(path)? else {
            logf!("No store at {}, starting empty", path.display());
            return Ok(Store::new());
        };
        let rows = parse_rows(&text, STORE_SEP);
        if rows.is_empty() {
            return Ok(Store::new());
        }
        let (header, rows) = split_header(rows, ID_COLUMN).ok_or_else(|| ScrapeError::StoreFormat {
            path: path.to_path_buf(),
            msg: format!("header has no '{ID_COLUMN}' column"),
        })?;

        let columns = ColumnMap::from_header(&header);
        let mut store = Store::new();
        for row in &rows {
            let cells = columns.project(row);
            store.push_loaded(Record::from_cells(&cells), Some(cells));
        }

        logf!(
            "Loaded {} existing records with {} valid ids from {}",
            store.len(), store.indexed(), path.display()
        );
        Ok(store)
    }

    fn push_loaded(&mut self, record: Record, cells: Option<Vec<String>>) {
        let pos = self.records.len();
        if record.is_mappable() {
            // First occurrence wins, like a fresh pass would.
            self.index.entry(record.id.clone()).or_insert(pos);
        }
        let taken = record.row.map_or(0, |r| r + 1);
        self.next_row = self.next_row.max(taken).max(pos as u64 + 1);
        self.records.push(record);
        self.cells.push(cells);
    }

    /// Full rewrite of the table at `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let rows = self
            .records
            .iter()
            .zip(&self.cells)
            .map(|(record, cells)| cells.clone().unwrap_or_else(|| record.to_row()));
        write_table(path, &HEADERS[..], rows, STORE_SEP)?;
        logd!("Saved {} records to {}", self.len(), path.display());
        Ok(())
    }

    /// Reconcile one mapped record. Callers drop records without an id first.
    pub fn upsert(&mut self, mut record: Record, pass: &mut ReconciliationState) -> UpsertResult {
        debug_assert!(record.is_mappable(), "upsert of a record without id");

        if !pass.seen.insert(record.id.clone()) {
            return UpsertResult::SkippedDuplicateInPass;
        }

        if let Some(&pos) = self.index.get(&record.id) {
            let stored = &mut self.records[pos];
            let (old, new) = (stored.price_value(), record.price_value());
            if old == new {
                return UpsertResult::Unchanged;
            }
            let change = PriceChange {
                old: stored.price.clone().unwrap_or_default(),
                new: record.price.clone().unwrap_or_default(),
                percent: percent_change(old, new),
            };
            if let Some(cells) = &mut self.cells[pos] {
                cells[PRICE_CELL] = change.new.clone();
                cells[SOURCE_PRICE_CELL] = record.source_price.clone().unwrap_or_default();
            }
            stored.price = record.price;
            stored.source_price = record.source_price;
            return UpsertResult::Updated(change);
        }

        let row = self.next_row;
        self.next_row += 1;
        record.row = Some(row);
        self.index.insert(record.id.clone(), self.records.len());
        self.records.push(record);
        self.cells.push(None);
        UpsertResult::Inserted { row }
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.index.get(id).map(|&pos| &self.records[pos])
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of rows that can be matched by id.
    pub fn indexed(&self) -> usize {
        self.index.len()
    }
}

/// `(new-old)/old*100` when old > 0; 100 when old is 0 and new is positive; else 0.
pub fn percent_change(old: f64, new: f64) -> f64 {
    if old > 0.0 {
        (new - old) / old * 100.0
    } else if new > 0.0 {
        100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, price: Option<&str>) -> Record {
        let mut r = Record { id: s!(id), name: format!("Player {id}"), ..Default::default() };
        r.set_price(price.map(String::from));
        r
    }

    #[test]
    fn percent_change_edges() {
        assert_eq!(percent_change(0.0, 50.0), 100.0);
        assert_eq!(percent_change(0.0, 0.0), 0.0);
        assert_eq!(percent_change(100.0, 25.0), -75.0);
        assert_eq!(percent_change(100.0, 150.0), 50.0);
    }

    #[test]
    fn insert_into_empty_store_without_price() {
        let mut store = Store::new();
        let mut pass = ReconciliationState::new();
        assert_eq!(store.upsert(rec("X", None), &mut pass), UpsertResult::Inserted { row: 0 });

        let row = store.get("X").unwrap().to_row();
        assert_eq!(row[0], "0");
        assert_eq!(row[19], ""); // price
        assert_eq!(row[20], ""); // futggPrice
    }

    #[test]
    fn price_update_is_reported_and_applied() {
        let mut store = Store::new();
        store.upsert(rec("118364", Some("100")), &mut ReconciliationState::new());

        let mut pass = ReconciliationState::new();
        let res = store.upsert(rec("118364", Some("150")), &mut pass);
        let UpsertResult::Updated(change) = res else { panic!("expected update, got {res:?}") };
        assert_eq!(change.percent, 50.0);
        assert!(change.is_increase());
        assert!(!change.exceeds(50.0));

        let stored = store.get("118364").unwrap();
        assert_eq!(stored.price.as_deref(), Some("150"));
        assert_eq!(stored.source_price.as_deref(), Some("150"));
        assert_eq!(stored.row, Some(0));
    }

    #[test]
    fn update_touches_only_price_cells() {
        let mut store = Store::new();
        store.upsert(rec("1", Some("10")), &mut ReconciliationState::new());

        let mut incoming = rec("1", Some("20"));
        incoming.name = s!("Renamed");
        incoming.concept = Some(true);
        store.upsert(incoming, &mut ReconciliationState::new());

        let stored = store.get("1").unwrap();
        assert_eq!(stored.name, "Player 1");
        assert_eq!(stored.concept, None);
    }

    #[test]
    fn numeric_equal_prices_are_unchanged() {
        let mut store = Store::new();
        store.upsert(rec("1", Some("1500")), &mut ReconciliationState::new());
        let res = store.upsert(rec("1", Some("1500.0")), &mut ReconciliationState::new());
        assert_eq!(res, UpsertResult::Unchanged);

        // Empty and junk both read as 0.
        store.upsert(rec("2", None), &mut ReconciliationState::new());
        let res = store.upsert(rec("2", Some("n/a")), &mut ReconciliationState::new());
        assert_eq!(res, UpsertResult::Unchanged);
    }

    #[test]
    fn first_write_wins_within_a_pass() {
        let mut store = Store::new();
        let mut pass = ReconciliationState::new();
        store.upsert(rec("1", Some("10")), &mut pass);
        let res = store.upsert(rec("1", Some("99")), &mut pass);
        assert_eq!(res, UpsertResult::SkippedDuplicateInPass);
        assert_eq!(store.get("1").unwrap().price.as_deref(), Some("10"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn untouched_loaded_cells_are_written_back_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.csv");
        let mut cells = vec![s!(); HEADERS.len()];
        cells[0] = s!("0");
        cells[1] = s!("118364");
        cells[6] = s!("98.0");
        cells[18] = s!("1");
        cells[PRICE_CELL] = s!("100");
        cells[SOURCE_PRICE_CELL] = s!("100");
        cells[21] = s!("3.0");
        let text = format!("{}\n{}\n", HEADERS.join(","), cells.join(","));
        std::fs::write(&path, &text).unwrap();

        Store::load(&path).unwrap().save(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), text);

        let mut store = Store::load(&path).unwrap();
        store.upsert(rec("118364", Some("150")), &mut ReconciliationState::new());
        store.save(&path).unwrap();
        cells[PRICE_CELL] = s!("150");
        cells[SOURCE_PRICE_CELL] = s!("150");
        let expected = format!("{}\n{}\n", HEADERS.join(","), cells.join(","));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), expected);
    }

    #[test]
    fn next_row_never_reuses_loaded_indices() {
        let mut store = Store::new();
        store.push_loaded(Record { row: Some(41), id: s!("a"), ..Default::default() }, None);
        store.push_loaded(Record { row: None, ..Default::default() }, None);
        let res = store.upsert(rec("b", None), &mut ReconciliationState::new());
        assert_eq!(res, UpsertResult::Inserted { row: 42 });
        assert_eq!(store.len(), 3);
        assert_eq!(store.indexed(), 2);
    }
}
