// tests/common/mod.rs
#![allow(dead_code)]

use std::path::Path;

use fut_scrape::config::{DelayRange, RunOptions};
use fut_scrape::scrape::Pause;
use serde_json::{Value, json};

/// Raw listing item with an optional price.
pub fn item(id: &str, price: Option<u64>) -> Value {
    match price {
        Some(p) => json!({ "id": id, "commonName": format!("Player {id}"), "hasPrice": true, "price": p }),
        None => json!({ "id": id, "commonName": format!("Player {id}") }),
    }
}

/// Options pointing every file into `dir`, with small limits.
pub fn opts(dir: &Path) -> RunOptions {
    RunOptions {
        store_path: dir.join("allPlayers.csv"),
        change_log_path: dir.join("momentum.txt"),
        failure_limit: 2,
        empty_limit: 3,
        no_change_limit_quick: 2,
        no_change_limit_full: 3,
        ..Default::default()
    }
}

/// Pause that only remembers what it was asked for.
#[derive(Default)]
pub struct Recorded(pub Vec<DelayRange>);

impl Pause for Recorded {
    fn pause(&mut self, range: &DelayRange) {
        self.0.push(*range);
    }
}
