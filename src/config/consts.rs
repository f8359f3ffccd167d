// src/config/consts.rs

// Remote listing
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const FETCH_TIMEOUT_SECS: u64 = 60;

// Local store
pub const STORE_FILE: &str = "allPlayers.csv";
pub const CONCEPT_STORE_FILE: &str = "conceptPlayers.csv";
pub const CHANGE_LOG_FILE: &str = "momentum_changed_players.txt";
pub const STORE_SEP: char = ',';

// Pagination
pub const START_PAGE: u32 = 1;
pub const FAILURE_LIMIT: u32 = 3;
pub const EMPTY_LIMIT: u32 = 3;
pub const NO_CHANGE_LIMIT_QUICK: u32 = 5;
pub const NO_CHANGE_LIMIT_FULL: u32 = 25;

// Politeness, in milliseconds
pub const RETRY_PAUSE_MS: (u64, u64) = (1_000, 2_000);
pub const SKIP_PAUSE_MS: (u64, u64) = (1_500, 3_000);
pub const PAGE_PAUSE_MS: (u64, u64) = (2_000, 4_000);

// Change log
pub const SIGNIFICANT_CHANGE_PCT: f64 = 50.0;
