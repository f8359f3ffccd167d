// src/specs/mod.rs
//! # Listing "specs" module
//!
//! Knows how to read what the remote listing hands us. Each spec is pure:
//! JSON in, canonical shapes out. No I/O, no store access, no logging spam.
//!
//! ## What lives here
//! - **`matches`**: picking the player item list out of the page's router
//!   state (`$_TSR.router.matches`), or out of simpler dumps of it.
//! - **`players`**: mapping one raw player item onto a [`Record`](crate::record::Record),
//!   including concept classification against [`ReferenceSets`](crate::refs::ReferenceSets).
//!
//! ## What does **not** live here
//! - Fetching pages (`scrape::fetch`), reconciling (`store`), or deciding when
//!   to stop (`scrape::paginate`).
//!
//! ## Conventions
//! - Absent data maps to `None` / `""`, never to `0`.
//! - Type gates are strict: a field documented as integer is taken only if the
//!   JSON value *is* an integer.
pub mod matches;
pub mod players;
