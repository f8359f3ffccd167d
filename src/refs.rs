// src/refs.rs
use std::collections::HashSet;
use std::path::Path;

use crate::error::Result;
use crate::store::Store;

/// Club-roster membership used for concept classification.
/// Loaded once per run and only read afterwards.
#[derive(Clone, Debug, Default)]
pub struct ReferenceSets {
    ids: HashSet<String>,
    definition_ids: HashSet<String>,
}

impl ReferenceSets {
    pub fn new<I, D>(ids: I, definition_ids: D) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Self {
            ids: non_empty(ids),
            definition_ids: non_empty(definition_ids),
        }
    }

    /// Membership from an already loaded club store.
    pub fn from_store(store: &Store) -> Self {
        let records = store.records();
        Self::new(
            records.iter().map(|r| r.id.clone()),
            records.iter().map(|r| r.definition_id.clone()),
        )
    }

    /// Read the club store at `path`. A missing file yields empty sets.
    pub fn load(path: &Path) -> Result<Self> {
        let refs = Self::from_store(&Store::load(path)?);
        logf!(
            "Reference sets: {} ids, {} definition ids from {}",
            refs.ids.len(), refs.definition_ids.len(), path.display()
        );
        Ok(refs)
    }

    /// Club-roster means: id is a known club id, or definition id is a known club definition.
    pub fn is_club(&self, id: &str, definition_id: &str) -> bool {
        (!id.is_empty() && self.ids.contains(id))
            || (!definition_id.is_empty() && self.definition_ids.contains(definition_id))
    }
}

fn non_empty<I>(items: I) -> HashSet<String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    items
        .into_iter()
        .map(Into::into)
        .map(|s: String| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
