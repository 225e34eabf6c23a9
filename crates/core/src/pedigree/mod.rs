//! Pedigree position labels, per-horse pedigree entries and name matching.

pub mod labels;
pub mod matcher;

use std::collections::BTreeMap;

pub use labels::{PEDIGREE_DEPTH, PositionIndex, PositionLabel, Step, generate_labels, label_count};
pub use matcher::{PedigreeMatcher, normalize_name};

/// Ancestor names of one horse, keyed by slot in canonical label order.
///
/// Only slots with a non-blank name are stored. Iteration always follows the
/// slot order of [`PositionIndex`], never insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PedigreeEntry {
    names: BTreeMap<usize, String>,
}

impl PedigreeEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an entry from table cells in table order; cell `i` fills slot `i`.
    pub fn from_cells<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let mut entry = Self::new();
        for (slot, cell) in cells.into_iter().enumerate() {
            if let Some(name) = cell {
                entry.insert(slot, name);
            }
        }
        entry
    }

    /// Record the ancestor at `slot`. Blank names are ignored.
    pub fn insert(&mut self, slot: usize, name: impl Into<String>) {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return;
        }
        self.names.insert(slot, trimmed.to_string());
    }

    /// Record the ancestor at `label`. Returns false if the label is not in `index`.
    pub fn insert_label(&mut self, index: &PositionIndex, label: &PositionLabel, name: impl Into<String>) -> bool {
        match index.slot_of(label) {
            Some(slot) => {
                self.insert(slot, name);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, slot: usize) -> Option<&str> {
        self.names.get(&slot).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Slots and names in ascending slot order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names.iter().map(|(slot, name)| (*slot, name.as_str()))
    }
}
