//! Ancestor name matching.
//!
//! Scraped names vary in width (full-width vs half-width latin, half-width
//! katakana), carry stray whitespace and differ in case. Names are compared on
//! their normalized form: NFKC, whitespace removed, lowercased.

use std::sync::Arc;

use unicode_normalization::UnicodeNormalization;

use super::{PedigreeEntry, PositionIndex, PositionLabel};

/// Normalize an ancestor name for comparison.
pub fn normalize_name(name: &str) -> String {
    name.nfkc().filter(|c| !c.is_whitespace()).collect::<String>().to_lowercase()
}

/// Finds the positions at which a target ancestor appears in a pedigree.
#[derive(Debug, Clone)]
pub struct PedigreeMatcher {
    index: Arc<PositionIndex>,
    max_depth: usize,
}

impl PedigreeMatcher {
    pub fn new(index: Arc<PositionIndex>) -> Self {
        Self { index, max_depth: usize::MAX }
    }

    /// Report only ancestors up to `max_depth` generations back.
    ///
    /// Slot numbering still follows the full index, so entries read from a
    /// complete pedigree table keep their positions.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn index(&self) -> &PositionIndex {
        &self.index
    }

    /// Every label whose ancestor name matches `target`, in canonical order.
    ///
    /// Slots outside the index are ignored. A blank target never matches.
    pub fn find_matches(&self, entry: &PedigreeEntry, target: &str) -> Vec<PositionLabel> {
        let target = normalize_name(target);
        if target.is_empty() {
            return Vec::new();
        }

        entry
            .iter()
            .filter(|(_, name)| normalize_name(name) == target)
            .filter_map(|(slot, _)| self.index.get(slot))
            .filter(|label| label.depth() <= self.max_depth)
            .cloned()
            .collect()
    }
}

impl Default for PedigreeMatcher {
    fn default() -> Self {
        Self::new(Arc::new(PositionIndex::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pedigree::Step;

    fn label(steps: &[Step]) -> PositionLabel {
        PositionLabel::new(steps.to_vec())
    }

    #[test]
    fn test_normalize_width_and_case() {
        assert_eq!(normalize_name("ＴｏｋｉＳｏｒａ"), "tokisora");
        assert_eq!(normalize_name(" toki sora\t"), "tokisora");
        assert_eq!(normalize_name("ﾄｳｼｮｳ"), normalize_name("トウショウ"));
        assert_eq!(normalize_name("トウショウ\u{3000}"), "トウショウ");
    }

    #[test]
    fn test_match_is_normalization_insensitive() {
        let matcher = PedigreeMatcher::default();
        let entry = PedigreeEntry::from_cells(vec![Some("ＴｏｋｉＳｏｒａ")]);
        let found = matcher.find_matches(&entry, "toki sora");
        assert_eq!(found, vec![label(&[Step::Father])]);
    }

    #[test]
    fn test_matches_follow_generator_order() {
        let matcher = PedigreeMatcher::default();
        let index = PositionIndex::default();
        let deep = label(&[Step::Mother, Step::Father, Step::Father]);
        let shallow = label(&[Step::Father]);

        let mut entry = PedigreeEntry::new();
        entry.insert_label(&index, &deep, "Northern Dancer");
        entry.insert_label(&index, &shallow, "NORTHERN DANCER");

        let found = matcher.find_matches(&entry, "Northern Dancer");
        assert_eq!(found, vec![shallow, deep]);
    }

    #[test]
    fn test_no_match() {
        let matcher = PedigreeMatcher::default();
        let entry = PedigreeEntry::from_cells(vec![Some("キングカメハメハ"), Some("キングマンボ")]);
        assert!(matcher.find_matches(&entry, "サンデーサイレンス").is_empty());
    }

    #[test]
    fn test_empty_entry_and_blank_target() {
        let matcher = PedigreeMatcher::default();
        assert!(matcher.find_matches(&PedigreeEntry::new(), "トウショウ").is_empty());
        let entry = PedigreeEntry::from_cells(vec![Some("トウショウ")]);
        assert!(matcher.find_matches(&entry, "   ").is_empty());
    }

    #[test]
    fn test_slots_beyond_index_are_ignored() {
        let matcher = PedigreeMatcher::new(Arc::new(PositionIndex::generate(1)));
        let mut entry = PedigreeEntry::new();
        entry.insert(1, "x");
        entry.insert(5, "x");
        assert_eq!(matcher.find_matches(&entry, "x"), vec![label(&[Step::Mother])]);
    }

    #[test]
    fn test_depth_limit_keeps_full_table_slots() {
        let matcher = PedigreeMatcher::default().with_max_depth(3);
        let mut entry = PedigreeEntry::new();
        // slot 3 is the sire line four generations back
        entry.insert(3, "x");
        entry.insert(2, "x");
        assert_eq!(matcher.find_matches(&entry, "x"), vec![label(&[Step::Father, Step::Father, Step::Father])]);

        let matcher = PedigreeMatcher::default().with_max_depth(4);
        assert_eq!(
            matcher.find_matches(&entry, "x"),
            vec![
                label(&[Step::Father, Step::Father, Step::Father]),
                label(&[Step::Father, Step::Father, Step::Father, Step::Father]),
            ]
        );
    }
}
