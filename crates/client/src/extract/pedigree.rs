//! Ancestor names from pedigree pages.
//!
//! The five-generation table lists ancestors one per cell, in the same
//! depth-first order as [`ketto_core::PositionIndex`].

use ketto_core::PedigreeEntry;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static BLOOD_TABLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table.blood_table").expect("invalid selector"));
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("invalid selector"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").expect("invalid selector"));

/// Map the first `slots` cells of the pedigree table onto label slots.
///
/// A cell contributes the text of its first link. A page without the table
/// yields an empty entry.
pub fn extract_pedigree(html: &str, slots: usize) -> PedigreeEntry {
    let document = Html::parse_document(html);

    let Some(table) = document.select(&BLOOD_TABLE).next() else {
        tracing::debug!("no pedigree table found");
        return PedigreeEntry::new();
    };

    let cells = table.select(&CELL).take(slots).map(|cell| {
        cell.select(&ANCHOR)
            .next()
            .map(|a| a.text().collect::<String>())
    });

    PedigreeEntry::from_cells(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ketto_core::{PedigreeMatcher, PositionIndex};
    use std::sync::Arc;

    fn table(cells: &[&str]) -> String {
        let body: String = cells
            .iter()
            .map(|name| {
                if name.is_empty() {
                    "<td class=\"b_ml\"></td>".to_string()
                } else {
                    format!("<td><a href=\"/horse/x/\">{name}</a><br>1990 鹿毛</td>")
                }
            })
            .collect();
        format!("<html><body><table class=\"blood_table\"><tr>{body}</tr></table></body></html>")
    }

    #[test]
    fn test_cells_map_positionally() {
        let html = table(&["トウショウボーイ", "テスコボーイ", "", "ソシアルバターフライ"]);
        let entry = extract_pedigree(&html, 62);
        assert_eq!(entry.len(), 3);
        assert_eq!(entry.get(0), Some("トウショウボーイ"));
        assert_eq!(entry.get(2), None);
        assert_eq!(entry.get(3), Some("ソシアルバターフライ"));
    }

    #[test]
    fn test_cells_beyond_slots_are_ignored() {
        let html = table(&["a1", "b2", "c3"]);
        let entry = extract_pedigree(&html, 2);
        assert_eq!(entry.len(), 2);
        assert_eq!(entry.get(2), None);
    }

    #[test]
    fn test_missing_table_is_empty() {
        assert!(extract_pedigree("<html><body>404</body></html>", 62).is_empty());
    }

    #[test]
    fn test_extracted_entry_feeds_matcher() {
        let index = PositionIndex::default();
        let mut names = vec![""; 62];
        names[31] = "トウショウボーイ";
        let entry = extract_pedigree(&table(&names), index.len());

        let found = PedigreeMatcher::default().find_matches(&entry, "ﾄｳｼｮｳﾎﾞｰｲ");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].to_string(), "母");
    }

    #[test]
    fn test_depth_limited_match_on_full_table() {
        let index = Arc::new(PositionIndex::default());
        let mut names = vec![""; 62];
        names[3] = "トウショウボーイ";
        names[33] = "トウショウボーイ";
        let entry = extract_pedigree(&table(&names), index.len());

        let shallow = PedigreeMatcher::new(index.clone()).with_max_depth(3);
        let found: Vec<String> = shallow
            .find_matches(&entry, "トウショウボーイ")
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(found, vec!["母父父"]);

        let full = PedigreeMatcher::new(index);
        let found: Vec<String> = full
            .find_matches(&entry, "トウショウボーイ")
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(found, vec!["父父父父", "母父父"]);
    }
}
