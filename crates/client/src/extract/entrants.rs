//! Entrant harvesting from race card pages.

use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

static HORSE_LINKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.RaceTable01 a[href]").expect("invalid selector"));

/// A horse link found on a race card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrantLink {
    /// Horse name as shown on the card
    pub name: String,
    /// Link href, as found (usually site-relative)
    pub href: String,
}

/// Extract horse links from the race card tables.
///
/// Only anchors whose href contains `/horse/` count. Names shorter than two
/// characters are skipped (jockey marks, icons) and the first link per name wins.
pub fn extract_entrants(html: &str) -> Vec<EntrantLink> {
    let document = Html::parse_document(html);

    let mut seen = HashSet::new();
    let mut entrants = Vec::new();

    for element in document.select(&HORSE_LINKS) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if !href.contains("/horse/") {
            continue;
        }

        let name = element.text().collect::<String>().trim().to_string();
        if name.chars().count() < 2 || !seen.insert(name.clone()) {
            continue;
        }

        entrants.push(EntrantLink { name, href: href.to_string() });
    }

    entrants
}

#[cfg(test)]
mod tests {
    use super::*;

    const RACE_CARD: &str = r#"
        <html><body>
            <table class="RaceTable01 ShutubaTable">
                <tr class="HorseList">
                    <td class="HorseInfo"><a href="https://db.netkeiba.com/horse/2021105678">サンライズ</a></td>
                    <td class="Jockey"><a href="https://db.netkeiba.com/jockey/result/recent/01170/">武豊</a></td>
                </tr>
                <tr class="HorseList">
                    <td class="HorseInfo"><a href="https://db.netkeiba.com/horse/2021100001"> ミッドナイト </a></td>
                </tr>
                <tr class="HorseList">
                    <td class="HorseInfo"><a href="https://db.netkeiba.com/horse/2021105678">サンライズ</a></td>
                    <td><a href="/horse/2021109999">牝</a></td>
                </tr>
            </table>
            <table class="Other"><tr><td><a href="/horse/2020000000">ソト</a></td></tr></table>
        </body></html>
    "#;

    #[test]
    fn test_extract_entrants() {
        let entrants = extract_entrants(RACE_CARD);
        assert_eq!(
            entrants,
            vec![
                EntrantLink { name: "サンライズ".into(), href: "https://db.netkeiba.com/horse/2021105678".into() },
                EntrantLink { name: "ミッドナイト".into(), href: "https://db.netkeiba.com/horse/2021100001".into() },
            ]
        );
    }

    #[test]
    fn test_extract_entrants_without_table() {
        assert!(extract_entrants("<html><body><p>開催なし</p></body></html>").is_empty());
        assert!(extract_entrants("").is_empty());
    }
}
