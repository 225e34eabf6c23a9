//! URL construction for race card and pedigree pages.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use ketto_core::RaceId;

static HORSE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/horse/(?:ped/)?([0-9A-Za-z]+)/?$").expect("valid horse id pattern"));

/// Error type for URL construction failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("no horse id in {0}")]
    MissingHorseId(String),
}

impl From<UrlError> for ketto_core::Error {
    fn from(err: UrlError) -> Self {
        ketto_core::Error::InvalidUrl(err.to_string())
    }
}

/// Race card URL: `{base}?race_id={race_id}`.
pub fn entrants_url(base: &str, race: &RaceId) -> Result<Url, UrlError> {
    let mut url = Url::parse(base.trim()).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    url.query_pairs_mut().clear().append_pair("race_id", &race.to_string());
    Ok(url)
}

/// Resolve a horse link found on a race card against `base`.
pub fn resolve_horse_url(base: &str, href: &str) -> Result<Url, UrlError> {
    let base = Url::parse(base.trim()).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    base.join(href.trim()).map_err(|e| UrlError::InvalidUrl(e.to_string()))
}

/// Horse id: the last path segment of a horse URL.
pub fn horse_id(reference: &str) -> Result<String, UrlError> {
    let path = match Url::parse(reference.trim()) {
        Ok(url) => url.path().to_string(),
        Err(_) => reference.trim().to_string(),
    };
    HORSE_ID
        .captures(&path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| UrlError::MissingHorseId(reference.to_string()))
}

/// Pedigree page URL: `{base}/{horse_id}/`.
pub fn pedigree_url(base: &str, horse_id: &str) -> Result<Url, UrlError> {
    let base = base.trim().trim_end_matches('/');
    Url::parse(&format!("{base}/{horse_id}/")).map_err(|e| UrlError::InvalidUrl(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ketto_core::Venue;

    #[test]
    fn test_entrants_url() {
        let race = RaceId::new(2025, Venue::Tokyo, 2, 3, 11).unwrap();
        let url = entrants_url("https://race.netkeiba.com/race/shutuba.html", &race).unwrap();
        assert_eq!(url.as_str(), "https://race.netkeiba.com/race/shutuba.html?race_id=202505020311");
    }

    #[test]
    fn test_entrants_url_invalid_base() {
        let race = RaceId::new(2025, Venue::Tokyo, 2, 3, 11).unwrap();
        assert!(entrants_url("not a url", &race).is_err());
    }

    #[test]
    fn test_resolve_horse_url() {
        let url = resolve_horse_url("https://db.netkeiba.com", "/horse/2021105678/").unwrap();
        assert_eq!(url.as_str(), "https://db.netkeiba.com/horse/2021105678/");

        let absolute = resolve_horse_url("https://db.netkeiba.com", "https://db.netkeiba.com/horse/2021105678").unwrap();
        assert_eq!(absolute.as_str(), "https://db.netkeiba.com/horse/2021105678");
    }

    #[test]
    fn test_horse_id() {
        assert_eq!(horse_id("https://db.netkeiba.com/horse/2021105678/").unwrap(), "2021105678");
        assert_eq!(horse_id("https://db.netkeiba.com/horse/000a0012bc").unwrap(), "000a0012bc");
        assert_eq!(horse_id("/horse/ped/2019104251/").unwrap(), "2019104251");
        assert!(horse_id("https://db.netkeiba.com/race/202505020311/").is_err());
    }

    #[test]
    fn test_pedigree_url() {
        let url = pedigree_url("https://db.netkeiba.com/horse/ped/", "2021105678").unwrap();
        assert_eq!(url.as_str(), "https://db.netkeiba.com/horse/ped/2021105678/");
    }
}
