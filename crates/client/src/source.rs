//! Pedigree source backed by the netkeiba race card and pedigree pages.

use async_trait::async_trait;
use ketto_core::pedigree::{PEDIGREE_DEPTH, label_count};
use ketto_core::{AppConfig, Entrant, Error, PedigreeEntry, PedigreeSource, RaceId};

use crate::extract::{extract_entrants, extract_pedigree};
use crate::fetch::{FetchClient, FetchConfig, entrants_url, horse_id, pedigree_url, resolve_horse_url};

/// Page locations used by [`NetkeibaSource`].
#[derive(Debug, Clone)]
pub struct SourceUrls {
    pub entrants_base_url: String,
    pub horse_base_url: String,
    pub pedigree_base_url: String,
}

impl From<&AppConfig> for SourceUrls {
    fn from(config: &AppConfig) -> Self {
        Self {
            entrants_base_url: config.entrants_base_url.clone(),
            horse_base_url: config.horse_base_url.clone(),
            pedigree_base_url: config.pedigree_base_url.clone(),
        }
    }
}

/// Scrapes entrants and pedigrees over HTTP.
pub struct NetkeibaSource {
    client: FetchClient,
    urls: SourceUrls,
    slots: usize,
}

impl NetkeibaSource {
    /// `slots` is the number of pedigree cells to read (see [`PositionIndex::len`]).
    pub fn new(client: FetchClient, urls: SourceUrls, slots: usize) -> Self {
        Self { client, urls, slots }
    }

    /// Build a source from application configuration.
    ///
    /// The pedigree page always lists five generations, so every cell is read
    /// regardless of `pedigree_depth`; the matcher applies the depth limit.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let client = FetchClient::new(FetchConfig::from(config))?;
        Ok(Self::new(client, SourceUrls::from(config), label_count(PEDIGREE_DEPTH)))
    }
}

#[async_trait]
impl PedigreeSource for NetkeibaSource {
    async fn fetch_entrants(&self, race: &RaceId) -> Result<Vec<Entrant>, Error> {
        let url = entrants_url(&self.urls.entrants_base_url, race)?;
        let page = self.client.fetch_html(&url).await?;

        let entrants: Vec<Entrant> = extract_entrants(&page.html)
            .into_iter()
            .filter_map(|link| match resolve_horse_url(&self.urls.horse_base_url, &link.href) {
                Ok(horse_url) => Some(Entrant::new(link.name, horse_url.to_string())),
                Err(e) => {
                    tracing::warn!(horse = %link.name, href = %link.href, error = %e, "skipping unresolvable horse link");
                    None
                }
            })
            .collect();

        tracing::debug!(race_id = %race, entrants = entrants.len(), "race card parsed");
        Ok(entrants)
    }

    async fn fetch_pedigree(&self, reference: &str) -> Result<PedigreeEntry, Error> {
        let id = match horse_id(reference) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(reference, error = %e, "no horse id, using empty pedigree");
                return Ok(PedigreeEntry::new());
            }
        };
        let url = pedigree_url(&self.urls.pedigree_base_url, &id)?;
        let page = self.client.fetch_html(&url).await?;

        let entry = extract_pedigree(&page.html, self.slots);
        if entry.is_empty() {
            tracing::warn!(horse_id = %id, "pedigree table missing or empty");
        }
        Ok(entry)
    }
}
