//! Race-by-race pedigree search.
//!
//! For each race the cache is consulted first. On a miss (or when the cache is
//! bypassed) every entrant's pedigree is fetched and matched, and the outcome
//! is written back. Progress is reported through a caller-supplied callback.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::Error;
use crate::cache::{CacheKey, CacheLookup, MatchRow, ResultCache, Snapshot, TableStore};
use crate::pedigree::{PedigreeEntry, PedigreeMatcher, PositionLabel};
use crate::race::{RaceDay, RaceId};

/// A horse entered in a race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entrant {
    pub name: String,
    /// Opaque handle the source uses to find the horse's pedigree.
    pub reference: String,
}

impl Entrant {
    pub fn new(name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self { name: name.into(), reference: reference.into() }
    }
}

/// Where entrants and pedigrees come from.
///
/// Implementations return errors only for transport failures. A page that
/// cannot be parsed yields an empty list or an empty entry.
#[async_trait]
pub trait PedigreeSource: Send + Sync {
    /// Entrants of `race`, in race-card order, unique by name.
    async fn fetch_entrants(&self, race: &RaceId) -> Result<Vec<Entrant>, Error>;

    /// Pedigree of the horse behind `reference`.
    async fn fetch_pedigree(&self, reference: &str) -> Result<PedigreeEntry, Error>;
}

/// Progress notifications emitted during a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    RaceStarted { race: RaceId },
    CacheHit { race: RaceId, matches: usize },
    HorseChecked { race: RaceId, horse: String, index: usize, total: usize, positions: Vec<PositionLabel> },
    HorseFailed { race: RaceId, horse: String, error: String },
    RaceFinished { race: RaceId, matches: usize },
}

/// Where a race's result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeSource {
    Cache,
    Fresh,
}

/// Result of searching one race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceOutcome {
    pub race: RaceId,
    pub source: OutcomeSource,
    pub rows: Vec<MatchRow>,
    /// Horses whose pedigree could not be fetched.
    pub failed_horses: Vec<String>,
    /// Whether this outcome was written to the cache.
    pub cached: bool,
}

/// Per-call search options.
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions<'a> {
    /// Consult the cache before scraping.
    pub use_cache: bool,
    /// Answer cache lookups from this snapshot instead of re-reading the store.
    pub snapshot: Option<&'a Snapshot>,
}

impl Default for SearchOptions<'_> {
    fn default() -> Self {
        Self { use_cache: true, snapshot: None }
    }
}

/// Matcher, cache and pedigree source wired together.
pub struct PedigreeSearch<S, P> {
    cache: Arc<ResultCache<S>>,
    source: P,
    matcher: PedigreeMatcher,
    request_delay: Duration,
}

impl<S: TableStore, P: PedigreeSource> PedigreeSearch<S, P> {
    pub fn new(cache: Arc<ResultCache<S>>, source: P, matcher: PedigreeMatcher) -> Self {
        Self { cache, source, matcher, request_delay: Duration::ZERO }
    }

    /// Pause between consecutive pedigree fetches.
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn cache(&self) -> &ResultCache<S> {
        &self.cache
    }

    pub fn matcher(&self) -> &PedigreeMatcher {
        &self.matcher
    }

    /// Search one race for `target`.
    ///
    /// # Errors
    ///
    /// Entrant-list transport failures and store failures abort the race.
    /// Failures fetching a single horse's pedigree are reported through
    /// `on_event` and the scan continues; such an incomplete outcome is not
    /// written to the cache. Neither is a race whose card lists no entrants.
    pub async fn search_race(
        &self, race: &RaceId, target: &str, options: SearchOptions<'_>, on_event: &mut (dyn FnMut(SearchEvent) + Send),
    ) -> Result<RaceOutcome, Error> {
        if target.trim().is_empty() {
            return Err(Error::InvalidInput("target ancestor cannot be empty".into()));
        }
        let key = CacheKey::for_race(race, target);
        on_event(SearchEvent::RaceStarted { race: *race });

        if options.use_cache {
            let lookup = self.cache.query(&key, options.snapshot).await?;
            if lookup.is_hit() {
                let rows = lookup.into_rows();
                on_event(SearchEvent::CacheHit { race: *race, matches: rows.len() });
                on_event(SearchEvent::RaceFinished { race: *race, matches: rows.len() });
                return Ok(RaceOutcome {
                    race: *race,
                    source: OutcomeSource::Cache,
                    rows,
                    failed_horses: Vec::new(),
                    cached: true,
                });
            }
        }

        let entrants = self.source.fetch_entrants(race).await?;
        if entrants.is_empty() {
            tracing::warn!(race_id = %race, "no entrants found, cache not updated");
            on_event(SearchEvent::RaceFinished { race: *race, matches: 0 });
            return Ok(RaceOutcome {
                race: *race,
                source: OutcomeSource::Fresh,
                rows: Vec::new(),
                failed_horses: Vec::new(),
                cached: false,
            });
        }
        let total = entrants.len();
        tracing::debug!(race_id = %race, entrants = total, "scanning entrants");

        let mut rows = Vec::new();
        let mut failed_horses = Vec::new();
        for (i, entrant) in entrants.iter().enumerate() {
            if i > 0 && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }

            match self.source.fetch_pedigree(&entrant.reference).await {
                Ok(pedigree) => {
                    let positions = self.matcher.find_matches(&pedigree, target);
                    if !positions.is_empty() {
                        rows.push(MatchRow::new(&entrant.name, &positions, race));
                    }
                    on_event(SearchEvent::HorseChecked {
                        race: *race,
                        horse: entrant.name.clone(),
                        index: i + 1,
                        total,
                        positions,
                    });
                }
                Err(e) => {
                    tracing::warn!(race_id = %race, horse = %entrant.name, error = %e, "pedigree fetch failed");
                    on_event(SearchEvent::HorseFailed { race: *race, horse: entrant.name.clone(), error: e.to_string() });
                    failed_horses.push(entrant.name.clone());
                }
            }
        }

        let cached = failed_horses.is_empty();
        if cached {
            self.cache.upsert(&key, &rows).await?;
        } else {
            tracing::warn!(race_id = %race, failed = failed_horses.len(), "incomplete scan, cache not updated");
        }

        on_event(SearchEvent::RaceFinished { race: *race, matches: rows.len() });
        Ok(RaceOutcome { race: *race, source: OutcomeSource::Fresh, rows, failed_horses, cached })
    }

    /// Search every race of `day` in order, answering cache lookups from one snapshot.
    pub async fn search_day(
        &self, day: &RaceDay, target: &str, use_cache: bool, on_event: &mut (dyn FnMut(SearchEvent) + Send),
    ) -> Result<Vec<RaceOutcome>, Error> {
        let snapshot = if use_cache { Some(self.cache.load_snapshot().await?) } else { None };
        let options = SearchOptions { use_cache, snapshot: snapshot.as_ref() };

        let mut outcomes = Vec::new();
        for race in day.races() {
            outcomes.push(self.search_race(&race, target, options, on_event).await?);
        }
        Ok(outcomes)
    }
}

/// Convenience lookup without a source, e.g. for status queries.
pub async fn cached_outcome<S: TableStore>(
    cache: &ResultCache<S>, race: &RaceId, target: &str,
) -> Result<CacheLookup, Error> {
    cache.query(&CacheKey::for_race(race, target), None).await
}
