//! Subcommands and their output.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use ketto_client::NetkeibaSource;
use ketto_core::cache::{SqliteTable, join_positions};
use ketto_core::pedigree::PEDIGREE_DEPTH;
use ketto_core::search::{OutcomeSource, cached_outcome};
use ketto_core::{
    AppConfig, CacheDb, CacheLookup, MatchRow, PedigreeMatcher, PedigreeSearch, PositionIndex, RaceDay, RaceId,
    RaceOutcome, ResultCache, SearchEvent, SearchOptions, Venue,
};

/// Find racehorses descended from a given ancestor
#[derive(Parser)]
#[command(name = "ketto")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Search one race
    Search(SearchArgs),

    /// Search all twelve races of a racing day
    SearchDay(SearchDayArgs),

    /// Show the cached result for a race without scraping
    CacheStatus(CacheStatusArgs),

    /// Delete every cached result
    ClearCache,

    /// Print pedigree position labels in slot order
    Labels(LabelsArgs),
}

#[derive(Args)]
pub struct SearchArgs {
    /// Twelve-digit race id, e.g. 202505020301
    #[arg(value_parser = parse_race_id)]
    pub race_id: RaceId,

    /// Ancestor name
    pub target: String,

    /// Scrape even when a cached result exists
    #[arg(long)]
    pub no_cache: bool,
}

#[derive(Args)]
pub struct SearchDayArgs {
    #[arg(long)]
    pub year: u16,

    /// Racecourse name (東京) or two-digit code (05)
    #[arg(long, value_parser = parse_venue)]
    pub venue: Venue,

    /// Meeting number (開催回)
    #[arg(long)]
    pub meet: u8,

    /// Day within the meeting (日目)
    #[arg(long)]
    pub day: u8,

    /// Ancestor name
    pub target: String,

    /// Scrape even when cached results exist
    #[arg(long)]
    pub no_cache: bool,
}

#[derive(Args)]
pub struct CacheStatusArgs {
    #[arg(value_parser = parse_race_id)]
    pub race_id: RaceId,
    pub target: String,
}

#[derive(Args)]
pub struct LabelsArgs {
    /// Generations to print
    #[arg(long, default_value_t = PEDIGREE_DEPTH)]
    pub depth: usize,
}

fn parse_race_id(value: &str) -> Result<RaceId, String> {
    value.parse().map_err(|e: ketto_core::Error| e.to_string())
}

fn parse_venue(value: &str) -> Result<Venue, String> {
    value.parse().map_err(|e: ketto_core::Error| e.to_string())
}

type Search = PedigreeSearch<SqliteTable, NetkeibaSource>;

async fn open_cache(config: &AppConfig) -> Result<ResultCache<SqliteTable>> {
    let db = CacheDb::open(&config.db_path)
        .await
        .with_context(|| format!("failed to open cache at {}", config.db_path.display()))?;
    Ok(ResultCache::new(db.table(config.sheet_name.clone())))
}

async fn build_search() -> Result<Search> {
    let config = AppConfig::load().context("failed to load configuration")?;
    let cache = open_cache(&config).await?;
    let source = NetkeibaSource::from_config(&config)?;
    let matcher = PedigreeMatcher::new(Arc::new(PositionIndex::default())).with_max_depth(config.pedigree_depth);
    Ok(PedigreeSearch::new(Arc::new(cache), source, matcher).with_request_delay(config.request_delay()))
}

fn print_event(event: SearchEvent) {
    tracing::debug!(?event, "search event");
    match event {
        SearchEvent::RaceStarted { race } => println!("== {} {} ({race})", race.venue(), race.race_label()),
        SearchEvent::CacheHit { matches, .. } => println!("  cached result ({matches} matches)"),
        SearchEvent::HorseChecked { horse, index, total, positions, .. } => {
            if positions.is_empty() {
                println!("  [{index}/{total}] {horse}");
            } else {
                println!("  [{index}/{total}] {horse}: {}", join_positions(&positions));
            }
        }
        SearchEvent::HorseFailed { horse, error, .. } => println!("  {horse}: skipped ({error})"),
        SearchEvent::RaceFinished { .. } => {}
    }
}

fn print_rows(rows: &[MatchRow]) {
    for row in rows {
        println!("  {} | {} | {} {}", row.horse_name, row.matched_positions, row.venue, row.race_label);
    }
}

fn print_outcome(outcome: &RaceOutcome) {
    if outcome.rows.is_empty() {
        println!("  no matches");
    } else {
        print_rows(&outcome.rows);
    }
    if !outcome.failed_horses.is_empty() {
        println!(
            "  incomplete: {} horse(s) could not be checked, result not cached",
            outcome.failed_horses.len()
        );
    } else if !outcome.cached {
        println!("  no entrants found, result not cached");
    } else if outcome.source == OutcomeSource::Fresh {
        println!("  saved to cache");
    }
}

pub async fn search(args: SearchArgs) -> Result<()> {
    let search = build_search().await?;
    let options = SearchOptions { use_cache: !args.no_cache, snapshot: None };
    let outcome = search
        .search_race(&args.race_id, &args.target, options, &mut print_event)
        .await?;
    print_outcome(&outcome);
    Ok(())
}

pub async fn search_day(args: SearchDayArgs) -> Result<()> {
    let day = RaceDay::new(args.year, args.venue, args.meet, args.day)?;
    let search = build_search().await?;
    let outcomes = search
        .search_day(&day, &args.target, !args.no_cache, &mut print_event)
        .await?;

    let total: usize = outcomes.iter().map(|o| o.rows.len()).sum();
    println!("== {} horse(s) descended from {}", total, args.target);
    for outcome in outcomes.iter().filter(|o| !o.rows.is_empty()) {
        print_rows(&outcome.rows);
    }
    Ok(())
}

pub async fn cache_status(args: CacheStatusArgs) -> Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    let cache = open_cache(&config).await?;
    match cached_outcome(&cache, &args.race_id, &args.target).await? {
        CacheLookup::Miss => println!("MISS: {} has not been checked for {}", args.race_id, args.target),
        CacheLookup::Empty => println!("EMPTY: no horse in {} descends from {}", args.race_id, args.target),
        CacheLookup::Populated(rows) => {
            println!("POPULATED: {} match(es)", rows.len());
            print_rows(&rows);
        }
    }
    Ok(())
}

pub async fn clear_cache() -> Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    let deleted = open_cache(&config).await?.clear().await?;
    println!("deleted {deleted} row(s)");
    Ok(())
}

pub fn labels(args: LabelsArgs) -> Result<()> {
    if !(1..=PEDIGREE_DEPTH).contains(&args.depth) {
        bail!("depth must be between 1 and {PEDIGREE_DEPTH}");
    }
    for (slot, label) in PositionIndex::generate(args.depth).labels().iter().enumerate() {
        println!("{slot:>2} {label}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from(["ketto", "search", "202505020301", "トウショウボーイ", "--no-cache"]).unwrap();
        match cli.command {
            Command::Search(args) => {
                assert_eq!(args.race_id.to_string(), "202505020301");
                assert_eq!(args.target, "トウショウボーイ");
                assert!(args.no_cache);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_parse_search_day_venue_by_name() {
        let cli = Cli::try_parse_from([
            "ketto", "search-day", "--year", "2025", "--venue", "東京", "--meet", "2", "--day", "3", "サンデー",
        ])
        .unwrap();
        match cli.command {
            Command::SearchDay(args) => {
                assert_eq!(args.venue, Venue::Tokyo);
                assert!(!args.no_cache);
            }
            _ => panic!("expected search-day"),
        }
    }

    #[test]
    fn test_print_event_every_variant() {
        let race: RaceId = "202505020301".parse().unwrap();
        let positions = PositionIndex::generate(1).labels().to_vec();
        print_event(SearchEvent::RaceStarted { race });
        print_event(SearchEvent::CacheHit { race, matches: 0 });
        print_event(SearchEvent::HorseChecked { race, horse: "サンライズ".into(), index: 1, total: 2, positions });
        print_event(SearchEvent::HorseFailed { race, horse: "アルファ".into(), error: "timeout".into() });
        print_event(SearchEvent::RaceFinished { race, matches: 1 });
    }

    #[test]
    fn test_parse_rejects_bad_race_id() {
        assert!(Cli::try_parse_from(["ketto", "search", "2025", "x"]).is_err());
    }
}
