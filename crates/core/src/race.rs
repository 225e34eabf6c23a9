//! Race identifiers.
//!
//! A race id is twelve digits: `{year:4}{venue:2}{meet:2}{day:2}{race:2}`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Races run per racecourse per meeting day.
pub const RACES_PER_DAY: u8 = 12;

/// JRA racecourses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
pub enum Venue {
    Sapporo,
    Hakodate,
    Fukushima,
    Niigata,
    Tokyo,
    Nakayama,
    Chukyo,
    Kyoto,
    Hanshin,
    Kokura,
}

impl Venue {
    pub const ALL: [Venue; 10] = [
        Venue::Sapporo,
        Venue::Hakodate,
        Venue::Fukushima,
        Venue::Niigata,
        Venue::Tokyo,
        Venue::Nakayama,
        Venue::Chukyo,
        Venue::Kyoto,
        Venue::Hanshin,
        Venue::Kokura,
    ];

    pub fn code(self) -> u8 {
        match self {
            Venue::Sapporo => 1,
            Venue::Hakodate => 2,
            Venue::Fukushima => 3,
            Venue::Niigata => 4,
            Venue::Tokyo => 5,
            Venue::Nakayama => 6,
            Venue::Chukyo => 7,
            Venue::Kyoto => 8,
            Venue::Hanshin => 9,
            Venue::Kokura => 10,
        }
    }

    /// Japanese racecourse name, as shown in race cards and the cache table.
    pub fn name(self) -> &'static str {
        match self {
            Venue::Sapporo => "札幌",
            Venue::Hakodate => "函館",
            Venue::Fukushima => "福島",
            Venue::Niigata => "新潟",
            Venue::Tokyo => "東京",
            Venue::Nakayama => "中山",
            Venue::Chukyo => "中京",
            Venue::Kyoto => "京都",
            Venue::Hanshin => "阪神",
            Venue::Kokura => "小倉",
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.code() == code)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|v| v.name() == name)
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Venue {
    type Err = Error;

    /// Accepts the Japanese name or the numeric code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(venue) = Self::from_name(s) {
            return Ok(venue);
        }
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(Self::from_code)
            .ok_or_else(|| Error::InvalidInput(format!("unknown venue: {s}")))
    }
}

/// One racecourse on one meeting day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RaceDay {
    pub year: u16,
    pub venue: Venue,
    /// Meeting number within the year at this venue (開催回).
    pub meet: u8,
    /// Day number within the meeting (日目).
    pub day: u8,
}

impl RaceDay {
    pub fn new(year: u16, venue: Venue, meet: u8, day: u8) -> Result<Self, Error> {
        RaceId::new(year, venue, meet, day, 1).map(|id| id.race_day())
    }

    pub fn race(&self, race: u8) -> Result<RaceId, Error> {
        RaceId::new(self.year, self.venue, self.meet, self.day, race)
    }

    /// Every race of the day, 1R through 12R.
    pub fn races(&self) -> impl Iterator<Item = RaceId> + '_ {
        (1..=RACES_PER_DAY).map(|race| RaceId {
            year: self.year,
            venue: self.venue,
            meet: self.meet,
            day: self.day,
            race,
        })
    }
}

/// A single race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RaceId {
    year: u16,
    venue: Venue,
    meet: u8,
    day: u8,
    race: u8,
}

impl RaceId {
    pub fn new(year: u16, venue: Venue, meet: u8, day: u8, race: u8) -> Result<Self, Error> {
        if year > 9999 {
            return Err(Error::InvalidRaceId(format!("year {year} does not fit four digits")));
        }
        for (field, value) in [("meet", meet), ("day", day), ("race", race)] {
            if value == 0 || value > 99 {
                return Err(Error::InvalidRaceId(format!("{field} number must be 1-99, got {value}")));
            }
        }
        Ok(Self { year, venue, meet, day, race })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn venue(&self) -> Venue {
        self.venue
    }

    pub fn meet(&self) -> u8 {
        self.meet
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn race(&self) -> u8 {
        self.race
    }

    pub fn race_day(&self) -> RaceDay {
        RaceDay { year: self.year, venue: self.venue, meet: self.meet, day: self.day }
    }

    /// Display label such as `11R`.
    pub fn race_label(&self) -> String {
        format!("{}R", self.race)
    }
}

impl fmt::Display for RaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}{:02}{:02}{:02}{:02}",
            self.year,
            self.venue.code(),
            self.meet,
            self.day,
            self.race
        )
    }
}

impl FromStr for RaceId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 12 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidRaceId(format!("expected 12 digits, got {s:?}")));
        }

        let field = |range: std::ops::Range<usize>| -> Result<u16, Error> {
            s[range].parse::<u16>().map_err(|e| Error::InvalidRaceId(e.to_string()))
        };

        let year = field(0..4)?;
        let venue_code = field(4..6)? as u8;
        let venue = Venue::from_code(venue_code)
            .ok_or_else(|| Error::InvalidRaceId(format!("unknown venue code {venue_code:02}")))?;

        Self::new(year, venue, field(6..8)? as u8, field(8..10)? as u8, field(10..12)? as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_race_id() {
        let id = RaceId::new(2025, Venue::Tokyo, 2, 3, 1).unwrap();
        assert_eq!(id.to_string(), "202505020301");
        assert_eq!(id.race_label(), "1R");
    }

    #[test]
    fn test_parse_race_id() {
        let id: RaceId = "202509051211".parse().unwrap();
        assert_eq!(id.year(), 2025);
        assert_eq!(id.venue(), Venue::Hanshin);
        assert_eq!(id.meet(), 5);
        assert_eq!(id.day(), 12);
        assert_eq!(id.race(), 11);
        assert_eq!(id.to_string(), "202509051211");
    }

    #[test]
    fn test_parse_rejects_bad_ids() {
        assert!("20250502030".parse::<RaceId>().is_err());
        assert!("2025050203011".parse::<RaceId>().is_err());
        assert!("2025a5020301".parse::<RaceId>().is_err());
        assert!("202511020301".parse::<RaceId>().is_err());
        assert!("202505000301".parse::<RaceId>().is_err());
        assert!("202505020300".parse::<RaceId>().is_err());
    }

    #[test]
    fn test_venue_table() {
        assert_eq!(Venue::ALL.len(), 10);
        for venue in Venue::ALL {
            assert_eq!(Venue::from_code(venue.code()), Some(venue));
            assert_eq!(Venue::from_name(venue.name()), Some(venue));
        }
        assert_eq!("東京".parse::<Venue>().unwrap(), Venue::Tokyo);
        assert_eq!("10".parse::<Venue>().unwrap(), Venue::Kokura);
        assert!("大井".parse::<Venue>().is_err());
    }

    #[test]
    fn test_race_day_races() {
        let day = RaceDay::new(2025, Venue::Kyoto, 4, 8).unwrap();
        let ids: Vec<String> = day.races().map(|r| r.to_string()).collect();
        assert_eq!(ids.len(), 12);
        assert_eq!(ids[0], "202508040801");
        assert_eq!(ids[11], "202508040812");
        assert_eq!(day.race(7).unwrap().race_day(), day);
    }

    #[test]
    fn test_race_day_rejects_zero_day() {
        assert!(RaceDay::new(2025, Venue::Kyoto, 4, 0).is_err());
    }
}
