//! Liturgical calendar resolution
//!
//! Maps any civil date onto the General Roman Calendar: season, Sunday
//! ordinal within the season, and the Sunday (A/B/C) and weekday (I/II)
//! reading cycles. Movable seasons are anchored on Easter Sunday, computed
//! with the Gregorian Computus; Advent and Christmas use fixed civil anchors.
//!
//! Season boundaries (for civil year `Y`):
//!
//! | Season        | From                      | Until (exclusive)         |
//! |---------------|---------------------------|---------------------------|
//! | Christmas     | Dec 25 of `Y-1`           | day after Baptism of Lord |
//! | Ordinary Time | day after Baptism of Lord | Ash Wednesday             |
//! | Lent          | Ash Wednesday             | Holy Thursday             |
//! | Triduum       | Holy Thursday             | Easter Sunday             |
//! | Easter        | Easter Sunday             | day after Pentecost       |
//! | Ordinary Time | day after Pentecost       | First Sunday of Advent    |
//! | Advent        | First Sunday of Advent    | Dec 25                    |

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Civil year whose First Sunday of Advent opens a year-A cycle.
pub const CYCLE_REFERENCE_YEAR: i32 = 2022;

/// Sunday number of Christ the King, the last Sunday of Ordinary Time.
pub const CHRIST_THE_KING_ORDINAL: u32 = 34;

/// Days from Ash Wednesday to Easter Sunday.
const ASH_WEDNESDAY_OFFSET: i64 = 46;

/// Days from Easter Sunday to Pentecost.
const PENTECOST_OFFSET: i64 = 49;

/// Liturgical season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Advent,
    Christmas,
    OrdinaryTime,
    Lent,
    Triduum,
    Easter,
}

impl Season {
    pub const ALL: [Season; 6] = [
        Season::Advent,
        Season::Christmas,
        Season::OrdinaryTime,
        Season::Lent,
        Season::Triduum,
        Season::Easter,
    ];

    /// Display name used on the printed sheet
    pub fn display_name(&self) -> &'static str {
        match self {
            Season::Advent => "Avvento",
            Season::Christmas => "Tempo di Natale",
            Season::OrdinaryTime => "Tempo Ordinario",
            Season::Lent => "Quaresima",
            Season::Triduum => "Triduo Pasquale",
            Season::Easter => "Tempo di Pasqua",
        }
    }

    /// Short lowercase tag, as used in catalogs and file paths
    pub fn tag(&self) -> &'static str {
        match self {
            Season::Advent => "avvento",
            Season::Christmas => "natale",
            Season::OrdinaryTime => "ordinario",
            Season::Lent => "quaresima",
            Season::Triduum => "triduo",
            Season::Easter => "pasqua",
        }
    }

    /// Liturgical colour of the season as a hex string
    pub fn colour(&self) -> &'static str {
        match self {
            Season::Advent | Season::Lent => "#6b3fa0",
            Season::Christmas | Season::Easter => "#d4af37",
            Season::Triduum => "#b22222",
            Season::OrdinaryTime => "#2a9a5c",
        }
    }

    /// Parse a season tag in English or Italian.
    ///
    /// Returns `None` for unknown tags, including the "any season" markers.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_lowercase();
        let season = match tag.as_str() {
            "advent" | "avvento" => Season::Advent,
            "christmas" | "natale" | "tempo di natale" => Season::Christmas,
            "ordinary" | "ordinary_time" | "ordinary time" | "ordinario" | "tempo ordinario" => {
                Season::OrdinaryTime
            }
            "lent" | "quaresima" => Season::Lent,
            "triduum" | "triduo" | "triduo pasquale" => Season::Triduum,
            "easter" | "pasqua" | "tempo di pasqua" => Season::Easter,
            _ => return None,
        };
        Some(season)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Three-year Sunday reading cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cycle {
    A,
    B,
    C,
}

impl Cycle {
    pub fn letter(&self) -> char {
        match self {
            Cycle::A => 'A',
            Cycle::B => 'B',
            Cycle::C => 'C',
        }
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Two-year weekday reading cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeekdayCycle {
    I,
    II,
}

/// Named celebrations that replace the ordinary Sunday title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Celebration {
    NativityOfTheLord,
    BaptismOfTheLord,
    AshWednesday,
    PalmSunday,
    EasterSunday,
    Pentecost,
    ChristTheKing,
}

impl Celebration {
    pub fn display_name(&self) -> &'static str {
        match self {
            Celebration::NativityOfTheLord => "Natale del Signore",
            Celebration::BaptismOfTheLord => "Battesimo del Signore",
            Celebration::AshWednesday => "Mercoledì delle Ceneri",
            Celebration::PalmSunday => "Domenica delle Palme",
            Celebration::EasterSunday => "Domenica di Pasqua",
            Celebration::Pentecost => "Domenica di Pentecoste",
            Celebration::ChristTheKing => "Nostro Signore Gesù Cristo Re dell'Universo",
        }
    }
}

/// A civil date resolved against the liturgical calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiturgicalDate {
    /// The civil date that was resolved
    pub date: NaiveDate,

    /// Season the date falls in
    pub season: Season,

    /// Number of Sundays of the season up to and including the date (0 if none yet)
    pub sunday_ordinal: u32,

    /// Sunday reading cycle
    pub cycle: Cycle,

    /// Weekday reading cycle
    pub weekday_cycle: WeekdayCycle,

    /// Named celebration falling on this date, if any
    pub celebration: Option<Celebration>,
}

impl LiturgicalDate {
    pub fn is_sunday(&self) -> bool {
        self.date.weekday().num_days_from_sunday() == 0
    }
}

/// Resolve a civil date against the liturgical calendar
pub fn resolve(date: NaiveDate) -> LiturgicalDate {
    let (season, sunday_ordinal) = season_and_ordinal(date);
    let start = liturgical_year_start(date);

    LiturgicalDate {
        date,
        season,
        sunday_ordinal,
        cycle: cycle_for_year(start),
        weekday_cycle: if (start + 1) % 2 != 0 {
            WeekdayCycle::I
        } else {
            WeekdayCycle::II
        },
        celebration: celebration_on(date),
    }
}

/// Easter Sunday for a Gregorian year (anonymous Gregorian algorithm).
pub fn easter_sunday(year: i32) -> NaiveDate {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;

    ymd(year, month as u32, day as u32)
}

/// First Sunday of Advent: the Sunday on or after November 27.
pub fn first_sunday_of_advent(year: i32) -> NaiveDate {
    sunday_on_or_after(ymd(year, 11, 27))
}

/// Baptism of the Lord: the Sunday falling between January 7 and 13.
pub fn baptism_of_the_lord(year: i32) -> NaiveDate {
    sunday_on_or_before(ymd(year, 1, 13))
}

pub fn ash_wednesday(year: i32) -> NaiveDate {
    easter_sunday(year) - Duration::days(ASH_WEDNESDAY_OFFSET)
}

pub fn holy_thursday(year: i32) -> NaiveDate {
    easter_sunday(year) - Duration::days(3)
}

pub fn palm_sunday(year: i32) -> NaiveDate {
    easter_sunday(year) - Duration::days(7)
}

pub fn pentecost(year: i32) -> NaiveDate {
    easter_sunday(year) + Duration::days(PENTECOST_OFFSET)
}

/// Christ the King: the Sunday before the First Sunday of Advent.
pub fn christ_the_king(year: i32) -> NaiveDate {
    first_sunday_of_advent(year) - Duration::weeks(1)
}

/// The Sunday on or before `date`
pub fn sunday_on_or_before(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// The Sunday on or after `date`
pub fn sunday_on_or_after(date: NaiveDate) -> NaiveDate {
    let ahead = (7 - date.weekday().num_days_from_sunday()) % 7;
    date + Duration::days(ahead as i64)
}

/// The next Sunday strictly after `date`
pub fn next_sunday_after(date: NaiveDate) -> NaiveDate {
    sunday_on_or_after(date + Duration::days(1))
}

/// Civil year in which the liturgical year containing `date` began.
pub fn liturgical_year_start(date: NaiveDate) -> i32 {
    let year = date.year();
    if date >= first_sunday_of_advent(year) {
        year
    } else {
        year - 1
    }
}

fn cycle_for_year(start: i32) -> Cycle {
    match (start - CYCLE_REFERENCE_YEAR).rem_euclid(3) {
        0 => Cycle::A,
        1 => Cycle::B,
        _ => Cycle::C,
    }
}

fn season_and_ordinal(date: NaiveDate) -> (Season, u32) {
    let year = date.year();
    let christmas = ymd(year, 12, 25);
    if date >= christmas {
        return (Season::Christmas, sundays_between(christmas, date));
    }

    let advent = first_sunday_of_advent(year);
    if date >= advent {
        return (Season::Advent, weeks_since(advent, date) + 1);
    }

    let baptism = baptism_of_the_lord(year);
    if date <= baptism {
        let previous_christmas = ymd(year - 1, 12, 25);
        return (Season::Christmas, sundays_between(previous_christmas, date));
    }

    let easter = easter_sunday(year);
    let ash = easter - Duration::days(ASH_WEDNESDAY_OFFSET);
    let triduum = easter - Duration::days(3);
    let pentecost = easter + Duration::days(PENTECOST_OFFSET);

    if date < ash {
        // Baptism of the Lord stands in for the first Sunday.
        (Season::OrdinaryTime, weeks_since(baptism, date) + 1)
    } else if date < triduum {
        (Season::Lent, sundays_between(ash, date))
    } else if date < easter {
        (Season::Triduum, 0)
    } else if date <= pentecost {
        (Season::Easter, weeks_since(easter, date) + 1)
    } else {
        let weeks_left = weeks_since(sunday_on_or_before(date), christ_the_king(year));
        (Season::OrdinaryTime, CHRIST_THE_KING_ORDINAL.saturating_sub(weeks_left))
    }
}

fn celebration_on(date: NaiveDate) -> Option<Celebration> {
    let year = date.year();
    let easter = easter_sunday(year);

    let celebration = if date == ymd(year, 12, 25) {
        Celebration::NativityOfTheLord
    } else if date == baptism_of_the_lord(year) {
        Celebration::BaptismOfTheLord
    } else if date == easter - Duration::days(ASH_WEDNESDAY_OFFSET) {
        Celebration::AshWednesday
    } else if date == easter - Duration::days(7) {
        Celebration::PalmSunday
    } else if date == easter {
        Celebration::EasterSunday
    } else if date == easter + Duration::days(PENTECOST_OFFSET) {
        Celebration::Pentecost
    } else if date == christ_the_king(year) {
        Celebration::ChristTheKing
    } else {
        return None;
    };
    Some(celebration)
}

/// Whole weeks from the Sunday `anchor` to the Sunday on or before `date`.
fn weeks_since(anchor: NaiveDate, date: NaiveDate) -> u32 {
    let days = (sunday_on_or_before(date) - anchor).num_days();
    (days.max(0) / 7) as u32
}

/// Number of Sundays in the inclusive range `from..=to`.
fn sundays_between(from: NaiveDate, to: NaiveDate) -> u32 {
    let first = sunday_on_or_after(from);
    if first > to {
        return 0;
    }
    ((to - first).num_days() / 7 + 1) as u32
}

/// Anchor dates outside the representable range saturate to its ends.
fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    let year = year.clamp(NaiveDate::MIN.year(), NaiveDate::MAX.year());
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}
