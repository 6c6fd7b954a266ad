//! Tamil calendar date: month, day, 60-year cycle and weekday.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::{ModelError, lookup_by_name};

/// The 12 months of the Tamil solar calendar, starting from Chithirai (mid-April).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TamilMonth {
    Chithirai,
    Vaikasi,
    Aani,
    Aadi,
    Aavani,
    Purattasi,
    Aippasi,
    Karthigai,
    Margazhi,
    Thai,
    Maasi,
    Panguni,
}

impl TamilMonth {
    pub const ALL: [TamilMonth; 12] = [
        TamilMonth::Chithirai,
        TamilMonth::Vaikasi,
        TamilMonth::Aani,
        TamilMonth::Aadi,
        TamilMonth::Aavani,
        TamilMonth::Purattasi,
        TamilMonth::Aippasi,
        TamilMonth::Karthigai,
        TamilMonth::Margazhi,
        TamilMonth::Thai,
        TamilMonth::Maasi,
        TamilMonth::Panguni,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TamilMonth::Chithirai => "Chithirai",
            TamilMonth::Vaikasi => "Vaikasi",
            TamilMonth::Aani => "Aani",
            TamilMonth::Aadi => "Aadi",
            TamilMonth::Aavani => "Aavani",
            TamilMonth::Purattasi => "Purattasi",
            TamilMonth::Aippasi => "Aippasi",
            TamilMonth::Karthigai => "Karthigai",
            TamilMonth::Margazhi => "Margazhi",
            TamilMonth::Thai => "Thai",
            TamilMonth::Maasi => "Maasi",
            TamilMonth::Panguni => "Panguni",
        }
    }

    pub fn from_name(raw: &str) -> Option<Self> {
        lookup_by_name(&Self::ALL, Self::name, raw)
    }

    /// Month number, 1 = Chithirai.
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    /// The following month; Panguni wraps to Chithirai.
    pub fn next(self) -> Self {
        Self::ALL[(self as usize + 1) % Self::ALL.len()]
    }

    /// Gregorian months this Tamil month overlaps.
    pub fn gregorian_overlap(self) -> &'static str {
        match self {
            TamilMonth::Chithirai => "Apr-May",
            TamilMonth::Vaikasi => "May-Jun",
            TamilMonth::Aani => "Jun-Jul",
            TamilMonth::Aadi => "Jul-Aug",
            TamilMonth::Aavani => "Aug-Sep",
            TamilMonth::Purattasi => "Sep-Oct",
            TamilMonth::Aippasi => "Oct-Nov",
            TamilMonth::Karthigai => "Nov-Dec",
            TamilMonth::Margazhi => "Dec-Jan",
            TamilMonth::Thai => "Jan-Feb",
            TamilMonth::Maasi => "Feb-Mar",
            TamilMonth::Panguni => "Mar-Apr",
        }
    }
}

/// Names of the 60-year cycle, Prabhava (1) to Akshaya (60).
const CYCLE_NAMES: [&str; 60] = [
    "Prabhava", "Vibhava", "Sukla", "Pramodhoota", "Prajorpathi", "Aangirasa",
    "Srimukha", "Bhava", "Yuva", "Dhaathu", "Eswara", "Vehudhanya",
    "Pramathi", "Vikrama", "Vishu", "Chitrabaanu", "Subaanu", "Dhaarana",
    "Paarthiba", "Viya", "Sarvajith", "Sarvadhari", "Virodhi", "Vikruthi",
    "Kara", "Nandhana", "Vijaya", "Jaya", "Manmatha", "Dhunmuki",
    "Hevilambi", "Vilambi", "Vikari", "Sarvari", "Plava", "Subakruthu",
    "Sobakruthu", "Krodhi", "Visuvasuva", "Parabhava", "Plavanga", "Keelaka",
    "Saumya", "Sadharana", "Virodhikruthu", "Paridhaabi", "Pramaadhisa", "Aanandha",
    "Rakshasa", "Nala", "Pingala", "Kalayukthi", "Siddharthi", "Raudhri",
    "Dhunmathi", "Dhundubhi", "Rudhrodhgaari", "Raktakshi", "Krodhana", "Akshaya",
];

/// Gregorian year in which Prabhava (cycle 1) began.
const CYCLE_EPOCH_YEAR: i32 = 1987;

/// A year of the 60-year cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TamilYearRecord")]
pub struct TamilYear {
    name: String,
    cycle_number: u32,
}

#[derive(Deserialize)]
struct TamilYearRecord {
    name: String,
    cycle_number: u32,
}

impl TryFrom<TamilYearRecord> for TamilYear {
    type Error = ModelError;

    fn try_from(r: TamilYearRecord) -> Result<Self, Self::Error> {
        let year = TamilYear::from_cycle(r.cycle_number)?;
        if !year.name.eq_ignore_ascii_case(r.name.trim()) {
            return Err(ModelError::CycleNameMismatch {
                name: r.name,
                cycle_number: r.cycle_number,
            });
        }
        Ok(year)
    }
}

impl TamilYear {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cycle_number(&self) -> u32 {
        self.cycle_number
    }

    pub fn from_cycle(cycle_number: u32) -> Result<Self, ModelError> {
        if !(1..=60).contains(&cycle_number) {
            return Err(ModelError::CycleNumberOutOfRange(cycle_number));
        }
        Ok(Self {
            name: CYCLE_NAMES[cycle_number as usize - 1].to_string(),
            cycle_number,
        })
    }

    pub fn from_name(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        CYCLE_NAMES
            .iter()
            .position(|n| n.eq_ignore_ascii_case(raw))
            .map(|i| Self {
                name: CYCLE_NAMES[i].to_string(),
                cycle_number: i as u32 + 1,
            })
    }

    /// The cycle year in effect on `date`. Tamil years begin on 14 April.
    pub fn for_date(date: NaiveDate) -> Self {
        let starts_this_year = (date.month(), date.day()) >= (4, 14);
        let start_year = if starts_this_year { date.year() } else { date.year() - 1 };
        let index = (start_year - CYCLE_EPOCH_YEAR).rem_euclid(60) as usize;
        Self {
            name: CYCLE_NAMES[index].to_string(),
            cycle_number: index as u32 + 1,
        }
    }
}

/// Day of the week, each ruled by a planet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vaaram {
    Nyayiru,
    Thingal,
    Chevvai,
    Budhan,
    Viyazhan,
    Velli,
    Sani,
}

impl Vaaram {
    pub const ALL: [Vaaram; 7] = [
        Vaaram::Nyayiru,
        Vaaram::Thingal,
        Vaaram::Chevvai,
        Vaaram::Budhan,
        Vaaram::Viyazhan,
        Vaaram::Velli,
        Vaaram::Sani,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Vaaram::Nyayiru => "Nyayiru",
            Vaaram::Thingal => "Thingal",
            Vaaram::Chevvai => "Chevvai",
            Vaaram::Budhan => "Budhan",
            Vaaram::Viyazhan => "Viyazhan",
            Vaaram::Velli => "Velli",
            Vaaram::Sani => "Sani",
        }
    }

    pub fn from_name(raw: &str) -> Option<Self> {
        lookup_by_name(&Self::ALL, Self::name, raw)
    }

    pub fn english_name(self) -> &'static str {
        match self {
            Vaaram::Nyayiru => "Sunday",
            Vaaram::Thingal => "Monday",
            Vaaram::Chevvai => "Tuesday",
            Vaaram::Budhan => "Wednesday",
            Vaaram::Viyazhan => "Thursday",
            Vaaram::Velli => "Friday",
            Vaaram::Sani => "Saturday",
        }
    }

    pub fn short_english(self) -> &'static str {
        &self.english_name()[..3]
    }

    pub fn deity(self) -> &'static str {
        match self {
            Vaaram::Nyayiru => "Surya (Sun)",
            Vaaram::Thingal => "Chandra (Moon)",
            Vaaram::Chevvai => "Mangal (Mars)",
            Vaaram::Budhan => "Budha (Mercury)",
            Vaaram::Viyazhan => "Guru (Jupiter)",
            Vaaram::Velli => "Shukra (Venus)",
            Vaaram::Sani => "Shani (Saturn)",
        }
    }
}

impl From<Weekday> for Vaaram {
    fn from(weekday: Weekday) -> Self {
        Self::ALL[weekday.num_days_from_sunday() as usize]
    }
}

/// A date in the Tamil calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TamilDateRecord")]
pub struct TamilDate {
    day: u32,
    month: TamilMonth,
    year: TamilYear,
    weekday: Vaaram,
}

#[derive(Deserialize)]
struct TamilDateRecord {
    day: u32,
    month: TamilMonth,
    year: TamilYear,
    weekday: Vaaram,
}

impl TryFrom<TamilDateRecord> for TamilDate {
    type Error = ModelError;

    fn try_from(r: TamilDateRecord) -> Result<Self, Self::Error> {
        TamilDate::new(r.day, r.month, r.year, r.weekday)
    }
}

impl TamilDate {
    pub fn new(day: u32, month: TamilMonth, year: TamilYear, weekday: Vaaram) -> Result<Self, ModelError> {
        if !(1..=30).contains(&day) {
            return Err(ModelError::TamilDayOutOfRange(day));
        }
        Ok(Self {
            day,
            month,
            year,
            weekday,
        })
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn month(&self) -> TamilMonth {
        self.month
    }

    pub fn year(&self) -> &TamilYear {
        &self.year
    }

    pub fn weekday(&self) -> Vaaram {
        self.weekday
    }

    /// "Thai 16, Visuvasuva"
    pub fn formatted(&self) -> String {
        format!("{} {}, {}", self.month.name(), self.day, self.year.name)
    }

    /// "Thai 16"
    pub fn short_formatted(&self) -> String {
        format!("{} {}", self.month.name(), self.day)
    }
}
