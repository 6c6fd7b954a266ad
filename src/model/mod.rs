//! Domain model for a single day's Panchangam.
//!
//! Every type here is an immutable value. Types that carry an invariant
//! (coordinate ranges, interval ordering, aggregate completeness) keep their
//! fields private and validate on construction, including when deserialized.

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

pub mod calendar;
pub mod day;
pub mod dietary;
pub mod karanam;
pub mod location;
pub mod nakshatram;
pub mod thithi;
pub mod timing;
pub mod yogam;

pub use calendar::{TamilDate, TamilMonth, TamilYear, Vaaram};
pub use day::{PanchangamDay, PanchangamDayBuilder};
pub use dietary::{DietaryCategory, DietaryPreference, DietaryStatus, ObservanceKind, UpcomingObservance};
pub use karanam::{Karanam, KaranamName};
pub use location::Location;
pub use nakshatram::{Nakshatram, NakshatramName, NakshatramNature};
pub use thithi::{Paksha, Thithi, ThithiName};
pub use timing::{TimeWindow, WindowKind, stable_window_id};
pub use yogam::{Yogam, YogamKind, YogamName};

/// Invariant violations raised while constructing domain values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("unknown timezone identifier: {0}")]
    UnknownTimezone(String),
    #[error("interval ends at {end} before it starts at {start}")]
    IntervalReversed {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("Tamil day {0} is outside 1-30")]
    TamilDayOutOfRange(u32),
    #[error("60-year cycle number {0} is outside 1-60")]
    CycleNumberOutOfRange(u32),
    #[error("year name '{name}' does not match cycle number {cycle_number}")]
    CycleNameMismatch { name: String, cycle_number: u32 },
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("sunrise ({sunrise}) is not before sunset ({sunset})")]
    SunriseNotBeforeSunset {
        sunrise: DateTime<Utc>,
        sunset: DateTime<Utc>,
    },
    #[error("at least one auspicious window is required")]
    NoAuspiciousWindow,
    #[error("local time {0} does not exist in timezone {1}")]
    NonexistentLocalTime(NaiveDateTime, String),
}

/// Presentation colour attached to enumerants.
///
/// Rendering layers map these to concrete colours; the core only guarantees
/// that every variant of every enumerant has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tint {
    Green,
    Orange,
    Red,
    Purple,
    Blue,
    Gold,
}

/// Case-insensitive lookup of a variant by its canonical name.
pub(crate) fn lookup_by_name<T: Copy>(all: &[T], name: fn(T) -> &'static str, raw: &str) -> Option<T> {
    let wanted = raw.trim();
    all.iter().copied().find(|v| name(*v).eq_ignore_ascii_case(wanted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name_ignores_case_and_whitespace() {
        let found = lookup_by_name(&YogamName::ALL, YogamName::name, "  siddhi ");
        assert_eq!(found, Some(YogamName::Siddhi));
    }

    #[test]
    fn test_lookup_by_name_unknown_is_none() {
        assert_eq!(lookup_by_name(&YogamName::ALL, YogamName::name, "Nonesuch"), None);
    }

    #[test]
    fn test_model_error_messages() {
        assert_eq!(
            ModelError::TamilDayOutOfRange(31).to_string(),
            "Tamil day 31 is outside 1-30"
        );
        assert_eq!(
            ModelError::MissingField("rahu_window").to_string(),
            "missing required field: rahu_window"
        );
    }
}
