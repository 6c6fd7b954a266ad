//! Deterministic offline Panchangam.
//!
//! Used when the remote service cannot supply a day. Every value comes from
//! fixed tables keyed by the date, so the same (date, location) always
//! produces the same day. The values are placeholders laid out in the
//! location's own timezone, not astronomical results.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use uuid::Uuid;

use crate::advisory;
use crate::model::{
    DietaryCategory, DietaryStatus, Karanam, KaranamName, Location, ModelError, Nakshatram, NakshatramName,
    PanchangamDay, Paksha, TamilDate, TamilMonth, TamilYear, Thithi, ThithiName, TimeWindow, Vaaram, WindowKind,
    Yogam, YogamName, stable_window_id,
};

type HourMinute = (u32, u32);

const SUNRISE: HourMinute = (6, 42);
const SUNSET: HourMinute = (17, 54);
const NALLA_NERAM: [(HourMinute, HourMinute); 2] = [((9, 15), (10, 30)), ((15, 0), (16, 30))];
const YAMAGANDAM: (HourMinute, HourMinute) = ((7, 30), (9, 0));
const KULIGAI: (HourMinute, HourMinute) = ((10, 30), (12, 0));
const YOGAM_SPAN: (HourMinute, HourMinute) = ((8, 30), (14, 15));
const NAKSHATRAM_END: HourMinute = (14, 45);
const THITHI_END: HourMinute = (16, 30);
const KARANAM_END: HourMinute = (10, 15);

/// Traditional Rahukaalam by weekday.
fn rahukaalam(weekday: Weekday) -> (HourMinute, HourMinute) {
    match weekday {
        Weekday::Sun => ((16, 30), (18, 0)),
        Weekday::Mon => ((7, 30), (9, 0)),
        Weekday::Tue => ((15, 0), (16, 30)),
        Weekday::Wed => ((12, 0), (13, 30)),
        Weekday::Thu => ((13, 30), (15, 0)),
        Weekday::Fri => ((10, 30), (12, 0)),
        Weekday::Sat => ((9, 0), (10, 30)),
    }
}

// ==================== Gowri Panchangam ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gowri {
    Amirdha,
    Uthi,
    Laabam,
    Sugam,
    Dhanam,
    Rogam,
    Soram,
    Visham,
}

impl Gowri {
    fn is_auspicious(self) -> bool {
        match self {
            Gowri::Amirdha | Gowri::Uthi | Gowri::Laabam | Gowri::Sugam | Gowri::Dhanam => true,
            Gowri::Rogam | Gowri::Soram | Gowri::Visham => false,
        }
    }
}

/// Daytime Gowri states for each weekday, Sunday first.
const GOWRI_PATTERN: [[Gowri; 8]; 7] = {
    use Gowri::*;
    [
        [Uthi, Rogam, Visham, Dhanam, Soram, Laabam, Amirdha, Sugam],
        [Amirdha, Visham, Rogam, Dhanam, Laabam, Soram, Uthi, Sugam],
        [Rogam, Amirdha, Laabam, Dhanam, Uthi, Visham, Soram, Sugam],
        [Sugam, Soram, Amirdha, Laabam, Rogam, Uthi, Visham, Dhanam],
        [Laabam, Visham, Uthi, Amirdha, Sugam, Rogam, Dhanam, Soram],
        [Dhanam, Laabam, Sugam, Uthi, Rogam, Amirdha, Visham, Soram],
        [Soram, Sugam, Rogam, Visham, Amirdha, Dhanam, Laabam, Uthi],
    ]
};

// ==================== Tamil Calendar Approximation ====================

/// Approximate Tamil month for a Gregorian date: each Gregorian month spans
/// two Tamil months, switching on a fixed day.
pub fn approximate_tamil_month(date: NaiveDate) -> TamilMonth {
    use TamilMonth::*;
    let (threshold, before, after) = match date.month() {
        1 => (14, Margazhi, Thai),
        2 => (13, Thai, Maasi),
        3 => (14, Maasi, Panguni),
        4 => (14, Panguni, Chithirai),
        5 => (15, Chithirai, Vaikasi),
        6 => (15, Vaikasi, Aani),
        7 => (17, Aani, Aadi),
        8 => (17, Aadi, Aavani),
        9 => (17, Aavani, Purattasi),
        10 => (17, Purattasi, Aippasi),
        11 => (16, Aippasi, Karthigai),
        _ => (16, Karthigai, Margazhi),
    };
    if date.day() < threshold { before } else { after }
}

/// Approximate Tamil day of month, always in 1..=30.
pub fn approximate_tamil_day(date: NaiveDate) -> u32 {
    (date.day() + 30 - 14) % 30 + 1
}

pub fn approximate_tamil_date(date: NaiveDate) -> Result<TamilDate, ModelError> {
    TamilDate::new(
        approximate_tamil_day(date),
        approximate_tamil_month(date),
        TamilYear::for_date(date),
        Vaaram::from(date.weekday()),
    )
}

// ==================== Synthesis ====================

/// Resolve a wall-clock time on `date` in `tz`. Ambiguous times take the
/// earlier instant; times inside a DST gap move forward one hour.
fn local_instant(tz: Tz, date: NaiveDate, (hour, minute): HourMinute) -> Result<DateTime<Utc>, ModelError> {
    let naive = date.and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN));
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + TimeDelta::hours(1))).earliest())
        .map(|t| t.with_timezone(&Utc))
        .ok_or_else(|| ModelError::NonexistentLocalTime(naive, tz.name().to_string()))
}

struct Layout<'a> {
    location: &'a Location,
    date: NaiveDate,
}

impl Layout<'_> {
    fn at(&self, time: HourMinute) -> Result<DateTime<Utc>, ModelError> {
        local_instant(self.location.tz(), self.date, time)
    }

    fn window_id(&self, slot: &str, index: usize) -> Uuid {
        stable_window_id(self.location.id(), self.date, slot, index)
    }

    fn window(&self, kind: WindowKind, index: usize, span: (HourMinute, HourMinute)) -> Result<TimeWindow, ModelError> {
        TimeWindow::new_with_id(self.window_id(kind.name(), index), self.at(span.0)?, self.at(span.1)?, Some(kind))
    }

    /// Auspicious Gowri segments of the daylight span.
    fn gowri_windows(&self, sunrise: DateTime<Utc>, sunset: DateTime<Utc>) -> Result<Vec<TimeWindow>, ModelError> {
        let segment = (sunset - sunrise) / 8;
        let pattern = GOWRI_PATTERN[self.date.weekday().num_days_from_sunday() as usize];

        pattern
            .iter()
            .enumerate()
            .filter(|(_, state)| state.is_auspicious())
            .map(|(i, _)| {
                let start = sunrise + segment * i as i32;
                let end = if i == 7 { sunset } else { start + segment };
                TimeWindow::new_with_id(self.window_id(WindowKind::Gowri.name(), i), start, end, Some(WindowKind::Gowri))
            })
            .collect()
    }
}

/// Placeholder dietary status keyed on day-of-month mod 15.
fn dietary_status(date: NaiveDate) -> DietaryStatus {
    match date.day() % 15 {
        11 => DietaryStatus::new(DietaryCategory::StrictFast, None, None),
        13 => DietaryStatus::new(DietaryCategory::AvoidNonVeg, Some("Pradosham".to_string()), None),
        _ => DietaryStatus::new(DietaryCategory::Regular, None, advisory::next_observance(date)),
    }
}

/// Build the offline day for `date` at `location`.
pub fn synthesize(date: NaiveDate, location: &Location) -> Result<PanchangamDay, ModelError> {
    let layout = Layout { location, date };

    let sunrise = layout.at(SUNRISE)?;
    let sunset = layout.at(SUNSET)?;

    let yogam_name = YogamName::ALL[date.ordinal() as usize % YogamName::ALL.len()];
    let yogam = Yogam::new(yogam_name, layout.at(YOGAM_SPAN.0)?, layout.at(YOGAM_SPAN.1)?)?;

    let auspicious = NALLA_NERAM
        .iter()
        .enumerate()
        .map(|(i, span)| layout.window(WindowKind::Auspicious, i, *span))
        .collect::<Result<Vec<_>, _>>()?;

    let status = dietary_status(date);
    let upcoming = status.next_observance().cloned();

    PanchangamDay::builder()
        .date(date)
        .tamil_date(approximate_tamil_date(date)?)
        .location(location.clone())
        .nakshatram(Nakshatram::new(NakshatramName::Rohini, layout.at(NAKSHATRAM_END)?))
        .thithi(Thithi::new(ThithiName::Panchami, Paksha::Shukla, layout.at(THITHI_END)?))
        .yogam(yogam)
        .karanam(Karanam::new(KaranamName::Bava, layout.at(KARANAM_END)?))
        .sun(sunrise, sunset)
        .auspicious_windows(auspicious)
        .rahu_window(layout.window(WindowKind::Rahu, 0, rahukaalam(date.weekday()))?)
        .yama_window(layout.window(WindowKind::Yama, 0, YAMAGANDAM)?)
        .kuligai_window(Some(layout.window(WindowKind::Kuligai, 0, KULIGAI)?))
        .supplementary_windows(layout.gowri_windows(sunrise, sunset)?)
        .dietary_status(status)
        .upcoming_observance(upcoming)
        .build()
}
