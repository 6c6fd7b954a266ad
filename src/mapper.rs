//! Wire format of the remote almanac and its mapping into the domain model.
//!
//! The payload is loosely typed: element names, fortnight and category tags
//! arrive as free strings. Unknown names fall back to a fixed default variant
//! so a cosmetic mismatch never costs the whole day. The root date, sunrise,
//! sunset and the Rahu and Yama windows are not negotiable; if any of those
//! cannot be read the mapping fails as a whole.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::model::{
    DietaryCategory, DietaryStatus, Karanam, KaranamName, Location, ModelError, Nakshatram, NakshatramName,
    ObservanceKind, PanchangamDay, Paksha, TamilDate, TamilMonth, TamilYear, Thithi, ThithiName, TimeWindow,
    UpcomingObservance, Vaaram, WindowKind, Yogam, YogamKind, YogamName, stable_window_id,
};

/// Hard failures of [`map`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    #[error("invalid root date {0:?}, expected yyyy-MM-dd")]
    InvalidDate(String),
    #[error("invalid instant for {field}: {value:?}")]
    InvalidInstant { field: &'static str, value: String },
    #[error(transparent)]
    Model(#[from] ModelError),
}

// ==================== Wire Types ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanchangamResponse {
    pub date: String,
    pub tamil_date: TamilDatePayload,
    pub nakshatram: NakshatramPayload,
    pub thithi: ThithiPayload,
    pub yogam: YogamPayload,
    pub karanam: KaranamPayload,
    pub timings: TimingsPayload,
    pub food_status: FoodStatusPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TamilDatePayload {
    pub month: String,
    pub day: i64,
    pub year: String,
    pub weekday: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NakshatramPayload {
    pub name: String,
    pub end_time: String,
    #[serde(default)]
    pub lord: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThithiPayload {
    pub name: String,
    pub paksha: String,
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YogamPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KaranamPayload {
    pub name: String,
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingsPayload {
    pub sunrise: String,
    pub sunset: String,
    pub nalla_neram: Vec<TimeRangePayload>,
    pub rahukaalam: TimeRangePayload,
    pub yamagandam: TimeRangePayload,
    #[serde(default)]
    pub kuligai: Option<TimeRangePayload>,
    #[serde(default)]
    pub gowri_nalla_neram: Option<Vec<TimeRangePayload>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRangePayload {
    pub start_time: String,
    pub end_time: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodStatusPayload {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub next_auspicious: Option<NextAuspiciousPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextAuspiciousPayload {
    pub name: String,
    /// Free text, not used for the target date.
    #[serde(default)]
    pub date: Option<String>,
    pub days_away: i64,
}

// ==================== Enumerant Fallbacks ====================

/// Match `raw` through `lookup`, or log and use `default`.
fn or_default<T: std::fmt::Debug>(field: &'static str, raw: &str, lookup: Option<T>, default: T) -> T {
    lookup.unwrap_or_else(|| {
        warn!(field, value = raw, fallback = ?default, "Unknown enumerant, using default");
        default
    })
}

pub fn tamil_month_or_default(raw: &str) -> TamilMonth {
    or_default("tamilDate.month", raw, TamilMonth::from_name(raw), TamilMonth::Thai)
}

pub fn vaaram_or_default(raw: &str) -> Vaaram {
    or_default("tamilDate.weekday", raw, Vaaram::from_name(raw), Vaaram::Nyayiru)
}

pub fn nakshatram_or_default(raw: &str) -> NakshatramName {
    or_default("nakshatram.name", raw, NakshatramName::from_name(raw), NakshatramName::Rohini)
}

pub fn thithi_or_default(raw: &str) -> ThithiName {
    or_default("thithi.name", raw, ThithiName::from_name(raw), ThithiName::Panchami)
}

/// Anything other than a recognised Shukla tag reads as Krishna.
pub fn paksha_or_default(raw: &str) -> Paksha {
    or_default("thithi.paksha", raw, Paksha::from_name(raw), Paksha::Krishna)
}

pub fn yogam_or_default(raw: &str) -> YogamName {
    or_default("yogam.name", raw, YogamName::from_name(raw), YogamName::Siddhi)
}

pub fn yogam_kind_or_default(raw: &str) -> YogamKind {
    or_default("yogam.type", raw, YogamKind::from_name(raw), YogamKind::Neutral)
}

pub fn karanam_or_default(raw: &str) -> KaranamName {
    or_default("karanam.name", raw, KaranamName::from_name(raw), KaranamName::Bava)
}

pub fn observance_or_default(raw: &str) -> ObservanceKind {
    or_default("foodStatus.nextAuspicious.name", raw, ObservanceKind::from_name(raw), ObservanceKind::Ekadasi)
}

pub fn dietary_category_or_default(raw: &str) -> DietaryCategory {
    let category = match raw.trim().to_ascii_uppercase().as_str() {
        "REGULAR" => Some(DietaryCategory::Regular),
        "FASTING" | "STRICT_FAST" => Some(DietaryCategory::StrictFast),
        "AVOID_NON_VEG" => Some(DietaryCategory::AvoidNonVeg),
        "SPECIAL" | "MULTIPLE_OBSERVANCES" => Some(DietaryCategory::MultipleObservances),
        _ => None,
    };
    or_default("foodStatus.type", raw, category, DietaryCategory::Regular)
}

// ==================== Instants ====================

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

fn required_instant(field: &'static str, raw: &str) -> Result<DateTime<Utc>, MapError> {
    parse_instant(raw).ok_or_else(|| MapError::InvalidInstant {
        field,
        value: raw.to_string(),
    })
}

/// Local midnight of `date` in `tz`.
fn start_of_day(tz: Tz, date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

struct DayContext<'a> {
    date: NaiveDate,
    location: &'a Location,
}

impl DayContext<'_> {
    /// Parse a cosmetic instant, substituting local midnight of the day.
    fn lenient_instant(&self, field: &'static str, raw: &str) -> DateTime<Utc> {
        parse_instant(raw).unwrap_or_else(|| {
            warn!(field, value = raw, "Unparseable instant, using start of day");
            start_of_day(self.location.tz(), self.date)
        })
    }

    fn window(&self, kind: WindowKind, index: usize, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<TimeWindow, ModelError> {
        let id = stable_window_id(self.location.id(), self.date, kind.name(), index);
        TimeWindow::new_with_id(id, start, end, Some(kind))
    }

    fn required_window(
        &self,
        kind: WindowKind,
        start_field: &'static str,
        end_field: &'static str,
        raw: &TimeRangePayload,
    ) -> Result<TimeWindow, MapError> {
        let start = required_instant(start_field, &raw.start_time)?;
        let end = required_instant(end_field, &raw.end_time)?;
        Ok(self.window(kind, 0, start, end)?)
    }

    /// Keep well-formed entries, drop the rest.
    fn optional_windows(&self, kind: WindowKind, raw: &[TimeRangePayload]) -> Vec<TimeWindow> {
        raw.iter()
            .enumerate()
            .filter_map(|(i, range)| self.optional_window(kind, i, range))
            .collect()
    }

    fn optional_window(&self, kind: WindowKind, index: usize, raw: &TimeRangePayload) -> Option<TimeWindow> {
        let parsed = parse_instant(&raw.start_time)
            .zip(parse_instant(&raw.end_time))
            .and_then(|(start, end)| self.window(kind, index, start, end).ok());
        if parsed.is_none() {
            warn!(
                kind = kind.name(),
                index,
                start = %raw.start_time,
                end = %raw.end_time,
                "Dropping malformed window"
            );
        }
        parsed
    }
}

// ==================== Mapping ====================

fn map_tamil_date(raw: &TamilDatePayload, date: NaiveDate) -> Result<TamilDate, ModelError> {
    let day = raw.day.clamp(1, 30);
    if day != raw.day {
        warn!(day = raw.day, clamped = day, "Tamil day out of range");
    }
    let year = TamilYear::from_name(&raw.year).unwrap_or_else(|| {
        warn!(year = %raw.year, "Unknown Tamil year, deriving from date");
        TamilYear::for_date(date)
    });
    TamilDate::new(day as u32, tamil_month_or_default(&raw.month), year, vaaram_or_default(&raw.weekday))
}

fn map_food_status(raw: &FoodStatusPayload, date: NaiveDate) -> DietaryStatus {
    let next = raw.next_auspicious.as_ref().and_then(|next| {
        let target = TimeDelta::try_days(next.days_away).and_then(|delta| date.checked_add_signed(delta));
        let Some(target) = target else {
            warn!(days_away = next.days_away, "Next observance out of range, dropping it");
            return None;
        };
        Some(UpcomingObservance::new(
            next.name.clone(),
            observance_or_default(&next.name),
            target,
            date,
        ))
    });
    DietaryStatus::new(dietary_category_or_default(&raw.kind), raw.message.clone(), next)
}

/// Map a decoded response for `location` into a complete day.
pub fn map(raw: &PanchangamResponse, location: &Location) -> Result<PanchangamDay, MapError> {
    let date = NaiveDate::parse_from_str(raw.date.trim(), "%Y-%m-%d")
        .map_err(|_| MapError::InvalidDate(raw.date.clone()))?;
    let ctx = DayContext { date, location };
    let timings = &raw.timings;

    let sunrise = required_instant("timings.sunrise", &timings.sunrise)?;
    let sunset = required_instant("timings.sunset", &timings.sunset)?;
    let rahu = ctx.required_window(
        WindowKind::Rahu,
        "timings.rahukaalam.startTime",
        "timings.rahukaalam.endTime",
        &timings.rahukaalam,
    )?;
    let yama = ctx.required_window(
        WindowKind::Yama,
        "timings.yamagandam.startTime",
        "timings.yamagandam.endTime",
        &timings.yamagandam,
    )?;

    let nakshatram = {
        let name = nakshatram_or_default(&raw.nakshatram.name);
        let end = ctx.lenient_instant("nakshatram.endTime", &raw.nakshatram.end_time);
        match raw.nakshatram.lord.as_deref().map(str::trim) {
            Some(lord) if !lord.is_empty() => Nakshatram::new(name, end).with_lord(lord),
            _ => Nakshatram::new(name, end),
        }
    };

    let thithi = Thithi::new(
        thithi_or_default(&raw.thithi.name),
        paksha_or_default(&raw.thithi.paksha),
        ctx.lenient_instant("thithi.endTime", &raw.thithi.end_time),
    );

    let yogam = {
        let start = ctx.lenient_instant("yogam.startTime", &raw.yogam.start_time);
        // An unreadable end collapses the span onto its start.
        let end = match parse_instant(&raw.yogam.end_time) {
            Some(end) if end < start => {
                warn!(start = %start, end = %end, "Yogam ends before it starts, using start");
                start
            }
            Some(end) => end,
            None => {
                warn!(value = %raw.yogam.end_time, "Unparseable yogam end, using start");
                start
            }
        };
        Yogam::new(yogam_or_default(&raw.yogam.name), start, end)?.with_kind(yogam_kind_or_default(&raw.yogam.kind))
    };

    let karanam = Karanam::new(
        karanam_or_default(&raw.karanam.name),
        ctx.lenient_instant("karanam.endTime", &raw.karanam.end_time),
    );

    let kuligai = timings
        .kuligai
        .as_ref()
        .and_then(|range| ctx.optional_window(WindowKind::Kuligai, 0, range));
    let gowri = timings
        .gowri_nalla_neram
        .as_deref()
        .map(|ranges| ctx.optional_windows(WindowKind::Gowri, ranges))
        .unwrap_or_default();

    let status = map_food_status(&raw.food_status, date);
    let upcoming = status.next_observance().cloned();

    PanchangamDay::builder()
        .date(date)
        .tamil_date(map_tamil_date(&raw.tamil_date, date)?)
        .location(location.clone())
        .nakshatram(nakshatram)
        .thithi(thithi)
        .yogam(yogam)
        .karanam(karanam)
        .sun(sunrise, sunset)
        .auspicious_windows(ctx.optional_windows(WindowKind::Auspicious, &timings.nalla_neram))
        .rahu_window(rahu)
        .yama_window(yama)
        .kuligai_window(kuligai)
        .supplementary_windows(gowri)
        .dietary_status(status)
        .upcoming_observance(upcoming)
        .build()
        .map_err(MapError::from)
}
