//! Temporal resolution: which window is active now, how long it has left,
//! and how instants are rendered for display.

use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::model::{PanchangamDay, TimeWindow, Yogam};

/// Which of the day's windows matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowSlot {
    Rahu,
    Yama,
    Kuligai,
    /// Index into [`PanchangamDay::auspicious_windows`].
    Auspicious(usize),
}

impl WindowSlot {
    pub fn is_auspicious(self) -> bool {
        matches!(self, WindowSlot::Auspicious(_))
    }
}

/// The window in effect at an instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveWindow<'a> {
    pub window: &'a TimeWindow,
    pub slot: WindowSlot,
    pub is_auspicious: bool,
}

/// Returns the first window containing `now`, checking Rahu, then Yama, then
/// Kuligai, then each auspicious window in list order. Inauspicious windows
/// win ties. Supplementary windows are not considered.
pub fn resolve_active_window(day: &PanchangamDay, now: DateTime<Utc>) -> Option<ActiveWindow<'_>> {
    let fixed = [
        (Some(day.rahu_window()), WindowSlot::Rahu),
        (Some(day.yama_window()), WindowSlot::Yama),
        (day.kuligai_window(), WindowSlot::Kuligai),
    ];
    let auspicious = day
        .auspicious_windows()
        .iter()
        .enumerate()
        .map(|(i, w)| (Some(w), WindowSlot::Auspicious(i)));

    fixed
        .into_iter()
        .chain(auspicious)
        .filter_map(|(window, slot)| window.map(|w| (w, slot)))
        .find(|(window, _)| window.contains(now))
        .map(|(window, slot)| ActiveWindow {
            window,
            slot,
            is_auspicious: slot.is_auspicious(),
        })
}

/// Inclusive at both ends.
pub fn is_element_active(yogam: &Yogam, now: DateTime<Utc>) -> bool {
    yogam.is_active_at(now)
}

/// Time left in `window`, or `None` if `now` is outside it.
pub fn remaining(window: &TimeWindow, now: DateTime<Utc>) -> Option<TimeDelta> {
    window.contains(now).then(|| window.end() - now)
}

/// "1h 5m remaining" at an hour or more, "25m remaining" below.
pub fn format_remaining(remaining: TimeDelta) -> String {
    let minutes = remaining.num_minutes();
    if minutes >= 60 {
        format!("{}h {}m remaining", minutes / 60, minutes % 60)
    } else {
        format!("{minutes}m remaining")
    }
}

impl PanchangamDay {
    pub fn active_window(&self, now: DateTime<Utc>) -> Option<ActiveWindow<'_>> {
        resolve_active_window(self, now)
    }

    pub fn is_currently_auspicious(&self, now: DateTime<Utc>) -> bool {
        self.active_window(now).is_some_and(|a| a.is_auspicious)
    }

    pub fn is_currently_inauspicious(&self, now: DateTime<Utc>) -> bool {
        self.active_window(now).is_some_and(|a| !a.is_auspicious)
    }
}

// ==================== Display ====================

/// 12-hour or 24-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "12h")]
    TwelveHour,
    #[serde(rename = "24h")]
    TwentyFourHour,
}

impl TimeFormat {
    fn pattern(self) -> &'static str {
        match self {
            TimeFormat::TwelveHour => "%-I:%M %p",
            TimeFormat::TwentyFourHour => "%H:%M",
        }
    }
}

/// Which zone times are shown in, as a stored user preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimezoneDisplayMode {
    /// The zone of the location the Panchangam is for.
    #[default]
    Original,
    /// The zone of the device showing it.
    Device,
}

impl TimezoneDisplayMode {
    /// Bind the device zone, producing a mode [`format_instant`] can resolve
    /// without reading any ambient state.
    pub fn with_device(self, device: Tz) -> DisplayZone {
        match self {
            TimezoneDisplayMode::Original => DisplayZone::OriginalLocation,
            TimezoneDisplayMode::Device => DisplayZone::DeviceLocal(device),
        }
    }

    /// Whether displayed times differ in zone from the location's own.
    pub fn is_converted(self, location: Tz, device: Tz) -> bool {
        self == TimezoneDisplayMode::Device && location != device
    }
}

/// A display mode with its device zone already resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayZone {
    OriginalLocation,
    DeviceLocal(Tz),
}

impl DisplayZone {
    pub fn resolve(self, location_tz: Tz) -> Tz {
        match self {
            DisplayZone::OriginalLocation => location_tz,
            DisplayZone::DeviceLocal(tz) => tz,
        }
    }
}

pub fn format_instant(instant: DateTime<Utc>, zone: DisplayZone, location_tz: Tz, format: TimeFormat) -> String {
    instant
        .with_timezone(&zone.resolve(location_tz))
        .format(format.pattern())
        .to_string()
}

/// "6:42 AM - 7:30 AM"
pub fn format_range(window: &TimeWindow, zone: DisplayZone, location_tz: Tz, format: TimeFormat) -> String {
    format!(
        "{} - {}",
        format_instant(window.start(), zone, location_tz, format),
        format_instant(window.end(), zone, location_tz, format)
    )
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};
    use chrono_tz::{America, Asia};

    use super::*;
    use crate::fallback;
    use crate::model::{Location, WindowKind, YogamName};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 14, h, m, 0).unwrap()
    }

    fn day() -> PanchangamDay {
        let date = NaiveDate::from_ymd_opt(2026, 1, 14).unwrap();
        fallback::synthesize(date, &Location::chennai()).unwrap()
    }

    // ==================== Active Window ====================

    #[test]
    fn test_rahu_wins_over_overlapping_auspicious() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 14).unwrap();
        let base = fallback::synthesize(date, &Location::chennai()).unwrap();
        let rahu = base.rahu_window().clone();
        let overlapping = TimeWindow::new(rahu.start(), rahu.end(), Some(WindowKind::Auspicious)).unwrap();

        let mut json = serde_json::to_value(&base).unwrap();
        json["auspicious_windows"] = serde_json::to_value(vec![overlapping]).unwrap();
        let day: PanchangamDay = serde_json::from_value(json).unwrap();

        let active = resolve_active_window(&day, rahu.start()).unwrap();
        assert_eq!(active.slot, WindowSlot::Rahu);
        assert!(!active.is_auspicious);
    }

    #[test]
    fn test_auspicious_window_reported_as_auspicious() {
        let day = day();
        let first = &day.auspicious_windows()[0];
        let active = resolve_active_window(&day, first.start()).unwrap();
        assert_eq!(active.slot, WindowSlot::Auspicious(0));
        assert!(active.is_auspicious);
        assert!(day.is_currently_auspicious(first.start()));
    }

    #[test]
    fn test_no_window_active() {
        let day = day();
        // 03:00 local is before every window
        let early = Asia::Kolkata.with_ymd_and_hms(2026, 1, 14, 3, 0, 0).unwrap().with_timezone(&Utc);
        assert!(resolve_active_window(&day, early).is_none());
        assert!(!day.is_currently_auspicious(early));
        assert!(!day.is_currently_inauspicious(early));
    }

    #[test]
    fn test_supplementary_windows_ignored() {
        let day = day();
        for gowri in day.supplementary_windows() {
            if let Some(active) = resolve_active_window(&day, gowri.start()) {
                assert_ne!(active.window.kind(), Some(WindowKind::Gowri));
            }
        }
    }

    // ==================== Remaining ====================

    #[test]
    fn test_remaining_inside_window() {
        let w = TimeWindow::new(at(10, 0), at(11, 30), None).unwrap();
        assert_eq!(remaining(&w, at(10, 25)), Some(TimeDelta::minutes(65)));
        assert_eq!(remaining(&w, at(11, 30)), Some(TimeDelta::zero()));
        assert_eq!(remaining(&w, at(11, 31)), None);
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(TimeDelta::minutes(65)), "1h 5m remaining");
        assert_eq!(format_remaining(TimeDelta::minutes(60)), "1h 0m remaining");
        assert_eq!(format_remaining(TimeDelta::minutes(25)), "25m remaining");
    }

    #[test]
    fn test_is_element_active() {
        let yogam = Yogam::new(YogamName::Siddhi, at(3, 0), at(8, 45)).unwrap();
        assert!(is_element_active(&yogam, at(3, 0)));
        assert!(is_element_active(&yogam, at(8, 45)));
        assert!(!is_element_active(&yogam, at(8, 46)));
    }

    // ==================== Formatting ====================

    #[test]
    fn test_format_instant_in_location_zone() {
        let instant = at(1, 12); // 06:42 IST
        let zone = TimezoneDisplayMode::Original.with_device(America::New_York);
        assert_eq!(format_instant(instant, zone, Asia::Kolkata, TimeFormat::TwelveHour), "6:42 AM");
        assert_eq!(format_instant(instant, zone, Asia::Kolkata, TimeFormat::TwentyFourHour), "06:42");
    }

    #[test]
    fn test_format_instant_in_device_zone() {
        let instant = at(1, 12); // 20:12 previous day in New York
        let zone = TimezoneDisplayMode::Device.with_device(America::New_York);
        assert_eq!(format_instant(instant, zone, Asia::Kolkata, TimeFormat::TwelveHour), "8:12 PM");
        assert_eq!(format_instant(instant, zone, Asia::Kolkata, TimeFormat::TwentyFourHour), "20:12");
    }

    #[test]
    fn test_format_range() {
        let w = TimeWindow::new(at(1, 12), at(2, 0), None).unwrap();
        let zone = DisplayZone::OriginalLocation;
        assert_eq!(format_range(&w, zone, Asia::Kolkata, TimeFormat::TwelveHour), "6:42 AM - 7:30 AM");
    }

    #[test]
    fn test_is_converted() {
        assert!(TimezoneDisplayMode::Device.is_converted(Asia::Kolkata, America::New_York));
        assert!(!TimezoneDisplayMode::Device.is_converted(Asia::Kolkata, Asia::Kolkata));
        assert!(!TimezoneDisplayMode::Original.is_converted(Asia::Kolkata, America::New_York));
    }

    #[test]
    fn test_time_format_serde_names() {
        assert_eq!(serde_json::to_string(&TimeFormat::TwentyFourHour).unwrap(), "\"24h\"");
        let parsed: TimezoneDisplayMode = serde_json::from_str("\"device\"").unwrap();
        assert_eq!(parsed, TimezoneDisplayMode::Device);
    }
}
