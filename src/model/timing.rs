use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ModelError, Tint, lookup_by_name};

/// Category of a daily time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindowKind {
    /// Nalla Neram.
    Auspicious,
    Rahu,
    Yama,
    Kuligai,
    /// Gowri Nalla Neram.
    Gowri,
    /// Abhijit Muhurtam, around local noon.
    Midday,
    /// Brahma Muhurtam, before sunrise.
    Predawn,
}

impl WindowKind {
    pub const ALL: [WindowKind; 7] = [
        WindowKind::Auspicious,
        WindowKind::Rahu,
        WindowKind::Yama,
        WindowKind::Kuligai,
        WindowKind::Gowri,
        WindowKind::Midday,
        WindowKind::Predawn,
    ];

    pub fn name(self) -> &'static str {
        match self {
            WindowKind::Auspicious => "auspicious",
            WindowKind::Rahu => "rahu",
            WindowKind::Yama => "yama",
            WindowKind::Kuligai => "kuligai",
            WindowKind::Gowri => "gowri",
            WindowKind::Midday => "midday",
            WindowKind::Predawn => "predawn",
        }
    }

    pub fn from_name(raw: &str) -> Option<Self> {
        lookup_by_name(&Self::ALL, Self::name, raw)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            WindowKind::Auspicious => "Nalla Neram",
            WindowKind::Rahu => "Rahukaalam",
            WindowKind::Yama => "Yamagandam",
            WindowKind::Kuligai => "Kuligai",
            WindowKind::Gowri => "Gowri Nalla Neram",
            WindowKind::Midday => "Abhijit Muhurtam",
            WindowKind::Predawn => "Brahma Muhurtam",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            WindowKind::Auspicious => "Auspicious time for important activities",
            WindowKind::Rahu => "Inauspicious period ruled by Rahu, avoid new ventures",
            WindowKind::Yama => "Inauspicious period ruled by Yama, avoid travel",
            WindowKind::Kuligai => "Period ruled by Gulika, avoid important beginnings",
            WindowKind::Gowri => "Auspicious period from the Gowri Panchangam",
            WindowKind::Midday => "Victorious midday period, good for all work",
            WindowKind::Predawn => "Pre-dawn period ideal for meditation and study",
        }
    }

    pub fn is_auspicious(self) -> bool {
        match self {
            WindowKind::Auspicious | WindowKind::Gowri | WindowKind::Midday | WindowKind::Predawn => true,
            WindowKind::Rahu | WindowKind::Yama | WindowKind::Kuligai => false,
        }
    }

    pub fn tint(self) -> Tint {
        match self {
            WindowKind::Auspicious | WindowKind::Gowri => Tint::Green,
            WindowKind::Midday => Tint::Gold,
            WindowKind::Predawn => Tint::Blue,
            WindowKind::Rahu => Tint::Red,
            WindowKind::Yama | WindowKind::Kuligai => Tint::Orange,
        }
    }

    pub fn icon_name(self) -> &'static str {
        match self {
            WindowKind::Auspicious => "checkmark.circle.fill",
            WindowKind::Rahu => "exclamationmark.triangle.fill",
            WindowKind::Yama => "exclamationmark.circle.fill",
            WindowKind::Kuligai => "minus.circle.fill",
            WindowKind::Gowri => "star.circle.fill",
            WindowKind::Midday => "sun.max.fill",
            WindowKind::Predawn => "moon.stars.fill",
        }
    }
}

/// Namespace for window identifiers derived from (location, date, slot).
const WINDOW_NAMESPACE: Uuid = Uuid::from_u128(0x6d61_677a_685f_7769_6e64_6f77_5f69_6401);

/// A window identifier that is the same every time the same slot of the
/// same day at the same location is produced.
pub fn stable_window_id(location: Uuid, date: NaiveDate, slot: &str, index: usize) -> Uuid {
    let key = format!("{location}/{date}/{slot}/{index}");
    Uuid::new_v5(&WINDOW_NAMESPACE, key.as_bytes())
}

/// A bounded period of the day, inclusive at both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TimeWindowRecord")]
pub struct TimeWindow {
    id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    kind: Option<WindowKind>,
}

#[derive(Deserialize)]
struct TimeWindowRecord {
    id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    kind: Option<WindowKind>,
}

impl TryFrom<TimeWindowRecord> for TimeWindow {
    type Error = ModelError;

    fn try_from(r: TimeWindowRecord) -> Result<Self, Self::Error> {
        Ok(TimeWindow::new(r.start, r.end, r.kind)?.with_id(r.id))
    }
}

impl TimeWindow {
    /// A window with a fresh random id. Fails if `end` precedes `start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, kind: Option<WindowKind>) -> Result<Self, ModelError> {
        Self::new_with_id(Uuid::new_v4(), start, end, kind)
    }

    pub fn new_with_id(
        id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        kind: Option<WindowKind>,
    ) -> Result<Self, ModelError> {
        if end < start {
            return Err(ModelError::IntervalReversed { start, end });
        }
        Ok(Self { id, start, end, kind })
    }

    pub fn with_id(self, id: Uuid) -> Self {
        Self { id, ..self }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn kind(&self) -> Option<WindowKind> {
        self.kind
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// "1h 30m", "2h" or "45m".
    pub fn duration_label(&self) -> String {
        let minutes = self.duration_minutes();
        let (h, m) = (minutes / 60, minutes % 60);
        match (h, m) {
            (0, m) => format!("{m}m"),
            (h, 0) => format!("{h}h"),
            (h, m) => format!("{h}h {m}m"),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 14, h, m, 0).unwrap()
    }

    #[test]
    fn test_contains_is_inclusive() {
        let w = TimeWindow::new(at(10, 0), at(11, 30), Some(WindowKind::Rahu)).unwrap();
        assert!(w.contains(at(10, 0)));
        assert!(w.contains(at(11, 30)));
        assert!(!w.contains(at(9, 59)));
        assert!(!w.contains(at(11, 31)));
    }

    #[test]
    fn test_zero_length_window_allowed() {
        let w = TimeWindow::new(at(10, 0), at(10, 0), None).unwrap();
        assert!(w.contains(at(10, 0)));
        assert_eq!(w.duration_label(), "0m");
    }

    #[test]
    fn test_reversed_window_rejected() {
        let result = TimeWindow::new(at(11, 0), at(10, 0), None);
        assert!(matches!(result, Err(ModelError::IntervalReversed { .. })));
    }

    #[test]
    fn test_duration_label() {
        assert_eq!(TimeWindow::new(at(9, 0), at(10, 30), None).unwrap().duration_label(), "1h 30m");
        assert_eq!(TimeWindow::new(at(9, 0), at(11, 0), None).unwrap().duration_label(), "2h");
        assert_eq!(TimeWindow::new(at(9, 0), at(9, 45), None).unwrap().duration_label(), "45m");
    }

    #[test]
    fn test_deserialize_rejects_reversed() {
        let json = r#"{"id":"2f1c7a52-5b1a-4b9e-9d43-1f0a6a1b2c3d","start":"2026-01-14T11:00:00Z","end":"2026-01-14T10:00:00Z","kind":null}"#;
        assert!(serde_json::from_str::<TimeWindow>(json).is_err());
    }

    #[test]
    fn test_stable_window_id() {
        let loc = Uuid::nil();
        let day = NaiveDate::from_ymd_opt(2026, 1, 14).unwrap();
        assert_eq!(stable_window_id(loc, day, "rahu", 0), stable_window_id(loc, day, "rahu", 0));
        assert_ne!(stable_window_id(loc, day, "rahu", 0), stable_window_id(loc, day, "yama", 0));
        assert_ne!(stable_window_id(loc, day, "auspicious", 0), stable_window_id(loc, day, "auspicious", 1));
    }

    #[test]
    fn test_kind_metadata() {
        for kind in WindowKind::ALL {
            assert!(!kind.display_name().is_empty());
            assert_eq!(WindowKind::from_name(kind.name()), Some(kind));
        }
        assert!(!WindowKind::Rahu.is_auspicious());
        assert!(WindowKind::Gowri.is_auspicious());
    }

    // ==================== Property Tests ====================

    mod proptest_tests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn containment_matches_bounds(start in 0i64..86_400, len in 0i64..20_000, offset in -1_000i64..110_000) {
                let base = at(0, 0);
                let w = TimeWindow::new(
                    base + TimeDelta::seconds(start),
                    base + TimeDelta::seconds(start + len),
                    None,
                ).unwrap();
                let t = base + TimeDelta::seconds(offset);
                prop_assert_eq!(w.contains(t), w.start() <= t && t <= w.end());
            }

            #[test]
            fn serde_round_trip(start in 0i64..86_400, len in 0i64..20_000, kind_idx in 0usize..8) {
                let base = at(0, 0);
                let kind = WindowKind::ALL.get(kind_idx).copied();
                let w = TimeWindow::new(
                    base + TimeDelta::seconds(start),
                    base + TimeDelta::seconds(start + len),
                    kind,
                ).unwrap();
                let json = serde_json::to_string(&w).unwrap();
                let back: TimeWindow = serde_json::from_str(&json).unwrap();
                prop_assert_eq!(back, w);
            }
        }
    }
}
