//! Dietary-status derivation and the next-observance lookahead.

use chrono::{Datelike, NaiveDate, TimeDelta};

use crate::model::{
    DietaryCategory, DietaryPreference, DietaryStatus, ObservanceKind, Thithi, ThithiName, UpcomingObservance,
};

/// Reason shown when a vegetarian's effective status is downgraded.
pub const NO_DIETARY_CONCERNS: &str = "No dietary concerns";

/// Lookahead window within which Ekadasi is proposed as the next observance.
const EKADASI_LOOKAHEAD_DAYS: u32 = 3;

/// Derive the day's status from its Thithi.
///
/// Ekadasi in either fortnight is a strict fast. Any other Thithi that marks
/// an observance restricted to avoid-non-veg yields that category with the
/// observance's name as reason. Everything else is regular. The lookahead is
/// attached as `next_observance` for regular days only.
pub fn derive_status(thithi: &Thithi, date: NaiveDate) -> DietaryStatus {
    if thithi.name() == ThithiName::Ekadasi {
        return DietaryStatus::new(DietaryCategory::StrictFast, None, None);
    }

    match thithi.special_observance() {
        Some(kind) if kind.restriction() == DietaryCategory::AvoidNonVeg => {
            DietaryStatus::new(DietaryCategory::AvoidNonVeg, Some(kind.name().to_string()), None)
        }
        _ => DietaryStatus::new(DietaryCategory::Regular, None, next_observance(date)),
    }
}

/// Forward distance (0-14) from `date` to the next day whose day-of-month
/// mod 15 equals `target`.
fn cycle_distance(date: NaiveDate, target: u32) -> u32 {
    (target + 15 - date.day() % 15) % 15
}

/// Simplified lookahead keyed on day-of-month mod 15.
///
/// Returns `None` on an Ekadasi day itself. Proposes Ekadasi when it is at
/// most three days away, otherwise the next Pradosham.
pub fn next_observance(date: NaiveDate) -> Option<UpcomingObservance> {
    let to_ekadasi = cycle_distance(date, 11);
    if to_ekadasi == 0 {
        return None;
    }
    let (kind, days) = if to_ekadasi <= EKADASI_LOOKAHEAD_DAYS {
        (ObservanceKind::Ekadasi, to_ekadasi)
    } else {
        (ObservanceKind::Pradosham, cycle_distance(date, 13))
    };
    let target = date.checked_add_signed(TimeDelta::days(i64::from(days)))?;
    Some(UpcomingObservance::new(kind.name(), kind, target, date))
}

/// The status as a given eater should see it. The stored status is never
/// modified; vegetarians see avoid-non-veg as regular, fasting stays.
pub fn effective_status(status: &DietaryStatus, preference: DietaryPreference) -> DietaryStatus {
    match (preference, status.category()) {
        (DietaryPreference::Vegetarian, DietaryCategory::AvoidNonVeg) => DietaryStatus::new(
            DietaryCategory::Regular,
            Some(NO_DIETARY_CONCERNS.to_string()),
            status.next_observance().cloned(),
        ),
        _ => status.clone(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::model::Paksha;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    fn thithi(name: ThithiName, paksha: Paksha) -> Thithi {
        Thithi::new(name, paksha, Utc.with_ymd_and_hms(2026, 1, 14, 11, 0, 0).unwrap())
    }

    // ==================== Derivation ====================

    #[test]
    fn test_ekadasi_is_strict_fast_in_both_fortnights() {
        for paksha in Paksha::ALL {
            let status = derive_status(&thithi(ThithiName::Ekadasi, paksha), date(14));
            assert_eq!(status.category(), DietaryCategory::StrictFast);
            assert_eq!(status.reason(), "Ekadasi or major fasting day");
        }
    }

    #[test]
    fn test_waning_trayodasi_is_avoid_non_veg() {
        let status = derive_status(&thithi(ThithiName::Trayodasi, Paksha::Krishna), date(14));
        assert_eq!(status.category(), DietaryCategory::AvoidNonVeg);
        assert_eq!(status.reason(), "Pradosham");
    }

    #[test]
    fn test_waxing_trayodasi_is_regular() {
        let status = derive_status(&thithi(ThithiName::Trayodasi, Paksha::Shukla), date(14));
        assert_eq!(status.category(), DietaryCategory::Regular);
    }

    #[test]
    fn test_moon_days_are_avoid_non_veg() {
        for (name, reason) in [
            (ThithiName::Amavasai, "Amavasai"),
            (ThithiName::Pournami, "Pournami"),
            (ThithiName::Ashtami, "Ashtami"),
            (ThithiName::Chaturthi, "Chaturthi"),
            (ThithiName::Sashti, "Sashti"),
        ] {
            let status = derive_status(&thithi(name, Paksha::Krishna), date(14));
            assert_eq!(status.category(), DietaryCategory::AvoidNonVeg, "{name:?}");
            assert_eq!(status.reason(), reason);
        }
    }

    #[test]
    fn test_ordinary_thithis_are_regular() {
        for name in [ThithiName::Prathama, ThithiName::Panchami, ThithiName::Navami, ThithiName::Dvadasi] {
            for paksha in Paksha::ALL {
                let status = derive_status(&thithi(name, paksha), date(14));
                assert_eq!(status.category(), DietaryCategory::Regular);
            }
        }
    }

    // ==================== Lookahead ====================

    #[test]
    fn test_lookahead_none_on_ekadasi_day() {
        assert!(next_observance(date(11)).is_none());
        assert!(next_observance(date(26)).is_none());
    }

    #[test]
    fn test_lookahead_proposes_ekadasi_within_three_days() {
        let next = next_observance(date(8)).unwrap();
        assert_eq!(next.kind(), ObservanceKind::Ekadasi);
        assert_eq!(next.date(), date(11));
        assert_eq!(next.days_until(), 3);
    }

    #[test]
    fn test_lookahead_proposes_pradosham_otherwise() {
        let next = next_observance(date(2)).unwrap();
        assert_eq!(next.kind(), ObservanceKind::Pradosham);
        assert_eq!(next.date(), date(13));
        assert_eq!(next.days_until(), 11);
    }

    #[test]
    fn test_lookahead_wraps_past_cycle() {
        // 14 mod 15 = 14; Ekadasi is 12 days on, Pradosham 14
        let next = next_observance(date(14)).unwrap();
        assert_eq!(next.kind(), ObservanceKind::Pradosham);
        assert_eq!(next.days_until(), 14);
    }

    // ==================== Vegetarian Override ====================

    #[test]
    fn test_vegetarian_downgrades_avoid_non_veg() {
        let stored = DietaryStatus::new(DietaryCategory::AvoidNonVeg, Some("Pradosham".into()), None);
        let effective = effective_status(&stored, DietaryPreference::Vegetarian);
        assert_eq!(effective.category(), DietaryCategory::Regular);
        assert_eq!(effective.reason(), NO_DIETARY_CONCERNS);
        assert_eq!(stored.category(), DietaryCategory::AvoidNonVeg);
    }

    #[test]
    fn test_vegetarian_keeps_strict_fast() {
        let stored = DietaryStatus::new(DietaryCategory::StrictFast, None, None);
        let effective = effective_status(&stored, DietaryPreference::Vegetarian);
        assert_eq!(effective, stored);
    }

    #[test]
    fn test_non_vegetarian_sees_stored_status() {
        let stored = DietaryStatus::new(DietaryCategory::AvoidNonVeg, None, None);
        assert_eq!(effective_status(&stored, DietaryPreference::NonVegetarian), stored);
    }
}
