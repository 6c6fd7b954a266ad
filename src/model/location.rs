use chrono::{DateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ModelError;

/// Namespace for the stable identifiers of catalog cities.
const CATALOG_NAMESPACE: Uuid = Uuid::from_u128(0x6d61_677a_685f_6c6f_6361_7469_6f6e_7301);

/// A geographic location for Panchangam calculations.
///
/// Coordinates are validated on construction and the timezone is always a
/// resolvable IANA zone. Locations are never mutated; the `with_*` methods
/// return a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LocationRecord")]
pub struct Location {
    id: Uuid,
    name: String,
    city: String,
    state: Option<String>,
    country: String,
    latitude: f64,
    longitude: f64,
    timezone: Tz,
}

/// Unvalidated wire form of a [`Location`].
#[derive(Deserialize)]
struct LocationRecord {
    id: Uuid,
    name: String,
    city: String,
    state: Option<String>,
    country: String,
    latitude: f64,
    longitude: f64,
    timezone: String,
}

impl TryFrom<LocationRecord> for Location {
    type Error = ModelError;

    fn try_from(r: LocationRecord) -> Result<Self, Self::Error> {
        Ok(Location::new(r.city, r.country, r.latitude, r.longitude, &r.timezone)?
            .with_id(r.id)
            .with_name(r.name)
            .with_state(r.state))
    }
}

impl Location {
    /// Create a location with a fresh identifier. The display name defaults
    /// to the city.
    pub fn new(
        city: impl Into<String>,
        country: impl Into<String>,
        latitude: f64,
        longitude: f64,
        timezone: &str,
    ) -> Result<Self, ModelError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ModelError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ModelError::LongitudeOutOfRange(longitude));
        }
        let timezone: Tz = timezone
            .parse()
            .map_err(|_| ModelError::UnknownTimezone(timezone.to_string()))?;
        let city = city.into();

        Ok(Self {
            id: Uuid::new_v4(),
            name: city.clone(),
            city,
            state: None,
            country: country.into(),
            latitude,
            longitude,
            timezone,
        })
    }

    pub fn with_id(self, id: Uuid) -> Self {
        Self { id, ..self }
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    pub fn with_state(self, state: Option<String>) -> Self {
        Self { state, ..self }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// The IANA identifier, e.g. `Asia/Kolkata`.
    pub fn timezone(&self) -> &'static str {
        self.timezone.name()
    }

    pub fn tz(&self) -> Tz {
        self.timezone
    }

    /// "Chennai, Tamil Nadu, India", or "London, United Kingdom" without a state.
    pub fn full_display_name(&self) -> String {
        match &self.state {
            Some(state) => format!("{}, {}, {}", self.city, state, self.country),
            None => format!("{}, {}", self.city, self.country),
        }
    }

    /// "Chennai, TA", or just the city without a state.
    pub fn short_display_name(&self) -> String {
        match &self.state {
            Some(state) => {
                let abbr: String = state.chars().take(2).collect::<String>().to_uppercase();
                format!("{}, {}", self.city, abbr)
            }
            None => self.city.clone(),
        }
    }

    /// UTC offset of the location's zone at `at`, formatted as "+05:30".
    pub fn utc_offset(&self, at: DateTime<Utc>) -> String {
        let seconds = self
            .timezone
            .offset_from_utc_datetime(&at.naive_utc())
            .fix()
            .local_minus_utc();
        let sign = if seconds < 0 { '-' } else { '+' };
        let seconds = seconds.abs();
        format!("{}{:02}:{:02}", sign, seconds / 3600, (seconds % 3600) / 60)
    }
}

// ==================== Popular Cities ====================

fn catalog_entry(
    name: Option<&str>,
    city: &str,
    state: Option<&str>,
    country: &str,
    latitude: f64,
    longitude: f64,
    timezone: Tz,
) -> Location {
    Location {
        id: Uuid::new_v5(&CATALOG_NAMESPACE, city.as_bytes()),
        name: name.unwrap_or(city).to_string(),
        city: city.to_string(),
        state: state.map(str::to_string),
        country: country.to_string(),
        latitude,
        longitude,
        timezone,
    }
}

impl Location {
    pub fn chennai() -> Self {
        catalog_entry(None, "Chennai", Some("Tamil Nadu"), "India", 13.0827, 80.2707, chrono_tz::Asia::Kolkata)
    }

    /// Pre-configured locations for quick selection, in display order.
    pub fn popular() -> Vec<Location> {
        use chrono_tz::{America, Asia, Australia, Europe};

        vec![
            Self::chennai(),
            catalog_entry(None, "Coimbatore", Some("Tamil Nadu"), "India", 11.0168, 76.9558, Asia::Kolkata),
            catalog_entry(None, "Madurai", Some("Tamil Nadu"), "India", 9.9252, 78.1198, Asia::Kolkata),
            catalog_entry(Some("Trichy"), "Tiruchirappalli", Some("Tamil Nadu"), "India", 10.7905, 78.7047, Asia::Kolkata),
            catalog_entry(None, "Bangalore", Some("Karnataka"), "India", 12.9716, 77.5946, Asia::Kolkata),
            catalog_entry(None, "Mumbai", Some("Maharashtra"), "India", 19.0760, 72.8777, Asia::Kolkata),
            catalog_entry(None, "New Delhi", Some("Delhi"), "India", 28.6139, 77.2090, Asia::Kolkata),
            catalog_entry(None, "New York", Some("NY"), "USA", 40.7128, -74.0060, America::New_York),
            catalog_entry(None, "London", None, "United Kingdom", 51.5074, -0.1278, Europe::London),
            catalog_entry(None, "Singapore", None, "Singapore", 1.3521, 103.8198, Asia::Singapore),
            catalog_entry(None, "Dubai", None, "UAE", 25.2048, 55.2708, Asia::Dubai),
            catalog_entry(None, "Toronto", Some("Ontario"), "Canada", 43.6532, -79.3832, America::Toronto),
            catalog_entry(None, "Sydney", Some("NSW"), "Australia", -33.8688, 151.2093, Australia::Sydney),
        ]
    }

    /// Find a catalog city by display name or city name, ignoring case.
    pub fn find_popular(query: &str) -> Option<Location> {
        let query = query.trim();
        Self::popular()
            .into_iter()
            .find(|l| l.name.eq_ignore_ascii_case(query) || l.city.eq_ignore_ascii_case(query))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_new_location_defaults_name_to_city() {
        let loc = Location::new("Madurai", "India", 9.9252, 78.1198, "Asia/Kolkata").unwrap();
        assert_eq!(loc.name(), "Madurai");
        assert_eq!(loc.timezone(), "Asia/Kolkata");
        assert!(loc.state().is_none());
    }

    #[test]
    fn test_latitude_out_of_range_rejected() {
        let result = Location::new("Nowhere", "X", 90.5, 0.0, "UTC");
        assert_eq!(result.unwrap_err(), ModelError::LatitudeOutOfRange(90.5));
    }

    #[test]
    fn test_longitude_out_of_range_rejected() {
        let result = Location::new("Nowhere", "X", 0.0, -180.1, "UTC");
        assert_eq!(result.unwrap_err(), ModelError::LongitudeOutOfRange(-180.1));
    }

    #[test]
    fn test_nan_coordinates_rejected() {
        assert!(Location::new("Nowhere", "X", f64::NAN, 0.0, "UTC").is_err());
    }

    #[test]
    fn test_boundary_coordinates_accepted() {
        assert!(Location::new("Pole", "X", 90.0, 180.0, "UTC").is_ok());
        assert!(Location::new("Pole", "X", -90.0, -180.0, "UTC").is_ok());
    }

    #[test]
    fn test_unknown_timezone_rejected() {
        let result = Location::new("Atlantis", "X", 0.0, 0.0, "Mars/Olympus");
        assert!(matches!(result, Err(ModelError::UnknownTimezone(_))));
    }

    #[test]
    fn test_display_names() {
        let chennai = Location::chennai();
        assert_eq!(chennai.full_display_name(), "Chennai, Tamil Nadu, India");
        assert_eq!(chennai.short_display_name(), "Chennai, TA");

        let london = Location::find_popular("london").unwrap();
        assert_eq!(london.full_display_name(), "London, United Kingdom");
        assert_eq!(london.short_display_name(), "London");
    }

    #[test]
    fn test_utc_offset_formatting() {
        let at = Utc.with_ymd_and_hms(2026, 1, 14, 0, 0, 0).unwrap();
        assert_eq!(Location::chennai().utc_offset(at), "+05:30");

        let new_york = Location::find_popular("New York").unwrap();
        assert_eq!(new_york.utc_offset(at), "-05:00");
    }

    #[test]
    fn test_catalog_ids_are_stable() {
        assert_eq!(Location::chennai().id(), Location::chennai().id());
        assert_eq!(Location::popular().len(), 13);
    }

    #[test]
    fn test_find_popular_by_display_name() {
        let trichy = Location::find_popular("Trichy").unwrap();
        assert_eq!(trichy.city(), "Tiruchirappalli");
        assert!(Location::find_popular("Gotham").is_none());
    }

    #[test]
    fn test_with_methods_return_new_values() {
        let base = Location::chennai();
        let renamed = base.clone().with_name("Madras");
        assert_eq!(base.name(), "Chennai");
        assert_eq!(renamed.name(), "Madras");
        assert_eq!(renamed.id(), base.id());
    }

    #[test]
    fn test_deserialize_validates_coordinates() {
        let json = r#"{
            "id": "2f1c7a52-5b1a-4b9e-9d43-1f0a6a1b2c3d",
            "name": "Bad", "city": "Bad", "state": null, "country": "X",
            "latitude": 123.0, "longitude": 0.0, "timezone": "UTC"
        }"#;
        assert!(serde_json::from_str::<Location>(json).is_err());
    }

    mod proptest_tests {
        use proptest::prelude::*;

        use super::*;

        const ZONES: [&str; 6] = [
            "Asia/Kolkata",
            "Asia/Singapore",
            "Europe/London",
            "America/New_York",
            "Australia/Sydney",
            "UTC",
        ];

        proptest! {
            #[test]
            fn serde_round_trip_preserves_location(
                latitude in -90.0f64..=90.0,
                longitude in -180.0f64..=180.0,
                zone in 0usize..ZONES.len(),
                state in proptest::option::of("[A-Za-z ]{1,16}"),
                city in "[A-Za-z]{1,20}",
            ) {
                let location = Location::new(city, "India", latitude, longitude, ZONES[zone])
                    .unwrap()
                    .with_state(state);
                let json = serde_json::to_string(&location).unwrap();
                let decoded: Location = serde_json::from_str(&json).unwrap();
                prop_assert_eq!(decoded, location);
            }

            #[test]
            fn catalog_cities_round_trip(index in 0usize..13) {
                let location = Location::popular()[index].clone();
                let json = serde_json::to_string(&location).unwrap();
                prop_assert_eq!(serde_json::from_str::<Location>(&json).unwrap(), location);
            }
        }
    }
}
