//! The aggregate day record.

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::{
    DietaryStatus, Karanam, Location, ModelError, Nakshatram, TamilDate, Thithi, TimeWindow, UpcomingObservance,
    Vaaram, Yogam, YogamKind,
};

/// A complete Panchangam for one date at one location.
///
/// Only obtainable through [`PanchangamDayBuilder::build`], which checks
/// every required part at once. A value of this type is never partial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PanchangamDayBuilder")]
pub struct PanchangamDay {
    date: NaiveDate,
    tamil_date: TamilDate,
    location: Location,
    nakshatram: Nakshatram,
    thithi: Thithi,
    yogam: Yogam,
    karanam: Karanam,
    sunrise: DateTime<Utc>,
    sunset: DateTime<Utc>,
    auspicious_windows: Vec<TimeWindow>,
    rahu_window: TimeWindow,
    yama_window: TimeWindow,
    kuligai_window: Option<TimeWindow>,
    supplementary_windows: Vec<TimeWindow>,
    dietary_status: DietaryStatus,
    upcoming_observance: Option<UpcomingObservance>,
}

impl PanchangamDay {
    pub fn builder() -> PanchangamDayBuilder {
        PanchangamDayBuilder::default()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn tamil_date(&self) -> &TamilDate {
        &self.tamil_date
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn nakshatram(&self) -> &Nakshatram {
        &self.nakshatram
    }

    pub fn thithi(&self) -> &Thithi {
        &self.thithi
    }

    pub fn yogam(&self) -> &Yogam {
        &self.yogam
    }

    pub fn karanam(&self) -> &Karanam {
        &self.karanam
    }

    pub fn sunrise(&self) -> DateTime<Utc> {
        self.sunrise
    }

    pub fn sunset(&self) -> DateTime<Utc> {
        self.sunset
    }

    /// Nalla Neram windows, never empty.
    pub fn auspicious_windows(&self) -> &[TimeWindow] {
        &self.auspicious_windows
    }

    pub fn rahu_window(&self) -> &TimeWindow {
        &self.rahu_window
    }

    pub fn yama_window(&self) -> &TimeWindow {
        &self.yama_window
    }

    pub fn kuligai_window(&self) -> Option<&TimeWindow> {
        self.kuligai_window.as_ref()
    }

    /// Extra auspicious windows such as Gowri Nalla Neram.
    pub fn supplementary_windows(&self) -> &[TimeWindow] {
        &self.supplementary_windows
    }

    pub fn dietary_status(&self) -> &DietaryStatus {
        &self.dietary_status
    }

    pub fn upcoming_observance(&self) -> Option<&UpcomingObservance> {
        self.upcoming_observance.as_ref()
    }

    /// Weekday of the Gregorian date.
    pub fn vaaram(&self) -> Vaaram {
        Vaaram::from(self.date.weekday())
    }

    pub fn day_length(&self) -> TimeDelta {
        self.sunset - self.sunrise
    }

    pub fn is_auspicious_day(&self) -> bool {
        self.yogam.kind() == YogamKind::Auspicious
    }
}

/// Collects the parts of a [`PanchangamDay`].
///
/// Also the deserialization form of the aggregate, so a decoded day passes
/// the same checks as one built in code.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PanchangamDayBuilder {
    date: Option<NaiveDate>,
    tamil_date: Option<TamilDate>,
    location: Option<Location>,
    nakshatram: Option<Nakshatram>,
    thithi: Option<Thithi>,
    yogam: Option<Yogam>,
    karanam: Option<Karanam>,
    sunrise: Option<DateTime<Utc>>,
    sunset: Option<DateTime<Utc>>,
    #[serde(default)]
    auspicious_windows: Vec<TimeWindow>,
    rahu_window: Option<TimeWindow>,
    yama_window: Option<TimeWindow>,
    kuligai_window: Option<TimeWindow>,
    #[serde(default)]
    supplementary_windows: Vec<TimeWindow>,
    dietary_status: Option<DietaryStatus>,
    upcoming_observance: Option<UpcomingObservance>,
}

impl PanchangamDayBuilder {
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn tamil_date(mut self, tamil_date: TamilDate) -> Self {
        self.tamil_date = Some(tamil_date);
        self
    }

    pub fn location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn nakshatram(mut self, nakshatram: Nakshatram) -> Self {
        self.nakshatram = Some(nakshatram);
        self
    }

    pub fn thithi(mut self, thithi: Thithi) -> Self {
        self.thithi = Some(thithi);
        self
    }

    pub fn yogam(mut self, yogam: Yogam) -> Self {
        self.yogam = Some(yogam);
        self
    }

    pub fn karanam(mut self, karanam: Karanam) -> Self {
        self.karanam = Some(karanam);
        self
    }

    pub fn sun(mut self, sunrise: DateTime<Utc>, sunset: DateTime<Utc>) -> Self {
        self.sunrise = Some(sunrise);
        self.sunset = Some(sunset);
        self
    }

    pub fn auspicious_windows(mut self, windows: Vec<TimeWindow>) -> Self {
        self.auspicious_windows = windows;
        self
    }

    pub fn rahu_window(mut self, window: TimeWindow) -> Self {
        self.rahu_window = Some(window);
        self
    }

    pub fn yama_window(mut self, window: TimeWindow) -> Self {
        self.yama_window = Some(window);
        self
    }

    pub fn kuligai_window(mut self, window: Option<TimeWindow>) -> Self {
        self.kuligai_window = window;
        self
    }

    pub fn supplementary_windows(mut self, windows: Vec<TimeWindow>) -> Self {
        self.supplementary_windows = windows;
        self
    }

    pub fn dietary_status(mut self, status: DietaryStatus) -> Self {
        self.dietary_status = Some(status);
        self
    }

    pub fn upcoming_observance(mut self, observance: Option<UpcomingObservance>) -> Self {
        self.upcoming_observance = observance;
        self
    }

    pub fn build(self) -> Result<PanchangamDay, ModelError> {
        let sunrise = self.sunrise.ok_or(ModelError::MissingField("sunrise"))?;
        let sunset = self.sunset.ok_or(ModelError::MissingField("sunset"))?;
        if sunrise >= sunset {
            return Err(ModelError::SunriseNotBeforeSunset { sunrise, sunset });
        }
        if self.auspicious_windows.is_empty() {
            return Err(ModelError::NoAuspiciousWindow);
        }

        Ok(PanchangamDay {
            date: self.date.ok_or(ModelError::MissingField("date"))?,
            tamil_date: self.tamil_date.ok_or(ModelError::MissingField("tamil_date"))?,
            location: self.location.ok_or(ModelError::MissingField("location"))?,
            nakshatram: self.nakshatram.ok_or(ModelError::MissingField("nakshatram"))?,
            thithi: self.thithi.ok_or(ModelError::MissingField("thithi"))?,
            yogam: self.yogam.ok_or(ModelError::MissingField("yogam"))?,
            karanam: self.karanam.ok_or(ModelError::MissingField("karanam"))?,
            sunrise,
            sunset,
            auspicious_windows: self.auspicious_windows,
            rahu_window: self.rahu_window.ok_or(ModelError::MissingField("rahu_window"))?,
            yama_window: self.yama_window.ok_or(ModelError::MissingField("yama_window"))?,
            kuligai_window: self.kuligai_window,
            supplementary_windows: self.supplementary_windows,
            dietary_status: self.dietary_status.ok_or(ModelError::MissingField("dietary_status"))?,
            upcoming_observance: self.upcoming_observance,
        })
    }
}

impl TryFrom<PanchangamDayBuilder> for PanchangamDay {
    type Error = ModelError;

    fn try_from(builder: PanchangamDayBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::model::{
        KaranamName, NakshatramName, Paksha, TamilMonth, TamilYear, ThithiName, WindowKind, YogamName,
    };

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 14, h, m, 0).unwrap()
    }

    fn window(h1: u32, h2: u32, kind: WindowKind) -> TimeWindow {
        TimeWindow::new(at(h1, 0), at(h2, 0), Some(kind)).unwrap()
    }

    fn complete() -> PanchangamDayBuilder {
        let date = NaiveDate::from_ymd_opt(2026, 1, 14).unwrap();
        PanchangamDay::builder()
            .date(date)
            .tamil_date(
                TamilDate::new(1, TamilMonth::Thai, TamilYear::for_date(date), Vaaram::Budhan).unwrap(),
            )
            .location(Location::chennai())
            .nakshatram(Nakshatram::new(NakshatramName::Rohini, at(9, 15)))
            .thithi(Thithi::new(ThithiName::Panchami, Paksha::Shukla, at(11, 0)))
            .yogam(Yogam::new(YogamName::Siddhi, at(3, 0), at(8, 45)).unwrap())
            .karanam(Karanam::new(KaranamName::Bava, at(4, 45)))
            .sun(at(1, 12), at(12, 24))
            .auspicious_windows(vec![window(3, 5, WindowKind::Auspicious)])
            .rahu_window(window(6, 8, WindowKind::Rahu))
            .yama_window(window(2, 3, WindowKind::Yama))
            .dietary_status(DietaryStatus::regular())
    }

    #[test]
    fn test_build_complete_day() {
        let day = complete().build().unwrap();
        assert_eq!(day.vaaram(), Vaaram::Budhan);
        assert!(day.kuligai_window().is_none());
        assert!(day.is_auspicious_day());
        assert_eq!(day.day_length(), TimeDelta::minutes(11 * 60 + 12));
    }

    #[test]
    fn test_missing_rahu_fails() {
        let mut builder = complete();
        builder.rahu_window = None;
        assert_eq!(builder.build().unwrap_err(), ModelError::MissingField("rahu_window"));
    }

    #[test]
    fn test_empty_auspicious_list_fails() {
        let result = complete().auspicious_windows(vec![]).build();
        assert_eq!(result.unwrap_err(), ModelError::NoAuspiciousWindow);
    }

    #[test]
    fn test_sunrise_after_sunset_fails() {
        let result = complete().sun(at(12, 0), at(1, 0)).build();
        assert!(matches!(result, Err(ModelError::SunriseNotBeforeSunset { .. })));
    }

    #[test]
    fn test_serde_round_trip() {
        let day = complete()
            .kuligai_window(Some(window(5, 6, WindowKind::Kuligai)))
            .build()
            .unwrap();
        let json = serde_json::to_string(&day).unwrap();
        let back: PanchangamDay = serde_json::from_str(&json).unwrap();
        assert_eq!(back, day);
    }

    #[test]
    fn test_deserialize_rejects_incomplete_day() {
        let day = complete().build().unwrap();
        let mut value = serde_json::to_value(&day).unwrap();
        value.as_object_mut().unwrap().remove("yama_window");
        assert!(serde_json::from_value::<PanchangamDay>(value).is_err());
    }
}
