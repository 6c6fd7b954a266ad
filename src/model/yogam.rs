use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::{ModelError, Tint, lookup_by_name};

/// Quality of a Yogam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YogamKind {
    Auspicious,
    Inauspicious,
    Neutral,
}

impl YogamKind {
    pub const ALL: [YogamKind; 3] = [YogamKind::Auspicious, YogamKind::Inauspicious, YogamKind::Neutral];

    pub fn name(self) -> &'static str {
        match self {
            YogamKind::Auspicious => "Auspicious",
            YogamKind::Inauspicious => "Inauspicious",
            YogamKind::Neutral => "Neutral",
        }
    }

    pub fn from_name(raw: &str) -> Option<Self> {
        lookup_by_name(&Self::ALL, Self::name, raw)
    }

    pub fn label(self) -> &'static str {
        match self {
            YogamKind::Auspicious => "AUSPICIOUS",
            YogamKind::Inauspicious => "AVOID",
            YogamKind::Neutral => "NEUTRAL",
        }
    }

    pub fn tint(self) -> Tint {
        match self {
            YogamKind::Auspicious => Tint::Green,
            YogamKind::Inauspicious => Tint::Red,
            YogamKind::Neutral => Tint::Orange,
        }
    }

    pub fn icon_name(self) -> &'static str {
        match self {
            YogamKind::Auspicious => "checkmark.seal.fill",
            YogamKind::Inauspicious => "xmark.seal.fill",
            YogamKind::Neutral => "minus.circle.fill",
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            YogamKind::Auspicious => {
                "Excellent for new ventures, important decisions, and auspicious activities"
            }
            YogamKind::Inauspicious => "Avoid starting important work or making major decisions",
            YogamKind::Neutral => "Suitable for routine activities, moderate for new ventures",
        }
    }
}

/// The 27 Yogams, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YogamName {
    Vishkumbham,
    Priti,
    Ayushman,
    Saubhagya,
    Sobhanam,
    Atiganda,
    Sukarma,
    Dhriti,
    Soola,
    Ganda,
    Vriddhi,
    Dhruva,
    Vyagatha,
    Harshana,
    Vajra,
    Siddhi,
    Vyatipata,
    Variyan,
    Parigha,
    Siva,
    Siddha,
    Sadhya,
    Subha,
    Sukla,
    Brahma,
    Indra,
    Vaidhriti,
}

impl YogamName {
    pub const ALL: [YogamName; 27] = [
        YogamName::Vishkumbham,
        YogamName::Priti,
        YogamName::Ayushman,
        YogamName::Saubhagya,
        YogamName::Sobhanam,
        YogamName::Atiganda,
        YogamName::Sukarma,
        YogamName::Dhriti,
        YogamName::Soola,
        YogamName::Ganda,
        YogamName::Vriddhi,
        YogamName::Dhruva,
        YogamName::Vyagatha,
        YogamName::Harshana,
        YogamName::Vajra,
        YogamName::Siddhi,
        YogamName::Vyatipata,
        YogamName::Variyan,
        YogamName::Parigha,
        YogamName::Siva,
        YogamName::Siddha,
        YogamName::Sadhya,
        YogamName::Subha,
        YogamName::Sukla,
        YogamName::Brahma,
        YogamName::Indra,
        YogamName::Vaidhriti,
    ];

    pub fn name(self) -> &'static str {
        match self {
            YogamName::Vishkumbham => "Vishkumbham",
            YogamName::Priti => "Priti",
            YogamName::Ayushman => "Ayushman",
            YogamName::Saubhagya => "Saubhagya",
            YogamName::Sobhanam => "Sobhanam",
            YogamName::Atiganda => "Atiganda",
            YogamName::Sukarma => "Sukarma",
            YogamName::Dhriti => "Dhriti",
            YogamName::Soola => "Soola",
            YogamName::Ganda => "Ganda",
            YogamName::Vriddhi => "Vriddhi",
            YogamName::Dhruva => "Dhruva",
            YogamName::Vyagatha => "Vyagatha",
            YogamName::Harshana => "Harshana",
            YogamName::Vajra => "Vajra",
            YogamName::Siddhi => "Siddhi",
            YogamName::Vyatipata => "Vyatipata",
            YogamName::Variyan => "Variyan",
            YogamName::Parigha => "Parigha",
            YogamName::Siva => "Siva",
            YogamName::Siddha => "Siddha",
            YogamName::Sadhya => "Sadhya",
            YogamName::Subha => "Subha",
            YogamName::Sukla => "Sukla",
            YogamName::Brahma => "Brahma",
            YogamName::Indra => "Indra",
            YogamName::Vaidhriti => "Vaidhriti",
        }
    }

    pub fn from_name(raw: &str) -> Option<Self> {
        lookup_by_name(&Self::ALL, Self::name, raw)
    }

    /// Position in the 27-yogam cycle (1-27).
    pub fn position(self) -> u32 {
        self as u32 + 1
    }

    pub fn default_kind(self) -> YogamKind {
        use YogamName::*;
        match self {
            Priti | Ayushman | Saubhagya | Sobhanam | Sukarma | Dhriti | Vriddhi | Dhruva
            | Harshana | Siddhi | Variyan | Siva | Siddha | Sadhya | Subha | Sukla | Brahma
            | Indra => YogamKind::Auspicious,
            Vishkumbham | Atiganda | Soola | Ganda | Vyagatha | Vajra | Vyatipata | Parigha
            | Vaidhriti => YogamKind::Inauspicious,
        }
    }

    pub fn default_description(self) -> &'static str {
        match self {
            YogamName::Vishkumbham => "Obstacle-creating Yogam, avoid new beginnings",
            YogamName::Priti => "Love and affection Yogam, excellent for relationships",
            YogamName::Ayushman => "Long life Yogam, good for health matters",
            YogamName::Saubhagya => "Good fortune Yogam, highly auspicious",
            YogamName::Sobhanam => "Brightness Yogam, good for all activities",
            YogamName::Atiganda => "Danger Yogam, exercise caution",
            YogamName::Sukarma => "Good deeds Yogam, excellent for virtuous activities",
            YogamName::Dhriti => "Steadfastness Yogam, good for commitments",
            YogamName::Soola => "Thorn/Pain Yogam, avoid medical procedures",
            YogamName::Ganda => "Danger Yogam, proceed with caution",
            YogamName::Vriddhi => "Growth Yogam, excellent for expansion",
            YogamName::Dhruva => "Stable Yogam, good for permanent works",
            YogamName::Vyagatha => "Killing Yogam, avoid important activities",
            YogamName::Harshana => "Joy Yogam, excellent for celebrations",
            YogamName::Vajra => "Diamond/Hard Yogam, mixed results",
            YogamName::Siddhi => "Accomplishment Yogam, excellent for success",
            YogamName::Vyatipata => "Calamity Yogam, avoid all important work",
            YogamName::Variyan => "Comfort Yogam, good for relaxation",
            YogamName::Parigha => "Obstruction Yogam, face obstacles",
            YogamName::Siva => "Auspicious Yogam, excellent for all activities",
            YogamName::Siddha => "Perfection Yogam, accomplishment assured",
            YogamName::Sadhya => "Achievable Yogam, goals can be reached",
            YogamName::Subha => "Auspicious Yogam, good for ceremonies",
            YogamName::Sukla => "Bright Yogam, clarity and success",
            YogamName::Brahma => "Creator Yogam, excellent for new ventures",
            YogamName::Indra => "King Yogam, authority and success",
            YogamName::Vaidhriti => "Great Calamity Yogam, avoid all important activities",
        }
    }
}

/// The Yogam in effect over a bounded interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "YogamRecord")]
pub struct Yogam {
    name: YogamName,
    kind: YogamKind,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    description: String,
}

#[derive(Deserialize)]
struct YogamRecord {
    name: YogamName,
    kind: YogamKind,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    description: String,
}

impl TryFrom<YogamRecord> for Yogam {
    type Error = ModelError;

    fn try_from(r: YogamRecord) -> Result<Self, Self::Error> {
        Ok(Yogam::new(r.name, r.start_time, r.end_time)?
            .with_kind(r.kind)
            .with_description(r.description))
    }
}

impl Yogam {
    /// Classification and description default to the name's traditional ones.
    pub fn new(name: YogamName, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Result<Self, ModelError> {
        if end_time < start_time {
            return Err(ModelError::IntervalReversed {
                start: start_time,
                end: end_time,
            });
        }
        Ok(Self {
            name,
            kind: name.default_kind(),
            start_time,
            end_time,
            description: name.default_description().to_string(),
        })
    }

    pub fn with_kind(self, kind: YogamKind) -> Self {
        Self { kind, ..self }
    }

    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..self
        }
    }

    pub fn name(&self) -> YogamName {
        self.name
    }

    pub fn kind(&self) -> YogamKind {
        self.kind
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn duration(&self) -> TimeDelta {
        self.end_time - self.start_time
    }

    /// Inclusive at both ends.
    pub fn is_active_at(&self, instant: DateTime<Utc>) -> bool {
        self.start_time <= instant && instant <= self.end_time
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
    fn test_default_kind_and_description() {
        let y = Yogam::new(YogamName::Siddhi, at(3, 0), at(8, 45)).unwrap();
        assert_eq!(y.kind(), YogamKind::Auspicious);
        assert_eq!(y.description(), "Accomplishment Yogam, excellent for success");

        let v = Yogam::new(YogamName::Vyatipata, at(3, 0), at(8, 45)).unwrap();
        assert_eq!(v.kind(), YogamKind::Inauspicious);
    }

    #[test]
    fn test_reversed_interval_rejected() {
        let result = Yogam::new(YogamName::Siddhi, at(9, 0), at(8, 0));
        assert!(matches!(result, Err(ModelError::IntervalReversed { .. })));
    }

    #[test]
    fn test_is_active_inclusive_both_ends() {
        let y = Yogam::new(YogamName::Priti, at(3, 0), at(8, 45)).unwrap();
        assert!(y.is_active_at(at(3, 0)));
        assert!(y.is_active_at(at(8, 45)));
        assert!(y.is_active_at(at(5, 0)));
        assert!(!y.is_active_at(at(2, 59)));
        assert!(!y.is_active_at(at(8, 46)));
    }

    #[test]
    fn test_override_kind() {
        let y = Yogam::new(YogamName::Vajra, at(3, 0), at(4, 0))
            .unwrap()
            .with_kind(YogamKind::Neutral);
        assert_eq!(y.kind(), YogamKind::Neutral);
        assert_eq!(y.kind().tint(), Tint::Orange);
    }

    #[test]
    fn test_every_name_has_classification() {
        let auspicious = YogamName::ALL
            .iter()
            .filter(|n| n.default_kind() == YogamKind::Auspicious)
            .count();
        assert_eq!(auspicious, 18);
        assert_eq!(YogamName::Vaidhriti.position(), 27);
    }
}
