use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lookup_by_name;

/// The lunar mansion in effect, and when its span ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nakshatram {
    name: NakshatramName,
    end_time: DateTime<Utc>,
    /// Ruling planet. Defaults to the mansion's traditional lord.
    lord: String,
}

impl Nakshatram {
    pub fn new(name: NakshatramName, end_time: DateTime<Utc>) -> Self {
        Self {
            name,
            end_time,
            lord: name.lord().to_string(),
        }
    }

    pub fn with_lord(self, lord: impl Into<String>) -> Self {
        Self {
            lord: lord.into(),
            ..self
        }
    }

    pub fn name(&self) -> NakshatramName {
        self.name
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    pub fn lord(&self) -> &str {
        &self.lord
    }
}

/// The 27 lunar mansions, in cycle order from Ashwini.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NakshatramName {
    Ashwini,
    Bharani,
    Krithigai,
    Rohini,
    Mrigashirisham,
    Thiruvathirai,
    Punarpoosam,
    Poosam,
    Ayilyam,
    Magam,
    Pooram,
    Uthiram,
    Hastham,
    Chithirai,
    Swathi,
    Visagam,
    Anusham,
    Kettai,
    Moolam,
    Pooradam,
    Uthiradam,
    Thiruvonam,
    Avittam,
    Sathayam,
    Poorattathi,
    Uthirattathi,
    Revathi,
}

impl NakshatramName {
    pub const ALL: [NakshatramName; 27] = [
        NakshatramName::Ashwini,
        NakshatramName::Bharani,
        NakshatramName::Krithigai,
        NakshatramName::Rohini,
        NakshatramName::Mrigashirisham,
        NakshatramName::Thiruvathirai,
        NakshatramName::Punarpoosam,
        NakshatramName::Poosam,
        NakshatramName::Ayilyam,
        NakshatramName::Magam,
        NakshatramName::Pooram,
        NakshatramName::Uthiram,
        NakshatramName::Hastham,
        NakshatramName::Chithirai,
        NakshatramName::Swathi,
        NakshatramName::Visagam,
        NakshatramName::Anusham,
        NakshatramName::Kettai,
        NakshatramName::Moolam,
        NakshatramName::Pooradam,
        NakshatramName::Uthiradam,
        NakshatramName::Thiruvonam,
        NakshatramName::Avittam,
        NakshatramName::Sathayam,
        NakshatramName::Poorattathi,
        NakshatramName::Uthirattathi,
        NakshatramName::Revathi,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NakshatramName::Ashwini => "Ashwini",
            NakshatramName::Bharani => "Bharani",
            NakshatramName::Krithigai => "Krithigai",
            NakshatramName::Rohini => "Rohini",
            NakshatramName::Mrigashirisham => "Mrigashirisham",
            NakshatramName::Thiruvathirai => "Thiruvathirai",
            NakshatramName::Punarpoosam => "Punarpoosam",
            NakshatramName::Poosam => "Poosam",
            NakshatramName::Ayilyam => "Ayilyam",
            NakshatramName::Magam => "Magam",
            NakshatramName::Pooram => "Pooram",
            NakshatramName::Uthiram => "Uthiram",
            NakshatramName::Hastham => "Hastham",
            NakshatramName::Chithirai => "Chithirai",
            NakshatramName::Swathi => "Swathi",
            NakshatramName::Visagam => "Visagam",
            NakshatramName::Anusham => "Anusham",
            NakshatramName::Kettai => "Kettai",
            NakshatramName::Moolam => "Moolam",
            NakshatramName::Pooradam => "Pooradam",
            NakshatramName::Uthiradam => "Uthiradam",
            NakshatramName::Thiruvonam => "Thiruvonam",
            NakshatramName::Avittam => "Avittam",
            NakshatramName::Sathayam => "Sathayam",
            NakshatramName::Poorattathi => "Poorattathi",
            NakshatramName::Uthirattathi => "Uthirattathi",
            NakshatramName::Revathi => "Revathi",
        }
    }

    pub fn from_name(raw: &str) -> Option<Self> {
        lookup_by_name(&Self::ALL, Self::name, raw)
    }

    /// Position in the 27-star cycle (1-27).
    pub fn position(self) -> u32 {
        self as u32 + 1
    }

    /// Ruling planet. The nine lords repeat every nine mansions.
    pub fn lord(self) -> &'static str {
        use NakshatramName::*;
        match self {
            Ashwini | Magam | Moolam => "Ketu",
            Bharani | Pooram | Pooradam => "Venus",
            Krithigai | Uthiram | Uthiradam => "Sun",
            Rohini | Hastham | Thiruvonam => "Moon",
            Mrigashirisham | Chithirai | Avittam => "Mars",
            Thiruvathirai | Swathi | Sathayam => "Rahu",
            Punarpoosam | Visagam | Poorattathi => "Jupiter",
            Poosam | Anusham | Uthirattathi => "Saturn",
            Ayilyam | Kettai | Revathi => "Mercury",
        }
    }

    pub fn nature(self) -> NakshatramNature {
        use NakshatramName::*;
        match self {
            Ashwini | Punarpoosam | Hastham | Anusham | Moolam | Revathi => NakshatramNature::Light,
            Bharani | Magam | Pooram | Pooradam | Poorattathi => NakshatramNature::Fierce,
            Krithigai | Visagam => NakshatramNature::Mixed,
            Rohini | Uthiram | Uthiradam | Uthirattathi => NakshatramNature::Fixed,
            Mrigashirisham | Chithirai | Thiruvonam | Avittam | Sathayam => NakshatramNature::Movable,
            Thiruvathirai | Ayilyam | Kettai | Swathi => NakshatramNature::Sharp,
            Poosam => NakshatramNature::Soft,
        }
    }
}

/// Quality classification of a lunar mansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NakshatramNature {
    Light,
    Fierce,
    Mixed,
    Fixed,
    Movable,
    Sharp,
    Soft,
}

impl NakshatramNature {
    pub fn label(self) -> &'static str {
        match self {
            NakshatramNature::Light => "Light/Swift",
            NakshatramNature::Fierce => "Fierce/Severe",
            NakshatramNature::Mixed => "Mixed/Dual",
            NakshatramNature::Fixed => "Fixed/Permanent",
            NakshatramNature::Movable => "Movable/Temporary",
            NakshatramNature::Sharp => "Sharp/Dreadful",
            NakshatramNature::Soft => "Soft/Tender",
        }
    }

    pub fn suitable_activities(self) -> &'static str {
        match self {
            NakshatramNature::Light => "Travel, learning, sports, healing",
            NakshatramNature::Fierce => "Competitive activities, surgery, demolition",
            NakshatramNature::Mixed => "Routine work, daily activities",
            NakshatramNature::Fixed => "Foundation laying, long-term commitments",
            NakshatramNature::Movable => "Travel, vehicle purchase, new ventures",
            NakshatramNature::Sharp => "Confrontation, filing complaints, separation",
            NakshatramNature::Soft => "Arts, music, romance, friendships",
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_positions_run_one_to_twenty_seven() {
        assert_eq!(NakshatramName::Ashwini.position(), 1);
        assert_eq!(NakshatramName::Revathi.position(), 27);
        for (i, n) in NakshatramName::ALL.iter().enumerate() {
            assert_eq!(n.position() as usize, i + 1);
        }
    }

    #[test]
    fn test_lords_repeat_every_nine() {
        for i in 0..18 {
            assert_eq!(NakshatramName::ALL[i].lord(), NakshatramName::ALL[i + 9].lord());
        }
    }

    #[test]
    fn test_new_defaults_lord() {
        let end = Utc.with_ymd_and_hms(2026, 1, 14, 9, 15, 0).unwrap();
        let n = Nakshatram::new(NakshatramName::Rohini, end);
        assert_eq!(n.lord(), "Moon");
        assert_eq!(n.with_lord("Chandra").lord(), "Chandra");
    }

    #[test]
    fn test_nature_classification() {
        assert_eq!(NakshatramName::Poosam.nature(), NakshatramNature::Soft);
        assert_eq!(NakshatramName::Rohini.nature(), NakshatramNature::Fixed);
        assert!(!NakshatramNature::Soft.suitable_activities().is_empty());
    }

    #[test]
    fn test_from_name_case_insensitive() {
        assert_eq!(NakshatramName::from_name("thiruvonam"), Some(NakshatramName::Thiruvonam));
        assert_eq!(NakshatramName::from_name("Shravana"), None);
    }
}
