use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lookup_by_name;

/// Half of a Thithi, and when it ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Karanam {
    name: KaranamName,
    end_time: DateTime<Utc>,
}

impl Karanam {
    pub fn new(name: KaranamName, end_time: DateTime<Utc>) -> Self {
        Self { name, end_time }
    }

    pub fn name(&self) -> KaranamName {
        self.name
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    pub fn is_auspicious(&self) -> bool {
        self.name.is_auspicious()
    }
}

/// Seven movable Karanams that cycle through the month, then four fixed
/// ones that occur once around the new moon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KaranamName {
    Bava,
    Balava,
    Kaulava,
    Taitila,
    Gara,
    Vanija,
    Vishti,
    Sakuni,
    Chatushpada,
    Naga,
    Kimstughna,
}

impl KaranamName {
    pub const ALL: [KaranamName; 11] = [
        KaranamName::Bava,
        KaranamName::Balava,
        KaranamName::Kaulava,
        KaranamName::Taitila,
        KaranamName::Gara,
        KaranamName::Vanija,
        KaranamName::Vishti,
        KaranamName::Sakuni,
        KaranamName::Chatushpada,
        KaranamName::Naga,
        KaranamName::Kimstughna,
    ];

    pub fn name(self) -> &'static str {
        match self {
            KaranamName::Bava => "Bava",
            KaranamName::Balava => "Balava",
            KaranamName::Kaulava => "Kaulava",
            KaranamName::Taitila => "Taitila",
            KaranamName::Gara => "Gara",
            KaranamName::Vanija => "Vanija",
            KaranamName::Vishti => "Vishti",
            KaranamName::Sakuni => "Sakuni",
            KaranamName::Chatushpada => "Chatushpada",
            KaranamName::Naga => "Naga",
            KaranamName::Kimstughna => "Kimstughna",
        }
    }

    pub fn from_name(raw: &str) -> Option<Self> {
        lookup_by_name(&Self::ALL, Self::name, raw)
    }

    pub fn is_fixed(self) -> bool {
        matches!(
            self,
            KaranamName::Sakuni | KaranamName::Chatushpada | KaranamName::Naga | KaranamName::Kimstughna
        )
    }

    /// Vishti (Bhadra) is the one Karanam that is never auspicious.
    pub fn is_auspicious(self) -> bool {
        self != KaranamName::Vishti
    }

    pub fn deity(self) -> &'static str {
        match self {
            KaranamName::Bava => "Indra",
            KaranamName::Balava => "Brahma",
            KaranamName::Kaulava => "Mitra",
            KaranamName::Taitila => "Aryaman",
            KaranamName::Gara => "Bhumi",
            KaranamName::Vanija => "Lakshmi",
            KaranamName::Vishti => "Yama",
            KaranamName::Sakuni => "Kali",
            KaranamName::Chatushpada => "Rudra",
            KaranamName::Naga => "Sarpa",
            KaranamName::Kimstughna => "Vayu",
        }
    }

    pub fn suitable_for(self) -> &'static str {
        match self {
            KaranamName::Bava => "Auspicious beginnings, ceremonies",
            KaranamName::Balava => "Religious rites, charity",
            KaranamName::Kaulava => "Friendship, social gatherings",
            KaranamName::Taitila => "Building, decoration",
            KaranamName::Gara => "Agriculture, planting",
            KaranamName::Vanija => "Trade, commerce, business",
            KaranamName::Vishti => "Avoid auspicious activities",
            KaranamName::Sakuni => "Medicine, remedies",
            KaranamName::Chatushpada => "Cattle, animal care",
            KaranamName::Naga => "Fixed works, permanent tasks",
            KaranamName::Kimstughna => "Auspicious ceremonies",
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_only_vishti_is_inauspicious() {
        let inauspicious: Vec<_> = KaranamName::ALL.iter().filter(|k| !k.is_auspicious()).collect();
        assert_eq!(inauspicious, vec![&KaranamName::Vishti]);
    }

    #[test]
    fn test_seven_movable_four_fixed() {
        let fixed = KaranamName::ALL.iter().filter(|k| k.is_fixed()).count();
        assert_eq!(fixed, 4);
        assert!(!KaranamName::Vishti.is_fixed());
        assert!(KaranamName::Kimstughna.is_fixed());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(KaranamName::from_name("VANIJA"), Some(KaranamName::Vanija));
        assert_eq!(KaranamName::from_name("Bhadra"), None);
    }

    #[test]
    fn test_karanam_accessors() {
        let end = Utc.with_ymd_and_hms(2026, 1, 14, 5, 10, 0).unwrap();
        let karanam = Karanam::new(KaranamName::Vishti, end);
        assert_eq!(karanam.name(), KaranamName::Vishti);
        assert_eq!(karanam.end_time(), end);
        assert!(!karanam.is_auspicious());
    }
}
