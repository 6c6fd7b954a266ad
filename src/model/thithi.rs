use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ObservanceKind, lookup_by_name};

/// Lunar fortnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Paksha {
    /// Waxing, bright fortnight.
    Shukla,
    /// Waning, dark fortnight.
    Krishna,
}

impl Paksha {
    pub const ALL: [Paksha; 2] = [Paksha::Shukla, Paksha::Krishna];

    pub fn name(self) -> &'static str {
        match self {
            Paksha::Shukla => "Shukla",
            Paksha::Krishna => "Krishna",
        }
    }

    pub fn from_name(raw: &str) -> Option<Self> {
        lookup_by_name(&Self::ALL, Self::name, raw)
    }

    pub fn tamil_name(self) -> &'static str {
        match self {
            Paksha::Shukla => "Valar Pirai",
            Paksha::Krishna => "Thei Pirai",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Paksha::Shukla => "Waxing Moon (Bright fortnight)",
            Paksha::Krishna => "Waning Moon (Dark fortnight)",
        }
    }
}

/// The 14 numbered lunar days plus full moon and new moon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThithiName {
    Prathama,
    Dvitiya,
    Tritiya,
    Chaturthi,
    Panchami,
    Sashti,
    Saptami,
    Ashtami,
    Navami,
    Dasami,
    Ekadasi,
    Dvadasi,
    Trayodasi,
    Chaturdasi,
    Pournami,
    Amavasai,
}

impl ThithiName {
    pub const ALL: [ThithiName; 16] = [
        ThithiName::Prathama,
        ThithiName::Dvitiya,
        ThithiName::Tritiya,
        ThithiName::Chaturthi,
        ThithiName::Panchami,
        ThithiName::Sashti,
        ThithiName::Saptami,
        ThithiName::Ashtami,
        ThithiName::Navami,
        ThithiName::Dasami,
        ThithiName::Ekadasi,
        ThithiName::Dvadasi,
        ThithiName::Trayodasi,
        ThithiName::Chaturdasi,
        ThithiName::Pournami,
        ThithiName::Amavasai,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ThithiName::Prathama => "Prathama",
            ThithiName::Dvitiya => "Dvitiya",
            ThithiName::Tritiya => "Tritiya",
            ThithiName::Chaturthi => "Chaturthi",
            ThithiName::Panchami => "Panchami",
            ThithiName::Sashti => "Sashti",
            ThithiName::Saptami => "Saptami",
            ThithiName::Ashtami => "Ashtami",
            ThithiName::Navami => "Navami",
            ThithiName::Dasami => "Dasami",
            ThithiName::Ekadasi => "Ekadasi",
            ThithiName::Dvadasi => "Dvadasi",
            ThithiName::Trayodasi => "Trayodasi",
            ThithiName::Chaturdasi => "Chaturdasi",
            ThithiName::Pournami => "Pournami",
            ThithiName::Amavasai => "Amavasai",
        }
    }

    pub fn from_name(raw: &str) -> Option<Self> {
        lookup_by_name(&Self::ALL, Self::name, raw)
    }

    /// Day number within the fortnight (1-15). Full and new moon are both 15.
    pub fn number(self) -> u32 {
        match self {
            ThithiName::Pournami | ThithiName::Amavasai => 15,
            other => other as u32 + 1,
        }
    }

    /// Full moon only occurs in Shukla and new moon only in Krishna.
    pub fn bound_paksha(self) -> Option<Paksha> {
        match self {
            ThithiName::Pournami => Some(Paksha::Shukla),
            ThithiName::Amavasai => Some(Paksha::Krishna),
            _ => None,
        }
    }

    pub fn is_generally_auspicious(self) -> bool {
        matches!(
            self,
            ThithiName::Dvitiya
                | ThithiName::Tritiya
                | ThithiName::Panchami
                | ThithiName::Saptami
                | ThithiName::Dasami
                | ThithiName::Ekadasi
                | ThithiName::Trayodasi
                | ThithiName::Pournami
        )
    }

    pub fn deity(self) -> &'static str {
        match self {
            ThithiName::Prathama => "Agni",
            ThithiName::Dvitiya => "Brahma",
            ThithiName::Tritiya => "Gauri",
            ThithiName::Chaturthi => "Ganesha",
            ThithiName::Panchami => "Nagas",
            ThithiName::Sashti => "Skanda",
            ThithiName::Saptami => "Surya",
            ThithiName::Ashtami => "Shiva",
            ThithiName::Navami => "Durga",
            ThithiName::Dasami => "Yama",
            ThithiName::Ekadasi | ThithiName::Dvadasi => "Vishnu",
            ThithiName::Trayodasi => "Kamadeva",
            ThithiName::Chaturdasi => "Shiva",
            ThithiName::Pournami => "Chandra",
            ThithiName::Amavasai => "Pitru",
        }
    }
}

/// The lunar day in effect and when it ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ThithiRecord")]
pub struct Thithi {
    name: ThithiName,
    paksha: Paksha,
    end_time: DateTime<Utc>,
}

#[derive(Deserialize)]
struct ThithiRecord {
    name: ThithiName,
    paksha: Paksha,
    end_time: DateTime<Utc>,
}

impl From<ThithiRecord> for Thithi {
    fn from(r: ThithiRecord) -> Self {
        Thithi::new(r.name, r.paksha, r.end_time)
    }
}

impl Thithi {
    /// Full and new moon override the supplied fortnight with the one they
    /// belong to.
    pub fn new(name: ThithiName, paksha: Paksha, end_time: DateTime<Utc>) -> Self {
        Self {
            name,
            paksha: name.bound_paksha().unwrap_or(paksha),
            end_time,
        }
    }

    pub fn name(&self) -> ThithiName {
        self.name
    }

    pub fn paksha(&self) -> Paksha {
        self.paksha
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    /// "Shukla Panchami"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.paksha.name(), self.name.name())
    }

    pub fn is_auspicious(&self) -> bool {
        self.name.is_generally_auspicious()
    }

    /// The observance this lunar day marks, if any. Trayodasi is Pradosham
    /// only in the waning fortnight; Ekadasi is an observance in both.
    pub fn special_observance(&self) -> Option<ObservanceKind> {
        match (self.name, self.paksha) {
            (ThithiName::Ekadasi, _) => Some(ObservanceKind::Ekadasi),
            (ThithiName::Amavasai, _) => Some(ObservanceKind::Amavasai),
            (ThithiName::Pournami, _) => Some(ObservanceKind::Pournami),
            (ThithiName::Trayodasi, Paksha::Krishna) => Some(ObservanceKind::Pradosham),
            (ThithiName::Chaturthi, _) => Some(ObservanceKind::Chaturthi),
            (ThithiName::Ashtami, _) => Some(ObservanceKind::Ashtami),
            (ThithiName::Sashti, _) => Some(ObservanceKind::Sashti),
            _ => None,
        }
    }
}
