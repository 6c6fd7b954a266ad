//! Dietary advisory values: the day's category and the next observance.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Tint, lookup_by_name};

/// The dietary signal for a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DietaryCategory {
    Regular,
    AvoidNonVeg,
    StrictFast,
    MultipleObservances,
}

impl DietaryCategory {
    pub const ALL: [DietaryCategory; 4] = [
        DietaryCategory::Regular,
        DietaryCategory::AvoidNonVeg,
        DietaryCategory::StrictFast,
        DietaryCategory::MultipleObservances,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DietaryCategory::Regular => "Regular",
            DietaryCategory::AvoidNonVeg => "AvoidNonVeg",
            DietaryCategory::StrictFast => "StrictFast",
            DietaryCategory::MultipleObservances => "MultipleObservances",
        }
    }

    pub fn from_name(raw: &str) -> Option<Self> {
        lookup_by_name(&Self::ALL, Self::name, raw)
    }

    pub fn default_reason(self) -> &'static str {
        match self {
            DietaryCategory::Regular => "No special observances",
            DietaryCategory::AvoidNonVeg => "Auspicious day observance",
            DietaryCategory::StrictFast => "Ekadasi or major fasting day",
            DietaryCategory::MultipleObservances => "Multiple auspicious observances",
        }
    }

    pub fn short_message(self) -> &'static str {
        match self {
            DietaryCategory::Regular => "Regular Day",
            DietaryCategory::AvoidNonVeg => "Avoid Non-Veg",
            DietaryCategory::StrictFast => "Fasting Day",
            DietaryCategory::MultipleObservances => "Special Day",
        }
    }

    pub fn tint(self) -> Tint {
        match self {
            DietaryCategory::Regular => Tint::Green,
            DietaryCategory::AvoidNonVeg => Tint::Orange,
            DietaryCategory::StrictFast => Tint::Red,
            DietaryCategory::MultipleObservances => Tint::Purple,
        }
    }

    pub fn icon_name(self) -> &'static str {
        match self {
            DietaryCategory::Regular => "checkmark.circle.fill",
            DietaryCategory::AvoidNonVeg => "leaf.fill",
            DietaryCategory::StrictFast => "moon.fill",
            DietaryCategory::MultipleObservances => "sparkles",
        }
    }

    /// Whether this category restricts what a non-vegetarian eats.
    pub fn is_restrictive(self) -> bool {
        self != DietaryCategory::Regular
    }
}

/// The eater's stated diet. Only used to derive an effective view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DietaryPreference {
    Vegetarian,
    #[default]
    NonVegetarian,
}

/// Recurring special days that drive dietary guidance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservanceKind {
    Ekadasi,
    Pradosham,
    Amavasai,
    Pournami,
    Karthigai,
    Shivaratri,
    Navaratri,
    Somavaram,
    Sashti,
    Ashtami,
    Chaturthi,
    Festival,
}

impl ObservanceKind {
    pub const ALL: [ObservanceKind; 12] = [
        ObservanceKind::Ekadasi,
        ObservanceKind::Pradosham,
        ObservanceKind::Amavasai,
        ObservanceKind::Pournami,
        ObservanceKind::Karthigai,
        ObservanceKind::Shivaratri,
        ObservanceKind::Navaratri,
        ObservanceKind::Somavaram,
        ObservanceKind::Sashti,
        ObservanceKind::Ashtami,
        ObservanceKind::Chaturthi,
        ObservanceKind::Festival,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ObservanceKind::Ekadasi => "Ekadasi",
            ObservanceKind::Pradosham => "Pradosham",
            ObservanceKind::Amavasai => "Amavasai",
            ObservanceKind::Pournami => "Pournami",
            ObservanceKind::Karthigai => "Karthigai",
            ObservanceKind::Shivaratri => "Shivaratri",
            ObservanceKind::Navaratri => "Navaratri",
            ObservanceKind::Somavaram => "Somavaram",
            ObservanceKind::Sashti => "Sashti",
            ObservanceKind::Ashtami => "Ashtami",
            ObservanceKind::Chaturthi => "Chaturthi",
            ObservanceKind::Festival => "Festival",
        }
    }

    pub fn from_name(raw: &str) -> Option<Self> {
        lookup_by_name(&Self::ALL, Self::name, raw)
    }

    pub fn restriction(self) -> DietaryCategory {
        match self {
            ObservanceKind::Ekadasi | ObservanceKind::Navaratri => DietaryCategory::StrictFast,
            ObservanceKind::Pradosham
            | ObservanceKind::Amavasai
            | ObservanceKind::Pournami
            | ObservanceKind::Karthigai
            | ObservanceKind::Shivaratri
            | ObservanceKind::Somavaram
            | ObservanceKind::Sashti
            | ObservanceKind::Ashtami
            | ObservanceKind::Chaturthi => DietaryCategory::AvoidNonVeg,
            ObservanceKind::Festival => DietaryCategory::Regular,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ObservanceKind::Ekadasi => "Sacred fasting day dedicated to Lord Vishnu",
            ObservanceKind::Pradosham => "Twilight worship of Lord Shiva",
            ObservanceKind::Amavasai => "New moon day for ancestral offerings",
            ObservanceKind::Pournami => "Full moon day of worship",
            ObservanceKind::Karthigai => "Festival of lights for Lord Murugan",
            ObservanceKind::Shivaratri => "Night of Lord Shiva",
            ObservanceKind::Navaratri => "Nine nights of the Divine Mother",
            ObservanceKind::Somavaram => "Monday worship of Lord Shiva",
            ObservanceKind::Sashti => "Sixth lunar day sacred to Lord Murugan",
            ObservanceKind::Ashtami => "Eighth lunar day sacred to the Goddess",
            ObservanceKind::Chaturthi => "Fourth lunar day sacred to Lord Ganesha",
            ObservanceKind::Festival => "Festival celebration",
        }
    }

    pub fn tint(self) -> Tint {
        self.restriction().tint()
    }
}

/// The next special day after the one being displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingObservance {
    name: String,
    kind: ObservanceKind,
    date: NaiveDate,
    days_until: u32,
}

impl UpcomingObservance {
    /// `days_until` is measured from `today`; a date already past clamps to 0.
    pub fn new(name: impl Into<String>, kind: ObservanceKind, date: NaiveDate, today: NaiveDate) -> Self {
        let days = (date - today).num_days().max(0);
        Self {
            name: name.into(),
            kind,
            date,
            days_until: u32::try_from(days).unwrap_or(u32::MAX),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ObservanceKind {
        self.kind
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn days_until(&self) -> u32 {
        self.days_until
    }

    pub fn days_until_label(&self) -> String {
        match self.days_until {
            0 => "Today".to_string(),
            1 => "Tomorrow".to_string(),
            n => format!("In {n} days"),
        }
    }
}

/// The dietary advisory attached to a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietaryStatus {
    category: DietaryCategory,
    reason: String,
    next_observance: Option<UpcomingObservance>,
}

impl DietaryStatus {
    /// A missing or blank reason is replaced by the category's default.
    pub fn new(category: DietaryCategory, reason: Option<String>, next_observance: Option<UpcomingObservance>) -> Self {
        let reason = reason
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| category.default_reason().to_string());
        Self {
            category,
            reason,
            next_observance,
        }
    }

    pub fn regular() -> Self {
        Self::new(DietaryCategory::Regular, None, None)
    }

    pub fn category(&self) -> DietaryCategory {
        self.category
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn next_observance(&self) -> Option<&UpcomingObservance> {
        self.next_observance.as_ref()
    }

    pub fn short_message(&self) -> &'static str {
        self.category.short_message()
    }

    pub fn notification_message(&self) -> String {
        match self.category {
            DietaryCategory::Regular => "Regular day - no dietary restrictions".to_string(),
            DietaryCategory::AvoidNonVeg => format!("Avoid non-vegetarian food today ({})", self.reason),
            DietaryCategory::StrictFast => format!("Fasting day today ({})", self.reason),
            DietaryCategory::MultipleObservances => format!("Special observances today ({})", self.reason),
        }
    }
}
