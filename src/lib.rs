//! Magizh Panchangam Library
//!
//! Temporal data model and resolution engine for the Tamil Panchangam:
//! the five daily elements, auspicious and inauspicious windows, dietary
//! guidance, remote fetching with a deterministic offline fallback, and the
//! orchestration that ties them together.

pub mod advisory;
pub mod api;
pub mod config;
pub mod fallback;
pub mod mapper;
pub mod model;
pub mod orchestrator;
pub mod resolver;
pub mod settings;
pub mod traits;

// Re-export commonly used types
pub use advisory::{NO_DIETARY_CONCERNS, derive_status, effective_status, next_observance};
pub use api::{ApiError, PanchangamApiClient};
pub use config::AppConfig;
pub use mapper::{MapError, PanchangamResponse};
pub use model::{
    DietaryCategory, DietaryPreference, DietaryStatus, Karanam, KaranamName, Location, ModelError, Nakshatram,
    NakshatramName, ObservanceKind, Paksha, PanchangamDay, TamilDate, TamilMonth, TamilYear, Thithi, ThithiName,
    TimeWindow, UpcomingObservance, Vaaram, WindowKind, Yogam, YogamKind, YogamName,
};
pub use orchestrator::{FallbackPolicy, FetchError, Orchestrator, Phase, Provenance, Snapshot};
pub use resolver::{
    ActiveWindow, DisplayZone, TimeFormat, TimezoneDisplayMode, WindowSlot, format_instant, format_range,
    format_remaining, resolve_active_window,
};
pub use settings::{DisplayPreferences, JsonFileSettingsStore, MemorySettingsStore, SettingsStore};
pub use traits::{Clock, MockClock, MockSource, PanchangamSource, SystemClock};
