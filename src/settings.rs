//! Persistence boundary for the default location, favorites and display
//! preferences.
//!
//! Stores only ever get or set whole values; helpers such as
//! [`SettingsStore::add_favorite`] read the full list, change it and write
//! it back.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::DisplayConfig;
use crate::model::{DietaryPreference, Location};
use crate::resolver::{TimeFormat, TimezoneDisplayMode};

/// How times and dietary guidance are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayPreferences {
    pub time_format: TimeFormat,
    pub timezone_display: TimezoneDisplayMode,
    pub dietary_preference: DietaryPreference,
}

impl From<&DisplayConfig> for DisplayPreferences {
    fn from(config: &DisplayConfig) -> Self {
        Self {
            time_format: config.time_format,
            timezone_display: config.timezone_display,
            dietary_preference: if config.vegetarian {
                DietaryPreference::Vegetarian
            } else {
                DietaryPreference::NonVegetarian
            },
        }
    }
}

pub trait SettingsStore: Send + Sync {
    /// The stored default location, or Chennai when none was saved.
    fn default_location(&self) -> Result<Location>;

    fn set_default_location(&self, location: &Location) -> Result<()>;

    fn favorites(&self) -> Result<Vec<Location>>;

    fn set_favorites(&self, favorites: &[Location]) -> Result<()>;

    fn display_preferences(&self) -> Result<DisplayPreferences>;

    fn set_display_preferences(&self, preferences: DisplayPreferences) -> Result<()>;

    fn is_favorite(&self, id: Uuid) -> Result<bool> {
        Ok(self.favorites()?.iter().any(|l| l.id() == id))
    }

    /// Append a favorite unless one with the same id is already stored.
    /// Returns whether the list changed.
    fn add_favorite(&self, location: &Location) -> Result<bool> {
        let mut favorites = self.favorites()?;
        if favorites.iter().any(|l| l.id() == location.id()) {
            return Ok(false);
        }
        favorites.push(location.clone());
        self.set_favorites(&favorites)?;
        Ok(true)
    }

    /// Remove every favorite with `id`. Returns whether the list changed.
    fn remove_favorite(&self, id: Uuid) -> Result<bool> {
        let mut favorites = self.favorites()?;
        let before = favorites.len();
        favorites.retain(|l| l.id() != id);
        if favorites.len() == before {
            return Ok(false);
        }
        self.set_favorites(&favorites)?;
        Ok(true)
    }

    /// Add or remove. Returns whether the location is a favorite afterwards.
    fn toggle_favorite(&self, location: &Location) -> Result<bool> {
        if self.remove_favorite(location.id())? {
            Ok(false)
        } else {
            self.add_favorite(location)
        }
    }
}

/// Whole settings document as stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct SettingsDocument {
    default_location: Option<Location>,
    favorites: Vec<Location>,
    display: DisplayPreferences,
}

// ==================== In-Memory Store ====================

/// Store that keeps settings for the life of the process.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    document: Mutex<SettingsDocument>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<T>(&self, f: impl FnOnce(&mut SettingsDocument) -> T) -> T {
        f(&mut self.document.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl SettingsStore for MemorySettingsStore {
    fn default_location(&self) -> Result<Location> {
        Ok(self.with(|d| d.default_location.clone()).unwrap_or_else(Location::chennai))
    }

    fn set_default_location(&self, location: &Location) -> Result<()> {
        self.with(|d| d.default_location = Some(location.clone()));
        Ok(())
    }

    fn favorites(&self) -> Result<Vec<Location>> {
        Ok(self.with(|d| d.favorites.clone()))
    }

    fn set_favorites(&self, favorites: &[Location]) -> Result<()> {
        self.with(|d| d.favorites = favorites.to_vec());
        Ok(())
    }

    fn display_preferences(&self) -> Result<DisplayPreferences> {
        Ok(self.with(|d| d.display))
    }

    fn set_display_preferences(&self, preferences: DisplayPreferences) -> Result<()> {
        self.with(|d| d.display = preferences);
        Ok(())
    }
}

// ==================== JSON File Store ====================

/// Store backed by one JSON document on disk.
///
/// A missing file reads as defaults. An unreadable or corrupt file also
/// reads as defaults, with a warning; [`JsonFileSettingsStore::verify`]
/// reports it as an error. The next write moves the bad file aside to
/// `<path>.corrupt` before starting over. Writes go to a temporary file in
/// the same directory that is then renamed over the target.
#[derive(Debug)]
pub struct JsonFileSettingsStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// `<user config dir>/magizh/settings.json`.
    pub fn in_user_config_dir() -> Result<Self> {
        let dir = dirs::config_dir().context("No user config directory on this platform")?;
        Ok(Self::new(dir.join("magizh").join("settings.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unreadable settings file is moved before it is replaced.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".corrupt");
        PathBuf::from(name)
    }

    /// Fails if the settings file exists but cannot be read or decoded.
    pub fn verify(&self) -> Result<()> {
        self.load().map(|_| ())
    }

    fn load(&self) -> Result<Option<SettingsDocument>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read settings from {}", self.path.display()));
            }
        };
        serde_json::from_str(&raw)
            .map(Some)
            .with_context(|| format!("Corrupt settings file {}", self.path.display()))
    }

    fn read(&self) -> SettingsDocument {
        match self.load() {
            Ok(Some(document)) => document,
            Ok(None) => {
                debug!(path = %self.path.display(), "No settings file yet");
                SettingsDocument::default()
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), "Unusable settings, using defaults");
                SettingsDocument::default()
            }
        }
    }

    fn update(&self, f: impl FnOnce(&mut SettingsDocument)) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut document = match self.load() {
            Ok(document) => document.unwrap_or_default(),
            Err(e) => {
                let backup = self.backup_path();
                fs::rename(&self.path, &backup)
                    .with_context(|| format!("Failed to move unusable settings to {}", backup.display()))?;
                warn!(
                    backup = %backup.display(),
                    error = %format!("{e:#}"),
                    "Moved unusable settings aside, starting from defaults"
                );
                SettingsDocument::default()
            }
        };
        f(&mut document);

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).with_context(|| format!("Failed to create settings directory {}", dir.display()))?;
        let json = serde_json::to_string_pretty(&document).context("Failed to serialize settings")?;

        let mut file = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temporary settings file in {}", dir.display()))?;
        file.write_all(json.as_bytes())
            .and_then(|()| file.as_file().sync_all())
            .context("Failed to write temporary settings file")?;
        file.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))?;
        Ok(())
    }
}

impl SettingsStore for JsonFileSettingsStore {
    fn default_location(&self) -> Result<Location> {
        Ok(self.read().default_location.unwrap_or_else(Location::chennai))
    }

    fn set_default_location(&self, location: &Location) -> Result<()> {
        self.update(|d| d.default_location = Some(location.clone()))
    }

    fn favorites(&self) -> Result<Vec<Location>> {
        Ok(self.read().favorites)
    }

    fn set_favorites(&self, favorites: &[Location]) -> Result<()> {
        self.update(|d| d.favorites = favorites.to_vec())
    }

    fn display_preferences(&self) -> Result<DisplayPreferences> {
        Ok(self.read().display)
    }

    fn set_display_preferences(&self, preferences: DisplayPreferences) -> Result<()> {
        self.update(|d| d.display = preferences)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn madurai() -> Location {
        Location::find_popular("Madurai").unwrap()
    }

    // ==================== Favorite Helper Tests ====================

    #[test]
    fn test_default_location_is_chennai() {
        let store = MemorySettingsStore::new();
        assert_eq!(store.default_location().unwrap(), Location::chennai());
    }

    #[test]
    fn test_add_favorite_skips_duplicates() {
        let store = MemorySettingsStore::new();
        assert!(store.add_favorite(&madurai()).unwrap());
        assert!(!store.add_favorite(&madurai()).unwrap());
        assert_eq!(store.favorites().unwrap().len(), 1);
        assert!(store.is_favorite(madurai().id()).unwrap());
    }

    #[test]
    fn test_remove_favorite() {
        let store = MemorySettingsStore::new();
        store.add_favorite(&madurai()).unwrap();
        store.add_favorite(&Location::chennai()).unwrap();

        assert!(store.remove_favorite(madurai().id()).unwrap());
        assert!(!store.remove_favorite(madurai().id()).unwrap());
        assert_eq!(store.favorites().unwrap(), vec![Location::chennai()]);
    }

    #[test]
    fn test_toggle_favorite() {
        let store = MemorySettingsStore::new();
        assert!(store.toggle_favorite(&madurai()).unwrap());
        assert!(store.is_favorite(madurai().id()).unwrap());
        assert!(!store.toggle_favorite(&madurai()).unwrap());
        assert!(store.favorites().unwrap().is_empty());
    }

    #[test]
    fn test_display_preferences_from_config() {
        let config = DisplayConfig {
            time_format: TimeFormat::TwentyFourHour,
            timezone_display: TimezoneDisplayMode::Device,
            vegetarian: true,
        };
        let prefs = DisplayPreferences::from(&config);
        assert_eq!(prefs.time_format, TimeFormat::TwentyFourHour);
        assert_eq!(prefs.timezone_display, TimezoneDisplayMode::Device);
        assert_eq!(prefs.dietary_preference, DietaryPreference::Vegetarian);
    }

    // ==================== JSON File Store Tests ====================

    #[test]
    fn test_json_store_missing_file_reads_defaults() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileSettingsStore::new(dir.path().join("settings.json"));

        assert_eq!(store.default_location().unwrap(), Location::chennai());
        assert!(store.favorites().unwrap().is_empty());
        assert_eq!(store.display_preferences().unwrap(), DisplayPreferences::default());
    }

    #[test]
    fn test_json_store_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let store = JsonFileSettingsStore::new(&path);
        store.set_default_location(&madurai()).unwrap();
        store.add_favorite(&Location::chennai()).unwrap();
        store
            .set_display_preferences(DisplayPreferences {
                time_format: TimeFormat::TwentyFourHour,
                ..DisplayPreferences::default()
            })
            .unwrap();

        let reopened = JsonFileSettingsStore::new(&path);
        assert_eq!(reopened.default_location().unwrap(), madurai());
        assert_eq!(reopened.favorites().unwrap(), vec![Location::chennai()]);
        assert_eq!(
            reopened.display_preferences().unwrap().time_format,
            TimeFormat::TwentyFourHour
        );
    }

    #[test]
    fn test_json_store_corrupt_file_reads_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();

        let store = JsonFileSettingsStore::new(&path);
        assert_eq!(store.default_location().unwrap(), Location::chennai());
        assert!(store.verify().is_err());

        store.add_favorite(&madurai()).unwrap();
        assert_eq!(store.favorites().unwrap(), vec![madurai()]);
        assert!(store.verify().is_ok());
    }

    #[test]
    fn test_json_store_keeps_corrupt_file_as_backup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{\"favorites\": [truncated").unwrap();

        let store = JsonFileSettingsStore::new(&path);
        store.set_default_location(&madurai()).unwrap();

        let backup = fs::read_to_string(store.backup_path()).unwrap();
        assert_eq!(backup, "{\"favorites\": [truncated");
        assert_eq!(store.default_location().unwrap(), madurai());
    }

    #[test]
    fn test_json_store_leaves_no_temporary_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let store = JsonFileSettingsStore::new(&path);

        store.add_favorite(&madurai()).unwrap();
        store.add_favorite(&Location::chennai()).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("settings.json")]);
        assert!(store.verify().is_ok());
    }

    #[test]
    fn test_json_store_missing_file_verifies() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileSettingsStore::new(dir.path().join("settings.json"));
        assert!(store.verify().is_ok());
    }

    #[test]
    fn test_json_store_rejects_invalid_location() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let mut value = serde_json::to_value(SettingsDocument {
            default_location: Some(madurai()),
            ..SettingsDocument::default()
        })
        .unwrap();
        value["default_location"]["latitude"] = serde_json::json!(123.0);
        fs::write(&path, value.to_string()).unwrap();

        // Validation failure on load degrades to defaults
        let store = JsonFileSettingsStore::new(&path);
        assert_eq!(store.default_location().unwrap(), Location::chennai());
    }
}
