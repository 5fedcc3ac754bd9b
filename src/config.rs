use std::{
    collections::HashMap,
    fmt,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigError,
    playback::DEFAULT_SNOOZE_MINUTES,
    sound::{SoundHandle, SoundSelection, Volume},
};

const PROJECT: &str = "snooze_clock";

/// user settings, alarms themselves are never saved
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub time_format: String,
    pub date_format: String,
    /// between 0 and 1
    pub volume: f32,
    pub snooze_minutes: u32,
    pub default_sound: String,
    pub sounds: HashMap<String, Sound>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_format: "%I:%M:%S %p".to_string(),
            date_format: "%A, %B %-d, %Y".to_string(),
            volume: 0.5,
            snooze_minutes: DEFAULT_SNOOZE_MINUTES,
            default_sound: Sound::get_default_name(),
            sounds: [Sound::gaming(), Sound::rooster(), Sound::sci_fi()]
                .into_iter()
                .map(|sound| (sound.name.clone(), sound))
                .collect(),
        }
    }
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// if the file can't be read or parsed, or names a default sound it doesn't have
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&config)?;
        config.validate()?;
        Ok(config)
    }

    /// like [`Config::load`] but a missing file just gives the defaults
    ///
    /// # Errors
    /// if the file exists but can't be read or parsed
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                info!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// # Errors
    /// if the config can't be serialized or written
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let config = toml::to_string(self)?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, config).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// # Errors
    /// if the default sound isn't in the catalog or the snooze length is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.sounds.contains_key(&self.default_sound) {
            return Err(ConfigError::UnknownSound(self.default_sound.clone()));
        }
        if self.snooze_minutes == 0 {
            return Err(ConfigError::ZeroSnooze);
        }
        Ok(())
    }

    fn project_dirs() -> Result<directories::ProjectDirs, ConfigError> {
        directories::ProjectDirs::from("", "", PROJECT).ok_or(ConfigError::NoProjectDirs)
    }

    /// # Errors
    /// if there is no home directory
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let mut path = Self::project_dirs()?.config_dir().to_path_buf();
        path.push("config.toml");
        Ok(path)
    }

    /// # Errors
    /// if there is no home directory
    pub fn sounds_path() -> Result<PathBuf, ConfigError> {
        let mut path = Self::project_dirs()?.data_dir().to_path_buf();
        path.push("sounds");
        Ok(path)
    }

    #[must_use]
    pub fn is_config_present() -> bool {
        Self::config_path().is_ok_and(|path| path.exists())
    }

    /// adds or replaces a sound, returning the one it replaced
    pub fn add_sound(&mut self, name: String, path: PathBuf) -> Option<Sound> {
        self.sounds.insert(name.clone(), Sound::new(name, path))
    }

    /// catalog names in a stable order for display
    #[must_use]
    pub fn sound_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.sounds.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// what the playback side needs to turn a handle into a file
    #[must_use]
    pub fn catalog(&self) -> HashMap<String, PathBuf> {
        self.sounds
            .iter()
            .map(|(name, sound)| (name.clone(), sound.path.clone()))
            .collect()
    }

    /// the sound and volume a fresh session starts with
    #[must_use]
    pub fn selection(&self) -> SoundSelection {
        SoundSelection {
            handle: SoundHandle::new(self.default_sound.clone()),
            volume: Volume::new(self.volume),
        }
    }

    /// like [`Config::selection`] with this run's overrides on top
    /// the overrides only last for the session so the config itself is left alone
    ///
    /// # Errors
    /// if `sound` isn't in the catalog
    pub fn session_selection(
        &self,
        sound: Option<String>,
        volume: Option<f32>,
    ) -> Result<SoundSelection, ConfigError> {
        let mut selection = self.selection();
        if let Some(sound) = sound {
            if !self.sounds.contains_key(&sound) {
                return Err(ConfigError::UnknownSound(sound));
            }
            selection.handle = SoundHandle::new(sound);
        }
        if let Some(volume) = volume {
            selection.volume = Volume::new(volume);
        }
        Ok(selection)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Sound {
    pub name: String,
    pub path: PathBuf,
}

impl fmt::Display for Sound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.name,
            self.path
                .file_name()
                .map_or_else(|| self.path.to_string_lossy(), |name| name.to_string_lossy())
        )
    }
}

impl Default for Sound {
    fn default() -> Self {
        Self::gaming()
    }
}

impl Sound {
    #[must_use]
    pub fn get_default_name() -> String {
        Self::default().name
    }

    #[must_use]
    pub const fn new(name: String, path: PathBuf) -> Self {
        Self { name, path }
    }

    fn bundled(name: &str, file: &str) -> Self {
        // without a data dir the sounds are looked up next to the binary
        let dir = Config::sounds_path().unwrap_or_else(|_| PathBuf::from("sounds"));
        Self {
            name: name.to_string(),
            path: dir.join(file),
        }
    }

    #[must_use]
    pub fn gaming() -> Self {
        Self::bundled("Gaming", "alarm1.wav")
    }

    #[must_use]
    pub fn rooster() -> Self {
        Self::bundled("Rooster", "alarm2.wav")
    }

    #[must_use]
    pub fn sci_fi() -> Self {
        Self::bundled("Sci-Fi", "alarm3.wav")
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config: Config = toml::from_str("volume = 0.8\nsnooze_minutes = 5\n").unwrap();
        assert!((config.volume - 0.8).abs() < f32::EPSILON);
        assert_eq!(config.snooze_minutes, 5);
        assert_eq!(config.default_sound, "Gaming");
        assert_eq!(config.sound_names(), vec!["Gaming", "Rooster", "Sci-Fi"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn selection_clamps_volume() {
        let config = Config {
            volume: 4.0,
            ..Config::default()
        };
        let selection = config.selection();
        assert_eq!(selection.volume, Volume::FULL);
        assert_eq!(selection.handle, SoundHandle::new("Gaming"));
    }

    #[test]
    fn unknown_default_sound_is_rejected() {
        let config: Config = toml::from_str("default_sound = \"Cowbell\"\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownSound(name)) if name == "Cowbell"
        ));
    }

    #[test]
    fn custom_sound_survives_save_and_load() {
        let dir = std::env::temp_dir().join(format!("snooze_clock_test_{}", std::process::id()));
        let path = dir.join("config.toml");
        let mut config = Config::new();
        assert!(config
            .add_sound("Chimes".to_string(), PathBuf::from("/tmp/chimes.ogg"))
            .is_none());
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(
            loaded.catalog().get("Chimes"),
            Some(&PathBuf::from("/tmp/chimes.ogg"))
        );
        assert_eq!(loaded, config);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn zero_snooze_is_rejected() {
        let config: Config = toml::from_str("snooze_minutes = 0\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::ZeroSnooze)));

        let dir = std::env::temp_dir().join(format!("snooze_clock_zero_{}", std::process::id()));
        let path = dir.join("config.toml");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, "snooze_minutes = 0\n").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::ZeroSnooze)));
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn session_overrides_are_not_saved() {
        let dir =
            std::env::temp_dir().join(format!("snooze_clock_session_{}", std::process::id()));
        let path = dir.join("config.toml");
        let mut config = Config::new();

        let selection = config
            .session_selection(Some("Rooster".to_string()), Some(1.7))
            .unwrap();
        assert_eq!(selection.handle, SoundHandle::new("Rooster"));
        assert_eq!(selection.volume, Volume::FULL);

        // adding a custom sound later saves the whole config
        config.add_sound("Chimes".to_string(), PathBuf::from("/tmp/chimes.ogg"));
        config.save(&path).unwrap();
        let saved = Config::load(&path).unwrap();
        assert_eq!(saved.default_sound, "Gaming");
        assert!((saved.volume - 0.5).abs() < f32::EPSILON);
        assert!(saved.sounds.contains_key("Chimes"));
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn session_sound_has_to_be_in_the_catalog() {
        let config = Config::new();
        assert!(matches!(
            config.session_selection(Some("Cowbell".to_string()), None),
            Err(ConfigError::UnknownSound(name)) if name == "Cowbell"
        ));
        assert_eq!(config.session_selection(None, None).unwrap(), config.selection());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("snooze_clock_missing/none.toml");
        assert_eq!(Config::load_or_default(&path).unwrap(), Config::default());
        assert!(matches!(Config::load(&path), Err(ConfigError::Io { .. })));
    }
}
