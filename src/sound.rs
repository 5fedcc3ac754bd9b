use std::fmt;

/// names a sound in the catalog
/// the engine never looks inside it, only the playback side resolves it to a file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SoundHandle(String);

impl SoundHandle {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SoundHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// playback volume, always within `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Volume(f32);

impl Volume {
    pub const MUTE: Self = Self(0.0);
    pub const FULL: Self = Self(1.0);

    /// clamps into range, NaN is treated as silence
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            Self::MUTE
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    #[must_use]
    pub const fn get(self) -> f32 {
        self.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(0.5)
    }
}

impl From<f32> for Volume {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}%", self.0 * 100.0)
    }
}

/// the sound and volume the next alarm will ring with
#[derive(Debug, Clone, PartialEq)]
pub struct SoundSelection {
    pub handle: SoundHandle,
    pub volume: Volume,
}
