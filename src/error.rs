use std::{io, path::PathBuf};

use thiserror::Error;

use crate::playback::PlaybackState;

/// an hour or minute outside of a 24 hour clock face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{hour:02}:{minute:02} is not a valid time of day")]
pub struct InvalidTimeError {
    pub hour: u32,
    pub minute: u32,
}

/// an operation that the playback state machine can't perform from its current state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("can't {operation} while {state}")]
pub struct InvalidStateTransitionError {
    pub operation: &'static str,
    pub state: PlaybackState,
}

/// failures reported by a playback collaborator
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no sound named {0:?} in the catalog")]
    UnknownSound(String),
    #[error("couldn't open sound file {}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("couldn't decode sound file {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
    #[error("audio output unavailable: {0}")]
    Device(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("couldn't find a home directory for the config")]
    NoProjectDirs,
    #[error("couldn't access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("couldn't parse config file")]
    Parse(#[from] toml::de::Error),
    #[error("couldn't serialize config")]
    Serialize(#[from] toml::ser::Error),
    #[error("no sound named {0:?} in the catalog")]
    UnknownSound(String),
    #[error("snooze_minutes has to be at least 1")]
    ZeroSnooze,
}
