//! The playback state machine: what the alarm sound is doing right now.
//!
//! The machine is the only thing that changes [`PlaybackState`]. It drives a
//! [`Playback`] collaborator that actually makes noise, and it owns the pending
//! snooze resume, which is just the deadline inside
//! [`PlaybackState::SnoozeScheduled`]. Stopping moves the machine to `Idle`, so
//! a stopped alarm has nothing left that could resume it.

use std::{fmt, path::PathBuf};

use chrono::{Duration, NaiveDateTime};
use log::{debug, info, warn};

use crate::{
    error::{InvalidStateTransitionError, PlaybackError},
    sound::{SoundHandle, Volume},
};

/// how long a snooze lasts unless configured otherwise
pub const DEFAULT_SNOOZE_MINUTES: u32 = 10;

#[must_use]
pub fn snooze_delay(minutes: u32) -> Duration {
    Duration::minutes(i64::from(minutes))
}

/// something that can play a sound on repeat
pub trait Playback {
    /// start playing `sound` from the beginning, looping until paused
    ///
    /// # Errors
    /// if the sound can't be found, opened or decoded, or there is no output device
    fn play(&mut self, sound: &SoundHandle, volume: Volume) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    /// rewind so the next play starts at the beginning
    fn reset(&mut self);
    fn set_volume(&mut self, volume: Volume);
}

/// a player whose catalog can grow while the clock is running
pub trait SoundLibrary {
    fn add_sound(&mut self, name: String, path: PathBuf);
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing(SoundHandle),
    SnoozeScheduled(SoundHandle, NaiveDateTime),
}

impl PlaybackState {
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub const fn can_snooze(&self) -> bool {
        matches!(self, Self::Playing(_))
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Playing(sound) => write!(f, "playing {sound}"),
            Self::SnoozeScheduled(sound, resume_at) => {
                write!(f, "snoozing {sound} until {}", resume_at.format("%H:%M:%S"))
            }
        }
    }
}

/// what happened when the machine was asked to ring
#[derive(Debug)]
pub enum Fired {
    Started,
    /// something was already playing, so nothing changed
    Suppressed,
    /// the state moved to playing but the collaborator couldn't make any sound
    Silent(PlaybackError),
}

impl Fired {
    #[must_use]
    pub const fn changed_state(&self) -> bool {
        !matches!(self, Self::Suppressed)
    }
}

#[derive(Debug)]
pub struct PlaybackMachine<P> {
    state: PlaybackState,
    player: P,
    volume: Volume,
}

impl<P: Playback> PlaybackMachine<P> {
    pub fn new(mut player: P, volume: Volume) -> Self {
        player.set_volume(volume);
        Self {
            state: PlaybackState::Idle,
            player,
            volume,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &PlaybackState {
        &self.state
    }

    #[must_use]
    pub const fn volume(&self) -> Volume {
        self.volume
    }

    #[must_use]
    pub const fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    /// first alarm wins: firing while already playing does nothing
    /// firing over a pending snooze replaces it
    pub fn fire(&mut self, sound: SoundHandle, volume: Volume) -> Fired {
        match &self.state {
            PlaybackState::Playing(current) => {
                info!("suppressed {sound}, {current} is already playing");
                return Fired::Suppressed;
            }
            PlaybackState::SnoozeScheduled(snoozed, resume_at) => {
                info!("{sound} replaces snoozed {snoozed} that was due at {resume_at}");
            }
            PlaybackState::Idle => {}
        }
        self.volume = volume;
        self.player.set_volume(volume);
        let started = self.player.play(&sound, volume);
        debug!("{} -> playing {sound} at {volume}", self.state);
        self.state = PlaybackState::Playing(sound);
        match started {
            Ok(()) => Fired::Started,
            Err(e) => {
                warn!("alarm is ringing without sound: {e}");
                Fired::Silent(e)
            }
        }
    }

    /// returns false if there was nothing to stop
    pub fn stop(&mut self) -> bool {
        match &self.state {
            PlaybackState::Idle => return false,
            PlaybackState::SnoozeScheduled(sound, resume_at) => {
                debug!("cancelled resume of {sound} due at {resume_at}");
            }
            PlaybackState::Playing(_) => {}
        }
        self.player.pause();
        self.player.reset();
        debug!("{} -> idle", self.state);
        self.state = PlaybackState::Idle;
        true
    }

    /// silences the alarm and schedules it to ring again after `delay`
    ///
    /// # Errors
    /// unless something is playing
    pub fn snooze(
        &mut self,
        now: NaiveDateTime,
        delay: Duration,
    ) -> Result<NaiveDateTime, InvalidStateTransitionError> {
        let PlaybackState::Playing(sound) = &self.state else {
            return Err(InvalidStateTransitionError {
                operation: "snooze",
                state: self.state.clone(),
            });
        };
        let sound = sound.clone();
        self.player.pause();
        self.player.reset();
        let resume_at = now + delay;
        debug!("{} -> snoozing until {resume_at}", self.state);
        self.state = PlaybackState::SnoozeScheduled(sound, resume_at);
        Ok(resume_at)
    }

    /// rings a snoozed alarm again once its resume time has passed
    /// the volume is whatever is current at resume, not what it rang with before
    pub fn poll(&mut self, now: NaiveDateTime, volume: Volume) -> Option<Fired> {
        let PlaybackState::SnoozeScheduled(sound, resume_at) = &self.state else {
            return None;
        };
        if now < *resume_at {
            return None;
        }
        let sound = sound.clone();
        info!("snooze over, ringing {sound} again");
        self.state = PlaybackState::Idle;
        Some(self.fire(sound, volume))
    }

    /// applies straight away whatever the state
    pub fn set_volume(&mut self, volume: impl Into<Volume>) -> Volume {
        let volume = volume.into();
        self.volume = volume;
        self.player.set_volume(volume);
        volume
    }
}
