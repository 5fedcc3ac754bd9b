#![allow(dead_code)]

use std::{cell::RefCell, path::PathBuf, rc::Rc, time::Duration};

use chrono::{NaiveDate, NaiveDateTime};
use snooze_clock::{
    clock::SimulatedClock,
    engine::{Presenter, Status, TriggerEngine},
    error::PlaybackError,
    playback::{Playback, PlaybackState, SoundLibrary},
    registry::{AlarmKind, AlarmSlot},
    sound::{SoundHandle, SoundSelection, Volume},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Play(String, f32),
    Pause,
    Reset,
    Volume(f32),
}

/// records every call so a test can look at it after handing the player to the engine
#[derive(Debug, Clone, Default)]
pub struct RecordingPlayback {
    pub calls: Rc<RefCell<Vec<Call>>>,
    pub known: Rc<RefCell<Vec<String>>>,
    pub broken: bool,
}

impl RecordingPlayback {
    pub fn plays(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Play(name, _) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Playback for RecordingPlayback {
    fn play(&mut self, sound: &SoundHandle, volume: Volume) -> Result<(), PlaybackError> {
        self.calls
            .borrow_mut()
            .push(Call::Play(sound.name().to_string(), volume.get()));
        if self.broken {
            Err(PlaybackError::Device("no speakers".to_string()))
        } else {
            Ok(())
        }
    }

    fn pause(&mut self) {
        self.calls.borrow_mut().push(Call::Pause);
    }

    fn reset(&mut self) {
        self.calls.borrow_mut().push(Call::Reset);
    }

    fn set_volume(&mut self, volume: Volume) {
        self.calls.borrow_mut().push(Call::Volume(volume.get()));
    }
}

impl SoundLibrary for RecordingPlayback {
    fn add_sound(&mut self, name: String, _path: PathBuf) {
        self.known.borrow_mut().push(name);
    }
}

#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub fired: Vec<AlarmKind>,
    pub states: Vec<PlaybackState>,
    pub alarms: Vec<AlarmSlot>,
    pub statuses: Vec<Status>,
}

impl Presenter for RecordingPresenter {
    fn on_fired(&mut self, kind: AlarmKind) {
        self.fired.push(kind);
    }

    fn on_state_changed(&mut self, state: &PlaybackState) {
        self.states.push(state.clone());
    }

    fn on_alarm_changed(&mut self, slot: &AlarmSlot) {
        self.alarms.push(slot.clone());
    }

    fn on_status(&mut self, status: Status) {
        self.statuses.push(status);
    }
}

pub type TestEngine = TriggerEngine<SimulatedClock, RecordingPlayback, RecordingPresenter>;

pub fn at(day: u32, hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .unwrap()
        .and_hms_opt(hour, minute, second)
        .unwrap()
}

pub fn secs(secs: u64) -> Duration {
    Duration::from_secs(secs)
}

/// an engine starting at `start`, plus handles on its clock and player
pub fn engine_at(start: NaiveDateTime) -> (TestEngine, SimulatedClock, RecordingPlayback) {
    engine_with(start, RecordingPlayback::default())
}

pub fn engine_with(
    start: NaiveDateTime,
    player: RecordingPlayback,
) -> (TestEngine, SimulatedClock, RecordingPlayback) {
    let clock = SimulatedClock::new(start);
    let engine = TriggerEngine::new(
        clock.clone(),
        player.clone(),
        RecordingPresenter::default(),
        SoundSelection {
            handle: SoundHandle::new("Rooster"),
            volume: Volume::new(0.5),
        },
    );
    player.calls.borrow_mut().clear();
    (engine, clock, player)
}
