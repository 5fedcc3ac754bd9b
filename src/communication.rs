use std::path::PathBuf;

use crate::{
    engine::Status,
    playback::PlaybackState,
    registry::{AlarmKind, AlarmSlot},
    sound::SoundHandle,
};

/// sent from the gui to the engine thread
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetAlarm {
        kind: AlarmKind,
        hour: u32,
        minute: u32,
    },
    ClearAlarm(AlarmKind),
    SelectSound(SoundHandle),
    AddSound {
        name: String,
        path: PathBuf,
    },
    SetVolume(f32),
    Stop,
    Snooze,
    // previews go to their own player and never touch the alarm state
    Preview(SoundHandle),
    StopPreview,
}

/// sent from the engine thread back to the gui
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Fired(AlarmKind),
    StateChanged(PlaybackState),
    AlarmChanged(AlarmSlot),
    Status(Status),
}
