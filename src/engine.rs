//! The trigger engine.
//!
//! Every tick the engine reads the clock, lets a snoozed alarm resume if its
//! time has come, then checks both alarm slots against the current minute.
//! Matches are handed straight to the playback state machine with the current
//! sound selection. Everything the presentation side needs to know goes out
//! through a [`Presenter`].

use chrono::{Duration, NaiveDateTime};
use log::{info, warn};

use crate::{
    clock::ClockSource,
    error::{InvalidStateTransitionError, InvalidTimeError},
    playback::{
        snooze_delay, Fired, Playback, PlaybackMachine, PlaybackState, DEFAULT_SNOOZE_MINUTES,
    },
    registry::{AlarmKind, AlarmRegistry, AlarmSlot},
    sound::{SoundHandle, SoundSelection, Volume},
    time::TimeOfDay,
};

/// an alarm slot matched the current minute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FireEvent {
    pub kind: AlarmKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// a short message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub severity: Severity,
    pub message: String,
}

impl Status {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }
}

/// the presentation side of the engine
pub trait Presenter {
    fn on_fired(&mut self, kind: AlarmKind);
    fn on_state_changed(&mut self, state: &PlaybackState);
    fn on_alarm_changed(&mut self, slot: &AlarmSlot);
    fn on_status(&mut self, status: Status);
}

pub struct TriggerEngine<C, P, N> {
    clock: C,
    registry: AlarmRegistry,
    machine: PlaybackMachine<P>,
    selection: SoundSelection,
    snooze_minutes: u32,
    presenter: N,
}

impl<C, P, N> TriggerEngine<C, P, N>
where
    C: ClockSource,
    P: Playback,
    N: Presenter,
{
    pub fn new(clock: C, player: P, presenter: N, selection: SoundSelection) -> Self {
        Self {
            clock,
            registry: AlarmRegistry::new(),
            machine: PlaybackMachine::new(player, selection.volume),
            selection,
            snooze_minutes: DEFAULT_SNOOZE_MINUTES,
            presenter,
        }
    }

    #[must_use]
    pub fn with_snooze_minutes(mut self, minutes: u32) -> Self {
        self.snooze_minutes = minutes;
        self
    }

    /// samples the clock and runs one tick
    pub fn tick(&mut self) -> Vec<FireEvent> {
        let now = self.clock.now();
        self.on_tick(now)
    }

    /// resumes a due snooze, then fires every armed slot matching `now` for the first time
    pub fn on_tick(&mut self, now: NaiveDateTime) -> Vec<FireEvent> {
        if let Some(fired) = self.machine.poll(now, self.selection.volume) {
            self.report(fired);
        }

        let events: Vec<_> = AlarmKind::ALL
            .into_iter()
            .filter(|kind| self.registry.slot_mut(*kind).check(now))
            .map(|kind| FireEvent { kind })
            .collect();

        for event in &events {
            info!("{} went off at {}", event.kind, now.format("%Y-%m-%d %H:%M:%S"));
            self.presenter.on_fired(event.kind);
            let fired = self
                .machine
                .fire(self.selection.handle.clone(), self.selection.volume);
            self.report(fired);
        }
        events
    }

    fn report(&mut self, fired: Fired) {
        if fired.changed_state() {
            self.presenter.on_state_changed(self.machine.state());
        }
        match fired {
            Fired::Started => {}
            Fired::Suppressed => self
                .presenter
                .on_status(Status::info("Another alarm is already ringing")),
            Fired::Silent(e) => self
                .presenter
                .on_status(Status::warning(format!("Couldn't play alarm sound: {e}"))),
        }
    }

    /// # Errors
    /// if the time is out of range, the slot is left untouched
    pub fn set_alarm(
        &mut self,
        kind: AlarmKind,
        hour: u32,
        minute: u32,
    ) -> Result<TimeOfDay, InvalidTimeError> {
        match self.registry.set_alarm(kind, hour, minute) {
            Ok(target) => {
                info!("{kind} set for {target}");
                self.presenter.on_alarm_changed(&self.registry.get_alarm(kind));
                self.presenter
                    .on_status(Status::success(format!("{} set successfully!", kind.label())));
                Ok(target)
            }
            Err(e) => {
                warn!("rejected {kind}: {e}");
                self.presenter.on_status(Status::error(format!("Invalid time: {e}")));
                Err(e)
            }
        }
    }

    /// disarms the slot, a pending snooze is left alone
    pub fn clear_alarm(&mut self, kind: AlarmKind) {
        self.registry.clear_alarm(kind);
        info!("{kind} cleared");
        self.presenter.on_alarm_changed(&self.registry.get_alarm(kind));
        self.presenter
            .on_status(Status::info(format!("{} cleared", kind.label())));
    }

    #[must_use]
    pub fn get_alarm(&self, kind: AlarmKind) -> AlarmSlot {
        self.registry.get_alarm(kind)
    }

    /// used for the next time an alarm rings, not the one ringing now
    pub fn set_sound_selection(&mut self, handle: SoundHandle) {
        info!("alarm sound is now {handle}");
        self.selection.handle = handle;
    }

    pub fn set_volume(&mut self, volume: f32) -> Volume {
        let volume = self.machine.set_volume(volume);
        self.selection.volume = volume;
        volume
    }

    /// returns false if nothing was ringing or snoozed
    pub fn stop(&mut self) -> bool {
        let stopped = self.machine.stop();
        if stopped {
            info!("alarm stopped");
            self.presenter.on_state_changed(self.machine.state());
            self.presenter.on_status(Status::success("Alarm stopped!"));
        } else {
            self.presenter.on_status(Status::info("No alarm to stop"));
        }
        stopped
    }

    /// # Errors
    /// unless an alarm is ringing, which the presenter is told about as information
    pub fn snooze(&mut self) -> Result<NaiveDateTime, InvalidStateTransitionError> {
        let now = self.clock.now();
        match self.machine.snooze(now, self.snooze_delay()) {
            Ok(resume_at) => {
                info!("alarm snoozed until {resume_at}");
                self.presenter.on_state_changed(self.machine.state());
                self.presenter.on_status(Status::success(format!(
                    "Alarm snoozed for {} minutes!",
                    self.snooze_minutes
                )));
                Ok(resume_at)
            }
            Err(e) => {
                info!("ignored snooze: {e}");
                self.presenter.on_status(Status::info("No alarm to snooze"));
                Err(e)
            }
        }
    }

    fn snooze_delay(&self) -> Duration {
        snooze_delay(self.snooze_minutes)
    }

    #[must_use]
    pub const fn state(&self) -> &PlaybackState {
        self.machine.state()
    }

    #[must_use]
    pub const fn selection(&self) -> &SoundSelection {
        &self.selection
    }

    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    #[must_use]
    pub const fn player(&self) -> &P {
        self.machine.player()
    }

    pub fn player_mut(&mut self) -> &mut P {
        self.machine.player_mut()
    }

    #[must_use]
    pub const fn presenter(&self) -> &N {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut N {
        &mut self.presenter
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{clock::SimulatedClock, error::PlaybackError};

    #[derive(Default)]
    struct Player {
        plays: Vec<String>,
        volume: f32,
    }

    impl Playback for Player {
        fn play(&mut self, sound: &SoundHandle, _volume: Volume) -> Result<(), PlaybackError> {
            self.plays.push(sound.name().to_string());
            Ok(())
        }
        fn pause(&mut self) {}
        fn reset(&mut self) {}
        fn set_volume(&mut self, volume: Volume) {
            self.volume = volume.get();
        }
    }

    #[derive(Default)]
    struct Screen {
        fired: Vec<AlarmKind>,
        states: Vec<PlaybackState>,
        statuses: Vec<Status>,
    }

    impl Presenter for Screen {
        fn on_fired(&mut self, kind: AlarmKind) {
            self.fired.push(kind);
        }
        fn on_state_changed(&mut self, state: &PlaybackState) {
            self.states.push(state.clone());
        }
        fn on_alarm_changed(&mut self, _slot: &AlarmSlot) {}
        fn on_status(&mut self, status: Status) {
            self.statuses.push(status);
        }
    }

    fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    fn engine() -> TriggerEngine<SimulatedClock, Player, Screen> {
        TriggerEngine::new(
            SimulatedClock::new(at(6, 0, 0)),
            Player::default(),
            Screen::default(),
            SoundSelection {
                handle: SoundHandle::new("gaming"),
                volume: Volume::default(),
            },
        )
    }

    #[test]
    fn no_match_no_fire() {
        let mut engine = engine();
        engine.set_alarm(AlarmKind::Wake, 7, 0).unwrap();
        for minute in 0..60 {
            assert!(engine.on_tick(at(6, minute, 30)).is_empty());
        }
        assert!(engine.on_tick(at(7, 1, 0)).is_empty());
        assert!(engine.state().is_idle());
    }

    #[test]
    fn coinciding_alarms_fire_both_but_play_once() {
        let mut engine = engine();
        engine.set_alarm(AlarmKind::Wake, 21, 30).unwrap();
        engine.set_alarm(AlarmKind::Bedtime, 21, 30).unwrap();
        let events = engine.on_tick(at(21, 30, 0));
        assert_eq!(
            events,
            vec![
                FireEvent {
                    kind: AlarmKind::Wake
                },
                FireEvent {
                    kind: AlarmKind::Bedtime
                }
            ]
        );
        assert_eq!(engine.player().plays, vec!["gaming".to_string()]);
        assert_eq!(
            engine.presenter().statuses.last(),
            Some(&Status::info("Another alarm is already ringing"))
        );
    }

    #[test]
    fn invalid_time_is_reported() {
        let mut engine = engine();
        assert!(engine.set_alarm(AlarmKind::Bedtime, 24, 0).is_err());
        assert!(!engine.get_alarm(AlarmKind::Bedtime).armed);
        assert_eq!(
            engine.presenter().statuses.last().map(|s| s.severity),
            Some(Severity::Error)
        );
    }

    #[test]
    fn snooze_from_idle_is_informational() {
        let mut engine = engine();
        assert!(engine.snooze().is_err());
        assert_eq!(
            engine.presenter().statuses.last(),
            Some(&Status::info("No alarm to snooze"))
        );
        assert!(engine.state().is_idle());
    }

    #[test]
    fn selection_is_last_write_wins() {
        let mut engine = engine();
        engine.set_sound_selection(SoundHandle::new("rooster"));
        engine.set_sound_selection(SoundHandle::new("sci-fi"));
        assert_eq!(engine.set_volume(3.0), Volume::FULL);
        engine.set_alarm(AlarmKind::Wake, 6, 0).unwrap();
        engine.tick();
        assert_eq!(engine.player().plays, vec!["sci-fi".to_string()]);
        assert!((engine.player().volume - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn configured_snooze_length() {
        let mut engine = engine().with_snooze_minutes(5);
        engine.set_alarm(AlarmKind::Wake, 6, 0).unwrap();
        engine.tick();
        let resume_at = engine.snooze().unwrap();
        assert_eq!(resume_at, at(6, 5, 0));
        assert_eq!(
            engine.presenter().statuses.last(),
            Some(&Status::success("Alarm snoozed for 5 minutes!"))
        );
    }
}
