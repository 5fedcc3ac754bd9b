//! The engine thread.
//!
//! The engine has a single owner: one thread that waits on the command queue
//! until the next tick is due. Gui commands, ticks and snooze resumes are all
//! handled in that one loop, so none of them can interleave.

use std::{
    io,
    sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryIter},
    thread::{self, JoinHandle},
};

use log::{debug, info, warn};

use crate::{
    audio::{self, RodioPlayback},
    clock::{ClockSource, SystemClock, Ticker},
    communication::{Command, Event},
    config::Config,
    engine::{Presenter, Status, TriggerEngine},
    playback::{Playback, PlaybackState, SoundLibrary},
    registry::{AlarmKind, AlarmSlot},
    sound::SoundSelection,
};

/// forwards engine notifications to the gui over a channel
#[derive(Debug, Clone)]
pub struct ChannelPresenter {
    events: Sender<Event>,
}

impl ChannelPresenter {
    #[must_use]
    pub const fn new(events: Sender<Event>) -> Self {
        Self { events }
    }

    fn send(&self, event: Event) {
        if self.events.send(event).is_err() {
            debug!("gui has gone away, dropping event");
        }
    }
}

impl Presenter for ChannelPresenter {
    fn on_fired(&mut self, kind: AlarmKind) {
        self.send(Event::Fired(kind));
    }

    fn on_state_changed(&mut self, state: &PlaybackState) {
        self.send(Event::StateChanged(state.clone()));
    }

    fn on_alarm_changed(&mut self, slot: &AlarmSlot) {
        self.send(Event::AlarmChanged(slot.clone()));
    }

    fn on_status(&mut self, status: Status) {
        self.send(Event::Status(status));
    }
}

/// owns the engine plus a second player for previewing sounds
pub struct EngineService<C, P, N> {
    engine: TriggerEngine<C, P, N>,
    preview: P,
    ticker: Ticker,
}

impl<C, P, N> EngineService<C, P, N>
where
    C: ClockSource,
    P: Playback + SoundLibrary,
    N: Presenter,
{
    pub const fn new(engine: TriggerEngine<C, P, N>, preview: P, ticker: Ticker) -> Self {
        Self {
            engine,
            preview,
            ticker,
        }
    }

    pub fn handle(&mut self, command: Command) {
        debug!("handling {command:?}");
        match command {
            Command::SetAlarm { kind, hour, minute } => {
                // the presenter has already been told why
                let _ = self.engine.set_alarm(kind, hour, minute);
            }
            Command::ClearAlarm(kind) => self.engine.clear_alarm(kind),
            Command::SelectSound(handle) => self.engine.set_sound_selection(handle),
            Command::AddSound { name, path } => {
                self.engine.player_mut().add_sound(name.clone(), path.clone());
                self.preview.add_sound(name, path);
            }
            Command::SetVolume(volume) => {
                let volume = self.engine.set_volume(volume);
                self.preview.set_volume(volume);
            }
            Command::Stop => {
                self.engine.stop();
            }
            Command::Snooze => {
                let _ = self.engine.snooze();
            }
            Command::Preview(handle) => {
                let volume = self.engine.selection().volume;
                if let Err(e) = self.preview.play(&handle, volume) {
                    warn!("couldn't preview {handle}: {e}");
                    self.engine
                        .presenter_mut()
                        .on_status(Status::warning(format!("Couldn't preview {handle}: {e}")));
                }
            }
            Command::StopPreview => {
                self.preview.pause();
                self.preview.reset();
            }
        }
    }

    /// runs until every command sender is dropped, then hands the engine back
    pub fn run(mut self, commands: &Receiver<Command>) -> TriggerEngine<C, P, N> {
        info!("engine running, ticking every {:?}", self.ticker.period());
        loop {
            match commands.recv_timeout(self.ticker.remaining()) {
                Ok(command) => self.handle(command),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            if self.ticker.poll() {
                self.engine.tick();
            }
        }
        self.preview.reset();
        info!("engine shutting down");
        self.engine
    }
}

/// the gui's side of the engine thread
pub struct EngineHandle {
    commands: Sender<Command>,
    events: Receiver<Event>,
    thread: JoinHandle<()>,
    stop_reported: bool,
}

impl EngineHandle {
    pub fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            warn!("engine thread has stopped");
        }
    }

    /// events that have arrived since the last call, without waiting
    pub fn events(&self) -> TryIter<'_, Event> {
        self.events.try_iter()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.thread.is_finished()
    }

    /// true the first time it's asked after the engine thread has exited, false after that
    pub fn just_stopped(&mut self) -> bool {
        if self.stop_reported || self.is_running() {
            return false;
        }
        self.stop_reported = true;
        true
    }

    /// closes the command queue and waits for the engine to finish
    pub fn shutdown(self) {
        let Self {
            commands, thread, ..
        } = self;
        drop(commands);
        if thread.join().is_err() {
            warn!("engine thread panicked");
        }
    }
}

/// starts the engine on its own thread with the real clock and audio
/// `selection` is the sound and volume this session starts with
///
/// # Errors
/// if the thread can't be spawned
pub fn spawn(config: &Config, selection: SoundSelection) -> io::Result<EngineHandle> {
    let (command_tx, command_rx) = mpsc::channel();
    let (event_tx, event_rx) = mpsc::channel();
    let catalog = config.catalog();
    let snooze_minutes = config.snooze_minutes;

    let thread = thread::Builder::new()
        .name("engine".to_string())
        .spawn(move || {
            // the audio stream isn't Send so it's opened here rather than by the caller
            let output = audio::open_output();
            let engine = TriggerEngine::new(
                SystemClock,
                RodioPlayback::new(output.clone(), catalog.clone()),
                ChannelPresenter::new(event_tx),
                selection,
            )
            .with_snooze_minutes(snooze_minutes);
            let preview = RodioPlayback::new(output, catalog);
            EngineService::new(engine, preview, Ticker::default()).run(&command_rx);
        })?;

    Ok(EngineHandle {
        commands: command_tx,
        events: event_rx,
        thread,
        stop_reported: false,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn stopped_engine_is_reported_once() {
        let (commands, _) = mpsc::channel();
        let (_, events) = mpsc::channel();
        let mut handle = EngineHandle {
            commands,
            events,
            thread: thread::spawn(|| {}),
            stop_reported: false,
        };
        while handle.is_running() {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(handle.just_stopped());
        assert!(!handle.just_stopped());
        assert!(!handle.just_stopped());
    }

    #[test]
    fn running_engine_is_not_reported() {
        let (commands, command_rx) = mpsc::channel::<Command>();
        let (_, events) = mpsc::channel();
        let mut handle = EngineHandle {
            commands,
            events,
            thread: thread::spawn(move || while command_rx.recv().is_ok() {}),
            stop_reported: false,
        };
        assert!(!handle.just_stopped());
        handle.shutdown();
    }
}
