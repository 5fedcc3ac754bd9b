use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use eframe::egui::{
    self, Align, Button, CentralPanel, Color32, Context, Layout, RichText, Slider, TopBottomPanel,
};
use log::{error, info};

use crate::{
    communication::{Command, Event},
    config::Config,
    dialog::{AlarmDialog, EditingState, SoundAction, SoundDialog},
    engine::{Severity, Status},
    playback::PlaybackState,
    registry::{AlarmKind, AlarmSlot},
    service::EngineHandle,
    sound::{SoundHandle, SoundSelection},
    time::TimeOfDay,
};

/// how long a status message stays on screen
const SNACKBAR_TIMEOUT: Duration = Duration::from_secs(6);

/// the clock face
/// it only mirrors what the engine thread reports and sends it commands
pub struct ClockApp {
    config: Config,
    engine: EngineHandle,
    state: PlaybackState,
    alarms: HashMap<AlarmKind, AlarmSlot>,
    editing: Option<AlarmDialog>,
    choosing_sound: Option<SoundDialog>,
    sound: String,
    volume: f32,
    snackbar: Option<(Status, Instant)>,
}

impl ClockApp {
    #[must_use]
    /// `selection` is what the engine was started with, which can differ from the config's defaults
    pub fn new(config: Config, engine: EngineHandle, selection: &SoundSelection) -> Self {
        Self {
            sound: selection.handle.name().to_string(),
            volume: selection.volume.get(),
            config,
            engine,
            state: PlaybackState::Idle,
            alarms: HashMap::new(),
            editing: None,
            choosing_sound: None,
            snackbar: None,
        }
    }

    fn show_status(&mut self, status: Status) {
        self.snackbar = Some((status, Instant::now()));
    }

    fn receive_events(&mut self) {
        // collected first since handling needs &mut self
        let events: Vec<_> = self.engine.events().collect();
        for event in events {
            match event {
                Event::Fired(kind) => self.show_status(Status::warning(match kind {
                    AlarmKind::Wake => "Wake up! ⏰",
                    AlarmKind::Bedtime => "Time for bed! 🛏",
                })),
                Event::StateChanged(state) => self.state = state,
                Event::AlarmChanged(slot) => {
                    self.alarms.insert(slot.kind, slot);
                }
                Event::Status(status) => self.show_status(status),
            }
        }
    }

    fn render_clock(&self, ui: &mut egui::Ui) {
        let now = chrono::Local::now().naive_local();
        ui.label(now.format(&self.config.date_format).to_string());
        ui.label(
            RichText::new(now.format(&self.config.time_format).to_string())
                .size(48.)
                .strong(),
        );
    }

    fn render_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("⏰").on_hover_text("set alarm").clicked() {
                self.open_alarm_dialog(AlarmKind::Wake);
            }
            if ui.button("🛏").on_hover_text("set bed time").clicked() {
                self.open_alarm_dialog(AlarmKind::Bedtime);
            }
            if ui.button("🎵").on_hover_text("alarm sound").clicked() {
                self.choosing_sound = Some(SoundDialog::new(self.sound.clone()));
            }
        });
    }

    fn render_alarms(&self, ui: &mut egui::Ui) {
        for kind in AlarmKind::ALL {
            let text = match self.alarms.get(&kind) {
                Some(slot) if slot.armed => format!("{}: {}", kind.label(), slot.target),
                Some(slot) => format!("{}: {} (off)", kind.label(), slot.target),
                None => format!("{}: not set", kind.label()),
            };
            ui.label(text);
        }
        ui.label(format!("sound: {}", self.sound));
    }

    fn render_playback(&mut self, ui: &mut egui::Ui) {
        if ui
            .add(Slider::new(&mut self.volume, 0.0..=1.0).step_by(0.01).text("volume"))
            .changed()
        {
            self.engine.send(Command::SetVolume(self.volume));
        }
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!self.state.is_idle(), Button::new("Stop"))
                .clicked()
            {
                self.engine.send(Command::Stop);
            }
            if ui
                .add_enabled(self.state.can_snooze(), Button::new("Snooze"))
                .clicked()
            {
                self.engine.send(Command::Snooze);
            }
        });
        if let PlaybackState::SnoozeScheduled(_, resume_at) = &self.state {
            ui.label(format!("snoozed until {}", resume_at.format("%H:%M")));
        }
    }

    fn open_alarm_dialog(&mut self, kind: AlarmKind) {
        let start = self
            .alarms
            .get(&kind)
            .map_or_else(TimeOfDay::default, |slot| slot.target);
        self.editing = Some(AlarmDialog::new(kind, start));
    }

    fn render_alarm_dialog(&mut self, ctx: &Context) {
        let Some(dialog) = &mut self.editing else {
            return;
        };
        let kind = dialog.kind();
        match dialog.render(ctx) {
            EditingState::Editing => {}
            EditingState::Done { hour, minute } => {
                self.editing = None;
                self.engine.send(Command::SetAlarm { kind, hour, minute });
            }
            EditingState::Cleared => {
                self.editing = None;
                self.engine.send(Command::ClearAlarm(kind));
            }
            EditingState::Cancelled => {
                self.editing = None;
                self.show_status(Status::error(format!(
                    "{} setting cancelled!",
                    kind.label()
                )));
            }
        }
    }

    fn render_sound_dialog(&mut self, ctx: &Context) {
        let Some(dialog) = &mut self.choosing_sound else {
            return;
        };
        let actions = {
            let names = self.config.sound_names();
            dialog.render(ctx, &names)
        };
        for action in actions {
            match action {
                SoundAction::Preview(name) => {
                    self.engine.send(Command::Preview(SoundHandle::new(name)));
                }
                SoundAction::StopPreview => self.engine.send(Command::StopPreview),
                SoundAction::Added(sounds) => self.add_sounds(sounds),
                SoundAction::Chosen(name) => {
                    self.engine.send(Command::StopPreview);
                    self.engine.send(Command::SelectSound(SoundHandle::new(name.clone())));
                    self.sound = name;
                    self.choosing_sound = None;
                }
                SoundAction::Cancelled => {
                    self.engine.send(Command::StopPreview);
                    self.choosing_sound = None;
                }
            }
        }
    }

    fn add_sounds(&mut self, sounds: Vec<(String, std::path::PathBuf)>) {
        for (name, path) in sounds {
            info!("adding custom sound {name} from {}", path.display());
            self.config.add_sound(name.clone(), path.clone());
            self.engine.send(Command::AddSound { name, path });
        }
        // the sound catalog is the only thing worth keeping between runs
        match Config::config_path().and_then(|path| self.config.save(&path)) {
            Ok(()) => self.show_status(Status::success("Sound added!")),
            Err(e) => {
                error!("couldn't save config: {e}");
                self.show_status(Status::warning(format!("Sound added but not saved: {e}")));
            }
        }
    }

    fn render_snackbar(&mut self, ctx: &Context) {
        if self
            .snackbar
            .as_ref()
            .is_some_and(|(_, shown)| shown.elapsed() >= SNACKBAR_TIMEOUT)
        {
            self.snackbar = None;
        }
        let Some((status, _)) = &self.snackbar else {
            return;
        };
        let color = match status.severity {
            Severity::Success => Color32::from_rgb(46, 125, 50),
            Severity::Info => Color32::from_rgb(2, 136, 209),
            Severity::Warning => Color32::from_rgb(237, 108, 2),
            Severity::Error => Color32::from_rgb(211, 47, 47),
        };
        let message = status.message.clone();
        TopBottomPanel::bottom("snackbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(message).color(color));
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.button("x").clicked() {
                        self.snackbar = None;
                    }
                });
            });
        });
    }
}

impl eframe::App for ClockApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // keep redrawing so the clock face and snackbar timeout stay current
        ctx.request_repaint_after(Duration::from_millis(250));
        if self.engine.just_stopped() {
            self.show_status(Status::error("Alarm engine stopped, alarms won't ring"));
        }
        self.receive_events();

        self.render_alarm_dialog(ctx);
        self.render_sound_dialog(ctx);
        self.render_snackbar(ctx);
        CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                self.render_clock(ui);
                ui.add_space(10.);
                self.render_controls(ui);
                ui.separator();
                self.render_alarms(ui);
                ui.separator();
                self.render_playback(ui);
            });
        });
    }
}
