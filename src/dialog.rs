use std::{ffi::OsStr, path::Path, path::PathBuf};

use eframe::egui::{self, ScrollArea, TextEdit, Window};

use crate::{registry::AlarmKind, time::TimeOfDay, widgets::Dial};

pub enum EditingState {
    Editing,
    Cancelled,
    Cleared,
    Done { hour: u32, minute: u32 },
}

/// the "Set Alarm" and "Set Bed Time" windows
/// typed values aren't clamped here, the engine decides whether they're valid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmDialog {
    kind: AlarmKind,
    hour: u8,
    minute: u8,
    hour_string: String,
    minute_string: String,
}

impl AlarmDialog {
    #[must_use]
    pub fn new(kind: AlarmKind, start: TimeOfDay) -> Self {
        // TimeOfDay is always in range so these fit
        let hour = start.hour() as u8;
        let minute = start.minute() as u8;
        Self {
            kind,
            hour,
            minute,
            hour_string: hour.to_string(),
            minute_string: minute.to_string(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> AlarmKind {
        self.kind
    }

    fn title(&self) -> &'static str {
        match self.kind {
            AlarmKind::Wake => "Set Alarm",
            AlarmKind::Bedtime => "Set Bed Time",
        }
    }

    pub fn render(&mut self, ctx: &egui::Context) -> EditingState {
        let mut ret = EditingState::Editing;
        let mut open = true;
        Window::new(self.title())
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    self.render_hour_selector(ui);
                    ui.label(":");
                    self.render_minute_selector(ui);
                });
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        ret = EditingState::Cancelled;
                    }
                    if ui.button("Clear").on_hover_text("turn this off").clicked() {
                        ret = EditingState::Cleared;
                    }
                    if ui.button("Set").clicked() {
                        ret = EditingState::Done {
                            hour: u32::from(self.hour),
                            minute: u32::from(self.minute),
                        };
                    }
                });
            });
        // closing the window counts as cancelling
        if !open {
            ret = EditingState::Cancelled;
        }
        ret
    }

    fn render_hour_selector(&mut self, ui: &mut egui::Ui) {
        ui.vertical(|ui| {
            ui.label("Hour");
            let hand = ui.visuals().selection.bg_fill;
            if ui
                .add(Dial::new(&mut self.hour, 24).radius(40.).hand_color(hand))
                .changed()
            {
                self.hour_string = self.hour.to_string();
            }
            Self::render_stepper(ui, &mut self.hour, &mut self.hour_string, 23);
        });
    }

    fn render_minute_selector(&mut self, ui: &mut egui::Ui) {
        ui.vertical(|ui| {
            ui.label("Minute");
            if ui.add(Dial::new(&mut self.minute, 60).radius(40.)).changed() {
                self.minute_string = self.minute.to_string();
            }
            Self::render_stepper(ui, &mut self.minute, &mut self.minute_string, 59);
        });
    }

    fn render_stepper(ui: &mut egui::Ui, value: &mut u8, text: &mut String, max: u8) {
        ui.horizontal(|ui| {
            if ui.button("-").clicked() && *value > 0 {
                *value -= 1;
                *text = value.to_string();
            }
            let typed = ui.add(TextEdit::singleline(text).desired_width(20.0).char_limit(2));
            if typed.lost_focus() {
                if let Ok(typed) = text.parse::<u8>() {
                    *value = typed;
                }
                *text = value.to_string();
            }
            if ui.button("+").clicked() && *value < max {
                *value += 1;
                *text = value.to_string();
            }
        });
    }
}

pub enum SoundAction {
    Preview(String),
    StopPreview,
    Added(Vec<(String, PathBuf)>),
    Chosen(String),
    Cancelled,
}

/// the "Select Alarm Sound" window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundDialog {
    selected: String,
}

impl SoundDialog {
    #[must_use]
    pub const fn new(selected: String) -> Self {
        Self { selected }
    }

    pub fn render(&mut self, ctx: &egui::Context, names: &[&str]) -> Vec<SoundAction> {
        let mut actions = Vec::new();
        let mut open = true;
        Window::new("Select Alarm Sound")
            .collapsible(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ScrollArea::vertical()
                    .id_salt("sounds")
                    .max_height(200.)
                    .show(ui, |ui| {
                        for name in names {
                            ui.horizontal(|ui| {
                                ui.selectable_value(&mut self.selected, (*name).to_string(), *name);
                                if ui.button("▶").on_hover_text("preview").clicked() {
                                    actions.push(SoundAction::Preview((*name).to_string()));
                                }
                                if ui.button("⏹").on_hover_text("stop preview").clicked() {
                                    actions.push(SoundAction::StopPreview);
                                }
                            });
                        }
                    });
                if ui.button("Custom").clicked() {
                    let added = pick_custom_sounds();
                    if !added.is_empty() {
                        actions.push(SoundAction::Added(added));
                    }
                }
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        actions.push(SoundAction::Cancelled);
                    }
                    if ui.button("Set").clicked() {
                        actions.push(SoundAction::Chosen(self.selected.clone()));
                    }
                });
            });
        if !open {
            actions.push(SoundAction::Cancelled);
        }
        actions
    }
}

fn pick_custom_sounds() -> Vec<(String, PathBuf)> {
    let file_dialog = rfd::FileDialog::new()
        .set_title("Pick alarm sound")
        .add_filter("audio", &["wav", "mp3", "ogg", "flac"]);
    let file_dialog = match directories::UserDirs::new()
        .and_then(|u| u.audio_dir().map(Path::to_path_buf))
    {
        Some(audio_path) => file_dialog.set_directory(audio_path),
        None => file_dialog,
    };

    file_dialog
        .pick_files()
        .unwrap_or_default()
        .into_iter()
        .filter_map(|path| {
            let name = path.file_stem().and_then(OsStr::to_str)?.to_string();
            Some((name, path))
        })
        .collect()
}
