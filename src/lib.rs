#![warn(clippy::pedantic, clippy::nursery, clippy::cargo)]
#![deny(clippy::use_self, rust_2018_idioms)]
#![allow(clippy::multiple_crate_versions, clippy::module_name_repetitions)]

//! A desktop clock with a wake alarm and a bedtime reminder.
//!
//! The interesting part is the [`engine::TriggerEngine`]: it samples an injected
//! [`clock::ClockSource`] once a second, fires the [`registry::AlarmRegistry`]
//! slots whose minute has come, and drives the [`playback::PlaybackMachine`]
//! through ringing, stopping and snoozing. The egui front end in [`app`] talks
//! to it over channels through [`service`].

pub mod audio;
pub mod clock;
pub mod communication;
pub mod config;
pub mod engine;
pub mod error;
pub mod playback;
pub mod registry;
pub mod service;
pub mod sound;
pub mod time;

/// the egui clock face
pub mod app;
/// alarm and sound pickers for egui
pub mod dialog;
pub mod widgets;

pub use app::ClockApp;
pub use engine::{FireEvent, Presenter, Status, TriggerEngine};
pub use registry::{AlarmKind, AlarmSlot};
