use std::{error::Error, path::PathBuf};

use chrono::{NaiveTime, Timelike};
use clap::{Parser, Subcommand};
use eframe::{egui::ViewportBuilder, run_native};
use log::{error, info};
use snooze_clock::{
    communication::Command,
    config::Config,
    service, AlarmKind, ClockApp,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Option<Cmd>,
    /// arm the wake alarm for this session (HH:MM)
    #[clap(long, value_parser = parse_time)]
    wake: Option<NaiveTime>,
    /// arm the bedtime reminder for this session (HH:MM)
    #[clap(long, value_parser = parse_time)]
    bedtime: Option<NaiveTime>,
    /// name of the sound to ring with
    #[clap(long)]
    sound: Option<String>,
    /// between 0 and 1
    #[clap(long)]
    volume: Option<f32>,
}

#[derive(Subcommand)]
enum Cmd {
    /// write the default config and create the sounds directory
    Init {
        #[clap(long, short)]
        force: bool,
    },
    /// add a sound file to the catalog
    AddSound { name: String, path: PathBuf },
    /// list the sounds in the catalog
    Sounds,
}

fn parse_time(time: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(time, "%H:%M")
}

fn main() -> Result<(), Box<dyn Error>> {
    if let Err(e) = simple_file_logger::init_logger!("snooze_clock") {
        eprintln!("couldn't initialize logger: {e:?}");
    }

    let args = Args::parse();
    let config_path = Config::config_path()?;
    match args.command {
        Some(Cmd::Init { force }) => {
            if force || !Config::is_config_present() {
                Config::new().save(&config_path)?;
                std::fs::create_dir_all(Config::sounds_path()?)?;
                println!("wrote {}", config_path.display());
                println!(
                    "put alarm1.wav, alarm2.wav and alarm3.wav in {}",
                    Config::sounds_path()?.display()
                );
            } else {
                println!("{} already exists, use --force to overwrite", config_path.display());
            }
            return Ok(());
        }
        Some(Cmd::AddSound { name, path }) => {
            let mut config = Config::load_or_default(&config_path)?;
            if config.add_sound(name.clone(), path).is_some() {
                println!("replaced {name}");
            }
            config.save(&config_path)?;
            return Ok(());
        }
        Some(Cmd::Sounds) => {
            let config = Config::load_or_default(&config_path)?;
            for name in config.sound_names() {
                let marker = if name == config.default_sound { "*" } else { " " };
                println!("{marker} {}", config.sounds[name]);
            }
            return Ok(());
        }
        None => {}
    }

    let config = Config::load_or_default(&config_path)?;
    let selection = config.session_selection(args.sound, args.volume)?;

    let engine = service::spawn(&config, selection.clone())?;
    for (kind, time) in [(AlarmKind::Wake, args.wake), (AlarmKind::Bedtime, args.bedtime)] {
        if let Some(time) = time {
            engine.send(Command::SetAlarm {
                kind,
                hour: time.hour(),
                minute: time.minute(),
            });
        }
    }
    info!("starting clock");

    let native_options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_title("Snooze Clock")
            .with_inner_size([360.0, 480.0]),
        ..Default::default()
    };
    // run the gui
    run_native(
        "Snooze Clock",
        native_options,
        Box::new(move |_| Ok(Box::new(ClockApp::new(config, engine, &selection)))),
    )
    .map_err(|e| {
        error!("gui exited with {e}");
        e.into()
    })
}
