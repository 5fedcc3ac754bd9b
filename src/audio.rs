use std::{collections::HashMap, fs::File, io::BufReader, path::PathBuf, rc::Rc};

use log::{debug, error};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::{
    error::PlaybackError,
    playback::{Playback, SoundLibrary},
    sound::{SoundHandle, Volume},
};

/// the default audio device, shared by every player on the engine thread
/// rodio streams aren't `Send` so this has to be opened on the thread that uses it
pub struct AudioOutput {
    // the stream stops when this is dropped
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl AudioOutput {
    /// # Errors
    /// if there is no default output device
    pub fn open() -> Result<Rc<Self>, PlaybackError> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| PlaybackError::Device(e.to_string()))?;
        Ok(Rc::new(Self {
            _stream: stream,
            handle,
        }))
    }
}

/// plays catalog sounds on repeat through rodio
pub struct RodioPlayback {
    output: Option<Rc<AudioOutput>>,
    catalog: HashMap<String, PathBuf>,
    sink: Option<Sink>,
}

impl RodioPlayback {
    /// without an output every play fails, but the alarm state still works
    #[must_use]
    pub fn new(output: Option<Rc<AudioOutput>>, catalog: HashMap<String, PathBuf>) -> Self {
        Self {
            output,
            catalog,
            sink: None,
        }
    }

    fn open(&self, sound: &SoundHandle) -> Result<Decoder<BufReader<File>>, PlaybackError> {
        let path = self
            .catalog
            .get(sound.name())
            .ok_or_else(|| PlaybackError::UnknownSound(sound.name().to_string()))?;
        let file = File::open(path).map_err(|source| PlaybackError::Unavailable {
            path: path.clone(),
            source,
        })?;
        Decoder::new(BufReader::new(file)).map_err(|source| PlaybackError::Decode {
            path: path.clone(),
            source,
        })
    }
}

impl SoundLibrary for RodioPlayback {
    fn add_sound(&mut self, name: String, path: PathBuf) {
        self.catalog.insert(name, path);
    }
}

impl Playback for RodioPlayback {
    fn play(&mut self, sound: &SoundHandle, volume: Volume) -> Result<(), PlaybackError> {
        let Some(output) = &self.output else {
            return Err(PlaybackError::Device("no audio output device".to_string()));
        };
        let source = self.open(sound)?;
        // a fresh sink so the sound always starts at the beginning
        let sink = Sink::try_new(&output.handle).map_err(|e| PlaybackError::Device(e.to_string()))?;
        sink.set_volume(volume.get());
        sink.append(source.repeat_infinite());
        sink.play();
        if let Some(old) = self.sink.replace(sink) {
            old.stop();
        }
        debug!("playing {sound} at {volume}");
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn reset(&mut self) {
        // dropping the queued source rewinds, the next play reopens the file
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn set_volume(&mut self, volume: Volume) {
        if let Some(sink) = &self.sink {
            sink.set_volume(volume.get());
        }
    }
}

/// opens the default device, logging instead of failing so the clock still runs silently
#[must_use]
pub fn open_output() -> Option<Rc<AudioOutput>> {
    match AudioOutput::open() {
        Ok(output) => Some(output),
        Err(e) => {
            error!("{e}, alarms will be silent");
            None
        }
    }
}
