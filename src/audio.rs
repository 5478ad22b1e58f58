//! This module handles the audio playback for the game.
use std::collections::HashMap;

use anyhow::{anyhow, Result};
use sdl2::mixer::{self, Channel, Chunk, InitFlag, AUDIO_S16LSB};
use strum::IntoEnumIterator;
use tracing::{debug, trace, warn};

use crate::asset::{AssetRoot, Sound};
use crate::systems::audio::AudioEvent;

const AUDIO_FREQUENCY: i32 = 44_100;
const AUDIO_CHANNELS: i32 = 8;
const CHUNK_SIZE: i32 = 1024;
const DEFAULT_VOLUME: u8 = 64;

/// The audio system for the game.
///
/// If audio fails to initialize, it is disabled and every call silently does nothing.
pub struct Audio {
    _mixer_context: Option<mixer::Sdl2MixerContext>,
    sounds: HashMap<Sound, Chunk>,
    /// Channels playing looped sounds, so they can be stopped individually.
    looping: HashMap<Sound, Channel>,
    state: AudioState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AudioState {
    Enabled { volume: u8 },
    Muted { previous_volume: u8 },
    Disabled,
}

impl Audio {
    pub fn new(assets: &AssetRoot) -> Self {
        match Self::try_new(assets) {
            Ok(audio) => audio,
            Err(e) => {
                warn!("Failed to initialize audio: {}. Audio will be disabled.", e);
                Self {
                    _mixer_context: None,
                    sounds: HashMap::new(),
                    looping: HashMap::new(),
                    state: AudioState::Disabled,
                }
            }
        }
    }

    fn try_new(assets: &AssetRoot) -> Result<Self> {
        mixer::open_audio(AUDIO_FREQUENCY, AUDIO_S16LSB, 2, CHUNK_SIZE).map_err(|e| anyhow!("Failed to open audio: {}", e))?;
        mixer::allocate_channels(AUDIO_CHANNELS);
        for i in 0..AUDIO_CHANNELS {
            Channel(i).set_volume(DEFAULT_VOLUME as i32);
        }

        let mixer_context = mixer::init(InitFlag::OGG).map_err(|e| anyhow!("Failed to initialize SDL2_mixer: {}", e))?;

        let sounds: HashMap<Sound, Chunk> = Sound::iter()
            .filter_map(|sound| match Self::load_sound(assets, sound) {
                Ok(chunk) => Some((sound, chunk)),
                Err(e) => {
                    warn!("Failed to load sound {:?}: {}", sound, e);
                    None
                }
            })
            .collect();

        if sounds.is_empty() {
            return Err(anyhow!("No sounds loaded successfully"));
        }
        debug!(loaded = sounds.len(), "Sounds loaded");

        Ok(Self {
            _mixer_context: Some(mixer_context),
            sounds,
            looping: HashMap::new(),
            state: AudioState::Enabled { volume: DEFAULT_VOLUME },
        })
    }

    fn load_sound(assets: &AssetRoot, sound: Sound) -> Result<Chunk> {
        let path = assets.locate("sound", &sound.path())?;
        let mut chunk = Chunk::from_file(&path).map_err(|e| anyhow!("Failed to decode {}: {}", path.display(), e))?;
        // Footsteps play under everything else.
        if sound == Sound::Step {
            chunk.set_volume(mixer::MAX_VOLUME / 2);
        }
        Ok(chunk)
    }

    fn enabled(&self) -> bool {
        matches!(self.state, AudioState::Enabled { .. })
    }

    /// Carries out a request raised by the simulation or a screen.
    pub fn apply(&mut self, event: AudioEvent) {
        match event {
            AudioEvent::PlaySound(sound) => self.play(sound),
            AudioEvent::LoopSound(sound) => self.play_looped(sound),
            AudioEvent::StopSound(sound) => self.stop(sound),
            AudioEvent::StopAll => self.stop_all(),
            AudioEvent::Pause => self.pause_all(),
            AudioEvent::Resume => self.resume_all(),
        }
    }

    /// Plays the provided sound effect once.
    pub fn play(&mut self, sound: Sound) {
        if !self.enabled() {
            return;
        }
        if let Some(chunk) = self.sounds.get(&sound) {
            match Channel::all().play(chunk, 0) {
                Ok(channel) => trace!(?sound, ?channel, "Playing sound"),
                Err(e) => warn!("Could not play sound {:?}: {}", sound, e),
            }
        }
    }

    /// Plays a sound on repeat until [`Audio::stop`]. Already looping sounds keep playing.
    pub fn play_looped(&mut self, sound: Sound) {
        if !self.enabled() || self.looping.get(&sound).is_some_and(|channel| channel.is_playing()) {
            return;
        }
        if let Some(chunk) = self.sounds.get(&sound) {
            match Channel::all().play(chunk, -1) {
                Ok(channel) => {
                    self.looping.insert(sound, channel);
                }
                Err(e) => warn!("Could not loop sound {:?}: {}", sound, e),
            }
        }
    }

    pub fn stop(&mut self, sound: Sound) {
        if let Some(channel) = self.looping.remove(&sound) {
            if self.state != AudioState::Disabled {
                channel.halt();
            }
        }
    }

    /// Halts all currently playing audio channels.
    pub fn stop_all(&mut self) {
        self.looping.clear();
        if self.state != AudioState::Disabled {
            Channel::all().halt();
        }
    }

    pub fn pause_all(&mut self) {
        if self.state != AudioState::Disabled {
            Channel::all().pause();
        }
    }

    pub fn resume_all(&mut self) {
        if self.state != AudioState::Disabled {
            Channel::all().resume();
        }
    }

    /// Instantly mutes or unmutes all channels by adjusting their volume.
    pub fn set_mute(&mut self, mute: bool) {
        match (mute, self.state) {
            (true, AudioState::Enabled { volume }) => {
                self.state = AudioState::Muted { previous_volume: volume };
                for i in 0..AUDIO_CHANNELS {
                    Channel(i).set_volume(0);
                }
            }
            (false, AudioState::Muted { previous_volume }) => {
                self.state = AudioState::Enabled { volume: previous_volume };
                for i in 0..AUDIO_CHANNELS {
                    Channel(i).set_volume(previous_volume as i32);
                }
            }
            _ => {}
        }
    }

    pub fn toggle_mute(&mut self) {
        let mute = !self.is_muted();
        self.set_mute(mute);
        debug!(muted = self.is_muted(), "Toggled mute");
    }

    pub fn is_muted(&self) -> bool {
        matches!(self.state, AudioState::Muted { .. })
    }
}
