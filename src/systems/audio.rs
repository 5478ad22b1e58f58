//! Sound requests raised by the simulation.
//!
//! Systems never talk to the mixer. They write [`AudioEvent`]s, which the application drains
//! after every tick and hands to the SDL mixer wrapper in [`crate::audio`].

use bevy_ecs::event::Event;

use crate::asset::Sound;

/// Events for triggering audio playback
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEvent {
    /// Play a sound effect once
    PlaySound(Sound),
    /// Play a sound on repeat until it is stopped
    LoopSound(Sound),
    /// Stop a specific sound
    StopSound(Sound),
    /// Stop all currently playing sounds
    StopAll,
    /// Pause all sounds
    Pause,
    /// Resume all sounds
    Resume,
}
