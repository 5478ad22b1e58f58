use bevy_ecs::{component::Component, system::Query};

use crate::{asset::SpriteKey, systems::components::Renderable};

/// A looping sequence of sprites, advanced once per tick.
///
/// Only the drawn sprite changes; the entity keeps colliding with its rest frame.
#[derive(Component, Debug, Clone)]
pub struct Animation {
    frames: Vec<SpriteKey>,
    ticks_per_frame: u32,
    current_frame: usize,
    tick_bank: u32,
}

impl Animation {
    pub fn new(frames: Vec<SpriteKey>, ticks_per_frame: u32) -> Self {
        Self {
            frames,
            ticks_per_frame: ticks_per_frame.max(1),
            current_frame: 0,
            tick_bank: 0,
        }
    }

    /// Frame length in ticks for a frame length in milliseconds at the given tick rate.
    pub fn ticks_for(frame_millis: u64, fps: u32) -> u32 {
        ((frame_millis * u64::from(fps)) / 1000).max(1) as u32
    }

    pub fn tick(&mut self) {
        self.tick_bank += 1;
        while self.tick_bank >= self.ticks_per_frame {
            self.tick_bank -= self.ticks_per_frame;
            self.current_frame = (self.current_frame + 1) % self.frames.len().max(1);
        }
    }

    pub fn current(&self) -> Option<&SpriteKey> {
        self.frames.get(self.current_frame)
    }

    pub fn frame_index(&self) -> usize {
        self.current_frame
    }
}

/// Advances every animation and points its renderable at the current frame.
pub fn animation_system(mut animated: Query<(&mut Animation, &mut Renderable)>) {
    for (mut animation, mut renderable) in animated.iter_mut() {
        animation.tick();
        if let Some(frame) = animation.current() {
            if renderable.sprite != *frame {
                renderable.sprite = frame.clone();
            }
        }
    }
}
