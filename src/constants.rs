//! This module contains all the constants used in the game.

use std::time::Duration;

use glam::{IVec2, UVec2};

/// Frame budget used when no explicit frame rate is configured.
pub const DEFAULT_FPS: u32 = 60;

/// The duration of a single tick at the given frame rate.
pub fn loop_time(fps: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(fps.max(1)))
}

/// The default size of the play area, in pixels.
pub const DEFAULT_WINDOW_SIZE: UVec2 = UVec2::new(800, 530);

/// Hit points a fresh game starts with, also used when carried hit points are unavailable.
pub const DEFAULT_HIT_POINTS: i32 = 10;

/// Vertical distance between the bottom of the window and the player's spawn point.
pub const SPAWN_OFFSET_FROM_BOTTOM: i32 = 216;
/// Horizontal spawn coordinate shared by every level.
pub const SPAWN_X: i32 = 65;

/// Where the player appears at the start of a level and after every death.
pub fn spawn_point(window_size: UVec2) -> IVec2 {
    IVec2::new(SPAWN_X, window_size.y as i32 - SPAWN_OFFSET_FROM_BOTTOM)
}

/// Top-left corner of the first heart in the hit-point indicator.
pub const HEART_ORIGIN: IVec2 = IVec2::new(20, 20);
/// Horizontal spacing between consecutive hearts.
pub const HEART_SPACING: i32 = 15;

/// Once this many landing particles are alive, the oldest batch is trimmed.
pub const PARTICLE_CAP: usize = 30;
/// How many of the oldest particles are trimmed on overflow.
pub const PARTICLE_TRIM: usize = 4;
/// Particles spawned per landing.
pub const PARTICLES_PER_LANDING: usize = 3;
/// Particles scatter with a random per-axis speed in `-PARTICLE_SCATTER..=PARTICLE_SCATTER`.
pub const PARTICLE_SCATTER: i32 = 5;
/// Landings at or below this downward speed raise no particles.
pub const PARTICLE_MIN_IMPACT: f32 = 1.0;
/// Downward acceleration applied to particles every tick.
pub const PARTICLE_GRAVITY: i32 = 1;

/// Length of one blindness cycle, in ticks.
pub const BLINDNESS_PERIOD: u32 = 200;
/// Ticks at the start of each cycle during which the level is obscured.
pub const BLINDNESS_TICKS: u32 = 50;

/// Duration of one frame of an animated hazard, in milliseconds.
pub const HAZARD_FRAME_MILLIS: u64 = 100;
pub const CHAINSAW_FRAMES: u8 = 6;
pub const VULKAN_FRAMES: u8 = 26;

/// Ticks a ball may roll before it is teleported back to its launch point.
pub const BALL_RESPAWN_TICKS: u32 = 180;
/// Horizontal speed of a rolling ball, in pixels per tick.
pub const BALL_SPEED: f32 = 3.0;

/// Bricks the player may place on a builder level.
pub const BUILDER_BRICK_LIMIT: u32 = 5;

/// The skin used when the configured one has no sprites.
pub const DEFAULT_SKIN: &str = "classic";

/// Window title.
pub const TITLE: &str = "Christmas Adventures";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_time() {
        // 60 FPS = 16.67ms per frame
        let expected_nanos = 1_000_000_000 / 60;
        assert_eq!(loop_time(60).as_nanos() as u64, expected_nanos);
    }

    #[test]
    fn test_loop_time_zero_fps_does_not_divide_by_zero() {
        assert_eq!(loop_time(0), Duration::from_secs(1));
    }

    #[test]
    fn test_spawn_point_default_window() {
        assert_eq!(spawn_point(DEFAULT_WINDOW_SIZE), IVec2::new(65, 314));
    }

    #[test]
    fn test_blindness_window_fits_period() {
        assert!(BLINDNESS_TICKS < BLINDNESS_PERIOD);
    }

    #[test]
    fn test_particle_trim_smaller_than_cap() {
        assert!(PARTICLE_TRIM > 0 && PARTICLE_TRIM < PARTICLE_CAP);
    }
}
