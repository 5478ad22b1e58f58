use bevy_ecs::{
    component::Component,
    query::Without,
    system::{Query, Res, ResMut},
};
use glam::{IVec2, Vec2};
use rand::Rng;
use smallvec::SmallVec;
use tracing::trace;

use crate::{
    constants::{BALL_RESPAWN_TICKS, BALL_SPEED},
    geometry::{self, Shape},
    systems::components::{Collider, CollisionGroups, Position, SimRng, Viewport},
};

/// A rolling hazard. Instead of being destroyed it is teleported back to where it was launched.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Ball {
    pub spawn: IVec2,
    pub velocity: Vec2,
    /// Ticks since the last launch.
    pub elapsed: u32,
}

impl Ball {
    /// A ball rolling left from `spawn`.
    pub fn new(spawn: IVec2) -> Self {
        Self {
            spawn,
            velocity: Vec2::new(-BALL_SPEED, 0.0),
            elapsed: 0,
        }
    }

    fn relaunch(&mut self, position: &mut Position, rng: &mut SimRng) {
        position.0 = self.spawn.as_vec2();
        self.elapsed = 0;
        let speed = BALL_SPEED * rng.0.random_range(0.75..=1.25);
        self.velocity = Vec2::new(-speed, 0.0);
    }
}

/// Rolls every ball and relaunches it once it hits a brick, leaves the viewport or rolls too long.
pub fn ball_system(
    viewport: Res<Viewport>,
    mut rng: ResMut<SimRng>,
    mut balls: Query<(&mut Ball, &mut Position, &Collider)>,
    terrain: Query<(&Position, &Collider, &CollisionGroups), Without<Ball>>,
) {
    if balls.is_empty() {
        return;
    }

    let bricks: SmallVec<[Shape<'_>; 16]> = terrain
        .iter()
        .filter(|(_, _, groups)| groups.contains(CollisionGroups::BRICK))
        .map(|(position, collider, _)| collider.shape(position))
        .collect();

    for (mut ball, mut position, collider) in balls.iter_mut() {
        ball.elapsed += 1;
        position.0 += ball.velocity;

        let shape = collider.shape(&position);
        let expired = ball.elapsed >= BALL_RESPAWN_TICKS;
        let escaped = !viewport.0.intersects(&shape.rect);
        let blocked = geometry::first_overlap(&shape, &bricks).is_some();

        if expired || escaped || blocked {
            trace!(expired, escaped, blocked, "Relaunching ball");
            ball.relaunch(&mut position, &mut rng);
        }
    }
}
