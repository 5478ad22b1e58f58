//! Landing particles.
//!
//! Particles are purely cosmetic: they never collide, fall under their own gravity and are removed
//! once they leave the viewport. To keep the count bounded, the oldest few are trimmed whenever the
//! cap is reached.

use std::collections::VecDeque;

use bevy_ecs::{
    component::Component,
    entity::Entity,
    event::EventReader,
    resource::Resource,
    system::{Commands, Query, Res, ResMut},
};
use glam::IVec2;
use rand::Rng;
use tracing::trace;

use crate::{
    asset::{SpriteKey, PARTICLE_VARIANTS},
    constants::{
        PARTICLES_PER_LANDING, PARTICLE_CAP, PARTICLE_GRAVITY, PARTICLE_MIN_IMPACT, PARTICLE_SCATTER, PARTICLE_TRIM,
    },
    events::PlayerLanded,
    systems::components::{Position, Renderable, SimRng, Viewport},
};

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Particle {
    pub velocity: IVec2,
}

/// Live particles, oldest first.
#[derive(Resource, Debug, Default)]
pub struct ParticleLedger(pub VecDeque<Entity>);

impl ParticleLedger {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Scatters a few particles at every hard enough landing.
pub fn spawn_particles_system(
    mut commands: Commands,
    mut landings: EventReader<PlayerLanded>,
    mut ledger: ResMut<ParticleLedger>,
    mut rng: ResMut<SimRng>,
) {
    for landing in landings.read() {
        if landing.speed <= PARTICLE_MIN_IMPACT {
            continue;
        }
        for _ in 0..PARTICLES_PER_LANDING {
            let velocity = IVec2::new(
                rng.0.random_range(-PARTICLE_SCATTER..=PARTICLE_SCATTER),
                rng.0.random_range(-PARTICLE_SCATTER..=PARTICLE_SCATTER),
            );
            let variant = rng.0.random_range(0..PARTICLE_VARIANTS);
            let entity = commands
                .spawn((
                    Particle { velocity },
                    Position::new(landing.at.x, landing.at.y),
                    Renderable::new(SpriteKey::Particle(variant), 2),
                ))
                .id();
            ledger.0.push_back(entity);
        }
    }
}

/// Moves particles, removes the ones that left the viewport and trims the oldest on overflow.
pub fn particle_system(
    mut commands: Commands,
    viewport: Res<Viewport>,
    mut ledger: ResMut<ParticleLedger>,
    mut particles: Query<(Entity, &mut Particle, &mut Position)>,
) {
    for (entity, mut particle, mut position) in particles.iter_mut() {
        particle.velocity.y += PARTICLE_GRAVITY;
        position.0 += particle.velocity.as_vec2();

        if !viewport.0.contains_point(position.pixel()) {
            commands.entity(entity).despawn();
            ledger.0.retain(|live| *live != entity);
        }
    }

    if ledger.len() >= PARTICLE_CAP {
        trace!(live = ledger.len(), "Trimming oldest particles");
        for entity in ledger.0.drain(..PARTICLE_TRIM) {
            commands.entity(entity).despawn();
        }
    }
}
