use bevy_ecs::{
    query::Without,
    resource::Resource,
    system::{Query, ResMut},
};
use tracing::trace;

use crate::{
    constants::{BLINDNESS_PERIOD, BLINDNESS_TICKS},
    systems::components::{PlayerControlled, Renderable},
};

/// Periodically hides everything but the player. Purely cosmetic: collisions are unaffected.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blindness {
    pub period: u32,
    pub blind_ticks: u32,
    pub elapsed: u32,
}

impl Default for Blindness {
    fn default() -> Self {
        Self {
            period: BLINDNESS_PERIOD,
            blind_ticks: BLINDNESS_TICKS,
            elapsed: 0,
        }
    }
}

impl Blindness {
    /// Whether the level is obscured at the current point of the cycle.
    pub fn is_active(&self) -> bool {
        self.elapsed % self.period.max(1) < self.blind_ticks
    }
}

pub fn blindness_system(
    blindness: Option<ResMut<Blindness>>,
    mut renderables: Query<&mut Renderable, Without<PlayerControlled>>,
) {
    let Some(mut blindness) = blindness else {
        return;
    };

    let was_active = blindness.is_active();
    blindness.elapsed = blindness.elapsed.wrapping_add(1);
    let active = blindness.is_active();
    if active != was_active {
        trace!(active, "Blindness toggled");
    }

    for mut renderable in renderables.iter_mut() {
        if renderable.visible == active {
            renderable.visible = !active;
        }
    }
}
