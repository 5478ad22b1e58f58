//! Player-placed bricks on builder levels.

use bevy_ecs::{
    entity::Entity,
    event::EventReader,
    query::With,
    resource::Resource,
    system::{Commands, Query, Res, ResMut},
};
use glam::IVec2;
use tracing::{debug, trace};

use crate::{
    asset::{SpriteKey, SpriteShape},
    events::{GameCommand, GameEvent, PlayerDied},
    geometry::{self, Rect},
    systems::components::{
        Collider, EntityKind, PlayerBuilt, PlayerControlled, Position, Renderable, TerrainBundle,
        Viewport,
    },
};

/// Why a brick could not be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementRejection {
    LimitReached,
    OutsideViewport,
    Excluded,
    OverlapsPlayer,
}

/// Tracks how many bricks the player has placed and where placing is forbidden.
#[derive(Resource, Debug, Clone)]
pub struct BrickBuilder {
    pub limit: u32,
    pub placed: u32,
    pub exclusions: Vec<Rect>,
    pub brick: SpriteShape,
}

impl BrickBuilder {
    pub fn new(limit: u32, exclusions: Vec<Rect>, brick: SpriteShape) -> Self {
        Self {
            limit,
            placed: 0,
            exclusions,
            brick,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.placed)
    }

    /// The rectangle a brick would occupy if placed centered on `pointer`.
    pub fn brick_rect(&self, pointer: IVec2) -> Rect {
        let size = self.brick.size;
        Rect::new(pointer.x - size.x as i32 / 2, pointer.y - size.y as i32 / 2, size.x, size.y)
    }

    /// Checks a placement against the limit, the viewport and the exclusion zones.
    pub fn check(&self, rect: &Rect, viewport: &Rect) -> Result<(), PlacementRejection> {
        if self.placed >= self.limit {
            return Err(PlacementRejection::LimitReached);
        }
        if !viewport.contains_rect(rect) {
            return Err(PlacementRejection::OutsideViewport);
        }
        if self.exclusions.iter().any(|zone| zone.intersects(rect)) {
            return Err(PlacementRejection::Excluded);
        }
        Ok(())
    }
}

/// Places bricks on pointer commands and tears them down when the player dies.
pub fn brick_builder_system(
    mut commands: Commands,
    builder: Option<ResMut<BrickBuilder>>,
    viewport: Res<Viewport>,
    mut events: EventReader<GameEvent>,
    mut deaths: EventReader<PlayerDied>,
    built: Query<Entity, With<PlayerBuilt>>,
    players: Query<(&Position, &Collider), With<PlayerControlled>>,
) {
    let Some(mut builder) = builder else {
        events.clear();
        deaths.clear();
        return;
    };

    if deaths.read().count() > 0 {
        debug!(removed = builder.placed, "Player died, clearing built bricks");
        for entity in built.iter() {
            commands.entity(entity).despawn();
        }
        builder.placed = 0;
    }

    for event in events.read() {
        let GameEvent::Command(GameCommand::PlaceBrick(pointer)) = event else {
            continue;
        };

        let rect = builder.brick_rect(*pointer);
        let mut verdict = builder.check(&rect, &viewport.0);
        if verdict.is_ok() {
            let mask = builder.brick.mask.clone();
            let blocked = players.iter().any(|(position, collider)| {
                geometry::overlaps(&collider.shape(position), &geometry::Shape::new(rect.x, rect.y, &mask))
            });
            if blocked {
                verdict = Err(PlacementRejection::OverlapsPlayer);
            }
        }

        match verdict {
            Ok(()) => {
                commands.spawn((
                    TerrainBundle {
                        kind: EntityKind::Brick,
                        groups: EntityKind::Brick.groups(),
                        position: Position::new(rect.x, rect.y),
                        collider: Collider::from(&builder.brick),
                        sprite: Renderable::new(SpriteKey::Brick, 0),
                    },
                    PlayerBuilt,
                ));
                builder.placed += 1;
                debug!(at = ?rect.top_left(), remaining = builder.remaining(), "Brick placed");
            }
            Err(reason) => {
                trace!(?pointer, ?reason, "Brick placement rejected");
            }
        }
    }
}
