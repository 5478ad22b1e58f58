use std::sync::Arc;

use bevy_ecs::{bundle::Bundle, component::Component, resource::Resource};
use bitflags::bitflags;
use glam::{IVec2, Vec2};
use rand::{rngs::SmallRng, SeedableRng};

use crate::{
    asset::{SpriteKey, SpriteShape},
    geometry::{Mask, Rect, Shape},
};

/// A tag component for the entity controlled by the player.
#[derive(Default, Component)]
pub struct PlayerControlled;

/// A tag component denoting what a level entity is.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Floor,
    Wall,
    Brick,
    Thorn,
    Thorns5x,
    Chainsaw,
    Vulkan,
    Ball,
    BoxGlover,
    Exit,
}

impl EntityKind {
    /// The collision groups an entity of this kind belongs to.
    pub fn groups(&self) -> CollisionGroups {
        match self {
            EntityKind::Floor | EntityKind::Wall => CollisionGroups::WALL,
            EntityKind::Brick => CollisionGroups::WALL | CollisionGroups::BRICK,
            EntityKind::Thorn | EntityKind::Thorns5x | EntityKind::Chainsaw | EntityKind::Vulkan => {
                CollisionGroups::TRAP
            }
            EntityKind::BoxGlover => CollisionGroups::TRAP,
            EntityKind::Ball => CollisionGroups::TRAP | CollisionGroups::BALL,
            EntityKind::Exit => CollisionGroups::EXIT,
            EntityKind::Player => CollisionGroups::empty(),
        }
    }
}

bitflags! {
    /// Named collision sets. An entity may belong to several at once.
    #[derive(Component, Default, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct CollisionGroups: u8 {
        /// Solid terrain: floors, walls and bricks.
        const WALL = 1 << 0;
        /// Hazards that damage the player on contact.
        const TRAP = 1 << 1;
        /// The goal of the level.
        const EXIT = 1 << 2;
        /// Hazards that roll and periodically respawn.
        const BALL = 1 << 3;
        /// Bricks, including ones placed by the player.
        const BRICK = 1 << 4;
    }
}

/// Top-left corner of an entity, in pixels. Fractional parts accumulate sub-pixel motion.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Position(pub Vec2);

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self(Vec2::new(x as f32, y as f32))
    }

    /// The pixel the entity is drawn at.
    pub fn pixel(&self) -> IVec2 {
        self.0.floor().as_ivec2()
    }
}

/// The opacity mask an entity collides with.
#[derive(Component, Debug, Clone)]
pub struct Collider {
    pub mask: Arc<Mask>,
}

impl Collider {
    pub fn new(mask: Arc<Mask>) -> Self {
        Self { mask }
    }

    /// The mask placed at `position`.
    pub fn shape(&self, position: &Position) -> Shape<'_> {
        let pixel = position.pixel();
        Shape::new(pixel.x, pixel.y, &self.mask)
    }

    pub fn rect(&self, position: &Position) -> Rect {
        self.shape(position).rect
    }
}

impl From<&SpriteShape> for Collider {
    fn from(shape: &SpriteShape) -> Self {
        Self::new(shape.mask.clone())
    }
}

/// A component for entities that are drawn, with a layer for ordering.
///
/// Other systems change the sprite to animate the entity.
#[derive(Component, Debug, Clone)]
pub struct Renderable {
    pub sprite: SpriteKey,
    pub layer: u8,
    pub visible: bool,
    /// Whether the sprite is drawn mirrored left-to-right.
    pub flipped: bool,
}

impl Renderable {
    pub fn new(sprite: SpriteKey, layer: u8) -> Self {
        Self {
            sprite,
            layer,
            visible: true,
            flipped: false,
        }
    }
}

/// Marks a brick placed by the player on a builder level.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PlayerBuilt;

#[derive(Bundle)]
pub struct TerrainBundle {
    pub kind: EntityKind,
    pub groups: CollisionGroups,
    pub position: Position,
    pub collider: Collider,
    pub sprite: Renderable,
}

/// Monotonic count of simulation ticks for the current level.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LevelTick(pub u32);

/// The visible play area. Entities that leave it are culled or respawned.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport(pub Rect);

/// Random source for cosmetic and hazard variation. Seeded so runs can be reproduced.
#[derive(Resource, Debug, Clone)]
pub struct SimRng(pub SmallRng);

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }
}
