#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use christmas_adventures::{
    asset::{resolve_skin, Pose, SkinShapes, SpriteKey, SpriteShape, SpriteSource},
    constants::DEFAULT_SKIN,
    error::AssetError,
    geometry::{Mask, Shape},
    level::{Level, LevelLayout, Placement},
    settings::{PhysicsConfig, Settings},
    systems::{
        components::{Collider, Position},
        player::{Player, PlayerIntent, PlayerSkins, Posture},
    },
};
use glam::IVec2;

pub const STAND_SIZE: (u32, u32) = (40, 60);
pub const SIT_SIZE: (u32, u32) = (40, 40);
pub const JUMP_SIZE: (u32, u32) = (40, 56);
pub const FLOOR_TOP: i32 = 470;

/// A sprite source that hands out solid rectangles of fixed sizes, no files involved.
#[derive(Debug, Default)]
pub struct MockSprites {
    sizes: HashMap<SpriteKey, (u32, u32)>,
    missing_skins: HashSet<String>,
    pub requested: Vec<SpriteKey>,
}

impl MockSprites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every sprite of `skin` report `NotFound`.
    pub fn without_skin(mut self, skin: &str) -> Self {
        self.missing_skins.insert(skin.to_string());
        self
    }

    pub fn with_size(mut self, key: SpriteKey, width: u32, height: u32) -> Self {
        self.sizes.insert(key, (width, height));
        self
    }

    fn default_size(key: &SpriteKey) -> (u32, u32) {
        match key {
            SpriteKey::Player { pose, .. } => match pose {
                Pose::Stand => STAND_SIZE,
                Pose::Sit => SIT_SIZE,
                Pose::Jump => JUMP_SIZE,
            },
            SpriteKey::Floor => (800, 60),
            SpriteKey::Wall => (60, 595),
            SpriteKey::Brick => (32, 32),
            SpriteKey::Thorn(_) => (16, 16),
            SpriteKey::Thorns5x => (80, 16),
            SpriteKey::Chainsaw(_) | SpriteKey::Vulkan(_) => (40, 40),
            SpriteKey::Ball => (30, 30),
            SpriteKey::BoxGlover => (40, 40),
            SpriteKey::Exit => (32, 32),
            SpriteKey::Heart => (13, 12),
            SpriteKey::Particle(_) => (4, 4),
            SpriteKey::Background(_) => (800, 530),
            SpriteKey::GuiIcon(_) => (32, 32),
        }
    }
}

impl SpriteSource for MockSprites {
    fn sprite(&mut self, key: &SpriteKey) -> Result<SpriteShape, AssetError> {
        self.requested.push(key.clone());
        if let SpriteKey::Player { skin, .. } = key {
            if self.missing_skins.contains(skin) {
                return Err(AssetError::not_found("player sprite", key.path()));
            }
        }
        let (width, height) = self.sizes.get(key).copied().unwrap_or_else(|| Self::default_size(key));
        Ok(SpriteShape::new(Mask::filled(width, height)))
    }
}

pub fn solid(width: u32, height: u32) -> Mask {
    Mask::filled(width, height)
}

pub fn test_physics() -> PhysicsConfig {
    PhysicsConfig {
        gravity: 0.5,
        step: 4,
        jump_power: 11,
    }
}

pub fn skins() -> PlayerSkins {
    let resolved = resolve_skin(&mut MockSprites::new(), DEFAULT_SKIN).expect("default skin should resolve");
    PlayerSkins::new(&resolved.value)
}

/// A standalone player with its components, for driving `Player::update` directly.
pub struct TestPlayer {
    pub player: Player,
    pub position: Position,
    pub collider: Collider,
    pub skins: PlayerSkins,
}

impl TestPlayer {
    pub fn at(x: i32, y: i32) -> Self {
        Self::with_skins(x, y, skins())
    }

    /// A player whose pose masks come from `mask(width, height)` instead of solid rectangles.
    pub fn with_masks(x: i32, y: i32, mask: impl Fn(u32, u32) -> Mask) -> Self {
        let shapes = SkinShapes {
            skin: DEFAULT_SKIN.to_string(),
            stand: SpriteShape::new(mask(STAND_SIZE.0, STAND_SIZE.1)),
            sit: SpriteShape::new(mask(SIT_SIZE.0, SIT_SIZE.1)),
            jump: SpriteShape::new(mask(JUMP_SIZE.0, JUMP_SIZE.1)),
        };
        Self::with_skins(x, y, PlayerSkins::new(&shapes))
    }

    fn with_skins(x: i32, y: i32, skins: PlayerSkins) -> Self {
        Self {
            player: Player::new(IVec2::new(x, y), 10),
            position: Position::new(x, y),
            collider: Collider::new(skins.mask(Posture::Standing, Default::default()).clone()),
            skins,
        }
    }

    /// A standing player resting on a floor whose top edge is at `floor_top`.
    pub fn on_floor(x: i32, floor_top: i32) -> Self {
        Self::at(x, floor_top - STAND_SIZE.1 as i32)
    }

    pub fn step(&mut self, walls: &[Shape<'_>], intent: PlayerIntent) -> christmas_adventures::systems::player::PlayerEvents {
        self.step_with(walls, intent, &test_physics())
    }

    pub fn step_with(
        &mut self,
        walls: &[Shape<'_>],
        intent: PlayerIntent,
        physics: &PhysicsConfig,
    ) -> christmas_adventures::systems::player::PlayerEvents {
        self.player
            .update(&mut self.position, &mut self.collider, &self.skins, walls, intent, physics)
    }

    pub fn rect(&self) -> christmas_adventures::geometry::Rect {
        self.collider.rect(&self.position)
    }
}

pub fn intent() -> PlayerIntent {
    PlayerIntent::default()
}

/// Just a floor with its top edge at 470.
pub fn floor_layout() -> LevelLayout {
    let mut layout = LevelLayout::new();
    layout.place(Placement::Floor, 0, FLOOR_TOP);
    layout
}

pub fn build_level(layout: &LevelLayout, hit_points: i32) -> Level {
    Level::from_layout(layout, hit_points, &mut MockSprites::new(), &Settings::default()).expect("level should build")
}

/// Ticks the level `ticks` times with no input.
pub fn idle(level: &mut Level, ticks: usize) {
    for _ in 0..ticks {
        level.tick(intent(), &[]);
    }
}
