//! The hand-placed layouts of every level.

use glam::IVec2;
use strum_macros::EnumIter;

use crate::{
    asset::{SpriteKey, ThornTurn},
    constants::{BUILDER_BRICK_LIMIT, VULKAN_FRAMES},
    systems::components::EntityKind,
};

/// What to put at a layout position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Floor,
    Wall,
    Brick,
    Thorn(ThornTurn),
    Thorns5x,
    Chainsaw,
    Vulkan,
    Ball,
    BoxGlover,
    Exit,
}

impl Placement {
    pub fn kind(&self) -> EntityKind {
        match self {
            Placement::Floor => EntityKind::Floor,
            Placement::Wall => EntityKind::Wall,
            Placement::Brick => EntityKind::Brick,
            Placement::Thorn(_) => EntityKind::Thorn,
            Placement::Thorns5x => EntityKind::Thorns5x,
            Placement::Chainsaw => EntityKind::Chainsaw,
            Placement::Vulkan => EntityKind::Vulkan,
            Placement::Ball => EntityKind::Ball,
            Placement::BoxGlover => EntityKind::BoxGlover,
            Placement::Exit => EntityKind::Exit,
        }
    }

    /// The sprite the entity collides with (and is drawn with when not animated).
    pub fn rest_sprite(&self) -> SpriteKey {
        match self {
            Placement::Floor => SpriteKey::Floor,
            Placement::Wall => SpriteKey::Wall,
            Placement::Brick => SpriteKey::Brick,
            Placement::Thorn(turn) => SpriteKey::Thorn(*turn),
            Placement::Thorns5x => SpriteKey::Thorns5x,
            Placement::Chainsaw => SpriteKey::Chainsaw(0),
            Placement::Vulkan => SpriteKey::Vulkan(VULKAN_FRAMES - 1),
            Placement::Ball => SpriteKey::Ball,
            Placement::BoxGlover => SpriteKey::BoxGlover,
            Placement::Exit => SpriteKey::Exit,
        }
    }

    pub fn is_animated(&self) -> bool {
        matches!(self, Placement::Chainsaw | Placement::Vulkan)
    }

    /// Draw order; higher layers are drawn on top.
    pub fn layer(&self) -> u8 {
        match self.kind() {
            EntityKind::Floor | EntityKind::Wall | EntityKind::Brick => 0,
            _ => 1,
        }
    }
}

/// A placement at a top-left pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placed {
    pub what: Placement,
    pub at: IVec2,
}

/// Which tip the level shows when it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelTip {
    Ordinary,
    Build,
}

/// Everything needed to build a level, independent of any loaded assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelLayout {
    pub placements: Vec<Placed>,
    pub blindness: bool,
    /// Bricks the player may place; `None` on ordinary levels.
    pub brick_limit: Option<u32>,
    pub tip: LevelTip,
}

impl LevelLayout {
    pub fn new() -> Self {
        Self {
            placements: Vec::new(),
            blindness: false,
            brick_limit: None,
            tip: LevelTip::Ordinary,
        }
    }

    pub fn place(&mut self, what: Placement, x: i32, y: i32) -> &mut Self {
        self.placements.push(Placed {
            what,
            at: IVec2::new(x, y),
        });
        self
    }

    /// Floors along the top and bottom, walls along the sides.
    pub fn borders(&mut self) -> &mut Self {
        self.place(Placement::Floor, 0, 0)
            .place(Placement::Floor, 0, 470)
            .place(Placement::Wall, 0, 0)
            .place(Placement::Wall, 750, 0)
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.placements.iter().filter(|placed| placed.what.kind() == kind).count()
    }
}

impl Default for LevelLayout {
    fn default() -> Self {
        Self::new()
    }
}

/// The levels in play order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum LevelId {
    First,
    Second,
    Third,
    Builder,
}

impl LevelId {
    /// The level at a one-based index, or `None` past the last level.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            1 => Some(LevelId::First),
            2 => Some(LevelId::Second),
            3 => Some(LevelId::Third),
            4 => Some(LevelId::Builder),
            _ => None,
        }
    }

    /// One-based index of the level.
    pub fn index(self) -> usize {
        match self {
            LevelId::First => 1,
            LevelId::Second => 2,
            LevelId::Third => 3,
            LevelId::Builder => 4,
        }
    }

    pub fn layout(self) -> LevelLayout {
        match self {
            LevelId::First => first(),
            LevelId::Second => second(),
            LevelId::Third => third(),
            LevelId::Builder => builder(),
        }
    }
}

fn first() -> LevelLayout {
    let mut layout = LevelLayout::new();
    layout.borders();

    for (x, y) in [(200, 400), (300, 300), (200, 200), (400, 250), (432, 250), (464, 250), (464, 89), (550, 180)] {
        layout.place(Placement::Brick, x, y);
    }
    for (x, y) in [(360, 450), (300, 450), (120, 450), (200, 450), (464, 235)] {
        layout.place(Placement::Thorn(ThornTurn::Top), x, y);
    }

    layout.place(Placement::Exit, 464, 68);
    layout
}

fn second() -> LevelLayout {
    let mut layout = LevelLayout::new();
    layout.borders();

    for (x, y) in [
        (100, 100),
        (100, 200),
        (100, 300),
        (100, 400),
        (170, 360),
        (208, 172),
        (320, 120),
        (400, 200),
        (513, 230),
        (651, 300),
        (715, 205),
    ] {
        layout.place(Placement::Brick, x, y);
    }
    for y in (148..468).step_by(32) {
        layout.place(Placement::Brick, 240, y);
    }

    layout.place(Placement::Vulkan, 496, 438);

    for (x, y) in [(100, 384), (116, 384), (100, 284), (252, 132), (416, 184)] {
        layout.place(Placement::Thorn(ThornTurn::Top), x, y);
    }
    layout
        .place(Placement::Thorn(ThornTurn::Left), 635, 300)
        .place(Placement::Thorn(ThornTurn::Right), 683, 300)
        .place(Placement::Thorns5x, 100, 405)
        .place(Placement::Exit, 715, 189);
    layout
}

fn third() -> LevelLayout {
    let mut layout = LevelLayout::new();
    layout.borders();
    layout.blindness = true;

    layout
        .place(Placement::Brick, 649, 326)
        .place(Placement::Brick, 484, 235)
        .place(Placement::Brick, 332, 221);
    for y in (55..408).step_by(32) {
        layout.place(Placement::Brick, 89, y);
    }
    for (i, x) in (89..186).step_by(32).enumerate() {
        layout.place(Placement::Brick, x, 407 - i as i32 * 10);
    }
    for x in (215..248).step_by(32) {
        layout.place(Placement::Brick, x, 400);
    }
    for y in (80..369).step_by(32) {
        layout.place(Placement::Brick, 247, y);
    }
    for x in (314..667).step_by(32) {
        layout.place(Placement::Brick, x, 400);
    }
    for x in (311..600).step_by(32) {
        layout.place(Placement::Brick, x, 80);
    }
    for y in (80..401).step_by(32) {
        layout.place(Placement::Brick, 695, y);
    }

    for x in (314..667).step_by(32) {
        layout.place(Placement::Thorn(ThornTurn::Top), x, 384);
    }
    layout
        .place(Placement::Chainsaw, 162, 449)
        .place(Placement::Vulkan, 245, 440)
        .place(Placement::Exit, 607, 65);
    layout
}

fn builder() -> LevelLayout {
    let mut layout = LevelLayout::new();
    layout.borders();
    layout.brick_limit = Some(BUILDER_BRICK_LIMIT);
    layout.tip = LevelTip::Build;

    for x in (560..700).step_by(32) {
        layout.place(Placement::Brick, x, 190);
    }
    layout
        .place(Placement::Thorns5x, 300, 455)
        .place(Placement::BoxGlover, 460, 430)
        .place(Placement::Ball, 690, 440)
        .place(Placement::Exit, 640, 169);
    layout
}
