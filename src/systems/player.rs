//! Player physics and the posture state machine.
//!
//! Every tick the player is advanced by [`Player::update`], a pure step that reads the wall
//! shapes of the level and the current [`PlayerIntent`]. Movement is resolved one axis at a time,
//! vertical first, and each axis is swept one pixel at a time so a fast fall can never skip over a
//! thin floor. Masks decide which wall stops the sweep; the player then comes to rest flush against
//! that wall's rectangle, so transparent sprite margins never leave it sunk into a wall.

use std::sync::Arc;

use bevy_ecs::{
    component::Component,
    event::EventWriter,
    query::{With, Without},
    resource::Resource,
    system::{Query, Res},
};
use glam::{IVec2, Vec2};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::{
    asset::{Pose, Sound, SkinShapes, SpriteKey},
    error::GameError,
    events::PlayerLanded,
    geometry::{self, Mask, Shape},
    settings::PhysicsConfig,
    systems::{
        audio::AudioEvent,
        components::{Collider, CollisionGroups, PlayerControlled, Position, Renderable},
    },
};

/// The discrete movement state of the player. Sitting and jumping never hold at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Posture {
    #[default]
    Standing,
    Sitting,
    Jumping,
}

impl Posture {
    pub fn pose(self) -> Pose {
        match self {
            Posture::Standing => Pose::Stand,
            Posture::Sitting => Pose::Sit,
            Posture::Jumping => Pose::Jump,
        }
    }
}

/// Which way the player looks. Sprites face right; facing left mirrors them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> i32 {
        match self {
            Facing::Left => -1,
            Facing::Right => 1,
        }
    }
}

/// Requested horizontal movement for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveIntent {
    #[default]
    None,
    Left,
    Right,
}

impl MoveIntent {
    pub fn facing(self) -> Option<Facing> {
        match self {
            MoveIntent::None => None,
            MoveIntent::Left => Some(Facing::Left),
            MoveIntent::Right => Some(Facing::Right),
        }
    }
}

/// What the player asked for this tick. Input handling only ever produces this value.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerIntent {
    pub movement: MoveIntent,
    pub jump: bool,
    pub sit: bool,
}

/// The collision masks of the selected skin, one per posture and facing.
#[derive(Resource, Debug, Clone)]
pub struct PlayerSkins {
    skin: String,
    /// Indexed by posture, then by facing (right, left).
    masks: [[Arc<Mask>; 2]; 3],
}

impl PlayerSkins {
    pub fn new(shapes: &SkinShapes) -> Self {
        let pair = |mask: &Arc<Mask>| [mask.clone(), Arc::new(mask.mirrored())];
        Self {
            skin: shapes.skin.clone(),
            masks: [pair(&shapes.stand.mask), pair(&shapes.sit.mask), pair(&shapes.jump.mask)],
        }
    }

    pub fn skin(&self) -> &str {
        &self.skin
    }

    pub fn mask(&self, posture: Posture, facing: Facing) -> &Arc<Mask> {
        let row = match posture {
            Posture::Standing => 0,
            Posture::Sitting => 1,
            Posture::Jumping => 2,
        };
        let column = match facing {
            Facing::Right => 0,
            Facing::Left => 1,
        };
        &self.masks[row][column]
    }

    pub fn sprite(&self, posture: Posture) -> SpriteKey {
        SpriteKey::Player {
            skin: self.skin.clone(),
            pose: posture.pose(),
        }
    }
}

/// A landing, reported at the middle of the player's bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    pub at: IVec2,
    pub speed: f32,
}

/// Everything noteworthy that happened during one physics step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayerEvents {
    pub landed: Option<Landing>,
    pub jumped: bool,
    pub mirrored: bool,
    pub bumped_head: bool,
    pub started_walking: bool,
    pub stopped_walking: bool,
}

/// The player character. Owned by the physics step; other systems only read it, except for
/// [`Player::die`], which the level rules invoke.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Player {
    pub velocity: Vec2,
    pub posture: Posture,
    pub facing: Facing,
    pub grounded: bool,
    pub hit_points: i32,
    pub spawn: IVec2,
    pub walking: bool,
}

impl Player {
    pub fn new(spawn: IVec2, hit_points: i32) -> Self {
        Self {
            velocity: Vec2::ZERO,
            posture: Posture::Standing,
            facing: Facing::Right,
            grounded: false,
            hit_points,
            spawn,
            walking: false,
        }
    }

    /// Advances the player by one tick.
    pub fn update(
        &mut self,
        position: &mut Position,
        collider: &mut Collider,
        skins: &PlayerSkins,
        walls: &[Shape<'_>],
        intent: PlayerIntent,
        physics: &PhysicsConfig,
    ) -> PlayerEvents {
        let mut events = PlayerEvents::default();

        // The ground probe always runs before gravity is considered.
        self.grounded = self.velocity.y >= 0.0 && resting_on_wall(position, collider, walls);
        if self.grounded {
            self.velocity.y = 0.0;
            // A landing under a low ceiling keeps the jump pose until there is room to stand.
            if self.posture == Posture::Jumping {
                self.change_posture(Posture::Standing, position, collider, skins, walls);
            }
        }

        if intent.sit && self.grounded {
            self.change_posture(Posture::Sitting, position, collider, skins, walls);
        }

        if intent.jump && self.grounded {
            if self.posture == Posture::Sitting {
                self.change_posture(Posture::Standing, position, collider, skins, walls);
            } else {
                self.velocity.y = -(physics.jump_power as f32);
                self.grounded = false;
                self.change_posture(Posture::Jumping, position, collider, skins, walls);
                events.jumped = true;
            }
        }

        if let Some(facing) = intent.movement.facing() {
            if facing != self.facing {
                self.facing = facing;
                collider.mask = skins.mask(self.posture, self.facing).clone();
                events.mirrored = true;
            }
        }
        self.velocity.x = match (intent.movement, self.posture) {
            (MoveIntent::None, _) | (_, Posture::Sitting) => 0.0,
            _ => (self.facing.sign() * physics.step) as f32,
        };

        if !self.grounded {
            self.velocity.y += physics.gravity;
        }

        self.resolve_vertical(position, collider, skins, walls, &mut events);
        self.resolve_horizontal(position, collider, walls);

        let walking = self.grounded && self.velocity.x != 0.0;
        if walking != self.walking {
            self.walking = walking;
            events.started_walking = walking;
            events.stopped_walking = !walking;
        }

        events
    }

    fn resolve_vertical(
        &mut self,
        position: &mut Position,
        collider: &mut Collider,
        skins: &PlayerSkins,
        walls: &[Shape<'_>],
        events: &mut PlayerEvents,
    ) {
        let target = position.0.y + self.velocity.y;
        let distance = target.floor() as i32 - position.pixel().y;

        if !sweep(position, collider, walls, IVec2::new(0, distance.signum()), distance.abs()) {
            position.0.y = target;
            if self.velocity.y > 0.0 {
                self.grounded = false;
            }
            return;
        }

        let speed = self.velocity.y;
        self.velocity.y = 0.0;
        if speed > 0.0 {
            self.grounded = true;
            if self.posture == Posture::Jumping {
                self.change_posture(Posture::Standing, position, collider, skins, walls);
            }
            let rect = collider.rect(position);
            let at = IVec2::new(rect.x + rect.w as i32 / 2, rect.bottom());
            trace!(?at, speed, "Player landed");
            events.landed = Some(Landing { at, speed });
        } else {
            events.bumped_head = true;
        }
    }

    fn resolve_horizontal(&mut self, position: &mut Position, collider: &Collider, walls: &[Shape<'_>]) {
        let distance = self.velocity.x as i32;
        if sweep(position, collider, walls, IVec2::new(distance.signum(), 0), distance.abs()) {
            self.velocity.x = 0.0;
        } else {
            position.0.x += distance as f32;
        }
    }

    /// Switches to `posture`, keeping the bottom edge in place.
    ///
    /// Returns false, leaving everything untouched, if the new shape would overlap a wall.
    fn change_posture(
        &mut self,
        posture: Posture,
        position: &mut Position,
        collider: &mut Collider,
        skins: &PlayerSkins,
        walls: &[Shape<'_>],
    ) -> bool {
        if posture == self.posture {
            return true;
        }

        let mask = skins.mask(posture, self.facing);
        let current = collider.rect(position);
        let top = current.bottom() - mask.height() as i32;
        if touches(&Shape::new(current.x, top, mask), walls) {
            debug!(from = ?self.posture, to = ?posture, "Posture change blocked by a wall");
            return false;
        }

        position.0.y = top as f32;
        collider.mask = mask.clone();
        self.posture = posture;
        true
    }

    /// Sends the player back to the spawn point and takes away one hit point.
    ///
    /// A jump in progress is cancelled; sitting is kept.
    pub fn die(&mut self, position: &mut Position, collider: &mut Collider, skins: &PlayerSkins) {
        position.0 = self.spawn.as_vec2();
        self.hit_points -= 1;
        self.velocity = Vec2::ZERO;
        self.grounded = false;
        self.walking = false;
        if self.posture == Posture::Jumping {
            self.posture = Posture::Standing;
        }
        collider.mask = skins.mask(self.posture, self.facing).clone();
    }
}

fn touches(shape: &Shape<'_>, walls: &[Shape<'_>]) -> bool {
    geometry::first_overlap(shape, walls).is_some()
}

/// Walks `mask` from `start` along the unit `step` for up to `distance` pixels.
///
/// Returns where it comes to rest if a wall's opaque pixels get in the way: flush against that
/// wall's rectangle, but never behind `start` and never past the last pixel the mask reached.
fn blocked_at(start: IVec2, mask: &Mask, walls: &[Shape<'_>], step: IVec2, distance: i32) -> Option<IVec2> {
    let size = IVec2::new(mask.width() as i32, mask.height() as i32);
    let mut pixel = start;
    for _ in 0..distance {
        let next = pixel + step;
        if let Some(wall) = geometry::first_overlap(&Shape::new(next.x, next.y, mask), walls) {
            let flush = match (step.x, step.y) {
                (x, _) if x > 0 => IVec2::new(wall.rect.left() - size.x, pixel.y),
                (x, _) if x < 0 => IVec2::new(wall.rect.right(), pixel.y),
                (_, y) if y > 0 => IVec2::new(pixel.x, wall.rect.top() - size.y),
                _ => IVec2::new(pixel.x, wall.rect.bottom()),
            };
            return Some(flush.clamp(start.min(pixel), start.max(pixel)));
        }
        pixel = next;
    }
    None
}

/// Moves `position` up to `distance` pixels along `step`.
///
/// Returns true if a wall blocked the motion, in which case `position` has been placed against it.
fn sweep(position: &mut Position, collider: &Collider, walls: &[Shape<'_>], step: IVec2, distance: i32) -> bool {
    let Some(stop) = blocked_at(position.pixel(), &collider.mask, walls, step, distance) else {
        return false;
    };
    if step.x != 0 {
        position.0.x = stop.x as f32;
    }
    if step.y != 0 {
        position.0.y = stop.y as f32;
    }
    true
}

/// True when falling from here would land without moving, i.e. the player stands on a wall.
fn resting_on_wall(position: &Position, collider: &Collider, walls: &[Shape<'_>]) -> bool {
    let start = position.pixel();
    blocked_at(start, &collider.mask, walls, IVec2::Y, collider.mask.height() as i32) == Some(start)
}

/// Advances the player entity by one tick against every wall of the level.
#[allow(clippy::too_many_arguments)]
pub fn player_physics_system(
    intent: Res<PlayerIntent>,
    physics: Res<PhysicsConfig>,
    skins: Res<PlayerSkins>,
    mut players: Query<(&mut Player, &mut Position, &mut Collider, &mut Renderable), With<PlayerControlled>>,
    terrain: Query<(&Position, &Collider, &CollisionGroups), Without<PlayerControlled>>,
    mut landings: EventWriter<PlayerLanded>,
    mut audio: EventWriter<AudioEvent>,
    mut errors: EventWriter<GameError>,
) {
    let (mut player, mut position, mut collider, mut renderable) = match players.single_mut() {
        Ok(tuple) => tuple,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for player physics: {}",
                e
            )));
            return;
        }
    };

    let walls: SmallVec<[Shape<'_>; 96]> = terrain
        .iter()
        .filter(|(_, _, groups)| groups.contains(CollisionGroups::WALL))
        .map(|(position, collider, _)| collider.shape(position))
        .collect();

    let events = player.update(&mut position, &mut collider, &skins, &walls, *intent, &physics);

    if events.jumped {
        audio.write(AudioEvent::PlaySound(Sound::Jump));
    }
    if events.started_walking {
        audio.write(AudioEvent::LoopSound(Sound::Step));
    }
    if events.stopped_walking {
        audio.write(AudioEvent::StopSound(Sound::Step));
    }
    if let Some(landing) = events.landed {
        landings.write(PlayerLanded {
            at: landing.at,
            speed: landing.speed,
        });
    }

    let sprite = skins.sprite(player.posture);
    if renderable.sprite != sprite {
        renderable.sprite = sprite;
    }
    renderable.flipped = player.facing == Facing::Left;
}
