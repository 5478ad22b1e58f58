//! A single playable level: an ECS world populated from a [`LevelLayout`] plus the schedule that
//! advances it by one tick.

pub mod layout;

use bevy_ecs::{
    entity::Entity,
    event::{event_update_system, EventRegistry, Events},
    schedule::{IntoScheduleConfigs, Schedule},
    world::World,
};
use glam::IVec2;
use rand::Rng;
use tracing::{debug, error, info, warn};

use crate::{
    asset::{resolve_skin, SpriteKey, SpriteSource, PARTICLE_VARIANTS},
    constants::{spawn_point, HAZARD_FRAME_MILLIS},
    error::{GameError, GameResult},
    events::{GameCommand, GameEvent, PlayerDied, PlayerLanded},
    formatter,
    geometry::Rect,
    settings::Settings,
    systems::{
        animation::{animation_system, Animation},
        audio::AudioEvent,
        ball::{ball_system, Ball},
        blindness::{blindness_system, Blindness},
        builder::{brick_builder_system, BrickBuilder},
        components::{
            Collider, EntityKind, LevelTick, PlayerControlled, Position, Renderable, SimRng, TerrainBundle, Viewport,
        },
        particles::{particle_system, spawn_particles_system, ParticleLedger},
        player::{player_physics_system, Player, PlayerIntent, PlayerSkins, Posture},
        rules::{level_command_system, level_rules_system, LevelOutcome, LevelStatus},
    },
};

pub use layout::{LevelId, LevelLayout, LevelTip, Placed, Placement};

/// Margin kept free of player-built bricks around the spawn point, the exit and every hazard.
const BUILD_EXCLUSION_MARGIN: i32 = 20;

/// Draw layer of the player, above terrain, hazards and particles.
const PLAYER_LAYER: u8 = 3;

/// One thing to draw this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub sprite: SpriteKey,
    pub at: IVec2,
    pub flipped: bool,
    pub layer: u8,
}

pub struct Level {
    id: Option<LevelId>,
    world: World,
    schedule: Schedule,
    player: Entity,
    start_hit_points: i32,
    tip: LevelTip,
}

impl Level {
    /// Builds one of the game's levels.
    pub fn new(id: LevelId, hit_points: i32, sprites: &mut impl SpriteSource, settings: &Settings) -> GameResult<Self> {
        let mut level = Self::from_layout(&id.layout(), hit_points, sprites, settings)?;
        level.id = Some(id);
        info!(level = id.index(), hit_points, "Level ready");
        Ok(level)
    }

    /// Builds a level from an arbitrary layout.
    ///
    /// Every asset the level will ever draw is requested here, so nothing is loaded mid-tick.
    pub fn from_layout(
        layout: &LevelLayout,
        hit_points: i32,
        sprites: &mut impl SpriteSource,
        settings: &Settings,
    ) -> GameResult<Self> {
        let mut world = World::default();
        let mut schedule = Schedule::default();

        EventRegistry::register_event::<GameError>(&mut world);
        EventRegistry::register_event::<GameEvent>(&mut world);
        EventRegistry::register_event::<AudioEvent>(&mut world);
        EventRegistry::register_event::<PlayerLanded>(&mut world);
        EventRegistry::register_event::<PlayerDied>(&mut world);

        let window = settings.window_size();
        let viewport = Rect::new(0, 0, window.x, window.y);
        world.insert_resource(settings.physics());
        world.insert_resource(Viewport(viewport));
        world.insert_resource(LevelStatus::default());
        world.insert_resource(LevelTick::default());
        world.insert_resource(PlayerIntent::default());
        world.insert_resource(ParticleLedger::default());
        world.insert_resource(SimRng::seeded(rand::rng().random()));

        let skin = resolve_skin(sprites, &settings.skin)?;
        if skin.fell_back {
            warn!(requested = %settings.skin, used = %skin.value.skin, "Using fallback skin");
        }
        let skins = PlayerSkins::new(&skin.value);

        let spawn = spawn_point(window);
        let player = world
            .spawn((
                PlayerControlled,
                EntityKind::Player,
                Player::new(spawn, hit_points),
                Position::new(spawn.x, spawn.y),
                Collider::new(skins.mask(Posture::Standing, Default::default()).clone()),
                Renderable::new(skins.sprite(Posture::Standing), PLAYER_LAYER),
            ))
            .id();
        let player_rect = Rect::new(spawn.x, spawn.y, skin.value.stand.size.x, skin.value.stand.size.y);
        world.insert_resource(skins);

        let ticks_per_frame = Animation::ticks_for(HAZARD_FRAME_MILLIS, settings.fps);
        let mut exclusions = vec![player_rect.inflated(BUILD_EXCLUSION_MARGIN)];

        for placed in &layout.placements {
            let rest = placed.what.rest_sprite();
            let shape = sprites.sprite(&rest)?;
            let kind = placed.what.kind();
            let groups = kind.groups();
            let rect = Rect::new(placed.at.x, placed.at.y, shape.size.x, shape.size.y);

            let mut entity = world.spawn(TerrainBundle {
                kind,
                groups,
                position: Position::new(placed.at.x, placed.at.y),
                collider: Collider::from(&shape),
                sprite: Renderable::new(rest.clone(), placed.what.layer()),
            });

            if placed.what.is_animated() {
                let frames = rest.frames();
                for frame in &frames {
                    sprites.sprite(frame)?;
                }
                entity.insert(Animation::new(frames, ticks_per_frame));
            }
            if kind == EntityKind::Ball {
                entity.insert(Ball::new(placed.at));
            }
            if kind != EntityKind::Floor && kind != EntityKind::Wall && kind != EntityKind::Brick {
                exclusions.push(rect.inflated(BUILD_EXCLUSION_MARGIN));
            }
        }

        sprites.sprite(&SpriteKey::Heart)?;
        for variant in 0..PARTICLE_VARIANTS {
            sprites.sprite(&SpriteKey::Particle(variant))?;
        }

        if layout.blindness {
            world.insert_resource(Blindness::default());
        }
        if let Some(limit) = layout.brick_limit {
            let brick = sprites.sprite(&SpriteKey::Brick)?;
            world.insert_resource(BrickBuilder::new(limit, exclusions, brick));
        }

        schedule.add_systems(
            (
                event_update_system,
                level_command_system,
                level_rules_system,
                brick_builder_system,
                player_physics_system,
                ball_system,
                spawn_particles_system,
                particle_system,
                animation_system,
                blindness_system,
            )
                .chain(),
        );

        debug!(entities = layout.placements.len(), blindness = layout.blindness, "Level built");

        Ok(Self {
            id: None,
            world,
            schedule,
            player,
            start_hit_points: hit_points,
            tip: layout.tip,
        })
    }

    /// Advances the level by one tick and returns its outcome afterwards.
    ///
    /// Once the level has finished, further ticks do nothing.
    pub fn tick(&mut self, intent: PlayerIntent, commands: &[GameCommand]) -> LevelOutcome {
        if !self.outcome().is_running() {
            return self.outcome();
        }

        formatter::increment_tick();
        self.world.resource_mut::<LevelTick>().0 += 1;
        self.world.insert_resource(intent);
        {
            let mut events = self.world.resource_mut::<Events<GameEvent>>();
            for command in commands {
                events.send(GameEvent::Command(*command));
            }
        }

        self.schedule.run(&mut self.world);

        for e in self.world.resource_mut::<Events<GameError>>().drain() {
            error!(error = %e, "Level system failed");
        }

        self.outcome()
    }

    pub fn outcome(&self) -> LevelOutcome {
        self.world.resource::<LevelStatus>().outcome
    }

    pub fn id(&self) -> Option<LevelId> {
        self.id
    }

    pub fn tip(&self) -> LevelTip {
        self.tip
    }

    pub fn start_hit_points(&self) -> i32 {
        self.start_hit_points
    }

    pub fn player(&self) -> Option<&Player> {
        self.world.get::<Player>(self.player)
    }

    pub fn hit_points(&self) -> i32 {
        self.player().map_or(0, |player| player.hit_points)
    }

    /// The player's current bounding rectangle.
    pub fn player_rect(&self) -> Option<Rect> {
        let position = self.world.get::<Position>(self.player)?;
        let collider = self.world.get::<Collider>(self.player)?;
        Some(collider.rect(position))
    }

    pub fn player_entity(&self) -> Entity {
        self.player
    }

    pub fn ticks(&self) -> u32 {
        self.world.resource::<LevelTick>().0
    }

    pub fn is_blind(&self) -> bool {
        self.world.get_resource::<Blindness>().is_some_and(|blindness| blindness.is_active())
    }

    /// Bricks the player may still place, on builder levels.
    pub fn bricks_remaining(&self) -> Option<u32> {
        self.world.get_resource::<BrickBuilder>().map(|builder| builder.remaining())
    }

    /// Takes every sound request raised since the last call.
    pub fn drain_audio(&mut self) -> Vec<AudioEvent> {
        self.world.resource_mut::<Events<AudioEvent>>().drain().collect()
    }

    /// Everything visible, in draw order.
    pub fn drawables(&mut self) -> Vec<Drawable> {
        let mut query = self.world.query::<(&Position, &Renderable)>();
        let mut drawables: Vec<Drawable> = query
            .iter(&self.world)
            .filter(|(_, renderable)| renderable.visible)
            .map(|(position, renderable)| Drawable {
                sprite: renderable.sprite.clone(),
                at: position.pixel(),
                flipped: renderable.flipped,
                layer: renderable.layer,
            })
            .collect();
        drawables.sort_by_key(|drawable| drawable.layer);
        drawables
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
