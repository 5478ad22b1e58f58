use bevy_ecs::{
    event::{EventReader, EventWriter},
    query::{With, Without},
    resource::Resource,
    system::{Query, Res, ResMut},
};
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::{
    asset::Sound,
    error::GameError,
    events::{GameCommand, GameEvent, PlayerDied},
    geometry::{self, Shape},
    systems::{
        audio::AudioEvent,
        components::{Collider, CollisionGroups, PlayerControlled, Position},
        player::{Player, PlayerSkins},
    },
};

/// How a level ended. A level keeps running while its outcome is [`LevelOutcome::Running`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelOutcome {
    #[default]
    Running,
    Win,
    Lose,
    /// The player went back to the main menu.
    Menu,
    /// The player asked to restart the level.
    Replay,
    /// The window was closed.
    Quit,
}

impl LevelOutcome {
    pub fn is_running(self) -> bool {
        self == LevelOutcome::Running
    }
}

/// The outcome of the level currently being simulated.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelStatus {
    pub outcome: LevelOutcome,
}

impl LevelStatus {
    /// Records `outcome` unless the level already ended.
    fn finish(&mut self, outcome: LevelOutcome) {
        if self.outcome.is_running() {
            info!(?outcome, "Level finished");
            self.outcome = outcome;
        }
    }
}

/// Ends the level on menu, replay and exit commands.
pub fn level_command_system(mut events: EventReader<GameEvent>, mut status: ResMut<LevelStatus>) {
    for event in events.read() {
        let GameEvent::Command(command) = event;
        match command {
            GameCommand::Menu => status.finish(LevelOutcome::Menu),
            GameCommand::Replay => status.finish(LevelOutcome::Replay),
            GameCommand::Exit => status.finish(LevelOutcome::Quit),
            GameCommand::MuteAudio | GameCommand::TogglePause | GameCommand::PlaceBrick(_) => {}
        }
    }
}

/// Applies the level rules, in order: reaching the exit wins, touching a hazard costs a hit
/// point, and running out of hit points loses.
#[allow(clippy::too_many_arguments)]
pub fn level_rules_system(
    mut status: ResMut<LevelStatus>,
    skins: Res<PlayerSkins>,
    mut players: Query<(&mut Player, &mut Position, &mut Collider), With<PlayerControlled>>,
    entities: Query<(&Position, &Collider, &CollisionGroups), Without<PlayerControlled>>,
    mut deaths: EventWriter<PlayerDied>,
    mut audio: EventWriter<AudioEvent>,
    mut errors: EventWriter<GameError>,
) {
    if !status.outcome.is_running() {
        return;
    }

    let (mut player, mut position, mut collider) = match players.single_mut() {
        Ok(tuple) => tuple,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for level rules: {}",
                e
            )));
            return;
        }
    };

    let (at_exit, on_trap) = {
        let shape = collider.shape(&position);
        let touching = |group: CollisionGroups| {
            let others: SmallVec<[Shape<'_>; 32]> = entities
                .iter()
                .filter(|(_, _, groups)| groups.intersects(group))
                .map(|(position, collider, _)| collider.shape(position))
                .collect();
            geometry::first_overlap(&shape, &others).is_some()
        };
        (touching(CollisionGroups::EXIT), touching(CollisionGroups::TRAP))
    };

    if at_exit {
        status.finish(LevelOutcome::Win);
        return;
    }

    if on_trap {
        player.die(&mut position, &mut collider, &skins);
        debug!(hit_points = player.hit_points, "Player hit a hazard");
        audio.write(AudioEvent::StopSound(Sound::Step));
        audio.write(AudioEvent::PlaySound(Sound::Die));
        deaths.write(PlayerDied {
            hit_points: player.hit_points,
        });
    }

    if player.hit_points <= 0 {
        status.finish(LevelOutcome::Lose);
    }
}
