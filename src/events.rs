use bevy_ecs::prelude::*;
use glam::IVec2;

/// A command issued by the player outside of character movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameCommand {
    /// Close the game entirely.
    Exit,
    /// Abandon the level and return to the main menu.
    Menu,
    /// Restart the current level.
    Replay,
    MuteAudio,
    TogglePause,
    /// Place a brick centered on the given pointer position (builder levels only).
    PlaceBrick(IVec2),
}

#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Command(GameCommand),
}

impl From<GameCommand> for GameEvent {
    fn from(command: GameCommand) -> Self {
        GameEvent::Command(command)
    }
}

/// The player touched down on a wall after falling.
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub struct PlayerLanded {
    /// The contact point, at the middle of the player's bottom edge.
    pub at: IVec2,
    /// Downward speed at the moment of impact.
    pub speed: f32,
}

/// The player touched a hazard and was sent back to the spawn point.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerDied {
    pub hit_points: i32,
}
