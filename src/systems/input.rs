use std::collections::HashMap;

use bevy_ecs::resource::Resource;
use glam::IVec2;
use sdl2::{event::Event, keyboard::Keycode, mouse::MouseButton};

use crate::{
    events::GameCommand,
    systems::player::{MoveIntent, PlayerIntent},
};

/// What a bound key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move(MoveIntent),
    Jump,
    Sit,
    Command(GameCommand),
}

/// Keyboard bindings plus the held-key state needed to turn key events into a [`PlayerIntent`].
#[derive(Debug, Clone, Resource)]
pub struct Bindings {
    key_bindings: HashMap<Keycode, Action>,
    /// Movement keys currently held, most recent last.
    held_movement: Vec<Keycode>,
    jump_pressed: bool,
    sit_pressed: bool,
}

impl Default for Bindings {
    fn default() -> Self {
        let mut key_bindings = HashMap::new();

        // Player movement
        key_bindings.insert(Keycode::Left, Action::Move(MoveIntent::Left));
        key_bindings.insert(Keycode::A, Action::Move(MoveIntent::Left));
        key_bindings.insert(Keycode::Right, Action::Move(MoveIntent::Right));
        key_bindings.insert(Keycode::D, Action::Move(MoveIntent::Right));
        key_bindings.insert(Keycode::Up, Action::Jump);
        key_bindings.insert(Keycode::W, Action::Jump);
        key_bindings.insert(Keycode::Space, Action::Jump);
        key_bindings.insert(Keycode::Down, Action::Sit);
        key_bindings.insert(Keycode::S, Action::Sit);

        // Game actions
        key_bindings.insert(Keycode::Escape, Action::Command(GameCommand::Menu));
        key_bindings.insert(Keycode::R, Action::Command(GameCommand::Replay));
        key_bindings.insert(Keycode::M, Action::Command(GameCommand::MuteAudio));
        key_bindings.insert(Keycode::P, Action::Command(GameCommand::TogglePause));

        Self {
            key_bindings,
            held_movement: Vec::new(),
            jump_pressed: false,
            sit_pressed: false,
        }
    }
}

impl Bindings {
    pub fn action(&self, key: Keycode) -> Option<Action> {
        self.key_bindings.get(&key).copied()
    }

    /// Records a key press. Returns the command it triggers, if any.
    ///
    /// Jump and sit are latched until the next [`Bindings::take_intent`]; held movement keys keep
    /// moving the player until released.
    pub fn key_down(&mut self, key: Keycode, repeat: bool) -> Option<GameCommand> {
        match self.action(key)? {
            Action::Move(_) => {
                if !self.held_movement.contains(&key) {
                    self.held_movement.push(key);
                }
                None
            }
            Action::Jump if !repeat => {
                self.jump_pressed = true;
                None
            }
            Action::Sit if !repeat => {
                self.sit_pressed = true;
                None
            }
            Action::Command(command) if !repeat => Some(command),
            _ => None,
        }
    }

    pub fn key_up(&mut self, key: Keycode) {
        self.held_movement.retain(|held| *held != key);
    }

    /// The intent for the coming tick. Clears the latched jump and sit presses.
    pub fn take_intent(&mut self) -> PlayerIntent {
        let movement = self
            .held_movement
            .last()
            .and_then(|key| match self.action(*key) {
                Some(Action::Move(direction)) => Some(direction),
                _ => None,
            })
            .unwrap_or_default();

        let intent = PlayerIntent {
            movement,
            jump: self.jump_pressed,
            sit: self.sit_pressed,
        };
        self.jump_pressed = false;
        self.sit_pressed = false;
        intent
    }

    /// Forgets every held key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held_movement.clear();
        self.jump_pressed = false;
        self.sit_pressed = false;
    }

    /// Translates one SDL event into a command, updating the held-key state along the way.
    pub fn handle_event(&mut self, event: &Event) -> Option<GameCommand> {
        match event {
            Event::Quit { .. } => Some(GameCommand::Exit),
            Event::KeyDown {
                keycode: Some(key),
                repeat,
                ..
            } => self.key_down(*key, *repeat),
            Event::KeyUp { keycode: Some(key), .. } => {
                self.key_up(*key);
                None
            }
            Event::MouseButtonDown {
                mouse_btn: MouseButton::Left,
                x,
                y,
                ..
            } => Some(GameCommand::PlaceBrick(IVec2::new(*x, *y))),
            _ => None,
        }
    }
}
