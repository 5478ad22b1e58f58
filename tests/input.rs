use christmas_adventures::{
    events::GameCommand,
    systems::{
        input::{Action, Bindings},
        player::{MoveIntent, PlayerIntent},
    },
};
use glam::IVec2;
use sdl2::{event::Event, keyboard::Keycode, mouse::MouseButton};
use speculoos::prelude::*;

mod keyboard_tests {
    use super::*;

    #[test]
    fn movement_keys_are_bound() {
        let bindings = Bindings::default();
        assert_eq!(bindings.action(Keycode::A), Some(Action::Move(MoveIntent::Left)));
        assert_eq!(bindings.action(Keycode::Right), Some(Action::Move(MoveIntent::Right)));
        assert_eq!(bindings.action(Keycode::Space), Some(Action::Jump));
        assert_eq!(bindings.action(Keycode::S), Some(Action::Sit));
        assert_eq!(bindings.action(Keycode::Z), None);
    }

    #[test]
    fn held_movement_continues_across_ticks() {
        let mut bindings = Bindings::default();
        bindings.key_down(Keycode::Left, false);

        assert_eq!(bindings.take_intent().movement, MoveIntent::Left);
        assert_eq!(bindings.take_intent().movement, MoveIntent::Left);

        bindings.key_up(Keycode::Left);
        assert_eq!(bindings.take_intent(), PlayerIntent::default());
    }

    #[test]
    fn latest_movement_key_wins() {
        let mut bindings = Bindings::default();
        bindings.key_down(Keycode::Left, false);
        bindings.key_down(Keycode::D, false);
        assert_eq!(bindings.take_intent().movement, MoveIntent::Right);

        bindings.key_up(Keycode::D);
        assert_eq!(bindings.take_intent().movement, MoveIntent::Left);
    }

    #[test]
    fn jump_and_sit_are_latched_once() {
        let mut bindings = Bindings::default();
        bindings.key_down(Keycode::W, false);
        bindings.key_up(Keycode::W);
        bindings.key_down(Keycode::Down, false);

        let intent = bindings.take_intent();
        assert!(intent.jump);
        assert!(intent.sit);
        assert_eq!(bindings.take_intent(), PlayerIntent::default());
    }

    #[test]
    fn repeated_jump_is_ignored() {
        let mut bindings = Bindings::default();
        bindings.key_down(Keycode::Up, true);
        assert!(!bindings.take_intent().jump);
    }

    #[test]
    fn command_keys_emit_commands() {
        let mut bindings = Bindings::default();
        assert_eq!(bindings.key_down(Keycode::Escape, false), Some(GameCommand::Menu));
        assert_eq!(bindings.key_down(Keycode::R, false), Some(GameCommand::Replay));
        assert_eq!(bindings.key_down(Keycode::M, false), Some(GameCommand::MuteAudio));
        assert_eq!(bindings.key_down(Keycode::P, false), Some(GameCommand::TogglePause));
        assert_eq!(bindings.key_down(Keycode::P, true), None);
        assert_eq!(bindings.key_down(Keycode::Z, false), None);
    }

    #[test]
    fn release_all_forgets_everything() {
        let mut bindings = Bindings::default();
        bindings.key_down(Keycode::Left, false);
        bindings.key_down(Keycode::Space, false);

        bindings.release_all();

        assert_eq!(bindings.take_intent(), PlayerIntent::default());
    }
}

mod event_tests {
    use super::*;

    #[test]
    fn quit_event_exits() {
        let mut bindings = Bindings::default();
        let command = bindings.handle_event(&Event::Quit { timestamp: 0 });
        assert_that(&command).is_equal_to(Some(GameCommand::Exit));
    }

    #[test]
    fn left_click_places_a_brick() {
        let mut bindings = Bindings::default();
        let event = Event::MouseButtonDown {
            x: 320,
            y: 140,
            mouse_btn: MouseButton::Left,
            clicks: 1,
            which: 0,
            window_id: 0,
            timestamp: 0,
        };
        assert_eq!(
            bindings.handle_event(&event),
            Some(GameCommand::PlaceBrick(IVec2::new(320, 140)))
        );
    }

    #[test]
    fn right_click_does_nothing() {
        let mut bindings = Bindings::default();
        let event = Event::MouseButtonDown {
            x: 320,
            y: 140,
            mouse_btn: MouseButton::Right,
            clicks: 1,
            which: 0,
            window_id: 0,
            timestamp: 0,
        };
        assert_that(&bindings.handle_event(&event)).is_none();
    }
}
