use christmas_adventures::{
    geometry::Shape,
    settings::PhysicsConfig,
    systems::player::{Facing, MoveIntent, PlayerIntent, Posture},
};
use speculoos::prelude::*;

mod common;

use common::{intent, solid, TestPlayer, FLOOR_TOP, JUMP_SIZE, SIT_SIZE, STAND_SIZE};

fn moving(movement: MoveIntent) -> PlayerIntent {
    PlayerIntent {
        movement,
        ..Default::default()
    }
}

fn jump() -> PlayerIntent {
    PlayerIntent {
        jump: true,
        ..Default::default()
    }
}

fn sit() -> PlayerIntent {
    PlayerIntent {
        sit: true,
        ..Default::default()
    }
}

#[test]
fn test_falling_speed_increases_every_airborne_tick() {
    let mut player = TestPlayer::at(100, 0);
    let mut previous = player.player.velocity.y;

    for _ in 0..40 {
        player.step(&[], intent());
        assert!(!player.player.grounded);
        assert!(player.player.velocity.y > previous);
        previous = player.player.velocity.y;
    }
    assert_that(&previous).is_greater_than(0.0);
}

#[test]
fn test_player_settles_on_floor() {
    let floor = solid(800, 60);
    let walls = [Shape::new(0, FLOOR_TOP, &floor)];
    let mut player = TestPlayer::at(100, 300);

    let mut landings = 0;
    for _ in 0..200 {
        if player.step(&walls, intent()).landed.is_some() {
            landings += 1;
        }
    }

    assert_eq!(landings, 1);
    assert_eq!(player.rect().bottom(), FLOOR_TOP);
    assert_eq!(player.position.pixel().y, FLOOR_TOP - STAND_SIZE.1 as i32);
    assert_eq!(player.player.velocity.y, 0.0);
    assert!(player.player.grounded);
}

#[test]
fn test_landing_reports_bottom_center_and_speed() {
    let floor = solid(800, 60);
    let walls = [Shape::new(0, FLOOR_TOP, &floor)];
    let mut player = TestPlayer::at(100, 300);

    let landing = (0..200)
        .find_map(|_| player.step(&walls, intent()).landed)
        .expect("player should land");

    assert_eq!(landing.at.x, 100 + STAND_SIZE.0 as i32 / 2);
    assert_eq!(landing.at.y, FLOOR_TOP);
    assert_that(&landing.speed).is_greater_than(1.0);
}

#[test]
fn test_fast_fall_does_not_tunnel_through_thin_floor() {
    let ledge = solid(800, 1);
    let walls = [Shape::new(0, 400, &ledge)];
    let mut player = TestPlayer::at(100, 300);
    player.player.velocity.y = 50.0;

    player.step(&walls, intent());

    assert_eq!(player.rect().bottom(), 400);
    assert_eq!(player.player.velocity.y, 0.0);
}

#[test]
fn test_fast_walk_does_not_tunnel_through_thin_wall() {
    let floor = solid(800, 60);
    let pillar = solid(1, 530);
    let walls = [Shape::new(0, FLOOR_TOP, &floor), Shape::new(150, 0, &pillar)];
    let mut player = TestPlayer::on_floor(100, FLOOR_TOP);
    let physics = PhysicsConfig {
        step: 25,
        ..common::test_physics()
    };

    player.step_with(&walls, moving(MoveIntent::Right), &physics);

    assert_eq!(player.rect().right(), 150);
    assert_eq!(player.player.velocity.x, 0.0);
}

#[test]
fn test_walking_stops_at_wall() {
    let floor = solid(800, 60);
    let pillar = solid(1, 530);
    let walls = [Shape::new(0, FLOOR_TOP, &floor), Shape::new(150, 0, &pillar)];
    let mut player = TestPlayer::on_floor(100, FLOOR_TOP);

    for _ in 0..10 {
        player.step(&walls, moving(MoveIntent::Right));
    }

    assert_eq!(player.rect().right(), 150);
    assert_eq!(player.rect().bottom(), FLOOR_TOP);
}

#[test]
fn test_jump_from_sitting_only_stands_up() {
    let floor = solid(800, 60);
    let walls = [Shape::new(0, FLOOR_TOP, &floor)];
    let mut player = TestPlayer::on_floor(100, FLOOR_TOP);

    player.step(&walls, sit());
    assert_eq!(player.player.posture, Posture::Sitting);
    assert_eq!(player.rect().h, SIT_SIZE.1);
    assert_eq!(player.rect().bottom(), FLOOR_TOP);

    let events = player.step(&walls, jump());
    assert_eq!(player.player.posture, Posture::Standing);
    assert!(!events.jumped);
    assert_eq!(player.player.velocity.y, 0.0);
    assert_eq!(player.rect().bottom(), FLOOR_TOP);

    let events = player.step(&walls, jump());
    assert!(events.jumped);
    assert_eq!(player.player.posture, Posture::Jumping);
    assert_eq!(player.rect().h, JUMP_SIZE.1);
}

#[test]
fn test_jump_ignored_while_airborne() {
    let mut player = TestPlayer::at(100, 100);

    let events = player.step(&[], jump());

    assert!(!events.jumped);
    assert_eq!(player.player.posture, Posture::Standing);
    assert_that(&player.player.velocity.y).is_greater_than(0.0);
}

#[test]
fn test_jump_lands_back_standing() {
    let floor = solid(800, 60);
    let walls = [Shape::new(0, FLOOR_TOP, &floor)];
    let mut player = TestPlayer::on_floor(100, FLOOR_TOP);

    player.step(&walls, jump());
    let landed = (0..200).any(|_| player.step(&walls, intent()).landed.is_some());

    assert!(landed);
    assert_eq!(player.player.posture, Posture::Standing);
    assert_eq!(player.rect().bottom(), FLOOR_TOP);
}

#[test]
fn test_sitting_player_only_turns() {
    let floor = solid(800, 60);
    let walls = [Shape::new(0, FLOOR_TOP, &floor)];
    let mut player = TestPlayer::on_floor(100, FLOOR_TOP);

    player.step(
        &walls,
        PlayerIntent {
            movement: MoveIntent::Left,
            sit: true,
            ..Default::default()
        },
    );
    player.step(&walls, moving(MoveIntent::Left));

    assert_eq!(player.player.posture, Posture::Sitting);
    assert_eq!(player.player.facing, Facing::Left);
    assert_eq!(player.position.pixel().x, 100);
}

#[test]
fn test_mirror_only_on_facing_change() {
    let floor = solid(800, 60);
    let walls = [Shape::new(0, FLOOR_TOP, &floor)];
    let mut player = TestPlayer::on_floor(100, FLOOR_TOP);

    let mirrors: Vec<bool> = [MoveIntent::Left, MoveIntent::Left, MoveIntent::None, MoveIntent::Right]
        .into_iter()
        .map(|movement| player.step(&walls, moving(movement)).mirrored)
        .collect();

    assert_eq!(mirrors, vec![true, false, false, true]);
    assert_eq!(player.player.facing, Facing::Right);
    assert_eq!(player.position.pixel().x, 100 - common::test_physics().step);
}

#[test]
fn test_walking_events() {
    let floor = solid(800, 60);
    let walls = [Shape::new(0, FLOOR_TOP, &floor)];
    let mut player = TestPlayer::on_floor(100, FLOOR_TOP);

    assert!(player.step(&walls, moving(MoveIntent::Right)).started_walking);
    assert!(!player.step(&walls, moving(MoveIntent::Right)).started_walking);
    assert!(player.step(&walls, intent()).stopped_walking);
}

#[test]
fn test_head_bump_stops_the_rise() {
    let floor = solid(800, 60);
    let ceiling = solid(800, 10);
    let walls = [Shape::new(0, FLOOR_TOP, &floor), Shape::new(0, 340, &ceiling)];
    let mut player = TestPlayer::on_floor(100, FLOOR_TOP);

    player.step(&walls, jump());
    let bumped = (0..20).any(|_| player.step(&walls, intent()).bumped_head);

    assert!(bumped);
    assert_eq!(player.rect().top(), 350);
    assert_that(&player.player.velocity.y).is_greater_than_or_equal_to(0.0);
}

#[test]
fn test_standing_up_blocked_by_low_ceiling() {
    let floor = solid(800, 60);
    let walls = [Shape::new(0, FLOOR_TOP, &floor)];
    let mut player = TestPlayer::on_floor(100, FLOOR_TOP);
    player.step(&walls, sit());

    let ceiling = solid(800, 20);
    let cramped = [Shape::new(0, FLOOR_TOP, &floor), Shape::new(0, 400, &ceiling)];
    let events = player.step(&cramped, jump());

    assert!(!events.jumped);
    assert_eq!(player.player.posture, Posture::Sitting);
    assert_eq!(player.rect().top(), FLOOR_TOP - SIT_SIZE.1 as i32);
}

#[test]
fn test_die_returns_to_spawn() {
    let mut player = TestPlayer::at(65, 314);
    player.position.0 = glam::Vec2::new(400.0, 120.0);
    player.player.velocity = glam::Vec2::new(4.0, -7.0);
    player.player.posture = Posture::Jumping;

    let TestPlayer {
        player, position, collider, skins,
    } = &mut player;
    player.die(position, collider, skins);

    assert_eq!(position.pixel(), glam::IVec2::new(65, 314));
    assert_eq!(player.hit_points, 9);
    assert_eq!(player.velocity, glam::Vec2::ZERO);
    assert_eq!(player.posture, Posture::Standing);
    assert_eq!(collider.mask.height(), STAND_SIZE.1);
}

/// Player sprites rarely fill their whole rectangle; contact still resolves against wall edges.
mod transparent_margin_tests {
    use super::*;
    use christmas_adventures::geometry::Mask;

    fn clear_bottom(width: u32, height: u32) -> Mask {
        Mask::from_fn(width, height, |_, y| y < height - 2)
    }

    fn clear_right(width: u32, height: u32) -> Mask {
        Mask::from_fn(width, height, |x, _| x < width - 2)
    }

    fn clear_top(width: u32, height: u32) -> Mask {
        Mask::from_fn(width, height, |_, y| y >= 3)
    }

    #[test]
    fn test_landing_is_flush_with_floor() {
        let floor = solid(800, 60);
        let walls = [Shape::new(0, FLOOR_TOP, &floor)];
        let mut player = TestPlayer::with_masks(100, 300, clear_bottom);

        let landings = (0..200).filter(|_| player.step(&walls, intent()).landed.is_some()).count();

        assert_eq!(landings, 1);
        assert_eq!(player.rect().bottom(), FLOOR_TOP);
        assert!(player.player.grounded);
        assert_eq!(player.player.velocity.y, 0.0);
    }

    #[test]
    fn test_player_walks_away_after_touching_a_wall() {
        let floor = solid(800, 60);
        let wall = solid(20, 530);
        let walls = [Shape::new(0, FLOOR_TOP, &floor), Shape::new(300, 0, &wall)];
        let mut player = TestPlayer::with_masks(100, FLOOR_TOP - STAND_SIZE.1 as i32, clear_right);

        for _ in 0..60 {
            player.step(&walls, moving(MoveIntent::Right));
        }
        assert_eq!(player.rect().right(), 300);

        for _ in 0..30 {
            player.step(&walls, moving(MoveIntent::Left));
        }
        assert_eq!(player.player.facing, Facing::Left);
        assert_eq!(player.rect().right(), 300 - 30 * common::test_physics().step);
        assert_eq!(player.rect().bottom(), FLOOR_TOP);
    }

    #[test]
    fn test_head_bump_is_flush_with_ceiling() {
        let floor = solid(800, 60);
        let ceiling = solid(800, 10);
        let walls = [Shape::new(0, FLOOR_TOP, &floor), Shape::new(0, 340, &ceiling)];
        let mut player = TestPlayer::with_masks(100, FLOOR_TOP - STAND_SIZE.1 as i32, clear_top);

        player.step(&walls, jump());
        let bumped = (0..20).any(|_| player.step(&walls, intent()).bumped_head);

        assert!(bumped);
        assert_eq!(player.rect().top(), 350);

        let landed = (0..200).any(|_| player.step(&walls, intent()).landed.is_some());
        assert!(landed);
        assert_eq!(player.rect().bottom(), FLOOR_TOP);
    }

    #[test]
    fn test_jump_pose_stands_up_once_there_is_room() {
        let floor = solid(800, 60);
        let low_ceiling = solid(800, 12);
        let mut player = TestPlayer::on_floor(100, FLOOR_TOP);
        player.player.posture = Posture::Jumping;
        player.collider.mask = player.skins.mask(Posture::Jumping, Facing::Right).clone();
        player.position.0.y = (FLOOR_TOP - JUMP_SIZE.1 as i32) as f32;

        let cramped = [Shape::new(0, FLOOR_TOP, &floor), Shape::new(0, 400, &low_ceiling)];
        player.step(&cramped, intent());
        assert!(player.player.grounded);
        assert_eq!(player.player.posture, Posture::Jumping);

        let open = [Shape::new(0, FLOOR_TOP, &floor)];
        player.step(&open, intent());
        assert_eq!(player.player.posture, Posture::Standing);
        assert_eq!(player.rect().top(), FLOOR_TOP - STAND_SIZE.1 as i32);
        assert_eq!(player.rect().bottom(), FLOOR_TOP);
    }
}
