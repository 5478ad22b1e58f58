use std::fs;

use christmas_adventures::{
    asset::{pick_language, resolve_skin, AssetRoot, Pose, Sound, SpriteKey, Texts, ThornTurn},
    error::AssetError,
};
use speculoos::prelude::*;
use tempfile::TempDir;

mod common;

use common::MockSprites;

const ENGLISH: &str = r#"
play = "Play"
shop = "Shop"
faq = "FAQ"
settings = "Settings"
faq_text = "Reach the trophy without touching the traps."
skin_blocked = "Not enough games played."
ordinary_level_tip = "Find the trophy!"
build_level_tip = "Click to build."
"#;

#[test]
fn test_sprite_paths() {
    let stand = SpriteKey::Player {
        skin: "classic".to_string(),
        pose: Pose::Stand,
    };
    let sit = SpriteKey::Player {
        skin: "gold".to_string(),
        pose: Pose::Sit,
    };
    assert_eq!(stand.path(), "sprites/santa/classic/santa_classic_skin.png");
    assert_eq!(sit.path(), "sprites/santa/gold/santa_gold_sit_skin.png");
    assert_eq!(SpriteKey::Thorn(ThornTurn::Left).path(), "sprites/traps/thorns/thorn_left.png");
    assert_eq!(SpriteKey::Vulkan(3).path(), "sprites/traps/vulkan/vulkan_3.png");
    assert_eq!(SpriteKey::Background("background").path(), "sprites/background/background.png");
}

#[test]
fn test_animated_keys_list_every_frame() {
    assert_eq!(SpriteKey::Chainsaw(0).frames().len(), 6);
    assert_eq!(SpriteKey::Vulkan(25).frames().len(), 26);
    assert_eq!(SpriteKey::Vulkan(0).frames()[25], SpriteKey::Vulkan(25));
    assert_eq!(SpriteKey::Ball.frames(), vec![SpriteKey::Ball]);
}

#[test]
fn test_sound_paths() {
    assert_eq!(Sound::Step.path(), "sounds/step.wav");
    assert_eq!(Sound::Theme.path(), "sounds/theme.ogg");
}

#[test]
fn test_language_selection() {
    assert_eq!(pick_language(Some("ru_RU.UTF-8")), "ru");
    assert_eq!(pick_language(Some("az-AZ")), "az");
    assert_eq!(pick_language(Some("TR")), "tr");
    assert_eq!(pick_language(Some("de_DE.UTF-8")), "en");
    assert_eq!(pick_language(None), "en");
}

#[test]
fn test_skin_resolution() {
    let resolved = resolve_skin(&mut MockSprites::new(), "green").unwrap();
    assert!(!resolved.fell_back);
    assert_eq!(resolved.value.skin, "green");
    assert_eq!(resolved.value.get(Pose::Sit).size, glam::UVec2::new(40, 40));
}

#[test]
fn test_missing_skin_falls_back() {
    let mut sprites = MockSprites::new().without_skin("gold");
    let resolved = resolve_skin(&mut sprites, "gold").unwrap();
    assert!(resolved.fell_back);
    assert_eq!(resolved.value.skin, "classic");
}

#[test]
fn test_missing_default_skin_is_fatal() {
    let mut sprites = MockSprites::new().without_skin("classic");
    let result = resolve_skin(&mut sprites, "classic");
    assert!(matches!(result, Err(AssetError::NotFound { .. })));
}

#[test]
fn test_texts_parse() {
    let texts = Texts::parse("text/en.toml", ENGLISH).unwrap();
    assert_eq!(texts.play, "Play");
    assert_eq!(texts.label("shop"), Some("Shop"));
    assert_eq!(texts.label("menu"), None);

    let broken = Texts::parse("text/en.toml", "play = \"Play\"");
    assert!(matches!(broken, Err(AssetError::Decode { .. })));
}

#[test]
fn test_asset_root_locates_files() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("text")).unwrap();
    fs::write(dir.path().join("text/en.toml"), ENGLISH).unwrap();
    let root = AssetRoot::new(dir.path());

    assert_that(&root.locate("text", "text/en.toml")).is_ok();
    assert_eq!(root.texts("en").unwrap().shop, "Shop");

    let missing = root.texts("ru").unwrap_err();
    assert!(missing.is_not_found());
    assert!(root.locate("text", "text").is_err());
}
