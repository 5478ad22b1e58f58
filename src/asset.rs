//! Asset keys and the loading seam between the simulation and the presentation layer.
//!
//! The simulation never touches image files directly. It asks a [`SpriteSource`] for the size and
//! opacity mask of a [`SpriteKey`]; the SDL adapter implements the trait by decoding PNGs (and
//! keeps the textures for drawing), while tests implement it with rectangular masks.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::UVec2;
use serde::Deserialize;
use strum_macros::{AsRefStr, EnumIter, IntoStaticStr};
use tracing::{debug, warn};

use crate::constants::{CHAINSAW_FRAMES, DEFAULT_SKIN, VULKAN_FRAMES};
use crate::error::AssetError;
use crate::geometry::Mask;

/// The three player sprites of every skin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Pose {
    Stand,
    Sit,
    Jump,
}

/// Which way a single thorn points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter)]
pub enum ThornTurn {
    #[default]
    Top,
    Left,
    Right,
    Down,
}

/// Every drawable the game knows about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    Player { skin: String, pose: Pose },
    Floor,
    Wall,
    Brick,
    Thorn(ThornTurn),
    Thorns5x,
    Chainsaw(u8),
    Vulkan(u8),
    Ball,
    BoxGlover,
    Exit,
    Heart,
    Particle(u8),
    Background(&'static str),
    GuiIcon(&'static str),
}

/// Particle sprite variants available under `sprites/particles`.
pub const PARTICLE_VARIANTS: u8 = 4;

impl SpriteKey {
    /// Path of the image, relative to the asset directory.
    pub fn path(&self) -> String {
        match self {
            SpriteKey::Player { skin, pose } => {
                let suffix = match pose {
                    Pose::Stand => "",
                    Pose::Sit => "_sit",
                    Pose::Jump => "_jump",
                };
                format!("sprites/santa/{skin}/santa_{skin}{suffix}_skin.png")
            }
            SpriteKey::Floor => "sprites/wall/wall_800x60.png".to_string(),
            SpriteKey::Wall => "sprites/wall/wall_60x595.png".to_string(),
            SpriteKey::Brick => "sprites/brick/brick.png".to_string(),
            SpriteKey::Thorn(turn) => match turn {
                ThornTurn::Top => "sprites/traps/thorns/thorn.png".to_string(),
                ThornTurn::Left => "sprites/traps/thorns/thorn_left.png".to_string(),
                ThornTurn::Right => "sprites/traps/thorns/thorn_right.png".to_string(),
                ThornTurn::Down => "sprites/traps/thorns/thorn_down.png".to_string(),
            },
            SpriteKey::Thorns5x => "sprites/traps/thorns/thorns_x5.png".to_string(),
            SpriteKey::Chainsaw(frame) => format!("sprites/traps/chainsaw/chainsaw_{frame}.png"),
            SpriteKey::Vulkan(frame) => format!("sprites/traps/vulkan/vulkan_{frame}.png"),
            SpriteKey::Ball => "sprites/traps/ball/ball.png".to_string(),
            SpriteKey::BoxGlover => "sprites/traps/box_glover/box_glover.png".to_string(),
            SpriteKey::Exit => "sprites/icons/reward/trophey.png".to_string(),
            SpriteKey::Heart => "sprites/icons/heart/red_heart.png".to_string(),
            SpriteKey::Particle(variant) => format!("sprites/particles/particle_{variant}.png"),
            SpriteKey::Background(name) => format!("sprites/background/{name}.png"),
            SpriteKey::GuiIcon(name) => format!("sprites/icons/gui/{name}.png"),
        }
    }

    /// Short name used in error messages and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SpriteKey::Player { .. } => "player sprite",
            SpriteKey::Background(_) => "background",
            SpriteKey::GuiIcon(_) => "gui icon",
            _ => "sprite",
        }
    }

    /// Every animation frame of this key, in playback order. Static sprites have a single frame.
    pub fn frames(&self) -> Vec<SpriteKey> {
        match self {
            SpriteKey::Chainsaw(_) => (0..CHAINSAW_FRAMES).map(SpriteKey::Chainsaw).collect(),
            SpriteKey::Vulkan(_) => (0..VULKAN_FRAMES).map(SpriteKey::Vulkan).collect(),
            other => vec![other.clone()],
        }
    }
}

/// The part of a loaded sprite the simulation cares about.
#[derive(Debug, Clone)]
pub struct SpriteShape {
    pub size: UVec2,
    pub mask: Arc<Mask>,
}

impl SpriteShape {
    pub fn new(mask: Mask) -> Self {
        Self {
            size: UVec2::new(mask.width(), mask.height()),
            mask: Arc::new(mask),
        }
    }
}

/// Anything that can turn a [`SpriteKey`] into a size and opacity mask.
///
/// Implementations are called only while a level is being built, never from the per-tick path.
pub trait SpriteSource {
    fn sprite(&mut self, key: &SpriteKey) -> Result<SpriteShape, AssetError>;
}

/// A value that may have been substituted with a default.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub fell_back: bool,
}

/// The stand/sit/jump shapes of one skin.
#[derive(Debug, Clone)]
pub struct SkinShapes {
    pub skin: String,
    pub stand: SpriteShape,
    pub sit: SpriteShape,
    pub jump: SpriteShape,
}

impl SkinShapes {
    fn load(source: &mut impl SpriteSource, skin: &str) -> Result<Self, AssetError> {
        let mut load = |pose| {
            source.sprite(&SpriteKey::Player {
                skin: skin.to_string(),
                pose,
            })
        };
        Ok(Self {
            skin: skin.to_string(),
            stand: load(Pose::Stand)?,
            sit: load(Pose::Sit)?,
            jump: load(Pose::Jump)?,
        })
    }

    pub fn get(&self, pose: Pose) -> &SpriteShape {
        match pose {
            Pose::Stand => &self.stand,
            Pose::Sit => &self.sit,
            Pose::Jump => &self.jump,
        }
    }
}

/// Loads the sprites of `skin`, falling back to the default skin when any of them is absent.
///
/// A broken (present but undecodable) sprite is still an error, as is a missing default skin.
pub fn resolve_skin(source: &mut impl SpriteSource, skin: &str) -> Result<Resolved<SkinShapes>, AssetError> {
    match SkinShapes::load(source, skin) {
        Ok(value) => Ok(Resolved { value, fell_back: false }),
        Err(e) if e.is_not_found() && skin != DEFAULT_SKIN => {
            warn!(skin, error = %e, fallback = DEFAULT_SKIN, "Skin unavailable, using fallback");
            let value = SkinShapes::load(source, DEFAULT_SKIN)?;
            Ok(Resolved { value, fell_back: true })
        }
        Err(e) => Err(e),
    }
}

/// Sound effects and music.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Sound {
    Step,
    Jump,
    Die,
    Win,
    Lose,
    Theme,
}

impl Sound {
    pub fn path(self) -> String {
        let name: &'static str = self.into();
        match self {
            Sound::Theme => format!("sounds/{name}.ogg"),
            _ => format!("sounds/{name}.wav"),
        }
    }
}

/// Font used for every title and label.
pub const MAIN_FONT: &str = "fonts/main_text.ttf";

/// Languages with a translation file under `text/`.
pub const LANGUAGES: [&str; 4] = ["ru", "tr", "en", "az"];

/// Picks a supported language from a locale string such as `ru_RU.UTF-8`, defaulting to English.
pub fn pick_language(locale: Option<&str>) -> &'static str {
    let lang = locale
        .and_then(|locale| locale.split(['_', '.', '-']).next())
        .map(|lang| lang.trim().to_lowercase())
        .unwrap_or_default();
    LANGUAGES.iter().find(|supported| **supported == lang).copied().unwrap_or("en")
}

/// Picks the language from `LC_ALL`, then `LANG`.
pub fn language_from_env() -> &'static str {
    let locale = std::env::var("LC_ALL")
        .ok()
        .filter(|value| !value.is_empty())
        .or_else(|| std::env::var("LANG").ok());
    pick_language(locale.as_deref())
}

/// Localized interface strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Texts {
    pub play: String,
    pub shop: String,
    pub faq: String,
    pub settings: String,
    pub faq_text: String,
    pub skin_blocked: String,
    pub ordinary_level_tip: String,
    pub build_level_tip: String,
}

impl Texts {
    pub fn parse(key: &str, contents: &str) -> Result<Self, AssetError> {
        toml::from_str(contents).map_err(|e| AssetError::decode("text", key, e))
    }

    /// The label for a main menu button, if it has one.
    pub fn label(&self, code_name: &str) -> Option<&str> {
        match code_name {
            "play" => Some(&self.play),
            "shop" => Some(&self.shop),
            "faq" => Some(&self.faq),
            "settings" => Some(&self.settings),
            _ => None,
        }
    }
}

/// The asset directory on disk.
#[derive(Debug, Clone)]
pub struct AssetRoot {
    dir: PathBuf,
}

impl AssetRoot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolves a relative asset path, failing with `NotFound` if no such file exists.
    pub fn locate(&self, kind: &'static str, relative: &str) -> Result<PathBuf, AssetError> {
        let path = self.dir.join(relative);
        if path.is_file() {
            Ok(path)
        } else {
            Err(AssetError::not_found(kind, relative))
        }
    }

    /// Loads the localized texts for `lang`. Texts are required, so a missing file is an error.
    pub fn texts(&self, lang: &str) -> Result<Texts, AssetError> {
        let relative = format!("text/{lang}.toml");
        let path = self.locate("text", &relative)?;
        let contents = fs::read_to_string(path)?;
        debug!(lang, "Loaded texts");
        Texts::parse(&relative, &contents)
    }
}
