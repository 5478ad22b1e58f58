//! SDL drawing: sprite loading and caching, text, and the frame layouts of levels and screens.

use std::collections::HashMap;

use glam::IVec2;
use sdl2::image::LoadSurface;
use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::rect::Rect as SdlRect;
use sdl2::render::{BlendMode, Canvas, Texture, TextureCreator};
use sdl2::surface::Surface;
use sdl2::ttf::{Font, Sdl2TtfContext};
use sdl2::video::{Window, WindowContext};
use tracing::{debug, trace, warn};

use crate::asset::{AssetRoot, SpriteKey, SpriteShape, SpriteSource, MAIN_FONT};
use crate::constants::{HEART_ORIGIN, HEART_SPACING};
use crate::error::{AssetError, GameError, GameResult, SdlResultExt};
use crate::geometry::{Mask, Rect};
use crate::gui::GuiManager;
use crate::level::{Drawable, Level};

/// Pixels with at least this alpha are solid.
pub const ALPHA_THRESHOLD: u8 = 127;

const FONT_SIZE: u16 = 28;
const BUTTON_COLOR: Color = Color::RGB(178, 34, 34);
const BUTTON_HOVER_COLOR: Color = Color::RGB(205, 55, 55);
const TEXT_COLOR: Color = Color::RGB(255, 250, 240);
const OVERLAY_COLOR: Color = Color::RGBA(0, 0, 0, 180);

/// How long the level tip stays on screen, in ticks.
const TIP_TICKS: u32 = 180;

/// Level background, optional.
const LEVEL_BACKGROUND: &str = "background";
/// Menu background, optional.
const MENU_BACKGROUND: &str = "main_window_background";

fn to_sdl(rect: Rect) -> SdlRect {
    SdlRect::new(rect.x, rect.y, rect.w, rect.h)
}

struct CachedSprite {
    texture: Texture,
    shape: SpriteShape,
}

/// Loads sprites from disk once, keeping both the texture and the collision mask.
pub struct SpriteCache {
    creator: TextureCreator<WindowContext>,
    assets: AssetRoot,
    sprites: HashMap<SpriteKey, CachedSprite>,
}

impl SpriteCache {
    pub fn new(creator: TextureCreator<WindowContext>, assets: AssetRoot) -> Self {
        Self {
            creator,
            assets,
            sprites: HashMap::new(),
        }
    }

    fn load(&self, key: &SpriteKey) -> Result<CachedSprite, AssetError> {
        let relative = key.path();
        let path = self.assets.locate(key.kind(), &relative)?;
        let surface = Surface::from_file(&path).map_err(|e| AssetError::decode(key.kind(), &relative, e))?;
        let surface = surface
            .convert_format(PixelFormatEnum::RGBA32)
            .map_err(|e| AssetError::decode(key.kind(), &relative, e))?;

        let (width, height) = (surface.width(), surface.height());
        let pitch = surface.pitch() as usize;
        let alpha: Vec<u8> = surface.with_lock(|pixels| {
            (0..height as usize)
                .flat_map(|y| (0..width as usize).map(move |x| y * pitch + x * 4 + 3))
                .map(|index| pixels[index])
                .collect()
        });
        let mask = Mask::from_alpha(width, height, &alpha, ALPHA_THRESHOLD)
            .ok_or_else(|| AssetError::decode(key.kind(), &relative, "alpha channel size mismatch"))?;

        let texture = self
            .creator
            .create_texture_from_surface(&surface)
            .map_err(|e| AssetError::decode(key.kind(), &relative, e))?;

        trace!(path = %relative, width, height, solid = mask.count(), "Loaded sprite");
        Ok(CachedSprite {
            texture,
            shape: SpriteShape::new(mask),
        })
    }

    /// Loads `key` if it exists, logging and swallowing absence. Used for decorative sprites.
    pub fn preload_optional(&mut self, key: &SpriteKey) -> bool {
        match self.sprite(key) {
            Ok(_) => true,
            Err(e) => {
                debug!(?key, error = %e, "Optional sprite unavailable");
                false
            }
        }
    }

    /// Draws a previously loaded sprite. Unknown keys are skipped.
    pub fn draw(&self, canvas: &mut Canvas<Window>, key: &SpriteKey, at: IVec2, flipped: bool) -> GameResult<()> {
        let Some(sprite) = self.sprites.get(key) else {
            trace!(?key, "Sprite not loaded, skipping");
            return Ok(());
        };
        let dst = SdlRect::new(at.x, at.y, sprite.shape.size.x, sprite.shape.size.y);
        canvas
            .copy_ex(&sprite.texture, None, Some(dst), 0.0, None, flipped, false)
            .sdl_context("Failed to draw sprite")
    }
}

impl SpriteSource for SpriteCache {
    fn sprite(&mut self, key: &SpriteKey) -> Result<SpriteShape, AssetError> {
        if let Some(sprite) = self.sprites.get(key) {
            return Ok(sprite.shape.clone());
        }
        let sprite = self.load(key)?;
        let shape = sprite.shape.clone();
        self.sprites.insert(key.clone(), sprite);
        Ok(shape)
    }
}

/// Renders strings with the main font, caching one texture per string.
pub struct TextRenderer {
    font: Font<'static, 'static>,
    creator: TextureCreator<WindowContext>,
    cache: HashMap<String, Texture>,
}

impl TextRenderer {
    /// Loads the main font. The font is required, so a missing file is fatal.
    pub fn new(ttf: &'static Sdl2TtfContext, creator: TextureCreator<WindowContext>, assets: &AssetRoot) -> GameResult<Self> {
        let path = assets.locate("font", MAIN_FONT)?;
        let font = ttf
            .load_font(&path, FONT_SIZE)
            .map_err(|e| AssetError::decode("font", MAIN_FONT, e))?;
        Ok(Self {
            font,
            creator,
            cache: HashMap::new(),
        })
    }

    fn texture(&mut self, text: &str) -> GameResult<&Texture> {
        if !self.cache.contains_key(text) {
            let surface = self
                .font
                .render(text)
                .blended_wrapped(TEXT_COLOR, 700)
                .map_err(|e| GameError::Sdl(e.to_string()))?;
            let texture = self
                .creator
                .create_texture_from_surface(&surface)
                .sdl_context("Failed to create text texture")?;
            self.cache.insert(text.to_string(), texture);
        }
        self.cache
            .get(text)
            .ok_or_else(|| GameError::InvalidState(format!("text texture missing for {text:?}")))
    }

    /// Draws `text` with its top-left corner at `at`, or centered in `within` when given.
    pub fn draw(&mut self, canvas: &mut Canvas<Window>, text: &str, at: IVec2, within: Option<Rect>) -> GameResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        let texture = self.texture(text)?;
        let query = texture.query();
        let (x, y) = match within {
            Some(area) => (
                area.x + (area.w as i32 - query.width as i32) / 2,
                area.y + (area.h as i32 - query.height as i32) / 2,
            ),
            None => (at.x, at.y),
        };
        canvas
            .copy(texture, None, Some(SdlRect::new(x, y, query.width, query.height)))
            .sdl_context("Failed to draw text")
    }
}

/// Draws whole frames.
pub struct Renderer {
    pub sprites: SpriteCache,
    pub text: TextRenderer,
}

impl Renderer {
    pub fn new(sprites: SpriteCache, text: TextRenderer) -> Self {
        let mut renderer = Self { sprites, text };
        renderer.sprites.preload_optional(&SpriteKey::Background(LEVEL_BACKGROUND));
        renderer.sprites.preload_optional(&SpriteKey::Background(MENU_BACKGROUND));
        renderer
    }

    /// Draws a level frame. During blindness only the player and the hearts are shown.
    pub fn draw_level(&mut self, canvas: &mut Canvas<Window>, level: &mut Level, tip: Option<&str>) -> GameResult<()> {
        canvas.set_draw_color(Color::BLACK);
        canvas.clear();

        let drawables: Vec<Drawable> = level.drawables();
        if !level.is_blind() {
            self.sprites
                .draw(canvas, &SpriteKey::Background(LEVEL_BACKGROUND), IVec2::ZERO, false)?;
        }
        for drawable in &drawables {
            self.sprites.draw(canvas, &drawable.sprite, drawable.at, drawable.flipped)?;
        }

        for i in 0..level.hit_points().max(0) {
            let at = HEART_ORIGIN + IVec2::new(i * HEART_SPACING, 0);
            self.sprites.draw(canvas, &SpriteKey::Heart, at, false)?;
        }

        if let Some(remaining) = level.bricks_remaining() {
            self.text.draw(canvas, &format!("{remaining}"), IVec2::new(20, 45), None)?;
        }
        if let Some(tip) = tip.filter(|_| level.ticks() < TIP_TICKS) {
            self.text.draw(canvas, tip, IVec2::new(120, 70), None)?;
        }

        canvas.present();
        Ok(())
    }

    /// Draws a menu screen: background, labels, buttons and the open message box.
    pub fn draw_gui(&mut self, canvas: &mut Canvas<Window>, gui: &GuiManager) -> GameResult<()> {
        canvas.set_draw_color(Color::RGB(12, 24, 48));
        canvas.clear();
        self.sprites
            .draw(canvas, &SpriteKey::Background(MENU_BACKGROUND), IVec2::ZERO, false)?;

        for label in gui.labels() {
            self.text.draw(canvas, &label.text, label.at, None)?;
        }
        for button in gui.buttons() {
            canvas.set_draw_color(if button.hovered { BUTTON_HOVER_COLOR } else { BUTTON_COLOR });
            canvas.fill_rect(to_sdl(button.rect)).sdl_context("Failed to draw button")?;
            self.text.draw(canvas, &button.label, IVec2::ZERO, Some(button.rect))?;
        }

        if let Some(message) = gui.message() {
            let (width, height) = canvas.output_size().sdl_context("Failed to query output size")?;
            canvas.set_blend_mode(BlendMode::Blend);
            canvas.set_draw_color(OVERLAY_COLOR);
            canvas
                .fill_rect(SdlRect::new(0, 0, width, height))
                .sdl_context("Failed to draw message overlay")?;
            canvas.set_blend_mode(BlendMode::None);
            self.text.draw(canvas, &message.title, IVec2::new(60, 60), None)?;
            self.text.draw(canvas, &message.text, IVec2::new(60, 110), None)?;
        }

        canvas.present();
        Ok(())
    }
}

/// Loads every sprite the menus need up front, failing on required ones.
pub fn preload_required(sprites: &mut SpriteCache) -> GameResult<()> {
    for key in [SpriteKey::Exit, SpriteKey::Heart] {
        if let Err(e) = sprites.sprite(&key) {
            warn!(?key, error = %e, "Required sprite unavailable");
            return Err(e.into());
        }
    }
    Ok(())
}
