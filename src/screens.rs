//! The menu screens shown between levels.
//!
//! A [`Screen`] owns the widgets of one non-level [`Mode`] and turns activated code names into
//! [`ScreenAction`]s. Nothing here draws or touches SDL.

use glam::{IVec2, UVec2};
use tracing::{debug, info};

use crate::asset::{Sound, Texts};
use crate::gui::{Button, GuiEvent, GuiManager, Label, MessageBox};
use crate::session::Mode;
use crate::settings::{Settings, SettingsUpdate};
use crate::systems::audio::AudioEvent;

const BUTTON_SIZE: IVec2 = IVec2::new(220, 50);
const BUTTON_GAP: i32 = 16;

/// A skin offered in the shop and how many games unlock it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkinOffer {
    pub name: &'static str,
    pub unlock_at: u32,
}

pub const SKINS: [SkinOffer; 3] = [
    SkinOffer {
        name: "classic",
        unlock_at: 0,
    },
    SkinOffer {
        name: "green",
        unlock_at: 5,
    },
    SkinOffer {
        name: "gold",
        unlock_at: 10,
    },
];

pub fn skin_offer(name: &str) -> Option<SkinOffer> {
    SKINS.iter().find(|offer| offer.name == name).copied()
}

/// What the session should do after a screen handled an event.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenAction {
    Stay,
    Go(Mode),
    /// Persist these settings and stay on the screen.
    Save(SettingsUpdate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    Main,
    Shop,
    Settings,
    Win,
    Lose,
    End,
}

impl ScreenKind {
    /// The screen shown for `mode`. Levels have none.
    pub fn for_mode(mode: Mode) -> Option<Self> {
        match mode {
            Mode::MainWindow => Some(ScreenKind::Main),
            Mode::Shop => Some(ScreenKind::Shop),
            Mode::Settings => Some(ScreenKind::Settings),
            Mode::Win => Some(ScreenKind::Win),
            Mode::Lose => Some(ScreenKind::Lose),
            Mode::End => Some(ScreenKind::End),
            Mode::Level | Mode::Replay => None,
        }
    }

    fn title(self) -> &'static str {
        match self {
            ScreenKind::Main => crate::constants::TITLE,
            ScreenKind::Shop => "Shop",
            ScreenKind::Settings => "Settings",
            ScreenKind::Win => "Level complete!",
            ScreenKind::Lose => "Game over",
            ScreenKind::End => "You saved Christmas!",
        }
    }

    fn buttons(self) -> Vec<&'static str> {
        match self {
            ScreenKind::Main => vec!["faq", "shop", "play", "settings"],
            ScreenKind::Shop => SKINS.iter().map(|offer| offer.name).chain(["menu"]).collect(),
            ScreenKind::Settings => vec!["fps_30", "fps_60", "github", "menu"],
            ScreenKind::Win => vec!["play", "menu"],
            ScreenKind::Lose => vec!["replay", "menu"],
            ScreenKind::End => vec!["menu", "replay"],
        }
    }
}

/// Button text for code names the localized texts do not cover.
fn fallback_label(code_name: &str) -> String {
    match code_name {
        "fps_30" => "30 FPS".to_string(),
        "fps_60" => "60 FPS".to_string(),
        "github" => "GitHub".to_string(),
        "menu" => "Menu".to_string(),
        "replay" => "Replay".to_string(),
        other => {
            let mut chars = other.chars();
            chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect())
                .unwrap_or_default()
        }
    }
}

/// One menu screen.
#[derive(Debug, Clone)]
pub struct Screen {
    kind: ScreenKind,
    gui: GuiManager,
    faq_text: String,
    skin_blocked: String,
}

impl Screen {
    pub fn new(kind: ScreenKind, texts: &Texts, settings: &Settings) -> Self {
        let window = settings.window_size().as_ivec2();
        let codes = kind.buttons();
        let column_height = codes.len() as i32 * (BUTTON_SIZE.y + BUTTON_GAP) - BUTTON_GAP;
        let mut y = (window.y - column_height) / 2 + BUTTON_SIZE.y / 2;
        let x = (window.x - BUTTON_SIZE.x) / 2;

        let mut gui = GuiManager::new();
        gui.add_label(Label::new(kind.title(), IVec2::new(x, 30)));
        for code in codes {
            let label = texts.label(code).map(str::to_string).unwrap_or_else(|| fallback_label(code));
            let label = match skin_offer(code) {
                Some(offer) if settings.number_of_games < offer.unlock_at => {
                    format!("{label} ({}/{})", settings.number_of_games, offer.unlock_at)
                }
                Some(offer) if offer.name == settings.skin => format!("{label} *"),
                _ => label,
            };
            gui.add_button(Button::new(label, code, IVec2::new(x, y), BUTTON_SIZE));
            y += BUTTON_SIZE.y + BUTTON_GAP;
        }

        Self {
            kind,
            gui,
            faq_text: texts.faq_text.clone(),
            skin_blocked: texts.skin_blocked.clone(),
        }
    }

    pub fn kind(&self) -> ScreenKind {
        self.kind
    }

    pub fn gui(&self) -> &GuiManager {
        &self.gui
    }

    pub fn gui_mut(&mut self) -> &mut GuiManager {
        &mut self.gui
    }

    /// The sound to start when the screen opens.
    pub fn entry_sound(&self) -> AudioEvent {
        match self.kind {
            ScreenKind::Win | ScreenKind::End => AudioEvent::PlaySound(Sound::Win),
            ScreenKind::Lose => AudioEvent::PlaySound(Sound::Lose),
            ScreenKind::Main | ScreenKind::Shop | ScreenKind::Settings => AudioEvent::LoopSound(Sound::Theme),
        }
    }

    /// The code name a key activates on this screen, if any.
    pub fn shortcut(&self, key: char) -> Option<&'static str> {
        match (self.kind, key.to_ascii_lowercase()) {
            (ScreenKind::Main, 'p') => Some("play"),
            _ => None,
        }
    }

    /// Handles a key press through [`Screen::shortcut`].
    pub fn press(&mut self, key: char, settings: &Settings) -> ScreenAction {
        match self.shortcut(key).and_then(|code| self.gui.activate(code)) {
            Some(event) => self.handle(event, settings),
            None => ScreenAction::Stay,
        }
    }

    pub fn click(&mut self, at: IVec2, settings: &Settings) -> ScreenAction {
        match self.gui.click(at) {
            Some(event) => self.handle(event, settings),
            None => ScreenAction::Stay,
        }
    }

    /// Reacts to a widget event. Only the code name matters.
    pub fn handle(&mut self, event: GuiEvent, settings: &Settings) -> ScreenAction {
        let GuiEvent::Activated(code) = event else {
            return ScreenAction::Stay;
        };
        debug!(screen = ?self.kind, code, "Button activated");

        match (self.kind, code.as_str()) {
            (_, "menu") => ScreenAction::Go(Mode::MainWindow),
            (ScreenKind::Main, "faq") => {
                self.gui.show_message(MessageBox::new(self.faq_text.clone(), "FAQ"));
                ScreenAction::Stay
            }
            (ScreenKind::Main, "shop") => ScreenAction::Go(Mode::Shop),
            (ScreenKind::Main, "settings") => ScreenAction::Go(Mode::Settings),
            (ScreenKind::Main | ScreenKind::Win, "play") => ScreenAction::Go(Mode::Level),
            (ScreenKind::Lose, "replay") => ScreenAction::Go(Mode::Replay),
            (ScreenKind::End, "replay") => ScreenAction::Go(Mode::Level),
            (ScreenKind::Settings, "fps_30") => ScreenAction::Save(SettingsUpdate {
                fps: Some(30),
                ..Default::default()
            }),
            (ScreenKind::Settings, "fps_60") => ScreenAction::Save(SettingsUpdate {
                fps: Some(60),
                ..Default::default()
            }),
            (ScreenKind::Settings, "github") => {
                info!("Project page visited");
                ScreenAction::Save(SettingsUpdate {
                    visited_github: Some(true),
                    ..Default::default()
                })
            }
            (ScreenKind::Shop, name) => match skin_offer(name) {
                Some(offer) if settings.number_of_games >= offer.unlock_at => {
                    info!(skin = offer.name, "Skin selected");
                    ScreenAction::Save(SettingsUpdate::skin(offer.name))
                }
                Some(offer) => {
                    debug!(skin = offer.name, games = settings.number_of_games, needed = offer.unlock_at, "Skin is locked");
                    self.gui.show_message(MessageBox::new(self.skin_blocked.clone(), offer.name));
                    ScreenAction::Stay
                }
                None => ScreenAction::Stay,
            },
            _ => ScreenAction::Stay,
        }
    }

    /// Whether every button lies inside `window`.
    pub fn fits(&self, window: UVec2) -> bool {
        self.gui
            .buttons()
            .iter()
            .all(|button| button.rect.right() <= window.x as i32 && button.rect.bottom() <= window.y as i32)
    }
}
