use std::time::Instant;

use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton;
use sdl2::render::Canvas;
use sdl2::video::Window;
use sdl2::{AudioSubsystem, EventPump, Sdl};
use smallvec::SmallVec;
use tracing::{debug, info, info_span, trace};

use crate::asset::{language_from_env, AssetRoot, Texts};
use crate::audio::Audio;
use crate::constants::TITLE;
use crate::error::{GameError, GameResult, SdlResultExt};
use crate::events::GameCommand;
use crate::level::{Level, LevelTip};
use crate::platform;
use crate::render::{preload_required, Renderer, SpriteCache, TextRenderer};
use crate::screens::{Screen, ScreenAction, ScreenKind};
use crate::session::{Mode, ModeExit, ModeRunner, SessionState};
use crate::settings::{Settings, SettingsStore, SettingsUpdate};
use crate::systems::audio::AudioEvent;
use crate::systems::input::Bindings;
use crate::systems::rules::LevelOutcome;
use crate::timing::FrameGovernor;

/// Main application wrapper that manages SDL initialization, the window and every mode's loop.
pub struct App {
    canvas: Canvas<Window>,
    event_pump: EventPump,
    renderer: Renderer,
    audio: Audio,
    bindings: Bindings,
    texts: Texts,
    settings: Settings,
    store: SettingsStore,
    focused: bool,
    // Keep SDL alive for the app lifetime so subsystems (audio) are not shut down
    _sdl_context: Sdl,
    _audio_subsystem: AudioSubsystem,
}

impl App {
    /// Initializes SDL subsystems, creates the window and loads everything the menus need.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Sdl` if any SDL initialization step fails, or an asset error if a
    /// required asset (font, texts, exit and heart icons) is missing.
    pub fn new(settings: Settings, store: SettingsStore, assets: AssetRoot) -> GameResult<Self> {
        info!("Initializing SDL2 application");
        let sdl_context = sdl2::init().sdl_context("Failed to initialize SDL")?;
        let video_subsystem = sdl_context.video().sdl_context("Failed to initialize video")?;
        let audio_subsystem = sdl_context.audio().sdl_context("Failed to initialize audio")?;
        let event_pump = sdl_context.event_pump().sdl_context("Failed to create event pump")?;
        let ttf_context = Box::leak(Box::new(sdl2::ttf::init().sdl_context("Failed to initialize TTF")?));

        let size = settings.window_size();
        debug!(width = size.x, height = size.y, "Creating game window");
        let window = video_subsystem
            .window(TITLE, size.x, size.y)
            .position_centered()
            .build()
            .map_err(|e| GameError::Sdl(e.to_string()))?;
        let canvas = window
            .into_canvas()
            .accelerated()
            .build()
            .map_err(|e| GameError::Sdl(e.to_string()))?;
        debug!(renderer_info = ?canvas.info(), "Canvas renderer initialized");

        let mut sprites = SpriteCache::new(canvas.texture_creator(), assets.clone());
        preload_required(&mut sprites)?;
        let text = TextRenderer::new(ttf_context, canvas.texture_creator(), &assets)?;
        let lang = language_from_env();
        let texts = assets.texts(lang)?;
        info!(lang, "Texts loaded");

        let audio = Audio::new(&assets);

        info!("Application initialization completed successfully");
        Ok(Self {
            canvas,
            event_pump,
            renderer: Renderer::new(sprites, text),
            audio,
            bindings: Bindings::default(),
            texts,
            settings,
            store,
            focused: true,
            _sdl_context: sdl_context,
            _audio_subsystem: audio_subsystem,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Persists `update` and applies it to the running settings.
    fn save(&mut self, update: SettingsUpdate) -> GameResult<()> {
        self.store.save(&update)?;
        self.settings.apply(&update);
        info!(?update, "Settings saved");
        Ok(())
    }

    fn focus_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Window {
                win_event: WindowEvent::FocusGained,
                ..
            } => {
                self.focused = true;
                true
            }
            Event::Window {
                win_event: WindowEvent::FocusLost,
                ..
            } => {
                self.focused = false;
                self.bindings.release_all();
                true
            }
            _ => false,
        }
    }

    fn run_level(&mut self, state: &SessionState) -> GameResult<ModeExit> {
        let hit_points = state.entry_hit_points();
        let mut level = Level::new(state.level(), hit_points, &mut self.renderer.sprites, &self.settings)?;
        let tip = match level.tip() {
            LevelTip::Ordinary => self.texts.ordinary_level_tip.clone(),
            LevelTip::Build => self.texts.build_level_tip.clone(),
        };

        self.audio.stop_all();
        self.bindings.release_all();
        let mut governor = FrameGovernor::new(self.settings.fps);
        let mut paused = false;

        loop {
            let start = Instant::now();

            let mut commands: SmallVec<[GameCommand; 4]> = SmallVec::new();
            for event in self.event_pump.poll_iter().collect::<Vec<_>>() {
                if self.focus_event(&event) {
                    continue;
                }
                if let Some(command) = self.bindings.handle_event(&event) {
                    commands.push(command);
                }
            }

            for command in &commands {
                match command {
                    GameCommand::MuteAudio => self.audio.toggle_mute(),
                    GameCommand::TogglePause => {
                        paused = !paused;
                        self.audio
                            .apply(if paused { AudioEvent::Pause } else { AudioEvent::Resume });
                        info!("{}", if paused { "Paused" } else { "Unpaused" });
                    }
                    _ => {}
                }
            }

            let ends_level = commands
                .iter()
                .any(|command| matches!(command, GameCommand::Exit | GameCommand::Menu | GameCommand::Replay));
            if !paused || ends_level {
                let intent = self.bindings.take_intent();
                let outcome = level.tick(intent, &commands);
                for event in level.drain_audio() {
                    self.audio.apply(event);
                }

                let hit_points = level.hit_points();
                let exit = match outcome {
                    LevelOutcome::Running => None,
                    LevelOutcome::Win => Some(ModeExit::level(Mode::Win, hit_points)),
                    LevelOutcome::Lose => Some(ModeExit::level(Mode::Lose, hit_points)),
                    LevelOutcome::Menu => Some(ModeExit::level(Mode::MainWindow, hit_points)),
                    LevelOutcome::Replay => Some(ModeExit::level(Mode::Replay, hit_points)),
                    LevelOutcome::Quit => Some(ModeExit::quit()),
                };
                if let Some(exit) = exit {
                    self.audio.stop_all();
                    return Ok(exit);
                }
            }

            self.renderer.draw_level(&mut self.canvas, &mut level, Some(&tip))?;

            if let Some(remaining) = governor.finish_frame(start.elapsed()) {
                platform::sleep(remaining, self.focused);
            }
        }
    }

    fn run_screen(&mut self, kind: ScreenKind) -> GameResult<ModeExit> {
        let mut screen = Screen::new(kind, &self.texts, &self.settings);
        self.audio.stop_all();
        self.audio.apply(screen.entry_sound());
        let mut governor = FrameGovernor::new(self.settings.fps);

        loop {
            let start = Instant::now();

            for event in self.event_pump.poll_iter().collect::<Vec<_>>() {
                if self.focus_event(&event) {
                    continue;
                }
                let action = match event {
                    Event::Quit { .. } => return Ok(ModeExit::quit()),
                    Event::MouseMotion { x, y, .. } => {
                        screen.gui_mut().pointer_moved(glam::IVec2::new(x, y));
                        ScreenAction::Stay
                    }
                    Event::MouseButtonDown {
                        mouse_btn: MouseButton::Left,
                        x,
                        y,
                        ..
                    } => screen.click(glam::IVec2::new(x, y), &self.settings),
                    Event::KeyDown {
                        keycode: Some(Keycode::Escape),
                        ..
                    } => {
                        if screen.gui_mut().dismiss().is_none() && kind != ScreenKind::Main {
                            ScreenAction::Go(Mode::MainWindow)
                        } else {
                            ScreenAction::Stay
                        }
                    }
                    Event::KeyDown {
                        keycode: Some(key),
                        repeat: false,
                        ..
                    } => match key.name().chars().next() {
                        Some(c) if key.name().chars().count() == 1 => screen.press(c, &self.settings),
                        _ => ScreenAction::Stay,
                    },
                    _ => ScreenAction::Stay,
                };

                match action {
                    ScreenAction::Stay => {}
                    ScreenAction::Go(mode) => return Ok(ModeExit::to(mode)),
                    ScreenAction::Save(update) => {
                        self.save(update)?;
                        screen = Screen::new(kind, &self.texts, &self.settings);
                        governor = FrameGovernor::new(self.settings.fps);
                    }
                }
            }

            self.renderer.draw_gui(&mut self.canvas, screen.gui())?;

            if let Some(remaining) = governor.finish_frame(start.elapsed()) {
                platform::sleep(remaining, self.focused);
            }
        }
    }
}

impl ModeRunner for App {
    fn run(&mut self, mode: Mode, state: &SessionState) -> GameResult<ModeExit> {
        trace!(?mode, "Running mode");
        match ScreenKind::for_mode(mode) {
            Some(kind) => self.run_screen(kind),
            None => {
                let span = info_span!("level", id = state.level_index);
                let _guard = span.enter();
                self.run_level(state)
            }
        }
    }

    fn game_started(&mut self, state: &SessionState) -> GameResult<()> {
        let number_of_games = self.settings.number_of_games + 1;
        debug!(number_of_games, session_games = state.counters.games_started, "New game");
        self.save(SettingsUpdate {
            number_of_games: Some(number_of_games),
            ..Default::default()
        })
    }
}
