//! The top-level mode switch.
//!
//! A session moves between [`Mode`]s. Each mode is run to completion by a [`ModeRunner`] (a menu
//! window, a level, ...), which reports where to go next. Everything the controller decides from
//! that report lives in [`SessionState::advance`], a pure transition function.

use strum_macros::{AsRefStr, EnumIter, EnumString};
use tracing::{debug, info, info_span};

use crate::constants::DEFAULT_HIT_POINTS;
use crate::error::GameResult;
use crate::level::LevelId;

/// Every screen the session can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Mode {
    MainWindow,
    Level,
    Win,
    Lose,
    Shop,
    Settings,
    /// Re-enters the current level.
    Replay,
    /// Shown after the last level is won.
    End,
}

/// Games played during this session, by outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionCounters {
    pub games_started: u32,
    pub wins: u32,
    pub losses: u32,
}

/// What a finished mode reports back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeExit {
    /// The mode to show next, or `None` to quit.
    pub next: Option<Mode>,
    /// Hit points left at the end of a level, when the mode was one.
    pub hit_points: Option<i32>,
}

impl ModeExit {
    pub fn to(next: Mode) -> Self {
        Self {
            next: Some(next),
            hit_points: None,
        }
    }

    pub fn quit() -> Self {
        Self {
            next: None,
            hit_points: None,
        }
    }

    /// A level ending in `next` with `hit_points` left.
    pub fn level(next: Mode, hit_points: i32) -> Self {
        Self {
            next: Some(next),
            hit_points: Some(hit_points),
        }
    }
}

/// Everything the controller carries from one mode to the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub mode: Mode,
    /// One-based index of the level to play next.
    pub level_index: usize,
    /// Hit points carried into the next level. `None` means a fresh start.
    pub hit_points: Option<i32>,
    /// Hit points the current level was entered with.
    pub level_start_hit_points: i32,
    pub counters: SessionCounters,
}

impl SessionState {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            level_index: 1,
            hit_points: None,
            level_start_hit_points: DEFAULT_HIT_POINTS,
            counters: SessionCounters::default(),
        }
    }

    /// The level to play next. Falls back to the first level when the index is out of range.
    pub fn level(&self) -> LevelId {
        LevelId::from_index(self.level_index).unwrap_or(LevelId::First)
    }

    /// Hit points the next level starts with.
    pub fn entry_hit_points(&self) -> i32 {
        self.hit_points.unwrap_or_else(|| {
            debug!(default = DEFAULT_HIT_POINTS, "No carried hit points, using the default");
            DEFAULT_HIT_POINTS
        })
    }

    /// Whether entering `next` from the current mode begins a new game.
    pub fn starts_game(&self, next: Mode) -> bool {
        matches!(next, Mode::Level | Mode::Replay) && matches!(self.mode, Mode::MainWindow | Mode::Lose | Mode::End)
    }

    /// Applies the report of the mode that just finished and moves to the next one.
    ///
    /// Returns the new mode, or `None` when the session is over.
    pub fn advance(&mut self, exit: ModeExit) -> Option<Mode> {
        let Some(requested) = exit.next else {
            info!(from = ?self.mode, "Session ending");
            return None;
        };

        let next = match (self.mode, requested) {
            (Mode::Level | Mode::Replay, Mode::Win) => {
                self.counters.wins += 1;
                self.hit_points = Some(exit.hit_points.unwrap_or_else(|| {
                    debug!(default = DEFAULT_HIT_POINTS, "Level reported no hit points, using the default");
                    DEFAULT_HIT_POINTS
                }));
                self.level_index += 1;
                if LevelId::from_index(self.level_index).is_some() {
                    Mode::Win
                } else {
                    Mode::End
                }
            }
            (Mode::Level | Mode::Replay, Mode::Lose) => {
                self.counters.losses += 1;
                self.level_index = 1;
                self.hit_points = None;
                Mode::Lose
            }
            // Abandoning or restarting a level restores what it was entered with.
            (Mode::Level | Mode::Replay, Mode::Replay | Mode::MainWindow) => {
                self.hit_points = Some(self.level_start_hit_points);
                requested
            }
            (Mode::End, _) => {
                self.level_index = 1;
                self.hit_points = None;
                requested
            }
            // The lose window replays from the start.
            (Mode::Lose, Mode::Replay) => Mode::Level,
            _ => requested,
        };

        if LevelId::from_index(self.level_index).is_none() {
            debug!(index = self.level_index, "Level index out of range, starting over");
            self.level_index = 1;
            self.hit_points = None;
        }

        if self.starts_game(next) {
            self.counters.games_started += 1;
        }
        if matches!(next, Mode::Level | Mode::Replay) {
            self.level_start_hit_points = self.entry_hit_points();
        }

        debug!(from = ?self.mode, to = ?next, level = self.level_index, hit_points = ?self.hit_points, "Mode transition");
        self.mode = next;
        Some(next)
    }
}

/// Runs one mode until it finishes.
pub trait ModeRunner {
    /// Blocks until `mode` is done and reports where to go next.
    fn run(&mut self, mode: Mode, state: &SessionState) -> GameResult<ModeExit>;

    /// Called once per new game, after the counters were updated.
    fn game_started(&mut self, _state: &SessionState) -> GameResult<()> {
        Ok(())
    }
}

/// Drives `runner` from `initial` until a mode asks to quit. Returns the final session state.
pub fn run_session(initial: Mode, runner: &mut impl ModeRunner) -> GameResult<SessionState> {
    let mut state = SessionState::new(initial);
    if initial == Mode::Level {
        state.counters.games_started += 1;
        runner.game_started(&state)?;
    }

    loop {
        let span = info_span!("mode", mode = state.mode.as_ref(), level = state.level_index);
        let exit = span.in_scope(|| runner.run(state.mode, &state))?;

        let games_before = state.counters.games_started;
        if state.advance(exit).is_none() {
            break;
        }
        if state.counters.games_started != games_before {
            runner.game_started(&state)?;
        }
    }

    info!(
        games = state.counters.games_started,
        wins = state.counters.wins,
        losses = state.counters.losses,
        "Session finished"
    );
    Ok(state)
}
