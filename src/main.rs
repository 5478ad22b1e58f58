#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{anyhow, Context};
use christmas_adventures::app::App;
use christmas_adventures::asset::AssetRoot;
use christmas_adventures::constants::loop_time;
use christmas_adventures::session::{self, Mode};
use christmas_adventures::settings::SettingsStore;
use christmas_adventures::{logging, platform};
use tracing::{error, info};

const DEFAULT_SETTINGS_PATH: &str = "settings.toml";
const DEFAULT_ASSETS_DIR: &str = "assets";

/// Command line options.
struct Args {
    settings: PathBuf,
    assets: PathBuf,
    mode: Mode,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut parsed = Self {
            settings: PathBuf::from(DEFAULT_SETTINGS_PATH),
            assets: PathBuf::from(DEFAULT_ASSETS_DIR),
            mode: Mode::MainWindow,
        };

        while let Some(arg) = args.next() {
            let mut value = || args.next().ok_or_else(|| anyhow!("{arg} needs a value"));
            match arg.as_str() {
                "--settings" => parsed.settings = PathBuf::from(value()?),
                "--assets" => parsed.assets = PathBuf::from(value()?),
                "--mode" => {
                    let name = value()?;
                    parsed.mode = match Mode::from_str(&name) {
                        Ok(mode @ (Mode::MainWindow | Mode::Level | Mode::Shop | Mode::Settings)) => mode,
                        _ => return Err(anyhow!("unknown start mode '{name}'")),
                    };
                }
                other => return Err(anyhow!("unknown argument '{other}'")),
            }
        }
        Ok(parsed)
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse(env::args().skip(1))?;

    logging::init(&platform::log_dir(&args.settings).join(logging::LOG_FILE)).context("Could not initialize logging")?;

    let store = SettingsStore::new(&args.settings);
    let settings = store.load_or_create()?;
    info!(path = %store.path().display(), fps = settings.fps, skin = %settings.skin, "Settings loaded");

    let mut app = App::new(settings, store, AssetRoot::new(&args.assets))?;

    info!(loop_time = ?loop_time(app.settings().fps), mode = ?args.mode, "Starting session");
    let state = session::run_session(args.mode, &mut app)?;
    info!(games = state.counters.games_started, "Goodbye");
    Ok(())
}

/// The main entry point of the application.
pub fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = ?e, "Fatal error");
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}
