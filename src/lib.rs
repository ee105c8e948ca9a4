use std::{
    fmt::Display,
    path::PathBuf,
    time::{Duration, Instant},
};

use clap::{value_parser, Arg, ArgAction, Command};
use log::LevelFilter;

pub mod core;
pub mod engine;
pub mod input;
pub mod pipeline;

pub use core::Color;
pub use core::Shape;
pub use engine::{Controls, Engine};
pub use pipeline::{Grid, Rasterizer, RenderMode, TerminalPipeline};

pub const DEFAULT_WIDTH: usize = 64;
pub const DEFAULT_HEIGHT: usize = 48;
pub const DEFAULT_CUBE_SIZE: f32 = 30.0;
/// Past this the cube's corners can reach the focal plane.
pub const MAX_CUBE_SIZE: f32 = 100.0;

pub struct Metrics {
    pub last_report: Instant,
    pub ticks: u64,
    pub frames_written: u64,
    pub frames_skipped: u64,
    pub frame_times: Vec<f32>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    const WINDOW: usize = 120;
    const REPORT_EVERY: Duration = Duration::from_secs(1);

    pub fn new() -> Self {
        Self {
            last_report: Instant::now(),
            ticks: 0,
            frames_written: 0,
            frames_skipped: 0,
            frame_times: Vec::with_capacity(Self::WINDOW),
        }
    }

    pub fn update(&mut self, frame_delta: Duration, written: bool) {
        self.ticks += 1;
        if written {
            self.frames_written += 1;
        } else {
            self.frames_skipped += 1;
        }
        if self.frame_times.len() == Self::WINDOW {
            self.frame_times.remove(0);
        }
        self.frame_times.push(frame_delta.as_secs_f32() * 1000.0);
    }

    /// True at most once per second.
    pub fn report_due(&mut self) -> bool {
        if self.last_report.elapsed() >= Self::REPORT_EVERY {
            self.last_report = Instant::now();
            return true;
        }
        false
    }

    pub fn average_ms(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32
    }
}

impl Display for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Ticks: {} | Written: {} | Skipped: {} | Avg: {:.2}ms | Min: {:.2}ms | Max: {:.2}ms",
            self.ticks,
            self.frames_written,
            self.frames_skipped,
            self.average_ms(),
            self.frame_times
                .iter()
                .copied()
                .reduce(f32::min)
                .unwrap_or(0.0),
            self.frame_times
                .iter()
                .copied()
                .reduce(f32::max)
                .unwrap_or(0.0)
        )
    }
}

/// Everything fixed at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub width: usize,
    pub height: usize,
    pub size: f32,
    pub mode: RenderMode,
    pub debug: bool,
    pub slope_threshold: i32,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            size: DEFAULT_CUBE_SIZE,
            mode: RenderMode::default(),
            debug: false,
            slope_threshold: pipeline::rasterizer::DEFAULT_SLOPE_THRESHOLD,
            log_file: PathBuf::from("ascii_cube.log"),
            log_level: LevelFilter::Info,
        }
    }
}

fn parse_size(s: &str) -> Result<f32, String> {
    let size: f32 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if size > 0.0 && size <= MAX_CUBE_SIZE {
        Ok(size)
    } else {
        Err(format!("size must be in (0, {}]", MAX_CUBE_SIZE))
    }
}

pub fn create_clap_command() -> Command {
    Command::new("ascii_cube")
        .about("Spinning cube rendered with ASCII line art")
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(
            "Keys: w/s, a/d, q/e spin about x, y, z (opposite key stops), space pauses,\n\
             m cycles render mode, n toggles face normals, Esc or Ctrl-C quits.",
        )
        .arg(
            Arg::new("width")
                .long("width")
                .value_name("CELLS")
                .help("Grid width in cells")
                .value_parser(value_parser!(u16).range(2..=1024))
                .default_value("64"),
        )
        .arg(
            Arg::new("height")
                .long("height")
                .value_name("CELLS")
                .help("Grid height in cells")
                .value_parser(value_parser!(u16).range(2..=1024))
                .default_value("48"),
        )
        .arg(
            Arg::new("size")
                .short('s')
                .long("size")
                .value_name("UNITS")
                .help("Cube edge length in world units")
                .value_parser(parse_size)
                .default_value("30"),
        )
        .arg(
            Arg::new("mode")
                .short('m')
                .long("mode")
                .value_name("MODE")
                .help("Initial render mode")
                .value_parser(["wireframe", "culled", "solid"])
                .default_value("solid"),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .help("Start with face normals drawn")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("slope-threshold")
                .long("slope-threshold")
                .value_name("CELLS")
                .help("Lines narrower than this use '|', flatter than this use '_'")
                .value_parser(value_parser!(i32).range(1..))
                .default_value("4"),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("FILE")
                .help("Where log output goes (stdout carries the frames)")
                .value_parser(value_parser!(PathBuf))
                .default_value("ascii_cube.log"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Most verbose level written to the log file")
                .value_parser(["off", "error", "warn", "info", "debug", "trace"])
                .default_value("info"),
        )
}

pub fn handle_clap_matches(matches: &clap::ArgMatches) -> Settings {
    let defaults = Settings::default();

    let mode = matches
        .get_one::<String>("mode")
        .and_then(|s| s.parse().ok())
        .unwrap_or(defaults.mode);
    let log_level = matches
        .get_one::<String>("log-level")
        .and_then(|s| s.parse().ok())
        .unwrap_or(defaults.log_level);

    Settings {
        width: matches
            .get_one::<u16>("width")
            .map_or(defaults.width, |&w| w as usize),
        height: matches
            .get_one::<u16>("height")
            .map_or(defaults.height, |&h| h as usize),
        size: matches.get_one::<f32>("size").copied().unwrap_or(defaults.size),
        mode,
        debug: matches.get_flag("debug"),
        slope_threshold: matches
            .get_one::<i32>("slope-threshold")
            .copied()
            .unwrap_or(defaults.slope_threshold),
        log_file: matches
            .get_one::<PathBuf>("log-file")
            .cloned()
            .unwrap_or(defaults.log_file),
        log_level,
    }
}
