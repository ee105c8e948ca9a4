use std::fs::OpenOptions;
use std::io::{self, stdout};
use std::panic;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event},
    execute,
    style::{ResetColor, SetBackgroundColor},
    terminal::{
        self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use glam::Vec3;
use log::{error, info, warn};
use simplelog::{Config, WriteLogger};

use ascii_cube::{
    create_clap_command, handle_clap_matches,
    input::{action_for_key, apply},
    Color, Controls, Engine, Grid, Rasterizer, Settings, Shape, TerminalPipeline,
};

const INPUT_POLL: Duration = Duration::from_millis(50);

fn setup_terminal() -> io::Result<()> {
    enable_raw_mode()?;
    execute!(
        stdout(),
        EnterAlternateScreen,
        Hide,
        SetBackgroundColor(Color::BLACK.to_crossterm_color()),
        Clear(ClearType::All),
        MoveTo(0, 0)
    )
}

fn cleanup_terminal() -> io::Result<()> {
    execute!(stdout(), ResetColor, Show, LeaveAlternateScreen)?;
    disable_raw_mode()
}

fn main() -> Result<()> {
    let settings = handle_clap_matches(&create_clap_command().get_matches());

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_file)
        .with_context(|| format!("opening log file {}", settings.log_file.display()))?;
    WriteLogger::init(settings.log_level, Config::default(), log_file)
        .context("initializing logger")?;

    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        if let Err(e) = cleanup_terminal() {
            eprintln!("Failed to cleanup terminal: {}", e);
        }
        error!("Panic occurred: {}", panic_info);
        original_hook(panic_info);
    }));

    info!("Starting with {:?}", settings);

    setup_terminal().context("setting up terminal")?;
    let result = run(&settings);
    let cleanup = cleanup_terminal().context("restoring terminal");

    if let Err(e) = &result {
        error!("Exiting with error: {:#}", e);
    }
    result.and(cleanup)
}

fn run(settings: &Settings) -> Result<()> {
    // Every cell is followed by a spacer, and the frame starts one line down
    let (cols, rows) = terminal::size()?;
    let needed = (settings.width * 2, settings.height + 1);
    if (cols as usize) < needed.0 || (rows as usize) < needed.1 {
        warn!(
            "Terminal is {}x{} but the frame needs {}x{}",
            cols, rows, needed.0, needed.1
        );
    }

    let controls = Arc::new(Controls::new(settings.mode, settings.debug));

    let pipeline = TerminalPipeline::new(
        Grid::new(settings.width, settings.height),
        Rasterizer::new(settings.slope_threshold),
        stdout(),
    );
    let mut engine = Engine::new(
        Shape::cube(Vec3::ZERO, settings.size),
        pipeline,
        controls.clone(),
    );

    let render = thread::Builder::new()
        .name("render".into())
        .spawn(move || engine.run())
        .context("spawning render thread")?;

    let input_result = input_loop(&controls, &render);
    controls.stop();

    let render_result = render
        .join()
        .map_err(|_| anyhow!("render thread panicked"))?;
    input_result?;
    render_result.context("render loop failed")
}

/// Feed key presses to the shared controls until quit or until the render
/// thread exits on its own.
fn input_loop(controls: &Controls, render: &thread::JoinHandle<io::Result<()>>) -> Result<()> {
    while controls.is_running() && !render.is_finished() {
        if !event::poll(INPUT_POLL)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if let Some(action) = action_for_key(key) {
                if !apply(controls, action) {
                    info!("Quit requested");
                    break;
                }
            }
        }
    }
    Ok(())
}
