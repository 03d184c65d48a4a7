mod app;
mod backdrop;
mod buffer;
mod file_manager;
mod help;
mod input;
mod render;
mod settings;
mod term;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use std::{env, thread};

use anyhow::Result;
use log::LevelFilter;

use crate::app::{App, Effect, Mode};
use crate::settings::Settings;
use crate::term::Terminal;

const USAGE: &str = "Stilus: a friendly dual-mode terminal editor\n\nUsage: stilus [filename]\n";

/// Extra delay per home-screen tick so the backdrop animation does not spin
/// the loop.
const HOME_TICK_DELAY: Duration = Duration::from_millis(40);

fn main() -> Result<()> {
    let mut logger = env_logger::Builder::from_default_env();
    if env::var_os("RUST_LOG").is_none() {
        logger.filter_level(LevelFilter::Info);
        logger.filter_module("stilus", LevelFilter::Debug);
    }
    logger.init();

    let args: Vec<String> = env::args().collect();
    if args.get(1).map(String::as_str) == Some("help") {
        print!("{}", USAGE);
        return Ok(());
    }

    let mut app = App::new(Settings::load());
    if let Some(path) = args.get(1) {
        app.open_file(PathBuf::from(path));
    } else {
        log::info!("No file specified, starting on the home screen");
    }

    // Restore the terminal before the default panic handler prints, or the
    // message lands on a raw alternate screen nobody can read.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = term::emergency_restore();
        original_hook(panic_info);
    }));

    // Raw mode is the one thing the editor cannot run without.
    let mut terminal = Terminal::new()?;
    let result = run(&mut app, &mut terminal);
    drop(terminal);

    if let Err(ref e) = result {
        log::error!("Application error: {}", e);
        eprintln!("stilus exited with an error: {}", e);
    }
    result
}

/// The tick loop: render the current state, then consume at most one input
/// event. The decoder's poll timeout is the only suspension point, so the
/// loop stays responsive with no input and never busy-waits.
fn run(app: &mut App, terminal: &mut Terminal) -> Result<()> {
    while app.is_running() {
        let (cols, rows) = terminal.size();
        let frame = render::draw_frame(app, cols, rows)?;
        terminal.write_frame(&frame)?;

        if let Some(event) = input::next_event(terminal)? {
            match app.handle_event(event) {
                Effect::ShowHelp => help::show(terminal)?,
                Effect::PromptSave => {
                    let filename = match prompt_filename(terminal) {
                        Ok(filename) => filename,
                        Err(e) => {
                            log::error!("Filename prompt failed: {}", e);
                            None
                        }
                    };
                    app.complete_save_prompt(filename);
                }
                Effect::None => {}
            }
        }

        if app.mode == Mode::Home {
            thread::sleep(HOME_TICK_DELAY);
        }
    }

    log::info!("Editor loop ended");
    Ok(())
}

/// Leave raw mode for a plain line-buffered prompt, then take the terminal
/// back. An empty answer means the user declined to name the file.
fn prompt_filename(terminal: &mut Terminal) -> Result<Option<String>> {
    terminal.suspend()?;
    let answer = read_filename();
    terminal.resume()?;
    answer
}

fn read_filename() -> Result<Option<String>> {
    let mut out = io::stdout().lock();
    write!(out, "Enter filename to save: ")?;
    out.flush()?;
    drop(out);

    let mut name = String::new();
    io::stdin().lock().read_line(&mut name)?;
    let name = name.trim();
    if name.is_empty() {
        Ok(None)
    } else {
        Ok(Some(name.to_string()))
    }
}
