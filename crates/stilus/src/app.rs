use std::path::PathBuf;

use crate::backdrop::Backdrop;
use crate::buffer::Buffer;
use crate::file_manager::FileManager;
use crate::input::InputEvent;
use crate::settings::Settings;

/// The editing modes. Exactly one is active; all input routing and
/// rendering dispatches on this single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Home,
    Settings,
    FriendlyEdit,
    VimNormal,
    VimInsert,
}

/// What the event loop must do on the state machine's behalf. Everything
/// that needs the real terminal (the blocking help screen, the filename
/// prompt) is returned as an effect so the machine itself stays testable
/// without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Suspend the terminal and show the blocking help screen.
    ShowHelp,
    /// Suspend the terminal, ask for a filename, then call
    /// [`App::complete_save_prompt`] with the answer.
    PromptSave,
}

pub const HOME_ENTRIES: usize = 4;
pub const SETTINGS_ENTRIES: usize = 3;

pub struct App {
    pub mode: Mode,
    pub buffer: Buffer,
    pub settings: Settings,
    pub file_manager: FileManager,
    pub backdrop: Backdrop,
    pub home_selection: usize,
    pub settings_selection: usize,
    running: bool,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self {
            mode: Mode::Home,
            buffer: Buffer::new(),
            settings,
            file_manager: FileManager::default(),
            backdrop: Backdrop::new(),
            home_selection: 0,
            settings_selection: 0,
            running: true,
        }
    }

    /// Seed the buffer from a file given on the command line and start in
    /// the friendly editing mode. Open failures are logged and leave an
    /// empty buffer; the editor starts regardless.
    pub fn open_file(&mut self, path: PathBuf) {
        match self.file_manager.open(path) {
            Ok(lines) => self.buffer = Buffer::from_lines(lines),
            Err(e) => {
                log::error!("{}", e);
                self.buffer = Buffer::new();
            }
        }
        self.mode = Mode::FriendlyEdit;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Feed one decoded input event through the mode state machine.
    pub fn handle_event(&mut self, event: InputEvent) -> Effect {
        match self.mode {
            Mode::Home => self.handle_home(event),
            Mode::Settings => {
                self.handle_settings(event);
                Effect::None
            }
            Mode::FriendlyEdit | Mode::VimNormal | Mode::VimInsert => self.handle_edit(event),
        }
    }

    fn handle_home(&mut self, event: InputEvent) -> Effect {
        match event {
            InputEvent::ArrowUp => {
                self.home_selection = (self.home_selection + HOME_ENTRIES - 1) % HOME_ENTRIES;
            }
            InputEvent::ArrowDown => {
                self.home_selection = (self.home_selection + 1) % HOME_ENTRIES;
            }
            InputEvent::Enter => match self.home_selection {
                0 => {
                    self.buffer = Buffer::new();
                    self.mode = Mode::FriendlyEdit;
                }
                1 => self.mode = Mode::Settings,
                2 => return Effect::ShowHelp,
                _ => self.quit(),
            },
            _ => {}
        }
        Effect::None
    }

    fn handle_settings(&mut self, event: InputEvent) {
        match event {
            InputEvent::ArrowUp => {
                self.settings_selection =
                    (self.settings_selection + SETTINGS_ENTRIES - 1) % SETTINGS_ENTRIES;
            }
            InputEvent::ArrowDown => {
                self.settings_selection = (self.settings_selection + 1) % SETTINGS_ENTRIES;
            }
            InputEvent::Enter => match self.settings_selection {
                0 => {
                    self.settings.auto_close_pairs = !self.settings.auto_close_pairs;
                    self.persist_settings();
                }
                1 => {
                    self.settings.inline_error_markers = !self.settings.inline_error_markers;
                    self.persist_settings();
                }
                _ => self.mode = Mode::Home,
            },
            _ => {}
        }
    }

    fn persist_settings(&self) {
        if let Err(e) = self.settings.save() {
            log::warn!("Failed to save settings: {}", e);
        }
    }

    fn handle_edit(&mut self, event: InputEvent) -> Effect {
        // The global editing keys. None of them fire in insert mode, where
        // the bytes behind them are ordinary text.
        if self.mode != Mode::VimInsert {
            match event {
                InputEvent::ToggleMode => {
                    self.mode = match self.mode {
                        Mode::FriendlyEdit => Mode::VimNormal,
                        _ => Mode::FriendlyEdit,
                    };
                    return Effect::None;
                }
                InputEvent::EscapeAlone => return self.save_and_quit(),
                InputEvent::DiscardExit => {
                    log::info!("Discarding the buffer and exiting");
                    self.quit();
                    return Effect::None;
                }
                _ => {}
            }
        }

        match self.mode {
            Mode::VimNormal => self.handle_vim_normal(event),
            _ => self.handle_text(event),
        }
        Effect::None
    }

    fn handle_text(&mut self, event: InputEvent) {
        let close_pairs = self.settings.auto_close_pairs;
        match event {
            InputEvent::Char(byte) => self.buffer.insert_char(byte as char, close_pairs),
            // Only reachable in insert mode, where S and X are just letters.
            InputEvent::ToggleMode => self.buffer.insert_char('S', close_pairs),
            InputEvent::DiscardExit => self.buffer.insert_char('X', close_pairs),
            InputEvent::Backspace => self.buffer.backspace(),
            InputEvent::Enter => self.buffer.split_line(),
            InputEvent::ArrowUp => self.buffer.move_cursor(0, -1),
            InputEvent::ArrowDown => self.buffer.move_cursor(0, 1),
            InputEvent::ArrowLeft => self.buffer.move_cursor(-1, 0),
            InputEvent::ArrowRight => self.buffer.move_cursor(1, 0),
            _ => {}
        }
    }

    fn handle_vim_normal(&mut self, event: InputEvent) {
        match event {
            InputEvent::Char(b'i') => self.mode = Mode::VimInsert,
            InputEvent::Char(b'h') | InputEvent::ArrowLeft => self.buffer.move_cursor(-1, 0),
            InputEvent::Char(b'j') | InputEvent::ArrowDown => self.buffer.move_cursor(0, 1),
            InputEvent::Char(b'k') | InputEvent::ArrowUp => self.buffer.move_cursor(0, -1),
            InputEvent::Char(b'l') | InputEvent::ArrowRight => self.buffer.move_cursor(1, 0),
            // Every other printable is ignored here; normal mode never
            // inserts.
            _ => {}
        }
    }

    /// The ESC save path. With a known filename the buffer is written and
    /// the editor stops; otherwise the caller is asked to run the filename
    /// prompt. Termination follows in both cases, whatever the outcome of
    /// the write.
    fn save_and_quit(&mut self) -> Effect {
        if !self.file_manager.has_file() {
            return Effect::PromptSave;
        }
        self.write_buffer();
        self.quit();
        Effect::None
    }

    /// Finish the ESC save path after the filename prompt ran.
    pub fn complete_save_prompt(&mut self, filename: Option<String>) {
        match filename {
            Some(name) => {
                self.file_manager.set_path(PathBuf::from(name));
                self.write_buffer();
            }
            None => log::info!("No filename provided, exiting without saving"),
        }
        self.quit();
    }

    fn write_buffer(&mut self) {
        // A failed write is reported, not fatal; the exit still completes.
        if let Err(e) = self.file_manager.save(self.buffer.lines()) {
            log::error!("{}", e);
        }
    }
}
