use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    cursor, execute,
    terminal::{
        self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
    },
};

use crate::input::ByteSource;

pub const FALLBACK_COLS: u16 = 80;
pub const FALLBACK_ROWS: u16 = 24;

/// Scoped ownership of the terminal: raw mode plus the alternate screen.
/// Acquired once at startup and restored on drop, so every exit path gives
/// the user their shell back.
pub struct Terminal {
    active: bool,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, cursor::Hide) {
            let _ = disable_raw_mode();
            return Err(anyhow::Error::from(e).context("failed to set up the terminal screen"));
        }
        log::debug!("Terminal raw mode enabled");
        Ok(Self { active: true })
    }

    /// Current (cols, rows). A failed query falls back to 80x24 so the
    /// editor stays usable on odd terminals.
    pub fn size(&self) -> (u16, u16) {
        match terminal::size() {
            Ok((cols, rows)) if cols > 0 && rows > 0 => (cols, rows),
            _ => (FALLBACK_COLS, FALLBACK_ROWS),
        }
    }

    /// Write one composed frame in a single unbuffered write.
    pub fn write_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(frame)?;
        out.flush()
    }

    /// Hand the terminal back temporarily (help screen, filename prompt).
    pub fn suspend(&mut self) -> Result<()> {
        if self.active {
            disable_raw_mode()?;
            execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)?;
            self.active = false;
        }
        Ok(())
    }

    /// Re-acquire the terminal after `suspend`.
    pub fn resume(&mut self) -> Result<()> {
        if !self.active {
            enable_raw_mode()?;
            execute!(io::stdout(), EnterAlternateScreen)?;
            self.active = true;
        }
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.active {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
            self.active = false;
        }
    }
}

/// Best-effort restoration for the panic hook, which cannot reach the
/// `Terminal` value.
pub fn emergency_restore() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)?;
    Ok(())
}

/// Wait up to `timeout` for stdin to become readable.
fn poll_stdin(timeout: Duration) -> io::Result<bool> {
    let mut fds = libc::pollfd {
        fd: libc::STDIN_FILENO,
        events: libc::POLLIN,
        revents: 0,
    };
    let millis = timeout.as_millis().min(i32::MAX as u128) as libc::c_int;
    let rc = unsafe { libc::poll(&mut fds, 1, millis) };
    if rc < 0 {
        let err = io::Error::last_os_error();
        // An interrupted poll is just an idle tick.
        if err.kind() == io::ErrorKind::Interrupted {
            return Ok(false);
        }
        return Err(err);
    }
    Ok(rc > 0 && fds.revents & libc::POLLIN != 0)
}

/// Read one byte straight from the stdin descriptor. `std::io::stdin()` is
/// deliberately bypassed: its internal buffer would slurp queued
/// escape-sequence bytes that a later `poll` still needs to see.
fn read_stdin_byte() -> io::Result<Option<u8>> {
    let mut byte: u8 = 0;
    let rc = unsafe {
        libc::read(
            libc::STDIN_FILENO,
            &mut byte as *mut u8 as *mut libc::c_void,
            1,
        )
    };
    match rc {
        1 => Ok(Some(byte)),
        0 => Ok(None),
        _ => {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                Ok(None)
            } else {
                Err(err)
            }
        }
    }
}

impl ByteSource for Terminal {
    fn read_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        if !poll_stdin(timeout)? {
            return Ok(None);
        }
        read_stdin_byte()
    }
}
