use std::io::{self, BufRead, Write};

use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};

use crate::term::Terminal;

const HELP_TEXT: &str = "\
General controls:
  - ESC      : SAVE and EXIT
  - Shift+X  : DISCARD and EXIT
  - Shift+S  : Toggle Friendly / Vim modes
  - Arrows   : Move cursor
  - Enter    : New line

Vim normal mode:
  - h/j/k/l  : Move cursor
  - i        : Enter insert mode
";

/// Show the key reference on the normal screen. Raw mode is handed back for
/// the duration and the read blocks until the user acknowledges; nothing
/// else runs while the help screen is up.
pub fn show(term: &mut Terminal) -> Result<()> {
    term.suspend()?;
    let shown = present();
    // Raw mode comes back even when the help screen itself had an I/O
    // problem.
    term.resume()?;
    shown
}

fn present() -> Result<()> {
    {
        let mut out = io::stdout().lock();
        execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
        writeln!(out, "Stilus Help\n")?;
        write!(out, "{}", HELP_TEXT)?;
        write!(out, "\nPress Enter to return...")?;
        out.flush()?;
    }

    let mut ack = String::new();
    io::stdin().lock().read_line(&mut ack)?;
    Ok(())
}
