use std::io;

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use unicode_width::UnicodeWidthChar;

use crate::app::{App, Mode};

/// Rows at the bottom reserved for the status line and input.
const CHROME_ROWS: u16 = 2;

/// Build one complete output frame for the current state. The frame is a
/// plain ANSI byte stream; the caller writes it in a single atomic write to
/// keep flicker down.
pub fn draw_frame(app: &mut App, cols: u16, rows: u16) -> io::Result<Vec<u8>> {
    let mut frame: Vec<u8> = Vec::with_capacity(4096);
    queue!(frame, Hide)?;
    match app.mode {
        Mode::Home => draw_home(&mut frame, app, cols, rows)?,
        Mode::Settings => draw_settings(&mut frame, app)?,
        Mode::FriendlyEdit | Mode::VimNormal | Mode::VimInsert => {
            draw_editor(&mut frame, app, cols, rows)?;
        }
    }
    Ok(frame)
}

fn draw_editor(frame: &mut Vec<u8>, app: &mut App, cols: u16, rows: u16) -> io::Result<()> {
    let visible_rows = rows.saturating_sub(CHROME_ROWS).max(1) as usize;
    app.buffer.scroll_to_cursor(visible_rows);

    let (cursor_row, cursor_col) = app.buffer.cursor();
    let top = app.buffer.viewport_top();
    let line_count = app.buffer.line_count();
    let text_width = cols.saturating_sub(2) as usize;
    let indicator_row = cursor_row * visible_rows / line_count.max(1);

    for i in 0..visible_rows {
        queue!(frame, MoveTo(0, i as u16), Clear(ClearType::UntilNewLine))?;
        if let Some(line) = app.buffer.line(top + i) {
            let text = truncate_to_width(line, text_width);
            let decorated = hlcore::decorate_line(text, app.settings.inline_error_markers);
            queue!(frame, Print(decorated))?;
        }
        // One scrollbar cell per row: a bright block marks the cursor's
        // position in the file, a dim bar fills the rest.
        queue!(frame, MoveTo(cols.saturating_sub(1), i as u16))?;
        if i == indicator_row {
            queue!(frame, SetForegroundColor(Color::White), Print('█'), ResetColor)?;
        } else {
            queue!(frame, SetForegroundColor(Color::DarkGrey), Print('│'), ResetColor)?;
        }
    }

    let status = format!(
        " {} | L:{} | Shift+S: toggle | Esc: save | Shift+X: discard",
        mode_name(app.mode),
        cursor_row + 1
    );
    queue!(
        frame,
        MoveTo(0, rows.saturating_sub(2)),
        SetAttribute(Attribute::Reverse),
        Print(pad_to_width(&status, cols as usize)),
        SetAttribute(Attribute::Reset)
    )?;

    let line = app.buffer.line(cursor_row).unwrap_or("");
    let screen_col = display_col(line, cursor_col).min(cols.saturating_sub(1) as usize);
    let screen_row = (cursor_row - top).min(visible_rows - 1);
    queue!(frame, MoveTo(screen_col as u16, screen_row as u16), Show)?;
    Ok(())
}

fn mode_name(mode: Mode) -> &'static str {
    match mode {
        Mode::FriendlyEdit => "FRIENDLY",
        Mode::VimNormal => "VIM-NORMAL",
        Mode::VimInsert => "VIM-INSERT",
        Mode::Home => "HOME",
        Mode::Settings => "SETTINGS",
    }
}

fn draw_home(frame: &mut Vec<u8>, app: &mut App, cols: u16, rows: u16) -> io::Result<()> {
    queue!(frame, Clear(ClearType::All))?;

    app.backdrop.advance(rows, cols);
    queue!(frame, SetForegroundColor(Color::DarkGreen))?;
    for (x, y, glyph) in app.backdrop.visible_glyphs(rows, cols) {
        queue!(frame, MoveTo(x, y), Print(glyph))?;
    }
    queue!(frame, ResetColor)?;

    let mid = rows / 2;
    queue!(frame, SetAttribute(Attribute::Bold), SetForegroundColor(Color::Grey))?;
    draw_menu_entry(frame, cols, mid.saturating_sub(5), "S T I L U S", false)?;
    queue!(frame, SetAttribute(Attribute::Reset), ResetColor)?;

    let entries = [
        "Start New File",
        "Settings Panel",
        "Help Center",
        "Exit Stilus",
    ];
    for (idx, label) in entries.iter().enumerate() {
        let row = mid.saturating_sub(2).saturating_add(idx as u16);
        draw_menu_entry(frame, cols, row, label, app.home_selection == idx)?;
    }
    Ok(())
}

fn draw_menu_entry(
    frame: &mut Vec<u8>,
    cols: u16,
    row: u16,
    label: &str,
    selected: bool,
) -> io::Result<()> {
    let width = label.len() as u16 + 12;
    let col = cols.saturating_sub(width) / 2;
    queue!(frame, MoveTo(col.max(1), row))?;
    if selected {
        queue!(
            frame,
            SetAttribute(Attribute::Bold),
            SetAttribute(Attribute::Reverse),
            Print(format!("  >>> {} <<<  ", label)),
            SetAttribute(Attribute::Reset)
        )?;
    } else {
        queue!(frame, Print(format!("      {}      ", label)))?;
    }
    Ok(())
}

fn draw_settings(frame: &mut Vec<u8>, app: &App) -> io::Result<()> {
    queue!(
        frame,
        Clear(ClearType::All),
        MoveTo(0, 0),
        SetAttribute(Attribute::Bold),
        SetForegroundColor(Color::DarkCyan),
        Print("Settings Panel"),
        SetAttribute(Attribute::Reset),
        ResetColor
    )?;

    let toggles = [
        ("Auto-Close Pairs", app.settings.auto_close_pairs),
        ("Inline Error Markers", app.settings.inline_error_markers),
    ];
    for (idx, (label, enabled)) in toggles.iter().enumerate() {
        let text = format!(
            "  [{}] {}",
            if *enabled { "ENABLED" } else { "DISABLED" },
            label
        );
        queue!(frame, MoveTo(0, 2 + idx as u16))?;
        if app.settings_selection == idx {
            queue!(
                frame,
                SetAttribute(Attribute::Reverse),
                Print(text),
                SetAttribute(Attribute::Reset)
            )?;
        } else {
            queue!(frame, Print(text))?;
        }
    }

    queue!(frame, MoveTo(0, 5))?;
    if app.settings_selection == 2 {
        queue!(
            frame,
            SetAttribute(Attribute::Reverse),
            Print("  [ BACK TO HOME ] "),
            SetAttribute(Attribute::Reset)
        )?;
    } else {
        queue!(frame, Print("  [ BACK TO HOME ] "))?;
    }
    Ok(())
}

/// The longest prefix of `line` that fits in `max_width` display columns.
fn truncate_to_width(line: &str, max_width: usize) -> &str {
    let mut width = 0;
    for (idx, ch) in line.char_indices() {
        let w = ch.width().unwrap_or(0);
        if width + w > max_width {
            return &line[..idx];
        }
        width += w;
    }
    line
}

/// Display column of the character cursor, accounting for wide characters.
fn display_col(line: &str, cursor_col: usize) -> usize {
    line.chars()
        .take(cursor_col)
        .map(|c| c.width().unwrap_or(0))
        .sum()
}

fn pad_to_width(text: &str, width: usize) -> String {
    let mut padded: String = truncate_to_width(text, width).to_string();
    let used: usize = padded.chars().map(|c| c.width().unwrap_or(0)).sum();
    for _ in used..width {
        padded.push(' ');
    }
    padded
}
