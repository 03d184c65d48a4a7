/// The editable text: an ordered list of lines plus a cursor and the index
/// of the first visible row. The buffer is never empty; a fresh buffer holds
/// one blank line.
///
/// `cursor_col` counts characters, not bytes, so multi-byte content loaded
/// from disk keeps the cursor on character boundaries.
pub struct Buffer {
    lines: Vec<String>,
    cursor_row: usize,
    cursor_col: usize,
    viewport_top: usize,
}

fn char_len(line: &str) -> usize {
    line.chars().count()
}

fn byte_index(line: &str, char_idx: usize) -> usize {
    line.char_indices()
        .nth(char_idx)
        .map(|(idx, _)| idx)
        .unwrap_or(line.len())
}

fn closing_pair(c: char) -> Option<char> {
    match c {
        '(' => Some(')'),
        '{' => Some('}'),
        '[' => Some(']'),
        '"' => Some('"'),
        _ => None,
    }
}

impl Buffer {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor_row: 0,
            cursor_col: 0,
            viewport_top: 0,
        }
    }

    pub fn from_lines(mut lines: Vec<String>) -> Self {
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self {
            lines,
            cursor_row: 0,
            cursor_col: 0,
            viewport_top: 0,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    pub fn viewport_top(&self) -> usize {
        self.viewport_top
    }

    /// Insert a character at the cursor and advance past it. With
    /// `close_pairs` set, an opening bracket or double quote also inserts
    /// its closing partner after the cursor, leaving the cursor between the
    /// pair.
    pub fn insert_char(&mut self, c: char, close_pairs: bool) {
        let at = byte_index(&self.lines[self.cursor_row], self.cursor_col);
        self.lines[self.cursor_row].insert(at, c);
        self.cursor_col += 1;
        if close_pairs {
            if let Some(closer) = closing_pair(c) {
                let at = byte_index(&self.lines[self.cursor_row], self.cursor_col);
                self.lines[self.cursor_row].insert(at, closer);
            }
        }
    }

    /// Delete the character before the cursor. At column 0 the current line
    /// is joined onto the previous one and the cursor lands on the join
    /// point. At the very start of the buffer this is a no-op.
    pub fn backspace(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
            let at = byte_index(&self.lines[self.cursor_row], self.cursor_col);
            self.lines[self.cursor_row].remove(at);
        } else if self.cursor_row > 0 {
            let tail = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            let prev = &mut self.lines[self.cursor_row];
            self.cursor_col = char_len(prev);
            prev.push_str(&tail);
        }
    }

    /// Split the current line at the cursor: the text after the cursor
    /// becomes a new line below, and the cursor moves to its start.
    pub fn split_line(&mut self) {
        let at = byte_index(&self.lines[self.cursor_row], self.cursor_col);
        let tail = self.lines[self.cursor_row].split_off(at);
        self.cursor_row += 1;
        self.lines.insert(self.cursor_row, tail);
        self.cursor_col = 0;
    }

    /// Move the cursor by a row/column delta. The row clamps to the buffer
    /// and the column clamps against the destination row's length, so
    /// moving vertically into a shorter line snaps the column down.
    pub fn move_cursor(&mut self, dx: isize, dy: isize) {
        let max_row = (self.lines.len() - 1) as isize;
        let row = self.cursor_row as isize + dy;
        self.cursor_row = row.clamp(0, max_row) as usize;

        let max_col = char_len(&self.lines[self.cursor_row]) as isize;
        let col = self.cursor_col as isize + dx;
        self.cursor_col = col.clamp(0, max_col) as usize;
    }

    /// Shift the viewport by the minimum amount that brings the cursor row
    /// inside the visible window.
    pub fn scroll_to_cursor(&mut self, visible_rows: usize) {
        let visible = visible_rows.max(1);
        if self.cursor_row >= self.viewport_top + visible {
            self.viewport_top = self.cursor_row + 1 - visible;
        }
        if self.cursor_row < self.viewport_top {
            self.viewport_top = self.cursor_row;
        }
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}
