use ropey::Rope;
use unicode_width::UnicodeWidthChar;

/// Cursor position in a [`SourceBuffer`].
///
/// Columns count characters, not bytes, so they map directly onto rope
/// indices. `sticky` remembers the column vertical moves aim for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub line: usize,
    pub col: usize,
    sticky: usize,
}

impl Cursor {
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            sticky: col,
        }
    }

    const fn place(&mut self, col: usize) {
        self.col = col;
        self.sticky = col;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// The Markdown source being edited.
///
/// Every mutation bumps [`revision`](Self::revision), which is how the
/// controller knows the preview must be re-rendered.
pub struct SourceBuffer {
    rope: Rope,
    cursor: Cursor,
    revision: u64,
}

impl SourceBuffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(&normalize_newlines(text)),
            cursor: Cursor::default(),
            revision: 0,
        }
    }

    pub fn empty() -> Self {
        Self::from_text("")
    }

    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub const fn revision(&self) -> u64 {
        self.revision
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Line content without its newline.
    pub fn line_at(&self, line: usize) -> Option<String> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let mut text = self.rope.line(line).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        Some(text)
    }

    /// Line length in characters, newline excluded.
    pub fn line_len(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return 0;
        }
        let slice = self.rope.line(line);
        let len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    /// Terminal column of the cursor, accounting for wide characters.
    pub fn cursor_display_col(&self) -> usize {
        self.line_at(self.cursor.line)
            .unwrap_or_default()
            .chars()
            .take(self.cursor.col)
            .map(|ch| ch.width().unwrap_or(0))
            .sum()
    }

    /// Replace the whole text and put the cursor at the start.
    pub fn replace_all(&mut self, text: &str) {
        self.rope = Rope::from_str(&normalize_newlines(text));
        self.cursor = Cursor::default();
        self.touch();
    }

    pub fn clear(&mut self) {
        self.replace_all("");
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.split_line();
            return;
        }
        let idx = self.char_index();
        self.rope.insert_char(idx, ch);
        self.cursor.place(self.cursor.col + 1);
        self.touch();
    }

    /// Insert pasted text at the cursor, leaving the cursor after it.
    pub fn insert_str(&mut self, text: &str) {
        let text = normalize_newlines(text);
        if text.is_empty() {
            return;
        }
        let idx = self.char_index();
        self.rope.insert(idx, &text);
        let end = idx + text.chars().count();
        self.set_cursor_from_index(end);
        self.touch();
    }

    pub fn split_line(&mut self) {
        let idx = self.char_index();
        self.rope.insert_char(idx, '\n');
        self.cursor.line += 1;
        self.cursor.place(0);
        self.touch();
    }

    /// Backspace. Returns whether anything was removed.
    pub fn delete_back(&mut self) -> bool {
        let idx = self.char_index();
        if idx == 0 {
            return false;
        }
        self.rope.remove(idx - 1..idx);
        self.set_cursor_from_index(idx - 1);
        self.touch();
        true
    }

    /// Delete. Returns whether anything was removed.
    pub fn delete_forward(&mut self) -> bool {
        let idx = self.char_index();
        if idx >= self.rope.len_chars() {
            return false;
        }
        self.rope.remove(idx..=idx);
        self.touch();
        true
    }

    /// Ctrl+Backspace: remove the word before the cursor.
    pub fn delete_word_back(&mut self) -> bool {
        let end = self.char_index();
        self.move_word_left();
        let start = self.char_index();
        if start == end {
            return false;
        }
        self.rope.remove(start..end);
        self.touch();
        true
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => {
                let idx = self.char_index();
                if idx > 0 {
                    self.set_cursor_from_index(idx - 1);
                }
            }
            Direction::Right => {
                let idx = self.char_index();
                if idx < self.rope.len_chars() {
                    self.set_cursor_from_index(idx + 1);
                }
            }
            Direction::Up => self.move_vertical(-1),
            Direction::Down => self.move_vertical(1),
        }
    }

    pub const fn move_home(&mut self) {
        self.cursor.place(0);
    }

    pub fn move_end(&mut self) {
        self.cursor.place(self.line_len(self.cursor.line));
    }

    pub fn move_word_left(&mut self) {
        let mut idx = self.char_index();
        if idx > 0 && self.rope.char(idx - 1) == '\n' {
            self.set_cursor_from_index(idx - 1);
            return;
        }
        while idx > 0 && !is_word(self.rope.char(idx - 1)) && self.rope.char(idx - 1) != '\n' {
            idx -= 1;
        }
        while idx > 0 && is_word(self.rope.char(idx - 1)) {
            idx -= 1;
        }
        self.set_cursor_from_index(idx);
    }

    pub fn move_word_right(&mut self) {
        let len = self.rope.len_chars();
        let mut idx = self.char_index();
        while idx < len && is_word(self.rope.char(idx)) {
            idx += 1;
        }
        while idx < len && !is_word(self.rope.char(idx)) {
            let newline = self.rope.char(idx) == '\n';
            idx += 1;
            if newline {
                break;
            }
        }
        self.set_cursor_from_index(idx);
    }

    /// Move by `rows` lines, e.g. for PageUp/PageDown.
    pub fn move_lines(&mut self, rows: isize) {
        self.move_vertical(rows);
    }

    pub fn move_to(&mut self, line: usize, col: usize) {
        self.cursor.line = line.min(self.line_count().saturating_sub(1));
        self.cursor.place(col.min(self.line_len(self.cursor.line)));
    }

    pub const fn move_to_start(&mut self) {
        self.cursor = Cursor::at(0, 0);
    }

    pub fn move_to_end(&mut self) {
        let last = self.line_count().saturating_sub(1);
        self.cursor = Cursor::at(last, self.line_len(last));
    }

    fn move_vertical(&mut self, rows: isize) {
        let last = self.line_count().saturating_sub(1);
        let target = self.cursor.line.saturating_add_signed(rows).min(last);
        if target == self.cursor.line {
            return;
        }
        self.cursor.line = target;
        self.cursor.col = self.cursor.sticky.min(self.line_len(target));
    }

    fn char_index(&self) -> usize {
        let line = self.cursor.line.min(self.line_count().saturating_sub(1));
        self.rope.line_to_char(line) + self.cursor.col.min(self.line_len(line))
    }

    fn set_cursor_from_index(&mut self, idx: usize) {
        let idx = idx.min(self.rope.len_chars());
        let line = self.rope.char_to_line(idx);
        self.cursor.line = line;
        self.cursor.place(idx - self.rope.line_to_char(line));
    }

    const fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

impl Default for SourceBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for SourceBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceBuffer")
            .field("lines", &self.rope.len_lines())
            .field("cursor", &self.cursor)
            .field("revision", &self.revision)
            .finish()
    }
}

fn is_word(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// CRLF and lone CR become LF; the rope only ever holds `\n`.
fn normalize_newlines(text: &str) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text.to_string()
    }
}
