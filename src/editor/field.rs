use unicode_width::UnicodeWidthStr;

/// A single-line text input (title, author).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineField {
    text: String,
    /// Cursor as a character index.
    cursor: usize,
}

impl LineField {
    pub fn new(text: impl Into<String>) -> Self {
        let text: String = text.into().lines().next().unwrap_or_default().to_string();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Terminal column of the cursor.
    pub fn cursor_display_col(&self) -> usize {
        self.text[..self.byte_index()].width()
    }

    pub fn set(&mut self, text: &str) {
        *self = Self::new(text);
    }

    /// Insert a character. Newlines and other control characters are
    /// ignored. Returns whether the text changed.
    pub fn insert_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        let at = self.byte_index();
        self.text.insert(at, ch);
        self.cursor += 1;
        true
    }

    /// Insert pasted text, keeping only its first line.
    pub fn insert_str(&mut self, text: &str) -> bool {
        let first = text.lines().next().unwrap_or_default();
        let mut changed = false;
        for ch in first.chars() {
            changed |= self.insert_char(ch);
        }
        changed
    }

    pub fn delete_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index();
        self.text.remove(at);
        true
    }

    pub fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.text.chars().count() {
            return false;
        }
        let at = self.byte_index();
        self.text.remove(at);
        true
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.text.is_empty();
        *self = Self::default();
        changed
    }

    pub const fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    pub const fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    fn byte_index(&self) -> usize {
        self.text
            .char_indices()
            .nth(self.cursor)
            .map_or(self.text.len(), |(idx, _)| idx)
    }
}
