use ropey::Rope;

/// Cursor position in the editor buffer.
///
/// Columns are char offsets within the line, not bytes, so multibyte
/// input (`привет`) moves one position per keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column (char offset within the line).
    pub col: usize,
    /// Remembered column for vertical movement (sticky column).
    col_memory: usize,
}

impl Cursor {
    /// Create a cursor at line 0, column 0.
    pub const fn new() -> Self {
        Self {
            line: 0,
            col: 0,
            col_memory: 0,
        }
    }

    /// Update column and reset column memory to match.
    const fn set_col(&mut self, col: usize) {
        self.col = col;
        self.col_memory = col;
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A text buffer backed by a rope data structure.
///
/// The raw-input half of the editor binding: every keystroke mutates this
/// buffer immediately, while the preview derives from it on a debounced
/// commit. Tracks a dirty flag for unsaved-change handling.
pub struct EditorBuffer {
    rope: Rope,
    cursor: Cursor,
    dirty: bool,
}

impl EditorBuffer {
    /// Create a new buffer from a string.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::new(),
            dirty: false,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The current cursor position.
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Whether the buffer has been modified since creation or last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the buffer as clean (e.g. after saving).
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the content of a line (without trailing newline).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let s = self.rope.line(line_idx).to_string();
        Some(s.trim_end_matches('\n').trim_end_matches('\r').to_string())
    }

    /// Length of a line in chars (without trailing newline).
    pub fn line_len(&self, line_idx: usize) -> usize {
        if line_idx >= self.rope.len_lines() {
            return 0;
        }
        let line = self.rope.line(line_idx);
        let mut len = line.len_chars();
        while len > 0 && matches!(line.char(len - 1), '\n' | '\r') {
            len -= 1;
        }
        len
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    fn cursor_char_idx(&self) -> usize {
        self.rope.line_to_char(self.cursor.line) + self.cursor.col
    }

    /// Insert a character at the cursor position.
    pub fn insert_char(&mut self, ch: char) {
        let char_idx = self.cursor_char_idx();
        self.rope.insert_char(char_idx, ch);
        if ch == '\n' {
            self.cursor.line += 1;
            self.cursor.set_col(0);
        } else {
            self.cursor.set_col(self.cursor.col + 1);
        }
        self.dirty = true;
    }

    /// Insert a string at the cursor position (e.g. paste).
    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        let char_idx = self.cursor_char_idx();
        self.rope.insert(char_idx, s);

        let newlines = s.matches('\n').count();
        if newlines > 0 {
            let tail = s.rsplit('\n').next().unwrap_or("");
            self.cursor.line += newlines;
            self.cursor.set_col(tail.chars().count());
        } else {
            self.cursor.set_col(self.cursor.col + s.chars().count());
        }
        self.dirty = true;
    }

    /// Split the current line at the cursor (Enter key).
    pub fn split_line(&mut self) {
        self.insert_char('\n');
    }

    /// Delete the character before the cursor (Backspace).
    ///
    /// Returns `true` if a character was deleted.
    pub fn delete_back(&mut self) -> bool {
        if self.cursor.col == 0 && self.cursor.line == 0 {
            return false;
        }
        let char_idx = self.cursor_char_idx();
        if self.cursor.col == 0 {
            // Join with the previous line, removing the whole break (LF or CRLF)
            let prev_len = self.line_len(self.cursor.line - 1);
            let mut start = char_idx - 1;
            if start > 0 && self.rope.char(start) == '\n' && self.rope.char(start - 1) == '\r' {
                start -= 1;
            }
            self.rope.remove(start..char_idx);
            self.cursor.line -= 1;
            self.cursor.set_col(prev_len);
        } else {
            self.rope.remove(char_idx - 1..char_idx);
            self.cursor.set_col(self.cursor.col - 1);
        }
        self.dirty = true;
        true
    }

    /// Delete the character at the cursor (Delete key).
    ///
    /// Returns `true` if a character was deleted.
    pub fn delete_forward(&mut self) -> bool {
        let at_line_end = self.cursor.col >= self.line_len(self.cursor.line);
        if at_line_end && self.cursor.line + 1 >= self.line_count() {
            return false;
        }
        let char_idx = self.cursor_char_idx();
        let mut end = char_idx + 1;
        // A CRLF break is two chars; remove both when joining lines
        if at_line_end
            && self.rope.char(char_idx) == '\r'
            && end < self.rope.len_chars()
            && self.rope.char(end) == '\n'
        {
            end += 1;
        }
        self.rope.remove(char_idx..end);
        self.dirty = true;
        true
    }

    /// Move the cursor in the given direction.
    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
            Direction::Up => self.move_up(),
            Direction::Down => self.move_down(),
        }
    }

    fn move_left(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.set_col(self.cursor.col - 1);
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.set_col(self.line_len(self.cursor.line));
        }
    }

    fn move_right(&mut self) {
        if self.cursor.col < self.line_len(self.cursor.line) {
            self.cursor.set_col(self.cursor.col + 1);
        } else if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            self.cursor.set_col(0);
        }
    }

    fn move_up(&mut self) {
        if self.cursor.line == 0 {
            self.cursor.set_col(0);
            return;
        }
        self.cursor.line -= 1;
        // Sticky column: keep the remembered column, clamp to line length
        self.cursor.col = self.cursor.col_memory.min(self.line_len(self.cursor.line));
    }

    fn move_down(&mut self) {
        if self.cursor.line + 1 >= self.line_count() {
            self.cursor.set_col(self.line_len(self.cursor.line));
            return;
        }
        self.cursor.line += 1;
        self.cursor.col = self.cursor.col_memory.min(self.line_len(self.cursor.line));
    }

    /// Move cursor to the beginning of the line (Home).
    pub const fn move_home(&mut self) {
        self.cursor.set_col(0);
    }

    /// Move cursor to the end of the line (End).
    pub fn move_end(&mut self) {
        let len = self.line_len(self.cursor.line);
        self.cursor.set_col(len);
    }

    /// Move cursor one word to the left (Ctrl+Left).
    pub fn move_word_left(&mut self) {
        if self.cursor.col == 0 {
            if self.cursor.line > 0 {
                self.cursor.line -= 1;
                self.cursor.set_col(self.line_len(self.cursor.line));
            }
            return;
        }
        let chars: Vec<char> = self
            .line_at(self.cursor.line)
            .unwrap_or_default()
            .chars()
            .collect();
        let mut i = self.cursor.col.min(chars.len());
        while i > 0 && !is_word_char(chars[i - 1]) {
            i -= 1;
        }
        while i > 0 && is_word_char(chars[i - 1]) {
            i -= 1;
        }
        self.cursor.set_col(i);
    }

    /// Move cursor one word to the right (Ctrl+Right).
    pub fn move_word_right(&mut self) {
        let len = self.line_len(self.cursor.line);
        if self.cursor.col >= len {
            if self.cursor.line + 1 < self.line_count() {
                self.cursor.line += 1;
                self.cursor.set_col(0);
            }
            return;
        }
        let chars: Vec<char> = self
            .line_at(self.cursor.line)
            .unwrap_or_default()
            .chars()
            .collect();
        let mut i = self.cursor.col;
        while i < chars.len() && is_word_char(chars[i]) {
            i += 1;
        }
        while i < chars.len() && !is_word_char(chars[i]) {
            i += 1;
        }
        self.cursor.set_col(i);
    }

    /// Move cursor to the start of the buffer (Ctrl+Home).
    pub const fn move_to_start(&mut self) {
        self.cursor.line = 0;
        self.cursor.set_col(0);
    }

    /// Move cursor to the end of the buffer (Ctrl+End).
    pub fn move_to_end(&mut self) {
        self.cursor.line = self.line_count().saturating_sub(1);
        self.cursor.set_col(self.line_len(self.cursor.line));
    }

    /// Move cursor to an absolute position, clamping to buffer bounds.
    pub fn move_to(&mut self, line: usize, col: usize) {
        self.cursor.line = line.min(self.line_count().saturating_sub(1));
        self.cursor.set_col(col.min(self.line_len(self.cursor.line)));
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_chars_builds_text() {
        let mut buf = EditorBuffer::empty();
        for ch in "hello".chars() {
            buf.insert_char(ch);
        }
        assert_eq!(buf.text(), "hello");
        assert_eq!(buf.cursor().col, 5);
        assert!(buf.is_dirty());
    }

    #[test]
    fn test_insert_multibyte_chars_moves_one_column() {
        let mut buf = EditorBuffer::empty();
        for ch in "привет".chars() {
            buf.insert_char(ch);
        }
        assert_eq!(buf.text(), "привет");
        assert_eq!(buf.cursor().col, 6);
    }

    #[test]
    fn test_split_line_moves_to_next_line() {
        let mut buf = EditorBuffer::from_text("ab");
        buf.move_to(0, 1);
        buf.split_line();
        assert_eq!(buf.text(), "a\nb");
        assert_eq!(buf.cursor().line, 1);
        assert_eq!(buf.cursor().col, 0);
    }

    #[test]
    fn test_delete_back_removes_char() {
        let mut buf = EditorBuffer::from_text("привет");
        buf.move_to(0, 6);
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "приве");
        assert_eq!(buf.cursor().col, 5);
    }

    #[test]
    fn test_delete_back_at_line_start_joins_lines() {
        let mut buf = EditorBuffer::from_text("one\ntwo");
        buf.move_to(1, 0);
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "onetwo");
        assert_eq!(buf.cursor().line, 0);
        assert_eq!(buf.cursor().col, 3);
    }

    #[test]
    fn test_delete_back_joins_crlf_lines_fully() {
        let mut buf = EditorBuffer::from_text("one\r\ntwo");
        buf.move_to(1, 0);
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "onetwo");
        assert_eq!(buf.cursor().line, 0);
        assert_eq!(buf.cursor().col, 3);
    }

    #[test]
    fn test_delete_back_at_origin_is_noop() {
        let mut buf = EditorBuffer::from_text("x");
        assert!(!buf.delete_back());
        assert_eq!(buf.text(), "x");
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_delete_forward_at_line_end_joins_lines() {
        let mut buf = EditorBuffer::from_text("one\ntwo");
        buf.move_to(0, 3);
        assert!(buf.delete_forward());
        assert_eq!(buf.text(), "onetwo");
    }

    #[test]
    fn test_delete_forward_joins_crlf_lines_fully() {
        let mut buf = EditorBuffer::from_text("one\r\ntwo");
        buf.move_to(0, 3);
        assert!(buf.delete_forward());
        assert_eq!(buf.text(), "onetwo");
    }

    #[test]
    fn test_delete_forward_at_buffer_end_is_noop() {
        let mut buf = EditorBuffer::from_text("ab");
        buf.move_to(0, 2);
        assert!(!buf.delete_forward());
    }

    #[test]
    fn test_insert_str_multiline_positions_cursor() {
        let mut buf = EditorBuffer::from_text("xy");
        buf.move_to(0, 1);
        buf.insert_str("a\nbc");
        assert_eq!(buf.text(), "xa\nbcy");
        assert_eq!(buf.cursor().line, 1);
        assert_eq!(buf.cursor().col, 2);
    }

    #[test]
    fn test_sticky_column_survives_short_line() {
        let mut buf = EditorBuffer::from_text("longer line\nab\nanother long line");
        buf.move_to(0, 8);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().col, 2);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().col, 8);
    }

    #[test]
    fn test_move_right_wraps_to_next_line() {
        let mut buf = EditorBuffer::from_text("ab\ncd");
        buf.move_to(0, 2);
        buf.move_cursor(Direction::Right);
        assert_eq!(buf.cursor().line, 1);
        assert_eq!(buf.cursor().col, 0);
    }

    #[test]
    fn test_move_left_wraps_to_previous_line_end() {
        let mut buf = EditorBuffer::from_text("ab\ncd");
        buf.move_to(1, 0);
        buf.move_cursor(Direction::Left);
        assert_eq!(buf.cursor().line, 0);
        assert_eq!(buf.cursor().col, 2);
    }

    #[test]
    fn test_word_motion_left_and_right() {
        let mut buf = EditorBuffer::from_text("foo bar_baz qux");
        buf.move_to(0, 15);
        buf.move_word_left();
        assert_eq!(buf.cursor().col, 12);
        buf.move_word_left();
        assert_eq!(buf.cursor().col, 4);
        buf.move_word_right();
        assert_eq!(buf.cursor().col, 12);
    }

    #[test]
    fn test_word_motion_over_multibyte_words() {
        let mut buf = EditorBuffer::from_text("привет мир");
        buf.move_to(0, 10);
        buf.move_word_left();
        assert_eq!(buf.cursor().col, 7);
        buf.move_word_left();
        assert_eq!(buf.cursor().col, 0);
        buf.move_word_right();
        assert_eq!(buf.cursor().col, 7);
    }

    #[test]
    fn test_move_to_clamps_out_of_range() {
        let mut buf = EditorBuffer::from_text("short");
        buf.move_to(10, 99);
        assert_eq!(buf.cursor().line, 0);
        assert_eq!(buf.cursor().col, 5);
    }

    #[test]
    fn test_mark_clean_clears_dirty() {
        let mut buf = EditorBuffer::from_text("x");
        buf.insert_char('y');
        assert!(buf.is_dirty());
        buf.mark_clean();
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_line_at_strips_newline() {
        let buf = EditorBuffer::from_text("one\ntwo\n");
        assert_eq!(buf.line_at(0).as_deref(), Some("one"));
        assert_eq!(buf.line_at(1).as_deref(), Some("two"));
    }

    #[test]
    fn test_move_to_end_lands_on_last_char() {
        let mut buf = EditorBuffer::from_text("one\ntwo");
        buf.move_to_end();
        assert_eq!(buf.cursor().line, 1);
        assert_eq!(buf.cursor().col, 3);
    }
}
