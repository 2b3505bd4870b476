/// Editing mode.
///
/// There are exactly two modes. Views, the command line and overlays are
/// separate state and never introduce a third.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Navigate, issue commands, read.
    #[default]
    Normal,
    /// Write and edit text.
    Insert,
}

impl Mode {
    /// Status bar label for the mode.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
        }
    }
}

/// Cursor position in the editor buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column, counted in `char`s.
    pub col: usize,
    /// Remembered column for vertical movement (preferred column).
    preferred_col: usize,
}

impl Cursor {
    /// Create a cursor at line 0, column 0.
    pub const fn new() -> Self {
        Self {
            line: 0,
            col: 0,
            preferred_col: 0,
        }
    }

    /// Create a cursor at a specific position.
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            preferred_col: col,
        }
    }

    /// The `(line, col)` pair, ignoring the preferred column.
    pub const fn position(self) -> (usize, usize) {
        (self.line, self.col)
    }

    /// The column vertical motions try to restore.
    pub const fn preferred_col(self) -> usize {
        self.preferred_col
    }

    /// Update column and reset the preferred column to match.
    const fn set_col(&mut self, col: usize) {
        self.col = col;
        self.preferred_col = col;
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
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

/// A line-oriented text buffer with a modal cursor.
///
/// The buffer always holds at least one line. Every operation is total:
/// requests that would leave the buffer are clamped, never rejected.
///
/// Columns count `char`s. Backspace removes one `char`, which for combining
/// sequences and emoji with modifiers is less than one perceived character.
pub struct EditorBuffer {
    lines: Vec<String>,
    cursor: Cursor,
    scroll_offset: usize,
    dirty: bool,
}

impl EditorBuffer {
    /// Create a new buffer from a string.
    pub fn from_text(text: &str) -> Self {
        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        Self {
            lines,
            cursor: Cursor::new(),
            scroll_offset: 0,
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

    /// First visible line.
    pub const fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Whether the buffer has been modified since creation or last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the buffer as clean (e.g., after saving).
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// All lines, in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Get the content of a line.
    pub fn line_at(&self, line_idx: usize) -> Option<&str> {
        self.lines.get(line_idx).map(String::as_str)
    }

    /// Length of a line in `char`s.
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, char_len)
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    // --- Motion ---

    /// Move the cursor one step in the given direction.
    pub fn move_cursor(&mut self, direction: Direction, mode: Mode, viewport_height: usize) {
        match direction {
            Direction::Up => self.move_vertical(-1, mode, viewport_height),
            Direction::Down => self.move_vertical(1, mode, viewport_height),
            Direction::Left => self.move_horizontal(-1, mode),
            Direction::Right => self.move_horizontal(1, mode),
        }
    }

    /// Move `delta` lines up (negative) or down (positive).
    ///
    /// The column comes from the preferred column clamped to the destination
    /// line; the preferred column itself is left untouched.
    pub fn move_vertical(&mut self, delta: isize, mode: Mode, viewport_height: usize) {
        let last = self.lines.len() - 1;
        let target = self.cursor.line.saturating_add_signed(delta).min(last);
        if target == self.cursor.line {
            return;
        }
        self.cursor.line = target;
        self.cursor.col = self.cursor.preferred_col.min(self.col_bound(mode, target));
        self.scroll_to_cursor(viewport_height);
    }

    /// Move `delta` columns left (negative) or right (positive) within the line.
    pub fn move_horizontal(&mut self, delta: isize, mode: Mode) {
        let bound = self.col_bound(mode, self.cursor.line);
        let col = self.cursor.col.saturating_add_signed(delta).min(bound);
        self.cursor.set_col(col);
    }

    /// Move cursor to the beginning of the line.
    pub const fn move_to_line_start(&mut self) {
        self.cursor.set_col(0);
    }

    /// Move cursor to the last position the mode allows on this line.
    pub fn move_to_line_end(&mut self, mode: Mode) {
        let bound = self.col_bound(mode, self.cursor.line);
        self.cursor.set_col(bound);
    }

    /// Move cursor to the start of the buffer.
    pub const fn move_to_doc_start(&mut self) {
        self.cursor.line = 0;
        self.cursor.set_col(0);
    }

    /// Move cursor to the start of the last line.
    pub fn move_to_doc_end(&mut self) {
        self.cursor.line = self.lines.len() - 1;
        self.cursor.set_col(0);
    }

    /// Move cursor to a specific line and column, clamping both.
    pub fn move_to(&mut self, line: usize, col: usize, mode: Mode) {
        self.cursor.line = line.min(self.lines.len() - 1);
        let bound = self.col_bound(mode, self.cursor.line);
        self.cursor.set_col(col.min(bound));
    }

    /// Scroll minimally so the cursor line is inside the viewport.
    pub const fn scroll_to_cursor(&mut self, viewport_height: usize) {
        let line = self.cursor.line;
        if viewport_height == 0 {
            self.scroll_offset = line;
            return;
        }
        if line < self.scroll_offset {
            self.scroll_offset = line;
        } else if line >= self.scroll_offset + viewport_height {
            self.scroll_offset = line + 1 - viewport_height;
        }
    }

    // --- Editing ---

    /// Insert text at the cursor as one operation.
    ///
    /// `text` must not contain a newline; use [`Self::split_line_at_cursor`]
    /// or [`Self::insert_lines_below`] for line structure.
    pub fn insert_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let line = &mut self.lines[self.cursor.line];
        let col = self.cursor.col.min(char_len(line));
        line.insert_str(byte_offset(line, col), text);
        self.cursor.set_col(col + char_len(text));
        self.dirty = true;
    }

    /// Delete the character before the cursor (Backspace).
    ///
    /// At column 0 the line is joined onto the previous one. Returns `true`
    /// if anything changed.
    pub fn delete_backward(&mut self) -> bool {
        let line_idx = self.cursor.line;
        let col = self.cursor.col.min(self.line_len(line_idx));

        if col == 0 {
            if line_idx == 0 {
                return false;
            }
            let current = self.lines.remove(line_idx);
            let prev = &mut self.lines[line_idx - 1];
            let junction = char_len(prev);
            prev.push_str(&current);
            self.cursor.line = line_idx - 1;
            self.cursor.set_col(junction);
        } else {
            let line = &mut self.lines[line_idx];
            line.remove(byte_offset(line, col - 1));
            self.cursor.set_col(col - 1);
        }
        self.dirty = true;
        true
    }

    /// Delete the character under the cursor (Normal-mode `x`).
    ///
    /// Returns `true` if a character was deleted.
    pub fn delete_under_cursor(&mut self, mode: Mode) -> bool {
        let line_idx = self.cursor.line;
        if self.cursor.col >= self.line_len(line_idx) {
            return false;
        }
        let line = &mut self.lines[line_idx];
        line.remove(byte_offset(line, self.cursor.col));
        let col = self.cursor.col.min(self.col_bound(mode, line_idx));
        self.cursor.set_col(col);
        self.dirty = true;
        true
    }

    /// Split the current line at the cursor (Enter).
    pub fn split_line_at_cursor(&mut self) {
        let line_idx = self.cursor.line;
        let line = &mut self.lines[line_idx];
        let at = byte_offset(line, self.cursor.col.min(char_len(line)));
        let tail = line.split_off(at);
        self.lines.insert(line_idx + 1, tail);
        self.cursor.line += 1;
        self.cursor.set_col(0);
        self.dirty = true;
    }

    /// Open a new line below the current one.
    ///
    /// With `with_indent`, the new line starts with the current line's
    /// leading whitespace and the cursor lands after it.
    pub fn insert_line_below(&mut self, with_indent: bool) {
        let indent = self.indent_for_new_line(with_indent);
        let width = char_len(&indent);
        self.lines.insert(self.cursor.line + 1, indent);
        self.cursor.line += 1;
        self.cursor.set_col(width);
        self.dirty = true;
    }

    /// Open a new line above the current one.
    pub fn insert_line_above(&mut self, with_indent: bool) {
        let indent = self.indent_for_new_line(with_indent);
        let width = char_len(&indent);
        self.lines.insert(self.cursor.line, indent);
        self.cursor.set_col(width);
        self.dirty = true;
    }

    /// Remove the current line. The buffer keeps at least one (empty) line.
    pub fn delete_current_line(&mut self, mode: Mode) {
        let line = self.cursor.line;
        self.delete_lines(line, 1, mode);
    }

    /// Remove up to `count` lines starting at `start`.
    ///
    /// Returns the number of lines removed. Removing every line leaves a
    /// single empty line behind.
    pub fn delete_lines(&mut self, start: usize, count: usize, mode: Mode) -> usize {
        let start = start.min(self.lines.len() - 1);
        let end = start.saturating_add(count).min(self.lines.len());
        if start >= end {
            return 0;
        }
        if self.lines.len() == 1 && self.lines[0].is_empty() {
            return 0;
        }
        self.lines.drain(start..end);
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.cursor.line = start.min(self.lines.len() - 1);
        self.cursor.col = self.cursor.col.min(self.col_bound(mode, self.cursor.line));
        self.dirty = true;
        end - start
    }

    /// Text of up to `count` lines starting at `start`, joined with newlines.
    pub fn lines_text(&self, start: usize, count: usize) -> String {
        let start = start.min(self.lines.len());
        let end = start.saturating_add(count).min(self.lines.len());
        self.lines[start..end].join("\n")
    }

    /// Insert multi-line text as whole lines below the cursor line.
    ///
    /// A single trailing newline is ignored. The cursor moves to the start of
    /// the first inserted line. Returns the number of lines inserted.
    pub fn insert_lines_below(&mut self, text: &str) -> usize {
        let text = text.strip_suffix('\n').unwrap_or(text);
        if text.is_empty() {
            return 0;
        }
        let at = self.cursor.line + 1;
        let new_lines: Vec<String> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        let count = new_lines.len();
        self.lines.splice(at..at, new_lines);
        self.cursor.line = at;
        self.cursor.set_col(0);
        self.dirty = true;
        count
    }

    // --- Private helpers ---

    /// Highest column the cursor may occupy on `line` in `mode`.
    fn col_bound(&self, mode: Mode, line: usize) -> usize {
        let len = self.line_len(line);
        match mode {
            Mode::Normal => len.saturating_sub(1),
            Mode::Insert => len,
        }
    }

    fn indent_for_new_line(&self, with_indent: bool) -> String {
        if !with_indent {
            return String::new();
        }
        let line = &self.lines[self.cursor.line];
        let trimmed = line.trim_start_matches([' ', '\t']);
        line[..line.len() - trimmed.len()].to_string()
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field("lines", &format_args!("{} lines", self.lines.len()))
            .field("cursor", &self.cursor)
            .field("scroll_offset", &self.scroll_offset)
            .field("dirty", &self.dirty)
            .finish()
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset of the `col`-th char, or the string length past the end.
fn byte_offset(s: &str, col: usize) -> usize {
    s.char_indices().nth(col).map_or(s.len(), |(idx, _)| idx)
}
