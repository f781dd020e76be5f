//! Editor collaborator interface and an in-memory implementation.
//!
//! The session never renders text itself. It reads and replaces the buffer,
//! saves and restores the caret, and asks the editor where a logical
//! position lands on screen. Change notifications flow the other way as
//! [`EditorEvent`] values.

use roomsync_common::{Position, ScreenPoint, SyncError};

/// Text-editing widget as seen by the session.
///
/// `set_buffer` is a programmatic replacement and must not be reported
/// back as an [`EditorEvent::ContentChanged`].
pub trait Editor {
    fn buffer(&self) -> String;
    fn set_buffer(&mut self, text: &str);
    fn caret(&self) -> Position;
    /// Move the caret. Out-of-range positions are clamped by the editor.
    fn set_caret(&mut self, position: Position);
    fn logical_to_screen(&self, position: Position) -> Result<ScreenPoint, SyncError>;
}

/// Notifications raised by the editor on user activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    ContentChanged(String),
    CaretMoved(Position),
}

// ---------------------------------------------------------------------------
// MemoryEditor
// ---------------------------------------------------------------------------

/// String-backed editor with a fixed character-cell grid.
///
/// The viewport shows `viewport_lines` lines starting at
/// `first_visible_line`; positions outside the buffer or the viewport do
/// not map to the screen.
#[derive(Debug, Clone)]
pub struct MemoryEditor {
    text: String,
    caret: Position,
    cell_width: f64,
    cell_height: f64,
    first_visible_line: u32,
    viewport_lines: u32,
}

impl Default for MemoryEditor {
    fn default() -> Self {
        Self {
            text: String::new(),
            caret: Position::default(),
            cell_width: 8.0,
            cell_height: 16.0,
            first_visible_line: 1,
            viewport_lines: 50,
        }
    }
}

impl MemoryEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn with_viewport(mut self, first_visible_line: u32, viewport_lines: u32) -> Self {
        self.first_visible_line = first_visible_line.max(1);
        self.viewport_lines = viewport_lines;
        self
    }

    pub fn scroll_to(&mut self, first_visible_line: u32) {
        self.first_visible_line = first_visible_line.max(1);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Append `line` as a new last line and put the caret at its end.
    pub fn append_line(&mut self, line: &str) {
        if !self.text.is_empty() {
            self.text.push('\n');
        }
        self.text.push_str(line);
        let last = self.line_count();
        let end = self.line_len(last) + 1;
        self.caret = Position::new(last, end);
    }

    pub fn line_count(&self) -> u32 {
        self.text.split('\n').count() as u32
    }

    /// Length of a 1-based line in characters, 0 for lines past the end.
    fn line_len(&self, line: u32) -> u32 {
        self.text
            .split('\n')
            .nth(line.saturating_sub(1) as usize)
            .map(|l| l.chars().count() as u32)
            .unwrap_or(0)
    }

    fn clamp(&self, position: Position) -> Position {
        let line = position.line.clamp(1, self.line_count());
        let column = position.column.clamp(1, self.line_len(line) + 1);
        Position::new(line, column)
    }
}

impl Editor for MemoryEditor {
    fn buffer(&self) -> String {
        self.text.clone()
    }

    fn set_buffer(&mut self, text: &str) {
        self.text = text.to_string();
    }

    fn caret(&self) -> Position {
        self.caret
    }

    fn set_caret(&mut self, position: Position) {
        self.caret = self.clamp(position);
    }

    fn logical_to_screen(&self, position: Position) -> Result<ScreenPoint, SyncError> {
        let unmappable = SyncError::AnchorMapping {
            line: position.line,
            column: position.column,
        };
        if position.line == 0 || position.column == 0 || position.line > self.line_count() {
            return Err(unmappable);
        }
        if position.column > self.line_len(position.line) + 1 {
            return Err(unmappable);
        }
        let last_visible = self.first_visible_line + self.viewport_lines;
        if position.line < self.first_visible_line || position.line >= last_visible {
            return Err(unmappable);
        }
        Ok(ScreenPoint {
            x: f64::from(position.column - 1) * self.cell_width,
            y: f64::from(position.line - self.first_visible_line) * self.cell_height,
        })
    }
}
