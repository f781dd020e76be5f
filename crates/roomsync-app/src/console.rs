//! Line-oriented terminal front end.
//!
//! Plain lines are appended to the shared buffer. Lines starting with `:`
//! are commands.

use std::collections::HashMap;
use std::ops::ControlFlow;
use std::time::Instant;

use roomsync_common::{Color, Palette, Position};
use roomsync_session::{Editor, MemoryEditor, RoomEvent, RoomSession};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    /// Append a line to the buffer.
    Text(String),
    /// `:cursor LINE COL`
    Cursor(Position),
    /// `:who`
    Who,
    /// `:show`
    Show,
    /// `:quit`
    Quit,
    /// Unrecognized or malformed command, with a hint.
    Invalid(String),
}

pub fn parse_line(line: &str) -> ConsoleInput {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(command) = line.strip_prefix(':') else {
        return ConsoleInput::Text(line.to_string());
    };

    let mut parts = command.split_whitespace();
    match parts.next() {
        Some("quit") | Some("q") => ConsoleInput::Quit,
        Some("who") => ConsoleInput::Who,
        Some("show") => ConsoleInput::Show,
        Some("cursor") => {
            let line = parts.next().and_then(|s| s.parse::<u32>().ok());
            let column = parts.next().and_then(|s| s.parse::<u32>().ok());
            match (line, column) {
                (Some(line), Some(column)) if line >= 1 && column >= 1 => {
                    ConsoleInput::Cursor(Position::new(line, column))
                }
                _ => ConsoleInput::Invalid("usage: :cursor LINE COL (1-based)".into()),
            }
        }
        Some(other) => ConsoleInput::Invalid(format!("unknown command :{other}")),
        None => ConsoleInput::Invalid("empty command".into()),
    }
}

/// Apply one console input to the session.
pub fn apply(
    session: &mut RoomSession<MemoryEditor>,
    input: ConsoleInput,
    now: Instant,
) -> ControlFlow<()> {
    match input {
        ConsoleInput::Text(text) => {
            session.editor_mut().append_line(&text);
            let buffer = session.editor().buffer();
            session.on_local_edit(buffer, now);
            let caret = session.editor().caret();
            session.on_local_cursor_move(caret);
        }
        ConsoleInput::Cursor(position) => {
            session.editor_mut().set_caret(position);
            let caret = session.editor().caret();
            session.on_local_cursor_move(caret);
        }
        ConsoleInput::Who => {
            for participant in session.roster() {
                let color = session.color_for_slot(participant.color_slot);
                let marker = if participant.identity == session.local().identity {
                    " (you)"
                } else {
                    ""
                };
                println!("{}{marker}", paint(&participant.display_name, color));
            }
        }
        ConsoleInput::Show => {
            println!("{}", session.editor().text());
        }
        ConsoleInput::Quit => return ControlFlow::Break(()),
        ConsoleInput::Invalid(hint) => println!("! {hint}"),
    }
    ControlFlow::Continue(())
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Wrap `text` in a 24-bit ANSI foreground color.
pub fn paint(text: &str, color: Color) -> String {
    format!("\x1b[38;2;{};{};{}m{text}\x1b[0m", color.r, color.g, color.b)
}

/// Turns session events into terminal lines, remembering who is who.
pub struct EventPrinter {
    palette: Palette,
    known: HashMap<String, (String, u32)>,
}

impl EventPrinter {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            known: HashMap::new(),
        }
    }

    pub fn render(&mut self, event: &RoomEvent) -> String {
        match event {
            RoomEvent::ParticipantAdded(p) => {
                self.known
                    .insert(p.identity.clone(), (p.display_name.clone(), p.color_slot));
                format!("+ {} joined", self.name(&p.identity))
            }
            RoomEvent::ContentReplaced { author } => {
                format!("~ buffer updated by {}", self.name(author))
            }
            RoomEvent::CursorUpdated {
                identity,
                display_name,
                color_slot,
                position,
                ..
            } => {
                self.known
                    .insert(identity.clone(), (display_name.clone(), *color_slot));
                format!("> {} at {position}", self.name(identity))
            }
        }
    }

    fn name(&self, identity: &str) -> String {
        match self.known.get(identity) {
            Some((name, slot)) => paint(name, self.palette.color_for(*slot)),
            None => identity.chars().take(8).collect(),
        }
    }
}
