//! Guide grid navigation: cursor movement, focus marker, and the
//! `Browsing`/`ModalOpen` input-mode state machine.
//!
//! Key decoding (input.rs) produces a [`Command`]; [`Controller::apply`]
//! mutates state and publishes [`NavEvent`]s into an internal queue that the
//! owner drains with [`Controller::poll_event`]. Nothing in here touches the
//! terminal.

use std::collections::VecDeque;
use tracing::debug;

use crate::modal::ModalSession;

/// Shown when an activated program has no description of its own.
pub const DEFAULT_DESCRIPTION: &str = "No description available.";

// --- Types ---

/// One program cell in the guide grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
  pub video_id: Option<String>,
  pub title: String,
  pub description: Option<String>,
  /// Only the currently-airing program is playable.
  pub is_current: bool,
}

/// Read-only snapshot of the guide layout. Rows are ragged: each row holds
/// however many programs its channel has scheduled right now.
#[derive(Debug, Clone, Default)]
pub struct Grid {
  rows: Vec<Vec<Cell>>,
}

impl Grid {
  pub fn new(rows: Vec<Vec<Cell>>) -> Self {
    Self { rows }
  }

  pub fn is_empty(&self) -> bool {
    self.rows.iter().all(|r| r.is_empty())
  }

  pub fn row_count(&self) -> usize {
    self.rows.len()
  }

  pub fn row_len(&self, row: usize) -> usize {
    self.rows.get(row).map_or(0, Vec::len)
  }

  pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
    self.rows.get(row).and_then(|r| r.get(col))
  }
}

/// Position of the navigation focus within the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
  pub row: usize,
  pub col: usize,
}

/// A navigation command, decoded from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
  MoveUp,
  MoveDown,
  MoveLeft,
  MoveRight,
  Activate,
  /// Tab inside the modal.
  FocusNext,
  /// Shift+Tab inside the modal.
  FocusPrev,
  /// Escape / explicit close while the modal is open.
  CloseModal,
}

/// Focusable controls inside the playback modal, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalButton {
  Close,
  OpenYouTube,
  TogglePause,
}

/// Events published by the controller for its collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
  /// A playable cell was activated; start playback.
  Play { video_id: String, title: String, description: String },
  /// The modal should be torn down (playback stopped).
  CloseRequested,
  /// The modal closed and navigation focus returned to this position.
  FocusRestored(Cursor),
}

/// Input routing state. While the modal is open all grid navigation is
/// suppressed and Tab/Shift+Tab/Escape go to the modal's focus trap.
enum NavState {
  Browsing,
  ModalOpen(ModalSession<ModalButton>),
}

pub struct Controller {
  grid: Grid,
  cursor: Cursor,
  state: NavState,
  /// Single-slot focus history: where to put the cursor back when the
  /// modal closes. Lives for one open/close cycle.
  last_focused: Option<Cursor>,
  events: VecDeque<NavEvent>,
}

impl Controller {
  pub fn new(grid: Grid) -> Self {
    Self { grid, cursor: Cursor::default(), state: NavState::Browsing, last_focused: None, events: VecDeque::new() }
  }

  /// Replace the grid snapshot. The cursor resets to the origin; a reload
  /// invalidates any previous position.
  pub fn set_grid(&mut self, grid: Grid) {
    self.grid = grid;
    self.cursor = Cursor::default();
  }

  pub fn grid(&self) -> &Grid {
    &self.grid
  }

  pub fn cursor(&self) -> Cursor {
    self.cursor
  }

  pub fn modal_open(&self) -> bool {
    matches!(self.state, NavState::ModalOpen(_))
  }

  /// The modal session, when one is open. Used by the UI to highlight the
  /// focused button.
  pub fn modal(&self) -> Option<&ModalSession<ModalButton>> {
    match &self.state {
      NavState::ModalOpen(session) => Some(session),
      NavState::Browsing => None,
    }
  }

  /// The position carrying the visual focus marker, if the grid has any
  /// cells. Exactly one cell carries it; an empty grid has none.
  pub fn focused(&self) -> Option<Cursor> {
    if self.grid.is_empty() { None } else { Some(self.cursor) }
  }

  /// The cell under the cursor, or `None` when the grid (or the cursor's
  /// row) is empty.
  pub fn current_cell(&self) -> Option<&Cell> {
    self.grid.cell(self.cursor.row, self.cursor.col)
  }

  /// Drain one published event.
  pub fn poll_event(&mut self) -> Option<NavEvent> {
    self.events.pop_front()
  }

  /// Open the playback modal. Captures the current focus position for
  /// restoration and recomputes the focus trap from the given buttons.
  /// Re-entrant opens simply rebuild the trap.
  pub fn open_modal(&mut self, buttons: Vec<ModalButton>) {
    self.last_focused = Some(self.cursor);
    self.state = NavState::ModalOpen(ModalSession::new(buttons));
    debug!(row = self.cursor.row, col = self.cursor.col, "modal opened, focus captured");
  }

  /// Apply a decoded command. Every command is total: out-of-bounds moves
  /// and activations on non-playable cells degrade to no-ops.
  pub fn apply(&mut self, cmd: Command) {
    match &mut self.state {
      NavState::Browsing => match cmd {
        Command::MoveUp => {
          if self.cursor.row > 0 {
            self.cursor.row -= 1;
            self.clamp_col();
          }
        }
        Command::MoveDown => {
          if self.cursor.row + 1 < self.grid.row_count() {
            self.cursor.row += 1;
            self.clamp_col();
          }
        }
        Command::MoveLeft => {
          if self.cursor.col > 0 {
            self.cursor.col -= 1;
          }
        }
        Command::MoveRight => {
          if self.cursor.col + 1 < self.grid.row_len(self.cursor.row) {
            self.cursor.col += 1;
          }
        }
        Command::Activate => self.activate(),
        // Focus-trap commands only mean something while the modal is open.
        Command::FocusNext | Command::FocusPrev | Command::CloseModal => {}
      },
      NavState::ModalOpen(session) => match cmd {
        Command::FocusNext => session.focus_next(),
        Command::FocusPrev => session.focus_prev(),
        Command::CloseModal => self.close_modal(),
        // Grid navigation is suppressed while the modal is open.
        _ => {}
      },
    }
  }

  /// Close the modal, restore the captured focus position, and ask the
  /// playback collaborator to tear down.
  pub fn close_modal(&mut self) {
    if !self.modal_open() {
      return;
    }
    self.state = NavState::Browsing;
    if let Some(cursor) = self.last_focused.take() {
      self.cursor = cursor;
      self.events.push_back(NavEvent::FocusRestored(cursor));
    }
    self.events.push_back(NavEvent::CloseRequested);
    debug!("modal closed, focus restored");
  }

  /// Vertical moves land on rows of a different length; clamp the column so
  /// the cursor never dangles past the new row's last cell.
  fn clamp_col(&mut self) {
    let len = self.grid.row_len(self.cursor.row);
    self.cursor.col = self.cursor.col.min(len.saturating_sub(1));
  }

  fn activate(&mut self) {
    let Some(cell) = self.current_cell() else { return };
    if !cell.is_current {
      return;
    }
    let Some(ref video_id) = cell.video_id else { return };
    let event = NavEvent::Play {
      video_id: video_id.clone(),
      title: cell.title.clone(),
      description: cell.description.clone().unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
    };
    debug!(video_id = %video_id, "program activated");
    self.events.push_back(event);
  }
}
