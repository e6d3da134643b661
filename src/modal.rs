//! Focus trap for modal overlays.
//!
//! A [`ModalSession`] holds the ordered set of focusable controls inside an
//! open overlay and cycles focus through them as a closed loop: Tab past the
//! last wraps to the first, Shift+Tab before the first wraps to the last.
//! The set is recomputed on every open, so re-entrant opens never inherit a
//! stale trap.

/// One open/close cycle of a modal overlay's keyboard focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalSession<T: Copy + Eq> {
  focusables: Vec<T>,
  focused: usize,
}

impl<T: Copy + Eq> ModalSession<T> {
  /// Build a trap over `focusables` in tab order. Focus starts on the first
  /// control.
  pub fn new(focusables: Vec<T>) -> Self {
    Self { focusables, focused: 0 }
  }

  /// The control currently holding focus, or `None` for an empty trap.
  pub fn focused(&self) -> Option<T> {
    self.focusables.get(self.focused).copied()
  }

  /// Advance focus; wraps from the last control to the first. No-op when the
  /// trap is empty.
  pub fn focus_next(&mut self) {
    if self.focusables.is_empty() {
      return;
    }
    self.focused = (self.focused + 1) % self.focusables.len();
  }

  /// Move focus backwards; wraps from the first control to the last. No-op
  /// when the trap is empty.
  pub fn focus_prev(&mut self) {
    if self.focusables.is_empty() {
      return;
    }
    self.focused = if self.focused == 0 { self.focusables.len() - 1 } else { self.focused - 1 };
  }

  /// Whether `control` currently holds focus. Used by the UI to highlight it.
  pub fn is_focused(&self, control: T) -> bool {
    self.focused() == Some(control)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn focus_starts_on_first_control() {
    let session = ModalSession::new(vec!['a', 'b', 'c']);
    assert_eq!(session.focused(), Some('a'));
  }

  #[test]
  fn tab_at_last_wraps_to_first() {
    let mut session = ModalSession::new(vec!['a', 'b', 'c']);
    session.focus_next();
    session.focus_next();
    assert_eq!(session.focused(), Some('c'));
    session.focus_next();
    assert_eq!(session.focused(), Some('a'));
  }

  #[test]
  fn shift_tab_at_first_wraps_to_last() {
    let mut session = ModalSession::new(vec!['a', 'b', 'c']);
    session.focus_prev();
    assert_eq!(session.focused(), Some('c'));
    session.focus_prev();
    assert_eq!(session.focused(), Some('b'));
  }

  #[test]
  fn empty_trap_is_a_noop() {
    let mut session: ModalSession<char> = ModalSession::new(Vec::new());
    assert_eq!(session.focused(), None);
    session.focus_next();
    session.focus_prev();
    assert_eq!(session.focused(), None);
  }

  #[test]
  fn single_control_stays_focused() {
    let mut session = ModalSession::new(vec!['a']);
    session.focus_next();
    session.focus_prev();
    assert_eq!(session.focused(), Some('a'));
    assert!(session.is_focused('a'));
  }
}
