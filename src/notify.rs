//! Toast notifications for operation outcomes. Each toast lives for a fixed
//! TTL and is dropped on the next tick after it expires.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::constants::constants;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
  Success,
  Error,
  Info,
}

#[derive(Debug)]
pub struct Toast {
  pub message: String,
  pub severity: Severity,
  created: Instant,
}

/// Queue of live toasts, newest last.
#[derive(Debug, Default)]
pub struct Notifications {
  toasts: VecDeque<Toast>,
}

impl Notifications {
  pub fn push(&mut self, severity: Severity, message: impl Into<String>) {
    self.toasts.push_back(Toast { message: message.into(), severity, created: Instant::now() });
  }

  pub fn success(&mut self, message: impl Into<String>) {
    self.push(Severity::Success, message);
  }

  pub fn error(&mut self, message: impl Into<String>) {
    self.push(Severity::Error, message);
  }

  pub fn info(&mut self, message: impl Into<String>) {
    self.push(Severity::Info, message);
  }

  /// Drop toasts older than the TTL. Called once per event-loop tick.
  pub fn expire(&mut self) {
    let ttl = Duration::from_secs(constants().toast_ttl_secs);
    self.toasts.retain(|t| t.created.elapsed() < ttl);
  }

  /// Dismiss the oldest toast (the close-button analogue).
  pub fn dismiss_oldest(&mut self) {
    self.toasts.pop_front();
  }

  pub fn iter(&self) -> impl Iterator<Item = &Toast> {
    self.toasts.iter()
  }

  pub fn is_empty(&self) -> bool {
    self.toasts.is_empty()
  }
}
