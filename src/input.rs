//! Key decoding. Keys map to navigation [`Command`]s or app-level actions
//! here; all state mutation happens in the controller and `App` methods, so
//! the bindings stay testable in isolation.

use anyhow::{Context, Result};
use ratatui::crossterm::event::{self, KeyCode, KeyModifiers};

use crate::app::{App, Screen};
use crate::manage::{ChannelForm, DialogButton, FormField, ManageMode};
use crate::nav::Command;

/// Decode a key press into a grid navigation command. Only meaningful while
/// browsing the guide; the modal has its own bindings.
pub fn decode_browse_key(code: KeyCode) -> Option<Command> {
  match code {
    KeyCode::Up | KeyCode::Char('k') => Some(Command::MoveUp),
    KeyCode::Down | KeyCode::Char('j') => Some(Command::MoveDown),
    KeyCode::Left | KeyCode::Char('h') => Some(Command::MoveLeft),
    KeyCode::Right | KeyCode::Char('l') => Some(Command::MoveRight),
    KeyCode::Enter | KeyCode::Char('p') => Some(Command::Activate),
    _ => None,
  }
}

/// Decode a key press into a focus-trap command for an open modal.
pub fn decode_modal_key(code: KeyCode) -> Option<Command> {
  match code {
    KeyCode::Tab => Some(Command::FocusNext),
    KeyCode::BackTab => Some(Command::FocusPrev),
    KeyCode::Esc | KeyCode::Char('q') => Some(Command::CloseModal),
    _ => None,
  }
}

// --- Event Handling ---

pub async fn handle_key_event(app: &mut App, key: event::KeyEvent) -> Result<()> {
  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
    app.should_quit = true;
    return Ok(());
  }

  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('t') {
    app.next_theme();
    return Ok(());
  }

  if app.help_visible {
    if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
      app.help_visible = false;
    }
    return Ok(());
  }

  match app.screen {
    Screen::Guide => handle_guide_key(app, key).await.context("Failed to handle guide key event")?,
    Screen::Manage => handle_manage_key(app, key),
  }
  Ok(())
}

async fn handle_guide_key(app: &mut App, key: event::KeyEvent) -> Result<()> {
  if app.nav.modal_open() {
    if let Some(cmd) = decode_modal_key(key.code) {
      app.nav.apply(cmd);
      app.process_nav_events().await;
      return Ok(());
    }
    match key.code {
      KeyCode::Enter => app.press_modal_button().await,
      KeyCode::Char(' ') => {
        if let Err(e) = app.player.toggle_pause().await {
          app.notifications.error(format!("Pause error: {}", e));
        }
      }
      _ => {}
    }
    return Ok(());
  }

  if let Some(cmd) = decode_browse_key(key.code) {
    app.nav.apply(cmd);
    app.process_nav_events().await;
    return Ok(());
  }

  match key.code {
    KeyCode::Char('m') => {
      app.screen = Screen::Manage;
      app.trigger_channels_reload();
    }
    KeyCode::Char('r') => app.trigger_guide_refresh(),
    KeyCode::Char('?') => app.help_visible = true,
    KeyCode::Char('q') => app.should_quit = true,
    _ => {}
  }
  Ok(())
}

fn handle_manage_key(app: &mut App, key: event::KeyEvent) {
  if matches!(app.manage.mode, ManageMode::List) {
    handle_manage_list_key(app, key);
  } else if matches!(app.manage.mode, ManageMode::Form) {
    handle_manage_form_key(app, key);
  } else {
    handle_dialog_key(app, key);
  }
}

fn handle_dialog_key(app: &mut App, key: event::KeyEvent) {
  // Focus moves act on the live trap; everything else needs `app` whole.
  if matches!(key.code, KeyCode::Tab | KeyCode::BackTab)
    && let ManageMode::ConfirmDelete { session, .. } = &mut app.manage.mode
  {
    if key.code == KeyCode::Tab {
      session.focus_next();
    } else {
      session.focus_prev();
    }
    return;
  }

  let focused = match &app.manage.mode {
    ManageMode::ConfirmDelete { session, .. } => session.focused(),
    _ => None,
  };
  match key.code {
    KeyCode::Esc | KeyCode::Char('n') => app.manage.close_dialog(),
    KeyCode::Char('y') => app.confirm_delete(),
    KeyCode::Enter => match focused {
      Some(DialogButton::Confirm) => app.confirm_delete(),
      Some(DialogButton::Cancel) | None => app.manage.close_dialog(),
    },
    _ => {}
  }
}

fn handle_manage_list_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Down | KeyCode::Char('j') => app.manage.select_next(),
    KeyCode::Up | KeyCode::Char('k') => app.manage.select_prev(),
    KeyCode::Char('a') => {
      app.manage.form = ChannelForm::empty();
      app.manage.mode = ManageMode::Form;
    }
    KeyCode::Char('e') | KeyCode::Enter => {
      if let Some(channel) = app.manage.selected_channel() {
        app.manage.form = ChannelForm::for_edit(channel);
        app.manage.mode = ManageMode::Form;
      }
    }
    KeyCode::Char('d') => app.manage.open_delete_dialog(),
    KeyCode::Char('r') => app.trigger_channels_reload(),
    KeyCode::Esc | KeyCode::Char('q') => {
      // Back to the guide; pick up any channel edits on the way out.
      app.screen = Screen::Guide;
      app.trigger_guide_refresh();
    }
    _ => {}
  }
}

fn handle_manage_form_key(app: &mut App, key: event::KeyEvent) {
  if key.modifiers.contains(KeyModifiers::CONTROL) {
    match key.code {
      KeyCode::Char('n') => app.manage.form.add_link(),
      KeyCode::Char('x') => app.manage.form.remove_link(),
      _ => {}
    }
    return;
  }
  match key.code {
    KeyCode::Tab | KeyCode::Down => app.manage.form.focus_next(),
    KeyCode::BackTab | KeyCode::Up => app.manage.form.focus_prev(),
    KeyCode::Enter => app.submit_form(),
    KeyCode::Esc => app.manage.mode = ManageMode::List,
    KeyCode::Backspace => app.manage.form.backspace(),
    KeyCode::Char(' ') if app.manage.form.focused_field() == FormField::DisplayOption => {
      app.manage.form.cycle_display_option();
    }
    KeyCode::Char(c) => app.manage.form.insert_char(c),
    _ => {}
  }
}
