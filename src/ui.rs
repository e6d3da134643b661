use chrono::Local;
use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Modifier, Style, Stylize},
  text::{Line, Span},
  widgets::{Block, Clear, List, ListItem, Padding, Paragraph, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{App, Screen};
use crate::guide::{self, GuideRow};
use crate::manage::{DialogButton, FormField, ManageMode};
use crate::modal::ModalSession;
use crate::nav::ModalButton;
use crate::notify::Severity;
use crate::theme::Theme;

/// Width of the channel label column on the guide.
const CHANNEL_COL: u16 = 20;

// --- Helpers ---

/// Truncate a string to `max_width` display columns, appending "…" if
/// truncated. Width-aware so CJK titles do not overflow their cell.
fn truncate_str(s: &str, max_width: usize) -> String {
  if s.width() <= max_width {
    return s.to_string();
  }
  let mut out = String::new();
  let mut used = 0;
  for c in s.chars() {
    let w = c.width().unwrap_or(0);
    if used + w > max_width.saturating_sub(1) {
      break;
    }
    used += w;
    out.push(c);
  }
  out.push('…');
  out
}

/// A centered sub-rect for overlays.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
  let w = width.min(area.width);
  let h = height.min(area.height);
  Rect { x: area.x + (area.width - w) / 2, y: area.y + (area.height - h) / 2, width: w, height: h }
}

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, app: &mut App) {
  let theme = app.theme();

  frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), frame.area());

  let [header_area, main_area, status_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Min(3),
    Constraint::Length(1),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  render_header(frame, theme, header_area);
  match app.screen {
    Screen::Guide => render_guide(frame, app, main_area),
    Screen::Manage => render_manage(frame, app, main_area),
  }
  render_status(frame, app, status_area);
  render_footer(frame, app, footer_area);

  if app.nav.modal_open() {
    render_player_modal(frame, app, main_area);
  }
  if let ManageMode::ConfirmDelete { ref session, .. } = app.manage.mode {
    render_confirm_dialog(frame, app.theme(), session, main_area);
  }
  if app.help_visible {
    render_help(frame, theme, main_area);
  }
  render_toasts(frame, app, main_area);
}

fn render_header(frame: &mut Frame, theme: &Theme, area: Rect) {
  let left = Line::from(Span::styled(" ▣ tvguide ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)));
  frame.render_widget(left, area);

  let clock = format!("{} ", guide::format_time(Local::now().time()));
  let right = Line::from(Span::styled(clock.clone(), Style::default().fg(theme.fg)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(clock.len() as u16), width: clock.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

// --- Guide screen ---

fn render_guide(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  if app.rows.is_empty() {
    render_empty_guide(frame, theme, area);
    return;
  }

  let [time_area, rows_area] = Layout::vertical([Constraint::Length(2), Constraint::Min(1)]).areas(area);
  render_time_bar(frame, theme, time_area);

  // Keep the cursor row on screen.
  let cursor = app.nav.cursor();
  let visible = rows_area.height as usize;
  let start = (cursor.row + 1).saturating_sub(visible);

  for (offset, row) in app.rows.iter().enumerate().skip(start).take(visible) {
    let y = rows_area.y + (offset - start) as u16;
    let line_area = Rect { y, height: 1, ..rows_area };
    let stripe = offset % 2 == 1;
    render_guide_row(frame, app, row, offset, stripe, line_area);
  }
}

fn render_empty_guide(frame: &mut Frame, theme: &Theme, area: Rect) {
  let text = vec![
    Line::from(""),
    Line::from(Span::styled("▣  No channels yet", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))),
    Line::from(""),
    Line::from(Span::styled("Press m to manage channels, r to reload the guide.", Style::default().fg(theme.muted))),
  ];
  let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
    Block::bordered()
      .border_type(ratatui::widgets::BorderType::Rounded)
      .border_style(Style::default().fg(theme.border)),
  );
  frame.render_widget(paragraph, area);
}

/// Markers for the current half-hour slots plus the playhead under them.
fn render_time_bar(frame: &mut Frame, theme: &Theme, area: Rect) {
  let now = Local::now().time();
  let program_area = Rect {
    x: area.x + CHANNEL_COL,
    width: area.width.saturating_sub(CHANNEL_COL),
    ..area
  };

  let markers = guide::time_markers(now);
  let slot_w = (program_area.width as usize / markers.len().max(1)).max(1);
  let spans: Vec<Span> = markers
    .iter()
    .map(|m| Span::styled(format!("{:<width$}", m, width = slot_w), Style::default().fg(theme.muted)))
    .collect();
  frame.render_widget(Line::from(spans), program_area);

  let percent = guide::playhead_percent(now);
  let offset = (program_area.width as f64 * percent / 100.0) as u16;
  let playhead_area = Rect {
    x: program_area.x + offset.min(program_area.width.saturating_sub(1)),
    y: area.y + 1,
    width: 1,
    height: 1,
  };
  frame.render_widget(Span::styled("▼", Style::default().fg(theme.accent)), playhead_area);
}

fn render_guide_row(frame: &mut Frame, app: &App, row: &GuideRow, row_idx: usize, stripe: bool, area: Rect) {
  let theme = app.theme();
  let bg = if stripe { theme.stripe_bg } else { theme.bg };
  let focused = app.nav.focused();

  let label = truncate_str(&format!("{:>3} {}", row.channel.station_id, row.channel.name), CHANNEL_COL as usize - 1);
  let mut spans =
    vec![Span::styled(format!("{:<width$}", label, width = CHANNEL_COL as usize), Style::default().fg(theme.accent))];

  let program_w = area.width.saturating_sub(CHANNEL_COL) as usize;
  if row.cells.is_empty() {
    spans.push(Span::styled("no programs", Style::default().fg(theme.muted)));
  } else {
    let cell_w = (program_w / row.cells.len()).max(8);
    for (col, cell) in row.cells.iter().enumerate() {
      let is_focused = focused == Some(crate::nav::Cursor { row: row_idx, col });
      let marker = if cell.is_current { "▸ " } else { "  " };
      let text = format!("{}{:<width$}", marker, truncate_str(&cell.title, cell_w.saturating_sub(3)), width = cell_w.saturating_sub(2));
      let style = if is_focused {
        Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD)
      } else if cell.is_current {
        Style::default().fg(theme.fg).add_modifier(Modifier::BOLD)
      } else {
        Style::default().fg(theme.muted)
      };
      spans.push(Span::styled(text, style));
    }
  }

  frame.render_widget(Line::from(spans).bg(bg), area);
}

// --- Playback modal ---

fn render_player_modal(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let modal_area = centered_rect(area, area.width.saturating_sub(10).min(70), 12);
  frame.render_widget(Clear, modal_area);

  let block = Block::bordered()
    .title(" Now Playing ")
    .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
    .border_type(ratatui::widgets::BorderType::Rounded)
    .border_style(Style::default().fg(theme.accent))
    .padding(Padding::horizontal(1))
    .style(Style::default().bg(theme.bg));

  let inner_w = modal_area.width.saturating_sub(4) as usize;
  let mut lines = Vec::new();
  if let Some(ref program) = app.player.current {
    lines.push(Line::from(Span::styled(
      truncate_str(&program.title, inner_w),
      Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(program.description.clone(), Style::default().fg(theme.muted))));
    lines.push(Line::from(""));
    if let Some(status) = app.player.get_last_mpv_status() {
      lines.push(Line::from(Span::styled(format!("♪ {}", status), Style::default().fg(theme.status))));
    }
    lines.push(Line::from(""));
  }

  let pause_label = if app.player.paused { "Resume" } else { "Pause" };
  let buttons = [
    (ModalButton::Close, "Close".to_string()),
    (ModalButton::OpenYouTube, "Open in YouTube".to_string()),
    (ModalButton::TogglePause, pause_label.to_string()),
  ];
  let mut button_spans = Vec::new();
  for (button, label) in &buttons {
    let focused = app.nav.modal().is_some_and(|m| m.is_focused(*button));
    let style = if focused {
      Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(theme.fg)
    };
    button_spans.push(Span::styled(format!("[ {} ]", label), style));
    button_spans.push(Span::raw("  "));
  }
  lines.push(Line::from(button_spans));

  let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
  frame.render_widget(paragraph, modal_area);
}

// --- Manage screen ---

fn render_manage(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();

  if matches!(app.manage.mode, ManageMode::Form) {
    render_channel_form(frame, app, area);
    return;
  }

  let inner_w = area.width.saturating_sub(4) as usize;
  let items: Vec<ListItem> = app
    .manage
    .channels
    .iter()
    .enumerate()
    .map(|(i, channel)| {
      let is_selected = Some(i) == app.manage.list_state.selected();
      let fg = if is_selected { theme.highlight_fg } else { theme.fg };
      let bg = if is_selected {
        theme.highlight_bg
      } else if i % 2 == 1 {
        theme.stripe_bg
      } else {
        theme.bg
      };
      let links = channel.youtube_links.join(", ");
      let text = format!(
        "{:>5}  {:<24} {:<8} {}",
        channel.station_id,
        truncate_str(&channel.name, 24),
        channel.display_option.label(),
        truncate_str(&links, inner_w.saturating_sub(41)),
      );
      ListItem::new(Line::from(Span::styled(text, Style::default().fg(fg)))).bg(bg)
    })
    .collect();

  let title = format!(" Channels — {} ", app.manage.channels.len());
  let list = List::new(items)
    .block(
      Block::bordered()
        .title(title)
        .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .border_style(Style::default().fg(theme.border)),
    )
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD));

  frame.render_stateful_widget(list, area, &mut app.manage.list_state);
}

fn render_channel_form(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let form = &app.manage.form;
  let title = if form.editing_id.is_some() { " Edit Channel " } else { " Add Channel " };

  let field_line = |label: &str, value: &str, focused: bool| -> Line<'static> {
    let label_style = if focused {
      Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(theme.muted)
    };
    let value_style = if focused { Style::default().fg(theme.fg).add_modifier(Modifier::BOLD) } else { Style::default().fg(theme.fg) };
    let cursor = if focused { "▏" } else { "" };
    Line::from(vec![
      Span::styled(format!("{:<16}", label), label_style),
      Span::styled(format!("{}{}", value, cursor), value_style),
    ])
  };

  let focused = form.focused_field();
  let mut lines = vec![
    Line::from(""),
    field_line("Name", &form.name, focused == FormField::Name),
    field_line("Station ID", &form.station_id, focused == FormField::StationId),
    field_line(
      "Display option",
      &format!("{}  (Space cycles)", form.display_option.label()),
      focused == FormField::DisplayOption,
    ),
    Line::from(""),
    Line::from(Span::styled("YouTube links", Style::default().fg(theme.muted))),
  ];
  for (i, link) in form.links.iter().enumerate() {
    lines.push(field_line(&format!("  link {}", i + 1), link, focused == FormField::Link(i)));
  }

  let block = Block::bordered()
    .title(title)
    .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
    .border_type(ratatui::widgets::BorderType::Rounded)
    .border_style(Style::default().fg(theme.accent))
    .padding(Padding::horizontal(1));
  frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_confirm_dialog(frame: &mut Frame, theme: &Theme, session: &ModalSession<DialogButton>, area: Rect) {
  let dialog_area = centered_rect(area, 44, 7);
  frame.render_widget(Clear, dialog_area);

  let button = |label: &str, focused: bool| -> Span<'static> {
    let style = if focused {
      Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(theme.fg)
    };
    Span::styled(format!("[ {} ]", label), style)
  };

  let lines = vec![
    Line::from(""),
    Line::from(Span::styled("Are you sure you want to delete this channel?", Style::default().fg(theme.fg))),
    Line::from(""),
    Line::from(vec![
      button("Cancel", session.is_focused(DialogButton::Cancel)),
      Span::raw("   "),
      button("Delete", session.is_focused(DialogButton::Confirm)),
    ])
    .alignment(Alignment::Center),
  ];

  let block = Block::bordered()
    .title(" Confirm Deletion ")
    .title_style(Style::default().fg(theme.error).add_modifier(Modifier::BOLD))
    .border_type(ratatui::widgets::BorderType::Rounded)
    .border_style(Style::default().fg(theme.error))
    .padding(Padding::horizontal(1))
    .style(Style::default().bg(theme.bg));
  frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }).block(block), dialog_area);
}

// --- Overlays ---

fn render_help(frame: &mut Frame, theme: &Theme, area: Rect) {
  let help_area = centered_rect(area, 46, 12);
  frame.render_widget(Clear, help_area);

  let entries = [
    ("↑/↓/←/→", "Navigate programs"),
    ("Enter / p", "Play current program"),
    ("Tab / Shift+Tab", "Cycle modal buttons"),
    ("Esc", "Close video or dialog"),
    ("m", "Manage channels"),
    ("r", "Reload guide"),
    ("^t", "Cycle theme"),
    ("q", "Quit"),
  ];
  let lines: Vec<Line> = entries
    .iter()
    .map(|(key, action)| {
      Line::from(vec![
        Span::styled(format!("{:<16}", key), Style::default().fg(theme.accent)),
        Span::styled(*action, Style::default().fg(theme.fg)),
      ])
    })
    .collect();

  let block = Block::bordered()
    .title(" Keyboard Shortcuts ")
    .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
    .border_type(ratatui::widgets::BorderType::Rounded)
    .border_style(Style::default().fg(theme.border))
    .padding(Padding::horizontal(1))
    .style(Style::default().bg(theme.bg));
  frame.render_widget(Paragraph::new(lines).block(block), help_area);
}

fn render_toasts(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  for (i, toast) in app.notifications.iter().enumerate() {
    let width = (toast.message.chars().count() as u16 + 4).min(area.width);
    let toast_area = Rect {
      x: area.x + area.width.saturating_sub(width + 1),
      y: area.y + 1 + i as u16,
      width,
      height: 1,
    };
    if toast_area.y >= area.y + area.height {
      break;
    }
    let (icon, color) = match toast.severity {
      Severity::Success => ("✓", theme.success),
      Severity::Error => ("⚠", theme.error),
      Severity::Info => ("ℹ", theme.status),
    };
    frame.render_widget(Clear, toast_area);
    let line = Line::from(Span::styled(
      format!(" {} {} ", icon, toast.message),
      Style::default().fg(theme.bg).bg(color).add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(line, toast_area);
  }
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let (text, style) = if let Some(msg) = &app.status_message {
    (format!(" ⏳ {}", msg), Style::default().fg(theme.status))
  } else if app.player.is_playing() {
    match app.player.get_last_mpv_status() {
      Some(status) => (format!(" ♪ {}", status), Style::default().fg(theme.status)),
      None => (" ♪ Playing".to_string(), Style::default().fg(theme.status)),
    }
  } else {
    (" Ready".to_string(), Style::default().fg(theme.muted))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let keys: Vec<(&str, &str)> = if app.nav.modal_open() {
    vec![("Tab", "Next button"), ("Enter", "Press"), ("Space", "Pause"), ("Esc", "Close")]
  } else {
    match app.screen {
      Screen::Guide => {
        vec![("↑↓←→", "Navigate"), ("Enter", "Play"), ("m", "Manage"), ("r", "Reload"), ("?", "Help"), ("q", "Quit")]
      }
      Screen::Manage => match app.manage.mode {
        ManageMode::Form => vec![("Tab", "Next field"), ("Enter", "Save"), ("^n", "Add link"), ("Esc", "Cancel")],
        _ => vec![("j/k", "Select"), ("a", "Add"), ("e", "Edit"), ("d", "Delete"), ("Esc", "Guide")],
      },
    }
  };

  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
        Span::styled(format!(" {} ", action), Style::default().fg(theme.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw("  "));
      }
      s
    })
    .collect();

  frame.render_widget(Line::from(spans), area);

  let theme_label = format!("{} ", theme.name);
  let right = Line::from(Span::styled(theme_label.clone(), Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(theme_label.len() as u16), width: theme_label.len() as u16, ..area };
  frame.render_widget(right, right_area);
}
