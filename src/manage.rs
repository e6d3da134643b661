//! Channel management screen: the channel table, the add/edit form with
//! client-side validation, and the delete confirmation dialog. Pure state;
//! network calls live on [`crate::app::App`].

use ratatui::widgets::ListState;

use crate::guide::{Channel, DisplayOption};
use crate::modal::ModalSession;

/// Focusable controls of the delete confirmation dialog, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogButton {
  Confirm,
  Cancel,
}

/// Which part of the manage screen owns keyboard input.
pub enum ManageMode {
  /// Browsing the channel table.
  List,
  /// Editing the add/edit form.
  Form,
  /// The confirm-delete dialog is open; input goes to its focus trap.
  ConfirmDelete { channel_id: String, session: ModalSession<DialogButton> },
}

/// Fields of the channel form, cycled with Tab. Link fields are dynamic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
  Name,
  StationId,
  DisplayOption,
  Link(usize),
}

/// The add/edit channel form. Text fields hold raw input; validation parses
/// them into a [`Channel`] on submit.
#[derive(Debug, Clone)]
pub struct ChannelForm {
  /// `Some` when editing an existing channel, `None` when adding.
  pub editing_id: Option<String>,
  pub name: String,
  pub station_id: String,
  pub display_option: DisplayOption,
  pub links: Vec<String>,
  focused: usize,
}

impl ChannelForm {
  pub fn empty() -> Self {
    Self {
      editing_id: None,
      name: String::new(),
      station_id: String::new(),
      display_option: DisplayOption::Random,
      links: vec![String::new()],
      focused: 0,
    }
  }

  /// Pre-fill the form from an existing channel for editing.
  pub fn for_edit(channel: &Channel) -> Self {
    Self {
      editing_id: Some(channel.id.clone()),
      name: channel.name.clone(),
      station_id: channel.station_id.to_string(),
      display_option: channel.display_option,
      links: if channel.youtube_links.is_empty() { vec![String::new()] } else { channel.youtube_links.clone() },
      focused: 0,
    }
  }

  fn field_count(&self) -> usize {
    3 + self.links.len()
  }

  pub fn focused_field(&self) -> FormField {
    match self.focused {
      0 => FormField::Name,
      1 => FormField::StationId,
      2 => FormField::DisplayOption,
      n => FormField::Link(n - 3),
    }
  }

  pub fn focus_next(&mut self) {
    self.focused = (self.focused + 1) % self.field_count();
  }

  pub fn focus_prev(&mut self) {
    self.focused = if self.focused == 0 { self.field_count() - 1 } else { self.focused - 1 };
  }

  /// The text buffer behind the focused field, when it is a text field.
  fn focused_text(&mut self) -> Option<&mut String> {
    match self.focused_field() {
      FormField::Name => Some(&mut self.name),
      FormField::StationId => Some(&mut self.station_id),
      FormField::DisplayOption => None,
      FormField::Link(i) => self.links.get_mut(i),
    }
  }

  pub fn insert_char(&mut self, c: char) {
    if let Some(text) = self.focused_text() {
      text.push(c);
    }
  }

  pub fn backspace(&mut self) {
    if let Some(text) = self.focused_text() {
      text.pop();
    }
  }

  /// Cycle the display option when it holds focus.
  pub fn cycle_display_option(&mut self) {
    if self.focused_field() != FormField::DisplayOption {
      return;
    }
    let idx = DisplayOption::ALL.iter().position(|o| *o == self.display_option).unwrap_or(0);
    self.display_option = DisplayOption::ALL[(idx + 1) % DisplayOption::ALL.len()];
  }

  pub fn add_link(&mut self) {
    self.links.push(String::new());
    self.focused = self.field_count() - 1;
  }

  /// Remove the focused link field. The form always keeps at least one.
  pub fn remove_link(&mut self) {
    if let FormField::Link(i) = self.focused_field()
      && self.links.len() > 1
    {
      self.links.remove(i);
      self.focused = self.focused.min(self.field_count() - 1);
    }
  }

  /// Validate the form. Returns the channel record to submit, or the list of
  /// problems to show the user.
  pub fn validate(&self) -> Result<Channel, Vec<String>> {
    let mut errors = Vec::new();

    if self.name.trim().is_empty() {
      errors.push("Channel name is required".to_string());
    }

    let station_id = self.station_id.trim().parse::<u32>().ok().filter(|id| *id > 0);
    if station_id.is_none() {
      errors.push("Station ID must be a positive number".to_string());
    }

    let links: Vec<String> = self.links.iter().map(|l| l.trim().to_string()).filter(|l| !l.is_empty()).collect();
    if links.is_empty() {
      errors.push("At least one YouTube channel link is required".to_string());
    } else if links.iter().any(|l| !is_youtube_link(l)) {
      errors.push("One or more YouTube links are invalid".to_string());
    }

    if !errors.is_empty() {
      return Err(errors);
    }

    Ok(Channel {
      id: self.editing_id.clone().unwrap_or_default(),
      station_id: station_id.unwrap_or_default(),
      name: self.name.trim().to_string(),
      display_option: self.display_option,
      youtube_links: links,
    })
  }
}

/// Does the link point somewhere on youtube.com or youtu.be? Scheme and
/// `www.` are optional, a path component is not.
pub fn is_youtube_link(link: &str) -> bool {
  let rest = link.trim();
  let rest = rest.strip_prefix("https://").or_else(|| rest.strip_prefix("http://")).unwrap_or(rest);
  let rest = rest.strip_prefix("www.").unwrap_or(rest);
  rest
    .strip_prefix("youtube.com/")
    .or_else(|| rest.strip_prefix("youtu.be/"))
    .is_some_and(|path| !path.is_empty())
}

/// State for the whole manage screen.
pub struct ManageState {
  pub channels: Vec<Channel>,
  pub list_state: ListState,
  pub mode: ManageMode,
  pub form: ChannelForm,
}

impl ManageState {
  pub fn new() -> Self {
    Self { channels: Vec::new(), list_state: ListState::default(), mode: ManageMode::List, form: ChannelForm::empty() }
  }

  pub fn set_channels(&mut self, channels: Vec<Channel>) {
    self.channels = channels;
    if self.channels.is_empty() {
      self.list_state.select(None);
    } else {
      let sel = self.list_state.selected().unwrap_or(0);
      self.list_state.select(Some(sel.min(self.channels.len() - 1)));
    }
  }

  pub fn selected_channel(&self) -> Option<&Channel> {
    self.list_state.selected().and_then(|i| self.channels.get(i))
  }

  pub fn select_next(&mut self) {
    let count = self.channels.len();
    if count > 0 {
      let i = self.list_state.selected().map_or(0, |i| (i + 1) % count);
      self.list_state.select(Some(i));
    }
  }

  pub fn select_prev(&mut self) {
    let count = self.channels.len();
    if count > 0 {
      let i = self.list_state.selected().map_or(0, |i| if i == 0 { count - 1 } else { i - 1 });
      self.list_state.select(Some(i));
    }
  }

  /// Open the confirm-delete dialog for the selected channel. The dialog
  /// carries its own focus trap; Cancel holds initial focus so a stray Enter
  /// does not delete.
  pub fn open_delete_dialog(&mut self) {
    let Some(channel) = self.selected_channel() else { return };
    self.mode = ManageMode::ConfirmDelete {
      channel_id: channel.id.clone(),
      session: ModalSession::new(vec![DialogButton::Cancel, DialogButton::Confirm]),
    };
  }

  pub fn close_dialog(&mut self) {
    if matches!(self.mode, ManageMode::ConfirmDelete { .. }) {
      self.mode = ManageMode::List;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn valid_form() -> ChannelForm {
    let mut form = ChannelForm::empty();
    form.name = "News 24".to_string();
    form.station_id = "201".to_string();
    form.links = vec!["https://www.youtube.com/@news".to_string()];
    form
  }

  // --- validation ---

  #[test]
  fn valid_form_produces_channel() {
    let channel = valid_form().validate().unwrap();
    assert_eq!(channel.name, "News 24");
    assert_eq!(channel.station_id, 201);
    assert_eq!(channel.youtube_links, vec!["https://www.youtube.com/@news".to_string()]);
  }

  #[test]
  fn blank_name_is_rejected() {
    let mut form = valid_form();
    form.name = "   ".to_string();
    let errors = form.validate().unwrap_err();
    assert!(errors.contains(&"Channel name is required".to_string()));
  }

  #[test]
  fn station_id_must_be_a_positive_number() {
    for bad in ["", "0", "-3", "abc"] {
      let mut form = valid_form();
      form.station_id = bad.to_string();
      let errors = form.validate().unwrap_err();
      assert!(errors.contains(&"Station ID must be a positive number".to_string()), "station id {:?}", bad);
    }
  }

  #[test]
  fn at_least_one_link_required() {
    let mut form = valid_form();
    form.links = vec!["  ".to_string()];
    let errors = form.validate().unwrap_err();
    assert!(errors.contains(&"At least one YouTube channel link is required".to_string()));
  }

  #[test]
  fn non_youtube_links_are_rejected() {
    let mut form = valid_form();
    form.links.push("https://vimeo.com/123".to_string());
    let errors = form.validate().unwrap_err();
    assert!(errors.contains(&"One or more YouTube links are invalid".to_string()));
  }

  #[test]
  fn all_errors_reported_together() {
    let form = ChannelForm::empty();
    let errors = form.validate().unwrap_err();
    assert_eq!(errors.len(), 3);
  }

  #[test]
  fn youtube_link_shapes() {
    assert!(is_youtube_link("https://www.youtube.com/@handle"));
    assert!(is_youtube_link("http://youtube.com/channel/UCabc"));
    assert!(is_youtube_link("youtu.be/abc123"));
    assert!(is_youtube_link("www.youtube.com/user/name"));
    assert!(!is_youtube_link("https://youtube.com/"));
    assert!(!is_youtube_link("https://example.com/youtube.com/x"));
    assert!(!is_youtube_link("youtube"));
  }

  // --- form focus ---

  #[test]
  fn tab_cycles_through_all_fields_and_wraps() {
    let mut form = valid_form();
    assert_eq!(form.focused_field(), FormField::Name);
    form.focus_next();
    form.focus_next();
    assert_eq!(form.focused_field(), FormField::DisplayOption);
    form.focus_next();
    assert_eq!(form.focused_field(), FormField::Link(0));
    form.focus_next();
    assert_eq!(form.focused_field(), FormField::Name);
    form.focus_prev();
    assert_eq!(form.focused_field(), FormField::Link(0));
  }

  #[test]
  fn display_option_cycles_only_when_focused() {
    let mut form = valid_form();
    form.cycle_display_option();
    assert_eq!(form.display_option, DisplayOption::Random);
    form.focus_next();
    form.focus_next();
    form.cycle_display_option();
    assert_eq!(form.display_option, DisplayOption::Popular);
  }

  #[test]
  fn last_link_field_cannot_be_removed() {
    let mut form = valid_form();
    form.focus_next();
    form.focus_next();
    form.focus_next(); // Link(0)
    form.remove_link();
    assert_eq!(form.links.len(), 1);
    form.add_link();
    assert_eq!(form.focused_field(), FormField::Link(1));
    form.remove_link();
    assert_eq!(form.links.len(), 1);
  }

  #[test]
  fn typing_goes_to_the_focused_field() {
    let mut form = ChannelForm::empty();
    form.insert_char('T');
    form.insert_char('V');
    assert_eq!(form.name, "TV");
    form.focus_next();
    form.insert_char('2');
    form.insert_char('0');
    form.insert_char('1');
    form.backspace();
    assert_eq!(form.station_id, "20");
  }

  #[test]
  fn edit_form_prefills_from_channel() {
    let channel = Channel {
      id: "7".to_string(),
      station_id: 210,
      name: "Docs".to_string(),
      display_option: DisplayOption::New,
      youtube_links: vec!["https://youtube.com/@docs".to_string()],
    };
    let form = ChannelForm::for_edit(&channel);
    assert_eq!(form.editing_id.as_deref(), Some("7"));
    assert_eq!(form.station_id, "210");
    let validated = form.validate().unwrap();
    assert_eq!(validated.id, "7");
  }

  // --- dialog ---

  #[test]
  fn delete_dialog_focuses_cancel_first() {
    let mut manage = ManageState::new();
    manage.set_channels(vec![Channel {
      id: "1".to_string(),
      station_id: 201,
      name: "News".to_string(),
      display_option: DisplayOption::Random,
      youtube_links: vec!["https://youtube.com/@news".to_string()],
    }]);
    manage.open_delete_dialog();
    match &manage.mode {
      ManageMode::ConfirmDelete { channel_id, session } => {
        assert_eq!(channel_id, "1");
        assert!(session.is_focused(DialogButton::Cancel));
      }
      _ => panic!("expected confirm dialog"),
    }
    manage.close_dialog();
    assert!(matches!(manage.mode, ManageMode::List));
  }

  #[test]
  fn delete_dialog_needs_a_selection() {
    let mut manage = ManageState::new();
    manage.open_delete_dialog();
    assert!(matches!(manage.mode, ManageMode::List));
  }
}
