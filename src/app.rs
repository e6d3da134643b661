use anyhow::Result;
use futures::stream::{self, StreamExt};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::config::Config;
use crate::constants::constants;
use crate::guide::{self, Channel, GuideRow};
use crate::manage::{ManageMode, ManageState};
use crate::nav::{Command, Controller, Grid, ModalButton, NavEvent};
use crate::notify::Notifications;
use crate::player::{NowPlaying, VideoPlayer};
use crate::theme::THEMES;
use crate::youtube::{self, VideoEntry};

// --- Types ---

pub type GuideResult = Vec<(Channel, Vec<VideoEntry>)>;

/// Which page owns the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  Guide,
  Manage,
}

/// In-flight async task receivers.
#[derive(Default)]
pub(crate) struct AsyncTasks {
  pub(crate) guide_rx: Option<oneshot::Receiver<Result<GuideResult>>>,
  pub(crate) channels_rx: Option<oneshot::Receiver<Result<Vec<Channel>>>>,
  pub(crate) save_rx: Option<oneshot::Receiver<Result<(Channel, bool)>>>,
  pub(crate) delete_rx: Option<oneshot::Receiver<Result<()>>>,
}

pub struct App {
  pub screen: Screen,
  pub nav: Controller,
  pub rows: Vec<GuideRow>,
  pub player: VideoPlayer,
  pub manage: ManageState,
  pub notifications: Notifications,
  pub api: ApiClient,
  pub theme_index: usize,
  pub help_visible: bool,
  pub status_message: Option<String>,
  pub should_quit: bool,
  api_url: String,
  api_key: String,
  pub(crate) tasks: AsyncTasks,
}

impl App {
  pub fn new(cli_api_url: Option<String>, cli_api_key: Option<String>) -> Self {
    let config = Config::load();
    let theme_index =
      if let Some(ref name) = config.theme_name { THEMES.iter().position(|t| t.name == name).unwrap_or(0) } else { 0 };
    let api_url =
      cli_api_url.or(config.api_url).unwrap_or_else(|| constants().default_api_url.clone());
    let api_key = cli_api_key.or(config.api_key).unwrap_or_default();

    Self {
      screen: Screen::Guide,
      nav: Controller::new(Grid::default()),
      rows: Vec::new(),
      player: VideoPlayer::new(),
      manage: ManageState::new(),
      notifications: Notifications::default(),
      api: ApiClient::new(api_url.as_str(), api_key.as_str()),
      theme_index,
      help_visible: false,
      status_message: None,
      should_quit: false,
      api_url,
      api_key,
      tasks: AsyncTasks::default(),
    }
  }

  pub fn theme(&self) -> &'static crate::theme::Theme {
    // Safety: theme_index is bounded by modular arithmetic in next_theme()
    // and clamped to a valid position on initialization.
    &THEMES[self.theme_index]
  }

  pub fn next_theme(&mut self) {
    self.theme_index = (self.theme_index + 1) % THEMES.len();
    self.save_config();
  }

  fn save_config(&self) {
    let config = Config {
      theme_name: Some(self.theme().name.to_string()),
      api_url: Some(self.api_url.clone()),
      api_key: if self.api_key.is_empty() { None } else { Some(self.api_key.clone()) },
    };
    config.save();
  }

  // --- Guide loading ---

  /// Fetch the channel list and each channel's uploads in the background.
  pub fn trigger_guide_refresh(&mut self) {
    if self.tasks.guide_rx.is_some() {
      return;
    }
    info!("guide refresh triggered");
    self.status_message = Some("Loading guide…".to_string());

    let api = self.api.clone();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(fetch_guide(api).await);
    });
    self.tasks.guide_rx = Some(rx);
  }

  /// Reload just the channel records for the manage table.
  pub fn trigger_channels_reload(&mut self) {
    let api = self.api.clone();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(api.list_channels().await);
    });
    self.tasks.channels_rx = Some(rx);
  }

  // --- CRUD ---

  /// Submit the manage form. Validation errors surface as toasts and the
  /// form stays open; otherwise the create/update goes out in the
  /// background.
  pub fn submit_form(&mut self) {
    let channel = match self.manage.form.validate() {
      Ok(channel) => channel,
      Err(errors) => {
        for error in errors {
          self.notifications.error(error);
        }
        return;
      }
    };

    let api = self.api.clone();
    let updating = self.manage.form.editing_id.is_some();
    self.status_message = Some("Saving…".to_string());
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let result = if updating {
        api.update_channel(&channel.id, &channel).await
      } else {
        api.create_channel(&channel).await
      };
      let _ = tx.send(result.map(|saved| (saved, updating)));
    });
    self.tasks.save_rx = Some(rx);
  }

  /// Delete the channel the confirm dialog was opened for.
  pub fn confirm_delete(&mut self) {
    let ManageMode::ConfirmDelete { ref channel_id, .. } = self.manage.mode else { return };
    let id = channel_id.clone();
    self.manage.close_dialog();

    let api = self.api.clone();
    self.status_message = Some("Deleting…".to_string());
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(api.delete_channel(&id).await);
    });
    self.tasks.delete_rx = Some(rx);
  }

  // --- Modal / playback ---

  /// Drain controller events and drive the playback collaborator.
  pub async fn process_nav_events(&mut self) {
    while let Some(event) = self.nav.poll_event() {
      match event {
        NavEvent::Play { video_id, title, description } => {
          info!(video_id = %video_id, "play requested");
          self.status_message = Some("Loading video…".to_string());
          let program = NowPlaying { video_id, title, description };
          match self.player.play(program).await {
            Ok(()) => {
              self.nav.open_modal(vec![ModalButton::Close, ModalButton::OpenYouTube, ModalButton::TogglePause]);
            }
            Err(e) => {
              self.notifications.error(format!("Playback error: {}", e));
              let _ = self.player.stop().await;
            }
          }
          self.status_message = None;
        }
        NavEvent::CloseRequested => {
          if let Err(e) = self.player.stop().await {
            self.notifications.error(format!("Failed to stop playback: {}", e));
          }
        }
        NavEvent::FocusRestored(cursor) => {
          debug!(row = cursor.row, col = cursor.col, "focus restored after modal close");
        }
      }
    }
  }

  /// Press the focused playback-modal button.
  pub async fn press_modal_button(&mut self) {
    let Some(button) = self.nav.modal().and_then(|m| m.focused()) else { return };
    match button {
      ModalButton::Close => {
        self.nav.apply(Command::CloseModal);
        self.process_nav_events().await;
      }
      ModalButton::OpenYouTube => {
        if let Some(url) = self.player.current.as_ref().map(NowPlaying::url) {
          self.open_in_browser(&url);
        }
      }
      ModalButton::TogglePause => {
        if let Err(e) = self.player.toggle_pause().await {
          self.notifications.error(format!("Pause error: {}", e));
        }
      }
    }
  }

  /// Open a URL in the default browser, detached from the TUI.
  fn open_in_browser(&mut self, url: &str) {
    #[cfg(target_os = "macos")]
    let cmd = "open";
    #[cfg(not(target_os = "macos"))]
    let cmd = "xdg-open";
    match std::process::Command::new(cmd)
      .arg(url)
      .stdin(std::process::Stdio::null())
      .stdout(std::process::Stdio::null())
      .stderr(std::process::Stdio::null())
      .spawn()
    {
      Ok(mut child) => {
        // Reap the child in a background thread to avoid zombie processes.
        std::thread::spawn(move || {
          let _ = child.wait();
        });
      }
      Err(e) => {
        self.notifications.error(format!("Failed to open browser: {}", e));
      }
    }
  }

  // --- Pending task polling ---

  pub fn check_pending(&mut self) {
    if let Some(mut rx) = self.tasks.guide_rx.take() {
      match rx.try_recv() {
        Ok(result) => {
          self.status_message = None;
          match result {
            Ok(listings) => {
              let channels: Vec<Channel> = listings.iter().map(|(c, _)| c.clone()).collect();
              self.rows = guide::build_rows(listings);
              self.nav.set_grid(guide::grid_for(&self.rows));
              self.manage.set_channels(channels);
              info!(rows = self.rows.len(), "guide loaded");
            }
            Err(e) => {
              warn!(err = %e, "guide refresh failed");
              self.notifications.error(format!("Failed to load guide. {:#}", e));
            }
          }
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.guide_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.status_message = None;
          self.notifications.error("Guide refresh task failed.");
        }
      }
    }

    if let Some(mut rx) = self.tasks.channels_rx.take() {
      match rx.try_recv() {
        Ok(result) => match result {
          Ok(channels) => self.manage.set_channels(channels),
          Err(e) => self.notifications.error(format!("Failed to load channels. {:#}", e)),
        },
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.channels_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.notifications.error("Channel list task failed.");
        }
      }
    }

    if let Some(mut rx) = self.tasks.save_rx.take() {
      match rx.try_recv() {
        Ok(result) => {
          self.status_message = None;
          match result {
            Ok((_, updated)) => {
              let verb = if updated { "updated" } else { "added" };
              self.notifications.success(format!("Channel {} successfully!", verb));
              self.manage.mode = ManageMode::List;
              self.trigger_channels_reload();
            }
            Err(e) => {
              let verb = if self.manage.form.editing_id.is_some() { "update" } else { "add" };
              self.notifications.error(format!("Failed to {} channel. {:#}", verb, e));
            }
          }
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.save_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.status_message = None;
          self.notifications.error("Save task failed.");
        }
      }
    }

    if let Some(mut rx) = self.tasks.delete_rx.take() {
      match rx.try_recv() {
        Ok(result) => {
          self.status_message = None;
          match result {
            Ok(()) => {
              self.notifications.success("Channel deleted successfully!");
              self.trigger_channels_reload();
            }
            Err(e) => {
              self.notifications.error(format!("Failed to delete channel. {:#}", e));
            }
          }
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.delete_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.status_message = None;
          self.notifications.error("Delete task failed.");
        }
      }
    }
  }
}

/// One full guide fetch: channel records, then each channel's uploads
/// ordered per its display option. Channels fetch concurrently but keep
/// their order.
async fn fetch_guide(api: ApiClient) -> Result<GuideResult> {
  let channels = api.list_channels().await?;
  let listings = stream::iter(channels)
    .map(|channel| async move {
      let mut videos = youtube::list_videos_for_links(&channel.youtube_links, constants().listing_fetch_size).await;
      guide::order_videos(channel.display_option, &mut videos);
      (channel, videos)
    })
    .buffered(4)
    .collect()
    .await;
  Ok(listings)
}
