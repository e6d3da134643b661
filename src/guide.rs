//! Guide read model: channels, their scheduled programs, and the clock
//! arithmetic behind the time header (12-hour display, half-hour slots,
//! playhead position).

use chrono::{NaiveTime, Timelike};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::constants::constants;
use crate::nav::{Cell, Grid};
use crate::youtube::VideoEntry;

// --- Channels ---

/// How a channel's fetched videos are ordered in its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayOption {
  Random,
  Popular,
  New,
}

impl DisplayOption {
  pub const ALL: [DisplayOption; 3] = [DisplayOption::Random, DisplayOption::Popular, DisplayOption::New];

  pub fn label(self) -> &'static str {
    match self {
      DisplayOption::Random => "random",
      DisplayOption::Popular => "popular",
      DisplayOption::New => "new",
    }
  }
}

/// A channel record as served by the management API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
  /// Server-assigned identifier. Empty on create; the server fills it in.
  #[serde(default)]
  pub id: String,
  #[serde(rename = "stationId")]
  pub station_id: u32,
  pub name: String,
  #[serde(rename = "displayOption")]
  pub display_option: DisplayOption,
  #[serde(rename = "youtubeLinks")]
  pub youtube_links: Vec<String>,
}

/// One guide row: a channel plus its program cells for the current window.
#[derive(Debug, Clone)]
pub struct GuideRow {
  pub channel: Channel,
  pub cells: Vec<Cell>,
}

/// Order `videos` per the channel's display option and trim to the per-row
/// limit. Popular sorts by view count, new by upload date, random shuffles.
pub fn order_videos(option: DisplayOption, videos: &mut Vec<VideoEntry>) {
  match option {
    DisplayOption::Popular => videos.sort_by(|a, b| b.view_count.unwrap_or(0).cmp(&a.view_count.unwrap_or(0))),
    DisplayOption::New => videos.sort_by(|a, b| b.upload_date.cmp(&a.upload_date)),
    DisplayOption::Random => videos.shuffle(&mut rand::thread_rng()),
  }
  videos.truncate(constants().videos_per_channel);
}

/// Build guide rows from fetched listings, one row per channel ordered by
/// station id. The first cell of each non-empty row is the program airing
/// now and is the only playable one.
pub fn build_rows(mut listings: Vec<(Channel, Vec<VideoEntry>)>) -> Vec<GuideRow> {
  listings.sort_by_key(|(channel, _)| channel.station_id);
  listings
    .into_iter()
    .map(|(channel, videos)| {
      let cells = videos
        .into_iter()
        .enumerate()
        .map(|(i, video)| Cell {
          video_id: Some(video.video_id),
          title: video.title,
          description: video.description,
          is_current: i == 0,
        })
        .collect();
      GuideRow { channel, cells }
    })
    .collect()
}

/// Project guide rows into the navigation grid snapshot.
pub fn grid_for(rows: &[GuideRow]) -> Grid {
  Grid::new(rows.iter().map(|row| row.cells.clone()).collect())
}

// --- Clock ---

/// Format a time of day the way the guide header does: `7:05 PM`, with
/// midnight and noon shown as 12.
pub fn format_time(time: NaiveTime) -> String {
  let hour = time.hour() % 12;
  let display_hour = if hour == 0 { 12 } else { hour };
  let ampm = if time.hour() >= 12 { "PM" } else { "AM" };
  format!("{}:{:02} {}", display_hour, time.minute(), ampm)
}

/// Round down to the containing half-hour slot.
pub fn rounded_to_half_hour(time: NaiveTime) -> NaiveTime {
  let minute = if time.minute() < 30 { 0 } else { 30 };
  // Safety: hour/minute come from a valid NaiveTime, minute is 0 or 30.
  NaiveTime::from_hms_opt(time.hour(), minute, 0).unwrap_or(time)
}

/// Labels for the current half-hour slot and the two that follow.
pub fn time_markers(now: NaiveTime) -> Vec<String> {
  let slot = chrono::Duration::minutes(constants().slot_minutes as i64);
  let start = rounded_to_half_hour(now);
  (0..constants().marker_count).map(|i| format_time(start + slot * i as i32)).collect()
}

/// Playhead position as a percentage of the guide's time window.
pub fn playhead_percent(now: NaiveTime) -> f64 {
  let window = constants().window_minutes as f64;
  let minutes_since_midnight = (now.hour() * 60 + now.minute()) as f64;
  (minutes_since_midnight % window) / window * 100.0
}

#[cfg(test)]
mod tests {
  use super::*;

  fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
  }

  fn video(id: &str, views: u64, date: &str) -> VideoEntry {
    VideoEntry {
      video_id: id.to_string(),
      title: id.to_string(),
      description: None,
      upload_date: Some(date.to_string()),
      view_count: Some(views),
    }
  }

  // --- format_time ---

  #[test]
  fn format_time_afternoon() {
    assert_eq!(format_time(t(19, 5)), "7:05 PM");
    assert_eq!(format_time(t(12, 30)), "12:30 PM");
  }

  #[test]
  fn format_time_morning_and_midnight() {
    assert_eq!(format_time(t(9, 0)), "9:00 AM");
    assert_eq!(format_time(t(0, 15)), "12:15 AM");
  }

  // --- rounding / markers / playhead ---

  #[test]
  fn rounds_down_to_half_hour() {
    assert_eq!(rounded_to_half_hour(t(10, 29)), t(10, 0));
    assert_eq!(rounded_to_half_hour(t(10, 30)), t(10, 30));
    assert_eq!(rounded_to_half_hour(t(10, 59)), t(10, 30));
  }

  #[test]
  fn three_markers_step_by_half_hour() {
    assert_eq!(time_markers(t(10, 42)), vec!["10:30 AM", "11:00 AM", "11:30 AM"]);
  }

  #[test]
  fn markers_cross_noon() {
    assert_eq!(time_markers(t(11, 31)), vec!["11:30 AM", "12:00 PM", "12:30 PM"]);
  }

  #[test]
  fn playhead_wraps_within_window() {
    assert_eq!(playhead_percent(t(0, 0)), 0.0);
    assert_eq!(playhead_percent(t(0, 45)), 50.0);
    // 90 minutes past midnight wraps back to the window start.
    assert_eq!(playhead_percent(t(1, 30)), 0.0);
  }

  // --- ordering ---

  #[test]
  fn popular_orders_by_view_count_desc() {
    let mut videos = vec![video("a", 10, "2024-01-01"), video("b", 300, "2024-01-02"), video("c", 20, "2024-01-03")];
    order_videos(DisplayOption::Popular, &mut videos);
    let ids: Vec<&str> = videos.iter().map(|v| v.video_id.as_str()).collect();
    assert_eq!(ids, vec!["b", "c", "a"]);
  }

  #[test]
  fn new_orders_by_upload_date_desc() {
    let mut videos = vec![video("a", 10, "2024-01-01"), video("b", 300, "2023-06-01"), video("c", 20, "2024-03-01")];
    order_videos(DisplayOption::New, &mut videos);
    let ids: Vec<&str> = videos.iter().map(|v| v.video_id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
  }

  #[test]
  fn ordering_trims_to_row_limit() {
    let mut videos: Vec<VideoEntry> = (0..10).map(|i| video(&format!("v{}", i), i, "2024-01-01")).collect();
    order_videos(DisplayOption::Popular, &mut videos);
    assert_eq!(videos.len(), constants().videos_per_channel);
  }

  // --- rows ---

  fn channel(station_id: u32, name: &str) -> Channel {
    Channel {
      id: station_id.to_string(),
      station_id,
      name: name.to_string(),
      display_option: DisplayOption::New,
      youtube_links: vec!["https://www.youtube.com/@example".to_string()],
    }
  }

  #[test]
  fn rows_ordered_by_station_id_with_current_first_cell() {
    let rows = build_rows(vec![
      (channel(203, "B"), vec![video("b1", 0, "2024-01-01"), video("b2", 0, "2024-01-02")]),
      (channel(201, "A"), vec![video("a1", 0, "2024-01-01")]),
    ]);
    assert_eq!(rows[0].channel.name, "A");
    assert_eq!(rows[1].channel.name, "B");
    assert!(rows[1].cells[0].is_current);
    assert!(!rows[1].cells[1].is_current);
  }

  #[test]
  fn grid_projection_keeps_ragged_shape() {
    let rows = build_rows(vec![
      (channel(201, "A"), vec![video("a1", 0, "2024-01-01")]),
      (channel(202, "B"), Vec::new()),
    ]);
    let grid = grid_for(&rows);
    assert_eq!(grid.row_count(), 2);
    assert_eq!(grid.row_len(0), 1);
    assert_eq!(grid.row_len(1), 0);
  }

  #[test]
  fn channel_json_round_trip_uses_api_field_names() {
    let json = r#"{"id":"1","stationId":201,"name":"News 24","displayOption":"popular",
                   "youtubeLinks":["https://www.youtube.com/@news"]}"#;
    let channel: Channel = serde_json::from_str(json).unwrap();
    assert_eq!(channel.station_id, 201);
    assert_eq!(channel.display_option, DisplayOption::Popular);
    let out = serde_json::to_string(&channel).unwrap();
    assert!(out.contains("\"stationId\":201"));
    assert!(out.contains("\"displayOption\":\"popular\""));
  }
}
