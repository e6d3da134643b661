use anyhow::{Context, Result, anyhow};
use std::process::Stdio;
use tokio::process::Command;

use crate::constants::constants;

/// A single video from a channel's uploads listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEntry {
  pub video_id: String,
  pub title: String,
  pub description: Option<String>,
  /// `YYYY-MM-DD`, when yt-dlp reports one.
  pub upload_date: Option<String>,
  pub view_count: Option<u64>,
}

/// Parse a single tab-separated yt-dlp output line into a VideoEntry.
/// Expected format: `title\tid[\tupload_date\tview_count]`
fn parse_listing_line(line: &str) -> Option<VideoEntry> {
  let parts: Vec<&str> = line.split('\t').collect();
  if parts.len() < 2 {
    return None;
  }
  let title = parts[0].trim().to_string();
  let video_id = parts[1].trim().to_string();
  if video_id.is_empty() {
    return None;
  }
  let opt = |idx: usize| -> Option<String> {
    parts.get(idx).map(|s| s.trim()).filter(|s| !s.is_empty() && *s != "NA").map(|s| s.to_string())
  };
  let upload_date = opt(2);
  let view_count = opt(3).and_then(|s| s.parse().ok());
  Some(VideoEntry { video_id, title, description: None, upload_date, view_count })
}

/// Parse yt-dlp stdout lines into a VideoEntry vec.
fn parse_listing_output(stdout: &str) -> Vec<VideoEntry> {
  stdout.lines().map(str::trim).filter(|l| !l.is_empty()).filter_map(parse_listing_line).collect()
}

/// Canonicalise a stored channel link into a URL whose uploads yt-dlp can
/// list. Accepts the forms the management UI allows: `/channel/ID`,
/// `/@handle`, `/c/NAME`, `/user/NAME`, a bare `@handle`, or a short
/// `youtu.be` link (returned as-is).
pub fn canonical_channel_url(link: &str) -> Option<String> {
  let trimmed = link.trim().trim_end_matches('/');
  if trimmed.is_empty() {
    return None;
  }

  // Bare @handle (e.g. "@TwoSetViolin")
  if trimmed.starts_with('@') && !trimmed.contains(' ') && trimmed.len() > 1 {
    return Some(format!("https://www.youtube.com/{}/videos", trimmed));
  }

  if !trimmed.contains("youtube.com/") && !trimmed.contains("youtu.be/") {
    return None;
  }

  let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
    trimmed.to_string()
  } else {
    format!("https://{}", trimmed)
  };

  if with_scheme.contains("youtu.be/") {
    return Some(with_scheme);
  }

  // Channel-shaped paths get /videos appended so yt-dlp lists the uploads.
  let channel_path = ["youtube.com/channel/", "youtube.com/@", "youtube.com/c/", "youtube.com/user/"]
    .iter()
    .any(|p| with_scheme.contains(p));
  if channel_path {
    if with_scheme.ends_with("/videos") {
      return Some(with_scheme);
    }
    return Some(format!("{}/videos", with_scheme));
  }

  Some(with_scheme)
}

/// Fetch the most recent uploads for a channel using --flat-playlist for
/// speed. `count` bounds how many entries come back.
pub async fn list_channel_videos(channel_url: &str, count: usize) -> Result<Vec<VideoEntry>> {
  let playlist_range = format!("1:{}", count);

  let output = Command::new("yt-dlp")
    .args([
      "--flat-playlist",
      "--print",
      &constants().listing_format,
      "--playlist-items",
      &playlist_range,
      "--no-warnings",
      "--ignore-errors",
      "--",
      channel_url,
    ])
    .stdin(Stdio::null())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .output()
    .await
    .map_err(|e| {
      if e.kind() == std::io::ErrorKind::NotFound {
        anyhow!("yt-dlp not found. Install it with: brew install yt-dlp (macOS) or pip install yt-dlp")
      } else {
        anyhow!(e).context("Failed to execute yt-dlp channel listing")
      }
    })?;

  if !output.status.success() {
    return Err(anyhow!("yt-dlp channel listing failed: {}", String::from_utf8_lossy(&output.stderr)));
  }

  let stdout_str = String::from_utf8(output.stdout).context("yt-dlp output non-UTF8")?;
  Ok(parse_listing_output(&stdout_str))
}

/// Fetch uploads across all of a channel record's links, first link first.
/// Links that fail to canonicalise or list are skipped; an empty result is
/// not an error (the row just renders empty).
pub async fn list_videos_for_links(links: &[String], count: usize) -> Vec<VideoEntry> {
  let mut videos = Vec::new();
  for link in links {
    let Some(url) = canonical_channel_url(link) else { continue };
    match list_channel_videos(&url, count).await {
      Ok(mut entries) => videos.append(&mut entries),
      Err(e) => tracing::warn!(url = %url, err = %e, "channel listing failed, skipping link"),
    }
  }
  videos
}

/// Watch-page URL for a video id.
pub fn watch_url(video_id: &str) -> String {
  format!("https://www.youtube.com/watch?v={}", video_id)
}
