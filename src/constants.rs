//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!` so it's always available —
//! no runtime file I/O. Parsed once on first access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  // Guide layout
  pub videos_per_channel: usize,
  /// How many uploads to pull per channel before ordering/trimming.
  pub listing_fetch_size: usize,
  pub window_minutes: u32,
  pub slot_minutes: u32,
  pub marker_count: u32,

  // Notifications
  pub toast_ttl_secs: u64,

  // Management API
  pub default_api_url: String,

  // yt-dlp
  pub listing_format: String,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}
