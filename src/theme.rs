use ratatui::style::Color;

/// A named color palette. Cycled with Ctrl+T and persisted in the prefs file.
pub struct Theme {
  pub name: &'static str,
  pub bg: Color,
  pub fg: Color,
  pub accent: Color,
  pub muted: Color,
  pub border: Color,
  pub status: Color,
  pub error: Color,
  pub success: Color,
  pub highlight_fg: Color,
  pub highlight_bg: Color,
  pub stripe_bg: Color,
  pub key_fg: Color,
  pub key_bg: Color,
}

pub static THEMES: &[Theme] = &[
  Theme {
    name: "midnight",
    bg: Color::Rgb(16, 18, 28),
    fg: Color::Rgb(205, 210, 222),
    accent: Color::Rgb(122, 162, 247),
    muted: Color::Rgb(100, 106, 128),
    border: Color::Rgb(54, 58, 79),
    status: Color::Rgb(158, 206, 106),
    error: Color::Rgb(247, 118, 142),
    success: Color::Rgb(158, 206, 106),
    highlight_fg: Color::Rgb(16, 18, 28),
    highlight_bg: Color::Rgb(122, 162, 247),
    stripe_bg: Color::Rgb(22, 25, 37),
    key_fg: Color::Rgb(16, 18, 28),
    key_bg: Color::Rgb(100, 106, 128),
  },
  Theme {
    name: "broadcast",
    bg: Color::Rgb(10, 26, 26),
    fg: Color::Rgb(196, 222, 210),
    accent: Color::Rgb(255, 184, 108),
    muted: Color::Rgb(88, 120, 110),
    border: Color::Rgb(40, 70, 64),
    status: Color::Rgb(139, 213, 202),
    error: Color::Rgb(255, 121, 121),
    success: Color::Rgb(139, 213, 202),
    highlight_fg: Color::Rgb(10, 26, 26),
    highlight_bg: Color::Rgb(255, 184, 108),
    stripe_bg: Color::Rgb(14, 33, 33),
    key_fg: Color::Rgb(10, 26, 26),
    key_bg: Color::Rgb(88, 120, 110),
  },
  Theme {
    name: "daylight",
    bg: Color::Rgb(245, 243, 238),
    fg: Color::Rgb(48, 46, 42),
    accent: Color::Rgb(191, 72, 60),
    muted: Color::Rgb(142, 136, 126),
    border: Color::Rgb(205, 198, 186),
    status: Color::Rgb(74, 118, 86),
    error: Color::Rgb(176, 48, 48),
    success: Color::Rgb(74, 118, 86),
    highlight_fg: Color::Rgb(245, 243, 238),
    highlight_bg: Color::Rgb(191, 72, 60),
    stripe_bg: Color::Rgb(236, 233, 226),
    key_fg: Color::Rgb(245, 243, 238),
    key_bg: Color::Rgb(142, 136, 126),
  },
];
