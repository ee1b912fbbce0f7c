//! Light and dark palettes.

use crossterm::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Colors used by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub title: Color,
    pub text: Color,
    pub muted: Color,
    pub alert: Color,
    pub error: Color,
    pub fahrenheit_badge: Color,
    pub celsius_badge: Color,
}

const LIGHT: Palette = Palette {
    title: Color::DarkBlue,
    text: Color::Black,
    muted: Color::DarkGrey,
    alert: Color::DarkRed,
    error: Color::Red,
    fahrenheit_badge: Color::Blue,
    celsius_badge: Color::DarkMagenta,
};

const DARK: Palette = Palette {
    title: Color::Cyan,
    text: Color::White,
    muted: Color::Grey,
    alert: Color::Red,
    error: Color::Red,
    fahrenheit_badge: Color::Blue,
    celsius_badge: Color::Magenta,
};

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn palette(self) -> &'static Palette {
        match self {
            Theme::Light => &LIGHT,
            Theme::Dark => &DARK,
        }
    }

    /// Header toggle glyph
    pub fn glyph(self) -> &'static str {
        match self {
            Theme::Light => "☀️",
            Theme::Dark => "🌙",
        }
    }

    /// Explicit preference first, then the terminal's `COLORFGBG` hint.
    pub fn detect(dark_mode: Option<bool>) -> Self {
        match dark_mode {
            Some(true) => Theme::Dark,
            Some(false) => Theme::Light,
            None => Self::from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref()),
        }
    }

    /// `COLORFGBG` is "fg;bg" (sometimes "fg;default;bg"); background
    /// indices 0-6 and 8 are dark.
    pub fn from_colorfgbg(value: Option<&str>) -> Self {
        let background = value
            .and_then(|v| v.rsplit(';').next())
            .and_then(|bg| bg.trim().parse::<u8>().ok());

        match background {
            Some(0..=6) | Some(8) => Theme::Dark,
            _ => Theme::Light,
        }
    }
}
