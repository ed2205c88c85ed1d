//! Color themes.
//!
//! A [`Theme`] resolves to a [`Palette`] that every widget reads its colors from.

use ratatui::style::Color;

/// Dark or light terminal theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Parse a stored preference; anything but "light" is dark.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("light") {
            Theme::Light
        } else {
            Theme::Dark
        }
    }

    /// Value written to the preferences file.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Colors for this theme.
    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                text: Color::White,
                muted: Color::Gray,
                dim: Color::DarkGray,
                accent: Color::Cyan,
                active: Color::Yellow,
                selection_bg: Color::Blue,
                selection_fg: Color::Yellow,
                good: Color::Green,
                merged: Color::Magenta,
                bad: Color::Red,
                series: [Color::Cyan, Color::Yellow, Color::Green],
            },
            Theme::Light => Palette {
                text: Color::Black,
                muted: Color::DarkGray,
                dim: Color::Gray,
                accent: Color::Blue,
                active: Color::Magenta,
                selection_bg: Color::LightBlue,
                selection_fg: Color::Black,
                good: Color::Green,
                merged: Color::Magenta,
                bad: Color::Red,
                series: [Color::Blue, Color::Magenta, Color::Green],
            },
        }
    }
}

/// Resolved colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: Color,
    pub muted: Color,
    pub dim: Color,
    pub accent: Color,
    /// Border and prompt color of the focused widget
    pub active: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub good: Color,
    pub merged: Color,
    pub bad: Color,
    /// One color per chart series: merge time, resolution time, efficiency
    pub series: [Color; 3],
}
