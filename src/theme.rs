// ABOUTME: Light/dark theme value and the palette derived from it.
// ABOUTME: The theme is owned by the app state and handed to rendering explicitly.

use std::fmt;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Color scheme selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                fg: Color::White,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                highlight: Color::Magenta,
                gauge: Color::White,
                error: Color::Red,
                success: Color::Green,
                bg: Color::Reset,
            },
            Theme::Light => Palette {
                fg: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                highlight: Color::Magenta,
                gauge: Color::Blue,
                error: Color::Red,
                success: Color::Green,
                bg: Color::White,
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

/// Resolved colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub fg: Color,
    pub muted: Color,
    pub accent: Color,
    pub highlight: Color,
    pub gauge: Color,
    pub error: Color,
    pub success: Color,
    pub bg: Color,
}

/// Bar colors for the language chart, cycled by rank.
pub const CHART_COLORS: [Color; 10] = [
    Color::Rgb(0xFF, 0x6B, 0x6B),
    Color::Rgb(0x4E, 0xCD, 0xC4),
    Color::Rgb(0x45, 0xB7, 0xD1),
    Color::Rgb(0xFF, 0xA0, 0x7A),
    Color::Rgb(0x98, 0xD8, 0xC8),
    Color::Rgb(0xF7, 0xFF, 0xF7),
    Color::Rgb(0xFF, 0x9F, 0xF3),
    Color::Rgb(0xFA, 0xF3, 0xDD),
    Color::Rgb(0xC7, 0xCE, 0xEA),
    Color::Rgb(0xE2, 0xF0, 0xCB),
];

/// Chart color for the bar at `index`.
pub fn chart_color(index: usize) -> Color {
    CHART_COLORS[index % CHART_COLORS.len()]
}
