use ratatui::style::Color;

use super::ThemeName;

/// Colours shared by the list pane and the markdown renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub accent: Color,
    pub text: Color,
    pub muted: Color,
    pub separator: Color,
    pub heading: [Color; 3],
    pub code: Color,
    pub quote: Color,
    pub link: Color,
    pub highlight: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
}

impl Palette {
    pub fn for_theme(theme: &ThemeName) -> Self {
        match theme {
            ThemeName::Dark => Self {
                accent: Color::Cyan,
                text: Color::White,
                muted: Color::Gray,
                separator: Color::DarkGray,
                heading: [Color::LightCyan, Color::Cyan, Color::Blue],
                code: Color::LightGreen,
                quote: Color::Gray,
                link: Color::LightBlue,
                highlight: Color::Yellow,
                selection_bg: Color::Blue,
                selection_fg: Color::Black,
            },
            ThemeName::Light => Self {
                accent: Color::Blue,
                text: Color::Black,
                muted: Color::DarkGray,
                separator: Color::Gray,
                heading: [Color::Blue, Color::Magenta, Color::DarkGray],
                code: Color::Green,
                quote: Color::DarkGray,
                link: Color::Blue,
                highlight: Color::Red,
                selection_bg: Color::LightBlue,
                selection_fg: Color::Black,
            },
            ThemeName::HighContrast => Self {
                accent: Color::Yellow,
                text: Color::White,
                muted: Color::White,
                separator: Color::Yellow,
                heading: [Color::Yellow, Color::Yellow, Color::White],
                code: Color::LightGreen,
                quote: Color::White,
                link: Color::LightCyan,
                highlight: Color::LightMagenta,
                selection_bg: Color::Yellow,
                selection_fg: Color::Black,
            },
        }
    }

    pub fn heading(&self, level: usize) -> Color {
        self.heading[level.clamp(1, 3) - 1]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::for_theme(&ThemeName::default())
    }
}
