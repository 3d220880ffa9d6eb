//! Gallery theme
//!
//! Colour palette and style helpers for poster cells and chrome.

use ratatui::style::{Color, Modifier, Style};

/// Dark cinema palette with an amber accent
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #101014
    pub const BACKGROUND: Color = Color::Rgb(0x10, 0x10, 0x14);

    /// Cell background: #1c1c22
    pub const CELL: Color = Color::Rgb(0x1c, 0x1c, 0x22);

    /// Primary: #e5a00d (amber)
    pub const PRIMARY: Color = Color::Rgb(0xe5, 0xa0, 0x0d);

    /// Text: #ececec
    pub const TEXT: Color = Color::Rgb(0xec, 0xec, 0xec);

    /// Dim: #6a6a78
    pub const DIM: Color = Color::Rgb(0x6a, 0x6a, 0x78);

    /// Watched overlay: #3ddc84
    pub const WATCHED: Color = Color::Rgb(0x3d, 0xdc, 0x84);

    /// Progress fill: #cc7b19
    pub const PROGRESS: Color = Color::Rgb(0xcc, 0x7b, 0x19);

    /// Unwatched badge: #4fa3ff
    pub const BADGE: Color = Color::Rgb(0x4f, 0xa3, 0xff);

    /// Error: #ff5c5c
    pub const ERROR: Color = Color::Rgb(0xff, 0x5c, 0x5c);

    /// Cell border
    pub const BORDER: Color = Color::Rgb(0x3a, 0x3a, 0x46);

    // ═══════════════════════════════════════════════════════════════════════
    // STYLES
    // ═══════════════════════════════════════════════════════════════════════

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND)
    }

    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Self::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    pub fn loading() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD | Modifier::ITALIC)
    }

    pub fn cell() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::CELL)
    }

    pub fn cell_border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    /// Border of the selected cell
    pub fn cell_selected() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn watched() -> Style {
        Style::default()
            .fg(Self::WATCHED)
            .add_modifier(Modifier::BOLD)
    }

    pub fn progress_bar() -> Style {
        Style::default().fg(Self::PROGRESS).bg(Self::CELL)
    }

    pub fn progress_bar_empty() -> Style {
        Style::default().fg(Self::DIM).bg(Self::CELL)
    }

    pub fn badge() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::BADGE)
            .add_modifier(Modifier::BOLD)
    }

    /// Trailer / subtitle strip
    pub fn info_strip() -> Style {
        Style::default().fg(Self::PRIMARY).bg(Self::CELL)
    }

    pub fn keybind() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    pub fn keybind_desc() -> Style {
        Style::default().fg(Self::DIM)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// COLOR UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

/// WCAG relative luminance
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    fn channel(c: u8) -> f64 {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * channel(r) + 0.7152 * channel(g) + 0.0722 * channel(b)
}

/// Contrast ratio between 1 (same colour) and 21 (black on white)
pub fn contrast_ratio(fg: Color, bg: Color) -> Option<f64> {
    let (Color::Rgb(fr, fg_, fb), Color::Rgb(br, bg_, bb)) = (fg, bg) else {
        return None;
    };
    let l1 = relative_luminance(fr, fg_, fb);
    let l2 = relative_luminance(br, bg_, bb);
    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
    Some((lighter + 0.05) / (darker + 0.05))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio(fg: Color, bg: Color) -> f64 {
        contrast_ratio(fg, bg).expect("theme colours are RGB")
    }

    #[test]
    fn test_contrast_bounds() {
        let black = Color::Rgb(0, 0, 0);
        let white = Color::Rgb(255, 255, 255);
        assert!((ratio(black, white) - 21.0).abs() < 0.1);
        assert!((ratio(white, white) - 1.0).abs() < 0.001);
        assert!(contrast_ratio(Color::Red, white).is_none());
    }

    #[test]
    fn test_text_readable_on_cells() {
        // WCAG AA for normal text
        assert!(ratio(Theme::TEXT, Theme::BACKGROUND) >= 4.5);
        assert!(ratio(Theme::TEXT, Theme::CELL) >= 4.5);
    }

    #[test]
    fn test_indicators_readable_on_cells() {
        // WCAG AA for large text
        for color in [Theme::PRIMARY, Theme::WATCHED, Theme::PROGRESS, Theme::ERROR] {
            assert!(ratio(color, Theme::CELL) >= 3.0, "{:?}", color);
        }
        assert!(ratio(Theme::BACKGROUND, Theme::BADGE) >= 3.0);
    }
}
