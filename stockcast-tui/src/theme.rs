//! Parrot/neon theme tokens for the StockCast TUI.
//!
//! # Color Palette
//! - **Accent**: Electric cyan (focus, selected rows, predicted line)
//! - **Positive**: Neon green (positive sentiment, close line)
//! - **Negative**: Hot pink (negative sentiment, errors)
//! - **Warning**: Neon orange (pending runs, bounds)
//! - **Neutral**: Cool purple (history points, secondary info)
//! - **Muted**: Steel blue (hints, axis labels)

use ratatui::style::{Color, Modifier, Style};

use stockcast_core::domain::Direction;

pub const BACKGROUND: Color = Color::Rgb(18, 18, 20);
pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT_SECONDARY: Color = Color::Rgb(170, 170, 170);

/// Palette as a value, for widgets that take colors rather than styles.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub neutral: Color,
    pub muted: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    pub fn parrot_neon() -> Self {
        Self {
            background: BACKGROUND,
            accent: ACCENT,
            positive: POSITIVE,
            negative: NEGATIVE,
            warning: WARNING,
            neutral: NEUTRAL,
            muted: MUTED,
            text_primary: Color::White,
            text_secondary: TEXT_SECONDARY,
        }
    }

    /// Green for an upward forecast, pink otherwise.
    pub fn sentiment_color(&self, direction: Direction) -> Color {
        match direction {
            Direction::Positive => self.positive,
            Direction::Negative => self.negative,
        }
    }

    /// Color for a relative change (fraction).
    pub fn change_color(&self, change: f64) -> Color {
        if change > 0.0 {
            self.positive
        } else if change < 0.0 {
            self.negative
        } else {
            self.text_secondary
        }
    }
}

// ─── Style shorthands ───────────────────────────────────────────────

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(Color::White)
}

pub fn sentiment(direction: Direction) -> Style {
    Style::default()
        .fg(Theme::default().sentiment_color(direction))
        .add_modifier(Modifier::BOLD)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

/// Highlight for the row under the cursor.
pub fn cursor() -> Style {
    accent().add_modifier(Modifier::REVERSED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_creation() {
        let theme = Theme::default();
        assert_eq!(theme.background, Color::Rgb(18, 18, 20));
        assert_eq!(theme.accent, Color::Rgb(0, 255, 255));
    }

    #[test]
    fn test_sentiment_color() {
        let theme = Theme::default();
        assert_eq!(theme.sentiment_color(Direction::Positive), theme.positive);
        assert_eq!(theme.sentiment_color(Direction::Negative), theme.negative);
    }

    #[test]
    fn test_change_color() {
        let theme = Theme::default();
        assert_eq!(theme.change_color(0.12), theme.positive);
        assert_eq!(theme.change_color(-0.03), theme.negative);
        assert_eq!(theme.change_color(0.0), theme.text_secondary);
    }

    #[test]
    fn test_panel_styles() {
        assert_eq!(panel_border(true), accent());
        assert_eq!(panel_border(false), muted());
        assert!(panel_title(true).add_modifier.contains(Modifier::BOLD));
    }
}
