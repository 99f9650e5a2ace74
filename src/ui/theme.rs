//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::SeverityTier;

/// Color and style theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for titles and active elements.
    pub highlight: Color,
    pub healthy: Color,
    pub weak: Color,
    pub critical: Color,
    /// Unlit part of the gauge dial and chart axes.
    pub muted: Color,
    pub border: Color,
    /// Needle and tooltip foreground.
    pub needle: Color,
    pub header: Style,
    pub border_type: BorderType,
}

impl Theme {
    /// Dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            healthy: Color::Green,
            weak: Color::Yellow,
            critical: Color::Red,
            muted: Color::DarkGray,
            border: Color::Gray,
            needle: Color::White,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            healthy: Color::Green,
            weak: Color::Yellow,
            critical: Color::Red,
            muted: Color::Gray,
            border: Color::DarkGray,
            needle: Color::Black,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Pick light or dark from the terminal's background luminance.
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn severity_color(&self, tier: SeverityTier) -> Color {
        match tier {
            SeverityTier::Healthy => self.healthy,
            SeverityTier::Weak => self.weak,
            SeverityTier::Critical => self.critical,
        }
    }

    /// Text style for a severity tier. Critical is bold.
    pub fn severity_style(&self, tier: SeverityTier) -> Style {
        let style = Style::default().fg(self.severity_color(tier));
        match tier {
            SeverityTier::Critical => style.add_modifier(Modifier::BOLD),
            _ => style,
        }
    }
}
