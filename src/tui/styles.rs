//! Clinical color palette and styles.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::{RiskTier, Severity};

/// Color palette for the dashboard.
pub struct ClinicalTheme;

impl ClinicalTheme {
    /// Deep teal, primary accent
    pub const PRIMARY: Color = Color::Rgb(13, 148, 136); // #0D9488

    /// Lighter teal for highlights
    pub const PRIMARY_LIGHT: Color = Color::Rgb(45, 212, 191); // #2DD4BF

    /// Light slate for borders
    pub const BORDER: Color = Color::Rgb(148, 163, 184); // #94A3B8

    pub const SUCCESS: Color = Color::Rgb(46, 204, 113); // #2ECC71
    pub const WARNING: Color = Color::Rgb(241, 196, 15); // #F1C40F
    pub const DANGER: Color = Color::Rgb(231, 76, 60); // #E74C3C
    pub const INFO: Color = Color::Rgb(59, 130, 246); // #3B82F6

    /// Badge text on colored background
    pub const BADGE_TEXT: Color = Color::Rgb(255, 255, 255);

    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252); // #F8FAFC
    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // #94A3B8
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // #64748B

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    #[must_use]
    pub fn info() -> Style {
        Style::default().fg(Self::INFO)
    }

    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn cursor() -> Style {
        Style::default().fg(Self::PRIMARY_LIGHT)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Foreground style for a risk tier.
    #[must_use]
    pub fn tier(tier: RiskTier) -> Style {
        let (r, g, b) = tier.color();
        Style::default().fg(Color::Rgb(r, g, b))
    }

    /// Solid badge for a risk tier.
    #[must_use]
    pub fn tier_badge(tier: RiskTier) -> Style {
        let (r, g, b) = tier.color();
        Style::default()
            .fg(Self::BADGE_TEXT)
            .bg(Color::Rgb(r, g, b))
            .add_modifier(Modifier::BOLD)
    }

    /// Style for insight and precaution severities.
    #[must_use]
    pub fn severity(severity: Severity) -> Style {
        match severity {
            Severity::Info => Self::success(),
            Severity::Warning => Self::warning(),
            Severity::Error => Self::danger(),
        }
    }
}
