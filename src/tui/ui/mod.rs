//! UI module: View components for the TUI.

pub mod patient;
pub mod report;

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::report::DISCLAIMER;
use crate::tui::styles::ClinicalTheme;

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![Line::from(vec![Span::styled(
        DISCLAIMER,
        ClinicalTheme::text_muted(),
    )])];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(ClinicalTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}

/// Modal error panel drawn over the current screen.
pub fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let width = area.width.saturating_sub(8).min(80);
    let height = 9.min(area.height);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Assessment failed", ClinicalTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, ClinicalTheme::text())),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Enter/Esc] ", ClinicalTheme::key_hint()),
            Span::styled("Back to Form", ClinicalTheme::key_desc()),
        ]),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(ClinicalTheme::danger()),
    );

    f.render_widget(Clear, popup);
    f.render_widget(content, popup);
}
