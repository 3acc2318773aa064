//! Assessment report view.
//!
//! The report is one scrollable document so nothing is cut off on small
//! terminals. Risk comes first, then insights, precautions and the
//! patient data summary.

use ratatui::{
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
    },
    Frame,
};

use crate::domain::{Assessment, RiskTier, Severity};
use crate::tui::styles::ClinicalTheme;

/// Render a completed assessment scrolled down by `scroll` rows.
///
/// Returns the offset actually used, clamped so the last row of the
/// report can reach the bottom of the viewport but not beyond.
pub fn render_report(f: &mut Frame, area: Rect, assessment: &Assessment, scroll: u16) -> u16 {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_report_header(f, chunks[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(ClinicalTheme::tier(assessment.tier));
    let inner = block.inner(chunks[1]);

    let body = Paragraph::new(report_lines(assessment)).wrap(Wrap { trim: false });
    let rows = body.line_count(inner.width);
    let max_scroll =
        u16::try_from(rows.saturating_sub(usize::from(inner.height))).unwrap_or(u16::MAX);
    let scroll = scroll.min(max_scroll);

    f.render_widget(body.block(block).scroll((scroll, 0)), chunks[1]);

    if max_scroll > 0 {
        let mut state =
            ScrollbarState::new(usize::from(max_scroll)).position(usize::from(scroll));
        f.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            chunks[1].inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut state,
        );
    }

    render_report_footer(f, chunks[2], max_scroll > 0);
    scroll
}

fn render_report_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ClinicalTheme::text()),
        Span::styled("Heart Disease Risk Prediction", ClinicalTheme::title()),
        Span::styled(" │ Assessment Report", ClinicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "✓ ",
        Severity::Warning => "! ",
        Severity::Error => "✗ ",
    }
}

fn heading(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(title, ClinicalTheme::subtitle()))
}

/// Report body, one entry per unwrapped row.
fn report_lines(assessment: &Assessment) -> Vec<Line<'static>> {
    let tier = assessment.tier;
    let diagnosis_style = if assessment.prediction.is_positive() {
        ClinicalTheme::danger()
    } else {
        ClinicalTheme::success()
    };

    let mut lines = vec![
        heading("Risk Prediction"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("  {}  ", tier.label()), ClinicalTheme::tier_badge(tier)),
        ]),
        Line::from(Span::styled(
            format!("  {}", tier.description()),
            ClinicalTheme::text_secondary(),
        )),
        Line::from(vec![
            Span::styled("  Risk Score: ", ClinicalTheme::text_secondary()),
            Span::styled(
                format!("{:.2}%", assessment.prediction.probability),
                ClinicalTheme::tier(tier).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("  Diagnosis: ", ClinicalTheme::text_secondary()),
            Span::styled(assessment.prediction.diagnosis_label(), diagnosis_style),
        ]),
        Line::from(""),
        heading("Insights Based on Inputs"),
    ];

    lines.extend(assessment.insights.iter().map(|insight| {
        let style = ClinicalTheme::severity(insight.severity);
        Line::from(vec![
            Span::styled(format!("  {}", severity_icon(insight.severity)), style),
            Span::styled(insight.message.clone(), style),
        ])
    }));

    lines.push(Line::from(""));
    lines.push(heading("Recommended Precautions"));

    let precautions = assessment.precautions;
    let style = ClinicalTheme::severity(precautions.severity);
    lines.extend(precautions.items.iter().enumerate().map(|(i, &item)| {
        let item_style = if i == 0 && tier == RiskTier::High {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        };
        Line::from(vec![
            Span::styled("  • ", style),
            Span::styled(item, item_style),
        ])
    }));

    lines.push(Line::from(""));
    lines.push(heading("Patient Data Summary"));
    lines.push(Line::from(Span::styled(
        format!("  {:<18}Value", "Parameter"),
        ClinicalTheme::text_muted(),
    )));
    lines.extend(
        assessment
            .record
            .summary_rows()
            .into_iter()
            .map(|(parameter, value)| {
                Line::from(vec![
                    Span::styled(format!("  {parameter:<18}"), ClinicalTheme::text_secondary()),
                    Span::styled(value, ClinicalTheme::text()),
                ])
            }),
    );

    lines
}

fn render_report_footer(f: &mut Frame, area: Rect, scrollable: bool) {
    let mut spans = Vec::new();
    if scrollable {
        spans.push(Span::styled("[↑↓/PgUp/PgDn] ", ClinicalTheme::key_hint()));
        spans.push(Span::styled("Scroll ", ClinicalTheme::key_desc()));
    }
    spans.extend([
        Span::styled("[Enter] ", ClinicalTheme::key_hint()),
        Span::styled("New Assessment ", ClinicalTheme::key_desc()),
        Span::styled("[Esc] ", ClinicalTheme::key_hint()),
        Span::styled("Back ", ClinicalTheme::key_desc()),
        Span::styled("[Ctrl+Q] ", ClinicalTheme::key_hint()),
        Span::styled("Quit", ClinicalTheme::key_desc()),
    ]);

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ClinicalTheme::border()),
    );

    f.render_widget(footer, area);
}
