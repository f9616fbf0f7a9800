use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::app::App;
use crate::page::{SectionKind, SPEAKERS, SPONSORS, STATS};
use crate::theme::Theme;

use super::{clip, heading_line, px_to_cells, CardStackWidget};

pub struct PageWidget;

impl PageWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        frame.render_widget(Block::default().style(Style::default().bg(theme.page_bg)), area);

        let cell_height = app.config.ui.cell_height_px;
        let scroll = app.scroll_position();

        for section in app.layout().sections() {
            let top = px_to_cells(section.span.top - scroll, cell_height);
            let rows = px_to_cells(section.span.height, cell_height).clamp(0, i32::from(u16::MAX)) as u16;

            if section.kind == SectionKind::Exhibition {
                CardStackWidget::render(frame, area, app, top, rows);
                continue;
            }

            let Some((rect, _, skip_rows)) = clip(area, 0, top, area.width, rows) else {
                continue;
            };
            let lines = section_lines(section.kind, app, rows);
            let paragraph = Paragraph::new(lines)
                .alignment(Alignment::Center)
                .style(Style::default().bg(theme.page_bg))
                .scroll((skip_rows, 0));
            frame.render_widget(paragraph, rect);
        }
    }
}

/// Content of a plain section, vertically centred in `rows`
fn section_lines(kind: SectionKind, app: &App, rows: u16) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let mut body = Vec::new();

    if let Some(frames) = app.heading_frames(kind) {
        body.push(heading_line(&frames, theme));
        body.push(Line::default());
    }

    match kind {
        SectionKind::Hero => {
            body.push(accent_line("07-09 December 2027", theme));
            body.push(dim_line("Parc des Expositions - Hall 6 - Villepinte", theme));
            body.push(Line::default());
            body.push(dim_line("scroll ↓", theme));
        }
        SectionKind::Stats => {
            for (label, value, suffix) in STATS {
                body.push(accent_line(&format!("{}{}", group_thousands(value), suffix), theme));
                body.push(dim_line(label, theme));
                body.push(Line::default());
            }
        }
        SectionKind::Speakers => {
            for pair in SPEAKERS.chunks(2) {
                let row = match pair {
                    [left, right] => format!("{:>24}   {:<24}", left, right),
                    [only] => only.to_string(),
                    _ => String::new(),
                };
                body.push(Line::from(Span::styled(row, Style::default().fg(theme.fg))));
            }
        }
        SectionKind::Sponsors => {
            body.push(Line::from(Span::styled(
                SPONSORS.join("   ·   "),
                Style::default().fg(theme.fg_dim),
            )));
        }
        SectionKind::Footer => {
            body.push(accent_line("View Our Program", theme));
            body.push(Line::default());
            body.push(dim_line("Newsletter   ·   Contact Us", theme));
            body.push(dim_line("Find us on social networks", theme));
        }
        SectionKind::Exhibition => {}
    }

    let padding = usize::from(rows).saturating_sub(body.len()) / 2;
    let mut lines = vec![Line::default(); padding];
    lines.extend(body);
    lines
}

fn accent_line(text: &str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
    ))
}

fn dim_line(text: &str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(text.to_string(), Style::default().fg(theme.fg_dim)))
}

/// 36000 -> "36,000"
fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
