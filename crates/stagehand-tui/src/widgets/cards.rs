use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::page::{Card, CARDS};
use crate::theme::Theme;

use super::{clip, px_to_cells};

const MIN_CARD_WIDTH: u16 = 24;
const MIN_CARD_HEIGHT: u16 = 6;

/// The pinned stack of exhibition cards. The top two cards slide out
/// sideways as the gesture progresses, uncovering the current edition.
pub struct CardStackWidget;

impl CardStackWidget {
    /// Render the section whose top edge is `top` rows below `area.y`
    pub fn render(frame: &mut Frame, area: Rect, app: &App, top: i32, rows: u16) {
        let theme = &app.theme;
        if clip(area, 0, top, area.width, rows).is_none() {
            return;
        }

        let width = (area.width * 3 / 5).max(MIN_CARD_WIDTH).min(area.width);
        let height = (rows * 3 / 5).max(MIN_CARD_HEIGHT).min(rows);
        let base_x = i32::from((area.width - width) / 2);
        let base_y = top + i32::from((rows - height) / 2);

        if let Some((rect, _, _)) = clip(area, 0, top + 1, area.width, 1) {
            let caption = Paragraph::new(Line::from(Span::styled(
                "PAST EDITIONS",
                Style::default().fg(theme.fg_dim),
            )))
            .alignment(Alignment::Center);
            frame.render_widget(caption, rect);
        }

        // Bottom of the stack first so the top card is drawn last
        for (index, card) in CARDS.iter().enumerate().rev() {
            let dx = px_to_cells(app.card_offset_px(index), app.config.ui.cell_width_px);
            let dy = tilt_rows(card);
            let Some((rect, skip_x, skip_y)) = clip(area, base_x + dx, base_y + dy, width, height)
            else {
                continue;
            };
            frame.render_widget(Clear, rect);
            let paragraph = Paragraph::new(card_lines(card, index, theme))
                .style(Style::default().bg(theme.card_color(index)))
                .scroll((skip_y, skip_x));
            frame.render_widget(paragraph, rect);
        }

        let bar_y = top + i32::from(rows) - 2;
        if let Some((rect, _, _)) = clip(area, base_x, bar_y, width, 1) {
            let progress = app.capture().progress().value();
            frame.render_widget(Paragraph::new(progress_line(progress, width, theme)), rect);
        }
    }
}

/// Resting tilt drawn as a one-row step
fn tilt_rows(card: &Card) -> i32 {
    (card.rotation / 2.0).round() as i32
}

fn card_lines(card: &Card, index: usize, theme: &Theme) -> Vec<Line<'static>> {
    vec![
        Line::default(),
        Line::from(Span::styled(
            format!("  {}", card.year),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            format!("  {}", card.title.to_uppercase()),
            Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("  {}", card.caption),
            Style::default().fg(theme.fg_dim),
        )),
        Line::default(),
        Line::from(Span::styled(
            format!("  {}/{}", index + 1, CARDS.len()),
            Style::default().fg(theme.grey),
        )),
    ]
}

fn progress_line(progress: f64, width: u16, theme: &Theme) -> Line<'static> {
    let width = usize::from(width);
    let filled = ((progress.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    Line::from(vec![
        Span::styled("━".repeat(filled), Style::default().fg(theme.accent)),
        Span::styled("─".repeat(width - filled), Style::default().fg(theme.grey)),
    ])
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use ratatui::{backend::TestBackend, Terminal};
    use stagehand_core::AppConfig;

    use super::*;

    fn screen(app: &App, top: i32, rows: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal
            .draw(|frame| CardStackWidget::render(frame, frame.area(), app, top, rows))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_top_card_covers_the_stack() {
        let app = App::new(AppConfig::default(), Theme::default(), 100, 40, Instant::now());
        let text = screen(&app, 0, 40);
        assert!(text.contains("2021"));
        assert!(!text.contains("2025"));
        assert!(text.contains("PAST EDITIONS"));
    }

    #[test]
    fn test_off_screen_section_draws_nothing() {
        let app = App::new(AppConfig::default(), Theme::default(), 100, 40, Instant::now());
        let text = screen(&app, 40, 40);
        assert!(text.trim().is_empty());
    }

    #[test]
    fn test_progress_line_fill() {
        let theme = Theme::default();
        let line = progress_line(0.5, 10, &theme);
        assert_eq!(line.spans[0].content.chars().count(), 5);
        assert_eq!(line.spans[1].content.chars().count(), 5);
        let full = progress_line(1.4, 10, &theme);
        assert_eq!(full.spans[1].content.chars().count(), 0);
    }
}
