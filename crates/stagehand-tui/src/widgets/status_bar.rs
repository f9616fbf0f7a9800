use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let snapshot = app.capture().snapshot();

        let state_text = format!(" {} ", snapshot.state.to_uppercase());
        let status_text = format!(
            " progress {:>3.0}% | D {:.0}px | scroll {:.0}/{:.0} ",
            snapshot.progress.value() * 100.0,
            snapshot.move_distance,
            app.scroll_position(),
            app.scroll_limit(),
        );

        let help_hint = " q:quit j/k:scroll drag:touch g/G:top/bottom ";
        let used = state_text.chars().count() + status_text.chars().count() + help_hint.len();
        let padding_len = usize::from(area.width).saturating_sub(used);

        let line = Line::from(vec![
            Span::styled(
                state_text,
                Style::default()
                    .fg(theme.page_bg)
                    .bg(theme.state_color(snapshot.state))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(status_text, Style::default().fg(theme.fg).bg(theme.bar_bg)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bar_bg)),
            Span::styled(help_hint, Style::default().fg(theme.fg_dim).bg(theme.bar_bg)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
