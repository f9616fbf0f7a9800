use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use stagehand_core::reveal::GlyphFrame;

use crate::theme::Theme;

/// Glyphs fainter than this are not drawn at all
const FAINT_OPACITY: f64 = 0.15;

/// Render a revealing heading. Legible glyphs are drawn bold, glyphs on
/// their way in are drawn dim, the rest are blank.
pub fn heading_line(frames: &[(char, GlyphFrame)], theme: &Theme) -> Line<'static> {
    let spans: Vec<Span<'static>> = frames
        .iter()
        .map(|&(ch, frame)| {
            if frame.is_legible() {
                Span::styled(
                    ch.to_string(),
                    Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
                )
            } else if frame.opacity > FAINT_OPACITY && frame.offset_x.abs() < 1.0 {
                Span::styled(ch.to_string(), Style::default().fg(theme.grey))
            } else {
                Span::raw(" ")
            }
        })
        .collect();
    Line::from(spans)
}
