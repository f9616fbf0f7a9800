mod cards;
mod heading;
mod page;
mod status_bar;

pub use cards::CardStackWidget;
pub use heading::heading_line;
pub use page::PageWidget;
pub use status_bar::StatusBarWidget;

use ratatui::layout::Rect;

/// Part of a `width` x `height` box at (`x`, `y`) relative to `area` that
/// is on screen, plus how many columns and rows were cut off its top-left.
pub(crate) fn clip(area: Rect, x: i32, y: i32, width: u16, height: u16) -> Option<(Rect, u16, u16)> {
    let left = x.max(0);
    let top = y.max(0);
    let right = (x + i32::from(width)).min(i32::from(area.width));
    let bottom = (y + i32::from(height)).min(i32::from(area.height));
    if right <= left || bottom <= top {
        return None;
    }
    let rect = Rect {
        x: area.x + left as u16,
        y: area.y + top as u16,
        width: (right - left) as u16,
        height: (bottom - top) as u16,
    };
    Some((rect, (left - x) as u16, (top - y) as u16))
}

/// Convert page pixels to whole terminal cells
pub(crate) fn px_to_cells(px: f64, cell_px: f64) -> i32 {
    if cell_px <= 0.0 || !cell_px.is_finite() || !px.is_finite() {
        return 0;
    }
    (px / cell_px).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_inside() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(clip(area, 10, 5, 20, 4), Some((Rect::new(10, 5, 20, 4), 0, 0)));
    }

    #[test]
    fn test_clip_top_left_overhang() {
        let area = Rect::new(2, 1, 80, 24);
        let (rect, skip_x, skip_y) = clip(area, -5, -3, 20, 10).unwrap();
        assert_eq!(rect, Rect::new(2, 1, 15, 7));
        assert_eq!((skip_x, skip_y), (5, 3));
    }

    #[test]
    fn test_clip_off_screen() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(clip(area, 90, 0, 10, 10), None);
        assert_eq!(clip(area, -20, 0, 10, 10), None);
        assert_eq!(clip(area, 0, 24, 10, 10), None);
    }

    #[test]
    fn test_px_to_cells() {
        assert_eq!(px_to_cells(-1200.0, 10.0), -120);
        assert_eq!(px_to_cells(25.0, 10.0), 3);
        assert_eq!(px_to_cells(25.0, 0.0), 0);
        assert_eq!(px_to_cells(25.0, f64::NAN), 0);
    }

    #[test]
    fn test_px_to_cells_with_configured_cells() {
        let ui = stagehand_core::config::UiConfig::default();
        assert_eq!(px_to_cells(-1200.0, ui.cell_width_px), -120);
        assert_eq!(px_to_cells(800.0, ui.cell_height_px), 40);
        assert_eq!(px_to_cells(100.0, 12.5), 8);
    }
}
