use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use tracing::debug;

use stagehand_core::capture::{CaptureController, TouchTracker, WheelDelta};
use stagehand_core::motion::TweenEngine;
use stagehand_core::platform::{PageState, PanelId, PanelPair};
use stagehand_core::reveal::{GlyphFrame, TextReveal};
use stagehand_core::visibility::{IntersectionEntry, Span, VisibilityTracker};
use stagehand_core::{AppConfig, SmoothScroll};

use crate::input::Action;
use crate::page::{PageLayout, SectionKind};
use crate::theme::Theme;

/// Page scroller shared between the app and the capture controller
pub type SharedScroll = Rc<RefCell<SmoothScroll>>;

/// Capture controller driving the exhibition card stack
pub type CardStackCapture = CaptureController<SharedScroll, TweenEngine<PanelId>, PageState>;

/// Top card of the stack, slides out to the left first
pub const LEADING_CARD: PanelId = PanelId(0);
/// Second card, slides out to the right once the first is gone
pub const TRAILING_CARD: PanelId = PanelId(1);

/// Share of the viewport moved by PageUp/PageDown
const PAGE_STEP: f64 = 0.9;

/// A section heading together with the observer that triggers it
struct SectionReveal {
    kind: SectionKind,
    tracker: VisibilityTracker,
    reveal: TextReveal,
}

/// Main application state
pub struct App {
    pub config: AppConfig,
    pub theme: Theme,
    pub should_quit: bool,
    /// Page area in terminal cells (columns, rows)
    viewport: (u16, u16),
    layout: PageLayout,
    scroll: SharedScroll,
    capture: CardStackCapture,
    exhibition_tracker: VisibilityTracker,
    reveals: Vec<SectionReveal>,
    page_touch: TouchTracker,
    /// Time of the last frame
    now: Instant,
}

impl App {
    /// Build the page for a `columns` x `rows` page area and mount the card
    /// stack
    pub fn new(config: AppConfig, theme: Theme, columns: u16, rows: u16, now: Instant) -> Self {
        let scroll: SharedScroll = Rc::new(RefCell::new(SmoothScroll::new(
            config.smooth_scroll.clone(),
        )));
        let capture = CaptureController::new(
            config.capture.clone(),
            scroll.clone(),
            TweenEngine::new(),
            PageState::new(),
        );
        let reveals = SectionKind::ALL
            .iter()
            .filter_map(|&kind| {
                kind.heading().map(|(text, effect)| SectionReveal {
                    kind,
                    tracker: VisibilityTracker::default(),
                    reveal: TextReveal::new(text, effect, &config.ui.reveal),
                })
            })
            .collect();

        let mut app = Self {
            layout: PageLayout::new(0.0),
            config,
            theme,
            should_quit: false,
            viewport: (columns, rows),
            scroll,
            capture,
            exhibition_tracker: VisibilityTracker::default(),
            reveals,
            page_touch: TouchTracker::new(),
            now,
        };
        app.relayout();

        let panels = PanelPair {
            leading: LEADING_CARD,
            trailing: TRAILING_CARD,
        };
        let width = app.viewport_px().0;
        app.capture.start(Some(panels), Some(width), now);
        app.update(now);
        app
    }

    /// Viewport size in pixels
    pub fn viewport_px(&self) -> (f64, f64) {
        let (columns, rows) = self.viewport;
        (
            f64::from(columns) * self.config.ui.cell_width_px,
            f64::from(rows) * self.config.ui.cell_height_px,
        )
    }

    pub fn viewport(&self) -> (u16, u16) {
        self.viewport
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn capture(&self) -> &CardStackCapture {
        &self.capture
    }

    /// Visible scroll position in pixels
    pub fn scroll_position(&self) -> f64 {
        self.scroll.borrow().current()
    }

    pub fn scroll_limit(&self) -> f64 {
        self.scroll.borrow().limit()
    }

    fn relayout(&mut self) {
        let (_, height) = self.viewport_px();
        self.layout = PageLayout::new(height);
        self.scroll.borrow_mut().set_limit(self.layout.scroll_limit());
    }

    /// Terminal resized; `rows` excludes the status bar
    pub fn resize(&mut self, columns: u16, rows: u16, now: Instant) {
        if self.viewport == (columns, rows) {
            return;
        }
        self.viewport = (columns, rows);
        self.relayout();
        let width = self.viewport_px().0;
        debug!(columns, rows, width, "page resized");
        self.capture.on_resize(Some(width), now);
    }

    pub fn handle_action(&mut self, action: Action, now: Instant) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Wheel(delta) => self.wheel(delta, now),
            Action::PageDown => self.wheel(self.viewport_px().1 * PAGE_STEP, now),
            Action::PageUp => self.wheel(-self.viewport_px().1 * PAGE_STEP, now),
            Action::JumpToTop => self.jump_to(0.0, now),
            Action::JumpToBottom => self.jump_to(self.layout.scroll_limit(), now),
            Action::TouchStart(row) => self.touch_start(row, now),
            Action::TouchMove(row) => self.touch_move(row, now),
            Action::TouchEnd => self.page_touch.reset(),
            Action::None => {}
        }
    }

    fn row_to_px(&self, row: u16) -> f64 {
        f64::from(row) * self.config.ui.cell_height_px
    }

    /// Route a wheel delta to the card stack while it listens, otherwise to
    /// the page
    fn wheel(&mut self, delta: f64, now: Instant) {
        if self.capture.host().listeners_attached() {
            let outcome = self.capture.on_wheel(WheelDelta::new(delta), now);
            if outcome.prevent_default {
                return;
            }
        }
        if !self.capture.host().is_scroll_blocked() {
            self.scroll.borrow_mut().on_wheel(delta, now);
        }
    }

    fn touch_start(&mut self, row: u16, now: Instant) {
        let y = self.row_to_px(row);
        self.page_touch.start(y);
        if self.capture.host().listeners_attached() {
            self.capture.on_touch_start(y, now);
        }
    }

    fn touch_move(&mut self, row: u16, now: Instant) {
        let y = self.row_to_px(row);
        let delta = self.page_touch.move_to(y);
        if self.capture.host().listeners_attached() {
            let outcome = self.capture.on_touch_move(y, now);
            if outcome.prevent_default {
                return;
            }
        }
        if delta != 0.0 && !self.capture.host().is_scroll_blocked() {
            let mut scroll = self.scroll.borrow_mut();
            if !scroll.is_stopped() {
                let target = scroll.target() + delta;
                scroll.scroll_to(target, now, true);
            }
        }
    }

    fn jump_to(&mut self, target: f64, now: Instant) {
        if self.capture.host().is_scroll_blocked() {
            return;
        }
        let mut scroll = self.scroll.borrow_mut();
        if !scroll.is_stopped() {
            scroll.scroll_to(target, now, false);
        }
    }

    /// Advance everything time-driven to `now`: page scroll, section
    /// observers, the pending release and the card tweens
    pub fn update(&mut self, now: Instant) {
        self.now = now;
        let position = self.scroll.borrow_mut().update(now);
        let viewport = Span::new(position, self.viewport_px().1);

        let exhibition = self.layout.span(SectionKind::Exhibition);
        let entry = IntersectionEntry::measure(&exhibition, &viewport);
        if let Some(entry) = self.exhibition_tracker.observe(entry) {
            self.capture.on_intersection(entry, now);
        }

        for section in &mut self.reveals {
            let span = self.layout.span(section.kind);
            let entry = IntersectionEntry::measure(&span, &viewport);
            if let Some(entry) = section.tracker.observe(entry) {
                // Leaving out the top keeps the heading revealed
                if entry.is_intersecting || span.top >= viewport.bottom() {
                    section.reveal.on_visibility(entry.is_intersecting, now);
                }
            }
        }

        self.capture.poll(now);
        self.capture.animator_mut().update(now);
    }

    /// Whether the next frame should come at the animation rate
    pub fn needs_fast_update(&self) -> bool {
        let now = self.now;
        self.scroll.borrow().is_animating()
            || self.capture.animator().is_animating()
            || self.capture.next_deadline().is_some()
            || self.reveals.iter().any(|s| !s.reveal.is_settled(now))
    }

    /// Horizontal offset of card `index` in pixels at the last frame
    pub fn card_offset_px(&self, index: usize) -> f64 {
        let panel = match index {
            0 => LEADING_CARD,
            1 => TRAILING_CARD,
            _ => return 0.0,
        };
        self.capture.animator().sample(panel, self.now)
    }

    /// Heading glyphs of `kind` at the last frame
    pub fn heading_frames(&self, kind: SectionKind) -> Option<Vec<(char, GlyphFrame)>> {
        self.reveals
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| s.reveal.frames(self.now))
    }

    /// Unmount the card stack, handing the page back if it was captured
    pub fn shutdown(&mut self, now: Instant) {
        self.capture.stop(now);
    }
}
