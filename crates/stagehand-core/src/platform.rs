//! Capabilities the capture controller calls into.
//!
//! The controller never touches a real page. Hosts (the terminal page, the
//! script simulator, tests) implement these traits and resolve [`PanelId`]s
//! to whatever they actually draw.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::config::EasingType;

/// Opaque handle to a panel the host knows how to move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelId(pub u32);

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "panel#{}", self.0)
    }
}

/// The two panels moved by a card stack, in motion order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelPair {
    /// Moves left during the first half of the gesture
    pub leading: PanelId,
    /// Moves right during the second half of the gesture
    pub trailing: PanelId,
}

/// Horizontal translation request for one panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelTween {
    pub target: f64,
    pub duration: Duration,
    pub easing: EasingType,
}

/// Page-wide smooth scrolling that must stand down during capture
pub trait ScrollController {
    fn pause(&mut self);
    fn start(&mut self);
}

/// Tween engine with overwrite semantics: a new request for a panel
/// replaces whatever is in flight for it.
pub trait PanelAnimator {
    fn animate(&mut self, panel: PanelId, tween: PanelTween, now: Instant);

    /// Place a panel without animating
    fn set(&mut self, panel: PanelId, offset: f64);
}

/// Native page scrolling and the capture-scoped listeners
pub trait PageHost {
    fn block_scroll(&mut self);
    fn unblock_scroll(&mut self);
    fn attach_capture_listeners(&mut self);
    fn detach_capture_listeners(&mut self);
}

impl<T: ScrollController> ScrollController for Rc<RefCell<T>> {
    fn pause(&mut self) {
        self.borrow_mut().pause();
    }

    fn start(&mut self) {
        self.borrow_mut().start();
    }
}

impl<T: PanelAnimator> PanelAnimator for Rc<RefCell<T>> {
    fn animate(&mut self, panel: PanelId, tween: PanelTween, now: Instant) {
        self.borrow_mut().animate(panel, tween, now);
    }

    fn set(&mut self, panel: PanelId, offset: f64) {
        self.borrow_mut().set(panel, offset);
    }
}

impl<T: PageHost> PageHost for Rc<RefCell<T>> {
    fn block_scroll(&mut self) {
        self.borrow_mut().block_scroll();
    }

    fn unblock_scroll(&mut self) {
        self.borrow_mut().unblock_scroll();
    }

    fn attach_capture_listeners(&mut self) {
        self.borrow_mut().attach_capture_listeners();
    }

    fn detach_capture_listeners(&mut self) {
        self.borrow_mut().detach_capture_listeners();
    }
}

/// Page state as seen by a host without a real document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageState {
    scroll_blocked: bool,
    listeners_attached: bool,
}

impl PageState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Native scrolling is suppressed (overflow hidden, touch-action none)
    #[inline]
    pub fn is_scroll_blocked(&self) -> bool {
        self.scroll_blocked
    }

    /// Wheel and touch input must be routed to the capturing section
    #[inline]
    pub fn listeners_attached(&self) -> bool {
        self.listeners_attached
    }
}

impl PageHost for PageState {
    fn block_scroll(&mut self) {
        self.scroll_blocked = true;
    }

    fn unblock_scroll(&mut self) {
        self.scroll_blocked = false;
    }

    fn attach_capture_listeners(&mut self) {
        self.listeners_attached = true;
    }

    fn detach_capture_listeners(&mut self) {
        self.listeners_attached = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_state_toggles() {
        let mut page = PageState::new();
        page.block_scroll();
        page.attach_capture_listeners();
        assert!(page.is_scroll_blocked());
        assert!(page.listeners_attached());

        page.detach_capture_listeners();
        page.unblock_scroll();
        assert_eq!(page, PageState::default());
    }

    #[test]
    fn test_shared_handle_forwards() {
        let shared = Rc::new(RefCell::new(PageState::new()));
        let mut handle = shared.clone();
        handle.block_scroll();
        assert!(shared.borrow().is_scroll_blocked());
    }
}
