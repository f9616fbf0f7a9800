//! Single-owner bookkeeping for page scroll capture

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tracing::warn;

/// Identity of a registered capture controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControllerId(u64);

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "capture#{}", self.0)
    }
}

#[derive(Debug, Default)]
struct ArbiterState {
    next_id: Cell<u64>,
    holder: Cell<Option<ControllerId>>,
}

/// Shared record of which controller holds page scroll.
///
/// Clones share state; hand one clone to every controller on the page.
#[derive(Debug, Clone, Default)]
pub struct CaptureArbiter {
    state: Rc<ArbiterState>,
}

impl CaptureArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self) -> ControllerId {
        let id = self.state.next_id.get();
        self.state.next_id.set(id + 1);
        ControllerId(id)
    }

    /// Grant capture to `id`. Returns the controller that was de-registered
    /// to make room, which indicates overlapping capturable sections.
    pub fn acquire(&self, id: ControllerId) -> Option<ControllerId> {
        let previous = self.state.holder.replace(Some(id));
        match previous {
            Some(other) if other != id => {
                warn!(%other, new = %id, "overlapping scroll capture; de-registering previous holder");
                Some(other)
            }
            _ => None,
        }
    }

    /// Give up capture. Returns false if `id` was not the holder.
    pub fn release(&self, id: ControllerId) -> bool {
        if self.state.holder.get() == Some(id) {
            self.state.holder.set(None);
            true
        } else {
            false
        }
    }

    pub fn holder(&self) -> Option<ControllerId> {
        self.state.holder.get()
    }

    #[inline]
    pub fn is_held_by(&self, id: ControllerId) -> bool {
        self.holder() == Some(id)
    }
}
