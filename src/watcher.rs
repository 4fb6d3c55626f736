//! Sentinel visibility watcher
//!
//! Tracks whether one row (the sentinel, normally the last result) is inside
//! the rendered viewport and reports the moment it scrolls into view. At most
//! one subscription exists; subscribing again always tears the old one down
//! first.

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Subscription {
    target: usize,
    visible: bool,
}

#[derive(Debug, Default)]
pub struct VisibilityWatcher {
    current: Option<Subscription>,
    subscriptions: u64,
    teardowns: u64,
}

impl VisibilityWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Watch `target`, replacing any existing subscription.
    pub fn subscribe(&mut self, target: usize) {
        self.unsubscribe();
        self.current = Some(Subscription {
            target,
            visible: false,
        });
        self.subscriptions += 1;
        tracing::trace!(row = target, "sentinel subscribed");
    }

    pub fn unsubscribe(&mut self) {
        if let Some(sub) = self.current.take() {
            self.teardowns += 1;
            tracing::trace!(row = sub.target, "sentinel torn down");
        }
    }

    /// Row currently watched, if any
    pub fn target(&self) -> Option<usize> {
        self.current.map(|s| s.target)
    }

    /// Feed the rows currently on screen. Returns `true` only on the
    /// transition into view, including the first observation after
    /// subscribing when the row is already visible.
    pub fn observe(&mut self, viewport: Range<usize>) -> bool {
        let Some(sub) = self.current.as_mut() else {
            return false;
        };

        let now_visible = viewport.contains(&sub.target);
        let entered = now_visible && !sub.visible;
        sub.visible = now_visible;
        entered
    }

    pub fn subscription_count(&self) -> u64 {
        self.subscriptions
    }

    pub fn teardown_count(&self) -> u64 {
        self.teardowns
    }
}
