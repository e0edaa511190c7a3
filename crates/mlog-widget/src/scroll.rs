//! Auto-scroll tracking
//!
//! Auto-scroll follows the user's gestures only. It turns off when a drag
//! leaves the bottom edge and back on when a drag returns to it. Content
//! changes never touch it.

/// Default distance from the end that still counts as "at bottom"
pub const DEFAULT_BOTTOM_EPSILON: usize = 5;

/// Snapshot of the tracker flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    pub auto_scroll_enabled: bool,
    pub user_is_dragging: bool,
    pub last_known_at_bottom: bool,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            auto_scroll_enabled: true,
            user_is_dragging: false,
            last_known_at_bottom: true,
        }
    }
}

type Observer = Box<dyn FnMut(bool) + Send>;

/// Tracks whether new content should pull the view to the bottom
pub struct ScrollTracker {
    state: ScrollState,
    epsilon: usize,
    observers: Vec<Observer>,
}

impl std::fmt::Debug for ScrollTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollTracker")
            .field("state", &self.state)
            .field("epsilon", &self.epsilon)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for ScrollTracker {
    fn default() -> Self {
        Self::new(DEFAULT_BOTTOM_EPSILON)
    }
}

impl ScrollTracker {
    pub fn new(epsilon: usize) -> Self {
        Self {
            state: ScrollState::default(),
            epsilon,
            observers: Vec::new(),
        }
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    pub fn auto_scroll_enabled(&self) -> bool {
        self.state.auto_scroll_enabled
    }

    pub fn is_dragging(&self) -> bool {
        self.state.user_is_dragging
    }

    pub fn is_at_bottom(&self, position: usize, max: usize) -> bool {
        position.saturating_add(self.epsilon) >= max
    }

    /// Register a callback for auto-scroll enable/disable transitions
    pub fn on_scroll_state_changed(&mut self, observer: impl FnMut(bool) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn drag_started(&mut self, position: usize, max: usize) {
        self.state.user_is_dragging = true;
        self.state.last_known_at_bottom = self.is_at_bottom(position, max);
    }

    /// Returns the new auto-scroll flag when it changed
    pub fn drag_ended(&mut self, position: usize, max: usize) -> Option<bool> {
        self.state.user_is_dragging = false;
        let at_bottom = self.is_at_bottom(position, max);
        self.state.last_known_at_bottom = at_bottom;
        if at_bottom && !self.state.auto_scroll_enabled {
            self.set_enabled(true)
        } else {
            None
        }
    }

    /// Returns the new auto-scroll flag when it changed; ignored outside a drag
    pub fn position_changed(&mut self, position: usize, max: usize) -> Option<bool> {
        if !self.state.user_is_dragging {
            return None;
        }
        let at_bottom = self.is_at_bottom(position, max);
        let was_at_bottom = self.state.last_known_at_bottom;
        self.state.last_known_at_bottom = at_bottom;

        match (was_at_bottom, at_bottom) {
            (true, false) if self.state.auto_scroll_enabled => self.set_enabled(false),
            (false, true) if !self.state.auto_scroll_enabled => self.set_enabled(true),
            _ => None,
        }
    }

    fn set_enabled(&mut self, enabled: bool) -> Option<bool> {
        self.state.auto_scroll_enabled = enabled;
        tracing::debug!("Auto-scroll {}", if enabled { "resumed" } else { "paused" });
        for observer in &mut self.observers {
            observer(enabled);
        }
        Some(enabled)
    }
}
