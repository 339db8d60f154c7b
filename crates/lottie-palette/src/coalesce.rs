//! Debounce for interactive edits.
//!
//! Live edits (dragging a color picker) are written to the document at once,
//! but only the state that is still current once the burst settles gets a
//! history snapshot and a renderer reload. Time is passed in, so there are no
//! timers or threads.

use std::time::{Duration, Instant};

pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(200);

#[derive(Debug, Clone)]
pub struct EditCoalescer {
    window: Duration,
    last_edit: Option<Instant>,
}

impl Default for EditCoalescer {
    fn default() -> Self {
        Self::new(DEBOUNCE_WINDOW)
    }
}

impl EditCoalescer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_edit: None,
        }
    }

    /// Records an edit at `now`, pushing back any pending settle.
    pub fn arm(&mut self, now: Instant) {
        self.last_edit = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.last_edit.is_some()
    }

    /// Clears and returns true if a pending burst has been quiet for the
    /// whole window.
    pub fn take_if_settled(&mut self, now: Instant) -> bool {
        match self.last_edit {
            Some(last) if now.saturating_duration_since(last) >= self.window => {
                self.last_edit = None;
                true
            }
            _ => false,
        }
    }

    /// Clears and returns true if anything was pending, regardless of time.
    pub fn take(&mut self) -> bool {
        self.last_edit.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_last_edit_in_burst_settles() {
        let start = Instant::now();
        let mut coalescer = EditCoalescer::default();
        coalescer.arm(start);
        coalescer.arm(start + Duration::from_millis(150));

        assert!(!coalescer.take_if_settled(start + Duration::from_millis(250)));
        assert!(coalescer.take_if_settled(start + Duration::from_millis(350)));
        assert!(!coalescer.is_pending());
        assert!(!coalescer.take_if_settled(start + Duration::from_millis(900)));
    }

    #[test]
    fn test_take_flushes() {
        let mut coalescer = EditCoalescer::new(Duration::from_secs(60));
        assert!(!coalescer.take());
        coalescer.arm(Instant::now());
        assert!(coalescer.take());
        assert!(!coalescer.is_pending());
    }
}
