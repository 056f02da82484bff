//! Cooperative stop signal shared between the caller and an acquisition run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Level-triggered stop flag.
///
/// Clones share the same flag. Once [`StopSignal::stop`] is called the flag
/// stays set until [`StopSignal::clear`]; a run started with a set flag does
/// no network work at all.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    stopped: Arc<AtomicBool>,
}

impl StopSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }

    pub fn clear(&self) {
        self.stopped.store(false, Ordering::Relaxed);
    }

    /// Relaxed load: a late observation only delays stopping by one poll.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_signal_is_not_stopped() {
        assert!(!StopSignal::new().is_stopped());
    }

    #[test]
    fn clones_observe_stop_from_any_handle() {
        let signal = StopSignal::new();
        let worker_side = signal.clone();
        signal.stop();
        assert!(worker_side.is_stopped());
    }

    #[test]
    fn stop_persists_until_cleared() {
        let signal = StopSignal::new();
        signal.stop();
        assert!(signal.is_stopped());
        assert!(signal.is_stopped());
        signal.clear();
        assert!(!signal.is_stopped());
    }
}
