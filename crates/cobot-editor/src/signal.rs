//! "Sequence changed" flag shared with the serializer and persistence glue.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloneable handle to a single shared dirty flag.
///
/// The editor only ever raises it. Consumers observe it with
/// [`is_raised`](Self::is_raised) and clear it with [`take`](Self::take)
/// once they have re-read the sequence.
#[derive(Debug, Clone, Default)]
pub struct ChangeSignal {
    raised: Arc<AtomicBool>,
}

impl ChangeSignal {
    /// Create a lowered flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Whether a structural change happened since the last `take`.
    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    /// Read and lower the flag in one step.
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::AcqRel)
    }
}

#[cfg(test)]
mod tests {
    use super::ChangeSignal;

    #[test]
    fn clones_share_state() {
        let signal = ChangeSignal::new();
        let observer = signal.clone();
        assert!(!observer.is_raised());
        signal.raise();
        assert!(observer.is_raised());
        assert!(observer.take());
        assert!(!signal.is_raised());
        assert!(!observer.take());
    }
}
