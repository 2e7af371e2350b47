use crate::foundation::core::ScrollSample;

/// Coalesces scroll events so recomputation runs at most once per paint.
///
/// The most recent sample always wins; a pending sample is handed out exactly once at the next
/// paint, so the displayed state is never older than the last event before that paint.
#[derive(Clone, Debug, Default)]
pub struct ScrollThrottle {
    pending: Option<ScrollSample>,
    coalesced: u64,
}

impl ScrollThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a scroll event. Returns `true` when a paint callback must be scheduled, i.e. no
    /// sample was pending yet.
    pub fn push(&mut self, sample: ScrollSample) -> bool {
        let was_idle = self.pending.is_none();
        if !was_idle {
            self.coalesced += 1;
        }
        self.pending = Some(sample);
        was_idle
    }

    /// Take the sample to evaluate for this paint and clear the pending flag.
    pub fn take_for_paint(&mut self) -> Option<ScrollSample> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of events superseded before they were painted.
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/throttle.rs"]
mod tests;
