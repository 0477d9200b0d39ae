use crate::error::SkipReason;

/// Per-run outcome counters. `total == intact + damaged + errors` at all times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecoveryStats {
    intact: usize,
    damaged: usize,
    errors: usize,
}

impl RecoveryStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_intact(&mut self) {
        self.intact += 1;
    }

    pub fn record_skip(&mut self, reason: &SkipReason) {
        if reason.is_damage() {
            self.damaged += 1;
        } else {
            self.errors += 1;
        }
    }

    pub fn record<T>(&mut self, outcome: &Result<T, SkipReason>) {
        match outcome {
            Ok(_) => self.record_intact(),
            Err(reason) => self.record_skip(reason),
        }
    }

    pub fn total(&self) -> usize {
        self.intact + self.damaged + self.errors
    }

    pub fn intact(&self) -> usize {
        self.intact
    }

    pub fn damaged(&self) -> usize {
        self.damaged
    }

    pub fn errors(&self) -> usize {
        self.errors
    }
}
