//! Request sequencing so a slow, older response never overwrites newer state

/// Monotonic request counter for one panel.
///
/// Every fetch takes a fresh id from [`begin`](Self::begin). A completion
/// is applied only when [`is_current`](Self::is_current) holds for its id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestSequence {
    latest: u64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request and return its id.
    pub fn begin(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// Id of the most recently initiated request (0 = none yet).
    pub fn latest(&self) -> u64 {
        self.latest
    }

    pub fn is_current(&self, id: u64) -> bool {
        id != 0 && id == self.latest
    }
}
