//! Request epochs.
//!
//! Every destructive controller action advances the epoch; a page result is
//! applied only if the epoch it was requested under is still current.

use serde::Serialize;

/// A monotonically increasing request fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Epoch(u64);

impl Epoch {
    /// The epoch before any action.
    pub const ZERO: Epoch = Epoch(0);

    /// The following epoch.
    pub fn next(self) -> Epoch {
        Epoch(self.0 + 1)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Epoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
