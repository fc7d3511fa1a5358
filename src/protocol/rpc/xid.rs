//! Transaction identifier (xid) generation.
//!
//! Each connection starts from a random xid so that a server keeping a
//! duplicate request cache does not confuse a new connection's calls with
//! stale retransmissions of an earlier one. The value is not a secret.
//! Each call then uses the next value, wrapping around at `u32::MAX`.

use rand::Rng;

/// Per-connection xid counter.
#[derive(Clone, Debug)]
pub struct XidGenerator {
    current: u32,
}

impl XidGenerator {
    /// Seeds the counter from the thread-local random generator.
    pub fn new() -> Self {
        Self::with_seed(rand::thread_rng().gen())
    }

    /// Starts the counter at `seed`; the first call uses `seed + 1`.
    pub fn with_seed(seed: u32) -> Self {
        Self { current: seed }
    }

    /// Advances the counter and returns the xid for the next call.
    pub fn next_xid(&mut self) -> u32 {
        self.current = self.current.wrapping_add(1);
        self.current
    }

    /// The xid of the most recent call (the seed before the first call).
    pub fn current(&self) -> u32 {
        self.current
    }
}

impl Default for XidGenerator {
    fn default() -> Self {
        Self::new()
    }
}
