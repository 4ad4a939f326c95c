//! Retry budget for a single logical call.
//!
//! # Responsibilities
//! - Cap the number of node attempts per call
//! - Report when a full pass over the roster has completed (for backoff)
//!
//! # Design Decisions
//! - The budget counts attempts, not rotations: `num_retries = 3` means at
//!   most three requests leave the client for one logical call
//! - Only node-level failures consume the budget; remote application
//!   errors end the call immediately

/// Attempt accounting for one logical call.
#[derive(Debug, Clone)]
pub struct RetryBudget {
    max_attempts: u32,
    roster_len: usize,
    attempts: u32,
}

impl RetryBudget {
    /// A budget allowing `num_retries` attempts (at least one) over a roster of `roster_len` nodes.
    pub fn new(num_retries: u32, roster_len: usize) -> Self {
        Self {
            max_attempts: num_retries.max(1),
            roster_len: roster_len.max(1),
            attempts: 0,
        }
    }

    /// Claim the next attempt. Returns `false` once the budget is spent.
    pub fn try_acquire(&mut self) -> bool {
        if self.is_spent() {
            return false;
        }
        self.attempts += 1;
        true
    }

    /// True once no further attempt may be made.
    pub fn is_spent(&self) -> bool {
        self.attempts >= self.max_attempts
    }

    /// Attempts made so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Number of completed passes over the roster.
    pub fn completed_passes(&self) -> u32 {
        self.attempts / self.roster_len as u32
    }

    /// True when the last attempt closed a full pass over the roster.
    pub fn at_pass_boundary(&self) -> bool {
        self.attempts > 0 && self.attempts as usize % self.roster_len == 0
    }
}
