//! Session state: the one depletable resource and the terminal flags.
//!
//! A [`SessionState`] is created once per level and owned by the arena.
//! Every fuel charge and refill in the whole core funnels through it, and
//! it is the only place the terminal flags are written.

use serde::{Deserialize, Serialize};
use tracing::info;

/// Fuel counter plus the win/over latches.
///
/// `over` becomes true either when fuel reaches zero or below (a loss) or
/// when [`SessionState::set_won`] fires (a win). Both transitions latch:
/// once the session is over, later wins are ignored. Fuel arithmetic is
/// plain integers, so a charge followed by an equal refill restores the
/// prior value exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    fuel: i32,
    won: bool,
    over: bool,
}

impl SessionState {
    /// Creates a running session with `fuel` in the tank.
    #[must_use]
    pub const fn new(fuel: i32) -> Self {
        Self {
            fuel,
            won: false,
            over: false,
        }
    }

    /// Remaining fuel. May be negative once the session is lost.
    #[must_use]
    pub const fn fuel(&self) -> i32 {
        self.fuel
    }

    /// Whether the session ended in a win.
    #[must_use]
    pub const fn won(&self) -> bool {
        self.won
    }

    /// Whether the session has reached a terminal state.
    #[must_use]
    pub const fn over(&self) -> bool {
        self.over
    }

    /// Charges `amount` fuel. Reaching zero or below ends the session as
    /// a loss.
    pub fn spend(&mut self, amount: i32) {
        self.fuel -= amount;
        if self.fuel <= 0 && !self.over {
            self.over = true;
            info!(fuel = self.fuel, "session lost: fuel exhausted");
        }
    }

    /// Returns `amount` fuel to the tank. Refills never revive a session
    /// that is already over.
    pub fn refill(&mut self, amount: i32) {
        self.fuel += amount;
    }

    /// Marks the session won and over. A no-op when the session already
    /// ended.
    pub fn set_won(&mut self) {
        if self.over {
            return;
        }
        self.won = true;
        self.over = true;
        info!(fuel = self.fuel, "session won");
    }
}

// =============================================================================
// Tests
// =============================================================================
