//! Lock-delay state machine
//!
//! A grounded piece does not commit immediately: a grace timer runs, and
//! successful moves or rotations restart it. Resets are capped so a piece
//! cannot be stalled forever by spinning in place.

/// Grace period before a grounded piece commits
pub const LOCK_DELAY_MS: u64 = 500;
/// Maximum timer resets per grounded episode
pub const MAX_LOCK_MOVES: u8 = 15;

/// Lock-delay state for the active piece.
///
/// Exists only while the piece cannot move down; airborne pieces carry no
/// timer state.
#[derive(Debug, Clone, Copy, Default)]
pub struct LockDelay {
    grounded: bool,
    timer_ms: u64,
    moves: u8,
}

impl LockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the grounded state. A no-op if already grounded, otherwise the
    /// timer and move counter start fresh.
    pub fn ground(&mut self) {
        if !self.grounded {
            self.grounded = true;
            self.timer_ms = 0;
            self.moves = 0;
        }
    }

    /// Leave the grounded state (the piece can fall again)
    pub fn release(&mut self) {
        self.grounded = false;
        self.timer_ms = 0;
    }

    /// Reset everything for a fresh piece
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance the timer by one tick's delta. Returns true when the grace
    /// period has fully elapsed and the piece must lock.
    pub fn advance(&mut self, delta_ms: u64) -> bool {
        if !self.grounded {
            return false;
        }
        self.timer_ms = self.timer_ms.saturating_add(delta_ms);
        self.timer_ms >= LOCK_DELAY_MS
    }

    /// A successful move or rotation while grounded restarts the timer, up to
    /// the reset cap; past the cap the reset is denied.
    pub fn qualifying_move(&mut self) {
        if self.grounded && self.moves < MAX_LOCK_MOVES {
            self.timer_ms = 0;
            self.moves += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn airborne_never_expires() {
        let mut lock = LockDelay::new();
        assert!(!lock.advance(10_000));
    }

    #[test]
    fn expires_after_the_grace_period() {
        let mut lock = LockDelay::new();
        lock.ground();
        assert!(!lock.advance(LOCK_DELAY_MS - 1));
        assert!(lock.advance(1));
    }

    #[test]
    fn qualifying_move_restarts_the_timer() {
        let mut lock = LockDelay::new();
        lock.ground();
        assert!(!lock.advance(499));
        lock.qualifying_move();
        assert!(!lock.advance(499));
        assert!(lock.advance(1));
    }

    #[test]
    fn resets_are_denied_past_the_cap() {
        let mut lock = LockDelay::new();
        lock.ground();
        for _ in 0..MAX_LOCK_MOVES {
            lock.advance(100);
            lock.qualifying_move();
        }
        lock.advance(400);
        // Cap reached: this reset must be denied
        lock.qualifying_move();
        assert!(lock.advance(100));
    }

    #[test]
    fn regrounding_starts_a_fresh_episode() {
        let mut lock = LockDelay::new();
        lock.ground();
        for _ in 0..MAX_LOCK_MOVES {
            lock.qualifying_move();
        }
        lock.release();
        lock.ground();
        lock.advance(400);
        lock.qualifying_move();
        assert!(!lock.advance(400));
    }

    #[test]
    fn ground_is_idempotent() {
        let mut lock = LockDelay::new();
        lock.ground();
        lock.advance(300);
        lock.ground();
        // Timer kept running, not restarted
        assert!(lock.advance(200));
    }
}
