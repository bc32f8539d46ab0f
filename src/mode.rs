//! Game modes: Marathon, Sprint, Ultra, Zen

use serde::{Deserialize, Serialize};

/// Sprint ends after this many cleared lines
pub const SPRINT_TARGET_LINES: u32 = 40;
/// Ultra's fixed time budget
pub const ULTRA_TIME_MS: u64 = 120_000;

/// Available game modes. The engine core reads the mode only to gate
/// end-of-game conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Marathon, // Endless, level increases every 10 lines
    Sprint, // Clear 40 lines as fast as possible
    Ultra,  // Score as much as possible in 2 minutes
    Zen,    // Endless, no pressure, no leaderboard
}

impl GameMode {
    pub fn name(&self) -> &'static str {
        match self {
            GameMode::Marathon => "Marathon",
            GameMode::Sprint => "Sprint",
            GameMode::Ultra => "Ultra",
            GameMode::Zen => "Zen",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GameMode::Marathon => "Endless mode - level up every 10 lines",
            GameMode::Sprint => "Clear 40 lines as fast as possible",
            GameMode::Ultra => "Score as much as you can in 2 minutes",
            GameMode::Zen => "Endless mode without the scoreboard stakes",
        }
    }

    /// Whether finished games in this mode may be submitted to the leaderboard
    pub fn leaderboard_eligible(&self) -> bool {
        !matches!(self, GameMode::Zen)
    }

    pub fn all() -> &'static [GameMode] {
        &[
            GameMode::Marathon,
            GameMode::Sprint,
            GameMode::Ultra,
            GameMode::Zen,
        ]
    }
}

/// Mode-specific timing state, advanced only by unpaused simulation ticks
#[derive(Debug, Clone)]
pub struct ModeClock {
    pub mode: GameMode,
    pub elapsed_ms: u64,
}

impl ModeClock {
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            elapsed_ms: 0,
        }
    }

    /// Accrue one tick's worth of game time
    pub fn advance(&mut self, delta_ms: u64) {
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
    }

    /// Ultra only: has the time budget run out?
    pub fn time_expired(&self) -> bool {
        self.mode == GameMode::Ultra && self.elapsed_ms >= ULTRA_TIME_MS
    }

    /// Sprint only: has the line target been reached?
    pub fn target_reached(&self, lines_cleared: u32) -> bool {
        self.mode == GameMode::Sprint && lines_cleared >= SPRINT_TARGET_LINES
    }

    /// Remaining time for Ultra (None for other modes)
    pub fn time_remaining_ms(&self) -> Option<u64> {
        match self.mode {
            GameMode::Ultra => Some(ULTRA_TIME_MS.saturating_sub(self.elapsed_ms)),
            _ => None,
        }
    }

    /// Lines remaining for Sprint (None for other modes)
    pub fn lines_remaining(&self, lines_cleared: u32) -> Option<u32> {
        match self.mode {
            GameMode::Sprint => Some(SPRINT_TARGET_LINES.saturating_sub(lines_cleared)),
            _ => None,
        }
    }

    /// Format elapsed time as MM:SS.mmm
    pub fn format_elapsed(&self) -> String {
        let minutes = self.elapsed_ms / 60_000;
        let seconds = (self.elapsed_ms % 60_000) / 1000;
        let millis = self.elapsed_ms % 1000;
        format!("{:02}:{:02}.{:03}", minutes, seconds, millis)
    }

    /// Format remaining time for Ultra as MM:SS
    pub fn format_remaining(&self) -> Option<String> {
        self.time_remaining_ms().map(|remaining| {
            let total_secs = remaining.div_ceil(1000);
            format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endless_modes_never_complete() {
        for mode in [GameMode::Marathon, GameMode::Zen] {
            let mut clock = ModeClock::new(mode);
            clock.advance(10 * ULTRA_TIME_MS);
            assert!(!clock.time_expired());
            assert!(!clock.target_reached(1000));
        }
    }

    #[test]
    fn sprint_completes_at_the_line_target() {
        let clock = ModeClock::new(GameMode::Sprint);
        assert!(!clock.target_reached(SPRINT_TARGET_LINES - 1));
        assert!(clock.target_reached(SPRINT_TARGET_LINES));
        assert!(clock.target_reached(SPRINT_TARGET_LINES + 2));
    }

    #[test]
    fn ultra_expires_when_the_budget_is_spent() {
        let mut clock = ModeClock::new(GameMode::Ultra);
        clock.advance(ULTRA_TIME_MS - 1);
        assert!(!clock.time_expired());
        assert_eq!(clock.time_remaining_ms(), Some(1));
        clock.advance(1);
        assert!(clock.time_expired());
        assert_eq!(clock.time_remaining_ms(), Some(0));
    }

    #[test]
    fn zen_is_not_leaderboard_eligible() {
        assert!(!GameMode::Zen.leaderboard_eligible());
        assert!(GameMode::Marathon.leaderboard_eligible());
        assert!(GameMode::Sprint.leaderboard_eligible());
        assert!(GameMode::Ultra.leaderboard_eligible());
    }

    #[test]
    fn elapsed_formatting() {
        let mut clock = ModeClock::new(GameMode::Sprint);
        clock.advance(83_456);
        assert_eq!(clock.format_elapsed(), "01:23.456");
    }
}
