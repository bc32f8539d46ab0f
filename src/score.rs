//! Scoring and level progression

/// What a single lock's line clear produced, for event emission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearOutcome {
    /// Combo count after this clear
    pub combo: u32,
    /// Whether a combo bonus (combo > 1) was awarded
    pub combo_fired: bool,
    /// New level if the clear caused a level-up
    pub leveled_up: Option<u32>,
}

/// Score state: monotonically non-decreasing points, with level derived from
/// cumulative lines
#[derive(Debug, Clone)]
pub struct Score {
    pub points: u64,
    pub level: u32,
    pub lines: u32,
    /// Consecutive locks that each cleared at least one line
    pub combo: u32,
    // Lifetime-of-game statistics
    pub tetrises: u32,
    pub t_spins: u32,
    pub perfect_clears: u32,
    pub best_combo: u32,
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

impl Score {
    pub fn new() -> Self {
        Self {
            points: 0,
            level: 1,
            lines: 0,
            combo: 0,
            tetrises: 0,
            t_spins: 0,
            perfect_clears: 0,
            best_combo: 0,
        }
    }

    /// Score a lock that cleared `cleared` rows (1-4).
    ///
    /// All multipliers use the level in effect before the clear; lines and
    /// level are updated last.
    pub fn add_clear(&mut self, cleared: u8, t_spin: bool, all_clear: bool) -> ClearOutcome {
        debug_assert!((1..=4).contains(&cleared));
        let level = self.level as u64;

        self.points += base_points(cleared, t_spin) * level;

        self.combo += 1;
        self.best_combo = self.best_combo.max(self.combo);
        let combo_fired = self.combo > 1;
        if combo_fired {
            self.points += 50 * self.combo as u64 * level;
        }

        if t_spin {
            self.t_spins += 1;
        } else if cleared == 4 {
            self.tetrises += 1;
        }

        if all_clear {
            self.points += 3000 * level;
            self.perfect_clears += 1;
        }

        self.lines += cleared as u32;
        let new_level = level_for_lines(self.lines);
        let leveled_up = (new_level > self.level).then_some(new_level);
        self.level = new_level;

        ClearOutcome {
            combo: self.combo,
            combo_fired,
            leveled_up,
        }
    }

    /// Reset the combo chain (a lock produced zero cleared lines)
    pub fn reset_combo(&mut self) {
        self.combo = 0;
    }

    /// Soft drop: 1 point per cell gained, no level multiplier
    pub fn add_soft_drop(&mut self, cells: u32) {
        self.points += cells as u64;
    }

    /// Hard drop: 2 points per cell dropped, no level multiplier
    pub fn add_hard_drop(&mut self, cells: u32) {
        self.points += cells as u64 * 2;
    }
}

/// Base points for a clear, before the level multiplier
fn base_points(cleared: u8, t_spin: bool) -> u64 {
    if t_spin {
        match cleared {
            1 => 400,
            2 => 800,
            3 => 1200,
            _ => 1600,
        }
    } else {
        match cleared {
            1 => 100,
            2 => 300,
            3 => 500,
            _ => 800,
        }
    }
}

/// Level derived from cumulative lines cleared: one level per 10 lines
pub fn level_for_lines(lines: u32) -> u32 {
    lines / 10 + 1
}

/// Gravity interval for a level, floored at 50ms
pub fn drop_interval_ms(level: u32) -> u64 {
    1000u64.saturating_sub((level as u64 - 1) * 50).max(50)
}
