//! Menu navigation state
//!
//! Rendering lives in `ui.rs`; this is only the selection state machine.

use crate::mode::GameMode;

/// Which menu screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuScreen {
    Main,
    HighScores,
}

/// What a confirmed menu selection asks the app to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    StartGame(GameMode),
    Quit,
}

/// Ranked modes shown on the high-score screen
const RANKED_MODES: [GameMode; 3] = [GameMode::Marathon, GameMode::Sprint, GameMode::Ultra];

pub struct Menu {
    pub screen: MenuScreen,
    pub selected: usize,
    /// Index into RANKED_MODES for the high-score screen
    hs_mode: usize,
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

impl Menu {
    pub fn new() -> Self {
        Self {
            screen: MenuScreen::Main,
            selected: 0,
            hs_mode: 0,
        }
    }

    /// Labels of the main menu entries, in display order
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = GameMode::all()
            .iter()
            .map(|mode| format!("Play {}", mode.name()))
            .collect();
        labels.push("High Scores".to_string());
        labels.push("Quit".to_string());
        labels
    }

    fn item_count(&self) -> usize {
        GameMode::all().len() + 2
    }

    pub fn move_up(&mut self) {
        if self.screen != MenuScreen::Main {
            return;
        }
        let count = self.item_count();
        self.selected = (self.selected + count - 1) % count;
    }

    pub fn move_down(&mut self) {
        if self.screen != MenuScreen::Main {
            return;
        }
        self.selected = (self.selected + 1) % self.item_count();
    }

    /// Cycle the high-score mode tab
    pub fn cycle_left(&mut self) {
        if self.screen == MenuScreen::HighScores {
            self.hs_mode = (self.hs_mode + RANKED_MODES.len() - 1) % RANKED_MODES.len();
        }
    }

    pub fn cycle_right(&mut self) {
        if self.screen == MenuScreen::HighScores {
            self.hs_mode = (self.hs_mode + 1) % RANKED_MODES.len();
        }
    }

    pub fn high_score_mode(&self) -> GameMode {
        RANKED_MODES[self.hs_mode]
    }

    /// Confirm the current selection. Screen changes are handled internally;
    /// anything the app must act on is returned.
    pub fn select(&mut self) -> Option<MenuAction> {
        if self.screen != MenuScreen::Main {
            return None;
        }
        let modes = GameMode::all();
        if self.selected < modes.len() {
            return Some(MenuAction::StartGame(modes[self.selected]));
        }
        if self.selected == modes.len() {
            self.screen = MenuScreen::HighScores;
            return None;
        }
        Some(MenuAction::Quit)
    }

    /// Leave a sub-screen. Returns false when already on the main screen.
    pub fn back(&mut self) -> bool {
        if self.screen == MenuScreen::Main {
            return false;
        }
        self.screen = MenuScreen::Main;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_wraps_both_ways() {
        let mut menu = Menu::new();
        menu.move_up();
        assert_eq!(menu.selected, menu.item_count() - 1);
        menu.move_down();
        assert_eq!(menu.selected, 0);
    }

    #[test]
    fn mode_entries_start_games() {
        let mut menu = Menu::new();
        assert_eq!(
            menu.select(),
            Some(MenuAction::StartGame(GameMode::Marathon))
        );
        menu.selected = 3;
        assert_eq!(menu.select(), Some(MenuAction::StartGame(GameMode::Zen)));
    }

    #[test]
    fn high_scores_entry_switches_screens() {
        let mut menu = Menu::new();
        menu.selected = GameMode::all().len();
        assert_eq!(menu.select(), None);
        assert_eq!(menu.screen, MenuScreen::HighScores);
        assert!(menu.back());
        assert_eq!(menu.screen, MenuScreen::Main);
        assert!(!menu.back());
    }

    #[test]
    fn last_entry_quits() {
        let mut menu = Menu::new();
        menu.selected = menu.item_count() - 1;
        assert_eq!(menu.select(), Some(MenuAction::Quit));
    }

    #[test]
    fn high_score_tabs_cycle_over_ranked_modes() {
        let mut menu = Menu::new();
        menu.screen = MenuScreen::HighScores;
        assert_eq!(menu.high_score_mode(), GameMode::Marathon);
        menu.cycle_right();
        assert_eq!(menu.high_score_mode(), GameMode::Sprint);
        menu.cycle_left();
        menu.cycle_left();
        assert_eq!(menu.high_score_mode(), GameMode::Ultra);
    }
}
