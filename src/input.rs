//! Input handling with DAS (Delayed Auto Shift) and ARR (Auto Repeat Rate)
//!
//! Polling-based: held keys are inferred from repeated key events with a
//! timeout, since key-release events are unreliable on Linux terminals.

use crate::game::Action;
use crate::settings::Settings;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

/// Time after which a key with no repeat event is considered released
const KEY_TIMEOUT: Duration = Duration::from_millis(100);

/// The three actions that auto-repeat while held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeldAction {
    Left = 0,
    Right = 1,
    Down = 2,
}

impl HeldAction {
    fn action(self) -> Action {
        match self {
            HeldAction::Left => Action::MoveLeft,
            HeldAction::Right => Action::MoveRight,
            HeldAction::Down => Action::SoftDrop,
        }
    }
}

#[derive(Debug, Clone)]
struct KeyPressState {
    first_press: Instant,
    last_seen: Instant,
    das_triggered: bool,
    last_arr: Option<Instant>,
}

impl KeyPressState {
    fn new(now: Instant) -> Self {
        Self {
            first_press: now,
            last_seen: now,
            das_triggered: false,
            last_arr: None,
        }
    }
}

/// Key bindings resolved to key codes, multiple keys per action
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub move_left: Vec<KeyCode>,
    pub move_right: Vec<KeyCode>,
    pub soft_drop: Vec<KeyCode>,
    pub hard_drop: Vec<KeyCode>,
    pub rotate_cw: Vec<KeyCode>,
    pub rotate_ccw: Vec<KeyCode>,
    pub hold: Vec<KeyCode>,
    pub pause: Vec<KeyCode>,
    pub quit: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key string into KeyCode
    fn parse_key(s: &str) -> KeyCode {
        match s.to_lowercase().as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "esc" | "escape" => KeyCode::Esc,
            s if s.len() == 1 => KeyCode::Char(s.chars().next().unwrap()),
            _ => KeyCode::Null,
        }
    }

    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter().map(|s| Self::parse_key(s)).collect()
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            move_left: Self::parse_keys(&settings.keys.move_left),
            move_right: Self::parse_keys(&settings.keys.move_right),
            soft_drop: Self::parse_keys(&settings.keys.soft_drop),
            hard_drop: Self::parse_keys(&settings.keys.hard_drop),
            rotate_cw: Self::parse_keys(&settings.keys.rotate_cw),
            rotate_ccw: Self::parse_keys(&settings.keys.rotate_ccw),
            hold: Self::parse_keys(&settings.keys.hold),
            pause: Self::parse_keys(&settings.keys.pause),
            quit: Self::parse_keys(&settings.keys.quit),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Input handler translating key events into engine actions
pub struct InputHandler {
    /// Held-key state, indexed by HeldAction
    held: [Option<KeyPressState>; 3],
    bindings: KeyBindings,
    das: Duration,
    arr: Duration,
}

impl InputHandler {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            held: [None, None, None],
            bindings: KeyBindings::from_settings(settings),
            das: Duration::from_millis(settings.gameplay.das_ms),
            arr: Duration::from_millis(settings.gameplay.arr_ms),
        }
    }

    /// Handle a key press event - returns the immediate actions
    pub fn key_down(&mut self, key: KeyEvent) -> Vec<Action> {
        let now = Instant::now();

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return vec![Action::Quit];
        }

        let code = normalize_key(key.code);

        for (held, opposite) in [
            (HeldAction::Left, Some(HeldAction::Right)),
            (HeldAction::Right, Some(HeldAction::Left)),
            (HeldAction::Down, None),
        ] {
            if self.binding_for(held).contains(&code) {
                let idx = held as usize;
                let fresh = self.held[idx].is_none();
                if fresh {
                    self.held[idx] = Some(KeyPressState::new(now));
                } else if let Some(state) = self.held[idx].as_mut() {
                    state.last_seen = now;
                }
                if let Some(opposite) = opposite {
                    self.held[opposite as usize] = None;
                }
                return if fresh { vec![held.action()] } else { Vec::new() };
            }
        }

        if self.bindings.hard_drop.contains(&code) {
            vec![Action::HardDrop]
        } else if self.bindings.rotate_cw.contains(&code) {
            vec![Action::RotateCW]
        } else if self.bindings.rotate_ccw.contains(&code) {
            vec![Action::RotateCCW]
        } else if self.bindings.hold.contains(&code) {
            vec![Action::Hold]
        } else if self.bindings.pause.contains(&code) {
            vec![Action::Pause]
        } else if self.bindings.quit.contains(&code) {
            vec![Action::Quit]
        } else {
            vec![]
        }
    }

    /// Handle a key release event (may not arrive on every terminal)
    pub fn key_up(&mut self, key: KeyEvent) {
        let code = normalize_key(key.code);
        for held in [HeldAction::Left, HeldAction::Right, HeldAction::Down] {
            if self.binding_for(held).contains(&code) {
                self.held[held as usize] = None;
            }
        }
    }

    /// Update held keys and return repeat actions (call every frame)
    pub fn update(&mut self) -> Vec<Action> {
        let now = Instant::now();
        let (das, arr) = (self.das, self.arr);
        let mut actions = Vec::new();

        for held in [HeldAction::Left, HeldAction::Right, HeldAction::Down] {
            let idx = held as usize;
            let timed_out = self.held[idx]
                .as_ref()
                .is_some_and(|state| now.duration_since(state.last_seen) > KEY_TIMEOUT);
            if timed_out {
                self.held[idx] = None;
                continue;
            }
            if let Some(state) = self.held[idx].as_mut() {
                if repeat_due(state, now, das, arr) {
                    actions.push(held.action());
                }
            }
        }

        actions
    }

    /// Forget all held keys (pause/resume, focus loss)
    pub fn clear(&mut self) {
        self.held = [None, None, None];
    }

    fn binding_for(&self, held: HeldAction) -> &[KeyCode] {
        match held {
            HeldAction::Left => &self.bindings.move_left,
            HeldAction::Right => &self.bindings.move_right,
            HeldAction::Down => &self.bindings.soft_drop,
        }
    }
}

/// DAS/ARR gate: fires once when the DAS window elapses, then at ARR cadence
fn repeat_due(state: &mut KeyPressState, now: Instant, das: Duration, arr: Duration) -> bool {
    if now.duration_since(state.first_press) < das {
        return false;
    }
    if !state.das_triggered {
        state.das_triggered = true;
        state.last_arr = Some(now);
        return true;
    }
    if let Some(last) = state.last_arr {
        if now.duration_since(last) >= arr {
            state.last_arr = Some(now);
            return true;
        }
    }
    false
}

/// Normalize key codes for consistent matching
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn default_bindings_map_to_actions() {
        let mut input = InputHandler::from_settings(&Settings::default());
        assert_eq!(input.key_down(press(KeyCode::Left)), vec![Action::MoveLeft]);
        assert_eq!(input.key_down(press(KeyCode::Char(' '))), vec![Action::HardDrop]);
        assert_eq!(input.key_down(press(KeyCode::Char('z'))), vec![Action::RotateCCW]);
        assert_eq!(input.key_down(press(KeyCode::Char('c'))), vec![Action::Hold]);
        assert_eq!(input.key_down(press(KeyCode::Char('p'))), vec![Action::Pause]);
    }

    #[test]
    fn uppercase_letters_normalize() {
        let mut input = InputHandler::from_settings(&Settings::default());
        assert_eq!(input.key_down(press(KeyCode::Char('Z'))), vec![Action::RotateCCW]);
    }

    #[test]
    fn ctrl_c_quits() {
        let mut input = InputHandler::from_settings(&Settings::default());
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(input.key_down(event), vec![Action::Quit]);
    }

    #[test]
    fn opposite_direction_cancels_held_state() {
        let mut input = InputHandler::from_settings(&Settings::default());
        input.key_down(press(KeyCode::Left));
        assert!(input.held[HeldAction::Left as usize].is_some());
        input.key_down(press(KeyCode::Right));
        assert!(input.held[HeldAction::Left as usize].is_none());
        assert!(input.held[HeldAction::Right as usize].is_some());
    }

    #[test]
    fn repeated_press_events_do_not_double_move() {
        let mut input = InputHandler::from_settings(&Settings::default());
        assert_eq!(input.key_down(press(KeyCode::Left)), vec![Action::MoveLeft]);
        // Terminal auto-repeat sends more press events; only DAS may repeat
        assert_eq!(input.key_down(press(KeyCode::Left)), Vec::<Action>::new());
    }

    #[test]
    fn unbound_keys_do_nothing() {
        let mut input = InputHandler::from_settings(&Settings::default());
        assert_eq!(input.key_down(press(KeyCode::Char('m'))), Vec::<Action>::new());
    }
}
