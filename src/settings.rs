//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/quadfall/settings.toml (or platform
//! equivalent). A file that fails to parse falls back to defaults; persistence
//! problems never block gameplay.

use crate::mode::GameMode;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Game settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Keybindings
    pub keys: KeyBindings,
    /// Visual settings
    pub visual: VisualSettings,
    /// Gameplay settings
    pub gameplay: GameplaySettings,
    /// Leaderboard username (empty = never submit)
    pub username: String,
    /// Local high scores
    pub high_scores: HighScores,
    /// Lifetime statistics
    pub stats: Stats,
}

/// Key bindings (stored as strings for easy editing)
/// Each action can have one or more keys bound to it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_left: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_right: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub soft_drop: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub hard_drop: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate_cw: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate_ccw: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub hold: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub pause: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub quit: Vec<String>,
}

/// Deserialize keys as either a single string or array of strings
fn deserialize_keys<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct KeysVisitor;

    impl<'de> Visitor<'de> for KeysVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or array of strings")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut keys = Vec::new();
            while let Some(key) = seq.next_element::<String>()? {
                keys.push(key);
            }
            Ok(keys)
        }
    }

    deserializer.deserialize_any(KeysVisitor)
}

/// Serialize keys: single key as string, multiple as array
fn serialize_keys<S>(keys: &Vec<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeSeq;

    if keys.len() == 1 {
        serializer.serialize_str(&keys[0])
    } else {
        let mut seq = serializer.serialize_seq(Some(keys.len()))?;
        for key in keys {
            seq.serialize_element(key)?;
        }
        seq.end()
    }
}

/// Visual settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualSettings {
    /// Ghost piece visibility
    pub show_ghost: bool,
    /// Block style: "solid", "bracket", "round"
    pub block_style: String,
}

/// Gameplay settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplaySettings {
    /// Delayed Auto Shift in milliseconds
    pub das_ms: u64,
    /// Auto Repeat Rate in milliseconds
    pub arr_ms: u64,
}

/// High scores for each ranked mode
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HighScores {
    pub marathon: Vec<ScoreEntry>,
    pub sprint: Vec<ScoreEntry>,
    pub ultra: Vec<ScoreEntry>,
}

/// A single high score entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: u64,
    pub lines: u32,
    pub level: u32,
    /// For Sprint: completion time in milliseconds
    pub time_ms: Option<u64>,
    /// Date as ISO string
    pub date: String,
}

/// Lifetime statistics, updated at every game over
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Stats {
    pub games_played: u32,
    pub total_lines: u32,
    pub best_score: u64,
    pub tetrises: u32,
    pub best_combo: u32,
    pub t_spins: u32,
    pub perfect_clears: u32,
    pub max_level: u32,
    pub time_played_ms: u64,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: vec!["Left".to_string()],
            move_right: vec!["Right".to_string()],
            soft_drop: vec!["Down".to_string()],
            hard_drop: vec!["Space".to_string()],
            rotate_cw: vec!["Up".to_string(), "x".to_string()],
            rotate_ccw: vec!["z".to_string()],
            hold: vec!["c".to_string()],
            pause: vec!["p".to_string(), "Esc".to_string()],
            quit: vec!["q".to_string()],
        }
    }
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            show_ghost: true,
            block_style: "solid".to_string(),
        }
    }
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self {
            das_ms: 170,
            arr_ms: 50,
        }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "quadfall", "quadfall").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from file, or create default
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to file
    pub fn save(&self) -> Result<(), String> {
        let Some(dir) = Self::config_dir() else {
            return Err("Could not determine config directory".to_string());
        };

        let Some(path) = Self::settings_path() else {
            return Err("Could not determine settings path".to_string());
        };

        fs::create_dir_all(&dir).map_err(|e| format!("Failed to create config dir: {}", e))?;

        let contents =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize: {}", e))?;

        fs::write(&path, contents).map_err(|e| format!("Failed to write settings: {}", e))?;

        Ok(())
    }

    /// Record a finished game's score in the per-mode table.
    ///
    /// Marathon/Ultra rank by score; Sprint ranks by completion time (only
    /// finished sprints carry one). Zen games are not recorded.
    pub fn add_score(
        &mut self,
        mode: GameMode,
        score: u64,
        lines: u32,
        level: u32,
        time_ms: Option<u64>,
    ) {
        let entry = ScoreEntry {
            score,
            lines,
            level,
            time_ms,
            date: today(),
        };
        let table = match mode {
            GameMode::Marathon => &mut self.high_scores.marathon,
            GameMode::Sprint => &mut self.high_scores.sprint,
            GameMode::Ultra => &mut self.high_scores.ultra,
            GameMode::Zen => return,
        };
        table.push(entry);
        if mode == GameMode::Sprint {
            table.sort_by_key(|e| e.time_ms.unwrap_or(u64::MAX));
        } else {
            table.sort_by(|a, b| b.score.cmp(&a.score));
        }
        table.truncate(10);
    }

    /// Fold a finished game's numbers into the lifetime statistics
    pub fn record_game(&mut self, score: &crate::score::Score, elapsed_ms: u64) {
        let stats = &mut self.stats;
        stats.games_played += 1;
        stats.total_lines += score.lines;
        stats.best_score = stats.best_score.max(score.points);
        stats.tetrises += score.tetrises;
        stats.best_combo = stats.best_combo.max(score.best_combo);
        stats.t_spins += score.t_spins;
        stats.perfect_clears += score.perfect_clears;
        stats.max_level = stats.max_level.max(score.level);
        stats.time_played_ms += elapsed_ms;
    }

    /// Best recorded score for a mode (best time for Sprint)
    pub fn best_for(&self, mode: GameMode) -> Option<&ScoreEntry> {
        match mode {
            GameMode::Marathon => self.high_scores.marathon.first(),
            GameMode::Sprint => self.high_scores.sprint.first(),
            GameMode::Ultra => self.high_scores.ultra.first(),
            GameMode::Zen => None,
        }
    }
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

impl VisualSettings {
    /// Get the block characters based on style
    pub fn block_chars(&self) -> (&'static str, &'static str) {
        match self.block_style.as_str() {
            "bracket" => ("[]", ".."),
            "round" => ("()", ".."),
            _ => ("██", "░░"), // "solid" or default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::Score;

    #[test]
    fn high_score_tables_stay_sorted_and_bounded() {
        let mut settings = Settings::default();
        for score in [300, 900, 100, 1200, 700, 500, 800, 200, 600, 400, 1100, 50] {
            settings.add_score(GameMode::Marathon, score, 10, 2, None);
        }
        let table = &settings.high_scores.marathon;
        assert_eq!(table.len(), 10);
        assert!(table.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(settings.best_for(GameMode::Marathon).unwrap().score, 1200);
    }

    #[test]
    fn sprint_ranks_by_time() {
        let mut settings = Settings::default();
        settings.add_score(GameMode::Sprint, 0, 40, 5, Some(95_000));
        settings.add_score(GameMode::Sprint, 0, 40, 5, Some(82_000));
        assert_eq!(
            settings.best_for(GameMode::Sprint).unwrap().time_ms,
            Some(82_000)
        );
    }

    #[test]
    fn zen_games_are_not_recorded() {
        let mut settings = Settings::default();
        settings.add_score(GameMode::Zen, 9999, 50, 6, None);
        assert!(settings.best_for(GameMode::Zen).is_none());
        assert!(settings.high_scores.marathon.is_empty());
    }

    #[test]
    fn stats_accumulate_across_games() {
        let mut settings = Settings::default();
        let mut score = Score::new();
        score.points = 1500;
        score.lines = 12;
        score.level = 2;
        score.tetrises = 1;
        score.best_combo = 3;
        settings.record_game(&score, 60_000);
        settings.record_game(&score, 30_000);

        assert_eq!(settings.stats.games_played, 2);
        assert_eq!(settings.stats.total_lines, 24);
        assert_eq!(settings.stats.best_score, 1500);
        assert_eq!(settings.stats.tetrises, 2);
        assert_eq!(settings.stats.best_combo, 3);
        assert_eq!(settings.stats.time_played_ms, 90_000);
    }

    #[test]
    fn settings_round_trip_through_toml() {
        let settings = Settings::default();
        let toml = toml::to_string_pretty(&settings).unwrap();
        let back: Settings = toml::from_str(&toml).unwrap();
        assert_eq!(back.keys.move_left, vec!["Left".to_string()]);
        assert_eq!(back.gameplay.das_ms, 170);
        assert!(back.visual.show_ghost);
    }

    #[test]
    fn single_key_deserializes_from_plain_string() {
        let toml = r#"
            [keys]
            move_left = "a"
            rotate_cw = ["w", "Up"]
        "#;
        let settings: Settings = toml::from_str(toml).unwrap();
        assert_eq!(settings.keys.move_left, vec!["a".to_string()]);
        assert_eq!(
            settings.keys.rotate_cw,
            vec!["w".to_string(), "Up".to_string()]
        );
    }
}
