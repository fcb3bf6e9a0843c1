//! The persistent game data record

use serde::{Deserialize, Serialize};

/// Lives a fresh game starts with
pub const DEFAULT_LIVES: u32 = 3;

/// Everything about a player's progress that survives a restart.
///
/// Field names on disk are camelCase. Fields missing from an older save
/// take their default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameData {
    pub player_name: String,
    pub player_level: u32,
    pub player_score: u64,
    pub current_lives: u32,
    pub high_score: u64,
}

impl Default for GameData {
    fn default() -> Self {
        Self {
            player_name: "New Player".to_string(),
            player_level: 1,
            player_score: 0,
            current_lives: DEFAULT_LIVES,
            high_score: 0,
        }
    }
}

impl GameData {
    pub fn new(player_name: impl Into<String>, player_level: u32, player_score: u64) -> Self {
        Self {
            player_name: player_name.into(),
            player_level,
            player_score,
            ..Self::default()
        }
    }

    /// Add to the score, carrying the high score along
    pub fn add_score(&mut self, amount: u64) {
        self.player_score = self.player_score.saturating_add(amount);
        self.high_score = self.high_score.max(self.player_score);
    }

    /// Remove one life. Returns false if there were none left.
    pub fn lose_life(&mut self) -> bool {
        if self.current_lives == 0 {
            return false;
        }
        self.current_lives -= 1;
        true
    }

    pub fn is_game_over(&self) -> bool {
        self.current_lives == 0
    }

    /// Start a new run: score and lives reset, name/level/high score kept
    pub fn reset_run(&mut self, lives: u32) {
        self.player_score = 0;
        self.current_lives = lives;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_file_format() {
        let json = serde_json::to_value(GameData::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "playerName": "New Player",
                "playerLevel": 1,
                "playerScore": 0,
                "currentLives": 3,
                "highScore": 0
            })
        );
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let data: GameData =
            serde_json::from_str(r#"{"playerName": "Ada", "playerLevel": 4, "playerScore": 120}"#).unwrap();
        assert_eq!(data.player_name, "Ada");
        assert_eq!(data.player_level, 4);
        assert_eq!(data.current_lives, DEFAULT_LIVES);
        assert_eq!(data.high_score, 0);
    }

    #[test]
    fn test_add_score_tracks_high_score() {
        let mut data = GameData {
            high_score: 50,
            ..GameData::default()
        };
        data.add_score(30);
        assert_eq!(data.high_score, 50);
        data.add_score(30);
        assert_eq!(data.player_score, 60);
        assert_eq!(data.high_score, 60);
    }

    #[test]
    fn test_lose_life_stops_at_zero() {
        let mut data = GameData::default();
        assert!(data.lose_life());
        assert!(data.lose_life());
        assert!(data.lose_life());
        assert!(data.is_game_over());
        assert!(!data.lose_life());
        assert_eq!(data.current_lives, 0);
    }

    #[test]
    fn test_reset_run_keeps_high_score() {
        let mut data = GameData::new("Ada", 2, 0);
        data.add_score(75);
        data.lose_life();
        data.reset_run(DEFAULT_LIVES);
        assert_eq!(data.player_score, 0);
        assert_eq!(data.current_lives, DEFAULT_LIVES);
        assert_eq!(data.high_score, 75);
        assert_eq!(data.player_level, 2);
    }
}
