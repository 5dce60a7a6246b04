//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/tetrs/settings.toml (or platform equivalent).
//! A settings file is only a description: [`Settings::into_config`] checks it
//! and produces the immutable [`GameConfig`] a session runs on.

use crate::error::{ConfigError, SettingsError};
use crate::game::{FAST_FALL_DELAY, GameConfig, SPAWN_POSITION};
use crate::piece::Timing;
use crate::score::ScoringTable;
use crate::tetromino::{Offset, PieceCatalog, PieceDefinition, PieceType, RoundingPolicy};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub board: BoardSettings,
    pub timing: TimingSettings,
    pub progression: ProgressionSettings,
    pub generator: GeneratorSettings,
    pub scoring: ScoringTable,
    /// Full replacement for the standard piece table
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pieces: Vec<PieceSettings>,
}

/// Board size and spawn anchor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    pub width: i32,
    pub height: i32,
    pub spawn_x: i32,
    pub spawn_y: i32,
}

/// Gravity settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Interval between automatic drops at level 1, in milliseconds
    pub step_delay_ms: u64,
    /// Rest time before a failed drop locks, in milliseconds
    pub lock_delay_ms: u64,
    /// Drop interval while fast fall is held, in milliseconds
    pub fast_fall_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionSettings {
    pub lines_per_level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    pub max_consecutive: usize,
    pub seed: Option<u64>,
}

/// One piece of a custom table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceSettings {
    pub piece: PieceType,
    pub rounding: RoundingPolicy,
    pub cells: Vec<Offset>,
    pub kicks: Vec<Vec<Offset>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board: BoardSettings::default(),
            timing: TimingSettings::default(),
            progression: ProgressionSettings::default(),
            generator: GeneratorSettings::default(),
            scoring: ScoringTable::default(),
            pieces: Vec::new(),
        }
    }
}

impl Default for BoardSettings {
    fn default() -> Self {
        let defaults = GameConfig::default();
        Self {
            width: defaults.width,
            height: defaults.height,
            spawn_x: SPAWN_POSITION.0,
            spawn_y: SPAWN_POSITION.1,
        }
    }
}

impl Default for TimingSettings {
    fn default() -> Self {
        let timing = Timing::default();
        Self {
            step_delay_ms: timing.step_delay.as_millis() as u64,
            lock_delay_ms: timing.lock_delay.as_millis() as u64,
            fast_fall_ms: FAST_FALL_DELAY.as_millis() as u64,
        }
    }
}

impl Default for ProgressionSettings {
    fn default() -> Self {
        Self {
            lines_per_level: crate::score::LINES_PER_LEVEL,
        }
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            max_consecutive: crate::bag::MAX_CONSECUTIVE,
            seed: None,
        }
    }
}

impl From<&PieceDefinition> for PieceSettings {
    fn from(def: &PieceDefinition) -> Self {
        Self {
            piece: def.piece_type,
            rounding: def.rounding,
            cells: def.cells.to_vec(),
            kicks: def.wall_kicks.clone(),
        }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "tetrs", "tetrs").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from the default file, or fall back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        match Self::from_path(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring settings file: {}", e);
                Self::default()
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save settings to the default file
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::settings_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };

        // Create directory if needed
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(io_err)?;
        Ok(())
    }

    /// Settings that spell out the standard piece table
    pub fn with_standard_pieces(mut self) -> Self {
        self.pieces = PieceCatalog::standard()
            .iter()
            .map(PieceSettings::from)
            .collect();
        self
    }

    /// Validate and build the session configuration
    pub fn into_config(self) -> Result<GameConfig, ConfigError> {
        let catalog = if self.pieces.is_empty() {
            PieceCatalog::standard()
        } else {
            let defs = self
                .pieces
                .into_iter()
                .map(|p| PieceDefinition::new(p.piece, &p.cells, p.rounding, p.kicks))
                .collect::<Result<Vec<_>, _>>()?;
            PieceCatalog::from_definitions(defs)?
        };

        let config = GameConfig {
            width: self.board.width,
            height: self.board.height,
            spawn: (self.board.spawn_x, self.board.spawn_y),
            timing: Timing {
                step_delay: Duration::from_millis(self.timing.step_delay_ms),
                lock_delay: Duration::from_millis(self.timing.lock_delay_ms),
            },
            fast_fall_delay: Duration::from_millis(self.timing.fast_fall_ms),
            lines_per_level: self.progression.lines_per_level,
            max_consecutive: self.generator.max_consecutive,
            scoring: self.scoring,
            catalog: Arc::new(catalog),
            seed: self.generator.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_standard_config() {
        let config = Settings::default().into_config().unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [board]
            width = 12

            [timing]
            lock_delay_ms = 250

            [generator]
            seed = 99
            "#,
        )
        .unwrap();
        let config = settings.into_config().unwrap();
        assert_eq!(config.width, 12);
        assert_eq!(config.height, 20);
        assert_eq!(config.timing.lock_delay, Duration::from_millis(250));
        assert_eq!(config.timing.step_delay, Duration::from_secs(1));
        assert_eq!(config.seed, Some(99));
    }

    #[test]
    fn test_line_points_override() {
        let settings: Settings = toml::from_str("[scoring]\nline_points = [40, 100, 300, 1200]\n").unwrap();
        let config = settings.into_config().unwrap();
        assert_eq!(config.scoring.base_points(1), 40);
    }

    #[test]
    fn test_negative_delay_does_not_parse() {
        assert!(toml::from_str::<Settings>("[timing]\nlock_delay_ms = -1\n").is_err());
    }

    #[test]
    fn test_zero_step_delay_rejected() {
        let mut settings = Settings::default();
        settings.timing.step_delay_ms = 0;
        assert_eq!(settings.into_config(), Err(ConfigError::StepDelay));
    }

    #[test]
    fn test_oversized_board_rejected() {
        let settings: Settings = toml::from_str("[board]\nwidth = 70000\nheight = 70000\n").unwrap();
        assert!(matches!(
            settings.into_config(),
            Err(ConfigError::BoardTooLarge { .. })
        ));
    }

    #[test]
    fn test_custom_piece_with_three_cells_rejected() {
        let mut settings = Settings::default().with_standard_pieces();
        settings.pieces[5].cells.pop();
        assert_eq!(
            settings.into_config(),
            Err(ConfigError::CellCount {
                piece: PieceType::T,
                found: 3
            })
        );
    }

    #[test]
    fn test_standard_pieces_round_trip_through_toml() {
        let settings = Settings::default().with_standard_pieces();
        let text = toml::to_string_pretty(&settings).unwrap();
        assert!(text.contains("rounding = \"centered-half-cell\""));
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(
            parsed.into_config().unwrap().catalog,
            GameConfig::default().catalog
        );
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");
        let mut settings = Settings::default();
        settings.progression.lines_per_level = 5;
        settings.save_to(&path).unwrap();

        let loaded = Settings::from_path(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "[board]\nwidth = \"wide\"\n").unwrap();
        let err = Settings::from_path(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
        assert!(err.to_string().contains("settings.toml"));
    }
}
