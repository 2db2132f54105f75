// Configuration loading and parsing (league.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use kickline_core::LeagueRules;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub scoring: ScoringConfig,
    pub ladder: LadderConfig,
    pub db_path: String,
}

impl Config {
    /// League constants for the engine.
    pub fn rules(&self) -> LeagueRules {
        LeagueRules {
            regular_season_rounds: self.league.regular_season_rounds,
            dead_cert_bonus: self.scoring.dead_cert_bonus,
            dead_cert_penalty: self.scoring.dead_cert_penalty,
            win_points: self.ladder.win_points,
            draw_points: self.ladder.draw_points,
            cache_freshness_minutes: self.ladder.cache_freshness_minutes,
        }
    }
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire league.toml file.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
    scoring: ScoringConfig,
    ladder: LadderConfig,
    database: DatabaseSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    pub regular_season_rounds: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    pub dead_cert_bonus: i32,
    pub dead_cert_penalty: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LadderConfig {
    pub win_points: u32,
    pub draw_points: u32,
    pub cache_freshness_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
struct DatabaseSection {
    path: String,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load and validate `config/league.toml` under `base_dir`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let league_path = base_dir.join("config").join("league.toml");
    let text = read_file(&league_path)?;
    let file: LeagueFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: league_path.clone(),
        source: e,
    })?;

    let config = Config {
        league: file.league,
        scoring: file.scoring,
        ladder: file.ladder,
        db_path: file.database.path,
    };

    validate(&config)?;

    Ok(config)
}

/// Reference league shipped with the binary.
const BUNDLED_LEAGUE: &str = include_str!("../defaults/league.toml");

/// Create `config/league.toml` under `base_dir` if it does not exist yet.
///
/// The content comes from `base_dir/defaults/league.toml` when present,
/// otherwise from the reference league built into the binary. An existing
/// file is never overwritten. Returns the path written, if any.
pub fn ensure_league_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join("league.toml");
    if target.exists() {
        return Ok(None);
    }

    let local_defaults = base_dir.join("defaults").join("league.toml");
    let content = if local_defaults.is_file() {
        read_file(&local_defaults)?
    } else {
        BUNDLED_LEAGUE.to_string()
    };

    let copy_error = |message: String| ConfigError::DefaultsCopyError { message };
    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir)
            .map_err(|e| copy_error(format!("failed to create {}: {e}", dir.display())))?;
    }
    std::fs::write(&target, content)
        .map_err(|e| copy_error(format!("failed to write {}: {e}", target.display())))?;

    Ok(Some(target))
}

/// Loads config relative to the current working directory, creating
/// `config/league.toml` from the defaults first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_league_file(&cwd)?;
    load_config_from(&cwd)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn invalid(field: &str, message: String) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message,
    }
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.regular_season_rounds == 0 {
        return Err(invalid(
            "league.regular_season_rounds",
            "must be greater than 0".into(),
        ));
    }

    let scoring_fields: &[(&str, i32)] = &[
        ("scoring.dead_cert_bonus", config.scoring.dead_cert_bonus),
        ("scoring.dead_cert_penalty", config.scoring.dead_cert_penalty),
    ];
    for (name, val) in scoring_fields {
        if *val <= 0 {
            return Err(invalid(name, format!("must be > 0, got {val}")));
        }
    }

    let ladder = &config.ladder;
    if ladder.win_points <= ladder.draw_points {
        return Err(invalid(
            "ladder.win_points",
            format!(
                "must be greater than draw_points ({}), got {}",
                ladder.draw_points, ladder.win_points
            ),
        ));
    }
    if ladder.cache_freshness_minutes <= 0 {
        return Err(invalid(
            "ladder.cache_freshness_minutes",
            format!("must be > 0, got {}", ladder.cache_freshness_minutes),
        ));
    }

    if config.db_path.trim().is_empty() {
        return Err(invalid("database.path", "must not be empty".into()));
    }

    Ok(())
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Path to the kickline-cli crate root, which holds `defaults/`.
    fn crate_root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    }

    /// Fresh temp dir with `config/league.toml` holding `content`.
    fn dir_with_league(name: &str, content: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config/league.toml"), content).unwrap();
        tmp
    }

    fn default_league() -> String {
        fs::read_to_string(crate_root().join("defaults/league.toml")).unwrap()
    }

    fn expect_field(err: ConfigError, expected: &str) {
        match err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn default_file_maps_to_default_rules() {
        let tmp = dir_with_league("kickline_config_defaults", &default_league());
        let config = load_config_from(&tmp).expect("defaults should load");
        assert_eq!(config.league.name, "Kickline Fantasy League");
        assert_eq!(config.db_path, "kickline.db");
        assert_eq!(config.rules(), LeagueRules::default());
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_rounds() {
        let text = default_league().replace("regular_season_rounds = 21", "regular_season_rounds = 0");
        let tmp = dir_with_league("kickline_config_zero_rounds", &text);
        expect_field(load_config_from(&tmp).unwrap_err(), "league.regular_season_rounds");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_non_positive_penalty() {
        let text = default_league().replace("dead_cert_penalty = 12", "dead_cert_penalty = -12");
        let tmp = dir_with_league("kickline_config_penalty", &text);
        expect_field(load_config_from(&tmp).unwrap_err(), "scoring.dead_cert_penalty");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_draw_worth_a_win() {
        let text = default_league().replace("draw_points = 2", "draw_points = 4");
        let tmp = dir_with_league("kickline_config_draw", &text);
        expect_field(load_config_from(&tmp).unwrap_err(), "ladder.win_points");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_freshness() {
        let text =
            default_league().replace("cache_freshness_minutes = 15", "cache_freshness_minutes = 0");
        let tmp = dir_with_league("kickline_config_freshness", &text);
        expect_field(load_config_from(&tmp).unwrap_err(), "ladder.cache_freshness_minutes");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_league_toml() {
        let tmp = std::env::temp_dir().join("kickline_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();

        match load_config_from(&tmp).unwrap_err() {
            ConfigError::FileNotFound { path } => assert!(path.ends_with("league.toml")),
            other => panic!("expected FileNotFound, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = dir_with_league("kickline_config_invalid", "this is not valid [[[ toml");
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with("league.toml")),
            other => panic!("expected ParseError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_league_file_uses_bundled_defaults() {
        let tmp = std::env::temp_dir().join("kickline_config_bundled");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        let written = ensure_league_file(&tmp).expect("should succeed");
        assert_eq!(written, Some(tmp.join("config/league.toml")));
        let config = load_config_from(&tmp).expect("bundled league should load");
        assert_eq!(config.rules(), LeagueRules::default());
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_league_file_prefers_local_defaults_and_never_overwrites() {
        let tmp = std::env::temp_dir().join("kickline_config_local");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        let local = default_league().replace("regular_season_rounds = 21", "regular_season_rounds = 18");
        fs::write(tmp.join("defaults/league.toml"), local).unwrap();

        assert!(ensure_league_file(&tmp).unwrap().is_some());
        assert_eq!(load_config_from(&tmp).unwrap().league.regular_season_rounds, 18);

        fs::write(tmp.join("config/league.toml"), "# custom\n").unwrap();
        assert!(ensure_league_file(&tmp).unwrap().is_none());
        assert_eq!(
            fs::read_to_string(tmp.join("config/league.toml")).unwrap(),
            "# custom\n"
        );
        let _ = fs::remove_dir_all(&tmp);
    }
}
