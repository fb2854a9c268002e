use crate::error::AppError;
use crate::stats::DEFAULT_CONSISTENCY_TARGET;
use crate::storage::json_store;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "HABIT_CONFIG_PATH";

#[derive(Debug, Clone)]
pub struct Palette {
    pub accent: &'static str,
    pub muted: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub fn accentize(&self, text: &str) -> String {
        if self.accent.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", self.accent, text, self.reset)
        }
    }

    pub fn mutedize(&self, text: &str) -> String {
        if self.muted.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", self.muted, text, self.reset)
        }
    }
}

const NOIR: Palette = Palette {
    accent: "\x1b[38;5;141m",
    muted: "\x1b[38;5;250m",
    reset: "\x1b[0m",
};

const PLAIN: Palette = Palette {
    accent: "",
    muted: "",
    reset: "",
};

/// `noir` colors plain output; every other theme prints uncolored.
pub fn palette_for_theme(theme: Option<&str>) -> Palette {
    match theme.map(canonical_theme_name) {
        Some(name) if name == "noir" => NOIR,
        _ => PLAIN,
    }
}

/// Folds case and the `dark`/`light` aliases into `noir`/`default`.
/// Unknown names pass through lowercased.
pub fn canonical_theme_name(raw: &str) -> String {
    let name = raw.trim().to_ascii_lowercase();
    match name.as_str() {
        "" | "light" => "default".to_string(),
        "dark" => "noir".to_string(),
        _ => name,
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Option<String>,
    /// Completions per habit that count as full consistency.
    #[serde(default)]
    pub consistency_target: Option<u64>,
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Config {
    pub fn consistency_target(&self) -> u64 {
        self.consistency_target
            .unwrap_or(DEFAULT_CONSISTENCY_TARGET)
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub theme: Option<String>,
    pub consistency_target: Option<u64>,
    pub log_level: Option<String>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    json_store::app_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let config: Config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;
    validate(&config)?;
    Ok(normalize_config_theme(config))
}

fn validate(config: &Config) -> Result<(), AppError> {
    if config.consistency_target == Some(0) {
        return Err(AppError::invalid_data(
            "consistency_target must be at least 1",
        ));
    }
    Ok(())
}

fn normalize_config_theme(mut config: Config) -> Config {
    config.theme = config.theme.map(|name| canonical_theme_name(&name));
    config
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if let Some(theme) = overrides.theme.as_ref() {
        merged.theme = Some(canonical_theme_name(theme));
    }

    if let Some(target) = overrides.consistency_target {
        merged.consistency_target = Some(target);
    }

    if let Some(level) = overrides.log_level.as_ref() {
        merged.log_level = Some(level.clone());
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::{
        Config, ConfigOverrides, canonical_theme_name, load_config_from_path,
        load_config_with_fallback_from_path, merge_overrides, palette_for_theme,
    };
    use crate::storage::json_store::tests::temp_path;
    use std::fs;

    #[test]
    fn load_config_missing_returns_defaults_without_error() {
        let path = temp_path("missing-config.json");
        let result = load_config_with_fallback_from_path(&path);

        assert_eq!(result.config, Config::default());
        assert!(result.error.is_none());
        assert_eq!(result.config.consistency_target(), 5);
    }

    #[test]
    fn load_config_invalid_returns_defaults_and_error() {
        let path = temp_path("invalid-config.json");
        fs::write(&path, "{ invalid json ").unwrap();

        let result = load_config_with_fallback_from_path(&path);
        fs::remove_file(&path).ok();

        assert_eq!(result.config, Config::default());
        assert!(result.error.is_some());
    }

    #[test]
    fn load_config_reads_valid_file() {
        let path = temp_path("valid-config.json");
        let content = serde_json::json!({
            "theme": "Dark",
            "consistency_target": 7,
            "log_level": "debug"
        });
        fs::write(&path, serde_json::to_string(&content).unwrap()).unwrap();

        let loaded = load_config_from_path(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded.theme.as_deref(), Some("noir"));
        assert_eq!(loaded.consistency_target(), 7);
        assert_eq!(loaded.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn load_config_rejects_zero_target() {
        let path = temp_path("zero-target.json");
        fs::write(&path, r#"{"consistency_target": 0}"#).unwrap();

        let err = load_config_from_path(&path).unwrap_err();
        fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_data");
    }

    #[test]
    fn merge_overrides_updates_fields() {
        let base = Config {
            theme: Some("default".into()),
            consistency_target: Some(5),
            log_level: None,
        };
        let overrides = ConfigOverrides {
            theme: Some("dark".into()),
            consistency_target: Some(10),
            log_level: Some("info".into()),
        };

        let merged = merge_overrides(&base, &overrides);

        assert_eq!(merged.theme.as_deref(), Some("noir"));
        assert_eq!(merged.consistency_target(), 10);
        assert_eq!(merged.log_level.as_deref(), Some("info"));
        assert_eq!(base.theme.as_deref(), Some("default"));
    }

    #[test]
    fn merge_overrides_with_empty_overrides_returns_clone() {
        let base = Config {
            theme: Some("noir".into()),
            consistency_target: None,
            log_level: Some("warn".into()),
        };

        let merged = merge_overrides(&base, &ConfigOverrides::default());

        assert_eq!(merged, base);
    }

    #[test]
    fn canonical_theme_name_maps_aliases() {
        assert_eq!(canonical_theme_name("Light"), "default");
        assert_eq!(canonical_theme_name(" DARK "), "noir");
        assert_eq!(canonical_theme_name("Noir"), "noir");
        assert_eq!(canonical_theme_name("  "), "default");
        assert_eq!(canonical_theme_name("Oceanic"), "oceanic");
    }

    #[test]
    fn palette_for_theme_returns_palette() {
        let default_palette = palette_for_theme(Some("light"));
        assert!(default_palette.accent.is_empty());
        assert_eq!(default_palette.accentize("Lv 1"), "Lv 1");

        let noir_palette = palette_for_theme(Some("noir"));
        assert_eq!(noir_palette.accent, "\x1b[38;5;141m");
        assert_eq!(noir_palette.mutedize("x"), "\x1b[38;5;250mx\x1b[0m");

        let unknown_palette = palette_for_theme(Some("oceanic"));
        assert!(unknown_palette.accent.is_empty());
        assert!(palette_for_theme(None).muted.is_empty());
        assert_eq!(palette_for_theme(Some("Dark")).accent, "\x1b[38;5;141m");
    }
}
