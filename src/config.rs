use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum ConfigBasis {
    Total,
    DailyAverage,
}

/// Defaults read from a TOML file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) compact: bool,
    #[serde(default)]
    pub(crate) no_color: bool,
    #[serde(default)]
    pub(crate) no_significance: bool,
    #[serde(default)]
    pub(crate) reject_overlap: bool,
    #[serde(default)]
    pub(crate) debug: bool,
    #[serde(default)]
    pub(crate) color: Option<ConfigColorMode>,
    #[serde(default)]
    pub(crate) basis: Option<ConfigBasis>,
    #[serde(default)]
    pub(crate) alpha: Option<f64>,
    #[serde(default)]
    pub(crate) locale: Option<String>,
}

impl Config {
    pub(crate) fn load() -> Self {
        Self::load_from(&Self::get_config_paths())
    }

    /// First path that exists and parses wins
    fn load_from(paths: &[PathBuf]) -> Self {
        for path in paths {
            if !path.exists() {
                continue;
            }
            match Self::read(path) {
                Ok(config) => {
                    tracing::debug!(path = %path.display(), "loaded config");
                    return config;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), "failed to parse config: {e}");
                }
            }
        }

        Self::default()
    }

    fn read(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        toml::from_str::<Config>(&content).map_err(|e| e.to_string())
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/gscdiff/config.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("gscdiff").join("config.toml"));
        }

        // 2. Platform config dir (Application Support on macOS)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("gscdiff").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. ~/.gscdiff.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".gscdiff.toml"));
        }

        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_paths_are_not_empty() {
        let paths = Config::get_config_paths();
        assert!(!paths.is_empty());
        assert!(paths.iter().all(|p| p.to_string_lossy().contains("gscdiff")));
    }

    #[test]
    fn parses_all_keys() {
        let config: Config = toml::from_str(
            r#"
compact = true
no_color = true
no_significance = true
reject_overlap = true
color = "never"
basis = "daily-average"
alpha = 0.1
locale = "de"
"#,
        )
        .unwrap();
        assert!(config.compact);
        assert!(config.reject_overlap);
        assert_eq!(config.color, Some(ConfigColorMode::Never));
        assert_eq!(config.basis, Some(ConfigBasis::DailyAverage));
        assert_eq!(config.alpha, Some(0.1));
        assert_eq!(config.locale.as_deref(), Some("de"));
    }

    #[test]
    fn first_valid_file_wins_and_broken_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        let good = dir.path().join("good.toml");
        let later = dir.path().join("later.toml");
        fs::write(&broken, "compact = [").unwrap();
        fs::write(&good, "basis = \"total\"\nalpha = 0.01\n").unwrap();
        fs::write(&later, "alpha = 0.2\n").unwrap();

        let config = Config::load_from(&[
            dir.path().join("missing.toml"),
            broken,
            good,
            later,
        ]);
        assert_eq!(config.alpha, Some(0.01));
        assert_eq!(config.basis, Some(ConfigBasis::Total));
    }

    #[test]
    fn no_files_gives_defaults() {
        let config = Config::load_from(&[]);
        assert!(!config.compact);
        assert!(config.alpha.is_none());
    }
}
