//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "triage-bot";
const PROJECT_FILES: [&str; 2] = ["triage.toml", ".triage.toml"];
const ENV_PREFIX: &str = "TRIAGE_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `TRIAGE_*` environment variables (`TRIAGE_REDMINE__API_KEY` sets `redmine.api_key`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./triage.toml` or `./.triage.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/triage-bot/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Self::file_figment(config_path);
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        figment.extract().map_err(Box::new)
    }

    /// Load defaults and files only, ignoring the environment.
    pub fn load_files(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::file_figment(config_path).extract().map_err(Box::new)
    }

    fn file_figment(config_path: Option<&PathBuf>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns `$XDG_CONFIG_HOME/triage-bot/config.toml` if set,
    /// otherwise the platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        Self::project_config_in(Path::new("."))
    }

    fn project_config_in(dir: &Path) -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Default directory for rolling log files.
    pub fn log_dir() -> Option<PathBuf> {
        dirs::data_local_dir().map(|d| d.join(APP_DIR).join("logs"))
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");
        println!("  [     ] Environment: {}*", ENV_PREFIX);

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<5}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./triage.toml or ./.triage.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.triage.quorum_count, 2);
        assert_eq!(config.triage.report_id, 134);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("triage-bot"));
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
[triage]
quorum_count = 4

[redmine]
url = "https://redmine.example.org"
"#,
        )
        .unwrap();

        let config = ConfigLoader::load_files(Some(&path)).unwrap();
        assert_eq!(config.triage.quorum_count, 4);
        assert_eq!(config.redmine.url, "https://redmine.example.org");
        assert_eq!(config.redmine.timeout_secs, 30);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[triage]\nquorum_count = \"many\"\n").unwrap();

        assert!(ConfigLoader::load_files(Some(&path)).is_err());
    }

    #[test]
    fn test_project_config_prefers_plain_name() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(ConfigLoader::project_config_in(dir.path()), None);

        std::fs::write(dir.path().join(".triage.toml"), "").unwrap();
        assert_eq!(
            ConfigLoader::project_config_in(dir.path()),
            Some(dir.path().join(".triage.toml"))
        );

        std::fs::write(dir.path().join("triage.toml"), "").unwrap();
        assert_eq!(
            ConfigLoader::project_config_in(dir.path()),
            Some(dir.path().join("triage.toml"))
        );
    }
}
