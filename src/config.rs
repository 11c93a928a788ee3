use anyhow::{Context, Result};
use ini::{Ini, ParseOption};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name of the credentials file in the user's home directory.
const CONFIG_FILE_NAME: &str = ".jenkinsapi";

/// Contents of the credentials file.
///
/// Every section and key is optional; whatever is missing is left for the
/// command line (or the interactive prompt) to supply.
///
/// The default `~/.jenkinsapi` is an INI file with unquoted values:
///
/// ```ini
/// [auth]
/// user = alice
/// token = 11a2b3...
///
/// [jenkins]
/// url = ci.example.com:8080
/// ```
///
/// Files with a `.toml`, `.json` or `.yaml` extension are read with serde.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub jenkins: JenkinsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Jenkins user name
    pub user: Option<String>,

    /// Jenkins API token
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JenkinsConfig {
    /// Jenkins server, `host[:port]` or a full URL
    pub url: Option<String>,
}

impl Config {
    /// Default location: `~/.jenkinsapi`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from `path`, or from [`Config::default_path`].
    ///
    /// A missing file yields the empty configuration. A file that exists but
    /// cannot be read or parsed is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => {
                    log::debug!("No home directory, using empty configuration");
                    return Ok(Self::default());
                }
            },
        };

        if !path.is_file() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        Self::load_from_path(&path)
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => Self::from_ini(&contents)
                .with_context(|| format!("Failed to parse INI config: {}", path.display())),
        }
    }

    /// Read the `[auth]` and `[jenkins]` sections of an INI file.
    ///
    /// Values are taken literally: no quote stripping, no backslash escapes.
    fn from_ini(contents: &str) -> std::result::Result<Self, ini::ParseError> {
        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(contents, options)?;

        let value = |section: &str, key: &str| {
            ini.section(Some(section))
                .and_then(|props| props.get(key))
                .map(str::to_string)
        };

        Ok(Self {
            auth: AuthConfig {
                user: value("auth", "user"),
                token: value("auth", "token"),
            },
            jenkins: JenkinsConfig {
                url: value("jenkins", "url"),
            },
        })
    }
}
