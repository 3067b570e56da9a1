use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use msisdn_core::{Messages, NormalizerConfig};
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "msisdn";
const CONFIG_FILENAME: &str = "config.toml";

/// Upper bound on configurable MSISDN lengths; matches the width of the
/// storage column.
pub const MAX_COLUMN_WIDTH: usize = 32;

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub normalizer: NormalizerConfig,
    pub messages: Messages,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid country code (digits only): {0:?}")]
    InvalidCountryCode(String),
    #[error("invalid subscriber prefix (digits only): {0:?}")]
    InvalidPrefix(String),
    #[error("invalid length bounds: min {min}, max {max}")]
    InvalidLengthBounds { min: usize, max: usize },
    #[error("invalid example number (digits only): {0:?}")]
    InvalidExample(String),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    normalizer: Option<NormalizerFile>,
    messages: Option<MessagesFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct NormalizerFile {
    default_country_code: Option<String>,
    restrict_country_code: Option<String>,
    check_prefixes: Option<bool>,
    valid_prefixes: Option<Vec<String>>,
    max_length: Option<usize>,
    min_length: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct MessagesFile {
    example: Option<String>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(normalizer) = parsed.normalizer {
        if let Some(code) = normalizer.default_country_code {
            validate_digits(&code).map_err(ConfigError::InvalidCountryCode)?;
            config.normalizer.default_country_code = Some(code);
        }
        if let Some(code) = normalizer.restrict_country_code {
            validate_digits(&code).map_err(ConfigError::InvalidCountryCode)?;
            config.normalizer.restrict_country_code = Some(code);
        }
        if let Some(check) = normalizer.check_prefixes {
            config.normalizer.check_prefixes = check;
        }
        if let Some(prefixes) = normalizer.valid_prefixes {
            for prefix in &prefixes {
                validate_digits(prefix).map_err(ConfigError::InvalidPrefix)?;
            }
            config.normalizer.valid_prefixes = prefixes;
        }
        if let Some(max) = normalizer.max_length {
            config.normalizer.max_length = max;
        }
        if let Some(min) = normalizer.min_length {
            config.normalizer.min_length = min;
        }

        let min = config.normalizer.min_length;
        let max = config.normalizer.max_length;
        if min == 0 || min > max || max > MAX_COLUMN_WIDTH {
            return Err(ConfigError::InvalidLengthBounds { min, max });
        }
    }

    if let Some(messages) = parsed.messages {
        if let Some(example) = messages.example {
            validate_digits(&example).map_err(ConfigError::InvalidExample)?;
            config.messages = Messages::with_example(&example);
        }
    }

    Ok(config)
}

fn validate_digits(value: &str) -> std::result::Result<(), String> {
    if value.is_empty() || !value.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(value.to_string());
    }
    Ok(())
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load_at_path, merge_config, ConfigError, ConfigFile, MessagesFile, NormalizerFile};
    use msisdn_core::NormalizeError;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn restrict_permissions(path: &Path) {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path).expect("metadata").permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms).expect("chmod");
        }
    }

    #[test]
    fn merge_config_applies_normalizer_values() {
        let parsed = ConfigFile {
            normalizer: Some(NormalizerFile {
                default_country_code: Some("27".to_string()),
                restrict_country_code: None,
                check_prefixes: Some(true),
                valid_prefixes: Some(vec!["83".to_string(), "84".to_string()]),
                max_length: Some(12),
                min_length: Some(10),
            }),
            messages: Some(MessagesFile {
                example: Some("27831234567".to_string()),
            }),
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(merged.normalizer.default_country_code.as_deref(), Some("27"));
        assert!(merged.normalizer.check_prefixes);
        assert_eq!(merged.normalizer.min_length, 10);
        assert_eq!(merged.normalizer.max_length, 12);
        assert!(merged
            .messages
            .render(&NormalizeError::TooShort)
            .contains("27831234567"));
    }

    #[test]
    fn merge_config_rejects_non_digit_country_code() {
        let parsed = ConfigFile {
            normalizer: Some(NormalizerFile {
                default_country_code: Some("+27".to_string()),
                ..NormalizerFile::default()
            }),
            messages: None,
        };
        assert!(matches!(
            merge_config(parsed),
            Err(ConfigError::InvalidCountryCode(_))
        ));
    }

    #[test]
    fn merge_config_rejects_inverted_length_bounds() {
        let parsed = ConfigFile {
            normalizer: Some(NormalizerFile {
                min_length: Some(12),
                max_length: Some(11),
                ..NormalizerFile::default()
            }),
            messages: None,
        };
        assert!(matches!(
            merge_config(parsed),
            Err(ConfigError::InvalidLengthBounds { min: 12, max: 11 })
        ));
    }

    #[test]
    fn merge_config_rejects_bounds_beyond_column_width() {
        let parsed = ConfigFile {
            normalizer: Some(NormalizerFile {
                max_length: Some(64),
                ..NormalizerFile::default()
            }),
            messages: None,
        };
        assert!(matches!(
            merge_config(parsed),
            Err(ConfigError::InvalidLengthBounds { .. })
        ));
    }

    #[test]
    fn load_at_path_requires_file_when_requested() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        let err = load_at_path(&missing, true).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_at_path_parses_toml() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "[normalizer]\ndefault_country_code = \"27\"\ncheck_prefixes = true\nvalid_prefixes = [\"83\", \"84\"]\n",
        )
        .expect("write config");
        restrict_permissions(&path);

        let config = load_at_path(&path, true).expect("load").expect("config");
        assert_eq!(config.normalizer.default_country_code.as_deref(), Some("27"));
        assert_eq!(config.normalizer.valid_prefixes, vec!["83", "84"]);
        assert_eq!(config.normalizer.min_length, 11);
    }
}
