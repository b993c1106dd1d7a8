//! Configuration — required environment variables with placeholder
//! detection, plus an optional `KEY=VALUE` env-file overlay.
//!
//! All four variables are required. A variable left at the placeholder
//! value documented in the env template is treated the same as a missing
//! one, so a copied-but-unedited template fails loudly at startup instead
//! of producing authentication errors every cycle.

use std::collections::HashMap;
use std::path::Path;

use crate::error::ConfigError;

pub const ENV_OPENWEATHER_API_KEY: &str = "OPENWEATHER_API_KEY";
pub const ENV_DATADOG_API_KEY: &str = "DATADOG_API_KEY";
pub const ENV_DATADOG_APP_KEY: &str = "DATADOG_APP_KEY";
pub const ENV_ZIP_CODE: &str = "ZIP_CODE";

/// Placeholder values from the documented env template.
const PLACEHOLDERS: &[(&str, &str)] = &[
    (ENV_OPENWEATHER_API_KEY, "your_openweather_api_key_here"),
    (ENV_DATADOG_API_KEY, "your_datadog_api_key_here"),
    (ENV_DATADOG_APP_KEY, "your_datadog_app_key_here"),
    (ENV_ZIP_CODE, "your_zip_code_here"),
];

/// Validated agent configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub openweather_api_key: String,
    pub datadog_api_key: String,
    pub datadog_app_key: String,
    pub zip_code: String,
}

impl Config {
    /// Load configuration from the process environment, with `env_file`
    /// (if given) consulted for variables the environment does not set.
    pub fn load(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        let overlay = match env_file {
            Some(path) => parse_env_file(path)?,
            None => HashMap::new(),
        };
        Self::resolve(|name| std::env::var(name).ok().or_else(|| overlay.get(name).cloned()))
    }

    /// Build a config from an arbitrary variable lookup.
    ///
    /// Split out from [`Config::load`] so validation can be tested without
    /// mutating the process environment.
    pub fn resolve<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let openweather_api_key = required(&lookup, ENV_OPENWEATHER_API_KEY)?;
        let datadog_api_key = required(&lookup, ENV_DATADOG_API_KEY)?;
        let datadog_app_key = required(&lookup, ENV_DATADOG_APP_KEY)?;
        let zip_code = required(&lookup, ENV_ZIP_CODE)?;

        if zip_code.len() != 5 || !zip_code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::Invalid {
                name: ENV_ZIP_CODE,
                reason: format!("expected 5 digits, got {zip_code:?}"),
            });
        }

        Ok(Self {
            openweather_api_key,
            datadog_api_key,
            datadog_app_key,
            zip_code,
        })
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))?;

    let is_placeholder = PLACEHOLDERS
        .iter()
        .any(|(var, placeholder)| *var == name && value == *placeholder);
    if is_placeholder {
        return Err(ConfigError::Placeholder(name));
    }

    Ok(value)
}

/// Parse a `KEY=VALUE` env file.
///
/// Blank lines and `#` comments are ignored, a leading `export ` is
/// stripped, and values may be single- or double-quoted. Lines without an
/// `=` are skipped rather than rejected, matching shell-sourced env files.
pub fn parse_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::EnvFile {
        path: path.to_path_buf(),
        source,
    })?;

    let mut vars = HashMap::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        vars.insert(key.trim().to_string(), unquote(value.trim()).to_string());
    }
    Ok(vars)
}

fn unquote(value: &str) -> &str {
    let stripped = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')));
    stripped.unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            (ENV_OPENWEATHER_API_KEY, "ow-key"),
            (ENV_DATADOG_API_KEY, "dd-api"),
            (ENV_DATADOG_APP_KEY, "dd-app"),
            (ENV_ZIP_CODE, "02134"),
        ])
    }

    fn resolve_with(env: &HashMap<&str, &str>) -> Result<Config, ConfigError> {
        Config::resolve(|name| env.get(name).map(|v| v.to_string()))
    }

    #[test]
    fn resolve_accepts_valid_config() {
        let config = resolve_with(&full_env()).unwrap();
        assert_eq!(config.zip_code, "02134");
        assert_eq!(config.openweather_api_key, "ow-key");
    }

    #[test]
    fn resolve_rejects_each_missing_variable() {
        for missing in [
            ENV_OPENWEATHER_API_KEY,
            ENV_DATADOG_API_KEY,
            ENV_DATADOG_APP_KEY,
            ENV_ZIP_CODE,
        ] {
            let mut env = full_env();
            env.remove(missing);
            let err = resolve_with(&env).unwrap_err();
            assert!(
                matches!(err, ConfigError::Missing(name) if name == missing),
                "expected Missing({missing}), got {err:?}"
            );
        }
    }

    #[test]
    fn resolve_rejects_placeholder_value() {
        let mut env = full_env();
        env.insert(ENV_DATADOG_API_KEY, "your_datadog_api_key_here");
        let err = resolve_with(&env).unwrap_err();
        assert!(matches!(err, ConfigError::Placeholder(ENV_DATADOG_API_KEY)));
    }

    #[test]
    fn resolve_treats_blank_as_missing() {
        let mut env = full_env();
        env.insert(ENV_ZIP_CODE, "   ");
        let err = resolve_with(&env).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ENV_ZIP_CODE)));
    }

    #[test]
    fn resolve_rejects_malformed_zip() {
        for bad in ["1234", "123456", "0213a", "02134-1234"] {
            let mut env = full_env();
            env.insert(ENV_ZIP_CODE, bad);
            let err = resolve_with(&env).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { name: ENV_ZIP_CODE, .. }),
                "expected Invalid for {bad:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn parse_env_file_handles_comments_quotes_and_export() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("vane-env-test-{}", std::process::id()));
        std::fs::write(
            &path,
            "# comment\n\nOPENWEATHER_API_KEY=abc123\nexport ZIP_CODE=\"02134\"\nDATADOG_API_KEY='dd'\ngarbage line\n",
        )
        .unwrap();

        let vars = parse_env_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(vars.get("OPENWEATHER_API_KEY").unwrap(), "abc123");
        assert_eq!(vars.get("ZIP_CODE").unwrap(), "02134");
        assert_eq!(vars.get("DATADOG_API_KEY").unwrap(), "dd");
        assert_eq!(vars.len(), 3);
    }

    #[test]
    fn parse_env_file_missing_file_is_config_error() {
        let err = parse_env_file(Path::new("/nonexistent/vane.env")).unwrap_err();
        assert!(matches!(err, ConfigError::EnvFile { .. }));
    }

    #[test]
    fn env_overlay_does_not_shadow_process_env() {
        // Config::load prefers the process environment; resolve() models
        // that precedence with a single lookup closure.
        let overlay = HashMap::from([(ENV_ZIP_CODE.to_string(), "99999".to_string())]);
        let env = full_env();
        let config = Config::resolve(|name| {
            env.get(name)
                .map(|v| v.to_string())
                .or_else(|| overlay.get(name).cloned())
        })
        .unwrap();
        assert_eq!(config.zip_code, "02134");
    }
}
