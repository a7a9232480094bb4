//! Configuration for the `notif-inspect` binary, loaded from environment.

/// Inspector configuration loaded from `.env` and environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Log level: `error`, `warn`, `info`, `debug`, `trace`. `RUST_LOG` wins when set.
    pub log_level: String,
    /// Stop at the first frame that does not decode instead of counting it.
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            strict: false,
        }
    }
}

impl Config {
    /// Load configuration from environment. Call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigLoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let log_level = lookup("LOG_LEVEL").unwrap_or(defaults.log_level);
        let strict = match lookup("INSPECT_STRICT") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigLoadError::InvalidStrict(raw))?,
            None => defaults.strict,
        };

        Ok(Self { log_level, strict })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Invalid INSPECT_STRICT: {0:?}")]
    InvalidStrict(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigLoadError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(load(&[]).unwrap(), Config::default());
    }

    #[test]
    fn reads_overrides() {
        let config = load(&[("LOG_LEVEL", "debug"), ("INSPECT_STRICT", "Yes")]).unwrap();
        assert_eq!(config.log_level, "debug");
        assert!(config.strict);
    }

    #[test]
    fn rejects_invalid_strict() {
        assert!(matches!(
            load(&[("INSPECT_STRICT", "maybe")]),
            Err(ConfigLoadError::InvalidStrict(v)) if v == "maybe"
        ));
    }

    #[test]
    fn strict_accepts_only_listed_spellings() {
        for (raw, want) in [("true", true), (" 1 ", true), ("NO", false), ("0", false)] {
            assert_eq!(load(&[("INSPECT_STRICT", raw)]).unwrap().strict, want, "{raw:?}");
        }
        for raw in ["on", "off", ""] {
            assert!(
                matches!(
                    load(&[("INSPECT_STRICT", raw)]),
                    Err(ConfigLoadError::InvalidStrict(_))
                ),
                "{raw:?}"
            );
        }
    }
}
