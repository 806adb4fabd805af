use thiserror::Error;

const DEFAULT_USER_AGENT: &str = "AITA_Video_Generator/1.0";
const DEFAULT_SUBREDDIT: &str = "AmITheAsshole";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
}

/// Reddit API credentials, supplied by the operator through the environment
/// (or a `.env` file).
#[derive(Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
    pub subreddit: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .field("subreddit", &self.subreddit)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &str| -> Result<String, ConfigError> {
            let value = lookup(name).ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))?;
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    name: name.to_string(),
                    message: "cannot be empty".to_string(),
                });
            }
            Ok(value)
        };
        let or_default = |name: &str, default: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            client_id: required("REDDIT_CLIENT_ID")?,
            client_secret: required("REDDIT_CLIENT_SECRET")?,
            user_agent: or_default("REDDIT_USER_AGENT", DEFAULT_USER_AGENT),
            subreddit: or_default("REDDIT_SUBREDDIT", DEFAULT_SUBREDDIT),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn credentials_with_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("REDDIT_CLIENT_ID", "id"),
            ("REDDIT_CLIENT_SECRET", "secret"),
        ]))
        .unwrap();
        assert_eq!(config.client_id, "id");
        assert_eq!(config.client_secret, "secret");
        assert_eq!(config.user_agent, "AITA_Video_Generator/1.0");
        assert_eq!(config.subreddit, "AmITheAsshole");
    }

    #[test]
    fn missing_secret_is_reported_by_name() {
        let err = Config::from_lookup(lookup_from(&[("REDDIT_CLIENT_ID", "id")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref n) if n == "REDDIT_CLIENT_SECRET"));
    }

    #[test]
    fn blank_client_id_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("REDDIT_CLIENT_ID", "  "),
            ("REDDIT_CLIENT_SECRET", "secret"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn debug_output_hides_secret() {
        let config = Config::from_lookup(lookup_from(&[
            ("REDDIT_CLIENT_ID", "id"),
            ("REDDIT_CLIENT_SECRET", "hunter2"),
            ("REDDIT_SUBREDDIT", "AITAH"),
        ]))
        .unwrap();
        let shown = format!("{config:?}");
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("AITAH"));
    }
}
