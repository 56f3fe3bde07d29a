use crate::category::Category;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_EMAIL_API_URL: &str = "http://localhost:3001";
pub const DEFAULT_LENGTH_THRESHOLD: usize = 1500;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 5;

/// Environment variable that overrides `email_api_url` at runtime.
pub const EMAIL_API_URL_ENV: &str = "API_BASE_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Generative model used for the AI scan stage.
    pub model: String,
    /// Name of the environment variable holding the Gemini API key. The key
    /// itself never appears in the config file.
    pub api_key_env: String,
    /// Override for the Gemini API base URL. `None` means the public
    /// endpoint; tests point this at a local mock server.
    pub endpoint: Option<String>,
    /// Bound on every outbound HTTP call, in seconds.
    pub timeout_seconds: u64,
    /// Messages longer than this are categorized LONG without an AI scan.
    pub length_threshold: usize,
    /// Category returned when the AI scan fails or returns an unparseable
    /// verdict.
    pub fallback: Category,
    /// Base URL of the email store used to recover subject lines. The
    /// API_BASE_URL environment variable takes precedence when set.
    pub email_api_url: Option<String>,
    /// Pre-filter narrowing rules, evaluated in order after the built-in
    /// length check. First match wins.
    pub rules: Vec<NarrowRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrowRule {
    pub name: String,
    pub criteria: Criteria,
    pub verdict: Category,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Criteria {
    SenderPattern { pattern: String },
    SubjectPattern { pattern: String },
    BodyPattern { pattern: String },
}

impl Default for Config {
    fn default() -> Self {
        Config {
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            endpoint: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            length_threshold: DEFAULT_LENGTH_THRESHOLD,
            fallback: Category::Unfiltered,
            email_api_url: Some(DEFAULT_EMAIL_API_URL.to_string()),
            rules: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Effective email store base URL: API_BASE_URL env var, then the config
    /// value, then the built-in default.
    pub fn email_api_url(&self) -> String {
        std::env::var(EMAIL_API_URL_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| self.email_api_url.clone())
            .unwrap_or_else(|| DEFAULT_EMAIL_API_URL.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_constants() {
        let config = Config::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.length_threshold, 1500);
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.fallback, Category::Unfiltered);
        assert!(config.rules.is_empty());
    }

    #[test]
    fn yaml_round_trip() {
        let mut config = Config::default();
        config.fallback = Category::Geminifail;
        config.rules.push(NarrowRule {
            name: "school senders".to_string(),
            criteria: Criteria::SenderPattern {
                pattern: r".*@okstate\.edu$".to_string(),
            },
            verdict: Category::School,
        });

        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.fallback, Category::Geminifail);
        assert_eq!(parsed.rules.len(), 1);
        assert_eq!(parsed.rules[0].verdict, Category::School);
    }

    #[test]
    fn fallback_parses_from_wire_name() {
        let yaml = "model: gemini-2.5-flash\n\
                    api_key_env: GEMINI_API_KEY\n\
                    endpoint: null\n\
                    timeout_seconds: 5\n\
                    length_threshold: 1500\n\
                    fallback: GEMINIFAIL\n\
                    email_api_url: null\n\
                    rules: []\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.fallback, Category::Geminifail);
    }

    #[test]
    fn email_api_url_falls_back_to_default() {
        let mut config = Config::default();
        config.email_api_url = None;
        // Only meaningful when API_BASE_URL is not set in the test env.
        if std::env::var(EMAIL_API_URL_ENV).is_err() {
            assert_eq!(config.email_api_url(), DEFAULT_EMAIL_API_URL);
        }
    }
}
