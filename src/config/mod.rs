//! Configuration management for claimlens.
//!
//! Configuration is read from `~/.config/claimlens/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is
//! created. Environment variables override the file, so the tool also runs
//! from a bare environment (`DASHBOARD_URL`, `LOGIN_URL`, `API_KEY`, ...).

use serde::Deserialize;
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub summarizer: SummarizerConfig,
}

/// The target site: URLs, credentials, and the heuristic knobs used by the
/// authenticator. The selector and indicator lists parameterize the one
/// shared login/extract pipeline instead of hardcoding them per deployment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL, used to resolve relative form actions.
    pub base_url: String,

    /// Protected page to scrape after login.
    pub dashboard_url: String,

    /// Login page holding the credential form.
    pub login_url: String,

    pub username: String,
    pub password: String,

    /// Request timeout in seconds, enforced on every call.
    pub timeout_secs: u64,

    /// CSS selector candidates for the username input, in priority order.
    /// First match wins; no match fails the login attempt.
    pub username_selectors: Vec<String>,

    /// CSS selector candidates for the password input, in priority order.
    pub password_selectors: Vec<String>,

    /// Substrings in the landing URL or body that indicate a logged-in view.
    pub success_indicators: Vec<String>,

    /// Substrings in the landing body that indicate rejected credentials.
    pub error_indicators: Vec<String>,

    /// Substrings that indicate a login prompt is still being shown.
    pub login_prompt_indicators: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            dashboard_url: String::new(),
            login_url: String::new(),
            username: String::new(),
            password: String::new(),
            timeout_secs: 30,
            username_selectors: vec![
                "input[name=\"username\"]".to_string(),
                "input[name=\"email\"]".to_string(),
                "#username".to_string(),
                "input[type=\"text\"]".to_string(),
            ],
            password_selectors: vec![
                "input[name=\"password\"]".to_string(),
                "#password".to_string(),
                "input[type=\"password\"]".to_string(),
            ],
            success_indicators: vec![
                "dashboard".to_string(),
                "cases".to_string(),
                "workflow".to_string(),
            ],
            error_indicators: vec![
                "invalid credentials".to_string(),
                "login failed".to_string(),
                "authentication failed".to_string(),
                "incorrect username or password".to_string(),
            ],
            login_prompt_indicators: vec![
                "login".to_string(),
                "sign in".to_string(),
                "password".to_string(),
            ],
        }
    }
}

impl SiteConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

/// Hosted model settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Chat-completions endpoint. Any OpenAI-compatible API works.
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Page text is silently cut to this many characters before submission.
    pub max_input_chars: usize,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: String::new(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.3,
            max_tokens: 2000,
            max_input_chars: 4000,
        }
    }
}

impl Config {
    /// Load configuration from the default path, then apply environment
    /// variable overrides.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// Missing fields in the config file use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
                path: config_path.clone(),
                source: e,
            })?;
            toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: config_path,
                source: e,
            })?
        } else {
            Self::create_default_config(&config_path)?;
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Get the default config file path: `~/.config/claimlens/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("claimlens").join("config.toml"))
    }

    /// Environment variables take precedence over the config file.
    pub fn apply_env_overrides(&mut self) {
        let overrides: [(&str, &mut String); 7] = [
            ("DASHBOARD_BASE_URL", &mut self.site.base_url),
            ("DASHBOARD_URL", &mut self.site.dashboard_url),
            ("LOGIN_URL", &mut self.site.login_url),
            ("DASHBOARD_USERNAME", &mut self.site.username),
            ("DASHBOARD_PASSWORD", &mut self.site.password),
            ("API_KEY", &mut self.summarizer.api_key),
            ("API_BASE_URL", &mut self.summarizer.api_url),
        ];
        for (var, slot) in overrides {
            if let Ok(value) = env::var(var) {
                if !value.is_empty() {
                    *slot = value;
                }
            }
        }
    }

    /// Settings that must be present before the pipeline can run.
    ///
    /// The external-login-check strategy needs no credentials or login URL,
    /// so those are only required for the form strategy.
    pub fn missing_required(&self, external: bool) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.site.dashboard_url.is_empty() {
            missing.push("site.dashboard_url (DASHBOARD_URL)");
        }
        if self.summarizer.api_key.is_empty() {
            missing.push("summarizer.api_key (API_KEY)");
        }
        if !external {
            if self.site.login_url.is_empty() {
                missing.push("site.login_url (LOGIN_URL)");
            }
            if self.site.username.is_empty() {
                missing.push("site.username (DASHBOARD_USERNAME)");
            }
            if self.site.password.is_empty() {
                missing.push("site.password (DASHBOARD_PASSWORD)");
            }
        }
        missing
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# claimlens configuration
#
# Every value here can be overridden by an environment variable:
#   DASHBOARD_BASE_URL, DASHBOARD_URL, LOGIN_URL,
#   DASHBOARD_USERNAME, DASHBOARD_PASSWORD, API_KEY, API_BASE_URL

[site]
# Base URL of the claims application, used to resolve relative form actions.
base_url = ""

# Protected page to scrape after login, e.g.
# "https://claims.example.com/cases/workflow/2"
dashboard_url = ""

# Login page holding the credential form, e.g.
# "https://claims.example.com/auth/login"
login_url = ""

# Credentials for the form login strategy. Leave empty and use
# `--external` if you authenticate in a separate browser session.
username = ""
password = ""

# Request timeout in seconds.
timeout_secs = 30

# CSS selector candidates for the credential inputs, tried in order.
# The first match wins; if none match, the login attempt fails.
username_selectors = [
    "input[name=\"username\"]",
    "input[name=\"email\"]",
    "#username",
    "input[type=\"text\"]",
]
password_selectors = [
    "input[name=\"password\"]",
    "#password",
    "input[type=\"password\"]",
]

# Login success/failure classification. This is a substring heuristic and
# is known to be fragile; tune the lists for your deployment.
success_indicators = ["dashboard", "cases", "workflow"]
error_indicators = [
    "invalid credentials",
    "login failed",
    "authentication failed",
    "incorrect username or password",
]
login_prompt_indicators = ["login", "sign in", "password"]

[summarizer]
# Any OpenAI-compatible chat-completions endpoint.
api_url = "https://api.openai.com/v1/chat/completions"
api_key = ""
model = "gpt-3.5-turbo"
temperature = 0.3
max_tokens = 2000

# Page text is cut to this many characters before submission.
max_input_chars = 4000
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
