//! Haven configuration.
//!
//! Precedence: defaults < TOML file (`HAVEN_CONFIG`, default `config/haven`) < `HAVEN__*`
//! environment < `PUBLIC_URL`. Call `dotenvy::dotenv()` before [`HavenConfig::load`] so a
//! `.env` file feeds the environment layer.
//!
//! | Key | Default | Env |
//! |-----|---------|-----|
//! | app_name | Haven | HAVEN__APP_NAME |
//! | host | 127.0.0.1 | HAVEN__HOST |
//! | port | 5000 | HAVEN__PORT |
//! | public_url | http://localhost:8000 | PUBLIC_URL, HAVEN__PUBLIC_URL |
//! | llm_mode | mock | HAVEN__LLM_MODE ("mock" \| "live") |
//! | llm_api_url | OpenRouter chat completions | HAVEN__LLM_API_URL |
//! | llm_model | google/gemini-flash-1.5 | HAVEN__LLM_MODEL |
//! | temperature | 0.0 | HAVEN__TEMPERATURE |
//! | llm_api_key | (none) | HAVEN__LLM_API_KEY, then OPENROUTER_API_KEY |
//! | quote_url | quotable.io random life/happiness quote | HAVEN__QUOTE_URL |

use crate::error::ConfigError;
use crate::llm::LlmMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "config/haven";
const DEFAULT_APP_NAME: &str = "Haven";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
/// Placeholder base URL for the classification service when `PUBLIC_URL` is unset.
pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:8000";
pub const DEFAULT_LLM_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_LLM_MODEL: &str = "google/gemini-flash-1.5";
pub const DEFAULT_QUOTE_URL: &str =
    "https://api.quotable.io/random?tags=life|happiness&maxLength=50";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HavenConfig {
    pub app_name: String,
    pub host: String,
    pub port: u16,
    /// Base URL of the emotion classification service; `/classify` is appended.
    pub public_url: String,
    pub llm_mode: String,
    pub llm_api_url: String,
    pub llm_model: String,
    pub temperature: f32,
    #[serde(default, skip_serializing)]
    pub llm_api_key: Option<String>,
    /// Upstream for `GET /quote`; the JSON body is passed through unchanged.
    pub quote_url: String,
}

impl Default for HavenConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            public_url: DEFAULT_PUBLIC_URL.to_string(),
            llm_mode: LlmMode::Mock.as_str().to_string(),
            llm_api_url: DEFAULT_LLM_API_URL.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            temperature: 0.0,
            llm_api_key: None,
            quote_url: DEFAULT_QUOTE_URL.to_string(),
        }
    }
}

impl HavenConfig {
    /// Load from `HAVEN_CONFIG` (or `config/haven`) plus environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("HAVEN_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&path))
    }

    /// Load with an explicit config file path. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let built = config::Config::builder()
            .set_default("app_name", DEFAULT_APP_NAME)?
            .set_default("host", DEFAULT_HOST)?
            .set_default("port", DEFAULT_PORT as i64)?
            .set_default("public_url", DEFAULT_PUBLIC_URL)?
            .set_default("llm_mode", LlmMode::Mock.as_str())?
            .set_default("llm_api_url", DEFAULT_LLM_API_URL)?
            .set_default("llm_model", DEFAULT_LLM_MODEL)?
            .set_default("temperature", 0.0_f64)?
            .set_default("quote_url", DEFAULT_QUOTE_URL)?
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix("HAVEN").separator("__"))
            .set_override_option("public_url", env_opt_string("PUBLIC_URL"))?
            .build()?;

        let mut cfg: HavenConfig = built.try_deserialize()?;
        cfg.llm_api_key = cfg
            .llm_api_key
            .take()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .or_else(|| env_opt_string("OPENROUTER_API_KEY"));
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.public_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: "public_url",
                reason: format!("expected an http(s) base URL, got {:?}", self.public_url),
            });
        }
        if LlmMode::parse(&self.llm_mode).is_none() {
            return Err(ConfigError::Invalid {
                key: "llm_mode",
                reason: format!("expected \"mock\" or \"live\", got {:?}", self.llm_mode),
            });
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid {
                key: "temperature",
                reason: format!("{} is outside 0.0..=2.0", self.temperature),
            });
        }
        Ok(())
    }

    /// `<public_url>/classify`, tolerating a trailing slash on the base.
    pub fn classify_url(&self) -> String {
        format!("{}/classify", self.public_url.trim().trim_end_matches('/'))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parsed `llm_mode`. Unvalidated garbage reads as mock; `validate` rejects it at load.
    pub fn llm_mode(&self) -> LlmMode {
        LlmMode::parse(&self.llm_mode).unwrap_or_default()
    }
}

fn env_opt_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
