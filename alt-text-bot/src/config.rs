use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use shared::config::{BotConfig, optional_var, required_var};

const DEFAULT_MODEL: &str = "gpt-4o";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_STATS_PATH: &str = "./stats.toml";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct DescriberConfig {
    pub api_key: String,
    pub model: String,
    /// Base of an OpenAI compatible API, without the trailing endpoint
    pub base_url: String,
    pub timeout: Duration,
}

pub struct Config {
    pub bot: BotConfig,
    pub describer: DescriberConfig,
    pub stats_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let bot = shared::load_bot_config!()?;

        Ok(Self {
            bot,
            describer: DescriberConfig::from_env()?,
            stats_path: optional_var("STATS_PATH", PathBuf::from(DEFAULT_STATS_PATH))?,
        })
    }
}

impl DescriberConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            api_key: required_var("OPENAI_API_KEY")?,
            model: optional_var("OPENAI_MODEL", DEFAULT_MODEL.to_string())?,
            base_url: optional_var("OPENAI_BASE_URL", DEFAULT_BASE_URL.to_string())?
                .trim_end_matches('/')
                .to_string(),
            timeout: Duration::from_secs(optional_var(
                "DESCRIPTION_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
        })
    }
}
