use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

pub struct BotConfig {
    /// Token allowing the bot to connect to Discord
    pub discord_token: String,
}

/// Load bot config using the calling crate's manifest directory.
#[macro_export]
macro_rules! load_bot_config {
    () => {{
        use $crate::__private::anyhow::Context as _;

        #[cfg(debug_assertions)]
        $crate::__private::dotenvy::from_path(
            std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(".env"),
        )
        .context("Can't find .env file")?;

        Ok::<$crate::config::BotConfig, $crate::__private::anyhow::Error>(
            $crate::config::BotConfig {
                discord_token: $crate::config::required_var("DISCORD_TOKEN")?,
            },
        )
    }};
}

/// Reads a variable that must be present for the bot to start.
pub fn required_var(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("Expected {key} in environment"))
}

/// Reads and parses a variable, falling back to `default` when unset.
pub fn optional_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("Invalid value for {key}: {value:?}")),
        Err(_) => Ok(default),
    }
}
