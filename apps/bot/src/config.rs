//! Environment-supplied configuration. Required values fail fast with a
//! clear diagnostic instead of falling back to placeholder text.

use std::time::Duration;

use anyhow::{Context, Result, bail};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";
pub const DEFAULT_VERCEL_API_BASE: &str = "https://api.vercel.com";
pub const DEFAULT_DEPLOY_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub vercel_token: String,
    pub port: u16,
    pub telegram_api_base: String,
    pub vercel_api_base: String,
    pub deploy_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bot_token = required(&lookup, "BOT_TOKEN")?;
        let vercel_token = required(&lookup, "VERCEL_TOKEN")?;

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("PORT must be a port number, got {raw:?}"))?,
            None => DEFAULT_PORT,
        };
        let deploy_timeout_secs = match lookup("DEPLOY_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("DEPLOY_TIMEOUT_SECS must be a number, got {raw:?}"))?,
            None => DEFAULT_DEPLOY_TIMEOUT_SECS,
        };

        Ok(Self {
            bot_token,
            vercel_token,
            port,
            telegram_api_base: lookup("TELEGRAM_API_BASE")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.into()),
            vercel_api_base: lookup("VERCEL_API_BASE")
                .unwrap_or_else(|| DEFAULT_VERCEL_API_BASE.into()),
            deploy_timeout: Duration::from_secs(deploy_timeout_secs),
        })
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String> {
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => bail!("{name} must be set in the environment"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn load(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars = env(pairs);
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_are_applied() {
        let config = load(&[("BOT_TOKEN", "tg-token"), ("VERCEL_TOKEN", "vc-token")]).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.telegram_api_base, DEFAULT_TELEGRAM_API_BASE);
        assert_eq!(config.vercel_api_base, DEFAULT_VERCEL_API_BASE);
        assert_eq!(config.deploy_timeout, Duration::from_secs(30));
    }

    #[test]
    fn missing_bot_token_fails_with_diagnostic() {
        let err = load(&[("VERCEL_TOKEN", "vc-token")]).unwrap_err();
        assert!(err.to_string().contains("BOT_TOKEN"));
    }

    #[test]
    fn blank_token_is_rejected() {
        let err = load(&[("BOT_TOKEN", "  "), ("VERCEL_TOKEN", "vc-token")]).unwrap_err();
        assert!(err.to_string().contains("BOT_TOKEN"));
    }

    #[test]
    fn overrides_are_honoured() {
        let config = load(&[
            ("BOT_TOKEN", "tg-token"),
            ("VERCEL_TOKEN", "vc-token"),
            ("PORT", "8080"),
            ("TELEGRAM_API_BASE", "http://localhost:9081"),
            ("DEPLOY_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.telegram_api_base, "http://localhost:9081");
        assert_eq!(config.deploy_timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_port_fails() {
        let err = load(&[
            ("BOT_TOKEN", "tg-token"),
            ("VERCEL_TOKEN", "vc-token"),
            ("PORT", "web"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
