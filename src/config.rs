use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name} base url {value:?}: {source}")]
    BadUrl {
        name: &'static str,
        value: String,
        source: url::ParseError,
    },
    #[error("iterations must be greater than zero")]
    ZeroIterations,
}

/// Browser-like identifier; the CLOB sits behind Cloudflare and rejects
/// obvious non-browser agents.
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

pub const DEFAULT_GAMMA_URL: &str = "https://gamma-api.polymarket.com";
pub const DEFAULT_CLOB_URL: &str = "https://clob.polymarket.com";

#[derive(Clone, Debug, Parser)]
#[command(name = "probe", about = "Round-trip latency probe for the Polymarket CLOB API")]
pub struct ProbeConfig {
    /// Free-form label recorded in the result file, e.g. "eu-west".
    #[arg(long, env = "REGION", default_value = "Unknown")]
    pub region: String,

    /// Skip Gamma discovery and probe this token id directly.
    #[arg(long, env = "TOKEN_ID")]
    pub token_id: Option<String>,

    #[arg(long, default_value_t = 30)]
    pub iterations: u32,

    /// Pause between iterations, in milliseconds.
    #[arg(long, default_value_t = 250)]
    pub delay_ms: u64,

    #[arg(long, default_value = DEFAULT_GAMMA_URL)]
    pub gamma_url: String,

    #[arg(long, default_value = DEFAULT_CLOB_URL)]
    pub clob_url: String,

    /// Directory the result file is written into.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

impl ProbeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("gamma", &self.gamma_url), ("clob", &self.clob_url)] {
            Url::parse(value).map_err(|source| ConfigError::BadUrl {
                name,
                value: value.clone(),
                source,
            })?;
        }
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        Ok(())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Defaults with production endpoints; tests override the URLs.
    pub fn sample() -> Self {
        Self {
            region: "Unknown".into(),
            token_id: None,
            iterations: 30,
            delay_ms: 250,
            gamma_url: DEFAULT_GAMMA_URL.into(),
            clob_url: DEFAULT_CLOB_URL.into(),
            out_dir: PathBuf::from("."),
        }
    }
}
