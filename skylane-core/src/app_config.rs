use serde::Deserialize;
use std::env;
use std::path::Path;
use url::Url;

use crate::codec::CodecConfig;
use crate::{CoreError, CoreResult};

const DEFAULT_BASE_URL: &str = "https://api.duffel.com/";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub codec: CodecConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_page_limit")]
    pub default_page_limit: u32,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_page_limit() -> u32 { 50 }

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_page_limit: default_page_limit(),
        }
    }
}

impl ApiConfig {
    pub fn base_url(&self) -> CoreResult<Url> {
        Url::parse(&self.base_url)
            .map_err(|e| CoreError::InvalidParameter(format!("api.base_url: {e}")))
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(Path::new("config"))
    }

    /// Layered load: `default`, then `{RUN_MODE}` and `local` if present, then
    /// `SKYLANE_*` environment variables (`SKYLANE_CODEC__POLICY=strict`).
    pub fn load_from(dir: &Path) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let file = |name: &str| dir.join(name).to_string_lossy().into_owned();

        let s = config::Config::builder()
            .add_source(config::File::with_name(&file("default")))
            .add_source(config::File::with_name(&file(&run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name(&file("local")).required(false))
            .add_source(
                config::Environment::with_prefix("SKYLANE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }

    pub fn from_toml_str(source: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DecodePolicy;

    #[test]
    fn test_inline_config() {
        let config = Config::from_toml_str(
            r#"
            [codec]
            policy = "strict"
            require_envelope = true

            [api]
            base_url = "https://sandbox.example.com/"
            "#,
        )
        .unwrap();

        assert_eq!(config.codec.policy, DecodePolicy::Strict);
        assert!(config.codec.require_envelope);
        assert_eq!(config.api.default_page_limit, 50);
        assert_eq!(config.api.base_url().unwrap().host_str(), Some("sandbox.example.com"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();

        assert_eq!(config.codec.policy, DecodePolicy::Lenient);
        assert!(!config.codec.require_envelope);
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_bad_base_url() {
        let config = Config::from_toml_str("[api]\nbase_url = \"not a url\"").unwrap();
        assert!(matches!(config.api.base_url(), Err(CoreError::InvalidParameter(_))));
    }
}
