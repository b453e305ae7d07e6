use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

use moonchat_ai::moonshot::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
}

#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    #[serde(default)]
    server: ServerSection,
    #[serde(default)]
    provider: ProviderSection,
}

#[derive(Debug, Deserialize)]
struct ServerSection {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProviderSection {
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default = "default_base_url")]
    base_url: String,
    #[serde(default = "default_model")]
    model: String,
    #[serde(default = "default_temperature")]
    temperature: f32,
}

impl Default for ProviderSection {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

impl ServerConfig {
    pub fn load() -> anyhow::Result<Self> {
        if let Some(file_config) = load_from_file()? {
            let api_key =
                resolve_api_key(file_config.provider.api_key, env::var("MOONSHOT_API_KEY").ok())?;
            return Ok(Self {
                host: file_config.server.host,
                port: file_config.server.port,
                api_key,
                base_url: file_config.provider.base_url,
                model: file_config.provider.model,
                temperature: file_config.provider.temperature,
            });
        }

        Self::from_env()
    }

    fn from_env() -> anyhow::Result<Self> {
        let host = env::var("MOONCHAT_HOST").unwrap_or_else(|_| default_host());
        let port = env::var("MOONCHAT_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or_else(default_port);
        let api_key = resolve_api_key(None, env::var("MOONSHOT_API_KEY").ok())?;
        let base_url = env::var("MOONSHOT_BASE_URL").unwrap_or_else(|_| default_base_url());
        let model = env::var("MOONSHOT_MODEL").unwrap_or_else(|_| default_model());
        let temperature = env::var("MOONSHOT_TEMPERATURE")
            .ok()
            .and_then(|value| value.parse::<f32>().ok())
            .unwrap_or_else(default_temperature);

        Ok(Self {
            host,
            port,
            api_key,
            base_url,
            model,
            temperature,
        })
    }
}

// A missing credential is a startup error, never a placeholder request.
fn resolve_api_key(
    file_value: Option<String>,
    env_value: Option<String>,
) -> anyhow::Result<String> {
    file_value
        .or(env_value)
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "MOONSHOT_API_KEY is not set; refusing to start without a provider credential"
            )
        })
}

fn load_from_file() -> anyhow::Result<Option<FileConfig>> {
    let config_path = env::var("MOONCHAT_CONFIG").ok();
    let path = if let Some(path) = config_path {
        Some(path)
    } else if Path::new("moonchat.toml").exists() {
        Some("moonchat.toml".to_string())
    } else {
        None
    };

    let Some(path) = path else {
        return Ok(None);
    };

    let contents = fs::read_to_string(&path)
        .map_err(|err| anyhow::anyhow!("Failed to read config {}: {}", path, err))?;
    let parsed: FileConfig = toml::from_str(&contents)
        .map_err(|err| anyhow::anyhow!("Failed to parse config {}: {}", path, err))?;
    Ok(Some(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_fails_closed() {
        assert!(resolve_api_key(None, None).is_err());
        assert!(resolve_api_key(Some("  ".into()), None).is_err());
    }

    #[test]
    fn file_credential_wins_over_environment() {
        let key = resolve_api_key(Some("from-file".into()), Some("from-env".into())).unwrap();
        assert_eq!(key, "from-file");
    }

    #[test]
    fn environment_credential_is_the_fallback() {
        let key = resolve_api_key(None, Some("from-env".into())).unwrap();
        assert_eq!(key, "from-env");
    }

    #[test]
    fn file_config_sections_have_defaults() {
        let parsed: FileConfig = toml::from_str(
            r#"
            [provider]
            api_key = "sk-test"
            model = "moonshot-v1-32k"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.server.host, "0.0.0.0");
        assert_eq!(parsed.server.port, 3000);
        assert_eq!(parsed.provider.api_key.as_deref(), Some("sk-test"));
        assert_eq!(parsed.provider.model, "moonshot-v1-32k");
        assert_eq!(parsed.provider.base_url, DEFAULT_BASE_URL);
    }
}
