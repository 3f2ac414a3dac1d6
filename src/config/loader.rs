use std::path::Path;

use config::{Config, File, FileFormat};
use eyre::{Context, Result};

use crate::config::models::GatewayConfig;

/// Load configuration from a file using the config crate
/// Supports multiple formats: YAML, JSON, TOML, etc.
pub async fn load_config(config_path: &str) -> Result<GatewayConfig> {
    load_config_sync(config_path)
}

/// Load configuration synchronously
pub fn load_config_sync(config_path: &str) -> Result<GatewayConfig> {
    let config_path = Path::new(config_path);

    // Determine file format based on extension
    let format = match config_path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => FileFormat::Yaml,
        Some("json") => FileFormat::Json,
        Some("toml") => FileFormat::Toml,
        Some("ini") => FileFormat::Ini,
        _ => FileFormat::Toml, // Default to TOML
    };

    let settings = Config::builder()
        .add_source(File::new(
            config_path
                .to_str()
                .ok_or_else(|| eyre::eyre!("Invalid UTF-8 path: {}", config_path.display()))?,
            format,
        ))
        .build()
        .with_context(|| format!("Failed to build config from {}", config_path.display()))?;

    let gateway_config: GatewayConfig = settings.try_deserialize().with_context(|| {
        format!(
            "Failed to deserialize config from {}",
            config_path.display()
        )
    })?;

    Ok(gateway_config)
}

/// Load configuration from a raw string instead of a file. The gateway
/// constructor accepts either form.
pub fn load_config_str(content: &str, format: FileFormat) -> Result<GatewayConfig> {
    let settings = Config::builder()
        .add_source(File::from_str(content, format))
        .build()
        .context("Failed to build config from string")?;

    let gateway_config: GatewayConfig = settings
        .try_deserialize()
        .context("Failed to deserialize config from string")?;

    Ok(gateway_config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[tokio::test]
    async fn test_load_toml_config() {
        let toml_content = r#"
port = 3000

[rate_limit]
window_ms = 1000
max = 2

[upstreams]
svc1 = "http://localhost:3001"

[[routes]]
prefix = "/api"
upstream = "svc1"
"#;

        let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        write!(temp_file, "{}", toml_content).unwrap();

        let config = load_config(temp_file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.rate_limit.window_ms, 1000);
        assert_eq!(config.rate_limit.max, 2);
        assert_eq!(config.routes.len(), 1);
    }

    #[tokio::test]
    async fn test_load_json_config() {
        let json_content = r#"
{
  "port": 3000,
  "rate_limit": {
    "window_ms": 5000,
    "max": 10
  },
  "upstreams": {
    "svc1": "http://localhost:3001",
    "svc2": "http://localhost:3002"
  },
  "routes": [
    { "prefix": "/api", "upstream": "svc1" }
  ]
}
"#;

        let mut temp_file = NamedTempFile::with_suffix(".json").unwrap();
        write!(temp_file, "{}", json_content).unwrap();

        let config = load_config(temp_file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.upstreams.len(), 2);
        assert_eq!(config.routes.len(), 1);
    }

    #[test]
    fn test_load_config_str_defaults() {
        let config = load_config_str(r#"{"upstreams": {"svc1": "http://x"}}"#, FileFormat::Json)
            .unwrap();
        // Unset fields fall back to their documented defaults
        assert_eq!(config.port, 8080);
        assert_eq!(config.rate_limit.window_ms, 60_000);
        assert_eq!(config.rate_limit.max, 100);
        assert_eq!(config.upstreams.len(), 1);
    }
}
