/**
* filename : config
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::IndicatorError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// 엔진에 등록할 지표 목록. None이면 전체 기본 지표 사용
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub enabled: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from config.json, falling back to defaults
    pub fn load() -> Result<Self, IndicatorError> {
        Self::load_from(Path::new("config.json"))
    }

    pub fn load_from(config_path: &Path) -> Result<Self, IndicatorError> {
        let mut cfg = if config_path.exists() {
            let mut file = File::open(config_path)
                .map_err(|e| IndicatorError::ConfigError(format!("Failed to open config file: {}", e)))?;

            let mut contents = String::new();
            file.read_to_string(&mut contents)
                .map_err(|e| IndicatorError::ConfigError(format!("Failed to read config file: {}", e)))?;

            serde_json::from_str::<Config>(&contents)
                .map_err(|e| IndicatorError::ConfigError(format!("Failed to parse config file: {}", e)))?
        } else {
            Config::default()
        };

        // environment overrides
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    /// Apply environment variable overrides for runtime fields
    fn apply_env_overrides(&mut self) {
        use std::env;
        self.apply_overrides(
            env::var("XINDICATOR_LOG_LEVEL").ok(),
            env::var("XINDICATOR_INDICATORS").ok(),
        );
    }

    fn apply_overrides(&mut self, log_level: Option<String>, indicators: Option<String>) {
        if let Some(v) = log_level { if !v.is_empty() { self.logging.level = v; } }
        if let Some(v) = indicators {
            let names: Vec<String> = v
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
                .collect();
            if !names.is_empty() { self.engine.enabled = Some(names); }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
        }
    }
}
