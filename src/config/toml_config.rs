use crate::core::ConfigProvider;
use crate::utils::error::{CadError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;
pub const DEFAULT_SENSOR_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    pub sensors: Option<SensorConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub dir: String,
    pub max_body_bytes: Option<usize>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: DEFAULT_UPLOAD_DIR.to_string(),
            max_body_bytes: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    pub enabled: bool,
    pub interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CadError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CadError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${UPLOAD_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CadError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        crate::utils::validation::validate_non_empty_string("server.host", &self.server.host)?;
        crate::utils::validation::validate_range("server.port", self.server.port, 1, u16::MAX)?;
        crate::utils::validation::validate_path("upload.dir", &self.upload.dir)?;

        if let Some(limit) = self.upload.max_body_bytes {
            crate::utils::validation::validate_positive_number("upload.max_body_bytes", limit, 1)?;
        }

        if let Some(interval) = self.sensors.as_ref().and_then(|s| s.interval_ms) {
            crate::utils::validation::validate_range("sensors.interval_ms", interval, 10, 3_600_000)?;
        }

        Ok(())
    }

    pub fn verbose_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.verbose).unwrap_or(false)
    }

    pub fn json_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn upload_dir(&self) -> &str {
        &self.upload.dir
    }

    fn max_body_bytes(&self) -> usize {
        self.upload.max_body_bytes.unwrap_or(DEFAULT_MAX_BODY_BYTES)
    }

    fn sensors_enabled(&self) -> bool {
        // 沒寫 [sensors] 就預設開啟
        self.sensors.as_ref().map(|s| s.enabled).unwrap_or(true)
    }

    fn sensor_interval(&self) -> Duration {
        Duration::from_millis(
            self.sensors
                .as_ref()
                .and_then(|s| s.interval_ms)
                .unwrap_or(DEFAULT_SENSOR_INTERVAL_MS),
        )
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
