use super::toml_config::{LoggingConfig, SensorConfig, TomlConfig};
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "cad-probe")]
#[command(about = "Upload a CAD file (STEP/IGES/STL) and get its geometry back as JSON")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory for in-flight uploads (created if missing)
    #[arg(long)]
    pub upload_dir: Option<String>,

    #[arg(long)]
    pub max_body_bytes: Option<usize>,

    #[arg(long, help = "Disable the simulated sensor feed")]
    pub no_sensors: bool,

    #[arg(long)]
    pub sensor_interval_ms: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    /// TOML file (or defaults) with command line flags applied on top.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        // 命令列覆蓋設定
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = &self.upload_dir {
            config.upload.dir = dir.clone();
        }
        if let Some(limit) = self.max_body_bytes {
            config.upload.max_body_bytes = Some(limit);
        }

        if self.no_sensors || self.sensor_interval_ms.is_some() {
            let sensors = config.sensors.get_or_insert(SensorConfig {
                enabled: true,
                interval_ms: None,
            });
            if self.no_sensors {
                sensors.enabled = false;
            }
            if let Some(ms) = self.sensor_interval_ms {
                sensors.interval_ms = Some(ms);
            }
        }

        if self.verbose || self.json_logs {
            let logging = config.logging.get_or_insert(LoggingConfig {
                verbose: None,
                json: None,
            });
            if self.verbose {
                logging.verbose = Some(true);
            }
            if self.json_logs {
                logging.json = Some(true);
            }
        }

        Ok(config)
    }
}
