use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;

/// Pipeline settings, deserialized from a YAML configuration file.
///
/// The file must supply `data.processed_data_path` and
/// `data.output_data_path`; the `logging` section is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub data: DataSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    /// Directory scanned for processed input CSV files.
    pub processed_data_path: PathBuf,
    /// Directory that receives all generated reports, figures and databases.
    pub output_data_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.to_path_buf()))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
