use std::{io::IsTerminal, path::PathBuf};

use serde_json::{Map, Value};

/// File name used when no [`with_log_file_name`](crate::with_log_file_name) option is given.
pub const DEFAULT_LOG_FILE_NAME: &str = "default";

/// Directory, relative to the working directory, that receives rotated log files.
pub const DEFAULT_LOG_DIR: &str = "app_logs";

/// Mutable configuration assembled from [`LoggerOption`](crate::LoggerOption)s.
///
/// A fresh value is created per build and discarded once the logger exists.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Production mode: JSON to stdout, `WARN` threshold, no file output.
    pub is_production: bool,
    /// Suffix of the rotated file name (`<log_dir>/<YYYYMMDD>_<log_file_name>`).
    pub log_file_name: String,
    /// Static fields merged into every record.
    pub fields: Map<String, Value>,
    pub log_dir: PathBuf,
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            is_production: false,
            log_file_name: DEFAULT_LOG_FILE_NAME.to_string(),
            fields: Map::new(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            use_color: std::io::stdout().is_terminal(),
        }
    }
}
