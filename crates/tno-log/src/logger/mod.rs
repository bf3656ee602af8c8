mod caller;
mod config;
mod error;
mod fields;
mod format;
mod log;
mod option;
mod record;
mod rotate;

pub use caller::prettify;
pub use config::{DEFAULT_LOG_DIR, DEFAULT_LOG_FILE_NAME, LoggerConfig};
pub use error::LoggerError;
pub use fields::StaticFields;
pub use format::LoggerFormat;
pub use log::Logger;
pub use option::{
    LoggerOption, apply_options, with_additional_fields, with_color, with_log_dir,
    with_log_file_name, with_production,
};
pub use rotate::{MAX_AGE_DAYS, MAX_BACKUPS, MAX_SIZE_MB, log_file_path};

/// Build a logger from `options` and install it as the global default.
pub fn logger_init(options: &[LoggerOption]) -> Result<(), LoggerError> {
    Logger::build(options)?.init()
}
