use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Logger has been already initialized")]
    AlreadyInitialized,
    #[error("Failed to initialize file rotate hook at {}: {reason}", path.display())]
    FileHook { path: PathBuf, reason: String },
}
