//! Logger configurator on top of `tracing`.
//!
//! ```no_run
//! use tno_log::{Logger, with_additional_fields, with_log_file_name, with_production};
//!
//! let logger = Logger::new(&[
//!     with_production(false),
//!     with_log_file_name("api.log"),
//!     with_additional_fields([("service", "api")]),
//! ]);
//! logger.with_default(|| tracing::info!("ready"));
//! ```
mod logger;
pub use logger::*;
