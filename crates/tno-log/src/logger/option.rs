use std::{fmt, path::PathBuf, sync::Arc};

use serde_json::{Map, Value};

use crate::logger::config::LoggerConfig;

/// Deferred mutation of a [`LoggerConfig`].
///
/// Options are applied in the order supplied, so later options win over
/// earlier ones touching the same field. They hold no state of their own
/// and can be reused across any number of builds.
#[derive(Clone)]
pub struct LoggerOption(Arc<dyn Fn(&mut LoggerConfig) + Send + Sync>);

impl LoggerOption {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&mut LoggerConfig) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    #[inline]
    pub fn apply(&self, cfg: &mut LoggerConfig) {
        (self.0)(cfg)
    }
}

impl fmt::Debug for LoggerOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LoggerOption(..)")
    }
}

/// Switch between production (`true`) and development (`false`) output.
pub fn with_production(is_production: bool) -> LoggerOption {
    LoggerOption::custom(move |cfg| cfg.is_production = is_production)
}

/// Set the suffix of the rotated log file. Not validated; an empty name is kept as-is.
pub fn with_log_file_name(name: impl Into<String>) -> LoggerOption {
    let name = name.into();
    LoggerOption::custom(move |cfg| cfg.log_file_name = name.clone())
}

/// Replace the static fields attached to every record.
pub fn with_additional_fields<I, K, V>(fields: I) -> LoggerOption
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    let fields: Map<String, Value> = fields
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();
    LoggerOption::custom(move |cfg| cfg.fields = fields.clone())
}

/// Directory for rotated log files, `app_logs` by default.
pub fn with_log_dir(dir: impl Into<PathBuf>) -> LoggerOption {
    let dir = dir.into();
    LoggerOption::custom(move |cfg| cfg.log_dir = dir.clone())
}

/// Force ANSI colors on stdout on or off.
pub fn with_color(use_color: bool) -> LoggerOption {
    LoggerOption::custom(move |cfg| cfg.use_color = use_color)
}

/// Fold `options` over the default configuration.
pub fn apply_options(options: &[LoggerOption]) -> LoggerConfig {
    let mut cfg = LoggerConfig::default();
    for opt in options {
        opt.apply(&mut cfg);
    }
    cfg
}
