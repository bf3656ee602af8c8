use std::{
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing::{Dispatch, error};
use tracing_subscriber::{Layer, filter::LevelFilter, fmt, layer::SubscriberExt};

use crate::logger::{
    config::LoggerConfig,
    error::LoggerError,
    fields::StaticFields,
    format::LoggerFormat,
    option::{LoggerOption, apply_options},
    record::{RecordFormat, Style},
    rotate,
};

/// A fully assembled logger.
///
/// Wraps a [`Dispatch`]; use [`Logger::with_default`] to scope it or
/// [`Logger::init`] to install it process-wide. Cloning is cheap and clones
/// share the same sinks.
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
    level: LevelFilter,
    format: LoggerFormat,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Build a logger from `options` applied over [`LoggerConfig::default`].
    ///
    /// Development: colored text on stdout at `TRACE` plus compact JSON in a
    /// rotating file. Production: pretty JSON on stdout at `WARN`, no file.
    pub fn build(options: &[LoggerOption]) -> Result<Self, LoggerError> {
        Self::from_config(apply_options(options))
    }

    /// Like [`Logger::build`], but a file output failure is fatal: the error is
    /// logged to stderr and the process exits with status 1.
    pub fn new(options: &[LoggerOption]) -> Self {
        match Self::build(options) {
            Ok(logger) => logger,
            Err(e) => fatal(&e),
        }
    }

    pub fn from_config(cfg: LoggerConfig) -> Result<Self, LoggerError> {
        let fields = StaticFields::new(cfg.fields);

        let (level, format, style) = if cfg.is_production {
            (LevelFilter::WARN, LoggerFormat::Json, Style::Json { pretty: true })
        } else {
            (
                LevelFilter::TRACE,
                LoggerFormat::Text,
                Style::Text { ansi: cfg.use_color },
            )
        };

        let stdout_layer = fmt::layer()
            .with_writer(io::stdout)
            .with_ansi(cfg.use_color)
            .event_format(RecordFormat::new(style, fields.clone()))
            .with_filter(level);

        let (log_file, file_layer) = if cfg.is_production {
            (None, None)
        } else {
            let (path, roller) = rotate::open(&cfg.log_dir, &cfg.log_file_name)?;
            let layer = fmt::layer()
                .with_writer(Mutex::new(roller))
                .with_ansi(false)
                .event_format(RecordFormat::new(Style::Json { pretty: false }, fields))
                .with_filter(LevelFilter::TRACE);
            (Some(path), Some(layer))
        };

        let subscriber = tracing_subscriber::registry()
            .with(stdout_layer)
            .with(file_layer);

        Ok(Self {
            dispatch: Dispatch::new(subscriber),
            level,
            format,
            log_file,
        })
    }

    /// Most verbose level emitted on stdout.
    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// Record format on stdout.
    pub fn format(&self) -> LoggerFormat {
        self.format
    }

    /// Active rotating file, `None` in production.
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Run `f` with this logger as the current thread's default.
    pub fn with_default<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Install as the global default for the rest of the process.
    pub fn init(self) -> Result<(), LoggerError> {
        tracing::dispatcher::set_global_default(self.dispatch)
            .map_err(|_| LoggerError::AlreadyInitialized)
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level)
            .field("format", &self.format)
            .field("log_file", &self.log_file)
            .finish_non_exhaustive()
    }
}

fn fatal(e: &LoggerError) -> ! {
    let stderr = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(false)
        .event_format(RecordFormat::new(
            Style::Text { ansi: false },
            StaticFields::default(),
        ));
    let dispatch = Dispatch::new(tracing_subscriber::registry().with(stderr));
    tracing::dispatcher::with_default(&dispatch, || {
        error!(fatal = true, error = %e, "failed to initialize file rotate hook");
    });
    std::process::exit(1)
}
