use std::fmt::{self, Write as _};

use colored::{ColoredString, Colorize};
use serde_json::{Map, Value};
use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    fmt::{
        FmtContext,
        format::{FormatEvent, FormatFields, Writer},
        time::FormatTime,
    },
    registry::LookupSpan,
};

use crate::logger::{
    caller,
    fields::{FieldVisitor, RESERVED_KEYS, StaticFields},
};

/// RFC3339 timestamp with whole seconds, e.g. `2024-05-01T10:00:00+02:00`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Timestamp {
    offset: UtcOffset,
}

impl Timestamp {
    pub(crate) fn local() -> Self {
        let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
        Self { offset }
    }

    fn render(&self, at: OffsetDateTime) -> Result<String, fmt::Error> {
        let at = at.to_offset(self.offset);
        let at = at.replace_nanosecond(0).unwrap_or(at);
        at.format(&Rfc3339).map_err(|_| fmt::Error)
    }
}

impl FormatTime for Timestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        w.write_str(&self.render(OffsetDateTime::now_utc())?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Style {
    Text { ansi: bool },
    Json { pretty: bool },
}

/// Event formatter shared by every sink: renders caller, timestamp,
/// event fields and the logger's static fields.
#[derive(Debug, Clone)]
pub(crate) struct RecordFormat {
    style: Style,
    timer: Timestamp,
    fields: StaticFields,
}

impl RecordFormat {
    pub(crate) fn new(style: Style, fields: StaticFields) -> Self {
        Self {
            style,
            timer: Timestamp::local(),
            fields,
        }
    }

    fn write_text(
        &self,
        w: &mut Writer<'_>,
        ansi: bool,
        head: &Head<'_>,
        visitor: FieldVisitor,
    ) -> fmt::Result {
        let level = if ansi {
            colorize(head.level).to_string()
        } else {
            head.level.as_str().to_string()
        };
        write!(w, "{} {:>5} [{}@{}", head.time, level, head.func, head.file)?;
        if let Some(line) = head.line {
            write!(w, ":{line}")?;
        }
        w.write_str("]")?;
        if let Some(msg) = visitor.message.as_deref() {
            write!(w, " {msg}")?;
        }

        let mut record = visitor.fields;
        self.fields.inject(&mut record);
        for (k, v) in &record {
            write!(w, " {k}=")?;
            write_text_value(w, v)?;
        }
        writeln!(w)
    }

    fn write_json(
        &self,
        w: &mut Writer<'_>,
        pretty: bool,
        head: &Head<'_>,
        visitor: FieldVisitor,
    ) -> fmt::Result {
        let mut record = Map::new();
        for (k, v) in visitor.fields {
            // event fields never shadow record keys
            if RESERVED_KEYS.contains(&k.as_str()) {
                record.insert(format!("fields.{k}"), v);
            } else {
                record.insert(k, v);
            }
        }
        record.insert("time".into(), Value::from(head.time.as_str()));
        record.insert("level".into(), Value::from(head.level.as_str().to_ascii_lowercase()));
        record.insert("msg".into(), Value::from(visitor.message.unwrap_or_default()));
        record.insert("func".into(), Value::from(head.func));
        record.insert("file".into(), Value::from(head.file));
        if let Some(line) = head.line {
            record.insert("line".into(), Value::from(line));
        }
        record.insert("target".into(), Value::from(head.target));
        self.fields.inject(&mut record);

        let record = Value::Object(record);
        let out = if pretty {
            serde_json::to_string_pretty(&record)
        } else {
            serde_json::to_string(&record)
        };
        writeln!(w, "{}", out.map_err(|_| fmt::Error)?)
    }
}

struct Head<'a> {
    time: String,
    level: &'a Level,
    func: &'a str,
    file: &'a str,
    line: Option<u32>,
    target: &'a str,
}

impl<S, N> FormatEvent<S, N> for RecordFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();

        let mut time = String::new();
        self.timer.format_time(&mut Writer::new(&mut time))?;

        let (func, file) = caller::prettify(
            meta.module_path().unwrap_or_else(|| meta.target()),
            meta.file().unwrap_or_default(),
        );
        let head = Head {
            time,
            level: meta.level(),
            func,
            file,
            line: meta.line(),
            target: meta.target(),
        };

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        match self.style {
            Style::Text { ansi } => self.write_text(&mut writer, ansi, &head, visitor),
            Style::Json { pretty } => self.write_json(&mut writer, pretty, &head, visitor),
        }
    }
}

fn colorize(level: &Level) -> ColoredString {
    match *level {
        Level::ERROR => "ERROR".red(),
        Level::WARN => "WARN".yellow(),
        Level::INFO => "INFO".green(),
        Level::DEBUG => "DEBUG".blue(),
        Level::TRACE => "TRACE".purple(),
    }
}

fn write_text_value(w: &mut Writer<'_>, v: &Value) -> fmt::Result {
    match v {
        Value::String(s) if needs_quoting(s) => write!(w, "{s:?}"),
        Value::String(s) => w.write_str(s),
        other => write!(w, "{other}"),
    }
}

fn needs_quoting(s: &str) -> bool {
    s.is_empty() || s.chars().any(|c| c.is_whitespace() || c == '=' || c == '"')
}
