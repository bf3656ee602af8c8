/// Primary (stdout) record format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerFormat {
    /// Human-readable line per record.
    Text,
    /// Pretty-printed JSON object per record.
    Json,
}
