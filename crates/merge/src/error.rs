use std::fmt;

#[derive(Debug)]
pub enum MergeError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (no sources, bad delimiter, cutoff out of range, etc.).
    ConfigValidation(String),
    /// A configured source could not be read or parsed.
    SourceLoad { source: String, message: String },
    /// Source has columns but none of them is the join key.
    MissingKey { source: String, column: String },
    /// Row whose join key is blank. `row` is 1-based, excluding the header.
    BlankKey { source: String, row: usize },
    /// Score cell that is neither empty nor a finite number.
    InvalidScore { user_id: String, column: String, value: String },
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::SourceLoad { source, message } => {
                write!(f, "source '{source}': cannot load: {message}")
            }
            Self::MissingKey { source, column } => {
                write!(f, "source '{source}': missing key column '{column}'")
            }
            Self::BlankKey { source, row } => {
                write!(f, "source '{source}', row {row}: blank key")
            }
            Self::InvalidScore { user_id, column, value } => {
                write!(f, "employee '{user_id}': cannot parse {column} '{value}'")
            }
        }
    }
}

impl std::error::Error for MergeError {}

impl MergeError {
    /// Name of the source this error is attributed to, if any.
    pub fn source_name(&self) -> Option<&str> {
        match self {
            Self::SourceLoad { source, .. }
            | Self::MissingKey { source, .. }
            | Self::BlankKey { source, .. } => Some(source),
            _ => None,
        }
    }
}
