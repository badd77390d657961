//! Domain error types.

/// Top-level error type for trendsuite.
#[derive(Debug, thiserror::Error)]
pub enum TrendsuiteError {
    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("malformed panel: {reason}")]
    Panel { reason: String },

    #[error("{name} series misaligned with price panel: {reason}")]
    SeriesMisaligned { name: String, reason: String },

    #[error("empty out-of-sample window: no observations on or after year {start_year}")]
    EmptyOosWindow { start_year: i32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TrendsuiteError> for std::process::ExitCode {
    fn from(err: &TrendsuiteError) -> Self {
        let code: u8 = match err {
            TrendsuiteError::Io(_) => 1,
            TrendsuiteError::ConfigParse { .. }
            | TrendsuiteError::ConfigMissing { .. }
            | TrendsuiteError::ConfigInvalid { .. } => 2,
            TrendsuiteError::Data { .. } => 3,
            TrendsuiteError::Panel { .. } | TrendsuiteError::SeriesMisaligned { .. } => 4,
            TrendsuiteError::EmptyOosWindow { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
