use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the library side of the tools.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Reader is already open on {}", path.display())]
    AlreadyOpen { path: PathBuf },

    #[error("Reader is not open")]
    NotOpen,

    #[error("{}:{line}: {message}", path.display())]
    Format {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("No records found in {}", path.display())]
    EmptyInput { path: PathBuf },

    #[error("Inconsistent input: {0}")]
    Consistency(String),

    #[error("{tool} not found. Please install it and ensure it's in your PATH")]
    ToolNotFound { tool: String },

    #[error("{tool} failed ({status}): {stderr}")]
    External {
        tool: String,
        status: String,
        stderr: String,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format(path: impl Into<PathBuf>, line: u64, message: impl Into<String>) -> Self {
        Error::Format {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Process exit code for this kind of failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => 1,
            Error::Format { .. } => 3,
            Error::Consistency(_) => 4,
            Error::ToolNotFound { .. } | Error::External { .. } => 5,
            // 2 is left to clap's usage errors.
            Error::Io { .. }
            | Error::AlreadyOpen { .. }
            | Error::NotOpen
            | Error::EmptyInput { .. } => 6,
        }
    }
}

/// Exit code for an error chain produced by the command layer.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<Error>())
        .map(Error::exit_code)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_code_survives_context() {
        let result: anyhow::Result<()> = Err(Error::Consistency("2 != 3".to_string()))
            .context("Unable to calculate coverage depth");
        let err = result.unwrap_err();
        assert_eq!(exit_code_for(&err), 4);
    }

    #[test]
    fn test_exit_code_defaults_to_one() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(exit_code_for(&err), 1);
    }

    #[test]
    fn test_io_exit_code_differs_from_usage_errors() {
        let err = Error::io("missing.fa", std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(err.exit_code(), 6);
        assert_eq!(Error::EmptyInput { path: "empty.fa".into() }.exit_code(), 6);
    }

    #[test]
    fn test_format_message_names_location() {
        let err = Error::format("reads.fa", 7, "header does not start with '>'");
        assert_eq!(err.to_string(), "reads.fa:7: header does not start with '>'");
    }
}
