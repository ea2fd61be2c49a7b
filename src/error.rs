use miette::Diagnostic;
use thiserror::Error;

/// Main error type for dtk operations
#[derive(Error, Diagnostic, Debug)]
pub enum DtkError {
    #[error("IO error: {0}")]
    #[diagnostic(code(dtk::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(dtk::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(dtk::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(dtk::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Build error: {message}")]
    #[diagnostic(code(dtk::build))]
    Build {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Merge error: {message}")]
    #[diagnostic(code(dtk::merge))]
    Merge {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, DtkError>;
