use thiserror::Error;

/// Unified error type for focusdot
#[derive(Error, Debug)]
pub enum FocusdotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("Audio error: {0}")]
    Audio(String),
}

pub type FocusdotResult<T> = Result<T, FocusdotError>;
