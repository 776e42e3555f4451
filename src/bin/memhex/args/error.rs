use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseArgError {
    #[error("missing command (expected init, reference or list)")]
    MissingCommand,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("invalid option: {0}")]
    InvalidOption(String),
    #[error("missing value for {0}")]
    MissingValue(String),
    #[error("missing path for {0}")]
    MissingPath(String),
    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),
}
