use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("invalid word length at line {line}: {length} characters is not a multiple of 8")]
    InvalidWordLength { line: usize, length: usize },

    #[error("invalid hex digit at line {line}, column {column}: {char:?}")]
    InvalidHexDigit {
        line: usize,
        column: usize,
        char: char,
    },

    #[error("address overflow at line {line}: word at {address:#X} exceeds the 16-bit record address field")]
    AddressOverflow { line: usize, address: u32 },
}

impl FormatError {
    pub fn line(&self) -> usize {
        match self {
            FormatError::InvalidWordLength { line, .. } => *line,
            FormatError::InvalidHexDigit { line, .. } => *line,
            FormatError::AddressOverflow { line, .. } => *line,
        }
    }
}
