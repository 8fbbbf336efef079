use thiserror::Error;

/// Errors produced while reading a command stream or scoring its records.
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("input ended before the vertex count and ranking capacity were read")]
    MissingParameters,

    #[error("invalid parameters: vertex count {num_verts}, ranking capacity {capacity}")]
    InvalidParameters { num_verts: usize, capacity: usize },

    #[error("line {line}: malformed matrix row: {message}")]
    MalformedRow { line: usize, message: String },

    #[error("line {line}: input ended inside a graph record")]
    UnexpectedEndOfRecord { line: usize },

    #[error("line {line}: unknown command {token:?}")]
    UnknownCommand { line: usize, token: String },
}

impl Error {
    /// Returns true if the error only spoils the current record (or command), so the
    /// stream can continue with the next command.
    pub fn is_record_local(&self) -> bool {
        match self {
            Error::MalformedRow { .. }
            | Error::UnexpectedEndOfRecord { .. }
            | Error::UnknownCommand { .. } => true,
            Error::Io(_) | Error::MissingParameters | Error::InvalidParameters { .. } => false,
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
