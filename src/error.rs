use thiserror::Error;

/// Every way a catalogue session can fail.
///
/// None of these are recovered from inside the menu loop; they surface at
/// `main` and end the process with a non-zero status.
#[derive(Error, Debug)]
pub enum CatalogueError {
    #[error("cannot load catalogue from {path}: {reason}")]
    Load { path: String, reason: String },

    #[error("column {column:?}: {reason}")]
    InvalidColumn { column: String, reason: String },

    #[error("invalid selection {token:?}: expected an index in 0..{limit}")]
    InvalidSelection { token: String, limit: usize },

    #[error("invalid input {token:?}: expected {expected}")]
    InvalidInput { token: String, expected: &'static str },

    #[error("refill interval is undefined: commute distance or tank range is zero")]
    DivisionByZero,

    #[error("no {what} selected")]
    EmptySelection { what: &'static str },

    #[error("column {0:?} is not in the catalogue")]
    MissingColumn(String),

    #[error("row {row} has no numeric value for {column:?}")]
    MissingValue { column: String, row: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CatalogueError {
    pub fn load(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_input(token: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidInput {
            token: token.into(),
            expected,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogueError>;
