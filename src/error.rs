use thiserror::Error;

pub type MatResult<T> = Result<T, MatError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MatError {
    #[error(
        "dimension mismatch: expected a {}x{} matrix, got {}x{}",
        expected.0, expected.1, got.0, got.1
    )]
    DimensionMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },
    #[error("tried to construct a {nrows}x{ncols} matrix from a buffer of length {len}")]
    SizeMismatch {
        nrows: usize,
        ncols: usize,
        len: usize,
    },
    #[error("row {row} has {got} elements but row 0 has {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error(
        "a slice of length {len} is too short for a {nrows}x{ncols} view with increment \
         {increment} (needs {required})"
    )]
    SliceTooShort {
        len: usize,
        nrows: usize,
        ncols: usize,
        increment: usize,
        required: usize,
    },
    #[error("matrix view is not contiguous (increment {increment}, major size {major})")]
    NotContiguous { increment: usize, major: usize },
    #[error("archive has no field named {0:?}")]
    MissingField(String),
    #[error("archive field {name:?} is not a {expected}")]
    FieldKind {
        name: String,
        expected: &'static str,
    },
    #[error("archive field {name:?}: value at index {index} does not fit the element type")]
    ElementCast { name: String, index: usize },
}
