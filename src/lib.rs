mod archive;
mod data;
mod dimension;
mod error;
mod layout;
mod matrix;
mod owned;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
mod vector;

use std::fmt;

use num_traits::{Num, NumCast};

pub use crate::archive::{ArchiveValue, Archiver, MatrixArchiver, MemoryArchive, Unarchiver};
pub use crate::data::{BaseData, BaseDataMut};
pub use crate::dimension::{linear_length, Dims};
pub use crate::error::{MatError, MatResult};
pub use crate::layout::{ColumnMajor, Layout, MatrixLayout, RowMajor};
pub use crate::matrix::{
    ColumnMatrixMut, ColumnMatrixRef, MatrixData, MatrixMut, MatrixRef, RowMatrixMut,
    RowMatrixRef,
};
pub use crate::owned::{ColumnMatrix, Matrix, RowMatrix};
pub use crate::vector::{
    ColumnOrientation, ColumnVectorMut, ColumnVectorRef, Orientation, RowOrientation,
    RowVectorMut, RowVectorRef, VectorData, VectorMut, VectorOrientation, VectorRef,
};

/// Build a row-major [`Matrix`] from nested row literals.
///
/// ```
/// let m = stridemat::row_matrix![[1, 2, 3], [4, 5, 6]];
/// assert_eq!(m.at(1, 2), 6);
/// ```
#[macro_export]
macro_rules! row_matrix {
    ($([$($x:expr),* $(,)*]),+ $(,)*) => {{
        $crate::RowMatrix::from([$([$($x,)*],)*])
    }};
}

/// Column-major counterpart of [`row_matrix!`].
#[macro_export]
macro_rules! column_matrix {
    ($([$($x:expr),* $(,)*]),+ $(,)*) => {{
        $crate::ColumnMatrix::from([$([$($x,)*],)*])
    }};
}

/// Absolute tolerance used by `==` between matrices.
pub const DEFAULT_TOLERANCE: f64 = 1.0e-8;

/// Scalar types a matrix can hold and compare.
pub trait Element: Copy + PartialOrd + Num + NumCast + fmt::Debug {
    fn default_tolerance() -> Self {
        <Self as NumCast>::from(DEFAULT_TOLERANCE).unwrap_or_else(Self::zero)
    }

    /// Return `true` if `a` and `b` differ by at most `tolerance`. NaN is never close to
    /// anything.
    fn is_close(a: Self, b: Self, tolerance: Self) -> bool {
        let (hi, lo) = if a >= b {
            (a, b)
        } else if b > a {
            (b, a)
        } else {
            return false;
        };
        // `hi - lo` overflows for integers of opposite sign; `lo + tolerance` cannot.
        if lo < Self::zero() && hi >= Self::zero() {
            hi <= lo + tolerance
        } else {
            hi - lo <= tolerance
        }
    }
}

impl<T> Element for T where T: Copy + PartialOrd + Num + NumCast + fmt::Debug {}
