use std::fmt;

use crate::vector::{ColumnOrientation, Orientation, RowOrientation};

/// Runtime tag for a matrix storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixLayout {
    RowMajor,
    ColumnMajor,
}

impl MatrixLayout {
    pub fn transposed(self) -> Self {
        match self {
            MatrixLayout::RowMajor => MatrixLayout::ColumnMajor,
            MatrixLayout::ColumnMajor => MatrixLayout::RowMajor,
        }
    }
}

impl fmt::Display for MatrixLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixLayout::RowMajor => f.write_str("row-major"),
            MatrixLayout::ColumnMajor => f.write_str("column-major"),
        }
    }
}

/// Type-level storage order.
///
/// A layout decides which dimension is *major* (its vectors are contiguous in memory and
/// consecutive ones are `increment` slots apart) and which is *minor*. Every index
/// computation in the crate reduces to
///
/// ```text
/// offset(row, col) = row * row_increment + col * column_increment
/// ```
///
/// so views never need to know which layout they carry beyond the functions below.
pub trait Layout: Copy + Default + fmt::Debug + 'static {
    /// The layout obtained by transposing, i.e. the other one.
    type Transposed: Layout<Transposed = Self>;

    /// Orientation of the contiguous vectors along the major dimension.
    type MajorOrientation: Orientation;

    const KIND: MatrixLayout;

    /// Length of a contiguous major vector.
    fn major_size(nrows: usize, ncols: usize) -> usize;

    /// Number of major vectors.
    fn minor_size(nrows: usize, ncols: usize) -> usize;

    fn row_increment(increment: usize) -> usize;

    fn column_increment(increment: usize) -> usize;

    /// Logical `(row, col)` of element `major_index` of major vector `minor_index`.
    fn coordinates(minor_index: usize, major_index: usize) -> (usize, usize);
}

/// Rows are contiguous; consecutive rows are `increment` apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RowMajor;

/// Columns are contiguous; consecutive columns are `increment` apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ColumnMajor;

impl Layout for RowMajor {
    type Transposed = ColumnMajor;
    type MajorOrientation = RowOrientation;
    const KIND: MatrixLayout = MatrixLayout::RowMajor;

    #[inline]
    fn major_size(_nrows: usize, ncols: usize) -> usize {
        ncols
    }

    #[inline]
    fn minor_size(nrows: usize, _ncols: usize) -> usize {
        nrows
    }

    #[inline]
    fn row_increment(increment: usize) -> usize {
        increment
    }

    #[inline]
    fn column_increment(_increment: usize) -> usize {
        1
    }

    #[inline]
    fn coordinates(minor_index: usize, major_index: usize) -> (usize, usize) {
        (minor_index, major_index)
    }
}

impl Layout for ColumnMajor {
    type Transposed = RowMajor;
    type MajorOrientation = ColumnOrientation;
    const KIND: MatrixLayout = MatrixLayout::ColumnMajor;

    #[inline]
    fn major_size(nrows: usize, _ncols: usize) -> usize {
        nrows
    }

    #[inline]
    fn minor_size(_nrows: usize, ncols: usize) -> usize {
        ncols
    }

    #[inline]
    fn row_increment(_increment: usize) -> usize {
        1
    }

    #[inline]
    fn column_increment(increment: usize) -> usize {
        increment
    }

    #[inline]
    fn coordinates(minor_index: usize, major_index: usize) -> (usize, usize) {
        (major_index, minor_index)
    }
}
