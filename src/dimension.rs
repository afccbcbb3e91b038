#[inline(always)]
pub fn stride_offset(n: usize, stride: usize) -> usize {
    n * stride
}

/// Return the number of storage slots spanned by a `nrows` by `ncols` window whose
/// rows are `row_inc` apart and whose columns are `col_inc` apart.
///
/// Empty windows span nothing. Otherwise the span runs from element `(0, 0)` up to and
/// including element `(nrows - 1, ncols - 1)`.
pub fn linear_length(nrows: usize, ncols: usize, row_inc: usize, col_inc: usize) -> usize {
    if nrows == 0 || ncols == 0 {
        0
    } else {
        stride_offset(nrows - 1, row_inc) + stride_offset(ncols - 1, col_inc) + 1
    }
}

/// Shape and increment of a matrix.
///
/// The increment is the distance between the starts of consecutive major vectors. Which
/// dimension is major is decided by the [`Layout`](crate::Layout) the dims are paired with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Dims {
    nrows: usize,
    ncols: usize,
    increment: usize,
}

impl Dims {
    pub fn new(nrows: usize, ncols: usize, increment: usize) -> Self {
        Self {
            nrows,
            ncols,
            increment,
        }
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn size(&self) -> usize {
        self.nrows * self.ncols
    }

    pub fn increment(&self) -> usize {
        self.increment
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Swap rows and columns. The increment is untouched since the buffer does not move.
    pub fn transposed(&self) -> Self {
        Self {
            nrows: self.ncols,
            ncols: self.nrows,
            increment: self.increment,
        }
    }
}
