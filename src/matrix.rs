use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut, Range};

use num_traits::Zero;

use crate::data::{BaseData, BaseDataMut};
use crate::dimension::{linear_length, stride_offset, Dims};
use crate::error::{MatError, MatResult};
use crate::layout::{ColumnMajor, Layout, MatrixLayout, RowMajor};
use crate::vector::{
    ColumnVectorMut, ColumnVectorRef, RowVectorMut, RowVectorRef, VectorData, VectorMut,
    VectorRef,
};
use crate::Element;

/// A two dimensional matrix over storage `S` with storage order `L`.
///
/// The same type backs owning matrices (`S = Vec<T>`, see [`Matrix`](crate::Matrix)),
/// read-only views (`S = &[T]`) and mutable views (`S = &mut [T]`):
///
/// ```text
///              |<------ increment ------>|
///              |<-- ncols -->|
///              +-------------+
/// row 0     -> | a0 a1 a2 a3 | a4 a5 a6   ^
/// row 1     -> | b0 b1 b2 b3 | b4 b5 b6   |
/// row 2     -> | c0 c1 c2 c3 | c4 c5 c6 nrows
/// row 3     -> | d0 d1 d2 d3 |            v
///              +-------------+
/// ```
///
/// The slice always begins at element `(0, 0)` and ends right after element
/// `(nrows - 1, ncols - 1)`.
#[derive(Clone, Copy, Default)]
pub struct MatrixData<S, L> {
    data: S,
    dims: Dims,
    _layout: PhantomData<L>,
}

pub type MatrixRef<'a, T, L> = MatrixData<&'a [T], L>;
pub type MatrixMut<'a, T, L> = MatrixData<&'a mut [T], L>;

pub type RowMatrixRef<'a, T> = MatrixRef<'a, T, RowMajor>;
pub type ColumnMatrixRef<'a, T> = MatrixRef<'a, T, ColumnMajor>;
pub type RowMatrixMut<'a, T> = MatrixMut<'a, T, RowMajor>;
pub type ColumnMatrixMut<'a, T> = MatrixMut<'a, T, ColumnMajor>;

fn span<L: Layout>(dims: Dims) -> usize {
    let increment = dims.increment();
    linear_length(
        dims.nrows(),
        dims.ncols(),
        L::row_increment(increment),
        L::column_increment(increment),
    )
}

fn vector_range(start: usize, len: usize, stride: usize) -> Range<usize> {
    if len == 0 {
        0..0
    } else {
        start..start + stride_offset(len - 1, stride) + 1
    }
}

fn check_increment<L: Layout>(nrows: usize, ncols: usize, increment: usize) {
    let major = L::major_size(nrows, ncols);
    assert!(
        increment >= major,
        "increment {increment} is smaller than the major size {major} of a {nrows}x{ncols} \
         {} matrix",
        L::KIND
    );
}

impl<'a, T, L: Layout> MatrixRef<'a, T, L> {
    /// Construct a dense view over `data`, which must hold exactly `nrows * ncols`
    /// elements in the storage order of `L`.
    pub fn new(data: &'a [T], nrows: usize, ncols: usize) -> MatResult<Self> {
        if data.len() != nrows * ncols {
            return Err(MatError::SizeMismatch {
                nrows,
                ncols,
                len: data.len(),
            });
        }
        let dims = Dims::new(nrows, ncols, L::major_size(nrows, ncols));
        Ok(Self::from_parts(data, dims))
    }

    /// Construct a strided view over `data`, shrinking the slice to the span it needs.
    ///
    /// Returns an error if `data` is too short to hold the last element.
    ///
    /// # Panics
    ///
    /// Panics if `increment` is smaller than the major size.
    pub fn with_increment(
        data: &'a [T],
        nrows: usize,
        ncols: usize,
        increment: usize,
    ) -> MatResult<Self> {
        check_increment::<L>(nrows, ncols, increment);
        let dims = Dims::new(nrows, ncols, increment);
        let required = span::<L>(dims);
        match data.get(..required) {
            Some(data) => Ok(Self::from_parts(data, dims)),
            None => Err(MatError::SliceTooShort {
                len: data.len(),
                nrows,
                ncols,
                increment,
                required,
            }),
        }
    }

    /// Like [`sub_matrix`](MatrixData::sub_matrix) but keeps the lifetime of the
    /// underlying buffer instead of borrowing `self`.
    pub fn into_sub_matrix(
        self,
        first_row: usize,
        first_col: usize,
        nrows: usize,
        ncols: usize,
    ) -> MatrixRef<'a, T, L> {
        let (range, dims) = self.window(first_row, first_col, nrows, ncols);
        let data: &'a [T] = self.data;
        MatrixData::from_parts(&data[range], dims)
    }
}

impl<'a, T, L: Layout> MatrixMut<'a, T, L> {
    /// Mutable counterpart of [`MatrixRef::new`].
    pub fn new_mut(data: &'a mut [T], nrows: usize, ncols: usize) -> MatResult<Self> {
        if data.len() != nrows * ncols {
            return Err(MatError::SizeMismatch {
                nrows,
                ncols,
                len: data.len(),
            });
        }
        let dims = Dims::new(nrows, ncols, L::major_size(nrows, ncols));
        Ok(Self::from_parts(data, dims))
    }

    /// Mutable counterpart of [`MatrixRef::with_increment`].
    ///
    /// # Panics
    ///
    /// Panics if `increment` is smaller than the major size.
    pub fn with_increment_mut(
        data: &'a mut [T],
        nrows: usize,
        ncols: usize,
        increment: usize,
    ) -> MatResult<Self> {
        check_increment::<L>(nrows, ncols, increment);
        let dims = Dims::new(nrows, ncols, increment);
        let required = span::<L>(dims);
        if data.len() >= required {
            Ok(Self::from_parts(&mut data[..required], dims))
        } else {
            Err(MatError::SliceTooShort {
                len: data.len(),
                nrows,
                ncols,
                increment,
                required,
            })
        }
    }

    /// Like [`sub_matrix_mut`](MatrixData::sub_matrix_mut) but consumes the view so the
    /// result keeps the lifetime of the underlying buffer.
    pub fn into_sub_matrix(
        self,
        first_row: usize,
        first_col: usize,
        nrows: usize,
        ncols: usize,
    ) -> MatrixMut<'a, T, L> {
        let (range, dims) = self.window(first_row, first_col, nrows, ncols);
        let data: &'a mut [T] = self.data;
        MatrixData::from_parts(&mut data[range], dims)
    }
}

//////////////////////
// Read-only access //
//////////////////////

impl<T, S, L> MatrixData<S, L>
where
    S: BaseData<Elem = T>,
    L: Layout,
{
    pub(crate) fn from_parts(data: S, dims: Dims) -> Self {
        debug_assert_eq!(data.len(), span::<L>(dims));
        Self {
            data,
            dims,
            _layout: PhantomData,
        }
    }

    pub(crate) fn into_storage(self) -> S {
        self.data
    }

    pub fn nrows(&self) -> usize {
        self.dims.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.dims.ncols()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.dims.shape()
    }

    pub fn size(&self) -> usize {
        self.dims.size()
    }

    pub fn increment(&self) -> usize {
        self.dims.increment()
    }

    pub fn dims(&self) -> Dims {
        self.dims
    }

    pub fn layout(&self) -> MatrixLayout {
        L::KIND
    }

    pub fn major_size(&self) -> usize {
        L::major_size(self.nrows(), self.ncols())
    }

    pub fn minor_size(&self) -> usize {
        L::minor_size(self.nrows(), self.ncols())
    }

    pub fn row_increment(&self) -> usize {
        L::row_increment(self.increment())
    }

    pub fn column_increment(&self) -> usize {
        L::column_increment(self.increment())
    }

    pub fn is_contiguous(&self) -> bool {
        self.increment() == self.major_size()
    }

    /// The underlying slice, including gaps between major vectors.
    pub fn as_slice(&self) -> &[T] {
        self.data.as_slice()
    }

    #[inline]
    pub(crate) fn offset(&self, row: usize, col: usize) -> usize {
        stride_offset(row, self.row_increment()) + stride_offset(col, self.column_increment())
    }

    #[inline]
    fn check_bounds(&self, row: usize, col: usize) {
        assert!(
            row < self.nrows(),
            "row {row} is out of bounds (max: {})",
            self.nrows()
        );
        assert!(
            col < self.ncols(),
            "col {col} is out of bounds (max: {})",
            self.ncols()
        );
    }

    /// Return the element at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.nrows()` or `col >= self.ncols()`.
    pub fn at(&self, row: usize, col: usize) -> T
    where
        T: Copy,
    {
        self[(row, col)]
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.nrows() && col < self.ncols() {
            self.data.as_slice().get(self.offset(row, col))
        } else {
            None
        }
    }

    fn major_range(&self, index: usize) -> Range<usize> {
        let major = self.major_size();
        vector_range(stride_offset(index, self.increment()), major, 1)
    }

    pub(crate) fn major_slice(&self, index: usize) -> &[T] {
        debug_assert!(index < self.minor_size());
        &self.data.as_slice()[self.major_range(index)]
    }

    /// Copy all elements into a vector in the storage order of `L`.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        if self.is_contiguous() {
            return self.data.as_slice().to_vec();
        }
        let mut v = Vec::with_capacity(self.size());
        for i in 0..self.minor_size() {
            v.extend_from_slice(self.major_slice(i));
        }
        v
    }

    /// Copy all elements into a vector in row-major order, whatever the layout.
    pub fn to_row_major_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut v = Vec::with_capacity(self.size());
        for row in self.row_iter() {
            v.extend(row.iter().cloned());
        }
        v
    }

    /// Compare element `(r, c)` of both matrices, whatever their layouts. Different
    /// shapes are never equal.
    pub fn equals<S2, L2>(&self, other: &MatrixData<S2, L2>, tolerance: T) -> bool
    where
        T: Element,
        S2: BaseData<Elem = T>,
        L2: Layout,
    {
        if self.shape() != other.shape() {
            return false;
        }
        (0..self.nrows()).all(|r| {
            (0..self.ncols()).all(|c| T::is_close(self[(r, c)], other[(r, c)], tolerance))
        })
    }

    pub fn as_view(&self) -> MatrixRef<'_, T, L> {
        MatrixData::from_parts(self.data.as_slice(), self.dims)
    }

    fn window(
        &self,
        first_row: usize,
        first_col: usize,
        nrows: usize,
        ncols: usize,
    ) -> (Range<usize>, Dims) {
        assert!(
            first_row + nrows <= self.nrows(),
            "rows {first_row}..{} do not fit in a matrix with {} rows",
            first_row + nrows,
            self.nrows()
        );
        assert!(
            first_col + ncols <= self.ncols(),
            "columns {first_col}..{} do not fit in a matrix with {} columns",
            first_col + ncols,
            self.ncols()
        );
        let dims = Dims::new(nrows, ncols, self.increment());
        let len = span::<L>(dims);
        let range = if len == 0 {
            0..0
        } else {
            let start = self.offset(first_row, first_col);
            start..start + len
        };
        (range, dims)
    }

    /// Return a view of the `nrows` by `ncols` window whose top-left corner is
    /// `(first_row, first_col)`. The window keeps the increment of `self`.
    ///
    /// # Panics
    ///
    /// Panics if the window does not fit inside `self`.
    pub fn sub_matrix(
        &self,
        first_row: usize,
        first_col: usize,
        nrows: usize,
        ncols: usize,
    ) -> MatrixRef<'_, T, L> {
        let (range, dims) = self.window(first_row, first_col, nrows, ncols);
        MatrixData::from_parts(&self.data.as_slice()[range], dims)
    }

    /// Return row `index` as a strided vector.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.nrows()`.
    pub fn row(&self, index: usize) -> RowVectorRef<'_, T> {
        assert!(
            index < self.nrows(),
            "tried to access row {index} of a matrix with {} rows",
            self.nrows()
        );
        let stride = self.column_increment();
        let range = vector_range(self.offset(index, 0), self.ncols(), stride);
        VectorData::from_parts(&self.data.as_slice()[range], self.ncols(), stride)
    }

    /// Return column `index` as a strided vector.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.ncols()`.
    pub fn column(&self, index: usize) -> ColumnVectorRef<'_, T> {
        assert!(
            index < self.ncols(),
            "tried to access column {index} of a matrix with {} columns",
            self.ncols()
        );
        let stride = self.row_increment();
        let range = vector_range(self.offset(0, index), self.nrows(), stride);
        VectorData::from_parts(&self.data.as_slice()[range], self.nrows(), stride)
    }

    pub fn diagonal(&self) -> ColumnVectorRef<'_, T> {
        let len = self.nrows().min(self.ncols());
        let stride = self.row_increment() + self.column_increment();
        let range = vector_range(0, len, stride);
        VectorData::from_parts(&self.data.as_slice()[range], len, stride)
    }

    /// Return major vector `index`: a row for row-major matrices, a column for
    /// column-major ones. Major vectors are always contiguous.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.minor_size()`.
    pub fn major_vector(&self, index: usize) -> VectorRef<'_, T, L::MajorOrientation> {
        assert!(
            index < self.minor_size(),
            "tried to access major vector {index} of a matrix with {} of them",
            self.minor_size()
        );
        VectorData::from_parts(self.major_slice(index), self.major_size(), 1)
    }

    /// View a contiguous matrix as a single column vector in storage order.
    pub fn as_vector(&self) -> MatResult<ColumnVectorRef<'_, T>> {
        if !self.is_contiguous() {
            return Err(MatError::NotContiguous {
                increment: self.increment(),
                major: self.major_size(),
            });
        }
        let data = self.data.as_slice();
        Ok(VectorData::from_parts(data, data.len(), 1))
    }

    /// Zero-copy transpose with the opposite layout.
    pub fn transpose(&self) -> MatrixRef<'_, T, L::Transposed> {
        MatrixData::from_parts(self.data.as_slice(), self.dims.transposed())
    }

    /// Transpose by value. For owning matrices this reinterprets the buffer in place.
    pub fn into_transpose(self) -> MatrixData<S, L::Transposed> {
        MatrixData::from_parts(self.data, self.dims.transposed())
    }

    pub fn row_iter<'a>(&'a self) -> impl ExactSizeIterator<Item = RowVectorRef<'a, T>> + 'a
    where
        T: 'a,
    {
        (0..self.nrows()).map(move |i| self.row(i))
    }

    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }
}

////////////////////
// Mutable access //
////////////////////

impl<T, S, L> MatrixData<S, L>
where
    S: BaseDataMut<Elem = T>,
    L: Layout,
{
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.data.as_slice_mut()
    }

    /// Return a mutable reference to the element at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.nrows()` or `col >= self.ncols()`.
    pub fn at_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self[(row, col)]
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        if row < self.nrows() && col < self.ncols() {
            let offset = self.offset(row, col);
            self.data.as_slice_mut().get_mut(offset)
        } else {
            None
        }
    }

    pub(crate) fn major_slice_mut(&mut self, index: usize) -> &mut [T] {
        debug_assert!(index < self.minor_size());
        let range = self.major_range(index);
        &mut self.data.as_slice_mut()[range]
    }

    /// Set every element to `value`. Slots between major vectors are left alone.
    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        for i in 0..self.minor_size() {
            self.major_slice_mut(i).fill(value.clone());
        }
    }

    /// Set every element to the next value of `generator`, in storage order.
    pub fn generate<F>(&mut self, mut generator: F)
    where
        F: FnMut() -> T,
    {
        for i in 0..self.minor_size() {
            self.major_slice_mut(i)
                .iter_mut()
                .for_each(|x| *x = generator());
        }
    }

    pub fn reset(&mut self)
    where
        T: Zero + Clone,
    {
        self.fill(T::zero());
    }

    /// Overwrite `self` with the contents of `other`, which may use either layout.
    ///
    /// Returns an error, without writing anything, if the shapes differ.
    pub fn copy_from<S2, L2>(&mut self, other: &MatrixData<S2, L2>) -> MatResult<()>
    where
        T: Clone,
        S2: BaseData<Elem = T>,
        L2: Layout,
    {
        if self.shape() != other.shape() {
            return Err(MatError::DimensionMismatch {
                expected: self.shape(),
                got: other.shape(),
            });
        }
        if L::KIND == L2::KIND {
            // Same shape and layout: the major vectors line up one to one.
            for i in 0..self.minor_size() {
                self.major_slice_mut(i)
                    .clone_from_slice(other.major_slice(i));
            }
        } else {
            for r in 0..self.nrows() {
                for c in 0..self.ncols() {
                    self[(r, c)] = other[(r, c)].clone();
                }
            }
        }
        Ok(())
    }

    pub fn as_view_mut(&mut self) -> MatrixMut<'_, T, L> {
        let dims = self.dims;
        MatrixData::from_parts(self.data.as_slice_mut(), dims)
    }

    /// Mutable counterpart of [`sub_matrix`](MatrixData::sub_matrix).
    pub fn sub_matrix_mut(
        &mut self,
        first_row: usize,
        first_col: usize,
        nrows: usize,
        ncols: usize,
    ) -> MatrixMut<'_, T, L> {
        let (range, dims) = self.window(first_row, first_col, nrows, ncols);
        MatrixData::from_parts(&mut self.data.as_slice_mut()[range], dims)
    }

    pub fn row_mut(&mut self, index: usize) -> RowVectorMut<'_, T> {
        assert!(
            index < self.nrows(),
            "tried to access row {index} of a matrix with {} rows",
            self.nrows()
        );
        let (len, stride) = (self.ncols(), self.column_increment());
        let range = vector_range(self.offset(index, 0), len, stride);
        VectorData::from_parts(&mut self.data.as_slice_mut()[range], len, stride)
    }

    pub fn column_mut(&mut self, index: usize) -> ColumnVectorMut<'_, T> {
        assert!(
            index < self.ncols(),
            "tried to access column {index} of a matrix with {} columns",
            self.ncols()
        );
        let (len, stride) = (self.nrows(), self.row_increment());
        let range = vector_range(self.offset(0, index), len, stride);
        VectorData::from_parts(&mut self.data.as_slice_mut()[range], len, stride)
    }

    pub fn diagonal_mut(&mut self) -> ColumnVectorMut<'_, T> {
        let len = self.nrows().min(self.ncols());
        let stride = self.row_increment() + self.column_increment();
        let range = vector_range(0, len, stride);
        VectorData::from_parts(&mut self.data.as_slice_mut()[range], len, stride)
    }

    pub fn major_vector_mut(&mut self, index: usize) -> VectorMut<'_, T, L::MajorOrientation> {
        assert!(
            index < self.minor_size(),
            "tried to access major vector {index} of a matrix with {} of them",
            self.minor_size()
        );
        let len = self.major_size();
        VectorData::from_parts(self.major_slice_mut(index), len, 1)
    }

    pub fn transpose_mut(&mut self) -> MatrixMut<'_, T, L::Transposed> {
        let dims = self.dims.transposed();
        MatrixData::from_parts(self.data.as_slice_mut(), dims)
    }
}

/// Return a reference to the element at `(row, col)`.
///
/// # Panics
///
/// Panics if `row >= self.nrows()` or `col >= self.ncols()`.
impl<S, L> Index<(usize, usize)> for MatrixData<S, L>
where
    S: BaseData,
    L: Layout,
{
    type Output = S::Elem;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        self.check_bounds(row, col);
        &self.data.as_slice()[self.offset(row, col)]
    }
}

impl<S, L> IndexMut<(usize, usize)> for MatrixData<S, L>
where
    S: BaseDataMut,
    L: Layout,
{
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        self.check_bounds(row, col);
        let offset = self.offset(row, col);
        &mut self.data.as_slice_mut()[offset]
    }
}

/// Equality within [`Element::default_tolerance`], across layouts.
impl<T, S, S2, L, L2> PartialEq<MatrixData<S2, L2>> for MatrixData<S, L>
where
    T: Element,
    S: BaseData<Elem = T>,
    S2: BaseData<Elem = T>,
    L: Layout,
    L2: Layout,
{
    fn eq(&self, other: &MatrixData<S2, L2>) -> bool {
        self.equals(other, T::default_tolerance())
    }
}

impl<S, L> fmt::Debug for MatrixData<S, L>
where
    S: BaseData,
    S::Elem: fmt::Debug,
    L: Layout,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} {} ", self.nrows(), self.ncols(), L::KIND)?;
        f.write_str("[")?;
        for (i, row) in self.row_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.debug_list().entries(row.iter()).finish()?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::{row_matrix, ColumnMatrix, Matrix, RowMatrix};

    // Create a matrix with the following pattern:
    // ```text
    //       0         1         2 ...   ncols-1
    //   ncols   ncols+1   ncols+2 ... 2*ncols-1
    // ...
    // ```
    fn create_test_matrix<L: Layout>(nrows: usize, ncols: usize) -> Matrix<usize, L> {
        Matrix::from_fn(nrows, ncols, |r, c| r * ncols + c)
    }

    fn check_logical<S, L>(m: &MatrixData<S, L>, f: impl Fn(usize, usize) -> usize)
    where
        S: BaseData<Elem = usize>,
        L: Layout,
    {
        for r in 0..m.nrows() {
            for c in 0..m.ncols() {
                assert_eq!(m[(r, c)], f(r, c), "failed on (row, col) = ({r}, {c})");
            }
        }
    }

    #[test]
    fn test_two_by_three() {
        let m = row_matrix![[1, 2, 3], [4, 5, 6]];
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.at(1, 2), 6);
        assert_eq!(m.layout(), MatrixLayout::RowMajor);

        let t = m.transpose();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.layout(), MatrixLayout::ColumnMajor);
        assert_eq!(t.at(2, 1), 6);
        assert_eq!(t.at(0, 1), 4);

        assert_eq!(m.diagonal().to_vec(), vec![1, 5]);
        assert_eq!(t.diagonal().to_vec(), vec![1, 5]);
    }

    #[test]
    fn test_empty() {
        let a = RowMatrix::<f64>::zeros(0, 0);
        let b = ColumnMatrix::<f64>::zeros(0, 0);
        assert!(a.to_vec().is_empty());
        assert!(a.to_row_major_vec().is_empty());
        assert!(a.equals(&RowMatrix::<f64>::default(), 0.0));
        assert!(a.equals(&b, 0.0));
        assert_eq!(a, b);
        assert!(a.is_contiguous());
        assert!(a.diagonal().is_empty());
        assert_eq!(a.row_iter().len(), 0);

        // Degenerate but non-empty shapes are fine too.
        let c = RowMatrix::<f64>::zeros(3, 0);
        assert_eq!(c.size(), 0);
        assert!(c.row(2).is_empty());
        assert!(c.major_vector(1).is_empty());
        assert_ne!(a, c);
    }

    #[test]
    fn test_layout_policy_accessors() {
        let m = create_test_matrix::<RowMajor>(2, 3);
        assert_eq!(m.major_size(), 3);
        assert_eq!(m.minor_size(), 2);
        assert_eq!(m.row_increment(), 3);
        assert_eq!(m.column_increment(), 1);
        assert_eq!(m.increment(), 3);

        let m = create_test_matrix::<ColumnMajor>(2, 3);
        assert_eq!(m.major_size(), 2);
        assert_eq!(m.minor_size(), 3);
        assert_eq!(m.row_increment(), 1);
        assert_eq!(m.column_increment(), 2);
        assert_eq!(m.increment(), 2);
    }

    #[test]
    fn test_fill() {
        for (nrows, ncols) in [(0, 0), (1, 1), (2, 3), (4, 1), (5, 7)] {
            let mut rm = RowMatrix::<i64>::zeros(nrows, ncols);
            let mut cm = ColumnMatrix::<i64>::zeros(nrows, ncols);
            rm.fill(-3);
            cm.fill(-3);
            for r in 0..nrows {
                for c in 0..ncols {
                    assert_eq!(rm.at(r, c), -3);
                    assert_eq!(cm.at(r, c), -3);
                }
            }
            rm.reset();
            assert!(rm.to_vec().iter().all(|&x| x == 0));
        }
    }

    #[test]
    fn test_fill_leaves_gaps_alone() {
        let mut buffer = vec![0u8; 20];
        {
            // A 3x2 window with rows 5 apart, starting at slot 1.
            let mut v = RowMatrixMut::with_increment_mut(&mut buffer[1..], 3, 2, 5).unwrap();
            assert!(!v.is_contiguous());
            v.fill(7);
        }
        let expected: Vec<u8> = (0..20)
            .map(|i| if i >= 1 && (i - 1) % 5 < 2 && i < 13 { 7 } else { 0 })
            .collect();
        assert_eq!(buffer, expected);
    }

    #[test]
    fn test_generate() {
        let mut m = ColumnMatrix::<usize>::zeros(3, 4);
        let mut count = 0;
        m.generate(|| {
            count += 1;
            count
        });
        assert_eq!(count, 12);
        // Column-major storage order: down each column.
        assert_eq!(m.at(0, 0), 1);
        assert_eq!(m.at(2, 0), 3);
        assert_eq!(m.at(0, 1), 4);
        assert_eq!(m.at(2, 3), 12);

        // Generating through a strided window touches each logical element once.
        let mut big = RowMatrix::<usize>::zeros(4, 4);
        let mut count = 0;
        big.sub_matrix_mut(1, 1, 2, 3).generate(|| {
            count += 1;
            count
        });
        assert_eq!(count, 6);
        assert_eq!(
            big.to_vec(),
            vec![0, 0, 0, 0, 0, 1, 2, 3, 0, 4, 5, 6, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_double_transpose() {
        let m = create_test_matrix::<RowMajor>(3, 5);
        let t = m.transpose();
        let tt = t.transpose();
        assert_eq!(tt.layout(), MatrixLayout::RowMajor);
        assert!(tt.equals(&m, 0));
        assert_eq!(tt.as_slice().as_ptr(), m.as_slice().as_ptr());

        let m = create_test_matrix::<ColumnMajor>(4, 2);
        let t = m.transpose();
        assert!(t.transpose().equals(&m, 0));
    }

    #[test]
    fn test_transposed_equality() {
        let m = create_test_matrix::<RowMajor>(3, 4);
        // Build M' = M^T explicitly in column-major storage.
        let mt = ColumnMatrix::from_fn(4, 3, |r, c| m.at(c, r));
        let view = mt.transpose();
        assert_eq!(view.layout(), MatrixLayout::RowMajor);
        assert!(m.equals(&view, 0));

        // A single differing element breaks equality.
        let mut mt2 = mt.clone();
        mt2[(1, 2)] += 1;
        assert!(!m.equals(&mt2.transpose(), 0));

        // Transposed shape without a transpose is a mismatch.
        assert!(!m.equals(&mt, 0));
    }

    #[test]
    fn test_equals_tolerance() {
        let a = row_matrix![[1.0, 2.0], [3.0, 4.0]];
        let mut b = a.clone();
        b[(1, 1)] += 1.0e-10;
        assert!(a.equals(&b, 1.0e-8));
        assert_eq!(a, b);

        b[(0, 0)] += 1.0e-3;
        assert!(!a.equals(&b, 1.0e-8));
        assert!(a.equals(&b, 1.0e-2));
        assert_ne!(a, b);

        b[(0, 0)] = f64::NAN;
        assert!(!a.equals(&b, f64::INFINITY));
    }

    #[test]
    fn test_copy_from() {
        let src = create_test_matrix::<RowMajor>(2, 3);

        let mut same = RowMatrix::<usize>::zeros(2, 3);
        same.copy_from(&src).unwrap();
        assert!(same.equals(&src, 0));

        let mut cross = ColumnMatrix::<usize>::zeros(2, 3);
        cross.copy_from(&src).unwrap();
        assert!(cross.equals(&src, 0));
        assert_eq!(cross.to_vec(), vec![0, 3, 1, 4, 2, 5]);

        // Copy from a transposed view into its natural shape.
        let mut back = RowMatrix::<usize>::zeros(3, 2);
        back.copy_from(&cross.transpose()).unwrap();
        check_logical(&back, |r, c| c * 3 + r);
    }

    #[test]
    fn test_copy_from_mismatch() {
        let src = create_test_matrix::<RowMajor>(2, 3);
        let mut dst = RowMatrix::<usize>::from_elem(3, 2, 42);
        let err = dst.copy_from(&src).unwrap_err();
        assert_eq!(
            err,
            MatError::DimensionMismatch {
                expected: (3, 2),
                got: (2, 3)
            }
        );
        assert_eq!(
            err.to_string(),
            "dimension mismatch: expected a 3x2 matrix, got 2x3"
        );
        // Nothing was written.
        assert!(dst.to_vec().iter().all(|&x| x == 42));

        // With the transpose it works.
        dst.copy_from(&src.transpose()).unwrap();
        check_logical(&dst, |r, c| c * 3 + r);
    }

    #[test]
    fn test_sub_matrix_aliases_parent() {
        let mut m = create_test_matrix::<ColumnMajor>(4, 5);
        {
            let mut sub = m.sub_matrix_mut(1, 2, 2, 3);
            assert_eq!(sub.shape(), (2, 3));
            assert_eq!(sub.increment(), 4);
            assert_eq!(sub.at(0, 0), 1 * 5 + 2);
            sub[(1, 2)] = 1000;
            sub.row_mut(0).fill(7);
        }
        assert_eq!(m.at(2, 4), 1000);
        assert_eq!(m.at(1, 2), 7);
        assert_eq!(m.at(1, 3), 7);
        assert_eq!(m.at(1, 4), 7);
        assert_eq!(m.at(0, 2), 2);
        assert_eq!(m.at(1, 1), 6);
    }

    #[test]
    fn test_sub_matrix_views() {
        let m = create_test_matrix::<RowMajor>(5, 4);
        let sub = m.sub_matrix(1, 1, 3, 2);
        assert!(!sub.is_contiguous());
        check_logical(&sub, |r, c| (r + 1) * 4 + (c + 1));
        assert_eq!(sub.to_vec(), vec![5, 6, 9, 10, 13, 14]);

        let row = sub.row(1);
        assert_eq!(row.stride(), 1);
        assert_eq!(row.to_vec(), vec![9, 10]);

        let col = sub.column(1);
        assert_eq!(col.stride(), 4);
        assert_eq!(col.to_vec(), vec![6, 10, 14]);

        let diag = sub.diagonal();
        assert_eq!(diag.stride(), 5);
        assert_eq!(diag.to_vec(), vec![5, 10]);

        let major = sub.major_vector(2);
        assert_eq!(major.stride(), 1);
        assert_eq!(major.to_vec(), vec![13, 14]);

        // Full-width row windows stay contiguous.
        assert!(m.sub_matrix(1, 0, 2, 4).is_contiguous());
        assert!(m.sub_matrix(2, 1, 0, 3).to_vec().is_empty());
    }

    #[test]
    fn test_rows_columns_and_major_vectors() {
        let m = create_test_matrix::<ColumnMajor>(3, 4);
        assert_eq!(m.row(1).to_vec(), vec![4, 5, 6, 7]);
        assert_eq!(m.row(1).stride(), 3);
        assert_eq!(m.column(2).to_vec(), vec![2, 6, 10]);
        assert_eq!(m.column(2).stride(), 1);
        assert_eq!(
            m.major_vector(2).orientation(),
            crate::VectorOrientation::Column
        );
        assert_eq!(m.major_vector(2).to_vec(), m.column(2).to_vec());

        let rows: Vec<Vec<usize>> = m.row_iter().map(|r| r.to_vec()).collect();
        assert_eq!(rows, vec![vec![0, 1, 2, 3], vec![4, 5, 6, 7], vec![8, 9, 10, 11]]);
    }

    #[test]
    fn test_row_iter_over_borrowed_window() {
        let data: Vec<String> = (0..12).map(|i| i.to_string()).collect();
        let m = RowMatrixRef::new(&data, 3, 4).unwrap();
        let window = m.sub_matrix(1, 1, 2, 2);
        let rows = window.row_iter();
        assert_eq!(rows.len(), 2);
        let rows: Vec<Vec<String>> = rows.map(|r| r.to_vec()).collect();
        assert_eq!(rows, vec![vec!["5", "6"], vec!["9", "10"]]);
    }

    #[test]
    fn test_mutable_vectors() {
        let mut m = RowMatrix::<i32>::zeros(3, 3);
        m.diagonal_mut().fill(1);
        m.column_mut(2).fill(5);
        m.major_vector_mut(0)[1] = 9;
        assert_eq!(m.to_vec(), vec![1, 9, 5, 0, 1, 5, 0, 0, 5]);

        let mut t = m.transpose_mut();
        t[(0, 1)] = -1;
        assert_eq!(m.at(1, 0), -1);
    }

    #[test]
    fn test_storage_orders() {
        let rows = [[1, 2, 3], [4, 5, 6]];
        let rm = RowMatrix::from(rows);
        let cm = ColumnMatrix::from(rows);
        for r in 0..2 {
            for c in 0..3 {
                assert_eq!(rm.at(r, c), cm.at(r, c));
            }
        }
        assert_eq!(rm.to_vec(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(cm.to_vec(), vec![1, 4, 2, 5, 3, 6]);
        assert_eq!(rm.to_row_major_vec(), cm.to_row_major_vec());
        assert_eq!(rm, cm);
    }

    #[test]
    fn test_as_vector() {
        let m = create_test_matrix::<RowMajor>(2, 3);
        assert_eq!(m.as_vector().unwrap().to_vec(), vec![0, 1, 2, 3, 4, 5]);

        let sub = m.sub_matrix(0, 0, 2, 2);
        assert_eq!(
            sub.as_vector().unwrap_err(),
            MatError::NotContiguous {
                increment: 3,
                major: 2
            }
        );
    }

    #[test]
    fn test_views_over_foreign_buffers() {
        let data: Vec<f32> = (0..12).map(|i| i as f32).collect();

        let v = ColumnMatrixRef::new(&data, 3, 4).unwrap();
        assert_eq!(v.at(2, 1), 5.0);
        assert_eq!(v.as_slice().as_ptr(), data.as_ptr());

        let err = RowMatrixRef::new(&data, 3, 3).unwrap_err();
        assert_eq!(
            err,
            MatError::SizeMismatch {
                nrows: 3,
                ncols: 3,
                len: 12
            }
        );

        // Left half of a 3x4 row-major buffer.
        let v = RowMatrixRef::with_increment(&data, 3, 2, 4).unwrap();
        assert_eq!(v.as_slice().len(), 10);
        assert_eq!(v.to_vec(), vec![0.0, 1.0, 4.0, 5.0, 8.0, 9.0]);

        let err = RowMatrixRef::with_increment(&data[..9], 3, 2, 4).unwrap_err();
        assert_eq!(
            err,
            MatError::SliceTooShort {
                len: 9,
                nrows: 3,
                ncols: 2,
                increment: 4,
                required: 10
            }
        );
    }

    #[test]
    #[should_panic(expected = "increment 2 is smaller than the major size 3")]
    fn test_increment_too_small() {
        let data = [0; 9];
        let _ = RowMatrixRef::with_increment(&data, 3, 3, 2);
    }

    #[test]
    fn test_into_sub_matrix_keeps_lifetime() {
        let data: Vec<usize> = (0..16).collect();
        let inner = {
            let outer = RowMatrixRef::new(&data, 4, 4).unwrap();
            outer.into_sub_matrix(1, 1, 2, 2)
        };
        assert_eq!(inner.to_vec(), vec![5, 6, 9, 10]);

        let mut data = vec![0usize; 16];
        {
            let outer = ColumnMatrixMut::new_mut(&mut data, 4, 4).unwrap();
            let mut inner = outer.into_sub_matrix(2, 2, 2, 2);
            inner.fill(1);
        }
        assert_eq!(data.iter().sum::<usize>(), 4);
        assert_eq!(data[10], 1);
        assert_eq!(data[15], 1);
    }

    #[test]
    fn test_get() {
        let mut m = create_test_matrix::<RowMajor>(2, 2);
        assert_eq!(m.get(1, 1), Some(&3));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.get(0, 2), None);
        *m.get_mut(0, 1).unwrap() = 10;
        assert_eq!(m.at(0, 1), 10);
        assert!(m.get_mut(5, 5).is_none());
    }

    #[test]
    #[should_panic(expected = "row 2 is out of bounds")]
    fn test_row_out_of_bounds() {
        let m = create_test_matrix::<RowMajor>(2, 2);
        let _ = m.at(2, 0);
    }

    #[test]
    #[should_panic(expected = "col 3 is out of bounds")]
    fn test_col_out_of_bounds() {
        let m = create_test_matrix::<ColumnMajor>(2, 3);
        let _ = m[(0, 3)];
    }

    #[test]
    #[should_panic(expected = "do not fit")]
    fn test_window_out_of_bounds() {
        let m = create_test_matrix::<RowMajor>(3, 3);
        let _ = m.sub_matrix(2, 0, 2, 1);
    }

    #[test]
    fn test_debug() {
        let m = row_matrix![[1, 2, 3], [4, 5, 6]];
        assert_eq!(format!("{:?}", m), "2x3 row-major [[1, 2, 3], [4, 5, 6]]");
        assert_eq!(
            format!("{:?}", m.transpose()),
            "3x2 column-major [[1, 4], [2, 5], [3, 6]]"
        );
    }

    #[test]
    fn test_random_transpose_round_trip() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..20 {
            let nrows = rng.random_range(0..8);
            let ncols = rng.random_range(0..8);
            let m = RowMatrix::from_fn(nrows, ncols, |_, _| rng.random_range(-100i64..100));

            let t = m.transpose();
            for r in 0..nrows {
                for c in 0..ncols {
                    assert_eq!(t.at(c, r), m.at(r, c));
                }
            }

            // Materialize the transpose and compare through the transposed view.
            let owned = ColumnMatrix::from_view(&t);
            assert!(m.equals(&owned.transpose(), 0));

            let mut n = ColumnMatrix::<i64>::zeros(nrows, ncols);
            n.copy_from(&m).unwrap();
            assert_eq!(n, m);
        }
    }

    fn check_nested_windows<L: Layout>(rng: &mut StdRng) {
        let nrows = rng.random_range(1..10);
        let ncols = rng.random_range(1..10);
        let m = create_test_matrix::<L>(nrows, ncols);

        let r0 = rng.random_range(0..nrows);
        let c0 = rng.random_range(0..ncols);
        let h0 = rng.random_range(0..=nrows - r0);
        let w0 = rng.random_range(0..=ncols - c0);
        let outer = m.sub_matrix(r0, c0, h0, w0);

        let r1 = rng.random_range(0..=h0);
        let c1 = rng.random_range(0..=w0);
        let h1 = rng.random_range(0..=h0 - r1);
        let w1 = rng.random_range(0..=w0 - c1);
        let inner = outer.sub_matrix(r1, c1, h1, w1);

        // A window of a window is the same as the combined window of the parent.
        let direct = m.sub_matrix(r0 + r1, c0 + c1, h1, w1);
        assert_eq!(inner.shape(), direct.shape());
        assert_eq!(inner.increment(), m.increment());
        assert!(inner.equals(&direct, 0));
        check_logical(&inner, |r, c| (r + r0 + r1) * ncols + (c + c0 + c1));

        // Vectors taken from the nested window agree with the parent.
        for r in 0..h1 {
            assert_eq!(inner.row(r).to_vec(), direct.row(r).to_vec());
        }
        for c in 0..w1 {
            assert_eq!(inner.column(c).to_vec(), direct.column(c).to_vec());
        }
        for i in 0..inner.minor_size() {
            assert_eq!(inner.major_vector(i).to_vec(), direct.major_vector(i).to_vec());
        }
        assert_eq!(inner.diagonal().to_vec(), direct.diagonal().to_vec());
        assert_eq!(inner.transpose().to_vec(), direct.transpose().to_vec());
    }

    #[test]
    fn test_random_nested_windows() {
        let mut rng = StdRng::seed_from_u64(0xdecaf);
        for _ in 0..100 {
            check_nested_windows::<RowMajor>(&mut rng);
            check_nested_windows::<ColumnMajor>(&mut rng);
        }
    }

    #[test]
    fn test_swap() {
        let mut a = create_test_matrix::<RowMajor>(2, 2);
        let mut b = RowMatrix::<usize>::zeros(1, 3);
        a.swap(&mut b);
        assert_eq!(a.shape(), (1, 3));
        assert_eq!(b.to_vec(), vec![0, 1, 2, 3]);
    }
}
