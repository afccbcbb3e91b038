use num_traits::Zero;
use tracing::trace;

use crate::data::BaseData;
use crate::dimension::Dims;
use crate::error::{MatError, MatResult};
use crate::layout::{ColumnMajor, Layout, RowMajor};
use crate::matrix::{MatrixData, MatrixRef};

/// A matrix that owns its elements.
///
/// Owned matrices are always contiguous: the buffer holds exactly `nrows * ncols`
/// elements in the storage order of `L`.
pub type Matrix<T, L> = MatrixData<Vec<T>, L>;

pub type RowMatrix<T> = Matrix<T, RowMajor>;
pub type ColumnMatrix<T> = Matrix<T, ColumnMajor>;

impl<T, L: Layout> Matrix<T, L> {
    fn from_storage(data: Vec<T>, nrows: usize, ncols: usize) -> Self {
        debug_assert_eq!(data.len(), nrows * ncols);
        let layout = L::KIND;
        trace!(nrows, ncols, %layout, "allocated matrix");
        let dims = Dims::new(nrows, ncols, L::major_size(nrows, ncols));
        MatrixData::from_parts(data, dims)
    }

    pub fn zeros(nrows: usize, ncols: usize) -> Self
    where
        T: Zero + Clone,
    {
        Self::from_elem(nrows, ncols, T::zero())
    }

    pub fn from_elem(nrows: usize, ncols: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::from_storage(vec![value; nrows * ncols], nrows, ncols)
    }

    /// Build a matrix by calling `f(row, col)` for every element.
    ///
    /// `f` is called once per element, in storage order.
    pub fn from_fn<F>(nrows: usize, ncols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let (major, minor) = (L::major_size(nrows, ncols), L::minor_size(nrows, ncols));
        let mut data = Vec::with_capacity(nrows * ncols);
        for i in 0..minor {
            for j in 0..major {
                let (row, col) = L::coordinates(i, j);
                data.push(f(row, col));
            }
        }
        Self::from_storage(data, nrows, ncols)
    }

    /// Build a matrix from a list of rows, whatever the layout.
    ///
    /// The shape is taken from the number of rows and the length of the first one. Every
    /// other row must have the same length.
    pub fn from_nested<R>(rows: &[R]) -> MatResult<Self>
    where
        R: AsRef<[T]>,
        T: Clone,
    {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, |r| r.as_ref().len());
        if let Some((row, r)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.as_ref().len() != ncols)
        {
            return Err(MatError::RaggedRows {
                row,
                expected: ncols,
                got: r.as_ref().len(),
            });
        }
        Ok(Self::from_fn(nrows, ncols, |r, c| rows[r].as_ref()[c].clone()))
    }

    /// Take ownership of `data`, laid out in the storage order of `L`.
    pub fn from_vec(nrows: usize, ncols: usize, data: Vec<T>) -> MatResult<Self> {
        if data.len() != nrows * ncols {
            return Err(MatError::SizeMismatch {
                nrows,
                ncols,
                len: data.len(),
            });
        }
        Ok(Self::from_storage(data, nrows, ncols))
    }

    /// Copy `data`, laid out in the storage order of `L`.
    pub fn from_slice(nrows: usize, ncols: usize, data: &[T]) -> MatResult<Self>
    where
        T: Clone,
    {
        if data.len() != nrows * ncols {
            return Err(MatError::SizeMismatch {
                nrows,
                ncols,
                len: data.len(),
            });
        }
        Ok(Self::from_storage(data.to_vec(), nrows, ncols))
    }

    /// Copy any matrix or view, in either layout, into a new owned matrix.
    pub fn from_view<S2, L2>(view: &MatrixData<S2, L2>) -> Self
    where
        T: Clone,
        S2: BaseData<Elem = T>,
        L2: Layout,
    {
        let (nrows, ncols) = view.shape();
        if L::KIND == L2::KIND {
            Self::from_storage(view.to_vec(), nrows, ncols)
        } else {
            Self::from_fn(nrows, ncols, |r, c| view[(r, c)].clone())
        }
    }

    /// Move the contents out, leaving an empty 0x0 matrix behind.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Replace the contents of `self` with a copy of `other`.
    ///
    /// The copy is built before `self` is touched, so a panic while cloning leaves `self`
    /// as it was.
    pub fn assign<S2, L2>(&mut self, other: &MatrixData<S2, L2>)
    where
        T: Clone,
        S2: BaseData<Elem = T>,
        L2: Layout,
    {
        let mut fresh = Self::from_view(other);
        self.swap(&mut fresh);
    }

    /// Return the buffer in storage order.
    pub fn into_vec(self) -> Vec<T> {
        self.into_storage()
    }
}

impl<T, L, const R: usize, const C: usize> From<[[T; C]; R]> for Matrix<T, L>
where
    T: Clone,
    L: Layout,
{
    fn from(rows: [[T; C]; R]) -> Self {
        Self::from_fn(R, C, |r, c| rows[r][c].clone())
    }
}

impl<'a, T, L, L2> From<MatrixRef<'a, T, L2>> for Matrix<T, L>
where
    T: Clone,
    L: Layout,
    L2: Layout,
{
    fn from(view: MatrixRef<'a, T, L2>) -> Self {
        Self::from_view(&view)
    }
}
