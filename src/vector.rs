use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use crate::data::{BaseData, BaseDataMut};
use crate::dimension::{linear_length, stride_offset};
use crate::error::{MatError, MatResult};

/// Runtime tag for the orientation of a vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorOrientation {
    Row,
    Column,
}

pub trait Orientation: Copy + Default + fmt::Debug + 'static {
    type Transposed: Orientation<Transposed = Self>;
    const KIND: VectorOrientation;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RowOrientation;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ColumnOrientation;

impl Orientation for RowOrientation {
    type Transposed = ColumnOrientation;
    const KIND: VectorOrientation = VectorOrientation::Row;
}

impl Orientation for ColumnOrientation {
    type Transposed = RowOrientation;
    const KIND: VectorOrientation = VectorOrientation::Column;
}

/// A one dimensional strided view.
///
/// Element `i` lives at `i * stride` in the underlying slice. The slice starts at element
/// 0 and ends right after element `len - 1`, so gaps between elements may belong to other
/// rows or columns of the matrix the vector was taken from.
#[derive(Clone, Copy)]
pub struct VectorData<S, O> {
    data: S,
    len: usize,
    stride: usize,
    _orientation: PhantomData<O>,
}

pub type VectorRef<'a, T, O> = VectorData<&'a [T], O>;
pub type VectorMut<'a, T, O> = VectorData<&'a mut [T], O>;

pub type RowVectorRef<'a, T> = VectorRef<'a, T, RowOrientation>;
pub type ColumnVectorRef<'a, T> = VectorRef<'a, T, ColumnOrientation>;
pub type RowVectorMut<'a, T> = VectorMut<'a, T, RowOrientation>;
pub type ColumnVectorMut<'a, T> = VectorMut<'a, T, ColumnOrientation>;

fn vector_span(len: usize, stride: usize) -> usize {
    linear_length(len, 1, stride, 1)
}

fn too_short(len: usize, stride: usize, available: usize) -> MatError {
    MatError::SliceTooShort {
        len: available,
        nrows: len,
        ncols: 1,
        increment: stride,
        required: vector_span(len, stride),
    }
}

impl<'a, T, O: Orientation> VectorRef<'a, T, O> {
    /// Construct a strided vector over `data`, shrinking the slice to the span it needs.
    ///
    /// # Panics
    ///
    /// Panics if `stride == 0` and `len > 1`.
    pub fn with_stride(data: &'a [T], len: usize, stride: usize) -> MatResult<Self> {
        assert!(
            len <= 1 || stride > 0,
            "a vector of {len} elements needs a non-zero stride"
        );
        let required = vector_span(len, stride);
        match data.get(..required) {
            Some(data) => Ok(Self::from_parts(data, len, stride)),
            None => Err(too_short(len, stride, data.len())),
        }
    }
}

impl<'a, T, O: Orientation> VectorMut<'a, T, O> {
    /// Mutable counterpart of [`VectorRef::with_stride`].
    ///
    /// # Panics
    ///
    /// Panics if `stride == 0` and `len > 1`.
    pub fn with_stride_mut(data: &'a mut [T], len: usize, stride: usize) -> MatResult<Self> {
        assert!(
            len <= 1 || stride > 0,
            "a vector of {len} elements needs a non-zero stride"
        );
        let required = vector_span(len, stride);
        if data.len() >= required {
            Ok(Self::from_parts(&mut data[..required], len, stride))
        } else {
            Err(too_short(len, stride, data.len()))
        }
    }
}

impl<S, O> VectorData<S, O>
where
    S: BaseData,
    O: Orientation,
{
    pub(crate) fn from_parts(data: S, len: usize, stride: usize) -> Self {
        debug_assert_eq!(data.len(), vector_span(len, stride));
        Self {
            data,
            len,
            stride,
            _orientation: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Distance, in storage slots, between consecutive elements.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn orientation(&self) -> VectorOrientation {
        O::KIND
    }

    /// Return element `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn at(&self, index: usize) -> S::Elem
    where
        S::Elem: Copy,
    {
        self[index]
    }

    pub fn get(&self, index: usize) -> Option<&S::Elem> {
        if index < self.len {
            self.data.as_slice().get(stride_offset(index, self.stride))
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &S::Elem> + '_ {
        let data = self.data.as_slice();
        let stride = self.stride;
        (0..self.len).map(move |i| &data[stride_offset(i, stride)])
    }

    pub fn to_vec(&self) -> Vec<S::Elem>
    where
        S::Elem: Clone,
    {
        self.iter().cloned().collect()
    }

    pub fn as_view(&self) -> VectorRef<'_, S::Elem, O> {
        VectorData::from_parts(self.data.as_slice(), self.len, self.stride)
    }

    /// View the same elements with the opposite orientation.
    pub fn transpose(&self) -> VectorRef<'_, S::Elem, O::Transposed> {
        VectorData::from_parts(self.data.as_slice(), self.len, self.stride)
    }

    pub fn into_transpose(self) -> VectorData<S, O::Transposed> {
        VectorData::from_parts(self.data, self.len, self.stride)
    }
}

impl<S, O> VectorData<S, O>
where
    S: BaseDataMut,
    O: Orientation,
{
    pub fn at_mut(&mut self, index: usize) -> &mut S::Elem {
        &mut self[index]
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut S::Elem> + '_ {
        let len = self.len;
        // `stride` is only zero for vectors of at most one element.
        let stride = self.stride.max(1);
        self.data.as_slice_mut().iter_mut().step_by(stride).take(len)
    }

    pub fn fill(&mut self, value: S::Elem)
    where
        S::Elem: Clone,
    {
        self.iter_mut().for_each(|x| *x = value.clone());
    }

    pub fn as_view_mut(&mut self) -> VectorMut<'_, S::Elem, O> {
        let (len, stride) = (self.len, self.stride);
        VectorData::from_parts(self.data.as_slice_mut(), len, stride)
    }
}

impl<S, O> Index<usize> for VectorData<S, O>
where
    S: BaseData,
    O: Orientation,
{
    type Output = S::Elem;

    fn index(&self, index: usize) -> &Self::Output {
        assert!(
            index < self.len,
            "index {index} is out of bounds for a vector of length {}",
            self.len
        );
        &self.data.as_slice()[stride_offset(index, self.stride)]
    }
}

impl<S, O> IndexMut<usize> for VectorData<S, O>
where
    S: BaseDataMut,
    O: Orientation,
{
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        assert!(
            index < self.len,
            "index {index} is out of bounds for a vector of length {}",
            self.len
        );
        let stride = self.stride;
        &mut self.data.as_slice_mut()[stride_offset(index, stride)]
    }
}

impl<S, O> fmt::Debug for VectorData<S, O>
where
    S: BaseData,
    S::Elem: fmt::Debug,
    O: Orientation,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ", O::KIND)?;
        f.debug_list().entries(self.iter()).finish()
    }
}
