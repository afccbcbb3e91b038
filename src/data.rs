/// Storage underneath a matrix or vector.
///
/// Implemented for borrowed slices (views) and for `Vec<T>` (owners), so a single
/// [`MatrixData`](crate::MatrixData) type serves both.
///
/// `as_slice` must return the same slice every time it is called.
pub trait BaseData {
    type Elem;

    fn as_slice(&self) -> &[Self::Elem];

    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Mutable companion to [`BaseData`]. `as_slice_mut` spans the same memory as `as_slice`.
pub trait BaseDataMut: BaseData {
    fn as_slice_mut(&mut self) -> &mut [Self::Elem];
}

impl<T> BaseData for &[T] {
    type Elem = T;

    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<T> BaseData for &mut [T] {
    type Elem = T;

    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<T> BaseDataMut for &mut [T] {
    fn as_slice_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T> BaseData for Vec<T> {
    type Elem = T;

    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<T> BaseDataMut for Vec<T> {
    fn as_slice_mut(&mut self) -> &mut [T] {
        self
    }
}
