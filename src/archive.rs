use std::collections::BTreeMap;

use num_traits::NumCast;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::BaseData;
use crate::error::{MatError, MatResult};
use crate::layout::Layout;
use crate::matrix::{MatrixData, RowMatrixRef};
use crate::owned::Matrix;
use crate::Element;

/// A single named value in an archive.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ArchiveValue {
    Scalar(u64),
    Sequence(Vec<f64>),
}

impl ArchiveValue {
    fn kind(&self) -> &'static str {
        match self {
            ArchiveValue::Scalar(_) => "scalar",
            ArchiveValue::Sequence(_) => "sequence",
        }
    }
}

/// Sink for named values.
pub trait Archiver {
    fn write_scalar(&mut self, name: &str, value: u64) -> MatResult<()>;

    fn write_sequence<T: Element>(&mut self, name: &str, values: &[T]) -> MatResult<()>;
}

/// Source of named values written by an [`Archiver`].
pub trait Unarchiver {
    fn read_scalar(&mut self, name: &str) -> MatResult<u64>;

    fn read_sequence<T: Element>(&mut self, name: &str) -> MatResult<Vec<T>>;
}

/// An in-memory archive, keyed by field name.
///
/// Sequences are stored as `f64` whatever the element type they were written from.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MemoryArchive {
    fields: BTreeMap<String, ArchiveValue>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ArchiveValue> {
        self.fields.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ArchiveValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn field(&self, name: &str) -> MatResult<&ArchiveValue> {
        self.fields
            .get(name)
            .ok_or_else(|| MatError::MissingField(name.to_string()))
    }
}

impl Archiver for MemoryArchive {
    fn write_scalar(&mut self, name: &str, value: u64) -> MatResult<()> {
        self.insert(name, ArchiveValue::Scalar(value));
        Ok(())
    }

    fn write_sequence<T: Element>(&mut self, name: &str, values: &[T]) -> MatResult<()> {
        let values = values
            .iter()
            .enumerate()
            .map(|(index, &v)| match v.to_f64() {
                // Reject values that would not read back as themselves.
                Some(x) if x.is_nan() || <T as NumCast>::from(x) == Some(v) => Ok(x),
                _ => Err(MatError::ElementCast {
                    name: name.to_string(),
                    index,
                }),
            })
            .collect::<MatResult<Vec<f64>>>()?;
        self.insert(name, ArchiveValue::Sequence(values));
        Ok(())
    }
}

impl Unarchiver for MemoryArchive {
    fn read_scalar(&mut self, name: &str) -> MatResult<u64> {
        match self.field(name)? {
            ArchiveValue::Scalar(v) => Ok(*v),
            other => {
                debug!(name, found = other.kind(), "unexpected archive field kind");
                Err(MatError::FieldKind {
                    name: name.to_string(),
                    expected: "scalar",
                })
            }
        }
    }

    fn read_sequence<T: Element>(&mut self, name: &str) -> MatResult<Vec<T>> {
        let values = match self.field(name)? {
            ArchiveValue::Sequence(values) => values,
            other => {
                debug!(name, found = other.kind(), "unexpected archive field kind");
                return Err(MatError::FieldKind {
                    name: name.to_string(),
                    expected: "sequence",
                });
            }
        };
        values
            .iter()
            .enumerate()
            .map(|(index, &v)| {
                <T as NumCast>::from(v).ok_or_else(|| MatError::ElementCast {
                    name: name.to_string(),
                    index,
                })
            })
            .collect()
    }
}

/// Writes and reads matrices as three fields: `<name>_rows`, `<name>_columns` and
/// `<name>_values`. Values are always stored in row-major order, so a matrix can be read
/// back in either layout.
pub struct MatrixArchiver;

impl MatrixArchiver {
    pub fn rows_name(name: &str) -> String {
        format!("{name}_rows")
    }

    pub fn columns_name(name: &str) -> String {
        format!("{name}_columns")
    }

    pub fn values_name(name: &str) -> String {
        format!("{name}_values")
    }

    pub fn write<T, S, L, A>(
        matrix: &MatrixData<S, L>,
        name: &str,
        archiver: &mut A,
    ) -> MatResult<()>
    where
        T: Element,
        S: BaseData<Elem = T>,
        L: Layout,
        A: Archiver,
    {
        debug!(
            name,
            nrows = matrix.nrows(),
            ncols = matrix.ncols(),
            "writing matrix"
        );
        archiver.write_scalar(&Self::rows_name(name), matrix.nrows() as u64)?;
        archiver.write_scalar(&Self::columns_name(name), matrix.ncols() as u64)?;
        archiver.write_sequence(&Self::values_name(name), &matrix.to_row_major_vec())
    }

    /// Read a matrix back in layout `L`.
    ///
    /// Fails if a field is missing or the number of values is not `rows * columns`.
    pub fn read<T, L, U>(name: &str, unarchiver: &mut U) -> MatResult<Matrix<T, L>>
    where
        T: Element,
        L: Layout,
        U: Unarchiver,
    {
        let nrows = Self::read_dimension(&Self::rows_name(name), unarchiver)?;
        let ncols = Self::read_dimension(&Self::columns_name(name), unarchiver)?;
        let values: Vec<T> = unarchiver.read_sequence(&Self::values_name(name))?;
        debug!(name, nrows, ncols, "read matrix");
        let view = RowMatrixRef::new(&values, nrows, ncols)?;
        Ok(Matrix::from_view(&view))
    }

    /// Like [`read`](MatrixArchiver::read), but stores the result in `matrix`. On error
    /// `matrix` is left untouched.
    pub fn read_into<T, L, U>(
        matrix: &mut Matrix<T, L>,
        name: &str,
        unarchiver: &mut U,
    ) -> MatResult<()>
    where
        T: Element,
        L: Layout,
        U: Unarchiver,
    {
        *matrix = Self::read(name, unarchiver)?;
        Ok(())
    }

    fn read_dimension<U: Unarchiver>(name: &str, unarchiver: &mut U) -> MatResult<usize> {
        let value = unarchiver.read_scalar(name)?;
        usize::try_from(value).map_err(|_| MatError::FieldKind {
            name: name.to_string(),
            expected: "matrix dimension",
        })
    }
}
