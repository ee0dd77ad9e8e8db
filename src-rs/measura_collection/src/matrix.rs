//! Typed matrices

use std::fmt;

use measura_scalar::{Rel, from_si, to_si};
use measura_shared::{ConstructionError, QuantityError, Real, Shape};
use measura_storage::{MatrixData, Ownership, StorageType};
use measura_unit::{NamedQuantity, RelativeQuantity, SI, SIDimensions, Unit};

use crate::{Vector, check_dimensions, combined_unit, in_display_unit};

/// A matrix of values of a relative quantity.
///
/// ```
/// use measura_collection::Matrix;
/// use measura_storage::StorageType;
/// use measura_unit::{NamedQuantity, catalog::Length};
///
/// let m = Length::si_unit();
/// let rows: [&[f64]; 2] = [&[2.0, 3.0], &[5.0, 7.0]];
/// let matrix = Matrix::<Length>::new(&rows, &m, StorageType::Dense).unwrap();
///
/// assert_eq!(matrix.determinant_si().unwrap(), -1.0);
/// assert_eq!(matrix.determinant().unwrap().display_unit().id(), "m2");
/// ```
pub struct Matrix<Q: RelativeQuantity, N: Real = f64> {
    data: Ownership<MatrixData<N>>,
    /// Zero in the display unit; entries are built from it.
    zero: Rel<Q, N>,
}

impl<Q: RelativeQuantity, N: Real> Matrix<Q, N> {
    /// Creates an immutable matrix from rows of values expressed in `unit`.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::InvalidUnit` if the unit does not belong to
    /// the quantity, and `QuantityError::Construction` if the rows differ
    /// in length.
    pub fn new<R: AsRef<[N]>>(
        rows: &[R],
        unit: &Unit,
        storage: StorageType,
    ) -> Result<Self, QuantityError> {
        let zero = Rel::instantiate_si(N::zero(), unit)?;
        let rows: Vec<Vec<N>> = rows
            .iter()
            .map(|row| {
                row.as_ref()
                    .iter()
                    .map(|value| to_si(*value, unit))
                    .collect()
            })
            .collect();
        Ok(Self::frozen(MatrixData::from_rows(&rows, storage)?, zero))
    }

    /// Creates an immutable dense matrix from rows of values expressed in
    /// `unit`.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::InvalidUnit` if the unit does not belong to
    /// the quantity, and `QuantityError::Construction` if the rows differ
    /// in length.
    pub fn from_vec(rows: Vec<Vec<N>>, unit: &Unit) -> Result<Self, QuantityError> {
        Self::new(&rows, unit, StorageType::Dense)
    }

    /// Creates an immutable matrix of all zeros, displayed in `unit`.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::InvalidUnit` if the unit does not belong to
    /// the quantity.
    pub fn zeros(
        rows: usize,
        cols: usize,
        unit: &Unit,
        storage: StorageType,
    ) -> Result<Self, QuantityError> {
        let zero = Rel::instantiate_si(N::zero(), unit)?;
        Ok(Self::frozen(MatrixData::zeros(rows, cols, storage), zero))
    }

    /// Creates an immutable matrix from rows of scalars, displayed in the
    /// unit of the first scalar.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::Construction` if there are no scalars or the
    /// rows differ in length, and `QuantityError::IncompatibleDimensions`
    /// if the dimensions of the scalars differ.
    pub fn from_scalars<R: AsRef<[Rel<Q, N>]>>(
        rows: &[R],
        storage: StorageType,
    ) -> Result<Self, QuantityError> {
        let first = rows
            .first()
            .and_then(|row| row.as_ref().first())
            .ok_or(ConstructionError::EmptyInput)?;

        let mut si_rows = Vec::with_capacity(rows.len());
        for row in rows {
            let mut si_row = Vec::with_capacity(row.as_ref().len());
            for scalar in row.as_ref() {
                check_dimensions(first.dimensions(), scalar.dimensions())?;
                si_row.push(scalar.si());
            }
            si_rows.push(si_row);
        }

        Ok(Self::frozen(
            MatrixData::from_rows(&si_rows, storage)?,
            first.with_si(N::zero()),
        ))
    }

    /// Creates an immutable sparse matrix from `(row, col, value)` entries
    /// whose values are expressed in `unit`.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::InvalidUnit` if the unit does not belong to
    /// the quantity, and `QuantityError::Construction` if an entry lies
    /// outside of the shape or a position appears twice.
    pub fn sparse(
        rows: usize,
        cols: usize,
        entries: impl IntoIterator<Item = (usize, usize, N)>,
        unit: &Unit,
    ) -> Result<Self, QuantityError> {
        let zero = Rel::instantiate_si(N::zero(), unit)?;
        let entries = entries
            .into_iter()
            .map(|(row, col, value)| (row, col, to_si(value, unit)));
        Ok(Self::frozen(MatrixData::sparse(rows, cols, entries)?, zero))
    }

    /// Creates an immutable sparse matrix from `(row, col, scalar)` entries,
    /// displayed in the unit of the first scalar.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::Construction` if there are no entries, an
    /// entry lies outside of the shape or a position appears twice, and
    /// `QuantityError::IncompatibleDimensions` if the dimensions of the
    /// scalars differ.
    pub fn sparse_scalars(
        rows: usize,
        cols: usize,
        entries: &[(usize, usize, Rel<Q, N>)],
    ) -> Result<Self, QuantityError> {
        let (_, _, first) = entries.first().ok_or(ConstructionError::EmptyInput)?;
        for (_, _, scalar) in entries {
            check_dimensions(first.dimensions(), scalar.dimensions())?;
        }

        let entries = entries
            .iter()
            .map(|(row, col, scalar)| (*row, *col, scalar.si()));
        Ok(Self::frozen(
            MatrixData::sparse(rows, cols, entries)?,
            first.with_si(N::zero()),
        ))
    }

    fn frozen(data: MatrixData<N>, zero: Rel<Q, N>) -> Self {
        Self {
            data: Ownership::frozen(data),
            zero,
        }
    }

    /// The number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.data.data().rows()
    }

    /// The number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.data.data().cols()
    }

    /// The number of entries, `rows * cols`.
    #[must_use]
    pub fn size(&self) -> usize {
        self.data.data().size()
    }

    /// The shape of the matrix.
    #[must_use]
    pub fn shape(&self) -> Shape {
        self.data.data().shape()
    }

    /// Checks if the matrix has as many rows as columns.
    #[must_use]
    pub fn is_square(&self) -> bool {
        self.data.data().is_square()
    }

    /// The layout of the values.
    #[must_use]
    pub fn storage_type(&self) -> StorageType {
        self.data.data().storage_type()
    }

    /// Checks if the values are stored densely.
    #[must_use]
    pub fn is_dense(&self) -> bool {
        self.data.data().is_dense()
    }

    /// Checks if the values are stored sparsely.
    #[must_use]
    pub fn is_sparse(&self) -> bool {
        self.data.data().is_sparse()
    }

    /// Checks if the matrix may be written.
    #[must_use]
    pub const fn is_mutable(&self) -> bool {
        self.data.is_mutable()
    }

    /// The display unit.
    #[must_use]
    pub const fn display_unit(&self) -> &Unit {
        self.zero.display_unit()
    }

    /// The dimensions of the values.
    #[must_use]
    pub fn dimensions(&self) -> SIDimensions {
        self.zero.dimensions()
    }

    /// The SI values.
    #[must_use]
    pub fn data(&self) -> &MatrixData<N> {
        self.data.data()
    }

    /// The entry at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::IndexOutOfRange` if the row or column lies
    /// outside of the matrix.
    pub fn get(&self, row: usize, col: usize) -> Result<Rel<Q, N>, QuantityError> {
        self.get_si(row, col).map(|si| self.zero.with_si(si))
    }

    /// The SI value of the entry at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::IndexOutOfRange` if the row or column lies
    /// outside of the matrix.
    pub fn get_si(&self, row: usize, col: usize) -> Result<N, QuantityError> {
        self.data.data().get(row, col)
    }

    /// The value of the entry at `(row, col)` in the display unit.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::IndexOutOfRange` if the row or column lies
    /// outside of the matrix.
    pub fn get_in_unit(&self, row: usize, col: usize) -> Result<N, QuantityError> {
        self.get_si(row, col)
            .map(|si| from_si(si, self.display_unit()))
    }

    /// The value of the entry at `(row, col)` in another unit.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::IndexOutOfRange` if the row or column lies
    /// outside of the matrix, and `QuantityError::InvalidUnit` if the unit
    /// does not belong to the quantity.
    pub fn get_in_other_unit(
        &self,
        row: usize,
        col: usize,
        unit: &Unit,
    ) -> Result<N, QuantityError> {
        self.get(row, col)?.in_other_unit(unit)
    }

    /// The number of nonzero entries.
    #[must_use]
    pub fn cardinality(&self) -> usize {
        self.data.data().cardinality()
    }

    /// The sum of all entries, displayed in the display unit.
    #[must_use]
    pub fn sum(&self) -> Rel<Q, N> {
        self.zero.with_si(self.data.data().sum())
    }

    /// Iterates over the entries in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Rel<Q, N>> + '_ {
        self.data.data().iter().map(|si| self.zero.with_si(si))
    }

    /// Returns a row as an immutable vector.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::IndexOutOfRange` if the row lies outside of
    /// the matrix.
    pub fn row(&self, row: usize) -> Result<Vector<Q, N>, QuantityError> {
        let data = self.data.data().row(row)?;
        Ok(Vector::frozen(data, self.zero.clone()))
    }

    /// Returns a column as an immutable vector.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::IndexOutOfRange` if the column lies outside
    /// of the matrix.
    pub fn column(&self, col: usize) -> Result<Vector<Q, N>, QuantityError> {
        let data = self.data.data().column(col)?;
        Ok(Vector::frozen(data, self.zero.clone()))
    }

    /// Returns the diagonal as an immutable vector.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::NonSquareMatrix` if the matrix is not square.
    pub fn diagonal(&self) -> Result<Vector<Q, N>, QuantityError> {
        let data = self.data.data().diagonal()?;
        Ok(Vector::frozen(data, self.zero.clone()))
    }

    /// Returns the transposed matrix, in the same state as this matrix.
    #[must_use]
    pub fn transpose(&self) -> Self {
        Self {
            data: self.data.with_data(self.data.data().transpose()),
            zero: self.zero.clone(),
        }
    }

    /// The determinant of the SI values.
    ///
    /// Cofactor expansion takes factorial time; see
    /// [`MatrixData::determinant`].
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::NonSquareMatrix` if the matrix is not square.
    pub fn determinant_si(&self) -> Result<N, QuantityError> {
        self.data.data().determinant()
    }

    /// The determinant as a dynamic value.
    ///
    /// The dimensions of the determinant of an `n`-by-`n` matrix are the
    /// dimensions of its entries raised to the power `n`.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::NonSquareMatrix` if the matrix is not square.
    pub fn determinant(&self) -> Result<Rel<SI, N>, QuantityError> {
        let si = self.determinant_si()?;
        let exponent = i32::try_from(self.rows()).unwrap_or(i32::MAX);
        Ok(Rel::with_dimensions(si, self.dimensions().pow(exponent)))
    }

    /// Sets the entry at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ImmutableMutation` if the matrix is
    /// immutable, `QuantityError::IncompatibleDimensions` if the dimensions
    /// of the value differ, and `QuantityError::IndexOutOfRange` if the row
    /// or column lies outside of the matrix.
    pub fn set(&mut self, row: usize, col: usize, value: &Rel<Q, N>) -> Result<(), QuantityError> {
        let data = self.data.data_mut()?;
        check_dimensions(self.zero.dimensions(), value.dimensions())?;
        data.set(row, col, value.si())
    }

    /// Sets the SI value of the entry at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ImmutableMutation` if the matrix is immutable
    /// and `QuantityError::IndexOutOfRange` if the row or column lies
    /// outside of the matrix.
    pub fn set_si(&mut self, row: usize, col: usize, si: N) -> Result<(), QuantityError> {
        self.data.data_mut()?.set(row, col, si)
    }

    /// Adds two matrices entry by entry.
    ///
    /// The result is immutable. It keeps the display unit if both matrices
    /// share it, and uses the SI unit otherwise.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::IncompatibleDimensions` if the dimensions
    /// differ and `QuantityError::ShapeMismatch` if the shapes differ.
    pub fn checked_plus(&self, other: &Self) -> Result<Self, QuantityError> {
        self.combine(other, |a, b| a + b)
    }

    /// Subtracts `other` from this matrix entry by entry.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::IncompatibleDimensions` if the dimensions
    /// differ and `QuantityError::ShapeMismatch` if the shapes differ.
    pub fn checked_minus(&self, other: &Self) -> Result<Self, QuantityError> {
        self.combine(other, |a, b| a - b)
    }

    fn combine(&self, other: &Self, f: impl Fn(N, N) -> N) -> Result<Self, QuantityError> {
        check_dimensions(self.dimensions(), other.dimensions())?;
        let data = self.data.data().zip_with(other.data.data(), f)?;
        let unit = combined_unit::<Q>(self.display_unit(), other.display_unit());
        Ok(Self::frozen(data, Rel::instantiate_si(N::zero(), &unit)?))
    }

    /// Multiplies two matrices of any relative quantities entry by entry.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ShapeMismatch` if the shapes differ.
    pub fn times<R: RelativeQuantity>(
        &self,
        other: &Matrix<R, N>,
    ) -> Result<Matrix<SI, N>, QuantityError> {
        let data = self.data.data().zip_with(other.data.data(), |a, b| a * b)?;
        let dimensions = self.dimensions().plus(&other.dimensions());
        Ok(Matrix::frozen(
            data,
            Rel::with_dimensions(N::zero(), dimensions),
        ))
    }

    /// Divides this matrix by a matrix of any relative quantity entry by
    /// entry.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ShapeMismatch` if the shapes differ.
    pub fn divide<R: RelativeQuantity>(
        &self,
        other: &Matrix<R, N>,
    ) -> Result<Matrix<SI, N>, QuantityError> {
        let data = self.data.data().zip_with(other.data.data(), |a, b| a / b)?;
        let dimensions = self.dimensions().minus(&other.dimensions());
        Ok(Matrix::frozen(
            data,
            Rel::with_dimensions(N::zero(), dimensions),
        ))
    }

    /// Adds `other` to this matrix in place.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ImmutableMutation` if the matrix is
    /// immutable, `QuantityError::IncompatibleDimensions` if the dimensions
    /// differ and `QuantityError::ShapeMismatch` if the shapes differ.
    pub fn increment_by(&mut self, other: &Self) -> Result<(), QuantityError> {
        self.assign(other, |a, b| a + b)
    }

    /// Subtracts `other` from this matrix in place.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ImmutableMutation` if the matrix is
    /// immutable, `QuantityError::IncompatibleDimensions` if the dimensions
    /// differ and `QuantityError::ShapeMismatch` if the shapes differ.
    pub fn decrement_by(&mut self, other: &Self) -> Result<(), QuantityError> {
        self.assign(other, |a, b| a - b)
    }

    fn assign(&mut self, other: &Self, f: impl Fn(N, N) -> N) -> Result<(), QuantityError> {
        let data = self.data.data_mut()?;
        check_dimensions(self.zero.dimensions(), other.dimensions())?;
        data.assign_binary(other.data.data(), f)
    }

    /// Multiplies every entry by `factor` in the display unit, in place.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ImmutableMutation` if the matrix is
    /// immutable.
    pub fn multiply_by(&mut self, factor: N) -> Result<(), QuantityError> {
        self.apply(move |value| value * factor)
    }

    /// Divides every entry by `divisor` in the display unit, in place.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ImmutableMutation` if the matrix is
    /// immutable.
    pub fn divide_by(&mut self, divisor: N) -> Result<(), QuantityError> {
        self.apply(move |value| value / divisor)
    }

    /// Replaces every entry by its absolute value, in place.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ImmutableMutation` if the matrix is
    /// immutable.
    pub fn abs(&mut self) -> Result<(), QuantityError> {
        self.apply(N::abs)
    }

    /// Rounds every entry up in the display unit, in place.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ImmutableMutation` if the matrix is
    /// immutable.
    pub fn ceil(&mut self) -> Result<(), QuantityError> {
        self.apply(N::ceil)
    }

    /// Rounds every entry down in the display unit, in place.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ImmutableMutation` if the matrix is
    /// immutable.
    pub fn floor(&mut self) -> Result<(), QuantityError> {
        self.apply(N::floor)
    }

    /// Negates every entry, in place.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ImmutableMutation` if the matrix is
    /// immutable.
    pub fn neg(&mut self) -> Result<(), QuantityError> {
        self.apply(N::neg)
    }

    /// Rounds every entry to the nearest integer in the display unit, with
    /// ties going to the even integer, in place.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ImmutableMutation` if the matrix is
    /// immutable.
    pub fn rint(&mut self) -> Result<(), QuantityError> {
        self.apply(Real::rint)
    }

    fn apply(&mut self, f: impl Fn(N) -> N) -> Result<(), QuantityError> {
        let data = self.data.data_mut()?;
        data.assign_unary(in_display_unit(self.zero.display_unit(), f));
        Ok(())
    }

    /// Re-types the matrix as a matrix of a named relative quantity.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::InvalidUnit` if the dimensions do not match
    /// those of the target quantity.
    pub fn into_quantity<T>(self) -> Result<Matrix<T, N>, QuantityError>
    where
        T: RelativeQuantity + NamedQuantity,
    {
        Ok(Matrix {
            data: self.data,
            zero: self.zero.into_quantity()?,
        })
    }

    /// Erases the quantity of the matrix.
    #[must_use]
    pub fn into_si(self) -> Matrix<SI, N> {
        Matrix {
            data: self.data,
            zero: self.zero.into_si(),
        }
    }

    /// Returns the same matrix with another display unit.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::InvalidUnit` if the unit does not belong to
    /// the quantity.
    pub fn with_display_unit(&self, unit: &Unit) -> Result<Self, QuantityError> {
        Ok(Self {
            data: self.data.clone(),
            zero: self.zero.with_display_unit(unit)?,
        })
    }

    /// Returns a dense copy, in the same state as this matrix.
    #[must_use]
    pub fn to_dense(&self) -> Self {
        self.with_storage(StorageType::Dense)
    }

    /// Returns a sparse copy, in the same state as this matrix.
    #[must_use]
    pub fn to_sparse(&self) -> Self {
        self.with_storage(StorageType::Sparse)
    }

    fn with_storage(&self, storage: StorageType) -> Self {
        Self {
            data: self.data.with_data(self.data.data().to_storage(storage)),
            zero: self.zero.clone(),
        }
    }

    /// Returns an immutable matrix sharing this matrix's values.
    ///
    /// Later writes through this matrix are not visible in the result.
    #[must_use]
    pub fn immutable(&self) -> Self {
        Self {
            data: self.data.freeze(),
            zero: self.zero.clone(),
        }
    }

    /// Returns a mutable matrix starting from this matrix's values.
    ///
    /// Writes through the result are not visible in this matrix.
    #[must_use]
    pub fn mutable(&self) -> Self {
        Self {
            data: self.data.thaw(),
            zero: self.zero.clone(),
        }
    }
}

impl<Q: RelativeQuantity, N: Real> Clone for Matrix<Q, N> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            zero: self.zero.clone(),
        }
    }
}

impl<Q: RelativeQuantity, N: Real> fmt::Debug for Matrix<Q, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("quantity", &Q::name())
            .field("data", self.data.data())
            .field("unit", &self.display_unit().id())
            .field("mutable", &self.is_mutable())
            .finish()
    }
}

impl<Q: RelativeQuantity, N: Real> fmt::Display for Matrix<Q, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cols = self.cols();
        write!(f, "[")?;
        for (index, si) in self.data.data().iter().enumerate() {
            if index > 0 {
                let separator = if index % cols == 0 { "; " } else { ", " };
                write!(f, "{separator}")?;
            }
            write!(f, "{}", from_si(si, self.display_unit()))?;
        }
        write!(f, "] {}", self.display_unit())
    }
}

impl<Q: RelativeQuantity, N: Real> PartialEq for Matrix<Q, N> {
    fn eq(&self, other: &Self) -> bool {
        self.dimensions() == other.dimensions() && self.data.data() == other.data.data()
    }
}

#[cfg(test)]
mod tests {
    use measura_shared::assert_is_close;
    use measura_unit::catalog::{Area, Duration, Length, Temperature};

    use super::*;

    fn unit<Q: NamedQuantity>(id: &str) -> Unit {
        Q::unit(id).expect("unit exists in catalogue")
    }

    fn lengths(rows: &[&[f64]], storage: StorageType) -> Matrix<Length> {
        Matrix::new(rows, &Length::si_unit(), storage).expect("valid matrix")
    }

    mod construction_tests {
        use super::*;

        #[test]
        fn new_converts_to_si() {
            let km = unit::<Length>("km");
            let matrix = Matrix::<Length>::new(&[[1.0, 2.0], [3.0, 4.0]], &km, StorageType::Dense)
                .expect("valid");
            assert_eq!((matrix.rows(), matrix.cols()), (2, 2));
            assert_is_close!(3000.0, matrix.get_si(1, 0).expect("in range"));
            assert_is_close!(4.0, matrix.get_in_unit(1, 1).expect("in range"));
            assert!(!matrix.is_mutable());
        }

        #[test]
        fn from_vec_rejects_ragged_rows() {
            let rows = vec![vec![1.0, 2.0], vec![3.0]];
            let result = Matrix::<Length>::from_vec(rows, &Length::si_unit());
            assert_eq!(
                result.err(),
                Some(QuantityError::Construction(ConstructionError::RaggedRows {
                    row: 1,
                    expected: 2,
                    actual: 1,
                }))
            );
        }

        #[test]
        fn from_scalars_uses_first_unit() {
            let km = unit::<Length>("km");
            let one = Rel::<Length>::new(1.0, &km).expect("valid");
            let rows = [vec![one.clone(), Rel::from_si(0.0)], vec![Rel::from_si(0.0), one]];
            let matrix = Matrix::from_scalars(&rows, StorageType::Sparse).expect("valid");
            assert_eq!(matrix.display_unit().id(), "km");
            assert_eq!(matrix.cardinality(), 2);
            assert!(matrix.is_sparse());
        }

        #[test]
        fn from_scalars_rejects_empty_input() {
            let rows: [Vec<Rel<Length>>; 0] = [];
            assert_eq!(
                Matrix::from_scalars(&rows, StorageType::Dense).err(),
                Some(QuantityError::Construction(ConstructionError::EmptyInput))
            );
        }

        #[test]
        fn sparse_from_values_and_scalars() {
            let from_values =
                Matrix::<Length>::sparse(3, 3, [(0, 0, 1.0), (2, 1, 2.0)], &Length::si_unit())
                    .expect("valid");
            let from_scalars = Matrix::sparse_scalars(
                3,
                3,
                &[(2, 1, Rel::<Length>::from_si(2.0)), (0, 0, Rel::from_si(1.0))],
            )
            .expect("valid");
            assert_eq!(from_values, from_scalars);
            assert_eq!(from_values.cardinality(), 2);
        }

        #[test]
        fn zeros_has_no_nonzero_entries() {
            let matrix = Matrix::<Duration>::zeros(4, 5, &Duration::si_unit(), StorageType::Sparse)
                .expect("valid");
            assert_eq!(matrix.size(), 20);
            assert_eq!(matrix.cardinality(), 0);
        }
    }

    mod projection_tests {
        use super::*;

        #[test]
        fn row_column_and_diagonal() {
            for storage in [StorageType::Dense, StorageType::Sparse] {
                let matrix = lengths(&[&[1.0, 2.0], &[3.0, 4.0]], storage);

                let row = matrix.row(1).expect("in range");
                assert_eq!(row.iter().map(|value| value.si()).collect::<Vec<_>>(), [3.0, 4.0]);
                assert_eq!(row.storage_type(), storage);

                let column = matrix.column(0).expect("in range");
                assert_eq!(column.iter().map(|value| value.si()).collect::<Vec<_>>(), [1.0, 3.0]);

                let diagonal = matrix.diagonal().expect("square");
                assert_is_close!(5.0, diagonal.sum().si());
            }
        }

        #[test]
        fn out_of_range_projection() {
            let matrix = lengths(&[&[1.0, 2.0, 3.0]], StorageType::Dense);
            assert_eq!(
                matrix.row(1).err(),
                Some(QuantityError::row_out_of_range(1, 1))
            );
            assert_eq!(
                matrix.column(3).err(),
                Some(QuantityError::column_out_of_range(3, 3))
            );
            assert_eq!(
                matrix.diagonal().err(),
                Some(QuantityError::NonSquareMatrix { rows: 1, cols: 3 })
            );
        }

        #[test]
        fn transpose_swaps_shape() {
            let matrix = lengths(&[&[1.0, 2.0, 3.0]], StorageType::Sparse);
            let transposed = matrix.transpose();
            assert_eq!(transposed.shape(), Shape::Matrix { rows: 3, cols: 1 });
            assert_eq!(transposed.get_si(2, 0), Ok(3.0));
            assert!(transposed.is_sparse());
        }
    }

    mod determinant_tests {
        use super::*;

        #[test]
        fn determinant_of_lengths_is_a_volume() {
            let matrix = lengths(
                &[&[2.0, 3.0, 5.0], &[7.0, 11.0, 13.0], &[17.0, 19.0, 23.0]],
                StorageType::Dense,
            );
            let determinant = matrix.determinant().expect("square");
            assert_is_close!(-78.0, determinant.si());
            assert_eq!(determinant.dimensions(), SIDimensions::VOLUME);
            assert_eq!(determinant.display_unit().id(), "m3");
        }

        #[test]
        fn determinant_of_non_square_matrix() {
            let matrix = lengths(&[&[1.0, 2.0]], StorageType::Sparse);
            assert_eq!(
                matrix.determinant_si(),
                Err(QuantityError::NonSquareMatrix { rows: 1, cols: 2 })
            );
        }
    }

    mod mutation_tests {
        use super::*;

        #[test]
        fn immutable_rejects_writes() {
            let mut matrix = lengths(&[&[1.0]], StorageType::Dense);
            assert_eq!(matrix.set_si(0, 0, 2.0), Err(QuantityError::ImmutableMutation));
            assert_eq!(matrix.floor(), Err(QuantityError::ImmutableMutation));
            assert_eq!(matrix.get_si(0, 0), Ok(1.0));
        }

        #[test]
        fn mutable_copy_leaves_original_untouched() {
            let original = lengths(&[&[1.0, 0.0], &[0.0, 1.0]], StorageType::Sparse);
            let mut copy = original.mutable();

            copy.set(0, 1, &Rel::from_si(5.0)).expect("mutable");
            copy.increment_by(&original).expect("mutable");

            assert_eq!(original.get_si(0, 1), Ok(0.0));
            assert_eq!(copy.get_si(0, 1), Ok(5.0));
            assert_eq!(copy.get_si(1, 1), Ok(2.0));
        }

        #[test]
        fn unary_operations_in_fahrenheit() {
            let degf = unit::<Temperature>("degF");
            let mut matrix = Matrix::<Temperature>::new(&[[-1.5, 2.5]], &degf, StorageType::Dense)
                .expect("valid")
                .mutable();

            matrix.neg().expect("mutable");
            matrix.rint().expect("mutable");
            assert_is_close!(2.0, matrix.get_in_unit(0, 0).expect("in range"));
            assert_is_close!(-2.0, matrix.get_in_unit(0, 1).expect("in range"));

            matrix.multiply_by(4.5).expect("mutable");
            assert_is_close!(5.0, matrix.get_si(0, 0).expect("in range"));
        }
    }

    mod arithmetic_tests {
        use super::*;

        #[test]
        fn plus_and_minus() {
            let a = lengths(&[&[1.0, 2.0], &[3.0, 4.0]], StorageType::Dense);
            let b = lengths(&[&[1.0, 0.0], &[0.0, 1.0]], StorageType::Sparse);

            let sum = a.checked_plus(&b).expect("compatible");
            assert_is_close!(12.0, sum.sum().si());

            let difference = sum.checked_minus(&b).expect("compatible");
            assert_eq!(difference, a);
        }

        #[test]
        fn plus_rejects_different_shapes() {
            let a = lengths(&[&[1.0, 2.0]], StorageType::Dense);
            let b = lengths(&[&[1.0], &[2.0]], StorageType::Dense);
            assert_eq!(
                a.checked_plus(&b).err(),
                Some(QuantityError::ShapeMismatch {
                    expected: Shape::Matrix { rows: 1, cols: 2 },
                    actual: Shape::Matrix { rows: 2, cols: 1 },
                })
            );
        }

        #[test]
        fn times_then_divide_returns_to_original() {
            let a = lengths(&[&[1.0, 2.0], &[3.0, 4.0]], StorageType::Dense);
            let b = lengths(&[&[5.0, 6.0], &[7.0, 8.0]], StorageType::Dense);

            let product = a.times(&b).expect("same shape");
            assert_eq!(product.display_unit().id(), "m2");
            let product = product.into_quantity::<Area>().expect("area");

            let quotient = product.divide(&b).expect("same shape");
            assert_eq!(quotient.dimensions(), SIDimensions::LENGTH);
            let quotient = quotient.into_quantity::<Length>().expect("length");
            for (expected, actual) in a.iter().zip(quotient.iter()) {
                assert_is_close!(expected.si(), actual.si());
            }
        }
    }

    mod conversion_tests {
        use super::*;

        #[test]
        fn dense_and_sparse_are_equal() {
            let matrix = lengths(&[&[0.0, 1.0], &[2.0, 0.0]], StorageType::Dense);
            let sparse = matrix.to_sparse();
            assert!(sparse.is_sparse());
            assert_eq!(sparse, matrix);
            assert_eq!(sparse.to_dense(), matrix);
            assert_eq!(sparse.cardinality(), 2);
        }

        #[test]
        fn display_separates_rows() {
            let matrix = lengths(&[&[1.0, 2.0], &[3.0, 4.0]], StorageType::Sparse);
            assert_eq!(matrix.to_string(), "[1, 2; 3, 4] m");
        }
    }
}
