//! Two-dimensional dense and sparse storage
//!
//! A matrix is stored as a [`VectorData`] over its row-major linear index
//! `row * cols + col`, so dense and sparse matrices share the vector
//! machinery.

use measura_shared::{ConstructionError, Position, QuantityError, Real, Shape};

use crate::{
    storage::StorageType,
    vector_data::{VectorData, sort_entries},
};

/// Matrices larger than this have their determinant logged as expensive.
pub const LARGE_DETERMINANT_SIZE: usize = 10;

/// The SI values of a matrix, stored densely or sparsely.
#[derive(Debug, Clone)]
pub struct MatrixData<N: Real> {
    rows: usize,
    cols: usize,
    data: VectorData<N>,
}

impl<N: Real> MatrixData<N> {
    /// Creates dense data from row-major values.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::Construction` if the number of values is not
    /// `rows * cols`.
    pub fn dense(rows: usize, cols: usize, values: Vec<N>) -> Result<Self, QuantityError> {
        if values.len() != rows * cols {
            return Err(ConstructionError::LengthMismatch {
                expected: rows * cols,
                actual: values.len(),
            }
            .into());
        }

        Ok(Self {
            rows,
            cols,
            data: VectorData::dense(values),
        })
    }

    /// Creates data from a list of rows, in the given layout.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::Construction` if the rows differ in length.
    pub fn from_rows<R: AsRef<[N]>>(
        rows: &[R],
        storage: StorageType,
    ) -> Result<Self, QuantityError> {
        let cols = rows.first().map_or(0, |row| row.as_ref().len());

        let mut values = Vec::with_capacity(rows.len() * cols);
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(ConstructionError::RaggedRows {
                    row: index,
                    expected: cols,
                    actual: row.len(),
                }
                .into());
            }
            values.extend_from_slice(row);
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            data: VectorData::from_values(values, storage),
        })
    }

    /// Creates all-zero data of the given shape.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize, storage: StorageType) -> Self {
        Self {
            rows,
            cols,
            data: VectorData::zeros(rows * cols, storage),
        }
    }

    /// Creates sparse data from `(row, col, value)` entries.
    ///
    /// Entries may be given in any order. Entries whose value is zero are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::Construction` if an entry lies outside of the
    /// shape or a position appears twice.
    pub fn sparse(
        rows: usize,
        cols: usize,
        entries: impl IntoIterator<Item = (usize, usize, N)>,
    ) -> Result<Self, QuantityError> {
        let mut linear = Vec::new();
        for (row, col, value) in entries {
            if row >= rows || col >= cols {
                return Err(ConstructionError::EntryOutOfBounds {
                    position: Position::Entry { row, col },
                    size: Shape::Matrix { rows, cols },
                }
                .into());
            }
            linear.push((row * cols + col, value));
        }

        let (indices, values) =
            sort_entries(linear).map_err(|index| ConstructionError::DuplicateEntry {
                position: Position::Entry {
                    row: index / cols,
                    col: index % cols,
                },
            })?;

        Ok(Self {
            rows,
            cols,
            data: VectorData::from_sorted(rows * cols, indices, values),
        })
    }

    /// The number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// The number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// The number of positions, `rows * cols`.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.rows * self.cols
    }

    /// The shape of the matrix.
    #[must_use]
    pub const fn shape(&self) -> Shape {
        Shape::Matrix {
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Checks if the matrix has as many rows as columns.
    #[must_use]
    pub const fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// The layout of the data.
    #[must_use]
    pub const fn storage_type(&self) -> StorageType {
        self.data.storage_type()
    }

    /// Checks if the data is stored densely.
    #[must_use]
    pub const fn is_dense(&self) -> bool {
        self.data.is_dense()
    }

    /// Checks if the data is stored sparsely.
    #[must_use]
    pub const fn is_sparse(&self) -> bool {
        self.data.is_sparse()
    }

    fn linear_index(&self, row: usize, col: usize) -> Result<usize, QuantityError> {
        if row >= self.rows {
            return Err(QuantityError::row_out_of_range(row, self.rows));
        }
        if col >= self.cols {
            return Err(QuantityError::column_out_of_range(col, self.cols));
        }
        Ok(row * self.cols + col)
    }

    /// The value at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::IndexOutOfRange` if the row or column lies
    /// outside of the shape.
    pub fn get(&self, row: usize, col: usize) -> Result<N, QuantityError> {
        self.data.get(self.linear_index(row, col)?)
    }

    /// Sets the value at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::IndexOutOfRange` if the row or column lies
    /// outside of the shape.
    pub fn set(&mut self, row: usize, col: usize, value: N) -> Result<(), QuantityError> {
        let index = self.linear_index(row, col)?;
        self.data.set(index, value)
    }

    /// The number of nonzero positions.
    #[must_use]
    pub fn cardinality(&self) -> usize {
        self.data.cardinality()
    }

    /// The sum of all values, added in row-major order.
    #[must_use]
    pub fn sum(&self) -> N {
        self.data.sum()
    }

    /// Iterates over the values of all positions in row-major order.
    pub fn iter(&self) -> crate::vector_data::Iter<'_, N> {
        self.data.iter()
    }

    /// Iterates over the `(row, col, value)` triples of nonzero positions.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, N)> + '_ {
        self.data
            .entries()
            .map(|(index, value)| (index / self.cols, index % self.cols, value))
    }

    /// Returns a dense copy of the data.
    #[must_use]
    pub fn to_dense(&self) -> Self {
        self.with_data(self.data.to_dense())
    }

    /// Returns a sparse copy of the data.
    #[must_use]
    pub fn to_sparse(&self) -> Self {
        self.with_data(self.data.to_sparse())
    }

    /// Returns a copy in the given layout.
    #[must_use]
    pub fn to_storage(&self, storage: StorageType) -> Self {
        self.with_data(self.data.to_storage(storage))
    }

    const fn with_data(&self, data: VectorData<N>) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data,
        }
    }

    /// Applies `f` to every position and returns the result in the same
    /// layout.
    #[must_use]
    pub fn map(&self, f: impl Fn(N) -> N) -> Self {
        self.with_data(self.data.map(f))
    }

    /// Applies `f` to every position in place.
    pub fn assign_unary(&mut self, f: impl Fn(N) -> N) {
        self.data.assign_unary(f);
    }

    /// Combines two matrices of equal shape position by position.
    ///
    /// The result is sparse only if both operands are sparse and `f(0, 0)`
    /// is zero; otherwise it is dense.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ShapeMismatch` if the shapes differ.
    pub fn zip_with(&self, other: &Self, f: impl Fn(N, N) -> N) -> Result<Self, QuantityError> {
        self.check_shape(other)?;
        Ok(self.with_data(self.data.zip_with(&other.data, f)?))
    }

    /// Combines `other` into this matrix position by position.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ShapeMismatch` if the shapes differ.
    pub fn assign_binary(
        &mut self,
        other: &Self,
        f: impl Fn(N, N) -> N,
    ) -> Result<(), QuantityError> {
        self.check_shape(other)?;
        self.data.assign_binary(&other.data, f)
    }

    fn check_shape(&self, other: &Self) -> Result<(), QuantityError> {
        if self.rows == other.rows && self.cols == other.cols {
            Ok(())
        } else {
            Err(QuantityError::ShapeMismatch {
                expected: self.shape(),
                actual: other.shape(),
            })
        }
    }

    /// Returns the transposed matrix in the same layout.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let transposed = |(row, col, value): (usize, usize, N)| (col * self.rows + row, value);

        let data = if self.is_dense() {
            let mut values = vec![N::zero(); self.size()];
            for (index, value) in self.entries().map(transposed) {
                values[index] = value;
            }
            VectorData::dense(values)
        } else {
            let mut entries: Vec<_> = self.entries().map(transposed).collect();
            entries.sort_by_key(|(index, _)| *index);
            let (indices, values) = entries.into_iter().unzip();
            VectorData::from_sorted(self.size(), indices, values)
        };

        Self {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }

    /// Returns a row as vector data of the same layout.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::IndexOutOfRange` if the row lies outside of
    /// the shape.
    pub fn row(&self, row: usize) -> Result<VectorData<N>, QuantityError> {
        if row >= self.rows {
            return Err(QuantityError::row_out_of_range(row, self.rows));
        }
        Ok(self.project(self.cols, |r, c| (r == row).then_some(c)))
    }

    /// Returns a column as vector data of the same layout.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::IndexOutOfRange` if the column lies outside
    /// of the shape.
    pub fn column(&self, col: usize) -> Result<VectorData<N>, QuantityError> {
        if col >= self.cols {
            return Err(QuantityError::column_out_of_range(col, self.cols));
        }
        Ok(self.project(self.rows, |r, c| (c == col).then_some(r)))
    }

    /// Returns the diagonal as vector data of the same layout.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::NonSquareMatrix` if the matrix is not square.
    pub fn diagonal(&self) -> Result<VectorData<N>, QuantityError> {
        self.check_square()?;
        Ok(self.project(self.rows, |r, c| (r == c).then_some(r)))
    }

    /// Collects the positions selected by `position` into vector data of
    /// `size` positions. The selected target positions must increase with
    /// the row-major order of the source positions.
    fn project(
        &self,
        size: usize,
        position: impl Fn(usize, usize) -> Option<usize>,
    ) -> VectorData<N> {
        let selected = self
            .entries()
            .filter_map(|(row, col, value)| position(row, col).map(|target| (target, value)));

        if self.is_dense() {
            let mut values = vec![N::zero(); size];
            for (target, value) in selected {
                values[target] = value;
            }
            VectorData::dense(values)
        } else {
            let (indices, values) = selected.unzip();
            VectorData::from_sorted(size, indices, values)
        }
    }

    fn check_square(&self) -> Result<(), QuantityError> {
        if self.is_square() {
            Ok(())
        } else {
            Err(QuantityError::NonSquareMatrix {
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// The determinant of a square matrix.
    ///
    /// This is computed by cofactor expansion along the first row, which
    /// takes factorial time. It is meant for small matrices only; matrices
    /// larger than [`LARGE_DETERMINANT_SIZE`] are logged as a warning. The
    /// determinant of the empty matrix is 1.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::NonSquareMatrix` if the matrix is not square.
    pub fn determinant(&self) -> Result<N, QuantityError> {
        self.check_square()?;

        if self.rows > LARGE_DETERMINANT_SIZE {
            tracing::warn!(
                size = self.rows,
                "computing determinant by cofactor expansion takes factorial time"
            );
        }

        let values: Vec<N> = self.iter().collect();
        Ok(cofactor_determinant(&values, self.rows))
    }
}

fn cofactor_determinant<N: Real>(values: &[N], n: usize) -> N {
    match n {
        0 => N::one(),
        1 => values[0],
        2 => values[0] * values[3] - values[1] * values[2],
        _ => {
            let mut determinant = N::zero();
            let mut minor = Vec::with_capacity((n - 1) * (n - 1));

            for (column, &entry) in values[..n].iter().enumerate() {
                minor.clear();
                for row in values[n..].chunks(n) {
                    for (col, &value) in row.iter().enumerate() {
                        if col != column {
                            minor.push(value);
                        }
                    }
                }

                let cofactor = entry * cofactor_determinant(&minor, n - 1);
                if column % 2 == 0 {
                    determinant = determinant + cofactor;
                } else {
                    determinant = determinant - cofactor;
                }
            }

            determinant
        }
    }
}

impl<N: Real> PartialEq for MatrixData<N> {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.data == other.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn both_layouts(rows: &[&[f64]]) -> [MatrixData<f64>; 2] {
        [StorageType::Dense, StorageType::Sparse]
            .map(|storage| MatrixData::from_rows(rows, storage).expect("rectangular rows"))
    }

    mod construction_tests {
        use super::*;

        #[test]
        fn from_rows_rejects_ragged_input() {
            let rows: [&[f64]; 2] = [&[1.0, 2.0], &[3.0]];
            assert_eq!(
                MatrixData::from_rows(&rows, StorageType::Dense),
                Err(QuantityError::Construction(ConstructionError::RaggedRows {
                    row: 1,
                    expected: 2,
                    actual: 1,
                }))
            );
        }

        #[test]
        fn dense_rejects_wrong_length() {
            assert_eq!(
                MatrixData::dense(2, 2, vec![1.0, 2.0, 3.0]),
                Err(QuantityError::Construction(ConstructionError::LengthMismatch {
                    expected: 4,
                    actual: 3,
                }))
            );
        }

        #[test]
        fn sparse_rejects_out_of_bounds_entry() {
            assert_eq!(
                MatrixData::sparse(3, 3, [(0, 0, 1.0), (3, 0, 2.0)]),
                Err(QuantityError::Construction(ConstructionError::EntryOutOfBounds {
                    position: Position::Entry { row: 3, col: 0 },
                    size: Shape::Matrix { rows: 3, cols: 3 },
                }))
            );
        }

        #[test]
        fn sparse_rejects_duplicate_entry() {
            assert_eq!(
                MatrixData::sparse(3, 4, [(1, 2, 1.0), (1, 2, 2.0)]),
                Err(QuantityError::Construction(ConstructionError::DuplicateEntry {
                    position: Position::Entry { row: 1, col: 2 },
                }))
            );
        }

        #[test]
        fn sparse_and_dense_are_equal() {
            let sparse = MatrixData::sparse(2, 3, [(1, 2, 6.0), (0, 0, 1.0)]).expect("valid");
            let dense = MatrixData::dense(2, 3, vec![1.0, 0.0, 0.0, 0.0, 0.0, 6.0]).expect("valid");
            assert_eq!(sparse, dense);
            assert!(sparse.is_sparse());
            assert!(dense.is_dense());
        }
    }

    mod access_tests {
        use super::*;

        #[test]
        fn get_and_set() {
            for mut matrix in both_layouts(&[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]) {
                assert_eq!(matrix.get(2, 1), Ok(6.0));
                matrix.set(2, 1, 0.0).expect("in range");
                matrix.set(0, 1, 9.0).expect("in range");
                assert_eq!(matrix.get(0, 1), Ok(9.0));
                assert_eq!(matrix.get(2, 1), Ok(0.0));
                assert_eq!(matrix.cardinality(), 5);
            }
        }

        #[test]
        fn out_of_range_reports_axis() {
            for matrix in both_layouts(&[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]) {
                assert_eq!(matrix.get(3, 0), Err(QuantityError::row_out_of_range(3, 3)));
                assert_eq!(matrix.get(0, 2), Err(QuantityError::column_out_of_range(2, 2)));
            }
        }

        #[test]
        fn entries_are_row_major() {
            let matrix = MatrixData::sparse(2, 2, [(1, 0, 3.0), (0, 1, 2.0)]).expect("valid");
            assert_eq!(matrix.entries().collect::<Vec<_>>(), [(0, 1, 2.0), (1, 0, 3.0)]);
        }
    }

    mod projection_tests {
        use super::*;

        #[test]
        fn row_and_column() {
            for matrix in both_layouts(&[&[1.0, 0.0, 3.0], &[0.0, 5.0, 6.0]]) {
                let row = matrix.row(1).expect("in range");
                assert_eq!(row.iter().collect::<Vec<_>>(), [0.0, 5.0, 6.0]);
                assert_eq!(row.storage_type(), matrix.storage_type());

                let column = matrix.column(2).expect("in range");
                assert_eq!(column.iter().collect::<Vec<_>>(), [3.0, 6.0]);
                assert_eq!(column.storage_type(), matrix.storage_type());

                assert_eq!(matrix.row(2), Err(QuantityError::row_out_of_range(2, 2)));
                assert_eq!(
                    matrix.column(3),
                    Err(QuantityError::column_out_of_range(3, 3))
                );
            }
        }

        #[test]
        fn diagonal_of_square_matrix() {
            for matrix in both_layouts(&[&[1.0, 2.0], &[3.0, 4.0]]) {
                let diagonal = matrix.diagonal().expect("square");
                assert_eq!(diagonal.iter().collect::<Vec<_>>(), [1.0, 4.0]);
            }
        }

        #[test]
        fn diagonal_of_non_square_matrix() {
            let matrix = MatrixData::<f64>::zeros(2, 3, StorageType::Sparse);
            assert_eq!(
                matrix.diagonal(),
                Err(QuantityError::NonSquareMatrix { rows: 2, cols: 3 })
            );
        }

        #[test]
        fn transpose_keeps_layout() {
            for matrix in both_layouts(&[&[1.0, 2.0, 3.0], &[4.0, 0.0, 6.0]]) {
                let transposed = matrix.transpose();
                assert_eq!((transposed.rows(), transposed.cols()), (3, 2));
                assert_eq!(transposed.storage_type(), matrix.storage_type());
                assert_eq!(
                    transposed.iter().collect::<Vec<_>>(),
                    [1.0, 4.0, 2.0, 0.0, 3.0, 6.0]
                );
                assert_eq!(transposed.transpose(), matrix);
            }
        }
    }

    mod arithmetic_tests {
        use super::*;

        #[test]
        fn zip_with_shape_mismatch() {
            let a = MatrixData::<f64>::zeros(2, 3, StorageType::Dense);
            let b = MatrixData::<f64>::zeros(3, 2, StorageType::Dense);
            assert_eq!(
                a.zip_with(&b, |x, y| x + y),
                Err(QuantityError::ShapeMismatch {
                    expected: Shape::Matrix { rows: 2, cols: 3 },
                    actual: Shape::Matrix { rows: 3, cols: 2 },
                })
            );
        }

        #[test]
        fn assign_binary_in_place() {
            let [mut dense, sparse] = both_layouts(&[&[1.0, 0.0], &[0.0, 2.0]]);
            dense.assign_binary(&sparse, |x, y| x - y).expect("same shape");
            assert_eq!(dense.cardinality(), 0);
            assert_eq!(dense.sum(), 0.0);
        }

        #[test]
        fn map_and_assign_unary() {
            for mut matrix in both_layouts(&[&[-1.5, 0.0], &[2.5, -0.2]]) {
                let mapped = matrix.map(f64::abs);
                assert_eq!(mapped.iter().collect::<Vec<_>>(), [1.5, 0.0, 2.5, 0.2]);

                matrix.assign_unary(f64::ceil);
                assert_eq!(matrix.iter().collect::<Vec<_>>(), [-1.0, 0.0, 3.0, -0.0]);
                assert_eq!(matrix.cardinality(), 2);
            }
        }
    }

    mod determinant_tests {
        use super::*;

        #[test]
        fn one_by_one() {
            for matrix in both_layouts(&[&[2.0]]) {
                assert_eq!(matrix.determinant(), Ok(2.0));
            }
        }

        #[test]
        fn two_by_two() {
            for matrix in both_layouts(&[&[2.0, 3.0], &[5.0, 7.0]]) {
                assert_eq!(matrix.determinant(), Ok(-1.0));
            }
        }

        #[test]
        fn three_by_three() {
            let rows: [&[f64]; 3] = [&[2.0, 3.0, 5.0], &[7.0, 11.0, 13.0], &[17.0, 19.0, 23.0]];
            for matrix in both_layouts(&rows) {
                assert_eq!(matrix.determinant(), Ok(-78.0));
            }
        }

        #[test]
        fn four_by_four_with_zeros() {
            let entries = [
                (0, 0, 1.0),
                (1, 1, 2.0),
                (2, 2, 3.0),
                (3, 3, 4.0),
                (0, 3, 5.0),
            ];
            let matrix = MatrixData::sparse(4, 4, entries).expect("valid");
            assert_eq!(matrix.determinant(), Ok(24.0));
        }

        #[test]
        fn zero_entries_still_propagate_nan() {
            let rows: [&[f64]; 3] = [
                &[0.0, 1.0, 0.0],
                &[1.0, f64::INFINITY, 0.0],
                &[0.0, 0.0, 1.0],
            ];
            for matrix in both_layouts(&rows) {
                let determinant = matrix.determinant().expect("square");
                assert!(determinant.is_nan(), "{determinant}");
            }
        }

        #[test]
        fn empty_matrix() {
            let matrix = MatrixData::<f64>::zeros(0, 0, StorageType::Dense);
            assert_eq!(matrix.determinant(), Ok(1.0));
        }

        #[test]
        fn non_square() {
            let matrix = MatrixData::<f64>::zeros(2, 3, StorageType::Dense);
            assert_eq!(
                matrix.determinant(),
                Err(QuantityError::NonSquareMatrix { rows: 2, cols: 3 })
            );
        }
    }
}
