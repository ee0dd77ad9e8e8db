//! One-dimensional dense and sparse storage

use std::{cmp::Ordering, iter, slice};

use measura_shared::{ConstructionError, Position, QuantityError, Real, Shape};

use crate::storage::StorageType;

/// The SI values of a vector, stored densely or sparsely.
///
/// Dense storage holds every position. Sparse storage holds the nonzero
/// positions only, as strictly increasing indices with a parallel array of
/// values; a position that becomes zero is removed. Both layouts holding the
/// same logical contents compare equal.
#[derive(Debug, Clone)]
pub struct VectorData<N: Real> {
    layout: Layout<N>,
}

#[derive(Debug, Clone)]
enum Layout<N> {
    Dense(Vec<N>),
    Sparse {
        size: usize,
        indices: Vec<usize>,
        values: Vec<N>,
    },
}

impl<N: Real> VectorData<N> {
    /// Creates dense data holding `values`.
    #[must_use]
    pub const fn dense(values: Vec<N>) -> Self {
        Self {
            layout: Layout::Dense(values),
        }
    }

    /// Creates data holding `values` in the given layout.
    #[must_use]
    pub fn from_values(values: Vec<N>, storage: StorageType) -> Self {
        let data = Self::dense(values);
        match storage {
            StorageType::Dense => data,
            StorageType::Sparse => data.to_sparse(),
        }
    }

    /// Creates all-zero data of the given size.
    #[must_use]
    pub fn zeros(size: usize, storage: StorageType) -> Self {
        match storage {
            StorageType::Dense => Self::dense(vec![N::zero(); size]),
            StorageType::Sparse => Self::from_sorted(size, Vec::new(), Vec::new()),
        }
    }

    /// Creates sparse data of the given size from `(index, value)` entries.
    ///
    /// Entries may be given in any order. Entries whose value is zero are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::Construction` if an index lies outside of
    /// `size` or appears twice.
    pub fn sparse(
        size: usize,
        entries: impl IntoIterator<Item = (usize, N)>,
    ) -> Result<Self, QuantityError> {
        let entries: Vec<_> = entries.into_iter().collect();

        if let Some(&(index, _)) = entries.iter().find(|(index, _)| *index >= size) {
            return Err(ConstructionError::EntryOutOfBounds {
                position: Position::Element(index),
                size: Shape::Vector(size),
            }
            .into());
        }

        let (indices, values) = sort_entries(entries).map_err(|index| {
            ConstructionError::DuplicateEntry {
                position: Position::Element(index),
            }
        })?;

        Ok(Self::from_sorted(size, indices, values))
    }

    /// Builds sparse data from strictly increasing indices, dropping zeros.
    pub(crate) fn from_sorted(size: usize, indices: Vec<usize>, values: Vec<N>) -> Self {
        let (indices, values) = if values.iter().any(|value| *value == N::zero()) {
            indices
                .into_iter()
                .zip(values)
                .filter(|(_, value)| *value != N::zero())
                .unzip()
        } else {
            (indices, values)
        };

        Self {
            layout: Layout::Sparse {
                size,
                indices,
                values,
            },
        }
    }

    /// The number of positions.
    #[must_use]
    pub fn size(&self) -> usize {
        match &self.layout {
            Layout::Dense(values) => values.len(),
            Layout::Sparse { size, .. } => *size,
        }
    }

    /// The layout of the data.
    #[must_use]
    pub const fn storage_type(&self) -> StorageType {
        match self.layout {
            Layout::Dense(_) => StorageType::Dense,
            Layout::Sparse { .. } => StorageType::Sparse,
        }
    }

    /// Checks if the data is stored densely.
    #[must_use]
    pub const fn is_dense(&self) -> bool {
        matches!(self.layout, Layout::Dense(_))
    }

    /// Checks if the data is stored sparsely.
    #[must_use]
    pub const fn is_sparse(&self) -> bool {
        matches!(self.layout, Layout::Sparse { .. })
    }

    /// The value at `index`.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::IndexOutOfRange` if `index` is not below the
    /// size.
    pub fn get(&self, index: usize) -> Result<N, QuantityError> {
        let out_of_range = || QuantityError::element_out_of_range(index, self.size());

        match &self.layout {
            Layout::Dense(values) => values.get(index).copied().ok_or_else(out_of_range),
            Layout::Sparse {
                size,
                indices,
                values,
            } => {
                if index >= *size {
                    return Err(out_of_range());
                }
                Ok(indices
                    .binary_search(&index)
                    .map_or_else(|_| N::zero(), |position| values[position]))
            }
        }
    }

    /// Sets the value at `index`.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::IndexOutOfRange` if `index` is not below the
    /// size.
    pub fn set(&mut self, index: usize, value: N) -> Result<(), QuantityError> {
        let size = self.size();
        let out_of_range = || QuantityError::element_out_of_range(index, size);

        match &mut self.layout {
            Layout::Dense(values) => {
                let slot = values.get_mut(index).ok_or_else(out_of_range)?;
                *slot = value;
            }
            Layout::Sparse {
                indices, values, ..
            } => {
                if index >= size {
                    return Err(out_of_range());
                }
                match indices.binary_search(&index) {
                    Ok(position) if value == N::zero() => {
                        indices.remove(position);
                        values.remove(position);
                    }
                    Ok(position) => values[position] = value,
                    Err(position) if value != N::zero() => {
                        indices.insert(position, index);
                        values.insert(position, value);
                    }
                    Err(_) => {}
                }
            }
        }

        Ok(())
    }

    /// The number of nonzero positions.
    #[must_use]
    pub fn cardinality(&self) -> usize {
        match &self.layout {
            Layout::Dense(values) => values.iter().filter(|value| **value != N::zero()).count(),
            Layout::Sparse { values, .. } => values.len(),
        }
    }

    /// The sum of all values, added left to right.
    #[must_use]
    pub fn sum(&self) -> N {
        let values = match &self.layout {
            Layout::Dense(values) | Layout::Sparse { values, .. } => values,
        };
        values.iter().fold(N::zero(), |sum, value| sum + *value)
    }

    /// Iterates over the values of all positions, zeros included.
    pub fn iter(&self) -> Iter<'_, N> {
        let inner = match &self.layout {
            Layout::Dense(values) => IterInner::Dense(values.iter()),
            Layout::Sparse {
                size,
                indices,
                values,
            } => IterInner::Sparse {
                position: 0,
                size: *size,
                indices,
                values,
            },
        };
        Iter { inner }
    }

    /// Iterates over the `(index, value)` pairs of nonzero positions.
    pub fn entries(&self) -> Box<dyn Iterator<Item = (usize, N)> + '_> {
        match &self.layout {
            Layout::Dense(values) => Box::new(
                values
                    .iter()
                    .copied()
                    .enumerate()
                    .filter(|(_, value)| *value != N::zero()),
            ),
            Layout::Sparse {
                indices, values, ..
            } => Box::new(indices.iter().copied().zip(values.iter().copied())),
        }
    }

    /// Returns a dense copy of the data.
    #[must_use]
    pub fn to_dense(&self) -> Self {
        Self::dense(self.iter().collect())
    }

    /// Returns a sparse copy of the data.
    #[must_use]
    pub fn to_sparse(&self) -> Self {
        let (indices, values): (Vec<usize>, Vec<N>) = self.entries().unzip();
        Self::from_sorted(self.size(), indices, values)
    }

    /// Returns a copy in the given layout.
    #[must_use]
    pub fn to_storage(&self, storage: StorageType) -> Self {
        match storage {
            StorageType::Dense => self.to_dense(),
            StorageType::Sparse => self.to_sparse(),
        }
    }

    /// Applies `f` to every position and returns the result in the same
    /// layout.
    #[must_use]
    pub fn map(&self, f: impl Fn(N) -> N) -> Self {
        match &self.layout {
            Layout::Dense(values) => Self::dense(values.iter().map(|value| f(*value)).collect()),
            Layout::Sparse {
                size,
                indices,
                values,
            } if f(N::zero()) == N::zero() => Self::from_sorted(
                *size,
                indices.clone(),
                values.iter().map(|value| f(*value)).collect(),
            ),
            Layout::Sparse { .. } => Self::dense(self.iter().map(f).collect()).to_sparse(),
        }
    }

    /// Applies `f` to every position in place.
    pub fn assign_unary(&mut self, f: impl Fn(N) -> N) {
        if let Layout::Dense(values) = &mut self.layout {
            for value in values {
                *value = f(*value);
            }
        } else {
            *self = self.map(f);
        }
    }

    /// Combines two vectors of equal size position by position.
    ///
    /// The result is sparse only if both operands are sparse and `f(0, 0)`
    /// is zero; otherwise it is dense.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ShapeMismatch` if the sizes differ.
    pub fn zip_with(&self, other: &Self, f: impl Fn(N, N) -> N) -> Result<Self, QuantityError> {
        if self.size() != other.size() {
            return Err(QuantityError::ShapeMismatch {
                expected: Shape::Vector(self.size()),
                actual: Shape::Vector(other.size()),
            });
        }

        match (&self.layout, &other.layout) {
            (
                Layout::Sparse {
                    size,
                    indices: lhs_indices,
                    values: lhs_values,
                },
                Layout::Sparse {
                    indices: rhs_indices,
                    values: rhs_values,
                    ..
                },
            ) if f(N::zero(), N::zero()) == N::zero() => {
                let (indices, values) = merge_sparse(
                    (lhs_indices.as_slice(), lhs_values.as_slice()),
                    (rhs_indices.as_slice(), rhs_values.as_slice()),
                    f,
                );
                Ok(Self::from_sorted(*size, indices, values))
            }
            _ => Ok(Self::dense(
                self.iter().zip(other.iter()).map(|(a, b)| f(a, b)).collect(),
            )),
        }
    }

    /// Combines `other` into this vector position by position.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ShapeMismatch` if the sizes differ.
    pub fn assign_binary(
        &mut self,
        other: &Self,
        f: impl Fn(N, N) -> N,
    ) -> Result<(), QuantityError> {
        *self = self.zip_with(other, f)?;
        Ok(())
    }
}

impl<N: Real> PartialEq for VectorData<N> {
    fn eq(&self, other: &Self) -> bool {
        self.size() == other.size() && self.iter().eq(other.iter())
    }
}

/// Sorts entries by index, failing with the first duplicated index.
pub(crate) fn sort_entries<N: Real>(
    mut entries: Vec<(usize, N)>,
) -> Result<(Vec<usize>, Vec<N>), usize> {
    entries.sort_by_key(|(index, _)| *index);

    if let Some(pair) = entries.windows(2).find(|pair| pair[0].0 == pair[1].0) {
        return Err(pair[0].0);
    }

    Ok(entries.into_iter().unzip())
}

fn merge_sparse<N: Real>(
    (lhs_indices, lhs_values): (&[usize], &[N]),
    (rhs_indices, rhs_values): (&[usize], &[N]),
    f: impl Fn(N, N) -> N,
) -> (Vec<usize>, Vec<N>) {
    let zero = N::zero();
    let mut indices = Vec::with_capacity(lhs_indices.len() + rhs_indices.len());
    let mut values = Vec::with_capacity(lhs_indices.len() + rhs_indices.len());
    let (mut lhs, mut rhs) = (0, 0);

    loop {
        let (index, value) = match (lhs_indices.get(lhs), rhs_indices.get(rhs)) {
            (Some(&a), Some(&b)) => match a.cmp(&b) {
                Ordering::Less => {
                    lhs += 1;
                    (a, f(lhs_values[lhs - 1], zero))
                }
                Ordering::Greater => {
                    rhs += 1;
                    (b, f(zero, rhs_values[rhs - 1]))
                }
                Ordering::Equal => {
                    lhs += 1;
                    rhs += 1;
                    (a, f(lhs_values[lhs - 1], rhs_values[rhs - 1]))
                }
            },
            (Some(&a), None) => {
                lhs += 1;
                (a, f(lhs_values[lhs - 1], zero))
            }
            (None, Some(&b)) => {
                rhs += 1;
                (b, f(zero, rhs_values[rhs - 1]))
            }
            (None, None) => break,
        };

        if value != zero {
            indices.push(index);
            values.push(value);
        }
    }

    (indices, values)
}

/// An iterator over every position of a [`VectorData`].
#[derive(Debug, Clone)]
pub struct Iter<'a, N> {
    inner: IterInner<'a, N>,
}

#[derive(Debug, Clone)]
enum IterInner<'a, N> {
    Dense(slice::Iter<'a, N>),
    Sparse {
        position: usize,
        size: usize,
        indices: &'a [usize],
        values: &'a [N],
    },
}

impl<N: Real> Iterator for Iter<'_, N> {
    type Item = N;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IterInner::Dense(values) => values.next().copied(),
            IterInner::Sparse {
                position,
                size,
                indices,
                values,
            } => {
                if *position >= *size {
                    return None;
                }

                let (remaining_indices, remaining_values): (&[usize], &[N]) = (indices, values);
                let heads = (remaining_indices.split_first(), remaining_values.split_first());
                let value = match heads {
                    (Some((&index, rest_indices)), Some((&value, rest_values)))
                        if index == *position =>
                    {
                        *indices = rest_indices;
                        *values = rest_values;
                        value
                    }
                    _ => N::zero(),
                };

                *position += 1;
                Some(value)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match &self.inner {
            IterInner::Dense(values) => values.len(),
            IterInner::Sparse { position, size, .. } => size - position,
        };
        (remaining, Some(remaining))
    }
}

impl<N: Real> ExactSizeIterator for Iter<'_, N> {}

impl<N: Real> iter::FusedIterator for Iter<'_, N> {}

impl<'a, N: Real> IntoIterator for &'a VectorData<N> {
    type Item = N;
    type IntoIter = Iter<'a, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::*;

    fn sparse(size: usize, entries: &[(usize, f64)]) -> VectorData<f64> {
        VectorData::sparse(size, entries.iter().copied()).expect("valid entries")
    }

    mod construction_tests {
        use super::*;

        #[test]
        fn sparse_sorts_entries_and_drops_zeros() {
            let data = sparse(6, &[(4, 2.0), (1, 3.0), (2, 0.0)]);
            assert!(data.is_sparse());
            assert_eq!(data.cardinality(), 2);
            assert_eq!(data.iter().collect::<Vec<_>>(), [0.0, 3.0, 0.0, 0.0, 2.0, 0.0]);
        }

        #[test]
        fn sparse_rejects_out_of_bounds_entry() {
            let result = VectorData::sparse(3, [(0, 1.0), (3, 2.0)]);
            assert_eq!(
                result,
                Err(QuantityError::Construction(ConstructionError::EntryOutOfBounds {
                    position: Position::Element(3),
                    size: Shape::Vector(3),
                }))
            );
        }

        #[test]
        fn sparse_rejects_duplicate_entry() {
            let result = VectorData::sparse(5, [(2, 1.0), (0, 1.0), (2, 4.0)]);
            assert_eq!(
                result,
                Err(QuantityError::Construction(ConstructionError::DuplicateEntry {
                    position: Position::Element(2),
                }))
            );
        }

        #[test]
        fn zeros_in_both_layouts() {
            let dense = VectorData::<f64>::zeros(4, StorageType::Dense);
            let sparse = VectorData::<f64>::zeros(4, StorageType::Sparse);
            assert_eq!(dense, sparse);
            assert_eq!(sparse.cardinality(), 0);
            assert_eq!(dense.size(), 4);
        }
    }

    mod access_tests {
        use super::*;

        #[test]
        fn get_out_of_range() {
            let dense = VectorData::dense(vec![1.0, 2.0]);
            assert_eq!(dense.get(2), Err(QuantityError::element_out_of_range(2, 2)));

            let sparse = sparse(2, &[(0, 1.0)]);
            assert_eq!(sparse.get(5), Err(QuantityError::element_out_of_range(5, 2)));
        }

        #[test]
        fn set_keeps_sparse_invariant() {
            let mut data = sparse(5, &[(1, 1.0), (3, 3.0)]);

            data.set(2, 2.0).expect("in range");
            data.set(3, 0.0).expect("in range");
            data.set(4, 0.0).expect("in range");

            assert_eq!(data.cardinality(), 2);
            assert_eq!(data.iter().collect::<Vec<_>>(), [0.0, 1.0, 2.0, 0.0, 0.0]);
            assert_eq!(
                data.set(5, 1.0),
                Err(QuantityError::element_out_of_range(5, 5))
            );
        }

        #[test]
        fn set_dense() {
            let mut data = VectorData::dense(vec![1.0, 2.0, 3.0]);
            data.set(0, 0.0).expect("in range");
            assert_eq!(data.cardinality(), 2);
            assert_eq!(data.get(0), Ok(0.0));
        }
    }

    mod aggregate_tests {
        use super::*;

        #[test]
        fn cardinality_and_sum_agree_across_layouts() {
            let dense = VectorData::dense(vec![0.0, 1.5, 0.0, -2.0, 4.0]);
            let sparse = dense.to_sparse();
            assert_eq!(dense.cardinality(), 3);
            assert_eq!(sparse.cardinality(), 3);
            assert_eq!(dense.sum(), sparse.sum());
            assert_eq!(dense.sum(), 3.5);
        }

        #[test]
        fn entries_skip_zeros() {
            let dense = VectorData::dense(vec![0.0, 7.0, 0.0, 8.0]);
            assert_eq!(dense.entries().collect::<Vec<_>>(), [(1, 7.0), (3, 8.0)]);
        }
    }

    mod transform_tests {
        use super::*;

        #[test]
        fn map_keeps_layout() {
            let data = sparse(4, &[(0, -1.5), (2, 0.4)]);
            let mapped = data.map(f64::floor);
            assert!(mapped.is_sparse());
            assert_eq!(mapped.iter().collect::<Vec<_>>(), [-2.0, 0.0, 0.0, 0.0]);
            assert_eq!(mapped.cardinality(), 1);
        }

        #[test]
        fn map_with_nonzero_image_of_zero() {
            let data = sparse(3, &[(1, 1.0)]);
            let shifted = data.map(|value| value + 1.0);
            assert!(shifted.is_sparse());
            assert_eq!(shifted.iter().collect::<Vec<_>>(), [1.0, 2.0, 1.0]);
        }

        #[test]
        fn assign_unary_in_place() {
            let mut data = VectorData::dense(vec![-1.0, 2.0]);
            data.assign_unary(|value| -value);
            assert_eq!(data, VectorData::dense(vec![1.0, -2.0]));
        }

        #[test]
        fn zip_sparse_sparse_stays_sparse() {
            let a = sparse(6, &[(0, 1.0), (3, 2.0), (5, 1.0)]);
            let b = sparse(6, &[(1, 4.0), (3, -2.0), (5, 1.0)]);

            let sum = a.zip_with(&b, |x, y| x + y).expect("same size");
            assert!(sum.is_sparse());
            assert_eq!(sum.cardinality(), 3);
            assert_eq!(sum.iter().collect::<Vec<_>>(), [1.0, 4.0, 0.0, 0.0, 0.0, 2.0]);
        }

        #[test]
        fn zip_mixed_is_dense() {
            let a = sparse(3, &[(0, 1.0)]);
            let b = VectorData::dense(vec![1.0, 1.0, 1.0]);
            let sum = a.zip_with(&b, |x, y| x + y).expect("same size");
            assert!(sum.is_dense());
            assert_eq!(sum, VectorData::dense(vec![2.0, 1.0, 1.0]));
        }

        #[test]
        fn zip_with_nonzero_image_of_zeros_is_dense() {
            let a = sparse(2, &[(0, 1.0)]);
            let b = sparse(2, &[]);
            let result = a.zip_with(&b, |x, y| x + y + 1.0).expect("same size");
            assert!(result.is_dense());
            assert_eq!(result, VectorData::dense(vec![2.0, 1.0]));
        }

        #[test]
        fn zip_shape_mismatch() {
            let a = VectorData::dense(vec![1.0, 2.0]);
            let b = VectorData::dense(vec![1.0]);
            assert_eq!(
                a.zip_with(&b, |x, y| x + y),
                Err(QuantityError::ShapeMismatch {
                    expected: Shape::Vector(2),
                    actual: Shape::Vector(1),
                })
            );
        }
    }

    #[test]
    fn dense_sparse_round_trip() {
        let mut rng = StdRng::seed_from_u64(0xde45e);

        for _ in 0..200 {
            let size = rng.random_range(0..40);
            let values: Vec<f64> = (0..size)
                .map(|_| {
                    if rng.random_bool(0.6) {
                        0.0
                    } else {
                        rng.random_range(-100.0..100.0)
                    }
                })
                .collect();

            let dense = VectorData::dense(values);
            let sparse = dense.to_sparse();

            assert_eq!(dense, sparse);
            assert_eq!(dense.cardinality(), sparse.cardinality());
            assert_eq!(dense.sum(), sparse.sum());
            assert_eq!(sparse.to_dense(), dense);
            assert!(sparse.to_dense().is_dense());
            assert_eq!(dense.to_sparse().to_dense().to_sparse(), sparse);
        }
    }
}
