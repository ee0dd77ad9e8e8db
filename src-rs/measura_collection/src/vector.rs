//! Typed vectors

use std::fmt;

use measura_scalar::{Rel, from_si, to_si};
use measura_shared::{ConstructionError, QuantityError, Real};
use measura_storage::{Ownership, StorageType, VectorData};
use measura_unit::{NamedQuantity, RelativeQuantity, SI, SIDimensions, Unit};

use crate::{check_dimensions, combined_unit, in_display_unit};

/// A vector of values of a relative quantity.
///
/// ```
/// use measura_collection::Vector;
/// use measura_storage::StorageType;
/// use measura_unit::{NamedQuantity, catalog::Length};
///
/// let km = Length::unit("km").unwrap();
/// let route = Vector::<Length>::new(vec![1.0, 0.0, 2.5], &km, StorageType::Sparse).unwrap();
///
/// assert_eq!(route.cardinality(), 2);
/// assert_eq!(route.sum().si(), 3500.0);
/// assert_eq!(route.to_string(), "[1, 0, 2.5] km");
/// ```
pub struct Vector<Q: RelativeQuantity, N: Real = f64> {
    data: Ownership<VectorData<N>>,
    /// Zero in the display unit; elements are built from it.
    zero: Rel<Q, N>,
}

impl<Q: RelativeQuantity, N: Real> Vector<Q, N> {
    /// Creates an immutable vector from values expressed in `unit`.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::InvalidUnit` if the unit does not belong to
    /// the quantity.
    pub fn new(values: Vec<N>, unit: &Unit, storage: StorageType) -> Result<Self, QuantityError> {
        let zero = Rel::instantiate_si(N::zero(), unit)?;
        let values = values.into_iter().map(|value| to_si(value, unit)).collect();
        Ok(Self::frozen(VectorData::from_values(values, storage), zero))
    }

    /// Creates an immutable dense vector from values expressed in `unit`.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::InvalidUnit` if the unit does not belong to
    /// the quantity.
    pub fn from_vec(values: Vec<N>, unit: &Unit) -> Result<Self, QuantityError> {
        Self::new(values, unit, StorageType::Dense)
    }

    /// Creates an immutable vector of all zeros, displayed in `unit`.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::InvalidUnit` if the unit does not belong to
    /// the quantity.
    pub fn zeros(size: usize, unit: &Unit, storage: StorageType) -> Result<Self, QuantityError> {
        let zero = Rel::instantiate_si(N::zero(), unit)?;
        Ok(Self::frozen(VectorData::zeros(size, storage), zero))
    }

    /// Creates an immutable vector from scalars, displayed in the unit of
    /// the first scalar.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::Construction` if there are no scalars, and
    /// `QuantityError::IncompatibleDimensions` if their dimensions differ.
    pub fn from_scalars(
        scalars: &[Rel<Q, N>],
        storage: StorageType,
    ) -> Result<Self, QuantityError> {
        let first = scalars.first().ok_or(ConstructionError::EmptyInput)?;
        for scalar in scalars {
            check_dimensions(first.dimensions(), scalar.dimensions())?;
        }

        let values = scalars.iter().map(Rel::si).collect();
        Ok(Self::frozen(
            VectorData::from_values(values, storage),
            first.with_si(N::zero()),
        ))
    }

    /// Creates an immutable sparse vector of `size` elements from
    /// `(index, value)` entries whose values are expressed in `unit`.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::InvalidUnit` if the unit does not belong to
    /// the quantity, and `QuantityError::Construction` if an index lies
    /// outside of `size` or appears twice.
    pub fn sparse(
        size: usize,
        entries: impl IntoIterator<Item = (usize, N)>,
        unit: &Unit,
    ) -> Result<Self, QuantityError> {
        let zero = Rel::instantiate_si(N::zero(), unit)?;
        let entries = entries
            .into_iter()
            .map(|(index, value)| (index, to_si(value, unit)));
        Ok(Self::frozen(VectorData::sparse(size, entries)?, zero))
    }

    /// Creates an immutable sparse vector of `size` elements from
    /// `(index, scalar)` entries, displayed in the unit of the first scalar.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::Construction` if there are no entries, an
    /// index lies outside of `size` or appears twice, and
    /// `QuantityError::IncompatibleDimensions` if the dimensions of the
    /// scalars differ.
    pub fn sparse_scalars(
        size: usize,
        entries: &[(usize, Rel<Q, N>)],
    ) -> Result<Self, QuantityError> {
        let (_, first) = entries.first().ok_or(ConstructionError::EmptyInput)?;
        for (_, scalar) in entries {
            check_dimensions(first.dimensions(), scalar.dimensions())?;
        }

        let data = VectorData::sparse(
            size,
            entries.iter().map(|(index, scalar)| (*index, scalar.si())),
        )?;
        Ok(Self::frozen(data, first.with_si(N::zero())))
    }

    pub(super) fn frozen(data: VectorData<N>, zero: Rel<Q, N>) -> Self {
        Self {
            data: Ownership::frozen(data),
            zero,
        }
    }

    /// The number of elements.
    #[must_use]
    pub fn size(&self) -> usize {
        self.data.data().size()
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

    /// Checks if the vector may be written.
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
    pub fn data(&self) -> &VectorData<N> {
        self.data.data()
    }

    /// The element at `index`.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::IndexOutOfRange` if the index lies outside of
    /// the vector.
    pub fn get(&self, index: usize) -> Result<Rel<Q, N>, QuantityError> {
        self.get_si(index).map(|si| self.zero.with_si(si))
    }

    /// The SI value of the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::IndexOutOfRange` if the index lies outside of
    /// the vector.
    pub fn get_si(&self, index: usize) -> Result<N, QuantityError> {
        self.data.data().get(index)
    }

    /// The value of the element at `index` in the display unit.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::IndexOutOfRange` if the index lies outside of
    /// the vector.
    pub fn get_in_unit(&self, index: usize) -> Result<N, QuantityError> {
        self.get_si(index).map(|si| from_si(si, self.display_unit()))
    }

    /// The value of the element at `index` in another unit.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::IndexOutOfRange` if the index lies outside of
    /// the vector, and `QuantityError::InvalidUnit` if the unit does not
    /// belong to the quantity.
    pub fn get_in_other_unit(&self, index: usize, unit: &Unit) -> Result<N, QuantityError> {
        self.get(index)?.in_other_unit(unit)
    }

    /// The number of nonzero elements.
    #[must_use]
    pub fn cardinality(&self) -> usize {
        self.data.data().cardinality()
    }

    /// The sum of all elements, displayed in the display unit.
    #[must_use]
    pub fn sum(&self) -> Rel<Q, N> {
        self.zero.with_si(self.data.data().sum())
    }

    /// Iterates over the elements.
    pub fn iter(&self) -> impl Iterator<Item = Rel<Q, N>> + '_ {
        self.data.data().iter().map(|si| self.zero.with_si(si))
    }

    /// Sets the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ImmutableMutation` if the vector is
    /// immutable, `QuantityError::IncompatibleDimensions` if the dimensions
    /// of the value differ, and `QuantityError::IndexOutOfRange` if the
    /// index lies outside of the vector.
    pub fn set(&mut self, index: usize, value: &Rel<Q, N>) -> Result<(), QuantityError> {
        let data = self.data.data_mut()?;
        check_dimensions(self.zero.dimensions(), value.dimensions())?;
        data.set(index, value.si())
    }

    /// Sets the SI value of the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ImmutableMutation` if the vector is immutable
    /// and `QuantityError::IndexOutOfRange` if the index lies outside of the
    /// vector.
    pub fn set_si(&mut self, index: usize, si: N) -> Result<(), QuantityError> {
        self.data.data_mut()?.set(index, si)
    }

    /// Adds two vectors element by element.
    ///
    /// The result is immutable. It keeps the display unit if both vectors
    /// share it, and uses the SI unit otherwise.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::IncompatibleDimensions` if the dimensions
    /// differ and `QuantityError::ShapeMismatch` if the sizes differ.
    pub fn checked_plus(&self, other: &Self) -> Result<Self, QuantityError> {
        self.combine(other, |a, b| a + b)
    }

    /// Subtracts `other` from this vector element by element.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::IncompatibleDimensions` if the dimensions
    /// differ and `QuantityError::ShapeMismatch` if the sizes differ.
    pub fn checked_minus(&self, other: &Self) -> Result<Self, QuantityError> {
        self.combine(other, |a, b| a - b)
    }

    fn combine(&self, other: &Self, f: impl Fn(N, N) -> N) -> Result<Self, QuantityError> {
        check_dimensions(self.dimensions(), other.dimensions())?;
        let data = self.data.data().zip_with(other.data.data(), f)?;
        let unit = combined_unit::<Q>(self.display_unit(), other.display_unit());
        Ok(Self::frozen(data, Rel::instantiate_si(N::zero(), &unit)?))
    }

    /// Multiplies two vectors of any relative quantities element by element.
    ///
    /// The dimensions of the result are the sum of the dimensions of the
    /// operands, and its unit is resolved through the unit registry.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ShapeMismatch` if the sizes differ.
    pub fn times<R: RelativeQuantity>(
        &self,
        other: &Vector<R, N>,
    ) -> Result<Vector<SI, N>, QuantityError> {
        let data = self.data.data().zip_with(other.data.data(), |a, b| a * b)?;
        let dimensions = self.dimensions().plus(&other.dimensions());
        Ok(Vector::frozen(
            data,
            Rel::with_dimensions(N::zero(), dimensions),
        ))
    }

    /// Divides this vector by a vector of any relative quantity element by
    /// element.
    ///
    /// The dimensions of the result are the difference of the dimensions of
    /// the operands, and its unit is resolved through the unit registry.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ShapeMismatch` if the sizes differ.
    pub fn divide<R: RelativeQuantity>(
        &self,
        other: &Vector<R, N>,
    ) -> Result<Vector<SI, N>, QuantityError> {
        let data = self.data.data().zip_with(other.data.data(), |a, b| a / b)?;
        let dimensions = self.dimensions().minus(&other.dimensions());
        Ok(Vector::frozen(
            data,
            Rel::with_dimensions(N::zero(), dimensions),
        ))
    }

    /// Adds `other` to this vector in place.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ImmutableMutation` if the vector is
    /// immutable, `QuantityError::IncompatibleDimensions` if the dimensions
    /// differ and `QuantityError::ShapeMismatch` if the sizes differ.
    pub fn increment_by(&mut self, other: &Self) -> Result<(), QuantityError> {
        self.assign(other, |a, b| a + b)
    }

    /// Subtracts `other` from this vector in place.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ImmutableMutation` if the vector is
    /// immutable, `QuantityError::IncompatibleDimensions` if the dimensions
    /// differ and `QuantityError::ShapeMismatch` if the sizes differ.
    pub fn decrement_by(&mut self, other: &Self) -> Result<(), QuantityError> {
        self.assign(other, |a, b| a - b)
    }

    fn assign(&mut self, other: &Self, f: impl Fn(N, N) -> N) -> Result<(), QuantityError> {
        let data = self.data.data_mut()?;
        check_dimensions(self.zero.dimensions(), other.dimensions())?;
        data.assign_binary(other.data.data(), f)
    }

    /// Multiplies every element by `factor` in the display unit, in place.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ImmutableMutation` if the vector is
    /// immutable.
    pub fn multiply_by(&mut self, factor: N) -> Result<(), QuantityError> {
        self.apply(move |value| value * factor)
    }

    /// Divides every element by `divisor` in the display unit, in place.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ImmutableMutation` if the vector is
    /// immutable.
    pub fn divide_by(&mut self, divisor: N) -> Result<(), QuantityError> {
        self.apply(move |value| value / divisor)
    }

    /// Replaces every element by its absolute value, in place.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ImmutableMutation` if the vector is
    /// immutable.
    pub fn abs(&mut self) -> Result<(), QuantityError> {
        self.apply(N::abs)
    }

    /// Rounds every element up in the display unit, in place.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ImmutableMutation` if the vector is
    /// immutable.
    pub fn ceil(&mut self) -> Result<(), QuantityError> {
        self.apply(N::ceil)
    }

    /// Rounds every element down in the display unit, in place.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ImmutableMutation` if the vector is
    /// immutable.
    pub fn floor(&mut self) -> Result<(), QuantityError> {
        self.apply(N::floor)
    }

    /// Negates every element, in place.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ImmutableMutation` if the vector is
    /// immutable.
    pub fn neg(&mut self) -> Result<(), QuantityError> {
        self.apply(N::neg)
    }

    /// Rounds every element to the nearest integer in the display unit,
    /// with ties going to the even integer, in place.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ImmutableMutation` if the vector is
    /// immutable.
    pub fn rint(&mut self) -> Result<(), QuantityError> {
        self.apply(Real::rint)
    }

    fn apply(&mut self, f: impl Fn(N) -> N) -> Result<(), QuantityError> {
        let data = self.data.data_mut()?;
        data.assign_unary(in_display_unit(self.zero.display_unit(), f));
        Ok(())
    }

    /// Re-types the vector as a vector of a named relative quantity.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::InvalidUnit` if the dimensions do not match
    /// those of the target quantity.
    pub fn into_quantity<T>(self) -> Result<Vector<T, N>, QuantityError>
    where
        T: RelativeQuantity + NamedQuantity,
    {
        Ok(Vector {
            data: self.data,
            zero: self.zero.into_quantity()?,
        })
    }

    /// Erases the quantity of the vector.
    #[must_use]
    pub fn into_si(self) -> Vector<SI, N> {
        Vector {
            data: self.data,
            zero: self.zero.into_si(),
        }
    }

    /// Returns the same vector with another display unit.
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

    /// Returns a dense copy, in the same state as this vector.
    #[must_use]
    pub fn to_dense(&self) -> Self {
        self.with_storage(StorageType::Dense)
    }

    /// Returns a sparse copy, in the same state as this vector.
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

    /// Returns an immutable vector sharing this vector's values.
    ///
    /// Later writes through this vector are not visible in the result.
    #[must_use]
    pub fn immutable(&self) -> Self {
        Self {
            data: self.data.freeze(),
            zero: self.zero.clone(),
        }
    }

    /// Returns a mutable vector starting from this vector's values.
    ///
    /// Writes through the result are not visible in this vector.
    #[must_use]
    pub fn mutable(&self) -> Self {
        Self {
            data: self.data.thaw(),
            zero: self.zero.clone(),
        }
    }
}

impl<N: Real> Vector<SI, N> {
    /// Creates an immutable dynamic vector from SI values and dimensions.
    ///
    /// The display unit is resolved through the unit registry.
    #[must_use]
    pub fn with_dimensions(data: VectorData<N>, dimensions: SIDimensions) -> Self {
        Self::frozen(data, Rel::with_dimensions(N::zero(), dimensions))
    }
}

impl<Q: RelativeQuantity, N: Real> Clone for Vector<Q, N> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            zero: self.zero.clone(),
        }
    }
}

impl<Q: RelativeQuantity, N: Real> fmt::Debug for Vector<Q, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("quantity", &Q::name())
            .field("data", self.data.data())
            .field("unit", &self.display_unit().id())
            .field("mutable", &self.is_mutable())
            .finish()
    }
}

impl<Q: RelativeQuantity, N: Real> fmt::Display for Vector<Q, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (index, si) in self.data.data().iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", from_si(si, self.display_unit()))?;
        }
        write!(f, "] {}", self.display_unit())
    }
}

impl<Q: RelativeQuantity, N: Real> PartialEq for Vector<Q, N> {
    fn eq(&self, other: &Self) -> bool {
        self.dimensions() == other.dimensions() && self.data.data() == other.data.data()
    }
}
