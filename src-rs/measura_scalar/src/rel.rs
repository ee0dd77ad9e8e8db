//! Relative scalars

use std::{cmp::Ordering, fmt, marker::PhantomData, ops};

use measura_shared::{QuantityError, Real};
use measura_unit::{NamedQuantity, Quantity, RelativeQuantity, SI, SIDimensions, Unit, registry};

/// A single value of a relative quantity.
///
/// The value is held in the SI unit of the quantity. The display unit is
/// remembered for presentation and for arithmetic between values that share
/// it.
///
/// ```
/// use measura_scalar::Rel;
/// use measura_unit::{NamedQuantity, catalog::Length};
///
/// let km = Length::unit("km").unwrap();
/// let distance = Rel::<Length>::new(1.5, &km).unwrap();
///
/// assert_eq!(distance.si(), 1500.0);
/// assert_eq!(distance.to_string(), "1.5 km");
/// ```
pub struct Rel<Q: RelativeQuantity, N: Real = f64> {
    si: N,
    unit: Unit,
    quantity: PhantomData<fn() -> Q>,
}

impl<Q: RelativeQuantity, N: Real> Rel<Q, N> {
    /// Creates a value from a value expressed in `unit`.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::InvalidUnit` if the unit does not belong to
    /// the quantity.
    pub fn new(value: N, unit: &Unit) -> Result<Self, QuantityError> {
        check_unit::<Q>(unit, None)?;
        Ok(Self::from_parts(to_si(value, unit), unit.clone()))
    }

    /// Creates a value from its SI value, displayed in `unit`.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::InvalidUnit` if the unit does not belong to
    /// the quantity.
    pub fn instantiate_si(si: N, unit: &Unit) -> Result<Self, QuantityError> {
        check_unit::<Q>(unit, None)?;
        Ok(Self::from_parts(si, unit.clone()))
    }

    /// Returns a value with the same display unit and another SI value.
    #[must_use]
    pub fn with_si(&self, si: N) -> Self {
        Self::from_parts(si, self.unit.clone())
    }

    pub(super) const fn from_parts(si: N, unit: Unit) -> Self {
        Self {
            si,
            unit,
            quantity: PhantomData,
        }
    }

    /// The value in the SI unit of the quantity.
    #[must_use]
    pub const fn si(&self) -> N {
        self.si
    }

    /// The value in the display unit.
    #[must_use]
    pub fn in_unit(&self) -> N {
        from_si(self.si, &self.unit)
    }

    /// The value in another unit of the quantity.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::InvalidUnit` if the unit does not belong to
    /// the quantity.
    pub fn in_other_unit(&self, unit: &Unit) -> Result<N, QuantityError> {
        check_unit::<Q>(unit, Some(self.dimensions()))?;
        Ok(from_si(self.si, unit))
    }

    /// The display unit.
    #[must_use]
    pub const fn display_unit(&self) -> &Unit {
        &self.unit
    }

    /// The dimensions of the value.
    #[must_use]
    pub fn dimensions(&self) -> SIDimensions {
        self.unit.dimensions()
    }

    /// Returns the same value with another display unit.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::InvalidUnit` if the unit does not belong to
    /// the quantity.
    pub fn with_display_unit(&self, unit: &Unit) -> Result<Self, QuantityError> {
        check_unit::<Q>(unit, Some(self.dimensions()))?;
        Ok(Self::from_parts(self.si, unit.clone()))
    }

    /// Adds two values.
    ///
    /// The result keeps the display unit if both values share it, and uses
    /// the SI unit otherwise.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::IncompatibleDimensions` if the dimensions of
    /// the values differ, which can only happen for `SI` values.
    pub fn checked_add(&self, other: &Self) -> Result<Self, QuantityError> {
        self.combine(other, |a, b| a + b)
    }

    /// Subtracts `other` from this value.
    ///
    /// The result keeps the display unit if both values share it, and uses
    /// the SI unit otherwise.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::IncompatibleDimensions` if the dimensions of
    /// the values differ, which can only happen for `SI` values.
    pub fn checked_sub(&self, other: &Self) -> Result<Self, QuantityError> {
        self.combine(other, |a, b| a - b)
    }

    fn combine(&self, other: &Self, f: impl Fn(N, N) -> N) -> Result<Self, QuantityError> {
        check_dimensions(self.dimensions(), other.dimensions())?;
        let unit = if self.unit == other.unit {
            self.unit.clone()
        } else {
            Q::base_unit(self.dimensions())
        };
        Ok(Self::from_parts(f(self.si, other.si), unit))
    }

    /// Multiplies two values of any relative quantities.
    ///
    /// The dimensions of the result are the sum of the dimensions of the
    /// operands, and its unit is resolved through the unit registry.
    #[must_use]
    pub fn times<R: RelativeQuantity>(&self, other: &Rel<R, N>) -> Rel<SI, N> {
        let dimensions = self.dimensions().plus(&other.dimensions());
        Rel::from_parts(self.si * other.si, registry::lookup_or_create(dimensions))
    }

    /// Divides this value by a value of any relative quantity.
    ///
    /// The dimensions of the result are the difference of the dimensions of
    /// the operands, and its unit is resolved through the unit registry.
    #[must_use]
    pub fn divide<R: RelativeQuantity>(&self, other: &Rel<R, N>) -> Rel<SI, N> {
        let dimensions = self.dimensions().minus(&other.dimensions());
        Rel::from_parts(self.si / other.si, registry::lookup_or_create(dimensions))
    }

    /// Applies `f` to the value in the display unit.
    #[must_use]
    pub fn map_in_unit(&self, f: impl FnOnce(N) -> N) -> Self {
        let value = f(self.in_unit());
        Self::from_parts(to_si(value, &self.unit), self.unit.clone())
    }

    /// The absolute value, in the display unit.
    #[must_use]
    pub fn abs(&self) -> Self {
        self.map_in_unit(N::abs)
    }

    /// The smallest integer not below the value, in the display unit.
    #[must_use]
    pub fn ceil(&self) -> Self {
        self.map_in_unit(N::ceil)
    }

    /// The largest integer not above the value, in the display unit.
    #[must_use]
    pub fn floor(&self) -> Self {
        self.map_in_unit(N::floor)
    }

    /// The nearest integer to the value, in the display unit, with ties
    /// going to the even integer.
    #[must_use]
    pub fn rint(&self) -> Self {
        self.map_in_unit(Real::rint)
    }

    /// The smaller of two values.
    #[must_use]
    pub fn min(&self, other: &Self) -> Self {
        if other.si < self.si {
            other.clone()
        } else {
            self.clone()
        }
    }

    /// The larger of two values.
    #[must_use]
    pub fn max(&self, other: &Self) -> Self {
        if other.si > self.si {
            other.clone()
        } else {
            self.clone()
        }
    }

    /// Interpolates linearly between `zero` and `one`.
    ///
    /// A `ratio` of 0 returns `zero`, a `ratio` of 1 returns `one`. Ratios
    /// outside of `[0, 1]` extrapolate. The result is displayed in the unit
    /// of `zero`.
    #[must_use]
    pub fn interpolate(zero: &Self, one: &Self, ratio: N) -> Self {
        let si = (one.si - zero.si).mul_add(ratio, zero.si);
        Self::from_parts(si, zero.unit.clone())
    }

    /// Checks if two values are within `tolerance` of each other, in SI.
    #[must_use]
    pub fn eq_within(&self, other: &Self, tolerance: N) -> bool {
        self.dimensions() == other.dimensions() && (self.si - other.si).abs() <= tolerance
    }

    /// Re-types the value as a value of a named relative quantity.
    ///
    /// The display unit is kept if it belongs to the target quantity, and
    /// replaced by its SI unit otherwise.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::InvalidUnit` if the dimensions of the value do
    /// not match those of the target quantity.
    pub fn into_quantity<T>(self) -> Result<Rel<T, N>, QuantityError>
    where
        T: RelativeQuantity + NamedQuantity,
    {
        if self.dimensions() != T::dimensions() {
            return Err(QuantityError::InvalidUnit {
                unit: self.unit.id().to_string(),
                quantity: T::name().to_string(),
            });
        }

        let unit = if T::accepts(&self.unit) {
            self.unit
        } else {
            T::si_unit()
        };
        Ok(Rel::from_parts(self.si, unit))
    }

    /// Erases the quantity of the value.
    #[must_use]
    pub fn into_si(self) -> Rel<SI, N> {
        Rel::from_parts(self.si, self.unit)
    }
}

impl<Q: RelativeQuantity + NamedQuantity, N: Real> Rel<Q, N> {
    /// Creates a value from its SI value, displayed in the SI unit.
    #[must_use]
    pub fn from_si(si: N) -> Self {
        Self::from_parts(si, Q::si_unit())
    }
}

impl<N: Real> Rel<SI, N> {
    /// Creates a dynamic value from its SI value and dimensions.
    ///
    /// The display unit is resolved through the unit registry.
    #[must_use]
    pub fn with_dimensions(si: N, dimensions: SIDimensions) -> Self {
        Self::from_parts(si, registry::lookup_or_create(dimensions))
    }
}

/// Converts a value expressed in `unit` to SI.
#[must_use]
pub fn to_si<N: Real>(value: N, unit: &Unit) -> N {
    N::narrow(unit.to_standard(value.widen()))
}

/// Converts an SI value to a value expressed in `unit`.
#[must_use]
pub fn from_si<N: Real>(si: N, unit: &Unit) -> N {
    N::narrow(unit.from_standard(si.widen()))
}

fn check_unit<Q: Quantity>(
    unit: &Unit,
    dimensions: Option<SIDimensions>,
) -> Result<(), QuantityError> {
    let dimensions_match = dimensions.is_none_or(|dimensions| dimensions == unit.dimensions());
    if Q::accepts(unit) && dimensions_match {
        Ok(())
    } else {
        Err(QuantityError::InvalidUnit {
            unit: unit.id().to_string(),
            quantity: Q::name().to_string(),
        })
    }
}

fn check_dimensions(lhs: SIDimensions, rhs: SIDimensions) -> Result<(), QuantityError> {
    if lhs == rhs {
        Ok(())
    } else {
        Err(QuantityError::IncompatibleDimensions {
            lhs: lhs.signature(),
            rhs: rhs.signature(),
        })
    }
}

impl<Q: RelativeQuantity, N: Real> Clone for Rel<Q, N> {
    fn clone(&self) -> Self {
        Self::from_parts(self.si, self.unit.clone())
    }
}

impl<Q: RelativeQuantity, N: Real> fmt::Debug for Rel<Q, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rel")
            .field("quantity", &Q::name())
            .field("si", &self.si)
            .field("unit", &self.unit.id())
            .finish()
    }
}

impl<Q: RelativeQuantity, N: Real> fmt::Display for Rel<Q, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.in_unit(), self.unit)
    }
}

impl<Q: RelativeQuantity, N: Real> PartialEq for Rel<Q, N> {
    fn eq(&self, other: &Self) -> bool {
        self.dimensions() == other.dimensions() && self.si == other.si
    }
}

impl<Q: RelativeQuantity, N: Real> PartialOrd for Rel<Q, N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.dimensions() == other.dimensions() {
            self.si.partial_cmp(&other.si)
        } else {
            None
        }
    }
}

impl<Q: RelativeQuantity + NamedQuantity, N: Real> ops::Add for Rel<Q, N> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        &self + &rhs
    }
}

impl<Q: RelativeQuantity + NamedQuantity, N: Real> ops::Add for &Rel<Q, N> {
    type Output = Rel<Q, N>;

    fn add(self, rhs: Self) -> Self::Output {
        let unit = shared_unit::<Q>(&self.unit, &rhs.unit);
        Rel::from_parts(self.si + rhs.si, unit)
    }
}

impl<Q: RelativeQuantity + NamedQuantity, N: Real> ops::Sub for Rel<Q, N> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        &self - &rhs
    }
}

impl<Q: RelativeQuantity + NamedQuantity, N: Real> ops::Sub for &Rel<Q, N> {
    type Output = Rel<Q, N>;

    fn sub(self, rhs: Self) -> Self::Output {
        let unit = shared_unit::<Q>(&self.unit, &rhs.unit);
        Rel::from_parts(self.si - rhs.si, unit)
    }
}

fn shared_unit<Q: NamedQuantity>(lhs: &Unit, rhs: &Unit) -> Unit {
    if lhs == rhs { lhs.clone() } else { Q::si_unit() }
}

impl<Q: RelativeQuantity, N: Real> ops::Neg for Rel<Q, N> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.map_in_unit(|value| -value)
    }
}

impl<Q: RelativeQuantity, N: Real> ops::Mul<N> for Rel<Q, N> {
    type Output = Self;

    fn mul(self, rhs: N) -> Self::Output {
        self.map_in_unit(|value| value * rhs)
    }
}

impl<Q: RelativeQuantity, N: Real> ops::Div<N> for Rel<Q, N> {
    type Output = Self;

    fn div(self, rhs: N) -> Self::Output {
        self.map_in_unit(|value| value / rhs)
    }
}

impl<Q: RelativeQuantity + NamedQuantity, N: Real> ops::AddAssign for Rel<Q, N> {
    fn add_assign(&mut self, rhs: Self) {
        *self = &*self + &rhs;
    }
}

impl<Q: RelativeQuantity + NamedQuantity, N: Real> ops::SubAssign for Rel<Q, N> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = &*self - &rhs;
    }
}

impl<Q: RelativeQuantity, N: Real> ops::MulAssign<N> for Rel<Q, N> {
    fn mul_assign(&mut self, rhs: N) {
        *self = self.map_in_unit(|value| value * rhs);
    }
}

impl<Q: RelativeQuantity, N: Real> ops::DivAssign<N> for Rel<Q, N> {
    fn div_assign(&mut self, rhs: N) {
        *self = self.map_in_unit(|value| value / rhs);
    }
}
