//! Absolute scalars

use std::{cmp::Ordering, fmt, marker::PhantomData, ops};

use measura_shared::{QuantityError, Real};
use measura_unit::{AbsoluteQuantity, NamedQuantity, Quantity, Unit};

use crate::rel::{Rel, from_si, to_si};

type RelativeOf<A> = <A as AbsoluteQuantity>::Relative;

/// A single value of an absolute quantity.
///
/// An absolute value is a position on a scale with an origin, such as a
/// point in time or an absolute temperature. It can be shifted by a value
/// of the relative counterpart, and the difference of two absolute values
/// is relative. Adding two absolute values is meaningless and does not
/// compile:
///
/// ```compile_fail
/// use measura_scalar::Abs;
/// use measura_unit::catalog::Position;
///
/// let a = Abs::<Position>::from_si(1.0);
/// let b = Abs::<Position>::from_si(2.0);
/// let _ = a + b;
/// ```
pub struct Abs<A: AbsoluteQuantity, N: Real = f64> {
    si: N,
    unit: Unit,
    quantity: PhantomData<fn() -> A>,
}

impl<A: AbsoluteQuantity, N: Real> Abs<A, N> {
    /// Creates a value from a value expressed in `unit`.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::InvalidUnit` if the unit does not belong to
    /// the quantity.
    pub fn new(value: N, unit: &Unit) -> Result<Self, QuantityError> {
        check_unit::<A>(unit)?;
        Ok(Self::from_parts(to_si(value, unit), unit.clone()))
    }

    /// Creates a value from its SI value, displayed in the SI unit.
    #[must_use]
    pub fn from_si(si: N) -> Self {
        Self::from_parts(si, A::si_unit())
    }

    /// Creates a value from its SI value, displayed in `unit`.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::InvalidUnit` if the unit does not belong to
    /// the quantity.
    pub fn instantiate_si(si: N, unit: &Unit) -> Result<Self, QuantityError> {
        check_unit::<A>(unit)?;
        Ok(Self::from_parts(si, unit.clone()))
    }

    const fn from_parts(si: N, unit: Unit) -> Self {
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
        check_unit::<A>(unit)?;
        Ok(from_si(self.si, unit))
    }

    /// The display unit.
    #[must_use]
    pub const fn display_unit(&self) -> &Unit {
        &self.unit
    }

    /// Returns the same value with another display unit.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::InvalidUnit` if the unit does not belong to
    /// the quantity.
    pub fn with_display_unit(&self, unit: &Unit) -> Result<Self, QuantityError> {
        check_unit::<A>(unit)?;
        Ok(Self::from_parts(self.si, unit.clone()))
    }

    /// The unit of the relative counterpart that matches the display unit,
    /// e.g. a Celsius difference for a Celsius temperature.
    fn relative_unit(&self) -> Option<Unit> {
        RelativeOf::<A>::unit(self.unit.relative_unit_id())
    }

    /// Shifts the value by `sign * delta` in the display unit.
    fn shift(&self, delta: &Rel<RelativeOf<A>, N>, sign: f64) -> Self {
        let Some(relative_unit) = self.relative_unit() else {
            let si = N::narrow(delta.si().widen().mul_add(sign, self.si.widen()));
            return Self::from_parts(si, self.unit.clone());
        };

        let delta = relative_unit.from_standard(delta.si().widen());
        let value = delta.mul_add(sign, self.unit.from_standard(self.si.widen()));
        Self::from_parts(N::narrow(self.unit.to_standard(value)), self.unit.clone())
    }

    /// The difference of two absolute values, in the display unit of this
    /// value.
    fn difference(&self, other: &Self) -> Rel<RelativeOf<A>, N> {
        let Some(relative_unit) = self.relative_unit() else {
            return Rel::from_si(self.si - other.si);
        };

        let value = self.unit.from_standard(self.si.widen())
            - self.unit.from_standard(other.si.widen());
        Rel::from_parts(N::narrow(relative_unit.to_standard(value)), relative_unit)
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

    /// Interpolates linearly between `zero` and `one`, displayed in the unit
    /// of `zero`.
    #[must_use]
    pub fn interpolate(zero: &Self, one: &Self, ratio: N) -> Self {
        let si = (one.si - zero.si).mul_add(ratio, zero.si);
        Self::from_parts(si, zero.unit.clone())
    }

    /// Checks if two values are within `tolerance` of each other, in SI.
    #[must_use]
    pub fn eq_within(&self, other: &Self, tolerance: N) -> bool {
        (self.si - other.si).abs() <= tolerance
    }
}

fn check_unit<A: Quantity>(unit: &Unit) -> Result<(), QuantityError> {
    if A::accepts(unit) {
        Ok(())
    } else {
        Err(QuantityError::InvalidUnit {
            unit: unit.id().to_string(),
            quantity: A::name().to_string(),
        })
    }
}

impl<A: AbsoluteQuantity, N: Real> Clone for Abs<A, N> {
    fn clone(&self) -> Self {
        Self::from_parts(self.si, self.unit.clone())
    }
}

impl<A: AbsoluteQuantity, N: Real> fmt::Debug for Abs<A, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Abs")
            .field("quantity", &A::name())
            .field("si", &self.si)
            .field("unit", &self.unit.id())
            .finish()
    }
}

impl<A: AbsoluteQuantity, N: Real> fmt::Display for Abs<A, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.in_unit(), self.unit)
    }
}

impl<A: AbsoluteQuantity, N: Real> PartialEq for Abs<A, N> {
    fn eq(&self, other: &Self) -> bool {
        self.si == other.si
    }
}

impl<A: AbsoluteQuantity, N: Real> PartialOrd for Abs<A, N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.si.partial_cmp(&other.si)
    }
}

impl<A: AbsoluteQuantity, N: Real> ops::Add<Rel<RelativeOf<A>, N>> for Abs<A, N> {
    type Output = Self;

    fn add(self, rhs: Rel<RelativeOf<A>, N>) -> Self::Output {
        self.shift(&rhs, 1.0)
    }
}

impl<A: AbsoluteQuantity, N: Real> ops::Add<&Rel<RelativeOf<A>, N>> for &Abs<A, N> {
    type Output = Abs<A, N>;

    fn add(self, rhs: &Rel<RelativeOf<A>, N>) -> Self::Output {
        self.shift(rhs, 1.0)
    }
}

impl<A: AbsoluteQuantity, N: Real> ops::Sub<Rel<RelativeOf<A>, N>> for Abs<A, N> {
    type Output = Self;

    fn sub(self, rhs: Rel<RelativeOf<A>, N>) -> Self::Output {
        self.shift(&rhs, -1.0)
    }
}

impl<A: AbsoluteQuantity, N: Real> ops::Sub<&Rel<RelativeOf<A>, N>> for &Abs<A, N> {
    type Output = Abs<A, N>;

    fn sub(self, rhs: &Rel<RelativeOf<A>, N>) -> Self::Output {
        self.shift(rhs, -1.0)
    }
}

impl<A: AbsoluteQuantity, N: Real> ops::Sub for Abs<A, N> {
    type Output = Rel<RelativeOf<A>, N>;

    fn sub(self, rhs: Self) -> Self::Output {
        self.difference(&rhs)
    }
}

impl<A: AbsoluteQuantity, N: Real> ops::Sub for &Abs<A, N> {
    type Output = Rel<RelativeOf<A>, N>;

    fn sub(self, rhs: Self) -> Self::Output {
        self.difference(rhs)
    }
}

impl<A: AbsoluteQuantity, N: Real> ops::AddAssign<Rel<RelativeOf<A>, N>> for Abs<A, N> {
    fn add_assign(&mut self, rhs: Rel<RelativeOf<A>, N>) {
        *self = self.shift(&rhs, 1.0);
    }
}

impl<A: AbsoluteQuantity, N: Real> ops::SubAssign<Rel<RelativeOf<A>, N>> for Abs<A, N> {
    fn sub_assign(&mut self, rhs: Rel<RelativeOf<A>, N>) {
        *self = self.shift(&rhs, -1.0);
    }
}
