//! Exponent vectors over the SI base dimensions

use std::{fmt, ops, str::FromStr};

use measura_shared::QuantityError;

use crate::signature;

/// A base dimension of the SI system, with currency as an eighth slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BaseDimension {
    /// Base unit is 'kilogram'
    Mass,
    /// Base unit is 'meter'
    Length,
    /// Base unit is 'second'
    Time,
    /// Base unit is 'ampere'
    Current,
    /// Base unit is 'kelvin'
    Temperature,
    /// Base unit is 'mole'
    Substance,
    /// Base unit is 'candela'
    LuminousIntensity,
    /// Base unit is the currency unit '$'
    Currency,
}

impl BaseDimension {
    /// All base dimensions in slot order.
    pub const ALL: [Self; SIDimensions::SLOTS] = [
        Self::Mass,
        Self::Length,
        Self::Time,
        Self::Current,
        Self::Temperature,
        Self::Substance,
        Self::LuminousIntensity,
        Self::Currency,
    ];

    /// The symbol of the base unit, as used in dimension signatures.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Mass => "kg",
            Self::Length => "m",
            Self::Time => "s",
            Self::Current => "A",
            Self::Temperature => "K",
            Self::Substance => "mol",
            Self::LuminousIntensity => "cd",
            Self::Currency => "$",
        }
    }

    /// The slot of the dimension in an exponent vector.
    #[must_use]
    pub const fn slot(self) -> usize {
        self as usize
    }
}

/// The exponents of a quantity over the SI base dimensions.
///
/// For example, a speed (`m/s`) has a length exponent of 1 and a time
/// exponent of -1. The all-zero vector is the dimensionless quantity.
///
/// Multiplying two quantities adds their exponents ([`SIDimensions::plus`])
/// and dividing subtracts them ([`SIDimensions::minus`]). These are the only
/// ways a new quantity is derived from two others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SIDimensions([i32; Self::SLOTS]);

impl SIDimensions {
    /// The number of base dimensions.
    pub const SLOTS: usize = 8;

    /// The dimensionless quantity
    pub const DIMENSIONLESS: Self = Self([0; Self::SLOTS]);
    /// `kg`
    pub const MASS: Self = Self::of(BaseDimension::Mass, 1);
    /// `m`
    pub const LENGTH: Self = Self::of(BaseDimension::Length, 1);
    /// `s`
    pub const TIME: Self = Self::of(BaseDimension::Time, 1);
    /// `A`
    pub const CURRENT: Self = Self::of(BaseDimension::Current, 1);
    /// `K`
    pub const TEMPERATURE: Self = Self::of(BaseDimension::Temperature, 1);
    /// `mol`
    pub const SUBSTANCE: Self = Self::of(BaseDimension::Substance, 1);
    /// `cd`
    pub const LUMINOUS_INTENSITY: Self = Self::of(BaseDimension::LuminousIntensity, 1);
    /// `$`
    pub const CURRENCY: Self = Self::of(BaseDimension::Currency, 1);
    /// `m2`
    pub const AREA: Self = Self::new([0, 2, 0, 0, 0, 0, 0, 0]);
    /// `m3`
    pub const VOLUME: Self = Self::new([0, 3, 0, 0, 0, 0, 0, 0]);
    /// `m/s`
    pub const SPEED: Self = Self::new([0, 1, -1, 0, 0, 0, 0, 0]);
    /// `m/s2`
    pub const ACCELERATION: Self = Self::new([0, 1, -2, 0, 0, 0, 0, 0]);
    /// `kgm/s2`
    pub const FORCE: Self = Self::new([1, 1, -2, 0, 0, 0, 0, 0]);
    /// `kgm2/s2`
    pub const ENERGY: Self = Self::new([1, 2, -2, 0, 0, 0, 0, 0]);
    /// `kgm2/s3`
    pub const POWER: Self = Self::new([1, 2, -3, 0, 0, 0, 0, 0]);

    /// Creates dimensions from exponents in slot order
    /// (`kg, m, s, A, K, mol, cd, $`).
    #[must_use]
    pub const fn new(exponents: [i32; Self::SLOTS]) -> Self {
        Self(exponents)
    }

    /// Creates dimensions with a single nonzero exponent.
    #[must_use]
    pub const fn of(dimension: BaseDimension, exponent: i32) -> Self {
        let mut exponents = [0; Self::SLOTS];
        exponents[dimension.slot()] = exponent;
        Self(exponents)
    }

    /// Parses a dimension signature such as `"kgm2/s3"`.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::InvalidDimension` if the signature is malformed.
    pub fn parse(signature: &str) -> Result<Self, QuantityError> {
        signature::parse(signature)
    }

    /// The exponents in slot order.
    #[must_use]
    pub const fn exponents(&self) -> [i32; Self::SLOTS] {
        self.0
    }

    /// The exponent of a single base dimension.
    #[must_use]
    pub const fn exponent(&self, dimension: BaseDimension) -> i32 {
        self.0[dimension.slot()]
    }

    /// Checks if all exponents are zero.
    #[must_use]
    pub fn is_dimensionless(&self) -> bool {
        self.0.iter().all(|exponent| *exponent == 0)
    }

    /// The dimensions of the product of two quantities.
    #[must_use]
    pub fn plus(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a + b)
    }

    /// The dimensions of the quotient of two quantities.
    #[must_use]
    pub fn minus(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a - b)
    }

    /// The dimensions of a quantity raised to an integer power.
    #[must_use]
    pub fn pow(&self, exponent: i32) -> Self {
        Self(self.0.map(|value| value * exponent))
    }

    /// The dimensions of the reciprocal of a quantity.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self(self.0.map(|value| -value))
    }

    /// Renders the dimension signature, e.g. `"kgm2/s3"`.
    #[must_use]
    pub fn signature(&self) -> String {
        signature::render(self)
    }

    fn zip_with(&self, other: &Self, f: impl Fn(i32, i32) -> i32) -> Self {
        let mut result = [0; Self::SLOTS];
        for (slot, value) in result.iter_mut().enumerate() {
            *value = f(self.0[slot], other.0[slot]);
        }
        Self(result)
    }
}

impl ops::Mul for SIDimensions {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.plus(&rhs)
    }
}

impl ops::Div for SIDimensions {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        self.minus(&rhs)
    }
}

impl fmt::Display for SIDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signature())
    }
}

impl FromStr for SIDimensions {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_adds_exponents() {
        assert_eq!(SIDimensions::LENGTH.plus(&SIDimensions::LENGTH), SIDimensions::AREA);
        assert_eq!(SIDimensions::MASS * SIDimensions::ACCELERATION, SIDimensions::FORCE);
        assert_eq!(SIDimensions::FORCE * SIDimensions::LENGTH, SIDimensions::ENERGY);
    }

    #[test]
    fn minus_subtracts_exponents() {
        assert_eq!(SIDimensions::LENGTH.minus(&SIDimensions::TIME), SIDimensions::SPEED);
        assert_eq!(SIDimensions::ENERGY / SIDimensions::TIME, SIDimensions::POWER);
        assert!((SIDimensions::AREA / SIDimensions::AREA).is_dimensionless());
    }

    #[test]
    fn plus_then_minus_is_identity() {
        let a = SIDimensions::POWER;
        let b = SIDimensions::new([0, -1, 3, 2, 0, 1, 0, 1]);
        assert_eq!(a.plus(&b).minus(&b), a);
    }

    #[test]
    fn pow_and_inverse() {
        assert_eq!(SIDimensions::LENGTH.pow(3), SIDimensions::VOLUME);
        assert_eq!(
            SIDimensions::TIME.inverse(),
            SIDimensions::of(BaseDimension::Time, -1)
        );
    }

    #[test]
    fn exponent_by_base_dimension() {
        assert_eq!(SIDimensions::POWER.exponent(BaseDimension::Time), -3);
        assert_eq!(SIDimensions::POWER.exponent(BaseDimension::Mass), 1);
        assert_eq!(SIDimensions::POWER.exponent(BaseDimension::Currency), 0);
    }

    #[test]
    fn default_is_dimensionless() {
        assert!(SIDimensions::default().is_dimensionless());
        assert!(!SIDimensions::CURRENCY.is_dimensionless());
    }
}
