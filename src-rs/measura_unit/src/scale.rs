//! Conversion between a unit's local values and SI values

/// The conversion function between a unit's local numeric representation
/// and the canonical SI representation of its quantity.
///
/// For every scale, `from_standard(to_standard(x))` returns `x` within
/// floating point tolerance. NaN and infinities propagate according to
/// IEEE semantics; no scale rejects a value.
#[derive(Debug, Clone, Copy)]
pub enum Scale {
    /// `si = value * factor + offset`
    ///
    /// The offset is only nonzero for units of absolute quantities whose
    /// zero point differs from the SI zero point (e.g. degrees Celsius).
    Linear {
        /// The multiplication factor
        factor: f64,
        /// The offset added after multiplication
        offset: f64,
    },
    /// A slope ratio, converted to an angle in radians
    ///
    /// `si = atan(value * factor)`, so a factor of `0.01` turns a percent
    /// grade into an angle.
    Grade {
        /// The factor that turns the value into a plain ratio
        factor: f64,
    },
    /// A logarithmic scale, such as the decibel
    ///
    /// `si = reference * base ^ (value / multiplier)`
    ///
    /// Only local values whose SI value is a finite, positive `f64` round
    /// trip. For decibels that is roughly `-3000..3080`; larger values
    /// overflow to infinity and zero or negative SI values have no
    /// logarithm.
    Logarithmic {
        /// The base of the logarithm
        base: f64,
        /// The multiplier applied to the logarithm (10 for decibels)
        multiplier: f64,
        /// The SI value that corresponds to a local value of zero
        reference: f64,
    },
    /// An arbitrary pair of conversion functions
    Custom {
        /// Converts a local value to SI
        to_standard: fn(f64) -> f64,
        /// Converts an SI value to a local value
        from_standard: fn(f64) -> f64,
    },
}

impl Scale {
    /// The identity scale of a quantity's base unit.
    pub const IDENTITY: Self = Self::linear(1.0);

    /// Creates a linear scale without an offset.
    #[must_use]
    pub const fn linear(factor: f64) -> Self {
        Self::Linear {
            factor,
            offset: 0.0,
        }
    }

    /// Creates a linear scale with an offset.
    #[must_use]
    pub const fn offset(factor: f64, offset: f64) -> Self {
        Self::Linear { factor, offset }
    }

    /// Creates the scale of a decibel unit relative to `reference`.
    #[must_use]
    pub const fn decibel(reference: f64) -> Self {
        Self::Logarithmic {
            base: 10.0,
            multiplier: 10.0,
            reference,
        }
    }

    /// Converts a value in the unit to its SI value.
    #[must_use]
    pub fn to_standard(&self, value: f64) -> f64 {
        match *self {
            Self::Linear { factor, offset } => value.mul_add(factor, offset),
            Self::Grade { factor } => (value * factor).atan(),
            Self::Logarithmic {
                base,
                multiplier,
                reference,
            } => reference * base.powf(value / multiplier),
            Self::Custom { to_standard, .. } => to_standard(value),
        }
    }

    /// Converts an SI value to its value in the unit.
    #[must_use]
    pub fn from_standard(&self, value: f64) -> f64 {
        match *self {
            Self::Linear { factor, offset } => (value - offset) / factor,
            Self::Grade { factor } => value.tan() / factor,
            Self::Logarithmic {
                base,
                multiplier,
                reference,
            } => multiplier * (value / reference).log(base),
            Self::Custom { from_standard, .. } => from_standard(value),
        }
    }

    /// Determines if the scale is the identity.
    #[must_use]
    #[expect(
        clippy::float_cmp,
        reason = "only the exact identity counts as a base scale"
    )]
    pub fn is_base(&self) -> bool {
        match *self {
            Self::Linear { factor, offset } => factor == 1.0 && offset == 0.0,
            Self::Grade { .. } | Self::Logarithmic { .. } | Self::Custom { .. } => false,
        }
    }

    /// Determines if the scale is linear (with or without offset).
    #[must_use]
    pub const fn is_linear(&self) -> bool {
        matches!(self, Self::Linear { .. })
    }
}
