//! Floating point utilities

use std::fmt;

use num_traits::Float;

/// The tolerance used by [`is_close`].
pub const TOLERANCE: f64 = 1e-10;

/// The numeric width that values are stored in.
///
/// Measura offers both a wide (`f64`) and a narrow (`f32`) variant of every
/// scalar, vector and matrix. Unit scales always convert in `f64`; the
/// result is then narrowed to the storage width.
pub trait Real: Float + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Widens the value to `f64` without loss.
    fn widen(self) -> f64;

    /// Narrows an `f64` to this width, rounding to the nearest value.
    fn narrow(value: f64) -> Self;

    /// Rounds to the nearest integer, with ties going to the even integer.
    #[must_use]
    fn rint(self) -> Self;
}

impl Real for f64 {
    fn widen(self) -> f64 {
        self
    }

    fn narrow(value: f64) -> Self {
        value
    }

    fn rint(self) -> Self {
        self.round_ties_even()
    }
}

impl Real for f32 {
    fn widen(self) -> f64 {
        f64::from(self)
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "narrowing is the purpose of this conversion"
    )]
    fn narrow(value: f64) -> Self {
        value as Self
    }

    fn rint(self) -> Self {
        self.round_ties_even()
    }
}

/// Checks if two floating point numbers are close to each other.
///
/// This uses the `Strong` comparison method of the `is_close` crate as
/// reference: the difference must be within [`TOLERANCE`] either absolutely
/// or relative to the smaller magnitude of the two.
#[must_use]
pub const fn is_close(a: f64, b: f64) -> bool {
    #[expect(
        clippy::float_cmp,
        reason = "this is a part of implementing better floating point comparison"
    )]
    if a == b {
        return true;
    }

    if a.is_infinite() || b.is_infinite() {
        return false;
    }

    if a.is_nan() || b.is_nan() {
        return false;
    }

    let difference = (a - b).abs();
    let relative_tolerance = TOLERANCE * f64::min(a.abs(), b.abs());
    let absolute_tolerance = TOLERANCE;

    difference <= relative_tolerance || difference <= absolute_tolerance
}

/// Asserts that two `f64` expressions are close according to [`is_close`].
#[macro_export]
macro_rules! assert_is_close {
    ($expected:expr, $actual:expr $(,)?) => {{
        let expected: f64 = $expected;
        let actual: f64 = $actual;
        assert!(
            $crate::is_close(expected, actual),
            "expected: {}, actual: {}",
            expected,
            actual
        );
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_values() {
        assert!(is_close(1.0, 1.0 + 1e-12));
        assert!(is_close(1e20, 1e20 * (1.0 + 1e-12)));
        assert!(is_close(0.0, 1e-11));
    }

    #[test]
    fn distant_values() {
        assert!(!is_close(1.0, 1.001));
        assert!(!is_close(f64::NAN, f64::NAN));
        assert!(!is_close(f64::INFINITY, 1e308));
    }

    #[test]
    fn infinities_equal_themselves() {
        assert!(is_close(f64::INFINITY, f64::INFINITY));
    }

    #[test]
    fn rint_rounds_ties_to_even() {
        assert_is_close!(2.0, Real::rint(2.5_f64));
        assert_is_close!(4.0, Real::rint(3.5_f64));
        assert_is_close!(-2.0, Real::rint(-2.5_f64));
        assert_is_close!(2.0, f64::from(Real::rint(2.5_f32)));
    }

    #[test]
    fn narrow_and_widen() {
        let narrow = <f32 as Real>::narrow(0.1);
        assert!((narrow.widen() - 0.1).abs() < 1e-7);
        assert_is_close!(0.1, <f64 as Real>::narrow(0.1).widen());
    }
}
