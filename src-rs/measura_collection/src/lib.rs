//! Typed vectors and matrices for Measura
//!
//! [`Vector`] and [`Matrix`] hold many values of one relative quantity. The
//! values are kept in SI by the storage engine; the collection remembers a
//! display unit and hands out [`Rel`](measura_scalar::Rel) values on access.
//!
//! Collections come in two states. Constructors return immutable
//! collections, whose mutating methods fail with
//! `QuantityError::ImmutableMutation`. [`Vector::mutable`] and
//! [`Matrix::mutable`] return a handle that may be written; its buffer is
//! copied on the first write while the immutable original still exists.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;

use measura_scalar::{from_si, to_si};
use measura_shared::{QuantityError, Real};
use measura_unit::{Quantity, SIDimensions, Unit};

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

/// The display unit of the sum or difference of two collections.
fn combined_unit<Q: Quantity>(lhs: &Unit, rhs: &Unit) -> Unit {
    if lhs == rhs {
        lhs.clone()
    } else {
        Q::base_unit(lhs.dimensions())
    }
}

/// Lifts `f` over display values to a function over SI values.
fn in_display_unit<N: Real>(unit: &Unit, f: impl Fn(N) -> N) -> impl Fn(N) -> N {
    let unit = unit.clone();
    move |si| {
        if unit.is_base() {
            f(si)
        } else {
            to_si(f(from_si(si, &unit)), &unit)
        }
    }
}
