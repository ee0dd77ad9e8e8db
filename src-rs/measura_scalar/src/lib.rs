//! Scalar quantities for Measura
//!
//! A scalar is a single number tagged with a unit. [`Rel`] holds a value of
//! a relative quantity and supports full arithmetic; products and
//! quotients become [`Rel<SI>`](measura_unit::SI) values whose unit is
//! derived from the dimensions of the operands. [`Abs`] holds a value of an
//! absolute quantity and only combines with its relative counterpart.
//!
//! Scalars are value objects. The `*Assign` operators replace the value
//! held by a `mut` binding; no other handle observes the change.

mod abs;
mod rel;

pub use abs::Abs;
pub use rel::{Rel, from_si, to_si};
