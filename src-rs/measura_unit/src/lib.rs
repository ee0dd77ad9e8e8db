//! Units and dimensions for Measura
//!
//! A value in Measura is always stored in the SI unit of its quantity. This
//! crate describes everything needed to get there and back:
//!
//! - [`Scale`] converts between a unit's local value and the SI value
//! - [`SIDimensions`] is the exponent vector of a quantity, with the
//!   signature format used to name units that no quantity owns
//! - [`Unit`] and the quantity traits, with the catalogue of named
//!   quantities in [`catalog`]
//! - [`registry`] resolves the dimensions of a product or quotient to a unit

pub mod catalog;
pub mod dimensions;
pub mod quantity;
pub mod registry;
pub mod scale;
pub mod signature;
pub mod unit;

pub use dimensions::{BaseDimension, SIDimensions};
pub use quantity::{
    AbsoluteQuantity, NamedQuantity, Quantity, QuantityDef, QuantityKind, RelativeQuantity, SI,
};
pub use scale::Scale;
pub use unit::{Unit, UnitInfo};
