//! Typed quantities for Rust
//!
//! Every value in Measura is a number tagged with a unit. Values are held in
//! the SI unit of their quantity and converted to and from display units
//! through each unit's [`Scale`]. Arithmetic respects dimensions: adding a
//! length to a mass does not compile, and multiplying two lengths yields a
//! value whose unit is derived from the dimensions of the operands.
//!
//! ```
//! use measura::{NamedQuantity, Rel, catalog::{Area, Length}};
//!
//! let km = Length::unit("km").unwrap();
//! let width = Rel::<Length>::new(2.0, &km).unwrap();
//! let depth = Rel::<Length>::from_si(500.0);
//!
//! let area = width.times(&depth).into_quantity::<Area>().unwrap();
//! assert_eq!(area.si(), 1_000_000.0);
//! ```
//!
//! With the `collection` feature (enabled by default), [`Vector`] and
//! [`Matrix`] hold many values of a quantity, stored densely or sparsely.

pub use measura_scalar::{Abs, Rel};
pub use measura_shared::{
    Axis, ConstructionError, Position, QuantityError, Real, Shape, TOLERANCE, assert_is_close,
    is_close,
};
pub use measura_unit::{
    AbsoluteQuantity, BaseDimension, NamedQuantity, Quantity, QuantityDef, QuantityKind,
    RelativeQuantity, SI, SIDimensions, Scale, Unit, UnitInfo, catalog, registry,
};

#[cfg(feature = "collection")]
pub use measura_collection::{Matrix, Vector};
#[cfg(feature = "collection")]
pub use measura_storage::{LARGE_DETERMINANT_SIZE, MatrixData, Ownership, StorageType, VectorData};
