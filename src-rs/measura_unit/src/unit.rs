//! Units and their shared handles

use std::{fmt, sync::Arc};

use crate::{dimensions::SIDimensions, quantity::SI_QUANTITY_NAME, scale::Scale};

/// Static description of a unit, as listed in the quantity catalogue.
#[derive(Debug, Clone, Copy)]
pub struct UnitInfo {
    /// The symbol of the unit, unique within its quantity
    pub id: &'static str,
    /// The full name of the unit
    pub name: &'static str,
    /// The conversion to the SI unit of the quantity
    pub scale: Scale,
    /// For units of absolute quantities, the id of the matching unit of the
    /// relative quantity (defaults to the same id)
    pub relative_unit: Option<&'static str>,
}

impl UnitInfo {
    /// Describes the base (SI) unit of a quantity.
    #[must_use]
    pub const fn base(id: &'static str, name: &'static str) -> Self {
        Self::scaled(id, name, Scale::IDENTITY)
    }

    /// Describes a unit that is `factor` SI units large.
    #[must_use]
    pub const fn linear(id: &'static str, name: &'static str, factor: f64) -> Self {
        Self::scaled(id, name, Scale::linear(factor))
    }

    /// Describes a unit with an arbitrary scale.
    #[must_use]
    pub const fn scaled(id: &'static str, name: &'static str, scale: Scale) -> Self {
        Self {
            id,
            name,
            scale,
            relative_unit: None,
        }
    }

    /// Sets the id of the matching relative unit.
    #[must_use]
    pub const fn relative_to(self, relative_unit: &'static str) -> Self {
        Self {
            relative_unit: Some(relative_unit),
            ..self
        }
    }
}

#[derive(Debug)]
struct UnitDef {
    id: String,
    name: String,
    scale: Scale,
    quantity: &'static str,
    dimensions: SIDimensions,
    relative_unit: Option<String>,
}

/// A unit of a quantity.
///
/// A unit is a cheap to clone handle to a shared definition. It knows its
/// scale (the conversion to the SI unit of its quantity), the quantity it
/// belongs to, and the dimensions of that quantity.
///
/// Two units are equal when they are handles to the same definition, or when
/// they carry the same id within the same quantity. Units of different
/// quantities are never equal, even if their dimensions match.
#[derive(Debug, Clone)]
pub struct Unit(Arc<UnitDef>);

impl Unit {
    /// Creates a unit of the named quantity from its catalogue description.
    #[must_use]
    pub fn from_info(info: &UnitInfo, quantity: &'static str, dimensions: SIDimensions) -> Self {
        Self(Arc::new(UnitDef {
            id: info.id.to_string(),
            name: info.name.to_string(),
            scale: info.scale,
            quantity,
            dimensions,
            relative_unit: info.relative_unit.map(str::to_string),
        }))
    }

    /// Synthesizes the generic SI unit of the given dimensions.
    ///
    /// The unit is labelled with the dimension signature and belongs to the
    /// dynamic `SI` quantity.
    #[must_use]
    pub fn generic(dimensions: SIDimensions) -> Self {
        let signature = dimensions.signature();
        Self(Arc::new(UnitDef {
            id: signature.clone(),
            name: signature,
            scale: Scale::IDENTITY,
            quantity: SI_QUANTITY_NAME,
            dimensions,
            relative_unit: None,
        }))
    }

    /// The symbol of the unit.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.0.id
    }

    /// The full name of the unit.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The scale of the unit.
    #[must_use]
    pub fn scale(&self) -> &Scale {
        &self.0.scale
    }

    /// The name of the quantity the unit belongs to.
    #[must_use]
    pub fn quantity_name(&self) -> &'static str {
        self.0.quantity
    }

    /// The dimensions of the quantity the unit belongs to.
    #[must_use]
    pub fn dimensions(&self) -> SIDimensions {
        self.0.dimensions
    }

    /// The id of the matching unit of the relative quantity.
    ///
    /// This is only meaningful for units of absolute quantities.
    #[must_use]
    pub fn relative_unit_id(&self) -> &str {
        self.0.relative_unit.as_deref().unwrap_or(&self.0.id)
    }

    /// Determines if the unit is the SI unit of its quantity.
    #[must_use]
    pub fn is_base(&self) -> bool {
        self.0.scale.is_base()
    }

    /// Converts a value in this unit to its SI value.
    #[must_use]
    pub fn to_standard(&self, value: f64) -> f64 {
        self.0.scale.to_standard(value)
    }

    /// Converts an SI value to its value in this unit.
    #[must_use]
    pub fn from_standard(&self, value: f64) -> f64 {
        self.0.scale.from_standard(value)
    }

    /// Determines if both handles point to the same definition.
    #[must_use]
    pub fn is_identical(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.is_identical(other)
            || (self.0.quantity == other.0.quantity && self.0.id == other.0.id)
    }
}

impl Eq for Unit {}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.id)
    }
}

#[cfg(test)]
mod tests {
    use measura_shared::assert_is_close;

    use super::*;

    fn kilometer() -> Unit {
        Unit::from_info(
            &UnitInfo::linear("km", "kilometer", 1000.0),
            "Length",
            SIDimensions::LENGTH,
        )
    }

    #[test]
    fn converts_through_scale() {
        let km = kilometer();
        assert_is_close!(2500.0, km.to_standard(2.5));
        assert_is_close!(2.5, km.from_standard(2500.0));
        assert!(!km.is_base());
    }

    #[test]
    fn equal_by_id_within_quantity() {
        let a = kilometer();
        let b = kilometer();
        assert!(!a.is_identical(&b));
        assert_eq!(a, b);
    }

    #[test]
    fn different_quantities_are_not_equal() {
        let position_km = Unit::from_info(
            &UnitInfo::linear("km", "kilometer", 1000.0),
            "Position",
            SIDimensions::LENGTH,
        );
        assert_ne!(kilometer(), position_km);
    }

    #[test]
    fn generic_unit_is_labelled_by_signature() {
        let unit = Unit::generic(SIDimensions::new([0, 2, -3, 0, 0, 0, 0, 0]));
        assert_eq!(unit.id(), "m2/s3");
        assert_eq!(unit.quantity_name(), SI_QUANTITY_NAME);
        assert!(unit.is_base());
    }

    #[test]
    fn relative_unit_defaults_to_own_id() {
        let celsius = Unit::from_info(
            &UnitInfo::scaled("degC", "degree Celsius", Scale::offset(1.0, 273.15)),
            "AbsoluteTemperature",
            SIDimensions::TEMPERATURE,
        );
        assert_eq!(celsius.relative_unit_id(), "degC");

        let rankine = Unit::from_info(
            &UnitInfo::linear("degR", "degree Rankine", 5.0 / 9.0).relative_to("degF"),
            "AbsoluteTemperature",
            SIDimensions::TEMPERATURE,
        );
        assert_eq!(rankine.relative_unit_id(), "degF");
    }
}
