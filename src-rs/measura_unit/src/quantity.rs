//! Quantities and the traits that classify them

use indexmap::IndexMap;

use crate::{
    dimensions::SIDimensions,
    registry,
    unit::{Unit, UnitInfo},
};

/// The name of the dynamic quantity that accepts a unit of any dimensions.
pub const SI_QUANTITY_NAME: &str = "SI";

/// A kind of physical quantity, used as a type-level marker.
pub trait Quantity: 'static {
    /// The name of the quantity.
    fn name() -> &'static str;

    /// Determines if a unit can be the display unit of a value of this
    /// quantity.
    fn accepts(unit: &Unit) -> bool;

    /// The SI unit of values of this quantity with the given dimensions.
    ///
    /// Named quantities have a single SI unit and ignore the dimensions.
    fn base_unit(dimensions: SIDimensions) -> Unit;
}

/// A quantity whose values are differences, such as a length or a
/// temperature difference.
///
/// Relative values can be added to and subtracted from each other, and
/// multiplied with and divided by other relative values.
pub trait RelativeQuantity: Quantity {}

/// A quantity from the catalogue, with a fixed dimension vector and a fixed
/// set of units.
pub trait NamedQuantity: Quantity {
    /// The catalogue entry of the quantity.
    fn definition() -> &'static QuantityDef;

    /// The SI unit of the quantity.
    #[must_use]
    fn si_unit() -> Unit {
        Self::definition().si_unit().clone()
    }

    /// Looks up a unit of the quantity by id.
    #[must_use]
    fn unit(id: &str) -> Option<Unit> {
        Self::definition().unit(id).cloned()
    }

    /// The dimensions of the quantity.
    #[must_use]
    fn dimensions() -> SIDimensions {
        Self::definition().dimensions()
    }
}

/// A quantity whose values are positions on a scale with an origin, such as
/// a position or an absolute temperature.
///
/// Absolute values can only be shifted by values of the relative
/// counterpart, and the difference of two absolute values is relative.
pub trait AbsoluteQuantity: NamedQuantity {
    /// The relative counterpart of the quantity.
    type Relative: RelativeQuantity + NamedQuantity;
}

/// The dynamic quantity of values whose dimensions are only known at run
/// time.
///
/// An `SI` value may be displayed in any unit whose dimensions match its
/// own.
///
/// Products and quotients of relative values are `SI` values. An `SI` value
/// can be converted into a named quantity once its dimensions are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SI {}

impl Quantity for SI {
    fn name() -> &'static str {
        SI_QUANTITY_NAME
    }

    fn accepts(_unit: &Unit) -> bool {
        true
    }

    fn base_unit(dimensions: SIDimensions) -> Unit {
        registry::lookup_or_create(dimensions)
    }
}

impl RelativeQuantity for SI {}

/// Whether a quantity is relative or absolute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityKind {
    /// A relative quantity
    Relative,
    /// An absolute quantity, with the name of its relative counterpart
    Absolute {
        /// The name of the relative counterpart
        relative: &'static str,
    },
}

/// The catalogue entry of a named quantity.
#[derive(Debug)]
pub struct QuantityDef {
    name: &'static str,
    dimensions: SIDimensions,
    kind: QuantityKind,
    si_unit: Unit,
    units: IndexMap<&'static str, Unit>,
}

impl QuantityDef {
    /// Builds a catalogue entry from its SI unit and its other units.
    ///
    /// The SI unit is listed first. If another unit reuses an id, the first
    /// occurrence wins.
    #[must_use]
    pub fn build(
        name: &'static str,
        dimensions: SIDimensions,
        kind: QuantityKind,
        si_info: &UnitInfo,
        units: &[UnitInfo],
    ) -> Self {
        let si_unit = Unit::from_info(si_info, name, dimensions);

        let mut map = IndexMap::with_capacity(units.len() + 1);
        map.insert(si_info.id, si_unit.clone());
        for info in units {
            map.entry(info.id)
                .or_insert_with(|| Unit::from_info(info, name, dimensions));
        }

        Self {
            name,
            dimensions,
            kind,
            si_unit,
            units: map,
        }
    }

    /// The name of the quantity.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The dimensions of the quantity.
    #[must_use]
    pub const fn dimensions(&self) -> SIDimensions {
        self.dimensions
    }

    /// Whether the quantity is relative or absolute.
    #[must_use]
    pub const fn kind(&self) -> QuantityKind {
        self.kind
    }

    /// Checks if the quantity is absolute.
    #[must_use]
    pub const fn is_absolute(&self) -> bool {
        matches!(self.kind, QuantityKind::Absolute { .. })
    }

    /// The SI unit of the quantity.
    #[must_use]
    pub const fn si_unit(&self) -> &Unit {
        &self.si_unit
    }

    /// Looks up a unit by id.
    #[must_use]
    pub fn unit(&self, id: &str) -> Option<&Unit> {
        self.units.get(id)
    }

    /// All units of the quantity, SI unit first.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn length() -> QuantityDef {
        QuantityDef::build(
            "Length",
            SIDimensions::LENGTH,
            QuantityKind::Relative,
            &UnitInfo::base("m", "meter"),
            &[
                UnitInfo::linear("km", "kilometer", 1000.0),
                UnitInfo::linear("ft", "foot", 0.3048),
                UnitInfo::linear("km", "duplicate kilometer", 1.0),
            ],
        )
    }

    #[test]
    fn si_unit_is_listed_first() {
        let def = length();
        let ids: Vec<_> = def.units().map(Unit::id).collect();
        assert_eq!(ids, ["m", "km", "ft"]);
        assert!(def.si_unit().is_base());
    }

    #[test]
    fn first_duplicate_wins() {
        let def = length();
        let km = def.unit("km").map(|unit| unit.to_standard(1.0));
        assert_eq!(km, Some(1000.0));
    }

    #[test]
    fn units_belong_to_quantity() {
        let def = length();
        for unit in def.units() {
            assert_eq!(unit.quantity_name(), "Length");
            assert_eq!(unit.dimensions(), SIDimensions::LENGTH);
        }
    }

    #[test]
    fn si_accepts_any_unit() {
        let def = length();
        assert!(SI::accepts(def.si_unit()));
        assert!(def.unit("km").is_some_and(|km| SI::accepts(km)));
    }

    #[test]
    fn si_base_unit_comes_from_registry() {
        let unit = SI::base_unit(SIDimensions::new([0, 4, 0, 0, 0, 0, 0, 0]));
        assert_eq!(unit.id(), "m4");
        assert_eq!(unit.quantity_name(), SI_QUANTITY_NAME);
    }
}
