//! Process-wide lookup of units and quantities by dimensions
//!
//! Two caches live here:
//!
//! - the quantity registry, which maps a dimension vector to the named
//!   relative quantity that owns it; it is built once from the catalogue
//! - the generic unit cache, which holds the units synthesized for dimension
//!   vectors that no named quantity owns
//!
//! Both are safe to populate concurrently. A race on the generic unit cache
//! may build a unit twice, but only the first one is ever handed out.

use std::{
    collections::{HashMap, hash_map::Entry},
    sync::{LazyLock, PoisonError, RwLock},
};

use measura_shared::QuantityError;

use crate::{
    catalog,
    dimensions::SIDimensions,
    quantity::{QuantityDef, QuantityKind},
    unit::Unit,
};

static QUANTITIES: LazyLock<HashMap<SIDimensions, &'static QuantityDef>> = LazyLock::new(|| {
    let mut quantities = HashMap::new();
    for definition in catalog::ALL {
        let definition = definition();
        if definition.kind() == QuantityKind::Relative {
            // earlier catalogue entries win, so `Dimensionless` owns the
            // empty vector rather than `Angle`
            quantities.entry(definition.dimensions()).or_insert(definition);
        }
    }

    tracing::debug!(quantities = quantities.len(), "populated quantity registry");
    quantities
});

static GENERIC_UNITS: LazyLock<RwLock<HashMap<SIDimensions, Unit>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Finds the named relative quantity with the given dimensions.
#[must_use]
pub fn quantity_for(dimensions: &SIDimensions) -> Option<&'static QuantityDef> {
    QUANTITIES.get(dimensions).copied()
}

/// Returns the unit for a dimension vector, synthesizing it on first use.
///
/// If a named relative quantity owns the dimensions, its SI unit is
/// returned. Otherwise a generic SI unit labelled with the dimension
/// signature is returned; repeated calls with the same dimensions return
/// handles to the same unit, even when called concurrently.
#[must_use]
pub fn lookup_or_create(dimensions: SIDimensions) -> Unit {
    if let Some(quantity) = quantity_for(&dimensions) {
        return quantity.si_unit().clone();
    }

    {
        let cache = GENERIC_UNITS.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(unit) = cache.get(&dimensions) {
            tracing::trace!(%dimensions, "generic unit cache hit");
            return unit.clone();
        }
    }

    let candidate = Unit::generic(dimensions);

    let mut cache = GENERIC_UNITS.write().unwrap_or_else(PoisonError::into_inner);
    match cache.entry(dimensions) {
        // another caller won the race
        Entry::Occupied(entry) => entry.get().clone(),
        Entry::Vacant(entry) => {
            tracing::debug!(%dimensions, "synthesized generic unit");
            entry.insert(candidate).clone()
        }
    }
}

/// Returns the unit for a dimension signature such as `"m2/s3"`.
///
/// # Errors
///
/// Returns `QuantityError::InvalidDimension` if the signature is malformed.
pub fn lookup_signature(signature: &str) -> Result<Unit, QuantityError> {
    SIDimensions::parse(signature).map(lookup_or_create)
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::{
        catalog::{Angle, Dimensionless, Energy, Length, Position, Speed},
        quantity::{NamedQuantity, Quantity, SI_QUANTITY_NAME},
    };

    #[test]
    fn named_dimensions_resolve_to_si_unit() {
        let unit = lookup_or_create(SIDimensions::SPEED);
        assert!(unit.is_identical(&Speed::si_unit()));

        let unit = lookup_or_create(SIDimensions::ENERGY);
        assert_eq!(unit.id(), "J");
        assert_eq!(unit.quantity_name(), Energy::name());
    }

    #[test]
    fn absolute_quantities_are_not_registered() {
        let quantity = quantity_for(&SIDimensions::LENGTH).map(QuantityDef::name);
        assert_eq!(quantity, Some(Length::name()));
        assert_ne!(quantity, Some(Position::name()));
    }

    #[test]
    fn dimensionless_wins_over_angle() {
        let quantity = quantity_for(&SIDimensions::DIMENSIONLESS).map(QuantityDef::name);
        assert_eq!(quantity, Some(Dimensionless::name()));
        assert_ne!(quantity, Some(Angle::name()));
    }

    #[test]
    fn unnamed_dimensions_get_generic_unit() {
        let unit = lookup_signature("m2/s3").expect("valid signature");
        assert_eq!(unit.id(), "m2/s3");
        assert_eq!(unit.quantity_name(), SI_QUANTITY_NAME);
        assert_eq!(unit.dimensions(), SIDimensions::new([0, 2, -3, 0, 0, 0, 0, 0]));
    }

    #[test]
    fn generic_units_are_reused() {
        let first = lookup_signature("kg3/mol").expect("valid signature");
        let second = lookup_or_create(SIDimensions::new([3, 0, 0, 0, 0, -1, 0, 0]));
        assert!(first.is_identical(&second));
    }

    #[test]
    fn concurrent_lookups_share_one_unit() {
        let dimensions = SIDimensions::new([0, 2, -3, 1, 0, 0, 0, 2]);

        let units: Vec<Unit> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(move || lookup_or_create(dimensions)))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("lookup thread panicked"))
                .collect()
        });

        for unit in &units[1..] {
            assert!(unit.is_identical(&units[0]));
        }
    }

    #[test]
    fn malformed_signature_is_rejected() {
        assert_eq!(
            lookup_signature("m//s"),
            Err(QuantityError::InvalidDimension {
                signature: "m//s".to_string()
            })
        );
    }

    #[test]
    fn overflowing_signature_is_rejected() {
        for signature in ["m2147483647m", "1/m2147483647m"] {
            assert_eq!(
                lookup_signature(signature),
                Err(QuantityError::InvalidDimension {
                    signature: signature.to_string()
                })
            );
        }
    }
}
