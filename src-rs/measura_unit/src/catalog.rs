//! The catalogue of named quantities and their units
//!
//! Each quantity is a zero-sized marker type plus one table row: its
//! dimensions, whether it is relative or absolute, its SI unit and its other
//! units. The catalogue entry of a quantity is built on first use.

use std::{f64::consts::PI, sync::LazyLock};

use crate::{
    dimensions::SIDimensions,
    quantity::{
        AbsoluteQuantity, NamedQuantity, Quantity, QuantityDef, QuantityKind, RelativeQuantity,
    },
    scale::Scale,
    unit::{Unit, UnitInfo},
};

macro_rules! quantity_kind {
    (relative) => {
        QuantityKind::Relative
    };
    (absolute, $relative:ident) => {
        QuantityKind::Absolute {
            relative: stringify!($relative),
        }
    };
}

macro_rules! quantity_capability {
    ($ty:ident, relative) => {
        impl RelativeQuantity for $ty {}
    };
    ($ty:ident, absolute, $relative:ident) => {
        impl AbsoluteQuantity for $ty {
            type Relative = $relative;
        }
    };
}

macro_rules! quantities {
    ($(
        $(#[$meta:meta])*
        $ty:ident: $kind:ident $(($relative:ident))? {
            dimensions: $dimensions:expr,
            si_unit: $si_unit:expr,
            units: [$($unit:expr),* $(,)?] $(,)?
        }
    )*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub enum $ty {}

            impl Quantity for $ty {
                fn name() -> &'static str {
                    stringify!($ty)
                }

                fn accepts(unit: &Unit) -> bool {
                    unit.quantity_name() == stringify!($ty)
                }

                fn base_unit(_dimensions: SIDimensions) -> Unit {
                    <Self as NamedQuantity>::si_unit()
                }
            }

            impl NamedQuantity for $ty {
                fn definition() -> &'static QuantityDef {
                    static DEFINITION: LazyLock<QuantityDef> = LazyLock::new(|| {
                        QuantityDef::build(
                            stringify!($ty),
                            $dimensions,
                            quantity_kind!($kind $(, $relative)?),
                            &$si_unit,
                            &[$($unit),*],
                        )
                    });
                    &DEFINITION
                }
            }

            quantity_capability!($ty, $kind $(, $relative)?);
        )*

        /// The catalogue entries of every named quantity, in catalogue order.
        pub const ALL: &[fn() -> &'static QuantityDef] = &[
            $(<$ty as NamedQuantity>::definition),*
        ];
    };
}

const DEGREE: f64 = PI / 180.0;
const FAHRENHEIT: f64 = 5.0 / 9.0;

quantities! {
    /// A ratio without dimensions
    Dimensionless: relative {
        dimensions: SIDimensions::DIMENSIONLESS,
        si_unit: UnitInfo::base("1", "unit"),
        units: [
            UnitInfo::linear("%", "percent", 0.01),
            UnitInfo::linear("ppm", "parts per million", 1e-6),
            UnitInfo::scaled("dB", "decibel", Scale::decibel(1.0)),
        ],
    }

    /// A distance between two positions
    Length: relative {
        dimensions: SIDimensions::LENGTH,
        si_unit: UnitInfo::base("m", "meter"),
        units: [
            UnitInfo::linear("nm", "nanometer", 1e-9),
            UnitInfo::linear("um", "micrometer", 1e-6),
            UnitInfo::linear("mm", "millimeter", 1e-3),
            UnitInfo::linear("cm", "centimeter", 1e-2),
            UnitInfo::linear("km", "kilometer", 1e3),
            UnitInfo::linear("in", "inch", 0.0254),
            UnitInfo::linear("ft", "foot", 0.3048),
            UnitInfo::linear("yd", "yard", 0.9144),
            UnitInfo::linear("mi", "mile", 1609.344),
            UnitInfo::linear("NM", "nautical mile", 1852.0),
            UnitInfo::linear("AU", "astronomical unit", 149_597_870_700.0),
        ],
    }

    /// A point on a line, measured from an origin
    Position: absolute(Length) {
        dimensions: SIDimensions::LENGTH,
        si_unit: UnitInfo::base("m", "meter"),
        units: [
            UnitInfo::linear("mm", "millimeter", 1e-3),
            UnitInfo::linear("cm", "centimeter", 1e-2),
            UnitInfo::linear("km", "kilometer", 1e3),
            UnitInfo::linear("in", "inch", 0.0254),
            UnitInfo::linear("ft", "foot", 0.3048),
            UnitInfo::linear("mi", "mile", 1609.344),
        ],
    }

    /// A surface area
    Area: relative {
        dimensions: SIDimensions::AREA,
        si_unit: UnitInfo::base("m2", "square meter"),
        units: [
            UnitInfo::linear("mm2", "square millimeter", 1e-6),
            UnitInfo::linear("cm2", "square centimeter", 1e-4),
            UnitInfo::linear("km2", "square kilometer", 1e6),
            UnitInfo::linear("ha", "hectare", 1e4),
            UnitInfo::linear("ft2", "square foot", 0.092_903_04),
            UnitInfo::linear("ac", "acre", 4_046.856_422_4),
        ],
    }

    /// A volume
    Volume: relative {
        dimensions: SIDimensions::VOLUME,
        si_unit: UnitInfo::base("m3", "cubic meter"),
        units: [
            UnitInfo::linear("cm3", "cubic centimeter", 1e-6),
            UnitInfo::linear("L", "liter", 1e-3),
            UnitInfo::linear("mL", "milliliter", 1e-6),
            UnitInfo::linear("ft3", "cubic foot", 0.028_316_846_592),
            UnitInfo::linear("gal", "US gallon", 0.003_785_411_784),
        ],
    }

    /// A mass
    Mass: relative {
        dimensions: SIDimensions::MASS,
        si_unit: UnitInfo::base("kg", "kilogram"),
        units: [
            UnitInfo::linear("mg", "milligram", 1e-6),
            UnitInfo::linear("g", "gram", 1e-3),
            UnitInfo::linear("t", "tonne", 1e3),
            UnitInfo::linear("oz", "ounce", 0.028_349_523_125),
            UnitInfo::linear("lb", "pound", 0.453_592_37),
        ],
    }

    /// A time span
    Duration: relative {
        dimensions: SIDimensions::TIME,
        si_unit: UnitInfo::base("s", "second"),
        units: [
            UnitInfo::linear("ns", "nanosecond", 1e-9),
            UnitInfo::linear("us", "microsecond", 1e-6),
            UnitInfo::linear("ms", "millisecond", 1e-3),
            UnitInfo::linear("min", "minute", 60.0),
            UnitInfo::linear("h", "hour", 3_600.0),
            UnitInfo::linear("day", "day", 86_400.0),
            UnitInfo::linear("wk", "week", 604_800.0),
        ],
    }

    /// A point in time, measured from an epoch
    Time: absolute(Duration) {
        dimensions: SIDimensions::TIME,
        si_unit: UnitInfo::base("s", "second"),
        units: [
            UnitInfo::linear("ms", "millisecond", 1e-3),
            UnitInfo::linear("min", "minute", 60.0),
            UnitInfo::linear("h", "hour", 3_600.0),
            UnitInfo::linear("day", "day", 86_400.0),
        ],
    }

    /// A speed
    Speed: relative {
        dimensions: SIDimensions::SPEED,
        si_unit: UnitInfo::base("m/s", "meter per second"),
        units: [
            UnitInfo::linear("km/h", "kilometer per hour", 1.0 / 3.6),
            UnitInfo::linear("mi/h", "mile per hour", 0.447_04),
            UnitInfo::linear("ft/s", "foot per second", 0.3048),
            UnitInfo::linear("kt", "knot", 1852.0 / 3600.0),
        ],
    }

    /// An acceleration
    Acceleration: relative {
        dimensions: SIDimensions::ACCELERATION,
        si_unit: UnitInfo::base("m/s2", "meter per second squared"),
        units: [
            UnitInfo::linear("ft/s2", "foot per second squared", 0.3048),
            UnitInfo::linear("Gal", "gal", 0.01),
            UnitInfo::linear("g0", "standard gravity", 9.806_65),
        ],
    }

    /// A force
    Force: relative {
        dimensions: SIDimensions::FORCE,
        si_unit: UnitInfo::base("N", "newton"),
        units: [
            UnitInfo::linear("kN", "kilonewton", 1e3),
            UnitInfo::linear("dyn", "dyne", 1e-5),
            UnitInfo::linear("kgf", "kilogram force", 9.806_65),
            UnitInfo::linear("lbf", "pound force", 4.448_221_615_260_5),
        ],
    }

    /// An energy
    Energy: relative {
        dimensions: SIDimensions::ENERGY,
        si_unit: UnitInfo::base("J", "joule"),
        units: [
            UnitInfo::linear("kJ", "kilojoule", 1e3),
            UnitInfo::linear("MJ", "megajoule", 1e6),
            UnitInfo::linear("Wh", "watt hour", 3_600.0),
            UnitInfo::linear("kWh", "kilowatt hour", 3.6e6),
            UnitInfo::linear("cal", "calorie", 4.184),
            UnitInfo::linear("eV", "electronvolt", 1.602_176_634e-19),
        ],
    }

    /// A power
    Power: relative {
        dimensions: SIDimensions::POWER,
        si_unit: UnitInfo::base("W", "watt"),
        units: [
            UnitInfo::linear("mW", "milliwatt", 1e-3),
            UnitInfo::linear("kW", "kilowatt", 1e3),
            UnitInfo::linear("MW", "megawatt", 1e6),
            UnitInfo::linear("hp", "horsepower", 745.699_871_582_270_2),
            UnitInfo::scaled("dBW", "decibel watt", Scale::decibel(1.0)),
            UnitInfo::scaled("dBm", "decibel milliwatt", Scale::decibel(1e-3)),
        ],
    }

    /// An electrical current
    ElectricalCurrent: relative {
        dimensions: SIDimensions::CURRENT,
        si_unit: UnitInfo::base("A", "ampere"),
        units: [
            UnitInfo::linear("uA", "microampere", 1e-6),
            UnitInfo::linear("mA", "milliampere", 1e-3),
            UnitInfo::linear("kA", "kiloampere", 1e3),
        ],
    }

    /// A temperature difference
    Temperature: relative {
        dimensions: SIDimensions::TEMPERATURE,
        si_unit: UnitInfo::base("K", "kelvin"),
        units: [
            UnitInfo::base("degC", "degree Celsius"),
            UnitInfo::linear("degF", "degree Fahrenheit", FAHRENHEIT),
            UnitInfo::linear("degR", "degree Rankine", FAHRENHEIT),
        ],
    }

    /// A temperature on an absolute scale
    AbsoluteTemperature: absolute(Temperature) {
        dimensions: SIDimensions::TEMPERATURE,
        si_unit: UnitInfo::base("K", "kelvin"),
        units: [
            UnitInfo::scaled("degC", "degree Celsius", Scale::offset(1.0, 273.15)),
            UnitInfo::scaled(
                "degF",
                "degree Fahrenheit",
                Scale::offset(FAHRENHEIT, 459.67 * FAHRENHEIT),
            ),
            UnitInfo::linear("degR", "degree Rankine", FAHRENHEIT),
        ],
    }

    /// A rotation between two directions
    Angle: relative {
        dimensions: SIDimensions::DIMENSIONLESS,
        si_unit: UnitInfo::base("rad", "radian"),
        units: [
            UnitInfo::linear("deg", "degree", DEGREE),
            UnitInfo::linear("arcmin", "arcminute", DEGREE / 60.0),
            UnitInfo::linear("arcsec", "arcsecond", DEGREE / 3_600.0),
            UnitInfo::linear("grad", "gradian", PI / 200.0),
            UnitInfo::scaled("%", "percent grade", Scale::Grade { factor: 0.01 }),
        ],
    }

    /// A direction, measured from a reference direction
    Direction: absolute(Angle) {
        dimensions: SIDimensions::DIMENSIONLESS,
        si_unit: UnitInfo::base("rad", "radian"),
        units: [
            UnitInfo::linear("deg", "degree", DEGREE),
            UnitInfo::linear("grad", "gradian", PI / 200.0),
        ],
    }

    /// An amount of money
    Money: relative {
        dimensions: SIDimensions::CURRENCY,
        si_unit: UnitInfo::base("$", "currency unit"),
        units: [
            UnitInfo::linear("k$", "thousand currency units", 1e3),
            UnitInfo::linear("M$", "million currency units", 1e6),
        ],
    }
}
