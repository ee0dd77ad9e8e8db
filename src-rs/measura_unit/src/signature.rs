//! Parsing and rendering of dimension signatures
//!
//! A dimension signature is a compact rendering of an [`SIDimensions`]
//! vector, such as `m2/s3` or `kgm2/s2K`:
//!
//! - base unit symbols (`kg`, `m`, `s`, `A`, `K`, `mol`, `cd`, `$`) name the
//!   dimensions
//! - a positive integer directly after a symbol is its exponent (1 when
//!   omitted)
//! - a `/` separates the numerator group from the denominator group
//! - `1` stands for an empty numerator
//!
//! Terms may be separated by `.` when parsing. Rendering never emits the
//! separator and always lists terms in slot order, so every vector has
//! exactly one rendered signature.

use nom::{
    IResult, Parser as NomParser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res, opt, value, verify},
    multi::many0,
    sequence::preceded,
};

use measura_shared::QuantityError;

use crate::dimensions::{BaseDimension, SIDimensions};

type Term = (BaseDimension, i32);

/// Parses a complete dimension signature.
///
/// Every accumulated exponent must fit in an `i32` whose negation also
/// fits, so `i32::MIN` is never produced.
///
/// # Errors
///
/// Returns `QuantityError::InvalidDimension` if the signature is malformed,
/// has a zero exponent, or accumulates an exponent out of range.
pub fn parse(signature: &str) -> Result<SIDimensions, QuantityError> {
    let invalid = || QuantityError::InvalidDimension {
        signature: signature.to_string(),
    };

    let (_, (numerator, denominator)) = all_consuming((
        opt(numerator_group),
        opt(preceded(char('/'), term_group)),
    ))
    .parse(signature.trim())
    .map_err(|_| invalid())?;

    let mut exponents = [0_i32; SIDimensions::SLOTS];
    for (dimension, exponent) in numerator.unwrap_or_default() {
        let slot = &mut exponents[dimension.slot()];
        *slot = slot.checked_add(exponent).ok_or_else(invalid)?;
    }
    for (dimension, exponent) in denominator.unwrap_or_default() {
        let slot = &mut exponents[dimension.slot()];
        *slot = slot.checked_sub(exponent).ok_or_else(invalid)?;
    }

    if exponents.contains(&i32::MIN) {
        return Err(invalid());
    }

    Ok(SIDimensions::new(exponents))
}

/// Renders the canonical signature of a dimension vector.
#[must_use]
pub fn render(dimensions: &SIDimensions) -> String {
    let mut numerator = String::new();
    let mut denominator = String::new();

    for dimension in BaseDimension::ALL {
        let exponent = dimensions.exponent(dimension);
        if exponent > 0 {
            push_term(&mut numerator, dimension, exponent);
        } else if exponent < 0 {
            push_term(&mut denominator, dimension, exponent);
        }
    }

    if numerator.is_empty() {
        numerator.push('1');
    }

    if denominator.is_empty() {
        numerator
    } else {
        format!("{numerator}/{denominator}")
    }
}

fn push_term(group: &mut String, dimension: BaseDimension, exponent: i32) {
    let magnitude = exponent.unsigned_abs();

    group.push_str(dimension.symbol());
    if magnitude != 1 {
        group.push_str(&magnitude.to_string());
    }
}

fn numerator_group(input: &str) -> IResult<&str, Vec<Term>> {
    alt((value(Vec::new(), char('1')), term_group)).parse(input)
}

fn term_group(input: &str) -> IResult<&str, Vec<Term>> {
    let (rest, first) = term(input)?;
    let (rest, mut others) = many0(preceded(opt(char('.')), term)).parse(rest)?;

    others.insert(0, first);
    Ok((rest, others))
}

fn term(input: &str) -> IResult<&str, Term> {
    let (rest, dimension) = base_symbol(input)?;
    let positive = verify(map_res(digit1, str::parse::<i32>), |exponent: &i32| {
        *exponent > 0
    });
    let (rest, exponent) = opt(positive).parse(rest)?;

    Ok((rest, (dimension, exponent.unwrap_or(1))))
}

fn base_symbol(input: &str) -> IResult<&str, BaseDimension> {
    // `mol` must be tried before `m`
    alt((
        value(BaseDimension::Substance, tag("mol")),
        value(BaseDimension::Mass, tag("kg")),
        value(BaseDimension::LuminousIntensity, tag("cd")),
        value(BaseDimension::Length, tag("m")),
        value(BaseDimension::Time, tag("s")),
        value(BaseDimension::Current, tag("A")),
        value(BaseDimension::Temperature, tag("K")),
        value(BaseDimension::Currency, tag("$")),
    ))
    .parse(input)
}
