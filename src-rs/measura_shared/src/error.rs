//! Errors for Measura
//!
//! Every fallible operation in Measura reports a [`QuantityError`]. The
//! variants mirror the contract violations a caller can commit: reaching
//! outside of a vector or matrix, combining data of different shapes,
//! mutating frozen data, and mixing incompatible units or dimensions.
//!
//! None of these are transient. They are detected at the point of the
//! offending call and never coerced (an out-of-range index is never clamped
//! or wrapped).

use std::fmt;

/// The shape of a vector or matrix, used when reporting errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// A vector with the given number of elements
    Vector(usize),
    /// A matrix with the given number of rows and columns
    Matrix {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vector(size) => write!(f, "[{size}]"),
            Self::Matrix { rows, cols } => write!(f, "[{rows}x{cols}]"),
        }
    }
}

/// A position inside a vector or matrix, used when reporting errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// An element of a vector
    Element(usize),
    /// An entry of a matrix
    Entry {
        /// The row of the entry
        row: usize,
        /// The column of the entry
        col: usize,
    },
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(index) => write!(f, "({index})"),
            Self::Entry { row, col } => write!(f, "({row}, {col})"),
        }
    }
}

/// The axis along which an index was out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The element index of a vector
    Element,
    /// The row index of a matrix
    Row,
    /// The column index of a matrix
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element => write!(f, "index"),
            Self::Row => write!(f, "row"),
            Self::Column => write!(f, "column"),
        }
    }
}

/// A violated construction contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// A sparse entry lies outside of the declared size
    EntryOutOfBounds {
        /// The offending entry position
        position: Position,
        /// The declared size
        size: Shape,
    },
    /// Two sparse entries were given for the same position
    DuplicateEntry {
        /// The duplicated position
        position: Position,
    },
    /// A row of matrix input has a different length than the first row
    RaggedRows {
        /// The index of the offending row
        row: usize,
        /// The length of the first row
        expected: usize,
        /// The length of the offending row
        actual: usize,
    },
    /// The number of values does not match the declared size
    LengthMismatch {
        /// The declared size
        expected: usize,
        /// The number of values supplied
        actual: usize,
    },
    /// No values were given to infer a display unit from
    EmptyInput,
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EntryOutOfBounds { position, size } => {
                write!(f, "sparse entry at {position} lies outside of size {size}")
            }
            Self::DuplicateEntry { position } => {
                write!(f, "duplicate sparse entry at {position}")
            }
            Self::RaggedRows {
                row,
                expected,
                actual,
            } => write!(
                f,
                "row {row} has {actual} columns, but the first row has {expected}"
            ),
            Self::LengthMismatch { expected, actual } => {
                write!(f, "expected {expected} values, found {actual}")
            }
            Self::EmptyInput => write!(f, "cannot infer a display unit from empty input"),
        }
    }
}

/// An error raised by a Measura operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// An element, row, or column index lies outside of the declared bounds
    IndexOutOfRange {
        /// Which index was out of range
        axis: Axis,
        /// The requested index
        index: usize,
        /// The size along that axis
        size: usize,
    },
    /// An elementwise operation was applied to data of different shapes
    ShapeMismatch {
        /// The shape of the left operand
        expected: Shape,
        /// The shape of the right operand
        actual: Shape,
    },
    /// A square-only operation was applied to a non-square matrix
    NonSquareMatrix {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },
    /// A mutating call was made on frozen data
    ImmutableMutation,
    /// A unit was used with a quantity it does not belong to
    InvalidUnit {
        /// The id of the unit
        unit: String,
        /// The name of the quantity
        quantity: String,
    },
    /// Two values with different dimensions were added, subtracted or compared
    IncompatibleDimensions {
        /// The dimension signature of the left operand
        lhs: String,
        /// The dimension signature of the right operand
        rhs: String,
    },
    /// A dimension signature could not be parsed
    InvalidDimension {
        /// The offending signature
        signature: String,
    },
    /// A constructor argument violated its contract
    Construction(ConstructionError),
}

impl QuantityError {
    /// Creates an out-of-range error for a vector element.
    #[must_use]
    pub const fn element_out_of_range(index: usize, size: usize) -> Self {
        Self::IndexOutOfRange {
            axis: Axis::Element,
            index,
            size,
        }
    }

    /// Creates an out-of-range error for a matrix row.
    #[must_use]
    pub const fn row_out_of_range(index: usize, size: usize) -> Self {
        Self::IndexOutOfRange {
            axis: Axis::Row,
            index,
            size,
        }
    }

    /// Creates an out-of-range error for a matrix column.
    #[must_use]
    pub const fn column_out_of_range(index: usize, size: usize) -> Self {
        Self::IndexOutOfRange {
            axis: Axis::Column,
            index,
            size,
        }
    }
}

impl From<ConstructionError> for QuantityError {
    fn from(error: ConstructionError) -> Self {
        Self::Construction(error)
    }
}

impl fmt::Display for QuantityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { axis, index, size } => {
                write!(f, "{axis} {index} is out of range for size {size}")
            }
            Self::ShapeMismatch { expected, actual } => {
                write!(f, "shape mismatch: {expected} vs {actual}")
            }
            Self::NonSquareMatrix { rows, cols } => {
                write!(f, "operation requires a square matrix, found {rows}x{cols}")
            }
            Self::ImmutableMutation => write!(f, "attempt to mutate immutable data"),
            Self::InvalidUnit { unit, quantity } => {
                write!(f, "unit `{unit}` does not belong to quantity `{quantity}`")
            }
            Self::IncompatibleDimensions { lhs, rhs } => {
                write!(f, "incompatible dimensions `{lhs}` and `{rhs}`")
            }
            Self::InvalidDimension { signature } => {
                write!(f, "invalid dimension signature `{signature}`")
            }
            Self::Construction(error) => write!(f, "invalid construction: {error}"),
        }
    }
}

impl std::error::Error for QuantityError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_index_out_of_range() {
        let error = QuantityError::row_out_of_range(4, 3);
        assert_eq!(error.to_string(), "row 4 is out of range for size 3");
    }

    #[test]
    fn display_shape_mismatch() {
        let error = QuantityError::ShapeMismatch {
            expected: Shape::Matrix { rows: 2, cols: 3 },
            actual: Shape::Vector(6),
        };
        assert_eq!(error.to_string(), "shape mismatch: [2x3] vs [6]");
    }

    #[test]
    fn display_entry_out_of_bounds() {
        let error = ConstructionError::EntryOutOfBounds {
            position: Position::Entry { row: 3, col: 0 },
            size: Shape::Matrix { rows: 3, cols: 3 },
        };
        assert_eq!(
            error.to_string(),
            "sparse entry at (3, 0) lies outside of size [3x3]"
        );
    }

    #[test]
    fn construction_error_converts() {
        let error: QuantityError = ConstructionError::EmptyInput.into();
        assert_eq!(error, QuantityError::Construction(ConstructionError::EmptyInput));
    }
}
