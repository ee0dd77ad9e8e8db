//! Storage engine for Measura
//!
//! [`VectorData`] and [`MatrixData`] hold the SI values of a vector or
//! matrix, either densely or sparsely. [`Ownership`] wraps them in one of two
//! states: frozen (shared, read only) or exclusive (mutable, copied on the
//! first write that would be visible to another handle).

pub mod matrix_data;
pub mod ownership;
pub mod storage;
pub mod vector_data;

pub use matrix_data::{LARGE_DETERMINANT_SIZE, MatrixData};
pub use ownership::Ownership;
pub use storage::StorageType;
pub use vector_data::VectorData;
