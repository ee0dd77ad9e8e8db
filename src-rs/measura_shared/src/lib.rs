//! Shared utilities for Measura
//!
//! This crate holds the pieces that every other Measura crate depends on:
//! the error taxonomy used by all fallible operations and the numeric
//! width abstraction that lets the storage engine run on `f32` or `f64`.

pub mod error;
pub mod float;

pub use error::{Axis, ConstructionError, Position, QuantityError, Shape};
pub use float::{Real, TOLERANCE, is_close};
