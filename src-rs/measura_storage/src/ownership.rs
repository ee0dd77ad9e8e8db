//! Frozen and exclusive handles to storage

use std::sync::Arc;

use measura_shared::QuantityError;

/// A handle to vector or matrix data that is either frozen or exclusive.
///
/// Frozen data is read only and may be shared freely between handles.
/// Exclusive data may be written through [`Ownership::data_mut`]. A write
/// copies the buffer first if any other handle still refers to it, so
/// freezing a snapshot and continuing to write through the exclusive handle
/// never changes the snapshot.
#[derive(Debug)]
pub enum Ownership<D> {
    /// Read-only data, possibly shared.
    Frozen(Arc<D>),
    /// Writable data, copied on write if shared.
    Exclusive(Arc<D>),
}

impl<D: Clone> Ownership<D> {
    /// Wraps data in a frozen handle.
    #[must_use]
    pub fn frozen(data: D) -> Self {
        Self::Frozen(Arc::new(data))
    }

    /// Wraps data in an exclusive handle.
    #[must_use]
    pub fn exclusive(data: D) -> Self {
        Self::Exclusive(Arc::new(data))
    }

    /// Borrows the data.
    #[must_use]
    pub fn data(&self) -> &D {
        match self {
            Self::Frozen(data) | Self::Exclusive(data) => data,
        }
    }

    /// Borrows the data for writing.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::ImmutableMutation` if the handle is frozen.
    pub fn data_mut(&mut self) -> Result<&mut D, QuantityError> {
        match self {
            Self::Frozen(_) => Err(QuantityError::ImmutableMutation),
            Self::Exclusive(data) => {
                if Arc::strong_count(data) > 1 {
                    tracing::trace!("copying shared storage before write");
                }
                Ok(Arc::make_mut(data))
            }
        }
    }

    /// Checks if the data may be written through this handle.
    #[must_use]
    pub const fn is_mutable(&self) -> bool {
        matches!(self, Self::Exclusive(_))
    }

    /// Wraps other data in a handle of the same state as this one.
    #[must_use]
    pub fn with_data(&self, data: D) -> Self {
        match self {
            Self::Frozen(_) => Self::frozen(data),
            Self::Exclusive(_) => Self::exclusive(data),
        }
    }

    /// Returns a frozen handle sharing this handle's buffer.
    #[must_use]
    pub fn freeze(&self) -> Self {
        match self {
            Self::Frozen(data) | Self::Exclusive(data) => Self::Frozen(Arc::clone(data)),
        }
    }

    /// Returns an exclusive handle sharing this handle's buffer.
    ///
    /// The buffer is copied on the first write through the returned handle
    /// while this handle still exists.
    #[must_use]
    pub fn thaw(&self) -> Self {
        match self {
            Self::Frozen(data) | Self::Exclusive(data) => Self::Exclusive(Arc::clone(data)),
        }
    }
}

impl<D> Clone for Ownership<D> {
    fn clone(&self) -> Self {
        match self {
            Self::Frozen(data) => Self::Frozen(Arc::clone(data)),
            Self::Exclusive(data) => Self::Exclusive(Arc::clone(data)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{storage::StorageType, vector_data::VectorData};

    fn sample() -> VectorData<f64> {
        VectorData::from_values(vec![1.0, 0.0, 3.0], StorageType::Sparse)
    }

    #[test]
    fn frozen_rejects_writes() {
        let mut handle = Ownership::frozen(sample());
        assert!(!handle.is_mutable());
        assert_eq!(handle.data_mut().err(), Some(QuantityError::ImmutableMutation));
    }

    #[test]
    fn exclusive_allows_writes() {
        let mut handle = Ownership::exclusive(sample());
        assert!(handle.is_mutable());

        handle
            .data_mut()
            .expect("exclusive")
            .set(1, 2.0)
            .expect("in range");
        assert_eq!(handle.data().get(1), Ok(2.0));
    }

    #[test]
    fn snapshot_is_unaffected_by_later_writes() {
        let mut handle = Ownership::exclusive(sample());
        let snapshot = handle.freeze();

        handle
            .data_mut()
            .expect("exclusive")
            .set(0, 10.0)
            .expect("in range");

        assert_eq!(snapshot.data().get(0), Ok(1.0));
        assert_eq!(handle.data().get(0), Ok(10.0));
    }

    #[test]
    fn thawed_copy_does_not_write_through() {
        let frozen = Ownership::frozen(sample());
        let mut thawed = frozen.thaw();

        thawed
            .data_mut()
            .expect("exclusive")
            .set(2, -3.0)
            .expect("in range");

        assert_eq!(frozen.data().get(2), Ok(3.0));
        assert_eq!(thawed.data().get(2), Ok(-3.0));
    }

    #[test]
    fn clone_keeps_state() {
        let frozen = Ownership::frozen(sample());
        let exclusive = Ownership::exclusive(sample());
        assert!(!frozen.clone().is_mutable());
        assert!(exclusive.clone().is_mutable());
    }

    #[test]
    fn with_data_keeps_state() {
        let frozen = Ownership::frozen(sample());
        let replaced = frozen.with_data(sample().to_dense());
        assert!(!replaced.is_mutable());
        assert!(replaced.data().is_dense());

        let exclusive = Ownership::exclusive(sample());
        assert!(exclusive.with_data(sample()).is_mutable());
    }
}
