#![no_main]

use libfuzzer_sys::{arbitrary, fuzz_target};
use measura_storage::{StorageType, VectorData};

#[derive(Debug, Clone, PartialEq, arbitrary::Arbitrary)]
enum Op {
    Set { index: usize, value: f64 },
    Clear { index: usize },
    Negate,
    Ceil,
}

#[derive(Debug, Clone, PartialEq, arbitrary::Arbitrary)]
struct FuzzData {
    values: Vec<f64>,
    other: Vec<f64>,
    ops: Vec<Op>,
}

// large values would overflow to infinity and then to NaN when added
fn is_usable(value: f64) -> bool {
    value.is_finite() && value.abs() < 1e300
}

fn check_equivalent(dense: &VectorData<f64>, sparse: &VectorData<f64>) {
    assert_eq!(dense, sparse);
    assert_eq!(dense.cardinality(), sparse.cardinality());
    assert_eq!(dense.sum(), sparse.sum());
    assert_eq!(&dense.to_sparse(), sparse);
    assert_eq!(&sparse.to_dense(), dense);
}

fuzz_target!(|data: FuzzData| {
    if !data.values.iter().chain(&data.other).copied().all(is_usable) {
        return;
    }

    let mut dense = VectorData::from_values(data.values.clone(), StorageType::Dense);
    let mut sparse = VectorData::from_values(data.values, StorageType::Sparse);
    check_equivalent(&dense, &sparse);

    for op in data.ops {
        match op {
            Op::Set { index, value } => {
                if !is_usable(value) || index >= dense.size() {
                    continue;
                }
                dense.set(index, value).expect("index is in range");
                sparse.set(index, value).expect("index is in range");
            }
            Op::Clear { index } => {
                if index >= dense.size() {
                    continue;
                }
                dense.set(index, 0.0).expect("index is in range");
                sparse.set(index, 0.0).expect("index is in range");
            }
            Op::Negate => {
                dense.assign_unary(|value| -value);
                sparse.assign_unary(|value| -value);
            }
            Op::Ceil => {
                dense.assign_unary(f64::ceil);
                sparse.assign_unary(f64::ceil);
            }
        }
        check_equivalent(&dense, &sparse);
    }

    let mut other = data.other;
    other.resize(dense.size(), 0.0);
    let other_dense = VectorData::from_values(other.clone(), StorageType::Dense);
    let other_sparse = VectorData::from_values(other, StorageType::Sparse);

    let dense_sum = dense.zip_with(&other_dense, |a, b| a + b).expect("same size");
    let sparse_sum = sparse.zip_with(&other_sparse, |a, b| a + b).expect("same size");
    assert!(sparse_sum.is_sparse());
    check_equivalent(&dense_sum, &sparse_sum);
});
