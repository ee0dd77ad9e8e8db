#![no_main]

use libfuzzer_sys::{arbitrary, fuzz_target};
use measura_storage::{MatrixData, StorageType};

#[derive(Debug, Clone, PartialEq, arbitrary::Arbitrary)]
struct FuzzData {
    rows: u8,
    cols: u8,
    values: Vec<i16>,
}

fuzz_target!(|data: FuzzData| {
    let rows = usize::from(data.rows % 6);
    let cols = usize::from(data.cols % 6);

    // small integers keep every determinant exact
    let mut values: Vec<f64> = data.values.into_iter().map(|value| f64::from(value % 8)).collect();
    values.resize(rows * cols, 0.0);

    let dense = MatrixData::dense(rows, cols, values).expect("length matches shape");
    let sparse = dense.to_sparse();
    assert_eq!(dense, sparse);

    let rebuilt = MatrixData::sparse(rows, cols, dense.entries()).expect("entries are unique");
    assert_eq!(rebuilt, dense);

    assert_eq!(dense.transpose(), sparse.transpose());
    assert_eq!(dense.transpose().transpose(), dense);

    for row in 0..rows {
        assert_eq!(dense.row(row), sparse.row(row));
    }
    for col in 0..cols {
        assert_eq!(dense.column(col), sparse.column(col));
    }

    if dense.is_square() {
        assert_eq!(dense.diagonal(), sparse.diagonal());
        assert_eq!(dense.determinant(), sparse.determinant());
        assert_eq!(dense.determinant(), dense.transpose().determinant());
    }
});
