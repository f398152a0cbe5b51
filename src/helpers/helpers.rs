use sprs::CsVecBase;
use std::ops::Deref;

use crate::datatype::CsVec;

/// Densifies a sparse row into `len` entries. Entries at indices `>= len` are dropped.
pub(crate) fn to_dense<IStorage, DStorage>(
    vec: &CsVecBase<IStorage, DStorage, f64>,
    len: usize,
) -> Vec<f64>
where
    IStorage: Deref<Target = [usize]>,
    DStorage: Deref<Target = [f64]>,
{
    let mut dense = vec![0.0; len];
    for (i, &val) in vec.iter() {
        if i < len {
            dense[i] = val;
        }
    }
    dense
}

pub(crate) fn to_sparse(slice: &[f64]) -> CsVec {
    let mut res = CsVec::empty(slice.len());
    for (i, &val) in slice.iter().enumerate() {
        if val != 0.0 {
            res.append(i, val);
        }
    }
    res
}

#[cfg(test)]
use crate::datatype::Matrix;

#[cfg(test)]
pub(crate) fn assert_matrix_eq(mat: &Matrix, reference: &[Vec<f64>]) {
    assert_eq!(mat.nrows(), reference.len());
    for (r, row) in mat.rows().into_iter().enumerate() {
        assert_eq!(row.len(), reference[r].len(), "matrices differ in row {}", r);
        for (c, (&val, &expected)) in row.iter().zip(&reference[r]).enumerate() {
            assert!(
                (val - expected).abs() < 1e-9,
                "matrices differ at ({}, {}): {} != {}",
                r,
                c,
                val,
                expected
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_sparse_dense() {
        let sparse = to_sparse(&[0.0, 2.0, 0.0, -1.5]);
        assert_eq!(sparse.nnz(), 2);
        assert_eq!(to_dense(&sparse, 4), vec![0.0, 2.0, 0.0, -1.5]);
        assert_eq!(to_dense(&sparse, 6), vec![0.0, 2.0, 0.0, -1.5, 0.0, 0.0]);
        assert_eq!(to_dense(&sparse, 2), vec![0.0, 2.0]);
    }
}
