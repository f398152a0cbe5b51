pub type CsVec = sprs::CsVecI<f64, usize>;

pub type Matrix = ndarray::Array2<f64>;
