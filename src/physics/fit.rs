// src/physics/fit.rs

use nalgebra::{DMatrix, DVector};

use crate::error::{FedError, Result};

/// Singular values below this count as zero.
const RANK_EPS: f64 = 1e-12;

/// Polynomial with coefficients ordered from the highest power down.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    pub coeffs: Vec<f64>,
}

impl Polynomial {
    pub fn new(coeffs: Vec<f64>) -> Self {
        Self { coeffs }
    }

    pub fn order(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    /// Horner evaluation
    pub fn eval(&self, x: f64) -> f64 {
        self.coeffs.iter().fold(0.0, |acc, c| acc * x + c)
    }

    pub fn eval_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }
}

/// Least-squares polynomial of the given order through (x, y).
///
/// With `weights`, each residual is multiplied by its weight before squaring
/// (the convention of numpy's `polyfit`).
pub fn fit_points(x: &[f64], y: &[f64], order: usize, weights: Option<&[f64]>) -> Result<Polynomial> {
    if x.len() != y.len() {
        return Err(FedError::LengthMismatch { x: x.len(), y: y.len() });
    }
    if let Some(w) = weights {
        if w.len() != x.len() {
            return Err(FedError::LengthMismatch { x: x.len(), y: w.len() });
        }
    }
    let needed = order + 1;
    if x.len() < needed {
        return Err(FedError::InsufficientPoints {
            order,
            needed,
            got: x.len(),
        });
    }

    let finite = |v: &[f64]| v.iter().all(|c| c.is_finite());
    if !finite(x) || !finite(y) || !weights.map_or(true, finite) {
        return Err(FedError::SingularFit);
    }

    let n = x.len();
    let weight = |i: usize| weights.map_or(1.0, |w| w[i]);

    // Vandermonde, highest power in column 0
    let a = DMatrix::from_fn(n, needed, |i, j| weight(i) * x[i].powi((order - j) as i32));
    let b = DVector::from_fn(n, |i, _| weight(i) * y[i]);

    let svd = a.svd(true, true);
    if svd.rank(RANK_EPS) < needed {
        return Err(FedError::SingularFit);
    }
    let solution = svd.solve(&b, RANK_EPS).map_err(|_| FedError::SingularFit)?;
    if solution.iter().any(|c| !c.is_finite()) {
        return Err(FedError::SingularFit);
    }

    Ok(Polynomial::new(solution.iter().copied().collect()))
}

/// `num` evenly spaced samples over [start, stop], both ends included.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num)
                .map(|i| if i == num - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}
