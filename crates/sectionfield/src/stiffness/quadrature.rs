//! Gauss-Legendre and Gauss-Lobatto rules on [-1, 1].
//!
//! Nodes come from Newton iteration on Legendre polynomials evaluated by the
//! three-term recurrence; outputs are sorted ascending.

use std::f64::consts::PI;

use crate::error::StiffnessError;

const NEWTON_TOL: f64 = 1e-15;
const MAX_NEWTON: usize = 100;

/// `(P_n(x), P_{n-1}(x))` by recurrence.
fn legendre_pair(n: usize, x: f64) -> (f64, f64) {
    let (mut p_prev, mut p) = (1.0, x);
    if n == 0 {
        return (1.0, 0.0);
    }
    for k in 2..=n {
        let kf = k as f64;
        let next = ((2.0 * kf - 1.0) * x * p - (kf - 1.0) * p_prev) / kf;
        p_prev = p;
        p = next;
    }
    (p, p_prev)
}

/// `n`-point Gauss-Legendre nodes and weights (exact for degree `2n−1`).
pub fn gauss_legendre(n: usize) -> Result<(Vec<f64>, Vec<f64>), StiffnessError> {
    if n < 1 {
        return Err(StiffnessError::QuadratureOrder {
            requested: n,
            minimum: 1,
        });
    }
    let nf = n as f64;
    let mut nodes = vec![0.0; n];
    let mut weights = vec![0.0; n];
    for i in 0..(n + 1) / 2 {
        let mut z = (PI * (i as f64 + 0.75) / (nf + 0.5)).cos();
        for _ in 0..MAX_NEWTON {
            let (p, p_prev) = legendre_pair(n, z);
            let dp = nf * (z * p - p_prev) / (z * z - 1.0);
            let dz = p / dp;
            z -= dz;
            if dz.abs() < NEWTON_TOL {
                break;
            }
        }
        let (p, p_prev) = legendre_pair(n, z);
        let dp = nf * (z * p - p_prev) / (z * z - 1.0);
        let w = 2.0 / ((1.0 - z * z) * dp * dp);
        nodes[i] = -z;
        nodes[n - 1 - i] = z;
        weights[i] = w;
        weights[n - 1 - i] = w;
    }
    Ok((nodes, weights))
}

/// `n`-point Gauss-Lobatto nodes (both endpoints included) and weights.
pub fn gauss_lobatto(n: usize) -> Result<(Vec<f64>, Vec<f64>), StiffnessError> {
    if n < 2 {
        return Err(StiffnessError::QuadratureOrder {
            requested: n,
            minimum: 2,
        });
    }
    let order = n - 1;
    let nf = n as f64;
    // Chebyshev-Gauss-Lobatto initial guess, descending.
    let mut x: Vec<f64> = (0..n)
        .map(|i| (PI * i as f64 / order as f64).cos())
        .collect();
    for _ in 0..MAX_NEWTON {
        let mut max_step = 0.0_f64;
        for xi in x.iter_mut() {
            let (p, p_prev) = legendre_pair(order, *xi);
            let step = (*xi * p - p_prev) / (nf * p);
            *xi -= step;
            max_step = max_step.max(step.abs());
        }
        if max_step < NEWTON_TOL {
            break;
        }
    }
    let weights_desc = x.iter().map(|&xi| {
        let (p, _) = legendre_pair(order, xi);
        2.0 / (order as f64 * nf * p * p)
    });
    let mut pairs: Vec<(f64, f64)> = x.iter().copied().zip(weights_desc).collect();
    pairs.reverse();
    Ok(pairs.into_iter().unzip())
}
