//! Exact t-SNE.
//!
//! O(N²) per iteration, which is fine for corpora of a few thousand songs.
//! Affinities use a per-point Gaussian calibrated to the target perplexity,
//! the map uses a Student-t kernel with one degree of freedom.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::utils::math::sq_euclidean;
use crate::utils::rng::Rng;

const MIN_PROB: f64 = 1e-12;
const ENTROPY_TOL: f64 = 1e-5;
const BETA_STEPS: usize = 100;
const MIN_GAIN: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TsneParams {
    /// effective neighbour count; clamped to N - 1
    pub perplexity: f64,
    pub learning_rate: f64,
    pub max_iter: usize,
    pub early_exaggeration: f64,
    /// iterations run with exaggerated affinities and low momentum
    pub exaggeration_iter: usize,
    pub initial_momentum: f64,
    pub final_momentum: f64,
    pub seed: u64,
}

impl Default for TsneParams {
    fn default() -> Self {
        Self {
            perplexity: 30.0,
            learning_rate: 200.0,
            max_iter: 1000,
            early_exaggeration: 12.0,
            exaggeration_iter: 250,
            initial_momentum: 0.5,
            final_momentum: 0.8,
            seed: 42,
        }
    }
}

impl TsneParams {
    fn validate(&self) -> Result<()> {
        let positive = |name: &'static str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(Error::InvalidParameter {
                    name,
                    reason: format!("must be a positive number, got {value}"),
                })
            }
        };
        positive("perplexity", self.perplexity)?;
        positive("learning_rate", self.learning_rate)?;
        positive("early_exaggeration", self.early_exaggeration)?;
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Project `data` rows into 2-D.
/// Same input and seed give the same output.
pub fn tsne_2d(data: &[Vec<f64>], params: &TsneParams) -> Result<Vec<[f64; 2]>> {
    params.validate()?;
    let n = data.len();
    if let Some(first) = data.first() {
        let dims = first.len();
        if let Some(row) = data.iter().find(|row| row.len() != dims) {
            return Err(Error::DimensionMismatch {
                expected: dims,
                found: row.len(),
            });
        }
    }
    match n {
        0 => return Ok(Vec::new()),
        1 => return Ok(vec![[0.0, 0.0]]),
        _ => {}
    }

    let perplexity = params.perplexity.min((n - 1) as f64);
    if perplexity < params.perplexity {
        debug!(requested = params.perplexity, used = perplexity, "Perplexity clamped to corpus size");
    }

    let distances = pairwise_sq_distances(data);
    let p = joint_probabilities(&distances, perplexity);
    let y = optimize(&p, n, params);
    Ok(y)
}

fn pairwise_sq_distances(data: &[Vec<f64>]) -> Vec<Vec<f64>> {
    data.par_iter()
        .map(|a| data.iter().map(|b| sq_euclidean(a, b)).collect())
        .collect()
}

/// Symmetric P, each row calibrated to `perplexity`
fn joint_probabilities(distances: &[Vec<f64>], perplexity: f64) -> Vec<Vec<f64>> {
    let n = distances.len();
    let target_entropy = perplexity.ln();
    let conditional: Vec<Vec<f64>> = distances
        .par_iter()
        .enumerate()
        .map(|(i, row)| conditional_row(i, row, target_entropy))
        .collect();

    let norm = 2.0 * n as f64;
    (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    if i == j {
                        0.0
                    } else {
                        ((conditional[i][j] + conditional[j][i]) / norm).max(MIN_PROB)
                    }
                })
                .collect()
        })
        .collect()
}

/// Binary search for the Gaussian precision whose row entropy matches the target.
fn conditional_row(i: usize, distances: &[f64], target_entropy: f64) -> Vec<f64> {
    let mut beta = 1.0;
    let mut beta_min = f64::NEG_INFINITY;
    let mut beta_max = f64::INFINITY;
    let mut row = vec![0.0; distances.len()];

    for _ in 0..BETA_STEPS {
        let entropy = gaussian_row(i, distances, beta, &mut row);
        let diff = entropy - target_entropy;
        if diff.abs() < ENTROPY_TOL {
            break;
        }
        if diff > 0.0 {
            // too flat, sharpen
            beta_min = beta;
            beta = if beta_max.is_infinite() { beta * 2.0 } else { (beta + beta_max) / 2.0 };
        } else {
            beta_max = beta;
            beta = if beta_min.is_infinite() { beta / 2.0 } else { (beta + beta_min) / 2.0 };
        }
    }
    row
}

/// Fills `row` with exp(-d * beta) normalized, returns its entropy.
fn gaussian_row(i: usize, distances: &[f64], beta: f64, row: &mut [f64]) -> f64 {
    // shift by the nearest neighbour so the largest weight is exp(0)
    let d_min = distances
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != i)
        .map(|(_, d)| *d)
        .fold(f64::INFINITY, f64::min);

    let mut sum = 0.0;
    for (j, (p, d)) in row.iter_mut().zip(distances).enumerate() {
        *p = if j == i { 0.0 } else { (-(d - d_min) * beta).exp() };
        sum += *p;
    }
    let others = (distances.len() - 1) as f64;
    if sum <= 0.0 || !sum.is_finite() {
        for (j, p) in row.iter_mut().enumerate() {
            *p = if j == i { 0.0 } else { 1.0 / others };
        }
        return others.ln();
    }

    let mut entropy = 0.0;
    for p in row.iter_mut() {
        *p /= sum;
        if *p > 0.0 {
            entropy -= *p * p.ln();
        }
    }
    entropy
}

fn optimize(p: &[Vec<f64>], n: usize, params: &TsneParams) -> Vec<[f64; 2]> {
    let mut rng = Rng::new(params.seed);
    let mut y: Vec<[f64; 2]> = (0..n)
        .map(|_| [rng.gauss(0.0, 1e-4), rng.gauss(0.0, 1e-4)])
        .collect();
    let mut update = vec![[0.0f64; 2]; n];
    let mut gains = vec![[1.0f64; 2]; n];

    for iter in 0..params.max_iter {
        let (exaggeration, momentum) = if iter < params.exaggeration_iter {
            (params.early_exaggeration, params.initial_momentum)
        } else {
            (1.0, params.final_momentum)
        };

        let grad = gradient(p, &y, exaggeration);
        for i in 0..n {
            for d in 0..2 {
                let g = grad[i][d];
                gains[i][d] = if g * update[i][d] < 0.0 {
                    gains[i][d] + 0.2
                } else {
                    (gains[i][d] * 0.8).max(MIN_GAIN)
                };
                update[i][d] = momentum * update[i][d] - params.learning_rate * gains[i][d] * g;
                y[i][d] += update[i][d];
            }
        }
        center(&mut y);
    }
    y
}

/// dC/dy_i = 4 Σ_j (exag * p_ij - q_ij) (1 + |y_i - y_j|²)⁻¹ (y_i - y_j)
fn gradient(p: &[Vec<f64>], y: &[[f64; 2]], exaggeration: f64) -> Vec<[f64; 2]> {
    let n = y.len();
    let kernel: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|i| {
            (0..n)
                .map(|j| {
                    if i == j {
                        0.0
                    } else {
                        1.0 / (1.0 + sq_euclidean(&y[i], &y[j]))
                    }
                })
                .collect()
        })
        .collect();
    let z: f64 = kernel.iter().map(|row| row.iter().sum::<f64>()).sum();

    (0..n)
        .into_par_iter()
        .map(|i| {
            let mut g = [0.0; 2];
            for j in 0..n {
                if i == j {
                    continue;
                }
                let q = (kernel[i][j] / z).max(MIN_PROB);
                let mult = (exaggeration * p[i][j] - q) * kernel[i][j];
                g[0] += mult * (y[i][0] - y[j][0]);
                g[1] += mult * (y[i][1] - y[j][1]);
            }
            [4.0 * g[0], 4.0 * g[1]]
        })
        .collect()
}

fn center(y: &mut [[f64; 2]]) {
    let n = y.len() as f64;
    let mean = y.iter().fold([0.0, 0.0], |acc, p| [acc[0] + p[0], acc[1] + p[1]]);
    let mean = [mean[0] / n, mean[1] / n];
    for p in y.iter_mut() {
        p[0] -= mean[0];
        p[1] -= mean[1];
    }
}
