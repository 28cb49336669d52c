//! Pairwise gravitational force model.
//!
//! Direct O(N^2) summation with softening; no spatial acceleration
//! structure. The gravitational constant is not physical: it is normalized
//! per run as `G = 100 / N`, matching the `.gal` reference scenarios.

use galaxy_common::{Body, Vec2};

use crate::error::GalError;

/// Per-run force parameters, fixed once the body count is known.
#[derive(Debug, Clone, Copy)]
pub struct ForceParams {
    /// Normalized gravitational constant, `100 / N`.
    pub g: f64,
    /// Softening added to the separation distance before cubing.
    pub softening: f64,
}

impl ForceParams {
    /// Derives the parameters for a run over `n` bodies.
    /// Rejects `n = 0`, for which `G = 100 / N` is undefined.
    pub fn for_bodies(n: usize, softening: f64) -> Result<Self, GalError> {
        if n == 0 {
            return Err(GalError::DegenerateConfig);
        }
        Ok(Self {
            g: 100.0 / n as f64,
            softening,
        })
    }
}

/// Net force on body `index` exerted by all other bodies.
///
/// The sum runs over `j != index` in ascending index order; keeping that
/// order fixed is what makes runs bit-reproducible. With one body the sum
/// is empty and the force is exactly zero.
pub fn net_force(index: usize, bodies: &[Body], params: &ForceParams) -> Vec2 {
    let body = &bodies[index];
    let mut sum = Vec2::zero();

    for (j, other) in bodies.iter().enumerate() {
        if j == index {
            continue;
        }

        // Separation vector points from `other` toward `body`.
        let d = body.position.sub(other.position);
        let r = d.length();
        let denom = (r + params.softening).powi(3);

        sum = sum.add(d.scale(other.mass / denom));
    }

    // The leading minus sign flips the raw sum so the force is attractive.
    sum.scale(-params.g * body.mass)
}
