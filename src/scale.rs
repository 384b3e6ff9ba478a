use nalgebra::{Vector3};

use super::{Error, Result};

/// Maps raw coefficient triplets to the coordinates the quantizer rounds in.
///
/// The perceptual model that decides the mapping lives outside this crate;
/// the quantizer only requires that the map is linear per triplet and that
/// `unscale` inverts `scale` exactly up to rounding. Euclidean distance in
/// the scaled space is what the lattice quantizer minimizes.
pub trait Scaler {
    /// Maps a raw `(V, H, C)` triplet into scaled coordinates.
    fn scale(&self, generation: usize, vhc: Vector3<f32>) -> Vector3<f32>;

    /// Inverts [`scale()`].
    ///
    /// [`scale()`]: Scaler::scale
    fn unscale(&self, generation: usize, vhc: Vector3<f32>) -> Vector3<f32>;
}

// ----------------------------------------------------------------------------

/// The identity map. Quantization error is then measured directly in
/// coefficient units.
#[derive(Debug, Copy, Clone)]
pub struct UnitScaler;

impl Scaler for UnitScaler {
    fn scale(&self, _generation: usize, vhc: Vector3<f32>) -> Vector3<f32> { vhc }
    fn unscale(&self, _generation: usize, vhc: Vector3<f32>) -> Vector3<f32> { vhc }
}

// ----------------------------------------------------------------------------

/// A diagonal linear map with one gain triplet per generation.
///
/// Generations beyond the last supplied triplet reuse the last one, so a
/// single triplet gives a uniform quantization step for the whole pyramid.
#[derive(Debug, Clone)]
pub struct DiagonalScaler {
    gains: Vec<Vector3<f32>>,
}

impl DiagonalScaler {
    /// Constructs a `DiagonalScaler` from per-generation gain triplets.
    ///
    /// Every gain must be finite and non-zero; otherwise the map would not
    /// be invertible and the round-trip guarantee would fail.
    pub fn new(gains: Vec<Vector3<f32>>) -> Result<Self> {
        if gains.is_empty() {
            return Err(Error::Configuration("no scaler gains supplied".into()));
        }
        for (generation, gain) in gains.iter().enumerate() {
            for axis in 0..3 {
                let g = gain[axis];
                if !g.is_finite() || g == 0.0 {
                    return Err(Error::Configuration(format!(
                        "scaler gain {} for generation {} axis {} is not invertible",
                        g, generation, axis
                    )));
                }
            }
        }
        Ok(Self {gains})
    }

    /// A uniform quantization step: every coefficient of every generation is
    /// divided by `step` before rounding.
    pub fn uniform(step: f32) -> Result<Self> {
        if !(step.is_finite() && step > 0.0) {
            return Err(Error::Configuration(format!("invalid quantization step {}", step)));
        }
        Self::new(vec![Vector3::repeat(step.recip())])
    }

    fn gain(&self, generation: usize) -> Vector3<f32> {
        self.gains[generation.min(self.gains.len() - 1)]
    }
}

impl Scaler for DiagonalScaler {
    fn scale(&self, generation: usize, vhc: Vector3<f32>) -> Vector3<f32> {
        vhc.component_mul(&self.gain(generation))
    }

    fn unscale(&self, generation: usize, vhc: Vector3<f32>) -> Vector3<f32> {
        vhc.component_div(&self.gain(generation))
    }
}

// ----------------------------------------------------------------------------
