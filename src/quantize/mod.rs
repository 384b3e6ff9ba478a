use multidimension::{Index, View, Array};
use nalgebra::{Vector3};
use rayon::prelude::*;

use super::{Error, Result, Grid};
use super::transform::{Pyramid, VHC};
use super::scale::{Scaler};

mod lattice;
pub use lattice::{Point, Sublattice, Cubic, BodyCentred};

mod glued;
pub use glued::{Glued};

mod codec;
pub use codec::{Codec, Alphabet};

// ----------------------------------------------------------------------------

/// The digital form of a [`Pyramid`]: the base image passes through
/// untouched, and every coefficient triplet becomes one symbol of the
/// codec's alphabet. This plus the [`Alphabet`] is exactly what the entropy
/// coder consumes.
pub struct Quantized {
    pub base: Array<Grid, f32>,
    pub generations: Vec<Array<Grid, u32>>,
    pub alphabet: Alphabet,
}

// ----------------------------------------------------------------------------

/// Collects the coefficient triplets of one generation into a flat vector,
/// one `(V, H, C)` triplet per tile in row-major order.
fn triplets(high: &Array<(Grid, VHC), f32>) -> Vec<Vector3<f32>> {
    let (size, ()) = high.size();
    let mut out = Vec::with_capacity(size.0 * size.1);
    Grid::all(size).each(|yx| {
        out.push(Vector3::new(
            high.at((yx, VHC::Vertical)),
            high.at((yx, VHC::Horizontal)),
            high.at((yx, VHC::Cross)),
        ));
    });
    out
}

/// Quantizes every coefficient triplet of `pyramid` to a symbol.
///
/// Each triplet is mapped through `scaler` into the space where Euclidean
/// distance approximates perceptual error, rounded to the nearest lattice
/// point, and encoded. Triplets within a generation are independent and are
/// processed in parallel; generations are processed in order.
///
/// Errors carry the generation index and tile coordinates of the offending
/// triplet.
pub fn quantize<S: Sublattice<3> + Sync>(
    pyramid: &Pyramid,
    scaler: &(impl Scaler + Sync),
    codec: &Codec<S, 3>,
) -> Result<Quantized> {
    let mut generations = Vec::with_capacity(pyramid.order());
    for (g, high) in pyramid.generations.iter().enumerate() {
        let (size, ()) = high.size();
        let width = size.1;
        let symbols = triplets(high).par_iter().enumerate().map(|(i, &vhc)| {
            let yx = (i / width, i % width);
            let scaled = scaler.scale(g, vhc);
            let (point, d2) = codec.lattice().nearest(scaled);
            if !d2.is_finite() {
                return Err(Error::Invariant(
                    format!("nearest-point search failed on {:?}", scaled)
                ).at(g, yx));
            }
            codec.encode(point).map_err(|e| e.at(g, yx))
        }).collect::<Result<Vec<u32>>>()?;
        generations.push(Array::new(size, symbols));
    }
    Ok(Quantized {
        base: pyramid.base.clone(),
        generations,
        alphabet: codec.alphabet(),
    })
}

/// Inverts [`quantize()`], up to the quantization error: symbols decode to
/// lattice points, which map back through the scaler's inverse to
/// coefficient triplets.
///
/// The result is a [`Pyramid`] ready for [`Pyramid::to_pixels()`].
pub fn reconstruct<S: Sublattice<3> + Sync>(
    quantized: Quantized,
    scaler: &(impl Scaler + Sync),
    codec: &Codec<S, 3>,
) -> Result<Pyramid> {
    let mut generations = Vec::with_capacity(quantized.generations.len());
    for (g, grid) in quantized.generations.into_iter().enumerate() {
        let size = grid.size();
        let width = size.1;
        let mut symbols = Vec::with_capacity(size.0 * size.1);
        grid.each(|s| symbols.push(s));
        let triplets = symbols.par_iter().enumerate().map(|(i, &symbol)| {
            let yx = (i / width, i % width);
            let point = codec.decode(symbol).map_err(|e| e.at(g, yx))?;
            Ok(scaler.unscale(g, codec.lattice().to_analogue(point)))
        }).collect::<Result<Vec<Vector3<f32>>>>()?;
        let mut raw = Vec::with_capacity(3 * triplets.len());
        for vhc in &triplets {
            raw.extend_from_slice(&[vhc.x, vhc.y, vhc.z]);
        }
        generations.push(Array::new((size, ()), raw));
    }
    Ok(Pyramid {base: quantized.base, generations})
}

// ----------------------------------------------------------------------------
