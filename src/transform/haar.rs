use multidimension::{View, NewView, Array};

use super::{Grid, Small, Tile};

/// The orthonormal re-expression of a 2x2 block of samples.
///
/// Position `(false, false)` holds the low-pass value; the other three
/// positions hold the wavelet coefficients (see [`VHC`]). The transform
/// matrix is symmetric and orthonormal, so [`transform()`] is its own
/// inverse and preserves the sum of squares of the four values.
///
/// [`VHC`]: super::VHC
/// [`transform()`]: Haar::transform
#[derive(Debug, Copy, Clone)]
pub struct Haar(pub Tile<f32>);

impl Haar {
    pub fn new(a: f32, b: f32, c: f32, d: f32) -> Self {
        Haar(Tile::new(a, b, c, d))
    }

    /// Transforms `self`. The transformation is its own inverse.
    ///
    /// Applied to samples `(s00, s01, s10, s11)` this computes
    /// `low = (s00+s01+s10+s11)/2` at `(false, false)`,
    /// `H = (s00-s01+s10-s11)/2` at `(false, true)`,
    /// `V = (s00+s01-s10-s11)/2` at `(true, false)` and
    /// `C = (s00-s01-s10+s11)/2` at `(true, true)`.
    pub fn transform(self) -> Self {
        let a = 0.5 * self[(false, false)];
        let b = 0.5 * self[(false, true)];
        let c = 0.5 * self[(true, false)];
        let d = 0.5 * self[(true, true)];
        Self::new(
            (a + b) + (c + d), (a - b) + (c - d),
            (a + b) - (c + d), (a - b) - (c - d),
        )
    }

    /// The low-pass value.
    pub fn low(self) -> f32 { self[(false, false)] }

    /// The sum of squares of the four values.
    pub fn energy(self) -> f32 {
        let [[a, b], [c, d]] = self.0.0;
        a * a + b * b + c * c + d * d
    }

    /// Exchanges the indices.
    pub fn transpose(self) -> Self { Haar(self.0.transpose()) }
}

impl std::ops::Deref for Haar {
    type Target = Tile<f32>;
    fn deref(&self) -> &Self::Target { &self.0 }
}

impl std::ops::DerefMut for Haar {
    fn deref_mut(&mut self) -> &mut Self::Target { &mut self.0 }
}

impl NewView for Haar {
    type Buffer = <Tile<f32> as NewView>::Buffer;
    fn new_view(size: ((), ()), callback: impl FnOnce(&mut Self::Buffer)) -> Self {
        Haar(Tile::<f32>::new_view(size, callback))
    }
}

// ----------------------------------------------------------------------------

/// Applies the tile transform to every 2x2 block of `pixels`.
pub fn to_haar(pixels: impl View<I=Grid, T=f32>) -> Array<Grid, Haar> {
    let pixels = super::group(pixels);
    let tiles: Array<Grid, Haar> = pixels.rows::<Grid, Small>().map(
        |tile| tile.collect::<Haar>().transform()
    ).collect();
    tiles
}

/// Inverts [`to_haar()`].
pub fn from_haar(tiles: Array<Grid, Haar>) -> impl View<I=Grid, T=f32> {
    let tiles = tiles.map(Haar::transform);
    let pixels: Array<(Grid, Small), f32> = tiles.nested_collect(((), ()));
    let pixels = super::ungroup(pixels);
    pixels
}

// ----------------------------------------------------------------------------
