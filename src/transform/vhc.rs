use multidimension::{NonTuple, StaticIndex, Index, View, Array};

use super::{Grid, Small, Haar};

/// Identifies one wavelet coefficient of a [`Haar`] tile.
///
/// A tile's three coefficients form a triplet `(V, H, C)`, which is the unit
/// the lattice quantizer operates on.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub enum VHC {
    /// `(s00+s01-s10-s11)/2`: varies down the tile, constant across it.
    Vertical = 0,

    /// `(s00-s01+s10-s11)/2`: varies across the tile, constant down it.
    Horizontal = 1,

    /// `(s00-s01-s10+s11)/2`: varies in both directions.
    Cross = 2,
}

impl NonTuple for VHC {}

impl StaticIndex for VHC {
    const ALL: &'static [Self] = &[
        VHC::Vertical,
        VHC::Horizontal,
        VHC::Cross,
    ];

    #[inline(always)]
    fn to_usize(self) -> usize { self as usize }
}

impl VHC {
    /// The position of this coefficient within a transformed [`Haar`] tile.
    pub fn position(self) -> Small {
        match self {
            VHC::Vertical => (true, false),
            VHC::Horizontal => (false, true),
            VHC::Cross => (true, true),
        }
    }
}

// ----------------------------------------------------------------------------

/// Extract the low-pass component from a grid of `Haar`.
pub fn to_low(pixels: impl View<I=Grid, T=Haar>) -> Array<Grid, f32> {
    pixels.map(|haar| haar.at((false, false))).collect()
}

/// Extract the coefficient triplets from a grid of `Haar`.
pub fn to_high(pixels: impl View<I=Grid, T=Haar>) -> Array<(Grid, VHC), f32> {
    let index_map: Array<VHC, Small> = Array::new((), [
        VHC::Vertical.position(),
        VHC::Horizontal.position(),
        VHC::Cross.position(),
    ]);
    pixels.map(|haar| (&index_map).compose(haar)).nested_collect(())
}

/// Combine the low-pass and coefficient parts to form a grid of `Haar`.
pub fn from_low_high(
    low: impl View<I=Grid, T=f32>,
    high: impl View<I=(Grid, VHC), T=f32>,
) -> Array<Grid, Haar> {
    let (size, ()) = high.size();
    assert_eq!(size, low.size());
    Grid::all(size).map(|yx| {
        let mut haar = Haar::new(low.at(yx), 0.0, 0.0, 0.0);
        VHC::each((), |w| { haar[w.position()] = high.at((yx, w)); });
        haar
    }).collect()
}

// ----------------------------------------------------------------------------
