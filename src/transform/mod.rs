use multidimension::{Index, View, Scalar, Array};
use super::{Error, Result, Grid, Small, Tile};

mod haar;
pub use haar::{Haar, to_haar, from_haar};

mod smooth;
pub use smooth::{smooth, smooth_grid};

mod vhc;
pub use vhc::{VHC, to_low, to_high, from_low_high};

// ----------------------------------------------------------------------------

/// Groups items into [`Small`] tiles.
pub fn group<'a, T: Clone>(
    v: impl 'a + View<I=Grid, T=T>,
) -> impl 'a + View<I=(Grid, Small), T=T> {
    let v = v.from_usize::<(), (usize, bool), usize>(|height| (height / 2, ()));
    let v = v.from_usize::<(usize, bool), (usize, bool), ()>(|width| (width / 2, ()));
    let v = v.transpose::<usize, usize, bool, bool>();
    v.iso()
}

/// Ungroups [`Small`] tiles of items.
pub fn ungroup<'a, T: Clone>(
    v: impl 'a + View<I=(Grid, Small), T=T>
) -> impl 'a + View<I=Grid, T=T> {
    let v = v.transpose::<usize, bool, usize, bool>();
    let v = v.to_usize::<(usize, bool), (usize, bool), ()>();
    let v = v.to_usize::<(), (usize, bool), usize>();
    v.iso()
}

// ----------------------------------------------------------------------------

/// Decides how many generations [`Pyramid::build()`] produces.
///
/// The rule is caller policy; the builder only enforces that every
/// generation it does produce halves both dimensions exactly.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Stop {
    /// Produce exactly this many generations. Both image dimensions must be
    /// divisible by two to the same power.
    Exact(usize),

    /// Keep halving while both dimensions are even and at least twice this
    /// value.
    MinSize(usize),
}

impl Stop {
    /// Returns `true` if an image of size `(h, w)` with `done` generations
    /// already built should not be halved again.
    fn is_done(self, (h, w): Grid, done: usize) -> bool {
        match self {
            Stop::Exact(order) => done == order,
            Stop::MinSize(min) => {
                h % 2 != 0 || w % 2 != 0 || h < 2 * min || w < 2 * min
            },
        }
    }
}

// ----------------------------------------------------------------------------

/// A multi-resolution pyramid of wavelet coefficients.
///
/// Generation `0` holds the coefficients of the full-resolution image; each
/// later generation is half the size of the one before. `base` is the
/// low-pass image left over after the last generation.
pub struct Pyramid {
    pub base: Array<Grid, f32>,
    pub generations: Vec<Array<(Grid, VHC), f32>>,
}

impl Pyramid {
    /// Decomposes `pixels` into a `Pyramid`.
    ///
    /// Each generation partitions the current low-pass image into 2x2 tiles
    /// and applies the tile transform to each. `smooth` additionally applies
    /// the decorrelating pass of [`smooth_grid()`] after each generation;
    /// [`to_pixels()`] must be given the same flag.
    ///
    /// Returns a configuration error if `pixels` has a zero dimension, or if
    /// `stop` demands a generation the dimensions cannot supply.
    ///
    /// [`to_pixels()`]: Pyramid::to_pixels
    pub fn build(pixels: Array<Grid, f32>, stop: Stop, smooth: bool) -> Result<Self> {
        let (height, width) = pixels.size();
        if height == 0 || width == 0 {
            return Err(Error::Configuration(
                format!("cannot decompose a {}x{} image", height, width)
            ));
        }
        let mut low = pixels;
        let mut generations = Vec::new();
        while !stop.is_done(low.size(), generations.len()) {
            let (h, w) = low.size();
            if h % 2 != 0 || w % 2 != 0 {
                return Err(Error::Configuration(format!(
                    "a {}x{} image cannot be halved for generation {}",
                    h, w, generations.len()
                )));
            }
            let mut haar = to_haar(low);
            if smooth { haar = smooth_grid::<false>(haar); }
            generations.push(to_high(&haar));
            low = to_low(&haar);
        }
        Ok(Self {base: low, generations})
    }

    /// Inverts [`build()`], generation by generation from the base upward.
    ///
    /// [`build()`]: Pyramid::build
    pub fn to_pixels(self, smooth: bool) -> Array<Grid, f32> {
        let mut low = self.base;
        for high in self.generations.into_iter().rev() {
            let mut haar = from_low_high(low, high);
            if smooth { haar = smooth_grid::<true>(haar); }
            low = from_haar(haar).collect();
        }
        low
    }

    /// Renders every generation into a single image for inspection.
    pub fn montage(self) -> Array<Grid, f32> {
        let mut low = self.base;
        for high in self.generations.into_iter().rev() {
            low = from_low_high(low, high + Scalar(0.5)).nested()
                .transpose::<(), Small, Grid, ()>()
                .transpose::<bool, usize, bool, usize>()
                .to_usize::<(bool, usize), (bool, usize), ()>()
                .to_usize::<(), (bool, usize), usize>()
                .iso().collect();
        }
        low
    }

    /// The number of generations in this `Pyramid`.
    pub fn order(&self) -> usize { self.generations.len() }

    /// The size of the base image.
    pub fn size(&self) -> <Grid as Index>::Size { self.base.size() }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use multidimension::{Index, Array};

    use super::*;

    #[test]
    #[should_panic]
    fn odd_height() {
        group(Array::new((1, 2), ["a", "b"]));
    }

    #[test]
    #[should_panic]
    fn odd_width() {
        group(Array::new((2, 1), ["a", "b"]));
    }

    #[test]
    fn group_ungroup() {
        let a: Array<_, _> = <(usize, usize)>::all((4, 6)).collect();
        let g = group(&a);
        let u = ungroup(&g);
        (&a).zip(u).each(|(x, y)| { assert_eq!(x, y); });
    }

    /// A rectangular test image that is a multiple, but not a power, of two.
    fn ripple(size: Grid) -> Array<Grid, f32> {
        <(usize, usize)>::all(size).map(
            |(y, x)| 0.125 * (x * (15-x.min(15))) as f32 - 0.25 * (y * (7-y.min(7))) as f32
        ).collect()
    }

    #[test]
    fn round_trip() {
        let a = ripple((12, 20));
        let p = Pyramid::build(a.clone(), Stop::Exact(2), true).unwrap();
        assert_eq!(p.order(), 2);
        assert_eq!(p.size(), (3, 5));
        let b = p.to_pixels(true);
        a.zip(b).each(|(x, y)| { assert!((x - y).abs() < 1e-5); });
    }

    #[test]
    fn round_trip_plain() {
        let a = ripple((8, 16));
        let p = Pyramid::build(a.clone(), Stop::Exact(3), false).unwrap();
        let b = p.to_pixels(false);
        a.zip(b).each(|(x, y)| { assert!((x - y).abs() < 1e-5); });
    }

    #[test]
    fn stops_at_odd() {
        // 6x4 halves once to 3x2, which cannot be halved again.
        let p = Pyramid::build(ripple((6, 4)), Stop::MinSize(1), false).unwrap();
        assert_eq!(p.order(), 1);
        assert_eq!(p.size(), (3, 2));
    }

    #[test]
    fn stops_at_min_size() {
        let p = Pyramid::build(ripple((16, 16)), Stop::MinSize(4), false).unwrap();
        assert_eq!(p.order(), 2);
        assert_eq!(p.size(), (4, 4));
    }

    #[test]
    fn zero_dimension_rejected() {
        let empty: Array<Grid, f32> = Array::new((0, 4), []);
        assert!(matches!(
            Pyramid::build(empty, Stop::Exact(1), false),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn unhalvable_exact_rejected() {
        assert!(matches!(
            Pyramid::build(ripple((6, 6)), Stop::Exact(2), false),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn montage_keeps_size() {
        let m = Pyramid::build(ripple((8, 8)), Stop::Exact(2), false).unwrap().montage();
        assert_eq!(m.size(), (8, 8));
    }
}
