use nalgebra::{SVector};
use num_traits::{ToPrimitive};

use crate::{Error, Result};

/// A point of a [`Glued`] lattice: the index of the coset it belongs to,
/// plus integer coordinates within the sublattice.
///
/// Decoding `(coset, coords)` through [`Glued::to_analogue()`] yields
/// exactly one real vector, and distinct points never decode to the same
/// vector.
///
/// [`Glued`]: super::Glued
/// [`Glued::to_analogue()`]: super::Glued::to_analogue
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub struct Point<const N: usize> {
    pub coset: u8,
    pub coords: SVector<i32, N>,
}

impl<const N: usize> Point<N> {
    pub fn new(coset: u8, coords: [i32; N]) -> Self {
        Self {coset, coords: SVector::from(coords)}
    }
}

/// `true` if `a` is lexicographically smaller than `b`.
pub(super) fn lex_less<const N: usize>(a: &SVector<i32, N>, b: &SVector<i32, N>) -> bool {
    for i in 0..N {
        if a[i] != b[i] { return a[i] < b[i]; }
    }
    false
}

// ----------------------------------------------------------------------------

/// A lattice Λ with a closed-form closest-point rule.
///
/// Implementations supply the rounding rule, a basis that gives every point
/// integer coordinates, and exact membership testing. [`Glued`] builds the
/// quantization lattice as a union of translated copies of Λ.
///
/// [`Glued`]: super::Glued
pub trait Sublattice<const N: usize>: Clone {
    /// The integer coordinates of the point of Λ nearest to `v`.
    /// Ties must be resolved deterministically.
    fn nearest(&self, v: SVector<f32, N>) -> SVector<i32, N>;

    /// The position of the point with the given coordinates.
    fn to_analogue(&self, coords: SVector<i32, N>) -> SVector<f32, N>;

    /// The coordinates of `v`, if `v` is a point of Λ.
    fn coords_of(&self, v: SVector<f32, N>) -> Option<SVector<i32, N>>;
}

// ----------------------------------------------------------------------------

/// The cubic lattice `spacing * Z^N`: each coordinate rounds independently.
///
/// This is the product lattice. Its closest-point rule is trivial and exact.
#[derive(Debug, Copy, Clone)]
pub struct Cubic<const N: usize> {
    spacing: f32,
}

impl<const N: usize> Cubic<N> {
    pub fn new(spacing: f32) -> Result<Self> {
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(Error::Configuration(format!("invalid lattice spacing {}", spacing)));
        }
        Ok(Self {spacing})
    }

    pub fn spacing(&self) -> f32 { self.spacing }

    /// Tolerance for [`coords_of()`] membership tests.
    ///
    /// [`coords_of()`]: Sublattice::coords_of
    fn epsilon(&self) -> f32 { self.spacing * 1e-4 }
}

impl<const N: usize> Sublattice<N> for Cubic<N> {
    fn nearest(&self, v: SVector<f32, N>) -> SVector<i32, N> {
        v.map(|x| (x / self.spacing).round().to_i32().expect("Overflow"))
    }

    fn to_analogue(&self, coords: SVector<i32, N>) -> SVector<f32, N> {
        coords.map(|c| c as f32 * self.spacing)
    }

    fn coords_of(&self, v: SVector<f32, N>) -> Option<SVector<i32, N>> {
        let mut coords = SVector::<i32, N>::zeros();
        for i in 0..N {
            let c = (v[i] / self.spacing).round();
            if (v[i] - c * self.spacing).abs() > self.epsilon() { return None; }
            coords[i] = c.to_i32().expect("Overflow");
        }
        Some(coords)
    }
}

// ----------------------------------------------------------------------------

/// The body-centred cubic lattice: all-integer vectors together with
/// all-integer-plus-half vectors, times `spacing`.
///
/// This is the optimal 3D quantization lattice: rounding a uniformly random
/// point onto it gives a smaller expected squared error than any other
/// lattice of the same density. Its closest-point rule is O(1): round to
/// the nearest all-integer vector and to the nearest all-half vector, and
/// keep whichever is closer.
///
/// Coordinates use the basis `e1`, `e2`, `(e1+e2+e3)/2`, so coordinates
/// `(i, j, k)` sit at `spacing * (i + k/2, j + k/2, k/2)`; `k` is odd
/// exactly for the all-half points.
#[derive(Debug, Copy, Clone)]
pub struct BodyCentred {
    spacing: f32,
}

impl BodyCentred {
    pub fn new(spacing: f32) -> Result<Self> {
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(Error::Configuration(format!("invalid lattice spacing {}", spacing)));
        }
        Ok(Self {spacing})
    }

    pub fn spacing(&self) -> f32 { self.spacing }

    fn epsilon(&self) -> f32 { self.spacing * 1e-4 }

    /// Coordinates of a point given in units of `spacing`. The caller
    /// guarantees `u` is (close to) a lattice point.
    fn coords_of_units(u: SVector<f32, 3>) -> SVector<i32, 3> {
        SVector::from([
            (u[0] - u[2]).round().to_i32().expect("Overflow"),
            (u[1] - u[2]).round().to_i32().expect("Overflow"),
            (2.0 * u[2]).round().to_i32().expect("Overflow"),
        ])
    }
}

impl Sublattice<3> for BodyCentred {
    fn nearest(&self, v: SVector<f32, 3>) -> SVector<i32, 3> {
        let u = v / self.spacing;
        let whole = u.map(|x| x.round());
        let half = u.map(|x| (x - 0.5).round() + 0.5);
        let d_whole = (u - whole).norm_squared();
        let d_half = (u - half).norm_squared();
        let whole = Self::coords_of_units(whole);
        let half = Self::coords_of_units(half);
        if d_whole < d_half || (d_whole == d_half && lex_less(&whole, &half)) {
            whole
        } else {
            half
        }
    }

    fn to_analogue(&self, coords: SVector<i32, 3>) -> SVector<f32, 3> {
        let kh = coords[2] as f32 * 0.5;
        SVector::from([
            (coords[0] as f32 + kh) * self.spacing,
            (coords[1] as f32 + kh) * self.spacing,
            kh * self.spacing,
        ])
    }

    fn coords_of(&self, v: SVector<f32, 3>) -> Option<SVector<i32, 3>> {
        let coords = Self::coords_of_units(v / self.spacing);
        let err = (v - self.to_analogue(coords)).abs().max();
        if err > self.epsilon() { return None; }
        Some(coords)
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubic_rounds_each_axis() {
        // A product lattice with unit spacing rounds (0.2, 0.2, 0.2) to the
        // origin, leaving a squared error of 0.12.
        let cubic: Cubic<3> = Cubic::new(1.0).unwrap();
        let v = SVector::from([0.2, 0.2, 0.2]);
        let coords = cubic.nearest(v);
        assert_eq!(coords, SVector::from([0, 0, 0]));
        let d2 = (v - cubic.to_analogue(coords)).norm_squared();
        assert!((d2 - 0.12).abs() < 1e-6);
    }

    #[test]
    fn cubic_spacing() {
        let cubic: Cubic<2> = Cubic::new(0.5).unwrap();
        let coords = cubic.nearest(SVector::from([1.3, -0.8]));
        assert_eq!(coords, SVector::from([3, -2]));
        assert_eq!(cubic.to_analogue(coords), SVector::from([1.5, -1.0]));
    }

    #[test]
    fn cubic_membership() {
        let cubic: Cubic<3> = Cubic::new(1.0).unwrap();
        assert_eq!(cubic.coords_of(SVector::from([2.0, -1.0, 0.0])), Some(SVector::from([2, -1, 0])));
        assert_eq!(cubic.coords_of(SVector::from([0.5, 0.0, 0.0])), None);
    }

    #[test]
    fn bcc_coordinates_invert() {
        let bcc = BodyCentred::new(1.0).unwrap();
        for coords in [[0, 0, 0], [1, -2, 3], [0, 0, 1], [-4, 5, -3]] {
            let coords = SVector::from(coords);
            assert_eq!(bcc.coords_of(bcc.to_analogue(coords)), Some(coords));
        }
    }

    #[test]
    fn bcc_membership() {
        let bcc = BodyCentred::new(1.0).unwrap();
        assert!(bcc.coords_of(SVector::from([0.5, 0.5, 0.5])).is_some());
        assert!(bcc.coords_of(SVector::from([1.0, 2.0, -1.0])).is_some());
        assert!(bcc.coords_of(SVector::from([0.5, 0.5, 0.0])).is_none());
        assert!(bcc.coords_of(SVector::from([0.5, 0.0, 0.0])).is_none());
    }

    #[test]
    fn bcc_picks_the_closer_candidate() {
        let bcc = BodyCentred::new(1.0).unwrap();
        // (0.4, 0.4, 0.4) is nearer the all-half point (0.5, 0.5, 0.5) than
        // the origin.
        let p = bcc.nearest(SVector::from([0.4, 0.4, 0.4]));
        assert_eq!(bcc.to_analogue(p), SVector::from([0.5, 0.5, 0.5]));
        // (0.1, 0.1, 0.1) is nearer the origin.
        let p = bcc.nearest(SVector::from([0.1, 0.1, 0.1]));
        assert_eq!(bcc.to_analogue(p), SVector::from([0.0, 0.0, 0.0]));
    }

    #[test]
    fn bcc_beats_brute_force() {
        let bcc = BodyCentred::new(1.0).unwrap();
        // Deterministic low-discrepancy-ish sample of the unit cell.
        for n in 0..200 {
            let x = (n * 7 % 41) as f32 / 41.0 * 2.0 - 1.0;
            let y = (n * 11 % 43) as f32 / 43.0 * 2.0 - 1.0;
            let z = (n * 13 % 47) as f32 / 47.0 * 2.0 - 1.0;
            let v = SVector::from([x, y, z]);
            let best = bcc.to_analogue(bcc.nearest(v));
            let d_best = (v - best).norm_squared();
            // Every lattice point near the unit cell.
            for i in -2..=2 {
                for j in -2..=2 {
                    for k in -4..=4 {
                        let p = bcc.to_analogue(SVector::from([i, j, k]));
                        let d = (v - p).norm_squared();
                        assert!(d_best <= d + 1e-6, "{:?} nearer to {:?} than {:?}", v, p, best);
                    }
                }
            }
        }
    }
}
