use nalgebra::{SVector};

use crate::{Error, Result};
use super::lattice::{Point, Sublattice, Cubic};

/// A quantization lattice glued together from `K >= 1` cosets of a common
/// sublattice Λ: the union of `c_k + Λ` over the offset vectors `c_k`.
///
/// Gluing can achieve a strictly better points-per-volume trade-off than
/// any product lattice of the same dimension; the body-centred cubic
/// lattice, glued from two cosets of the cubic lattice, is the canonical
/// example (see [`bcc()`]).
///
/// Construction checks that the offsets are distinct modulo Λ and form a
/// group modulo Λ, so the point set is closed under addition and
/// subtraction and contains the zero vector. The coset-combination tables
/// that make [`add()`] and [`neg()`] exact are computed once here.
///
/// [`bcc()`]: Glued::bcc
/// [`add()`]: Glued::add
/// [`neg()`]: Glued::neg
#[derive(Debug, Clone)]
pub struct Glued<S, const N: usize> {
    sub: S,
    offsets: Vec<SVector<f32, N>>,
    /// `sums[i][j]` is the coset of `c_i + c_j` and the coordinate carry.
    sums: Vec<Vec<(u8, SVector<i32, N>)>>,
    /// `negs[i]` is the coset of `-c_i` and the coordinate carry.
    negs: Vec<(u8, SVector<i32, N>)>,
    zero: Point<N>,
}

impl<S: Sublattice<N>, const N: usize> Glued<S, N> {
    pub fn new(sub: S, offsets: Vec<SVector<f32, N>>) -> Result<Self> {
        if offsets.is_empty() || offsets.len() > usize::from(u8::MAX) + 1 {
            return Err(Error::Configuration(
                format!("a glued lattice needs 1 to 256 cosets, not {}", offsets.len())
            ));
        }
        for (k, c) in offsets.iter().enumerate() {
            if !c.iter().all(|x| x.is_finite()) {
                return Err(Error::Configuration(format!("coset offset {} is not finite", k)));
            }
        }
        for i in 0..offsets.len() {
            for j in 0..i {
                if sub.coords_of(offsets[i] - offsets[j]).is_some() {
                    return Err(Error::Configuration(format!(
                        "coset offsets {} and {} coincide modulo the sublattice", j, i
                    )));
                }
            }
        }
        let coset_of = |v: SVector<f32, N>| -> Result<(u8, SVector<i32, N>)> {
            for (m, c) in offsets.iter().enumerate() {
                if let Some(carry) = sub.coords_of(v - c) {
                    return Ok((m as u8, carry));
                }
            }
            Err(Error::Configuration(
                "coset offsets do not form a group modulo the sublattice".into()
            ))
        };
        let sums = offsets.iter().map(|ci| {
            offsets.iter().map(|cj| coset_of(ci + cj)).collect::<Result<Vec<_>>>()
        }).collect::<Result<Vec<_>>>()?;
        let negs = offsets.iter().map(|c| coset_of(-c)).collect::<Result<Vec<_>>>()?;
        let (coset, coords) = coset_of(SVector::zeros())?;
        let zero = Point {coset, coords};
        Ok(Self {sub, offsets, sums, negs, zero})
    }

    /// The number of cosets glued together.
    pub fn cosets(&self) -> usize { self.offsets.len() }

    /// The sublattice Λ.
    pub fn sublattice(&self) -> &S { &self.sub }

    /// The point at the origin.
    pub fn zero(&self) -> Point<N> { self.zero }

    /// Returns the nearest point of the lattice to `v`, and the squared
    /// quantization error.
    ///
    /// Every coset is tried: `v` is translated by `-c_k`, rounded by Λ's
    /// own rule, and translated back; the best candidate over all `K`
    /// cosets is a true global nearest point. Equidistant cosets resolve to
    /// the lowest coset index, and Λ's rule resolves its own ties to the
    /// lexicographically smallest coordinates, so encoder and decoder can
    /// never diverge.
    pub fn nearest(&self, v: SVector<f32, N>) -> (Point<N>, f32) {
        let mut best: Option<(Point<N>, f32)> = None;
        for (k, c) in self.offsets.iter().enumerate() {
            let coords = self.sub.nearest(v - c);
            let d2 = (v - c - self.sub.to_analogue(coords)).norm_squared();
            if best.map_or(true, |(_, b2)| d2 < b2) {
                best = Some((Point {coset: k as u8, coords}, d2));
            }
        }
        best.expect("at least one coset")
    }

    /// The position of `p`.
    pub fn to_analogue(&self, p: Point<N>) -> SVector<f32, N> {
        self.offsets[usize::from(p.coset)] + self.sub.to_analogue(p.coords)
    }

    /// `true` if `p` is well formed for this lattice.
    pub fn contains(&self, p: Point<N>) -> bool {
        usize::from(p.coset) < self.cosets()
    }

    /// The lattice point at the sum of the positions of `p` and `q`.
    pub fn add(&self, p: Point<N>, q: Point<N>) -> Point<N> {
        let (coset, carry) = self.sums[usize::from(p.coset)][usize::from(q.coset)];
        Point {coset, coords: p.coords + q.coords + carry}
    }

    /// The lattice point opposite `p`.
    pub fn neg(&self, p: Point<N>) -> Point<N> {
        let (coset, carry) = self.negs[usize::from(p.coset)];
        Point {coset, coords: carry - p.coords}
    }

    /// The lattice point at the difference of the positions of `p` and `q`.
    pub fn sub(&self, p: Point<N>, q: Point<N>) -> Point<N> {
        self.add(p, self.neg(q))
    }
}

impl<const N: usize> Glued<Cubic<N>, N> {
    /// The product lattice `spacing * Z^N`, as a single trivial coset.
    pub fn product(spacing: f32) -> Result<Self> {
        Self::new(Cubic::new(spacing)?, vec![SVector::zeros()])
    }
}

impl Glued<Cubic<3>, 3> {
    /// The body-centred construction: two cosets of the cubic lattice, one
    /// at the origin and one at the cell centre.
    pub fn bcc(spacing: f32) -> Result<Self> {
        let sub = Cubic::new(spacing)?;
        let offsets = vec![
            SVector::zeros(),
            SVector::from([0.5, 0.5, 0.5]) * spacing,
        ];
        Self::new(sub, offsets)
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand::rngs::{StdRng};
    use super::*;

    #[test]
    fn bcc_prefers_the_centre_coset() {
        // Quantizing (0.4, 0.4, 0.4) must select (0.5, 0.5, 0.5) from the
        // offset coset over the origin: 0.3 * sqrt(3) < 0.4 * sqrt(3).
        let bcc = Glued::bcc(1.0).unwrap();
        let (p, d2) = bcc.nearest(SVector::from([0.4, 0.4, 0.4]));
        assert_eq!(p.coset, 1);
        assert_eq!(bcc.to_analogue(p), SVector::from([0.5, 0.5, 0.5]));
        assert!((d2 - 0.03).abs() < 1e-6);
    }

    #[test]
    fn product_is_per_axis_rounding() {
        let product: Glued<Cubic<3>, 3> = Glued::product(1.0).unwrap();
        let (p, d2) = product.nearest(SVector::from([0.2, 0.2, 0.2]));
        assert_eq!(product.to_analogue(p), SVector::from([0.0, 0.0, 0.0]));
        assert!((d2 - 0.12).abs() < 1e-6);
    }

    #[test]
    fn ties_go_to_the_lowest_coset() {
        // (0.25, 0.25, 0.25) is equidistant from the origin and the cell
        // centre; the origin is in coset 0.
        let bcc = Glued::bcc(1.0).unwrap();
        let (p, _) = bcc.nearest(SVector::from([0.25, 0.25, 0.25]));
        assert_eq!(p.coset, 0);
        assert_eq!(bcc.to_analogue(p), SVector::from([0.0, 0.0, 0.0]));
    }

    #[test]
    fn closure_under_add_and_sub() {
        let bcc = Glued::bcc(1.0).unwrap();
        let (p, _) = bcc.nearest(SVector::from([1.4, -0.6, 0.4]));
        let (q, _) = bcc.nearest(SVector::from([-0.4, 2.3, 1.6]));
        let sum = bcc.add(p, q);
        let diff = bcc.sub(p, q);
        // The results decode to the exact vector sums, i.e. they are lattice
        // points themselves.
        assert_eq!(bcc.to_analogue(sum), bcc.to_analogue(p) + bcc.to_analogue(q));
        assert_eq!(bcc.to_analogue(diff), bcc.to_analogue(p) - bcc.to_analogue(q));
        // And subtracting a point from itself gives the origin.
        assert_eq!(bcc.sub(p, p), bcc.zero());
        assert_eq!(bcc.to_analogue(bcc.zero()), SVector::<f32, 3>::zeros());
    }

    #[test]
    fn non_group_offsets_rejected() {
        // {0, (1/3, 0, 0)} is not closed: 2/3 is in neither coset.
        let sub = Cubic::new(1.0).unwrap();
        let offsets = vec![SVector::zeros(), SVector::from([1.0 / 3.0, 0.0, 0.0])];
        assert!(matches!(Glued::new(sub, offsets), Err(Error::Configuration(_))));
    }

    #[test]
    fn coinciding_offsets_rejected() {
        let sub = Cubic::new(1.0).unwrap();
        let offsets = vec![SVector::zeros(), SVector::from([1.0, 0.0, 0.0])];
        assert!(matches!(Glued::new(sub, offsets), Err(Error::Configuration(_))));
    }

    #[test]
    fn no_cosets_rejected() {
        let sub: Cubic<3> = Cubic::new(1.0).unwrap();
        assert!(matches!(Glued::new(sub, vec![]), Err(Error::Configuration(_))));
    }

    /// Squared covering radius of the body-centred cubic lattice at unit
    /// spacing: (sqrt(5)/4)^2.
    const BCC_COVER2: f32 = 5.0 / 16.0;

    #[test]
    fn covering_radius_bound() {
        let bcc = Glued::bcc(1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..10_000 {
            let v = SVector::from([
                rng.gen_range(-4.0_f32..4.0),
                rng.gen_range(-4.0_f32..4.0),
                rng.gen_range(-4.0_f32..4.0),
            ]);
            let (_, d2) = bcc.nearest(v);
            assert!(d2 <= BCC_COVER2 + 1e-5, "{:?} has error {}", v, d2);
        }
    }

    #[test]
    fn covering_radius_bound_product() {
        // For Z^3 the covering radius is sqrt(3)/2.
        let product: Glued<Cubic<3>, 3> = Glued::product(1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(0xcafe);
        for _ in 0..10_000 {
            let v = SVector::from([
                rng.gen_range(-4.0_f32..4.0),
                rng.gen_range(-4.0_f32..4.0),
                rng.gen_range(-4.0_f32..4.0),
            ]);
            let (_, d2) = product.nearest(v);
            assert!(d2 <= 0.75 + 1e-5);
        }
    }

    #[test]
    fn nearest_is_optimal() {
        // Brute force: no point with nearby coordinates is strictly closer
        // than the one the search returns.
        let bcc = Glued::bcc(1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let v = SVector::from([
                rng.gen_range(-2.0_f32..2.0),
                rng.gen_range(-2.0_f32..2.0),
                rng.gen_range(-2.0_f32..2.0),
            ]);
            let (best, d_best) = bcc.nearest(v);
            for coset in 0..2u8 {
                for i in -3..=3 {
                    for j in -3..=3 {
                        for k in -3..=3 {
                            let p = Point::new(coset, [i, j, k]);
                            let d = (v - bcc.to_analogue(p)).norm_squared();
                            assert!(d_best <= d + 1e-6,
                                "{:?}: {:?} beats {:?}", v, p, best);
                        }
                    }
                }
            }
        }
    }
}
