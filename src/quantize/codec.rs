use nalgebra::{SVector};

use crate::{Error, Result};
use super::lattice::{Point, Sublattice};
use super::glued::{Glued};

/// The symbol set a [`Codec`] emits, in the form the entropy coder needs:
/// the coset count, the coordinate radius, and the total number of
/// distinct symbols.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Alphabet {
    pub cosets: usize,
    pub radius: i32,
    pub symbols: u32,
}

// ----------------------------------------------------------------------------

/// Converts between lattice [`Point`]s and bounded integer symbols.
///
/// Every coordinate of an encodable point lies in `[-radius, radius]`; the
/// encoding is a mixed-radix numeral with the coset index as the least
/// significant digit, so it is injective and exactly invertible. A
/// coordinate outside the radius is a [`Error::Range`], never clamped:
/// clamping would silently break the round-trip guarantee the rest of the
/// system relies on.
#[derive(Debug, Clone)]
pub struct Codec<S, const N: usize> {
    lattice: Glued<S, N>,
    radius: i32,
    width: u64,
    symbols: u32,
}

impl<S: Sublattice<N>, const N: usize> Codec<S, N> {
    pub fn new(lattice: Glued<S, N>, radius: i32) -> Result<Self> {
        if radius < 0 {
            return Err(Error::Configuration(format!("negative codec radius {}", radius)));
        }
        let width = 2 * u64::from(radius.unsigned_abs()) + 1;
        let mut symbols = lattice.cosets() as u64;
        for _ in 0..N {
            symbols = symbols.checked_mul(width)
                .filter(|s| *s <= u64::from(u32::MAX))
                .ok_or_else(|| Error::Configuration(format!(
                    "alphabet of {} cosets with radius {} does not fit in 32 bits",
                    lattice.cosets(), radius
                )))?;
        }
        Ok(Self {lattice, radius, width, symbols: symbols as u32})
    }

    /// The lattice this codec encodes points of.
    pub fn lattice(&self) -> &Glued<S, N> { &self.lattice }

    pub fn alphabet(&self) -> Alphabet {
        Alphabet {
            cosets: self.lattice.cosets(),
            radius: self.radius,
            symbols: self.symbols,
        }
    }

    /// Encodes `p` as a symbol.
    pub fn encode(&self, p: Point<N>) -> Result<u32> {
        if !self.lattice.contains(p) {
            return Err(Error::Invariant(format!(
                "coset {} of a point is not a coset of a {}-coset lattice",
                p.coset, self.lattice.cosets()
            )));
        }
        let mut index: u64 = 0;
        for axis in (0..N).rev() {
            let c = p.coords[axis];
            if c < -self.radius || c > self.radius {
                return Err(Error::Range {
                    axis,
                    coord: i64::from(c),
                    radius: i64::from(self.radius),
                });
            }
            index = index * self.width + (c + self.radius) as u64;
        }
        Ok((index * self.lattice.cosets() as u64 + u64::from(p.coset)) as u32)
    }

    /// Inverts [`encode()`].
    ///
    /// [`encode()`]: Codec::encode
    pub fn decode(&self, symbol: u32) -> Result<Point<N>> {
        if symbol >= self.symbols {
            return Err(Error::Symbol {symbol, alphabet: self.symbols});
        }
        let mut rest = u64::from(symbol);
        let coset = (rest % self.lattice.cosets() as u64) as u8;
        rest /= self.lattice.cosets() as u64;
        let mut coords = SVector::<i32, N>::zeros();
        for axis in 0..N {
            coords[axis] = (rest % self.width) as i32 - self.radius;
            rest /= self.width;
        }
        Ok(Point {coset, coords})
    }

    /// The symbol of the lattice sum of the points of `a` and `b`.
    ///
    /// Lattice closure makes this exact; the only failure is the sum
    /// leaving the representable coordinate range.
    pub fn add(&self, a: u32, b: u32) -> Result<u32> {
        self.encode(self.lattice.add(self.decode(a)?, self.decode(b)?))
    }

    /// The symbol of the lattice difference of the points of `a` and `b`.
    pub fn sub(&self, a: u32, b: u32) -> Result<u32> {
        self.encode(self.lattice.sub(self.decode(a)?, self.decode(b)?))
    }
}

// ----------------------------------------------------------------------------
