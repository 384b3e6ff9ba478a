use thiserror::Error;

/// The ways the numeric core can fail.
///
/// The core is deterministic and stateless, so none of these are retried
/// internally; retrying with the same input yields the same error.
#[derive(Debug, Error)]
pub enum Error {
    /// The caller supplied an impossible configuration, e.g. a zero-sized
    /// image or coset offsets that do not close under addition.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A coordinate fell outside the representable range of a codec.
    /// Never silently clamped.
    #[error("coordinate {coord} on axis {axis} is outside ±{radius}")]
    Range { axis: usize, coord: i64, radius: i64 },

    /// A symbol fell outside a codec's alphabet.
    #[error("symbol {symbol} is outside the alphabet of {alphabet} symbols")]
    Symbol { symbol: u32, alphabet: u32 },

    /// Locates a failure within a compression job.
    #[error("generation {generation}, tile ({y}, {x}): {source}")]
    At {
        generation: usize,
        y: usize,
        x: usize,
        #[source]
        source: Box<Error>,
    },

    /// A closest-point search produced a point that is not on the claimed
    /// lattice. This is a bug, never recovered.
    #[error("internal invariant violation: {0}")]
    Invariant(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wraps `self` with the generation and tile coordinates it occurred at.
    pub fn at(self, generation: usize, (y, x): Grid) -> Self {
        Error::At {generation, y, x, source: Box::new(self)}
    }
}

// ----------------------------------------------------------------------------

/// A general `Result` type.
pub type Result<T=()> = std::result::Result<T, Error>;

// ----------------------------------------------------------------------------

/// Tile/pixel coordinates, with `(0, 0)` at the top left. The coordinates are
/// listed in the order `(row, column)`, i.e. y-coordinate first.
pub type Grid = (usize, usize);

/// The `Index` type of a 2x2 grid. The coordinates are listed in the order
/// `(row, column)`, i.e. y-coordinate first.
pub type Small = (bool, bool);

// ----------------------------------------------------------------------------

pub mod io;

mod tile;
pub use tile::{Tile};

pub mod transform;
pub use transform::{Pyramid, Stop, VHC};

pub mod scale;
pub use scale::{Scaler, DiagonalScaler, UnitScaler};

pub mod quantize;
pub use quantize::{Quantized, quantize, reconstruct};
