use std::path::{Path};
use clap::{Args, Parser};

use crate::{Error, Result};

/// Strip the directory and file extension from a file path.
fn file_stem(path: &str) -> Result<&str> {
    let s = Path::new(path).file_stem()
        .ok_or_else(|| Error::Configuration("empty filename".into()))?;
    let s = s.to_str()
        .ok_or_else(|| Error::Configuration("invalid unicode in filename".into()))?;
    Ok(s)
}

/// Constructs a default output path from `in_path` and `program_name`.
///
/// - in_path - the input path.
/// - program_name - the name of the program.
pub fn default_out_path(in_path: &str, program_name: &str) -> Result<String> {
    let mut out_path = std::env::temp_dir();
    out_path.push(format!("{}-{}.png", file_stem(in_path)?, program_name));
    out_path.to_str()
        .map(str::to_owned)
        .ok_or_else(|| Error::Configuration("invalid unicode in temp dir".into()))
}

// ----------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(about = "Process an image file.")]
#[command(author, version, long_about = None)]
pub struct InOutOrder {
    /// Input path.
    pub in_path: String,

    /// Output path.
    #[arg(short, long)]
    pub out_path: Option<String>,

    /// The number of wavelet generations.
    #[arg(short = 'n', long)]
    pub order: Option<usize>,

    /// Skip the decorrelating smoothing pass.
    #[arg(long)]
    pub rough: bool,
}

impl InOutOrder {
    /// Returns `out_path` or `default_out_path(program_name)`.
    pub fn out_path(&self, program_name: &str) -> Result<String> {
        self.out_path.clone().map_or_else(|| default_out_path(&self.in_path, program_name), Ok)
    }

    /// Returns the `order` or the specified default value.
    pub fn order(&self, default_order: usize) -> usize {
        self.order.unwrap_or(default_order)
    }

    /// Returns `true` if the smoothing pass should be applied.
    pub fn smooth(&self) -> bool { !self.rough }
}

// ----------------------------------------------------------------------------

/// Options for the lattice quantizer, shared by binaries that quantize.
#[derive(Debug, Args)]
pub struct QuantizerArgs {
    /// The quantization step: the smallest difference between
    /// representable coefficients.
    #[arg(short, long, default_value_t = 1.0 / 64.0)]
    pub step: f32,

    /// The largest lattice coordinate the codec can represent.
    #[arg(short, long, default_value_t = 512)]
    pub radius: i32,
}
