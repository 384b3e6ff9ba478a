use clap::{Parser};
use multidimension::{View, Array};
use fvq_core::io::{cli, load_image, save_image, Pixels, PixelArray, L};
use fvq_core::quantize::{quantize, reconstruct, Codec, Glued};
use fvq_core::{DiagonalScaler, Error, Grid, Pyramid, Stop};

#[derive(Debug, Parser)]
#[command(about = "Round an image to the nearest representable image.")]
#[command(author, version, long_about = None)]
struct Args {
    #[command(flatten)]
    io: cli::InOutOrder,

    #[command(flatten)]
    quantizer: cli::QuantizerArgs,
}

fn main() -> fvq_core::Result {
    let args = Args::parse();
    let order = args.io.order(5);
    let in_pixels = load_image(&args.io.in_path)?;
    let in_pixels: Array<Grid, f32> = match in_pixels {
        Pixels::L(pa) => pa.crop_to_multiple(1 << order).column(L).collect(),
        _ => Err(Error::Configuration("image must only have a luma channel".into()))?,
    };
    let smooth = args.io.smooth();
    let pyramid = Pyramid::build(in_pixels, Stop::Exact(order), smooth)?;
    let scaler = DiagonalScaler::uniform(args.quantizer.step)?;
    let codec = Codec::new(Glued::bcc(1.0)?, args.quantizer.radius)?;
    let digital = quantize(&pyramid, &scaler, &codec)?;
    let pyramid = reconstruct(digital, &scaler, &codec)?;
    let out_pixels = pyramid.to_pixels(smooth);
    let out_pixels = Pixels::L(PixelArray(Array::new((out_pixels.size(), ()), out_pixels.to_raw())));
    save_image(&out_pixels, &args.io.out_path("quantize")?)
}
