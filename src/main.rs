#[macro_use]
extern crate bmp;

mod bitmap;
mod convert;
mod error;
mod palette;

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use log::info;

use crate::error::ConvertError;
use crate::palette::symbol_for;

const DEBUG_PALETTE_FILENAME: &str = "M16DATA_DEBUG_PAL.BMP";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the 320x200 image to convert. Any format the image crate
    /// can decode is accepted.
    image_path: PathBuf,

    /// Text copied verbatim to the top of the listing.
    #[arg(short, long, default_value = "./pixel_art.m16asm.template")]
    template: PathBuf,

    /// Where to write the listing. Overwritten if it already exists.
    #[arg(short, long, default_value = "out.m16asm")]
    output: PathBuf,

    /// Also write a .BMP of the image quantized to the console palette.
    #[arg(short, long)]
    preview: Option<PathBuf>,

    /// Pixel size of the preview (1 to 16), matching the console window by default.
    #[arg(short, long, default_value_t = bitmap::CONSOLE_SCALE,
          value_parser = clap::value_parser!(u32).range(1..=bitmap::MAX_SCALE as i64))]
    scale: u32,

    /// Turns on debug mode, which will also write a swatch chart of the
    /// palette (M16DATA_DEBUG_PAL.BMP) to the current directory.
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), ConvertError> {
    let image = convert::load_image(&args.image_path)?;
    let (width, height) = (image.width(), image.height());
    println!("{} {} {}", width, height, u64::from(width) * u64::from(height));

    convert::check_dimensions(width, height)?;

    let template = convert::load_template(&args.template)?;
    let rgb = image.to_rgb8();

    let document = convert::assemble_document(&template, convert::pixels(&rgb).map(symbol_for));
    convert::write_document(&args.output, &document)?;

    if let Some(preview_path) = &args.preview {
        let preview = bitmap::preview_bitmap(convert::pixels(&rgb), width, height, args.scale);
        bitmap::save_bitmap(&preview, preview_path)?;
    }

    if args.debug {
        bitmap::save_bitmap(&bitmap::palette_chart(), Path::new(DEBUG_PALETTE_FILENAME))?;
    }

    info!("Converted {} to {}", args.image_path.display(), args.output.display());
    Ok(())
}
