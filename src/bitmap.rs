use std::path::Path;

use bmp::{Image, Pixel};
use log::info;

use crate::error::ConvertError;
use crate::palette::{PALETTE, Rgb, closest_color};

/// The console window draws each screen pixel as a square of this many pixels.
pub const CONSOLE_SCALE: u32 = 2;
/// Largest accepted preview scale (5120x3200 for a full screen).
pub const MAX_SCALE: u32 = 16;

const BOX_SIZE_PX: u32 = 16;
const BOX_BORDER_PX: u32 = 1;

fn to_pixel(color: Rgb) -> Pixel {
    px!(color.r, color.g, color.b)
}

/// Render the image as the console would show it: every pixel swapped for
/// its palette color and blown up to a `scale` x `scale` block.
pub fn preview_bitmap<I>(pixels: I, width: u32, height: u32, scale: u32) -> Image
where
    I: IntoIterator<Item = Rgb>,
{
    let mut img = Image::new(width * scale, height * scale);
    let coordinates = (0..height).flat_map(|y| (0..width).map(move |x| (x, y)));

    for ((x, y), color) in coordinates.zip(pixels) {
        let pixel = to_pixel(closest_color(color).color);
        draw_box(&mut img, x * scale, y * scale, scale, pixel);
    }
    img
}

/// One row of swatches in nibble order, separated by a black border.
pub fn palette_chart() -> Image {
    let box_cols = PALETTE.len() as u32;
    let width = box_cols * (BOX_SIZE_PX + BOX_BORDER_PX) + BOX_BORDER_PX;
    let height = BOX_SIZE_PX + 2 * BOX_BORDER_PX;

    let mut img = Image::new(width, height);
    for (x, y) in img.coordinates() {
        img.set_pixel(x, y, px!(0, 0, 0));
    }

    for (j, entry) in PALETTE.iter().enumerate() {
        let j = j as u32;
        let xmin = BOX_BORDER_PX * (j + 1) + BOX_SIZE_PX * j;
        draw_box(&mut img, xmin, BOX_BORDER_PX, BOX_SIZE_PX, to_pixel(entry.color));
    }
    img
}

fn draw_box(img: &mut Image, xmin: u32, ymin: u32, side_length: u32, color: Pixel) {
    for y in ymin..ymin + side_length {
        for x in xmin..xmin + side_length {
            img.set_pixel(x, y, color);
        }
    }
}

pub fn save_bitmap(img: &Image, path: &Path) -> Result<(), ConvertError> {
    img.save(path).map_err(|source| ConvertError::WriteBitmap {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Wrote {} ({}x{})", path.display(), img.get_width(), img.get_height());
    Ok(())
}
