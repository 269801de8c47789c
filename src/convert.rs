use std::{fs, path::Path};

use image::{DynamicImage, ImageError, ImageReader, RgbImage};
use log::{debug, info};

use crate::error::ConvertError;
use crate::palette::Rgb;

/// Micro16 screen size. Source images must match it exactly.
pub const SCREEN_WIDTH: u32 = 320;
pub const SCREEN_HEIGHT: u32 = 200;

/// Four 4-bit pixels make up one 16-bit `.data` word.
pub const PIXELS_PER_LINE: usize = 4;
pub const DATA_MARKER: &str = ".data 0x";

/// Decode the image, sniffing its format from the file contents rather
/// than the extension.
pub fn load_image(path: &Path) -> Result<DynamicImage, ConvertError> {
    let decode = || -> Result<DynamicImage, ImageError> {
        let reader = ImageReader::open(path)?.with_guessed_format()?;
        reader.decode()
    };
    let image = decode().map_err(|source| ConvertError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Decoded {} as {:?}", path.display(), image.color());
    Ok(image)
}

pub fn check_dimensions(width: u32, height: u32) -> Result<(), ConvertError> {
    if width != SCREEN_WIDTH || height != SCREEN_HEIGHT {
        return Err(ConvertError::InvalidSize { width, height });
    }
    Ok(())
}

pub fn load_template(path: &Path) -> Result<String, ConvertError> {
    let template = fs::read_to_string(path).map_err(|source| ConvertError::ReadTemplate {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Read {} bytes of template from {}", template.len(), path.display());
    Ok(template)
}

/// Row-major stream of the image's pixels, read straight out of the RGB8 buffer.
pub fn pixels(image: &RgbImage) -> impl Iterator<Item = Rgb> + '_ {
    image
        .as_raw()
        .chunks_exact(3)
        .map(|bytes| dataview::DataView::from(bytes).read::<Rgb>(0))
}

/// Append one `.data 0x....` line per four symbols to the template text.
///
/// Grouping counts over the flattened stream and never looks at row ends.
/// Every line, the first included, starts with a newline; nothing trails
/// the last one.
pub fn assemble_document<I>(template: &str, symbols: I) -> String
where
    I: IntoIterator<Item = char>,
{
    let symbols = symbols.into_iter();
    let (expected, _) = symbols.size_hint();
    let line_len = 1 + DATA_MARKER.len() + PIXELS_PER_LINE;
    let mut document =
        String::with_capacity(template.len() + expected.div_ceil(PIXELS_PER_LINE) * line_len);
    document.push_str(template);

    let mut lines = 0usize;
    for (i, symbol) in symbols.enumerate() {
        if i % PIXELS_PER_LINE == 0 {
            document.push('\n');
            document.push_str(DATA_MARKER);
            lines += 1;
        }
        document.push(symbol);
    }
    debug!("Assembled {} data lines", lines);
    document
}

pub fn write_document(path: &Path, document: &str) -> Result<(), ConvertError> {
    fs::write(path, document).map_err(|source| ConvertError::WriteOutput {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Wrote {} ({} bytes)", path.display(), document.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::symbol_for;
    use image::Rgb as Pixel;

    fn data_lines(document: &str, template: &str) -> Vec<String> {
        document[template.len()..]
            .split('\n')
            .skip(1)
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn accepts_exact_screen_size() {
        assert!(check_dimensions(320, 200).is_ok());
    }

    #[test]
    fn rejects_other_sizes() {
        for (w, h) in [(319, 200), (320, 199), (1, 1), (200, 320), (640, 400)] {
            match check_dimensions(w, h) {
                Err(ConvertError::InvalidSize { width, height }) => {
                    assert_eq!((width, height), (w, h));
                }
                other => panic!("expected size error for {w}x{h}, got {other:?}"),
            }
        }
    }

    #[test]
    fn size_error_names_required_size() {
        let err = check_dimensions(1, 1).unwrap_err();
        assert_eq!(err.to_string(), "Image size must be exactly 320x200 pixels (got 1x1)");
    }

    #[test]
    fn first_line_starts_with_newline_after_template() {
        let document = assemble_document("; header", "0123".chars());
        assert_eq!(document, "; header\n.data 0x0123");
    }

    #[test]
    fn groups_by_four_regardless_of_rows() {
        let document = assemble_document("", "0123456789ABCDEF".chars());
        assert_eq!(
            document,
            "\n.data 0x0123\n.data 0x4567\n.data 0x89AB\n.data 0xCDEF"
        );
    }

    #[test]
    fn template_is_copied_verbatim() {
        let template = "; header\n\tjmp start\r\n";
        let document = assemble_document(template, "FFFF".chars());
        assert!(document.starts_with(template));
        assert_eq!(&document[template.len()..], "\n.data 0xFFFF");
    }

    #[test]
    fn pixels_are_row_major() {
        let mut image = RgbImage::new(2, 2);
        image.put_pixel(0, 0, Pixel([1, 2, 3]));
        image.put_pixel(1, 0, Pixel([4, 5, 6]));
        image.put_pixel(0, 1, Pixel([7, 8, 9]));
        image.put_pixel(1, 1, Pixel([10, 11, 12]));

        let stream: Vec<Rgb> = pixels(&image).collect();
        assert_eq!(
            stream,
            vec![
                Rgb::new(1, 2, 3),
                Rgb::new(4, 5, 6),
                Rgb::new(7, 8, 9),
                Rgb::new(10, 11, 12),
            ]
        );
    }

    #[test]
    fn black_screen_yields_all_zero_lines() {
        let image = RgbImage::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        let template = "; header\n";
        let document = assemble_document(template, pixels(&image).map(symbol_for));

        assert!(document.starts_with(template));
        let lines = data_lines(&document, template);
        assert_eq!(lines.len(), 16_000);
        assert!(lines.iter().all(|line| line == ".data 0x0000"));
    }

    #[test]
    fn every_line_carries_four_palette_symbols() {
        let image = RgbImage::from_fn(SCREEN_WIDTH, SCREEN_HEIGHT, |x, y| {
            Pixel([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        let document = assemble_document("", pixels(&image).map(symbol_for));
        let lines = data_lines(&document, "");

        assert_eq!(lines.len(), (SCREEN_WIDTH * SCREEN_HEIGHT) as usize / PIXELS_PER_LINE);
        for line in &lines {
            let digits = line.strip_prefix(DATA_MARKER).expect("missing marker");
            assert_eq!(digits.len(), PIXELS_PER_LINE);
            assert!(digits.chars().all(|c| matches!(c, '0'..='9' | 'A'..='F')));
        }
    }

    #[test]
    fn assembly_is_deterministic() {
        let image = RgbImage::from_fn(SCREEN_WIDTH, SCREEN_HEIGHT, |x, y| {
            Pixel([(x * 7 % 256) as u8, (y * 13 % 256) as u8, 0x80])
        });
        let first = assemble_document("; t\n", pixels(&image).map(symbol_for));
        let second = assemble_document("; t\n", pixels(&image).map(symbol_for));
        assert_eq!(first, second);
    }
}
