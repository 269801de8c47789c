use log::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[derive(dataview::Pod)]
#[repr(C)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Squared euclidean distance in RGB space.
    /// Orders candidates exactly like the real distance, without the sqrt.
    pub fn distance_squared(&self, other: &Rgb) -> u32 {
        let dr = i32::from(self.r) - i32::from(other.r);
        let dg = i32::from(self.g) - i32::from(other.g);
        let db = i32::from(self.b) - i32::from(other.b);
        (dr * dr + dg * dg + db * db) as u32
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct PaletteEntry {
    pub color: Rgb,
    pub symbol: char,
}

const fn entry(hex: u32, symbol: char) -> PaletteEntry {
    PaletteEntry {
        color: Rgb::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8),
        symbol,
    }
}

/// The Micro16 screen palette, in nibble order.
///
/// Order matters: the nearest-color search keeps the first entry on ties.
pub static PALETTE: [PaletteEntry; 16] = [
    entry(0x191919, '0'),
    entry(0xcbcbcb, '1'),
    entry(0xac3232, '2'),
    entry(0xac716b, '3'),
    entry(0x4fac43, '4'),
    entry(0x92b687, '5'),
    entry(0x5b69ac, '6'),
    entry(0xacadc8, '7'),
    entry(0xccdb25, '8'),
    entry(0xccdb88, '9'),
    entry(0xd2842a, 'A'),
    entry(0xd2ac7a, 'B'),
    entry(0x824aad, 'C'),
    entry(0xb795c2, 'D'),
    entry(0x1f7d6e, 'E'),
    entry(0x87ccc8, 'F'),
];

/// Find the palette entry nearest to `color`.
///
/// Only a strictly smaller distance replaces the current best, so the
/// earliest of several equidistant entries wins.
pub fn closest_color(color: Rgb) -> &'static PaletteEntry {
    let mut selected = &PALETTE[0];
    let mut min_distance = u32::MAX;
    for candidate in PALETTE.iter() {
        let distance = candidate.color.distance_squared(&color);
        if distance < min_distance {
            min_distance = distance;
            selected = candidate;
        }
    }
    trace!("{:?} -> '{}' (d2={})", color, selected.symbol, min_distance);
    selected
}

pub fn symbol_for(color: Rgb) -> char {
    closest_color(color).symbol
}
