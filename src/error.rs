use std::{io, path::PathBuf};

use thiserror::Error;

use crate::convert::{SCREEN_HEIGHT, SCREEN_WIDTH};

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error(
        "Image size must be exactly {}x{} pixels (got {width}x{height})",
        SCREEN_WIDTH,
        SCREEN_HEIGHT
    )]
    InvalidSize { width: u32, height: u32 },
    #[error("Could not open image {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Could not read template {}: {source}", .path.display())]
    ReadTemplate { path: PathBuf, source: io::Error },
    #[error("Could not write output {}: {source}", .path.display())]
    WriteOutput { path: PathBuf, source: io::Error },
    #[error("Could not write bitmap {}: {source}", .path.display())]
    WriteBitmap { path: PathBuf, source: io::Error },
}
