// ABOUTME: Picture loading and sizing for slides
// ABOUTME: Validates image files, normalises their format and fits them into a bounding box

use crate::errors::{Result, SlideError};
use crate::units::Emu;
use image::io::Reader as ImageReader;
use image::{GenericImageView, ImageFormat};
use log::{debug, info};
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Picture formats a PPTX package can carry as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
}

impl MediaFormat {
    pub fn extension(self) -> &'static str {
        match self {
            MediaFormat::Png => "png",
            MediaFormat::Jpeg => "jpeg",
            MediaFormat::Gif => "gif",
            MediaFormat::Bmp => "bmp",
            MediaFormat::Tiff => "tiff",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            MediaFormat::Png => "image/png",
            MediaFormat::Jpeg => "image/jpeg",
            MediaFormat::Gif => "image/gif",
            MediaFormat::Bmp => "image/bmp",
            MediaFormat::Tiff => "image/tiff",
        }
    }

    pub const ALL: [MediaFormat; 5] = [
        MediaFormat::Png,
        MediaFormat::Jpeg,
        MediaFormat::Gif,
        MediaFormat::Bmp,
        MediaFormat::Tiff,
    ];

    fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Png => Some(MediaFormat::Png),
            ImageFormat::Jpeg => Some(MediaFormat::Jpeg),
            ImageFormat::Gif => Some(MediaFormat::Gif),
            ImageFormat::Bmp => Some(MediaFormat::Bmp),
            ImageFormat::Tiff => Some(MediaFormat::Tiff),
            _ => None,
        }
    }
}

/// Encoded picture bytes ready to embed, plus their pixel size.
#[derive(Debug, Clone)]
pub struct Media {
    pub data: Vec<u8>,
    pub format: MediaFormat,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

/// Read and decode a picture. Formats PPTX cannot hold natively are re-encoded as PNG.
pub fn load_media(path: &Path) -> Result<Media> {
    info!("Loading picture {:?}", path);
    // Content sniffing first; the extension decides for formats without a signature (TGA).
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let detected = reader.format();
    let decoded = reader.decode()?;
    let (pixel_width, pixel_height) = decoded.dimensions();

    if pixel_width == 0 || pixel_height == 0 {
        return Err(SlideError::ValidationError(format!(
            "Image has no pixels: {:?}",
            path
        )));
    }

    match detected.and_then(MediaFormat::from_image_format) {
        Some(format) => Ok(Media {
            data: fs::read(path)?,
            format,
            pixel_width,
            pixel_height,
        }),
        None => {
            debug!("Re-encoding {:?} ({:?}) as PNG", path, detected);
            let mut png = Cursor::new(Vec::new());
            decoded.write_to(&mut png, ImageFormat::Png)?;
            Ok(Media {
                data: png.into_inner(),
                format: MediaFormat::Png,
                pixel_width,
                pixel_height,
            })
        }
    }
}

/// Size a picture to `max_height`, then shrink it uniformly if it is wider than `max_width`.
pub fn fit_image(pixel_width: u32, pixel_height: u32, max_width: Emu, max_height: Emu) -> (Emu, Emu) {
    let px_w = i128::from(pixel_width.max(1));
    let px_h = i128::from(pixel_height.max(1));
    let max_w = i128::from(max_width);
    let max_h = i128::from(max_height);

    let mut height = max_h;
    let mut width = (max_h * px_w + px_h / 2) / px_h;

    if width > max_w {
        height = height * max_w / width;
        width = max_w;
    }

    (width as Emu, height as Emu)
}
