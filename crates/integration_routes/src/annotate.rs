//! Preview image annotation
//!
//! Overlays the route caption onto the preview image: the font starts at
//! 10% of the image height and shrinks in fixed decrements until the
//! rendered caption fits the image width, then the text is drawn in
//! black, centered, at 85% of the image height. Glyphs come from the
//! fixed 8x8 bitmap font; sizes below the glyph cell are reached by
//! drawing at the nearest integer scale and downsampling the text mask.

use std::io::Cursor;

use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb};

use crate::error::RouteScrapeError;

/// Bitmap glyph cell size in pixels at scale 1
const GLYPH_SIZE: u32 = 8;

/// Font size decrement per fitting iteration
const FONT_DECREMENT: u32 = 5;

/// Mask luminance above which a downsampled pixel counts as ink
const INK_THRESHOLD: u8 = 128;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

fn char_count(caption: &str) -> u32 {
    caption.chars().count().try_into().unwrap_or(u32::MAX)
}

/// Rendered width of the caption at the given font size
///
/// Glyph cells are square, so each character is exactly one font size
/// wide.
fn measure(caption: &str, font_size: u32) -> u32 {
    char_count(caption).saturating_mul(font_size)
}

/// Font size whose rendered caption fits the image width
///
/// Shrinks from 10% of the image height in fixed decrements; if the
/// stepped sizes still overflow, the size is clamped to the exact
/// per-character budget, bottoming out at one pixel per glyph cell.
fn fitted_font_size(caption: &str, width: u32, height: u32) -> u32 {
    let mut font_size = height.div_ceil(10);
    while font_size > FONT_DECREMENT && measure(caption, font_size) > width {
        font_size -= FONT_DECREMENT;
    }
    if measure(caption, font_size) > width {
        font_size = (width / char_count(caption).max(1)).max(1);
    }
    font_size
}

/// Render the caption as a grayscale ink mask, one font size tall
///
/// Glyphs are drawn at the smallest integer scale at least as tall as
/// the font size, then the mask is resized down to the exact target.
fn render_caption(caption: &str, font_size: u32) -> GrayImage {
    let scale = font_size.div_ceil(GLYPH_SIZE).max(1);
    let cell = GLYPH_SIZE * scale;
    let mut mask = GrayImage::new(cell.saturating_mul(char_count(caption)), cell);

    let mut cursor = 0u32;
    for ch in caption.chars() {
        if let Some(glyph) = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')) {
            for (row, bits) in (0u32..).zip(glyph.iter()) {
                for col in 0..GLYPH_SIZE {
                    if (bits >> col) & 1 == 0 {
                        continue;
                    }
                    for sy in 0..scale {
                        for sx in 0..scale {
                            mask.put_pixel(
                                cursor + col * scale + sx,
                                row * scale + sy,
                                Luma([255]),
                            );
                        }
                    }
                }
            }
        }
        cursor += cell;
    }

    if cell == font_size {
        mask
    } else {
        imageops::resize(&mask, measure(caption, font_size), font_size, FilterType::Triangle)
    }
}

/// Draw the caption onto the image and re-encode as JPEG
pub fn annotate(image_data: &[u8], caption: &str) -> Result<Vec<u8>, RouteScrapeError> {
    let mut img = image::load_from_memory(image_data)?.to_rgb8();
    let (width, height) = img.dimensions();

    if !caption.is_empty() {
        let font_size = fitted_font_size(caption, width, height);
        let mask = render_caption(caption, font_size);

        let x0 = width.saturating_sub(mask.width()) / 2;
        let y0 = height.saturating_mul(85) / 100;
        for (dx, dy, pixel) in mask.enumerate_pixels() {
            if pixel.0[0] >= INK_THRESHOLD {
                let (tx, ty) = (x0 + dx, y0 + dy);
                if tx < width && ty < height {
                    img.put_pixel(tx, ty, BLACK);
                }
            }
        }
    }

    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img).write_to(&mut out, ImageFormat::Jpeg)?;
    Ok(out.into_inner())
}
