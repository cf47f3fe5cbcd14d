use std::fmt;
use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use log::{debug, warn};

// @module: Caption fonts

/// Pixel height of TrueType captions
pub const CAPTION_FONT_PX: f32 = 42.0;

/// Magnification of the built-in 8x8 glyphs
pub const BUILTIN_SCALE: u32 = 3;

const BUILTIN_GLYPH_SIZE: u32 = 8;

/// Font used to draw captions
pub enum CaptionFont {
    /// Font file loaded from disk
    TrueType(FontVec),
    /// Built-in 8x8 bitmap font, always available
    Builtin,
}

impl fmt::Debug for CaptionFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptionFont::TrueType(_) => write!(f, "CaptionFont::TrueType"),
            CaptionFont::Builtin => write!(f, "CaptionFont::Builtin"),
        }
    }
}

impl CaptionFont {
    /// Load a font file, degrading to the built-in font when it is missing or invalid
    pub fn load(path: &Path) -> Self {
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                warn!("Font {} unavailable ({}), using built-in font", path.display(), e);
                return CaptionFont::Builtin;
            }
        };

        match FontVec::try_from_vec(data) {
            Ok(font) => {
                debug!("Loaded caption font {}", path.display());
                CaptionFont::TrueType(font)
            }
            Err(e) => {
                warn!("Font {} is not a valid font ({}), using built-in font", path.display(), e);
                CaptionFont::Builtin
            }
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, CaptionFont::Builtin)
    }

    /// Draw one line of text with its top-left corner at (`x`, `y`)
    pub fn draw_line(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
        match self {
            CaptionFont::TrueType(font) => {
                draw_text_mut(canvas, color, x, y, PxScale::from(CAPTION_FONT_PX), font, text);
            }
            CaptionFont::Builtin => draw_builtin_line(canvas, x, y, text, color),
        }
    }
}

fn glyph_for(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn draw_builtin_line(canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
    let advance = (BUILTIN_GLYPH_SIZE * BUILTIN_SCALE) as i32;

    for (column, c) in text.chars().enumerate() {
        let origin_x = x + column as i32 * advance;
        let glyph = glyph_for(c);

        for (row, bits) in glyph.iter().enumerate() {
            for bit in 0..BUILTIN_GLYPH_SIZE {
                // Bit 0 is the leftmost pixel
                if bits & (1 << bit) == 0 {
                    continue;
                }
                let px = origin_x + (bit * BUILTIN_SCALE) as i32;
                let py = y + row as i32 * BUILTIN_SCALE as i32;
                fill_block(canvas, px, py, BUILTIN_SCALE, color);
            }
        }
    }
}

fn fill_block(canvas: &mut RgbImage, x: i32, y: i32, size: u32, color: Rgb<u8>) {
    let (width, height) = canvas.dimensions();
    for dy in 0..size as i32 {
        for dx in 0..size as i32 {
            let (px, py) = (x + dx, y + dy);
            if px >= 0 && py >= 0 && (px as u32) < width && (py as u32) < height {
                canvas.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}
