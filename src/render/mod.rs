/*!
 * Placeholder visual cards.
 *
 * When no image-generation backend exists, each prompt becomes a vertical
 * card: the prompt text wrapped over a dark background inside an accent
 * border.
 */

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use log::info;

use crate::errors::AppError;
use crate::file_utils::FileManager;

pub mod font;

pub use font::CaptionFont;

/// Card width in pixels
pub const CARD_WIDTH: u32 = 1080;
/// Card height in pixels
pub const CARD_HEIGHT: u32 = 1920;

/// Prompt characters kept on the card
pub const MAX_PROMPT_CHARS: usize = 220;
/// Characters per wrapped line
pub const WRAP_WIDTH: usize = 32;
/// Lines drawn at most
pub const MAX_LINES: usize = 18;

const TEXT_LEFT: i32 = 80;
const TEXT_TOP: i32 = 200;
const LINE_PITCH: i32 = 72;

// Border corners, inclusive
const BORDER_LEFT_TOP: (i32, i32) = (50, 50);
const BORDER_RIGHT_BOTTOM: (i32, i32) = (1030, 1870);
const BORDER_WIDTH: i32 = 5;

const BACKGROUND: Rgb<u8> = Rgb([20, 24, 28]);
const TEXT_COLOR: Rgb<u8> = Rgb([245, 245, 245]);
const ACCENT: Rgb<u8> = Rgb([255, 208, 0]);

/// Greedy word wrap: words join a line while it stays within `width` characters
///
/// A word longer than `width` gets a line to itself. When that word opens the
/// text, the line before it is left blank, so the caption starts one row lower.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let candidate_len = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };

        if candidate_len > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Lines drawn on the card for `prompt`
pub fn caption_lines(prompt: &str) -> Vec<String> {
    let text: String = prompt.chars().take(MAX_PROMPT_CHARS).collect();
    let mut lines = wrap_words(&text, WRAP_WIDTH);
    lines.truncate(MAX_LINES);
    lines
}

/// Renders placeholder cards into the output directory
#[derive(Debug)]
pub struct ImageComposer {
    font: CaptionFont,
    output_dir: PathBuf,
}

impl ImageComposer {
    /// Composer drawing with the font at `font_path`, writing into `output_dir`
    pub fn new(font_path: &Path, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            font: CaptionFont::load(font_path),
            output_dir: output_dir.into(),
        }
    }

    /// Composer with an already loaded font
    pub fn with_font(font: CaptionFont, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            font,
            output_dir: output_dir.into(),
        }
    }

    pub fn font(&self) -> &CaptionFont {
        &self.font
    }

    /// Draw the card for `prompt` without saving it
    pub fn render(&self, prompt: &str) -> RgbImage {
        let mut canvas = RgbImage::from_pixel(CARD_WIDTH, CARD_HEIGHT, BACKGROUND);

        for (i, line) in caption_lines(prompt).iter().enumerate() {
            let y = TEXT_TOP + i as i32 * LINE_PITCH;
            self.font.draw_line(&mut canvas, TEXT_LEFT, y, line, TEXT_COLOR);
        }

        let (left, top) = BORDER_LEFT_TOP;
        let (right, bottom) = BORDER_RIGHT_BOTTOM;
        for inset in 0..BORDER_WIDTH {
            let width = (right - left + 1 - 2 * inset) as u32;
            let height = (bottom - top + 1 - 2 * inset) as u32;
            let rect = Rect::at(left + inset, top + inset).of_size(width, height);
            draw_hollow_rect_mut(&mut canvas, rect, ACCENT);
        }

        canvas
    }

    /// Render `prompt` and save it as a uniquely named PNG
    pub fn compose(&self, prompt: &str) -> Result<PathBuf, AppError> {
        FileManager::ensure_dir(&self.output_dir)?;
        let path = FileManager::unique_path(&self.output_dir, "png");

        self.render(prompt).save(&path)?;
        info!("Placeholder image written to {}", path.display());
        Ok(path)
    }
}
