/*!
 * Tests for placeholder image cards
 */

use image::{GenericImageView, Rgb};
use localgen::render::{caption_lines, wrap_words, CaptionFont, ImageComposer, CARD_HEIGHT, CARD_WIDTH, MAX_LINES, WRAP_WIDTH};
use crate::common;

/// Test that wrapped lines respect the width
#[test]
fn test_wrap_words_withSentence_shouldStayWithinWidth() {
    let text = "Illustration cinématique de jardinage, lumière naturelle, plan détaillé";
    let lines = wrap_words(text, WRAP_WIDTH);

    assert!(lines.len() > 1);
    assert!(lines.iter().all(|l| l.chars().count() <= WRAP_WIDTH));
    assert_eq!(lines.join(" "), text);
}

/// Test the prompt truncation and line cap
#[test]
fn test_caption_lines_withLongPrompt_shouldTruncate() {
    let prompt = "abcd ".repeat(200);
    let lines = caption_lines(&prompt);
    let total: usize = lines.iter().map(|l| l.split_whitespace().count()).sum();

    // 220 characters hold 44 five-character words
    assert_eq!(total, 44);
    assert!(lines.len() <= MAX_LINES);
    assert!(caption_lines("").is_empty());
}

/// Test that an overlong opening word pushes the caption down one row
#[test]
fn test_caption_lines_withLeadingLongWord_shouldStartWithBlankRow() {
    let long = "a".repeat(40);
    let lines = caption_lines(&format!("{} court", long));
    assert_eq!(lines, vec![String::new(), long.clone(), "court".to_string()]);

    let composer = ImageComposer::with_font(CaptionFont::Builtin, "unused");
    let card = composer.render(&format!("{} court", long));
    let text_color = Rgb([245, 245, 245]);
    let row_has_text = |top: u32| {
        (80..1000)
            .flat_map(|x| (top..top + 24).map(move |y| (x, y)))
            .any(|(x, y)| *card.get_pixel(x, y) == text_color)
    };

    assert!(!row_has_text(200));
    assert!(row_has_text(272));
    assert!(row_has_text(344));
}

/// Test that a missing font file degrades to the built-in font
#[test]
fn test_caption_font_load_withMissingFile_shouldUseBuiltin() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    assert!(CaptionFont::load(&temp_dir.path().join("missing.ttf")).is_builtin());

    let bogus = temp_dir.path().join("bogus.ttf");
    std::fs::write(&bogus, b"not a font")?;
    assert!(CaptionFont::load(&bogus).is_builtin());
    Ok(())
}

/// Test canvas size, background, border and caption placement
#[test]
fn test_render_shouldDrawCardLayout() {
    let composer = ImageComposer::with_font(CaptionFont::Builtin, "unused");
    let card = composer.render("Bonjour le monde");

    assert_eq!(card.dimensions(), (CARD_WIDTH, CARD_HEIGHT));

    let background = Rgb([20, 24, 28]);
    let accent = Rgb([255, 208, 0]);
    assert_eq!(*card.get_pixel(10, 10), background);
    assert_eq!(*card.get_pixel(540, 1500), background);

    // Five pixel border, inclusive corners at (50, 50) and (1030, 1870)
    assert_eq!(*card.get_pixel(50, 50), accent);
    assert_eq!(*card.get_pixel(54, 500), accent);
    assert_eq!(*card.get_pixel(55, 500), background);
    assert_eq!(*card.get_pixel(1030, 1870), accent);
    assert_eq!(*card.get_pixel(1026, 900), accent);
    assert_eq!(*card.get_pixel(1031, 900), background);
    assert_eq!(*card.get_pixel(540, 1866), accent);
    assert_eq!(*card.get_pixel(540, 1871), background);

    // Caption pixels land in the first text row
    let text_color = Rgb([245, 245, 245]);
    let has_text = (80..600)
        .flat_map(|x| (200..224).map(move |y| (x, y)))
        .any(|(x, y)| *card.get_pixel(x, y) == text_color);
    assert!(has_text);
}

/// Test that an empty prompt still produces a card
#[test]
fn test_render_withEmptyPrompt_shouldOnlyDrawFrame() {
    let composer = ImageComposer::with_font(CaptionFont::Builtin, "unused");
    let card = composer.render("");
    let text_color = Rgb([245, 245, 245]);
    assert!(card.pixels().all(|p| *p != text_color));
}

/// Test saving uniquely named PNGs
#[test]
fn test_compose_shouldWriteDistinctPngFiles() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output_dir = temp_dir.path().join(".mp");
    let composer = ImageComposer::new(&temp_dir.path().join("missing.ttf"), &output_dir);

    let first = composer.compose("Jardinage en ville")?;
    let second = composer.compose("Jardinage en ville")?;

    assert_ne!(first, second);
    assert_eq!(first.parent(), Some(output_dir.as_path()));
    assert_eq!(first.extension().and_then(|e| e.to_str()), Some("png"));

    let decoded = image::open(&first)?;
    assert_eq!(decoded.dimensions(), (CARD_WIDTH, CARD_HEIGHT));
    Ok(())
}
