/*!
 * Tests for sentence timing and SubRip output
 */

use localgen::subtitle_timer::{cue_duration, cues, parse_srt, render_srt, split_sentences, SubtitleCue};
use localgen::SubtitleTimer;
use crate::common;

/// Test the duration formula and its bounds
#[test]
fn test_cue_duration_withVariousLengths_shouldClamp() {
    assert_eq!(cue_duration(""), 2);
    assert_eq!(cue_duration("Bonjour."), 2);
    assert_eq!(cue_duration(&"a".repeat(40)), 3);
    assert_eq!(cue_duration(&"a".repeat(59)), 3);
    assert_eq!(cue_duration(&"a".repeat(100)), 6);
    assert_eq!(cue_duration(&"a".repeat(1_000)), 6);
}

/// Test that cues are contiguous and numbered from one
#[test]
fn test_cues_withSeveralSentences_shouldBeContiguous() {
    let long = "a".repeat(60);
    let script = format!("Un. {}. Trois !  Quatre?", long);
    let cues = cues(&script);

    assert_eq!(cues.len(), 4);
    assert_eq!(cues[0], SubtitleCue::new(1, 0, 2, "Un.".to_string()));
    assert_eq!(cues[1].start_secs, 2);
    assert_eq!(cues[1].duration_secs(), 4);
    for pair in cues.windows(2) {
        assert_eq!(pair[0].end_secs, pair[1].start_secs);
        assert_eq!(pair[0].index + 1, pair[1].index);
    }
    // A space before the terminator stays inside the cue
    assert_eq!(cues[2].text, "Trois !");
}

/// Test exact SubRip rendering
#[test]
fn test_render_srt_withTwoSentences_shouldMatchFormat() {
    let srt = render_srt(&cues("Bonjour. Comment vas-tu?"));
    assert_eq!(
        srt,
        "1\n00:00:00,000 --> 00:00:02,000\nBonjour.\n\n\
         2\n00:00:02,000 --> 00:00:04,000\nComment vas-tu?\n"
    );
}

/// Test that an empty script renders nothing
#[test]
fn test_render_srt_withEmptyScript_shouldBeEmpty() {
    assert!(cues("").is_empty());
    assert!(cues(" \n ").is_empty());
    assert_eq!(render_srt(&[]), "");
}

/// Test that text without terminators stays one sentence
#[test]
fn test_split_sentences_withoutTerminator_shouldKeepWholeText() {
    assert_eq!(split_sentences("  pas de fin  "), vec!["pas de fin"]);
    assert_eq!(split_sentences("Fin.Pas d'espace"), vec!["Fin.Pas d'espace"]);
}

/// Test writing subtitles to disk
#[test]
fn test_time_withScript_shouldWriteSrtFile() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let destination = temp_dir.path().join("nested").join("subs.srt");

    let path = SubtitleTimer::new().time("Bonjour. Comment vas-tu?", &destination)?;
    assert_eq!(path, destination);

    let content = std::fs::read_to_string(&path)?;
    let parsed = parse_srt(&content)?;
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[1].text, "Comment vas-tu?");
    assert_eq!((parsed[1].start_secs, parsed[1].end_secs), (2, 4));
    Ok(())
}

/// Test that an empty script writes an empty file
#[test]
fn test_time_withEmptyScript_shouldWriteEmptyFile() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let destination = temp_dir.path().join("empty.srt");

    SubtitleTimer::new().time("", &destination)?;
    assert_eq!(std::fs::read_to_string(&destination)?, "");
    Ok(())
}

/// Test SubRip parsing of foreign files
#[test]
fn test_parse_srt_withMultilineCue_shouldJoinLines() -> anyhow::Result<()> {
    let content = "1\r\n00:00:01,500 --> 00:00:03,250\r\nLigne un\r\nLigne deux\r\n\r\n2\r\n00:00:04,000 --> 00:00:05,000\r\nFin\r\n";
    let cues = parse_srt(content)?;

    assert_eq!(cues.len(), 2);
    assert_eq!(cues[0].text, "Ligne un\nLigne deux");
    assert_eq!((cues[0].start_secs, cues[0].end_secs), (1, 3));
    assert!(parse_srt("")?.is_empty());
    assert!(parse_srt("pas un numéro\n").is_err());
    Ok(())
}

/// Test that absurd hour values are rejected instead of overflowing
#[test]
fn test_parse_srt_withHugeHours_shouldReturnError() {
    let content = "1\n9999999999999999:00:00,000 --> 9999999999999999:00:02,000\nx\n";
    let error = parse_srt(content).unwrap_err();
    assert!(error.to_string().contains("out of range"));

    // Large but representable hours still parse
    let cues = parse_srt("1\n1000:00:00,000 --> 1000:00:02,000\nx\n").unwrap();
    assert_eq!(cues[0].start_secs, 1000 * 3600);
    assert_eq!(cues[0].end_secs, 1000 * 3600 + 2);
}
