use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::file_utils::FileManager;

// @module: Sentence-timed subtitle tracks

// @const: Sentence terminator followed by whitespace
static SENTENCE_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").unwrap());

// @const: SRT timestamp regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2,}):(\d{2}):(\d{2}),(\d{3}) --> (\d{2,}):(\d{2}):(\d{2}),(\d{3})").unwrap()
});

/// Shortest cue, in seconds
pub const MIN_CUE_SECS: u64 = 2;

/// Longest cue, in seconds
pub const MAX_CUE_SECS: u64 = 6;

// @struct: Single timed subtitle cue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleCue {
    // @field: 1-based sequence number
    pub index: usize,

    // @field: Start time in seconds
    pub start_secs: u64,

    // @field: End time in seconds
    pub end_secs: u64,

    // @field: Cue text
    pub text: String,
}

impl SubtitleCue {
    pub fn new(index: usize, start_secs: u64, end_secs: u64, text: String) -> Self {
        SubtitleCue {
            index,
            start_secs,
            end_secs,
            text,
        }
    }

    /// Length of the cue in seconds
    pub fn duration_secs(&self) -> u64 {
        self.end_secs - self.start_secs
    }

    /// Format whole seconds as an SRT timestamp (HH:MM:SS,000)
    ///
    /// Hours are not wrapped at 24.
    pub fn format_timestamp(secs: u64) -> String {
        let hours = secs / 3600;
        let minutes = (secs % 3600) / 60;
        let seconds = secs % 60;

        format!("{:02}:{:02}:{:02},000", hours, minutes, seconds)
    }
}

impl fmt::Display for SubtitleCue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(
            f,
            "{} --> {}",
            Self::format_timestamp(self.start_secs),
            Self::format_timestamp(self.end_secs)
        )?;
        writeln!(f, "{}", self.text)
    }
}

/// Cue duration for a sentence: one second per 20 characters, plus one, within [2, 6]
pub fn cue_duration(sentence: &str) -> u64 {
    let chars = sentence.chars().count() as u64;
    (chars / 20 + 1).clamp(MIN_CUE_SECS, MAX_CUE_SECS)
}

/// Split a script into trimmed, non-empty sentences
///
/// A boundary is a `.`, `!` or `?` followed by whitespace; the terminator
/// stays with its sentence.
pub fn split_sentences(script: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_BOUNDARY.find_iter(script) {
        // Terminators are single-byte ASCII
        sentences.push(&script[start..boundary.start() + 1]);
        start = boundary.end();
    }
    sentences.push(&script[start..]);

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Contiguous cues for every sentence of `script`
pub fn cues(script: &str) -> Vec<SubtitleCue> {
    let mut clock = 0;
    split_sentences(script)
        .into_iter()
        .enumerate()
        .map(|(i, sentence)| {
            let start = clock;
            let end = start + cue_duration(&sentence);
            clock = end;
            SubtitleCue::new(i + 1, start, end, sentence)
        })
        .collect()
}

/// Render cues as a SubRip document
pub fn render_srt(cues: &[SubtitleCue]) -> String {
    cues.iter()
        .map(|cue| cue.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Writes sentence-timed subtitle tracks
#[derive(Debug, Clone, Copy, Default)]
pub struct SubtitleTimer;

impl SubtitleTimer {
    pub fn new() -> Self {
        SubtitleTimer
    }

    /// Time `script` and write it as SubRip to `destination`
    ///
    /// An empty script produces an empty file.
    pub fn time<P: AsRef<Path>>(&self, script: &str, destination: P) -> Result<PathBuf> {
        let destination = destination.as_ref();
        let cues = cues(script);
        debug!("Timed {} cues for {}", cues.len(), destination.display());

        FileManager::write_to_file(destination, &render_srt(&cues))
            .with_context(|| format!("Failed to write subtitles: {}", destination.display()))?;

        Ok(destination.to_path_buf())
    }
}

/// Parse SubRip content back into cues
///
/// Fractional seconds are truncated. Blank content yields no cues.
pub fn parse_srt(content: &str) -> Result<Vec<SubtitleCue>> {
    let mut cues = Vec::new();
    let mut index: Option<usize> = None;
    let mut times: Option<(u64, u64)> = None;
    let mut text = String::new();

    let mut flush = |index: &mut Option<usize>, times: &mut Option<(u64, u64)>, text: &mut String| {
        if let (Some(i), Some((start, end))) = (*index, *times) {
            if text.trim().is_empty() {
                warn!("Skipping empty subtitle cue {}", i);
            } else {
                cues.push(SubtitleCue::new(i, start, end, text.trim().to_string()));
            }
        }
        *index = None;
        *times = None;
        text.clear();
    };

    for (line_number, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            flush(&mut index, &mut times, &mut text);
            continue;
        }

        if index.is_none() {
            let number = trimmed
                .parse::<usize>()
                .map_err(|_| anyhow!("Expected cue number at line {}: {}", line_number + 1, trimmed))?;
            index = Some(number);
            continue;
        }

        if times.is_none() {
            let caps = TIMESTAMP_REGEX
                .captures(trimmed)
                .ok_or_else(|| anyhow!("Expected timestamp at line {}: {}", line_number + 1, trimmed))?;
            times = Some((timestamp_secs(&caps, 1)?, timestamp_secs(&caps, 5)?));
            continue;
        }

        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(trimmed);
    }
    flush(&mut index, &mut times, &mut text);

    Ok(cues)
}

fn timestamp_secs(caps: &regex::Captures, start_idx: usize) -> Result<u64> {
    let field = |offset: usize| -> Result<u64> {
        caps.get(start_idx + offset)
            .ok_or_else(|| anyhow!("Missing timestamp field"))?
            .as_str()
            .parse::<u64>()
            .context("Failed to parse timestamp field")
    };

    let (hours, minutes, seconds) = (field(0)?, field(1)?, field(2)?);

    hours
        .checked_mul(3600)
        .and_then(|secs| secs.checked_add(minutes * 60 + seconds))
        .ok_or_else(|| anyhow!("Timestamp out of range: {} hours", hours))
}
