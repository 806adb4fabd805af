use regex::Regex;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::LazyLock;

const COMMA_PAUSE: f64 = 0.20;
const SENTENCE_END_PAUSE: f64 = 0.40;
/// Longer words get more screen time, but sub-linearly.
const WORD_WEIGHT_EXP: f64 = 0.5;

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w[\w'-]*)|([,.!?])").expect("word pattern is valid"));

#[derive(Debug, Clone, PartialEq)]
pub struct SrtEntry {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Word-level caption timings for narration spoken as consecutive chunks.
/// Each item is the chunk's audio duration in seconds and its text.
pub fn build_srt_entries(chunks: &[(f64, String)]) -> Vec<SrtEntry> {
    let mut entries = Vec::new();
    let mut chunk_start = 0.0_f64;

    for (dur, text) in chunks {
        let chunk_end = chunk_start + dur;
        let elements: Vec<&str> = WORD_RE.find_iter(text).map(|m| m.as_str()).collect();

        if elements.is_empty() {
            entries.push(SrtEntry {
                start: chunk_start,
                end: chunk_end,
                text: text.clone(),
            });
            chunk_start = chunk_end;
            continue;
        }

        let mut total_pause = 0.0;
        let mut total_weight = 0.0;
        for &element in &elements {
            match element {
                "," => total_pause += COMMA_PAUSE,
                "." | "!" | "?" => total_pause += SENTENCE_END_PAUSE,
                word => total_weight += word_weight(word),
            }
        }
        let word_time = (dur - total_pause).max(0.0);

        let mut t = chunk_start;
        for element in elements {
            match element {
                "," => t += COMMA_PAUSE,
                "." | "!" | "?" => t += SENTENCE_END_PAUSE,
                word => {
                    let len = if total_weight > 0.0 {
                        word_time * word_weight(word) / total_weight
                    } else {
                        0.0
                    };
                    entries.push(SrtEntry {
                        start: t,
                        end: t + len,
                        text: word.to_string(),
                    });
                    t += len;
                }
            }
        }

        chunk_start = chunk_end;
    }
    entries
}

fn word_weight(word: &str) -> f64 {
    (word.chars().count() as f64).powf(WORD_WEIGHT_EXP)
}

pub fn write_srt(path: &Path, entries: &[SrtEntry]) -> anyhow::Result<()> {
    let mut f = BufWriter::new(File::create(path)?);
    for (i, entry) in entries.iter().enumerate() {
        writeln!(f, "{}", i + 1)?;
        writeln!(
            f,
            "{} --> {}",
            format_srt_time(entry.start),
            format_srt_time(entry.end)
        )?;
        for line in wrap_text(&entry.text, 80) {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)?;
    }
    f.flush()?;
    Ok(())
}

fn format_srt_time(seconds: f64) -> String {
    let total_ms = (seconds * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let total_sec = total_ms / 1000;
    let s = total_sec % 60;
    let total_min = total_sec / 60;
    let m = total_min % 60;
    let h = total_min / 60;
    format!("{:02}:{:02}:{:02},{:03}", h, m, s, ms)
}

fn wrap_text(s: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in s.split_whitespace() {
        if !current.is_empty() && current.len() + word.len() + 1 > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
