use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

use crate::post::Post;

/// Applied in order over the same buffer; a later rule sees the output of
/// earlier ones.
const REPLACEMENTS: [(&str, &str); 3] = [
    ("AITA", "Am I The Asshole"),
    ("TL;DR", "Too Long, Didn't Read"),
    ("\n\n", "\n"),
];

static SENTENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)([^.!?]+[.!?]+)|([^.!?]+$)").expect("sentence pattern is valid")
});

/// Title and body joined into the text the narrator reads.
pub fn format_for_narration(post: &Post) -> String {
    let mut text = format!("{}\n\n{}", post.title, post.text);
    for (from, to) in REPLACEMENTS {
        text = text.replace(from, to);
    }
    text
}

/// Split narration into sentence-aligned chunks of at most `max_chars` bytes.
/// A single sentence longer than the limit becomes its own chunk.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let sentences: Vec<&str> = SENTENCE_RE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .collect();
    if sentences.is_empty() {
        warn!("No sentence breaks found; returning whole text as one chunk");
        return vec![text.trim().to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    for s in sentences {
        if current.is_empty() {
            current.push_str(s);
        } else if current.len() + 1 + s.len() <= max_chars {
            current.push(' ');
            current.push_str(s);
        } else {
            chunks.push(std::mem::take(&mut current));
            current.push_str(s);
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
