//! Episode headings and embedded timestamps, shared by every text-like format
//! 集数标题与时间戳识别（各格式共用）

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Line, NO_TIME_AXIS, UNKNOWN_EPISODE};

/// `第1集`, `Episode 3`, `EP 12`, `#4`, `S01E02`, `Chapter 7`, anchored at line start
static EPISODE_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:第\s*\d+\s*集|episode\s*\d+|ep\s*\d+|#\d+|s\d+e\d+|chapter\s*\d+)")
        .expect("episode heading pattern")
});

/// Markdown header carrying an `SxxEyy` token, e.g. `# Death's Game S01E02`
static MARKDOWN_EPISODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^#{1,6}\s+.*s\d+e\d+").expect("markdown episode pattern"));

/// `[HH:MM:SS]` or `[H:MM:SS]`, brackets included / 时间戳
static TIMESTAMP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\d{1,2}:\d{2}:\d{2}\]").expect("timestamp pattern"));

pub fn is_episode_heading(line: &str) -> bool {
    let line = line.trim();
    EPISODE_HEADING.is_match(line) || MARKDOWN_EPISODE.is_match(line)
}

/// First bracketed timestamp in `text`, if any
pub fn extract_timestamp(text: &str) -> Option<&str> {
    TIMESTAMP.find(text).map(|m| m.as_str())
}

/// Removes timestamp tokens for display / 去除时间戳（用于显示）
pub fn strip_timestamps(text: &str) -> String {
    TIMESTAMP.replace_all(text, "").trim().to_string()
}

/// Accumulates `Line`s from raw text lines, tracking the rolling episode.
///
/// Headings consume a line number but are not emitted themselves.
pub struct TextLines {
    file_path: String,
    episode: String,
    line_no: usize,
    lines: Vec<Line>,
}

impl TextLines {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            episode: UNKNOWN_EPISODE.to_string(),
            line_no: 0,
            lines: Vec::new(),
        }
    }

    /// Feeds one source line; empty lines are skipped without numbering.
    pub fn push(&mut self, raw: &str, page: Option<usize>) {
        if raw.trim().is_empty() {
            return;
        }
        self.line_no += 1;
        self.push_numbered(raw, self.line_no, page);
    }

    /// Feeds a line whose number is decided by the caller (Word paragraphs).
    pub fn push_numbered(&mut self, raw: &str, line_no: usize, page: Option<usize>) {
        let content = raw.trim();
        if content.is_empty() {
            return;
        }
        if is_episode_heading(content) {
            self.episode = content.to_string();
            return;
        }
        let time_axis = extract_timestamp(content).unwrap_or(NO_TIME_AXIS).to_string();
        self.lines.push(Line {
            line_no,
            content: content.to_string(),
            episode: self.episode.clone(),
            time_axis,
            file_path: self.file_path.clone(),
            page,
        });
    }

    pub fn finish(self) -> Vec<Line> {
        self.lines
    }
}
