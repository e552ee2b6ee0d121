//! Subtitle adapters: SRT, ASS/SSA, WebVTT / 字幕解析
//!
//! Each adapter only does format-specific chunking; subtitles carry no episode
//! headings, so every line keeps the unknown-episode placeholder.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Line, NO_TIME_AXIS, UNKNOWN_EPISODE};

/// `00:01:02.345 --> 00:01:04.000`, hours optional / VTT 时间轴
static VTT_TIMING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^((?:\d{1,2}:)?\d{2}:\d{2}\.\d{3})\s+-->\s+((?:\d{1,2}:)?\d{2}:\d{2}\.\d{3})")
        .expect("vtt timing pattern")
});

fn line(file_path: &str, line_no: usize, content: String, time_axis: String) -> Line {
    Line {
        line_no,
        content,
        episode: UNKNOWN_EPISODE.to_string(),
        time_axis,
        file_path: file_path.to_string(),
        page: None,
    }
}

/// SRT cue blocks; `line_no` is the cue index / 解析 SRT
pub fn parse_srt(text: &str, file_path: &str) -> Vec<Line> {
    struct Cue {
        index: usize,
        time_axis: Option<String>,
        content: Vec<String>,
    }

    fn flush(cue: Option<Cue>, file_path: &str, out: &mut Vec<Line>) {
        if let Some(cue) = cue {
            if !cue.content.is_empty() {
                out.push(line(
                    file_path,
                    cue.index,
                    cue.content.join("\n"),
                    cue.time_axis.unwrap_or_else(|| NO_TIME_AXIS.to_string()),
                ));
            }
        }
    }

    let mut lines = Vec::new();
    let mut current: Option<Cue> = None;

    for raw in text.lines() {
        let raw = raw.trim();
        if raw.is_empty() {
            flush(current.take(), file_path, &mut lines);
            continue;
        }
        if let Some(cue) = current.as_mut() {
            if cue.time_axis.is_none() && raw.contains("-->") {
                cue.time_axis = Some(raw.to_string());
            } else {
                cue.content.push(raw.to_string());
            }
        } else if let Ok(index) = raw.parse::<usize>() {
            current = Some(Cue {
                index,
                time_axis: None,
                content: Vec::new(),
            });
        }
    }
    flush(current, file_path, &mut lines);
    lines
}

/// ASS/SSA `Dialogue:` events; `line_no` is the source line / 解析 ASS
pub fn parse_ass(text: &str, file_path: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let Some(event) = raw.trim_start().strip_prefix("Dialogue:") else {
            continue;
        };
        // Text is the tenth field; splitting at most ten times keeps its commas.
        let fields: Vec<&str> = event.splitn(10, ',').collect();
        if fields.len() < 10 {
            tracing::debug!("Skipping malformed dialogue at {}:{}", file_path, idx + 1);
            continue;
        }
        let content = fields[9].trim();
        if content.is_empty() {
            continue;
        }
        let time_axis = format!("{} --> {}", fields[1].trim(), fields[2].trim());
        lines.push(line(file_path, idx + 1, content.to_string(), time_axis));
    }
    lines
}

/// WebVTT cues; `line_no` is the cue ordinal / 解析 VTT
pub fn parse_vtt(text: &str, file_path: &str) -> Vec<Line> {
    let text = text.trim_start_matches('\u{feff}').replace("\r\n", "\n");
    let body = if text.trim_start().starts_with("WEBVTT") {
        // Preamble runs up to the first blank line.
        text.split_once("\n\n").map(|(_, rest)| rest).unwrap_or("")
    } else {
        text.as_str()
    };

    let mut lines = Vec::new();
    let mut ordinal = 0;
    for block in body.split("\n\n") {
        let block_lines: Vec<&str> = block.lines().collect();
        let Some(pos) = block_lines
            .iter()
            .position(|l| VTT_TIMING.is_match(l.trim()))
        else {
            continue;
        };
        let Some(caps) = VTT_TIMING.captures(block_lines[pos].trim()) else {
            continue;
        };
        let content = block_lines[pos + 1..]
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        if content.is_empty() {
            continue;
        }
        ordinal += 1;
        let time_axis = format!("{} --> {}", &caps[1], &caps[2]);
        lines.push(line(file_path, ordinal, content, time_axis));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRT: &str = "1\r\n00:00:01,000 --> 00:00:02,500\r\n나는 속았어요.\r\n\r\n2\r\n00:00:03,000 --> 00:00:04,000\r\n첫 줄\r\n둘째 줄\r\n\r\n7\r\n00:00:05,000 --> 00:00:06,000\r\n\r\n";

    #[test]
    fn test_srt_cues() {
        let lines = parse_srt(SRT, "a.srt");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line_no, 1);
        assert_eq!(lines[0].time_axis, "00:00:01,000 --> 00:00:02,500");
        assert_eq!(lines[0].content, "나는 속았어요.");
        assert_eq!(lines[1].content, "첫 줄\n둘째 줄");
        assert_eq!(lines[1].episode, UNKNOWN_EPISODE);
    }

    #[test]
    fn test_srt_without_trailing_blank() {
        let lines = parse_srt("3\n00:00:01,000 --> 00:00:02,000\nlast cue", "b.srt");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].line_no, 3);
    }

    #[test]
    fn test_ass_keeps_commas_in_text() {
        let ass = "[Script Info]\nTitle: x\n\n[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\nDialogue: 0,0:00:01.00,0:00:03.00,Default,,0,0,0,,그래, 나는 속았어요, 정말.\n";
        let lines = parse_ass(ass, "c.ass");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].line_no, 6);
        assert_eq!(lines[0].time_axis, "0:00:01.00 --> 0:00:03.00");
        assert_eq!(lines[0].content, "그래, 나는 속았어요, 정말.");
    }

    #[test]
    fn test_vtt_blocks() {
        let vtt = "WEBVTT\nKind: captions\n\nNOTE a comment\n\ncue-1\n00:00:01.000 --> 00:00:02.000 align:start\nHe likes apples.\n\n00:01.500 --> 00:02.000\n두 번째\n";
        let lines = parse_vtt(vtt, "e.vtt");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].time_axis, "00:00:01.000 --> 00:00:02.000");
        assert_eq!(lines[0].content, "He likes apples.");
        assert_eq!(lines[1].line_no, 2);
        assert_eq!(lines[1].content, "두 번째");
    }
}
