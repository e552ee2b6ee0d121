//! File format dispatch / 文件格式判定

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};

/// Recognised input formats / 支持的格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    Srt,
    /// ASS / SSA subtitles
    Ass,
    Vtt,
    /// Plain text and Markdown, with embedded-timestamp detection
    TextLike,
    Word,
    Pdf,
}

impl FileFormat {
    /// Format for a lowercase-insensitive extension (without the dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "srt" => Some(Self::Srt),
            "ass" | "ssa" => Some(Self::Ass),
            "vtt" => Some(Self::Vtt),
            "txt" | "md" | "markdown" => Some(Self::TextLike),
            "docx" | "doc" => Some(Self::Word),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| SearchError::UnsupportedFormat(path.to_path_buf()))
    }

    pub fn is_supported(path: &Path) -> bool {
        Self::from_path(path).is_ok()
    }
}
