//! Line extractor - turns one file into `Line` records / 行提取
//!
//! Dispatch is a pure function of the file extension (`FileFormat`); each
//! adapter owns only its format's chunking, while episode headings and
//! timestamps come from the shared `heading` module.

pub mod document;
pub mod encoding;
pub mod format;
pub mod heading;
pub mod subtitle;

use std::path::Path;

use crate::error::Result;
use crate::models::Line;

pub use format::FileFormat;
pub use heading::{extract_timestamp, is_episode_heading, strip_timestamps};

/// Extracts every content line of `path`, in ascending `line_no` / 提取文件所有行
pub fn extract_lines(path: &Path) -> Result<Vec<Line>> {
    let format = FileFormat::from_path(path)?;
    let file_path = path.to_string_lossy();

    let lines = match format {
        FileFormat::Srt => subtitle::parse_srt(&encoding::read_text(path)?, &file_path),
        FileFormat::Ass => subtitle::parse_ass(&encoding::read_text(path)?, &file_path),
        FileFormat::Vtt => subtitle::parse_vtt(&encoding::read_text(path)?, &file_path),
        FileFormat::TextLike => document::parse_text(&encoding::read_text(path)?, &file_path),
        FileFormat::Pdf => document::parse_pdf(path)?,
        FileFormat::Word => document::parse_docx(path)?,
    };

    tracing::debug!("Extracted {} lines from {} ({:?})", lines.len(), file_path, format);
    Ok(lines)
}
