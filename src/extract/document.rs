//! Document adapters: plain text / Markdown, PDF, Word / 文档解析

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{Result, SearchError};
use crate::models::Line;

use super::heading::TextLines;

/// Plain text and Markdown: every non-empty line / 纯文本与 Markdown
pub fn parse_text(text: &str, file_path: &str) -> Vec<Line> {
    let mut lines = TextLines::new(file_path);
    for raw in text.lines() {
        lines.push(raw, None);
    }
    lines.finish()
}

/// PDF: per-page text, running line counter across pages / PDF 逐页提取
pub fn parse_pdf(path: &Path) -> Result<Vec<Line>> {
    let doc = lopdf::Document::load(path).map_err(|e| SearchError::parse(path, e))?;
    let mut lines = TextLines::new(path.to_string_lossy());

    for page_no in doc.get_pages().keys() {
        let text = match doc.extract_text(&[*page_no]) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Skipping page {} of {}: {}", page_no, path.display(), e);
                continue;
            }
        };
        for raw in text.lines() {
            lines.push(raw, Some(*page_no as usize));
        }
    }
    Ok(lines.finish())
}

/// Word (.docx): one line per non-empty paragraph, numbered by paragraph ordinal
pub fn parse_docx(path: &Path) -> Result<Vec<Line>> {
    let file = File::open(path)?;
    let mut archive =
        zip::ZipArchive::new(BufReader::new(file)).map_err(|e| SearchError::parse(path, e))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| SearchError::parse(path, e))?
        .read_to_string(&mut xml)?;

    let paragraphs = docx_paragraphs(&xml).map_err(|e| SearchError::parse(path, e))?;
    let mut lines = TextLines::new(path.to_string_lossy());
    for (idx, paragraph) in paragraphs.iter().enumerate() {
        lines.push_numbered(paragraph, idx + 1, None);
    }
    Ok(lines.finish())
}

/// Collects the text of every `<w:p>` in `word/document.xml`, empty ones included
/// so that ordinals match the document.
pub(crate) fn docx_paragraphs(xml: &str) -> std::result::Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => current = Some(String::new()),
                b"t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"p" => paragraphs.push(String::new()),
                b"tab" | b"br" => {
                    if let Some(p) = current.as_mut() {
                        p.push(' ');
                    }
                }
                _ => {}
            },
            Event::Text(t) if in_text => {
                if let Some(p) = current.as_mut() {
                    p.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if let Some(p) = current.take() {
                        paragraphs.push(p);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(paragraphs)
}
