//! Query history log (JSON lines) / 查询历史记录
//!
//! Written by the command line front end after each query; the search core
//! never touches it.

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{SearchMode, SearchRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub root: String,
    pub keyword: String,
    pub mode: SearchMode,
    pub lemma: String,
    pub pos: String,
    pub matches: usize,
    pub files_scanned: usize,
    pub cancelled: bool,
}

impl HistoryEntry {
    pub fn from_record(root: &Path, record: &SearchRecord) -> Self {
        Self {
            timestamp: Utc::now(),
            root: root.to_string_lossy().to_string(),
            keyword: record.raw_keyword.clone(),
            mode: record.mode,
            lemma: record.lemma.clone(),
            pos: record.pos.to_string(),
            matches: record.search_results.len(),
            files_scanned: record.files_scanned,
            cancelled: record.cancelled,
        }
    }
}

/// Appends one entry / 追加一条记录
pub fn append(path: &Path, entry: &HistoryEntry) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let line = serde_json::to_string(entry).map_err(std::io::Error::from)?;
    writeln!(file, "{}", line)?;
    Ok(())
}

/// Reads every entry, skipping lines that no longer parse / 读取历史
pub fn load(path: &Path) -> Result<Vec<HistoryEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let reader = BufReader::new(std::fs::File::open(path)?);
    let mut entries = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(entry) => entries.push(entry),
            Err(e) => tracing::warn!("Ignoring history line {}: {}", idx + 1, e),
        }
    }
    Ok(entries)
}
