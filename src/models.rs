//! Search data model / 搜索数据模型

use serde::{Deserialize, Serialize};

use crate::morph::PosTag;

/// Episode placeholder before any heading is seen / 未知集数
pub const UNKNOWN_EPISODE: &str = "未知集数";
/// Time axis placeholder / 无时间轴
pub const NO_TIME_AXIS: &str = "N/A";

/// One content line produced by the line extractor / 行记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// 1-based, counted over non-empty source lines (cue index for SRT)
    pub line_no: usize,
    pub content: String,
    pub episode: String,
    pub time_axis: String,
    pub file_path: String,
    /// PDF page, 1-based / PDF 页码
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
}

/// A matched line / 匹配结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub file_path: String,
    pub line_no: usize,
    pub episode: String,
    pub time_axis: String,
    pub content: String,
    /// Exact surface that triggered the hit / 命中的具体变体
    pub matched_keyword: String,
    /// Every variant matched in idiom mode, in core-word order / 惯用语模式下的全部命中
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matched_keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
}

impl Match {
    pub fn from_line(line: Line, matched_keyword: String) -> Self {
        Self {
            file_path: line.file_path,
            line_no: line.line_no,
            episode: line.episode,
            time_axis: line.time_axis,
            content: line.content,
            matched_keyword,
            matched_keywords: Vec::new(),
            page: line.page,
        }
    }

    /// `matched_keyword` is the longest of the idiom's hits, so it stays a
    /// substring of `content`.
    pub fn from_idiom(line: Line, matched_keywords: Vec<String>) -> Self {
        let longest = matched_keywords
            .iter()
            .fold("", |best, kw| if kw.chars().count() > best.chars().count() { kw.as_str() } else { best })
            .to_string();
        let mut m = Self::from_line(line, longest);
        m.matched_keywords = matched_keywords;
        m
    }
}

/// Language / query mode / 搜索模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    #[default]
    KoreanWord,
    KoreanIdiom,
    English,
}

impl SearchMode {
    pub fn is_korean(&self) -> bool {
        matches!(self, Self::KoreanWord | Self::KoreanIdiom)
    }
}

impl std::str::FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "korean_word" | "korean" | "ko" => Ok(Self::KoreanWord),
            "korean_idiom" | "idiom" => Ok(Self::KoreanIdiom),
            "english" | "en" => Ok(Self::English),
            other => Err(format!("unknown search mode: {}", other)),
        }
    }
}

/// Query options / 搜索选项
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// English only; Korean always compares exactly / 仅英文生效
    pub case_sensitive: bool,
    /// Substring containment, same as the default matcher / 模糊匹配（等同子串）
    pub fuzzy_match: bool,
    /// Compile the raw keyword as a regex, no variant expansion / 正则模式
    pub regex_enabled: bool,
    /// Quoted keyword is matched literally / 引号包裹时精确匹配
    pub exact_match: bool,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn case_sensitive(mut self, enabled: bool) -> Self {
        self.case_sensitive = enabled;
        self
    }

    pub fn fuzzy(mut self, enabled: bool) -> Self {
        self.fuzzy_match = enabled;
        self
    }

    pub fn regex(mut self, enabled: bool) -> Self {
        self.regex_enabled = enabled;
        self
    }

    pub fn exact(mut self, enabled: bool) -> Self {
        self.exact_match = enabled;
        self
    }
}

/// Result of one query, handed to consumers / 单次查询结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub raw_keyword: String,
    pub lemma: String,
    pub pos: PosTag,
    pub is_verb_adj: bool,
    pub is_noun_adv: bool,
    pub mode: SearchMode,
    pub case_sensitive: bool,
    /// What the variant generator produced / 目标变体
    pub target_variant_set: Vec<String>,
    /// Variants observed in at least one line / 实际出现的变体
    pub actual_variant_set: Vec<String>,
    /// Observed variants, lemma/stem and fallback surfaces / 高亮用词集
    pub matched_terms_set: Vec<String>,
    pub search_results: Vec<Match>,
    pub files_scanned: usize,
    pub files_failed: usize,
    /// Stopped before every file was visited / 是否被中止
    pub cancelled: bool,
}

impl SearchRecord {
    pub fn empty(raw_keyword: &str, mode: SearchMode) -> Self {
        Self {
            raw_keyword: raw_keyword.to_string(),
            lemma: raw_keyword.to_string(),
            pos: PosTag::Noun,
            is_verb_adj: false,
            is_noun_adv: true,
            mode,
            case_sensitive: mode.is_korean(),
            target_variant_set: Vec::new(),
            actual_variant_set: Vec::new(),
            matched_terms_set: Vec::new(),
            search_results: Vec::new(),
            files_scanned: 0,
            files_failed: 0,
            cancelled: false,
        }
    }

    /// One-line human summary / 简要摘要
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "'{}' → {} [{}]: {} matches in {} files",
            self.raw_keyword,
            self.lemma,
            self.pos.display_name(),
            self.search_results.len(),
            self.files_scanned,
        );
        if self.files_failed > 0 {
            summary.push_str(&format!(", {} files skipped", self.files_failed));
        }
        if self.cancelled {
            summary.push_str(" (cancelled)");
        }
        summary
    }
}

/// Appends `value` unless already present, keeping insertion order.
pub(crate) fn push_unique(set: &mut Vec<String>, value: &str) {
    if !value.is_empty() && !set.iter().any(|v| v == value) {
        set.push(value.to_string());
    }
}
