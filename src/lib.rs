//! Subtitle / document corpus search with Korean morphological expansion
//! 字幕与文档语料搜索（韩语形态扩展）

pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod history;
pub mod models;
pub mod morph;
pub mod search;
pub mod state;

use std::path::Path;

pub use error::{Result, SearchError};
pub use models::{Line, Match, SearchMode, SearchOptions, SearchRecord};
pub use morph::{Lemma, Oracle, PosTag};
pub use search::{SearchEvent, SearchRun, Searcher};
pub use state::{SearchProgress, SearchState};

/// One-shot search with the default analyser / 使用默认分析器执行搜索
pub fn search(
    path: impl AsRef<Path>,
    raw_keyword: &str,
    mode: SearchMode,
    options: &SearchOptions,
) -> Result<SearchRecord> {
    Searcher::new(Oracle::preferred()).search(path.as_ref(), raw_keyword, mode, options)
}

/// Target variant set for a lemma / 生成变体集合
pub fn generate_variants(lemma: &str, pos: &PosTag) -> Vec<String> {
    search::generate_variants(lemma, lemma, pos)
}

/// Classifies one keyword with the default analyser / 分析关键词
pub fn analyse(token: &str) -> Lemma {
    Oracle::preferred().analyse(token)
}
