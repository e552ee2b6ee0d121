//! Error types / 错误类型
//!
//! Per-file errors (format, decoding, container parsing) are recovered by the
//! search driver; query-level errors (regex, analyser, missing root) abort a run.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    /// Extension outside the recognised map / 不支持的文件格式
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(PathBuf),

    /// No candidate encoding decoded the file / 所有候选编码均解码失败
    #[error("failed to decode {0}: no candidate encoding matched")]
    DecodeFailed(PathBuf),

    /// PDF / Word container could not be read / 文档容器解析失败
    #[error("failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// Morphological analyser could not be initialised / 形态分析器不可用
    #[error("morphological analyser unavailable: {0}")]
    AnalyzerUnavailable(String),

    /// Query compiled in regex mode is malformed / 正则表达式无效
    #[error("invalid regular expression {pattern:?}: {reason}")]
    InvalidRegex { pattern: String, reason: String },

    /// Search root does not exist / 搜索路径不存在
    #[error("search path not found: {0}")]
    PathNotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SearchError {
    pub fn parse(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the error only concerns a single file / 是否为单文件错误（可跳过）
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFormat(_) | Self::DecodeFailed(_) | Self::Parse { .. } | Self::Io(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
