//! Morphological analyser seam / 形态分析器接口

use crate::error::Result;

use super::pos::PosTag;

/// One morpheme as reported by an analyser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Morpheme {
    /// Text as it appears in the input / 原文
    pub surface: String,
    pub tag: PosTag,
    /// Dictionary stem when `surface` is a fused inflection (e.g. `도와` → `돕`)
    pub base: Option<String>,
}

impl Morpheme {
    pub fn new(surface: impl Into<String>, tag: PosTag) -> Self {
        Self {
            surface: surface.into(),
            tag,
            base: None,
        }
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Stem used to build the dictionary form / 词干
    pub fn stem(&self) -> &str {
        self.base.as_deref().unwrap_or(&self.surface)
    }
}

/// A Korean morphological analyser backend.
///
/// Implementations split text into morphemes in reading order. One handle is
/// created per process and shared by the oracle.
pub trait Analyzer: Send + Sync {
    fn name(&self) -> &'static str;

    fn analyse(&self, text: &str) -> Result<Vec<Morpheme>>;
}
