//! Korean morphology - analysis of keywords and sentences / 韩语形态分析
//!
//! - `Analyzer`: backend seam (rule-based, or ko-dic via lindera)
//! - `Oracle`: keyword / sentence analysis into `Lemma`s
//! - `hangul`: syllable arithmetic used by variant generation

pub mod analyzer;
pub mod hangul;
#[cfg(feature = "lindera-korean")]
pub mod lindera;
pub mod oracle;
pub mod pos;
pub mod rule;

pub use analyzer::{Analyzer, Morpheme};
pub use oracle::Oracle;
pub use pos::{Lemma, PosTag};
pub use rule::RuleAnalyzer;

/// Noun particles, longest first / 体词助词（按长度降序）
pub const PARTICLES: &[&str] = &[
    "에게서", "에서", "으로", "부터", "까지", "께서", "한테", "에게",
    "을", "를", "이", "가", "은", "는", "에", "로", "와", "과", "의", "만", "도", "께",
];
