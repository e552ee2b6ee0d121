//! Search module - variant expansion, matching and the per-query driver / 搜索模块
//!
//! Pipeline / 流程：
//! - `variants`: lemma → target surface strings (Korean inflection, English suffixes)
//! - `matcher`: substring / regex matching of one line, with the analyser fallback
//! - `idiom`: ordered multi-word matching with particle stripping
//! - `driver`: keyword classification, file walk, record assembly
//!
//! Every query is a fresh linear scan; nothing is indexed.

pub mod driver;
pub mod idiom;
pub mod matcher;
pub mod variants;

pub use driver::{SearchEvent, SearchRun, Searcher};
pub use idiom::{strip_particle, CoreWord, IdiomMatcher};
pub use matcher::{LineHit, RegexMatcher, VariantMatcher};
pub use variants::{english_variants, generate_variants, verbal_variants};
