//! Morphology oracle / 形态判定
//!
//! Wraps one analyser handle and turns raw morphemes into `Lemma`s. The handle
//! is created once per driver and cloned into whatever needs it.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::error::{Result, SearchError};

use super::analyzer::{Analyzer, Morpheme};
use super::hangul::contains_hangul;
use super::pos::{Lemma, PosTag};
use super::rule::RuleAnalyzer;

/// Backend used when none is configured / 默认分析后端
#[cfg(feature = "lindera-korean")]
pub const DEFAULT_BACKEND: &str = "lindera";
#[cfg(not(feature = "lindera-korean"))]
pub const DEFAULT_BACKEND: &str = "rule";

static PREFERRED: Lazy<Oracle> = Lazy::new(|| match Oracle::from_backend(DEFAULT_BACKEND) {
    Ok(oracle) => oracle,
    Err(e) => {
        tracing::warn!("{}, falling back to the rule analyser", e);
        Oracle::rule_based()
    }
});

#[derive(Clone)]
pub struct Oracle {
    analyzer: Arc<dyn Analyzer>,
}

impl Oracle {
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        Self { analyzer }
    }

    pub fn rule_based() -> Self {
        Self::new(Arc::new(RuleAnalyzer::new()))
    }

    /// Shared handle on the default backend, loaded once per process.
    ///
    /// Degrades to the rule analyser when the dictionary cannot be loaded.
    pub fn preferred() -> Self {
        PREFERRED.clone()
    }

    /// Builds the oracle for a configured backend name / 按名称创建分析器
    pub fn from_backend(name: &str) -> Result<Self> {
        match name {
            "rule" => Ok(Self::rule_based()),
            #[cfg(feature = "lindera-korean")]
            "lindera" => {
                let analyzer = super::lindera::LinderaAnalyzer::new()?;
                Ok(Self::new(Arc::new(analyzer)))
            }
            #[cfg(not(feature = "lindera-korean"))]
            "lindera" => Err(SearchError::AnalyzerUnavailable(
                "built without the `lindera-korean` feature".to_string(),
            )),
            other => Err(SearchError::AnalyzerUnavailable(format!(
                "unknown analyser backend: {}",
                other
            ))),
        }
    }

    pub fn backend(&self) -> &'static str {
        self.analyzer.name()
    }

    /// Analyse a user keyword into a single token / 分析用户关键词
    ///
    /// Never fails: non-Korean input and analyser errors degrade to the `Noun`
    /// sentinel with the input as its own lemma.
    pub fn analyse(&self, token: &str) -> Lemma {
        let token = token.trim();
        if !contains_hangul(token) {
            return Lemma::unanalysed(token);
        }

        let morphemes = match self.analyzer.analyse(token) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("Analyser failed on keyword {:?}: {}", token, e);
                return Lemma::unanalysed(token);
            }
        };

        let Some(top) = morphemes.iter().position(|m| !m.tag.is_functional()) else {
            tracing::debug!("Keyword {:?} unanalysable, treating as noun", token);
            return Lemma::unanalysed(token);
        };

        // Analyser split "<stem>다" into an adverb plus a stray "다".
        if token.ends_with('다')
            && morphemes[top].tag == PosTag::MAG
            && morphemes.last().map(|m| m.surface.as_str()) == Some("다")
        {
            let lemma: String = morphemes.iter().map(|m| m.surface.as_str()).collect();
            return Lemma {
                surface: token.to_string(),
                lemma,
                pos: PosTag::VV,
            };
        }

        let (lemma, pos) = lemma_of(&morphemes, top);
        Lemma {
            surface: token.to_string(),
            lemma,
            pos,
        }
    }

    /// Analyse a whole line, one `Lemma` per content word / 分析整句
    pub fn analyse_sentence(&self, text: &str) -> Vec<Lemma> {
        if !contains_hangul(text) {
            return Vec::new();
        }
        let morphemes = match self.analyzer.analyse(text) {
            Ok(m) => m,
            Err(e) => {
                tracing::debug!("Analyser failed on line: {}", e);
                return Vec::new();
            }
        };

        let mut lemmas = Vec::new();
        let mut i = 0;
        while i < morphemes.len() {
            let m = &morphemes[i];
            if m.tag.is_functional() {
                i += 1;
                continue;
            }
            let suffix = derivation_suffix(&morphemes, i);
            // Only merge "공부"+"했" when the pair is contiguous in the line.
            let merged = suffix
                .map(|s| format!("{}{}", m.surface, s.surface))
                .filter(|surface| text.contains(surface.as_str()));

            if let Some(surface) = merged {
                let (lemma, pos) = lemma_of(&morphemes, i);
                lemmas.push(Lemma { surface, lemma, pos });
                i += 2;
                continue;
            }

            let (lemma, pos) = if suffix.is_some() {
                (m.surface.clone(), m.tag.clone())
            } else {
                lemma_of(&morphemes, i)
            };
            lemmas.push(Lemma {
                surface: m.surface.clone(),
                lemma,
                pos,
            });
            i += 1;
        }
        lemmas
    }
}

/// `XSV` / `XSA` suffix directly after a noun (`공부` + `하`) / 派生后缀
fn derivation_suffix(morphemes: &[Morpheme], index: usize) -> Option<&Morpheme> {
    let head = &morphemes[index];
    let next = morphemes.get(index + 1)?;
    (head.tag.is_nominal() && matches!(next.tag, PosTag::XSV | PosTag::XSA)).then_some(next)
}

/// Dictionary form and tag of the token starting at `index`.
fn lemma_of(morphemes: &[Morpheme], index: usize) -> (String, PosTag) {
    let head = &morphemes[index];
    if let Some(suffix) = derivation_suffix(morphemes, index) {
        return (
            format!("{}{}다", head.surface, suffix.stem()),
            suffix.tag.clone(),
        );
    }
    if head.tag.is_verbal() {
        (format!("{}다", head.stem()), head.tag.clone())
    } else {
        (head.surface.clone(), head.tag.clone())
    }
}
