//! Rule-based Korean analyser / 基于规则的韩语分析器
//!
//! Splits on whitespace, then peels a known verbal ending or a noun particle off
//! each word. Fallback for when the dictionary backend is unavailable; irregular
//! stems and fused contractions are out of its reach.
//!
//! Without a dictionary most short nouns look like inflected verbs (`마음`,
//! `바다`, `사고`), so a bare one-syllable ending is only peeled off when the
//! word cannot plausibly be a noun. Anything doubtful stays `NNG`.

use crate::error::Result;

use super::analyzer::{Analyzer, Morpheme};
use super::hangul::{coda, contains_hangul, split_last};
use super::pos::PosTag;
use super::PARTICLES;

/// Verbal endings, longest first / 用言词尾（按长度降序）
const VERBAL_ENDINGS: &[&str] = &[
    "았습니다", "었습니다", "였습니다",
    "았어요", "었어요", "였어요", "습니다",
    "았어", "었어", "였어", "았다", "었다", "였다", "았고", "었고", "였고",
    "아서", "어서", "아요", "어요", "으니", "으면", "는다", "네요", "지요",
];

/// One-syllable endings, accepted only under `bare_ending_fits` / 单音节词尾
const BARE_ENDINGS: &[&str] = &["아", "어", "다"];

pub struct RuleAnalyzer;

impl RuleAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn analyse_word(word: &str, out: &mut Vec<Morpheme>) {
        let word = word.trim_matches(|c: char| !c.is_alphanumeric());
        if word.is_empty() {
            return;
        }

        if !contains_hangul(word) {
            let tag = if word.chars().all(|c| c.is_ascii_digit()) {
                "SN"
            } else {
                "SL"
            };
            out.push(Morpheme::new(word, PosTag::parse(tag)));
            return;
        }

        let verbal = split_suffix(word, VERBAL_ENDINGS).or_else(|| {
            split_suffix(word, BARE_ENDINGS).filter(|(stem, ending)| bare_ending_fits(stem, ending))
        });
        if let Some((stem, ending)) = verbal {
            let ending_tag = if ending.ends_with('다') || ending.ends_with('요') {
                "EF"
            } else {
                "EC"
            };
            out.push(Morpheme::new(stem, PosTag::VV));
            out.push(Morpheme::new(ending, PosTag::parse(ending_tag)));
            return;
        }

        if let Some((noun, particle)) = split_suffix(word, PARTICLES) {
            out.push(Morpheme::new(noun, PosTag::NNG));
            out.push(Morpheme::new(particle, PosTag::parse("JX")));
            return;
        }

        out.push(Morpheme::new(word, PosTag::NNG));
    }
}

impl Default for RuleAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for RuleAnalyzer {
    fn name(&self) -> &'static str {
        "rule"
    }

    fn analyse(&self, text: &str) -> Result<Vec<Morpheme>> {
        let mut morphemes = Vec::new();
        for word in text.split_whitespace() {
            Self::analyse_word(word, &mut morphemes);
        }
        Ok(morphemes)
    }
}

/// First suffix in `suffixes` leaving a non-empty residue / 拆分后缀
fn split_suffix<'a>(word: &'a str, suffixes: &[&'a str]) -> Option<(&'a str, &'a str)> {
    suffixes.iter().find_map(|suffix| {
        word.strip_suffix(suffix)
            .filter(|stem| !stem.is_empty())
            .map(|stem| (stem, *suffix))
    })
}

/// Whether `stem` + a one-syllable `ending` reads as a verb rather than a noun.
///
/// `다` needs a stem of two syllables or more (`이루다`, not `바다`). `아`/`어`
/// need a two-syllable word whose stem is closed, not ㅇ-final, and agrees in
/// vowel harmony (`속아`, `먹어`; not `단어`, `영어`).
fn bare_ending_fits(stem: &str, ending: &str) -> bool {
    let syllables = stem.chars().count();
    if ending == "다" {
        return syllables >= 2;
    }
    if syllables != 1 {
        return false;
    }
    let Some((_, last)) = split_last(stem) else {
        return false;
    };
    !last.is_open() && last.coda != coda::IEUNG && last.is_bright() == (ending == "아")
}
