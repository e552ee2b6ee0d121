//! Single-word matcher / 单词匹配
//!
//! Plain substring containment: Korean writes morphemes without spaces, so no
//! word-boundary anchoring is applied.

use std::borrow::Cow;

use regex::{Regex, RegexBuilder};

use crate::error::{Result, SearchError};
use crate::morph::hangul::contains_hangul;
use crate::morph::Oracle;

/// Why a line matched / 命中信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineHit {
    /// Text of the line that triggered the hit, as written there
    pub keyword: String,
    /// Target variant behind the hit; differs from `keyword` only by ASCII case
    pub variant: String,
    /// Found by analysing the line rather than by a generated variant
    pub via_fallback: bool,
}

impl LineHit {
    fn literal(keyword: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            variant: keyword.to_string(),
            via_fallback: false,
        }
    }
}

/// Matches a target variant set against line content.
pub struct VariantMatcher {
    /// Longest first, so the most specific inflection wins / 按长度降序
    variants: Vec<String>,
    folded: Vec<String>,
    case_sensitive: bool,
    fallback_lemma: Option<String>,
}

impl VariantMatcher {
    pub fn new(variants: &[String], case_sensitive: bool) -> Self {
        let mut variants: Vec<String> = variants.iter().filter(|v| !v.is_empty()).cloned().collect();
        variants.sort_by_key(|v| std::cmp::Reverse(v.chars().count()));
        let folded = variants
            .iter()
            .map(|v| if case_sensitive { v.clone() } else { v.to_ascii_lowercase() })
            .collect();
        Self {
            variants,
            folded,
            case_sensitive,
            fallback_lemma: None,
        }
    }

    /// Enables the morphological fallback pass for a verbal lemma / 启用形态回退
    pub fn with_fallback(mut self, lemma: impl Into<String>) -> Self {
        self.fallback_lemma = Some(lemma.into());
        self
    }

    pub fn match_line(&self, content: &str, oracle: &Oracle) -> Option<LineHit> {
        let haystack: Cow<str> = if self.case_sensitive {
            Cow::Borrowed(content)
        } else {
            Cow::Owned(content.to_ascii_lowercase())
        };

        for (variant, folded) in self.variants.iter().zip(&self.folded) {
            // ASCII folding keeps byte offsets, so the position indexes `content` too.
            if let Some(start) = haystack.find(folded.as_str()) {
                return Some(LineHit {
                    keyword: content[start..start + folded.len()].to_string(),
                    variant: variant.clone(),
                    via_fallback: false,
                });
            }
        }

        let lemma = self.fallback_lemma.as_deref()?;
        if !contains_hangul(content) {
            return None;
        }
        oracle
            .analyse_sentence(content)
            .into_iter()
            .find(|token| token.lemma == lemma && content.contains(token.surface.as_str()))
            .map(|token| LineHit {
                variant: token.surface.clone(),
                keyword: token.surface,
                via_fallback: true,
            })
    }
}

/// Raw keyword compiled as a regular expression; no variant expansion / 正则匹配
pub struct RegexMatcher {
    regex: Regex,
}

impl RegexMatcher {
    pub fn new(pattern: &str, case_sensitive: bool) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| SearchError::InvalidRegex {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { regex })
    }

    pub fn match_line(&self, content: &str) -> Option<LineHit> {
        self.regex
            .find_iter(content)
            .find(|m| !m.as_str().is_empty())
            .map(|m| LineHit::literal(m.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::variants::generate_variants;
    use crate::morph::PosTag;

    #[test]
    fn test_longest_variant_wins() {
        let variants = generate_variants("속아", "속다", &PosTag::VV);
        let matcher = VariantMatcher::new(&variants, true);
        let hit = matcher.match_line("나는 속았어요.", &Oracle::rule_based()).unwrap();
        assert_eq!(hit.keyword, "속았어요");
        assert!(!hit.via_fallback);
    }

    #[test]
    fn test_no_word_boundary_for_korean() {
        let matcher = VariantMatcher::new(&["병원".to_string()], true);
        assert!(matcher.match_line("병원에 갔다.", &Oracle::rule_based()).is_some());
        assert!(matcher.match_line("학교에 갔다.", &Oracle::rule_based()).is_none());
    }

    #[test]
    fn test_case_insensitive_english() {
        let variants = generate_variants("apple", "apple", &PosTag::Foreign);
        let oracle = Oracle::rule_based();
        let matcher = VariantMatcher::new(&variants, false);
        let hit = matcher.match_line("He likes Apples.", &oracle).unwrap();
        assert_eq!(hit.keyword, "Apples");
        assert_eq!(hit.variant, "apples");
        assert!("He likes Apples.".contains(hit.keyword.as_str()));

        let strict = VariantMatcher::new(&variants, true);
        assert!(strict.match_line("He likes Apples.", &oracle).is_none());
    }

    #[test]
    fn test_fallback_recovers_unlisted_form() {
        // "속습니다" is not generated but the analyser maps it back to 속다
        let variants = vec!["속다".to_string()];
        let oracle = Oracle::rule_based();
        let plain = VariantMatcher::new(&variants, true);
        assert!(plain.match_line("저는 속습니다", &oracle).is_none());

        let matcher = VariantMatcher::new(&variants, true).with_fallback("속다");
        let hit = matcher.match_line("저는 속습니다", &oracle).unwrap();
        assert_eq!(hit.keyword, "속");
        assert!(hit.via_fallback);
        assert!(matcher.match_line("this is english", &oracle).is_none());
    }

    #[test]
    fn test_regex_matcher() {
        let matcher = RegexMatcher::new(r"병원|학교", true).unwrap();
        assert_eq!(matcher.match_line("학교에 갔다").unwrap().keyword, "학교");
        assert!(matcher.match_line("집에 갔다").is_none());

        let insensitive = RegexMatcher::new("apple[s]?", false).unwrap();
        assert_eq!(insensitive.match_line("APPLES!").unwrap().keyword, "APPLES");

        let empty = RegexMatcher::new("x*", true).unwrap();
        assert!(empty.match_line("abc").is_none());
    }

    #[test]
    fn test_invalid_regex() {
        assert!(matches!(
            RegexMatcher::new("(unclosed", true),
            Err(SearchError::InvalidRegex { .. })
        ));
    }
}
