//! Idiom matcher - ordered bag of core words / 惯用语匹配
//!
//! `인심을 쓰다` → core words `인심`, `쓰다`. A line matches when one variant of
//! every core word occurs in order, none of them glued to a neighbouring
//! Hangul syllable other than a trailing particle.

use std::collections::HashSet;

use crate::models::push_unique;
use crate::morph::hangul::is_syllable;
use crate::morph::{PosTag, PARTICLES};

use super::variants::generate_variants;

/// One whitespace token of the idiom with its particle removed / 核心词
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreWord {
    pub word: String,
    pub pos: PosTag,
    /// Longest first
    pub variants: Vec<String>,
}

pub struct IdiomMatcher {
    words: Vec<CoreWord>,
}

/// Removes one trailing particle, if any / 去掉词尾助词
pub fn strip_particle(token: &str) -> &str {
    PARTICLES
        .iter()
        .find_map(|p| token.strip_suffix(p))
        .unwrap_or(token)
}

impl IdiomMatcher {
    pub fn new(keyword: &str) -> Self {
        let words = keyword
            .split_whitespace()
            .map(strip_particle)
            .filter(|w| !w.is_empty())
            .map(|word| {
                // No per-word analysis: the tag is read off the shape alone.
                let pos = if word.chars().count() > 1 && word.ends_with('다') {
                    PosTag::VV
                } else {
                    PosTag::Noun
                };
                let mut variants = generate_variants(word, word, &pos);
                variants.sort_by_key(|v| std::cmp::Reverse(v.chars().count()));
                CoreWord {
                    word: word.to_string(),
                    pos,
                    variants,
                }
            })
            .collect();
        Self { words }
    }

    pub fn core_words(&self) -> &[CoreWord] {
        &self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Union of every core word's variants, in core-word order / 全部目标变体
    pub fn target_variants(&self) -> Vec<String> {
        let mut set = Vec::new();
        for word in &self.words {
            for v in &word.variants {
                push_unique(&mut set, v);
            }
        }
        set
    }

    /// Matched variant per core word, or `None` / 逐行匹配
    pub fn match_line(&self, content: &str) -> Option<Vec<String>> {
        if self.words.is_empty() {
            return None;
        }
        let mut picked = Vec::with_capacity(self.words.len());
        let mut dead_ends = HashSet::new();
        if self.assign(content, 0, 0, &mut picked, &mut dead_ends) {
            Some(picked.into_iter().map(str::to_string).collect())
        } else {
            None
        }
    }

    /// Backtracking: place word `index` at or after byte offset `from`.
    ///
    /// `dead_ends` remembers `(index, from)` pairs already known to fail, which
    /// keeps the search polynomial in the number of occurrences.
    fn assign<'a>(
        &'a self,
        content: &str,
        index: usize,
        from: usize,
        picked: &mut Vec<&'a str>,
        dead_ends: &mut HashSet<(usize, usize)>,
    ) -> bool {
        let Some(word) = self.words.get(index) else {
            return true;
        };
        if dead_ends.contains(&(index, from)) {
            return false;
        }
        let tail = &content[from..];
        for variant in &word.variants {
            for (offset, _) in tail.match_indices(variant.as_str()) {
                let start = from + offset;
                let end = start + variant.len();
                if !is_standalone(content, start, end) {
                    continue;
                }
                picked.push(variant);
                if self.assign(content, index + 1, end, picked, dead_ends) {
                    return true;
                }
                picked.pop();
            }
        }
        dead_ends.insert((index, from));
        false
    }
}

/// The occurrence `content[start..end]` is not glued to extra Hangul syllables.
/// A particle directly after it is allowed (`인심을`).
fn is_standalone(content: &str, start: usize, end: usize) -> bool {
    if content[..start].chars().next_back().is_some_and(is_syllable) {
        return false;
    }
    let trailing: String = content[end..].chars().take_while(|c| is_syllable(*c)).collect();
    trailing.is_empty() || PARTICLES.contains(&trailing.as_str())
}
